//! Shared GPU state and region math used by renderers.

use glam::{Mat4, Vec3};

use crate::coords::Rect;

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── regions ───────────────────────────────────────────────────────────────

/// Part of `region` that lies on a framebuffer of `extent` physical pixels.
///
/// Returns `None` when the region is scrolled fully off screen or degenerate.
pub fn clip_region(region: Rect, extent: (u32, u32)) -> Option<Rect> {
    if !region.is_finite() || region.is_empty() {
        return None;
    }
    region.intersect(Rect::from_size(extent.0 as f32, extent.1 as f32))
}

/// Integer scissor rectangle `(x, y, w, h)` covering `visible`, clamped to `extent`.
pub fn scissor_rect(visible: Rect, extent: (u32, u32)) -> Option<(u32, u32, u32, u32)> {
    let x0 = (visible.x.floor().max(0.0) as u32).min(extent.0);
    let y0 = (visible.y.floor().max(0.0) as u32).min(extent.1);
    let x1 = (visible.right().ceil().max(0.0) as u32).min(extent.0);
    let y1 = (visible.bottom().ceil().max(0.0) as u32).min(extent.1);

    let (w, h) = (x1.saturating_sub(x0), y1.saturating_sub(y0));
    if w == 0 || h == 0 { None } else { Some((x0, y0, w, h)) }
}

/// Clip-space transform mapping NDC of the full `region` onto NDC of `visible`.
///
/// The render pass viewport covers only `visible`; prepending this matrix keeps the
/// projection laid out over the whole region, so a half-scrolled section shows
/// exactly its visible half.
pub fn region_crop(region: Rect, visible: Rect) -> Mat4 {
    let sx = region.width / visible.width;
    let sy = region.height / visible.height;
    let tx = (2.0 * (region.x - visible.x) + region.width) / visible.width - 1.0;
    let ty = 1.0 - (2.0 * (region.y - visible.y) + region.height) / visible.height;

    Mat4::from_translation(Vec3::new(tx, ty, 0.0)) * Mat4::from_scale(Vec3::new(sx, sy, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec4;

    #[test]
    fn crop_is_identity_when_fully_visible() {
        let r = Rect::new(0.0, 0.0, 800.0, 600.0);
        let m = region_crop(r, r);
        assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn crop_maps_visible_edge_of_scrolled_region() {
        // Region scrolled up by half: only its bottom half is visible.
        let region = Rect::new(0.0, -300.0, 800.0, 600.0);
        let visible = clip_region(region, (800, 600)).unwrap();
        assert_eq!(visible, Rect::new(0.0, 0.0, 800.0, 300.0));

        let m = region_crop(region, visible);

        // Region center (NDC y = 0) sits on the top edge of the visible viewport.
        let center = m * Vec4::new(0.0, 0.0, 0.5, 1.0);
        assert_relative_eq!(center.y, 1.0, epsilon = 1e-6);

        // Region bottom (NDC y = -1) stays at the bottom edge.
        let bottom = m * Vec4::new(0.0, -1.0, 0.5, 1.0);
        assert_relative_eq!(bottom.y, -1.0, epsilon = 1e-6);
        assert_relative_eq!(bottom.z, 0.5);
    }

    #[test]
    fn crop_respects_homogeneous_w() {
        let region = Rect::new(100.0, 0.0, 400.0, 400.0);
        let visible = Rect::new(100.0, 0.0, 200.0, 400.0);
        let m = region_crop(region, visible);

        let a = m * Vec4::new(0.5, 0.0, 0.0, 1.0);
        let b = m * Vec4::new(1.0, 0.0, 0.0, 2.0);
        assert_relative_eq!(a.x / a.w, b.x / b.w, epsilon = 1e-6);
    }

    #[test]
    fn offscreen_region_is_clipped_away() {
        assert!(clip_region(Rect::new(0.0, 600.0, 800.0, 600.0), (800, 600)).is_none());
        assert!(clip_region(Rect::new(0.0, 0.0, 0.0, 600.0), (800, 600)).is_none());
    }

    #[test]
    fn scissor_rounds_outward_and_clamps() {
        let s = scissor_rect(Rect::new(10.4, 20.6, 100.2, 50.0), (100, 60));
        assert_eq!(s, Some((10, 20, 90, 40)));
        assert_eq!(scissor_rect(Rect::new(200.0, 0.0, 10.0, 10.0), (100, 60)), None);
    }
}
