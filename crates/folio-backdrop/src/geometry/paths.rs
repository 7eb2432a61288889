//! Line-only geometry: the double helix and code-symbol glyphs.

use std::f32::consts::PI;

use glam::Vec3;

use super::Mesh;
use crate::shape::Glyph;

/// Two strands of `points` samples each, joined as one zigzag line strip that
/// alternates between the strands (a ladder of rungs seen edge-on).
///
/// The helix climbs +Y and is centered vertically on the origin.
pub(super) fn double_helix(points: u32, radius: f32, rise: f32, angle_step: f32) -> Mesh {
    let points = points.max(2);
    let half = points as f32 * rise * 0.5;
    let mut mesh = Mesh::default();

    for i in 0..points {
        let a = i as f32 * angle_step;
        let y = i as f32 * rise - half;
        mesh.push(Vec3::new(a.cos() * radius, y, a.sin() * radius));
        mesh.push(Vec3::new((a + PI).cos() * radius, y, (a + PI).sin() * radius));
    }

    let n = mesh.positions.len() as u32;
    mesh.segments = (0..n - 1).map(|k| [k, k + 1]).collect();
    mesh
}

/// Two-character symbol drawn as polylines inside a `size` square.
pub(super) fn glyph(symbol: Glyph, size: f32) -> Mesh {
    // Left character in unit space [-1, 1]^2; the right one is its mirror image.
    let left: Vec<(f32, f32)> = match symbol {
        Glyph::Angle => vec![(-0.2, 0.6), (-0.8, 0.0), (-0.2, -0.6)],
        Glyph::Bracket => vec![(-0.3, 0.7), (-0.7, 0.7), (-0.7, -0.7), (-0.3, -0.7)],
        Glyph::Brace => vec![
            (-0.2, 0.7),
            (-0.45, 0.6),
            (-0.45, 0.1),
            (-0.7, 0.0),
            (-0.45, -0.1),
            (-0.45, -0.6),
            (-0.2, -0.7),
        ],
        Glyph::Paren => (0..=8)
            .map(|k| {
                let a = (2.0 / 3.0 + k as f32 / 12.0) * PI;
                (-0.1 + 0.8 * a.cos(), 0.8 * a.sin())
            })
            .collect(),
    };
    let right: Vec<(f32, f32)> = left.iter().map(|&(x, y)| (-x, y)).collect();

    let scale = size * 0.5;
    let mut mesh = Mesh::default();
    for stroke in [left, right] {
        let start = mesh.positions.len() as u32;
        for (x, y) in stroke {
            mesh.push(Vec3::new(x * scale, y * scale, 0.0));
        }
        let end = mesh.positions.len() as u32;
        mesh.segments.extend((start..end - 1).map(|k| [k, k + 1]));
    }

    mesh
}
