//! Parametric surfaces: torus, sphere, box, ring, plane and the extruded gear.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::Mesh;

/// Torus around the Z axis.
pub(super) fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Mesh {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);
    let mut mesh = Mesh::default();

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let ring = radius + tube * v.cos();
            mesh.push(Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin()));
        }
    }

    let row = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.triangles.push([a, b, d]);
            mesh.triangles.push([b, c, d]);
        }
    }

    mesh
}

/// UV sphere with poles on the Y axis. Pole rows produce single triangles.
pub(super) fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut mesh = Mesh::default();

    for iy in 0..=hs {
        let phi = iy as f32 / hs as f32 * PI;
        for ix in 0..=ws {
            let theta = ix as f32 / ws as f32 * TAU;
            mesh.push(Vec3::new(
                -radius * theta.cos() * phi.sin(),
                radius * phi.cos(),
                radius * theta.sin() * phi.sin(),
            ));
        }
    }

    let row = ws + 1;
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.triangles.push([a, b, d]);
            }
            if iy != hs - 1 {
                mesh.triangles.push([b, c, d]);
            }
        }
    }

    mesh
}

/// Axis-aligned box centered on the origin, two triangles per face.
pub(super) fn cuboid(width: f32, height: f32, depth: f32) -> Mesh {
    let h = Vec3::new(width, height, depth) * 0.5;
    let mut mesh = Mesh::default();

    // (normal axis, sign); the other two axes span the face.
    let faces = [(0, 1.0), (0, -1.0), (1, 1.0), (1, -1.0), (2, 1.0), (2, -1.0)];
    for (axis, sign) in faces {
        let (ua, va) = ((axis + 1) % 3, (axis + 2) % 3);
        let base = mesh.positions.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let mut p = Vec3::ZERO;
            p[axis] = sign * h[axis];
            p[ua] = su * h[ua];
            p[va] = sv * h[va];
            mesh.push(p);
        }
        mesh.triangles.push([base, base + 1, base + 2]);
        mesh.triangles.push([base, base + 2, base + 3]);
    }

    mesh
}

/// Flat annulus in the XY plane.
///
/// `theta_segments = 4` gives the square brackets used by the skills backdrop.
pub(super) fn ring(inner: f32, outer: f32, theta_segments: u32, phi_segments: u32) -> Mesh {
    let ts = theta_segments.max(3);
    let ps = phi_segments.max(1);
    let step = (outer - inner) / ps as f32;
    let mut mesh = Mesh::default();

    for j in 0..=ps {
        let r = inner + j as f32 * step;
        for i in 0..=ts {
            let a = i as f32 / ts as f32 * TAU;
            mesh.push(Vec3::new(r * a.cos(), r * a.sin(), 0.0));
        }
    }

    let row = ts + 1;
    for j in 0..ps {
        for i in 0..ts {
            let s = j * row + i;
            let (a, b, c, d) = (s, s + row, s + row + 1, s + 1);
            mesh.triangles.push([a, b, d]);
            mesh.triangles.push([b, c, d]);
        }
    }

    mesh
}

/// Single quad in the XY plane.
pub(super) fn plane(width: f32, height: f32) -> Mesh {
    let (hw, hh) = (width * 0.5, height * 0.5);
    Mesh {
        positions: vec![
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
        ],
        triangles: vec![[0, 1, 2], [0, 2, 3]],
        segments: vec![],
    }
}

/// Sawtooth gear outline extruded along Z, centered on the origin.
///
/// Each tooth rises from the root circle (`0.8 * radius`) to the tip at half pitch
/// and drops back to the root at the next tooth.
pub(super) fn gear(radius: f32, teeth: u32, depth: f32) -> Mesh {
    let teeth = teeth.max(3);
    let root = radius * 0.8;
    let at = |r: f32, turn: f32| {
        let a = turn * TAU;
        (r * a.cos(), r * a.sin())
    };

    let mut outline = vec![at(radius, 0.0)];
    for i in 0..teeth {
        outline.push(at(radius, (i as f32 + 0.5) / teeth as f32));
        if i + 1 < teeth {
            outline.push(at(root, (i + 1) as f32 / teeth as f32));
        }
    }
    // Closing root point coincides with angle zero.
    outline.push(at(root, 0.0));

    let n = outline.len() as u32;
    let z = depth * 0.5;
    let mut mesh = Mesh::default();

    let front_center = mesh.push(Vec3::new(0.0, 0.0, z));
    let back_center = mesh.push(Vec3::new(0.0, 0.0, -z));
    let front = mesh.positions.len() as u32;
    for &(x, y) in &outline {
        mesh.push(Vec3::new(x, y, z));
    }
    let back = mesh.positions.len() as u32;
    for &(x, y) in &outline {
        mesh.push(Vec3::new(x, y, -z));
    }

    for i in 0..n {
        let j = (i + 1) % n;
        // Caps fan out from the center; the outline is star-shaped around it.
        mesh.triangles.push([front_center, front + i, front + j]);
        mesh.triangles.push([back_center, back + j, back + i]);
        // Side wall.
        mesh.triangles.push([front + i, back + i, back + j]);
        mesh.triangles.push([front + i, back + j, front + j]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn box_has_24_vertices_and_12_triangles() {
        let m = cuboid(1.0, 1.0, 1.0);
        assert_eq!(m.vertex_count(), 24);
        assert_eq!(m.triangle_count(), 12);
        for p in &m.positions {
            assert_relative_eq!(p.abs().max_element(), 0.5);
        }
    }

    #[test]
    fn sphere_skips_degenerate_pole_triangles() {
        let m = sphere(1.0, 8, 6);
        assert_eq!(m.vertex_count(), 9 * 7);
        // Full quads split in two, minus one triangle per column at each pole.
        assert_eq!(m.triangle_count(), 8 * 6 * 2 - 2 * 8);
        for p in &m.positions {
            assert_relative_eq!(p.length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn torus_stays_within_outer_radius() {
        let m = torus(1.0, 0.4, 16, 100);
        assert_eq!(m.vertex_count(), 17 * 101);
        assert_eq!(m.triangle_count(), 16 * 100 * 2);
        assert!(m.positions.iter().all(|p| p.length() <= 1.4 + 1e-5));
    }

    #[test]
    fn square_ring_has_four_sides() {
        let m = ring(0.5, 0.8, 4, 1);
        assert_eq!(m.vertex_count(), 10);
        assert_eq!(m.triangle_count(), 8);
        assert!(m.positions.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn plane_is_a_quad() {
        let m = plane(2.0, 1.0);
        assert_eq!(m.triangle_count(), 2);
        for p in &m.positions {
            assert_relative_eq!(p.length(), (1.0f32 + 0.25).sqrt());
        }
    }

    #[test]
    fn gear_outline_alternates_tip_and_root() {
        let m = gear(1.0, 12, 0.1);
        // 2 centers + 2 * (1 start + 12 tips + 11 roots + 1 closing root).
        assert_eq!(m.vertex_count(), 2 + 2 * 25);
        assert_eq!(m.triangle_count(), 25 * 4);
        for p in &m.positions[2..] {
            let r = p.truncate().length();
            assert!((r - 1.0).abs() < 1e-5 || (r - 0.8).abs() < 1e-5);
            assert_relative_eq!(p.z.abs(), 0.05);
        }
    }
}
