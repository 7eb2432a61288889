//! Procedural geometry for backdrop shapes.
//!
//! Every generator returns a [`Mesh`]: positions plus triangles and/or explicit
//! line segments. Wireframe rendering uses [`Mesh::wireframe_segments`].

mod paths;
mod polyhedra;
mod primitives;

use std::collections::HashSet;

use glam::Vec3;

use crate::shape::GeometryKind;

/// Indexed CPU mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    /// Line segments that are not triangle edges (paths, outlines).
    pub segments: Vec<[u32; 2]>,
}

impl Mesh {
    /// Builds the mesh for a geometry kind.
    pub fn build(kind: &GeometryKind) -> Mesh {
        match *kind {
            GeometryKind::Torus { radius, tube, radial_segments, tubular_segments } => {
                primitives::torus(radius, tube, radial_segments, tubular_segments)
            }
            GeometryKind::Sphere { radius, width_segments, height_segments } => {
                primitives::sphere(radius, width_segments, height_segments)
            }
            GeometryKind::Tetrahedron { radius } => polyhedra::tetrahedron(radius),
            GeometryKind::Octahedron { radius } => polyhedra::octahedron(radius),
            GeometryKind::Dodecahedron { radius } => polyhedra::dodecahedron(radius),
            GeometryKind::Icosahedron { radius } => polyhedra::icosahedron(radius),
            GeometryKind::Box { width, height, depth } => primitives::cuboid(width, height, depth),
            GeometryKind::Ring { inner_radius, outer_radius, theta_segments, phi_segments } => {
                primitives::ring(inner_radius, outer_radius, theta_segments, phi_segments)
            }
            GeometryKind::Plane { width, height } => primitives::plane(width, height),
            GeometryKind::Helix { points, radius, rise, angle_step } => {
                paths::double_helix(points, radius, rise, angle_step)
            }
            GeometryKind::Gear { radius, teeth, depth } => primitives::gear(radius, teeth, depth),
            GeometryKind::Glyph { symbol, size } => paths::glyph(symbol, size),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Explicit segments followed by every distinct triangle edge.
    ///
    /// Edges are deduplicated by endpoint index regardless of direction, and
    /// degenerate edges (both ends on the same index) are skipped.
    pub fn wireframe_segments(&self) -> Vec<[u32; 2]> {
        let mut seen: HashSet<(u32, u32)> = HashSet::new();
        let mut out = Vec::with_capacity(self.segments.len() + self.triangles.len() * 2);

        let edges = self
            .segments
            .iter()
            .copied()
            .chain(self.triangles.iter().flat_map(|&[a, b, c]| [[a, b], [b, c], [c, a]]));

        for [a, b] in edges {
            if a == b {
                continue;
            }
            let key = (a.min(b), a.max(b));
            if seen.insert(key) {
                out.push([a, b]);
            }
        }

        out
    }

    /// Flat index list for line rendering.
    pub fn line_indices(&self) -> Vec<u32> {
        self.wireframe_segments().into_iter().flatten().collect()
    }

    /// Flat index list for filled rendering.
    pub fn triangle_indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Positions as plain arrays for GPU upload.
    pub fn position_arrays(&self) -> Vec<[f32; 3]> {
        self.positions.iter().map(|p| p.to_array()).collect()
    }

    fn push(&mut self, p: Vec3) -> u32 {
        self.positions.push(p);
        (self.positions.len() - 1) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Glyph;

    fn quad() -> Mesh {
        Mesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
            segments: vec![],
        }
    }

    #[test]
    fn shared_triangle_edge_is_emitted_once() {
        // 2 triangles, 6 edges, diagonal shared.
        assert_eq!(quad().wireframe_segments().len(), 5);
    }

    #[test]
    fn explicit_segments_come_first_and_dedupe_against_edges() {
        let mut m = quad();
        m.segments.push([2, 0]);
        let segs = m.wireframe_segments();
        assert_eq!(segs[0], [2, 0]);
        assert_eq!(segs.len(), 5);
    }

    #[test]
    fn degenerate_segments_are_dropped() {
        let mut m = quad();
        m.segments.push([1, 1]);
        assert_eq!(m.wireframe_segments().len(), 5);
    }

    #[test]
    fn every_kind_builds_valid_indices() {
        let kinds = [
            GeometryKind::Torus { radius: 1.0, tube: 0.4, radial_segments: 16, tubular_segments: 100 },
            GeometryKind::Sphere { radius: 0.8, width_segments: 32, height_segments: 32 },
            GeometryKind::Tetrahedron { radius: 1.2 },
            GeometryKind::Octahedron { radius: 1.5 },
            GeometryKind::Dodecahedron { radius: 1.2 },
            GeometryKind::Icosahedron { radius: 1.0 },
            GeometryKind::Box { width: 1.0, height: 1.0, depth: 1.0 },
            GeometryKind::Ring { inner_radius: 0.8, outer_radius: 1.2, theta_segments: 16, phi_segments: 1 },
            GeometryKind::Plane { width: 2.0, height: 1.0 },
            GeometryKind::Helix { points: 200, radius: 1.0, rise: 0.05, angle_step: 0.1 },
            GeometryKind::Gear { radius: 1.0, teeth: 12, depth: 0.2 },
            GeometryKind::Glyph { symbol: Glyph::Brace, size: 0.5 },
        ];

        for kind in &kinds {
            let mesh = Mesh::build(kind);
            let n = mesh.vertex_count() as u32;
            assert!(n > 0, "{} has no vertices", kind.name());
            assert!(!mesh.line_indices().is_empty(), "{} has no edges", kind.name());
            assert!(
                mesh.line_indices().iter().chain(mesh.triangle_indices().iter()).all(|&i| i < n),
                "{} has an out-of-range index",
                kind.name()
            );
            assert!(mesh.positions.iter().all(|p| p.is_finite()), "{} has NaN", kind.name());
        }
    }
}
