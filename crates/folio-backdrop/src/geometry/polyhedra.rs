//! Platonic solids scaled to a circumradius.
//!
//! Faces are derived from the vertex sets instead of hand-written index tables:
//! triangular faces are the vertex triples at minimum edge length, and the
//! dodecahedron's pentagons are the five vertices nearest each dual direction.

use std::f32::consts::TAU;

use glam::Vec3;

use super::Mesh;

const PHI: f32 = 1.618_034;

pub(super) fn tetrahedron(radius: f32) -> Mesh {
    let corners = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ];
    triangulated(&corners, radius)
}

pub(super) fn octahedron(radius: f32) -> Mesh {
    let corners = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
    triangulated(&corners, radius)
}

pub(super) fn icosahedron(radius: f32) -> Mesh {
    triangulated(&cyclic(1.0, PHI), radius)
}

pub(super) fn dodecahedron(radius: f32) -> Mesh {
    let r = 1.0 / PHI;

    let mut corners = Vec::with_capacity(20);
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                corners.push(Vec3::new(x, y, z));
            }
        }
    }
    corners.extend(cyclic(r, PHI));

    let mut mesh = Mesh::default();
    for &c in &corners {
        mesh.push(c.normalize() * radius);
    }

    // Face centers of this dodecahedron point at the dual icosahedron's vertices.
    for dir in cyclic(PHI, 1.0) {
        let n = dir.normalize();

        let mut by_height: Vec<u32> = (0..mesh.positions.len() as u32).collect();
        by_height.sort_by(|&a, &b| {
            let da = mesh.positions[a as usize].dot(n);
            let db = mesh.positions[b as usize].dot(n);
            db.total_cmp(&da)
        });

        let face = order_around(&mesh.positions, &by_height[..5], n);
        for k in 1..face.len() - 1 {
            mesh.triangles.push([face[0], face[k], face[k + 1]]);
        }
    }

    mesh
}

// ── private helpers ────────────────────────────────────────────────────────

/// `(0, ±a, ±b)` and its two cyclic permutations, 12 points.
fn cyclic(a: f32, b: f32) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(12);
    for sa in [-1.0, 1.0] {
        for sb in [-1.0, 1.0] {
            out.push(Vec3::new(0.0, sa * a, sb * b));
            out.push(Vec3::new(sa * a, sb * b, 0.0));
            out.push(Vec3::new(sb * b, 0.0, sa * a));
        }
    }
    out
}

/// Projects corners onto the sphere and emits every equilateral triple of
/// nearest neighbours as a face.
fn triangulated(corners: &[Vec3], radius: f32) -> Mesh {
    let mut mesh = Mesh::default();
    for &c in corners {
        mesh.push(c.normalize() * radius);
    }

    let p = &mesh.positions;
    let n = p.len();

    let mut edge = f32::INFINITY;
    for i in 0..n {
        for j in i + 1..n {
            edge = edge.min(p[i].distance(p[j]));
        }
    }

    let eps = edge * 1e-3;
    let adjacent = |i: usize, j: usize| (p[i].distance(p[j]) - edge).abs() < eps;

    let mut triangles = Vec::new();
    for i in 0..n {
        for j in i + 1..n {
            if !adjacent(i, j) {
                continue;
            }
            for k in j + 1..n {
                if adjacent(i, k) && adjacent(j, k) {
                    triangles.push([i as u32, j as u32, k as u32]);
                }
            }
        }
    }

    mesh.triangles = triangles;
    mesh
}

/// Sorts face vertices by angle around the face normal `n`.
fn order_around(positions: &[Vec3], face: &[u32], n: Vec3) -> Vec<u32> {
    let center = face.iter().map(|&i| positions[i as usize]).sum::<Vec3>() / face.len() as f32;
    let u = n.any_orthonormal_vector();
    let w = n.cross(u);

    let angle = |i: u32| {
        let d = positions[i as usize] - center;
        d.dot(w).atan2(d.dot(u)).rem_euclid(TAU)
    };

    let mut out = face.to_vec();
    out.sort_by(|&a, &b| angle(a).total_cmp(&angle(b)));
    out
}
