//! Fixed per-section shape palettes (the theme seeds).

use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::shape::{FloatMotion, GeometryKind, Glyph, Material, ShapeDescriptor};

/// A page section that carries an animated backdrop.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Section {
    Hero,
    About,
    Projects,
    Skills,
}

/// Seed for the scattered skills brackets; fixed so remounts are identical.
const SKILLS_SEED: u64 = 0x5EED_0005;

impl Section {
    pub const ALL: [Section; 4] = [Section::Hero, Section::About, Section::Projects, Section::Skills];

    pub fn name(self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::About => "about",
            Section::Projects => "projects",
            Section::Skills => "skills",
        }
    }

    /// The section's shapes, in draw order. Same output on every call.
    pub fn palette(self) -> Vec<ShapeDescriptor> {
        match self {
            Section::Hero => hero(),
            Section::About => about(),
            Section::Projects => projects(),
            Section::Skills => skills(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|sec| sec.name().eq_ignore_ascii_case(s) || (s.eq_ignore_ascii_case("home") && *sec == Section::Hero))
            .ok_or_else(|| format!("unknown section `{s}` (expected hero, about, projects or skills)"))
    }
}

// ── palettes ──────────────────────────────────────────────────────────────

fn hero() -> Vec<ShapeDescriptor> {
    let float = FloatMotion::new(1.0, 0.12);
    vec![
        ShapeDescriptor::new(
            GeometryKind::Torus { radius: 1.0, tube: 0.4, radial_segments: 16, tubular_segments: 100 },
            Material::wire(0x64ffda, 0.6),
            Vec3::new(-4.0, 2.0, -5.0),
        )
        .spinning(Vec3::new(0.01, 0.02, 0.0))
        .floating(float),
        ShapeDescriptor::new(
            GeometryKind::Dodecahedron { radius: 1.2 },
            Material::wire(0xff6b9d, 0.5),
            Vec3::new(4.0, -1.0, -6.0),
        )
        .spinning(Vec3::new(0.015, 0.01, 0.02))
        .floating(float),
        ShapeDescriptor::new(
            GeometryKind::Octahedron { radius: 1.5 },
            Material::wire(0xffd700, 0.4),
            Vec3::new(0.0, 3.0, -8.0),
        )
        .spinning(Vec3::new(0.02, 0.015, 0.01))
        .floating(float),
        ShapeDescriptor::new(
            GeometryKind::Sphere { radius: 0.8, width_segments: 32, height_segments: 32 },
            Material::wire(0x9c88ff, 0.3),
            Vec3::new(-2.0, -2.0, -4.0),
        )
        .spinning(Vec3::new(0.01, 0.025, 0.015))
        .floating(float),
    ]
}

fn about() -> Vec<ShapeDescriptor> {
    let drift = FloatMotion::new(0.8, 0.15);
    let mut shapes = vec![
        ShapeDescriptor::new(
            GeometryKind::Helix { points: 200, radius: 1.0, rise: 0.05, angle_step: 0.1 },
            Material::wire(0x00ffaa, 0.6),
            Vec3::new(-6.0, 0.0, -8.0),
        )
        .spinning(Vec3::new(0.0, 0.02, 0.0))
        .floating(drift),
        ShapeDescriptor::new(
            GeometryKind::Sphere { radius: 1.2, width_segments: 16, height_segments: 16 },
            Material::wire(0xff6b35, 0.5),
            Vec3::new(5.0, 2.0, -6.0),
        )
        .spinning(Vec3::new(0.01, 0.015, 0.02))
        .floating(drift),
    ];

    // Connection nodes on a tilted loop.
    for i in 0..8 {
        let a = i as f32 / 8.0 * TAU;
        shapes.push(
            ShapeDescriptor::new(
                GeometryKind::Octahedron { radius: 0.3 },
                Material::solid(0x3b82f6, 0.7),
                Vec3::new(a.cos() * 3.0, (a * 0.5).sin() * 2.0, a.sin() * 3.0 - 5.0),
            )
            .spinning(Vec3::new(0.02, 0.01, 0.015))
            .floating(FloatMotion::new(1.0, 0.5)),
        );
    }

    for (i, symbol) in Glyph::ALL.into_iter().enumerate() {
        let i = i as f32;
        shapes.push(
            ShapeDescriptor::new(
                GeometryKind::Glyph { symbol, size: 0.5 },
                Material::wire(0x8b5cf6, 0.6),
                Vec3::new((i - 1.5) * 2.0, i.sin() * 3.0 + 1.0, -4.0),
            )
            .spinning(Vec3::new(0.0, 0.03, 0.02))
            .floating(drift),
        );
    }

    shapes
}

fn projects() -> Vec<ShapeDescriptor> {
    let float = FloatMotion::new(0.8, 0.22);
    vec![
        ShapeDescriptor::new(
            GeometryKind::Box { width: 1.0, height: 1.0, depth: 1.0 },
            Material::wire(0x00ff88, 0.4),
            Vec3::new(-5.0, 1.0, -6.0),
        )
        .spinning(Vec3::new(0.015, 0.02, 0.01))
        .floating(float),
        ShapeDescriptor::new(
            GeometryKind::Tetrahedron { radius: 1.2 },
            Material::wire(0xff4081, 0.5),
            Vec3::new(5.0, -1.5, -7.0),
        )
        .spinning(Vec3::new(0.02, 0.015, 0.025))
        .floating(float),
        ShapeDescriptor::new(
            GeometryKind::Icosahedron { radius: 1.0 },
            Material::wire(0x3f51b5, 0.6),
            Vec3::new(0.0, 2.5, -5.0),
        )
        .spinning(Vec3::new(0.01, 0.03, 0.02))
        .floating(float),
        ShapeDescriptor::new(
            GeometryKind::Ring { inner_radius: 0.8, outer_radius: 1.2, theta_segments: 16, phi_segments: 1 },
            Material::wire(0xffeb3b, 0.4),
            Vec3::new(-2.0, -2.0, -4.0),
        )
        .spinning(Vec3::new(0.025, 0.01, 0.02))
        .floating(float),
    ]
}

fn skills() -> Vec<ShapeDescriptor> {
    let gear = |radius: f32, teeth: u32, color: u32, at: Vec3, spin: f32| {
        ShapeDescriptor::new(
            GeometryKind::Gear { radius, teeth, depth: 0.1 },
            Material::wire(color, 0.3),
            at,
        )
        .spinning(Vec3::new(0.0, 0.0, spin))
    };

    let mut shapes = vec![
        gear(1.0, 12, 0x3b82f6, Vec3::new(-5.0, 2.0, -6.0), 0.02),
        gear(0.8, 10, 0x8b5cf6, Vec3::new(5.0, -1.0, -7.0), -0.025),
        gear(1.2, 14, 0x06b6d4, Vec3::new(0.0, 0.0, -5.0), 0.015),
    ];

    let mut rng = StdRng::seed_from_u64(SKILLS_SEED);
    for _ in 0..6 {
        let position = Vec3::new(
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-3.0..3.0),
            rng.gen_range(-8.0..-4.0),
        );
        let rotation = Vec3::new(
            rng.gen_range(0.0..PI),
            rng.gen_range(0.0..PI),
            rng.gen_range(0.0..PI),
        );
        let spin = Vec3::new(
            rng.gen_range(-0.01..0.01),
            rng.gen_range(-0.01..0.01),
            rng.gen_range(-0.01..0.01),
        );

        shapes.push(
            ShapeDescriptor::new(
                GeometryKind::Ring { inner_radius: 0.5, outer_radius: 0.8, theta_segments: 4, phi_segments: 1 },
                Material::solid(0x10b981, 0.4),
                position,
            )
            .rotated(rotation)
            .spinning(spin)
            .floating(FloatMotion::new(1.0, 0.18)),
        );
    }

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_are_deterministic() {
        for section in Section::ALL {
            assert_eq!(section.palette(), section.palette(), "{section}");
        }
    }

    #[test]
    fn palette_sizes() {
        assert_eq!(Section::Hero.palette().len(), 4);
        assert_eq!(Section::About.palette().len(), 14);
        assert_eq!(Section::Projects.palette().len(), 4);
        assert_eq!(Section::Skills.palette().len(), 9);
    }

    #[test]
    fn amplitudes_and_opacities_in_range() {
        for section in Section::ALL {
            for shape in section.palette() {
                assert!((0.0..=0.5).contains(&shape.float.amplitude));
                assert!((0.0..=1.0).contains(&shape.material.opacity));
                assert!(shape.angular_velocity.abs().max_element() <= 0.03);
            }
        }
    }

    #[test]
    fn skills_brackets_scatter_inside_their_box() {
        let brackets: Vec<_> = Section::Skills
            .palette()
            .into_iter()
            .filter(|s| matches!(s.kind, GeometryKind::Ring { .. }))
            .collect();
        assert_eq!(brackets.len(), 6);
        for b in brackets {
            assert!((-5.0..5.0).contains(&b.position.x));
            assert!((-3.0..3.0).contains(&b.position.y));
            assert!((-8.0..-4.0).contains(&b.position.z));
            assert!(b.rotation.min_element() >= 0.0 && b.rotation.max_element() < PI);
        }
    }

    #[test]
    fn gears_do_not_float() {
        for shape in Section::Skills.palette() {
            if matches!(shape.kind, GeometryKind::Gear { .. }) {
                assert_eq!(shape.float, FloatMotion::NONE);
            }
        }
    }

    #[test]
    fn parses_section_names() {
        assert_eq!("About".parse::<Section>(), Ok(Section::About));
        assert_eq!("home".parse::<Section>(), Ok(Section::Hero));
        assert!("contact".parse::<Section>().is_err());
    }
}
