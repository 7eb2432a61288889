//! Static shape configuration.

use glam::Vec3;

/// Geometry of a backdrop shape. Sizes are in world units.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryKind {
    Torus { radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32 },
    Sphere { radius: f32, width_segments: u32, height_segments: u32 },
    Tetrahedron { radius: f32 },
    Octahedron { radius: f32 },
    Dodecahedron { radius: f32 },
    Icosahedron { radius: f32 },
    Box { width: f32, height: f32, depth: f32 },
    /// Flat annulus in the XY plane.
    Ring { inner_radius: f32, outer_radius: f32, theta_segments: u32, phi_segments: u32 },
    Plane { width: f32, height: f32 },
    /// Double-helix line path climbing +Y.
    Helix { points: u32, radius: f32, rise: f32, angle_step: f32 },
    /// Toothed outline extruded along Z.
    Gear { radius: f32, teeth: u32, depth: f32 },
    /// Code-symbol line path such as `<>` or `{}`.
    Glyph { symbol: Glyph, size: f32 },
}

impl GeometryKind {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Torus { .. } => "torus",
            GeometryKind::Sphere { .. } => "sphere",
            GeometryKind::Tetrahedron { .. } => "tetrahedron",
            GeometryKind::Octahedron { .. } => "octahedron",
            GeometryKind::Dodecahedron { .. } => "dodecahedron",
            GeometryKind::Icosahedron { .. } => "icosahedron",
            GeometryKind::Box { .. } => "box",
            GeometryKind::Ring { .. } => "ring",
            GeometryKind::Plane { .. } => "plane",
            GeometryKind::Helix { .. } => "helix",
            GeometryKind::Gear { .. } => "gear",
            GeometryKind::Glyph { .. } => "glyph",
        }
    }
}

/// Code symbols drawn by `GeometryKind::Glyph`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Glyph {
    Angle,
    Brace,
    Bracket,
    Paren,
}

impl Glyph {
    pub const ALL: [Glyph; 4] = [Glyph::Angle, Glyph::Brace, Glyph::Bracket, Glyph::Paren];

    pub fn as_str(self) -> &'static str {
        match self {
            Glyph::Angle => "<>",
            Glyph::Brace => "{}",
            Glyph::Bracket => "[]",
            Glyph::Paren => "()",
        }
    }
}

/// Surface appearance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    /// sRGB `0xRRGGBB`.
    pub color: u32,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Draw edges only. Line-path geometries are always drawn as lines.
    pub wireframe: bool,
}

impl Material {
    #[inline]
    pub const fn wire(color: u32, opacity: f32) -> Self {
        Self { color, opacity, wireframe: true }
    }

    #[inline]
    pub const fn solid(color: u32, opacity: f32) -> Self {
        Self { color, opacity, wireframe: false }
    }
}

/// Vertical bobbing: `y = base_y + sin(t * frequency + base_x) * amplitude`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FloatMotion {
    /// Radians per second.
    pub frequency: f32,
    /// World units, non-negative.
    pub amplitude: f32,
}

impl FloatMotion {
    pub const NONE: FloatMotion = FloatMotion { frequency: 0.0, amplitude: 0.0 };

    #[inline]
    pub const fn new(frequency: f32, amplitude: f32) -> Self {
        Self { frequency, amplitude }
    }
}

/// Immutable description of one backdrop shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDescriptor {
    pub kind: GeometryKind,
    pub material: Material,
    /// Base position.
    pub position: Vec3,
    /// Initial Euler XYZ rotation, radians.
    pub rotation: Vec3,
    /// Rotation added every tick, radians.
    pub angular_velocity: Vec3,
    pub float: FloatMotion,
}

impl ShapeDescriptor {
    pub fn new(kind: GeometryKind, material: Material, position: Vec3) -> Self {
        Self {
            kind,
            material,
            position,
            rotation: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            float: FloatMotion::NONE,
        }
    }

    pub fn spinning(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn floating(mut self, float: FloatMotion) -> Self {
        self.float = float;
        self
    }
}
