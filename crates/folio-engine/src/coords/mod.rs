//! Screen-space types shared by the runtime, renderers and hosts.
//!
//! Canonical screen space:
//! - physical pixels (framebuffer texels)
//! - origin top-left
//! - +X right, +Y down
//!
//! World-space math (3-D positions, rotations, matrices) uses `glam` directly.

mod rect;
mod viewport;

pub use rect::Rect;
pub use viewport::Viewport;
