//! Color model shared between scene configuration and renderers.
//!
//! All colors handed to the GPU are linear-blend premultiplied RGBA.

pub mod color;

pub use color::Color;
