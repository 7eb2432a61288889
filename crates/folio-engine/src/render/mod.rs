//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and record into a
//! caller-provided [`RenderTarget`].
//!
//! Convention:
//! - geometry is in world units; callers supply a view-projection matrix
//! - a draw is confined to a screen region (physical px), cropped to the framebuffer

mod common;
mod mesh;
mod target;

pub use common::{clip_region, region_crop, scissor_rect};
pub use mesh::{GpuMesh, MeshData, MeshInstance, MeshRenderer, Topology};
pub use target::RenderTarget;
