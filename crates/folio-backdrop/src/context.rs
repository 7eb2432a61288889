//! Drawing capabilities injected into render loops.

use glam::Mat4;

use folio_engine::coords::{Rect, Viewport};

use crate::geometry::Mesh;
use crate::shape::ShapeDescriptor;

/// One object to draw: a renderable handle and its model transform.
#[derive(Debug)]
pub struct DrawItem<'a, H> {
    pub handle: &'a H,
    pub model: Mat4,
}

/// Everything one tick draws, in order.
#[derive(Debug)]
pub struct DrawBatch<'a, H> {
    /// Screen region (physical px) the projection is laid out over.
    pub region: Rect,
    pub view_proj: Mat4,
    pub items: Vec<DrawItem<'a, H>>,
}

/// Graphics context owned by one render loop for the duration of one mount.
///
/// Every handle returned by `allocate` must go back through `release` before
/// `detach`; the render loop guarantees this ordering.
pub trait DrawContext {
    /// Renderable owned by an animated object.
    type Handle;

    /// Host frame target a draw records into.
    type Frame<'f>;

    /// Creates the GPU-side resources for one shape.
    fn allocate(&mut self, shape: &ShapeDescriptor, mesh: &Mesh) -> Self::Handle;

    /// Latest host viewport size.
    fn set_viewport(&mut self, viewport: Viewport);

    fn draw(&mut self, frame: &mut Self::Frame<'_>, batch: DrawBatch<'_, Self::Handle>) -> anyhow::Result<()>;

    fn release(&mut self, handle: Self::Handle);

    /// Detaches from the surface and frees the context's own resources.
    fn detach(self);
}

/// Hands out drawing contexts bound to a screen region.
///
/// Every call returns a fresh context; contexts are never reused across mounts.
pub trait SurfaceHost {
    type Context: DrawContext;

    fn acquire(&mut self, region: Rect) -> anyhow::Result<Self::Context>;
}
