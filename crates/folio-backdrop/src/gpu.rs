//! wgpu-backed drawing contexts.

use anyhow::ensure;
use folio_engine::coords::{Rect, Viewport};
use folio_engine::paint::Color;
use folio_engine::render::{GpuMesh, MeshData, MeshInstance, MeshRenderer, RenderTarget, Topology};

use crate::context::{DrawBatch, DrawContext, SurfaceHost};
use crate::geometry::Mesh;
use crate::shape::{Material, ShapeDescriptor};

/// Hands out one [`GpuDrawContext`] per mount, all sharing the window's device.
pub struct GpuSurfaceHost {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
}

impl GpuSurfaceHost {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        Self { device: device.clone(), queue: queue.clone(), format }
    }
}

impl SurfaceHost for GpuSurfaceHost {
    type Context = GpuDrawContext;

    fn acquire(&mut self, region: Rect) -> anyhow::Result<GpuDrawContext> {
        ensure!(!region.is_empty(), "backdrop region {region:?} has no area");
        ensure!(region.is_finite(), "backdrop region {region:?} is not finite");

        Ok(GpuDrawContext {
            renderer: MeshRenderer::new(&self.device, &self.queue, self.format),
            viewport: Viewport::default(),
        })
    }
}

/// Shape uploaded for one mount.
#[derive(Debug)]
pub struct GpuShape {
    mesh: GpuMesh,
    color: Color,
}

/// Mesh renderer owned by a single mount.
pub struct GpuDrawContext {
    renderer: MeshRenderer,
    viewport: Viewport,
}

impl DrawContext for GpuDrawContext {
    type Handle = GpuShape;
    type Frame<'f> = RenderTarget<'f>;

    fn allocate(&mut self, shape: &ShapeDescriptor, mesh: &Mesh) -> GpuShape {
        let positions = mesh.position_arrays();
        let (topology, indices) = indices_for(&shape.material, mesh);

        let mesh = self.renderer.upload(MeshData {
            positions: &positions,
            indices: &indices,
            topology,
        });
        let color = Color::from_hex(shape.material.color, shape.material.opacity);

        GpuShape { mesh, color }
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn draw(&mut self, frame: &mut RenderTarget<'_>, batch: DrawBatch<'_, GpuShape>) -> anyhow::Result<()> {
        if !self.viewport.is_valid() {
            return Ok(());
        }

        let instances: Vec<MeshInstance<'_>> = batch
            .items
            .iter()
            .map(|item| MeshInstance {
                mesh: &item.handle.mesh,
                model: item.model,
                color: item.handle.color,
            })
            .collect();

        self.renderer.render(frame, batch.region, batch.view_proj, &instances);
        Ok(())
    }

    fn release(&mut self, handle: GpuShape) {
        handle.mesh.destroy();
    }

    fn detach(mut self) {
        self.renderer.release();
    }
}

/// Wireframe materials and meshes without faces draw as lines.
fn indices_for(material: &Material, mesh: &Mesh) -> (Topology, Vec<u32>) {
    if material.wireframe || mesh.triangle_count() == 0 {
        (Topology::Lines, mesh.line_indices())
    } else {
        (Topology::Triangles, mesh.triangle_indices())
    }
}
