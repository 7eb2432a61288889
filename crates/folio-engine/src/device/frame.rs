use crate::paint::Color;
use crate::render::RenderTarget;

/// One acquired swapchain texture and the encoder recording into it.
///
/// Holding the texture blocks acquisition of the next one, so a frame is
/// presented within the redraw that acquired it.
pub struct GpuFrame {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

impl GpuFrame {
    pub(crate) fn new(device: &wgpu::Device, texture: wgpu::SurfaceTexture) -> Self {
        let view = texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("folio frame encoder"),
        });
        Self { texture, view, encoder }
    }

    /// Physical size of the acquired texture.
    #[inline]
    pub fn extent(&self) -> (u32, u32) {
        let size = self.texture.texture.size();
        (size.width, size.height)
    }

    /// Records a pass that fills the whole frame with `color`.
    pub fn clear(&mut self, color: Color) {
        let _pass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("folio clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    /// Target for renderers recording after the clear.
    pub fn target(&mut self) -> RenderTarget<'_> {
        let extent = self.extent();
        RenderTarget::new(&mut self.encoder, &self.view, extent)
    }

    pub(crate) fn present(self, queue: &wgpu::Queue) {
        let Self { texture, view, encoder } = self;
        queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        texture.present();
    }
}
