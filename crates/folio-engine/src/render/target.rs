/// Encoder and color view of the frame being recorded, with its size in physical pixels.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub extent: (u32, u32),
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView, extent: (u32, u32)) -> Self {
        Self { encoder, color_view, extent }
    }
}
