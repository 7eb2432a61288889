/// GPU setup for a backdrop window.
///
/// The defaults target the weakest hardware that can still show the page:
/// low-power adapter, downlevel limits and no optional features.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power_preference: wgpu::PowerPreference,

    /// Retry with a software adapter when no hardware adapter fits.
    pub allow_fallback_adapter: bool,

    /// Palette colors are sRGB hex values; an sRGB surface keeps them exact.
    pub prefer_srgb: bool,

    /// FIFO paces the backdrops to the display refresh.
    pub present_mode: wgpu::PresentMode,

    /// Used when supported by the surface, otherwise its first mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    pub(crate) fn adapter_options<'a, 'w>(
        &self,
        surface: &'a wgpu::Surface<'w>,
        force_fallback: bool,
    ) -> wgpu::RequestAdapterOptions<'a, 'w> {
        wgpu::RequestAdapterOptions {
            power_preference: self.power_preference,
            compatible_surface: Some(surface),
            force_fallback_adapter: force_fallback,
        }
    }

    pub(crate) fn device_descriptor(&self) -> wgpu::DeviceDescriptor<'static> {
        wgpu::DeviceDescriptor {
            label: Some("folio device"),
            required_features: self.required_features,
            required_limits: self.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::Off,
        }
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::LowPower,
            allow_fallback_adapter: true,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}
