use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::{self, WindowSurface};
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// GPU state for one window: adapter, device, queue and the configured surface.
///
/// `Device` and `Queue` are reference-counted handles; backdrop contexts clone them
/// so each mount owns its own GPU resources while sharing the device.
pub struct Gpu<'w> {
    /// Bound to the window, which must outlive this value.
    surface: WindowSurface<'w>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl<'w> Gpu<'w> {
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let raw_surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = request_adapter(&instance, &raw_surface, &init).await?;
        let info = adapter.get_info();
        log::info!("gpu adapter: {} ({:?}, {:?})", info.name, info.backend, info.device_type);

        let (device, queue) = adapter
            .request_device(&init.device_descriptor())
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = raw_surface.get_capabilities(&adapter);
        let config = surface::surface_config(&caps, size, &init).context("no supported surface formats")?;
        let surface = WindowSurface::configure(raw_surface, &device, config);

        Ok(Self { surface, adapter, device, queue })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface.format()
    }

    /// Configured surface size in physical pixels.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.surface.size()
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.surface.resize(&self.device, size);
    }

    /// Acquires the next surface texture with a fresh encoder.
    ///
    /// Lost and outdated surfaces are reconfigured before the error is returned.
    pub fn acquire_frame(&self) -> std::result::Result<GpuFrame, SurfaceErrorAction> {
        match self.surface.texture() {
            Ok(texture) => Ok(GpuFrame::new(&self.device, texture)),
            Err(err) => {
                let action = self.surface.recover(&self.device, &err);
                log::debug!("surface error {err} resolved as {action:?}");
                Err(action)
            }
        }
    }

    /// Submits the recorded commands and presents the frame.
    pub fn present(&self, frame: GpuFrame) {
        frame.present(&self.queue);
    }
}

async fn request_adapter(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
    init: &GpuInit,
) -> Result<wgpu::Adapter> {
    match instance.request_adapter(&init.adapter_options(surface, false)).await {
        Ok(adapter) => Ok(adapter),
        Err(err) if init.allow_fallback_adapter => {
            log::warn!("no hardware adapter ({err}), trying the fallback adapter");
            instance
                .request_adapter(&init.adapter_options(surface, true))
                .await
                .context("failed to find a fallback GPU adapter")
        }
        Err(err) => Err(err).context("failed to find a suitable GPU adapter"),
    }
}
