use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "folio".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Requests an app can make from inside `on_frame`.
///
/// Applied after the callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit: bool,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit
    }
}

/// Single-window runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and drives `app` until the window closes.
    ///
    /// A window or GPU setup failure ends the loop and is returned here.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut host = Host {
            config,
            gpu_init,
            app,
            window: None,
            failure: None,
        };

        event_loop
            .run_app(&mut host)
            .context("winit event loop terminated with error")?;

        host.failure.map_or(Ok(()), Err)
    }
}

#[self_referencing]
struct OpenWindow {
    clock: FrameClock,

    /// Cleared while the compositor reports the window fully occluded.
    visible: bool,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct Host<A: App> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<OpenWindow>,
    failure: Option<anyhow::Error>,
}

impl<A: App> Host<A> {
    fn open_window(&self, event_loop: &ActiveEventLoop) -> Result<OpenWindow> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        OpenWindowTryBuilder {
            clock: FrameClock::default(),
            visible: true,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.take().is_some() {
            log::debug!("window closed");
        }
        event_loop.exit();
    }

    /// Runs one `on_frame` unless the window is minimized.
    fn redraw(&mut self, window_id: WindowId) -> AppControl {
        let (app, Some(open)) = (&mut self.app, self.window.as_mut()) else {
            return AppControl::Continue;
        };

        let mut runtime = RuntimeCtx::default();
        let control = open.with_mut(|fields| {
            let size = fields.window.inner_size();
            if size.width == 0 || size.height == 0 {
                return AppControl::Continue;
            }

            let mut ctx = FrameCtx {
                window: WindowCtx { id: window_id, window: fields.window },
                gpu: fields.gpu,
                time: fields.clock.tick(),
                runtime: &mut runtime,
            };
            app.on_frame(&mut ctx)
        });

        if runtime.exit_requested() { AppControl::Exit } else { control }
    }
}

impl<A: App> ApplicationHandler for Host<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match self.open_window(event_loop) {
            Ok(open) => {
                log::debug!("window {:?} opened", open.borrow_window().id());
                open.borrow_window().request_redraw();
                self.window = Some(open);
            }
            Err(err) => {
                log::error!("failed to open window: {err:#}");
                self.failure = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Backdrops animate continuously while anything of the window is visible.
        if let Some(open) = &self.window {
            if *open.borrow_visible() {
                open.borrow_window().request_redraw();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(open) = self.window.as_mut() else {
            return;
        };
        if open.borrow_window().id() != window_id {
            return;
        }

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.close(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => self.close(event_loop),

            WindowEvent::Resized(size) => {
                open.with_gpu_mut(|gpu| gpu.resize(size));
                open.borrow_window().request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = open.borrow_window().inner_size();
                open.with_gpu_mut(|gpu| gpu.resize(size));
            }

            WindowEvent::Occluded(occluded) => {
                open.with_visible_mut(|visible| *visible = !occluded);
                log::debug!("window {}", if occluded { "occluded, pausing" } else { "visible again" });
                if !occluded {
                    open.borrow_window().request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                if self.redraw(window_id) == AppControl::Exit {
                    self.close(event_loop);
                }
            }

            _ => {}
        }
    }
}
