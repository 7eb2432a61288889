//! Studio application: mounts the backdrop of every visible section.

use folio_backdrop::context::{DrawContext, SurfaceHost};
use folio_backdrop::gpu::{GpuDrawContext, GpuSurfaceHost};
use folio_backdrop::schedule::FrameQueue;
use folio_backdrop::viewport::{ViewportProvider, WindowViewport};
use folio_backdrop::{LoopCtx, LoopState, RenderLoop};
use folio_engine::coords::Viewport;
use folio_engine::core::{App, AppControl, FrameCtx};
use folio_engine::paint::Color;

use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use crate::page::{Block, Page};

/// Page background shown behind (and instead of) the backdrops.
const BACKGROUND: u32 = 0x0a192f;

/// Pixels scrolled per wheel line.
const LINE_HEIGHT: f32 = 60.0;

struct Backdrop<C: DrawContext> {
    index: usize,
    render_loop: RenderLoop<C>,
}

/// One render loop per backdrop block; blocks without a backdrop get none.
fn backdrops<C: DrawContext>(page: &Page) -> Vec<Backdrop<C>> {
    page.blocks()
        .iter()
        .enumerate()
        .filter_map(|(index, block)| match *block {
            Block::Backdrop(section) => Some(Backdrop { index, render_loop: RenderLoop::new(section) }),
            Block::Contact => None,
        })
        .collect()
}

pub struct Studio {
    page: Page,
    backdrops: Vec<Backdrop<GpuDrawContext>>,
    viewport: WindowViewport,
    frames: FrameQueue,
    host: Option<GpuSurfaceHost>,
}

impl Studio {
    pub fn new(page: Page) -> Self {
        Self {
            backdrops: backdrops(&page),
            page,
            viewport: WindowViewport::default(),
            frames: FrameQueue::new(),
            host: None,
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        self.page.set_viewport(viewport);
        for id in self.viewport.resize(viewport) {
            for b in &mut self.backdrops {
                if b.render_loop.listener() == Some(id) {
                    b.render_loop.on_resize(viewport);
                }
            }
        }
    }

    fn unmount_all(&mut self) {
        for b in &mut self.backdrops {
            b.render_loop.unmount(&mut self.viewport, &mut self.frames);
        }
    }

    fn on_key(&mut self, key: &Key) -> AppControl {
        let current = self.page.current();
        match key {
            Key::Named(NamedKey::Escape) => {
                self.unmount_all();
                return AppControl::Exit;
            }
            Key::Named(NamedKey::PageDown | NamedKey::ArrowDown) => self.page.scroll_to(current + 1),
            Key::Named(NamedKey::PageUp | NamedKey::ArrowUp) => self.page.scroll_to(current.saturating_sub(1)),
            Key::Named(NamedKey::Home) => self.page.scroll_to(0),
            Key::Named(NamedKey::End) => self.page.scroll_to(self.page.blocks().len()),
            _ => {}
        }
        AppControl::Continue
    }
}

/// Mounts backdrops that scrolled into view and unmounts the ones that left it.
fn sync_mounts<C, H>(
    page: &Page,
    backdrops: &mut [Backdrop<C>],
    host: &mut H,
    viewport: &mut WindowViewport,
    frames: &mut FrameQueue,
) where
    C: DrawContext,
    H: SurfaceHost<Context = C>,
{
    for b in backdrops {
        let region = page.region(b.index);
        if !page.is_visible(b.index) {
            b.render_loop.unmount(viewport, frames);
            continue;
        }
        match b.render_loop.state() {
            LoopState::Mounted => b.render_loop.set_region(region),
            LoopState::Fallback => {}
            LoopState::Unmounted => {
                let ctx = LoopCtx {
                    surfaces: &mut *host,
                    viewport: &mut *viewport,
                    frames: &mut *frames,
                };
                let outcome = b.render_loop.mount(region, ctx);
                log::trace!("{} mount: {outcome:?}", b.render_loop.label());
            }
        }
    }
}

/// Hands every due frame token to the loop that requested it.
fn run_ticks<C: DrawContext>(
    backdrops: &mut [Backdrop<C>],
    elapsed: f32,
    frame: &mut C::Frame<'_>,
    viewport: &mut WindowViewport,
    frames: &mut FrameQueue,
) {
    for token in frames.drain_due() {
        let Some(b) = backdrops.iter_mut().find(|b| b.render_loop.pending_token() == Some(token)) else {
            continue;
        };
        b.render_loop.tick(token, elapsed, &mut *frame, &mut *viewport, &mut *frames);
    }
}

impl App for Studio {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::Resized(size) => self.resize(Viewport::from_physical(size.width, size.height)),
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(p) => -p.y as f32,
                };
                self.page.scroll_by(dy);
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                return self.on_key(&event.logical_key);
            }
            WindowEvent::CloseRequested => self.unmount_all(),
            _ => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let viewport = ctx.window.viewport();
        if viewport != self.viewport.viewport() {
            self.resize(viewport);
        }

        let host = self
            .host
            .get_or_insert_with(|| GpuSurfaceHost::new(ctx.gpu.device(), ctx.gpu.queue(), ctx.gpu.surface_format()));
        sync_mounts(&self.page, &mut self.backdrops, host, &mut self.viewport, &mut self.frames);

        let elapsed = ctx.time.elapsed;
        let (backdrops, viewport, frames) = (&mut self.backdrops, &mut self.viewport, &mut self.frames);

        // Tokens are drained inside the draw callback so a skipped frame leaves them pending.
        ctx.render(Color::from_hex(BACKGROUND, 1.0), |target| {
            run_ticks(backdrops, elapsed, target, viewport, frames);
        })
    }
}
