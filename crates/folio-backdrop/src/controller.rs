//! Render Loop Controller.
//!
//! State machine per section: `Unmounted -> Mounted(ticking) -> Unmounted`, with a
//! `Fallback` state when no drawing context could be acquired.
//!
//! Ticks are driven by the host's frame scheduler. Each tick advances the scene
//! and draws it, then requests the next frame. Unmounting cancels the pending
//! frame, deregisters the resize listener and releases every graphics resource.
//!
//! A shared guard flag ([`UnmountHandle`]) is checked between the animator step
//! and the draw, so an unmount requested while a tick is in flight never reaches
//! the drawing context.

use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use folio_engine::coords::{Rect, Viewport};

use crate::animator;
use crate::binder::ViewportBinder;
use crate::context::{DrawContext, SurfaceHost};
use crate::palette::Section;
use crate::projection::Projection;
use crate::scene::{SceneBuilder, SceneState};
use crate::schedule::{FrameScheduler, FrameToken};
use crate::shape::ShapeDescriptor;
use crate::viewport::{ListenerId, ViewportProvider};

/// Result of [`RenderLoop::mount`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MountOutcome {
    /// Scene built and first frame requested (also returned when already mounted).
    Mounted,
    /// Zero-sized region or viewport; nothing acquired.
    Skipped,
    /// Drawing context unavailable; the section keeps a static background.
    Fallback,
}

/// Result of [`RenderLoop::tick`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickOutcome {
    /// Scene advanced, drawn and the next frame requested.
    Drawn,
    /// Token is not the pending one (cancelled or superseded); ignored.
    Stale,
    /// Loop is not mounted.
    Idle,
    /// An unmount request arrived; resources were released without drawing.
    Cancelled,
}

/// Coarse lifecycle state, for hosts and logs.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Unmounted,
    Mounted,
    Fallback,
}

/// Capabilities a render loop needs while mounting.
pub struct LoopCtx<'a, H> {
    pub surfaces: &'a mut H,
    pub viewport: &'a mut dyn ViewportProvider,
    pub frames: &'a mut dyn FrameScheduler,
}

/// Cloneable, thread-safe unmount request for one mount.
///
/// Requesting flips the mount's guard flag; the loop stops drawing at once and
/// finishes teardown (release, detach, listener removal) on its next `tick`,
/// `mount` or `unmount`.
#[derive(Debug, Clone)]
pub struct UnmountHandle {
    live: Arc<AtomicBool>,
}

impl UnmountHandle {
    pub fn request(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        !self.live.load(Ordering::Acquire)
    }
}

struct Mount<C: DrawContext> {
    context: C,
    scene: SceneState<C::Handle>,
    region: Rect,
    pending: Option<FrameToken>,
    binder: ViewportBinder,
    warned_draw: bool,
}

enum Phase<C: DrawContext> {
    Unmounted,
    Fallback,
    Mounted(Mount<C>),
}

/// Backdrop render loop for one section.
pub struct RenderLoop<C: DrawContext> {
    label: String,
    seed: Vec<ShapeDescriptor>,
    phase: Phase<C>,
    /// Guard flag of the current mount; `false` whenever no mount is live.
    live: Arc<AtomicBool>,
    mounts: u64,
}

impl<C: DrawContext> RenderLoop<C> {
    pub fn new(section: Section) -> Self {
        Self::from_seed(section.name(), section.palette())
    }

    pub fn from_seed(label: impl Into<String>, seed: Vec<ShapeDescriptor>) -> Self {
        Self {
            label: label.into(),
            seed,
            phase: Phase::Unmounted,
            live: Arc::new(AtomicBool::new(false)),
            mounts: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> LoopState {
        match self.phase {
            Phase::Unmounted => LoopState::Unmounted,
            Phase::Fallback => LoopState::Fallback,
            Phase::Mounted(_) => LoopState::Mounted,
        }
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.phase, Phase::Mounted(_))
    }

    /// Number of successful mounts so far.
    pub fn mount_count(&self) -> u64 {
        self.mounts
    }

    pub fn scene(&self) -> Option<&SceneState<C::Handle>> {
        match &self.phase {
            Phase::Mounted(m) => Some(&m.scene),
            _ => None,
        }
    }

    pub fn projection(&self) -> Option<Projection> {
        self.scene().map(|s| s.projection)
    }

    pub fn pending_token(&self) -> Option<FrameToken> {
        match &self.phase {
            Phase::Mounted(m) => m.pending,
            _ => None,
        }
    }

    pub fn listener(&self) -> Option<ListenerId> {
        match &self.phase {
            Phase::Mounted(m) => m.binder.listener(),
            _ => None,
        }
    }

    /// Guard handle for the current mount. Already requested when not mounted.
    pub fn unmount_handle(&self) -> UnmountHandle {
        UnmountHandle { live: Arc::clone(&self.live) }
    }

    /// Acquires a context for `region`, builds the scene and schedules the first tick.
    pub fn mount<H>(&mut self, region: Rect, ctx: LoopCtx<'_, H>) -> MountOutcome
    where
        H: SurfaceHost<Context = C>,
    {
        let LoopCtx { surfaces, viewport, frames } = ctx;

        // A mount whose unmount was requested through a handle is finished first.
        if self.is_mounted() && !self.live.load(Ordering::Acquire) {
            self.unmount(viewport, frames);
        }

        match self.phase {
            Phase::Mounted(_) => return MountOutcome::Mounted,
            Phase::Fallback => return MountOutcome::Fallback,
            Phase::Unmounted => {}
        }

        let vp = viewport.viewport();
        if region.is_empty() || !region.is_finite() || !vp.is_valid() {
            log::debug!("{} backdrop: nothing to mount into ({region:?}, {vp:?})", self.label);
            return MountOutcome::Skipped;
        }

        let mut context = match surfaces.acquire(region) {
            Ok(c) => c,
            Err(err) => {
                log::warn!("{} backdrop unavailable, keeping static background: {err:#}", self.label);
                self.phase = Phase::Fallback;
                return MountOutcome::Fallback;
            }
        };

        context.set_viewport(vp);
        let scene = SceneBuilder::build(&self.seed, Projection::for_viewport(vp), &mut context);

        let mut binder = ViewportBinder::default();
        binder.bind(viewport);

        let pending = Some(frames.request_frame());

        self.live = Arc::new(AtomicBool::new(true));
        self.mounts += 1;
        log::debug!(
            "{} backdrop mounted ({} objects, mount #{})",
            self.label,
            scene.len(),
            self.mounts
        );

        self.phase = Phase::Mounted(Mount {
            context,
            scene,
            region,
            pending,
            binder,
            warned_draw: false,
        });

        MountOutcome::Mounted
    }

    /// Runs one scheduled tick: advance, then draw, then reschedule.
    pub fn tick(
        &mut self,
        token: FrameToken,
        elapsed: f32,
        frame: &mut C::Frame<'_>,
        viewport: &mut dyn ViewportProvider,
        frames: &mut dyn FrameScheduler,
    ) -> TickOutcome {
        if let Err(outcome) = self.advance(token, elapsed, viewport) {
            return outcome;
        }
        self.present(frame, viewport, frames)
    }

    /// Animator half of a tick. Consumes `token`.
    pub(crate) fn advance(
        &mut self,
        token: FrameToken,
        elapsed: f32,
        viewport: &mut dyn ViewportProvider,
    ) -> Result<(), TickOutcome> {
        let live = self.live.load(Ordering::Acquire);

        let Phase::Mounted(m) = &mut self.phase else {
            return Err(TickOutcome::Idle);
        };
        if m.pending != Some(token) {
            return Err(TickOutcome::Stale);
        }
        m.pending = None;

        if !live {
            self.teardown(viewport);
            return Err(TickOutcome::Cancelled);
        }

        if let Some(vp) = m.binder.take_pending() {
            m.scene.projection.set_viewport(vp);
            m.context.set_viewport(vp);
        }
        animator::advance(&mut m.scene, elapsed);
        Ok(())
    }

    /// Draw half of a tick. Re-checks the guard flag before touching the context.
    pub(crate) fn present(
        &mut self,
        frame: &mut C::Frame<'_>,
        viewport: &mut dyn ViewportProvider,
        frames: &mut dyn FrameScheduler,
    ) -> TickOutcome {
        if !self.live.load(Ordering::Acquire) {
            if let Phase::Mounted(m) = &mut self.phase {
                if let Some(token) = m.pending.take() {
                    frames.cancel_frame(token);
                }
            }
            self.teardown(viewport);
            return TickOutcome::Cancelled;
        }

        let Phase::Mounted(m) = &mut self.phase else {
            return TickOutcome::Idle;
        };

        let batch = m.scene.batch(m.region);
        if let Err(err) = m.context.draw(frame, batch) {
            if !m.warned_draw {
                log::warn!("{} backdrop draw failed: {err:#}", self.label);
                m.warned_draw = true;
            }
        }

        m.pending = Some(frames.request_frame());
        TickOutcome::Drawn
    }

    /// Viewport Binder entry point: records the latest size for the next draw.
    pub fn on_resize(&mut self, viewport: Viewport) {
        if let Phase::Mounted(m) = &mut self.phase {
            m.binder.on_resize(viewport);
        }
    }

    /// Moves the drawing region (scrolling) without remounting.
    pub fn set_region(&mut self, region: Rect) {
        if let Phase::Mounted(m) = &mut self.phase {
            m.region = region;
        }
    }

    /// Cancels the pending tick, deregisters from the viewport and releases every
    /// resource acquired by `mount`. Idempotent.
    pub fn unmount(&mut self, viewport: &mut dyn ViewportProvider, frames: &mut dyn FrameScheduler) {
        self.live.store(false, Ordering::Release);

        match mem::replace(&mut self.phase, Phase::Unmounted) {
            Phase::Mounted(mut m) => {
                if let Some(token) = m.pending.take() {
                    frames.cancel_frame(token);
                }
                m.binder.unbind(viewport);
                release(m);
                log::debug!("{} backdrop unmounted", self.label);
            }
            Phase::Fallback => log::debug!("{} backdrop left fallback", self.label),
            Phase::Unmounted => {}
        }
    }

    /// Finishes a handle-requested unmount from inside a tick.
    fn teardown(&mut self, viewport: &mut dyn ViewportProvider) {
        if let Phase::Mounted(mut m) = mem::replace(&mut self.phase, Phase::Unmounted) {
            m.binder.unbind(viewport);
            release(m);
            log::debug!("{} backdrop torn down on request", self.label);
        }
    }
}

fn release<C: DrawContext>(m: Mount<C>) {
    let Mount { mut context, scene, .. } = m;
    scene.release_into(&mut context);
    context.detach();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::FrameQueue;
    use crate::testing::{Event, FakeContext, FakeFrame, FakeHost};
    use crate::viewport::WindowViewport;
    use approx::assert_relative_eq;

    struct Harness {
        host: FakeHost,
        viewport: WindowViewport,
        frames: FrameQueue,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                host: FakeHost::new(),
                viewport: WindowViewport::new(Viewport::new(800.0, 600.0)),
                frames: FrameQueue::new(),
            }
        }

        fn ctx(&mut self) -> LoopCtx<'_, FakeHost> {
            LoopCtx {
                surfaces: &mut self.host,
                viewport: &mut self.viewport,
                frames: &mut self.frames,
            }
        }

        fn mount(&mut self, rl: &mut RenderLoop<FakeContext>) -> MountOutcome {
            rl.mount(Rect::from_size(800.0, 600.0), self.ctx())
        }

        fn unmount(&mut self, rl: &mut RenderLoop<FakeContext>) {
            rl.unmount(&mut self.viewport, &mut self.frames);
        }

        /// Dispatches one host frame to `rl`.
        fn frame(&mut self, rl: &mut RenderLoop<FakeContext>, elapsed: f32) -> Vec<TickOutcome> {
            let mut frame = FakeFrame::default();
            self.frames
                .drain_due()
                .into_iter()
                .map(|token| rl.tick(token, elapsed, &mut frame, &mut self.viewport, &mut self.frames))
                .collect()
        }
    }

    fn hero() -> RenderLoop<FakeContext> {
        RenderLoop::new(Section::Hero)
    }

    #[test]
    fn mount_builds_scene_and_schedules_first_tick() {
        let mut h = Harness::new();
        let mut rl = hero();

        assert_eq!(h.mount(&mut rl), MountOutcome::Mounted);

        assert_eq!(rl.state(), LoopState::Mounted);
        assert_eq!(rl.scene().map(|s| s.len()), Some(4));
        assert_eq!(h.frames.pending_count(), 1);
        assert_eq!(h.viewport.listener_count(), 1);
        assert!(!rl.unmount_handle().is_requested());
        assert_relative_eq!(rl.projection().unwrap().aspect, 800.0 / 600.0);
    }

    #[test]
    fn ticks_draw_and_reschedule_continuously() {
        let mut h = Harness::new();
        let mut rl = hero();
        h.mount(&mut rl);

        for i in 0..10 {
            assert_eq!(h.frame(&mut rl, i as f32 / 60.0), vec![TickOutcome::Drawn]);
        }

        assert_eq!(h.host.count(|e| matches!(e, Event::Draw { items: 4, .. })), 10);
        assert_eq!(rl.scene().unwrap().ticks, 10);
        assert_eq!(h.frames.pending_count(), 1);
    }

    #[test]
    fn unmount_right_after_mount_releases_everything() {
        let mut h = Harness::new();
        let mut rl = RenderLoop::<FakeContext>::new(Section::About);
        h.mount(&mut rl);

        h.unmount(&mut rl);

        assert_eq!(rl.state(), LoopState::Unmounted);
        let allocated = h.host.count(|e| matches!(e, Event::Allocate { .. }));
        let released = h.host.count(|e| matches!(e, Event::Release { .. }));
        assert_eq!(allocated, 14);
        assert_eq!(released, allocated);
        assert_eq!(h.host.count(|e| matches!(e, Event::Detach { .. })), 1);
        assert_eq!(h.host.count(|e| matches!(e, Event::Draw { .. })), 0);
        assert_eq!(h.frames.pending_count(), 0);
        assert_eq!(h.viewport.listener_count(), 0);
    }

    #[test]
    fn unmount_is_idempotent() {
        let mut h = Harness::new();
        let mut rl = hero();
        h.mount(&mut rl);

        h.unmount(&mut rl);
        h.unmount(&mut rl);

        assert_eq!(h.host.count(|e| matches!(e, Event::Detach { .. })), 1);
        assert_eq!(h.host.count(|e| matches!(e, Event::Release { .. })), 4);
    }

    #[test]
    fn unmount_before_mount_is_a_no_op() {
        let mut h = Harness::new();
        let mut rl = hero();
        h.unmount(&mut rl);
        assert!(h.host.events().is_empty());
    }

    #[test]
    fn unmount_requested_between_advance_and_draw_never_draws() {
        let mut h = Harness::new();
        let mut rl = hero();
        h.mount(&mut rl);
        h.frame(&mut rl, 0.0);
        h.host.clear();

        let handle = rl.unmount_handle();
        let token = h.frames.drain_due()[0];
        let mut frame = FakeFrame::default();

        assert_eq!(rl.advance(token, 0.5, &mut h.viewport), Ok(()));
        handle.request();
        assert_eq!(
            rl.present(&mut frame, &mut h.viewport, &mut h.frames),
            TickOutcome::Cancelled
        );

        assert_eq!(frame.draws, 0);
        let events = h.host.events();
        assert!(!events.iter().any(|e| matches!(e, Event::Draw { .. })));
        assert_eq!(events.iter().filter(|e| matches!(e, Event::Release { .. })).count(), 4);
        assert_eq!(events.last(), Some(&Event::Detach { context: 0 }));
        assert_eq!(h.frames.pending_count(), 0);
        assert_eq!(h.viewport.listener_count(), 0);

        // A host-side unmount afterwards has nothing left to do.
        h.unmount(&mut rl);
        assert_eq!(h.host.count(|e| matches!(e, Event::Detach { .. })), 1);
    }

    #[test]
    fn request_before_tick_cancels_without_advancing() {
        let mut h = Harness::new();
        let mut rl = hero();
        h.mount(&mut rl);

        rl.unmount_handle().request();

        assert_eq!(h.frame(&mut rl, 0.0), vec![TickOutcome::Cancelled]);
        assert_eq!(h.host.count(|e| matches!(e, Event::Draw { .. })), 0);
        assert_eq!(rl.state(), LoopState::Unmounted);
        assert!(h.frame(&mut rl, 0.1).is_empty());
    }

    #[test]
    fn requested_unmount_deregisters_listener_on_next_tick() {
        let mut h = Harness::new();
        let mut rl = hero();
        h.mount(&mut rl);
        let id = rl.listener().unwrap();

        rl.unmount_handle().request();
        assert_eq!(h.viewport.listener_count(), 1);

        assert_eq!(h.frame(&mut rl, 0.0), vec![TickOutcome::Cancelled]);
        assert_eq!(h.viewport.listener_count(), 0);
        assert!(!h.viewport.is_listening(id));
        assert!(h.viewport.resize(Viewport::new(1024.0, 768.0)).is_empty());
    }

    #[test]
    fn unmount_handle_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UnmountHandle>();

        let mut h = Harness::new();
        let mut rl = hero();
        h.mount(&mut rl);

        let handle = rl.unmount_handle();
        std::thread::spawn(move || handle.request()).join().unwrap();
        assert!(rl.unmount_handle().is_requested());
    }

    #[test]
    fn stale_tokens_are_ignored() {
        let mut h = Harness::new();
        let mut rl = hero();
        h.mount(&mut rl);
        let first = rl.pending_token().unwrap();
        h.frame(&mut rl, 0.0);

        let mut frame = FakeFrame::default();
        assert_eq!(rl.tick(first, 0.1, &mut frame, &mut h.viewport, &mut h.frames), TickOutcome::Stale);
        assert_eq!(frame.draws, 0);
    }

    #[test]
    fn tick_after_unmount_is_idle() {
        let mut h = Harness::new();
        let mut rl = hero();
        h.mount(&mut rl);
        let token = rl.pending_token().unwrap();
        h.unmount(&mut rl);

        let mut frame = FakeFrame::default();
        assert_eq!(rl.tick(token, 0.0, &mut frame, &mut h.viewport, &mut h.frames), TickOutcome::Idle);
        assert_eq!(h.host.count(|e| matches!(e, Event::Draw { .. })), 0);
    }

    #[test]
    fn zero_sized_region_or_viewport_skips_mount() {
        let mut h = Harness::new();
        let mut rl = hero();

        assert_eq!(rl.mount(Rect::new(0.0, 0.0, 0.0, 600.0), h.ctx()), MountOutcome::Skipped);

        h.viewport.resize(Viewport::new(800.0, 0.0));
        assert_eq!(h.mount(&mut rl), MountOutcome::Skipped);

        assert!(h.host.events().is_empty());
        assert_eq!(h.frames.pending_count(), 0);
        assert_eq!(rl.state(), LoopState::Unmounted);
    }

    #[test]
    fn acquisition_failure_falls_back_without_scheduling() {
        let mut h = Harness::new();
        h.host.fail_acquire = 1;
        let mut rl = hero();

        assert_eq!(h.mount(&mut rl), MountOutcome::Fallback);
        assert_eq!(rl.state(), LoopState::Fallback);
        assert_eq!(h.frames.pending_count(), 0);
        assert_eq!(h.viewport.listener_count(), 0);

        // Remount after leaving the section retries acquisition.
        h.unmount(&mut rl);
        assert_eq!(h.mount(&mut rl), MountOutcome::Mounted);
    }

    #[test]
    fn draw_failures_do_not_stop_the_loop() {
        let mut h = Harness::new();
        h.host.fail_draws = true;
        let mut rl = hero();
        h.mount(&mut rl);

        for i in 0..3 {
            assert_eq!(h.frame(&mut rl, i as f32), vec![TickOutcome::Drawn]);
        }
        assert_eq!(h.frames.pending_count(), 1);
        assert_eq!(rl.scene().unwrap().ticks, 3);
    }

    #[test]
    fn mounting_twice_keeps_one_context() {
        let mut h = Harness::new();
        let mut rl = hero();
        h.mount(&mut rl);
        assert_eq!(h.mount(&mut rl), MountOutcome::Mounted);

        assert_eq!(h.host.count(|e| matches!(e, Event::Acquire { .. })), 1);
        assert_eq!(h.frames.pending_count(), 1);
        assert_eq!(rl.mount_count(), 1);
    }

    #[test]
    fn resize_sequence_is_last_write_wins() {
        let sizes = [
            Viewport::new(1024.0, 768.0),
            Viewport::new(320.0, 640.0),
            Viewport::new(2560.0, 1080.0),
        ];

        for n in 1..=sizes.len() {
            let mut h = Harness::new();
            let mut rl = hero();
            h.mount(&mut rl);

            for &vp in &sizes[..n] {
                for id in h.viewport.resize(vp) {
                    assert_eq!(Some(id), rl.listener());
                    rl.on_resize(vp);
                }
            }
            h.frame(&mut rl, 0.0);

            let expected = Projection::for_viewport(sizes[n - 1]);
            assert_eq!(rl.projection(), Some(expected));
            assert!(h.host.events().contains(&Event::SetViewport { context: 0, viewport: sizes[n - 1] }));
        }
    }

    #[test]
    fn remount_uses_fresh_context_and_identical_initial_scene() {
        let mut h = Harness::new();
        let mut rl = RenderLoop::<FakeContext>::new(Section::Skills);

        h.mount(&mut rl);
        let first = rl.scene().unwrap().poses();
        for i in 0..5 {
            h.frame(&mut rl, i as f32);
        }
        h.unmount(&mut rl);

        h.mount(&mut rl);
        let second = rl.scene().unwrap().poses();

        assert_eq!(first, second);
        assert_eq!(rl.mount_count(), 2);
        let acquired: Vec<u32> = h
            .host
            .events()
            .iter()
            .filter(|e| matches!(e, Event::Acquire { .. }))
            .map(Event::context)
            .collect();
        assert_eq!(acquired, vec![0, 1]);
    }

    #[test]
    fn handle_from_previous_mount_cannot_unmount_the_next() {
        let mut h = Harness::new();
        let mut rl = hero();
        h.mount(&mut rl);
        let old = rl.unmount_handle();
        h.unmount(&mut rl);

        h.mount(&mut rl);
        assert!(old.is_requested());
        assert!(!rl.unmount_handle().is_requested());
        assert_eq!(h.frame(&mut rl, 0.0), vec![TickOutcome::Drawn]);
    }

    #[test]
    fn set_region_moves_subsequent_draws() {
        let mut h = Harness::new();
        let mut rl = hero();
        h.mount(&mut rl);

        let scrolled = Rect::new(0.0, -200.0, 800.0, 600.0);
        rl.set_region(scrolled);
        h.frame(&mut rl, 0.0);

        assert!(h.host.events().iter().any(|e| matches!(e, Event::Draw { region, .. } if *region == scrolled)));
    }

    #[test]
    fn sections_tick_independently() {
        let mut h = Harness::new();
        let mut hero = hero();
        let mut about = RenderLoop::<FakeContext>::new(Section::About);
        h.mount(&mut hero);
        h.mount(&mut about);

        let mut frame = FakeFrame::default();
        for token in h.frames.drain_due() {
            if Some(token) == hero.pending_token() {
                hero.tick(token, 0.0, &mut frame, &mut h.viewport, &mut h.frames);
            } else {
                about.tick(token, 0.0, &mut frame, &mut h.viewport, &mut h.frames);
            }
        }
        h.unmount(&mut hero);

        assert_eq!(frame.draws, 2);
        assert_eq!(about.scene().unwrap().ticks, 1);
        assert!(about.is_mounted());
        assert_eq!(h.viewport.listener_count(), 1);
    }
}
