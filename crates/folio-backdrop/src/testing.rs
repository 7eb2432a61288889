//! Recording fakes for the drawing capabilities.

use std::cell::RefCell;
use std::rc::Rc;

use folio_engine::coords::{Rect, Viewport};

use crate::context::{DrawBatch, DrawContext, SurfaceHost};
use crate::geometry::Mesh;
use crate::shape::ShapeDescriptor;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Acquire { context: u32, region: Rect },
    Allocate { context: u32, handle: u32, kind: &'static str },
    SetViewport { context: u32, viewport: Viewport },
    Draw { context: u32, items: usize, region: Rect },
    Release { context: u32, handle: u32 },
    Detach { context: u32 },
}

impl Event {
    pub fn context(&self) -> u32 {
        match *self {
            Event::Acquire { context, .. }
            | Event::Allocate { context, .. }
            | Event::SetViewport { context, .. }
            | Event::Draw { context, .. }
            | Event::Release { context, .. }
            | Event::Detach { context } => context,
        }
    }
}

type Log = Rc<RefCell<Vec<Event>>>;

/// Surface host that logs every capability call.
#[derive(Default)]
pub struct FakeHost {
    log: Log,
    next_context: u32,
    /// Fail this many upcoming acquisitions.
    pub fail_acquire: u32,
    /// Contexts handed out from now on fail every draw.
    pub fail_draws: bool,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.log.borrow().iter().filter(|e| pred(e)).count()
    }
}

impl SurfaceHost for FakeHost {
    type Context = FakeContext;

    fn acquire(&mut self, region: Rect) -> anyhow::Result<FakeContext> {
        if self.fail_acquire > 0 {
            self.fail_acquire -= 1;
            anyhow::bail!("no drawing context available");
        }
        let id = self.next_context;
        self.next_context += 1;
        self.log.borrow_mut().push(Event::Acquire { context: id, region });
        Ok(FakeContext {
            log: Rc::clone(&self.log),
            id,
            next_handle: 0,
            fail_draws: self.fail_draws,
        })
    }
}

pub struct FakeContext {
    log: Log,
    id: u32,
    next_handle: u32,
    fail_draws: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub struct FakeHandle(pub u32);

/// Frame stand-in counting the draws recorded into it.
#[derive(Debug, Default)]
pub struct FakeFrame {
    pub draws: u32,
}

impl DrawContext for FakeContext {
    type Handle = FakeHandle;
    type Frame<'f> = FakeFrame;

    fn allocate(&mut self, shape: &ShapeDescriptor, _mesh: &Mesh) -> FakeHandle {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.log.borrow_mut().push(Event::Allocate {
            context: self.id,
            handle,
            kind: shape.kind.name(),
        });
        FakeHandle(handle)
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.log.borrow_mut().push(Event::SetViewport { context: self.id, viewport });
    }

    fn draw(&mut self, frame: &mut FakeFrame, batch: DrawBatch<'_, FakeHandle>) -> anyhow::Result<()> {
        if self.fail_draws {
            anyhow::bail!("device lost");
        }
        frame.draws += 1;
        self.log.borrow_mut().push(Event::Draw {
            context: self.id,
            items: batch.items.len(),
            region: batch.region,
        });
        Ok(())
    }

    fn release(&mut self, handle: FakeHandle) {
        self.log.borrow_mut().push(Event::Release { context: self.id, handle: handle.0 });
    }

    fn detach(self) {
        self.log.borrow_mut().push(Event::Detach { context: self.id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_host_starts_clean_and_numbers_contexts_from_zero() {
        let mut host = FakeHost::default();
        assert!(host.events().is_empty());

        let a = host.acquire(Rect::from_size(10.0, 10.0)).unwrap();
        let b = host.acquire(Rect::from_size(10.0, 10.0)).unwrap();
        assert_eq!((a.id, b.id), (0, 1));
        assert_eq!(host.count(|e| matches!(e, Event::Acquire { .. })), 2);
    }
}
