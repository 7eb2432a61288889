//! Viewport provider capability and the window-backed implementation.

use std::collections::BTreeSet;

use folio_engine::coords::Viewport;

/// Registration handle for a resize listener.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Source of the current viewport size and resize notifications.
///
/// Listeners are additive: each render loop registers its own id on mount and
/// removes it on unmount.
pub trait ViewportProvider {
    fn viewport(&self) -> Viewport;
    fn add_resize_listener(&mut self) -> ListenerId;
    fn remove_resize_listener(&mut self, id: ListenerId);
}

/// Viewport of the host window.
///
/// The host calls [`WindowViewport::resize`] on every window resize and forwards
/// the new size to the render loops whose ids it returns.
#[derive(Debug, Default)]
pub struct WindowViewport {
    current: Viewport,
    listeners: BTreeSet<ListenerId>,
    next_id: u64,
}

impl WindowViewport {
    pub fn new(current: Viewport) -> Self {
        Self { current, ..Self::default() }
    }

    /// Stores the new size and returns the listeners to notify, in registration order.
    pub fn resize(&mut self, viewport: Viewport) -> Vec<ListenerId> {
        self.current = viewport;
        self.listeners.iter().copied().collect()
    }

    pub fn is_listening(&self, id: ListenerId) -> bool {
        self.listeners.contains(&id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl ViewportProvider for WindowViewport {
    fn viewport(&self) -> Viewport {
        self.current
    }

    fn add_resize_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id);
        id
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}
