//! Viewport Binder: routes resize notifications into a render loop's projection.

use folio_engine::coords::Viewport;

use crate::viewport::{ListenerId, ViewportProvider};

/// Per-mount resize subscription with a single pending slot.
///
/// Resizes are not queued: only the most recent viewport is kept and it is
/// applied before the next draw.
#[derive(Debug, Default)]
pub struct ViewportBinder {
    listener: Option<ListenerId>,
    pending: Option<Viewport>,
}

impl ViewportBinder {
    /// Registers with the provider. Binding twice keeps the first registration.
    pub fn bind(&mut self, provider: &mut dyn ViewportProvider) -> ListenerId {
        if let Some(id) = self.listener {
            return id;
        }
        let id = provider.add_resize_listener();
        self.listener = Some(id);
        id
    }

    /// Deregisters and drops any pending size. Safe to call when unbound.
    pub fn unbind(&mut self, provider: &mut dyn ViewportProvider) {
        if let Some(id) = self.listener.take() {
            provider.remove_resize_listener(id);
        }
        self.pending = None;
    }

    pub fn listener(&self) -> Option<ListenerId> {
        self.listener
    }

    /// Records a resize. Ignored while unbound.
    pub fn on_resize(&mut self, viewport: Viewport) {
        if self.listener.is_some() {
            self.pending = Some(viewport);
        }
    }

    /// Takes the latest unapplied viewport.
    pub fn take_pending(&mut self) -> Option<Viewport> {
        self.pending.take()
    }
}
