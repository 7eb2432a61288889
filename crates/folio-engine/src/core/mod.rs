//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and the
//! hosting shell. It keeps winit/wgpu plumbing out of user code and hands every
//! frame a consistent context.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
