//! Time subsystem.
//!
//! Provides frame timing without coupling to the runtime:
//! - one `FrameClock` per window (or per render loop)
//! - call `tick()` once per presented frame to obtain `FrameTime`
//! - `FrameTime::elapsed` is the shared time source for animation

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
