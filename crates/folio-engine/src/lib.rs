//! Folio engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the portfolio
//! backdrops: window loop, device/surface management, frame timing and a
//! small mesh renderer.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
