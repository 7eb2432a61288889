//! Animated wireframe backdrops for the portfolio sections.
//!
//! One generic component, parameterized by a section palette:
//! - `scene`: builds the animated objects from shape descriptors
//! - `animator`: advances rotation and float offsets each tick
//! - `controller`: the render loop state machine (mount, tick, unmount)
//! - `binder`: keeps the projection in step with viewport resizes
//!
//! Platform access goes through injected capabilities (`context`, `viewport`,
//! `schedule`); `gpu` implements the drawing side on top of `folio-engine`.

pub mod animator;
pub mod binder;
pub mod context;
pub mod controller;
pub mod geometry;
pub mod gpu;
pub mod palette;
pub mod projection;
pub mod scene;
pub mod schedule;
pub mod shape;
pub mod viewport;

#[cfg(test)]
mod testing;

pub use controller::{LoopCtx, LoopState, MountOutcome, RenderLoop, TickOutcome, UnmountHandle};
pub use palette::Section;
pub use shape::{FloatMotion, GeometryKind, Material, ShapeDescriptor};
