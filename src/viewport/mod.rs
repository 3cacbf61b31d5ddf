//! Viewport module orchestrator.

mod core;

pub use core::{DEFAULT_FRAME_HEIGHT, Frame};
