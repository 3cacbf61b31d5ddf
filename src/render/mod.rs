//! Render module orchestrator.

mod core;

pub use core::{MenuRenderer, MenuView, RendererSettings, ViewEntry};
