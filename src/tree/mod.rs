//! Tree module orchestrator.
//!
//! Downstream code imports node and tree types from here while the
//! implementation details live in the private `core` module.

mod core;

pub use core::{ActivationContext, MenuAction, MenuTree, Mode, NodeId, NodeSpec};
