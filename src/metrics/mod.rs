//! Navigation counters accumulated by the engine.
//!
//! The engine owns its metrics directly; spec'd single-threaded operation
//! means no shared handle is needed. Snapshots convert into [`LogEvent`]s so
//! periodic emission rides the same sink as the rest of the logging.

use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct NavMetrics {
    inputs: u64,
    navigations: u64,
    activations: u64,
    renders: u64,
    skipped_renders: u64,
}

impl NavMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A key was polled and matched a bound action.
    pub fn record_input(&mut self) {
        self.inputs = self.inputs.saturating_add(1);
    }

    /// The current node changed (enter, back or home).
    pub fn record_navigation(&mut self) {
        self.navigations = self.navigations.saturating_add(1);
    }

    /// A terminal node's action fired.
    pub fn record_activation(&mut self) {
        self.activations = self.activations.saturating_add(1);
    }

    pub fn record_render(&mut self, drawn: bool) {
        if drawn {
            self.renders = self.renders.saturating_add(1);
        } else {
            self.skipped_renders = self.skipped_renders.saturating_add(1);
        }
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            inputs: self.inputs,
            navigations: self.navigations,
            activations: self.activations,
            renders: self.renders,
            skipped_renders: self.skipped_renders,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub inputs: u64,
    pub navigations: u64,
    pub activations: u64,
    pub renders: u64,
    pub skipped_renders: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "nav_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("inputs".to_string(), json!(self.inputs));
        map.insert("navigations".to_string(), json!(self.navigations));
        map.insert("activations".to_string(), json!(self.activations));
        map.insert("renders".to_string(), json!(self.renders));
        map.insert("skipped_renders".to_string(), json!(self.skipped_renders));
        map
    }
}
