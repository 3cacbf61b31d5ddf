//! The navigation engine: build phase, enable, and the poll-driven input
//! loop.
//!
//! An [`AppTree`] owns the node tree and all mutable navigation state. The
//! caller drives it: build the tree, bind keys, call
//! [`AppTree::enable`] once, then call [`AppTree::handle_input`] from a poll
//! loop. Every handled action completes atomically within the call that
//! triggered it and ends in a render request; there is no internal thread and
//! no operation suspends mid-way.

use std::io::Write;
use std::time::Instant;

use serde_json::json;

use crate::error::{Result, TreeError};
use crate::input::{InputSource, KeyBindings, NavAction};
use crate::logging::{Logger, LogLevel, event_with_fields, json_kv};
use crate::metrics::{MetricSnapshot, NavMetrics};
use crate::render::{MenuRenderer, MenuView, ViewEntry};
use crate::selection::apply_selection;
use crate::tree::{ActivationContext, MenuTree, NodeId, NodeSpec};
use crate::viewport::{DEFAULT_FRAME_HEIGHT, Frame};

/// Configuration knobs for the engine.
#[derive(Clone)]
pub struct EngineConfig {
    /// Window capacity in rows; must be at least 1 by enable time.
    pub frame_height: usize,
    /// Optional structured logger.
    pub logger: Option<Logger>,
    /// Target field used on emitted log events.
    pub log_target: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_height: DEFAULT_FRAME_HEIGHT,
            logger: None,
            log_target: "apptree::engine".to_string(),
        }
    }
}

/// Result of one [`AppTree::handle_input`] poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Engine disabled, or the poll found no key. Not an error.
    NoInput,
    /// A key arrived but is not bound to any action. No render.
    Ignored,
    /// A bound action ran and the menu was re-rendered.
    Handled(NavAction),
}

/// Hierarchical menu engine for character displays.
pub struct AppTree {
    tree: MenuTree,
    frame: Frame,
    renderer: MenuRenderer,
    current: NodeId,
    keys: Option<KeyBindings>,
    enabled: bool,
    enabled_at: Option<Instant>,
    config: EngineConfig,
    metrics: NavMetrics,
}

impl AppTree {
    /// Create an engine whose tree holds only the master root.
    pub fn new(master_title: impl Into<String>) -> Self {
        Self::with_config(master_title, EngineConfig::default())
    }

    pub fn with_config(master_title: impl Into<String>, config: EngineConfig) -> Self {
        let tree = MenuTree::new(master_title);
        let current = tree.master();
        Self {
            tree,
            frame: Frame::new(config.frame_height),
            renderer: MenuRenderer::with_default(),
            current,
            keys: None,
            enabled: false,
            enabled_at: None,
            config,
            metrics: NavMetrics::new(),
        }
    }

    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    pub fn renderer_mut(&mut self) -> &mut MenuRenderer {
        &mut self.renderer
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn master(&self) -> NodeId {
        self.tree.master()
    }

    /// Node whose children are currently on screen.
    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn cursor(&self) -> usize {
        self.frame.cursor()
    }

    pub fn frame_offset(&self) -> usize {
        self.frame.offset()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn metrics(&self) -> MetricSnapshot {
        let uptime = self
            .enabled_at
            .map(|start| start.elapsed())
            .unwrap_or_default();
        self.metrics.snapshot(uptime)
    }

    /// Attach a node during the build phase. Delegates to
    /// [`MenuTree::attach`]; fails with [`TreeError::AlreadyFrozen`] once the
    /// engine is enabled.
    pub fn attach(&mut self, parent: NodeId, spec: NodeSpec) -> Result<NodeId> {
        self.tree.attach(parent, spec)
    }

    pub fn bind_keys(&mut self, keys: KeyBindings) {
        self.keys = Some(keys);
    }

    /// End the build phase: freeze the tree, point the engine at the master
    /// and draw the first menu.
    ///
    /// Fails with [`TreeError::NotReady`] if key bindings are missing or the
    /// configured frame height is zero, and with
    /// [`TreeError::AlreadyFrozen`] on a second call.
    pub fn enable(&mut self, out: &mut impl Write) -> Result<()> {
        if self.enabled {
            return Err(TreeError::AlreadyFrozen);
        }
        if self.keys.is_none() || self.config.frame_height == 0 {
            return Err(TreeError::NotReady);
        }

        self.tree.freeze();
        self.current = self.tree.master();
        self.frame = Frame::new(self.config.frame_height);
        self.frame.reset(self.tree.child_count(self.current));
        self.enabled = true;
        self.enabled_at = Some(Instant::now());

        self.log(
            LogLevel::Info,
            "engine_enabled",
            [
                json_kv("children", json!(self.frame.len())),
                json_kv("frame_height", json!(self.frame.height())),
            ],
        );

        self.render(out)
    }

    /// Poll `input` for one key and handle it.
    ///
    /// At most one render pass happens per call. A disabled engine or an
    /// empty poll returns [`InputOutcome::NoInput`]; a key with no binding
    /// returns [`InputOutcome::Ignored`] without rendering.
    pub fn handle_input(
        &mut self,
        input: &mut impl InputSource,
        out: &mut impl Write,
    ) -> Result<InputOutcome> {
        if !self.enabled {
            return Ok(InputOutcome::NoInput);
        }
        let Some(keys) = self.keys else {
            return Ok(InputOutcome::NoInput);
        };
        let Some(key) = input.poll_key() else {
            return Ok(InputOutcome::NoInput);
        };
        let Some(action) = keys.action_for(key) else {
            self.log(
                LogLevel::Debug,
                "key_ignored",
                [json_kv("key", json!(key.to_string()))],
            );
            return Ok(InputOutcome::Ignored);
        };

        match action {
            NavAction::Up => self.handle_up(out)?,
            NavAction::Down => self.handle_down(out)?,
            NavAction::Select => self.handle_select(out)?,
            NavAction::Back => self.handle_back(out)?,
            NavAction::Home => self.handle_home(out)?,
        }

        self.metrics.record_input();
        self.log(
            LogLevel::Debug,
            "input_handled",
            [
                json_kv("key", json!(key.to_string())),
                json_kv("action", json!(action.as_str())),
            ],
        );
        Ok(InputOutcome::Handled(action))
    }

    /// Drain a pre-recorded key sequence, handling every key in order.
    pub fn run_script(
        &mut self,
        keys: impl IntoIterator<Item = char>,
        out: &mut impl Write,
    ) -> Result<()> {
        let mut input = crate::input::ScriptedInput::new(keys);
        while !input.is_empty() {
            self.handle_input(&mut input, out)?;
        }
        Ok(())
    }

    fn handle_up(&mut self, out: &mut impl Write) -> Result<()> {
        self.frame.move_up();
        self.render(out)
    }

    fn handle_down(&mut self, out: &mut impl Write) -> Result<()> {
        self.frame.move_down();
        self.render(out)
    }

    fn handle_select(&mut self, out: &mut impl Write) -> Result<()> {
        let cursor = self.frame.cursor();
        let Some(&child) = self.tree.children_of(self.current).get(cursor) else {
            // Empty child list: nothing to select, nothing to redraw.
            return Ok(());
        };

        if self.tree.has_children(child) {
            self.enter(child);
            return self.render(out);
        }

        if self.tree.has_action(child) {
            let ctx = ActivationContext {
                parent: self.current,
                child_index: cursor,
                parent_title: self.tree.title(self.current).to_string(),
                title: self.tree.title(child).to_string(),
                selected: self.tree.is_selected(child),
            };
            if let Some(action) = self.tree.action_mut(child) {
                action.activate(&ctx);
            }
            apply_selection(&mut self.tree, self.current, cursor);
            self.metrics.record_activation();
            self.log(
                LogLevel::Info,
                "node_activated",
                [
                    json_kv("title", json!(ctx.title)),
                    json_kv("child_index", json!(cursor)),
                ],
            );
        }

        // A leaf without an action still re-renders the unchanged menu.
        self.render(out)
    }

    fn handle_back(&mut self, out: &mut impl Write) -> Result<()> {
        let Some(parent) = self.tree.parent_of(self.current) else {
            return Ok(());
        };
        self.enter(parent);
        self.render(out)
    }

    fn handle_home(&mut self, out: &mut impl Write) -> Result<()> {
        if self.current == self.tree.master() {
            return Ok(());
        }
        self.enter(self.tree.master());
        self.render(out)
    }

    /// Make `node` the current node with cursor and window back at the top.
    fn enter(&mut self, node: NodeId) {
        self.current = node;
        self.frame.reset(self.tree.child_count(node));
        self.metrics.record_navigation();
        self.log(
            LogLevel::Debug,
            "node_entered",
            [
                json_kv("title", json!(self.tree.title(node))),
                json_kv("children", json!(self.frame.len())),
            ],
        );
    }

    fn render(&mut self, out: &mut impl Write) -> Result<()> {
        let keys = self.keys.ok_or(TreeError::NotReady)?;
        let children = self.tree.children_of(self.current);
        let entries: Vec<ViewEntry> = children
            .iter()
            .map(|&child| ViewEntry {
                title: self.tree.title(child).to_string(),
                selected: self.tree.is_selected(child),
            })
            .collect();
        let info = children
            .get(self.frame.cursor())
            .map(|&child| self.tree.info(child).to_string());

        let view = MenuView {
            title: self.tree.title(self.current).to_string(),
            mode: self.tree.mode(self.current),
            entries,
            cursor: self.frame.cursor(),
            offset: self.frame.offset(),
            height: self.frame.height(),
            info,
            keys,
        };

        let drawn = self.renderer.render(out, &view)?;
        self.metrics.record_render(drawn);
        self.log(
            LogLevel::Debug,
            "render_completed",
            [json_kv("drawn", json!(drawn))],
        );
        Ok(())
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, &self.config.log_target, message, fields);
            let _ = logger.log_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptedInput;
    use crate::logging::MemorySink;
    use crate::tree::Mode;
    use std::io;
    use std::sync::{Arc, Mutex};

    const KEYS: KeyBindings = KeyBindings::new('u', 'd', 's', 'b', 'h');

    fn enabled_engine(child_count: usize) -> AppTree {
        let mut engine = AppTree::new("Main Menu");
        let master = engine.master();
        for i in 0..child_count {
            engine
                .attach(master, NodeSpec::new(format!("item {i}")))
                .unwrap();
        }
        engine.bind_keys(KEYS);
        engine.enable(&mut io::sink()).unwrap();
        engine
    }

    fn feed(engine: &mut AppTree, keys: &str) {
        engine
            .run_script(keys.chars(), &mut io::sink())
            .unwrap();
    }

    #[test]
    fn enable_requires_key_bindings() {
        let mut engine = AppTree::new("menu");
        let err = engine.enable(&mut io::sink()).unwrap_err();
        assert!(matches!(err, TreeError::NotReady));
        assert!(!engine.is_enabled());
    }

    #[test]
    fn enable_rejects_zero_frame_height() {
        let mut engine = AppTree::with_config(
            "menu",
            EngineConfig {
                frame_height: 0,
                ..EngineConfig::default()
            },
        );
        engine.bind_keys(KEYS);
        let err = engine.enable(&mut io::sink()).unwrap_err();
        assert!(matches!(err, TreeError::NotReady));
    }

    #[test]
    fn enable_freezes_the_tree_and_draws_once() {
        let mut engine = AppTree::new("menu");
        let master = engine.master();
        engine.attach(master, NodeSpec::new("child")).unwrap();
        engine.bind_keys(KEYS);

        let mut out = Vec::new();
        engine.enable(&mut out).unwrap();
        assert!(engine.is_enabled());
        assert!(!out.is_empty());

        let err = engine.attach(master, NodeSpec::new("late")).unwrap_err();
        assert!(matches!(err, TreeError::AlreadyFrozen));
        assert_eq!(engine.tree().child_count(master), 1);

        let err = engine.enable(&mut io::sink()).unwrap_err();
        assert!(matches!(err, TreeError::AlreadyFrozen));
    }

    #[test]
    fn disabled_engine_reports_no_input() {
        let mut engine = AppTree::new("menu");
        engine.bind_keys(KEYS);
        let mut input = ScriptedInput::new(['d']);
        let outcome = engine
            .handle_input(&mut input, &mut io::sink())
            .unwrap();
        assert_eq!(outcome, InputOutcome::NoInput);
    }

    #[test]
    fn empty_poll_reports_no_input() {
        let mut engine = enabled_engine(2);
        let mut input = ScriptedInput::default();
        let outcome = engine
            .handle_input(&mut input, &mut io::sink())
            .unwrap();
        assert_eq!(outcome, InputOutcome::NoInput);
    }

    #[test]
    fn unbound_key_is_ignored_without_render() {
        let mut engine = enabled_engine(2);
        let renders_before = engine.metrics().renders;
        let mut input = ScriptedInput::new(['x']);
        let outcome = engine
            .handle_input(&mut input, &mut io::sink())
            .unwrap();
        assert_eq!(outcome, InputOutcome::Ignored);
        assert_eq!(engine.metrics().renders, renders_before);
    }

    #[test]
    fn down_and_up_wrap_cyclically() {
        let mut engine = enabled_engine(3);
        feed(&mut engine, "ddd");
        assert_eq!(engine.cursor(), 0);
        feed(&mut engine, "u");
        assert_eq!(engine.cursor(), 2);
    }

    #[test]
    fn spec_scroll_scenario_25_children_height_18() {
        let mut engine = AppTree::with_config(
            "menu",
            EngineConfig {
                frame_height: 18,
                ..EngineConfig::default()
            },
        );
        let master = engine.master();
        for i in 0..25 {
            engine
                .attach(master, NodeSpec::new(format!("item {i}")))
                .unwrap();
        }
        engine.bind_keys(KEYS);
        engine.enable(&mut io::sink()).unwrap();

        feed(&mut engine, &"d".repeat(24));
        assert_eq!(engine.cursor(), 24);
        assert_eq!(engine.frame_offset(), 7);

        feed(&mut engine, "d");
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.frame_offset(), 0);
    }

    #[test]
    fn select_enters_a_node_with_children() {
        let mut engine = AppTree::new("menu");
        let master = engine.master();
        let sub = engine.attach(master, NodeSpec::new("sub")).unwrap();
        engine.attach(sub, NodeSpec::new("leaf")).unwrap();
        engine.bind_keys(KEYS);
        engine.enable(&mut io::sink()).unwrap();

        feed(&mut engine, "s");
        assert_eq!(engine.current(), sub);
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.frame_offset(), 0);
    }

    #[test]
    fn back_restores_parent_but_not_cursor() {
        let mut engine = AppTree::new("menu");
        let master = engine.master();
        engine.attach(master, NodeSpec::new("first")).unwrap();
        let sub = engine.attach(master, NodeSpec::new("sub")).unwrap();
        engine.attach(sub, NodeSpec::new("leaf")).unwrap();
        engine.bind_keys(KEYS);
        engine.enable(&mut io::sink()).unwrap();

        // Cursor down to "sub", enter it, then leave again.
        feed(&mut engine, "ds");
        assert_eq!(engine.current(), sub);
        feed(&mut engine, "b");
        assert_eq!(engine.current(), master);
        // Cursor resets to the top; the prior position is not restored.
        assert_eq!(engine.cursor(), 0);
    }

    #[test]
    fn back_and_home_at_master_do_not_render() {
        let mut engine = enabled_engine(2);
        let renders_before = engine.metrics().renders;
        feed(&mut engine, "bh");
        assert_eq!(engine.metrics().renders, renders_before);
    }

    #[test]
    fn home_jumps_to_master_from_depth() {
        let mut engine = AppTree::new("menu");
        let master = engine.master();
        let a = engine.attach(master, NodeSpec::new("a")).unwrap();
        let b = engine.attach(a, NodeSpec::new("b")).unwrap();
        engine.attach(b, NodeSpec::new("c")).unwrap();
        engine.bind_keys(KEYS);
        engine.enable(&mut io::sink()).unwrap();

        feed(&mut engine, "ss");
        assert_eq!(engine.current(), b);
        feed(&mut engine, "h");
        assert_eq!(engine.current(), master);
        assert_eq!(engine.cursor(), 0);
    }

    #[test]
    fn activation_runs_action_then_selection_update() {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let seen = fired.clone();

        let mut engine = AppTree::new("menu");
        let master = engine.master();
        let radio = engine
            .attach(master, NodeSpec::new("radio").mode(Mode::SingleSelection))
            .unwrap();
        let first = engine
            .attach(
                radio,
                NodeSpec::new("first").action(move |ctx: &ActivationContext| {
                    seen.lock()
                        .unwrap()
                        .push((ctx.child_index, ctx.selected));
                }),
            )
            .unwrap();
        let second = engine.attach(radio, NodeSpec::new("second")).unwrap();
        engine.bind_keys(KEYS);
        engine.enable(&mut io::sink()).unwrap();

        // Enter the radio menu, select the first entry.
        feed(&mut engine, "ss");
        // The action observed the pre-update selected flag.
        assert_eq!(fired.lock().unwrap().as_slice(), &[(0, false)]);
        assert!(engine.tree().is_selected(first));
        assert!(!engine.tree().is_selected(second));
        assert_eq!(engine.metrics().activations, 1);
    }

    #[test]
    fn multi_selection_double_activation_restores_flag() {
        let mut engine = AppTree::new("menu");
        let master = engine.master();
        let boxes = engine
            .attach(master, NodeSpec::new("boxes").mode(Mode::MultiSelection))
            .unwrap();
        let item = engine
            .attach(
                boxes,
                NodeSpec::new("item").action(|_: &ActivationContext| {}),
            )
            .unwrap();
        engine.bind_keys(KEYS);
        engine.enable(&mut io::sink()).unwrap();

        feed(&mut engine, "s");
        feed(&mut engine, "s");
        assert!(engine.tree().is_selected(item));
        feed(&mut engine, "s");
        assert!(!engine.tree().is_selected(item));
    }

    #[test]
    fn leaf_without_action_still_renders() {
        let mut engine = enabled_engine(1);
        let renders_before = engine.metrics().renders;
        feed(&mut engine, "s");
        assert_eq!(engine.metrics().renders, renders_before + 1);
    }

    #[test]
    fn select_on_empty_menu_is_absorbed() {
        let mut engine = enabled_engine(0);
        let renders_before = engine.metrics().renders;
        feed(&mut engine, "s");
        assert_eq!(engine.cursor(), 0);
        assert_eq!(engine.metrics().renders, renders_before);
    }

    #[test]
    fn moves_on_empty_menu_keep_rendering_blank_frames() {
        let mut engine = enabled_engine(0);
        let mut out = Vec::new();
        let mut input = ScriptedInput::new(['d']);
        let outcome = engine.handle_input(&mut input, &mut out).unwrap();
        assert_eq!(outcome, InputOutcome::Handled(NavAction::Down));
        assert_eq!(engine.cursor(), 0);
        assert!(!out.is_empty());
    }

    #[test]
    fn logger_sees_navigation_events() {
        let sink = MemorySink::new();
        let mut engine = AppTree::with_config(
            "menu",
            EngineConfig {
                logger: Some(Logger::new(sink.clone())),
                ..EngineConfig::default()
            },
        );
        let master = engine.master();
        let sub = engine.attach(master, NodeSpec::new("sub")).unwrap();
        engine.attach(sub, NodeSpec::new("leaf")).unwrap();
        engine.bind_keys(KEYS);
        engine.enable(&mut io::sink()).unwrap();
        feed(&mut engine, "sx");

        let messages = sink.messages();
        assert!(messages.contains(&"engine_enabled".to_string()));
        assert!(messages.contains(&"node_entered".to_string()));
        assert!(messages.contains(&"key_ignored".to_string()));
        assert!(messages.contains(&"render_completed".to_string()));
    }

    #[test]
    fn metrics_track_inputs_and_navigations() {
        let mut engine = AppTree::new("menu");
        let master = engine.master();
        let sub = engine.attach(master, NodeSpec::new("sub")).unwrap();
        engine.attach(sub, NodeSpec::new("leaf")).unwrap();
        engine.bind_keys(KEYS);
        engine.enable(&mut io::sink()).unwrap();

        feed(&mut engine, "sdub");
        let snapshot = engine.metrics();
        assert_eq!(snapshot.inputs, 4);
        // "s" entered sub, "b" went back.
        assert_eq!(snapshot.navigations, 2);
        // enable + four handled keys.
        assert_eq!(snapshot.renders, 5);
    }
}
