//! Tree-based menu navigation engine for character displays.
//!
//! `apptree` drives hierarchical menus on serial terminals and character
//! LCDs: the application describes a tree of selectable items during a build
//! phase, then feeds single-character key events to the engine, which
//! manages cursor position, viewport scrolling, selection semantics and
//! re-rendering. The engine is synchronous and single-threaded; a caller
//! owned poll loop (or the bundled [`TermDriver`]) is the only thread of
//! control.
//!
//! ```no_run
//! use apptree::{AppTree, KeyBindings, Mode, NodeSpec, TermDriver};
//!
//! # fn main() -> apptree::Result<()> {
//! let mut engine = AppTree::new("Main Menu");
//! let master = engine.master();
//! let display = engine.attach(
//!     master,
//!     NodeSpec::new("Display").info("Screen settings").mode(Mode::SingleSelection),
//! )?;
//! engine.attach(display, NodeSpec::new("Bright"))?;
//! engine.attach(display, NodeSpec::new("Dim").selected(true))?;
//! engine.bind_keys(KeyBindings::default());
//! TermDriver::new(engine).run().expect("terminal loop");
//! # Ok(())
//! # }
//! ```

pub mod driver;
pub mod engine;
pub mod error;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod render;
pub mod selection;
pub mod tree;
pub mod viewport;
pub mod width;

pub use driver::{DriverResult, TermDriver, TermDriverError};
pub use engine::{AppTree, EngineConfig, InputOutcome};
pub use error::{Result, TreeError};
pub use input::{InputSource, KeyBindings, NavAction, ScriptedInput};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{MetricSnapshot, NavMetrics};
pub use render::{MenuRenderer, MenuView, RendererSettings, ViewEntry};
pub use selection::apply_selection;
pub use tree::{ActivationContext, MenuAction, MenuTree, Mode, NodeId, NodeSpec};
pub use viewport::{DEFAULT_FRAME_HEIGHT, Frame};
pub use width::{display_width, truncate_to_width};
