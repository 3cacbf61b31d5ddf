use thiserror::Error;

/// Unified result type for the apptree crate.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors surfaced by the menu engine.
///
/// Build-phase errors are returned synchronously and never leave the tree
/// partially mutated. Runtime navigation absorbs edge positions and unbound
/// keys as no-ops instead of erroring; an empty poll is reported through
/// [`crate::engine::InputOutcome::NoInput`], not through this enum.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("tree is frozen; nodes cannot be attached after enable")]
    AlreadyFrozen,
    #[error("parent is a terminal node and cannot take children")]
    TerminalParent,
    #[error("parent node is not attached to this tree's master")]
    ForeignSubtree,
    #[error("node allocation failed")]
    Allocation,
    #[error("engine is missing key bindings or a usable frame height")]
    NotReady,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
