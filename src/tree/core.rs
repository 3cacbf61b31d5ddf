use crate::error::{Result, TreeError};

/// Per-node policy governing how children track their `selected` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Children carry no selection state.
    Simple,
    /// At most one child is selected at a time (radio buttons).
    SingleSelection,
    /// Each child toggles independently (checkboxes).
    MultiSelection,
}

/// Stable handle to a node inside one [`MenuTree`].
///
/// Ids are arena indices minted by the owning tree; handing an id to a
/// different tree is rejected during attachment where detectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Read-only context handed to a [`MenuAction`] when a leaf is chosen.
///
/// Carries owned copies of the relevant state so actions never borrow the
/// tree; mutation happens only through the engine's own selection update
/// that follows the action.
#[derive(Debug, Clone)]
pub struct ActivationContext {
    /// Node whose children are on screen.
    pub parent: NodeId,
    /// Index of the activated child within the parent's children.
    pub child_index: usize,
    pub parent_title: String,
    pub title: String,
    /// Selected flag of the child before the selection update runs.
    pub selected: bool,
}

/// Capability bound to a leaf node, invoked when the node is chosen.
pub trait MenuAction {
    fn name(&self) -> &str {
        "menu_action"
    }

    fn activate(&mut self, ctx: &ActivationContext);
}

impl<F> MenuAction for F
where
    F: FnMut(&ActivationContext),
{
    fn activate(&mut self, ctx: &ActivationContext) {
        self(ctx)
    }
}

/// Blueprint for one node, consumed by [`MenuTree::attach`].
pub struct NodeSpec {
    title: String,
    info: String,
    mode: Mode,
    selected: bool,
    action: Option<Box<dyn MenuAction>>,
}

impl NodeSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            info: String::new(),
            mode: Mode::Simple,
            selected: false,
            action: None,
        }
    }

    pub fn info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Mark the node as initially selected. Meaningful only under a
    /// non-Simple parent.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn action<A>(mut self, action: A) -> Self
    where
        A: MenuAction + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }
}

struct Node {
    title: String,
    info: String,
    mode: Mode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    terminal: bool,
    selected: bool,
    action: Option<Box<dyn MenuAction>>,
}

/// Arena-backed menu tree with a single master root.
///
/// The tree is mutable during the build phase and frozen by the engine at
/// enable time; every mutation after [`MenuTree::freeze`] fails with
/// [`TreeError::AlreadyFrozen`].
pub struct MenuTree {
    nodes: Vec<Node>,
    master: NodeId,
    frozen: bool,
}

impl MenuTree {
    /// Create a tree holding only the master root: `Simple` mode, no parent,
    /// never terminal.
    pub fn new(title: impl Into<String>) -> Self {
        let master = Node {
            title: title.into(),
            info: String::new(),
            mode: Mode::Simple,
            parent: None,
            children: Vec::new(),
            terminal: false,
            selected: false,
            action: None,
        };
        Self {
            nodes: vec![master],
            master: NodeId(0),
            frozen: false,
        }
    }

    pub fn master(&self) -> NodeId {
        self.master
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freeze the topology. Called by the engine when it is enabled.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Create a node from `spec` and append it to `parent`'s children.
    ///
    /// Attachment is atomic: on any error neither the parent nor the tree is
    /// mutated. Children of a non-Simple parent are terminal and can never
    /// take children of their own.
    pub fn attach(&mut self, parent: NodeId, spec: NodeSpec) -> Result<NodeId> {
        if self.frozen {
            return Err(TreeError::AlreadyFrozen);
        }

        let parent_node = self
            .nodes
            .get(parent.index())
            .ok_or(TreeError::ForeignSubtree)?;
        if parent_node.terminal {
            return Err(TreeError::TerminalParent);
        }
        self.ensure_attached(parent)?;

        let terminal = parent_node.mode != Mode::Simple;

        // Reserve both insertions up front so a failed allocation leaves the
        // tree untouched.
        self.nodes
            .try_reserve(1)
            .map_err(|_| TreeError::Allocation)?;
        self.nodes[parent.index()]
            .children
            .try_reserve(1)
            .map_err(|_| TreeError::Allocation)?;

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            title: spec.title,
            info: spec.info,
            mode: spec.mode,
            parent: Some(parent),
            children: Vec::new(),
            terminal,
            selected: spec.selected,
            action: spec.action,
        });
        self.nodes[parent.index()].children.push(id);

        Ok(id)
    }

    /// Walk `id`'s ancestor chain and require it to end at the master.
    ///
    /// Inside one arena this cannot fail for ids the tree minted itself; it
    /// guards against handles smuggled in from another build.
    fn ensure_attached(&self, id: NodeId) -> Result<()> {
        let mut node = id;
        loop {
            let data = self
                .nodes
                .get(node.index())
                .ok_or(TreeError::ForeignSubtree)?;
            match data.parent {
                Some(parent) => node = parent,
                None => break,
            }
        }
        if node == self.master {
            Ok(())
        } else {
            Err(TreeError::ForeignSubtree)
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn title(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].title
    }

    pub fn info(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].info
    }

    pub fn mode(&self, id: NodeId) -> Mode {
        self.nodes[id.index()].mode
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.nodes[id.index()].children.len()
    }

    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.nodes[id.index()].terminal
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.nodes[id.index()].selected
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        !self.nodes[id.index()].children.is_empty()
    }

    pub(crate) fn set_selected(&mut self, id: NodeId, selected: bool) {
        self.nodes[id.index()].selected = selected;
    }

    pub(crate) fn toggle_selected(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.index()];
        node.selected = !node.selected;
    }

    pub(crate) fn action_mut(&mut self, id: NodeId) -> Option<&mut (dyn MenuAction + 'static)> {
        self.nodes[id.index()].action.as_deref_mut()
    }

    pub(crate) fn has_action(&self, id: NodeId) -> bool {
        self.nodes[id.index()].action.is_some()
    }
}
