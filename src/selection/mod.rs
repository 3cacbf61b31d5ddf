//! Activation-time selection updates.
//!
//! Invoked by the engine right after a terminal node's action runs and
//! before the re-render, never during plain navigation.

use crate::tree::{MenuTree, Mode, NodeId};

/// Apply `parent`'s selection policy after its child at `child_index` was
/// activated.
///
/// `Simple` tracks nothing. `SingleSelection` marks exactly the activated
/// child and clears every sibling. `MultiSelection` toggles the activated
/// child and leaves siblings alone.
pub fn apply_selection(tree: &mut MenuTree, parent: NodeId, child_index: usize) {
    let children: Vec<NodeId> = tree.children_of(parent).to_vec();
    let Some(&target) = children.get(child_index) else {
        return;
    };

    match tree.mode(parent) {
        Mode::Simple => {}
        Mode::SingleSelection => {
            for (index, child) in children.into_iter().enumerate() {
                tree.set_selected(child, index == child_index);
            }
        }
        Mode::MultiSelection => {
            tree.toggle_selected(target);
        }
    }
}
