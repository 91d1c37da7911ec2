// ABOUTME: Shell-owned container for the current layout snapshot.
// ABOUTME: The only writer of the tree; every edit goes through the pure mutators.

use crate::drag::LayoutSink;
use crate::ids::{IdGenerator, NodeId, SequentialIds};
use crate::mutate::{self, BackgroundUpdate, PaddingEdit};
use crate::node::SplitAxis;
use crate::tree::Tree;

#[derive(Debug, Clone)]
pub struct LayoutState {
    tree: Tree,
    ids: SequentialIds,
}

impl LayoutState {
    /// One blank leaf
    pub fn new() -> Self {
        let mut ids = SequentialIds::new();
        let tree = Tree::single(ids.next_id());
        Self { tree, ids }
    }

    /// Adopt a tree (typically a loaded one); new ids continue past its own
    pub fn from_tree(tree: Tree) -> Self {
        let ids = SequentialIds::after(&tree);
        Self { tree, ids }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Cheap copy of the current snapshot for renderers or saving
    pub fn snapshot(&self) -> Tree {
        self.tree.clone()
    }

    /// Swap in a whole new tree, e.g. once a layout file finished loading
    pub fn replace(&mut self, tree: Tree) {
        if tree.is_empty() {
            tracing::warn!("ignoring empty layout");
            return;
        }
        tracing::info!(
            roots = tree.roots().len(),
            leaves = tree.leaf_count(),
            "layout replaced"
        );
        *self = Self::from_tree(tree);
    }

    pub fn reset(&mut self) {
        let fresh = self.ids.next_id();
        self.tree = Tree::single(fresh);
        tracing::info!("layout reset");
    }

    fn apply(&mut self, operation: &str, next: Tree) -> bool {
        if next.same(&self.tree) {
            tracing::debug!(operation, "no-op");
            return false;
        }
        self.tree = next;
        true
    }

    pub fn split(&mut self, id: &NodeId, axis: SplitAxis) -> bool {
        let next = mutate::split(&self.tree, id, axis, &mut self.ids);
        self.apply("split", next)
    }

    pub fn split_grid(&mut self, id: &NodeId, rows: u32, columns: u32) -> bool {
        let next = mutate::split_grid(&self.tree, id, rows, columns, &mut self.ids);
        self.apply("split_grid", next)
    }

    pub fn resize(&mut self, child_id: &NodeId, ratio: f32) -> bool {
        let next = mutate::resize(&self.tree, child_id, ratio);
        self.apply("resize", next)
    }

    pub fn merge(&mut self, id: &NodeId) -> bool {
        let next = mutate::merge(&self.tree, id);
        self.apply("merge", next)
    }

    /// Whether a delete action should be offered at all
    pub fn can_delete(&self) -> bool {
        self.tree.leaf_count() > 1
    }

    /// Delete a leaf. Refused while it is the only leaf left.
    pub fn delete(&mut self, id: &NodeId) -> bool {
        if !self.can_delete() {
            tracing::debug!(%id, "refusing to delete the only leaf");
            return false;
        }
        let next = mutate::delete(&self.tree, id, &mut self.ids);
        self.apply("delete", next)
    }

    pub fn set_background(&mut self, id: &NodeId, update: &BackgroundUpdate) -> bool {
        let next = mutate::set_background(&self.tree, id, update);
        self.apply("set_background", next)
    }

    pub fn set_padding(&mut self, id: &NodeId, edit: PaddingEdit, value: f32) -> bool {
        let next = mutate::set_padding(&self.tree, id, edit, value);
        self.apply("set_padding", next)
    }
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutSink for LayoutState {
    fn resize(&mut self, child_id: &NodeId, ratio: f32) {
        LayoutState::resize(self, child_id, ratio);
    }

    fn set_padding(&mut self, id: &NodeId, edit: PaddingEdit, value: f32) {
        LayoutState::set_padding(self, id, edit, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::{DragStart, PointerPosition, ResizeController};
    use crate::node::{NodeKind, PaddingSide};
    use splitbox_core::ResizeSettings;

    fn first_leaf(state: &LayoutState) -> NodeId {
        state.tree().leaves().next().unwrap().id.clone()
    }

    #[test]
    fn new_state_has_one_leaf() {
        let state = LayoutState::new();
        assert_eq!(state.tree().leaf_count(), 1);
        assert!(!state.can_delete());
    }

    #[test]
    fn only_leaf_cannot_be_deleted() {
        let mut state = LayoutState::new();
        let only = first_leaf(&state);
        let before = state.snapshot();
        assert!(!state.delete(&only));
        assert!(state.tree().same(&before));
    }

    #[test]
    fn edits_replace_snapshot_and_keep_history_intact() {
        let mut state = LayoutState::new();
        let root = first_leaf(&state);
        let before = state.snapshot();

        assert!(state.split(&root, SplitAxis::Vertical));
        assert_eq!(state.tree().leaf_count(), 2);
        assert_eq!(before.leaf_count(), 1);
        assert!(!state.split(&root, SplitAxis::Vertical));

        let victim = first_leaf(&state);
        assert!(state.can_delete());
        assert!(state.delete(&victim));
        assert_eq!(state.tree().leaf_count(), 1);
    }

    #[test]
    fn replace_continues_numbering() {
        let mut state = LayoutState::new();
        let root = first_leaf(&state);
        state.split(&root, SplitAxis::Horizontal);
        let saved = state.snapshot();

        let mut other = LayoutState::new();
        other.replace(saved);
        let leaf = first_leaf(&other);
        other.split(&leaf, SplitAxis::Vertical);

        let ids = other.tree().ids();
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn loaded_top_numbered_id_still_splits_uniquely() {
        let json = format!(
            r#"{{"version":"1.0","boxes":[{{"id":"box-{}","kind":"leaf"}}]}}"#,
            u64::MAX
        );
        let mut state = LayoutState::from_tree(crate::codec::parse(&json).unwrap());
        let leaf = first_leaf(&state);
        assert!(state.split(&leaf, SplitAxis::Vertical));

        let ids = state.tree().ids();
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn drag_streams_into_state() {
        let mut state = LayoutState::new();
        let root = first_leaf(&state);
        state.split(&root, SplitAxis::Vertical);
        let first = first_leaf(&state);

        let mut drag = ResizeController::new(&ResizeSettings {
            divider_margin: 0.0,
            padding_sensitivity: 1.0,
        });
        drag.begin(
            DragStart {
                target: first,
                axis: SplitAxis::Vertical,
                pointer: PointerPosition::new(50.0, 0.0),
                start_ratio: 0.5,
            },
            |_| 100.0,
        );
        drag.on_move(PointerPosition::new(70.0, 0.0), &mut state);
        drag.end();

        let NodeKind::Split(split) = &state.tree().roots()[0].kind else {
            panic!("expected split");
        };
        assert!((split.ratio().get() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn padding_sink_applies_edits() {
        let mut state = LayoutState::new();
        let leaf = first_leaf(&state);
        LayoutSink::set_padding(&mut state, &leaf, PaddingEdit::Side(PaddingSide::Top), 20.0);
        assert_eq!(state.tree().find_node(&leaf).unwrap().padding.top, 20.0);
    }
}
