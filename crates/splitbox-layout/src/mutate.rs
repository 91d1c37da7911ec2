// ABOUTME: Pure structural and style operations over layout trees.
// ABOUTME: Each call returns a new snapshot; unknown ids and wrong node kinds are no-ops.

use std::sync::Arc;

use crate::ids::{IdGenerator, NodeId};
use crate::node::{clamp_grid_dim, Node, NodeKind, Padding, PaddingSide, Ratio, SplitAxis};
use crate::tree::{map_tree, update_node, Tree, Visit};

/// How the two leaves created by a split are styled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildStyle {
    /// Copy the split leaf's padding, color and image
    #[default]
    Inherit,
    /// Start both halves blank
    Blank,
}

/// Partial background change. `None` keeps a field, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackgroundUpdate {
    pub color: Option<Option<String>>,
    pub image: Option<Option<Arc<str>>>,
}

impl BackgroundUpdate {
    pub fn color(color: Option<String>) -> Self {
        Self {
            color: Some(color),
            image: None,
        }
    }

    pub fn image(image: Option<Arc<str>>) -> Self {
        Self {
            color: None,
            image: Some(image),
        }
    }
}

/// Which padding sides a padding change touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingEdit {
    Side(PaddingSide),
    All,
}

/// Split a leaf in two along `axis`; both halves inherit the leaf's style
pub fn split(tree: &Tree, id: &NodeId, axis: SplitAxis, ids: &mut impl IdGenerator) -> Tree {
    split_with(tree, id, axis, ChildStyle::Inherit, ids)
}

/// Replace a leaf with an even split of two fresh leaves.
///
/// The split keeps the leaf's id and takes blank styling; the leaf's padding
/// and background move to the children unless `style` is `Blank`.
pub fn split_with(
    tree: &Tree,
    id: &NodeId,
    axis: SplitAxis,
    style: ChildStyle,
    ids: &mut impl IdGenerator,
) -> Tree {
    update_node(tree, id, |target| {
        if !target.is_leaf() {
            tracing::debug!(%id, kind = target.kind_name(), "split ignored: not a leaf");
            return None;
        }
        let (first, second) = match style {
            ChildStyle::Inherit => (
                target.restyled_leaf(ids.next_id()),
                target.restyled_leaf(ids.next_id()),
            ),
            ChildStyle::Blank => (
                Node::make_leaf(ids.next_id(), Padding::ZERO),
                Node::make_leaf(ids.next_id(), Padding::ZERO),
            ),
        };
        tracing::debug!(%id, ?axis, first = %first.id, second = %second.id, "split leaf");
        Some(Node::make_binary_split(
            target.id.clone(),
            axis,
            Arc::new(first),
            Arc::new(second),
            Ratio::HALF.get(),
        ))
    })
}

/// Replace a leaf with a `rows x columns` grid of blank leaves.
///
/// Dimensions are clamped to `[1, 5]`. The grid keeps the leaf's id, padding
/// and background; the cells start blank.
pub fn split_grid(
    tree: &Tree,
    id: &NodeId,
    rows: u32,
    columns: u32,
    ids: &mut impl IdGenerator,
) -> Tree {
    let rows = clamp_grid_dim(rows);
    let columns = clamp_grid_dim(columns);
    update_node(tree, id, |target| {
        if !target.is_leaf() {
            tracing::debug!(%id, kind = target.kind_name(), "grid ignored: not a leaf");
            return None;
        }
        let cells = (0..rows * columns)
            .map(|_| Arc::new(Node::make_leaf(ids.next_id(), Padding::ZERO)))
            .collect();
        match Node::make_grid(target.id.clone(), rows, columns, cells) {
            Ok(grid) => {
                tracing::debug!(%id, rows, columns, "split leaf into grid");
                Some(Node {
                    padding: target.padding,
                    background_color: target.background_color.clone(),
                    background_image: target.background_image.clone(),
                    ..grid
                })
            }
            Err(e) => {
                tracing::warn!(%id, "grid split rejected: {}", e);
                None
            }
        }
    })
}

/// Set the ratio of the split whose *first* child is `child_id`.
///
/// Splits are addressed through their first child, never the second.
pub fn resize(tree: &Tree, child_id: &NodeId, ratio: f32) -> Tree {
    let ratio = Ratio::new(ratio);
    map_tree(tree, |node| match &node.kind {
        NodeKind::Split(split) if split.first().id == *child_id => {
            if split.ratio() == ratio {
                // Already there; keep the snapshot
                Visit::Descend
            } else {
                let kind = NodeKind::Split(split.with_ratio(ratio));
                Visit::Replace(Arc::new(node.with_kind(kind)))
            }
        }
        _ => Visit::Descend,
    })
}

/// Collapse a split or grid back into a blank leaf with the same id
pub fn merge(tree: &Tree, id: &NodeId) -> Tree {
    update_node(tree, id, |target| {
        if target.is_leaf() {
            tracing::debug!(%id, "merge ignored: already a leaf");
            return None;
        }
        tracing::debug!(%id, dropped = target.children().len(), "merged {}", target.kind_name());
        Some(Node::make_leaf(target.id.clone(), Padding::ZERO))
    })
}

/// Remove a leaf.
///
/// A split left with one child is replaced by that child; a grid just loses
/// the cell. Removing the last leaf of the whole tree yields a fresh
/// single-leaf tree instead of an empty one.
pub fn delete(tree: &Tree, id: &NodeId, ids: &mut impl IdGenerator) -> Tree {
    let mut found = false;
    let next = map_tree(tree, |node| {
        if node.id != *id {
            Visit::Descend
        } else if node.is_leaf() {
            found = true;
            Visit::Remove
        } else {
            tracing::debug!(%id, kind = node.kind_name(), "delete ignored: not a leaf");
            Visit::Descend
        }
    });
    if !found {
        return next;
    }
    if next.is_empty() {
        let fresh = ids.next_id();
        tracing::debug!(%id, %fresh, "deleted last leaf, resetting layout");
        return Tree::single(fresh);
    }
    tracing::debug!(%id, "deleted leaf");
    next
}

/// Change a leaf's background color and/or image
pub fn set_background(tree: &Tree, id: &NodeId, update: &BackgroundUpdate) -> Tree {
    update_node(tree, id, |target| {
        if !target.is_leaf() {
            return None;
        }
        let mut node = target.clone();
        if let Some(color) = &update.color {
            node.background_color = color.clone();
        }
        if let Some(image) = &update.image {
            node.background_image = image.clone();
        }
        Some(node)
    })
}

/// Change one padding side of a leaf, or all four at once; clamped to `[0, 50]`
pub fn set_padding(tree: &Tree, id: &NodeId, edit: PaddingEdit, value: f32) -> Tree {
    update_node(tree, id, |target| {
        if !target.is_leaf() {
            return None;
        }
        let mut node = target.clone();
        node.padding = match edit {
            PaddingEdit::Side(side) => node.padding.with(side, value),
            PaddingEdit::All => Padding::uniform(value),
        };
        Some(node)
    })
}
