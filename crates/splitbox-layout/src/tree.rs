// ABOUTME: Layout tree snapshots and the generic path-copying traversal.
// ABOUTME: Every mutation rebuilds only the root-to-target path and shares the rest.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ids::NodeId;
use crate::node::{Node, NodeKind, Padding, SplitAxis};

/// Ordered sequence of root nodes. Cloning is cheap: nodes are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    roots: Vec<Arc<Node>>,
}

/// Rectangle in normalized coordinates (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn full() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }

    /// Shrink by percentage padding; top/bottom against height, left/right against width
    fn inset(self, padding: &Padding) -> Self {
        let left = self.width * padding.left / 100.0;
        let right = self.width * padding.right / 100.0;
        let top = self.height * padding.top / 100.0;
        let bottom = self.height * padding.bottom / 100.0;
        Self {
            x: self.x + left,
            y: self.y + top,
            width: (self.width - left - right).max(0.0),
            height: (self.height - top - bottom).max(0.0),
        }
    }
}

impl Tree {
    pub fn new(roots: Vec<Arc<Node>>) -> Self {
        Self { roots }
    }

    /// The canonical starting layout: one blank leaf
    pub fn single(id: NodeId) -> Self {
        Self {
            roots: vec![Arc::new(Node::make_leaf(id, Padding::ZERO))],
        }
    }

    pub fn roots(&self) -> &[Arc<Node>] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order walk over every node of every root
    pub fn iter(&self) -> Nodes<'_> {
        Nodes {
            stack: self.roots.iter().rev().collect(),
        }
    }

    pub fn find_node(&self, id: &NodeId) -> Option<&Arc<Node>> {
        find_node(self, id)
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Arc<Node>> {
        self.iter().filter(|node| node.is_leaf())
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    pub fn ids(&self) -> Vec<NodeId> {
        self.iter().map(|node| node.id.clone()).collect()
    }

    /// True when both snapshots share every root, i.e. no edit happened between them
    pub fn same(&self, other: &Tree) -> bool {
        self.roots.len() == other.roots.len()
            && self
                .roots
                .iter()
                .zip(&other.roots)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }

    /// Content rectangle of every leaf after padding, split ratios and grid cells.
    /// Multiple roots share the area as equal-height bands.
    pub fn leaf_rects(&self) -> HashMap<NodeId, Rect> {
        let mut result = HashMap::new();
        let count = self.roots.len().max(1) as f32;
        for (index, root) in self.roots.iter().enumerate() {
            let band = Rect {
                x: 0.0,
                y: index as f32 / count,
                width: 1.0,
                height: 1.0 / count,
            };
            collect_rects(root, band, &mut result);
        }
        result
    }
}

pub struct Nodes<'a> {
    stack: Vec<&'a Arc<Node>>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Arc<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

fn collect_rects(node: &Node, rect: Rect, out: &mut HashMap<NodeId, Rect>) {
    let rect = rect.inset(&node.padding);
    match &node.kind {
        NodeKind::Leaf => {
            out.insert(node.id.clone(), rect);
        }
        NodeKind::Split(split) => {
            let ratio = split.ratio().get();
            let (first_rect, second_rect) = match split.axis() {
                SplitAxis::Vertical => (
                    Rect {
                        width: rect.width * ratio,
                        ..rect
                    },
                    Rect {
                        x: rect.x + rect.width * ratio,
                        width: rect.width * (1.0 - ratio),
                        ..rect
                    },
                ),
                SplitAxis::Horizontal => (
                    Rect {
                        height: rect.height * ratio,
                        ..rect
                    },
                    Rect {
                        y: rect.y + rect.height * ratio,
                        height: rect.height * (1.0 - ratio),
                        ..rect
                    },
                ),
            };
            collect_rects(split.first(), first_rect, out);
            collect_rects(split.second(), second_rect, out);
        }
        NodeKind::Grid(grid) => {
            let cell_width = rect.width / grid.columns() as f32;
            let cell_height = rect.height / grid.rows() as f32;
            // Row-major; cells removed by deletion leave the tail of the grid empty
            for (index, child) in grid.children().iter().enumerate() {
                let row = index as u32 / grid.columns();
                let column = index as u32 % grid.columns();
                let cell = Rect {
                    x: rect.x + column as f32 * cell_width,
                    y: rect.y + row as f32 * cell_height,
                    width: cell_width,
                    height: cell_height,
                };
                collect_rects(child, cell, out);
            }
        }
    }
}

/// What a `map_tree` visitor wants done with the node it was shown.
pub enum Visit {
    /// Leave this node as is and look at its children
    Descend,
    /// Swap this node (and its subtree) for another
    Replace(Arc<Node>),
    /// Drop this node from its parent
    Remove,
}

enum Outcome {
    Unchanged,
    Replaced(Arc<Node>),
    Removed,
}

/// Rebuild `tree` with the first edit the visitor asks for.
///
/// Nodes are offered in pre-order and the walk stops after the first
/// `Replace` or `Remove`. Removing a split's child promotes the sibling into
/// the split's place; removing a grid cell shrinks the grid, and a grid that
/// loses its last cell is removed in turn. Without any edit the input
/// snapshot is returned as is.
pub fn map_tree(tree: &Tree, mut visitor: impl FnMut(&Arc<Node>) -> Visit) -> Tree {
    for (index, root) in tree.roots.iter().enumerate() {
        match map_node(root, &mut visitor) {
            Outcome::Unchanged => continue,
            Outcome::Replaced(node) => {
                let mut roots = tree.roots.clone();
                roots[index] = node;
                return Tree { roots };
            }
            Outcome::Removed => {
                let mut roots = tree.roots.clone();
                roots.remove(index);
                return Tree { roots };
            }
        }
    }
    tree.clone()
}

fn map_node(node: &Arc<Node>, visitor: &mut impl FnMut(&Arc<Node>) -> Visit) -> Outcome {
    match visitor(node) {
        Visit::Replace(replacement) => return Outcome::Replaced(replacement),
        Visit::Remove => return Outcome::Removed,
        Visit::Descend => {}
    }

    match &node.kind {
        NodeKind::Leaf => Outcome::Unchanged,
        NodeKind::Split(split) => {
            for (index, child) in split.children().iter().enumerate() {
                match map_node(child, visitor) {
                    Outcome::Unchanged => continue,
                    Outcome::Replaced(new_child) => {
                        let kind = NodeKind::Split(split.with_child(index, new_child));
                        return Outcome::Replaced(Arc::new(node.with_kind(kind)));
                    }
                    // The sibling takes the split's place, keeping its own identity
                    Outcome::Removed => {
                        return Outcome::Replaced(Arc::clone(&split.children()[1 - index]));
                    }
                }
            }
            Outcome::Unchanged
        }
        NodeKind::Grid(grid) => {
            for (index, child) in grid.children().iter().enumerate() {
                match map_node(child, visitor) {
                    Outcome::Unchanged => continue,
                    Outcome::Replaced(new_child) => {
                        let kind = NodeKind::Grid(grid.with_child(index, new_child));
                        return Outcome::Replaced(Arc::new(node.with_kind(kind)));
                    }
                    Outcome::Removed => {
                        return match grid.without_child(index) {
                            Some(smaller) => {
                                Outcome::Replaced(Arc::new(node.with_kind(NodeKind::Grid(smaller))))
                            }
                            None => Outcome::Removed,
                        };
                    }
                }
            }
            Outcome::Unchanged
        }
    }
}

/// Rebuild `tree` with the node `id` replaced by whatever `edit` returns.
/// A missing id, or `edit` returning None, leaves the snapshot untouched.
pub fn update_node(tree: &Tree, id: &NodeId, edit: impl FnOnce(&Node) -> Option<Node>) -> Tree {
    let mut edit = Some(edit);
    map_tree(tree, |node| {
        if node.id != *id {
            return Visit::Descend;
        }
        match edit.take().and_then(|f| f(&**node)) {
            Some(replacement) => Visit::Replace(Arc::new(replacement)),
            None => Visit::Descend,
        }
    })
}

pub fn find_node<'a>(tree: &'a Tree, id: &NodeId) -> Option<&'a Arc<Node>> {
    tree.iter().find(|node| node.id == *id)
}
