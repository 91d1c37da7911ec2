// ABOUTME: Node identity and id generation.
// ABOUTME: Fresh ids come from an explicit generator, never from parent id concatenation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tree::Tree;

/// Identifier of a node, unique across every root and depth of a tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Source of fresh node ids for split, grid, and reset operations.
pub trait IdGenerator {
    fn next_id(&mut self) -> NodeId;
}

const SEQUENTIAL_PREFIX: &str = "box-";

/// Monotonic generator yielding `box-1`, `box-2`, ...
///
/// Once the numbering is exhausted every further id is a v4 UUID, which can
/// never collide with a `box-N` id.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: Option<u64>,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self { next: Some(1) }
    }

    /// Continue numbering past every `box-N` id already present in `tree`
    pub fn after(tree: &Tree) -> Self {
        let highest = tree
            .iter()
            .filter_map(|node| {
                node.id
                    .as_str()
                    .strip_prefix(SEQUENTIAL_PREFIX)
                    .and_then(|n| n.parse::<u64>().ok())
            })
            .max()
            .unwrap_or(0);
        Self {
            next: highest.checked_add(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> NodeId {
        match self.next {
            Some(n) => {
                self.next = n.checked_add(1);
                NodeId(format!("{SEQUENTIAL_PREFIX}{n}"))
            }
            None => UuidIds.next_id(),
        }
    }
}

/// Random v4 UUID ids, for layouts merged from independent sources
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> NodeId {
        NodeId(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, Padding, SplitAxis};
    use std::sync::Arc;

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id().as_str(), "box-1");
        assert_eq!(ids.next_id().as_str(), "box-2");
    }

    #[test]
    fn after_skips_existing_numbers() {
        let first = Node::make_leaf(NodeId::from("box-7"), Padding::ZERO);
        let second = Node::make_leaf(NodeId::from("custom"), Padding::ZERO);
        let split = Node::make_binary_split(
            NodeId::from("box-2"),
            SplitAxis::Vertical,
            Arc::new(first),
            Arc::new(second),
            0.5,
        );
        let tree = Tree::new(vec![Arc::new(split)]);

        let mut ids = SequentialIds::after(&tree);
        assert_eq!(ids.next_id().as_str(), "box-8");
    }

    #[test]
    fn exhausted_numbering_switches_to_uuids() {
        let top = format!("box-{}", u64::MAX);
        let tree = Tree::single(NodeId::from(top.as_str()));

        let mut ids = SequentialIds::after(&tree);
        let first = ids.next_id();
        let second = ids.next_id();
        assert_ne!(first.as_str(), top);
        assert_ne!(first, second);
        assert!(Uuid::parse_str(first.as_str()).is_ok());
    }

    #[test]
    fn last_number_is_handed_out_once() {
        let below = format!("box-{}", u64::MAX - 1);
        let tree = Tree::single(NodeId::from(below.as_str()));

        let mut ids = SequentialIds::after(&tree);
        assert_eq!(ids.next_id().to_string(), format!("box-{}", u64::MAX));
        assert!(Uuid::parse_str(ids.next_id().as_str()).is_ok());
    }

    #[test]
    fn uuid_ids_are_distinct() {
        let mut ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }
}
