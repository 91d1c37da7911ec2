// ABOUTME: Recursive node model for the split-tree layout.
// ABOUTME: Leaves, two-way ratio splits, and rows x columns grids with per-node styling.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ids::NodeId;

pub const MIN_RATIO: f32 = 0.1;
pub const MAX_RATIO: f32 = 0.9;
pub const MAX_PADDING: f32 = 50.0;
pub const MIN_GRID_DIM: u32 = 1;
pub const MAX_GRID_DIM: u32 = 5;

/// Orientation of a binary split.
///
/// `Vertical` places the children side by side behind a vertical divider, so
/// the ratio divides the width. `Horizontal` stacks them behind a horizontal
/// divider and the ratio divides the height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitAxis {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaddingSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl PaddingSide {
    pub const ALL: [PaddingSide; 4] = [
        PaddingSide::Top,
        PaddingSide::Right,
        PaddingSide::Bottom,
        PaddingSide::Left,
    ];

    /// The axis a drag on this edge's handle moves along
    pub fn drag_axis(self) -> SplitAxis {
        match self {
            PaddingSide::Left | PaddingSide::Right => SplitAxis::Vertical,
            PaddingSide::Top | PaddingSide::Bottom => SplitAxis::Horizontal,
        }
    }
}

/// Clamp a padding percentage into `[0, 50]`
pub fn clamp_padding(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, MAX_PADDING)
    }
}

/// Clamp a requested grid dimension into `[1, 5]`
pub fn clamp_grid_dim(value: u32) -> u32 {
    value.clamp(MIN_GRID_DIM, MAX_GRID_DIM)
}

/// Edge padding in percent of the region
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn uniform(value: f32) -> Self {
        let value = clamp_padding(value);
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn get(&self, side: PaddingSide) -> f32 {
        match side {
            PaddingSide::Top => self.top,
            PaddingSide::Right => self.right,
            PaddingSide::Bottom => self.bottom,
            PaddingSide::Left => self.left,
        }
    }

    /// Copy with one side replaced (clamped)
    pub fn with(mut self, side: PaddingSide, value: f32) -> Self {
        let value = clamp_padding(value);
        match side {
            PaddingSide::Top => self.top = value,
            PaddingSide::Right => self.right = value,
            PaddingSide::Bottom => self.bottom = value,
            PaddingSide::Left => self.left = value,
        }
        self
    }

    pub fn clamped(self) -> Self {
        Self {
            top: clamp_padding(self.top),
            right: clamp_padding(self.right),
            bottom: clamp_padding(self.bottom),
            left: clamp_padding(self.left),
        }
    }
}

/// First child's share of a split axis, always within `[0.1, 0.9]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ratio(f32);

impl Ratio {
    pub const HALF: Self = Self(0.5);

    /// Clamps into range; NaN falls back to an even split
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            Self::HALF
        } else {
            Self(value.clamp(MIN_RATIO, MAX_RATIO))
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }

    /// Second child's share
    pub fn complement(self) -> f32 {
        1.0 - self.0
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Self::HALF
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Grid size {rows}x{columns} is outside 1..=5")]
    InvalidGridSize { rows: u32, columns: u32 },

    #[error("Grid expects {expected} children, got {actual}")]
    GridChildCount { expected: usize, actual: usize },
}

/// Two-way split; the child count is fixed by the type.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    axis: SplitAxis,
    ratio: Ratio,
    children: [Arc<Node>; 2],
}

impl Split {
    pub fn axis(&self) -> SplitAxis {
        self.axis
    }

    pub fn ratio(&self) -> Ratio {
        self.ratio
    }

    pub fn first(&self) -> &Arc<Node> {
        &self.children[0]
    }

    pub fn second(&self) -> &Arc<Node> {
        &self.children[1]
    }

    pub fn children(&self) -> &[Arc<Node>] {
        &self.children
    }

    pub(crate) fn with_ratio(&self, ratio: Ratio) -> Self {
        Self {
            ratio,
            ..self.clone()
        }
    }

    pub(crate) fn with_child(&self, index: usize, child: Arc<Node>) -> Self {
        let mut children = self.children.clone();
        children[index] = child;
        Self {
            children,
            ..self.clone()
        }
    }
}

/// Uniform grid. Holds `rows * columns` children when created; deleting a
/// cell shrinks the child list and the dimensions become advisory.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: u32,
    columns: u32,
    children: Vec<Arc<Node>>,
}

impl Grid {
    /// Grid that may have lost cells to deletion (`1..=rows*columns` children)
    pub(crate) fn restore(
        rows: u32,
        columns: u32,
        children: Vec<Arc<Node>>,
    ) -> Result<Self, LayoutError> {
        check_grid_size(rows, columns)?;
        let capacity = (rows * columns) as usize;
        if children.is_empty() || children.len() > capacity {
            return Err(LayoutError::GridChildCount {
                expected: capacity,
                actual: children.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            children,
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cells the grid was created with
    pub fn capacity(&self) -> usize {
        (self.rows * self.columns) as usize
    }

    pub fn children(&self) -> &[Arc<Node>] {
        &self.children
    }

    pub(crate) fn with_child(&self, index: usize, child: Arc<Node>) -> Self {
        let mut children = self.children.clone();
        children[index] = child;
        Self {
            children,
            ..self.clone()
        }
    }

    /// Grid minus one cell, or None when that was the last one
    pub(crate) fn without_child(&self, index: usize) -> Option<Self> {
        if self.children.len() <= 1 {
            return None;
        }
        let mut children = self.children.clone();
        children.remove(index);
        Some(Self {
            children,
            ..self.clone()
        })
    }
}

fn check_grid_size(rows: u32, columns: u32) -> Result<(), LayoutError> {
    let valid = MIN_GRID_DIM..=MAX_GRID_DIM;
    if valid.contains(&rows) && valid.contains(&columns) {
        Ok(())
    } else {
        Err(LayoutError::InvalidGridSize { rows, columns })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Leaf,
    Split(Split),
    Grid(Grid),
}

/// One region of the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub padding: Padding,
    pub background_color: Option<String>,
    /// Inline payload (usually a data URI). Shared so that rebuilding a path
    /// never copies image bytes.
    pub background_image: Option<Arc<str>>,
    pub kind: NodeKind,
}

impl Node {
    pub fn make_leaf(id: NodeId, padding: Padding) -> Self {
        Self {
            id,
            padding: padding.clamped(),
            background_color: None,
            background_image: None,
            kind: NodeKind::Leaf,
        }
    }

    /// Out-of-range ratios are clamped rather than rejected
    pub fn make_binary_split(
        id: NodeId,
        axis: SplitAxis,
        first: Arc<Node>,
        second: Arc<Node>,
        ratio: f32,
    ) -> Self {
        Self {
            id,
            padding: Padding::ZERO,
            background_color: None,
            background_image: None,
            kind: NodeKind::Split(Split {
                axis,
                ratio: Ratio::new(ratio),
                children: [first, second],
            }),
        }
    }

    pub fn make_grid(
        id: NodeId,
        rows: u32,
        columns: u32,
        children: Vec<Arc<Node>>,
    ) -> Result<Self, LayoutError> {
        check_grid_size(rows, columns)?;
        let expected = (rows * columns) as usize;
        if children.len() != expected {
            return Err(LayoutError::GridChildCount {
                expected,
                actual: children.len(),
            });
        }
        Ok(Self {
            id,
            padding: Padding::ZERO,
            background_color: None,
            background_image: None,
            kind: NodeKind::Grid(Grid {
                rows,
                columns,
                children,
            }),
        })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    pub fn children(&self) -> &[Arc<Node>] {
        match &self.kind {
            NodeKind::Leaf => &[],
            NodeKind::Split(split) => split.children(),
            NodeKind::Grid(grid) => grid.children(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Leaf => "leaf",
            NodeKind::Split(_) => "binary-split",
            NodeKind::Grid(_) => "grid",
        }
    }

    /// Same id and styling, different shape
    pub(crate) fn with_kind(&self, kind: NodeKind) -> Self {
        Self {
            id: self.id.clone(),
            padding: self.padding,
            background_color: self.background_color.clone(),
            background_image: self.background_image.clone(),
            kind,
        }
    }

    /// Fresh leaf carrying this node's padding and background
    pub(crate) fn restyled_leaf(&self, id: NodeId) -> Self {
        Self {
            id,
            padding: self.padding,
            background_color: self.background_color.clone(),
            background_image: self.background_image.clone(),
            kind: NodeKind::Leaf,
        }
    }
}
