// ABOUTME: Split-tree layout engine for nested panel layouts.
// ABOUTME: Node model, pure tree mutations, drag sessions, and the layout document codec.

pub mod codec;
pub mod drag;
pub mod ids;
pub mod mutate;
pub mod node;
pub mod state;
pub mod tree;

pub use codec::{CodecError, CodecOptions, Document, ImageEntry, NodeRecord};
pub use drag::{
    DragStart, LayoutSink, Modifiers, PaddingController, PaddingDragStart, PointerPosition,
    ResizeController,
};
pub use ids::{IdGenerator, NodeId, SequentialIds, UuidIds};
pub use mutate::{BackgroundUpdate, ChildStyle, PaddingEdit};
pub use node::{Grid, LayoutError, Node, NodeKind, Padding, PaddingSide, Ratio, Split, SplitAxis};
pub use state::LayoutState;
pub use tree::{find_node, map_tree, Rect, Tree, Visit};
