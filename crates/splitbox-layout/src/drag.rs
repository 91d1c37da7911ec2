// ABOUTME: Pointer drag sessions for split dividers and padding handles.
// ABOUTME: Each move event turns into a resize or padding call on the layout.

use splitbox_core::ResizeSettings;

use crate::ids::NodeId;
use crate::mutate::PaddingEdit;
use crate::node::{clamp_padding, PaddingSide, Ratio, SplitAxis};

/// Receiver of the edits a drag produces, usually the layout state.
pub trait LayoutSink {
    /// Set the ratio of the split whose first child is `child_id`
    fn resize(&mut self, child_id: &NodeId, ratio: f32);

    fn set_padding(&mut self, id: &NodeId, edit: PaddingEdit, value: f32);
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Coordinate a drag along `axis` measures: x across a vertical divider,
    /// y across a horizontal one
    pub fn along(&self, axis: SplitAxis) -> f32 {
        match axis {
            SplitAxis::Vertical => self.x,
            SplitAxis::Horizontal => self.y,
        }
    }
}

/// Pointer-down on a divider
#[derive(Debug, Clone, PartialEq)]
pub struct DragStart {
    /// First child of the split being resized
    pub target: NodeId,
    pub axis: SplitAxis,
    pub pointer: PointerPosition,
    /// Ratio in effect when the drag began
    pub start_ratio: f32,
}

#[derive(Debug, Clone, PartialEq)]
enum ResizeState {
    Idle,
    Dragging {
        target: NodeId,
        axis: SplitAxis,
        origin: f32,
        usable_extent: f32,
        start_ratio: f32,
    },
}

/// Divider drag session: `Idle -> Dragging -> Idle`.
///
/// Every move while dragging applies a new ratio straight away; releasing the
/// pointer commits nothing extra.
#[derive(Debug, Clone)]
pub struct ResizeController {
    state: ResizeState,
    divider_margin: f32,
}

impl ResizeController {
    pub fn new(settings: &ResizeSettings) -> Self {
        Self {
            state: ResizeState::Idle,
            divider_margin: settings.divider_margin,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ResizeState::Dragging { .. })
    }

    /// Start a drag. `extent` measures the split container along the axis
    /// once, at drag start. Returns false if a drag is already running.
    pub fn begin(&mut self, start: DragStart, extent: impl FnOnce(SplitAxis) -> f32) -> bool {
        if self.is_dragging() {
            tracing::debug!(target_node = %start.target, "resize drag already in progress");
            return false;
        }
        let usable_extent = extent(start.axis) - 2.0 * self.divider_margin;
        tracing::debug!(
            target_node = %start.target,
            axis = ?start.axis,
            usable_extent,
            start_ratio = start.start_ratio,
            "resize drag started"
        );
        self.state = ResizeState::Dragging {
            origin: start.pointer.along(start.axis),
            target: start.target,
            axis: start.axis,
            usable_extent,
            start_ratio: start.start_ratio,
        };
        true
    }

    /// Apply one pointer move, returning the ratio sent to `sink`
    pub fn on_move(&mut self, pointer: PointerPosition, sink: &mut impl LayoutSink) -> Option<Ratio> {
        let ResizeState::Dragging {
            target,
            axis,
            origin,
            usable_extent,
            start_ratio,
        } = &self.state
        else {
            return None;
        };
        if *usable_extent <= 0.0 {
            return None;
        }
        let delta = pointer.along(*axis) - origin;
        let ratio = Ratio::new(start_ratio + delta / usable_extent);
        sink.resize(target, ratio.get());
        Some(ratio)
    }

    /// Pointer released. Returns whether a drag was running.
    pub fn end(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        if was_dragging {
            tracing::debug!("resize drag ended");
        }
        self.state = ResizeState::Idle;
        was_dragging
    }
}

/// Keys held during a padding drag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Apply the dragged value to all four sides
    pub all_sides: bool,
}

/// Pointer-down on a padding handle
#[derive(Debug, Clone, PartialEq)]
pub struct PaddingDragStart {
    pub target: NodeId,
    pub side: PaddingSide,
    pub pointer: PointerPosition,
    /// Padding percentage of `side` when the drag began
    pub start_value: f32,
}

#[derive(Debug, Clone, PartialEq)]
enum PaddingState {
    Idle,
    Dragging {
        target: NodeId,
        side: PaddingSide,
        origin: f32,
        extent: f32,
        start_value: f32,
    },
}

/// Padding handle drag session, same lifecycle as [`ResizeController`].
#[derive(Debug, Clone)]
pub struct PaddingController {
    state: PaddingState,
    sensitivity: f32,
}

impl PaddingController {
    pub fn new(settings: &ResizeSettings) -> Self {
        Self {
            state: PaddingState::Idle,
            sensitivity: settings.padding_sensitivity,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, PaddingState::Dragging { .. })
    }

    /// Start dragging one edge. `extent` measures the region along the
    /// edge's drag axis.
    pub fn begin(&mut self, start: PaddingDragStart, extent: impl FnOnce(SplitAxis) -> f32) -> bool {
        if self.is_dragging() {
            tracing::debug!(target_node = %start.target, "padding drag already in progress");
            return false;
        }
        let axis = start.side.drag_axis();
        tracing::debug!(target_node = %start.target, side = ?start.side, "padding drag started");
        self.state = PaddingState::Dragging {
            origin: start.pointer.along(axis),
            extent: extent(axis),
            target: start.target,
            side: start.side,
            start_value: start.start_value,
        };
        true
    }

    /// Apply one pointer move, returning the padding value sent to `sink`.
    ///
    /// Moving an edge inward grows its padding: pointer deltas are negated for
    /// the right and bottom edges.
    pub fn on_move(
        &mut self,
        pointer: PointerPosition,
        modifiers: Modifiers,
        sink: &mut impl LayoutSink,
    ) -> Option<f32> {
        let PaddingState::Dragging {
            target,
            side,
            origin,
            extent,
            start_value,
        } = &self.state
        else {
            return None;
        };
        if *extent <= 0.0 {
            return None;
        }
        let sign = match side {
            PaddingSide::Top | PaddingSide::Left => 1.0,
            PaddingSide::Right | PaddingSide::Bottom => -1.0,
        };
        let delta = pointer.along(side.drag_axis()) - origin;
        let value = clamp_padding(start_value + sign * delta / extent * 100.0 * self.sensitivity);
        let edit = if modifiers.all_sides {
            PaddingEdit::All
        } else {
            PaddingEdit::Side(*side)
        };
        sink.set_padding(target, edit, value);
        Some(value)
    }

    pub fn end(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        if was_dragging {
            tracing::debug!("padding drag ended");
        }
        self.state = PaddingState::Idle;
        was_dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        ratios: Vec<(NodeId, f32)>,
        paddings: Vec<(NodeId, PaddingEdit, f32)>,
    }

    impl LayoutSink for Recorder {
        fn resize(&mut self, child_id: &NodeId, ratio: f32) {
            self.ratios.push((child_id.clone(), ratio));
        }

        fn set_padding(&mut self, id: &NodeId, edit: PaddingEdit, value: f32) {
            self.paddings.push((id.clone(), edit, value));
        }
    }

    fn settings() -> ResizeSettings {
        ResizeSettings {
            divider_margin: 10.0,
            padding_sensitivity: 0.5,
        }
    }

    fn start(axis: SplitAxis, x: f32, y: f32) -> DragStart {
        DragStart {
            target: NodeId::from("first"),
            axis,
            pointer: PointerPosition::new(x, y),
            start_ratio: 0.5,
        }
    }

    #[test]
    fn moves_stream_ratio_updates() {
        let mut controller = ResizeController::new(&settings());
        let mut sink = Recorder::default();
        // 220 wide container, 200 usable after the margins
        assert!(controller.begin(start(SplitAxis::Vertical, 100.0, 0.0), |_| 220.0));

        let r = controller.on_move(PointerPosition::new(120.0, 50.0), &mut sink).unwrap();
        assert!((r.get() - 0.6).abs() < 1e-6);
        let r = controller.on_move(PointerPosition::new(60.0, 50.0), &mut sink).unwrap();
        assert!((r.get() - 0.3).abs() < 1e-6);

        assert_eq!(sink.ratios.len(), 2);
        assert!(sink.ratios.iter().all(|(id, _)| id.as_str() == "first"));
    }

    #[test]
    fn horizontal_axis_reads_y_and_clamps() {
        let mut controller = ResizeController::new(&settings());
        let mut sink = Recorder::default();
        controller.begin(start(SplitAxis::Horizontal, 0.0, 100.0), |axis| {
            assert_eq!(axis, SplitAxis::Horizontal);
            120.0
        });

        // x movement is ignored on a horizontal divider
        let r = controller.on_move(PointerPosition::new(500.0, 100.0), &mut sink).unwrap();
        assert_eq!(r, Ratio::HALF);
        let r = controller.on_move(PointerPosition::new(0.0, 1000.0), &mut sink).unwrap();
        assert_eq!(r.get(), 0.9);
    }

    #[test]
    fn end_returns_to_idle() {
        let mut controller = ResizeController::new(&settings());
        let mut sink = Recorder::default();
        assert!(controller.on_move(PointerPosition::default(), &mut sink).is_none());

        controller.begin(start(SplitAxis::Vertical, 0.0, 0.0), |_| 100.0);
        assert!(controller.is_dragging());
        assert!(!controller.begin(start(SplitAxis::Vertical, 0.0, 0.0), |_| 100.0));
        assert!(controller.end());
        assert!(!controller.end());
        assert!(controller.on_move(PointerPosition::new(10.0, 0.0), &mut sink).is_none());
        assert!(sink.ratios.is_empty());
    }

    #[test]
    fn degenerate_extent_ignores_moves() {
        let mut controller = ResizeController::new(&settings());
        let mut sink = Recorder::default();
        controller.begin(start(SplitAxis::Vertical, 0.0, 0.0), |_| 15.0);
        assert!(controller.on_move(PointerPosition::new(5.0, 0.0), &mut sink).is_none());
        assert!(sink.ratios.is_empty());
    }

    #[test]
    fn padding_drag_scales_and_inverts() {
        let mut controller = PaddingController::new(&settings());
        let mut sink = Recorder::default();
        controller.begin(
            PaddingDragStart {
                target: NodeId::from("leaf"),
                side: PaddingSide::Right,
                pointer: PointerPosition::new(400.0, 0.0),
                start_value: 10.0,
            },
            |axis| {
                assert_eq!(axis, SplitAxis::Vertical);
                400.0
            },
        );

        // 40 units left on a 400 wide region: 10% of the width, halved
        let value = controller
            .on_move(PointerPosition::new(360.0, 0.0), Modifiers::default(), &mut sink)
            .unwrap();
        assert!((value - 15.0).abs() < 1e-4);

        let value = controller
            .on_move(
                PointerPosition::new(0.0, 0.0),
                Modifiers { all_sides: true },
                &mut sink,
            )
            .unwrap();
        assert_eq!(value, 50.0);

        assert_eq!(sink.paddings[0].1, PaddingEdit::Side(PaddingSide::Right));
        assert_eq!(sink.paddings[1].1, PaddingEdit::All);
        assert!(controller.end());
    }

    #[test]
    fn padding_never_goes_negative() {
        let mut controller = PaddingController::new(&settings());
        let mut sink = Recorder::default();
        controller.begin(
            PaddingDragStart {
                target: NodeId::from("leaf"),
                side: PaddingSide::Top,
                pointer: PointerPosition::new(0.0, 50.0),
                start_value: 2.0,
            },
            |_| 100.0,
        );
        let value = controller
            .on_move(PointerPosition::new(0.0, 0.0), Modifiers::default(), &mut sink)
            .unwrap();
        assert_eq!(value, 0.0);
    }
}
