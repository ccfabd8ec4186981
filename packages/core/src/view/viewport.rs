//! Viewport Controller
//!
//! Camera state for the rendering surface: an unbounded pan offset and a
//! bounded uniform scale. The camera is headless — it owns no scene and no
//! backend; the host wires pointer/wheel events into these operations and
//! applies [`Viewport::transform`] when painting.
//!
//! Zooming is cursor-anchored: the world point under the pointer stays
//! under the same screen point across scale changes, so repeated steps on
//! a fixed cursor never drift the focused content away.

use std::time::{Duration, Instant};

use kurbo::{Affine, Point, Vec2};

/// Lower scale bound.
pub const MIN_SCALE: f64 = 0.1;
/// Upper scale bound.
pub const MAX_SCALE: f64 = 5.0;
/// Per-step zoom factor.
pub const ZOOM_STEP: f64 = 1.1;

/// Direction of a wheel/zoom input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    last: Point,
}

/// Pan/zoom camera state.
///
/// # Examples
///
/// ```rust
/// use kurbo::Point;
/// use mindgraph_core::view::{Viewport, ZoomDirection};
///
/// let mut view = Viewport::new();
/// let pointer = Point::new(400.0, 300.0);
///
/// let before = view.screen_to_world(pointer);
/// view.zoom_at(pointer, ZoomDirection::In);
/// let after = view.screen_to_world(pointer);
///
/// assert!((before - after).hypot() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Viewport {
    scale: f64,
    offset: Vec2,
    drag: Option<DragState>,
    pending_reset: Option<Instant>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Identity camera: no pan, unit scale.
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            drag: None,
            pending_reset: None,
        }
    }

    /// Current uniform scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current pan offset, screen units.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Whether a drag-pan gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Apply one zoom step anchored at `pointer` (screen space).
    ///
    /// The scale is clamped to `[MIN_SCALE, MAX_SCALE]`; the offset is
    /// recomputed so the world point under the pointer does not move. A
    /// step that saturates the clamp leaves both scale and offset
    /// untouched.
    pub fn zoom_at(&mut self, pointer: Point, direction: ZoomDirection) {
        let factor = match direction {
            ZoomDirection::In => ZOOM_STEP,
            ZoomDirection::Out => 1.0 / ZOOM_STEP,
        };
        let next = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if next == self.scale {
            return;
        }

        let ratio = next / self.scale;
        self.offset = pointer.to_vec2() - (pointer.to_vec2() - self.offset) * ratio;
        self.scale = next;
    }

    /// Start a drag-pan gesture at `pointer` (screen space).
    ///
    /// The host calls this only for presses over empty canvas; presses on
    /// interactive nodes are its own concern.
    pub fn begin_drag(&mut self, pointer: Point) {
        self.drag = Some(DragState { last: pointer });
    }

    /// Continue a drag-pan gesture. No-op when no drag is in progress.
    pub fn drag_to(&mut self, pointer: Point) {
        if let Some(drag) = &mut self.drag {
            self.offset += pointer - drag.last;
            drag.last = pointer;
        }
    }

    /// End the drag-pan gesture (pointer release or leaving the surface).
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Return to the identity camera and cancel any pending deferred
    /// reset.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset = Vec2::ZERO;
        self.pending_reset = None;
    }

    /// Arm a single-shot deferred reset, `delay` from now.
    ///
    /// Used as the center/fit action after structural changes: the brief
    /// delay lets freshly rendered geometry settle before the camera
    /// snaps. Re-arming replaces any earlier deadline.
    pub fn schedule_reset(&mut self, delay: Duration) {
        self.pending_reset = Some(Instant::now() + delay);
    }

    /// Fire the deferred reset once its deadline has passed.
    ///
    /// The host polls this from its frame loop; returns `true` at most
    /// once per armed reset.
    pub fn poll_reset(&mut self, now: Instant) -> bool {
        match self.pending_reset {
            Some(deadline) if now >= deadline => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// World → screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Map a world-space point to screen space.
    pub fn world_to_screen(&self, point: Point) -> Point {
        self.transform() * point
    }

    /// Map a screen-space point to world space.
    pub fn screen_to_world(&self, point: Point) -> Point {
        ((point.to_vec2() - self.offset) / self.scale).to_point()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_identity() {
        let view = Viewport::new();
        assert_eq!(view.scale(), 1.0);
        assert_eq!(view.offset(), Vec2::ZERO);
        assert!(!view.is_dragging());
    }

    #[test]
    fn test_zoom_scale_is_clamped() {
        let mut view = Viewport::new();
        let pointer = Point::new(100.0, 100.0);

        for _ in 0..100 {
            view.zoom_at(pointer, ZoomDirection::In);
        }
        assert_eq!(view.scale(), MAX_SCALE);

        for _ in 0..200 {
            view.zoom_at(pointer, ZoomDirection::Out);
        }
        assert_eq!(view.scale(), MIN_SCALE);
    }

    #[test]
    fn test_zoom_keeps_pointer_world_position() {
        let mut view = Viewport::new();
        view.begin_drag(Point::new(0.0, 0.0));
        view.drag_to(Point::new(37.0, -12.0));
        view.end_drag();
        view.zoom_at(Point::new(50.0, 80.0), ZoomDirection::In);

        let pointer = Point::new(321.5, 173.25);
        for direction in [
            ZoomDirection::In,
            ZoomDirection::In,
            ZoomDirection::Out,
            ZoomDirection::In,
        ] {
            let before = view.screen_to_world(pointer);
            view.zoom_at(pointer, direction);
            let after = view.screen_to_world(pointer);
            assert!(
                (before - after).hypot() < 1e-9,
                "world point drifted: {:?} -> {:?}",
                before,
                after
            );
        }
    }

    #[test]
    fn test_saturated_zoom_leaves_offset_alone() {
        let mut view = Viewport::new();
        let pointer = Point::new(100.0, 100.0);
        for _ in 0..100 {
            view.zoom_at(pointer, ZoomDirection::In);
        }
        let offset = view.offset();

        view.zoom_at(Point::new(640.0, 360.0), ZoomDirection::In);
        assert_eq!(view.offset(), offset);
        assert_eq!(view.scale(), MAX_SCALE);
    }

    #[test]
    fn test_drag_accumulates_deltas() {
        let mut view = Viewport::new();
        view.begin_drag(Point::new(10.0, 10.0));
        assert!(view.is_dragging());

        view.drag_to(Point::new(15.0, 17.0));
        assert_eq!(view.offset(), Vec2::new(5.0, 7.0));

        view.drag_to(Point::new(16.0, 19.0));
        assert_eq!(view.offset(), Vec2::new(6.0, 9.0));

        view.end_drag();
        assert!(!view.is_dragging());
    }

    #[test]
    fn test_move_without_drag_is_noop() {
        let mut view = Viewport::new();
        view.drag_to(Point::new(50.0, 50.0));
        assert_eq!(view.offset(), Vec2::ZERO);
    }

    #[test]
    fn test_reset_restores_identity() {
        let mut view = Viewport::new();
        view.zoom_at(Point::new(10.0, 10.0), ZoomDirection::In);
        view.begin_drag(Point::new(0.0, 0.0));
        view.drag_to(Point::new(100.0, 0.0));

        view.reset();
        assert_eq!(view.scale(), 1.0);
        assert_eq!(view.offset(), Vec2::ZERO);
    }

    #[test]
    fn test_deferred_reset_fires_once() {
        let mut view = Viewport::new();
        view.zoom_at(Point::new(10.0, 10.0), ZoomDirection::In);

        let armed_at = Instant::now();
        view.schedule_reset(Duration::from_millis(10));

        // deadline not reached yet
        assert!(!view.poll_reset(armed_at));
        assert_ne!(view.scale(), 1.0);

        // well past the deadline: fires exactly once
        let later = armed_at + Duration::from_secs(10);
        assert!(view.poll_reset(later));
        assert_eq!(view.scale(), 1.0);
        assert!(!view.poll_reset(later));
    }

    #[test]
    fn test_transform_round_trip() {
        let mut view = Viewport::new();
        view.begin_drag(Point::new(0.0, 0.0));
        view.drag_to(Point::new(-40.0, 25.0));
        view.end_drag();
        view.zoom_at(Point::new(200.0, 150.0), ZoomDirection::Out);

        let world = Point::new(12.5, -7.25);
        let round_tripped = view.screen_to_world(view.world_to_screen(world));
        assert!((world - round_tripped).hypot() < 1e-9);
    }
}
