//! Selection predicates and marquee scanning
//!
//! Pure decision logic for the selection manager: when a click must clear
//! the current selection, and which shapes a drag rectangle captures.

use crate::group::Group;
use crate::hit_test::TargetRef;
use crate::object::CanvasItem;
use crate::pointer::PointerEvent;
use crate::scene::Scene;
use crate::shape::Shape;
use kurbo::Point;
use uuid::Uuid;

/// Whether a pointer-down on `target` must clear the current selection
///
/// True when nothing was hit; when a shape outside the active group was
/// hit without the multi-select modifier; or when the hit shape is not
/// selectable.
pub fn should_clear_selection(
    event: &PointerEvent,
    target: Option<&Shape>,
    target_is_group: bool,
    active_group: Option<&Group>,
) -> bool {
    if target_is_group {
        return false;
    }
    let Some(shape) = target else {
        return true;
    };
    if !shape.selectable {
        return true;
    }
    if let Some(group) = active_group {
        if !group.contains(shape.id) && !event.shift_key {
            return true;
        }
    }
    false
}

/// Corner-order-independent (top-left, bottom-right) pair of a drag
/// rectangle
pub fn rect_corners(a: Point, b: Point) -> (Point, Point) {
    (
        Point::new(a.x.min(b.x), a.y.min(b.y)),
        Point::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

/// Selectable shapes captured by the marquee rectangle, in z-order
///
/// A shape is captured when its footprint intersects the rectangle, lies
/// fully inside it, or contains either rectangle corner (which covers the
/// rectangle-inside-shape case).
pub fn find_enclosed(scene: &Scene, corner_a: Point, corner_b: Point) -> Vec<Uuid> {
    let (tl, br) = rect_corners(corner_a, corner_b);
    let mut captured = Vec::new();
    for shape in scene.shapes() {
        if !shape.selectable {
            continue;
        }
        if shape.intersects_rect(tl, br)
            || shape.is_contained_in_rect(tl, br)
            || shape.contains_point(tl)
            || shape.contains_point(br)
        {
            captured.push(shape.id);
        }
    }
    captured
}

/// Resolve a target reference to its shape, when it is one
pub fn as_shape(scene: &Scene, target: Option<TargetRef>) -> Option<&Shape> {
    match target {
        Some(TargetRef::Shape(id)) => scene.shape(id),
        _ => None,
    }
}
