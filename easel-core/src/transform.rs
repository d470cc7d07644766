//! Transform sessions
//!
//! One continuous pointer drag against a shape or group: translate, scale
//! (single-axis, independent, or proportional), or rotate. A session is
//! created at drag start with a full snapshot of the target, and every
//! update is computed against that snapshot and the live pointer — never
//! against the previous update — so out-of-date moves cannot accumulate
//! error.
//!
//! The center-anchored scale path tracks a per-axis sign across updates so
//! that dragging through the anchor flips the tracked direction instead of
//! snapping; the negative-scale origin swap then lets the shape mirror
//! naturally when a drag passes through zero width or height. This
//! bookkeeping is deliberate; do not simplify it.

use crate::hit_test::TargetRef;
use crate::object::{CanvasItem, Handle, OriginX, OriginY};
use crate::pointer::PointerEvent;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// The kind of geometric edit a session performs, fixed at drag start
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformAction {
    /// Reposition the target
    Drag,
    /// Scale along the horizontal axis only
    ScaleX,
    /// Scale along the vertical axis only
    ScaleY,
    /// Scale both axes from a corner
    Scale,
    /// Rotate around the drag-start position
    Rotate,
}

/// Axis constraint for one scale update
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleBy {
    /// Both axes, each with its own ratio
    Both,
    /// Horizontal axis only
    X,
    /// Vertical axis only
    Y,
    /// Both axes with a single shared ratio, preserving aspect
    Equally,
}

/// Target state captured at drag start, for cancel and for ratio bases
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformSnapshot {
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub origin_x: OriginX,
    pub origin_y: OriginY,
}

/// State of one continuous pointer drag
///
/// At most one session is live per canvas; beginning a new one implicitly
/// ends the previous one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformSession {
    /// What is being transformed
    pub target: TargetRef,

    /// The edit this session performs
    pub action: TransformAction,

    /// Anchor origin pair currently in effect (swapped on flips)
    pub origin_x: OriginX,
    pub origin_y: OriginY,

    /// Pointer position at drag start
    pub ex: f64,
    pub ey: f64,

    /// Pointer-to-target offset at drag start, preserved while dragging
    pub offset_x: f64,
    pub offset_y: f64,

    /// Target position at drag start (the rotation anchor)
    pub left: f64,
    pub top: f64,

    /// Rotation in radians at drag start
    pub theta: f64,

    /// Target width in scaled surface units at drag start
    pub width: f64,

    /// Direction trackers for center-anchored scaling
    pub mouse_x_sign: f64,
    pub mouse_y_sign: f64,

    /// Snapshot for cancel and for proportional ratio bases
    pub original: TransformSnapshot,
}

/// Map a grabbed handle to the session action
fn action_for_handle(handle: Option<Handle>) -> TransformAction {
    match handle {
        None => TransformAction::Drag,
        Some(Handle::MidLeft) | Some(Handle::MidRight) => TransformAction::ScaleX,
        Some(Handle::MidTop) | Some(Handle::MidBottom) => TransformAction::ScaleY,
        Some(Handle::Rotation) => TransformAction::Rotate,
        Some(_) => TransformAction::Scale,
    }
}

/// Map a grabbed handle to the anchor origin pair
///
/// Grabbing a left-side handle anchors the opposite (right) edge, and
/// symmetrically for every other side; the rotation handle anchors the
/// center.
fn origins_for_handle(handle: Option<Handle>) -> (OriginX, OriginY) {
    let origin_x = match handle {
        Some(Handle::MidLeft) | Some(Handle::TopLeft) | Some(Handle::BottomLeft) => OriginX::Right,
        Some(Handle::MidRight) | Some(Handle::TopRight) | Some(Handle::BottomRight) => {
            OriginX::Left
        }
        _ => OriginX::Center,
    };
    let origin_y = match handle {
        Some(Handle::TopLeft) | Some(Handle::MidTop) | Some(Handle::TopRight) => OriginY::Bottom,
        Some(Handle::BottomLeft) | Some(Handle::MidBottom) | Some(Handle::BottomRight) => {
            OriginY::Top
        }
        _ => OriginY::Center,
    };
    match handle {
        Some(Handle::Rotation) => (OriginX::Center, OriginY::Center),
        _ => (origin_x, origin_y),
    }
}

/// Begin a session for `target`, choosing the action from the handle under
/// the pointer and capturing the reset snapshot
///
/// With the alternate-anchor modifier held, or a center-transform default
/// in effect, the anchor collapses to the center and the per-axis signs
/// are seeded from the side that was originally anchored, so growth stays
/// symmetric in the direction the drag started with.
pub fn setup(
    target: &dyn CanvasItem,
    target_ref: TargetRef,
    event: &PointerEvent,
    canvas_center_transform: bool,
) -> TransformSession {
    let pointer = event.point();
    let handle = target.find_handle(pointer);
    let action = action_for_handle(handle);
    let (origin_x, origin_y) = origins_for_handle(handle);

    let p = *target.placement();
    let mut session = TransformSession {
        target: target_ref,
        action,
        origin_x,
        origin_y,
        ex: pointer.x,
        ey: pointer.y,
        offset_x: pointer.x - p.left,
        offset_y: pointer.y - p.top,
        left: p.left,
        top: p.top,
        theta: p.angle.to_radians(),
        width: target.base_width() * p.scale_x,
        mouse_x_sign: 1.0,
        mouse_y_sign: 1.0,
        original: TransformSnapshot {
            left: p.left,
            top: p.top,
            scale_x: p.scale_x,
            scale_y: p.scale_y,
            origin_x: p.origin_x,
            origin_y: p.origin_y,
        },
    };

    if event.alt_key || canvas_center_transform || target.center_transform() {
        if session.origin_x != OriginX::Center {
            session.mouse_x_sign = if session.origin_x == OriginX::Right {
                -1.0
            } else {
                1.0
            };
        }
        if session.origin_y != OriginY::Center {
            session.mouse_y_sign = if session.origin_y == OriginY::Bottom {
                -1.0
            } else {
                1.0
            };
        }
        session.origin_x = OriginX::Center;
        session.origin_y = OriginY::Center;
    }

    session
}

/// Reposition the target so the drag-start pointer offset is preserved
///
/// Each axis is skipped independently when its movement lock is set.
pub fn translate(target: &mut dyn CanvasItem, session: &TransformSession, x: f64, y: f64) {
    let locks = target.locks();
    let p = target.placement_mut();
    if !locks.movement_x {
        p.left = x - session.offset_x;
    }
    if !locks.movement_y {
        p.top = y - session.offset_y;
    }
}

/// Scale the target toward the live pointer
///
/// Computes the anchor point in surface coordinates before any mutation,
/// converts the pointer into the target's local space relative to the
/// anchor, applies the far-edge negation or center doubling with sign
/// tracking, clamps away the padding, and turns the remaining offset into
/// scale factors against the stroke-inclusive base dimensions. A factor
/// crossing zero swaps the corresponding anchor side so continued dragging
/// mirrors the target instead of collapsing it; finally the target is
/// re-anchored so the original anchor point stays fixed on the surface.
pub fn scale(
    target: &mut dyn CanvasItem,
    session: &mut TransformSession,
    x: f64,
    y: f64,
    by: ScaleBy,
) {
    let locks = target.locks();
    if locks.scaling_x && locks.scaling_y {
        return;
    }

    let constraint =
        target.translate_to_origin_point(target.center_point(), session.origin_x, session.origin_y);
    let mut local = target.to_local_point(Point::new(x, y), session.origin_x, session.origin_y);

    match session.origin_x {
        OriginX::Right => local.x *= -1.0,
        OriginX::Center => {
            local.x *= session.mouse_x_sign * 2.0;
            if local.x < 0.0 {
                session.mouse_x_sign = -session.mouse_x_sign;
            }
        }
        OriginX::Left => {}
    }
    match session.origin_y {
        OriginY::Bottom => local.y *= -1.0,
        OriginY::Center => {
            local.y *= session.mouse_y_sign * 2.0;
            if local.y < 0.0 {
                session.mouse_y_sign = -session.mouse_y_sign;
            }
        }
        OriginY::Top => {}
    }

    let padding = target.padding();
    if local.x.abs() > padding {
        if local.x < 0.0 {
            local.x += padding;
        } else {
            local.x -= padding;
        }
    } else {
        local.x = 0.0;
    }
    if local.y.abs() > padding {
        if local.y < 0.0 {
            local.y += padding;
        } else {
            local.y -= padding;
        }
    } else {
        local.y = 0.0;
    }

    let base_width = target.base_width() + target.stroke_width();
    let base_height = target.base_height() + target.stroke_width();
    let mut new_scale_x = target.placement().scale_x;
    let mut new_scale_y = target.placement().scale_y;

    match by {
        ScaleBy::Equally if !locks.scaling_x && !locks.scaling_y => {
            let dist = local.y + local.x;
            let last_dist = base_height * session.original.scale_y
                + base_width * session.original.scale_x;
            // Ratios base on the drag-start scale, not the current one
            new_scale_x = session.original.scale_x * dist / last_dist;
            new_scale_y = session.original.scale_y * dist / last_dist;
            let p = target.placement_mut();
            if new_scale_x.is_finite() {
                p.scale_x = new_scale_x;
            }
            if new_scale_y.is_finite() {
                p.scale_y = new_scale_y;
            }
        }
        ScaleBy::Both => {
            new_scale_x = local.x / base_width;
            new_scale_y = local.y / base_height;
            let p = target.placement_mut();
            if !locks.scaling_x && new_scale_x.is_finite() {
                p.scale_x = new_scale_x;
            }
            if !locks.scaling_y && new_scale_y.is_finite() {
                p.scale_y = new_scale_y;
            }
        }
        ScaleBy::X if !locks.uni_scaling => {
            new_scale_x = local.x / base_width;
            if !locks.scaling_x && new_scale_x.is_finite() {
                target.placement_mut().scale_x = new_scale_x;
            }
        }
        ScaleBy::Y if !locks.uni_scaling => {
            new_scale_y = local.y / base_height;
            if !locks.scaling_y && new_scale_y.is_finite() {
                target.placement_mut().scale_y = new_scale_y;
            }
        }
        _ => {}
    }

    // A sign change means the drag passed through zero: swap the anchor
    // side so the shape mirrors instead of collapsing
    if new_scale_x < 0.0 {
        session.origin_x = session.origin_x.flipped();
    }
    if new_scale_y < 0.0 {
        session.origin_y = session.origin_y.flipped();
    }

    target.set_position_by_origin(constraint, session.origin_x, session.origin_y);
}

/// Rotate the target so the pointer's angular travel since drag start is
/// added to the drag-start angle
///
/// Angles are measured about the target's drag-start position, which keeps
/// rotation continuous however the pointer got to its current position.
pub fn rotate(target: &mut dyn CanvasItem, session: &TransformSession, x: f64, y: f64) {
    if target.locks().rotation {
        return;
    }
    let last_angle = (session.ey - session.top).atan2(session.ex - session.left);
    let cur_angle = (y - session.top).atan2(x - session.left);
    target.placement_mut().angle = (cur_angle - last_angle + session.theta).to_degrees();
}

/// Put the snapshot captured at drag start back on the target
pub fn restore(target: &mut dyn CanvasItem, session: &TransformSession) {
    let original = session.original;
    let p = target.placement_mut();
    p.left = original.left;
    p.top = original.top;
    p.scale_x = original.scale_x;
    p.scale_y = original.scale_y;
    p.origin_x = original.origin_x;
    p.origin_y = original.origin_y;
}
