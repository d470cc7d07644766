//! Ad-hoc selection groups
//!
//! A group is a transient aggregate over scene shapes that satisfies the
//! same geometric contract as a single shape, so a transform session can
//! drive it unchanged. While grouped, member coordinates are stored
//! relative to the group's top-left; tearing the group down applies the
//! group's accumulated transform and releases the members back to
//! independent, absolute placement.

use crate::object::{rotate_point, CanvasItem, LockFlags, Placement, DEFAULT_CORNER_SIZE};
use crate::scene::Scene;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ordered aggregate of scene shapes acting as one transform target
///
/// Member order is z-order at grouping time. A group never holds exactly
/// one member; its owner collapses it to a plain active object first.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier
    pub id: Uuid,

    members: Vec<Uuid>,

    /// Position, scale, rotation, and origin pair of the aggregate
    pub placement: Placement,

    /// Aggregate unscaled width
    pub width: f64,

    /// Aggregate unscaled height
    pub height: f64,

    /// Per-axis constraint flags (groups start unconstrained)
    #[serde(default)]
    pub locks: LockFlags,

    /// Whether the group currently carries selection decorations
    #[serde(default)]
    pub active: bool,
}

impl Group {
    /// Build a group over the given members, in the given order
    ///
    /// Computes the aggregate bounds from the members' absolute placements
    /// and switches the members to group-relative coordinates.
    pub fn new(members: Vec<Uuid>, scene: &mut Scene) -> Self {
        let mut group = Self {
            id: Uuid::new_v4(),
            members,
            placement: Placement::default(),
            width: 0.0,
            height: 0.0,
            locks: LockFlags::default(),
            active: false,
        };
        group.update_bounds(scene);
        log::debug!("group {} formed over {} members", group.id, group.len());
        group
    }

    /// Member ids in z-order at grouping time
    pub fn members(&self) -> &[Uuid] {
        &self.members
    }

    /// Whether the given shape belongs to this group
    pub fn contains(&self, id: Uuid) -> bool {
        self.members.contains(&id)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group holds no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Add a member and recompute the aggregate bounds
    ///
    /// The group's accumulated transform is applied to the existing members
    /// first, then the whole set is re-aggregated under an identity
    /// transform.
    pub fn add_with_update(&mut self, id: Uuid, scene: &mut Scene) {
        if self.contains(id) {
            return;
        }
        self.restore_members(scene);
        self.members.push(id);
        self.update_bounds(scene);
    }

    /// Remove a member, releasing it to absolute placement, and recompute
    /// the aggregate bounds over the rest
    pub fn remove_with_update(&mut self, id: Uuid, scene: &mut Scene) {
        self.restore_members(scene);
        self.members.retain(|m| *m != id);
        self.update_bounds(scene);
    }

    /// Tear the group down, applying its transform to every member
    pub fn destroy(mut self, scene: &mut Scene) {
        log::debug!("group {} destroyed", self.id);
        self.restore_members(scene);
    }

    /// Apply the group's current transform to the members, making their
    /// placements absolute again
    fn restore_members(&mut self, scene: &mut Scene) {
        let p = self.placement;
        let angle = p.angle.to_radians();
        for id in &self.members {
            if let Some(shape) = scene.shape_mut(*id) {
                let scaled = Point::new(
                    shape.placement.left * p.scale_x,
                    shape.placement.top * p.scale_y,
                );
                let pos = rotate_point(scaled, Point::ZERO, angle);
                shape.placement.left = p.left + pos.x;
                shape.placement.top = p.top + pos.y;
                shape.placement.scale_x *= p.scale_x;
                shape.placement.scale_y *= p.scale_y;
                shape.placement.angle += p.angle;
            }
        }
        self.placement = Placement {
            left: p.left,
            top: p.top,
            ..Placement::default()
        };
    }

    /// Recompute the aggregate bounds from the members' absolute
    /// placements and re-relativize the members
    ///
    /// Resets the group transform to identity; callers restore members
    /// first if a transform had accumulated.
    fn update_bounds(&mut self, scene: &mut Scene) {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for id in &self.members {
            if let Some(shape) = scene.shape(*id) {
                let bounds = shape.bounding_rect();
                min_x = min_x.min(bounds.x0);
                min_y = min_y.min(bounds.y0);
                max_x = max_x.max(bounds.x1);
                max_y = max_y.max(bounds.y1);
            }
        }
        if !min_x.is_finite() {
            self.placement = Placement::default();
            self.width = 0.0;
            self.height = 0.0;
            return;
        }
        self.placement = Placement {
            left: min_x,
            top: min_y,
            ..Placement::default()
        };
        self.width = max_x - min_x;
        self.height = max_y - min_y;
        for id in &self.members {
            if let Some(shape) = scene.shape_mut(*id) {
                shape.placement.left -= min_x;
                shape.placement.top -= min_y;
            }
        }
    }
}

impl CanvasItem for Group {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn base_width(&self) -> f64 {
        self.width
    }

    fn base_height(&self) -> f64 {
        self.height
    }

    fn stroke_width(&self) -> f64 {
        0.0
    }

    fn padding(&self) -> f64 {
        0.0
    }

    fn corner_size(&self) -> f64 {
        DEFAULT_CORNER_SIZE
    }

    fn locks(&self) -> LockFlags {
        self.locks
    }

    fn is_selectable(&self) -> bool {
        true
    }

    fn is_visible(&self) -> bool {
        true
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn center_transform(&self) -> bool {
        false
    }
}

/// Order shape ids by their current z-order in the scene, lowest first
pub fn in_z_order(scene: &Scene, ids: &[Uuid]) -> Vec<Uuid> {
    let mut ordered: Vec<Uuid> = ids.to_vec();
    ordered.sort_by_key(|id| scene.index_of(*id).unwrap_or(usize::MAX));
    ordered
}
