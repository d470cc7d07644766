//! Shared contract for transformable canvas objects
//!
//! Shapes and groups satisfy one capability set — placement, dimensions,
//! constraint flags, and the origin/handle geometry derived from them — so
//! the hit-tester and the transform session can treat either uniformly.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Side length of a resize handle's hit box, in surface pixels
pub const DEFAULT_CORNER_SIZE: f64 = 12.0;

/// Distance of the rotation handle above the top edge, in surface pixels
pub const ROTATION_HANDLE_OFFSET: f64 = 40.0;

/// Horizontal origin anchor of an object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OriginX {
    Left,
    Center,
    Right,
}

/// Vertical origin anchor of an object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OriginY {
    Top,
    Center,
    Bottom,
}

impl OriginX {
    /// The anchor on the opposite side, used when a scale passes through zero
    pub fn flipped(self) -> Self {
        match self {
            OriginX::Left => OriginX::Right,
            OriginX::Center => OriginX::Center,
            OriginX::Right => OriginX::Left,
        }
    }
}

impl OriginY {
    /// The anchor on the opposite side, used when a scale passes through zero
    pub fn flipped(self) -> Self {
        match self {
            OriginY::Top => OriginY::Bottom,
            OriginY::Center => OriginY::Center,
            OriginY::Bottom => OriginY::Top,
        }
    }
}

/// The grab points on an object's selection decoration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    MidLeft,
    MidTop,
    MidRight,
    MidBottom,
    Rotation,
}

impl Handle {
    /// All handles, in the order they are probed during a handle hit test
    pub const ALL: [Handle; 9] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomRight,
        Handle::BottomLeft,
        Handle::MidLeft,
        Handle::MidTop,
        Handle::MidRight,
        Handle::MidBottom,
        Handle::Rotation,
    ];
}

/// Per-axis constraint flags of an object
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LockFlags {
    /// Horizontal movement forbidden
    pub movement_x: bool,
    /// Vertical movement forbidden
    pub movement_y: bool,
    /// Horizontal scaling forbidden
    pub scaling_x: bool,
    /// Vertical scaling forbidden
    pub scaling_y: bool,
    /// Rotation forbidden
    pub rotation: bool,
    /// Non-uniform (single-axis) scaling forbidden
    pub uni_scaling: bool,
}

/// Position, scale, rotation, and origin pair of an object
///
/// `left`/`top` denote the point of the object named by the origin pair;
/// the angle is in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub angle: f64,
    pub origin_x: OriginX,
    pub origin_y: OriginY,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            origin_x: OriginX::Left,
            origin_y: OriginY::Top,
        }
    }
}

/// Rotate `point` around `origin` by `angle` radians
pub fn rotate_point(point: Point, origin: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    let v = point - origin;
    Point::new(
        origin.x + v.x * cos - v.y * sin,
        origin.y + v.x * sin + v.y * cos,
    )
}

/// Whether segments `a1`-`a2` and `b1`-`b2` properly intersect
fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if d == 0.0 {
        return false;
    }
    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / d;
    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / d;
    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

/// Capability set shared by shapes and groups
///
/// Implementors provide placement, base dimensions, and constraint access;
/// all origin and handle geometry is derived here so both variants behave
/// identically under hit testing and transforms.
pub trait CanvasItem {
    /// Current placement
    fn placement(&self) -> &Placement;

    /// Mutable placement, for in-place transform updates
    fn placement_mut(&mut self) -> &mut Placement;

    /// Unscaled width
    fn base_width(&self) -> f64;

    /// Unscaled height
    fn base_height(&self) -> f64;

    /// Stroke width included in scale-ratio dimensions
    fn stroke_width(&self) -> f64;

    /// Padding between the geometry and its selection decoration
    fn padding(&self) -> f64;

    /// Side length of this object's handle hit boxes
    fn corner_size(&self) -> f64;

    /// Constraint flags
    fn locks(&self) -> LockFlags;

    /// Whether the object can become part of a selection
    fn is_selectable(&self) -> bool;

    /// Whether the object is currently drawn
    fn is_visible(&self) -> bool;

    /// Whether the object currently carries selection decorations
    fn is_active(&self) -> bool;

    /// Mark or unmark the object as actively selected
    fn set_active(&mut self, active: bool);

    /// Whether transforms on this object always anchor at its center
    fn center_transform(&self) -> bool;

    /// Width in surface units under the current scale
    fn scaled_width(&self) -> f64 {
        self.base_width() * self.placement().scale_x
    }

    /// Height in surface units under the current scale
    fn scaled_height(&self) -> f64 {
        self.base_height() * self.placement().scale_y
    }

    /// Rotation in radians
    fn angle_radians(&self) -> f64 {
        self.placement().angle.to_radians()
    }

    /// Translate a point at the given origin pair to the object's center
    fn translate_to_center_point(&self, point: Point, origin_x: OriginX, origin_y: OriginY) -> Point {
        let mut cx = point.x;
        let mut cy = point.y;
        match origin_x {
            OriginX::Left => cx += self.scaled_width() / 2.0,
            OriginX::Right => cx -= self.scaled_width() / 2.0,
            OriginX::Center => {}
        }
        match origin_y {
            OriginY::Top => cy += self.scaled_height() / 2.0,
            OriginY::Bottom => cy -= self.scaled_height() / 2.0,
            OriginY::Center => {}
        }
        rotate_point(Point::new(cx, cy), point, self.angle_radians())
    }

    /// Translate the object's center to the point named by an origin pair
    fn translate_to_origin_point(&self, center: Point, origin_x: OriginX, origin_y: OriginY) -> Point {
        let mut x = center.x;
        let mut y = center.y;
        match origin_x {
            OriginX::Left => x -= self.scaled_width() / 2.0,
            OriginX::Right => x += self.scaled_width() / 2.0,
            OriginX::Center => {}
        }
        match origin_y {
            OriginY::Top => y -= self.scaled_height() / 2.0,
            OriginY::Bottom => y += self.scaled_height() / 2.0,
            OriginY::Center => {}
        }
        rotate_point(Point::new(x, y), center, self.angle_radians())
    }

    /// The object's center in surface coordinates
    fn center_point(&self) -> Point {
        let p = self.placement();
        self.translate_to_center_point(Point::new(p.left, p.top), p.origin_x, p.origin_y)
    }

    /// Convert a surface point into the object's unrotated local space,
    /// relative to the point named by the origin pair
    fn to_local_point(&self, point: Point, origin_x: OriginX, origin_y: OriginY) -> Point {
        let center = self.center_point();
        let x = match origin_x {
            OriginX::Left => center.x - self.scaled_width() / 2.0,
            OriginX::Center => center.x,
            OriginX::Right => center.x + self.scaled_width() / 2.0,
        };
        let y = match origin_y {
            OriginY::Top => center.y - self.scaled_height() / 2.0,
            OriginY::Center => center.y,
            OriginY::Bottom => center.y + self.scaled_height() / 2.0,
        };
        let p = rotate_point(point, center, -self.angle_radians());
        Point::new(p.x - x, p.y - y)
    }

    /// Re-anchor the object so the point named by the given origin pair
    /// lands on `pos`, leaving the object's own origin pair untouched
    fn set_position_by_origin(&mut self, pos: Point, origin_x: OriginX, origin_y: OriginY) {
        let center = self.translate_to_center_point(pos, origin_x, origin_y);
        let own = *self.placement();
        let position = self.translate_to_origin_point(center, own.origin_x, own.origin_y);
        let p = self.placement_mut();
        p.left = position.x;
        p.top = position.y;
    }

    /// Corner points of the scaled, rotated footprint (unpadded)
    fn corner_points(&self) -> [Point; 4] {
        let center = self.center_point();
        let hw = self.scaled_width().abs() / 2.0;
        let hh = self.scaled_height().abs() / 2.0;
        let angle = self.angle_radians();
        let corner = |dx: f64, dy: f64| rotate_point(center + Vec2::new(dx, dy), center, angle);
        [
            corner(-hw, -hh),
            corner(hw, -hh),
            corner(hw, hh),
            corner(-hw, hh),
        ]
    }

    /// Positions of the eight resize handles plus the rotation handle
    fn handle_positions(&self) -> [(Handle, Point); 9] {
        let center = self.center_point();
        let hw = self.scaled_width().abs() / 2.0 + self.padding();
        let hh = self.scaled_height().abs() / 2.0 + self.padding();
        let angle = self.angle_radians();
        let at = |dx: f64, dy: f64| rotate_point(center + Vec2::new(dx, dy), center, angle);
        [
            (Handle::TopLeft, at(-hw, -hh)),
            (Handle::TopRight, at(hw, -hh)),
            (Handle::BottomRight, at(hw, hh)),
            (Handle::BottomLeft, at(-hw, hh)),
            (Handle::MidLeft, at(-hw, 0.0)),
            (Handle::MidTop, at(0.0, -hh)),
            (Handle::MidRight, at(hw, 0.0)),
            (Handle::MidBottom, at(0.0, hh)),
            (Handle::Rotation, at(0.0, -hh - ROTATION_HANDLE_OFFSET)),
        ]
    }

    /// The handle under `pointer`, if the object is active
    ///
    /// Handles are only grabbable while the object carries selection
    /// decorations; an inactive object reports no handle.
    fn find_handle(&self, pointer: Point) -> Option<Handle> {
        if !self.is_active() {
            return None;
        }
        let half = self.corner_size() / 2.0;
        for (handle, pos) in self.handle_positions() {
            if (pointer.x - pos.x).abs() <= half && (pointer.y - pos.y).abs() <= half {
                return Some(handle);
            }
        }
        None
    }

    /// Whether `point` lies inside the object's filled footprint
    fn contains_point(&self, point: Point) -> bool {
        let local = self.to_local_point(point, OriginX::Center, OriginY::Center);
        local.x.abs() <= self.scaled_width().abs() / 2.0
            && local.y.abs() <= self.scaled_height().abs() / 2.0
    }

    /// Axis-aligned bounding rectangle of the footprint
    fn bounding_rect(&self) -> Rect {
        let corners = self.corner_points();
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for c in corners {
            min_x = min_x.min(c.x);
            min_y = min_y.min(c.y);
            max_x = max_x.max(c.x);
            max_y = max_y.max(c.y);
        }
        Rect::new(min_x, min_y, max_x, max_y)
    }

    /// Whether the footprint's edges cross the axis-aligned rectangle
    /// spanned by `tl` and `br`
    fn intersects_rect(&self, tl: Point, br: Point) -> bool {
        let corners = self.corner_points();
        let rect = [
            tl,
            Point::new(br.x, tl.y),
            br,
            Point::new(tl.x, br.y),
        ];
        for i in 0..4 {
            let a1 = corners[i];
            let a2 = corners[(i + 1) % 4];
            for j in 0..4 {
                let b1 = rect[j];
                let b2 = rect[(j + 1) % 4];
                if segments_intersect(a1, a2, b1, b2) {
                    return true;
                }
            }
        }
        false
    }

    /// Whether the footprint lies entirely inside the axis-aligned
    /// rectangle spanned by `tl` and `br`
    fn is_contained_in_rect(&self, tl: Point, br: Point) -> bool {
        let bounds = self.bounding_rect();
        bounds.x0 >= tl.x && bounds.x1 <= br.x && bounds.y0 >= tl.y && bounds.y1 <= br.y
    }
}
