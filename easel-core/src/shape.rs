//! Shape model
//!
//! The mutable drawable the scene owns and the manipulation core edits in
//! place. Its footprint — the pixels it occupies — is its scaled, rotated
//! rectangle.

use crate::object::{CanvasItem, LockFlags, OriginX, OriginY, Placement, DEFAULT_CORNER_SIZE};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A drawable object on the canvas
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier
    pub id: Uuid,

    /// Hit-test color identity, assigned by the scene
    #[serde(default)]
    pub serial: u32,

    /// Position, scale, rotation, and origin pair
    pub placement: Placement,

    /// Unscaled width
    pub width: f64,

    /// Unscaled height
    pub height: f64,

    /// Stroke width, included in scale-ratio dimensions
    #[serde(default)]
    pub stroke_width: f64,

    /// Padding between geometry and selection decoration
    #[serde(default)]
    pub padding: f64,

    /// Side length of this shape's handle hit boxes
    #[serde(default = "default_corner_size")]
    pub corner_size: f64,

    /// Per-axis constraint flags
    #[serde(default)]
    pub locks: LockFlags,

    /// Whether the shape can be selected at all
    pub selectable: bool,

    /// Whether the shape is currently drawn
    pub visible: bool,

    /// Whether the shape currently carries selection decorations
    #[serde(default)]
    pub active: bool,

    /// Anchor every transform of this shape at its center
    #[serde(default)]
    pub center_transform: bool,
}

fn default_corner_size() -> f64 {
    DEFAULT_CORNER_SIZE
}

impl Shape {
    /// Create a shape of the given base dimensions at the surface origin
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            serial: 0,
            placement: Placement::default(),
            width,
            height,
            stroke_width: 0.0,
            padding: 0.0,
            corner_size: DEFAULT_CORNER_SIZE,
            locks: LockFlags::default(),
            selectable: true,
            visible: true,
            active: false,
            center_transform: false,
        }
    }

    /// Set the position
    pub fn with_position(mut self, left: f64, top: f64) -> Self {
        self.placement.left = left;
        self.placement.top = top;
        self
    }

    /// Set the scale factors
    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.placement.scale_x = scale_x;
        self.placement.scale_y = scale_y;
        self
    }

    /// Set the rotation angle in degrees
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.placement.angle = angle;
        self
    }

    /// Set the origin pair
    pub fn with_origin(mut self, origin_x: OriginX, origin_y: OriginY) -> Self {
        self.placement.origin_x = origin_x;
        self.placement.origin_y = origin_y;
        self
    }

    /// Set the stroke width
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    /// Set the selection-decoration padding
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Set the constraint flags
    pub fn with_locks(mut self, locks: LockFlags) -> Self {
        self.locks = locks;
        self
    }

    /// Set whether the shape can be selected
    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }
}

impl CanvasItem for Shape {
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
        self.stroke_width
    }

    fn padding(&self) -> f64 {
        self.padding
    }

    fn corner_size(&self) -> f64 {
        self.corner_size
    }

    fn locks(&self) -> LockFlags {
        self.locks
    }

    fn is_selectable(&self) -> bool {
        self.selectable
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn center_transform(&self) -> bool {
        self.center_transform
    }
}
