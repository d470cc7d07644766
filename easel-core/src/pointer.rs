//! Pointer event boundary
//!
//! The core consumes pointer notifications as absolute surface coordinates
//! plus the two modifier states it cares about.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A single pointer notification
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// X coordinate on the drawing surface
    pub x: f64,
    /// Y coordinate on the drawing surface
    pub y: f64,
    /// Multi-select modifier held
    pub shift_key: bool,
    /// Alternate-anchor modifier held
    pub alt_key: bool,
}

impl PointerEvent {
    /// Create an event at a surface position with no modifiers
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            shift_key: false,
            alt_key: false,
        }
    }

    /// Set the multi-select modifier
    pub fn with_shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    /// Set the alternate-anchor modifier
    pub fn with_alt(mut self) -> Self {
        self.alt_key = true;
        self
    }

    /// Surface position as a point
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
