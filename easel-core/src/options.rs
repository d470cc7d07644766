//! Canvas behavior configuration
//!
//! Flags controlling interactive behavior: transform defaults, group
//! selection, and target-finding strategy.

use serde::{Deserialize, Serialize};

/// Behavior flags for an interactive canvas
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasOptions {
    /// When true, corner handles scale each axis independently instead of
    /// proportionally
    pub uni_scale_transform: bool,

    /// When true, objects use their center point as the origin of every
    /// transform
    pub center_transform: bool,

    /// Whether group (multi-object) selection is enabled
    pub selection: bool,

    /// When true, object detection happens per-pixel against the cache
    /// surface rather than per bounding box
    pub per_pixel_target_find: bool,

    /// Number of pixels around the target pixel to tolerate during
    /// transparency checks
    pub target_find_tolerance: u32,

    /// When true, the most recently decorated object is checked first
    /// during target finding
    pub controls_above_overlay: bool,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            uni_scale_transform: false,
            center_transform: false,
            selection: true,
            per_pixel_target_find: true,
            target_find_tolerance: 0,
            controls_above_overlay: false,
        }
    }
}
