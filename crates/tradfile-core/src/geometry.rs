//! Drop-zone geometry and hit testing

use serde::{Deserialize, Serialize};

/// Pointer position in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding rectangle of a drop target, in the same coordinate
/// space as [`Point`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ZoneBounds {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Inclusive containment: points on an edge are inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// Hit test a pointer position against the zone's current bounds.
///
/// `None` bounds mean the zone is not rendered; every point is outside.
pub fn is_inside(x: f64, y: f64, bounds: Option<&ZoneBounds>) -> bool {
    bounds.is_some_and(|b| b.contains(x, y))
}
