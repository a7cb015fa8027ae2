//! # Tilenav
//!
//! Tile walkability grid and discrete path planning for arena games.
//!
//! The world is a rectangle tiled by equally sized cells. Each cell is either
//! open or blocked. On top of that grid this crate provides:
//!
//! - **Coordinate conversion**: world points to clamped cell indices and back
//! - **Footprint checks**: every cell covered by an axis-aligned box
//! - **Path planning**: 8-directional A* returning world-space waypoints
//! - **Position sampling**: bounded random search for open footprints
//!
//! ## Quick Start
//!
//! ```
//! use glam::Vec2;
//! use tilenav::{NavigationGrid, PathPlanner};
//!
//! let grid = NavigationGrid::from_ascii(
//!     "....\n\
//!      .##.\n\
//!      ....",
//!     Vec2::splat(32.0),
//! )
//! .unwrap();
//!
//! let planner = PathPlanner::new(grid);
//! let path = planner.find_path(Vec2::new(16.0, 16.0), Vec2::new(112.0, 80.0));
//! assert_eq!(path.first(), Some(&Vec2::new(16.0, 16.0)));
//! assert_eq!(path.last(), Some(&Vec2::new(112.0, 80.0)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod astar;
pub mod grid;
pub mod sample;

// Re-exports for convenience
pub use astar::{DiagonalMovement, PathPlanner};
pub use grid::{Cell, GridError, NavigationGrid};
pub use sample::{sample_open_position, SampleError};

use glam::Vec2;

/// Axis-aligned rectangle used for hitboxes, footprints and arena bounds.
///
/// Intersection follows the usual sprite-rect convention: boxes that only
/// share an edge do not intersect, and a point on the max edge is outside.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Rect {
    /// Create a rectangle from min/max corners.
    #[must_use]
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a rectangle anchored at the origin with the given size.
    #[must_use]
    pub fn from_size(size: Vec2) -> Self {
        Self {
            min: Vec2::ZERO,
            max: size,
        }
    }

    /// Create a rectangle centered on `center` extending `half_extents` each way.
    #[must_use]
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the rectangle.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Check if a point is inside the rectangle (max edge exclusive).
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    /// Check if `other` lies entirely within this rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    /// Check if two rectangles overlap with non-zero area.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Shrink the rectangle by `amount` on every side.
    ///
    /// An axis that would invert collapses to its midpoint.
    #[must_use]
    pub fn shrink(&self, amount: Vec2) -> Self {
        let center = self.center();
        let min = (self.min + amount).min(center.max(self.min));
        let max = (self.max - amount).max(center.min(self.max));
        let min = min.min(max);
        Self { min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_point() {
        let rect = Rect::from_center(Vec2::new(10.0, 10.0), Vec2::splat(5.0));
        assert!(rect.contains_point(Vec2::new(10.0, 10.0)));
        assert!(rect.contains_point(Vec2::new(5.0, 5.0)));
        assert!(!rect.contains_point(Vec2::new(15.0, 10.0)));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::from_min_max(Vec2::ZERO, Vec2::splat(10.0));
        let b = Rect::from_min_max(Vec2::splat(5.0), Vec2::splat(15.0));
        let touching = Rect::from_min_max(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&touching));
    }

    #[test]
    fn test_rect_contains_rect() {
        let outer = Rect::from_size(Vec2::splat(100.0));
        let inner = Rect::from_center(Vec2::splat(50.0), Vec2::splat(10.0));
        let straddling = Rect::from_center(Vec2::new(95.0, 50.0), Vec2::splat(10.0));
        assert!(outer.contains_rect(&inner));
        assert!(!outer.contains_rect(&straddling));
    }

    #[test]
    fn test_rect_shrink_collapses_to_center() {
        let rect = Rect::from_size(Vec2::new(10.0, 100.0));
        let shrunk = rect.shrink(Vec2::splat(20.0));
        assert_eq!(shrunk.min.x, 5.0);
        assert_eq!(shrunk.max.x, 5.0);
        assert_eq!(shrunk.min.y, 20.0);
        assert_eq!(shrunk.max.y, 80.0);
    }

    #[test]
    fn test_rect_serialization_roundtrip() {
        let rect = Rect::from_center(Vec2::new(3.0, 4.0), Vec2::new(1.0, 2.0));
        let json = serde_json::to_string(&rect).unwrap();
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(rect, back);
    }
}
