use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Represents a bounding box in screen/pixel coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Creates new bounds from two points
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Bounds of a viewport of the given pixel size, anchored at the origin
    pub fn from_size(size: &Point) -> Self {
        Self::from_coords(0.0, 0.0, size.x, size.y)
    }

    /// Gets the width of the bounds
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Gets the height of the bounds
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Returns a new bounds grown by `amount` on every side
    pub fn expanded(&self, amount: f64) -> Bounds {
        Bounds::from_coords(
            self.min.x - amount,
            self.min.y - amount,
            self.max.x + amount,
            self.max.y + amount,
        )
    }

    /// Moves this rectangle the least distance needed to sit inside `outer`.
    /// A rectangle larger than `outer` is pinned to its top-left corner.
    pub fn clamped_within(&self, outer: &Bounds) -> Bounds {
        let dx = if self.max.x > outer.max.x {
            outer.max.x - self.max.x
        } else {
            0.0
        };
        let dy = if self.max.y > outer.max.y {
            outer.max.y - self.max.y
        } else {
            0.0
        };
        let mut min = Point::new(self.min.x + dx, self.min.y + dy);
        min.x = min.x.max(outer.min.x);
        min.y = min.y.max(outer.min.y);
        Bounds::new(min, Point::new(min.x + self.width(), min.y + self.height()))
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(Point::new(0.0, 0.0), Point::new(0.0, 0.0))
    }
}
