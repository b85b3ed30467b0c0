use crate::core::{bounds::Bounds, geo::Point};

/// Screen-space visibility tests.
pub struct Culling;

impl Culling {
    /// The viewport rectangle grown by `padding` pixels on every side
    pub fn padded_viewport(size: &Point, padding: f64) -> Bounds {
        Bounds::from_size(size).expanded(padding)
    }

    /// Returns `true` if a point lies inside the viewport rectangle.
    pub fn point_visible(viewport: &Bounds, p: &Point) -> bool {
        viewport.contains(p)
    }
}
