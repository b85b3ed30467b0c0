use crate::core::{bounds::Bounds, config::TooltipConfig, geo::Point};
use crate::data::point::GeoPoint;
use serde::{Deserialize, Serialize};

/// Hover tooltip for a marker, already positioned inside the viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub lines: Vec<String>,
    pub bounds: Bounds,
}

impl Tooltip {
    /// Builds the tooltip for the members of a hovered marker at `anchor`.
    ///
    /// The box opens to the lower right of the anchor, flips left when that
    /// would cross the right edge, and is finally clamped into the viewport.
    pub fn for_members(
        members: &[&GeoPoint],
        anchor: Point,
        viewport: &Point,
        config: &TooltipConfig,
    ) -> Self {
        let lines = Self::lines(members, config.max_items);
        let height = config.padding * 2.0 + config.line_height * lines.len() as f64;

        let mut x = anchor.x + config.offset;
        if x + config.width > viewport.x {
            x = anchor.x - config.offset - config.width;
        }
        let y = anchor.y + config.offset;

        let bounds = Bounds::from_coords(x, y, x + config.width, y + height)
            .clamped_within(&Bounds::from_size(viewport));
        Self { lines, bounds }
    }

    /// `name (category)` for up to `max_items` members, then `+N more`
    pub fn lines(members: &[&GeoPoint], max_items: usize) -> Vec<String> {
        let mut lines: Vec<String> = members
            .iter()
            .take(max_items)
            .map(|p| format!("{} ({})", p.name, p.category))
            .collect();
        if members.len() > max_items {
            lines.push(format!("+{} more", members.len() - max_items));
        }
        lines
    }

    /// Top-left corner of the text block
    pub fn text_origin(&self, config: &TooltipConfig) -> Point {
        Point::new(
            self.bounds.min.x + config.padding,
            self.bounds.min.y + config.padding,
        )
    }
}
