//! Category colors and marker sizing

use crate::core::constants::{CLUSTER_MARKER_MIN_SIZE, CLUSTER_MARKER_SIZES, SINGLE_MARKER_SIZE};
use serde::{Deserialize, Serialize};

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub fn to_hex_string(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Color for categories missing from the palette
pub const DEFAULT_COLOR: Rgb = Rgb::from_hex(0x6366f1);

/// Commodity palette in legend order
const COMMODITY_COLORS: &[(&str, Rgb)] = &[
    ("Gold", Rgb::from_hex(0xfbbf24)),
    ("Silver", Rgb::from_hex(0x9ca3af)),
    ("Copper", Rgb::from_hex(0xea580c)),
    ("Lithium", Rgb::from_hex(0x22d3ee)),
    ("Iron Ore", Rgb::from_hex(0xb91c1c)),
    ("Uranium", Rgb::from_hex(0x84cc16)),
    ("Platinum", Rgb::from_hex(0x64748b)),
    ("Nickel", Rgb::from_hex(0x059669)),
    ("Rare Earths", Rgb::from_hex(0x8b5cf6)),
    ("Coal", Rgb::from_hex(0x374151)),
    ("Diversified", Rgb::from_hex(0x6366f1)),
    ("Zinc", Rgb::from_hex(0x71717a)),
    ("Diamonds", Rgb::from_hex(0x38bdf8)),
    ("Cobalt", Rgb::from_hex(0x2563eb)),
    ("Manganese", Rgb::from_hex(0x7c3aed)),
    ("Chrome", Rgb::from_hex(0x0891b2)),
    ("Tin", Rgb::from_hex(0x78716c)),
    ("Lead", Rgb::from_hex(0x52525b)),
    ("Oil & Gas", Rgb::from_hex(0x1f2937)),
    ("Vanadium", Rgb::from_hex(0xa855f7)),
    ("Graphite", Rgb::from_hex(0x171717)),
    ("Aluminium", Rgb::from_hex(0xd1d5db)),
    ("Mineral Sands", Rgb::from_hex(0xfcd34d)),
];

const ALIASES: &[(&str, &str)] = &[
    ("iron", "Iron Ore"),
    ("ree", "Rare Earths"),
    ("aluminum", "Aluminium"),
    ("oil gas", "Oil & Gas"),
];

fn normalize(category: &str) -> String {
    category
        .trim()
        .replace('_', " ")
        .to_lowercase()
}

/// Looks up a category color, ignoring case and `_` vs space
pub fn category_color(category: &str) -> Rgb {
    let key = normalize(category);
    let key = ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| normalize(canonical))
        .unwrap_or(key);

    COMMODITY_COLORS
        .iter()
        .find(|(name, _)| normalize(name) == key)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}

/// First `limit` palette entries, for a legend
pub fn legend(limit: usize) -> Vec<(&'static str, Rgb)> {
    COMMODITY_COLORS.iter().take(limit).copied().collect()
}

/// Marker diameter in pixels for a cluster of `count` members
pub fn marker_size(count: usize) -> f64 {
    if count <= 1 {
        return SINGLE_MARKER_SIZE;
    }
    CLUSTER_MARKER_SIZES
        .iter()
        .find(|(threshold, _)| count > *threshold)
        .map(|(_, size)| *size)
        .unwrap_or(CLUSTER_MARKER_MIN_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_lookup() {
        assert_eq!(category_color("Gold"), Rgb(0xfb, 0xbf, 0x24));
        assert_eq!(category_color("gold"), category_color("Gold"));
        assert_eq!(category_color("Iron_Ore"), category_color("Iron Ore"));
        assert_eq!(category_color("REE"), category_color("Rare Earths"));
        assert_eq!(category_color("Aluminum"), category_color("Aluminium"));
        assert_eq!(category_color("Unobtainium"), DEFAULT_COLOR);
    }

    #[test]
    fn test_hex_string() {
        assert_eq!(category_color("Copper").to_hex_string(), "#ea580c");
    }

    #[test]
    fn test_marker_size_tiers() {
        assert_eq!(marker_size(1), 24.0);
        assert_eq!(marker_size(2), 32.0);
        assert_eq!(marker_size(10), 32.0);
        assert_eq!(marker_size(11), 36.0);
        assert_eq!(marker_size(21), 40.0);
        assert_eq!(marker_size(51), 48.0);
    }

    #[test]
    fn test_legend() {
        let legend = legend(12);
        assert_eq!(legend.len(), 12);
        assert_eq!(legend[0].0, "Gold");
    }
}
