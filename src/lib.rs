//! # minemap
//!
//! An interactive map of mining companies and deposits.
//!
//! The core is framework agnostic: feed [`InputEvent`]s into a [`MineMap`]
//! and draw the [`RenderFrame`] it produces. Points are grouped into
//! clusters by rounding their coordinates to a zoom-dependent grid, placed
//! with Web Mercator, and drawn over raster tiles from a switchable
//! provider. Enable the `egui` feature for a ready-made widget.

pub mod core;
pub mod data;
pub mod input;
pub mod prelude;
pub mod spatial;
pub mod tiles;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    camera::{Camera, CameraState},
    config::{ClusteringConfig, MapOptions, MapPreset, TooltipConfig},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{FullscreenRequest, MarkerView, MineMap, RenderFrame, TileView},
};

pub use crate::data::{points_from_geojson_str, GeoPoint, Rgb};

pub use crate::input::{InputEvent, KeyCode, MapEvent};

pub use crate::spatial::{cluster_points, Cluster};

pub use crate::tiles::{visible_tiles, Tile, TileCatalog, TileProvider};

pub use crate::ui::Tooltip;

#[cfg(feature = "egui")]
pub use crate::ui::MapWidget;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown tile provider: {0}")]
    UnknownProvider(String),

    #[error("Invalid tile URL template: {0}")]
    InvalidTemplate(String),
}

/// Error type alias for convenience
pub type Error = MapError;
