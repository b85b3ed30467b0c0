//! Configuration for camera limits, interaction steps, clustering and tooltips
//!
//! Options can be built from a preset, deserialized from JSON (missing fields
//! fall back to the defaults) or assembled by hand.

use crate::core::constants::*;
use crate::core::geo::LatLng;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Named starting configurations
#[derive(Debug, Clone, PartialEq)]
pub enum MapPreset {
    /// Whole-world view used by the company map
    Global,
    /// Continental view used by the geoscience map
    Australia,
    Custom(MapOptions),
}

impl MapPreset {
    pub fn resolve(&self) -> MapOptions {
        match self {
            Self::Global => MapOptions::default(),
            Self::Australia => MapOptions {
                min_zoom: 3.0,
                max_zoom: 12.0,
                default_center: LatLng::new(-25.2744, 133.7751),
                default_zoom: 4.0,
                ..MapOptions::default()
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

impl Default for MapPreset {
    fn default() -> Self {
        Self::Global
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub tile_size: u32,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub default_center: LatLng,
    pub default_zoom: f64,
    /// Zoom change per wheel notch
    pub wheel_step: f64,
    /// Zoom change of the +/- buttons
    pub zoom_delta: f64,
    pub cluster_click_zoom_step: f64,
    pub drag_threshold: f64,
    /// Request `@2x` tiles from providers that support them
    pub retina: bool,
    pub fit_bounds_padding: f64,
    pub fit_bounds_max_zoom: f64,
    pub clustering: ClusteringConfig,
    pub tooltip: TooltipConfig,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            min_zoom: 1.0,
            max_zoom: 10.0,
            default_center: LatLng::new(20.0, 0.0),
            default_zoom: 2.0,
            wheel_step: DEFAULT_WHEEL_STEP,
            zoom_delta: DEFAULT_ZOOM_DELTA,
            cluster_click_zoom_step: CLUSTER_CLICK_ZOOM_STEP,
            drag_threshold: DRAG_THRESHOLD,
            retina: false,
            fit_bounds_padding: FIT_BOUNDS_PADDING,
            fit_bounds_max_zoom: FIT_BOUNDS_MAX_ZOOM,
            clustering: ClusteringConfig::default(),
            tooltip: TooltipConfig::default(),
        }
    }
}

impl MapOptions {
    /// Parses options from JSON and validates them
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: MapOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn tile_size_px(&self) -> f64 {
        self.tile_size as f64
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(MapError::Config("tile_size must be positive".to_string()));
        }
        if !(self.min_zoom.is_finite() && self.max_zoom.is_finite()) {
            return Err(MapError::Config("zoom limits must be finite".to_string()));
        }
        if self.min_zoom < 0.0 || self.min_zoom > self.max_zoom {
            return Err(MapError::Config(format!(
                "invalid zoom range {}..{}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !self.default_center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "default center {:?}",
                self.default_center
            )));
        }
        self.clustering.validate()
    }
}

/// Coordinate-rounding clustering parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// When false every point gets its own marker
    pub enabled: bool,
    /// Grid is `max(min_grid_degrees, base_factor - zoom)` degrees
    pub base_factor: f64,
    pub min_grid_degrees: f64,
    /// Pixels outside the viewport within which clusters are still kept
    pub padding: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_factor: CLUSTER_BASE_FACTOR,
            min_grid_degrees: MIN_GRID_DEGREES,
            padding: CULLING_PADDING,
        }
    }
}

impl ClusteringConfig {
    /// Bucket edge in degrees at `zoom`
    pub fn grid_size(&self, zoom: f64) -> f64 {
        (self.base_factor - zoom).max(self.min_grid_degrees)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_grid_degrees.is_nan() || self.min_grid_degrees <= 0.0 {
            return Err(MapError::Config(
                "min_grid_degrees must be positive".to_string(),
            ));
        }
        if self.padding < 0.0 {
            return Err(MapError::Config("padding must not be negative".to_string()));
        }
        Ok(())
    }
}

/// Hover tooltip geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub max_items: usize,
    pub width: f64,
    pub line_height: f64,
    pub padding: f64,
    /// Offset from the marker center to the tooltip's top-left corner
    pub offset: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            max_items: TOOLTIP_MAX_ITEMS,
            width: 240.0,
            line_height: 18.0,
            padding: 8.0,
            offset: 16.0,
        }
    }
}
