//! Prelude module for common minemap types
//!
//! This module re-exports the most commonly used types and functions
//! for easy importing with `use minemap::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    camera::{Camera, CameraState},
    config::{ClusteringConfig, MapOptions, MapPreset, TooltipConfig},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{FullscreenRequest, MarkerView, MineMap, RenderFrame, TileView},
    projection::{lat_lng_for, pixel_for},
};

pub use crate::data::{
    category_color, marker_size, points_from_geojson_str, points_from_json_str, GeoPoint, Rgb,
};

pub use crate::input::{
    events::{InputEvent, KeyCode, MapEvent},
    handler::{Action, EventManager, InputHandler, InteractionState},
};

pub use crate::spatial::{cluster_points, unclustered, Cluster, Culling};

pub use crate::tiles::{visible_tiles, Tile, TileCatalog, TileProvider, TileSource};

pub use crate::ui::Tooltip;

#[cfg(feature = "egui")]
pub use crate::ui::{paint_frame, FrameStyle, MapWidget};

pub use crate::{Error as MapError, Result};

pub use std::collections::VecDeque;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
