//! Default interaction, clustering and marker constants.
//!
//! Most of these seed [`MapOptions`](crate::core::config::MapOptions) and can
//! be overridden there.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Zoom change per wheel notch.
pub const DEFAULT_WHEEL_STEP: f64 = 0.5;

/// Programmatic +/- zoom step for the zoom buttons.
pub const DEFAULT_ZOOM_DELTA: f64 = 1.0;

/// Zoom added when a multi-member cluster is clicked.
pub const CLUSTER_CLICK_ZOOM_STEP: f64 = 2.0;

/// Pointer travel (pixels) below which a press/release pair counts as a click.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Clustering grid is `max(MIN_GRID_DEGREES, CLUSTER_BASE_FACTOR - zoom)` degrees.
pub const CLUSTER_BASE_FACTOR: f64 = 4.0;

/// Floor of the clustering grid, in degrees.
pub const MIN_GRID_DEGREES: f64 = 1.0;

/// Clusters within this many pixels outside the viewport are still emitted.
pub const CULLING_PADDING: f64 = 50.0;

/// Members listed in a hover tooltip before the "+N more" line.
pub const TOOLTIP_MAX_ITEMS: usize = 8;

/// Padding used when fitting the camera to the loaded points.
pub const FIT_BOUNDS_PADDING: f64 = 50.0;

/// Upper zoom for the initial fit to the loaded points.
pub const FIT_BOUNDS_MAX_ZOOM: f64 = 5.0;

/// Marker diameter of a single point, in pixels.
pub const SINGLE_MARKER_SIZE: f64 = 24.0;

/// Cluster marker diameters by member count: >50, >20, >10, otherwise.
pub const CLUSTER_MARKER_SIZES: [(usize, f64); 3] = [(50, 48.0), (20, 40.0), (10, 36.0)];

/// Smallest cluster marker diameter.
pub const CLUSTER_MARKER_MIN_SIZE: f64 = 32.0;
