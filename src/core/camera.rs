use crate::core::config::MapOptions;
use crate::core::geo::{LatLng, LatLngBounds, Point};
use crate::core::projection;
use serde::{Deserialize, Serialize};

/// The current view of the map: center, zoom and viewport size in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub center: LatLng,
    pub zoom: f64,
    pub size: Point,
}

/// Owns the [`CameraState`] and the rules for changing it
///
/// Zoom is kept inside `[min_zoom, max_zoom]` after every operation and the
/// center latitude inside ±85° while panning. Each mutating call bumps
/// [`Camera::revision`], which hosts use as a redraw signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    state: CameraState,
    min_zoom: f64,
    max_zoom: f64,
    tile_size: f64,
    default_center: LatLng,
    default_zoom: f64,
    revision: u64,
}

impl Camera {
    /// Creates a camera at the configured default view
    pub fn new(options: &MapOptions, size: Point) -> Self {
        let zoom = options
            .default_zoom
            .clamp(options.min_zoom, options.max_zoom);
        Self {
            state: CameraState {
                center: options.default_center,
                zoom,
                size,
            },
            min_zoom: options.min_zoom,
            max_zoom: options.max_zoom,
            tile_size: options.tile_size_px(),
            default_center: options.default_center,
            default_zoom: options.default_zoom,
            revision: 0,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn center(&self) -> LatLng {
        self.state.center
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    pub fn size(&self) -> Point {
        self.state.size
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Clamps into the zoom limits; a non-finite zoom keeps the current one
    fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            zoom.clamp(self.min_zoom, self.max_zoom)
        } else {
            self.state.zoom
        }
    }

    /// Moves the center by a pointer delta in pixels.
    ///
    /// Dragging right (positive `dx`) shows terrain further west; dragging
    /// down (positive `dy`) shows terrain further north.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !dx.is_finite() || !dy.is_finite() {
            log::warn!("ignoring non-finite pan ({dx}, {dy})");
            return;
        }
        let scale = projection::degrees_per_pixel(self.state.zoom, self.tile_size);
        let lng = LatLng::wrap_lng(self.state.center.lng - dx * scale);
        let lat = LatLng::clamp_lat(self.state.center.lat + dy * scale);
        if lat != self.state.center.lat + dy * scale {
            log::trace!("pan clamped latitude to {lat}");
        }
        self.state.center = LatLng::new(lat, lng);
        self.state.zoom = self.clamp_zoom(self.state.zoom);
        self.touch();
    }

    /// Adds `delta` to the zoom around the viewport center
    pub fn zoom_by(&mut self, delta: f64) {
        if !delta.is_finite() {
            log::warn!("ignoring non-finite zoom delta {delta}");
            return;
        }
        let target = self.state.zoom + delta;
        self.state.zoom = self.clamp_zoom(target);
        if self.state.zoom != target {
            log::debug!("zoom {target} clamped to {}", self.state.zoom);
        }
        self.touch();
    }

    pub fn zoom_in(&mut self, step: f64) {
        self.zoom_by(step.abs());
    }

    pub fn zoom_out(&mut self, step: f64) {
        self.zoom_by(-step.abs());
    }

    /// Restores the default center and zoom
    pub fn reset(&mut self) {
        self.state.center = self.default_center;
        self.state.zoom = self.clamp_zoom(self.default_zoom);
        self.touch();
    }

    /// Jumps to `center` at `zoom`
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        if !center.lat.is_finite() || !center.lng.is_finite() {
            log::warn!("ignoring non-finite center {center:?}");
            return;
        }
        self.state.center = LatLng::new(
            LatLng::clamp_lat(center.lat),
            LatLng::wrap_lng(center.lng),
        );
        self.state.zoom = self.clamp_zoom(zoom);
        self.touch();
    }

    /// Updates the viewport after a container resize
    pub fn resize(&mut self, width: f64, height: f64) {
        self.state.size = Point::new(width.max(0.0), height.max(0.0));
        self.touch();
    }

    /// Sets the zoom limits, re-clamping the current zoom
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom.max(min_zoom);
        self.state.zoom = self.clamp_zoom(self.state.zoom);
        self.touch();
    }

    /// Centers on `bounds` at the highest whole zoom (capped by `max_zoom`)
    /// at which the bounds fit inside the viewport minus `padding` per side
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64, max_zoom: f64) {
        let available = Point::new(
            self.state.size.x - 2.0 * padding,
            self.state.size.y - 2.0 * padding,
        );
        let cap = self.clamp_zoom(max_zoom);
        let mut best_zoom = self.min_zoom;

        if available.x > 0.0 && available.y > 0.0 {
            let nw = bounds.north_west();
            let se = bounds.south_east();
            let mut zoom = self.min_zoom.ceil();
            while zoom <= cap {
                let nw_px = projection::project(&clamped(nw), zoom, self.tile_size);
                let se_px = projection::project(&clamped(se), zoom, self.tile_size);
                let width = (se_px.x - nw_px.x).abs();
                let height = (se_px.y - nw_px.y).abs();
                if width <= available.x && height <= available.y {
                    best_zoom = zoom;
                } else {
                    break;
                }
                zoom += 1.0;
            }
        }

        log::debug!("fit_bounds chose zoom {best_zoom} for {bounds:?}");
        self.set_view(bounds.center(), best_zoom);
    }

    /// World pixel position of the camera center
    pub fn center_pixel(&self) -> Point {
        projection::project(&self.state.center, self.state.zoom, self.tile_size)
    }

    /// Screen position of a coordinate, relative to the viewport's top-left.
    ///
    /// Uses the horizontal world copy closest to the camera so markers follow
    /// the wrapped tiles across the antimeridian.
    pub fn lat_lng_to_screen(&self, lat_lng: &LatLng) -> Point {
        let world = projection::world_size(self.state.zoom, self.tile_size);
        let pixel = projection::project(lat_lng, self.state.zoom, self.tile_size);
        let mut offset = pixel.subtract(&self.center_pixel());
        if offset.x > world / 2.0 {
            offset.x -= world;
        } else if offset.x < -world / 2.0 {
            offset.x += world;
        }
        Point::new(
            self.state.size.x / 2.0 + offset.x,
            self.state.size.y / 2.0 + offset.y,
        )
    }

    /// Coordinate under a screen position
    pub fn screen_to_lat_lng(&self, screen: &Point) -> LatLng {
        let offset = Point::new(
            screen.x - self.state.size.x / 2.0,
            screen.y - self.state.size.y / 2.0,
        );
        let pixel = self.center_pixel().add(&offset);
        let lat_lng = projection::lat_lng_for(&pixel, self.state.zoom, self.tile_size);
        LatLng::new(lat_lng.lat, LatLng::wrap_lng(lat_lng.lng))
    }
}

fn clamped(lat_lng: LatLng) -> LatLng {
    LatLng::new(LatLng::clamp_lat(lat_lng.lat), lat_lng.lng)
}
