use crate::{
    core::{
        camera::{Camera, CameraState},
        config::{MapOptions, MapPreset},
        geo::{LatLng, LatLngBounds, Point},
    },
    data::{geojson, palette, point::GeoPoint, Rgb},
    input::{Action, EventManager, InputEvent, InputHandler, InteractionState, MapEvent},
    prelude::HashSet,
    spatial::clustering::{self, Cluster},
    tiles::{grid, Tile, TileCatalog, TileProvider},
    ui::tooltip::Tooltip,
    MapError, Result,
};
use serde::{Deserialize, Serialize};

/// What the host should do with its fullscreen state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FullscreenRequest {
    Enter,
    Exit,
}

/// A background tile ready to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileView {
    pub tile: Tile,
    pub url: String,
}

/// A cluster ready to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerView {
    /// Id of the first member
    pub id: String,
    /// Center of the marker relative to the viewport
    pub screen: Point,
    /// Diameter in pixels
    pub size: f64,
    pub color: Rgb,
    pub category: String,
    pub count: usize,
    /// Member count for clusters, `None` for single points
    pub label: Option<String>,
    pub member_ids: Vec<String>,
    /// Contains the selected point
    pub selected: bool,
}

/// Everything needed to draw one frame of the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub camera: CameraState,
    pub revision: u64,
    pub tiles: Vec<TileView>,
    pub markers: Vec<MarkerView>,
    pub tooltip: Option<Tooltip>,
    pub provider_id: String,
    pub attribution: String,
    pub fullscreen: bool,
    /// Points that have a usable coordinate
    pub located_points: usize,
    pub total_points: usize,
}

/// Callback invoked with the original point when a single marker is clicked
pub type SelectCallback = Box<dyn FnMut(&GeoPoint)>;

/// An interactive mining map: camera, points, base map and interaction state
pub struct MineMap {
    camera: Camera,
    options: MapOptions,
    points: Vec<GeoPoint>,
    catalog: TileCatalog,
    provider_id: String,
    selected_id: Option<String>,
    hidden_categories: HashSet<String>,
    fullscreen: bool,
    hover: Option<Point>,
    input_handler: InputHandler,
    event_manager: EventManager,
    on_select_point: Option<SelectCallback>,
}

impl MineMap {
    pub fn new(options: MapOptions, size: Point) -> Result<Self> {
        options.validate()?;
        let catalog = TileCatalog::builtin();
        let provider_id = catalog.first().id.clone();
        Ok(Self {
            camera: Camera::new(&options, size),
            input_handler: InputHandler::new(&options),
            options,
            points: Vec::new(),
            catalog,
            provider_id,
            selected_id: None,
            hidden_categories: HashSet::default(),
            fullscreen: false,
            hover: None,
            event_manager: EventManager::new(),
            on_select_point: None,
        })
    }

    pub fn from_preset(preset: MapPreset, size: Point) -> Result<Self> {
        Self::new(preset.resolve(), size)
    }

    /// Replaces the provider catalog and switches to its first provider
    pub fn with_catalog(mut self, catalog: TileCatalog) -> Self {
        self.provider_id = catalog.first().id.clone();
        self.catalog = catalog;
        self
    }

    pub fn with_points(mut self, points: Vec<GeoPoint>) -> Self {
        self.set_points(points);
        self
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.input_handler.state()
    }

    // Points

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn set_points(&mut self, points: Vec<GeoPoint>) {
        let located = points.iter().filter(|p| p.has_position()).count();
        log::debug!("loaded {} points, {located} with coordinates", points.len());
        self.points = points;
    }

    /// Loads a GeoJSON `FeatureCollection`, replacing the current points.
    /// Returns how many points were loaded.
    pub fn load_geojson(&mut self, json: &str) -> Result<usize> {
        let points = geojson::points_from_geojson_str(json)?;
        let count = points.len();
        self.set_points(points);
        Ok(count)
    }

    pub fn get_point(&self, id: &str) -> Option<&GeoPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Number of points that can appear on the map
    pub fn located_points(&self) -> usize {
        self.points.iter().filter(|p| p.has_position()).count()
    }

    /// Fits the camera to all located, visible points. Returns `false` when
    /// there is nothing to fit.
    pub fn fit_to_points(&mut self) -> bool {
        let bounds = LatLngBounds::from_points(
            self.visible_points().filter_map(GeoPoint::position),
        );
        match bounds {
            Some(bounds) => {
                let (padding, max_zoom) =
                    (self.options.fit_bounds_padding, self.options.fit_bounds_max_zoom);
                self.fit_bounds(&bounds, padding, max_zoom);
                true
            }
            None => false,
        }
    }

    // Selection

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected_point(&self) -> Option<&GeoPoint> {
        self.selected_id.as_deref().and_then(|id| self.get_point(id))
    }

    pub fn set_selected(&mut self, id: Option<String>) {
        self.selected_id = id;
    }

    /// Registers the callback for clicks on single markers
    pub fn on_select_point<F>(&mut self, callback: F)
    where
        F: FnMut(&GeoPoint) + 'static,
    {
        self.on_select_point = Some(Box::new(callback));
    }

    // Events

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.event_manager.on(event_type, callback);
    }

    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_manager.process_events()
    }

    // Camera

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.update_view(|camera| camera.pan(dx, dy));
    }

    pub fn zoom_by(&mut self, delta: f64) {
        self.update_view(|camera| camera.zoom_by(delta));
    }

    pub fn zoom_in(&mut self) {
        let step = self.options.zoom_delta;
        self.update_view(|camera| camera.zoom_in(step));
    }

    pub fn zoom_out(&mut self) {
        let step = self.options.zoom_delta;
        self.update_view(|camera| camera.zoom_out(step));
    }

    pub fn reset_view(&mut self) {
        self.update_view(Camera::reset);
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.update_view(|camera| camera.set_view(center, zoom));
    }

    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64, max_zoom: f64) {
        self.update_view(|camera| camera.fit_bounds(bounds, padding, max_zoom));
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.update_view(|camera| camera.resize(width, height));
    }

    fn update_view<F>(&mut self, change: F)
    where
        F: FnOnce(&mut Camera),
    {
        let before = (self.camera.center(), self.camera.zoom());
        change(&mut self.camera);
        let after = (self.camera.center(), self.camera.zoom());
        if before != after {
            self.event_manager.emit(MapEvent::ViewChanged {
                center: after.0,
                zoom: after.1,
            });
        }
    }

    // Base map

    pub fn providers(&self) -> &[TileProvider] {
        self.catalog.providers()
    }

    pub fn provider(&self) -> &TileProvider {
        self.catalog
            .get(&self.provider_id)
            .unwrap_or_else(|| self.catalog.first())
    }

    /// Switches the base map. The camera is left untouched.
    pub fn set_provider(&mut self, id: &str) -> Result<()> {
        if !self.catalog.contains(id) {
            return Err(MapError::UnknownProvider(id.to_string()));
        }
        if self.provider_id != id {
            log::debug!("base map {} -> {id}", self.provider_id);
            self.provider_id = id.to_string();
            self.event_manager
                .emit(MapEvent::ProviderChanged { id: id.to_string() });
        }
        Ok(())
    }

    // Categories

    /// Categories of located points with their counts, in first-seen order
    pub fn categories(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for point in self.points.iter().filter(|p| p.has_position()) {
            match counts.iter_mut().find(|(c, _)| *c == point.category) {
                Some((_, count)) => *count += 1,
                None => counts.push((point.category.clone(), 1)),
            }
        }
        counts
    }

    pub fn is_category_visible(&self, category: &str) -> bool {
        !self.hidden_categories.contains(category)
    }

    pub fn set_category_visible(&mut self, category: &str, visible: bool) {
        let changed = if visible {
            self.hidden_categories.remove(category)
        } else {
            self.hidden_categories.insert(category.to_string())
        };
        if changed {
            self.event_manager.emit(MapEvent::CategoryToggled {
                category: category.to_string(),
                visible,
            });
        }
    }

    /// Flips a category's visibility and returns the new state
    pub fn toggle_category(&mut self, category: &str) -> bool {
        let visible = !self.is_category_visible(category);
        self.set_category_visible(category, visible);
        visible
    }

    fn visible_points(&self) -> impl Iterator<Item = &GeoPoint> + '_ {
        self.points
            .iter()
            .filter(move |p| !self.hidden_categories.contains(&p.category))
    }

    // Fullscreen

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Flips the fullscreen mirror and tells the host which way to go
    pub fn toggle_fullscreen(&mut self) -> FullscreenRequest {
        self.set_fullscreen(!self.fullscreen);
        if self.fullscreen {
            FullscreenRequest::Enter
        } else {
            FullscreenRequest::Exit
        }
    }

    /// Mirrors the host's fullscreen state
    pub fn set_fullscreen(&mut self, active: bool) {
        if self.fullscreen != active {
            self.fullscreen = active;
            self.event_manager
                .emit(MapEvent::FullscreenChanged { active });
        }
    }

    // Interaction

    /// Feeds one input event through the map.
    ///
    /// Returns a request when the host must change its fullscreen state,
    /// which happens when Escape is pressed in fullscreen.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<FullscreenRequest> {
        let actions = self.input_handler.handle_event(event);
        let mut request = None;

        for action in actions {
            match action {
                Action::Pan { dx, dy } => self.pan(dx, dy),
                Action::Zoom { delta } => self.zoom_by(delta),
                Action::Click { position } => self.click(position),
                Action::Hover { position } => self.hover = position,
                Action::Reset => self.reset_view(),
                Action::Resize { width, height } => self.resize(width, height),
                Action::ExitFullscreen => {
                    if self.fullscreen {
                        self.set_fullscreen(false);
                        request = Some(FullscreenRequest::Exit);
                    }
                }
                Action::SyncFullscreen { active } => self.set_fullscreen(active),
            }
        }

        request
    }

    /// Current clusters of the visible categories
    pub fn clusters(&self) -> Vec<Cluster<'_>> {
        let config = &self.options.clustering;
        if config.enabled {
            clustering::cluster_points(self.visible_points(), &self.camera, config)
        } else {
            clustering::unclustered(self.visible_points(), &self.camera, config)
        }
    }

    /// The topmost marker under `position`
    pub fn hit_test(&self, position: Point) -> Option<Cluster<'_>> {
        self.clusters()
            .into_iter()
            .rev()
            .find(|c| c.screen.distance_to(&position) <= palette::marker_size(c.count()) / 2.0)
    }

    /// Clicks at a viewport position.
    ///
    /// A single marker becomes the selection and is passed to the select
    /// callback; a cluster zooms in on its first member. Empty map is a no-op.
    pub fn click(&mut self, position: Point) {
        let Some((count, first)) = self
            .hit_test(position)
            .map(|cluster| (cluster.count(), cluster.first().clone()))
        else {
            return;
        };

        if count == 1 {
            log::debug!("selected point {}", first.id);
            self.selected_id = Some(first.id.clone());
            if let Some(callback) = self.on_select_point.as_mut() {
                callback(&first);
            }
            self.event_manager
                .emit(MapEvent::PointSelected { id: first.id });
        } else if let Some(center) = first.position() {
            let zoom = self.camera.zoom() + self.options.cluster_click_zoom_step;
            self.set_view(center, zoom);
            log::debug!(
                "expanded cluster of {count} at zoom {}",
                self.camera.zoom()
            );
            self.event_manager.emit(MapEvent::ClusterExpanded {
                center: self.camera.center(),
                zoom: self.camera.zoom(),
                count,
            });
        }
    }

    /// Tooltip for the marker under the pointer, if any
    pub fn tooltip(&self) -> Option<Tooltip> {
        if self.input_handler.state().is_dragging() {
            return None;
        }
        let position = self.hover?;
        let cluster = self.hit_test(position)?;
        Some(Tooltip::for_members(
            &cluster.members,
            cluster.screen,
            &self.camera.size(),
            &self.options.tooltip,
        ))
    }

    /// Composes tiles, markers and the tooltip for the current state
    pub fn render(&self) -> RenderFrame {
        let provider = self.provider();
        let tiles = grid::visible_tiles(self.camera.state(), self.camera.tile_size())
            .into_iter()
            .map(|tile| TileView {
                url: provider.tile_url(tile.coord, self.options.retina),
                tile,
            })
            .collect();

        let selected = self.selected_id.as_deref();
        let markers = self
            .clusters()
            .iter()
            .map(|cluster| MarkerView {
                id: cluster.first().id.clone(),
                screen: cluster.screen,
                size: palette::marker_size(cluster.count()),
                color: palette::category_color(&cluster.dominant_category),
                category: cluster.dominant_category.clone(),
                count: cluster.count(),
                label: (!cluster.is_single()).then(|| cluster.count().to_string()),
                member_ids: cluster.members.iter().map(|p| p.id.clone()).collect(),
                selected: selected.map_or(false, |id| cluster.contains(id)),
            })
            .collect();

        RenderFrame {
            camera: self.camera.state().clone(),
            revision: self.camera.revision(),
            tiles,
            markers,
            tooltip: self.tooltip(),
            provider_id: provider.id.clone(),
            attribution: provider.attribution.clone(),
            fullscreen: self.fullscreen,
            located_points: self.located_points(),
            total_points: self.points.len(),
        }
    }
}

impl std::fmt::Debug for MineMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MineMap")
            .field("camera", &self.camera)
            .field("points", &self.points.len())
            .field("provider_id", &self.provider_id)
            .field("selected_id", &self.selected_id)
            .field("fullscreen", &self.fullscreen)
            .field("pending_events", &self.event_manager.pending_events())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn map() -> MineMap {
        MineMap::new(MapOptions::default(), Point::new(800.0, 600.0)).unwrap()
    }

    fn gold(id: &str, lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(id, format!("Mine {id}"), "Gold").with_position(lat, lng)
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let options = MapOptions {
            min_zoom: 8.0,
            max_zoom: 2.0,
            ..MapOptions::default()
        };
        assert!(matches!(
            MineMap::new(options, Point::new(800.0, 600.0)),
            Err(MapError::Config(_))
        ));
    }

    #[test]
    fn test_single_click_selects_and_calls_back() {
        let mut map = map().with_points(vec![gold("a", 20.0, 0.0)
            .with_property("exchange", "ASX")]);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        map.on_select_point(move |p| sink.borrow_mut().push(p.clone()));

        map.click(Point::new(400.0, 300.0));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].property("exchange"),
            Some(&serde_json::Value::from("ASX"))
        );
        assert_eq!(map.selected_id(), Some("a"));
        assert!(map.render().markers[0].selected);
        assert!(map
            .process_events()
            .contains(&MapEvent::PointSelected { id: "a".into() }));
    }

    #[test]
    fn test_click_on_empty_map_keeps_selection() {
        let mut map = map().with_points(vec![gold("a", 20.0, 0.0)]);
        map.set_selected(Some("a".into()));
        let revision = map.camera().revision();
        map.click(Point::new(10.0, 10.0));
        assert_eq!(map.selected_id(), Some("a"));
        assert_eq!(map.camera().revision(), revision);
    }

    #[test]
    fn test_cluster_click_zooms_and_respects_max_zoom() {
        let mut map = map().with_points(vec![gold("a", 20.0, 0.0), gold("b", 20.0, 0.0)]);
        map.set_view(LatLng::new(20.0, 0.0), 9.0);
        map.click(Point::new(400.0, 300.0));
        assert_eq!(map.camera().zoom(), 10.0);
        assert_eq!(map.selected_id(), None);
    }

    #[test]
    fn test_hidden_categories_are_not_drawn() {
        let mut map = map().with_points(vec![
            gold("a", 20.0, 0.0),
            GeoPoint::new("b", "Pit", "Coal").with_position(-20.0, 40.0),
        ]);
        assert_eq!(map.render().markers.len(), 2);
        assert!(!map.toggle_category("Coal"));
        let frame = map.render();
        assert_eq!(frame.markers.len(), 1);
        assert_eq!(frame.markers[0].category, "Gold");
        assert_eq!(frame.located_points, 2);
        assert!(map.toggle_category("Coal"));
        assert_eq!(map.render().markers.len(), 2);
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let map = map().with_points(vec![
            gold("a", 1.0, 1.0),
            GeoPoint::new("b", "Pit", "Coal").with_position(2.0, 2.0),
            gold("c", 3.0, 3.0),
            GeoPoint::new("d", "Unplaced", "Lithium"),
        ]);
        assert_eq!(
            map.categories(),
            vec![("Gold".to_string(), 2), ("Coal".to_string(), 1)]
        );
    }

    #[test]
    fn test_fullscreen_toggle_and_escape() {
        let mut map = map();
        assert_eq!(map.toggle_fullscreen(), FullscreenRequest::Enter);
        assert!(map.is_fullscreen());
        assert_eq!(
            map.handle_event(InputEvent::KeyPress {
                key: crate::input::KeyCode::Escape
            }),
            Some(FullscreenRequest::Exit)
        );
        assert!(!map.is_fullscreen());
        assert_eq!(
            map.handle_event(InputEvent::KeyPress {
                key: crate::input::KeyCode::Escape
            }),
            None
        );

        map.handle_event(InputEvent::FullscreenChanged { active: true });
        assert!(map.is_fullscreen());
        assert_eq!(map.toggle_fullscreen(), FullscreenRequest::Exit);
    }

    #[test]
    fn test_unknown_provider() {
        let mut map = map();
        assert!(matches!(
            map.set_provider("mapbox"),
            Err(MapError::UnknownProvider(_))
        ));
        assert_eq!(map.provider().id, "cartodb-dark");
    }

    #[test]
    fn test_view_changed_only_on_change() {
        let mut map = map();
        map.pan(0.0, 0.0);
        assert!(map.process_events().is_empty());
        map.zoom_by(1.0);
        assert_eq!(
            map.process_events(),
            vec![MapEvent::ViewChanged {
                center: LatLng::new(20.0, 0.0),
                zoom: 3.0
            }]
        );
    }

    #[test]
    fn test_fit_to_points() {
        let mut map = map().with_points(vec![gold("a", 10.0, 10.0)]);
        assert!(map.fit_to_points());
        assert_eq!(map.camera().zoom(), 5.0);
        assert_eq!(map.camera().center(), LatLng::new(10.0, 10.0));

        let mut empty = MineMap::new(MapOptions::default(), Point::new(800.0, 600.0)).unwrap();
        assert!(!empty.fit_to_points());
    }

    #[test]
    fn test_tile_urls_follow_provider() {
        let mut map = map();
        map.set_provider("osm").unwrap();
        let frame = map.render();
        assert!(!frame.tiles.is_empty());
        assert!(frame
            .tiles
            .iter()
            .all(|t| t.url.contains("tile.openstreetmap.org")));
        assert_eq!(frame.provider_id, "osm");
    }
}
