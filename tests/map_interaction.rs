//! End-to-end interaction scenarios driven through `MineMap::handle_event`

use minemap::{
    FullscreenRequest, GeoPoint, InputEvent, KeyCode, LatLng, MapEvent, MapOptions, MineMap, Point,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn new_map() -> MineMap {
    init_logging();
    MineMap::new(MapOptions::default(), Point::new(800.0, 600.0)).unwrap()
}

fn click(map: &mut MineMap, position: Point) {
    map.handle_event(InputEvent::PointerDown { position });
    map.handle_event(InputEvent::PointerUp { position });
}

const ONE_COMPANY: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [20.0, 10.0] },
            "properties": {
                "id": "1",
                "name": "Kalahari Gold",
                "category": "Gold",
                "exchange": "JSE",
                "market_cap": 1250000000,
                "secondary_commodities": ["Silver", "Copper"],
                "website": null
            }
        }
    ]
}"#;

#[test]
fn test_single_point_click_passes_full_properties() {
    let mut map = new_map();
    map.load_geojson(ONE_COMPANY).unwrap();
    map.set_view(LatLng::new(20.0, 0.0), 2.0);

    let frame = map.render();
    assert_eq!(frame.markers.len(), 1);
    assert_eq!(frame.markers[0].count, 1);
    assert_eq!(frame.markers[0].size, 24.0);
    assert_eq!(frame.markers[0].label, None);

    let received: Rc<RefCell<Option<GeoPoint>>> = Rc::new(RefCell::new(None));
    let sink = received.clone();
    map.on_select_point(move |point| *sink.borrow_mut() = Some(point.clone()));

    click(&mut map, frame.markers[0].screen);

    let received = received.borrow();
    let point = received.as_ref().expect("callback was not invoked");
    assert_eq!(point, &map.points()[0]);
    assert_eq!(point.properties.len(), 7);
    assert_eq!(point.property("market_cap"), Some(&serde_json::json!(1250000000)));
    assert_eq!(
        point.property("secondary_commodities"),
        Some(&serde_json::json!(["Silver", "Copper"]))
    );
    assert!(point.property("website").unwrap().is_null());
    assert_eq!(map.selected_id(), Some("1"));
}

#[test]
fn test_cluster_click_centers_on_first_member() {
    let mut map = new_map().with_points(vec![
        GeoPoint::new("1", "First", "Gold").with_position(10.0, 20.0),
        GeoPoint::new("2", "Second", "Gold").with_position(10.01, 20.01),
    ]);
    map.set_view(LatLng::new(20.0, 0.0), 2.0);

    let frame = map.render();
    assert_eq!(frame.markers.len(), 1);
    assert_eq!(frame.markers[0].count, 2);
    assert_eq!(frame.markers[0].label.as_deref(), Some("2"));
    assert_eq!(frame.markers[0].member_ids, vec!["1", "2"]);

    let selections = Rc::new(RefCell::new(0));
    let counter = selections.clone();
    map.on_select_point(move |_| *counter.borrow_mut() += 1);

    click(&mut map, frame.markers[0].screen);

    assert_eq!(map.camera().center(), LatLng::new(10.0, 20.0));
    assert_eq!(map.camera().zoom(), 4.0);
    assert_eq!(*selections.borrow(), 0);
    assert_eq!(map.selected_id(), None);

    let events = map.process_events();
    assert!(events.contains(&MapEvent::ClusterExpanded {
        center: LatLng::new(10.0, 20.0),
        zoom: 4.0,
        count: 2
    }));
}

#[test]
fn test_provider_switch_preserves_camera() {
    let mut map = new_map();
    map.handle_event(InputEvent::PointerDown { position: Point::new(400.0, 300.0) });
    map.handle_event(InputEvent::PointerMove { position: Point::new(350.0, 280.0) });
    map.handle_event(InputEvent::PointerUp { position: Point::new(350.0, 280.0) });
    map.zoom_by(1.5);

    let before = map.camera().state().clone();
    let revision = map.camera().revision();
    for provider in ["osm", "satellite", "terrain", "cartodb-light"] {
        map.set_provider(provider).unwrap();
        assert_eq!(map.camera().state(), &before);
        assert_eq!(map.render().provider_id, provider);
    }
    assert_eq!(map.camera().revision(), revision);
}

#[test]
fn test_drag_pans_and_does_not_click() {
    let mut map = new_map().with_points(vec![
        GeoPoint::new("1", "Center", "Gold").with_position(20.0, 0.0),
    ]);
    let selections = Rc::new(RefCell::new(0));
    let counter = selections.clone();
    map.on_select_point(move |_| *counter.borrow_mut() += 1);

    map.handle_event(InputEvent::PointerDown { position: Point::new(400.0, 300.0) });
    assert!(map.interaction_state().is_dragging());
    map.handle_event(InputEvent::PointerMove { position: Point::new(500.0, 300.0) });
    map.handle_event(InputEvent::PointerUp { position: Point::new(500.0, 300.0) });

    let expected_lng = -100.0 * 360.0 / (4.0 * 256.0);
    assert!((map.camera().center().lng - expected_lng).abs() < 1e-9);
    assert_eq!(map.camera().center().lat, 20.0);
    assert_eq!(*selections.borrow(), 0);
    assert!(!map.interaction_state().is_dragging());

    // The marker followed the drag
    let marker = &map.render().markers[0];
    assert!((marker.screen.x - 500.0).abs() < 1e-6);
}

#[test]
fn test_wheel_zooms_by_half_steps() {
    let mut map = new_map();
    let position = Point::new(400.0, 300.0);
    map.handle_event(InputEvent::Wheel { delta_y: 100.0, position });
    assert_eq!(map.camera().zoom(), 1.5);
    map.handle_event(InputEvent::Wheel { delta_y: 100.0, position });
    map.handle_event(InputEvent::Wheel { delta_y: 100.0, position });
    assert_eq!(map.camera().zoom(), 1.0);
    map.handle_event(InputEvent::Wheel { delta_y: -40.0, position });
    assert_eq!(map.camera().zoom(), 1.5);
}

#[test]
fn test_hover_tooltip_lists_members() {
    let points: Vec<GeoPoint> = (0..12)
        .map(|i| GeoPoint::new(i.to_string(), format!("Mine {i}"), "Copper").with_position(20.0, 0.0))
        .collect();
    let mut map = new_map().with_points(points);

    map.handle_event(InputEvent::PointerMove { position: Point::new(402.0, 301.0) });
    let frame = map.render();
    let tooltip = frame.tooltip.expect("hovering a marker shows a tooltip");
    assert_eq!(tooltip.lines.len(), 9);
    assert_eq!(tooltip.lines[0], "Mine 0 (Copper)");
    assert_eq!(tooltip.lines[8], "+4 more");
    assert!(tooltip.bounds.max.x <= 800.0 && tooltip.bounds.max.y <= 600.0);
    assert!(tooltip.bounds.min.x >= 0.0 && tooltip.bounds.min.y >= 0.0);

    map.handle_event(InputEvent::PointerLeave);
    assert!(map.render().tooltip.is_none());
}

#[test]
fn test_fullscreen_round_trip() {
    let mut map = new_map();
    assert_eq!(map.toggle_fullscreen(), FullscreenRequest::Enter);
    assert!(map.render().fullscreen);

    // The host left fullscreen on its own
    map.handle_event(InputEvent::FullscreenChanged { active: false });
    assert!(!map.is_fullscreen());
    assert_eq!(
        map.handle_event(InputEvent::KeyPress { key: KeyCode::Escape }),
        None
    );

    map.toggle_fullscreen();
    assert_eq!(
        map.handle_event(InputEvent::KeyPress { key: KeyCode::Escape }),
        Some(FullscreenRequest::Exit)
    );
}

#[test]
fn test_view_listeners_fire() {
    let mut map = new_map();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    map.on("viewchanged", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    map.handle_event(InputEvent::KeyPress { key: KeyCode::Plus });
    map.handle_event(InputEvent::KeyPress { key: KeyCode::Home });
    map.handle_event(InputEvent::KeyPress { key: KeyCode::Home });
    map.process_events();

    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(map.camera().zoom(), 2.0);
}

#[test]
fn test_resize_changes_tile_coverage() {
    let mut map = new_map();
    map.set_view(LatLng::new(0.0, 0.0), 5.0);
    let small = map.render().tiles.len();
    map.handle_event(InputEvent::Resize { size: Point::new(1600.0, 1200.0) });
    assert_eq!(map.camera().size(), Point::new(1600.0, 1200.0));
    assert!(map.render().tiles.len() > small);
}
