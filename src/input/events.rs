use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};

/// Input events delivered by the host, in viewport pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Primary button pressed over the map
    PointerDown { position: Point },
    /// Pointer moved, with or without a button held
    PointerMove { position: Point },
    /// Primary button released
    PointerUp { position: Point },
    /// Pointer left the map container
    PointerLeave,
    /// Scroll wheel; positive `delta_y` scrolls down
    Wheel { delta_y: f64, position: Point },
    /// Keyboard input
    KeyPress { key: KeyCode },
    /// Viewport/window resize
    Resize { size: Point },
    /// The host's fullscreen state changed, whoever initiated it
    FullscreenChanged { active: bool },
}

/// Keyboard key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Plus,
    Minus,
    Home,
    Escape,
    Other(u32),
}

/// Events emitted by the map to registered listeners
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Center or zoom changed
    ViewChanged { center: LatLng, zoom: f64 },
    /// A single point was clicked
    PointSelected { id: String },
    /// A cluster was clicked and the view moved onto it
    ClusterExpanded { center: LatLng, zoom: f64, count: usize },
    /// Base tile provider changed
    ProviderChanged { id: String },
    /// Fullscreen mirror changed
    FullscreenChanged { active: bool },
    /// A category was shown or hidden
    CategoryToggled { category: String, visible: bool },
}

impl MapEvent {
    /// Listener key used by [`EventManager::on`](crate::input::EventManager::on)
    pub fn kind(&self) -> &'static str {
        match self {
            MapEvent::ViewChanged { .. } => "viewchanged",
            MapEvent::PointSelected { .. } => "pointselected",
            MapEvent::ClusterExpanded { .. } => "clusterexpanded",
            MapEvent::ProviderChanged { .. } => "providerchanged",
            MapEvent::FullscreenChanged { .. } => "fullscreenchanged",
            MapEvent::CategoryToggled { .. } => "categorytoggled",
        }
    }
}

impl InputEvent {
    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerDown { position }
            | InputEvent::PointerMove { position }
            | InputEvent::PointerUp { position }
            | InputEvent::Wheel { position, .. } => Some(*position),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_event_position() {
        let down = InputEvent::PointerDown {
            position: Point::new(100.0, 200.0),
        };
        assert_eq!(down.position(), Some(Point::new(100.0, 200.0)));

        let key = InputEvent::KeyPress {
            key: KeyCode::Escape,
        };
        assert_eq!(key.position(), None);
        assert_eq!(InputEvent::PointerLeave.position(), None);
    }

    #[test]
    fn test_map_event_kind() {
        let event = MapEvent::ViewChanged {
            center: LatLng::new(0.0, 0.0),
            zoom: 2.0,
        };
        assert_eq!(event.kind(), "viewchanged");
        assert_eq!(
            MapEvent::FullscreenChanged { active: true }.kind(),
            "fullscreenchanged"
        );
    }

    #[test]
    fn test_input_event_serde() {
        let event = InputEvent::Wheel {
            delta_y: 120.0,
            position: Point::new(10.0, 20.0),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: InputEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
