use crate::{
    core::{config::MapOptions, geo::Point},
    input::events::{InputEvent, KeyCode, MapEvent},
    prelude::{HashMap, VecDeque},
};

/// What the map should do in response to input
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Move the center by a pointer delta in pixels
    Pan { dx: f64, dy: f64 },
    /// Add to the zoom level
    Zoom { delta: f64 },
    /// Press and release without dragging
    Click { position: Point },
    /// Pointer hovering at a position, or gone
    Hover { position: Option<Point> },
    /// Back to the default view
    Reset,
    Resize { width: f64, height: f64 },
    /// Leave fullscreen if currently in it
    ExitFullscreen,
    /// Mirror the host's fullscreen state
    SyncFullscreen { active: bool },
}

/// Pointer state machine for drag panning
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionState {
    Idle,
    Dragging {
        /// Where the button went down
        origin: Point,
        /// Last position a pan was applied for
        last: Point,
        /// Set once the pointer strays further than the drag threshold
        moved: bool,
    },
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::Idle
    }
}

impl InteractionState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Event management system for the map
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event kind
    listeners: HashMap<String, Vec<EventCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Dispatch all queued events to their listeners and return them
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.kind()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("listeners", &self.listeners.len())
            .field("pending", &self.event_queue.len())
            .finish()
    }
}

/// Turns raw input into [`Action`]s
#[derive(Debug, Clone)]
pub struct InputHandler {
    pub enabled: bool,
    pub pan_on_drag: bool,
    pub zoom_on_wheel: bool,
    pub keyboard: bool,
    /// Zoom change per wheel notch
    pub wheel_step: f64,
    /// Zoom change per +/- key
    pub zoom_delta: f64,
    /// Pixels a press may travel and still count as a click
    pub drag_threshold: f64,
    state: InteractionState,
}

impl InputHandler {
    pub fn new(options: &MapOptions) -> Self {
        Self {
            enabled: true,
            pan_on_drag: true,
            zoom_on_wheel: true,
            keyboard: true,
            wheel_step: options.wheel_step,
            zoom_delta: options.zoom_delta,
            drag_threshold: options.drag_threshold,
            state: InteractionState::Idle,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Handle an input event and generate actions
    pub fn handle_event(&mut self, event: InputEvent) -> Vec<Action> {
        // Host-driven state must be mirrored even when interaction is off
        match event {
            InputEvent::Resize { size } => {
                return vec![Action::Resize {
                    width: size.x,
                    height: size.y,
                }]
            }
            InputEvent::FullscreenChanged { active } => {
                return vec![Action::SyncFullscreen { active }]
            }
            _ => {}
        }

        if !self.enabled {
            self.state = InteractionState::Idle;
            return vec![];
        }

        let mut actions = vec![];

        match event {
            InputEvent::PointerDown { position } => {
                self.state = InteractionState::Dragging {
                    origin: position,
                    last: position,
                    moved: false,
                };
                actions.push(Action::Hover { position: None });
            }
            InputEvent::PointerMove { position } => match self.state {
                InteractionState::Dragging { origin, last, moved } => {
                    let moved = moved || origin.distance_to(&position) > self.drag_threshold;
                    if self.pan_on_drag && position != last {
                        actions.push(Action::Pan {
                            dx: position.x - last.x,
                            dy: position.y - last.y,
                        });
                    }
                    self.state = InteractionState::Dragging {
                        origin,
                        last: position,
                        moved,
                    };
                }
                InteractionState::Idle => {
                    actions.push(Action::Hover {
                        position: Some(position),
                    });
                }
            },
            InputEvent::PointerUp { position } => {
                if let InteractionState::Dragging { origin, moved, .. } = self.state {
                    if !moved && origin.distance_to(&position) <= self.drag_threshold {
                        actions.push(Action::Click { position });
                    } else {
                        log::trace!("drag ended at ({}, {})", position.x, position.y);
                    }
                }
                self.state = InteractionState::Idle;
                actions.push(Action::Hover {
                    position: Some(position),
                });
            }
            InputEvent::PointerLeave => {
                self.state = InteractionState::Idle;
                actions.push(Action::Hover { position: None });
            }
            InputEvent::Wheel { delta_y, .. } => {
                if self.zoom_on_wheel && delta_y != 0.0 {
                    let delta = if delta_y > 0.0 {
                        -self.wheel_step
                    } else {
                        self.wheel_step
                    };
                    actions.push(Action::Zoom { delta });
                }
            }
            InputEvent::KeyPress { key } => match key {
                KeyCode::Escape => actions.push(Action::ExitFullscreen),
                _ if !self.keyboard => {}
                KeyCode::Plus => actions.push(Action::Zoom {
                    delta: self.zoom_delta,
                }),
                KeyCode::Minus => actions.push(Action::Zoom {
                    delta: -self.zoom_delta,
                }),
                KeyCode::Home => actions.push(Action::Reset),
                KeyCode::ArrowLeft => actions.push(Action::Pan { dx: 100.0, dy: 0.0 }),
                KeyCode::ArrowRight => actions.push(Action::Pan { dx: -100.0, dy: 0.0 }),
                KeyCode::ArrowUp => actions.push(Action::Pan { dx: 0.0, dy: 100.0 }),
                KeyCode::ArrowDown => actions.push(Action::Pan { dx: 0.0, dy: -100.0 }),
                KeyCode::Other(_) => {}
            },
            InputEvent::Resize { .. } | InputEvent::FullscreenChanged { .. } => {}
        }

        actions
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(&MapOptions::default())
    }
}
