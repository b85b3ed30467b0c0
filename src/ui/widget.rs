use crate::{
    core::{
        config::TooltipConfig,
        geo::Point,
        map::{FullscreenRequest, MarkerView, MineMap, RenderFrame},
    },
    data::Rgb,
    input::{InputEvent, KeyCode},
    ui::tooltip::Tooltip,
};
use egui::load::{SizeHint, TexturePoll};
use egui::{
    Align2, Color32, FontId, Pos2, Rect, Response, Sense, Stroke, TextureOptions, Ui, Vec2, Widget,
};

const CONTROL_NAMES: [&str; 4] = ["zoom_in", "zoom_out", "reset", "fullscreen"];

/// Paints a [`MineMap`] into an egui `Ui` and feeds it egui's input.
///
/// ```rust,ignore
/// ui.add(MapWidget::new(&mut self.map));
/// ```
///
/// Fullscreen requests are forwarded to the viewport with
/// `ViewportCommand::Fullscreen`. Queued [`MapEvent`](crate::MapEvent)s are
/// dispatched to the map's listeners at the end of every frame.
///
/// Tile images go through egui's image loaders, so the host has to install
/// loaders that handle `https://` URIs and PNG/JPEG bytes, for example with
/// `egui_extras::install_image_loaders` and its `http` and `image` features.
/// Without them only the tile grid is drawn.
pub struct MapWidget<'a> {
    map: &'a mut MineMap,
    pub show_controls: bool,
    pub show_attribution: bool,
    pub load_tile_images: bool,
    pub background_color: Color32,
}

impl<'a> MapWidget<'a> {
    pub fn new(map: &'a mut MineMap) -> Self {
        Self {
            map,
            show_controls: true,
            show_attribution: true,
            load_tile_images: true,
            background_color: Color32::from_rgb(17, 24, 39),
        }
    }

    pub fn controls(mut self, show: bool) -> Self {
        self.show_controls = show;
        self
    }

    pub fn attribution(mut self, show: bool) -> Self {
        self.show_attribution = show;
        self
    }

    /// Skip fetching tile images and draw the tile grid only
    pub fn tile_images(mut self, load: bool) -> Self {
        self.load_tile_images = load;
        self
    }

    fn feed_input(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        let size = rect.size();
        let camera_size = self.map.camera().size();
        if camera_size.x != size.x as f64 || camera_size.y != size.y as f64 {
            self.map.handle_event(InputEvent::Resize {
                size: Point::new(size.x as f64, size.y as f64),
            });
        }

        let local = |pos: Pos2| Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
        let (pressed, released, pointer, scroll, host_fullscreen) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.hover_pos(),
                i.raw_scroll_delta.y,
                i.viewport().fullscreen,
            )
        });
        let dragging = self.map.interaction_state().is_dragging();
        let over_controls = self.show_controls
            && pointer.map_or(false, |pos| {
                control_rects(rect).iter().any(|(button, _)| button.contains(pos))
            });
        let over_map = response.hovered() && !over_controls;
        let mut events = Vec::new();

        match pointer {
            Some(pos) if over_map || dragging => {
                if pressed && over_map {
                    events.push(InputEvent::PointerDown { position: local(pos) });
                }
                events.push(InputEvent::PointerMove { position: local(pos) });
                if released {
                    events.push(InputEvent::PointerUp { position: local(pos) });
                }
                if scroll != 0.0 && over_map {
                    // egui reports wheel-up as positive
                    events.push(InputEvent::Wheel {
                        delta_y: -scroll as f64,
                        position: local(pos),
                    });
                }
            }
            _ => events.push(InputEvent::PointerLeave),
        }

        if response.hovered() {
            let keys = [
                (egui::Key::Escape, KeyCode::Escape),
                (egui::Key::Plus, KeyCode::Plus),
                (egui::Key::Minus, KeyCode::Minus),
                (egui::Key::Home, KeyCode::Home),
                (egui::Key::ArrowLeft, KeyCode::ArrowLeft),
                (egui::Key::ArrowRight, KeyCode::ArrowRight),
                (egui::Key::ArrowUp, KeyCode::ArrowUp),
                (egui::Key::ArrowDown, KeyCode::ArrowDown),
            ];
            for (egui_key, key) in keys {
                if ui.input(|i| i.key_pressed(egui_key)) {
                    events.push(InputEvent::KeyPress { key });
                }
            }
        }

        // Only mirror the host state when it actually changed, so a request
        // still in flight is not undone.
        let seen_id = response.id.with("host_fullscreen");
        let last_seen = ui.ctx().data(|d| d.get_temp::<bool>(seen_id));
        if let Some(active) = host_fullscreen {
            if last_seen != Some(active) {
                ui.ctx().data_mut(|d| d.insert_temp(seen_id, active));
                if last_seen.is_some() {
                    events.push(InputEvent::FullscreenChanged { active });
                }
            }
        }

        for event in events {
            if let Some(request) = self.map.handle_event(event) {
                send_fullscreen(ui, request);
            }
        }
    }

    fn paint_controls(&mut self, ui: &Ui, rect: Rect, id: egui::Id) {
        let fullscreen_label = if self.map.is_fullscreen() { "⤡" } else { "⤢" };
        let labels = ["+", "−", "⌂", fullscreen_label];

        for ((button_rect, name), label) in control_rects(rect).into_iter().zip(labels) {
            let response = ui.interact(button_rect, id.with(name), Sense::click());
            if response.clicked() {
                match name {
                    "zoom_in" => self.map.zoom_in(),
                    "zoom_out" => self.map.zoom_out(),
                    "reset" => self.map.reset_view(),
                    _ => {
                        let request = self.map.toggle_fullscreen();
                        send_fullscreen(ui, request);
                    }
                }
            }

            let fill = if response.hovered() {
                Color32::from_rgba_unmultiplied(255, 255, 255, 250)
            } else {
                Color32::from_rgba_unmultiplied(255, 255, 255, 220)
            };
            ui.painter().rect_filled(button_rect, 3.0, fill);
            ui.painter()
                .rect_stroke(button_rect, 3.0, Stroke::new(1.0, Color32::from_gray(100)));
            ui.painter().text(
                button_rect.center(),
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(16.0),
                Color32::BLACK,
            );
        }
    }
}

impl<'a> Widget for MapWidget<'a> {
    fn ui(mut self, ui: &mut Ui) -> Response {
        let desired_size = ui.available_size();
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());
        let revision = self.map.camera().revision();

        self.feed_input(ui, rect, &response);

        let frame = self.map.render();
        let style = FrameStyle {
            background: self.background_color,
            tile_images: self.load_tile_images,
            tooltip: self.map.options().tooltip.clone(),
        };
        paint_frame(ui, rect, &frame, &style);

        if self.show_attribution && !frame.attribution.is_empty() {
            ui.painter().text(
                rect.left_bottom() + Vec2::new(5.0, -5.0),
                Align2::LEFT_BOTTOM,
                &frame.attribution,
                FontId::proportional(10.0),
                Color32::from_gray(160),
            );
        }

        if self.show_controls {
            self.paint_controls(ui, rect, response.id);
        }

        if self.map.camera().revision() != revision {
            ui.ctx().request_repaint();
        }
        self.map.process_events();
        response
    }
}

/// Screen rectangles of the zoom in, zoom out, reset and fullscreen buttons
fn control_rects(rect: Rect) -> [(Rect, &'static str); 4] {
    let mut row = 0.0;
    CONTROL_NAMES.map(|name| {
        let button = Rect::from_min_size(
            rect.right_top() + Vec2::new(-40.0, 10.0 + row * 35.0),
            Vec2::splat(30.0),
        );
        row += 1.0;
        (button, name)
    })
}

fn send_fullscreen(ui: &Ui, request: FullscreenRequest) {
    let active = request == FullscreenRequest::Enter;
    log::debug!("fullscreen request: {request:?}");
    ui.ctx()
        .send_viewport_cmd(egui::ViewportCommand::Fullscreen(active));
}

fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

fn to_screen(rect: Rect, p: Point) -> Pos2 {
    rect.min + Vec2::new(p.x as f32, p.y as f32)
}

/// How [`paint_frame`] draws a frame
#[derive(Debug, Clone)]
pub struct FrameStyle {
    pub background: Color32,
    /// Load tile images through egui's loaders
    pub tile_images: bool,
    pub tooltip: TooltipConfig,
}

/// Paints tiles, markers and the tooltip of `frame` inside `rect`
pub fn paint_frame(ui: &Ui, rect: Rect, frame: &RenderFrame, style: &FrameStyle) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, style.background);

    for view in &frame.tiles {
        let min = to_screen(rect, view.tile.screen);
        let tile_rect = Rect::from_min_size(min, Vec2::splat(view.tile.size as f32));
        if !rect.intersects(tile_rect) {
            continue;
        }
        // The painter clips to `rect`, so edge tiles are cropped at full size
        match style.tile_images.then(|| tile_texture(ui, &view.url)).flatten() {
            Some(texture) => {
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                painter.image(texture, tile_rect, uv, Color32::WHITE);
            }
            None => {
                painter.rect_stroke(tile_rect, 0.0, Stroke::new(1.0, Color32::from_gray(60)));
            }
        }
    }

    for marker in &frame.markers {
        paint_marker(&painter, rect, marker);
    }

    if let Some(tooltip) = &frame.tooltip {
        paint_tooltip(&painter, rect, tooltip, &style.tooltip);
    }
}

/// The tile texture if the host's loaders have it ready
fn tile_texture(ui: &Ui, url: &str) -> Option<egui::TextureId> {
    match ui
        .ctx()
        .try_load_texture(url, TextureOptions::LINEAR, SizeHint::default())
    {
        Ok(TexturePoll::Ready { texture }) => Some(texture.id),
        Ok(TexturePoll::Pending { .. }) => None,
        Err(e) => {
            log::trace!("tile {url} unavailable: {e}");
            None
        }
    }
}

fn paint_marker(painter: &egui::Painter, rect: Rect, marker: &MarkerView) {
    let center = to_screen(rect, marker.screen);
    let radius = marker.size as f32 / 2.0;
    painter.circle_filled(center, radius, color(marker.color));
    painter.circle_stroke(center, radius, Stroke::new(2.0, Color32::WHITE));
    if marker.selected {
        painter.circle_stroke(center, radius + 4.0, Stroke::new(3.0, Color32::from_rgb(59, 130, 246)));
    }
    if let Some(label) = &marker.label {
        painter.text(
            center,
            Align2::CENTER_CENTER,
            label,
            FontId::proportional(12.0),
            Color32::WHITE,
        );
    }
}

fn paint_tooltip(painter: &egui::Painter, rect: Rect, tooltip: &Tooltip, config: &TooltipConfig) {
    let min = to_screen(rect, tooltip.bounds.min);
    let max = to_screen(rect, tooltip.bounds.max);
    let box_rect = Rect::from_min_max(min, max);
    painter.rect_filled(box_rect, 4.0, Color32::from_rgba_unmultiplied(17, 24, 39, 235));
    painter.rect_stroke(box_rect, 4.0, Stroke::new(1.0, Color32::from_gray(90)));

    let origin = to_screen(rect, tooltip.text_origin(config));
    for (row, line) in tooltip.lines.iter().enumerate() {
        painter.text(
            origin + Vec2::new(0.0, (config.line_height * row as f64) as f32),
            Align2::LEFT_TOP,
            line,
            FontId::proportional(12.0),
            Color32::from_gray(230),
        );
    }
}
