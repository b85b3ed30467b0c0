use minemap::{
    data::palette, FullscreenRequest, GeoPoint, MapEvent, MapPreset, MapWidget, MineMap, Point,
    TileCatalog, TileProvider,
};
use std::sync::mpsc;

/// Shown when no GeoJSON file is given on the command line
const SAMPLE_COMPANIES: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [115.86, -31.95] },
          "properties": { "symbol": "NST", "name": "Northern Star Resources", "exchange": "ASX", "primary_commodity": "Gold" } },
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [115.85, -31.96] },
          "properties": { "symbol": "PLS", "name": "Pilbara Minerals", "exchange": "ASX", "primary_commodity": "Lithium" } },
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [144.96, -37.81] },
          "properties": { "symbol": "BHP", "name": "BHP Group", "exchange": "ASX", "primary_commodity": "Iron Ore" } },
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [-79.38, 43.65] },
          "properties": { "symbol": "ABX", "name": "Barrick Gold", "exchange": "TSX", "primary_commodity": "Gold" } },
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [-79.39, 43.64] },
          "properties": { "symbol": "FM", "name": "First Quantum Minerals", "exchange": "TSX", "primary_commodity": "Copper" } },
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [28.04, -26.20] },
          "properties": { "symbol": "GFI", "name": "Gold Fields", "exchange": "JSE", "primary_commodity": "Gold" } },
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [-0.13, 51.51] },
          "properties": { "symbol": "RIO", "name": "Rio Tinto", "exchange": "LSE", "primary_commodity": "Diversified" } },
        { "type": "Feature", "geometry": null,
          "properties": { "symbol": "PEND", "name": "Unlocated Explorer", "primary_commodity": "Uranium" } }
    ]
}"#;

/// Standalone mining map viewer
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut preset = MapPreset::Global;
    let mut path = None;
    let mut tile_template = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--australia" => preset = MapPreset::Australia,
            "--tiles" => tile_template = args.next(),
            _ => path = Some(arg),
        }
    }

    let json = match &path {
        Some(path) => std::fs::read_to_string(path)?,
        None => SAMPLE_COMPANIES.to_string(),
    };

    let mut map = MineMap::from_preset(preset, Point::new(1200.0, 800.0))?;
    if let Some(template) = tile_template {
        // A custom tile server goes first in the base map list
        let sharded = template.contains("{s}");
        let mut custom = TileProvider::new("custom", "Custom", template, "")?;
        if !sharded {
            custom = custom.with_subdomains(Vec::<String>::new());
        }
        let mut catalog = TileCatalog::new(vec![custom])?;
        for provider in TileCatalog::builtin().providers() {
            catalog.insert(provider.clone());
        }
        map = map.with_catalog(catalog);
    }
    let count = map.load_geojson(&json)?;
    log::info!(
        "loaded {count} points from {}",
        path.as_deref().unwrap_or("built-in sample")
    );
    if path.is_some() {
        map.fit_to_points();
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Minemap - Mining Map Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "minemap-app",
        options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Box::new(MinemapApp::new(map))
        }),
    )?;

    Ok(())
}

/// The main application struct
struct MinemapApp {
    map: MineMap,
    selections: mpsc::Receiver<GeoPoint>,
    selected: Option<GeoPoint>,
    show_layer_panel: bool,
}

impl MinemapApp {
    fn new(mut map: MineMap) -> Self {
        let (sender, selections) = mpsc::channel();
        map.on_select_point(move |point| {
            let _ = sender.send(point.clone());
        });
        map.on("providerchanged", |event| {
            if let MapEvent::ProviderChanged { id } = event {
                log::info!("base map switched to {id}");
            }
        });

        Self {
            map,
            selections,
            selected: None,
            show_layer_panel: true,
        }
    }

    fn layer_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Base map");
        let current = self.map.provider().id.clone();
        let providers: Vec<(String, String)> = self
            .map
            .providers()
            .iter()
            .map(|p| (p.id.clone(), p.name.clone()))
            .collect();
        for (id, name) in providers {
            if ui.radio(current == id, name).clicked() {
                if let Err(e) = self.map.set_provider(&id) {
                    log::warn!("{e}");
                }
            }
        }

        ui.separator();
        ui.heading("Commodities");
        for (category, count) in self.map.categories() {
            let mut visible = self.map.is_category_visible(&category);
            let rgb = palette::category_color(&category);
            ui.horizontal(|ui| {
                let (swatch, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter()
                    .circle_filled(swatch.center(), 6.0, egui::Color32::from_rgb(rgb.0, rgb.1, rgb.2));
                if ui.checkbox(&mut visible, format!("{category} ({count})")).changed() {
                    self.map.set_category_visible(&category, visible);
                }
            });
        }

        ui.collapsing("Legend", |ui| {
            for (name, rgb) in palette::legend(12) {
                ui.horizontal(|ui| {
                    let (swatch, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                    ui.painter()
                        .circle_filled(swatch.center(), 6.0, egui::Color32::from_rgb(rgb.0, rgb.1, rgb.2));
                    ui.label(name);
                });
            }
        });

        if let Some(point) = &self.selected {
            ui.separator();
            ui.heading(&point.name);
            ui.label(format!("{} · {}", point.id, point.category));
            let properties = serde_json::to_string_pretty(&point.properties).unwrap_or_default();
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.monospace(properties);
            });
        }
    }
}

impl eframe::App for MinemapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(point) = self.selections.try_recv() {
            self.selected = Some(point);
        }
        for event in self.map.process_events() {
            log::trace!("{event:?}");
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_layer_panel, "Layer Panel");
                    if ui.button("Fit to companies").clicked() {
                        self.map.fit_to_points();
                        ui.close_menu();
                    }
                    if ui.button("Toggle fullscreen").clicked() {
                        let active = self.map.toggle_fullscreen() == FullscreenRequest::Enter;
                        ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(active));
                        ui.close_menu();
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let camera = self.map.camera();
                    ui.label(format!(
                        "Center: {:.4}, {:.4} | Zoom: {:.2} | {} of {} companies located",
                        camera.center().lat,
                        camera.center().lng,
                        camera.zoom(),
                        self.map.located_points(),
                        self.map.points().len(),
                    ));
                });
            });
        });

        if self.show_layer_panel {
            egui::SidePanel::right("layer_panel")
                .resizable(true)
                .show(ctx, |ui| self.layer_panel(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.add(MapWidget::new(&mut self.map));
            });
    }
}
