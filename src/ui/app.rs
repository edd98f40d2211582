use egui::{Context, RichText, ScrollArea, SidePanel, TextEdit};
use log::{error, warn};

use crate::{
    config::settings::Settings,
    map::{controller::MapViewController, point::Point},
};

use super::{fonts::install_fonts, surface::EguiSurface, windows};

const TITLE: &str = "تطبيق الخريطة";
const SEARCH_HINT: &str = "ابحث عن موقع...";
const MY_LOCATION: &str = "موقعي الحالي";
const SHOW_MAP: &str = "عرض الخريطة";

/// Main application structure.
pub struct MapViewApp {
    controller: MapViewController<EguiSurface>,
    surface: EguiSurface,
    show_map: bool,
}

impl MapViewApp {
    /// Creates the application and mounts the map.
    ///
    /// # Arguments
    /// * `egui_ctx` - The Egui context.
    /// * `settings` - The user settings.
    pub fn new(egui_ctx: Context, settings: &Settings) -> Self {
        egui_extras::install_image_loaders(&egui_ctx);
        if let Err(err) = install_fonts(&egui_ctx, settings.font_file.as_deref()) {
            warn!("{}", err);
        }

        let mut controller = MapViewController::new(
            settings.view_options(),
            settings.point_source(),
            settings.locator(),
        );
        let repaint_ctx = egui_ctx.clone();
        controller.set_wakeup(move || repaint_ctx.request_repaint());

        let mut app = Self {
            controller,
            surface: EguiSurface::new(egui_ctx, settings.mapbox_access_token.clone()),
            show_map: true,
        };
        app.mount();
        app
    }

    fn mount(&mut self) {
        if let Err(err) = self.controller.initialize(&self.surface) {
            error!("Could not create the map: {}", err);
            self.show_map = false;
        }
    }

    fn side_panel(&mut self, ctx: &Context) {
        SidePanel::left("locations")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading(RichText::new(format!("🗺 {}", TITLE)));
                ui.add_space(8.0);

                let mut term = self.controller.search_term().to_string();
                if ui
                    .add(TextEdit::singleline(&mut term).hint_text(SEARCH_HINT))
                    .changed()
                {
                    self.controller.set_search_term(&term);
                }

                if ui.button(format!("➤ {}", MY_LOCATION)).clicked() {
                    if let Err(err) = self.controller.center_on_current_location() {
                        warn!("{}", err);
                    }
                }

                if ui.checkbox(&mut self.show_map, SHOW_MAP).changed() {
                    if self.show_map {
                        self.mount();
                    } else {
                        self.controller.teardown();
                    }
                }
                ui.separator();

                let mut selected: Option<Point> = None;
                ScrollArea::vertical().show(ui, |ui| {
                    for point in self.controller.visible_points() {
                        if ui.selectable_label(false, point.name.as_str()).clicked() {
                            selected = Some(point.clone());
                        }
                    }
                });
                if let Some(point) = selected {
                    if let Err(err) = self.controller.select_location(&point) {
                        warn!("{}", err);
                    }
                }
            });
    }
}

impl eframe::App for MapViewApp {
    /// Updates the application state.
    ///
    /// # Arguments
    /// * `ctx` - The Egui context.
    /// * `_frame` - The Eframe frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll_location();
        self.side_panel(ctx);

        let rimless = egui::Frame {
            fill: ctx.style().visuals.panel_fill,
            ..Default::default()
        };

        egui::CentralPanel::default()
            .frame(rimless)
            .show(ctx, |ui| match self.controller.widget_mut() {
                Some(map) => {
                    map.show(ui);
                    windows::zoom(ui, map);
                    windows::choose_provider(ui, map);
                    let attribution = map.layer().attribution;
                    windows::acknowledge(ui, &attribution);
                }
                None => {
                    ui.centered_and_justified(|ui| ui.weak(SHOW_MAP));
                }
            });
    }
}
