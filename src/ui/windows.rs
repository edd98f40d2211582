use egui::{Align2, ComboBox, RichText, Ui, Window};

use crate::map::widget::{Attribution, Provider};

use super::surface::WalkersMap;

/// Shows the zoom window.
///
/// # Arguments
/// * `ui` - The Egui UI.
/// * `map` - The map to zoom.
pub fn zoom(ui: &Ui, map: &mut WalkersMap) {
    Window::new("Map")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::LEFT_BOTTOM, [10., -10.])
        .show(ui.ctx(), |ui| {
            ui.horizontal(|ui| {
                if ui.button(RichText::new("➕").heading()).clicked() {
                    map.zoom_in();
                }

                if ui.button(RichText::new("➖").heading()).clicked() {
                    map.zoom_out();
                }
            });
        });
}

/// Shows a selector of the base layer when more than one provider is available.
pub fn choose_provider(ui: &Ui, map: &mut WalkersMap) {
    let available = map.available_providers();
    if available.len() < 2 {
        return;
    }

    Window::new("Provider")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::RIGHT_TOP, [-10., 10.])
        .show(ui.ctx(), |ui| {
            let mut selected = map.layer().provider;
            ComboBox::from_label("Tiles")
                .selected_text(provider_name(selected))
                .show_ui(ui, |ui| {
                    for provider in available {
                        ui.selectable_value(&mut selected, provider, provider_name(provider));
                    }
                });
            if selected != map.layer().provider {
                map.set_provider(selected);
            }
        });
}

/// Shows the attribution the tile provider asks for.
pub fn acknowledge(ui: &Ui, attribution: &Attribution) {
    Window::new("Acknowledge")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::RIGHT_BOTTOM, [-10., -10.])
        .show(ui.ctx(), |ui| {
            ui.hyperlink_to(attribution.text, attribution.url);
        });
}

/// Label of a provider in the selector.
pub fn provider_name(provider: Provider) -> &'static str {
    match provider {
        Provider::OpenStreetMap => "OpenStreetMap",
        Provider::MapboxStreets => "Mapbox Streets",
        Provider::MapboxSatellite => "Mapbox Satellite",
    }
}
