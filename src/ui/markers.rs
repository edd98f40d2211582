use egui::{vec2, Color32, FontId, Painter, Pos2, Rect, Response, Stroke};
use walkers::{Plugin, Projector};

use crate::map::widget::Marker;

use super::surface::to_position;

const PIN_RADIUS: f32 = 7.0;
/// Distance in points under which a click hits a marker.
const CLICK_RADIUS: f32 = 12.0;
const PIN_COLOR: Color32 = Color32::from_rgb(0x1e, 0x88, 0xe5);

/// Draws the markers of a map and toggles their popup when clicked.
pub struct MarkersPlugin<'a> {
    markers: &'a mut Vec<Marker>,
}

impl<'a> MarkersPlugin<'a> {
    pub fn new(markers: &'a mut Vec<Marker>) -> Self {
        Self { markers }
    }
}

impl Plugin for MarkersPlugin<'_> {
    fn run(&mut self, response: &Response, painter: Painter, projector: &Projector) {
        if !response.changed() && response.clicked_by(egui::PointerButton::Primary) {
            if let Some(pointer_pos) = response.interact_pointer_pos() {
                // Newest marker wins when several overlap.
                let hit = self.markers.iter_mut().rev().find(|marker| {
                    let screen_pos = projector.project(to_position(marker.position)).to_pos2();
                    screen_pos.distance(pointer_pos) < CLICK_RADIUS
                });
                if let Some(marker) = hit {
                    if marker.popup.is_some() {
                        marker.popup_open = !marker.popup_open;
                    }
                }
            }
        }

        for marker in self.markers.iter() {
            let screen_pos = projector.project(to_position(marker.position)).to_pos2();
            painter.circle_filled(screen_pos, PIN_RADIUS, PIN_COLOR);
            painter.circle_stroke(screen_pos, PIN_RADIUS, Stroke::new(2.0, Color32::WHITE));

            if let (Some(text), true) = (&marker.popup, marker.popup_open) {
                draw_popup(&painter, screen_pos, text);
            }
        }
    }
}

fn draw_popup(painter: &Painter, anchor: Pos2, text: &str) {
    let galley = painter.layout_no_wrap(
        text.to_string(),
        FontId::proportional(14.0),
        Color32::BLACK,
    );
    let size = galley.size() + vec2(16.0, 10.0);
    let center = anchor - vec2(0.0, PIN_RADIUS + 6.0 + size.y / 2.0);
    let rect = Rect::from_center_size(center, size);

    painter.rect_filled(rect, 4.0, Color32::WHITE);
    painter.rect_stroke(rect, 4.0, Stroke::new(1.0, Color32::GRAY));
    painter.galley(rect.min + vec2(8.0, 5.0), galley, Color32::BLACK);
}
