use crate::errors::error_types::ErrorTypes;

use super::point::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Enum representing the tile services the map can draw from.
pub enum Provider {
    OpenStreetMap,
    MapboxStreets,
    MapboxSatellite,
}

/// Highest zoom level tile servers usually publish.
pub const MAX_ZOOM: u8 = 19;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Credit line the tile provider requires next to its imagery.
pub struct Attribution {
    pub text: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
/// A raster tile layer addressed by a `{z}/{x}/{y}` url template.
pub struct TileLayer {
    pub provider: Provider,
    pub url_template: String,
    pub tile_size: u32,
    pub attribution: Attribution,
}

impl TileLayer {
    /// The public OpenStreetMap tile server.
    pub fn open_street_map() -> Self {
        Self {
            provider: Provider::OpenStreetMap,
            url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            tile_size: 256,
            attribution: Attribution {
                text: "© OpenStreetMap contributors",
                url: "https://www.openstreetmap.org/copyright",
            },
        }
    }

    /// Returns the url of a single tile.
    pub fn tile_url(&self, zoom: u8, x: u32, y: u32) -> String {
        self.url_template
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }

    /// Checks that the template addresses tiles by zoom, column and row.
    pub fn check_template(&self) -> Result<(), ErrorTypes> {
        let complete = ["{z}", "{x}", "{y}"]
            .iter()
            .all(|placeholder| self.url_template.contains(placeholder));
        if !complete {
            return Err(ErrorTypes::new(
                311,
                format!(
                    "Tile url template {} must contain {{z}}, {{x}} and {{y}}",
                    self.url_template
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Center and zoom level of the map.
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq)]
/// A pin on the map, optionally carrying a popup label.
pub struct Marker {
    pub position: Coordinate,
    pub popup: Option<String>,
    pub popup_open: bool,
}

impl Marker {
    /// Creates a marker whose popup is shown right away.
    pub fn with_open_popup(position: Coordinate, text: &str) -> Self {
        Self {
            position,
            popup: Some(text.to_string()),
            popup_open: true,
        }
    }
}

/// A live map instance attached to a display surface.
pub trait MapWidget {
    /// Moves the map to `center` at `zoom`.
    fn set_view(&mut self, center: Coordinate, zoom: u8) -> Result<(), ErrorTypes>;

    fn view(&self) -> MapView;

    /// Adds a marker. The widget keeps it until it is removed.
    fn add_marker(&mut self, marker: Marker);

    fn markers(&self) -> &[Marker];

    /// Detaches the map from its surface and drops its layers and markers.
    fn remove(&mut self);
}

/// Something a map can be rendered into.
pub trait MapSurface {
    type Widget: MapWidget;

    /// Creates a map on this surface showing `view` with `layer` as base layer.
    fn attach(&self, view: MapView, layer: TileLayer) -> Result<Self::Widget, ErrorTypes>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_template_without_placeholders_is_rejected() {
        let mut layer = TileLayer::open_street_map();
        assert!(layer.check_template().is_ok());
        layer.url_template = "https://tile.openstreetmap.org/{z}/{x}.png".to_string();
        assert_eq!(layer.check_template().unwrap_err().code(), 311);
    }

    #[test]
    fn test_tile_url() {
        let layer = TileLayer::open_street_map();
        assert_eq!(
            layer.tile_url(10, 657, 438),
            "https://tile.openstreetmap.org/10/657/438.png"
        );
    }
}
