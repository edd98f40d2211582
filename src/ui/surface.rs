use std::collections::HashMap;

use egui::{Context, Ui};
use log::{debug, warn};
use walkers::{Map, MapMemory, Position, Tiles};

use crate::{
    errors::error_types::ErrorTypes,
    map::{
        point::Coordinate,
        widget::{MapSurface, MapView, MapWidget, Marker, Provider, TileLayer, MAX_ZOOM},
    },
};

use super::{markers::MarkersPlugin, provider::providers};

pub fn to_position(coordinate: Coordinate) -> Position {
    Position::from_lon_lat(coordinate.lng, coordinate.lat)
}

pub fn to_coordinate(position: Position) -> Coordinate {
    Coordinate::new(position.lat(), position.lon())
}

/// Renders maps into the egui window.
#[derive(Clone)]
pub struct EguiSurface {
    egui_ctx: Context,
    mapbox_access_token: Option<String>,
}

impl EguiSurface {
    pub fn new(egui_ctx: Context, mapbox_access_token: Option<String>) -> Self {
        Self {
            egui_ctx,
            mapbox_access_token,
        }
    }
}

impl MapSurface for EguiSurface {
    type Widget = WalkersMap;

    fn attach(&self, view: MapView, layer: TileLayer) -> Result<WalkersMap, ErrorTypes> {
        layer.check_template()?;
        let tiles = providers(
            self.egui_ctx.to_owned(),
            &layer,
            self.mapbox_access_token.as_deref(),
        );

        let home = to_position(view.center);
        let mut map = WalkersMap {
            memory: MapMemory::default(),
            home,
            tiles,
            layer,
            markers: vec![],
            attached: true,
        };
        map.set_view(view.center, view.zoom)?;
        Ok(map)
    }
}

/// A `walkers` map together with its tile sources and markers.
pub struct WalkersMap {
    memory: MapMemory,
    home: Position,
    tiles: HashMap<Provider, (TileLayer, Box<dyn Tiles + Send>)>,
    layer: TileLayer,
    markers: Vec<Marker>,
    attached: bool,
}

impl std::fmt::Debug for WalkersMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkersMap")
            .field("layer", &self.layer)
            .field("markers", &self.markers)
            .field("attached", &self.attached)
            .finish()
    }
}

impl WalkersMap {
    /// Draws the map and its markers.
    ///
    /// # Arguments
    /// * `ui` - The Egui UI.
    pub fn show(&mut self, ui: &mut Ui) {
        if !self.attached {
            return;
        }
        let tiles = match self.tiles.get_mut(&self.layer.provider) {
            Some((_, tiles)) => tiles.as_mut(),
            None => {
                warn!("Selected provider {:?} not found", self.layer.provider);
                return;
            }
        };

        let map = Map::new(Some(tiles), &mut self.memory, self.home)
            .with_plugin(MarkersPlugin::new(&mut self.markers));
        ui.add(map);
    }

    pub fn layer(&self) -> &TileLayer {
        &self.layer
    }

    /// Providers this map can switch to.
    pub fn available_providers(&self) -> Vec<Provider> {
        let mut providers: Vec<Provider> = self.tiles.keys().copied().collect();
        providers.sort_by_key(|provider| *provider as u8);
        providers
    }

    /// Replaces the base layer, keeping view and markers.
    pub fn set_provider(&mut self, provider: Provider) {
        if let Some((layer, _)) = self.tiles.get(&provider) {
            debug!("Switching base layer to {:?}", provider);
            self.layer = layer.clone();
        }
    }

    pub fn zoom_in(&mut self) {
        let _ = self.memory.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        let _ = self.memory.zoom_out();
    }
}

impl MapWidget for WalkersMap {
    fn set_view(&mut self, center: Coordinate, zoom: u8) -> Result<(), ErrorTypes> {
        let out_of_range = || ErrorTypes::new(310, format!("Zoom level {} is out of range", zoom));
        if zoom > MAX_ZOOM {
            return Err(out_of_range());
        }
        self.memory
            .set_zoom(f64::from(zoom))
            .map_err(|_| out_of_range())?;
        self.memory.center_at(to_position(center));
        Ok(())
    }

    fn view(&self) -> MapView {
        let center = self.memory.detached().unwrap_or(self.home);
        MapView {
            center: to_coordinate(center),
            zoom: self.memory.zoom().round() as u8,
        }
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn markers(&self) -> &[Marker] {
        &self.markers
    }

    fn remove(&mut self) {
        if self.attached {
            self.attached = false;
            self.tiles.clear();
            self.markers.clear();
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;
    use crate::{
        geolocation::locator::DeniedLocator,
        map::{
            controller::{MapViewController, ViewOptions},
            point_source::BuiltinPoints,
        },
    };

    fn initial() -> MapView {
        ViewOptions::default().initial
    }

    fn assert_view(actual: MapView, expected: MapView) {
        assert!((actual.center.lat - expected.center.lat).abs() < 1e-9);
        assert!((actual.center.lng - expected.center.lng).abs() < 1e-9);
        assert_eq!(actual.zoom, expected.zoom);
    }

    fn attach() -> WalkersMap {
        EguiSurface::new(Context::default(), None)
            .attach(initial(), TileLayer::open_street_map())
            .unwrap()
    }

    #[test]
    fn test_attach_shows_initial_view() {
        let map = attach();
        assert_view(map.view(), initial());
        assert_eq!(map.layer(), &TileLayer::open_street_map());
        assert_eq!(map.available_providers(), vec![Provider::OpenStreetMap]);
    }

    #[test]
    fn test_set_view_reads_back() {
        let mut map = attach();
        let pyramids = Coordinate::new(29.979235, 31.134202);
        map.set_view(pyramids, 13).unwrap();
        assert_view(
            map.view(),
            MapView {
                center: pyramids,
                zoom: 13,
            },
        );
    }

    #[test]
    fn test_zoom_out_of_range_keeps_view() {
        let mut map = attach();
        let error = map
            .set_view(Coordinate::new(0.0, 0.0), MAX_ZOOM + 1)
            .unwrap_err();
        assert_eq!(error.code(), 310);
        assert_view(map.view(), initial());
    }

    #[test]
    fn test_attach_errors() {
        let surface = EguiSurface::new(Context::default(), None);
        let mut layer = TileLayer::open_street_map();
        layer.url_template = "https://tile.openstreetmap.org/tiles.png".to_string();
        assert_eq!(surface.attach(initial(), layer).unwrap_err().code(), 311);

        let too_close = MapView {
            center: initial().center,
            zoom: MAX_ZOOM + 1,
        };
        assert_eq!(
            surface
                .attach(too_close, TileLayer::open_street_map())
                .unwrap_err()
                .code(),
            310
        );
    }

    #[test]
    fn test_mapbox_token_adds_providers() {
        let mut map = EguiSurface::new(Context::default(), Some("pk.test".to_string()))
            .attach(initial(), TileLayer::open_street_map())
            .unwrap();
        assert_eq!(
            map.available_providers(),
            vec![
                Provider::OpenStreetMap,
                Provider::MapboxStreets,
                Provider::MapboxSatellite
            ]
        );

        map.set_provider(Provider::MapboxSatellite);
        assert_eq!(map.layer().provider, Provider::MapboxSatellite);
        assert_eq!(map.layer().tile_size, 512);
    }

    #[test]
    fn test_remove_drops_tiles_and_markers() {
        let mut map = attach();
        map.add_marker(Marker::with_open_popup(initial().center, "x"));
        map.remove();
        assert!(!map.attached);
        assert!(map.markers().is_empty());
        assert!(map.available_providers().is_empty());
    }

    #[test]
    fn test_select_location_on_egui_surface() {
        let surface = EguiSurface::new(Context::default(), None);
        let mut controller: MapViewController<EguiSurface> = MapViewController::new(
            ViewOptions::default(),
            Box::new(BuiltinPoints),
            Arc::new(DeniedLocator),
        );
        controller.initialize(&surface).unwrap();

        let point = controller.visible_points()[0].clone();
        controller.select_location(&point).unwrap();
        assert_view(
            controller.view().unwrap(),
            MapView {
                center: point.coordinate(),
                zoom: 13,
            },
        );
        assert_eq!(controller.widget().unwrap().markers().len(), 1);

        controller.teardown();
        assert!(controller.widget().is_none());
    }
}
