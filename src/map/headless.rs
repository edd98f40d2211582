use std::{cell::Cell, rc::Rc};

use log::debug;

use crate::errors::error_types::ErrorTypes;

use super::{
    point::Coordinate,
    widget::{MapSurface, MapView, MapWidget, Marker, TileLayer, MAX_ZOOM},
};

/// A surface that keeps maps in memory, for running the controller without a window.
///
/// Clones share the same counters.
#[derive(Debug, Default, Clone)]
pub struct HeadlessSurface {
    live: Rc<Cell<usize>>,
    attached: Rc<Cell<usize>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of maps attached and not yet removed.
    pub fn live_widgets(&self) -> usize {
        self.live.get()
    }

    /// Number of maps ever attached.
    pub fn attached_widgets(&self) -> usize {
        self.attached.get()
    }
}

impl MapSurface for HeadlessSurface {
    type Widget = HeadlessMap;

    fn attach(&self, view: MapView, layer: TileLayer) -> Result<HeadlessMap, ErrorTypes> {
        if view.zoom > MAX_ZOOM {
            return Err(ErrorTypes::new(
                310,
                format!("Zoom level {} is out of range", view.zoom),
            ));
        }
        layer.check_template()?;
        self.live.set(self.live.get() + 1);
        self.attached.set(self.attached.get() + 1);
        debug!("Headless map attached ({} live)", self.live.get());
        Ok(HeadlessMap {
            view,
            layers: vec![layer],
            markers: vec![],
            live: Some(Rc::clone(&self.live)),
        })
    }
}

/// In-memory map state.
#[derive(Debug)]
pub struct HeadlessMap {
    view: MapView,
    layers: Vec<TileLayer>,
    markers: Vec<Marker>,
    live: Option<Rc<Cell<usize>>>,
}

impl HeadlessMap {
    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    pub fn is_attached(&self) -> bool {
        self.live.is_some()
    }
}

impl MapWidget for HeadlessMap {
    fn set_view(&mut self, center: Coordinate, zoom: u8) -> Result<(), ErrorTypes> {
        if zoom > MAX_ZOOM {
            return Err(ErrorTypes::new(
                310,
                format!("Zoom level {} is out of range", zoom),
            ));
        }
        self.view = MapView { center, zoom };
        Ok(())
    }

    fn view(&self) -> MapView {
        self.view
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn markers(&self) -> &[Marker] {
        &self.markers
    }

    fn remove(&mut self) {
        if let Some(live) = self.live.take() {
            live.set(live.get().saturating_sub(1));
            self.layers.clear();
            self.markers.clear();
        }
    }
}

impl Drop for HeadlessMap {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn view() -> MapView {
        MapView {
            center: Coordinate::new(25.276987, 55.296249),
            zoom: 10,
        }
    }

    #[test]
    fn test_remove_releases_the_surface() {
        let surface = HeadlessSurface::new();
        let mut map = surface.attach(view(), TileLayer::open_street_map()).unwrap();
        assert_eq!(surface.live_widgets(), 1);
        assert_eq!(map.layers().len(), 1);

        map.remove();
        map.remove();
        assert_eq!(surface.live_widgets(), 0);
        assert!(!map.is_attached());
    }

    #[test]
    fn test_dropping_counts_as_removal() {
        let surface = HeadlessSurface::new();
        {
            let _map = surface.attach(view(), TileLayer::open_street_map()).unwrap();
            assert_eq!(surface.live_widgets(), 1);
        }
        assert_eq!(surface.live_widgets(), 0);
        assert_eq!(surface.attached_widgets(), 1);
    }

    #[test]
    fn test_rejects_unknown_zoom() {
        let surface = HeadlessSurface::new();
        let mut map = surface.attach(view(), TileLayer::open_street_map()).unwrap();
        assert_eq!(
            map.set_view(Coordinate::new(0.0, 0.0), 30).unwrap_err().code(),
            310
        );
        assert_eq!(map.view(), view());
    }

    #[test]
    fn test_rejects_template_without_placeholders() {
        let surface = HeadlessSurface::new();
        let mut layer = TileLayer::open_street_map();
        layer.url_template = "https://tile.openstreetmap.org/{z}/tiles.png".to_string();
        assert_eq!(surface.attach(view(), layer).unwrap_err().code(), 311);
        assert_eq!(surface.attached_widgets(), 0);
    }
}
