use std::{
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    time::{Duration, Instant},
};

use log::{debug, info, warn};
use threadpool::ThreadPool;

use crate::{
    errors::error_types::ErrorTypes,
    geolocation::locator::{LocationError, Locator},
};

use super::{
    point::{Coordinate, Point},
    point_source::{visible_points, PointSource},
    widget::{MapSurface, MapView, MapWidget, Marker, TileLayer},
};

/// Popup text of the marker placed at the device position.
pub const CURRENT_LOCATION_LABEL: &str = "موقعك الحالي";

#[derive(Debug, Clone, PartialEq)]
/// Fixed view parameters of the map screen.
pub struct ViewOptions {
    /// View shown right after the map is created.
    pub initial: MapView,
    /// Zoom used when jumping to the device position once it is known.
    pub location_zoom: u8,
    /// Zoom used when centering on a selected point or on the current location.
    pub detail_zoom: u8,
    pub layer: TileLayer,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            initial: MapView {
                center: Coordinate::new(25.276987, 55.296249),
                zoom: 10,
            },
            location_zoom: 13,
            detail_zoom: 13,
            layer: TileLayer::open_street_map(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initialized,
    TornDown,
}

/// Outcome of one location request, tagged with the activation that issued it.
struct LocationFix {
    activation: u64,
    result: Result<Coordinate, LocationError>,
}

/// Keeps the map widget in sync with the search box, the point list and the device
/// position.
///
/// All methods run on the UI thread. The only work done elsewhere is the location
/// request, whose result is picked up by [`MapViewController::poll_location`].
pub struct MapViewController<S: MapSurface> {
    options: ViewOptions,
    points: Vec<Point>,
    search_term: String,
    visible: Vec<Point>,
    current_location: Option<Coordinate>,
    widget: Option<S::Widget>,
    lifecycle: Lifecycle,
    activation: u64,
    locator: Arc<dyn Locator>,
    pool: ThreadPool,
    sender: Sender<LocationFix>,
    receiver: Receiver<LocationFix>,
    wakeup: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl<S: MapSurface> MapViewController<S> {
    /// Creates a controller with no map yet.
    ///
    /// # Arguments
    /// * `options` - Initial view, zoom levels and base layer.
    /// * `source` - Where the points of interest come from.
    /// * `locator` - Provider of the device position.
    pub fn new(
        options: ViewOptions,
        source: Box<dyn PointSource>,
        locator: Arc<dyn Locator>,
    ) -> Self {
        let points = source.list_points();
        let (sender, receiver) = mpsc::channel();
        Self {
            options,
            visible: points.clone(),
            points,
            search_term: String::new(),
            current_location: None,
            widget: None,
            lifecycle: Lifecycle::Uninitialized,
            activation: 0,
            locator,
            pool: ThreadPool::with_name("geolocation".to_string(), 1),
            sender,
            receiver,
            wakeup: None,
        }
    }

    /// Registers a callback the location worker calls after posting its result.
    pub fn set_wakeup(&mut self, wakeup: impl Fn() + Send + Sync + 'static) {
        self.wakeup = Some(Arc::new(wakeup));
    }

    /// Creates the map on `surface` and asks for the device position.
    ///
    /// Does nothing if a map already exists.
    pub fn initialize(&mut self, surface: &S) -> Result<(), ErrorTypes> {
        if self.widget.is_some() {
            debug!("Map already initialized, ignoring");
            return Ok(());
        }

        let widget = surface.attach(self.options.initial, self.options.layer.clone())?;
        self.widget = Some(widget);
        self.lifecycle = Lifecycle::Initialized;
        self.activation += 1;
        self.current_location = None;
        info!(
            "Map initialized at {:?}, zoom {} (activation {})",
            self.options.initial.center, self.options.initial.zoom, self.activation
        );

        self.request_location();
        Ok(())
    }

    fn request_location(&self) {
        let activation = self.activation;
        let locator = Arc::clone(&self.locator);
        let sender = self.sender.clone();
        let wakeup = self.wakeup.clone();

        self.pool.execute(move || {
            let result = locator.locate();
            if sender.send(LocationFix { activation, result }).is_err() {
                return;
            }
            if let Some(wakeup) = wakeup {
                wakeup();
            }
        });
    }

    /// Applies any location result that arrived since the last call.
    ///
    /// # Returns
    /// `true` if a result for the current map was applied.
    pub fn poll_location(&mut self) -> bool {
        let mut applied = false;
        while let Ok(fix) = self.receiver.try_recv() {
            applied |= self.apply_fix(fix);
        }
        applied
    }

    /// Blocks until a location result for the current map arrives or `timeout` passes.
    ///
    /// For headless runs and tests; the UI thread uses [`MapViewController::poll_location`]
    /// and must never block here.
    pub fn await_location(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(fix) => {
                    if self.apply_fix(fix) {
                        return true;
                    }
                }
                Err(_) => return false,
            }
        }
    }

    fn apply_fix(&mut self, fix: LocationFix) -> bool {
        if fix.activation != self.activation || self.widget.is_none() {
            debug!(
                "Discarding location result of activation {} (current {})",
                fix.activation, self.activation
            );
            return false;
        }
        match fix.result {
            Ok(coordinate) => self.on_location_resolved(coordinate.lat, coordinate.lng),
            Err(error) => self.on_location_failed(error),
        }
        true
    }

    /// Stores the device position, moves the map there and pins it.
    ///
    /// Ignored when the map is gone or the position was already resolved.
    pub fn on_location_resolved(&mut self, lat: f64, lng: f64) {
        if self.current_location.is_some() {
            debug!("Location already resolved, ignoring ({}, {})", lat, lng);
            return;
        }
        let Some(widget) = self.widget.as_mut() else {
            debug!("Location arrived without a map, ignoring");
            return;
        };

        let coordinate = Coordinate::new(lat, lng);
        self.current_location = Some(coordinate);
        info!("Current location resolved at ({}, {})", lat, lng);

        if let Err(err) = widget.set_view(coordinate, self.options.location_zoom) {
            warn!("Could not center on current location: {}", err);
        }
        widget.add_marker(Marker::with_open_popup(coordinate, CURRENT_LOCATION_LABEL));
    }

    /// Leaves the map as it is; the viewer simply has no current location.
    pub fn on_location_failed(&mut self, error: LocationError) {
        let error: ErrorTypes = error.into();
        info!("No current location: {}", error);
    }

    /// Updates the search text and recomputes the visible points.
    pub fn set_search_term(&mut self, text: &str) {
        self.search_term = text.to_string();
        self.visible = visible_points(&self.points, text);
    }

    /// Centers the map on `point` and pins it with its name.
    ///
    /// # Errors
    /// Code 301 if the map doesn't exist.
    pub fn select_location(&mut self, point: &Point) -> Result<(), ErrorTypes> {
        let widget = self.widget.as_mut().ok_or_else(|| {
            ErrorTypes::new(
                301,
                format!("Cannot select {}: map is not initialized", point.name),
            )
        })?;

        widget.set_view(point.coordinate(), self.options.detail_zoom)?;
        widget.add_marker(Marker::with_open_popup(point.coordinate(), &point.name));
        debug!("Selected point {} ({})", point.id, point.name);
        Ok(())
    }

    /// Centers the map on the device position, if known.
    pub fn center_on_current_location(&mut self) -> Result<(), ErrorTypes> {
        if let (Some(location), Some(widget)) = (self.current_location, self.widget.as_mut()) {
            widget.set_view(location, self.options.detail_zoom)?;
        }
        Ok(())
    }

    /// Removes the map so that a later [`MapViewController::initialize`] starts over.
    pub fn teardown(&mut self) {
        if let Some(mut widget) = self.widget.take() {
            widget.remove();
            self.lifecycle = Lifecycle::TornDown;
            self.current_location = None;
            info!("Map torn down (activation {})", self.activation);
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn visible_points(&self) -> &[Point] {
        &self.visible
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn current_location(&self) -> Option<Coordinate> {
        self.current_location
    }

    pub fn widget(&self) -> Option<&S::Widget> {
        self.widget.as_ref()
    }

    pub fn widget_mut(&mut self) -> Option<&mut S::Widget> {
        self.widget.as_mut()
    }

    /// Current view of the map, `None` without a map.
    pub fn view(&self) -> Option<MapView> {
        self.widget.as_ref().map(|widget| widget.view())
    }
}

impl<S: MapSurface> Drop for MapViewController<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        geolocation::locator::{DeniedLocator, FixedLocator},
        map::{
            headless::HeadlessSurface,
            point_source::{BuiltinPoints, StaticPoints},
        },
    };

    const WAIT: Duration = Duration::from_secs(5);

    fn controller(locator: Arc<dyn Locator>) -> MapViewController<HeadlessSurface> {
        MapViewController::new(ViewOptions::default(), Box::new(BuiltinPoints), locator)
    }

    #[test]
    fn test_starts_uninitialized_with_every_point_visible() {
        let controller = controller(Arc::new(DeniedLocator));
        assert_eq!(controller.lifecycle(), Lifecycle::Uninitialized);
        assert_eq!(controller.visible_points().len(), 4);
        assert!(controller.view().is_none());
    }

    #[test]
    fn test_initialize_sets_initial_view_and_layer() {
        let surface = HeadlessSurface::new();
        let mut controller = controller(Arc::new(DeniedLocator));
        controller.initialize(&surface).unwrap();

        assert_eq!(controller.lifecycle(), Lifecycle::Initialized);
        assert_eq!(controller.view(), Some(ViewOptions::default().initial));
        let widget = controller.widget().unwrap();
        assert_eq!(widget.layers(), &[TileLayer::open_street_map()]);
        assert!(widget.markers().is_empty());
    }

    #[test]
    fn test_resolved_location_moves_map_and_adds_marker() {
        let surface = HeadlessSurface::new();
        let fix = Coordinate::new(24.4539, 54.3773);
        let mut controller = controller(Arc::new(FixedLocator::new(Some(fix))));
        controller.initialize(&surface).unwrap();

        assert!(controller.await_location(WAIT));
        assert_eq!(controller.current_location(), Some(fix));
        assert_eq!(
            controller.view(),
            Some(MapView {
                center: fix,
                zoom: 13
            })
        );
        assert_eq!(
            controller.widget().unwrap().markers(),
            &[Marker::with_open_popup(fix, CURRENT_LOCATION_LABEL)]
        );
    }

    #[test]
    fn test_location_is_resolved_only_once() {
        let surface = HeadlessSurface::new();
        let mut controller = controller(Arc::new(DeniedLocator));
        controller.initialize(&surface).unwrap();

        controller.on_location_resolved(1.0, 2.0);
        controller.on_location_resolved(3.0, 4.0);
        assert_eq!(controller.current_location(), Some(Coordinate::new(1.0, 2.0)));
        assert_eq!(controller.widget().unwrap().markers().len(), 1);
    }

    #[test]
    fn test_select_before_initialize_is_rejected() {
        let mut controller = controller(Arc::new(DeniedLocator));
        let point = controller.points()[0].clone();
        assert_eq!(controller.select_location(&point).unwrap_err().code(), 301);
        assert_eq!(controller.lifecycle(), Lifecycle::Uninitialized);
    }

    #[test]
    fn test_repeated_selection_accumulates_markers() {
        let surface = HeadlessSurface::new();
        let mut controller = controller(Arc::new(DeniedLocator));
        controller.initialize(&surface).unwrap();
        let point = controller.points()[2].clone();

        controller.select_location(&point).unwrap();
        controller.select_location(&point).unwrap();
        let markers = controller.widget().unwrap().markers();
        assert_eq!(markers.len(), 2);
        assert!(markers
            .iter()
            .all(|m| m.popup.as_deref() == Some(point.name.as_str()) && m.popup_open));
    }

    #[test]
    fn test_points_are_read_once_from_the_source() {
        let mut controller: MapViewController<HeadlessSurface> = MapViewController::new(
            ViewOptions::default(),
            Box::new(StaticPoints::new(vec![
                Point::new(1, "Obelisco", -34.6037, -58.3816),
                Point::new(2, "Cabildo", -34.6088, -58.3737),
            ])),
            Arc::new(DeniedLocator),
        );
        assert_eq!(controller.points().len(), 2);
        controller.set_search_term("obel");
        assert_eq!(controller.search_term(), "obel");
        assert_eq!(controller.visible_points().len(), 1);
        assert_eq!(controller.visible_points()[0].id, 1);
    }

    #[test]
    fn test_teardown_without_map_is_a_no_op() {
        let mut controller = controller(Arc::new(DeniedLocator));
        controller.teardown();
        assert_eq!(controller.lifecycle(), Lifecycle::Uninitialized);
    }
}
