use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::info;
use serde::Deserialize;

use crate::{
    errors::error_types::ErrorTypes,
    geolocation::locator::{DeniedLocator, FixedLocator, Locator},
    map::{
        controller::ViewOptions,
        point::Coordinate,
        point_source::{BuiltinPoints, JsonPoints, PointSource},
        widget::{MapView, TileLayer, MAX_ZOOM},
    },
};

/// File looked up in the working directory.
pub const SETTINGS_FILE: &str = "rustic_map.json";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
/// Settings of the device location provider.
pub struct GeolocationSettings {
    pub enabled: bool,
    /// Position reported as the device location. Without it the location is unavailable.
    pub fix: Option<Coordinate>,
}

impl Default for GeolocationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            fix: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
/// User settings of the viewer. Every field is optional in the file.
pub struct Settings {
    pub initial_center: Coordinate,
    pub initial_zoom: u8,
    pub location_zoom: u8,
    pub detail_zoom: u8,
    pub points_file: Option<PathBuf>,
    pub mapbox_access_token: Option<String>,
    pub font_file: Option<PathBuf>,
    pub geolocation: GeolocationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        let view = ViewOptions::default();
        Self {
            initial_center: view.initial.center,
            initial_zoom: view.initial.zoom,
            location_zoom: view.location_zoom,
            detail_zoom: view.detail_zoom,
            points_file: None,
            mapbox_access_token: None,
            font_file: None,
            geolocation: GeolocationSettings::default(),
        }
    }
}

impl Settings {
    /// Loads the settings from `path`.
    ///
    /// # Returns
    /// The defaults when the file doesn't exist, an error when it can't be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ErrorTypes> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("{} not found, using default settings", path.display());
                return Ok(Settings::default());
            }
            Err(e) => {
                return Err(ErrorTypes::new(
                    400,
                    format!("Failed to read {}: {}", path.display(), e),
                ))
            }
        };
        Self::parse(&data)
    }

    /// Parses settings from a JSON document.
    pub fn parse(data: &str) -> Result<Self, ErrorTypes> {
        let settings: Settings = serde_json::from_str(data)
            .map_err(|e| ErrorTypes::new(401, format!("Invalid settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ErrorTypes> {
        let Coordinate { lat, lng } = self.initial_center;
        if !self.initial_center.is_valid() {
            return Err(ErrorTypes::new(
                402,
                format!("Initial center ({}, {}) is not a valid coordinate", lat, lng),
            ));
        }
        if self.initial_zoom > self.detail_zoom {
            return Err(ErrorTypes::new(
                403,
                "Initial zoom must not be closer than the detail zoom".to_string(),
            ));
        }
        for (name, zoom) in [
            ("initial_zoom", self.initial_zoom),
            ("location_zoom", self.location_zoom),
            ("detail_zoom", self.detail_zoom),
        ] {
            if zoom > MAX_ZOOM {
                return Err(ErrorTypes::new(
                    404,
                    format!("{} {} is above the maximum zoom {}", name, zoom, MAX_ZOOM),
                ));
            }
        }
        if let Some(fix) = self.geolocation.fix {
            if !fix.is_valid() {
                return Err(ErrorTypes::new(
                    405,
                    format!(
                        "Geolocation fix ({}, {}) is not a valid coordinate",
                        fix.lat, fix.lng
                    ),
                ));
            }
        }
        Ok(())
    }

    /// View parameters for the controller, with OpenStreetMap as base layer.
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            initial: MapView {
                center: self.initial_center,
                zoom: self.initial_zoom,
            },
            location_zoom: self.location_zoom,
            detail_zoom: self.detail_zoom,
            layer: TileLayer::open_street_map(),
        }
    }

    pub fn point_source(&self) -> Box<dyn PointSource> {
        match &self.points_file {
            Some(path) => Box::new(JsonPoints::new(path)),
            None => Box::new(BuiltinPoints),
        }
    }

    pub fn locator(&self) -> Arc<dyn Locator> {
        if self.geolocation.enabled {
            Arc::new(FixedLocator::new(self.geolocation.fix))
        } else {
            Arc::new(DeniedLocator)
        }
    }
}
