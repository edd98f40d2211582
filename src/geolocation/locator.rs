use crate::{errors::error_types::ErrorTypes, map::point::Coordinate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Reasons a location request can fail.
pub enum LocationError {
    PermissionDenied,
    Unavailable,
}

impl From<LocationError> for ErrorTypes {
    fn from(error: LocationError) -> Self {
        match error {
            LocationError::PermissionDenied => {
                ErrorTypes::new(201, "Location permission denied".to_string())
            }
            LocationError::Unavailable => {
                ErrorTypes::new(202, "Location unavailable".to_string())
            }
        }
    }
}

/// Source of the device position. `locate` may block; it runs on a worker thread.
pub trait Locator: Send + Sync {
    fn locate(&self) -> Result<Coordinate, LocationError>;
}

/// Reports a position fixed ahead of time, or `Unavailable` when there is none.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedLocator {
    fix: Option<Coordinate>,
}

impl FixedLocator {
    pub fn new(fix: Option<Coordinate>) -> Self {
        Self { fix }
    }
}

impl Locator for FixedLocator {
    fn locate(&self) -> Result<Coordinate, LocationError> {
        self.fix.ok_or(LocationError::Unavailable)
    }
}

/// Used when the user turned location off.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeniedLocator;

impl Locator for DeniedLocator {
    fn locate(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::PermissionDenied)
    }
}
