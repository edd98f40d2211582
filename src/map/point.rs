use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
/// A WGS84 coordinate in degrees.
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Checks that latitude and longitude are within their ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
/// Represents a named point of interest.
pub struct Point {
    pub id: i32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(id: i32, name: &str, lat: f64, lng: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            lat,
            lng,
        }
    }

    /// Returns the coordinate of the point.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// Checks whether the name of the point contains `term`, ignoring case.
    ///
    /// An empty term matches every point.
    pub fn matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase())
    }
}
