use std::{collections::HashSet, fs, path::PathBuf};

use log::{info, warn};

use crate::errors::error_types::ErrorTypes;

use super::point::Point;

/// Supplies the points of interest shown in the list and on the map.
pub trait PointSource {
    fn list_points(&self) -> Vec<Point>;
}

/// The landmarks bundled with the viewer.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinPoints;

impl PointSource for BuiltinPoints {
    fn list_points(&self) -> Vec<Point> {
        vec![
            Point::new(1, "برج خليفة، دبي", 25.197197, 55.274376),
            Point::new(2, "المسجد الحرام، مكة المكرمة", 21.422487, 39.826206),
            Point::new(3, "الأهرامات، القاهرة", 29.979235, 31.134202),
            Point::new(4, "برج العرب، دبي", 25.141667, 55.185833),
        ]
    }
}

/// A fixed list handed in by the caller.
#[derive(Debug, Default, Clone)]
pub struct StaticPoints {
    points: Vec<Point>,
}

impl StaticPoints {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl PointSource for StaticPoints {
    fn list_points(&self) -> Vec<Point> {
        self.points.clone()
    }
}

/// Points read from a JSON array of `{ "id", "name", "lat", "lng" }` objects.
#[derive(Debug, Clone)]
pub struct JsonPoints {
    path: PathBuf,
}

impl JsonPoints {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads and validates the file.
    ///
    /// # Returns
    /// The points in file order, or an error if the file can't be read, isn't valid
    /// JSON, or repeats an id.
    pub fn load(&self) -> Result<Vec<Point>, ErrorTypes> {
        let data = fs::read_to_string(&self.path).map_err(|e| {
            ErrorTypes::new(
                101,
                format!("Failed to read {}: {}", self.path.display(), e),
            )
        })?;
        let points: Vec<Point> = serde_json::from_str(&data).map_err(|e| {
            ErrorTypes::new(
                102,
                format!("Failed to parse {}: {}", self.path.display(), e),
            )
        })?;

        let mut ids = HashSet::new();
        for point in &points {
            if !ids.insert(point.id) {
                return Err(ErrorTypes::new(
                    103,
                    format!("Duplicated point id {} in {}", point.id, self.path.display()),
                ));
            }
        }
        Ok(points)
    }
}

impl PointSource for JsonPoints {
    fn list_points(&self) -> Vec<Point> {
        match self.load() {
            Ok(points) => {
                info!("Loaded {} points from {}", points.len(), self.path.display());
                points
            }
            Err(err) => {
                warn!("{}", err);
                vec![]
            }
        }
    }
}

/// Returns the points whose name contains `term`, ignoring case, keeping their order.
pub fn visible_points(points: &[Point], term: &str) -> Vec<Point> {
    points
        .iter()
        .filter(|point| point.matches(term))
        .cloned()
        .collect()
}
