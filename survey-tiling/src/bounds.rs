/// Geographic bounding regions over survey records
use crate::error::{Error, Result};
use crate::geodesy::haversine_distance;
use crate::metadata::{Position, Record};
use crate::units::radians;
use serde::{Deserialize, Serialize};

/// 3D Tiles region: `[west, south, east, north, minimum height, maximum height]`.
/// Angles in radians, heights in the input's linear unit.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 6]", from = "[f64; 6]")]
pub struct Region {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl Region {
    /// Create new region initialised to infinity values
    fn inverted() -> Self {
        Self {
            min_lon: f64::INFINITY,
            min_lat: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_height: f64::INFINITY,
            max_height: f64::NEG_INFINITY,
        }
    }

    /// Update region with a position given in degrees
    fn update(&mut self, position: &Position) {
        let lon = radians(position.longitude);
        let lat = radians(position.latitude);
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
        self.min_height = self.min_height.min(position.height);
        self.max_height = self.max_height.max(position.height);
    }

    /// Tight region around positions in degrees. Fails on empty input.
    pub fn from_positions<'a, I>(positions: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Position>,
    {
        let mut region = Self::inverted();
        let mut seen = 0usize;
        for position in positions {
            region.update(position);
            seen += 1;
        }

        if seen == 0 {
            return Err(Error::EmptyRegion);
        }
        Ok(region)
    }

    pub fn from_records(records: &[Record]) -> Result<Self> {
        Self::from_positions(records.iter().map(|r| &r.position))
    }

    /// Whether a position in degrees falls inside, edges included.
    pub fn contains_position(&self, position: &Position) -> bool {
        let lon = radians(position.longitude);
        let lat = radians(position.latitude);
        (self.min_lon..=self.max_lon).contains(&lon)
            && (self.min_lat..=self.max_lat).contains(&lat)
            && (self.min_height..=self.max_height).contains(&position.height)
    }

    pub fn contains_region(&self, other: &Region) -> bool {
        self.min_lon <= other.min_lon
            && self.max_lon >= other.max_lon
            && self.min_lat <= other.min_lat
            && self.max_lat >= other.max_lat
            && self.min_height <= other.min_height
            && self.max_height >= other.max_height
    }

    /// Great-circle length of the south-west to north-east diagonal in metres.
    pub fn diagonal(&self) -> f64 {
        haversine_distance(self.min_lat, self.min_lon, self.max_lat, self.max_lon)
    }
}

impl From<Region> for [f64; 6] {
    fn from(r: Region) -> Self {
        [
            r.min_lon,
            r.min_lat,
            r.max_lon,
            r.max_lat,
            r.min_height,
            r.max_height,
        ]
    }
}

impl From<[f64; 6]> for Region {
    fn from(a: [f64; 6]) -> Self {
        Self {
            min_lon: a[0],
            min_lat: a[1],
            max_lon: a[2],
            max_lat: a[3],
            min_height: a[4],
            max_height: a[5],
        }
    }
}
