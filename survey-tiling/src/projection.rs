//! Planar survey grids to geographic coordinates, via `proj4rs`.

use crate::error::{Error, Result};
use crate::units::degrees;
use constants::coordinate_system::{
    EPSG_2177_PROJ, UTM_PROJ_PREFIX, UTM_ZONES, WGS84_GEOGRAPHIC_PROJ,
};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;

/// Coordinate reference system of a planar survey position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Crs {
    /// Northern hemisphere UTM on WGS84.
    Utm { zone: u8 },
    /// ETRS89 / Poland CS2000 zone 6.
    Epsg2177,
}

impl Crs {
    pub fn utm(zone: u8) -> Result<Self> {
        if !UTM_ZONES.contains(&zone) {
            return Err(Error::InvalidUtmZone(zone));
        }
        Ok(Crs::Utm { zone })
    }

    /// Proj definition string of the grid.
    pub fn proj_string(&self) -> String {
        match self {
            Crs::Utm { zone } => format!("{UTM_PROJ_PREFIX}{zone}"),
            Crs::Epsg2177 => EPSG_2177_PROJ.to_string(),
        }
    }

    /// Planar (east, north) in metres to (longitude, latitude) in degrees.
    /// Parses the definitions on every call; batches should hold a [`Projector`].
    pub fn to_geographic(&self, east: f64, north: f64) -> Result<(f64, f64)> {
        Projector::new(*self)?.to_geographic(east, north)
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Crs::Utm { zone } => write!(f, "UTM zone {zone}"),
            Crs::Epsg2177 => f.write_str("EPSG:2177"),
        }
    }
}

/// Parsed source grid and WGS84 target, reused across a batch.
pub struct Projector {
    crs: Crs,
    source: Proj,
    geographic: Proj,
}

impl Projector {
    pub fn new(crs: Crs) -> Result<Self> {
        let parse = |definition: &str| {
            Proj::from_proj_string(definition).map_err(|e| Error::Projection {
                crs,
                reason: e.to_string(),
            })
        };

        Ok(Self {
            crs,
            source: parse(&crs.proj_string())?,
            geographic: parse(WGS84_GEOGRAPHIC_PROJ)?,
        })
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    /// Planar (east, north) in metres to (longitude, latitude) in degrees.
    pub fn to_geographic(&self, east: f64, north: f64) -> Result<(f64, f64)> {
        let mut point = (east, north, 0.0);
        transform(&self.source, &self.geographic, &mut point).map_err(|e| {
            Error::Projection {
                crs: self.crs,
                reason: format!("({east}, {north}): {e}"),
            }
        })?;
        // proj4rs yields geographic coordinates in radians
        Ok((degrees(point.0), degrees(point.1)))
    }
}
