//! Survey metadata normalisation.
//!
//! Vendor exports come in two shapes, told apart by a single key. Each raw
//! object is classified once into a [`RawRecord`] and then mapped to the
//! canonical [`Record`].

use crate::error::{Error, Result};
use crate::projection::{Crs, Projector};
use constants::coordinate_system::DEFAULT_UTM_ZONE;
use constants::survey::{
    IMAGE_EXTENSIONS, PLANAR_DISCRIMINANT, PLANAR_ROLL_MIRROR_DEG, SENSOR_DISCRIMINANT,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{info, warn};

/// Geographic position, longitude and latitude in degrees, height in metres.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
}

/// Camera orientation in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// Canonical per-image record shared by the normaliser and the tiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub index: u64,
    pub position: Position,
    pub orientation: Orientation,
    pub file_name: String,
    /// Raw source object, kept verbatim for auditing.
    #[serde(rename = "_original", default, skip_serializing_if = "Option::is_none")]
    pub original: Option<Value>,
}

/// Planar EPSG:2177 export.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanarRecord {
    pub file_name: String,
    pub east: f64,
    pub north: f64,
    pub altitude: f64,
    #[serde(rename = "attitude(z)=pan")]
    pub pan: f64,
    #[serde(rename = "attitude(y)=pitch")]
    pub pitch: f64,
    #[serde(rename = "attitude(x)=roll")]
    pub roll: f64,
}

/// UTM export with per-axis sensor columns.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorRecord {
    #[serde(rename = "ImageName")]
    pub image_name: String,
    #[serde(rename = "X-Sensor")]
    pub x: f64,
    #[serde(rename = "Y-Sensor")]
    pub y: f64,
    #[serde(rename = "Z-Sensor")]
    pub z: f64,
    #[serde(rename = "H-Sensor")]
    pub heading: f64,
    #[serde(rename = "P-Sensor")]
    pub pitch: f64,
    #[serde(rename = "R-Sensor")]
    pub roll: f64,
}

/// A raw survey record after schema classification.
#[derive(Debug, Clone)]
pub enum RawRecord {
    Planar2177(PlanarRecord),
    UtmSensor(SensorRecord),
}

impl RawRecord {
    /// Classifies a raw JSON object by its discriminating key.
    /// `position` is the record's place in the batch, used in errors.
    pub fn classify(position: usize, value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or(Error::UnsupportedMetadataFormat { position })?;

        let invalid = |e: serde_json::Error| Error::InvalidRecord {
            position,
            reason: e.to_string(),
        };

        if object.contains_key(PLANAR_DISCRIMINANT) {
            PlanarRecord::deserialize(value)
                .map(RawRecord::Planar2177)
                .map_err(invalid)
        } else if object.contains_key(SENSOR_DISCRIMINANT) {
            SensorRecord::deserialize(value)
                .map(RawRecord::UtmSensor)
                .map_err(invalid)
        } else {
            Err(Error::UnsupportedMetadataFormat { position })
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            RawRecord::Planar2177(r) => &r.file_name,
            RawRecord::UtmSensor(r) => &r.image_name,
        }
    }

    /// Projects into the canonical schema. `original` is attached untouched.
    pub fn into_record(self, normalizer: &Normalizer, original: Value) -> Result<Record> {
        let index = parse_index(self.file_name())?;

        let (file_name, position, orientation) = match self {
            RawRecord::Planar2177(r) => {
                let (longitude, latitude) = normalizer.planar.to_geographic(r.east, r.north)?;
                (
                    r.file_name,
                    Position {
                        longitude,
                        latitude,
                        height: r.altitude,
                    },
                    Orientation {
                        heading: r.pan,
                        pitch: r.pitch,
                        roll: PLANAR_ROLL_MIRROR_DEG - r.roll,
                    },
                )
            }
            RawRecord::UtmSensor(r) => {
                let (longitude, latitude) = normalizer.sensor.to_geographic(r.x, r.y)?;
                (
                    r.image_name,
                    Position {
                        longitude,
                        latitude,
                        height: r.z,
                    },
                    Orientation {
                        heading: r.heading,
                        pitch: r.pitch,
                        roll: r.roll,
                    },
                )
            }
        };

        Ok(Record {
            index,
            position,
            orientation,
            file_name,
            original: Some(original),
        })
    }
}

/// Normaliser settings.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Grid used for sensor exports, which do not name their zone.
    pub utm: Crs,
}

impl NormalizerConfig {
    pub fn new(utm_zone: u8) -> Result<Self> {
        Ok(Self {
            utm: Crs::utm(utm_zone)?,
        })
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            utm: Crs::Utm {
                zone: DEFAULT_UTM_ZONE,
            },
        }
    }
}

/// Per-schema record counts from one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SchemaCounts {
    pub planar_2177: usize,
    pub utm_sensor: usize,
}

impl SchemaCounts {
    pub fn count(&mut self, raw: &RawRecord) {
        match raw {
            RawRecord::Planar2177(_) => self.planar_2177 += 1,
            RawRecord::UtmSensor(_) => self.utm_sensor += 1,
        }
    }
}

/// Derives the record index from an image file name: `img_000005.jpg` → 5.
pub fn parse_index(file_name: &str) -> Result<u64> {
    let lower = file_name.to_ascii_lowercase();
    let stem = IMAGE_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map_or(file_name, |ext| &file_name[..file_name.len() - ext.len()]);

    stem.rsplit('_')
        .next()
        .filter(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|suffix| suffix.parse().ok())
        .ok_or_else(|| Error::MalformedFileName(file_name.to_string()))
}

/// Grid projections for one batch, parsed once.
pub struct Normalizer {
    planar: Projector,
    sensor: Projector,
}

impl Normalizer {
    pub fn new(config: &NormalizerConfig) -> Result<Self> {
        Ok(Self {
            planar: Projector::new(Crs::Epsg2177)?,
            sensor: Projector::new(config.utm)?,
        })
    }

    /// Normalises one raw record, updating `counts`.
    pub fn record(
        &self,
        position: usize,
        value: &Value,
        counts: &mut SchemaCounts,
    ) -> Result<Record> {
        let raw = RawRecord::classify(position, value)?;
        counts.count(&raw);
        raw.into_record(self, value.clone())
    }
}

/// Outcome of a batch normalisation.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub records: Vec<Record>,
    pub counts: SchemaCounts,
    /// Indices seen more than once, one entry per repeat, in input order.
    pub duplicate_indices: Vec<u64>,
}

/// Normalises a whole batch in input order. The first bad record fails the batch.
///
/// `on_record` runs after each converted record. Repeated indices are kept
/// but reported.
pub fn normalize(
    values: &[Value],
    config: &NormalizerConfig,
    mut on_record: impl FnMut(&Record),
) -> Result<Normalized> {
    let normalizer = Normalizer::new(config)?;
    let mut counts = SchemaCounts::default();
    let mut seen = HashSet::with_capacity(values.len());
    let mut duplicate_indices = Vec::new();
    let mut records = Vec::with_capacity(values.len());

    for (position, value) in values.iter().enumerate() {
        let record = normalizer.record(position, value, &mut counts)?;
        if !seen.insert(record.index) {
            warn!(
                index = record.index,
                file_name = %record.file_name,
                position,
                "Duplicate record index"
            );
            duplicate_indices.push(record.index);
        }
        on_record(&record);
        records.push(record);
    }

    info!(
        planar_2177 = counts.planar_2177,
        utm_sensor = counts.utm_sensor,
        duplicates = duplicate_indices.len(),
        utm = %config.utm,
        "Normalised survey records"
    );

    Ok(Normalized {
        records,
        counts,
        duplicate_indices,
    })
}
