//! Street-level survey metadata normalisation and region tiling.
//!
//! Raw camera exports are normalised into canonical records
//! ([`metadata`]), then partitioned into a 3D Tiles style region tree
//! ([`tileset`]) that the panorama viewer loads.

pub mod bounds;
pub mod converter;
pub mod error;
pub mod geodesy;
pub mod logging;
pub mod metadata;
pub mod output;
pub mod partition;
pub mod projection;
pub mod tileset;
pub mod units;

#[cfg(test)]
mod test_support;

pub use converter::{InputFormat, MetadataConverter, TilesetConverter};
pub use error::{Error, Result};
pub use metadata::{NormalizerConfig, Record};
pub use partition::{RootErrorPolicy, TilingConfig};
pub use tileset::Tileset;
