//! Tileset document model and assembly.

use crate::bounds::Region;
use crate::error::{Error, Result};
use crate::metadata::Record;
use crate::partition::{Partitioner, RootErrorPolicy, TilingConfig};
use constants::tiling::{ASSET_VERSION, TILESET_VERSION};
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub version: &'static str,
    pub tileset_version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoundingVolume {
    pub region: Region,
}

/// Renderable payload reference, opaque to the tiler.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub uri: String,
}

/// Records attached directly at a node.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extras<'a> {
    #[serde(rename = "metaData")]
    pub meta_data: Vec<&'a Record>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Refine {
    /// Children supplement the parent's content.
    #[serde(rename = "ADD")]
    Add,
}

/// One node of the tile tree. Records are borrowed from the input array.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile<'a> {
    pub bounding_volume: BoundingVolume,
    pub content: Content,
    pub geometric_error: f64,
    pub extras: Extras<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refine: Option<Refine>,
    pub children: Vec<Tile<'a>>,
}

impl<'a> Tile<'a> {
    pub fn leaf(region: Region, records: &'a [Record], content_uri: &str) -> Self {
        Self {
            bounding_volume: BoundingVolume { region },
            content: Content {
                uri: content_uri.to_string(),
            },
            geometric_error: 0.0,
            extras: Extras {
                meta_data: records.iter().collect(),
            },
            refine: None,
            children: Vec::new(),
        }
    }

    pub fn internal(
        region: Region,
        anchor: &'a Record,
        geometric_error: f64,
        children: Vec<Tile<'a>>,
        content_uri: &str,
    ) -> Self {
        Self {
            bounding_volume: BoundingVolume { region },
            content: Content {
                uri: content_uri.to_string(),
            },
            geometric_error,
            extras: Extras {
                meta_data: vec![anchor],
            },
            refine: None,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order traversal with node depth (root = 0).
    pub fn visit<'t, F>(&'t self, depth: usize, f: &mut F)
    where
        F: FnMut(&'t Tile<'a>, usize),
    {
        f(self, depth);
        for child in &self.children {
            child.visit(depth + 1, f);
        }
    }
}

/// Shape statistics of a built tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TilesetSummary {
    pub nodes: usize,
    pub leaves: usize,
    /// Levels below the root.
    pub depth: usize,
    pub records: usize,
}

/// The document handed to the viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tileset<'a> {
    pub asset: Asset,
    pub geometric_error: f64,
    pub root: Tile<'a>,
    /// Legacy slot, always empty.
    pub extras: Extras<'a>,
}

impl<'a> Tileset<'a> {
    /// Partitions `records` into a tile tree. The root adds to, rather than
    /// replaces, its children's content.
    pub fn build(records: &'a [Record], config: &TilingConfig) -> Result<Self> {
        config.validate()?;
        if records.is_empty() {
            return Err(Error::EmptyPartitionInput);
        }

        let geometric_error = match config.root_error {
            RootErrorPolicy::Extent => Region::from_records(records)?.diagonal(),
            RootErrorPolicy::Fixed(error) => error,
        };

        let mut root = Partitioner::new(config).build(records, geometric_error)?;
        root.refine = Some(Refine::Add);

        let tileset = Self {
            asset: Asset {
                version: ASSET_VERSION,
                tileset_version: TILESET_VERSION,
            },
            geometric_error,
            root,
            extras: Extras::default(),
        };

        let summary = tileset.summary();
        info!(
            records = summary.records,
            nodes = summary.nodes,
            leaves = summary.leaves,
            depth = summary.depth,
            geometric_error,
            "Built tileset"
        );

        Ok(tileset)
    }

    pub fn summary(&self) -> TilesetSummary {
        let mut summary = TilesetSummary::default();
        self.root.visit(0, &mut |tile, depth| {
            summary.nodes += 1;
            summary.records += tile.extras.meta_data.len();
            summary.depth = summary.depth.max(depth);
            if tile.is_leaf() {
                summary.leaves += 1;
            }
        });
        summary
    }

    /// Re-checks the structural guarantees of the tree against its input:
    /// every record attached exactly once, leaf sizes bounded, regions
    /// nested, and geometric error non-increasing from parent to child.
    pub fn validate(&self, records: &[Record], config: &TilingConfig) -> Result<()> {
        if self.root.geometric_error > self.geometric_error {
            return Err(Error::InvariantViolation(format!(
                "root error {} exceeds tileset error {}",
                self.root.geometric_error, self.geometric_error
            )));
        }

        let mut placed: HashSet<*const Record> = HashSet::with_capacity(records.len());
        let mut attached = 0usize;
        let mut violation: Option<String> = None;

        self.root.visit(0, &mut |tile, depth| {
            if violation.is_some() {
                return;
            }
            violation = check_node(tile, depth, config.max_leaf_size()).err();
            for record in &tile.extras.meta_data {
                attached += 1;
                placed.insert(*record as *const Record);
            }
        });

        if let Some(message) = violation {
            return Err(Error::InvariantViolation(message));
        }
        if attached != records.len() || placed.len() != records.len() {
            return Err(Error::InvariantViolation(format!(
                "{} input records but {} attachments of {} distinct records",
                records.len(),
                attached,
                placed.len()
            )));
        }
        if let Some(missing) = records
            .iter()
            .find(|r| !placed.contains(&(*r as *const Record)))
        {
            return Err(Error::InvariantViolation(format!(
                "record {} is not in the tree",
                missing.index
            )));
        }
        Ok(())
    }
}

fn check_node(
    tile: &Tile<'_>,
    depth: usize,
    max_leaf_size: usize,
) -> std::result::Result<(), String> {
    let region = &tile.bounding_volume.region;

    if tile.is_leaf() && tile.extras.meta_data.len() > max_leaf_size {
        return Err(format!(
            "leaf at depth {depth} holds {} records, limit is {max_leaf_size}",
            tile.extras.meta_data.len()
        ));
    }
    if let Some(outside) = tile
        .extras
        .meta_data
        .iter()
        .find(|r| !region.contains_position(&r.position))
    {
        return Err(format!(
            "record {} lies outside its node region at depth {depth}",
            outside.index
        ));
    }
    for child in &tile.children {
        if !region.contains_region(&child.bounding_volume.region) {
            return Err(format!("child region escapes its parent at depth {depth}"));
        }
        if child.geometric_error > tile.geometric_error {
            return Err(format!(
                "child error {} exceeds parent error {} at depth {depth}",
                child.geometric_error, tile.geometric_error
            ));
        }
    }
    Ok(())
}
