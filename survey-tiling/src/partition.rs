//! Recursive positional partitioning of survey records into a tile tree.
//!
//! Every internal node is anchored by the first of its records so coarse
//! levels already show something; the rest is cut into consecutive slices in
//! input order. Sibling subtrees are therefore not guaranteed to be spatially
//! disjoint, only contiguous along the survey path.

use crate::bounds::Region;
use crate::error::{Error, Result};
use crate::metadata::Record;
use crate::tileset::Tile;
use constants::tiling::{BRANCHING_FACTOR, CONTENT_URI, LEAF_SIZE};
use tracing::debug;

/// How the error bound of the whole tree is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RootErrorPolicy {
    /// Haversine diagonal of the whole-dataset region.
    Extent,
    /// A fixed length in metres.
    Fixed(f64),
}

/// Partitioner settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TilingConfig {
    /// Children per internal node.
    pub branching_factor: usize,
    /// Minimum size of each child slice.
    pub leaf_size: usize,
    /// Payload referenced by every node.
    pub content_uri: String,
    pub root_error: RootErrorPolicy,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            branching_factor: BRANCHING_FACTOR,
            leaf_size: LEAF_SIZE,
            content_uri: CONTENT_URI.to_string(),
            root_error: RootErrorPolicy::Extent,
        }
    }
}

impl TilingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.branching_factor < 2 {
            return Err(Error::InvalidTilingConfig(format!(
                "branching factor must be at least 2, got {}",
                self.branching_factor
            )));
        }
        if self.leaf_size == 0 {
            return Err(Error::InvalidTilingConfig(
                "leaf size must be at least 1".to_string(),
            ));
        }
        if self.branching_factor.checked_mul(self.leaf_size).is_none() {
            return Err(Error::InvalidTilingConfig(format!(
                "branching factor {} times leaf size {} overflows",
                self.branching_factor, self.leaf_size
            )));
        }
        if let RootErrorPolicy::Fixed(error) = self.root_error {
            if !error.is_finite() || error < 0.0 {
                return Err(Error::InvalidTilingConfig(format!(
                    "root geometric error must be a finite non-negative length, got {error}"
                )));
            }
        }
        Ok(())
    }

    /// Largest record count kept in a single leaf.
    pub fn max_leaf_size(&self) -> usize {
        self.branching_factor * self.leaf_size - 1
    }
}

/// Builds tile nodes over slices of an immutable record array.
pub struct Partitioner<'c> {
    config: &'c TilingConfig,
}

impl<'c> Partitioner<'c> {
    /// `config` must already be validated.
    pub fn new(config: &'c TilingConfig) -> Self {
        Self { config }
    }

    /// Builds the node covering `records`, capping its error at `parent_error`.
    pub fn build<'a>(&self, records: &'a [Record], parent_error: f64) -> Result<Tile<'a>> {
        self.build_at(records, parent_error, 0)
    }

    fn build_at<'a>(
        &self,
        records: &'a [Record],
        parent_error: f64,
        depth: usize,
    ) -> Result<Tile<'a>> {
        if records.is_empty() {
            return Err(Error::EmptyPartitionInput);
        }
        let region = Region::from_records(records)?;

        if records.len() <= self.config.max_leaf_size() {
            return Ok(Tile::leaf(region, records, &self.config.content_uri));
        }

        let (anchor, mut rest) = records
            .split_first()
            .ok_or(Error::EmptyPartitionInput)?;
        let geometric_error = parent_error.min(region.diagonal());
        let branching_factor = self.config.branching_factor;

        debug!(
            depth,
            records = records.len(),
            geometric_error,
            anchor = anchor.index,
            "Splitting node"
        );

        let mut children = Vec::with_capacity(branching_factor);
        for _ in 1..branching_factor {
            let size = self
                .config
                .leaf_size
                .max(rest.len() / branching_factor)
                .min(rest.len());
            let (slice, tail) = rest.split_at(size);
            children.push(self.build_at(slice, geometric_error, depth + 1)?);
            rest = tail;
        }

        // Rounding can leave a remainder; it becomes one final, unsliced child.
        if !rest.is_empty() {
            children.push(self.build_at(rest, geometric_error, depth + 1)?);
        }

        Ok(Tile::internal(
            region,
            anchor,
            geometric_error,
            children,
            &self.config.content_uri,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::survey_track;
    use proptest::prelude::*;

    fn config(branching_factor: usize, leaf_size: usize) -> TilingConfig {
        TilingConfig {
            branching_factor,
            leaf_size,
            ..TilingConfig::default()
        }
    }

    fn indices(tile: &Tile<'_>) -> Vec<u64> {
        tile.extras.meta_data.iter().map(|r| r.index).collect()
    }

    /// Every record index in pre-order, node records before children.
    fn collect(tile: &Tile<'_>, out: &mut Vec<u64>) {
        out.extend(indices(tile));
        for child in &tile.children {
            collect(child, out);
        }
    }

    fn check_tree(tile: &Tile<'_>, config: &TilingConfig) {
        if tile.children.is_empty() {
            assert!(tile.extras.meta_data.len() <= config.max_leaf_size());
            assert!(!tile.extras.meta_data.is_empty());
        } else {
            assert_eq!(tile.extras.meta_data.len(), 1);
            assert!(tile.children.len() <= config.branching_factor);
        }
        let region = &tile.bounding_volume.region;
        for record in &tile.extras.meta_data {
            assert!(region.contains_position(&record.position));
        }
        for child in &tile.children {
            assert!(region.contains_region(&child.bounding_volume.region));
            assert!(child.geometric_error <= tile.geometric_error);
            check_tree(child, config);
        }
    }

    #[test]
    fn small_input_is_single_leaf() {
        let records = survey_track(3);
        let config = TilingConfig::default();
        let tile = Partitioner::new(&config).build(&records, 100.0).unwrap();
        assert!(tile.children.is_empty());
        assert_eq!(indices(&tile), vec![0, 1, 2]);
        assert_eq!(tile.geometric_error, 0.0);
    }

    #[test]
    fn exactly_max_leaf_size_stays_leaf() {
        let records = survey_track(19);
        let config = TilingConfig::default();
        let tile = Partitioner::new(&config).build(&records, 100.0).unwrap();
        assert!(tile.children.is_empty());
        assert_eq!(tile.extras.meta_data.len(), 19);
    }

    #[test]
    fn twenty_five_records_split_into_four_children() {
        let records = survey_track(25);
        let config = TilingConfig::default();
        let tile = Partitioner::new(&config).build(&records, f64::INFINITY).unwrap();

        assert_eq!(indices(&tile), vec![0]);
        assert_eq!(tile.children.len(), 4);
        let sizes: Vec<_> = tile.children.iter().map(|c| c.extras.meta_data.len()).collect();
        assert_eq!(sizes, vec![6, 5, 5, 8]);
        assert!(tile.children.iter().all(|c| c.children.is_empty()));

        let mut all = Vec::new();
        collect(&tile, &mut all);
        assert_eq!(all, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn internal_error_is_capped_by_parent_and_extent() {
        let records = survey_track(40);
        let config = TilingConfig::default();
        let region = Region::from_records(&records).unwrap();

        let uncapped = Partitioner::new(&config).build(&records, f64::INFINITY).unwrap();
        assert_eq!(uncapped.geometric_error, region.diagonal());

        let capped = Partitioner::new(&config).build(&records, 1.5).unwrap();
        assert_eq!(capped.geometric_error, 1.5);
        check_tree(&capped, &config);
    }

    #[test]
    fn deep_tree_keeps_invariants() {
        let records = survey_track(500);
        let config = TilingConfig::default();
        let tile = Partitioner::new(&config).build(&records, f64::INFINITY).unwrap();
        check_tree(&tile, &config);

        let mut all = Vec::new();
        collect(&tile, &mut all);
        all.sort_unstable();
        assert_eq!(all, (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn empty_input_is_rejected() {
        let config = TilingConfig::default();
        assert!(matches!(
            Partitioner::new(&config).build(&[], 1.0),
            Err(Error::EmptyPartitionInput)
        ));
    }

    #[test]
    fn config_validation() {
        assert!(TilingConfig::default().validate().is_ok());
        assert_eq!(TilingConfig::default().max_leaf_size(), 19);
        assert!(config(1, 5).validate().is_err());
        assert!(config(4, 0).validate().is_err());
        assert!(config(usize::MAX, 2).validate().is_err());
        let fixed = |e| TilingConfig {
            root_error: RootErrorPolicy::Fixed(e),
            ..TilingConfig::default()
        };
        assert!(fixed(500.0).validate().is_ok());
        assert!(fixed(-1.0).validate().is_err());
        assert!(fixed(f64::NAN).validate().is_err());
    }

    proptest! {
        #[test]
        fn every_record_placed_exactly_once(
            len in 1usize..400,
            branching_factor in 2usize..7,
            leaf_size in 1usize..8,
        ) {
            let records = survey_track(len);
            let config = config(branching_factor, leaf_size);
            let tile = Partitioner::new(&config).build(&records, f64::INFINITY).unwrap();

            let mut all = Vec::new();
            collect(&tile, &mut all);
            prop_assert_eq!(all, (0..len as u64).collect::<Vec<_>>());
            check_tree(&tile, &config);
        }
    }
}
