/// Record list to hierarchical region tileset converter
use anyhow::{Context, Result};
use clap::Parser;
use constants::coordinate_system::DEFAULT_UTM_ZONE;
use constants::tiling::{BRANCHING_FACTOR, CONTENT_URI, LEAF_SIZE};
use std::path::PathBuf;
use survey_tiling::{NormalizerConfig, RootErrorPolicy, TilesetConverter, TilingConfig, logging};

#[derive(Parser, Debug)]
#[command(
    name = "build-tileset",
    version,
    about = "Partition image records into a region tileset"
)]
struct Args {
    /// Canonical record file (or raw survey export with --raw)
    source: PathBuf,

    /// Tileset document to write
    destination: PathBuf,

    /// Source is a raw survey export; normalise it first
    #[arg(long, default_value_t = false)]
    raw: bool,

    /// UTM zone used with --raw for sensor exports
    #[arg(long, default_value_t = DEFAULT_UTM_ZONE)]
    utm_zone: u8,

    /// Children per internal node
    #[arg(long, default_value_t = BRANCHING_FACTOR)]
    branching_factor: usize,

    /// Minimum records per child slice
    #[arg(long, default_value_t = LEAF_SIZE)]
    leaf_size: usize,

    /// Fixed root geometric error in metres instead of the dataset extent
    #[arg(long)]
    root_error: Option<f64>,

    /// Payload referenced by every node
    #[arg(long, default_value = CONTENT_URI)]
    content_uri: String,

    /// Write compact JSON instead of indented
    #[arg(long, default_value_t = false)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init();

    let config = TilingConfig {
        branching_factor: args.branching_factor,
        leaf_size: args.leaf_size,
        content_uri: args.content_uri.clone(),
        root_error: args
            .root_error
            .map_or(RootErrorPolicy::Extent, RootErrorPolicy::Fixed),
    };

    let mut converter =
        TilesetConverter::new(&args.source, &args.destination, config, !args.compact);
    if args.raw {
        let normalizer = NormalizerConfig::new(args.utm_zone).context("invalid --utm-zone")?;
        converter = converter.with_raw_input(normalizer);
    }

    converter.convert().with_context(|| {
        format!(
            "failed to build tileset {} from {}",
            args.destination.display(),
            args.source.display()
        )
    })?;

    Ok(())
}
