/// Survey export to canonical record converter
use anyhow::{Context, Result};
use clap::Parser;
use constants::coordinate_system::DEFAULT_UTM_ZONE;
use std::path::PathBuf;
use survey_tiling::{MetadataConverter, NormalizerConfig, logging};

#[derive(Parser, Debug)]
#[command(
    name = "normalize-metadata",
    version,
    about = "Convert a vendor survey export into canonical image records"
)]
struct Args {
    /// Raw survey export (JSON array)
    source: PathBuf,

    /// Canonical record file to write
    destination: PathBuf,

    /// UTM zone of sensor exports that carry no zone themselves
    #[arg(long, default_value_t = DEFAULT_UTM_ZONE)]
    utm_zone: u8,

    /// Write compact JSON instead of indented
    #[arg(long, default_value_t = false)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init();

    let config = NormalizerConfig::new(args.utm_zone).context("invalid --utm-zone")?;
    MetadataConverter::new(&args.source, &args.destination, config, !args.compact)
        .convert()
        .with_context(|| {
            format!(
                "failed to normalise {} into {}",
                args.source.display(),
                args.destination.display()
            )
        })?;

    Ok(())
}
