/// Batch converters: raw survey export to canonical records, records to tileset.
use crate::error::{Error, Result};
use crate::metadata::{NormalizerConfig, Record, normalize};
use crate::output::{read_json, write_json};
use crate::partition::TilingConfig;
use crate::tileset::Tileset;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// Record layout expected by the tileset converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Output of the metadata converter.
    #[default]
    Canonical,
    /// Vendor survey export, normalised in-process first.
    Raw,
}

/// Converts a raw survey export into canonical records.
pub struct MetadataConverter {
    source: PathBuf,
    destination: PathBuf,
    config: NormalizerConfig,
    pretty: bool,
}

impl MetadataConverter {
    pub fn new(source: &Path, destination: &Path, config: NormalizerConfig, pretty: bool) -> Self {
        Self {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            config,
            pretty,
        }
    }

    /// Reads, normalises and writes. Nothing is written unless every record converts.
    pub fn convert(&self) -> Result<Vec<Record>> {
        check_distinct(&self.source, &self.destination)?;
        info!(source = %self.source.display(), "Normalising survey metadata");

        let raw: Vec<Value> = read_json(&self.source)?;
        let records = normalize_with_progress(&raw, &self.config)?;

        write_json(&records, &self.destination, self.pretty)?;
        info!(
            records = records.len(),
            destination = %self.destination.display(),
            "Wrote canonical metadata"
        );

        Ok(records)
    }
}

/// Converts records into a tileset document.
pub struct TilesetConverter {
    source: PathBuf,
    destination: PathBuf,
    config: TilingConfig,
    input: InputFormat,
    normalizer: NormalizerConfig,
    pretty: bool,
}

impl TilesetConverter {
    pub fn new(source: &Path, destination: &Path, config: TilingConfig, pretty: bool) -> Self {
        Self {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            config,
            input: InputFormat::Canonical,
            normalizer: NormalizerConfig::default(),
            pretty,
        }
    }

    /// Accept raw survey exports, normalised with `normalizer`.
    pub fn with_raw_input(mut self, normalizer: NormalizerConfig) -> Self {
        self.input = InputFormat::Raw;
        self.normalizer = normalizer;
        self
    }

    /// Reads, tiles, validates and writes the tileset.
    pub fn convert(&self) -> Result<()> {
        check_distinct(&self.source, &self.destination)?;
        self.config.validate()?;
        info!(
            source = %self.source.display(),
            input = ?self.input,
            branching_factor = self.config.branching_factor,
            leaf_size = self.config.leaf_size,
            "Building tileset"
        );

        let records: Vec<Record> = match self.input {
            InputFormat::Canonical => read_json(&self.source)?,
            InputFormat::Raw => {
                let raw: Vec<Value> = read_json(&self.source)?;
                normalize_with_progress(&raw, &self.normalizer)?
            }
        };

        let tileset = Tileset::build(&records, &self.config)?;
        tileset.validate(&records, &self.config)?;

        write_json(&tileset, &self.destination, self.pretty)?;
        info!(destination = %self.destination.display(), "Wrote tileset");

        Ok(())
    }
}

/// Refuses to overwrite the input with the output, however either path is spelled.
fn check_distinct(source: &Path, destination: &Path) -> Result<()> {
    let source = source.canonicalize().map_err(|e| Error::Io {
        path: source.to_path_buf(),
        source: e,
    })?;

    let same = match destination.canonicalize() {
        Ok(existing) => existing == source,
        Err(_) => {
            let parent = match destination.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            match (parent.canonicalize(), destination.file_name()) {
                (Ok(parent), Some(name)) => parent.join(name) == source,
                _ => false,
            }
        }
    };

    if same {
        return Err(Error::InvalidArguments(format!(
            "source and destination are the same file: {}",
            source.display()
        )));
    }
    Ok(())
}

/// Normalises a batch behind a progress bar.
fn normalize_with_progress(raw: &[Value], config: &NormalizerConfig) -> Result<Vec<Record>> {
    let pb = ProgressBar::new(raw.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{bar:40.green/blue}] {pos}/{len} records ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("▉▊▋▌▍▎▏ "));
    }
    pb.set_message("Normalising records");

    match normalize(raw, config, |_| pb.inc(1)) {
        Ok(batch) => {
            pb.finish_with_message("Records normalised");
            Ok(batch.records)
        }
        Err(e) => {
            pb.abandon_with_message("Normalisation failed");
            Err(e)
        }
    }
}
