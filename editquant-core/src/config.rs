//! Analysis configuration.
//!
//! [`AnalysisConfig`] enumerates every recognized option with a fixed default.
//! It can be loaded from a TOML file and is turned into a [`ResolvedConfig`]
//! exactly once, before any read is processed.

use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};
use crate::models::{ExonModel, TargetWindow};
use crate::utils::{parse_exons, parse_position, parse_region};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Target window, `chr:start-stop`.
    pub target: String,
    /// Exon coordinates, `chr:from-to` or `from-to`; `from > to` on the reverse strand.
    pub exons: Vec<String>,
    /// Bases added to both sides of the target window.
    pub tail: u64,
    /// Moves the entry boundary of the exon holding this position (`chr:pos` or `pos`).
    pub translation_start: Option<String>,
    pub min_mapping_quality: u8,
    pub min_base_quality: u8,
    pub min_read_length: u64,
    /// Smallest accepted mate overlap; negative values tolerate a gap.
    pub min_overlap: i64,
    /// Motifs observed fewer times are removed after processing.
    pub min_motif_count: u64,
    /// In-frame indels at least this long are disruptive; negative means unbounded.
    pub max_inframe_length: i64,
    pub paired: bool,
    /// Keep only events seen in every read of a pair.
    pub require_mate_support: bool,
    pub detect_substitutions: bool,
    /// Accumulate per-base coverage on every motif.
    pub coverage: bool,
    /// Records skipped, uncounted, at the start of the stream.
    pub skip_records: u64,
    /// Stop after this many resolved pairs; 0 disables the limit.
    pub stop_after_pairs: u64,
    /// Restrict processing to these read names; empty takes all.
    pub read_names: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            target: String::new(),
            exons: Vec::new(),
            tail: 0,
            translation_start: None,
            min_mapping_quality: 0,
            min_base_quality: 30,
            min_read_length: 0,
            min_overlap: -10,
            min_motif_count: 0,
            max_inframe_length: 9,
            paired: true,
            require_mate_support: false,
            detect_substitutions: false,
            coverage: false,
            skip_records: 0,
            stop_after_pairs: 0,
            read_names: Vec::new(),
        }
    }
}

impl TryFrom<&Path> for AnalysisConfig {
    type Error = ConfigError;

    ///
    /// Load a configuration from a TOML file. Missing keys keep their defaults.
    ///
    fn try_from(path: &Path) -> ConfigResult<Self> {
        let contents = read_to_string(path)?;
        let config: AnalysisConfig = toml::from_str(&contents)?;
        Ok(config)
    }
}

impl AnalysisConfig {
    /// Reads that make up one unit of analysis.
    pub fn reads_per_pair(&self) -> usize {
        if self.paired { 2 } else { 1 }
    }

    /// Combined per-event count a pair must reach; 0 disables the filter.
    pub fn min_support(&self) -> u32 {
        if self.require_mate_support {
            self.reads_per_pair() as u32
        } else {
            0
        }
    }

    ///
    /// Validate the configuration and resolve its coordinates.
    ///
    /// The window is parsed and padded by `tail`, the exons are parsed and
    /// checked against the window's chromosome, and the translation start is
    /// applied to the exon model.
    ///
    pub fn validate(&self) -> ConfigResult<ResolvedConfig> {
        if self.target.trim().is_empty() {
            return Err(ConfigError::MissingTarget);
        }

        let window = parse_region(&self.target)?.padded(self.tail);

        let mut exons = ExonModel::new(parse_exons(&self.exons, &window.chr)?);
        if let Some(translation_start) = &self.translation_start {
            let position = parse_position(translation_start, &window.chr)?;
            exons = exons.with_translation_start(position);
        }

        if exons.is_empty() {
            log::warn!("No exons given. Consequences will not be annotated.");
        }

        Ok(ResolvedConfig {
            window,
            exons,
            settings: self.clone(),
        })
    }
}

/// A validated configuration with parsed coordinates.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub window: TargetWindow,
    pub exons: ExonModel,
    pub settings: AnalysisConfig,
}
