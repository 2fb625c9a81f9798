//! Core models shared by every editquant crate.
//!
//! This crate holds the vocabulary the rest of the workspace speaks:
//!
//! - [`EditEvent`]: one atomic change observed in a read (insertion, deletion,
//!   substitution) or the wildtype marker
//! - [`ExonModel`]: the ordered exon list of a transcript, with its strand derived once
//! - [`TargetWindow`] and [`ReferenceSlice`]: the queried genomic window and its bases
//! - [`codon`]: the standard genetic code
//! - [`config`]: the analysis configuration, validated once before processing
//!
//! # Example
//!
//! ```rust
//! use editquant_core::models::{ExonModel, Strand};
//! use editquant_core::utils::parse_exons;
//!
//! let exons = parse_exons(&["chr7:1200-1100", "chr7:1500-1400"], "chr7").unwrap();
//! let model = ExonModel::new(exons);
//! assert_eq!(model.strand(), Strand::Reverse);
//! ```

pub mod codon;
pub mod config;
pub mod errors;
pub mod models;
pub mod utils;

// re-exports
pub use config::{AnalysisConfig, ResolvedConfig};
pub use errors::{ConfigError, ConfigResult};
pub use models::{EditEvent, EventKind, Exon, ExonModel, ReferenceSlice, Strand, TargetWindow};
