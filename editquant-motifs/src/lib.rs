//! Turning aligned reads into motifs.
//!
//! The pipeline for one read pair is:
//!
//! 1. [`extract::extract_events`] walks each read's alignment operations and
//!    tallies insertions, deletions and (with a reference) substitutions
//! 2. [`consensus::resolve_pair`] checks that the mates overlap, merges their
//!    tallies, synthesizes a wildtype event when nothing was found and drops
//!    events without enough support
//! 3. [`Motif::new`] canonicalizes the surviving events and classifies the
//!    consequence of each one against a [`TranscriptContext`]
//!
//! # Example
//!
//! ```rust
//! use editquant_core::models::{ExonModel, Exon, TargetWindow};
//! use editquant_motifs::{Motif, TranscriptContext};
//! use editquant_motifs::alignment::{ReadAlignment, parse_cigar};
//! use editquant_motifs::consensus::{PairConsensus, resolve_pair};
//! use editquant_motifs::extract::extract_events;
//!
//! let window = TargetWindow::new("chr1", 1000, 1200);
//! let read = ReadAlignment::new(1010, parse_cigar("20M2D30M").unwrap());
//! let extracted = extract_events(&read, None, 30);
//!
//! let context = TranscriptContext::new(ExonModel::new(vec![Exon::new(1000, 1200)]), None, 9);
//! if let PairConsensus::Events(tally) = resolve_pair(&[extracted], &window, 0, -10).unwrap() {
//!     let motif = Motif::new(&window, tally.into_events(), &context);
//!     assert_eq!(motif.to_string(), "D_2bp:1030-1032[FRAMESHIFT]");
//! }
//! ```

pub mod alignment;
pub mod consensus;
pub mod consequence;
pub mod errors;
pub mod extract;
pub mod motif;

// re-exports
pub use consequence::{Consequence, TranscriptContext};
pub use errors::{MotifError, MotifResult};
pub use extract::{EventTally, ExtractedRead};
pub use motif::{Motif, MotifSignature};
