//! Read-stream processing for editquant.
//!
//! The [`Parser`] consumes alignment records in genomic order, pairs mates by
//! read name, filters reads that cannot contribute and registers the motif of
//! every complete pair in a [`MotifPopulation`](editquant_population::MotifPopulation).
//! Every dropped read is accounted for in [`RunCounters`].
//!
//! [`bam`] feeds the parser from an indexed BAM file and [`reference`] loads
//! the window's reference bases from FASTA.
//!
//! # Example
//!
//! ```rust
//! use editquant_core::AnalysisConfig;
//! use editquant_motifs::alignment::parse_cigar;
//! use editquant_parser::{AlignmentRecord, Parser};
//!
//! let config = AnalysisConfig {
//!     target: "chr1:1000-1300".to_string(),
//!     paired: false,
//!     ..Default::default()
//! };
//! let mut parser = Parser::new(config.validate().unwrap());
//!
//! let record = AlignmentRecord::new("read1", 1010, parse_cigar("20M2D30M").unwrap()).unpaired();
//! let population = parser.process(vec![Ok(record)], None).unwrap();
//!
//! assert_eq!(parser.counters().pairs, 1);
//! assert_eq!(population.size(), 1);
//! ```

pub mod bam;
pub mod counters;
pub mod errors;
pub mod parser;
pub mod record;
pub mod reference;

// re-exports
pub use counters::RunCounters;
pub use errors::{ParserError, ParserResult};
pub use parser::Parser;
pub use record::AlignmentRecord;
