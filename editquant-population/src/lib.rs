//! Motif populations and their statistics.
//!
//! A [`MotifPopulation`] is the registry of every distinct motif observed
//! over one target window, with its observation count. On top of it,
//! [`MotifPopulationStatistics`] ranks the motifs and measures how diverse
//! the edited population is, and [`PopulationSummary`] gathers those
//! measures into a knockout-efficiency report.
//!
//! # Example
//!
//! ```rust
//! use editquant_core::models::{EditEvent, EventKind, ExonModel, TargetWindow};
//! use editquant_motifs::TranscriptContext;
//! use editquant_population::{MotifPopulation, MotifPopulationStatistics};
//!
//! let window = TargetWindow::new("chr1", 1000, 1200);
//! let context = TranscriptContext::new(ExonModel::empty(), None, 9);
//! let mut population = MotifPopulation::new(window, context);
//!
//! let wt = population.find_or_create(vec![EditEvent::wildtype(1000, 1200)]);
//! population.increase_count(wt, 3);
//! let del = population.find_or_create(vec![EditEvent::deletion(1050, 4)]);
//! population.increase_count(del, 1);
//!
//! assert_eq!(population.purity_index(1), 0.75);
//! assert_eq!(population.num_distinct(&EventKind::ALL, None), 2);
//! ```

pub mod errors;
pub mod population;
pub mod statistics;
pub mod summary;

// re-exports
pub use errors::{PopulationError, PopulationResult};
pub use population::{MotifHandle, MotifPopulation};
pub use statistics::{
    CumulativeField, EventHistogram, LogBase, MotifPopulationStatistics, Quantile, RankedMotif,
};
pub use summary::PopulationSummary;
