//! Knockout-efficiency summary of a population.

use serde::Serialize;

use editquant_core::models::EventKind;

use crate::population::MotifPopulation;
use crate::statistics::{CumulativeField, LogBase, MotifPopulationStatistics, Quantile};

pub const SUMMARY_PERCENTILES: [u32; 5] = [25, 75, 90, 95, 99];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationSummary {
    pub distinct_motifs: usize,
    pub distinct_motifs_per_pair: f64,
    pub distinct_lof_motifs: usize,
    pub distinct_lof_motifs_in_top: usize,
    /// Pairs supporting a motif with an insertion or deletion.
    pub fraction_pairs_indel: f64,
    pub fraction_pairs_lof: f64,
    pub auc_diversity: f64,
    pub auc_lof: f64,
    /// Shannon entropy in bits.
    pub entropy: f64,
    /// Shannon entropy in nats.
    pub shannon: f64,
    pub evenness: Option<f64>,
    pub diversity: f64,
    pub quantiles: Vec<Quantile>,
    /// Q25 rank over Q75 rank.
    pub iqr: f64,
    /// `(Q99 - Q90) / Q99`
    pub spread: f64,
    pub purity_index: f64,
    pub q90: f64,
    pub q95: f64,
    pub q99: f64,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

impl PopulationSummary {
    ///
    /// Compute the summary of `population` given the number of resolved
    /// `pairs` it was built from.
    ///
    /// `top` bounds the LOF motif count reported "in top"; `purity_top` is
    /// the number of motifs the purity index is taken over.
    ///
    pub fn compute(
        population: &MotifPopulation,
        pairs: u64,
        top: Option<usize>,
        purity_top: i64,
    ) -> Self {
        let pairs = pairs as f64;
        let distinct_motifs = population.num_distinct(&EventKind::ALL, None);

        let indel_motifs = population.top_motifs(None, &EventKind::INDELS);
        let distinct_lof_motifs = indel_motifs.iter().filter(|r| r.motif.is_lof()).count();
        let distinct_lof_motifs_in_top = population
            .top_motifs(top, &EventKind::INDELS)
            .iter()
            .filter(|r| r.motif.is_lof())
            .count();

        let indel_pairs: u64 = indel_motifs
            .iter()
            .filter(|r| !r.motif.is_wildtype())
            .map(|r| r.count)
            .sum();
        let lof_pairs: u64 = indel_motifs
            .iter()
            .filter(|r| r.motif.is_lof())
            .map(|r| r.count)
            .sum();

        let shannon = population.entropy(None, LogBase::E);

        let quantiles = population.quantiles(&SUMMARY_PERCENTILES);
        let rank_of = |percentile: u32| {
            quantiles
                .iter()
                .find(|q| q.percentile == percentile)
                .map_or(0.0, |q| q.rank as f64)
        };
        let (q25, q75, q90, q95, q99) =
            (rank_of(25), rank_of(75), rank_of(90), rank_of(95), rank_of(99));

        PopulationSummary {
            distinct_motifs,
            distinct_motifs_per_pair: ratio(distinct_motifs as f64, pairs),
            distinct_lof_motifs,
            distinct_lof_motifs_in_top,
            fraction_pairs_indel: ratio(indel_pairs as f64, pairs),
            fraction_pairs_lof: ratio(lof_pairs as f64, pairs),
            auc_diversity: population.auc(None, CumulativeField::Frequency),
            auc_lof: population.auc(None, CumulativeField::Lof),
            entropy: population.entropy(None, LogBase::Two),
            shannon,
            evenness: population.evenness(),
            diversity: shannon.exp(),
            iqr: ratio(q25, q75),
            spread: ratio(q99 - q90, q99),
            purity_index: population.purity_index(purity_top),
            q90: ratio(q90, distinct_motifs as f64),
            q95: ratio(q95, distinct_motifs as f64),
            q99: ratio(q99, distinct_motifs as f64),
            quantiles,
        }
    }
}
