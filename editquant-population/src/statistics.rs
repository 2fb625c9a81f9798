//! Ranking and diversity statistics over a motif population.

use std::collections::BTreeMap;

use serde::Serialize;

use editquant_core::models::EventKind;
use editquant_motifs::Motif;

use crate::population::MotifPopulation;

/// Tolerance for cumulative frequencies that should reach a target but fall short by rounding.
const CUMULATIVE_EPSILON: f64 = 1e-9;

/// One motif of a ranking with its frequencies.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMotif<'a> {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub motif: &'a Motif,
    pub count: u64,
    /// Share of all observations in the population.
    pub frequency: f64,
    /// Share of the observations of the ranked motifs only.
    pub frequency_within_top: f64,
    pub cumulative_frequency: f64,
    pub cumulative_frequency_within_top: f64,
    /// Observations of LOF motifs so far, over all observations.
    pub cumulative_lof_frequency: f64,
    /// Observations of LOF motifs so far, over the ranked observations.
    pub cumulative_lof_frequency_within_top: f64,
}

/// Which cumulative curve of a ranking to integrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CumulativeField {
    Frequency,
    FrequencyWithinTop,
    Lof,
    LofWithinTop,
}

impl CumulativeField {
    pub fn value(&self, ranked: &RankedMotif) -> f64 {
        match self {
            CumulativeField::Frequency => ranked.cumulative_frequency,
            CumulativeField::FrequencyWithinTop => ranked.cumulative_frequency_within_top,
            CumulativeField::Lof => ranked.cumulative_lof_frequency,
            CumulativeField::LofWithinTop => ranked.cumulative_lof_frequency_within_top,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogBase {
    E,
    Two,
    Ten,
}

impl LogBase {
    fn log(&self, x: f64) -> f64 {
        match self {
            LogBase::E => x.ln(),
            LogBase::Two => x.log2(),
            LogBase::Ten => x.log10(),
        }
    }
}

/// Number of top-ranked motifs needed to explain a share of the observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quantile {
    pub percentile: u32,
    pub rank: usize,
}

/// Count-weighted position and length distributions of one event kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventHistogram {
    pub start: BTreeMap<u64, u64>,
    pub stop: BTreeMap<u64, u64>,
    pub length: BTreeMap<u64, u64>,
    /// Every position spanned by an event.
    pub region: BTreeMap<u64, u64>,
}

/// Trait for ranking the motifs of a population and measuring its diversity.
pub trait MotifPopulationStatistics {
    /// Rank the motifs carrying at least one event of `kinds`.
    ///
    /// Motifs are sorted by descending count, ties keep discovery order, and
    /// the ranking is truncated to `top` entries when given. Frequencies
    /// "within top" are relative to the observations of the returned motifs.
    fn top_motifs(&self, top: Option<usize>, kinds: &[EventKind]) -> Vec<RankedMotif<'_>>;

    /// Share of all observations explained by the `top` most frequent motifs.
    ///
    /// `top < 1` yields the sentinel `-1.0`.
    fn purity_index(&self, top: i64) -> f64;

    /// For each percentile, the smallest rank whose cumulative frequency
    /// reaches it. Percentiles the curve never reaches map to the last rank.
    fn quantiles(&self, percentiles: &[u32]) -> Vec<Quantile>;

    /// Shannon entropy of the frequency distribution of the top motifs.
    fn entropy(&self, top: Option<usize>, base: LogBase) -> f64;

    /// `exp` of the natural entropy: the effective number of motifs.
    fn diversity(&self, top: Option<usize>) -> f64 {
        self.entropy(top, LogBase::E).exp()
    }

    /// Natural entropy over its maximum for the number of distinct motifs.
    ///
    /// Undefined for fewer than two distinct motifs.
    fn evenness(&self) -> Option<f64>;

    /// Trapezoidal area under a cumulative curve with ranks scaled to `[0, 1]`.
    fn auc(&self, top: Option<usize>, field: CumulativeField) -> f64;

    /// Distinct motifs carrying an event of `kinds`, optionally among the top motifs only.
    fn num_distinct(&self, kinds: &[EventKind], top: Option<usize>) -> usize;

    fn histograms(
        &self,
        top: Option<usize>,
        kinds: &[EventKind],
    ) -> BTreeMap<EventKind, EventHistogram>;

    /// Per-base coverage of the top motifs summed over `[start, stop]`.
    fn cumulate_coverage(&self, start: u64, stop: u64, top: Option<usize>) -> Vec<u64>;
}

impl MotifPopulationStatistics for MotifPopulation {
    fn top_motifs(&self, top: Option<usize>, kinds: &[EventKind]) -> Vec<RankedMotif<'_>> {
        let total = self.total() as f64;

        let mut selected: Vec<(&Motif, u64)> = self
            .iter()
            .filter(|(motif, _)| motif.has_kind(kinds))
            .collect();
        // stable: equal counts keep discovery order
        selected.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(top) = top {
            selected.truncate(top);
        }

        let total_top = selected.iter().map(|(_, count)| *count).sum::<u64>() as f64;

        let mut cumulative = 0.0;
        let mut cumulative_top = 0.0;
        let mut lof_count = 0.0;

        selected
            .into_iter()
            .enumerate()
            .map(|(i, (motif, count))| {
                let frequency = count as f64 / total;
                let frequency_within_top = count as f64 / total_top;
                cumulative += frequency;
                cumulative_top += frequency_within_top;
                if motif.is_lof() {
                    lof_count += count as f64;
                }

                RankedMotif {
                    rank: i + 1,
                    motif,
                    count,
                    frequency,
                    frequency_within_top,
                    cumulative_frequency: cumulative,
                    cumulative_frequency_within_top: cumulative_top,
                    cumulative_lof_frequency: lof_count / total,
                    cumulative_lof_frequency_within_top: lof_count / total_top,
                }
            })
            .collect()
    }

    fn purity_index(&self, top: i64) -> f64 {
        if top < 1 {
            return -1.0;
        }
        let total = self.total();
        if total == 0 {
            return 0.0;
        }

        let top_count: u64 = self
            .top_motifs(Some(top as usize), &EventKind::ALL)
            .iter()
            .map(|ranked| ranked.count)
            .sum();
        top_count as f64 / total as f64
    }

    fn quantiles(&self, percentiles: &[u32]) -> Vec<Quantile> {
        let ranking = self.top_motifs(None, &EventKind::ALL);

        percentiles
            .iter()
            .map(|&percentile| {
                let target = percentile as f64 / 100.0 - CUMULATIVE_EPSILON;
                let rank = ranking
                    .iter()
                    .find(|ranked| ranked.cumulative_frequency >= target)
                    .or(ranking.last())
                    .map_or(0, |ranked| ranked.rank);
                Quantile { percentile, rank }
            })
            .collect()
    }

    fn entropy(&self, top: Option<usize>, base: LogBase) -> f64 {
        -self
            .top_motifs(top, &EventKind::ALL)
            .iter()
            .map(|ranked| ranked.frequency_within_top)
            .filter(|&p| p > 0.0)
            .map(|p| p * base.log(p))
            .sum::<f64>()
    }

    fn evenness(&self) -> Option<f64> {
        let distinct = self.num_distinct(&EventKind::ALL, None);
        if distinct < 2 {
            return None;
        }
        Some(self.entropy(None, LogBase::E) / (distinct as f64).ln())
    }

    fn auc(&self, top: Option<usize>, field: CumulativeField) -> f64 {
        let ranking = self.top_motifs(top, &EventKind::ALL);
        let n = ranking.len() as f64;

        let mut points = vec![(0.0, 0.0)];
        points.extend(
            ranking
                .iter()
                .map(|ranked| (ranked.rank as f64 / n, field.value(ranked))),
        );

        points
            .windows(2)
            .map(|w| {
                let ((x1, y1), (x2, y2)) = (w[0], w[1]);
                (y1 + y2) / 2.0 * (x2 - x1)
            })
            .sum()
    }

    fn num_distinct(&self, kinds: &[EventKind], top: Option<usize>) -> usize {
        match top {
            None => self
                .iter()
                .filter(|(motif, _)| motif.has_kind(kinds))
                .count(),
            Some(_) => self
                .top_motifs(top, &EventKind::ALL)
                .iter()
                .filter(|ranked| ranked.motif.has_kind(kinds))
                .count(),
        }
    }

    fn histograms(
        &self,
        top: Option<usize>,
        kinds: &[EventKind],
    ) -> BTreeMap<EventKind, EventHistogram> {
        let mut histograms: BTreeMap<EventKind, EventHistogram> = kinds
            .iter()
            .map(|&kind| (kind, EventHistogram::default()))
            .collect();

        for ranked in self.top_motifs(top, kinds) {
            for event in ranked.motif.events() {
                let Some(histogram) = histograms.get_mut(&event.kind) else {
                    continue;
                };
                *histogram.start.entry(event.start).or_default() += ranked.count;
                *histogram.stop.entry(event.stop).or_default() += ranked.count;
                *histogram
                    .length
                    .entry(event.start.abs_diff(event.stop))
                    .or_default() += ranked.count;
                for position in event.start..event.stop {
                    *histogram.region.entry(position).or_default() += ranked.count;
                }
            }
        }

        histograms
    }

    fn cumulate_coverage(&self, start: u64, stop: u64, top: Option<usize>) -> Vec<u64> {
        if stop < start {
            return Vec::new();
        }
        let mut cumulated = vec![0; (stop - start + 1) as usize];

        for ranked in self.top_motifs(top, &EventKind::ALL) {
            let motif = ranked.motif;
            for (i, coverage) in motif.coverage().iter().enumerate() {
                let position = motif.start + i as u64;
                if position < start || position > stop {
                    continue;
                }
                cumulated[(position - start) as usize] += coverage;
            }
        }

        cumulated
    }
}
