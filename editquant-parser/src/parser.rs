//! Turning a stream of alignment records into a motif population.

use std::time::Instant;

use fxhash::{FxHashMap, FxHashSet};
use indicatif::ProgressBar;

use editquant_core::ResolvedConfig;
use editquant_core::models::ReferenceSlice;
use editquant_motifs::TranscriptContext;
use editquant_motifs::consensus::{PairConsensus, resolve_pair};
use editquant_motifs::extract::{ExtractedRead, extract_events};
use editquant_population::MotifPopulation;

use crate::counters::RunCounters;
use crate::errors::{ParserError, ParserResult};
use crate::record::AlignmentRecord;

const PROGRESS_INTERVAL: u64 = 10_000;

/// Reads of one name waiting for their mate, slotted by first/second in pair.
#[derive(Debug, Default)]
struct PendingPair {
    reads: [Option<AlignmentRecord>; 2],
    count: usize,
}

/// Read names left to take, each at most once per read of a pair.
#[derive(Debug)]
struct NameFilter {
    remaining: FxHashMap<String, usize>,
    open: usize,
}

impl NameFilter {
    fn new(names: &[String], reads_per_pair: usize) -> Self {
        let remaining: FxHashMap<String, usize> = names
            .iter()
            .map(|name| (name.clone(), reads_per_pair))
            .collect();
        let open = remaining.len();
        NameFilter { remaining, open }
    }

    fn is_exhausted(&self) -> bool {
        self.open == 0
    }

    fn take(&mut self, name: &str) -> bool {
        match self.remaining.get_mut(name) {
            Some(left) if *left > 0 => {
                *left -= 1;
                if *left == 0 {
                    self.open -= 1;
                }
                true
            }
            _ => false,
        }
    }
}

///
/// Consumes alignment records in genomic order, pairs mates by read name and
/// registers the motif of every complete pair.
///
/// Reads that cannot contribute are dropped and counted, never turned into
/// errors. Only invariant violations abort a run.
///
pub struct Parser {
    config: ResolvedConfig,
    counters: RunCounters,
    progress: Option<ProgressBar>,
    pending: FxHashMap<String, PendingPair>,
    blacklist: FxHashSet<String>,
}

impl Parser {
    pub fn new(config: ResolvedConfig) -> Self {
        Parser {
            config,
            counters: RunCounters::default(),
            progress: None,
            pending: FxHashMap::default(),
            blacklist: FxHashSet::default(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn counters(&self) -> &RunCounters {
        &self.counters
    }

    ///
    /// Process a record stream and return the population it describes.
    ///
    /// `reference` holds the bases of the target window. It is required when
    /// substitutions are detected and otherwise only used to translate codons.
    /// Counters are reset at the start of every call.
    ///
    /// A `MalformedRecord` item is counted and skipped. Any other stream error
    /// stops consumption; the pairs resolved so far are kept and the counters
    /// are marked as truncated.
    ///
    pub fn process<I>(
        &mut self,
        records: I,
        reference: Option<&ReferenceSlice>,
    ) -> ParserResult<MotifPopulation>
    where
        I: IntoIterator<Item = ParserResult<AlignmentRecord>>,
    {
        let settings = self.config.settings.clone();
        let window = self.config.window.clone();

        if settings.detect_substitutions && reference.is_none_or(|r| r.is_empty()) {
            return Err(ParserError::MissingReference(window.to_string()));
        }

        self.counters = RunCounters::default();
        self.pending.clear();
        self.blacklist.clear();

        let context = TranscriptContext::new(
            self.config.exons.clone(),
            reference,
            settings.max_inframe_length,
        );
        let mut population = MotifPopulation::new(window.clone(), context);

        let reads_per_pair = settings.reads_per_pair();
        let mut names = (!settings.read_names.is_empty())
            .then(|| NameFilter::new(&settings.read_names, reads_per_pair));

        log::info!("Processing reads in {}", window);

        let started = Instant::now();
        let mut seen: u64 = 0;

        for record in records {
            if seen % PROGRESS_INTERVAL == 0 {
                self.report_progress(seen, started);
            }
            seen += 1;

            if seen <= settings.skip_records {
                continue;
            }

            let record = match record {
                Ok(record) => record,
                Err(ParserError::MalformedRecord(reason)) => {
                    log::warn!("Skipping malformed record {}", reason);
                    self.counters.total += 1;
                    self.counters.malformed += 1;
                    continue;
                }
                Err(e) => {
                    log::warn!(
                        "Stopped reading after {} records: {}. Reporting partial results",
                        seen - 1,
                        e
                    );
                    self.counters.truncated = true;
                    break;
                }
            };

            if let Some(filter) = names.as_mut() {
                if filter.is_exhausted() {
                    break;
                }
                if !filter.take(&record.name) {
                    continue;
                }
            }

            if settings.stop_after_pairs > 0 && self.counters.pairs >= settings.stop_after_pairs {
                log::info!("Stopping after {} processed pairs", self.counters.pairs);
                break;
            }

            self.counters.total += 1;

            let end = record.start + record.sequence_length();
            if !window.contains(record.start) || !window.contains(end) {
                self.counters.off_target += 1;
                self.drop_name(&record.name);
                continue;
            }

            if settings.paired && !(record.paired && record.mapped && !record.mate_unmapped) {
                self.counters.skipped += 1;
                continue;
            }

            if record.mapping_quality < settings.min_mapping_quality {
                self.counters.skipped_qual += 1;
                self.drop_name(&record.name);
                continue;
            }

            if settings.paired && self.blacklist.contains(&record.name) {
                self.counters.mate_dropped += 1;
                continue;
            }

            let slot = if record.first_in_pair { 0 } else { 1 };
            let name = record.name.clone();
            let pending = self.pending.entry(name.clone()).or_default();
            if pending.reads[slot].is_some() {
                self.counters.skipped += 1;
                self.drop_name(&name);
                continue;
            }
            pending.reads[slot] = Some(record);
            pending.count += 1;

            if pending.count == reads_per_pair {
                if let Some(pair) = self.pending.remove(&name) {
                    let reads: Vec<AlignmentRecord> = pair.reads.into_iter().flatten().collect();
                    self.resolve(&name, &reads, &mut population, reference)?;
                }
            }
        }

        self.report_progress(seen, started);
        if let Some(progress) = &self.progress {
            progress.finish_with_message(format!(
                "Done: {} records, {} pairs",
                seen, self.counters.pairs
            ));
        }

        self.counters.not_processed = self.pending.values().map(|p| p.count as u64).sum();
        self.pending.clear();

        if settings.min_motif_count > 0 {
            self.counters.low_coverage =
                population.apply_count_threshold(settings.min_motif_count) as u64;
            log::info!(
                "Removed {} motifs seen fewer than {} times",
                self.counters.low_coverage,
                settings.min_motif_count
            );
        }

        if !self.counters.is_reconciled(reads_per_pair as u64) {
            log::warn!("Read counters do not add up: {:?}", self.counters);
        }

        Ok(population)
    }

    ///
    /// Extract and combine the events of one complete pair and register the
    /// resulting motif.
    ///
    fn resolve(
        &mut self,
        name: &str,
        reads: &[AlignmentRecord],
        population: &mut MotifPopulation,
        reference: Option<&ReferenceSlice>,
    ) -> ParserResult<()> {
        let settings = &self.config.settings;
        let substitutions = settings.detect_substitutions;
        let substitution_reference = if substitutions { reference } else { None };

        let extracted: Vec<ExtractedRead> = reads
            .iter()
            .map(|read| {
                extract_events(
                    &read.to_alignment(substitutions),
                    substitution_reference,
                    settings.min_base_quality,
                )
            })
            .collect();
        self.counters.parsed += 1;

        let n_reads = reads.len() as u64;
        if extracted
            .iter()
            .any(|read| read.length < settings.min_read_length)
        {
            self.counters.skipped_len += n_reads;
            self.blacklist.insert(name.to_string());
            return Ok(());
        }

        let consensus = resolve_pair(
            &extracted,
            &self.config.window,
            settings.min_support(),
            settings.min_overlap,
        )?;
        let tally = match consensus {
            PairConsensus::Events(tally) if !tally.is_empty() => tally,
            _ => {
                self.counters.no_overlap += n_reads;
                self.blacklist.insert(name.to_string());
                return Ok(());
            }
        };

        self.counters.pairs += 1;
        let handle = population.find_or_create(tally.into_events());
        population.increase_count(handle, 1);
        if population.motif(handle).is_wildtype() {
            self.counters.wt += 1;
        } else {
            self.counters.motif += 1;
        }

        if settings.coverage || settings.min_motif_count > 0 {
            let mut spans: Vec<(u64, u64)> = extracted.iter().map(|r| (r.start, r.end)).collect();
            spans.sort_unstable();
            for (start, end) in spans {
                population.increase_coverage(handle, start, end + 1, 1);
            }
        }

        Ok(())
    }

    /// Blacklist a read name and discard its waiting mate.
    fn drop_name(&mut self, name: &str) {
        self.blacklist.insert(name.to_string());
        if let Some(pair) = self.pending.remove(name) {
            self.counters.mate_dropped += pair.count as u64;
        }
    }

    fn report_progress(&self, seen: u64, started: Instant) {
        let Some(progress) = &self.progress else {
            return;
        };
        let minutes = started.elapsed().as_secs_f64() / 60.0;
        let rpm = if minutes > 0.0 {
            (seen as f64 / minutes).round() as u64
        } else {
            0
        };
        progress.set_position(seen);
        progress.set_message(format!(
            "[{}/{}/{}/{}] processing ({} rpm)",
            seen,
            self.counters.parsed,
            self.counters.pairs,
            self.pending.len(),
            rpm
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use editquant_core::AnalysisConfig;
    use editquant_motifs::alignment::parse_cigar;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn read(name: &str, start: u64, cigar: &str) -> AlignmentRecord {
        AlignmentRecord::new(name, start, parse_cigar(cigar).unwrap())
    }

    fn mate(name: &str, start: u64, cigar: &str) -> AlignmentRecord {
        read(name, start, cigar).second_in_pair()
    }

    #[fixture]
    fn config() -> AnalysisConfig {
        AnalysisConfig {
            target: "chr1:1000-1300".to_string(),
            exons: vec!["chr1:1000-1300".to_string()],
            ..Default::default()
        }
    }

    fn run(config: AnalysisConfig, records: Vec<AlignmentRecord>) -> (MotifPopulation, RunCounters) {
        let mut parser = Parser::new(config.validate().unwrap());
        let population = parser
            .process(records.into_iter().map(Ok), None)
            .unwrap();
        (population, parser.counters().clone())
    }

    #[rstest]
    fn test_pairs_become_motifs(config: AnalysisConfig) {
        let records = vec![
            read("a", 1010, "50M"),
            read("b", 1020, "30M2D20M"),
            mate("a", 1040, "50M"),
            mate("b", 1040, "10M2D40M"),
        ];
        let (population, counters) = run(config, records);

        assert_eq!(counters.total, 4);
        assert_eq!(counters.pairs, 2);
        assert_eq!(counters.parsed, 2);
        assert_eq!(counters.wt, 1);
        assert_eq!(counters.motif, 1);
        assert_eq!(population.size(), 2);
        assert!(counters.is_reconciled(2));
    }

    #[rstest]
    fn test_off_target_drops_pending_mate(config: AnalysisConfig) {
        let records = vec![read("a", 1010, "50M"), mate("a", 1280, "50M")];
        let (population, counters) = run(config, records);

        assert_eq!(counters.off_target, 1);
        assert_eq!(counters.mate_dropped, 1);
        assert_eq!(counters.pairs, 0);
        assert!(population.is_empty());
        assert!(counters.is_reconciled(2));
    }

    #[rstest]
    fn test_low_mapping_quality(mut config: AnalysisConfig) {
        config.min_mapping_quality = 20;
        let records = vec![
            read("a", 1010, "50M").with_mapping_quality(5),
            mate("a", 1040, "50M"),
        ];
        let (_, counters) = run(config, records);

        assert_eq!(counters.skipped_qual, 1);
        // the second mate arrives after its partner was blacklisted
        assert_eq!(counters.mate_dropped, 1);
        assert!(counters.is_reconciled(2));
    }

    #[rstest]
    fn test_unpaired_records_skipped_in_paired_mode(config: AnalysisConfig) {
        let records = vec![read("a", 1010, "50M").unpaired()];
        let (_, counters) = run(config, records);
        assert_eq!(counters.skipped, 1);
        assert!(counters.is_reconciled(2));
    }

    #[rstest]
    fn test_duplicate_slot(config: AnalysisConfig) {
        let records = vec![read("a", 1010, "50M"), read("a", 1020, "50M")];
        let (_, counters) = run(config, records);
        assert_eq!(counters.skipped, 1);
        assert_eq!(counters.mate_dropped, 1);
        assert!(counters.is_reconciled(2));
    }

    #[rstest]
    fn test_non_overlapping_mates(config: AnalysisConfig) {
        let records = vec![read("a", 1010, "50M"), mate("a", 1100, "50M")];
        let (_, counters) = run(config, records);
        assert_eq!(counters.parsed, 1);
        assert_eq!(counters.no_overlap, 2);
        assert!(counters.is_reconciled(2));
    }

    #[rstest]
    fn test_short_reads(mut config: AnalysisConfig) {
        config.min_read_length = 40;
        let records = vec![read("a", 1010, "50M"), mate("a", 1040, "30M")];
        let (_, counters) = run(config, records);
        assert_eq!(counters.skipped_len, 2);
        assert_eq!(counters.pairs, 0);
        assert!(counters.is_reconciled(2));
    }

    #[rstest]
    fn test_unfinished_pairs(config: AnalysisConfig) {
        let records = vec![read("a", 1010, "50M"), read("b", 1020, "50M")];
        let (_, counters) = run(config, records);
        assert_eq!(counters.not_processed, 2);
        assert!(counters.is_reconciled(2));
    }

    #[rstest]
    fn test_single_end(mut config: AnalysisConfig) {
        config.paired = false;
        let records = vec![
            read("a", 1010, "50M").unpaired(),
            read("b", 1010, "20M3D30M").unpaired(),
            read("c", 1010, "20M3D30M").unpaired(),
        ];
        let (population, counters) = run(config, records);
        assert_eq!(counters.pairs, 3);
        assert_eq!(population.size(), 2);
        assert_eq!(population.total(), 3);
        assert!(counters.is_reconciled(1));
    }

    #[rstest]
    fn test_skip_and_stop_after(mut config: AnalysisConfig) {
        config.paired = false;
        config.skip_records = 1;
        config.stop_after_pairs = 2;
        let records: Vec<AlignmentRecord> = (0..5)
            .map(|i| read(&format!("r{}", i), 1010, "50M").unpaired())
            .collect();
        let (_, counters) = run(config, records);
        assert_eq!(counters.total, 2);
        assert_eq!(counters.pairs, 2);
    }

    #[rstest]
    fn test_read_name_filter(mut config: AnalysisConfig) {
        config.read_names = vec!["b".to_string()];
        let records = vec![
            read("a", 1010, "50M"),
            read("b", 1010, "50M"),
            mate("a", 1040, "50M"),
            mate("b", 1040, "50M"),
            read("c", 1010, "50M"),
        ];
        let (_, counters) = run(config, records);
        assert_eq!(counters.total, 2);
        assert_eq!(counters.pairs, 1);
    }

    #[rstest]
    fn test_count_threshold(mut config: AnalysisConfig) {
        config.min_motif_count = 2;
        let records = vec![
            read("a", 1010, "50M"),
            mate("a", 1040, "50M"),
            read("b", 1010, "50M"),
            mate("b", 1040, "50M"),
            read("c", 1010, "20M1I30M"),
            mate("c", 1040, "50M"),
        ];
        let (population, counters) = run(config, records);
        assert_eq!(counters.low_coverage, 1);
        assert_eq!(population.size(), 1);
        assert_eq!(population.total(), 2);
    }

    #[rstest]
    fn test_coverage(mut config: AnalysisConfig) {
        config.coverage = true;
        let records = vec![read("a", 1010, "20M"), mate("a", 1020, "20M")];
        let (population, _) = run(config, records);
        let (motif, _) = population.iter().next().unwrap();
        // window starts at 1000; reads cover 1010..=1029 and 1020..=1039
        assert_eq!(motif.coverage()[9], 0);
        assert_eq!(motif.coverage()[10], 1);
        assert_eq!(motif.coverage()[25], 2);
        assert_eq!(motif.coverage()[39], 1);
        assert_eq!(motif.coverage()[40], 0);
    }

    #[rstest]
    fn test_stream_error_keeps_partial_population(mut config: AnalysisConfig) {
        config.paired = false;
        let records = vec![
            Ok(read("a", 1010, "50M").unpaired()),
            Ok(read("b", 1010, "20M3D30M").unpaired()),
            Err(ParserError::Io(std::io::Error::other("truncated BGZF block"))),
            Ok(read("c", 1010, "50M").unpaired()),
        ];
        let mut parser = Parser::new(config.validate().unwrap());
        let population = parser.process(records, None).unwrap();
        let counters = parser.counters();

        assert!(counters.truncated);
        assert_eq!(counters.total, 2);
        assert_eq!(counters.pairs, 2);
        assert_eq!(population.size(), 2);
        assert_eq!(population.total(), 2);
        assert!(counters.is_reconciled(1));
    }

    #[rstest]
    fn test_stream_error_finishes_pending_and_threshold(mut config: AnalysisConfig) {
        config.min_motif_count = 2;
        let records = vec![
            Ok(read("a", 1010, "50M")),
            Ok(mate("a", 1040, "50M")),
            Ok(read("b", 1010, "50M")),
            Err(ParserError::Io(std::io::Error::other("unexpected EOF"))),
        ];
        let mut parser = Parser::new(config.validate().unwrap());
        let population = parser.process(records, None).unwrap();
        let counters = parser.counters();

        assert!(counters.truncated);
        assert_eq!(counters.not_processed, 1);
        assert_eq!(counters.low_coverage, 1);
        assert!(population.is_empty());
        assert!(counters.is_reconciled(2));
    }

    #[rstest]
    fn test_malformed_records_are_counted(mut config: AnalysisConfig) {
        config.paired = false;
        let records = vec![
            Ok(read("a", 1010, "50M").unpaired()),
            Err(ParserError::MalformedRecord("b: invalid CIGAR".to_string())),
            Ok(read("c", 1010, "50M").unpaired()),
        ];
        let mut parser = Parser::new(config.validate().unwrap());
        let population = parser.process(records, None).unwrap();
        let counters = parser.counters();

        assert!(!counters.truncated);
        assert_eq!(counters.malformed, 1);
        assert_eq!(counters.total, 3);
        assert_eq!(population.total(), 2);
        assert!(counters.is_reconciled(1));
    }

    #[rstest]
    fn test_substitutions_need_a_reference(mut config: AnalysisConfig) {
        config.detect_substitutions = true;
        let mut parser = Parser::new(config.validate().unwrap());
        let result = parser.process(Vec::new(), None);
        assert!(matches!(result, Err(ParserError::MissingReference(_))));
    }
}
