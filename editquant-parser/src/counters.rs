use serde::Serialize;

///
/// Run-level counters of one parser run.
///
/// Every record counted in `total` lands in exactly one read-level bucket:
/// a resolved pair, one of the skip categories, `malformed`, `no_overlap`,
/// `mate_dropped` or `not_processed`. `pairs`, `parsed`, `wt`, `motif` and
/// `low_coverage` count pairs and motifs rather than reads.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    pub total: u64,
    /// Pairs registered in the population.
    pub pairs: u64,
    /// Pairs that had events extracted.
    pub parsed: u64,
    pub skipped: u64,
    pub skipped_qual: u64,
    pub skipped_len: u64,
    /// Records that could not be decoded.
    pub malformed: u64,
    pub off_target: u64,
    pub no_overlap: u64,
    /// Pending or later mates of a read that was discarded.
    pub mate_dropped: u64,
    /// Reads still waiting for their mate when the stream ended.
    pub not_processed: u64,
    pub wt: u64,
    pub motif: u64,
    /// Motifs removed by the count threshold.
    pub low_coverage: u64,
    /// The record stream failed before its end; counts cover what was read.
    pub truncated: bool,
}

impl RunCounters {
    /// Reads accounted for outside resolved pairs.
    pub fn dropped_reads(&self) -> u64 {
        self.skipped
            + self.skipped_qual
            + self.skipped_len
            + self.malformed
            + self.off_target
            + self.no_overlap
            + self.mate_dropped
            + self.not_processed
    }

    pub fn is_reconciled(&self, reads_per_pair: u64) -> bool {
        self.total == self.pairs * reads_per_pair + self.dropped_reads()
    }

    pub fn log_summary(&self) {
        log::info!(
            "Reads: {} total, {} pairs, {} parsed",
            self.total,
            self.pairs,
            self.parsed
        );
        log::info!("Supporting WT/motifs: {}/{}", self.wt, self.motif);
        log::info!(
            "Filtered: low quality {}, too short {}, off target {}, malformed {}, other {}",
            self.skipped_qual,
            self.skipped_len,
            self.off_target,
            self.malformed,
            self.skipped
        );
        log::info!(
            "No overlap: {}, mate dropped: {}, not processed: {}, low coverage motifs: {}",
            self.no_overlap,
            self.mate_dropped,
            self.not_processed,
            self.low_coverage
        );
        if self.truncated {
            log::warn!("Input ended early; counts are partial");
        }
    }
}
