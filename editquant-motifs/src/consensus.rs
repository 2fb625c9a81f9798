//! Combining the events of the reads of one pair.

use editquant_core::models::{EditEvent, TargetWindow};

use crate::errors::{MotifError, MotifResult};
use crate::extract::{EventTally, ExtractedRead};

/// Outcome of combining the reads of one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairConsensus {
    /// Surviving events with their counts summed over the reads.
    Events(EventTally),
    /// The mates are too far apart to describe one allele.
    NoOverlap,
}

///
/// Signed overlap of two reads: positive when they share bases, negative
/// for the size of the gap between them.
///
pub fn mate_overlap(first: &ExtractedRead, second: &ExtractedRead) -> i64 {
    let (earlier, later) = if first.start <= second.start {
        (first, second)
    } else {
        (second, first)
    };
    earlier.end as i64 - later.start as i64
}

///
/// Combine one read, or the two reads of a pair, into one event tally.
///
/// - two reads must overlap by at least `min_overlap` (negative values allow a gap),
///   otherwise the pair is [`PairConsensus::NoOverlap`]
/// - when no read carries an event, a single wildtype event spanning the
///   analysis window is reported, counted once per read
/// - with `min_support > 0`, events seen fewer times are dropped, which may
///   leave the tally empty
///
/// More than two reads is an invariant violation.
///
pub fn resolve_pair(
    reads: &[ExtractedRead],
    window: &TargetWindow,
    min_support: u32,
    min_overlap: i64,
) -> MotifResult<PairConsensus> {
    match reads.len() {
        1 => {}
        2 => {
            if mate_overlap(&reads[0], &reads[1]) < min_overlap {
                return Ok(PairConsensus::NoOverlap);
            }
        }
        n => return Err(MotifError::InvalidReadCount(n)),
    }

    let mut tally = EventTally::new();
    for read in reads {
        tally.merge(&read.events);
    }

    if tally.is_empty() {
        tally.add(
            EditEvent::wildtype(window.start, window.stop),
            reads.len() as u32,
        );
    }

    if min_support > 0 {
        tally.retain_supported(min_support);
    }

    Ok(PairConsensus::Events(tally))
}
