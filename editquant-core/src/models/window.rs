use std::fmt::{self, Display};

use serde::Serialize;

///
/// The genomic window an analysis is restricted to.
///
/// `start <= stop` always holds; both ends are inclusive when testing
/// whether a read lies on target.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TargetWindow {
    pub chr: String,
    pub start: u64,
    pub stop: u64,
}

impl TargetWindow {
    pub fn new(chr: &str, start: u64, stop: u64) -> Self {
        let (start, stop) = if stop < start { (stop, start) } else { (start, stop) };
        TargetWindow {
            chr: chr.to_string(),
            start,
            stop,
        }
    }

    pub fn len(&self) -> u64 {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    pub fn contains(&self, position: u64) -> bool {
        self.start <= position && position <= self.stop
    }

    /// Grow the window by `tail` bases on both sides.
    pub fn padded(&self, tail: u64) -> Self {
        TargetWindow {
            chr: self.chr.clone(),
            start: self.start.saturating_sub(tail),
            stop: self.stop + tail,
        }
    }
}

impl Display for TargetWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chr, self.start, self.stop)
    }
}

///
/// Reference bases of a window, addressed by genomic position.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSlice {
    start: u64,
    bases: Vec<u8>,
}

impl ReferenceSlice {
    /// `bases[0]` sits at genomic position `start`.
    pub fn new(start: u64, bases: &[u8]) -> Self {
        ReferenceSlice {
            start,
            bases: bases.to_ascii_uppercase(),
        }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Base at `position`, `N` when the position is not covered.
    pub fn base_at(&self, position: u64) -> u8 {
        position
            .checked_sub(self.start)
            .and_then(|offset| self.bases.get(offset as usize))
            .copied()
            .unwrap_or(b'N')
    }
}
