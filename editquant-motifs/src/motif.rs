use std::fmt::{self, Display};

use editquant_core::models::{EditEvent, EventKind, TargetWindow};

use crate::consequence::{Consequence, TranscriptContext};

///
/// Identity of a motif: its canonically ordered events, compared on kind,
/// position and alternate base.
///
/// Two event lists that are permutations of each other share a signature.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MotifSignature(Vec<(EventKind, u64, u64, Option<u8>)>);

impl MotifSignature {
    pub fn from_events(events: &[EditEvent]) -> Self {
        let mut keys: Vec<(EventKind, u64, u64, Option<u8>)> = events
            .iter()
            .map(|e| (e.kind, e.start, e.stop, e.alt_base))
            .collect();
        keys.sort_by_key(|&(kind, start, stop, alt)| (start, stop, kind, alt));
        MotifSignature(keys)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

///
/// One reconstructed allele over the analysis window.
///
/// Events are sorted by start position and each carries the consequence
/// computed when the motif was built. Only the coverage profile changes
/// afterwards.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Motif {
    pub chr: String,
    pub start: u64,
    pub stop: u64,
    pub length: u64,
    events: Vec<EditEvent>,
    consequences: Vec<Consequence>,
    coverage: Vec<u64>,
}

impl Motif {
    pub fn new(window: &TargetWindow, mut events: Vec<EditEvent>, context: &TranscriptContext) -> Self {
        events.sort_by_key(EditEvent::sort_key);
        let consequences = events.iter().map(|e| context.classify(e)).collect();
        let length = window.stop.abs_diff(window.start);

        Motif {
            chr: window.chr.clone(),
            start: window.start,
            stop: window.stop,
            length,
            events,
            consequences,
            coverage: vec![0; length as usize],
        }
    }

    pub fn signature(&self) -> MotifSignature {
        MotifSignature::from_events(&self.events)
    }

    pub fn events(&self) -> &[EditEvent] {
        &self.events
    }

    pub fn consequences(&self) -> &[Consequence] {
        &self.consequences
    }

    pub fn coverage(&self) -> &[u64] {
        &self.coverage
    }

    pub fn is_wildtype(&self) -> bool {
        self.events.iter().all(EditEvent::is_wildtype)
    }

    /// Loss of function: not wildtype and at least one damaging consequence.
    pub fn is_lof(&self) -> bool {
        !self.is_wildtype() && self.consequences.iter().any(Consequence::is_damaging)
    }

    pub fn has_kind(&self, kinds: &[EventKind]) -> bool {
        self.events.iter().any(|e| kinds.contains(&e.kind))
    }

    ///
    /// Add `by` to every position of `[from, to)` that lies inside the window
    /// and outside this motif's own deletions.
    ///
    pub fn increase_coverage(&mut self, from: u64, to: u64, by: u64) {
        let deletions: Vec<(u64, u64)> = self
            .events
            .iter()
            .filter(|e| e.kind == EventKind::Deletion)
            .map(|e| (e.start, e.stop))
            .collect();

        for position in from.max(self.start)..to {
            let idx = (position - self.start) as usize;
            if idx >= self.coverage.len() {
                break;
            }
            if deletions.iter().any(|&(s, e)| s <= position && position < e) {
                continue;
            }
            self.coverage[idx] += by;
        }
    }

    /// Add another coverage profile of the same window, base by base.
    pub fn add_coverage(&mut self, coverage: &[u64]) {
        for (total, value) in self.coverage.iter_mut().zip(coverage) {
            *total += value;
        }
    }
}

impl Display for Motif {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .events
            .iter()
            .zip(&self.consequences)
            .map(|(event, consequence)| format!("{}[{}]", event, consequence))
            .collect();
        write!(f, "{}", parts.join("/"))
    }
}
