//! Event extraction from a single read.

use fxhash::FxHashMap;

use editquant_core::models::{EditEvent, ReferenceSlice};

use crate::alignment::{AlignmentOpKind, ReadAlignment};

///
/// A multiset of edit events with observation counts.
///
/// Events keep the order in which they were first seen.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTally {
    entries: Vec<(EditEvent, u32)>,
    index: FxHashMap<EditEvent, usize>,
}

impl EventTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, event: EditEvent, count: u32) {
        match self.index.get(&event) {
            Some(&idx) => self.entries[idx].1 += count,
            None => {
                self.index.insert(event.clone(), self.entries.len());
                self.entries.push((event, count));
            }
        }
    }

    pub fn merge(&mut self, other: &EventTally) {
        for (event, count) in other.iter() {
            self.add(event.clone(), *count);
        }
    }

    pub fn count(&self, event: &EditEvent) -> u32 {
        self.index
            .get(event)
            .map(|&idx| self.entries[idx].1)
            .unwrap_or(0)
    }

    /// Drop every event seen fewer than `min_count` times.
    pub fn retain_supported(&mut self, min_count: u32) {
        self.entries.retain(|(_, count)| *count >= min_count);
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, (event, _))| (event.clone(), idx))
            .collect();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(EditEvent, u32)> {
        self.entries.iter()
    }

    /// The events without their counts.
    pub fn into_events(self) -> Vec<EditEvent> {
        self.entries.into_iter().map(|(event, _)| event).collect()
    }
}

/// What one read contributes to its pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRead {
    pub start: u64,
    /// Last reference position covered by the alignment (inclusive).
    pub end: u64,
    /// Bases aligned as match or insertion.
    pub length: u64,
    pub events: EventTally,
}

///
/// Walk a read's alignment and tally its edit events.
///
/// Deletions and insertions are emitted at the current reference position.
/// With a reference, every matched base that differs from it and reaches
/// `min_base_quality` is emitted as a substitution; without one, matched
/// spans are not inspected at all.
///
pub fn extract_events(
    read: &ReadAlignment,
    reference: Option<&ReferenceSlice>,
    min_base_quality: u8,
) -> ExtractedRead {
    let mut events = EventTally::new();
    let mut ref_pos = read.start;
    let mut seq_pos: usize = 0;
    let mut length: u64 = 0;

    for op in &read.ops {
        match op.kind {
            AlignmentOpKind::Match => {
                if let Some(reference) = reference {
                    for offset in 0..op.len {
                        let idx = seq_pos + offset as usize;
                        let (Some(&base), Some(&quality)) =
                            (read.sequence.get(idx), read.qualities.get(idx))
                        else {
                            break;
                        };
                        let position = ref_pos + offset;
                        let ref_base = reference.base_at(position);
                        if !base.eq_ignore_ascii_case(&ref_base) && quality >= min_base_quality {
                            events.add(EditEvent::substitution(position, ref_base, base), 1);
                        }
                    }
                }
            }
            AlignmentOpKind::Deletion => events.add(EditEvent::deletion(ref_pos, op.len), 1),
            AlignmentOpKind::Insertion => events.add(EditEvent::insertion(ref_pos, op.len), 1),
            AlignmentOpKind::SoftClip | AlignmentOpKind::Skip => {}
        }

        if op.kind.consumes_reference() {
            ref_pos += op.len;
        }
        if op.kind.consumes_read() {
            length += op.len;
        }
        if op.kind.consumes_read() || op.kind == AlignmentOpKind::SoftClip {
            seq_pos += op.len as usize;
        }
    }

    ExtractedRead {
        start: read.start,
        end: ref_pos.saturating_sub(1),
        length,
        events,
    }
}
