//! The registry of distinct motifs and their observation counts.

use fxhash::FxHashMap;

use editquant_core::models::{EditEvent, TargetWindow};
use editquant_motifs::{Motif, MotifSignature, TranscriptContext};

use crate::errors::{PopulationError, PopulationResult};

/// Stable reference to a registered motif.
///
/// Handles stay valid until [`MotifPopulation::apply_count_threshold`] removes entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MotifHandle(usize);

#[derive(Debug, Clone)]
struct Entry {
    motif: Motif,
    count: u64,
}

///
/// All motifs observed over one target window.
///
/// The population owns the single canonical instance of every motif: looking
/// up an event list whose signature is already registered returns the
/// existing entry, so counts and coverage always accumulate in one place.
/// Entries keep their discovery order, which is the tie-break of every ranking.
///
#[derive(Debug, Clone)]
pub struct MotifPopulation {
    window: TargetWindow,
    context: TranscriptContext,
    entries: Vec<Entry>,
    index: FxHashMap<MotifSignature, usize>,
}

impl MotifPopulation {
    pub fn new(window: TargetWindow, context: TranscriptContext) -> Self {
        MotifPopulation {
            window,
            context,
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn chr(&self) -> &str {
        &self.window.chr
    }

    pub fn window(&self) -> &TargetWindow {
        &self.window
    }

    pub fn context(&self) -> &TranscriptContext {
        &self.context
    }

    ///
    /// Return the motif made of `events`, registering it with a zero count
    /// when its signature has not been seen yet.
    ///
    pub fn find_or_create(&mut self, events: Vec<EditEvent>) -> MotifHandle {
        let signature = MotifSignature::from_events(&events);
        if let Some(&idx) = self.index.get(&signature) {
            return MotifHandle(idx);
        }

        let motif = Motif::new(&self.window, events, &self.context);
        let idx = self.entries.len();
        self.entries.push(Entry { motif, count: 0 });
        self.index.insert(signature, idx);
        MotifHandle(idx)
    }

    /// Add `by` observations to a motif and return its new count.
    pub fn increase_count(&mut self, handle: MotifHandle, by: u64) -> u64 {
        let entry = &mut self.entries[handle.0];
        entry.count += by;
        entry.count
    }

    pub fn increase_coverage(&mut self, handle: MotifHandle, from: u64, to: u64, by: u64) {
        self.entries[handle.0].motif.increase_coverage(from, to, by);
    }

    pub fn motif(&self, handle: MotifHandle) -> &Motif {
        &self.entries[handle.0].motif
    }

    pub fn count(&self, handle: MotifHandle) -> u64 {
        self.entries[handle.0].count
    }

    ///
    /// Register an already built motif with `count` observations.
    ///
    /// A motif whose signature is known adds its count and coverage to the
    /// registered instance. A motif from another chromosome or built over
    /// another window is rejected.
    ///
    pub fn insert(&mut self, motif: Motif, count: u64) -> PopulationResult<MotifHandle> {
        if motif.chr != self.window.chr {
            return Err(PopulationError::ChromosomeMismatch {
                expected: self.window.chr.clone(),
                found: motif.chr.clone(),
            });
        }
        if motif.start != self.window.start || motif.stop != self.window.stop {
            return Err(PopulationError::IncompatibleModel(format!(
                "motif window {}-{} differs from {}",
                motif.start, motif.stop, self.window
            )));
        }

        let signature = motif.signature();
        match self.index.get(&signature) {
            Some(&idx) => {
                let entry = &mut self.entries[idx];
                entry.count += count;
                entry.motif.add_coverage(motif.coverage());
                Ok(MotifHandle(idx))
            }
            None => {
                let idx = self.entries.len();
                self.entries.push(Entry { motif, count });
                self.index.insert(signature, idx);
                Ok(MotifHandle(idx))
            }
        }
    }

    ///
    /// Fold another population of the same analysis into this one.
    ///
    /// Motifs are replayed in the other population's discovery order, so
    /// merging shards in any order yields the same counts and coverage.
    ///
    pub fn merge(&mut self, other: MotifPopulation) -> PopulationResult<()> {
        if other.window.chr != self.window.chr {
            return Err(PopulationError::ChromosomeMismatch {
                expected: self.window.chr.clone(),
                found: other.window.chr,
            });
        }
        if other.window != self.window {
            return Err(PopulationError::IncompatibleModel(format!(
                "target windows {} and {} differ",
                self.window, other.window
            )));
        }
        if other.context.exons() != self.context.exons()
            || other.context.max_inframe_length() != self.context.max_inframe_length()
        {
            return Err(PopulationError::IncompatibleModel(
                "exon models differ".to_string(),
            ));
        }

        for entry in other.entries {
            self.insert(entry.motif, entry.count)?;
        }
        Ok(())
    }

    ///
    /// Remove every motif observed fewer than `min_count` times and return
    /// how many were removed. Outstanding handles are invalidated.
    ///
    pub fn apply_count_threshold(&mut self, min_count: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.count >= min_count);
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.motif.signature(), idx))
            .collect();

        let removed = before - self.entries.len();
        if removed > 0 {
            log::debug!("Removed {} motifs seen fewer than {} times", removed, min_count);
        }
        removed
    }

    /// Number of motifs with at least one observation.
    pub fn size(&self) -> usize {
        self.entries.iter().filter(|entry| entry.count > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Observations summed over all motifs.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    /// Observed motifs with their counts, in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&Motif, u64)> {
        self.entries
            .iter()
            .filter(|entry| entry.count > 0)
            .map(|entry| (&entry.motif, entry.count))
    }
}
