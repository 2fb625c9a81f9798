use std::fmt::{self, Display};

use serde::Serialize;

/// Transcription direction of an exon model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strand {
    Forward,
    Reverse,
}

///
/// One exon, oriented in transcription direction.
///
/// `from` is the boundary where transcription enters the exon and `to` the
/// boundary where it leaves, so `from > to` on the reverse strand. The exon
/// covers `from` up to, but not including, `to`.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Exon {
    pub from: u64,
    pub to: u64,
}

impl Exon {
    pub fn new(from: u64, to: u64) -> Self {
        Exon { from, to }
    }

    pub fn len(&self) -> u64 {
        self.from.abs_diff(self.to)
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    pub fn is_reverse(&self) -> bool {
        self.from > self.to
    }

    /// Inclusive containment, independent of orientation.
    pub fn contains(&self, position: u64) -> bool {
        let (low, high) = if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        };
        low <= position && position <= high
    }

    /// Genomic positions walked in transcription direction.
    pub fn positions(&self) -> Box<dyn Iterator<Item = u64>> {
        if self.is_reverse() {
            Box::new(((self.to + 1)..=self.from).rev())
        } else {
            Box::new(self.from..self.to)
        }
    }
}

impl Display for Exon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

///
/// The exons of one transcript, stored in ascending genomic order.
///
/// The strand is derived once from the orientation of the first exon.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExonModel {
    exons: Vec<Exon>,
    strand: Strand,
}

impl ExonModel {
    pub fn new(exons: Vec<Exon>) -> Self {
        let strand = match exons.first() {
            Some(exon) if exon.is_reverse() => Strand::Reverse,
            _ => Strand::Forward,
        };
        ExonModel { exons, strand }
    }

    pub fn empty() -> Self {
        ExonModel::new(Vec::new())
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn exons(&self) -> &[Exon] {
        &self.exons
    }

    pub fn len(&self) -> usize {
        self.exons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exons.is_empty()
    }

    /// Exons in the order they are transcribed.
    pub fn transcription_order(&self) -> Box<dyn Iterator<Item = &Exon> + '_> {
        match self.strand {
            Strand::Forward => Box::new(self.exons.iter()),
            Strand::Reverse => Box::new(self.exons.iter().rev()),
        }
    }

    /// Index of the first exon (in stored order) touched by either boundary.
    pub fn first_hit(&self, start: u64, stop: u64) -> Option<usize> {
        self.exons
            .iter()
            .position(|exon| exon.contains(start) || exon.contains(stop))
    }

    ///
    /// Number of coding nucleotides transcribed before an event that hits
    /// exon `hit`.
    ///
    /// Full lengths of the exons transcribed earlier, plus the distance from
    /// the hit exon's entry boundary to the event's first transcribed
    /// coordinate (`start` on the forward strand, `stop` on the reverse).
    ///
    pub fn nucleotides_before(&self, hit: usize, start: u64, stop: u64) -> u64 {
        let exon = &self.exons[hit];
        match self.strand {
            Strand::Forward => {
                let upstream: u64 = self.exons[..hit].iter().map(Exon::len).sum();
                upstream + start.abs_diff(exon.from)
            }
            Strand::Reverse => {
                let upstream: u64 = self.exons[hit + 1..].iter().map(Exon::len).sum();
                upstream + stop.abs_diff(exon.from)
            }
        }
    }

    /// Move the entry boundary of the exon holding `position` onto it.
    pub fn with_translation_start(mut self, position: u64) -> Self {
        for exon in self.exons.iter_mut() {
            if exon.contains(position) {
                exon.from = position;
            }
        }
        ExonModel::new(self.exons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn forward_model() -> ExonModel {
        ExonModel::new(vec![Exon::new(100, 110), Exon::new(200, 220)])
    }

    #[fixture]
    fn reverse_model() -> ExonModel {
        ExonModel::new(vec![Exon::new(110, 100), Exon::new(220, 200)])
    }

    #[rstest]
    fn test_strand_derived_from_first_exon(forward_model: ExonModel, reverse_model: ExonModel) {
        assert_eq!(forward_model.strand(), Strand::Forward);
        assert_eq!(reverse_model.strand(), Strand::Reverse);
        assert_eq!(ExonModel::empty().strand(), Strand::Forward);
    }

    #[rstest]
    fn test_positions_walk_in_transcription_direction() {
        let forward: Vec<u64> = Exon::new(10, 13).positions().collect();
        assert_eq!(forward, vec![10, 11, 12]);

        let reverse: Vec<u64> = Exon::new(13, 10).positions().collect();
        assert_eq!(reverse, vec![13, 12, 11]);
    }

    #[rstest]
    fn test_transcription_order(reverse_model: ExonModel) {
        let order: Vec<u64> = reverse_model.transcription_order().map(|e| e.from).collect();
        assert_eq!(order, vec![220, 110]);
    }

    #[rstest]
    fn test_first_hit(forward_model: ExonModel) {
        assert_eq!(forward_model.first_hit(105, 107), Some(0));
        assert_eq!(forward_model.first_hit(198, 201), Some(1));
        assert_eq!(forward_model.first_hit(150, 160), None);
    }

    #[rstest]
    fn test_nucleotides_before_forward(forward_model: ExonModel) {
        // 10 bases of the first exon plus 5 into the second
        assert_eq!(forward_model.nucleotides_before(1, 205, 208), 15);
        assert_eq!(forward_model.nucleotides_before(0, 103, 104), 3);
    }

    #[rstest]
    fn test_nucleotides_before_reverse(reverse_model: ExonModel) {
        // transcription starts at 220: the event ending at 215 is 5 bases in
        assert_eq!(reverse_model.nucleotides_before(1, 212, 215), 5);
        // first exon in stored order is transcribed last: 20 bases before it
        assert_eq!(reverse_model.nucleotides_before(0, 104, 107), 23);
    }

    #[rstest]
    fn test_with_translation_start(forward_model: ExonModel) {
        let model = forward_model.with_translation_start(104);
        assert_eq!(model.exons()[0], Exon::new(104, 110));
        assert_eq!(model.exons()[1], Exon::new(200, 220));
    }
}
