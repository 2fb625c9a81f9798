//! The alignment of a single read, as handed over by an alignment source.

use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::record::Cigar;

use crate::errors::{MotifError, MotifResult};

/// Alignment operations that matter for event extraction.
///
/// Hard clips and padding never touch the read sequence or the reference and
/// are dropped before they get here. Sequence match/mismatch operations are
/// folded into `Match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentOpKind {
    Match,
    Insertion,
    Deletion,
    SoftClip,
    Skip,
}

impl AlignmentOpKind {
    pub fn consumes_reference(&self) -> bool {
        matches!(
            self,
            AlignmentOpKind::Match | AlignmentOpKind::Deletion | AlignmentOpKind::Skip
        )
    }

    pub fn consumes_read(&self) -> bool {
        matches!(self, AlignmentOpKind::Match | AlignmentOpKind::Insertion)
    }

    /// `=` and `X` fold into `Match`; hard clips and padding have no counterpart.
    pub fn from_sam(kind: Kind) -> Option<Self> {
        match kind {
            Kind::Match | Kind::SequenceMatch | Kind::SequenceMismatch => {
                Some(AlignmentOpKind::Match)
            }
            Kind::Insertion => Some(AlignmentOpKind::Insertion),
            Kind::Deletion => Some(AlignmentOpKind::Deletion),
            Kind::SoftClip => Some(AlignmentOpKind::SoftClip),
            Kind::Skip => Some(AlignmentOpKind::Skip),
            Kind::HardClip | Kind::Pad => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentOp {
    pub kind: AlignmentOpKind,
    pub len: u64,
}

impl AlignmentOp {
    pub fn new(kind: AlignmentOpKind, len: u64) -> Self {
        AlignmentOp { kind, len }
    }
}

///
/// Parse a CIGAR string such as `48M20D51M`.
///
/// `=` and `X` become matches, `N` a reference skip, `H` and `P` are dropped.
///
pub fn parse_cigar(cigar: &str) -> MotifResult<Vec<AlignmentOp>> {
    let mut ops = Vec::new();
    for op in Cigar::new(cigar.as_bytes()).iter() {
        let op = op.map_err(|_| MotifError::InvalidCigar(cigar.to_string()))?;
        if let Some(kind) = AlignmentOpKind::from_sam(op.kind()) {
            ops.push(AlignmentOp::new(kind, op.len() as u64));
        }
    }
    Ok(ops)
}

///
/// One aligned read: its leftmost reference position, its operations and,
/// when substitutions are wanted, its bases with their phred qualities.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadAlignment {
    pub start: u64,
    pub ops: Vec<AlignmentOp>,
    pub sequence: Vec<u8>,
    pub qualities: Vec<u8>,
}

impl ReadAlignment {
    pub fn new(start: u64, ops: Vec<AlignmentOp>) -> Self {
        ReadAlignment {
            start,
            ops,
            sequence: Vec::new(),
            qualities: Vec::new(),
        }
    }

    pub fn with_bases(mut self, sequence: &[u8], qualities: &[u8]) -> Self {
        self.sequence = sequence.to_ascii_uppercase();
        self.qualities = qualities.to_vec();
        self
    }
}
