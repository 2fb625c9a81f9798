use editquant_motifs::alignment::{AlignmentOp, AlignmentOpKind, ReadAlignment};

///
/// One alignment record as the parser consumes it, independent of the file
/// format it came from.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    pub name: String,
    /// 1-based leftmost reference position.
    pub start: u64,
    pub ops: Vec<AlignmentOp>,
    pub reverse: bool,
    pub paired: bool,
    pub mapped: bool,
    pub mate_unmapped: bool,
    pub first_in_pair: bool,
    pub mapping_quality: u8,
    pub sequence: Vec<u8>,
    /// Phred scores, one per base of `sequence`.
    pub qualities: Vec<u8>,
}

impl AlignmentRecord {
    /// A mapped first mate with a properly mapped partner.
    pub fn new(name: &str, start: u64, ops: Vec<AlignmentOp>) -> Self {
        AlignmentRecord {
            name: name.to_string(),
            start,
            ops,
            reverse: false,
            paired: true,
            mapped: true,
            mate_unmapped: false,
            first_in_pair: true,
            mapping_quality: 60,
            sequence: Vec::new(),
            qualities: Vec::new(),
        }
    }

    pub fn second_in_pair(mut self) -> Self {
        self.first_in_pair = false;
        self.reverse = true;
        self
    }

    pub fn unpaired(mut self) -> Self {
        self.paired = false;
        self
    }

    pub fn with_mapping_quality(mut self, mapping_quality: u8) -> Self {
        self.mapping_quality = mapping_quality;
        self
    }

    pub fn with_bases(mut self, sequence: &[u8], qualities: &[u8]) -> Self {
        self.sequence = sequence.to_vec();
        self.qualities = qualities.to_vec();
        self
    }

    ///
    /// Number of bases of the read, soft clips included.
    ///
    /// Falls back to the alignment operations when the record carries no
    /// sequence.
    ///
    pub fn sequence_length(&self) -> u64 {
        if !self.sequence.is_empty() {
            return self.sequence.len() as u64;
        }
        self.ops
            .iter()
            .filter(|op| op.kind.consumes_read() || op.kind == AlignmentOpKind::SoftClip)
            .map(|op| op.len)
            .sum()
    }

    /// The alignment handed to event extraction; bases are only carried when asked for.
    pub fn to_alignment(&self, with_bases: bool) -> ReadAlignment {
        let alignment = ReadAlignment::new(self.start, self.ops.clone());
        if with_bases {
            alignment.with_bases(&self.sequence, &self.qualities)
        } else {
            alignment
        }
    }
}
