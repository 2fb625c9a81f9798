//! Functional consequence of an edit event against a transcript model.

use std::fmt::{self, Display};

use fxhash::FxHashMap;

use editquant_core::codon::{AminoAcid, complement, translate};
use editquant_core::models::{EditEvent, EventKind, ExonModel, ReferenceSlice, Strand};

/// Classification of one edit event.
///
/// Substitution classes carry the `ref>alt` nucleotide change so the call
/// stays traceable to the observed bases.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Consequence {
    Wildtype,
    Intron,
    Inframe,
    InframeDisruption,
    Frameshift,
    /// Substitution without amino-acid context: outside the spliced
    /// transcript or in a truncated trailing codon.
    Substitution { change: String },
    Missense {
        change: String,
        reference: AminoAcid,
        mutated: Option<AminoAcid>,
    },
    Synonymous { change: String },
    StopGain { change: String },
    StopLoss { change: String },
    StartGain { change: String },
    StartLoss { change: String },
    /// The reference codon could not be resolved.
    NoReference { change: String },
    /// No exon model was given.
    Unannotated,
}

impl Consequence {
    /// Whether this call counts toward loss-of-function screening.
    pub fn is_damaging(&self) -> bool {
        matches!(
            self,
            Consequence::Frameshift
                | Consequence::InframeDisruption
                | Consequence::Substitution { .. }
                | Consequence::Missense { .. }
                | Consequence::StopGain { .. }
                | Consequence::StopLoss { .. }
                | Consequence::StartGain { .. }
                | Consequence::StartLoss { .. }
        )
    }
}

impl Display for Consequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Consequence::Wildtype => write!(f, "WILDTYPE"),
            Consequence::Intron => write!(f, "INTRON"),
            Consequence::Inframe => write!(f, "INFRAME"),
            Consequence::InframeDisruption => write!(f, "INFRAMEDISRUPTION"),
            Consequence::Frameshift => write!(f, "FRAMESHIFT"),
            Consequence::Substitution { change } => write!(f, "SNV({})", change),
            Consequence::Missense {
                change,
                reference,
                mutated,
            } => write!(
                f,
                "SNV({}|{}>{})",
                change,
                reference,
                mutated.map_or("NA", |aa| aa.abbreviation())
            ),
            Consequence::Synonymous { change } => write!(f, "SYN({})", change),
            Consequence::StopGain { change } => write!(f, "STOPGAIN({})", change),
            Consequence::StopLoss { change } => write!(f, "STOPLOSS({})", change),
            Consequence::StartGain { change } => write!(f, "STARTGAIN({})", change),
            Consequence::StartLoss { change } => write!(f, "STARTLOSS({})", change),
            Consequence::NoReference { change } => write!(f, "NOREF({})", change),
            Consequence::Unannotated => write!(f, "NA"),
        }
    }
}

///
/// The spliced coding sequence of a transcript, in transcription direction.
///
/// Reverse-strand exons contribute complemented bases. `index` maps a
/// genomic position to its first offset in the spliced sequence.
///
#[derive(Debug, Clone, Default)]
struct CodingSequence {
    bases: Vec<u8>,
    index: FxHashMap<u64, usize>,
}

impl CodingSequence {
    fn splice(exons: &ExonModel, reference: Option<&ReferenceSlice>) -> Self {
        let reverse = exons.strand() == Strand::Reverse;
        let mut coding = CodingSequence::default();

        for exon in exons.transcription_order() {
            for position in exon.positions() {
                let base = reference.map_or(b'N', |r| r.base_at(position));
                let base = if reverse { complement(base) } else { base };
                coding.index.entry(position).or_insert(coding.bases.len());
                coding.bases.push(base);
            }
        }

        coding
    }
}

///
/// Everything needed to classify events, fixed for a whole population:
/// the exon model (and its strand), the spliced coding sequence and the
/// in-frame length bound.
///
#[derive(Debug, Clone)]
pub struct TranscriptContext {
    exons: ExonModel,
    coding: CodingSequence,
    max_inframe_length: i64,
}

impl TranscriptContext {
    pub fn new(
        exons: ExonModel,
        reference: Option<&ReferenceSlice>,
        max_inframe_length: i64,
    ) -> Self {
        let coding = CodingSequence::splice(&exons, reference);
        TranscriptContext {
            exons,
            coding,
            max_inframe_length,
        }
    }

    pub fn exons(&self) -> &ExonModel {
        &self.exons
    }

    pub fn max_inframe_length(&self) -> i64 {
        self.max_inframe_length
    }

    pub fn classify(&self, event: &EditEvent) -> Consequence {
        if event.kind == EventKind::Wildtype {
            return Consequence::Wildtype;
        }
        if self.exons.is_empty() {
            return Consequence::Unannotated;
        }

        match event.kind {
            EventKind::Substitution => self.classify_substitution(event),
            _ => self.classify_indel(event),
        }
    }

    fn classify_indel(&self, event: &EditEvent) -> Consequence {
        let Some(hit) = self.exons.first_hit(event.start, event.stop) else {
            return Consequence::Intron;
        };

        let before = self.exons.nucleotides_before(hit, event.start, event.stop);
        let length = event.stop - event.start;

        if before % 3 == 0 && length % 3 == 0 {
            if self.max_inframe_length < 0 || (length as i64) < self.max_inframe_length {
                Consequence::Inframe
            } else {
                Consequence::InframeDisruption
            }
        } else {
            Consequence::Frameshift
        }
    }

    fn classify_substitution(&self, event: &EditEvent) -> Consequence {
        let change = event.nucleotide_change();

        let Some(&offset) = self.coding.index.get(&event.start) else {
            return Consequence::Substitution { change };
        };

        let codon_start = offset - offset % 3;
        let Some(reference_codon) = self.coding.bases.get(codon_start..codon_start + 3) else {
            return Consequence::Substitution { change };
        };

        let alt = event.alt_base.unwrap_or(b'N');
        let alt = match self.exons.strand() {
            Strand::Forward => alt,
            Strand::Reverse => complement(alt),
        };
        let mut mutated_codon = [reference_codon[0], reference_codon[1], reference_codon[2]];
        mutated_codon[offset % 3] = alt;

        let Some(reference) = translate(reference_codon) else {
            log::warn!(
                "Could not determine reference codon at {} ({})",
                event.start,
                String::from_utf8_lossy(reference_codon)
            );
            return Consequence::NoReference { change };
        };
        let mutated = translate(&mutated_codon);

        if mutated == Some(reference) {
            Consequence::Synonymous { change }
        } else if mutated.is_some_and(|aa| aa.is_stop()) {
            Consequence::StopGain { change }
        } else if reference.is_stop() {
            Consequence::StopLoss { change }
        } else if mutated.is_some_and(|aa| aa.is_start()) {
            Consequence::StartGain { change }
        } else if reference.is_start() {
            Consequence::StartLoss { change }
        } else {
            Consequence::Missense {
                change,
                reference,
                mutated,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use editquant_core::models::Exon;

    use pretty_assertions::assert_eq;
    use rstest::*;

    // codons: ATG AAA TGG TAC ACG TAA + one trailing base
    const CODING: &[u8] = b"ATGAAATGGTACACGTAAC";

    #[fixture]
    fn forward() -> TranscriptContext {
        let reference = ReferenceSlice::new(1000, CODING);
        TranscriptContext::new(
            ExonModel::new(vec![Exon::new(1000, 1019)]),
            Some(&reference),
            9,
        )
    }

    fn indel_context(max_inframe_length: i64) -> TranscriptContext {
        TranscriptContext::new(
            ExonModel::new(vec![Exon::new(1000, 1012), Exon::new(1100, 1112)]),
            None,
            max_inframe_length,
        )
    }

    fn classify_snv(context: &TranscriptContext, position: u64, alt: u8) -> String {
        let ref_base = CODING
            .get((position - 1000) as usize)
            .copied()
            .unwrap_or(b'N');
        context
            .classify(&EditEvent::substitution(position, ref_base, alt))
            .to_string()
    }

    #[rstest]
    #[case(1002, b'A', "STARTLOSS(G>A)")]
    #[case(1005, b'G', "SYN(A>G)")]
    #[case(1003, b'G', "SNV(A>G|Lys>Glu)")]
    #[case(1008, b'A', "STOPGAIN(G>A)")]
    #[case(1011, b'G', "STOPGAIN(C>G)")]
    #[case(1013, b'T', "STARTGAIN(C>T)")]
    #[case(1015, b'C', "STOPLOSS(T>C)")]
    #[case(1018, b'A', "SNV(C>A)")]
    #[case(1030, b'A', "SNV(N>A)")]
    fn test_substitutions_forward(
        forward: TranscriptContext,
        #[case] position: u64,
        #[case] alt: u8,
        #[case] expected: &str,
    ) {
        assert_eq!(classify_snv(&forward, position, alt), expected);
    }

    #[rstest]
    fn test_substitution_reverse_strand() {
        // reverse complement of ATGAAATGGTAC, transcribed from 1011 down to 1000
        let reference = ReferenceSlice::new(1000, b"GTACCATTTCAT");
        let context = TranscriptContext::new(
            ExonModel::new(vec![Exon::new(1011, 999)]),
            Some(&reference),
            9,
        );

        // second base of ATG sits at 1010 (A on the forward strand)
        let start_loss = context.classify(&EditEvent::substitution(1010, b'A', b'T'));
        assert_eq!(start_loss.to_string(), "STARTLOSS(A>T)");

        // last base of TGG sits at 1003 (C on the forward strand); TGG -> TGA
        let stop_gain = context.classify(&EditEvent::substitution(1003, b'C', b'T'));
        assert_eq!(stop_gain.to_string(), "STOPGAIN(C>T)");
    }

    #[rstest]
    #[case(1003, b'A', b'T', "STOPGAIN(A>T)")]
    #[case(1010, b'A', b'G', "SNV(A>G|Lys>Arg)")]
    #[case(1011, b'A', b'G', "SYN(A>G)")]
    fn test_substitution_codon_across_exon_junction(
        #[case] position: u64,
        #[case] ref_base: u8,
        #[case] alt: u8,
        #[case] expected: &str,
    ) {
        // ATGA | intron | AATGG spliced into ATG AAA TGG
        let reference = ReferenceSlice::new(1000, b"ATGACCCCCCAATGG");
        let context = TranscriptContext::new(
            ExonModel::new(vec![Exon::new(1000, 1004), Exon::new(1010, 1015)]),
            Some(&reference),
            9,
        );
        let event = EditEvent::substitution(position, ref_base, alt);
        assert_eq!(context.classify(&event).to_string(), expected);
    }

    #[rstest]
    #[case(1003, b'T', b'G', "SNV(T>G|Lys>Asn)")]
    #[case(1010, b'T', b'A', "SNV(T>A|Lys>Ile)")]
    #[case(1001, b'C', b'T', "STOPGAIN(C>T)")]
    fn test_substitution_reverse_strand_across_exon_junction(
        #[case] position: u64,
        #[case] ref_base: u8,
        #[case] alt: u8,
        #[case] expected: &str,
    ) {
        // exons 1014..=1010 then 1003..=1000, transcribed as ATGAA | ATGG
        let reference = ReferenceSlice::new(1000, b"CCATGGGGGGTTCAT");
        let context = TranscriptContext::new(
            ExonModel::new(vec![Exon::new(1003, 999), Exon::new(1014, 1009)]),
            Some(&reference),
            9,
        );
        let event = EditEvent::substitution(position, ref_base, alt);
        assert_eq!(context.classify(&event).to_string(), expected);
    }

    #[rstest]
    fn test_unresolvable_reference_codon() {
        let context =
            TranscriptContext::new(ExonModel::new(vec![Exon::new(1000, 1012)]), None, 9);
        let consequence = context.classify(&EditEvent::substitution(1001, b'T', b'A'));
        assert_eq!(consequence.to_string(), "NOREF(T>A)");
        assert!(!consequence.is_damaging());
    }

    #[rstest]
    #[case(EditEvent::deletion(1103, 3), 9, "INFRAME")]
    #[case(EditEvent::deletion(1103, 3), 4, "INFRAME")]
    #[case(EditEvent::deletion(1103, 3), -1, "INFRAME")]
    #[case(EditEvent::deletion(1103, 3), 3, "INFRAMEDISRUPTION")]
    #[case(EditEvent::deletion(1104, 3), 9, "FRAMESHIFT")]
    #[case(EditEvent::insertion(1003, 1), 9, "FRAMESHIFT")]
    #[case(EditEvent::insertion(1003, 12), 9, "INFRAMEDISRUPTION")]
    #[case(EditEvent::deletion(1050, 2), 9, "INTRON")]
    fn test_indels(
        #[case] event: EditEvent,
        #[case] max_inframe_length: i64,
        #[case] expected: &str,
    ) {
        let context = indel_context(max_inframe_length);
        assert_eq!(context.classify(&event).to_string(), expected);
    }

    #[rstest]
    fn test_indel_reverse_strand() {
        let context = TranscriptContext::new(
            ExonModel::new(vec![Exon::new(1012, 1000), Exon::new(1112, 1100)]),
            None,
            9,
        );
        // transcription enters the hit exon at 1112: 1112 - 1109 = 3 bases before
        assert_eq!(
            context.classify(&EditEvent::deletion(1106, 3)).to_string(),
            "INFRAME"
        );
        // 12 bases of the exon transcribed first plus 1012 - 1008 = 4
        assert_eq!(
            context.classify(&EditEvent::deletion(1005, 3)).to_string(),
            "FRAMESHIFT"
        );
    }

    #[rstest]
    fn test_wildtype_and_unannotated() {
        let context = TranscriptContext::new(ExonModel::empty(), None, 9);
        assert_eq!(
            context.classify(&EditEvent::wildtype(1000, 1100)),
            Consequence::Wildtype
        );
        assert_eq!(
            context.classify(&EditEvent::deletion(1010, 2)),
            Consequence::Unannotated
        );
    }

    #[rstest]
    fn test_classification_is_idempotent(forward: TranscriptContext) {
        let event = EditEvent::substitution(1008, b'G', b'A');
        assert_eq!(forward.classify(&event), forward.classify(&event));
    }
}
