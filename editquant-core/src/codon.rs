//! The standard genetic code.
//!
//! Codons are looked up case-insensitively. Anything that is not three
//! unambiguous bases (`N`, gaps, truncated codons) has no translation.

use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
    Stop,
}

impl AminoAcid {
    pub fn is_stop(&self) -> bool {
        matches!(self, AminoAcid::Stop)
    }

    /// Methionine doubles as the translation start.
    pub fn is_start(&self) -> bool {
        matches!(self, AminoAcid::Met)
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            AminoAcid::Ala => "Ala",
            AminoAcid::Arg => "Arg",
            AminoAcid::Asn => "Asn",
            AminoAcid::Asp => "Asp",
            AminoAcid::Cys => "Cys",
            AminoAcid::Gln => "Gln",
            AminoAcid::Glu => "Glu",
            AminoAcid::Gly => "Gly",
            AminoAcid::His => "His",
            AminoAcid::Ile => "Ile",
            AminoAcid::Leu => "Leu",
            AminoAcid::Lys => "Lys",
            AminoAcid::Met => "Met",
            AminoAcid::Phe => "Phe",
            AminoAcid::Pro => "Pro",
            AminoAcid::Ser => "Ser",
            AminoAcid::Thr => "Thr",
            AminoAcid::Trp => "Trp",
            AminoAcid::Tyr => "Tyr",
            AminoAcid::Val => "Val",
            AminoAcid::Stop => "Stop",
        }
    }
}

impl Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

///
/// Translate one codon.
///
/// Returns `None` for anything that is not exactly three of `A`, `C`, `G`, `T`.
///
pub fn translate(codon: &[u8]) -> Option<AminoAcid> {
    if codon.len() != 3 {
        return None;
    }
    let normalized = [
        codon[0].to_ascii_uppercase(),
        codon[1].to_ascii_uppercase(),
        codon[2].to_ascii_uppercase(),
    ];

    use AminoAcid::*;
    let amino_acid = match &normalized {
        b"TTT" | b"TTC" => Phe,
        b"TTA" | b"TTG" | b"CTT" | b"CTC" | b"CTA" | b"CTG" => Leu,
        b"TCT" | b"TCC" | b"TCA" | b"TCG" | b"AGT" | b"AGC" => Ser,
        b"TAT" | b"TAC" => Tyr,
        b"TAA" | b"TAG" | b"TGA" => Stop,
        b"TGT" | b"TGC" => Cys,
        b"TGG" => Trp,
        b"CCT" | b"CCC" | b"CCA" | b"CCG" => Pro,
        b"CAT" | b"CAC" => His,
        b"CAA" | b"CAG" => Gln,
        b"CGT" | b"CGC" | b"CGA" | b"CGG" | b"AGA" | b"AGG" => Arg,
        b"ATT" | b"ATC" | b"ATA" => Ile,
        b"ATG" => Met,
        b"ACT" | b"ACC" | b"ACA" | b"ACG" => Thr,
        b"AAT" | b"AAC" => Asn,
        b"AAA" | b"AAG" => Lys,
        b"GTT" | b"GTC" | b"GTA" | b"GTG" => Val,
        b"GCT" | b"GCC" | b"GCA" | b"GCG" => Ala,
        b"GAT" | b"GAC" => Asp,
        b"GAA" | b"GAG" => Glu,
        b"GGT" | b"GGC" | b"GGA" | b"GGG" => Gly,
        _ => return None,
    };

    Some(amino_acid)
}

/// Watson-Crick complement. Unknown bases complement to `N`.
pub fn complement(base: u8) -> u8 {
    match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        _ => b'N',
    }
}
