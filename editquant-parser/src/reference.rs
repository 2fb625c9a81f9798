use std::fs::File;
use std::path::Path;

use bio::io::fasta;

use editquant_core::models::{ReferenceSlice, TargetWindow};

use crate::errors::{ParserError, ParserResult};

///
/// Load the reference bases of `window` from a FASTA file.
///
/// Positions are 1-based; a window running past the end of its chromosome
/// is truncated. A missing chromosome or an empty slice is an error.
///
pub fn load_reference(path: &Path, window: &TargetWindow) -> ParserResult<ReferenceSlice> {
    let file = File::open(path)?;
    let reader = fasta::Reader::new(file);

    for record in reader.records() {
        let record = record.map_err(|e| ParserError::Fasta(e.to_string()))?;
        if record.id() != window.chr {
            continue;
        }

        let seq = record.seq();
        let start = window.start.max(1);
        let from = (start - 1) as usize;
        let to = (window.stop as usize).min(seq.len());
        if from >= to {
            return Err(ParserError::MissingReference(window.to_string()));
        }

        log::debug!("Loaded {} reference bases for {}", to - from, window);
        return Ok(ReferenceSlice::new(start, &seq[from..to]));
    }

    Err(ParserError::MissingReference(window.to_string()))
}
