//! Reading alignment records from an indexed BAM file.

use std::path::Path;

use noodles::bam;
use noodles::core::Region;

use editquant_core::models::{ReferenceSlice, TargetWindow};
use editquant_motifs::alignment::{AlignmentOp, AlignmentOpKind};
use editquant_population::MotifPopulation;

use crate::errors::{ParserError, ParserResult};
use crate::parser::Parser;
use crate::record::AlignmentRecord;

/// BAM records without a mapping quality are treated as unfiltered.
const MISSING_MAPPING_QUALITY: u8 = 255;

fn malformed(record: &bam::Record, error: std::io::Error) -> ParserError {
    let name = record.name().map(|n| n.to_string()).unwrap_or_default();
    ParserError::MalformedRecord(format!("{}: {}", name, error))
}

impl TryFrom<&bam::Record> for AlignmentRecord {
    type Error = ParserError;

    fn try_from(record: &bam::Record) -> ParserResult<Self> {
        let name = record.name().map(|n| n.to_string()).unwrap_or_default();
        let start = record
            .alignment_start()
            .transpose()
            .map_err(|e| malformed(record, e))?
            .map(|position| position.get() as u64)
            .unwrap_or(0);

        let mut ops = Vec::new();
        for op in record.cigar().iter() {
            let op = op.map_err(|e| malformed(record, e))?;
            if let Some(kind) = AlignmentOpKind::from_sam(op.kind()) {
                ops.push(AlignmentOp::new(kind, op.len() as u64));
            }
        }

        let flags = record.flags();

        Ok(AlignmentRecord {
            name,
            start,
            ops,
            reverse: flags.is_reverse_complemented(),
            paired: flags.is_segmented(),
            mapped: !flags.is_unmapped(),
            mate_unmapped: flags.is_mate_unmapped(),
            first_in_pair: flags.is_first_segment(),
            mapping_quality: record
                .mapping_quality()
                .map(|q| q.get())
                .unwrap_or(MISSING_MAPPING_QUALITY),
            sequence: record.sequence().iter().collect(),
            qualities: record.quality_scores().as_ref().to_vec(),
        })
    }
}

/// The query region of a window; BAM positions start at 1.
pub fn window_region(window: &TargetWindow) -> ParserResult<Region> {
    let region = format!("{}:{}-{}", window.chr, window.start.max(1), window.stop);
    region
        .parse()
        .map_err(|_| ParserError::InvalidRegion(region.clone()))
}

///
/// Query the parser's target window in an indexed BAM file and process every
/// record it returns.
///
/// Records that fail to decode are counted as malformed. A read error ends
/// the query early and the population collected so far is returned with the
/// run marked as truncated.
///
pub fn process_bam(
    parser: &mut Parser,
    path: &Path,
    reference: Option<&ReferenceSlice>,
) -> ParserResult<MotifPopulation> {
    let region = window_region(&parser.config().window)?;

    let mut reader = bam::io::indexed_reader::Builder::default().build_from_path(path)?;
    let header = reader.read_header()?;
    let query = reader.query(&header, &region)?;

    let records = query.map(|result| {
        result
            .map_err(ParserError::from)
            .and_then(|record| AlignmentRecord::try_from(&record))
    });

    parser.process(records, reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_window_region() {
        let region = window_region(&TargetWindow::new("chr3", 0, 500)).unwrap();
        assert_eq!(region.to_string(), "chr3:1-500");
    }
}
