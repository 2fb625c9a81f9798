//! Parsing helpers for coordinates given as text (`chr1:1,000-2,000`).

use crate::errors::{ConfigError, ConfigResult};
use crate::models::{Exon, TargetWindow};

fn parse_coordinate(value: &str) -> Option<u64> {
    value.trim().replace(',', "").parse::<u64>().ok()
}

fn parse_span(span: &str) -> Option<(u64, u64)> {
    let (from, to) = span.split_once('-')?;
    Some((parse_coordinate(from)?, parse_coordinate(to)?))
}

///
/// Parse a `chr:start-stop` window.
///
/// Thousands separators are ignored and a descending range is flipped.
///
pub fn parse_region(region: &str) -> ConfigResult<TargetWindow> {
    let (chr, span) = region
        .trim()
        .split_once(':')
        .ok_or_else(|| ConfigError::InvalidRegion(region.to_string()))?;

    let (start, stop) =
        parse_span(span).ok_or_else(|| ConfigError::InvalidRegion(region.to_string()))?;

    if chr.is_empty() {
        return Err(ConfigError::InvalidRegion(region.to_string()));
    }

    Ok(TargetWindow::new(chr, start, stop))
}

///
/// Parse exon coordinates given as `chr:from-to` or `from-to`.
///
/// The orientation of each pair is kept (`from > to` marks the reverse
/// strand). Duplicates are dropped and the exons are sorted by their first
/// coordinate. An exon naming a chromosome other than `chr` is rejected.
///
pub fn parse_exons<S: AsRef<str>>(exons: &[S], chr: &str) -> ConfigResult<Vec<Exon>> {
    let mut parsed: Vec<Exon> = Vec::with_capacity(exons.len());

    for raw in exons {
        let raw = raw.as_ref().trim();
        let span = match raw.split_once(':') {
            Some((exon_chr, span)) => {
                if exon_chr != chr {
                    return Err(ConfigError::ExonChromosomeMismatch {
                        exon: raw.to_string(),
                        target: chr.to_string(),
                    });
                }
                span
            }
            None => raw,
        };

        let (from, to) =
            parse_span(span).ok_or_else(|| ConfigError::InvalidExon(raw.to_string()))?;
        let exon = Exon::new(from, to);
        if !parsed.contains(&exon) {
            parsed.push(exon);
        }
    }

    parsed.sort_by_key(|exon| exon.from);
    Ok(parsed)
}

/// Parse a single position given as `chr:pos` or `pos`.
pub fn parse_position(position: &str, chr: &str) -> ConfigResult<u64> {
    let raw = position.trim();
    let value = match raw.split_once(':') {
        Some((pos_chr, value)) => {
            if pos_chr != chr {
                return Err(ConfigError::InvalidTranslationStart(raw.to_string()));
            }
            value
        }
        None => raw,
    };
    parse_coordinate(value).ok_or_else(|| ConfigError::InvalidTranslationStart(raw.to_string()))
}
