use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use editquant_core::AnalysisConfig;
use editquant_core::models::EventKind;
use editquant_parser::bam::process_bam;
use editquant_parser::reference::load_reference;
use editquant_parser::{Parser, RunCounters};
use editquant_population::{MotifPopulationStatistics, PopulationSummary, RankedMotif};

#[derive(Serialize)]
struct QuantifyOutput {
    counters: RunCounters,
    summary: PopulationSummary,
    motifs: Vec<MotifRow>,
}

#[derive(Serialize)]
struct MotifRow {
    rank: usize,
    motif: String,
    count: u64,
    frequency: f64,
    cumulative_frequency: f64,
    cumulative_lof_frequency: f64,
    wildtype: bool,
    lof: bool,
}

impl From<&RankedMotif<'_>> for MotifRow {
    fn from(ranked: &RankedMotif<'_>) -> Self {
        MotifRow {
            rank: ranked.rank,
            motif: ranked.motif.to_string(),
            count: ranked.count,
            frequency: ranked.frequency,
            cumulative_frequency: ranked.cumulative_frequency,
            cumulative_lof_frequency: ranked.cumulative_lof_frequency,
            wildtype: ranked.motif.is_wildtype(),
            lof: ranked.motif.is_lof(),
        }
    }
}

fn parse_opt<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    matches
        .get_one::<String>(name)
        .map(|value| {
            value
                .parse::<T>()
                .with_context(|| format!("--{} got an invalid value: {}", name, value))
        })
        .transpose()
}

///
/// Apply the command line flags on top of a configuration. Only flags that
/// were given change the configuration.
///
pub fn apply_overrides(config: &mut AnalysisConfig, matches: &ArgMatches) -> Result<()> {
    if let Some(target) = matches.get_one::<String>("target") {
        config.target = target.clone();
    }
    if let Some(exons) = matches.get_many::<String>("exon") {
        config.exons = exons.cloned().collect();
    }
    if let Some(translation_start) = matches.get_one::<String>("translation-start") {
        config.translation_start = Some(translation_start.clone());
    }
    if let Some(names) = matches.get_many::<String>("read-name") {
        config.read_names = names.cloned().collect();
    }

    if let Some(v) = parse_opt(matches, "tail")? {
        config.tail = v;
    }
    if let Some(v) = parse_opt(matches, "min-mapping-quality")? {
        config.min_mapping_quality = v;
    }
    if let Some(v) = parse_opt(matches, "min-base-quality")? {
        config.min_base_quality = v;
    }
    if let Some(v) = parse_opt(matches, "min-read-length")? {
        config.min_read_length = v;
    }
    if let Some(v) = parse_opt(matches, "min-overlap")? {
        config.min_overlap = v;
    }
    if let Some(v) = parse_opt(matches, "min-motif-count")? {
        config.min_motif_count = v;
    }
    if let Some(v) = parse_opt(matches, "max-inframe-length")? {
        config.max_inframe_length = v;
    }
    if let Some(v) = parse_opt(matches, "skip")? {
        config.skip_records = v;
    }
    if let Some(v) = parse_opt(matches, "stop-after")? {
        config.stop_after_pairs = v;
    }

    if matches.get_flag("single-end") {
        config.paired = false;
    }
    if matches.get_flag("mate-support") {
        config.require_mate_support = true;
    }
    if matches.get_flag("snvs") {
        config.detect_substitutions = true;
    }
    if matches.get_flag("coverage") {
        config.coverage = true;
    }

    Ok(())
}

fn write_motif_table(path: &str, rows: &[MotifRow]) -> Result<()> {
    let file = File::create(Path::new(path))
        .with_context(|| format!("Failed to create motif table: {}", path))?;
    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "rank\tcount\tfrequency\tcumulative_frequency\tcumulative_lof_frequency\tlof\tmotif"
    )?;
    for row in rows {
        writeln!(
            writer,
            "{}\t{}\t{:.6}\t{:.6}\t{:.6}\t{}\t{}",
            row.rank,
            row.count,
            row.frequency,
            row.cumulative_frequency,
            row.cumulative_lof_frequency,
            row.lof,
            row.motif
        )?;
    }
    writer.flush()?;
    Ok(())
}

pub fn run_quantify(matches: &ArgMatches) -> Result<()> {
    let bam_path = matches
        .get_one::<String>("bam")
        .expect("--bam is required");
    let reference_path = matches.get_one::<String>("reference");
    let output_path = matches.get_one::<String>("output");
    let motifs_path = matches.get_one::<String>("motifs");
    let top: Option<usize> = parse_opt(matches, "top")?;
    let purity_top: i64 = parse_opt(matches, "purity-top")?.unwrap_or(2);
    let kinds: Vec<EventKind> = match matches.get_one::<String>("kinds") {
        Some(kinds) => kinds
            .split(',')
            .map(|kind| kind.trim().parse::<EventKind>())
            .collect::<Result<_, _>>()
            .context("Invalid --kinds")?,
        None => EventKind::ALL.to_vec(),
    };

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => AnalysisConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load configuration: {}", path))?,
        None => AnalysisConfig::default(),
    };
    apply_overrides(&mut config, matches)?;
    let resolved = config.validate().context("Invalid analysis configuration")?;

    if resolved.settings.detect_substitutions && reference_path.is_none() {
        bail!("--snvs requires --reference");
    }
    let reference = match reference_path {
        Some(path) => Some(
            load_reference(Path::new(path), &resolved.window)
                .with_context(|| format!("Failed to load reference from {}", path))?,
        ),
        None => None,
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("Invalid progress template")?,
    );

    log::info!("Processing {}", bam_path);
    let mut parser = Parser::new(resolved).with_progress(pb);
    let population = process_bam(&mut parser, Path::new(bam_path), reference.as_ref())
        .with_context(|| format!("Failed to process {}", bam_path))?;

    let counters = parser.counters().clone();
    counters.log_summary();

    let summary = PopulationSummary::compute(&population, counters.pairs, top, purity_top);
    let motifs: Vec<MotifRow> = population
        .top_motifs(top, &kinds)
        .iter()
        .map(MotifRow::from)
        .collect();

    if let Some(path) = motifs_path {
        write_motif_table(path, &motifs)?;
        log::info!("Motif table written to {}", path);
    }

    let output = QuantifyOutput {
        counters,
        summary,
        motifs,
    };
    let json =
        serde_json::to_string_pretty(&output).context("Failed to serialize output to JSON")?;

    match output_path {
        Some(p) => {
            let mut file = File::create(Path::new(p))
                .with_context(|| format!("Failed to create output file: {}", p))?;
            file.write_all(json.as_bytes())?;
            log::info!("Output written to {}", p);
        }
        None => {
            io::stdout().write_all(json.as_bytes())?;
            println!();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantify::cli::create_quantify_cli;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["quantify", "--bam", "reads.bam"];
        argv.extend_from_slice(args);
        create_quantify_cli().try_get_matches_from(argv).unwrap()
    }

    #[rstest]
    fn test_flags_override_config() {
        let mut config = AnalysisConfig {
            target: "chr1:1-100".to_string(),
            min_overlap: -25,
            ..Default::default()
        };
        let matches = matches(&[
            "--target",
            "chr2:500-900",
            "--exon",
            "chr2:500-600",
            "--exon",
            "chr2:700-800",
            "--min-overlap",
            "-5",
            "--max-inframe-length",
            "-1",
            "--single-end",
            "--snvs",
        ]);
        apply_overrides(&mut config, &matches).unwrap();

        assert_eq!(config.target, "chr2:500-900");
        assert_eq!(config.exons.len(), 2);
        assert_eq!(config.min_overlap, -5);
        assert_eq!(config.max_inframe_length, -1);
        assert!(!config.paired);
        assert!(config.detect_substitutions);
        // untouched values survive
        assert_eq!(config.min_base_quality, 30);
    }

    #[rstest]
    fn test_absent_flags_keep_config() {
        let mut config = AnalysisConfig {
            min_overlap: -25,
            coverage: true,
            ..Default::default()
        };
        apply_overrides(&mut config, &matches(&[])).unwrap();
        assert_eq!(config.min_overlap, -25);
        assert!(config.coverage);
        assert!(config.paired);
    }

    #[rstest]
    fn test_invalid_number() {
        let mut config = AnalysisConfig::default();
        let result = apply_overrides(&mut config, &matches(&["--tail", "many"]));
        assert!(result.is_err());
    }
}
