use editquant_core::AnalysisConfig;
use editquant_core::models::{EventKind, ReferenceSlice};
use editquant_motifs::alignment::parse_cigar;
use editquant_parser::{AlignmentRecord, Parser, RunCounters};
use editquant_population::{MotifPopulation, MotifPopulationStatistics, PopulationSummary};

use pretty_assertions::assert_eq;
use rstest::*;

fn pair(name: &str, first: (u64, &str), second: (u64, &str)) -> Vec<AlignmentRecord> {
    vec![
        AlignmentRecord::new(name, first.0, parse_cigar(first.1).unwrap()),
        AlignmentRecord::new(name, second.0, parse_cigar(second.1).unwrap()).second_in_pair(),
    ]
}

#[fixture]
fn config() -> AnalysisConfig {
    AnalysisConfig {
        target: "chr11:5,000-5,400".to_string(),
        exons: vec!["chr11:5000-5400".to_string()],
        ..Default::default()
    }
}

fn run(
    config: AnalysisConfig,
    records: Vec<AlignmentRecord>,
    reference: Option<&ReferenceSlice>,
) -> (MotifPopulation, RunCounters) {
    let mut parser = Parser::new(config.validate().unwrap());
    let population = parser
        .process(records.into_iter().map(Ok), reference)
        .unwrap();
    (population, parser.counters().clone())
}

#[rstest]
fn test_wildtype_majority_with_one_frameshift(config: AnalysisConfig) {
    let mut records = Vec::new();
    for i in 0..100 {
        records.extend(pair(&format!("wt{}", i), (5100, "60M"), (5140, "60M")));
    }
    records.extend(pair("del", (5100, "30M2D30M"), (5110, "20M2D40M")));

    let (population, counters) = run(config, records, None);

    assert_eq!(counters.pairs, 101);
    assert_eq!(counters.wt, 100);
    assert_eq!(counters.motif, 1);
    assert!(counters.is_reconciled(2));

    assert_eq!(population.num_distinct(&EventKind::ALL, None), 2);
    assert_eq!(population.purity_index(2), 1.0);

    let ranking = population.top_motifs(None, &EventKind::INDELS);
    assert_eq!(ranking.len(), 1);
    assert!(ranking[0].motif.is_lof());
    assert_eq!(ranking[0].motif.to_string(), "D_2bp:5130-5132[FRAMESHIFT]");

    let summary = PopulationSummary::compute(&population, counters.pairs, None, 2);
    assert_eq!(summary.distinct_motifs, 2);
    assert_eq!(summary.distinct_lof_motifs, 1);
}

#[rstest]
fn test_mate_support_filters_private_events(mut config: AnalysisConfig) {
    config.require_mate_support = true;
    let records = pair("a", (5100, "10M1I49M"), (5140, "60M"));
    let (population, counters) = run(config, records, None);

    // the insertion is seen by one mate only and the pair carries nothing else
    assert_eq!(counters.pairs, 0);
    assert_eq!(counters.no_overlap, 2);
    assert!(population.is_empty());
}

#[rstest]
fn test_substitution_pipeline(mut config: AnalysisConfig) {
    config.detect_substitutions = true;

    // ATG AAA TGG ... starting at the exon start
    let mut bases = b"ATGAAATGG".to_vec();
    bases.resize(401, b'C');
    let reference = ReferenceSlice::new(5000, &bases);

    // a read over 5000..5009 carrying A>G at 5003 (AAA -> GAA)
    let read = AlignmentRecord::new("s", 5000, parse_cigar("9M").unwrap())
        .with_bases(b"ATGGAATGG", &[40; 9]);
    let mate = AlignmentRecord::new("s", 5000, parse_cigar("9M").unwrap())
        .second_in_pair()
        .with_bases(b"ATGGAATGG", &[40; 9]);

    let (population, counters) = run(config, vec![read, mate], Some(&reference));
    assert_eq!(counters.motif, 1);

    let (motif, count) = population.iter().next().unwrap();
    assert_eq!(count, 1);
    assert_eq!(motif.to_string(), "M_0bp:5003-5003[SNV(A>G|Lys>Glu)]");
    assert!(motif.is_lof());
}
