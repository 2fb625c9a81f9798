use clap::{Arg, ArgAction, Command, arg};

pub const QUANTIFY_CMD: &str = "quantify";

pub fn create_quantify_cli() -> Command {
    Command::new(QUANTIFY_CMD)
        .about("Reconstruct edit motifs from aligned read pairs and report population statistics.")
        .arg(
            arg!(--bam <BAM>)
                .required(true)
                .help("Path to an indexed BAM file"),
        )
        .arg(
            arg!(--reference <FASTA>)
                .required(false)
                .help("Reference FASTA (required with --snvs)"),
        )
        .arg(
            arg!(--config <TOML>)
                .required(false)
                .help("Analysis configuration file. Flags override its values"),
        )
        .arg(
            arg!(--target <REGION>)
                .required(false)
                .help("Target window, chr:start-stop"),
        )
        .arg(
            Arg::new("exon")
                .long("exon")
                .action(ArgAction::Append)
                .help("Exon coordinates, [chr:]from-to; from > to on the reverse strand. Repeatable"),
        )
        .arg(
            arg!(--tail <BASES>)
                .required(false)
                .help("Bases added to both sides of the target window"),
        )
        .arg(
            Arg::new("translation-start")
                .long("translation-start")
                .required(false)
                .help("Override the translation start, [chr:]pos"),
        )
        .arg(
            Arg::new("min-mapping-quality")
                .long("min-mapping-quality")
                .required(false)
                .help("Minimum mapping quality of a read"),
        )
        .arg(
            Arg::new("min-base-quality")
                .long("min-base-quality")
                .required(false)
                .help("Minimum base quality of a substitution"),
        )
        .arg(
            Arg::new("min-read-length")
                .long("min-read-length")
                .required(false)
                .help("Minimum aligned length of every read of a pair"),
        )
        .arg(
            Arg::new("min-overlap")
                .long("min-overlap")
                .required(false)
                .allow_negative_numbers(true)
                .help("Minimum mate overlap; negative values tolerate a gap"),
        )
        .arg(
            Arg::new("min-motif-count")
                .long("min-motif-count")
                .required(false)
                .help("Drop motifs observed fewer times"),
        )
        .arg(
            Arg::new("max-inframe-length")
                .long("max-inframe-length")
                .required(false)
                .allow_negative_numbers(true)
                .help("In-frame indels at least this long are disruptive; negative for no bound"),
        )
        .arg(
            Arg::new("single-end")
                .long("single-end")
                .action(ArgAction::SetTrue)
                .help("Treat every read on its own instead of in pairs"),
        )
        .arg(
            Arg::new("mate-support")
                .long("mate-support")
                .action(ArgAction::SetTrue)
                .help("Keep only events seen by every read of a pair"),
        )
        .arg(arg!(--snvs "Detect substitutions against the reference"))
        .arg(arg!(--coverage "Accumulate per-base coverage of every motif"))
        .arg(
            arg!(--skip <RECORDS>)
                .required(false)
                .help("Skip this many records at the start of the file"),
        )
        .arg(
            Arg::new("stop-after")
                .long("stop-after")
                .required(false)
                .help("Stop after this many processed pairs"),
        )
        .arg(
            Arg::new("read-name")
                .long("read-name")
                .action(ArgAction::Append)
                .help("Only process reads with this name. Repeatable"),
        )
        .arg(
            arg!(--top <N>)
                .required(false)
                .help("Number of motifs reported (default: all)"),
        )
        .arg(
            arg!(--kinds <KINDS>)
                .required(false)
                .help("Comma-separated event kinds a reported motif must carry: D, I, M, WT (default: all)"),
        )
        .arg(
            Arg::new("purity-top")
                .long("purity-top")
                .required(false)
                .default_value("2")
                .help("Number of motifs the purity index is computed over"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output JSON path (default: stdout)"),
        )
        .arg(
            arg!(--motifs <TSV>)
                .required(false)
                .help("Also write the ranked motif table as TSV"),
        )
}
