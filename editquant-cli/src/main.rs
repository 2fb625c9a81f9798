mod quantify;

use anyhow::Result;
use clap::{Command, arg};
use log::Level;
use simple_logger::init_with_level;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "editquant";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Quantify CRISPR edit outcomes: reconstruct edit motifs from aligned reads, classify their consequences and measure the diversity of the edited population.")
        .subcommand_required(true)
        .arg(arg!(-v --verbose "Print debug messages").global(true))
        .subcommand(quantify::cli::create_quantify_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    let level = if matches.get_flag("verbose") {
        Level::Debug
    } else {
        Level::Info
    };
    init_with_level(level)?;

    match matches.subcommand() {
        //
        // QUANTIFY
        //
        Some((quantify::cli::QUANTIFY_CMD, matches)) => {
            quantify::handlers::run_quantify(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
