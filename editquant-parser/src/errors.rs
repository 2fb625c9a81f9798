use thiserror::Error;

use editquant_core::ConfigError;
use editquant_motifs::MotifError;
use editquant_population::PopulationError;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Motif(#[from] MotifError),

    #[error(transparent)]
    Population(#[from] PopulationError),

    #[error("Reference sequence not found for {0}")]
    MissingReference(String),

    #[error("Malformed alignment record {0}")]
    MalformedRecord(String),

    #[error("Can't query region {0}")]
    InvalidRegion(String),

    #[error("Error reading reference file: {0}")]
    Fasta(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ParserResult<T> = std::result::Result<T, ParserError>;
