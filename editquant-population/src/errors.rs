use thiserror::Error;

#[derive(Error, Debug)]
pub enum PopulationError {
    #[error("All motifs of a population must share one chromosome: expected {expected}, found {found}")]
    ChromosomeMismatch { expected: String, found: String },

    #[error("Populations describe different analyses: {0}")]
    IncompatibleModel(String),
}

pub type PopulationResult<T> = std::result::Result<T, PopulationError>;
