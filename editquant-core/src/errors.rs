use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No target window given. Expected chr:start-stop")]
    MissingTarget,

    #[error("Can't parse target window: {0}")]
    InvalidRegion(String),

    #[error("Can't parse exon coordinates: {0}")]
    InvalidExon(String),

    #[error("Exon {exon} and target window are not on the same chromosome ({target})")]
    ExonChromosomeMismatch { exon: String, target: String },

    #[error("Can't parse translation start: {0}")]
    InvalidTranslationStart(String),

    #[error("Unknown event kind: {0}. Expected one of D, I, M, WT")]
    InvalidEventKind(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
