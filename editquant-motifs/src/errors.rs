use thiserror::Error;

#[derive(Error, Debug)]
pub enum MotifError {
    #[error("Cannot build a consensus from {0} reads. Expected one read or a pair")]
    InvalidReadCount(usize),

    #[error("Can't parse CIGAR string: {0}")]
    InvalidCigar(String),
}

pub type MotifResult<T> = std::result::Result<T, MotifError>;
