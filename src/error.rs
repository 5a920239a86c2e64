use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("unsupported duration {0}s (expected one of 15, 30, 60)")]
    InvalidDuration(u64),

    #[error("sample text catalog is unusable: {0}")]
    SampleTexts(String),
}

pub type Result<T> = std::result::Result<T, Error>;
