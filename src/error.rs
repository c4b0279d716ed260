use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("format error: {0}")]
    Format(String),

    #[error("resource not found: {}", .0.display())]
    MissingResource(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Guide/target pairs must be compared position by position.
pub(crate) fn ensure_same_len(guide: &[u8], target: &[u8]) -> Result<()> {
    if guide.len() != target.len() {
        return Err(Error::InvalidInput(format!(
            "guide length {} does not match target length {}",
            guide.len(),
            target.len()
        )));
    }
    Ok(())
}
