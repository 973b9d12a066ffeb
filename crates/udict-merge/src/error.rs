use thiserror::Error;
use udict_model::ModelError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("storage error: {0}")]
    Model(#[from] ModelError),
}

pub type MergeResult<T> = Result<T, MergeError>;
