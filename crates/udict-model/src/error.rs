use thiserror::Error;
use udict_wire::WireError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    #[error("field '{field}' is not valid UTF-8")]
    InvalidEncoding { field: &'static str },

    #[error("dictionary record missing required field '{field}'")]
    MissingRequiredField { field: &'static str },
}

pub type ModelResult<T> = Result<T, ModelError>;
