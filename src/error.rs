//! Errors surfaced at the crate boundary.
//!
//! Data-shape problems inside a dataset (missing names, unknown references)
//! are recovered locally and never show up here. Only inputs that make the
//! whole request meaningless (a broken schema, malformed JSON) become errors.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid chart config: {message}")]
    Config { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema field for {role} must not be empty")]
    EmptyField { role: &'static str },

    #[error("Reference field '{field}' is already used as the {role} field")]
    ReferenceOverlapsRole { field: String, role: &'static str },

    #[error("Reference field '{field}' is listed more than once")]
    DuplicateReference { field: String },
}
