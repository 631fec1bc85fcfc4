use thiserror::Error;

pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a root node or an array of nodes, found {found}")]
    UnexpectedShape { found: String },
}

impl DocumentError {
    pub fn unexpected_shape(found: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            found: found.into(),
        }
    }
}
