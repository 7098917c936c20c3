use halo_core::HaloError;

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("embedding error ({provider}): {message}")]
    EmbeddingError { provider: String, message: String },

    #[error("vector store error ({backend}): {message}")]
    VectorStoreError { backend: String, message: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("file is empty: {0}")]
    EmptyFile(String),

    #[error("failed to load {filename}: {message}")]
    LoadError { filename: String, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RagError {
    /// Bad caller input rather than a failing dependency.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::UnsupportedFileType(_) | Self::EmptyFile(_))
    }
}

impl From<RagError> for HaloError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::Io(e) => HaloError::Io(e),
            e if e.is_validation() => HaloError::Validation(e.to_string()),
            e => HaloError::Retrieval(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RagError>;
