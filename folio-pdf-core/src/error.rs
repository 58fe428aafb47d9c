use thiserror::Error;

/// Boxed error returned by collaborators (font subsetter, image decoder,
/// foreign PDF importer).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid PDF structure: {0}")]
    InvalidStructure(String),

    #[error("Document has no pages")]
    NoPages,

    #[error("Object {0} saved twice with different contents")]
    DuplicateObject(u32),

    #[error("Font error: {0}")]
    FontError(String),

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("Page {page} not found in {filename}")]
    PageNotFound { filename: String, page: u32 },

    #[error("Page {page} of {filename} has no MediaBox")]
    MissingMediaBox { filename: String, page: u32 },

    #[error("Unknown page box: {0}")]
    UnknownBox(String),

    #[error("{operation} failed for {subject}: {source}")]
    Collaborator {
        operation: &'static str,
        subject: String,
        #[source]
        source: BoxError,
    },
}

impl PdfError {
    pub(crate) fn collaborator(
        operation: &'static str,
        subject: impl Into<String>,
        source: BoxError,
    ) -> Self {
        PdfError::Collaborator {
            operation,
            subject: subject.into(),
            source,
        }
    }

    /// Unwraps a boxed error that already is a `PdfError` (as returned by the
    /// built-in decoders), otherwise wraps it as a collaborator failure.
    pub(crate) fn from_boxed(
        operation: &'static str,
        subject: impl Into<String>,
        source: BoxError,
    ) -> Self {
        match source.downcast::<PdfError>() {
            Ok(err) => *err,
            Err(source) => PdfError::collaborator(operation, subject, source),
        }
    }
}

pub type Result<T> = std::result::Result<T, PdfError>;
