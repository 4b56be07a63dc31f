//! Error types
//!
//! A single error enum for the whole crate. Per-item failures inside the
//! projectors (a malformed fragment, a detection below threshold) are handled
//! locally and never reach the caller.

use thiserror::Error;

/// Errors surfaced at the crate's call boundaries
#[derive(Debug, Error)]
pub enum ProofError {
    /// Caller supplied an argument outside its valid domain
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A word sequence exceeded the configured alignment bound
    #[error("Input too large: {words} words exceeds limit of {limit}")]
    InputTooLarge { words: usize, limit: usize },

    /// Image highlighting was requested without recognition geometry
    #[error("Detections are required to highlight an image")]
    MissingDetections,

    /// A replacement fragment could not be spliced into the tree
    #[error("Malformed fragment: {0}")]
    MalformedFragment(String),

    /// A node id does not belong to the tree
    #[error("Node not found: {0}")]
    NodeNotFound(usize),

    /// Markup could not be parsed into a document tree
    #[error("Markup error: {0}")]
    Markup(String),

    /// The recognition collaborator failed
    #[error("Recognition error: {0}")]
    Recognition(String),

    /// The correction model collaborator failed
    #[error("Model error: {0}")]
    Model(String),

    /// Rendering or encoding the highlighted image failed
    #[error("Image error: {0}")]
    Image(String),

    /// Report serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for proofmark operations
pub type Result<T> = std::result::Result<T, ProofError>;

impl From<quick_xml::Error> for ProofError {
    fn from(err: quick_xml::Error) -> Self {
        ProofError::Markup(err.to_string())
    }
}

impl From<image::ImageError> for ProofError {
    fn from(err: image::ImageError) -> Self {
        ProofError::Image(err.to_string())
    }
}
