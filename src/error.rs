//! Error taxonomy for document generation.
//!
//! Only structural and configuration problems are errors. Candidates that no
//! controller serves, and model elements that cannot be described (an entity
//! set without a key, an operation bound to a primitive), are dropped with a
//! log line instead of failing the request.

use http::Method;
use thiserror::Error;

/// Errors surfaced by [`crate::generator::DocumentGenerator::get_document`]
/// and the stages it drives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested API version has no registered `info` block.
    #[error("unknown API version '{0}'")]
    UnknownApiVersion(String),

    /// An operation uses a verb Swagger 2.0 has no slot for.
    #[error("unsupported HTTP method {method} on '{path}'")]
    UnsupportedHttpMethod {
        /// Offending verb
        method: Method,
        /// Path template the operation was registered under
        path: String,
    },

    /// More than one operation maps to the same method and path and no
    /// resolver was configured.
    #[error(
        "conflicting operations for {method} '{path}'; configure a conflicting-actions resolver"
    )]
    ConflictingOperations {
        /// Shared verb
        method: Method,
        /// Shared path template
        path: String,
    },

    /// The conventional source produced no document for a known version.
    #[error("no conventional document available for API version '{0}'")]
    MissingBaseDocument(String),

    /// The root URL the document is generated for does not parse.
    #[error("invalid root URL '{0}'")]
    InvalidRootUrl(String),

    /// An OData path template could not be parsed against the model.
    #[error("invalid OData path '{path}': {reason}")]
    InvalidPath {
        /// Template that failed to parse
        path: String,
        /// What went wrong
        reason: String,
    },
}

/// Result alias used across the generation pipeline.
pub type Result<T> = std::result::Result<T, Error>;
