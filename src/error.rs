//! Error types for orgpress
//!
//! Library code returns `OrgpressResult`; the binary wraps it in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::engine::EngineError;

/// Result type alias for orgpress operations
pub type OrgpressResult<T> = Result<T, OrgpressError>;

/// Main error type for orgpress operations
#[derive(Error, Debug)]
pub enum OrgpressError {
    /// Source document missing or unreadable
    #[error("cannot load document {path}: {source}")]
    DocumentLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Requested output does not live under the site's content root
    #[error("output '{output}' is not under content root '{content_root}'")]
    OutsideContentRoot {
        output: PathBuf,
        content_root: PathBuf,
    },

    /// Output directory has no `content` component to anchor the Hugo site
    #[error("'{path}' must contain a 'content' path component, e.g. hugo-site/content/posts")]
    NotAContentDir { path: PathBuf },

    /// Document relies on the engine default but declares no base directory
    #[error("{document} has no #+HUGO_BASE_DIR and no publish override was given")]
    MissingBaseDir { document: PathBuf },

    /// Export engine failure, propagated unchanged
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Another build holds the output directory lock
    #[error("another build is already writing to {path}")]
    BuildLocked { path: PathBuf },

    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Post-process command failed for an output file
    #[error("post-process '{program}' failed on {output}: {message}")]
    PostProcess {
        program: String,
        output: PathBuf,
        message: String,
    },

    /// Configuration file could not be parsed
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Source tree walk failed
    #[error("cannot walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
