//! Export engine port
//!
//! The engine turns one Org document into Markdown. orgpress never looks
//! inside it; it only decides where the engine must publish.

pub mod elisp;
pub mod emacs;

use std::path::Path;

use thiserror::Error;

use crate::publish::PublishTarget;

pub use emacs::EmacsEngine;

/// One export invocation
#[derive(Debug, Clone, Copy)]
pub struct ExportJob<'a> {
    /// Document to export
    pub source_doc: &'a Path,
    /// Where the engine must publish
    pub target: &'a PublishTarget,
}

/// What a successful export left behind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOutcome {
    /// Diagnostic output of the engine (Emacs batch mode prints to stderr)
    pub log: String,
}

/// Export engine failures
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine could not be started at all
    #[error("failed to start export engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A link target inside the document could not be resolved
    #[error("unable to resolve link: {detail}")]
    UnresolvedLink { detail: String },

    /// Any other non-zero exit
    #[error("export engine exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// Abstract export engine
///
/// Implementations:
/// - `EmacsEngine` - Emacs in batch mode running ox-hugo
pub trait ExportEngine: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Export one document, honouring `job.target`
    fn export(&self, job: &ExportJob<'_>) -> Result<ExportOutcome, EngineError>;
}

impl<E: ExportEngine + ?Sized> ExportEngine for &E {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn export(&self, job: &ExportJob<'_>) -> Result<ExportOutcome, EngineError> {
        (**self).export(job)
    }
}
