//! orgpress - publish Org-mode notes into a Hugo site
//!
//! orgpress drives an external export engine (Emacs with ox-hugo) one
//! document at a time and forces each result into the Hugo section the
//! caller asks for, regardless of the document's own export directives.

pub mod build;
pub mod config;
pub mod directives;
pub mod engine;
pub mod error;
pub mod fs;
pub mod paths;
pub mod publish;

// Re-exports for convenience
pub use build::{BuildOptions, BuildPlan, BuildReport, ExecuteOptions, PreparedBuild};
pub use config::{Config, EngineConfig};
pub use directives::DocumentDirectives;
pub use engine::{EmacsEngine, EngineError, ExportEngine, ExportJob, ExportOutcome};
pub use error::{OrgpressError, OrgpressResult};
pub use paths::{ExportRequest, ResolvedPaths, SiteLayout};
pub use publish::{PublishOverride, PublishReport, PublishTarget, Publisher};
