//! Publish a single document at a caller-chosen location
//!
//! The engine normally decides its output directory from in-document
//! directives (`#+HUGO_BASE_DIR`, `#+HUGO_SECTION`, `#+HUGO_BUNDLE`). A
//! publish call replaces that decision with a [`PublishOverride`] carried
//! inside the [`ExportJob`], so the override exists only for that one export.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::directives::DocumentDirectives;
use crate::engine::{ExportEngine, ExportJob};
use crate::error::{OrgpressError, OrgpressResult};
use crate::paths::{expand_home, normalize, ExportRequest, ResolvedPaths, CONTENT_DIR};

/// Section ox-hugo falls back to when a document names none
pub const DEFAULT_SECTION: &str = "posts";

/// Forced publish location for one export. Bundle mode is always off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOverride {
    /// Site root reported to the engine as its base directory
    pub base_dir: PathBuf,
    /// Section reported to the engine (`"blog/"`)
    pub section: String,
    /// Directory the engine must return from its resolution step
    pub publish_dir: PathBuf,
}

impl PublishOverride {
    pub fn new(site_root: &Path, paths: &ResolvedPaths) -> Self {
        Self {
            base_dir: site_root.to_path_buf(),
            section: paths.section.clone(),
            publish_dir: paths.publish_dir.clone(),
        }
    }
}

/// How the engine picks its publish directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishTarget {
    /// Engine default: follow the document's own directives
    FromDocument,
    /// Caller decides; document directives are ignored
    Override(PublishOverride),
}

impl PublishTarget {
    /// The directory the engine will publish `document` into.
    pub fn resolve(
        &self,
        document: &Path,
        directives: &DocumentDirectives,
    ) -> OrgpressResult<PathBuf> {
        match self {
            PublishTarget::Override(over) => Ok(over.publish_dir.clone()),
            PublishTarget::FromDocument => {
                let base = directives
                    .base_dir
                    .as_deref()
                    .ok_or_else(|| OrgpressError::MissingBaseDir {
                        document: document.to_path_buf(),
                    })?;

                let base = expand_home(base);
                let base = if base.is_relative() {
                    document.parent().unwrap_or_else(|| Path::new("")).join(base)
                } else {
                    base
                };

                let section = directives.section.as_deref().unwrap_or(DEFAULT_SECTION);
                let mut dir = base.join(CONTENT_DIR).join(section.trim_matches('/'));
                if let Some(bundle) = &directives.bundle {
                    dir.push(bundle);
                }
                Ok(normalize(&dir))
            }
        }
    }
}

/// An in-document directive that the override replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverriddenDirective {
    pub keyword: &'static str,
    pub value: String,
}

/// Outcome of one publish call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub source_doc: PathBuf,
    /// File the engine is expected to have written
    pub output_file: PathBuf,
    pub section: String,
    pub publish_dir: PathBuf,
    pub overridden: Vec<OverriddenDirective>,
}

/// Runs export jobs against an engine with a forced publish location
#[derive(Debug, Clone)]
pub struct Publisher<E> {
    engine: E,
}

impl<E: ExportEngine> Publisher<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Export `request.source_doc` so its output lands next to
    /// `request.output_file`, whatever the document itself asks for.
    ///
    /// Engine failures, including unresolved links, are returned as-is.
    pub fn publish(&self, request: &ExportRequest) -> OrgpressResult<PublishReport> {
        let request = &request.absolute()?;
        let content =
            fs::read_to_string(&request.source_doc).map_err(|source| OrgpressError::DocumentLoad {
                path: request.source_doc.clone(),
                source,
            })?;
        let directives = DocumentDirectives::scan(&content);

        let paths = request.resolve()?;
        let target = PublishTarget::Override(PublishOverride::new(&request.site_root, &paths));

        let overridden = overridden_directives(&directives);
        for d in &overridden {
            info!(
                "{}: ignoring #+{} '{}', publishing to {}",
                request.source_doc.display(),
                d.keyword,
                d.value,
                paths.publish_dir.display()
            );
        }

        let output_file = paths.publish_dir.join(output_file_name(&request.source_doc, &directives));
        if normalize(&output_file) != normalize(&request.output_file) {
            warn!(
                "{} will be written as {}, not {}",
                request.source_doc.display(),
                output_file.display(),
                request.output_file.display()
            );
        }

        fs::create_dir_all(&paths.publish_dir)?;

        let job = ExportJob {
            source_doc: &request.source_doc,
            target: &target,
        };
        debug!(
            "{}: exporting {} into section '{}'",
            self.engine.name(),
            request.source_doc.display(),
            paths.section
        );
        self.engine.export(&job)?;

        Ok(PublishReport {
            source_doc: request.source_doc.clone(),
            output_file,
            section: paths.section,
            publish_dir: paths.publish_dir,
            overridden,
        })
    }
}

fn overridden_directives(directives: &DocumentDirectives) -> Vec<OverriddenDirective> {
    let mut out = Vec::new();
    if !directives.has_location() {
        return out;
    }
    if let Some(base) = &directives.base_dir {
        out.push(OverriddenDirective {
            keyword: "HUGO_BASE_DIR",
            value: base.display().to_string(),
        });
    }
    if let Some(section) = &directives.section {
        out.push(OverriddenDirective {
            keyword: "HUGO_SECTION",
            value: section.clone(),
        });
    }
    if let Some(bundle) = &directives.bundle {
        out.push(OverriddenDirective {
            keyword: "HUGO_BUNDLE",
            value: bundle.clone(),
        });
    }
    out
}

/// ox-hugo names the file after `#+EXPORT_FILE_NAME`, else the document
fn output_file_name(source: &Path, directives: &DocumentDirectives) -> String {
    let stem = directives
        .export_file_name
        .clone()
        .or_else(|| source.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "index".to_string());
    format!("{}.md", stem.strip_suffix(".md").unwrap_or(&stem))
}
