//! Tree build: convert a nested Org directory into a Hugo section
//!
//! Flow: locate the site from the section directory, discover sources,
//! plan outputs, then either execute the plan or hand it to ninja.

pub mod discover;
pub mod execute;
pub mod ninja;
pub mod plan;

use std::fs;
use std::path::PathBuf;

use log::info;

use crate::engine::ExportEngine;
use crate::error::{OrgpressError, OrgpressResult};
use crate::paths::{resolve_path, SiteLayout};
use crate::publish::Publisher;

pub use discover::{discover, SourceTree, IGNORE_FILE};
pub use execute::{execute, BuildLock, BuildReport, ExecuteOptions, StepFailure, LOCK_FILE};
pub use ninja::NinjaOptions;
pub use plan::{BuildPlan, BuildStep, StepKind, StepState};

/// Name of the generated ninja file inside the output directory
pub const NINJA_FILE: &str = "build.ninja";

/// Inputs of a tree build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub org_dir: PathBuf,
    /// Section directory, e.g. `hugo-site/content/posts`
    pub out_dir: PathBuf,
    /// Rebuild even when outputs look current
    pub force: bool,
    pub copy_markdown: bool,
}

/// Planned build with resolved locations
#[derive(Debug, Clone)]
pub struct PreparedBuild {
    pub org_dir: PathBuf,
    pub layout: SiteLayout,
    pub plan: BuildPlan,
}

/// Resolve directories, discover sources and plan outputs. Nothing is
/// written.
pub fn prepare(options: &BuildOptions) -> OrgpressResult<PreparedBuild> {
    let org_dir = fs::canonicalize(&options.org_dir).map_err(|_| {
        OrgpressError::DirectoryNotFound {
            path: options.org_dir.clone(),
        }
    })?;
    let out_dir = resolve_path(&options.out_dir)?;
    let layout = SiteLayout::from_section_dir(&out_dir)?;

    let tree = discover(&org_dir, Some(layout.section_dir.as_path()))?;
    info!(
        "found {} org and {} markdown files under {}",
        tree.org.len(),
        tree.markdown.len(),
        org_dir.display()
    );

    let mut plan = BuildPlan::new(&org_dir, &layout.section_dir, &tree, options.copy_markdown);
    if !options.force {
        plan.mark_fresh();
    }

    Ok(PreparedBuild {
        org_dir,
        layout,
        plan,
    })
}

/// Execute a prepared build while holding the output directory lock
pub fn run<E: ExportEngine>(
    prepared: &PreparedBuild,
    publisher: &Publisher<E>,
    options: &ExecuteOptions,
) -> OrgpressResult<BuildReport> {
    let out_dir = &prepared.layout.section_dir;
    fs::create_dir_all(out_dir)?;
    let _lock = BuildLock::acquire(out_dir)?;

    execute(&prepared.plan, publisher, &prepared.layout.site_root, options)
}

/// Write `build.ninja` into the output directory and return its path
pub fn write_ninja(prepared: &PreparedBuild, options: &NinjaOptions<'_>) -> OrgpressResult<PathBuf> {
    let out_dir = &prepared.layout.section_dir;
    fs::create_dir_all(out_dir)?;

    let path = out_dir.join(NINJA_FILE);
    crate::fs::atomic_write(&path, ninja::render(&prepared.plan, options).as_bytes())?;
    info!("wrote {}", path.display());
    Ok(path)
}
