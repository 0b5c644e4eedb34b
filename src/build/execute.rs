//! Build execution
//!
//! Pending steps run on a rayon pool. A step failure is recorded and the
//! remaining steps still run.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use fs2::FileExt;
use log::{debug, error, info};
use rayon::prelude::*;

use crate::engine::ExportEngine;
use crate::error::{OrgpressError, OrgpressResult};
use crate::fs::atomic_copy;
use crate::paths::ExportRequest;
use crate::publish::Publisher;

use super::plan::{BuildPlan, BuildStep, StepKind};

/// Lock file kept in the output directory while a build runs
pub const LOCK_FILE: &str = ".orgpress.lock";

/// Exclusive advisory lock on an output directory, released on drop
#[derive(Debug)]
pub struct BuildLock {
    file: File,
    path: PathBuf,
}

impl BuildLock {
    /// Take the lock without waiting; a held lock is `BuildLocked`.
    pub fn acquire(out_dir: &Path) -> OrgpressResult<Self> {
        let path = out_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;

        file.try_lock_exclusive()
            .map_err(|_| OrgpressError::BuildLocked {
                path: out_dir.to_path_buf(),
            })?;

        debug!("locked {}", path.display());
        Ok(Self { file, path })
    }
}

impl Drop for BuildLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        debug!("unlocked {}", self.path.display());
    }
}

/// Execution settings
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Worker threads, 0 for one per CPU
    pub jobs: usize,
    /// Program and leading args run on each converted file
    pub post_process: Vec<String>,
}

/// A step that did not complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub input: PathBuf,
    pub output: PathBuf,
    pub message: String,
}

/// Result of a build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub converted: Vec<PathBuf>,
    pub copied: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<StepFailure>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run every pending step of `plan`, publishing conversions under
/// `site_root`.
pub fn execute<E: ExportEngine>(
    plan: &BuildPlan,
    publisher: &Publisher<E>,
    site_root: &Path,
    options: &ExecuteOptions,
) -> OrgpressResult<BuildReport> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs)
        .build()
        .map_err(std::io::Error::other)?;

    let pending: Vec<&BuildStep> = plan.pending().collect();
    info!(
        "running {} of {} steps on {} threads",
        pending.len(),
        plan.steps.len(),
        pool.current_num_threads()
    );

    let results: Vec<(&BuildStep, OrgpressResult<PathBuf>)> = pool.install(|| {
        pending
            .par_iter()
            .map(|step| (*step, run_step(step, publisher, site_root, options)))
            .collect()
    });

    let mut report = BuildReport {
        skipped: plan
            .steps
            .iter()
            .filter(|s| !s.is_pending())
            .map(|s| s.output.clone())
            .collect(),
        ..BuildReport::default()
    };

    for (step, result) in results {
        match result {
            Ok(written) => match step.kind {
                StepKind::Convert => report.converted.push(written),
                StepKind::Copy => report.copied.push(written),
            },
            Err(e) => {
                error!("{}: {}", step.input.display(), e);
                report.failed.push(StepFailure {
                    input: step.input.clone(),
                    output: step.output.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

fn run_step<E: ExportEngine>(
    step: &BuildStep,
    publisher: &Publisher<E>,
    site_root: &Path,
    options: &ExecuteOptions,
) -> OrgpressResult<PathBuf> {
    match step.kind {
        StepKind::Convert => {
            info!("org2md {}", step.input.display());
            let report =
                publisher.publish(&ExportRequest::new(&step.input, &step.output, site_root))?;
            if !options.post_process.is_empty() {
                post_process(&options.post_process, &report.output_file)?;
            }
            Ok(report.output_file)
        }
        StepKind::Copy => {
            info!("copy {}", step.input.display());
            if let Some(parent) = step.output.parent() {
                fs::create_dir_all(parent)?;
            }
            atomic_copy(&step.input, &step.output)?;
            Ok(step.output.clone())
        }
    }
}

fn post_process(command: &[String], output: &Path) -> OrgpressResult<()> {
    let Some((program, args)) = command.split_first() else {
        return Ok(());
    };

    let failure = |message: String| OrgpressError::PostProcess {
        program: program.clone(),
        output: output.to_path_buf(),
        message,
    };

    let result = Command::new(program)
        .args(args)
        .arg(output)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| failure(e.to_string()))?;

    if result.status.success() {
        Ok(())
    } else {
        Err(failure(format!(
            "exited with {}: {}",
            result.status,
            String::from_utf8_lossy(&result.stderr).trim_end()
        )))
    }
}
