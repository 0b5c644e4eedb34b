//! Emacs batch export engine
//!
//! Runs `emacs --batch` once per document with ox-hugo loaded by the user's
//! init files. Each export is a fresh process, so nothing configured for
//! one document can leak into the next.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use log::{debug, trace};

use super::elisp;
use super::{EngineError, ExportEngine, ExportJob, ExportOutcome};
use crate::config::EngineConfig;
use crate::error::{OrgpressError, OrgpressResult};
use crate::paths::expand_home;

/// Marker Org prints when a link target cannot be found
const UNRESOLVED_LINK_MARKER: &str = "Unable to resolve link";

/// Emacs in batch mode running ox-hugo
#[derive(Debug, Clone)]
pub struct EmacsEngine {
    program: String,
    args: Vec<String>,
    load: Vec<PathBuf>,
    export_function: String,
    disable_recentf: bool,
}

impl EmacsEngine {
    /// Build an engine from the `[engine]` config section
    pub fn from_config(config: &EngineConfig) -> OrgpressResult<Self> {
        if !elisp::is_symbol(&config.export_function) {
            return Err(OrgpressError::InvalidConfig {
                file: PathBuf::from("[engine]"),
                message: format!(
                    "export_function '{}' is not a valid Emacs Lisp symbol",
                    config.export_function
                ),
            });
        }

        Ok(Self {
            program: config.program.clone(),
            args: config.args.clone(),
            load: config.load.iter().map(|p| expand_home(p)).collect(),
            export_function: config.export_function.clone(),
            disable_recentf: config.disable_recentf,
        })
    }

    /// Assemble the command line for one job without running it
    pub fn command(&self, job: &ExportJob<'_>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for file in &self.load {
            cmd.arg("-l").arg(file);
        }

        if let Some(startup) = elisp::startup_form(self.disable_recentf) {
            cmd.arg("--eval").arg(startup);
        }

        cmd.arg("--eval").arg(elisp::export_form(
            job.source_doc,
            job.target,
            &self.export_function,
        ));

        cmd
    }
}

impl ExportEngine for EmacsEngine {
    fn name(&self) -> &str {
        "emacs"
    }

    fn export(&self, job: &ExportJob<'_>) -> Result<ExportOutcome, EngineError> {
        let mut cmd = self.command(job);
        trace!("engine command: {:?}", cmd);

        let output = cmd
            .stdin(Stdio::null())
            .output()
            .map_err(|source| EngineError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !stderr.is_empty() {
            debug!("{} says:\n{}", self.program, stderr.trim_end());
        }

        if output.status.success() {
            Ok(ExportOutcome { log: stderr })
        } else {
            Err(classify(output.status.code(), stderr))
        }
    }
}

/// Turn a failed run into the most specific error we can recognise
fn classify(code: Option<i32>, stderr: String) -> EngineError {
    if let Some(line) = stderr.lines().find(|l| l.contains(UNRESOLVED_LINK_MARKER)) {
        let detail = line
            .split_once(UNRESOLVED_LINK_MARKER)
            .map(|(_, rest)| rest.trim_start_matches(':').trim())
            .unwrap_or_default()
            .to_string();
        return EngineError::UnresolvedLink { detail };
    }

    let status = match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    };
    EngineError::Failed {
        status,
        stderr: stderr.trim_end().to_string(),
    }
}
