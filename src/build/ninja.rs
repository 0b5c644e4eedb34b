//! `build.ninja` rendering
//!
//! Produces a ninja file equivalent to a plan, so incremental rebuilds can
//! be delegated to ninja. Conversions call back into `orgpress publish`.

use std::fmt::Write as _;
use std::path::Path;

use crate::config::EngineConfig;

use super::plan::{BuildPlan, StepKind};

/// Everything the rule commands need besides the plan
#[derive(Debug, Clone, Copy)]
pub struct NinjaOptions<'a> {
    /// The orgpress executable
    pub exe: &'a Path,
    pub site_root: &'a Path,
    pub engine: &'a EngineConfig,
    /// Config file forwarded to `orgpress publish`
    pub config: Option<&'a Path>,
    pub post_process: &'a [String],
}

/// Escape a path for a ninja `build` line
pub fn escape_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('$', "$$")
        .replace(' ', "$ ")
        .replace(':', "$:")
}

/// Single-quote for `sh`, then escape `$` for ninja
fn command_arg(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''")).replace('$', "$$")
}

fn command_path(path: &Path) -> String {
    command_arg(&path.to_string_lossy())
}

/// Render a complete `build.ninja` for `plan`
pub fn render(plan: &BuildPlan, options: &NinjaOptions<'_>) -> String {
    let mut publish = format!(
        "{} publish --site {} --emacs {}",
        command_path(options.exe),
        command_path(options.site_root),
        command_arg(&options.engine.program)
    );
    if let Some(config) = options.config {
        let _ = write!(publish, " --config {}", command_path(config));
    }
    for file in &options.engine.load {
        let _ = write!(publish, " --load {}", command_path(file));
    }
    publish.push_str(" $in $out");

    if !options.post_process.is_empty() {
        let post: Vec<String> = options.post_process.iter().map(|s| command_arg(s)).collect();
        let _ = write!(publish, " && {} $out", post.join(" "));
    }

    let mut out = String::new();
    let _ = writeln!(out, "# generated by orgpress; edits are overwritten");
    let _ = writeln!(out);
    let _ = writeln!(out, "rule org2md");
    let _ = writeln!(out, "  command = {}", publish);
    let _ = writeln!(out, "  description = org2md $in");
    let _ = writeln!(out);
    let _ = writeln!(out, "rule COPY");
    let _ = writeln!(out, "  command = cp $in $out");
    let _ = writeln!(out, "  description = COPY $in");

    for step in &plan.steps {
        let rule = match step.kind {
            StepKind::Convert => "org2md",
            StepKind::Copy => "COPY",
        };
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "build {}: {} {}",
            escape_path(&step.output),
            rule,
            escape_path(&step.input)
        );
    }

    out
}
