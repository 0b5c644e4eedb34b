//! Build planning
//!
//! Pure mapping from a source tree to output files, plus a freshness pass
//! that marks steps whose output is already current.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::fs::{hash_file, is_fresh};

use super::discover::SourceTree;

/// What a step does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Export an Org document through the engine
    Convert,
    /// Copy an existing Markdown snippet
    Copy,
}

/// Whether a step still has work to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Pending,
    UpToDate,
}

/// One input/output pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    pub kind: StepKind,
    pub input: PathBuf,
    pub output: PathBuf,
    pub state: StepState,
}

impl BuildStep {
    pub fn is_pending(&self) -> bool {
        self.state == StepState::Pending
    }
}

/// All steps of a build, conversions first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildPlan {
    pub steps: Vec<BuildStep>,
}

impl BuildPlan {
    /// Map `<org_dir>/<rel>.org` to `<out_dir>/<rel>.md`, and (when
    /// `copy_markdown`) `<org_dir>/<rel>.md` to `<out_dir>/<rel>.md` unless
    /// a conversion already produces that file.
    pub fn new(org_dir: &Path, out_dir: &Path, tree: &SourceTree, copy_markdown: bool) -> Self {
        let mut steps: Vec<BuildStep> = tree
            .org
            .iter()
            .map(|rel| BuildStep {
                kind: StepKind::Convert,
                input: org_dir.join(rel),
                output: out_dir.join(rel).with_extension("md"),
                state: StepState::Pending,
            })
            .collect();

        if copy_markdown {
            let converted: HashSet<PathBuf> = steps.iter().map(|s| s.output.clone()).collect();
            steps.extend(
                tree.markdown
                    .iter()
                    .map(|rel| (org_dir.join(rel), out_dir.join(rel)))
                    .filter(|(_, output)| !converted.contains(output))
                    .map(|(input, output)| BuildStep {
                        kind: StepKind::Copy,
                        input,
                        output,
                        state: StepState::Pending,
                    }),
            );
        }

        Self { steps }
    }

    /// Mark steps whose output is at least as new as the input. Copies with
    /// identical content are current too.
    pub fn mark_fresh(&mut self) {
        for step in &mut self.steps {
            let fresh = is_fresh(&step.input, &step.output)
                || (step.kind == StepKind::Copy && same_content(&step.input, &step.output));
            if fresh {
                step.state = StepState::UpToDate;
            }
        }
    }

    pub fn pending(&self) -> impl Iterator<Item = &BuildStep> {
        self.steps.iter().filter(|s| s.is_pending())
    }

    pub fn count(&self, kind: StepKind) -> usize {
        self.steps.iter().filter(|s| s.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

fn same_content(a: &Path, b: &Path) -> bool {
    match (hash_file(a), hash_file(b)) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}
