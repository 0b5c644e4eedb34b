//! Test environment builder for isolated orgpress testing.
//!
//! Provides `TestEnv` - a temp directory holding an Org tree, a Hugo site
//! and an isolated HOME, plus helpers to run the orgpress binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Result of running an orgpress CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as a single JSON object
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(self.stdout.trim())
            .unwrap_or_else(|e| panic!("stdout is not JSON ({}):\n{}", e, self.stdout))
    }
}

/// Isolated test environment.
///
/// Layout under the temp root:
/// - `org/`  - source Org tree
/// - `site/` - Hugo site (`site/content/...`)
/// - `home/` - HOME for the child process, so no user config leaks in
pub struct TestEnv {
    pub root: TempDir,
    orgpress_bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        for dir in ["org", "site/content", "home"] {
            std::fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        Self {
            root,
            orgpress_bin: PathBuf::from(env!("CARGO_BIN_EXE_orgpress")),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn org_dir(&self) -> PathBuf {
        self.path("org")
    }

    pub fn site_dir(&self) -> PathBuf {
        self.path("site")
    }

    /// File recording every stub engine invocation
    pub fn engine_log(&self) -> PathBuf {
        self.path("engine.log")
    }

    pub fn read_engine_log(&self) -> String {
        std::fs::read_to_string(self.engine_log()).unwrap_or_default()
    }

    /// Write a file relative to the temp root, creating parents
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
    }

    /// Run orgpress from the temp root
    pub fn run<S: AsRef<std::ffi::OsStr>>(&self, args: &[S]) -> TestResult {
        self.run_from(self.root.path(), args)
    }

    pub fn run_from<S: AsRef<std::ffi::OsStr>>(&self, cwd: &Path, args: &[S]) -> TestResult {
        let home = self.path("home");
        let output = Command::new(&self.orgpress_bin)
            .current_dir(cwd)
            .args(args)
            .env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env("ORGPRESS_STUB_LOG", self.engine_log())
            .env_remove("ORGPRESS_EMACS")
            .env_remove("ORGPRESS_JOBS")
            .env_remove("ORGPRESS_LOAD")
            .env_remove("ORGPRESS_LOG")
            .output()
            .expect("Failed to execute orgpress");

        output_to_result(output)
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
