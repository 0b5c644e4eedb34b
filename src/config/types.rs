//! Configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// `[engine]`: how the export engine is started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Emacs executable
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before everything orgpress adds
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Files loaded with `-l` before exporting (init file, ox-hugo setup)
    #[serde(default)]
    pub load: Vec<PathBuf>,

    /// Command that exports the visited buffer
    #[serde(default = "default_export_function")]
    pub export_function: String,

    /// Turn off recentf in the engine process
    #[serde(default = "default_true")]
    pub disable_recentf: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            load: Vec::new(),
            export_function: default_export_function(),
            disable_recentf: true,
        }
    }
}

fn default_program() -> String {
    "emacs".to_string()
}

fn default_args() -> Vec<String> {
    vec!["-nw".to_string(), "--batch".to_string()]
}

fn default_export_function() -> String {
    "org-hugo-export-to-md".to_string()
}

fn default_true() -> bool {
    true
}

/// `[build]`: tree conversion settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Worker threads; 0 means one per CPU
    #[serde(default)]
    pub jobs: usize,

    /// Copy `.md` files found in the source tree
    #[serde(default = "default_true")]
    pub copy_markdown: bool,

    /// Program (and leading args) run on each converted file; the output
    /// path is appended
    #[serde(default)]
    pub post_process: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            jobs: 0,
            copy_markdown: true,
            post_process: Vec::new(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub build: BuildConfig,
}
