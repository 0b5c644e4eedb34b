//! Emacs Lisp rendering for the batch engine
//!
//! Everything orgpress hands to Emacs goes through here, so paths with
//! quotes or backslashes cannot break out of a string literal.

use std::path::Path;

use crate::publish::{PublishOverride, PublishTarget};

/// Escape a string as an Emacs Lisp string literal, quotes included.
///
/// Escapes: backslash, double quote
pub fn quote_string(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// Quote a path. Non-UTF-8 bytes are replaced lossily.
pub fn quote_path(path: &Path) -> String {
    quote_string(&path.to_string_lossy())
}

/// Quote a directory path the way `file-name-as-directory` would render it
pub fn quote_dir(path: &Path) -> String {
    let mut dir = path.to_string_lossy().into_owned();
    if !dir.ends_with('/') {
        dir.push('/');
    }
    quote_string(&dir)
}

/// Whether `s` can be spliced in as a bare symbol
pub fn is_symbol(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with(|c: char| c.is_ascii_digit())
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_/:*+<>=!?.".contains(c))
}

/// Process-wide settings applied once before any export runs
pub fn startup_form(disable_recentf: bool) -> Option<String> {
    disable_recentf
        .then(|| "(when (fboundp 'recentf-mode) (recentf-mode -1))".to_string())
}

/// Visit `source` and run `export_function`, with the publish directory
/// forced when `target` carries an override.
///
/// The override rebinds `org-hugo--get-pub-dir` with `cl-letf`, so Emacs
/// restores the original definition as soon as the export returns or
/// signals.
pub fn export_form(source: &Path, target: &PublishTarget, export_function: &str) -> String {
    let visit = format!("(find-file {})", quote_path(source));
    let export = format!("({})", export_function);

    match target {
        PublishTarget::FromDocument => {
            format!("(progn (require 'ox-hugo) {} {})", visit, export)
        }
        PublishTarget::Override(over) => format!(
            "(progn (require 'cl-lib) (require 'ox-hugo) {} (cl-letf (((symbol-function 'org-hugo--get-pub-dir) {})) {}))",
            visit,
            pub_dir_lambda(over),
            export
        ),
    }
}

fn pub_dir_lambda(over: &PublishOverride) -> String {
    format!(
        "(lambda (info) (plist-put info :hugo-base-dir {}) (plist-put info :hugo-section {}) (plist-put info :hugo-bundle nil) {})",
        quote_dir(&over.base_dir),
        quote_string(&over.section),
        quote_dir(&over.publish_dir)
    )
}
