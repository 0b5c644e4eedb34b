//! In-document export directives
//!
//! Only `#+KEY: value` lines are read. Everything else in the document is
//! left to the export engine.

use std::path::PathBuf;

/// Directives that influence where the engine writes its output.
///
/// Later occurrences replace earlier ones, matching how Org collects
/// in-buffer export options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentDirectives {
    pub base_dir: Option<PathBuf>,
    pub section: Option<String>,
    pub bundle: Option<String>,
    pub export_file_name: Option<String>,
}

impl DocumentDirectives {
    /// Scan document text for keyword lines.
    pub fn scan(content: &str) -> Self {
        let mut directives = Self::default();
        let mut in_block = false;

        for line in content.lines() {
            let Some((key, value)) = keyword(line) else {
                continue;
            };

            let key = key.to_ascii_uppercase();
            if key.starts_with("BEGIN_") {
                in_block = true;
                continue;
            }
            if key.starts_with("END_") {
                in_block = false;
                continue;
            }
            if in_block || value.is_empty() {
                continue;
            }

            match key.as_str() {
                "HUGO_BASE_DIR" => directives.base_dir = Some(PathBuf::from(value)),
                "HUGO_SECTION" => directives.section = Some(value.to_string()),
                "HUGO_BUNDLE" => directives.bundle = Some(value.to_string()),
                "EXPORT_FILE_NAME" => directives.export_file_name = Some(value.to_string()),
                _ => {}
            }
        }

        directives
    }

    /// True when any directive would move the output somewhere else
    pub fn has_location(&self) -> bool {
        self.base_dir.is_some() || self.section.is_some() || self.bundle.is_some()
    }
}

/// Split `#+KEY: value` (or `#+BEGIN_SRC lang`) into key and trimmed value.
fn keyword(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start().strip_prefix("#+")?;
    let end = rest
        .find(|c: char| c == ':' || c.is_whitespace())
        .unwrap_or(rest.len());
    let (key, tail) = rest.split_at(end);
    if key.is_empty() {
        return None;
    }
    let value = tail.strip_prefix(':').unwrap_or(tail).trim();
    Some((key, value))
}
