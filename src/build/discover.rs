//! Source tree discovery

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use log::trace;

use crate::error::{OrgpressError, OrgpressResult};

/// Per-directory ignore file, gitignore syntax
pub const IGNORE_FILE: &str = ".orgpressignore";

/// Documents found under the org directory, relative to it and sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTree {
    pub org: Vec<PathBuf>,
    pub markdown: Vec<PathBuf>,
}

/// Walk `org_dir` for `.org` and `.md` files.
///
/// Hidden entries are skipped, symlinks are not followed, and anything
/// under `exclude` (typically the output directory) is left out.
pub fn discover(org_dir: &Path, exclude: Option<&Path>) -> OrgpressResult<SourceTree> {
    if !org_dir.is_dir() {
        return Err(OrgpressError::DirectoryNotFound {
            path: org_dir.to_path_buf(),
        });
    }

    let exclude = exclude.map(Path::to_path_buf);
    let walker = WalkBuilder::new(org_dir)
        .standard_filters(false)
        .hidden(true)
        .follow_links(false)
        .add_custom_ignore_filename(IGNORE_FILE)
        .filter_entry(move |entry| match &exclude {
            Some(dir) => !entry.path().starts_with(dir),
            None => true,
        })
        .build();

    let mut tree = SourceTree::default();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(org_dir) else {
            continue;
        };
        match entry.path().extension().and_then(|e| e.to_str()) {
            Some("org") => tree.org.push(relative.to_path_buf()),
            Some("md") => tree.markdown.push(relative.to_path_buf()),
            _ => continue,
        }
        trace!("found {}", relative.display());
    }

    tree.org.sort();
    tree.markdown.sort();
    Ok(tree)
}
