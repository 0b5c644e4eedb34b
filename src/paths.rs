//! Output path resolution
//!
//! Hugo (and ox-hugo) expect every page under `<site>/content/<section>/`.
//! This module derives the section and publish directory for a requested
//! output file, and recovers the site root from a section directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{OrgpressError, OrgpressResult};

/// Name of the Hugo content directory under the site root
pub const CONTENT_DIR: &str = "content";

/// Inputs of a single publish call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Org document to export
    pub source_doc: PathBuf,
    /// Where the caller wants the Markdown file to end up
    pub output_file: PathBuf,
    /// Hugo site root (the directory holding `content/`)
    pub site_root: PathBuf,
}

impl ExportRequest {
    pub fn new(
        source_doc: impl Into<PathBuf>,
        output_file: impl Into<PathBuf>,
        site_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_doc: source_doc.into(),
            output_file: output_file.into(),
            site_root: site_root.into(),
        }
    }

    /// Resolve the section and publish directory for this request
    pub fn resolve(&self) -> OrgpressResult<ResolvedPaths> {
        ResolvedPaths::resolve(&self.output_file, &self.site_root)
    }

    /// The same request with every path absolute and symlinks resolved.
    ///
    /// The engine visits the document before exporting, and relative paths
    /// would then be taken from the document's directory.
    pub fn absolute(&self) -> OrgpressResult<Self> {
        Ok(Self {
            source_doc: resolve_path(&self.source_doc)?,
            output_file: resolve_path(&self.output_file)?,
            site_root: resolve_path(&self.site_root)?,
        })
    }
}

/// Derived locations for one output file. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// `<site>/content`
    pub content_root: PathBuf,
    /// Section relative to the content root, `/`-separated with a trailing
    /// slash (`"blog/"`), or empty for files placed directly in `content/`.
    pub section: String,
    /// `<site>/content/<section>`
    pub publish_dir: PathBuf,
}

impl ResolvedPaths {
    /// Compute the section of `output_file` relative to `site_root/content`.
    ///
    /// Both paths are normalized lexically first, so `..` cannot be used to
    /// step outside the content root.
    pub fn resolve(output_file: &Path, site_root: &Path) -> OrgpressResult<Self> {
        let content_root = normalize(&site_root.join(CONTENT_DIR));
        let output = normalize(output_file);

        let relative = match output.strip_prefix(&content_root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => {
                return Err(OrgpressError::OutsideContentRoot {
                    output: output_file.to_path_buf(),
                    content_root,
                })
            }
        };

        let section_dir = relative.parent().unwrap_or_else(|| Path::new(""));
        let segments: Vec<String> = section_dir
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        let section = if segments.is_empty() {
            String::new()
        } else {
            format!("{}/", segments.join("/"))
        };

        Ok(Self {
            publish_dir: content_root.join(section_dir),
            content_root,
            section,
        })
    }
}

/// Hugo site located from a section directory such as `site/content/posts`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    /// Everything before the last `content` component
    pub site_root: PathBuf,
    /// The section directory the build writes into
    pub section_dir: PathBuf,
}

impl SiteLayout {
    /// Split `section_dir` at its last `content` component.
    pub fn from_section_dir(section_dir: &Path) -> OrgpressResult<Self> {
        let normalized = normalize(section_dir);
        let components: Vec<Component<'_>> = normalized.components().collect();

        let index = components
            .iter()
            .rposition(|c| matches!(c, Component::Normal(name) if *name == CONTENT_DIR))
            .ok_or_else(|| OrgpressError::NotAContentDir {
                path: section_dir.to_path_buf(),
            })?;

        let site_root: PathBuf = components[..index].iter().collect();
        let site_root = if site_root.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            site_root
        };

        Ok(Self {
            site_root,
            section_dir: normalized,
        })
    }
}

/// Lexically normalize a path: drop `.` and fold `..` into its parent.
///
/// Leading `..` components of a relative path are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Join a relative `path` onto `cwd`, then normalize
pub fn absolute_in(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&cwd.join(path))
    }
}

/// Absolute form of `path` with symlinks resolved for the part that exists.
///
/// Missing trailing components are kept as written, so an output file that
/// has not been exported yet still resolves.
pub fn resolve_path(path: &Path) -> OrgpressResult<PathBuf> {
    let absolute = if path.is_absolute() {
        normalize(path)
    } else {
        absolute_in(path, &std::env::current_dir()?)
    };

    for existing in absolute.ancestors() {
        if let Ok(canonical) = fs::canonicalize(existing) {
            let rest = absolute.strip_prefix(existing).unwrap_or_else(|_| Path::new(""));
            if rest.as_os_str().is_empty() {
                return Ok(canonical);
            }
            return Ok(canonical.join(rest));
        }
    }
    Ok(absolute)
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_nested_section() {
        let paths =
            ResolvedPaths::resolve(Path::new("/site/content/X/Y/file.md"), Path::new("/site"))
                .unwrap();
        assert_eq!(paths.content_root, PathBuf::from("/site/content"));
        assert_eq!(paths.section, "X/Y/");
        assert_eq!(paths.publish_dir, PathBuf::from("/site/content/X/Y"));
    }

    #[test]
    fn resolve_blog_post() {
        let req = ExportRequest::new("notes/post1.org", "/site/content/blog/post1.md", "/site");
        let paths = req.resolve().unwrap();
        assert_eq!(paths.section, "blog/");
        assert_eq!(paths.publish_dir, PathBuf::from("/site/content/blog"));
    }

    #[test]
    fn resolve_file_directly_in_content_has_empty_section() {
        let paths =
            ResolvedPaths::resolve(Path::new("/site/content/about.md"), Path::new("/site"))
                .unwrap();
        assert_eq!(paths.section, "");
        assert_eq!(paths.publish_dir, PathBuf::from("/site/content"));
    }

    #[test]
    fn resolve_folds_dot_segments() {
        let paths = ResolvedPaths::resolve(
            Path::new("/site/content/./posts/../blog/a.md"),
            Path::new("/site/"),
        )
        .unwrap();
        assert_eq!(paths.section, "blog/");
    }

    #[test]
    fn resolve_rejects_output_outside_content() {
        let err = ResolvedPaths::resolve(Path::new("/site/static/a.md"), Path::new("/site"))
            .unwrap_err();
        assert!(matches!(err, OrgpressError::OutsideContentRoot { .. }));
    }

    #[test]
    fn resolve_rejects_escape_via_parent_dir() {
        let err = ResolvedPaths::resolve(
            Path::new("/site/content/../secrets/a.md"),
            Path::new("/site"),
        )
        .unwrap_err();
        assert!(matches!(err, OrgpressError::OutsideContentRoot { .. }));
    }

    #[test]
    fn resolve_rejects_content_root_itself() {
        let err =
            ResolvedPaths::resolve(Path::new("/site/content"), Path::new("/site")).unwrap_err();
        assert!(matches!(err, OrgpressError::OutsideContentRoot { .. }));
    }

    #[test]
    fn site_layout_uses_last_content_component() {
        let layout =
            SiteLayout::from_section_dir(Path::new("/home/me/content/hugo/content/posts"))
                .unwrap();
        assert_eq!(layout.site_root, PathBuf::from("/home/me/content/hugo"));
        assert_eq!(
            layout.section_dir,
            PathBuf::from("/home/me/content/hugo/content/posts")
        );
    }

    #[test]
    fn site_layout_relative_content_dir() {
        let layout = SiteLayout::from_section_dir(Path::new("content/posts")).unwrap();
        assert_eq!(layout.site_root, PathBuf::from("."));
    }

    #[test]
    fn site_layout_requires_content_component() {
        let err = SiteLayout::from_section_dir(Path::new("/site/public/posts")).unwrap_err();
        assert!(matches!(err, OrgpressError::NotAContentDir { .. }));
    }

    #[test]
    fn normalize_keeps_leading_parent_dirs() {
        assert_eq!(normalize(Path::new("../a/./b/../c")), PathBuf::from("../a/c"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn absolute_in_joins_relative_paths() {
        let cwd = Path::new("/work");
        assert_eq!(
            absolute_in(Path::new("site/./content/blog/post1.md"), cwd),
            PathBuf::from("/work/site/content/blog/post1.md")
        );
        assert_eq!(absolute_in(Path::new("/abs/a.org"), cwd), PathBuf::from("/abs/a.org"));
    }

    #[test]
    fn relative_site_with_absolute_output_resolves_after_absolutizing() {
        let cwd = Path::new("/work");
        let site = absolute_in(Path::new("site"), cwd);
        let paths =
            ResolvedPaths::resolve(Path::new("/work/site/content/blog/post1.md"), &site).unwrap();
        assert_eq!(paths.section, "blog/");
        assert_eq!(paths.publish_dir, PathBuf::from("/work/site/content/blog"));
    }

    #[test]
    fn resolve_path_keeps_missing_tail() {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        fs::create_dir_all(root.join("site/content")).unwrap();

        let resolved = resolve_path(&dir.path().join("site/content/blog/../x/post1.md")).unwrap();
        assert_eq!(resolved, root.join("site/content/x/post1.md"));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_path_follows_symlinked_site() {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        fs::create_dir_all(root.join("real/content")).unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

        let request = ExportRequest::new(
            root.join("link/a.org"),
            root.join("link/content/blog/a.md"),
            root.join("real"),
        );
        let absolute = request.absolute().unwrap();
        assert_eq!(absolute.output_file, root.join("real/content/blog/a.md"));
        assert_eq!(absolute.resolve().unwrap().section, "blog/");
    }

    #[test]
    fn expand_home_leaves_plain_paths() {
        assert_eq!(expand_home(Path::new("/etc/x")), PathBuf::from("/etc/x"));
        assert_eq!(expand_home(Path::new("a/~")), PathBuf::from("a/~"));
    }
}
