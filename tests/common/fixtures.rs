//! Test fixtures - Org documents and stub export engines.

use std::path::{Path, PathBuf};

/// A plain post with no export directives
pub const PLAIN_POST: &str = "#+title: Plain\n\n* Hello\nBody text.\n";

/// A post that asks for a different site, section and bundle
pub const DIRECTED_POST: &str = r#"#+title: Directed
#+hugo_base_dir: ../elsewhere
#+hugo_section: drafts
#+hugo_bundle: bundled

* Hello
"#;

/// A post linking to a heading that does not exist
pub const BROKEN_LINK_POST: &str = "#+title: Broken\n\nSee [[#nowhere][there]].\n";

/// Stub engine: logs its arguments to `$ORGPRESS_STUB_LOG` and writes
/// `<publish dir>/<doc stem>.md`, reading both from the export form.
#[cfg(unix)]
pub const RECORDING_ENGINE: &str = r#"#!/bin/sh
for last; do :; done
printf '%s\n' "$@" >> "${ORGPRESS_STUB_LOG:-/dev/null}"
dir=$(printf '%s' "$last" | sed -n 's/.*:hugo-bundle nil) "\([^"]*\)".*/\1/p')
src=$(printf '%s' "$last" | sed -n 's/.*(find-file "\([^"]*\)").*/\1/p')
[ -n "$dir" ] || exit 3
name=$(basename "$src" .org)
printf 'converted from %s\n' "$src" > "$dir$name.md"
"#;

/// Stub engine failing the way Org does on a dangling link
#[cfg(unix)]
pub const BROKEN_LINK_ENGINE: &str = r##"#!/bin/sh
echo 'Loading ox-hugo...' >&2
echo 'Unable to resolve link: "#nowhere"' >&2
exit 255
"##;

/// Install an executable stub script under `dir`
#[cfg(unix)]
pub fn install_engine(dir: &Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
