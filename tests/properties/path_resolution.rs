//! Property tests for output path resolution.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use orgpress::paths::normalize;
use orgpress::{ResolvedPaths, SiteLayout};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-][A-Za-z0-9._ -]{0,15}")
        .unwrap()
        .prop_filter("not a dot segment", |s| s != "." && s != "..")
}

fn sections() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(segment(), 0..=4)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `<site>/content/X/Y/f.md` resolves to section `"X/Y/"` and
    /// publish dir `<site>/content/X/Y`.
    #[test]
    fn property_section_mirrors_output_directories(
        dirs in sections(),
        name in "[a-z0-9-]{1,12}",
    ) {
        let site = Path::new("/srv/site");
        let mut output = site.join("content");
        for d in &dirs {
            output.push(d);
        }
        let publish_dir = output.clone();
        output.push(format!("{}.md", name));

        let paths = ResolvedPaths::resolve(&output, site).unwrap();

        let expected = if dirs.is_empty() {
            String::new()
        } else {
            format!("{}/", dirs.join("/"))
        };
        prop_assert_eq!(paths.section, expected);
        prop_assert_eq!(paths.publish_dir, publish_dir);
        prop_assert_eq!(paths.content_root, PathBuf::from("/srv/site/content"));
    }

    /// PROPERTY: a resolved publish dir always lies under the content root,
    /// however many `..` segments the output path carries.
    #[test]
    fn property_publish_dir_never_escapes_content(
        parts in proptest::collection::vec(prop_oneof![
            segment(),
            Just("..".to_string()),
            Just(".".to_string()),
        ], 1..=6),
    ) {
        let site = Path::new("/srv/site");
        let mut output = site.join("content");
        for p in &parts {
            output.push(p);
        }

        if let Ok(paths) = ResolvedPaths::resolve(&output, site) {
            prop_assert!(paths.publish_dir.starts_with(&paths.content_root));
            prop_assert!(paths.section.split('/').all(|s| s != ".."));
        }
    }

    /// PROPERTY: resolving one output never changes the result of another.
    #[test]
    fn property_resolution_is_independent(
        first in sections(),
        second in sections(),
    ) {
        let site = Path::new("/srv/site");
        let output = |dirs: &[String]| {
            let mut p = site.join("content");
            for d in dirs {
                p.push(d);
            }
            p.join("doc.md")
        };

        let alone = ResolvedPaths::resolve(&output(&second), site).unwrap();
        let _ = ResolvedPaths::resolve(&output(&first), site).unwrap();
        let after = ResolvedPaths::resolve(&output(&second), site).unwrap();

        prop_assert_eq!(alone, after);
    }

    /// PROPERTY: the site root is everything before the last `content`.
    #[test]
    fn property_site_layout_splits_at_last_content(
        prefix in sections(),
        section in sections(),
    ) {
        let mut site = PathBuf::from("/");
        for p in &prefix {
            site.push(p);
        }
        let mut section_dir = site.join("content");
        for s in &section {
            section_dir.push(s);
        }

        let layout = SiteLayout::from_section_dir(&section_dir);

        if section.iter().any(|s| s == "content") {
            // A later `content` component wins.
            let layout = layout.unwrap();
            prop_assert!(layout.site_root.starts_with(&site));
        } else {
            let layout = layout.unwrap();
            prop_assert_eq!(layout.site_root, site);
            prop_assert_eq!(layout.section_dir, section_dir);
        }
    }

    /// PROPERTY: normalization never panics on arbitrary input.
    #[test]
    fn property_normalize_never_panics(
        s in "(?s).{0,256}"
    ) {
        let normalized = normalize(Path::new(&s));
        prop_assert_eq!(normalize(&normalized), normalized);
    }
}
