//! Property tests for forced publish locations.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use orgpress::{DocumentDirectives, PublishOverride, PublishTarget, ResolvedPaths};

fn keyword_value() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9/._~-]{1,24}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: with an override in place, the document's own location
    /// directives have no effect on where it is published.
    #[test]
    fn property_override_ignores_document_directives(
        base in keyword_value(),
        section in keyword_value(),
        bundle in keyword_value(),
        dir in "[a-z]{1,8}",
    ) {
        let site = Path::new("/srv/site");
        let output = site.join("content").join(&dir).join("doc.md");
        let paths = ResolvedPaths::resolve(&output, site).unwrap();
        let target = PublishTarget::Override(PublishOverride::new(site, &paths));

        let doc = format!(
            "#+title: T\n#+hugo_base_dir: {}\n#+hugo_section: {}\n#+hugo_bundle: {}\n",
            base, section, bundle
        );
        let found = DocumentDirectives::scan(&doc);

        let publish_dir = target.resolve(Path::new("/notes/doc.org"), &found).unwrap();
        prop_assert_eq!(publish_dir, PathBuf::from("/srv/site/content").join(&dir));
    }

    /// PROPERTY: the default target stays inside the document's base
    /// directory's `content/`.
    #[test]
    fn property_default_target_lands_in_base_content(
        section in "[a-z]{1,8}(/[a-z]{1,8}){0,2}",
    ) {
        let doc = format!("#+hugo_base_dir: /srv/other\n#+hugo_section: {}\n", section);
        let found = DocumentDirectives::scan(&doc);

        let publish_dir = PublishTarget::FromDocument
            .resolve(Path::new("/notes/doc.org"), &found)
            .unwrap();
        prop_assert!(publish_dir.starts_with("/srv/other/content"));
        prop_assert!(publish_dir.ends_with(&section));
    }
}
