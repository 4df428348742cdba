//! Integration test: the process-wide parser is built once and shared.

use docfm_core::{LayoutRegistry, VersionRegistry};
use docfm_schema::{ParseOverrides, LAYOUT_MESSAGE};

fn init() -> &'static docfm_schema::Frontmatter {
    let versions: VersionRegistry = ["free-pro-team@latest"].into_iter().collect();
    let layouts: LayoutRegistry = ["default"].into_iter().collect();
    docfm_schema::init(&versions, &layouts).expect("schema compiles")
}

#[test]
fn frontmatter_uses_shared_parser() {
    init();
    let parsed = docfm_schema::frontmatter(
        "---\ntitle: Foo\nversions: '*'\n---\nBody\n",
        ParseOverrides::none(),
    )
    .unwrap();
    assert_eq!(parsed.title(), Some("Foo"));

    let err = docfm_schema::frontmatter(
        "---\ntitle: Foo\nversions: '*'\nlayout: nonexistent-layout\n---\n",
        ParseOverrides::none(),
    )
    .unwrap_err();
    assert!(err.to_string().contains(LAYOUT_MESSAGE));
}

#[test]
fn later_init_calls_return_the_first_parser() {
    let first = init();
    let other_layouts: LayoutRegistry = ["something-else"].into_iter().collect();
    let second = docfm_schema::init(&VersionRegistry::new(), &other_layouts).unwrap();
    assert!(std::ptr::eq(first, second));

    let schema = docfm_schema::schema().expect("initialized");
    assert!(std::sync::Arc::ptr_eq(&schema, first.schema()));
}
