use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use ontograph::ontology::{AttributeValue, FragmentLoader, LoadError, Section};

fn fragment_file(name: &str, extension: &str, content: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("ontograph-{stamp}"));
    fs::create_dir_all(&dir).expect("fragment dir");
    let path = dir.join(format!("{name}.{extension}"));
    fs::write(&path, content).expect("fragment file");
    path
}

fn remove_fragment(path: &Path) {
    if let Some(dir) = path.parent() {
        fs::remove_dir_all(dir).ok();
    }
}

fn demo(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(format!("{name}.yaml"))
}

#[test]
fn loads_demo_fragments_in_order() {
    let fragments =
        FragmentLoader::load_all(&[demo("root"), demo("simutool")]).expect("demo fragments");

    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0].name(), "root");
    assert_eq!(fragments[1].name(), "simutool");
    assert!(fragments[0].namespaces().is_some());
    assert!(fragments[1].namespaces().is_none());

    let names: Vec<_> = fragments[0].classes().iter().map(|entry| entry.name()).collect();
    assert_eq!(names, vec!["Thing", "Activity", "Resource"]);

    let tool = &fragments[1].classes()[0];
    let fields: Vec<_> = tool
        .attributes()
        .expect("attributes")
        .iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(fields.first(), Some(&"admin"));
    assert_eq!(fields.last(), Some(&"version"));
    assert_eq!(tool.get("optional_property"), Some(&AttributeValue::List(vec![])));
}

#[test]
fn json_fragments_keep_field_order() {
    let path = fragment_file(
        "root",
        "json",
        r#"{"namespaces": [], "classes": [{"A": {"zeta": 1, "label": "TBox", "identifier": "id:a"}}]}"#,
    );

    let fragments = FragmentLoader::load_all(&[&path]).expect("json fragment");
    remove_fragment(&path);

    let fields: Vec<_> = fragments[0].classes()[0]
        .attributes()
        .expect("attributes")
        .iter()
        .map(|(name, _)| name.to_string())
        .collect();
    assert_eq!(fields, vec!["zeta", "label", "identifier"]);
}

#[test]
fn root_without_namespaces_is_fatal() {
    let root = fragment_file("root", "yaml", "classes: []\n");
    let leaf = fragment_file("leaf", "yaml", "classes: []\nnamespaces: []\n");

    let err = FragmentLoader::load_all(&[&root, &leaf]).expect_err("root needs namespaces");
    remove_fragment(&root);
    remove_fragment(&leaf);

    assert!(matches!(err, LoadError::RootMissingNamespaces { fragment } if fragment == "root"));
}

#[test]
fn unreadable_source_is_fatal() {
    let root = demo("root");
    let missing = std::env::temp_dir().join("ontograph-does-not-exist.yaml");

    let err = FragmentLoader::load_all(&[root, missing.clone()]).expect_err("missing file");

    assert!(matches!(err, LoadError::Io { path, .. } if path == missing));
}

#[test]
fn section_that_is_not_a_list_is_fatal() {
    let path = fragment_file("root", "yml", "classes: []\nnamespaces: []\nrelations: nope\n");

    let err = FragmentLoader::load_all(&[&path]).expect_err("relations must be a list");
    remove_fragment(&path);

    assert!(matches!(
        err,
        LoadError::NotAList { section: Section::Relations, .. }
    ));
}

#[test]
fn empty_source_list_is_fatal() {
    let sources: [PathBuf; 0] = [];
    assert!(matches!(
        FragmentLoader::load_all(&sources),
        Err(LoadError::NoSources)
    ));
}
