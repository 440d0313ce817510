use review_engine::write_artifact;

#[test]
fn writes_and_replaces_the_artifact() {
    let dir = tempfile::tempdir().expect("tempdir");

    let path = write_artifact(dir.path(), "klasifikasi_issue_42.csv", "first").expect("write");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");

    // Re-export overwrites deterministically.
    let path = write_artifact(dir.path(), "klasifikasi_issue_42.csv", "second").expect("rewrite");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
}

#[test]
fn creates_a_missing_output_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("exports");

    let path = write_artifact(&nested, "out.csv", "content").expect("write");
    assert!(path.starts_with(&nested));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
}

#[test]
fn refuses_a_non_directory_target() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("not_a_dir");
    std::fs::write(&file, "x").unwrap();

    assert!(write_artifact(&file, "out.csv", "content").is_err());
}
