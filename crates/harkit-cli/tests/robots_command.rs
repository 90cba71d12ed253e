use std::path::PathBuf;

/// Helper to get path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

/// Test only entries commented robots=disallowed are reported
#[test]
fn test_disallowed_urls() {
    let urls = harkit_cli::commands::robots::disallowed_urls(&fixture_path("sample.har")).unwrap();
    assert_eq!(urls, vec!["https://www.example.com/private/".to_string()]);
}

/// Test robots=allowed is not reported
#[test]
fn test_allowed_entries_not_reported() {
    let urls = harkit_cli::commands::robots::disallowed_urls(&fixture_path("second.har")).unwrap();
    assert!(urls.is_empty());
}

/// Test both output formats run
#[test]
fn test_execute_formats() {
    let file = fixture_path("sample.har");
    assert!(harkit_cli::commands::robots::execute(&file, harkit_cli::OutputFormat::Json).is_ok());
    assert!(harkit_cli::commands::robots::execute(&file, harkit_cli::OutputFormat::Pretty).is_ok());
}
