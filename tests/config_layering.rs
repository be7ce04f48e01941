//! Layered config loading tests
//!
//! Exercises multi-file loading through the public API: later files
//! override earlier ones per option, missing files are skipped, and
//! every contributing file is recorded with its digest.

use deb_ostree_builder::config::defaults::BUILDDIR;
use deb_ostree_builder::{Config, ConfigError};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn later_file_overrides_earlier_per_option() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_file(&dir, "defaults.ini", "[img]\nos = debian\nrepo = main\n");
    let product = write_file(&dir, "product.ini", "[img]\nos = endless\n");

    let mut config = Config::new();
    let loaded = config.read_files([&base, &product]).unwrap();

    assert_eq!(loaded, vec![base, product]);
    assert_eq!(config.get_raw("img", "os").unwrap(), "endless");
    assert_eq!(config.get_raw("img", "repo").unwrap(), "main");
}

#[test]
fn missing_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_file(&dir, "defaults.ini", "[img]\nos = debian\n");
    let absent = dir.path().join("product-nonesuch.ini");

    let mut config = Config::new();
    let loaded = config.read_files([&base, &absent]).unwrap();

    assert_eq!(loaded, vec![base]);
    assert_eq!(config.sources().len(), 1);
}

#[test]
fn sources_record_path_and_digest() {
    let dir = tempfile::tempdir().unwrap();
    let contents = "[img]\nos = debian\n";
    let base = write_file(&dir, "defaults.ini", contents);

    let mut config = Config::new();
    config.read_files([&base]).unwrap();

    let sources = config.sources();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].path, base);
    let expected = hex::encode(Sha256::digest(contents.as_bytes()));
    assert_eq!(sources[0].digest, expected);
}

#[test]
fn parse_error_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let bad = write_file(&dir, "broken.ini", "[img]\nno delimiter here\n");

    let mut config = Config::new();
    let err = config.read_files([&bad]).unwrap_err();
    match err {
        ConfigError::Parse { line, message } => {
            assert_eq!(line, 2);
            assert!(message.contains("broken.ini"));
        }
        other => panic!("expected parse error, got {other}"),
    }
}

#[test]
fn config_files_can_reference_builtin_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_file(
        &dir,
        "defaults.ini",
        "[ostree]\nrepo = ${builddir}/repo\n",
    );

    let mut config = Config::with_defaults();
    config.read_files([&base]).unwrap();

    assert_eq!(
        config.get("ostree", "repo").unwrap(),
        format!("{}/repo", BUILDDIR)
    );
}

#[test]
fn resolved_document_round_trips_through_ini() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_file(
        &dir,
        "defaults.ini",
        "[build]\nos = debian\n\n[img]\npackages_add_base = dpkg bash\npackages_add_extra = vim\npackages_del_base = vim\n",
    );

    let mut config = Config::new();
    config.read_files([&base]).unwrap();
    config.merge_option_prefix("img", "packages").unwrap();

    let text = config.to_ini_string().unwrap();
    let mut reparsed = Config::new();
    reparsed.read_str(&text).unwrap();
    assert_eq!(reparsed.get_raw("img", "packages").unwrap(), "bash\ndpkg");
    assert_eq!(reparsed.get_raw("build", "os").unwrap(), "debian");
}

#[test]
fn json_rendering_carries_sections_and_sources() {
    let dir = tempfile::tempdir().unwrap();
    let base = write_file(&dir, "defaults.ini", "[img]\nos = debian\n");

    let mut config = Config::new();
    config.read_files([&base]).unwrap();

    let json = config.to_json().unwrap();
    assert_eq!(json["sections"]["img"]["os"], "debian");
    let sources = json["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 1);
    assert!(sources[0]["path"].as_str().unwrap().ends_with("defaults.ini"));
    assert_eq!(sources[0]["digest"].as_str().unwrap().len(), 64);
}
