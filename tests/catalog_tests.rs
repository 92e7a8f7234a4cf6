//! Catalog loading tests: bundled data, data directories and fallback

use octopus_tools::catalog::{data_file_name, Catalog, BUNDLED_VERSIONS, DEFAULT_VERSION};
use octopus_tools::error::OctoError;
use octopus_tools::types::VarType;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const CUSTOM: &str = r#"{
    "calculationmode": {
        "name": "CalculationMode",
        "type": "integer",
        "default": "gs",
        "section": "Calculation Modes",
        "options": [{"name": "gs", "value": 1}, {"name": "td", "value": 3}]
    },
    "NewThing": {
        "Type": "float",
        "Section": "Experimental",
        "Description": ""
    }
}"#;

// ═══════════════════════════════════════════════════════════════════════════
// BUNDLED DATA
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_every_bundled_version_loads() {
    for version in BUNDLED_VERSIONS {
        let catalog = Catalog::bundled(version).unwrap();
        assert_eq!(catalog.version(), *version);
        assert!(catalog.contains("CalculationMode"));
        assert!(!catalog.is_empty());
    }
}

#[test]
fn test_versions_differ() {
    let old = Catalog::bundled("14.1").unwrap();
    let new = Catalog::bundled("16.2").unwrap();
    assert!(!old.contains("RestartOptions"));
    assert!(new.contains("RestartOptions"));
    assert_eq!(old.get("Output").unwrap().var_type, VarType::Flag);
    assert_eq!(new.get("Output").unwrap().var_type, VarType::Block);
}

#[test]
fn test_precomputed_doc_url_wins() {
    let catalog = Catalog::bundled("16.2").unwrap();
    let spec = catalog.get("TDTimeStep").unwrap();
    assert_eq!(catalog.doc_url_for(spec), spec.doc_url.clone());

    let spacing = catalog.get("Spacing").unwrap();
    assert_eq!(
        catalog.doc_url_for(spacing).as_deref(),
        Some("https://octopus-code.org/documentation/16/variables/mesh/spacing/")
    );
}

#[test]
fn test_unknown_bundled_version() {
    let err = Catalog::bundled("1.0").unwrap_err();
    assert!(matches!(err, OctoError::CatalogLoad { ref version, .. } if version == "1.0"));
}

// ═══════════════════════════════════════════════════════════════════════════
// DATA DIRECTORY
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_data_dir_adds_and_overrides_versions() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(data_file_name("15.0")), CUSTOM).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let versions = Catalog::available_versions(Some(dir.path()));
    assert_eq!(versions, vec!["14.1", "15.0", "16.2"]);

    let catalog = Catalog::load("15.0", Some(dir.path())).unwrap();
    assert_eq!(catalog.len(), 2);
    let mode = catalog.get("CALCULATIONMODE").unwrap();
    assert_eq!(mode.name, "CalculationMode");
    assert_eq!(mode.options[1].value, "3");

    let new_thing = catalog.get("newthing").unwrap();
    assert_eq!(new_thing.name, "NewThing");
    assert!(new_thing.description.is_empty());

    // Bundled versions still load from the binary
    assert!(Catalog::load("14.1", Some(dir.path())).unwrap().len() > 2);
}

#[test]
fn test_corrupt_file_is_a_load_failure() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(data_file_name("14.1")), "{ not json").unwrap();
    let err = Catalog::load("14.1", Some(dir.path())).unwrap_err();
    assert!(matches!(err, OctoError::CatalogLoad { .. }));
}

#[test]
fn test_fallback_to_default_version() {
    let catalog = Catalog::load_with_fallback("99.9", None).unwrap();
    assert_eq!(catalog.version(), DEFAULT_VERSION);

    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(data_file_name("14.1")), "[]").unwrap();
    assert!(Catalog::load_with_fallback("99.9", Some(dir.path())).is_err());
}
