//! Variable catalog for one Octopus release
//!
//! A catalog maps variable names to their metadata. It is loaded once per
//! selected version and never mutated afterwards; switching versions means
//! building a new [`Catalog`] and swapping it in wholesale.

use crate::error::{OctoError, OctoResult};
use crate::parser::doc_url;
use crate::types::{VarOption, VarType, VariableSpec};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Version used when nothing else is configured or the configured one fails to load
pub const DEFAULT_VERSION: &str = "14.1";

/// Versions whose variable data is compiled into the binary
pub const BUNDLED_VERSIONS: &[&str] = &["14.1", "16.2"];

fn bundled_data(version: &str) -> Option<&'static str> {
    match version {
        "14.1" => Some(include_str!("../data/varinfo-14.1.json")),
        "16.2" => Some(include_str!("../data/varinfo-16.2.json")),
        _ => None,
    }
}

/// File name of an on-disk catalog for `version`
pub fn data_file_name(version: &str) -> String {
    format!("varinfo-{}.json", version)
}

//==============================================================================
// Raw data-file shape
//==============================================================================

/// A JSON scalar that should be treated as text
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl RawScalar {
    fn into_text(self) -> String {
        match self {
            RawScalar::Text(s) => s,
            RawScalar::Number(n) => n.to_string(),
            RawScalar::Bool(b) => b.to_string(),
        }
    }
}

/// Fields that are sometimes a single string and sometimes a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(RawScalar),
    Many(Vec<RawScalar>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        let items = match self {
            OneOrMany::One(item) => vec![item.into_text()],
            OneOrMany::Many(items) => items.into_iter().map(RawScalar::into_text).collect(),
        };
        items.into_iter().filter(|s| !s.trim().is_empty()).collect()
    }
}

#[derive(Debug, Deserialize)]
struct RawOption {
    #[serde(rename = "Name", alias = "name")]
    name: String,
    #[serde(rename = "Value", alias = "value")]
    value: RawScalar,
}

#[derive(Debug, Deserialize)]
struct RawVariable {
    #[serde(rename = "Name", alias = "name", default)]
    name: Option<String>,
    #[serde(rename = "Type", alias = "type", default)]
    var_type: String,
    #[serde(rename = "Default", alias = "default", default)]
    default: Option<OneOrMany>,
    #[serde(rename = "Section", alias = "section", default)]
    section: String,
    #[serde(rename = "Description", alias = "description", default)]
    description: Option<OneOrMany>,
    #[serde(rename = "Options", alias = "options", default)]
    options: Vec<RawOption>,
    #[serde(rename = "docUrl", alias = "DocUrl", alias = "doc_url", default)]
    doc_url: Option<String>,
}

impl RawVariable {
    fn normalize(self, key: &str) -> VariableSpec {
        VariableSpec {
            name: self
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| key.to_string()),
            var_type: VarType::parse(&self.var_type),
            default: self.default.map(OneOrMany::into_vec).unwrap_or_default(),
            section: self.section,
            description: self
                .description
                .map(OneOrMany::into_vec)
                .unwrap_or_default(),
            options: self
                .options
                .into_iter()
                .map(|opt| VarOption {
                    name: opt.name,
                    value: opt.value.into_text(),
                })
                .collect(),
            doc_url: self.doc_url.filter(|url| !url.trim().is_empty()),
        }
    }
}

//==============================================================================
// Catalog
//==============================================================================

/// Immutable, version-keyed variable dictionary.
///
/// Keys are stored lowercase and every lookup lowercases its query, so
/// `calculationmode`, `CalculationMode` and `CALCULATIONMODE` all resolve to
/// the same entry.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: String,
    variables: BTreeMap<String, VariableSpec>,
}

impl Catalog {
    /// Build a catalog from already-normalized specs
    pub fn from_specs(version: impl Into<String>, specs: Vec<VariableSpec>) -> Self {
        let variables = specs
            .into_iter()
            .map(|spec| (spec.name.to_lowercase(), spec))
            .collect();
        Self {
            version: version.into(),
            variables,
        }
    }

    /// Parse a variable-info JSON document
    pub fn from_json_str(version: &str, json: &str) -> OctoResult<Self> {
        let raw: BTreeMap<String, RawVariable> =
            serde_json::from_str(json).map_err(|e| OctoError::CatalogLoad {
                version: version.to_string(),
                reason: e.to_string(),
            })?;

        let specs = raw
            .into_iter()
            .map(|(key, var)| var.normalize(&key))
            .collect();
        Ok(Self::from_specs(version, specs))
    }

    /// Load the catalog compiled into the binary
    pub fn bundled(version: &str) -> OctoResult<Self> {
        let json = bundled_data(version).ok_or_else(|| OctoError::CatalogLoad {
            version: version.to_string(),
            reason: format!(
                "no bundled variable data (available: {})",
                BUNDLED_VERSIONS.join(", ")
            ),
        })?;
        Self::from_json_str(version, json)
    }

    /// Load a catalog, preferring `data_dir/varinfo-<version>.json` when present
    pub fn load(version: &str, data_dir: Option<&Path>) -> OctoResult<Self> {
        if let Some(dir) = data_dir {
            let path = dir.join(data_file_name(version));
            if path.is_file() {
                debug!("Reading variable data from {}", path.display());
                let json = std::fs::read_to_string(&path).map_err(|e| OctoError::CatalogLoad {
                    version: version.to_string(),
                    reason: format!("{}: {}", path.display(), e),
                })?;
                let catalog = Self::from_json_str(version, &json)?;
                info!(
                    "Loaded Octopus {} variable information ({} variables) from {}",
                    version,
                    catalog.len(),
                    path.display()
                );
                return Ok(catalog);
            }
        }

        let catalog = Self::bundled(version)?;
        info!(
            "Loaded Octopus {} variable information ({} variables)",
            version,
            catalog.len()
        );
        Ok(catalog)
    }

    /// Load `version`, falling back to [`DEFAULT_VERSION`] if it cannot be loaded
    pub fn load_with_fallback(version: &str, data_dir: Option<&Path>) -> OctoResult<Self> {
        match Self::load(version, data_dir) {
            Ok(catalog) => Ok(catalog),
            Err(e) if version != DEFAULT_VERSION => {
                warn!("{}; falling back to Octopus {}", e, DEFAULT_VERSION);
                Self::load(DEFAULT_VERSION, data_dir).map_err(|_| OctoError::CatalogLoad {
                    version: version.to_string(),
                    reason: "unable to load variable information for any version".to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Every version that can be loaded: bundled ones plus files in `data_dir`
    pub fn available_versions(data_dir: Option<&Path>) -> Vec<String> {
        let mut versions: BTreeSet<String> =
            BUNDLED_VERSIONS.iter().map(|v| v.to_string()).collect();

        if let Some(entries) = data_dir.and_then(|dir| std::fs::read_dir(dir).ok()) {
            for entry in entries.flatten() {
                let name = entry.file_name();
                let Some(name) = name.to_str() else { continue };
                if let Some(version) = name
                    .strip_prefix("varinfo-")
                    .and_then(|rest| rest.strip_suffix(".json"))
                {
                    versions.insert(version.to_string());
                }
            }
        }

        versions.into_iter().collect()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Case-insensitive lookup
    pub fn get(&self, name: &str) -> Option<&VariableSpec> {
        self.variables.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All variables, ordered by lowercase name
    pub fn iter(&self) -> impl Iterator<Item = &VariableSpec> {
        self.variables.values()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Documentation link: the precomputed one, else derived from section and name
    pub fn doc_url_for(&self, spec: &VariableSpec) -> Option<String> {
        spec.doc_url
            .clone()
            .or_else(|| doc_url(&self.version, &spec.section, &spec.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Spacing": {
            "Name": "Spacing",
            "Type": "float",
            "Default": "0.4",
            "Section": "Mesh",
            "Description": ["The spacing between", "grid points."]
        },
        "boxshape": {
            "Type": "integer",
            "Default": ["minimum"],
            "Section": "Mesh::Simulation Box",
            "Description": "Shape of the box.",
            "Options": [
                {"Name": "sphere", "Value": 1},
                {"Name": "minimum", "Value": "3"}
            ],
            "docUrl": "https://example.org/boxshape/"
        }
    }"#;

    #[test]
    fn test_normalizes_scalar_and_list_fields() {
        let catalog = Catalog::from_json_str("14.1", SAMPLE).unwrap();
        let spacing = catalog.get("Spacing").unwrap();
        assert_eq!(spacing.default, vec!["0.4"]);
        assert_eq!(spacing.description_text(), "The spacing between grid points.");
        assert_eq!(spacing.var_type, VarType::Float);

        let shape = catalog.get("BoxShape").unwrap();
        assert_eq!(shape.name, "boxshape");
        assert_eq!(shape.options[0].value, "1");
        assert_eq!(shape.description, vec!["Shape of the box."]);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = Catalog::from_json_str("14.1", SAMPLE).unwrap();
        assert!(catalog.contains("spacing"));
        assert!(catalog.contains("SPACING"));
        assert!(!catalog.contains("Radius"));
    }

    #[test]
    fn test_precomputed_doc_url_wins() {
        let catalog = Catalog::from_json_str("14.1", SAMPLE).unwrap();
        let shape = catalog.get("boxshape").unwrap();
        assert_eq!(
            catalog.doc_url_for(shape).as_deref(),
            Some("https://example.org/boxshape/")
        );
        let spacing = catalog.get("spacing").unwrap();
        assert_eq!(
            catalog.doc_url_for(spacing).as_deref(),
            Some("https://octopus-code.org/documentation/14/variables/mesh/spacing/")
        );
    }

    #[test]
    fn test_corrupt_json_is_a_load_failure() {
        let err = Catalog::from_json_str("14.1", "{ not json").unwrap_err();
        assert!(matches!(err, OctoError::CatalogLoad { .. }));
    }

    #[test]
    fn test_bundled_versions_load() {
        for version in BUNDLED_VERSIONS {
            let catalog = Catalog::bundled(version).unwrap();
            assert!(!catalog.is_empty());
            assert_eq!(catalog.version(), *version);
        }
        assert!(Catalog::bundled("9.9").is_err());
    }
}
