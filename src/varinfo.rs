//! Import of Octopus `varinfo` files
//!
//! Every Octopus installation ships `share/varinfo`, a plain-text listing of
//! all input variables of that release:
//!
//! ```text
//! Variable BoxShape
//! Type integer
//! Default minimum
//! Section Mesh::Simulation Box
//! Description
//! This variable decides the shape of the simulation box.
//! Option sphere 1
//!  The simulation box will be a sphere.
//! END
//! ```
//!
//! [`VarinfoImporter`] turns such a file into the `varinfo-<version>.json`
//! data file that [`Catalog::load`] reads from a data directory.

use crate::catalog::{data_file_name, Catalog};
use crate::error::{OctoError, OctoResult};
use crate::types::{VarOption, VarType, VariableSpec};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Option\s+(\S+)\s+(\S+)").expect("option line pattern is valid")
});

/// Parse the text of a varinfo file.
///
/// Records start at `Variable <name>` and end at `END`, at the next
/// `Variable` line or at the end of the text. Description text runs from the
/// `Description` line to the first `Option` or the end of the record; the
/// prose under each `Option` line is not kept.
pub fn parse_varinfo(text: &str) -> Vec<VariableSpec> {
    let mut variables = Vec::new();
    let mut current: Option<VariableSpec> = None;
    let mut in_description = false;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();

        if let Some(name) = line.strip_prefix("Variable ") {
            variables.extend(current.take());
            current = Some(empty_spec(name.trim()));
            in_description = false;
            continue;
        }

        if line == "END" {
            variables.extend(current.take());
            in_description = false;
            continue;
        }

        let Some(spec) = current.as_mut() else {
            if !line.is_empty() {
                debug!("varinfo line {} is outside any record", index + 1);
            }
            continue;
        };

        if line.starts_with("Option ") {
            in_description = false;
            match OPTION_LINE.captures(line) {
                Some(caps) => spec.options.push(VarOption {
                    name: caps[1].to_string(),
                    value: caps[2].to_string(),
                }),
                None => warn!("Malformed option on varinfo line {}: {}", index + 1, line),
            }
        } else if in_description {
            if !line.is_empty() {
                spec.description.push(line.to_string());
            }
        } else if line == "Description" {
            in_description = true;
        } else if let Some(var_type) = line.strip_prefix("Type ") {
            spec.var_type = VarType::parse(var_type);
        } else if let Some(default) = line.strip_prefix("Default ") {
            spec.default = vec![default.trim().to_string()];
        } else if let Some(section) = line.strip_prefix("Section ") {
            spec.section = section.trim().to_string();
        }
    }

    variables.extend(current);
    variables
}

fn empty_spec(name: &str) -> VariableSpec {
    VariableSpec {
        name: name.to_string(),
        var_type: VarType::Other(String::new()),
        default: Vec::new(),
        section: String::new(),
        description: Vec::new(),
        options: Vec::new(),
        doc_url: None,
    }
}

//==============================================================================
// Data-file shape
//==============================================================================

#[derive(Serialize)]
struct DataFileOption<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Value")]
    value: &'a str,
}

#[derive(Serialize)]
struct DataFileEntry<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Type")]
    var_type: &'a str,
    #[serde(rename = "Default", skip_serializing_if = "Vec::is_empty")]
    default: &'a Vec<String>,
    #[serde(rename = "Section")]
    section: &'a str,
    #[serde(rename = "Description", skip_serializing_if = "Vec::is_empty")]
    description: &'a Vec<String>,
    #[serde(rename = "Options", skip_serializing_if = "Vec::is_empty")]
    options: Vec<DataFileOption<'a>>,
}

/// Render specs as a catalog data file, keyed by variable name
pub fn to_data_file_json(specs: &[VariableSpec]) -> OctoResult<String> {
    let entries: BTreeMap<&str, DataFileEntry> = specs
        .iter()
        .map(|spec| {
            let entry = DataFileEntry {
                name: &spec.name,
                var_type: spec.var_type.as_str(),
                default: &spec.default,
                section: &spec.section,
                description: &spec.description,
                options: spec
                    .options
                    .iter()
                    .map(|opt| DataFileOption {
                        name: &opt.name,
                        value: &opt.value,
                    })
                    .collect(),
            };
            (spec.name.as_str(), entry)
        })
        .collect();

    Ok(serde_json::to_string_pretty(&entries)?)
}

//==============================================================================
// Importer
//==============================================================================

/// Converts one varinfo file into a catalog data file for `version`
pub struct VarinfoImporter {
    path: PathBuf,
    version: String,
}

/// What an import produced
#[derive(Debug)]
pub struct ImportedVarinfo {
    pub catalog: Catalog,
    pub json: String,
}

impl VarinfoImporter {
    pub fn new<P: AsRef<Path>>(path: P, version: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            version: version.into(),
        }
    }

    /// Read and convert the varinfo file.
    ///
    /// The generated JSON is loaded back through [`Catalog::from_json_str`],
    /// so a successful import is always loadable.
    pub fn import(&self) -> OctoResult<ImportedVarinfo> {
        check_version(&self.version)?;

        let text = std::fs::read_to_string(&self.path)?;
        let specs = parse_varinfo(&text);
        if specs.is_empty() {
            return Err(OctoError::Validation(format!(
                "No variables found in {}",
                self.path.display()
            )));
        }

        let json = to_data_file_json(&specs)?;
        let catalog = Catalog::from_json_str(&self.version, &json)?;
        if catalog.len() < specs.len() {
            warn!(
                "{} duplicate variable record(s) in {}",
                specs.len() - catalog.len(),
                self.path.display()
            );
        }
        Ok(ImportedVarinfo { catalog, json })
    }

    /// Where the data file goes: `output` if given, else `data_dir`, else the current directory
    pub fn target_path(&self, output: Option<&Path>, data_dir: Option<&Path>) -> PathBuf {
        match (output, data_dir) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(dir)) => dir.join(data_file_name(&self.version)),
            (None, None) => PathBuf::from(data_file_name(&self.version)),
        }
    }
}

/// Versions end up in file names, so only a small alphabet is accepted
fn check_version(version: &str) -> OctoResult<()> {
    let acceptable = !version.is_empty()
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if acceptable {
        Ok(())
    } else {
        Err(OctoError::Validation(format!(
            "Invalid Octopus version '{}'",
            version
        )))
    }
}
