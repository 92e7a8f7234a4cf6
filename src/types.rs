use serde::Serialize;
use std::fmt;

//==============================================================================
// Catalog Types
//==============================================================================

/// Declared kind of an Octopus variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarType {
    Integer,
    Float,
    Logical,
    String,
    Block,
    Flag,
    /// Any other type name found in the data file, kept verbatim
    Other(std::string::String),
}

impl VarType {
    /// Parse a type name from the variable-info data
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "integer" => VarType::Integer,
            "float" | "real" => VarType::Float,
            "logical" => VarType::Logical,
            "string" => VarType::String,
            "block" => VarType::Block,
            "flag" => VarType::Flag,
            _ => VarType::Other(name.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            VarType::Integer => "integer",
            VarType::Float => "float",
            VarType::Logical => "logical",
            VarType::String => "string",
            VarType::Block => "block",
            VarType::Flag => "flag",
            VarType::Other(name) => name,
        }
    }
}

impl Serialize for VarType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One permitted enumerated value for a variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarOption {
    pub name: String,
    pub value: String,
}

/// Metadata for one catalog entry.
///
/// `default` and `description` are always sequences; single strings in the
/// data file are normalized at load time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSpec {
    /// Canonical name as written in the data file
    pub name: String,
    pub var_type: VarType,
    pub default: Vec<String>,
    /// Category path using `::` separators
    pub section: String,
    pub description: Vec<String>,
    pub options: Vec<VarOption>,
    /// Precomputed documentation link, if the data file carries one
    pub doc_url: Option<String>,
}

impl VariableSpec {
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    /// First declared default value
    pub fn first_default(&self) -> Option<&str> {
        self.default.first().map(String::as_str)
    }

    /// Description lines joined with spaces
    pub fn description_text(&self) -> String {
        self.description.join(" ")
    }

    /// Option names, in declaration order
    pub fn option_names(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|opt| opt.name.as_str())
    }
}

//==============================================================================
// Parse Results
//==============================================================================

/// A `name = value` assignment found on one line.
///
/// Offsets are zero-based character columns within the source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRecord {
    pub variable_name: String,
    /// Comment-stripped, trimmed value text
    pub value: String,
    pub var_start: usize,
    pub var_end: usize,
    pub value_start: usize,
    pub value_end: usize,
}

/// A `%Name` block opening marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStart {
    pub block_name: String,
    /// Column of the `%`
    pub start: usize,
    /// Column just past the block name
    pub end: usize,
}

//==============================================================================
// Validation Results
//==============================================================================

/// Outcome of checking one value against a known variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub message: Option<String>,
    pub suggestion: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
            suggestion: None,
        }
    }

    pub fn invalid(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
            suggestion: Some(suggestion.into()),
        }
    }

    /// Conservative result used when validation itself failed
    pub fn internal_error() -> Self {
        Self {
            is_valid: false,
            message: Some("validation error".to_string()),
            suggestion: None,
        }
    }

    /// Message with the suggestion appended in parentheses
    pub fn full_message(&self) -> String {
        let message = self.message.as_deref().unwrap_or("Invalid value");
        match &self.suggestion {
            Some(suggestion) => format!("{} ({})", message, suggestion),
            None => message.to_string(),
        }
    }
}

/// Severity of a finding. Unknown variables are never reported, so every
/// finding is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
        }
    }
}

/// A position-anchored diagnostic produced by a document scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.line + 1,
            self.start_col + 1,
            self.severity.as_str(),
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_type_parse_aliases() {
        assert_eq!(VarType::parse("real"), VarType::Float);
        assert_eq!(VarType::parse("Float"), VarType::Float);
        assert_eq!(VarType::parse("logical"), VarType::Logical);
        assert_eq!(
            VarType::parse("virtual"),
            VarType::Other("virtual".to_string())
        );
    }

    #[test]
    fn test_full_message_with_suggestion() {
        let result = ValidationResult::invalid("'x' is not a valid integer", "Expected integer");
        assert_eq!(
            result.full_message(),
            "'x' is not a valid integer (Expected integer)"
        );
        assert_eq!(
            ValidationResult::internal_error().full_message(),
            "validation error"
        );
    }

    #[test]
    fn test_finding_display_is_one_based() {
        let finding = Finding {
            line: 2,
            start_col: 10,
            end_col: 13,
            severity: Severity::Error,
            message: "bad".to_string(),
        };
        assert_eq!(finding.to_string(), "3:11: error: bad");
    }
}
