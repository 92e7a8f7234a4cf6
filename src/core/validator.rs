//! Value validation against the variable catalog
//!
//! Variables with declared options are checked by option membership only,
//! whatever their declared type. Everything else is checked by type.

use crate::catalog::Catalog;
use crate::core::math::looks_mathematical;
use crate::types::{VarType, ValidationResult, VariableSpec};
use regex::Regex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;
use tracing::{debug, error};

/// How many option names a suggestion lists before eliding the rest
const MAX_SUGGESTED_OPTIONS: usize = 10;

const LOGICAL_VALUES: &[&str] = &["true", "false", "yes", "no", ".true.", ".false.", "1", "0"];

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("integer pattern is valid"));

static PLAIN_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$")
        .expect("float pattern is valid")
});

/// Validate `raw_value` for `variable_name`.
///
/// Returns `None` when the catalog does not know the variable. Never panics:
/// a failure inside the checks becomes a generic invalid result.
pub fn validate(variable_name: &str, raw_value: &str, catalog: &Catalog) -> Option<ValidationResult> {
    let spec = catalog.get(variable_name)?;

    let result = panic::catch_unwind(AssertUnwindSafe(|| validate_spec(spec, raw_value)))
        .unwrap_or_else(|_| {
            error!("Validation of {} = '{}' aborted", variable_name, raw_value);
            ValidationResult::internal_error()
        });

    if !result.is_valid {
        debug!(
            "Validation failed for {}: {}",
            spec.name,
            result.full_message()
        );
    }
    Some(result)
}

/// Validate a value against one variable's metadata
pub fn validate_spec(spec: &VariableSpec, raw_value: &str) -> ValidationResult {
    let clean_value: String = raw_value.chars().filter(|c| *c != '\'' && *c != '"').collect();

    if spec.has_options() {
        return validate_options(spec, &clean_value);
    }

    match spec.var_type {
        VarType::Integer => {
            if INTEGER.is_match(&clean_value) {
                ValidationResult::valid()
            } else {
                ValidationResult::invalid(
                    format!("'{}' is not a valid integer", clean_value),
                    format!(
                        "Expected integer value, e.g.: {}",
                        spec.first_default().unwrap_or("1")
                    ),
                )
            }
        }
        VarType::Float => {
            if looks_mathematical(&clean_value) || PLAIN_FLOAT.is_match(&clean_value) {
                ValidationResult::valid()
            } else {
                ValidationResult::invalid(
                    format!(
                        "'{}' is not a valid float or mathematical expression",
                        clean_value
                    ),
                    format!(
                        "Expected float or mathematical expression, e.g.: {} or 3.5 * angstrom",
                        spec.first_default().unwrap_or("1.0")
                    ),
                )
            }
        }
        VarType::Logical => {
            let lower = clean_value.to_lowercase();
            if LOGICAL_VALUES.contains(&lower.as_str()) {
                ValidationResult::valid()
            } else {
                ValidationResult::invalid(
                    format!("'{}' is not a valid logical value", clean_value),
                    "Valid values: true, false, yes, no",
                )
            }
        }
        _ => ValidationResult::valid(),
    }
}

/// Option membership, including `a + b` combinations
fn validate_options(spec: &VariableSpec, clean_value: &str) -> ValidationResult {
    let is_known = |part: &str| {
        spec.options
            .iter()
            .any(|opt| opt.name.to_lowercase() == part || opt.value.to_lowercase() == part)
    };

    if clean_value.contains('+') {
        let invalid: Vec<String> = clean_value
            .split('+')
            .map(|part| part.trim().to_lowercase())
            .filter(|part| !is_known(part))
            .collect();

        if invalid.is_empty() {
            return ValidationResult::valid();
        }
        return ValidationResult::invalid(
            format!("Invalid options: {}", invalid.join(", ")),
            options_suggestion(spec),
        );
    }

    if is_known(&clean_value.trim().to_lowercase()) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid(
            format!("Invalid value '{}'", clean_value),
            options_suggestion(spec),
        )
    }
}

fn options_suggestion(spec: &VariableSpec) -> String {
    let names: Vec<&str> = spec.option_names().take(MAX_SUGGESTED_OPTIONS).collect();
    let ellipsis = if spec.options.len() > MAX_SUGGESTED_OPTIONS {
        "..."
    } else {
        ""
    };
    format!("Valid values: {}{}", names.join(", "), ellipsis)
}
