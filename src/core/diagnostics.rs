//! Document scanning: one finding per invalid assignment

use crate::catalog::Catalog;
use crate::core::validator::validate;
use crate::parser::parse_assignment;
use crate::types::{Finding, Severity};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Should the line be skipped without attempting to parse it?
///
/// Comment lines (`#`, `-`), block markers (`%`) and blank lines never hold a
/// plain assignment.
pub fn is_skipped_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('-')
        || trimmed.starts_with('#')
        || trimmed.starts_with('%')
}

/// Scan lines in order and report invalid values of known variables.
///
/// Unknown variables are not reported. A failure while handling one line is
/// logged and does not stop the scan.
pub fn scan<I, S>(lines: I, catalog: &Catalog) -> Vec<Finding>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut findings = Vec::new();

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        if is_skipped_line(line) {
            continue;
        }

        match panic::catch_unwind(AssertUnwindSafe(|| check_line(index, line, catalog))) {
            Ok(Some(finding)) => findings.push(finding),
            Ok(None) => {}
            Err(_) => error!("Processing line {} failed; continuing", index + 1),
        }
    }

    debug!(
        "Scanned document against Octopus {}: {} finding(s)",
        catalog.version(),
        findings.len()
    );
    findings
}

/// Scan a whole document given as one string
pub fn scan_text(text: &str, catalog: &Catalog) -> Vec<Finding> {
    scan(text.lines(), catalog)
}

fn check_line(index: usize, line: &str, catalog: &Catalog) -> Option<Finding> {
    let assignment = parse_assignment(line)?;
    let result = validate(&assignment.variable_name, &assignment.value, catalog)?;
    if result.is_valid {
        return None;
    }

    Some(Finding {
        line: index,
        start_col: assignment.value_start,
        end_col: assignment.value_end,
        severity: Severity::Error,
        message: result.full_message(),
    })
}
