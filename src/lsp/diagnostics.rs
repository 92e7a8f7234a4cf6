//! Conversion of scan findings to LSP diagnostics

use super::document::{position, OctoDocument};
use crate::catalog::Catalog;
use crate::core::scan;
use crate::types::{Finding, Severity};
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Range};

/// Value of `Diagnostic::source` for everything this server reports
pub const DIAGNOSTIC_SOURCE: &str = "octopus";

/// Scan an open document and convert the findings
pub fn document_diagnostics(doc: &OctoDocument, catalog: &Catalog) -> Vec<Diagnostic> {
    let lines = doc.lines();
    scan(&lines, catalog)
        .iter()
        .map(|finding| {
            let line = lines.get(finding.line).map(String::as_str).unwrap_or("");
            finding_to_diagnostic(finding, line)
        })
        .collect()
}

pub fn finding_to_diagnostic(finding: &Finding, line: &str) -> Diagnostic {
    Diagnostic {
        range: Range {
            start: position(finding.line, line, finding.start_col),
            end: position(finding.line, line, finding.end_col),
        },
        severity: Some(match finding.severity {
            Severity::Error => DiagnosticSeverity::ERROR,
        }),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: finding.message.clone(),
        ..Default::default()
    }
}
