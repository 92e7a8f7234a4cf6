//! Whole-document scanning tests

use octopus_tools::catalog::Catalog;
use octopus_tools::core::diagnostics::is_skipped_line;
use octopus_tools::core::{scan, scan_text};
use octopus_tools::types::Severity;
use pretty_assertions::assert_eq;
use std::fs;

fn catalog() -> Catalog {
    Catalog::bundled("14.1").expect("bundled catalog loads")
}

// ═══════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_valid_input_has_no_findings() {
    let text = fs::read_to_string("test-data/gs.inp").unwrap();
    let findings = scan_text(&text, &catalog());
    assert!(findings.is_empty(), "unexpected findings: {:?}", findings);
}

#[test]
fn test_invalid_input_findings_in_order() {
    let text = fs::read_to_string("test-data/invalid.inp").unwrap();
    let findings = scan_text(&text, &catalog());

    let lines: Vec<usize> = findings.iter().map(|f| f.line).collect();
    assert_eq!(lines, vec![1, 2, 3, 4, 5]);
    assert!(findings.iter().all(|f| f.severity == Severity::Error));

    assert_eq!(
        findings[0].message,
        "Invalid value 'cube' (Valid values: sphere, cylinder, minimum, parallelepiped, box_image, user_defined)"
    );
    assert_eq!((findings[0].start_col, findings[0].end_col), (11, 15));
    assert!(findings[4].message.starts_with("Invalid options: not_a_functional"));
}

// ═══════════════════════════════════════════════════════════════════════════
// LINE HANDLING
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_single_invalid_line_among_valid_ones() {
    let lines = [
        "CalculationMode = gs",
        "Spacing = 0.3",
        "ExtraStates = many",
        "FromScratch = yes",
    ];
    let findings = scan(lines, &catalog());
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].line, 2);
    assert_eq!(findings[0].start_col, 14);
    assert_eq!(findings[0].end_col, 18);
    assert_eq!(
        findings[0].to_string(),
        "3:15: error: 'many' is not a valid integer (Expected integer value, e.g.: 0)"
    );
}

#[test]
fn test_skipped_lines() {
    assert!(is_skipped_line(""));
    assert!(is_skipped_line("   "));
    assert!(is_skipped_line("# ExtraStates = many"));
    assert!(is_skipped_line("%Coordinates"));
    assert!(is_skipped_line("  - ExtraStates = many"));
    assert!(!is_skipped_line("ExtraStates = many"));

    let text = "# ExtraStates = many\n%ExtraStates = many\n-ExtraStates = many\n";
    assert!(scan_text(text, &catalog()).is_empty());
}

#[test]
fn test_unknown_variables_and_malformed_lines_ignored() {
    let text = "myvar = ???\nthis is not an assignment\n\"H\" | 1 | 2\n";
    assert!(scan_text(text, &catalog()).is_empty());
}

#[test]
fn test_comment_truncation_applies_before_validation() {
    let findings = scan_text("ExtraStates = 4 # was 2.5\nBoxShape = sphere#cube\n", &catalog());
    assert!(findings.is_empty());
}

#[test]
fn test_empty_document() {
    assert!(scan_text("", &catalog()).is_empty());
}

#[test]
fn test_adversarial_lines_do_not_abort_scan() {
    let lines = [
        "Spacing = {1, ",
        "ExtraStates = # x",
        "BoxShape = +",
        "XCFunctional = ++",
        "CalculationMode = gs",
    ];
    let findings = scan(lines, &catalog());

    let spans: Vec<(usize, usize, usize)> = findings
        .iter()
        .map(|f| (f.line, f.start_col, f.end_col))
        .collect();
    assert_eq!(spans, vec![(0, 10, 13), (1, 11, 11), (2, 11, 12), (3, 15, 17)]);

    assert_eq!(
        findings[0].message,
        "'{1,' is not a valid float or mathematical expression \
         (Expected float or mathematical expression, e.g.: 0.4 or 3.5 * angstrom)"
    );
    assert_eq!(
        findings[1].message,
        "'' is not a valid integer (Expected integer value, e.g.: 0)"
    );
    assert_eq!(
        findings[2].message,
        "Invalid options: ,  (Valid values: sphere, cylinder, minimum, parallelepiped, box_image, user_defined)"
    );
    assert!(findings[3].message.starts_with("Invalid options: , ,  (Valid values: none, lda_x"));
}
