//! Value validation against the bundled catalogs

use octopus_tools::catalog::Catalog;
use octopus_tools::core::validate;
use pretty_assertions::assert_eq;

fn catalog() -> Catalog {
    Catalog::bundled("14.1").expect("bundled catalog loads")
}

// ═══════════════════════════════════════════════════════════════════════════
// UNKNOWN VARIABLES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_unknown_variable_has_no_opinion() {
    assert!(validate("MyOwnRadius", "anything", &catalog()).is_none());
    assert!(validate("", "1", &catalog()).is_none());
}

#[test]
fn test_lookup_ignores_case() {
    let c = catalog();
    assert!(validate("calculationmode", "gs", &c).unwrap().is_valid);
    assert!(validate("CALCULATIONMODE", "gs", &c).unwrap().is_valid);
}

// ═══════════════════════════════════════════════════════════════════════════
// OPTIONS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_option_name_or_value_accepted() {
    let c = catalog();
    assert!(validate("CalculationMode", "td", &c).unwrap().is_valid);
    assert!(validate("CalculationMode", "GS", &c).unwrap().is_valid);
    assert!(validate("CalculationMode", "3", &c).unwrap().is_valid);
    assert!(validate("BoxShape", "'sphere'", &c).unwrap().is_valid);
}

#[test]
fn test_invalid_option_message() {
    let result = validate("BoxShape", "cube", &catalog()).unwrap();
    assert!(!result.is_valid);
    assert_eq!(result.message.as_deref(), Some("Invalid value 'cube'"));
    assert_eq!(
        result.suggestion.as_deref(),
        Some("Valid values: sphere, cylinder, minimum, parallelepiped, box_image, user_defined")
    );
    assert_eq!(
        result.full_message(),
        "Invalid value 'cube' (Valid values: sphere, cylinder, minimum, parallelepiped, box_image, user_defined)"
    );
}

#[test]
fn test_combined_options() {
    let c = catalog();
    assert!(validate("XCFunctional", "lda_x + lda_c_pz_mod", &c).unwrap().is_valid);
    assert!(validate("XCFunctional", "gga_x_pbe+gga_c_pbe", &c).unwrap().is_valid);

    let result = validate("XCFunctional", "lda_x + foo + bar", &c).unwrap();
    assert!(!result.is_valid);
    assert_eq!(result.message.as_deref(), Some("Invalid options: foo, bar"));
    assert!(result.suggestion.unwrap().ends_with("..."));
}

// ═══════════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_integer_values() {
    let c = catalog();
    assert!(validate("ExtraStates", "4", &c).unwrap().is_valid);
    assert!(validate("ExtraStates", "-1", &c).unwrap().is_valid);

    let result = validate("ExtraStates", "2.5", &c).unwrap();
    assert!(!result.is_valid);
    assert_eq!(result.message.as_deref(), Some("'2.5' is not a valid integer"));
    assert_eq!(
        result.suggestion.as_deref(),
        Some("Expected integer value, e.g.: 0")
    );
}

#[test]
fn test_float_values_and_expressions() {
    let c = catalog();
    for value in ["0.3", "-0.5", ".25", "1e-6", "2.5E+3", "0.2*angstrom", "sqrt(2)/2", "pi", "{1, 0}"] {
        assert!(
            validate("Spacing", value, &c).unwrap().is_valid,
            "{} should be a valid float",
            value
        );
    }

    let result = validate("Spacing", "fine", &c).unwrap();
    assert!(!result.is_valid);
    assert_eq!(
        result.message.as_deref(),
        Some("'fine' is not a valid float or mathematical expression")
    );
    assert_eq!(
        result.suggestion.as_deref(),
        Some("Expected float or mathematical expression, e.g.: 0.4 or 3.5 * angstrom")
    );
}

#[test]
fn test_logical_values() {
    let c = catalog();
    for value in ["yes", "NO", "true", ".false.", "1", "0"] {
        assert!(validate("FromScratch", value, &c).unwrap().is_valid);
    }
    let result = validate("FromScratch", "maybe", &c).unwrap();
    assert_eq!(
        result.message.as_deref(),
        Some("'maybe' is not a valid logical value")
    );
    assert_eq!(
        result.suggestion.as_deref(),
        Some("Valid values: true, false, yes, no")
    );
}

#[test]
fn test_string_and_block_types_accept_anything() {
    let c = catalog();
    assert!(validate("WorkDir", "\"./run\"", &c).unwrap().is_valid);
    assert!(validate("Coordinates", "whatever", &c).unwrap().is_valid);
}
