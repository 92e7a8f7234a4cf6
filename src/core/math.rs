//! Detection of inline mathematical expressions in values
//!
//! Octopus evaluates numeric values through its parser, so `3.5 * angstrom`,
//! `sqrt(2)` or `{0.5, -0.5}` are all acceptable wherever a float is
//! expected. These helpers only classify a value; nothing is evaluated.
//!
//! [`PREDEFINED_CONSTANTS`] and [`MATH_FUNCTIONS`] also feed the generated
//! syntax grammar (see [`crate::grammar`]), so highlighting and validation
//! always agree on what counts as a constant or a function.

use regex::Regex;
use std::sync::LazyLock;

/// Constants and units predefined by the Octopus parser
pub const PREDEFINED_CONSTANTS: &[&str] = &[
    "pi", "e", "i", "angstrom", "pm", "picometer", "nm", "nanometer", "ry", "rydberg", "eV",
    "electronvolt", "invcm", "kelvin", "kjoule_mol", "kcal_mol", "as", "attosecond", "fs",
    "femtosecond", "ps", "picosecond", "c", "x", "y", "z", "r", "w", "t",
];

/// Functions understood by the Octopus parser
pub const MATH_FUNCTIONS: &[&str] = &[
    "sqrt", "exp", "log", "ln", "log10", "logb", "logabs", "arg", "abs", "abs2", "conjg", "inv",
    "sin", "cos", "tan", "cot", "sec", "csc", "asin", "acos", "atan", "acot", "asec", "acsc",
    "atan2", "sinh", "cosh", "tanh", "coth", "sech", "csch", "asinh", "acosh", "atanh", "acoth",
    "asech", "acsch", "min", "max", "step", "erf", "realpart", "imagpart", "floor", "ceiling",
];

const OPERATORS: &[char] = &['+', '-', '*', '/', '^'];

static CONSTANT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation(PREDEFINED_CONSTANTS)))
        .expect("constant pattern is valid")
});

static FUNCTION_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\s*\(", alternation(MATH_FUNCTIONS)))
        .expect("function pattern is valid")
});

static COMPLEX_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\s*[^,}\s]+\s*,\s*[^,}\s]+\s*\}").expect("complex literal pattern is valid")
});

/// `a|b|c` with every word regex-escaped
pub fn alternation(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

/// Does the value look like something Octopus would compute rather than a literal?
///
/// A leading minus counts as an operator, so `-1.5` is classified as an
/// expression.
pub fn looks_mathematical(value: &str) -> bool {
    value.contains(OPERATORS)
        || CONSTANT.is_match(value)
        || FUNCTION_CALL.is_match(value)
        || COMPLEX_LITERAL.is_match(value)
}
