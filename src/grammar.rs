//! Syntax-highlighting grammar generation
//!
//! Produces a TextMate grammar for Octopus input files. Variable names come
//! from the active catalog; constants and functions come from
//! [`crate::core::math`], the same lists the expression detector uses.

use crate::catalog::Catalog;
use crate::core::math::{alternation, MATH_FUNCTIONS, PREDEFINED_CONSTANTS};
use serde_json::{json, Value};

/// Build the complete tmLanguage document
pub fn tm_grammar(catalog: &Catalog) -> Value {
    let mut names: Vec<&str> = catalog.iter().map(|spec| spec.name.as_str()).collect();
    // Longer names first so a prefix never shadows a full variable name
    names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    json!({
        "$schema": "https://raw.githubusercontent.com/martinring/tmlanguage/master/tmlanguage.json",
        "name": "Octopus",
        "scopeName": "source.octopus",
        "patterns": [
            { "include": "#comments" },
            { "include": "#blocks" },
            { "include": "#variables" },
            { "include": "#functions" },
            { "include": "#constants" },
            { "include": "#strings" },
            { "include": "#numbers" },
            { "include": "#operators" }
        ],
        "repository": {
            "comments": {
                "patterns": [{
                    "name": "comment.line.number-sign.octopus",
                    "match": "#.*$"
                }]
            },
            "blocks": {
                "patterns": [
                    {
                        "name": "keyword.control.block.begin.octopus",
                        "match": "^\\s*%[A-Za-z][A-Za-z0-9_]*\\s*$"
                    },
                    {
                        "name": "keyword.control.block.end.octopus",
                        "match": "^\\s*%\\s*$"
                    }
                ]
            },
            "variables": {
                "patterns": [{
                    "name": "variable.parameter.octopus",
                    "match": format!("(?i)\\b({})\\b", alternation(&names))
                }]
            },
            "functions": {
                "patterns": [{
                    "name": "support.function.math.octopus",
                    "match": format!("(?i)\\b({})(?=\\s*\\()", alternation(MATH_FUNCTIONS))
                }]
            },
            "constants": {
                "patterns": [{
                    "name": "constant.language.octopus",
                    "match": format!("(?i)\\b({})\\b", alternation(PREDEFINED_CONSTANTS))
                }]
            },
            "strings": {
                "patterns": [
                    {
                        "name": "string.quoted.double.octopus",
                        "begin": "\"",
                        "end": "\""
                    },
                    {
                        "name": "string.quoted.single.octopus",
                        "begin": "'",
                        "end": "'"
                    }
                ]
            },
            "numbers": {
                "patterns": [{
                    "name": "constant.numeric.octopus",
                    "match": "\\b[0-9]+(\\.[0-9]*)?([eE][+-]?[0-9]+)?\\b"
                }]
            },
            "operators": {
                "patterns": [{
                    "name": "keyword.operator.octopus",
                    "match": "[+\\-*/^=|]"
                }]
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_uses_shared_lists() {
        let catalog = Catalog::bundled("14.1").unwrap();
        let grammar = tm_grammar(&catalog);
        let functions = grammar["repository"]["functions"]["patterns"][0]["match"]
            .as_str()
            .unwrap();
        for f in MATH_FUNCTIONS {
            assert!(functions.contains(f), "missing function {}", f);
        }
        let constants = grammar["repository"]["constants"]["patterns"][0]["match"]
            .as_str()
            .unwrap();
        assert!(constants.contains("angstrom"));
        let variables = grammar["repository"]["variables"]["patterns"][0]["match"]
            .as_str()
            .unwrap();
        assert!(variables.contains("CalculationMode"));
    }
}
