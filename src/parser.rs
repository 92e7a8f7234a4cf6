//! Line-oriented parsing of Octopus input files
//!
//! The input language has no reliable grammar to build an AST from, so every
//! operation here works on a single line of text.

use crate::types::{AssignmentRecord, BlockStart};
use regex::Regex;
use std::sync::LazyLock;

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z0-9_]*)\s*=\s*(.+)$").expect("assignment pattern is valid")
});

static PARTIAL_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z0-9_]*)\s*=\s*(.*)$")
        .expect("partial assignment pattern is valid")
});

static BLOCK_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*%([A-Za-z][A-Za-z0-9_]*)\s*$").expect("block start pattern is valid")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

const DOC_BASE_URL: &str = "https://octopus-code.org/documentation";

/// Parse a `Name = value` assignment.
///
/// Everything from the first `#` of the value onwards is treated as a comment,
/// including a `#` that is part of a path or a quoted string.
///
/// Offsets come from first-occurrence searches of the name and value text, so
/// they can point at an earlier repeat of the same text on unusual lines.
pub fn parse_assignment(line: &str) -> Option<AssignmentRecord> {
    let caps = ASSIGNMENT.captures(line)?;
    let variable_name = caps.get(1)?.as_str().trim().to_string();
    let tail = caps.get(2)?.as_str();

    let value = match tail.find('#') {
        Some(idx) => tail[..idx].trim(),
        None => tail.trim(),
    }
    .to_string();

    let var_start = char_find(line, &variable_name, 0).unwrap_or(0);
    let var_end = var_start + variable_name.chars().count();
    let value_start = char_find(line, &value, var_end).unwrap_or(var_end);
    let value_end = value_start + value.chars().count();

    Some(AssignmentRecord {
        variable_name,
        value,
        var_start,
        var_end,
        value_start,
        value_end,
    })
}

/// Parse the text left of the cursor as an assignment that is still being typed.
///
/// Returns the variable name and whatever has been typed after `=`, which may
/// be empty.
pub fn parse_partial_assignment(text: &str) -> Option<(String, String)> {
    let caps = PARTIAL_ASSIGNMENT.captures(text)?;
    Some((caps[1].trim().to_string(), caps[2].to_string()))
}

/// Parse a `%BlockName` opening marker
pub fn parse_block_start(line: &str) -> Option<BlockStart> {
    let caps = BLOCK_START.captures(line)?;
    let block_name = caps[1].to_string();
    let start = char_find(line, "%", 0)?;
    let end = start + 1 + block_name.chars().count();
    Some(BlockStart {
        block_name,
        start,
        end,
    })
}

/// Derive the online documentation link for a variable.
///
/// `Mesh::Simulation Box` / `BoxShape` under version `14.1` becomes
/// `https://octopus-code.org/documentation/14/variables/mesh/simulation_box/boxshape/`.
pub fn doc_url(version: &str, section: &str, name: &str) -> Option<String> {
    if section.trim().is_empty() || name.trim().is_empty() {
        return None;
    }

    let major = version.split('.').next().unwrap_or(version);
    let section_path = section.replace("::", "/").to_lowercase();
    let section_path = WHITESPACE_RUN.replace_all(section_path.trim(), "_");

    Some(format!(
        "{}/{}/variables/{}/{}/",
        DOC_BASE_URL,
        major,
        section_path,
        name.to_lowercase()
    ))
}

/// Extract the identifier touching character column `char_pos`.
///
/// Returns the word and its `[start, end)` character range.
pub fn word_at(line: &str, char_pos: usize) -> Option<(String, usize, usize)> {
    let chars: Vec<char> = line.chars().collect();
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    // A cursor sitting right after the last character still touches the word
    let anchor = if char_pos < chars.len() && is_word(chars[char_pos]) {
        char_pos
    } else if char_pos > 0 && char_pos <= chars.len() && is_word(chars[char_pos - 1]) {
        char_pos - 1
    } else {
        return None;
    };

    let mut start = anchor;
    let mut end = anchor + 1;
    while start > 0 && is_word(chars[start - 1]) {
        start -= 1;
    }
    while end < chars.len() && is_word(chars[end]) {
        end += 1;
    }

    Some((chars[start..end].iter().collect(), start, end))
}

/// Character index of the first `needle` at or after character column `from`
fn char_find(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let byte_from = haystack
        .char_indices()
        .nth(from)
        .map(|(idx, _)| idx)
        .unwrap_or(haystack.len());
    let found = haystack[byte_from..].find(needle)?;
    Some(haystack[..byte_from + found].chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_assignment() {
        let rec = parse_assignment("variable = value").unwrap();
        assert_eq!(
            rec,
            AssignmentRecord {
                variable_name: "variable".to_string(),
                value: "value".to_string(),
                var_start: 0,
                var_end: 8,
                value_start: 11,
                value_end: 16,
            }
        );
    }

    #[test]
    fn test_padded_assignment() {
        let rec = parse_assignment("  myVar  =  some value  ").unwrap();
        assert_eq!(rec.variable_name, "myVar");
        assert_eq!(rec.value, "some value");
        assert_eq!((rec.var_start, rec.var_end), (2, 7));
        assert_eq!((rec.value_start, rec.value_end), (12, 22));
    }

    #[test]
    fn test_value_truncated_at_first_hash() {
        let rec = parse_assignment("path = /path/to/file#name # comment").unwrap();
        assert_eq!(rec.value, "/path/to/file");
        assert_eq!((rec.value_start, rec.value_end), (7, 20));
    }

    #[test]
    fn test_comment_only_value_is_empty() {
        let rec = parse_assignment("Spacing = # to be decided").unwrap();
        assert_eq!(rec.value, "");
        assert_eq!(rec.value_start, rec.value_end);
    }

    #[test]
    fn test_non_assignments() {
        assert!(parse_assignment("").is_none());
        assert!(parse_assignment("invalid line").is_none());
        assert!(parse_assignment("1invalid = value").is_none());
        assert!(parse_assignment("%Coordinates").is_none());
        assert!(parse_assignment("Spacing =").is_none());
    }

    #[test]
    fn test_offsets_count_characters_not_bytes() {
        let rec = parse_assignment("Label = \"Å\" # unit").unwrap();
        assert_eq!(rec.value, "\"Å\"");
        assert_eq!((rec.value_start, rec.value_end), (8, 11));
    }

    #[test]
    fn test_block_start() {
        let block = parse_block_start("  %Coordinates  ").unwrap();
        assert_eq!(block.block_name, "Coordinates");
        assert_eq!((block.start, block.end), (2, 14));
        assert!(parse_block_start("%").is_none());
        assert!(parse_block_start("% Coordinates extra").is_none());
    }

    #[test]
    fn test_partial_assignment() {
        assert_eq!(
            parse_partial_assignment("CalculationMode = "),
            Some(("CalculationMode".to_string(), String::new()))
        );
        assert_eq!(
            parse_partial_assignment("  BoxShape=sph"),
            Some(("BoxShape".to_string(), "sph".to_string()))
        );
        assert_eq!(parse_partial_assignment("BoxSha"), None);
    }

    #[test]
    fn test_doc_url() {
        assert_eq!(
            doc_url("16.2", "Mesh::Simulation Box", "BoxShape").as_deref(),
            Some("https://octopus-code.org/documentation/16/variables/mesh/simulation_box/boxshape/")
        );
        assert_eq!(
            doc_url("14.1", "Time-Dependent::TD Output", "TDOutput").as_deref(),
            Some("https://octopus-code.org/documentation/14/variables/time-dependent/td_output/tdoutput/")
        );
        assert_eq!(doc_url("14.1", "", "Spacing"), None);
        assert_eq!(doc_url("14.1", "Mesh", ""), None);
    }

    #[test]
    fn test_word_at() {
        let line = "BoxShape = sphere";
        assert_eq!(word_at(line, 3), Some(("BoxShape".to_string(), 0, 8)));
        assert_eq!(word_at(line, 8), Some(("BoxShape".to_string(), 0, 8)));
        assert_eq!(word_at(line, 9), None);
        assert_eq!(word_at(line, 17), Some(("sphere".to_string(), 11, 17)));
        assert_eq!(word_at(line, 40), None);
    }
}
