//! Open-document state for the language server

use ropey::Rope;
use tower_lsp::lsp_types::Position;

/// An open Octopus input file
#[derive(Debug, Clone)]
pub struct OctoDocument {
    /// Document content as a rope (efficient for edits)
    pub content: Rope,
    /// Client-side document version
    pub version: i32,
}

impl OctoDocument {
    pub fn new(content: &str, version: i32) -> Self {
        Self {
            content: Rope::from_str(content),
            version,
        }
    }

    /// Replace the whole text (full sync)
    pub fn update(&mut self, content: &str, version: i32) {
        self.content = Rope::from_str(content);
        self.version = version;
    }

    pub fn text(&self) -> String {
        self.content.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.content.len_lines()
    }

    /// Line text without its line terminator
    pub fn line(&self, index: usize) -> Option<String> {
        if index >= self.content.len_lines() {
            return None;
        }
        let line = self.content.line(index).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Every line, terminators stripped
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count()).filter_map(|i| self.line(i)).collect()
    }
}

/// Convert a character column to the UTF-16 column LSP positions use
pub fn char_to_utf16(line: &str, char_col: usize) -> u32 {
    line.chars()
        .take(char_col)
        .map(char::len_utf16)
        .sum::<usize>() as u32
}

/// Convert an LSP UTF-16 column back to a character column
pub fn utf16_to_char(line: &str, utf16_col: u32) -> usize {
    let mut units = 0usize;
    let mut chars = 0usize;
    for c in line.chars() {
        if units >= utf16_col as usize {
            break;
        }
        units += c.len_utf16();
        chars += 1;
    }
    chars
}

/// LSP position of a character column on `line`
pub fn position(line_index: usize, line: &str, char_col: usize) -> Position {
    Position {
        line: line_index as u32,
        character: char_to_utf16(line, char_col),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_strip_terminators() {
        let doc = OctoDocument::new("a = 1\r\nb = 2\n", 1);
        assert_eq!(doc.line(0).as_deref(), Some("a = 1"));
        assert_eq!(doc.line(1).as_deref(), Some("b = 2"));
        assert_eq!(doc.line(2).as_deref(), Some(""));
        assert_eq!(doc.line(3), None);
    }

    #[test]
    fn test_unicode_separators_do_not_split_lines() {
        let doc = OctoDocument::new("# see note\u{2028}below\u{85}\u{c}\nExtraStates = many\rSpacing = 1\n", 1);
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.line(1).as_deref(), Some("ExtraStates = many"));
        assert_eq!(doc.line(2).as_deref(), Some("Spacing = 1"));
    }

    #[test]
    fn test_update_replaces_text() {
        let mut doc = OctoDocument::new("a = 1", 1);
        doc.update("b = 2", 2);
        assert_eq!(doc.text(), "b = 2");
        assert_eq!(doc.version, 2);
    }

    #[test]
    fn test_utf16_columns() {
        let line = "Label = \"𝜋\" # x";
        // U+1D70B needs two UTF-16 units
        assert_eq!(char_to_utf16(line, 9), 9);
        assert_eq!(char_to_utf16(line, 10), 11);
        assert_eq!(utf16_to_char(line, 11), 10);
        assert_eq!(utf16_to_char(line, 3), 3);
    }
}
