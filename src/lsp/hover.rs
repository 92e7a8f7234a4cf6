//! Hover documentation for catalog variables

use super::document::position;
use crate::catalog::Catalog;
use crate::parser::word_at;
use crate::types::VariableSpec;
use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Range};

/// Markdown shown when hovering a variable name
pub fn hover_markdown(spec: &VariableSpec, catalog: &Catalog) -> String {
    let mut sections = vec![
        format!("## {}", spec.name),
        format!("**Version**: Octopus {}", catalog.version()),
    ];

    if let Some(url) = catalog.doc_url_for(spec) {
        sections.push(format!("[View Online Documentation]({})", url));
        sections.push("---".to_string());
    }

    sections.push(format!("**Type**: {}", spec.var_type));
    if !spec.default.is_empty() {
        sections.push(format!("**Default Value**: `{}`", spec.default.join(", ")));
    }
    if !spec.section.is_empty() {
        sections.push(format!("**Section**: {}", spec.section));
    }
    if !spec.description.is_empty() {
        sections.push(format!("**Description**: {}", spec.description_text()));
    }

    if spec.has_options() {
        sections.push("**Valid Values**:".to_string());
        let options: Vec<String> = spec
            .options
            .iter()
            .map(|opt| format!("- `{}` ({})", opt.name, opt.value))
            .collect();
        sections.push(options.join("\n"));
    }

    let mut md = sections.join("\n\n");
    md.push_str("\n\n");
    md
}

/// Hover for the word at `char_col` on `line`, if it names a known variable
pub fn hover_at(line_index: usize, line: &str, char_col: usize, catalog: &Catalog) -> Option<Hover> {
    let (word, start, end) = word_at(line, char_col)?;
    let spec = catalog.get(&word)?;

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: hover_markdown(spec, catalog),
        }),
        range: Some(Range {
            start: position(line_index, line, start),
            end: position(line_index, line, end),
        }),
    })
}
