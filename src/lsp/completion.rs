//! Completion for variable names and values

use crate::catalog::Catalog;
use crate::parser::parse_partial_assignment;
use crate::types::VarType;
use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, Documentation, MarkupContent, MarkupKind,
};

const LOGICAL_COMPLETIONS: &[&str] = &["true", "false", "yes", "no"];

fn markdown(value: String) -> Option<Documentation> {
    Some(Documentation::MarkupContent(MarkupContent {
        kind: MarkupKind::Markdown,
        value,
    }))
}

/// Completions for the text left of the cursor.
///
/// After `Name =` the candidates are values for that variable; anywhere else
/// they are variable names.
pub fn completions(text_before_cursor: &str, catalog: &Catalog) -> Vec<CompletionItem> {
    match parse_partial_assignment(text_before_cursor) {
        Some((name, _)) => value_completions(&name, catalog),
        None => variable_completions(catalog),
    }
}

fn value_completions(variable_name: &str, catalog: &Catalog) -> Vec<CompletionItem> {
    let Some(spec) = catalog.get(variable_name) else {
        return Vec::new();
    };
    let mut items = Vec::new();

    for opt in &spec.options {
        items.push(CompletionItem {
            label: opt.name.clone(),
            kind: Some(CompletionItemKind::VALUE),
            detail: Some(opt.value.clone()),
            documentation: markdown(format!("Optional value for **{}**", spec.name)),
            insert_text: Some(opt.name.clone()),
            ..Default::default()
        });
    }

    if let Some(default) = spec.first_default() {
        items.push(CompletionItem {
            label: default.to_string(),
            kind: Some(CompletionItemKind::VALUE),
            detail: Some("Default value".to_string()),
            documentation: markdown(format!("Default value for **{}**", spec.name)),
            insert_text: Some(default.to_string()),
            ..Default::default()
        });
    }

    if spec.var_type == VarType::Logical {
        for value in LOGICAL_COMPLETIONS {
            items.push(CompletionItem {
                label: value.to_string(),
                kind: Some(CompletionItemKind::VALUE),
                detail: Some("Logical value".to_string()),
                documentation: markdown(format!("Logical value option for **{}**", spec.name)),
                insert_text: Some(value.to_string()),
                ..Default::default()
            });
        }
    }

    items
}

fn variable_completions(catalog: &Catalog) -> Vec<CompletionItem> {
    catalog
        .iter()
        .map(|spec| {
            let insert_text = match spec.first_default() {
                Some(default) => format!("{} = {}", spec.name, default),
                None => format!("{} = ", spec.name),
            };
            CompletionItem {
                label: spec.name.clone(),
                kind: Some(CompletionItemKind::VARIABLE),
                detail: Some(spec.section.clone()),
                documentation: markdown(spec.description_text()),
                insert_text: Some(insert_text),
                ..Default::default()
            }
        })
        .collect()
}
