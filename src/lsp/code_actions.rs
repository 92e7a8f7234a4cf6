//! Quick fixes for invalid values

use super::diagnostics::DIAGNOSTIC_SOURCE;
use super::document::position;
use crate::catalog::Catalog;
use crate::parser::parse_assignment;
use std::collections::HashMap;
use tower_lsp::lsp_types::{
    CodeAction, CodeActionKind, CodeActionOrCommand, Diagnostic, Range, TextEdit, Url,
    WorkspaceEdit,
};

/// How many option values are offered as separate fixes
pub const MAX_OPTION_FIXES: usize = 5;

/// Quick fixes for the `octopus` diagnostics in a code-action request.
///
/// `line_text` resolves a line index to its current text.
pub fn quick_fixes<F>(
    uri: &Url,
    diagnostics: &[Diagnostic],
    catalog: &Catalog,
    line_text: F,
) -> Vec<CodeActionOrCommand>
where
    F: Fn(usize) -> Option<String>,
{
    let mut actions = Vec::new();

    for diagnostic in diagnostics {
        if diagnostic.source.as_deref() != Some(DIAGNOSTIC_SOURCE) {
            continue;
        }
        let line_index = diagnostic.range.start.line as usize;
        let Some(line) = line_text(line_index) else {
            continue;
        };
        let Some(assignment) = parse_assignment(&line) else {
            continue;
        };
        let Some(spec) = catalog.get(&assignment.variable_name) else {
            continue;
        };

        let value_range = Range {
            start: position(line_index, &line, assignment.value_start),
            end: position(line_index, &line, assignment.value_end),
        };

        if spec.has_options() {
            for option in spec.options.iter().take(MAX_OPTION_FIXES) {
                actions.push(replace_value(
                    uri,
                    diagnostic,
                    value_range,
                    format!("Set to '{}'", option.name),
                    &option.name,
                ));
            }
        } else if let Some(default) = spec.first_default() {
            actions.push(replace_value(
                uri,
                diagnostic,
                value_range,
                format!("Set to default value '{}'", default),
                default,
            ));
        }
    }

    actions
}

fn replace_value(
    uri: &Url,
    diagnostic: &Diagnostic,
    range: Range,
    title: String,
    new_text: &str,
) -> CodeActionOrCommand {
    let edit = TextEdit {
        range,
        new_text: new_text.to_string(),
    };
    CodeActionOrCommand::CodeAction(CodeAction {
        title,
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: Some(vec![diagnostic.clone()]),
        edit: Some(WorkspaceEdit {
            changes: Some(HashMap::from([(uri.clone(), vec![edit])])),
            ..Default::default()
        }),
        ..Default::default()
    })
}
