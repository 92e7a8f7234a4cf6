//! Inlay hints marking variables as builtin or user-defined

use super::document::{position, OctoDocument};
use crate::catalog::Catalog;
use crate::config::InlayHintSettings;
use crate::parser::{parse_assignment, parse_block_start};
use tower_lsp::lsp_types::{InlayHint, InlayHintKind, InlayHintLabel, InlayHintTooltip};

fn hint(line_index: usize, line: &str, col: usize, label: &str, tooltip: String) -> InlayHint {
    InlayHint {
        position: position(line_index, line, col),
        label: InlayHintLabel::String(label.to_string()),
        kind: Some(InlayHintKind::TYPE),
        text_edits: None,
        tooltip: Some(InlayHintTooltip::String(tooltip)),
        padding_left: Some(false),
        padding_right: Some(false),
        data: None,
    }
}

/// Hints for lines `start_line..=end_line` of `doc`
pub fn inlay_hints(
    doc: &OctoDocument,
    start_line: usize,
    end_line: usize,
    catalog: &Catalog,
    settings: &InlayHintSettings,
) -> Vec<InlayHint> {
    if !settings.enabled {
        return Vec::new();
    }

    let mut hints = Vec::new();
    let last = end_line.min(doc.line_count().saturating_sub(1));

    for line_index in start_line..=last {
        let Some(line) = doc.line(line_index) else {
            continue;
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(assignment) = parse_assignment(&line) {
            let builtin = catalog.contains(&assignment.variable_name);
            if builtin && settings.show_builtin {
                hints.push(hint(
                    line_index,
                    &line,
                    assignment.var_end,
                    " [builtin]",
                    format!(
                        "Built-in Octopus {} variable: {}",
                        catalog.version(),
                        assignment.variable_name
                    ),
                ));
            } else if !builtin && settings.show_user {
                hints.push(hint(
                    line_index,
                    &line,
                    assignment.var_end,
                    " [user]",
                    format!("User-defined variable: {}", assignment.variable_name),
                ));
            }
        } else if let Some(block) = parse_block_start(&line) {
            let builtin = catalog.contains(&block.block_name);
            if builtin && settings.show_builtin {
                hints.push(hint(
                    line_index,
                    &line,
                    block.end,
                    " [builtin block]",
                    format!(
                        "Built-in Octopus {} block: {}",
                        catalog.version(),
                        block.block_name
                    ),
                ));
            } else if !builtin && settings.show_user {
                hints.push(hint(
                    line_index,
                    &line,
                    block.end,
                    " [user block]",
                    format!("User-defined block: {}", block.block_name),
                ));
            }
        }
    }

    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "# comment\nCalculationMode = gs\nmyradius = 5\n\n%Species\n\"H\" | 1\n%\n%MyTable\n%\n";

    fn labels(hints: &[InlayHint]) -> Vec<(u32, u32, String)> {
        hints
            .iter()
            .map(|h| {
                let InlayHintLabel::String(label) = &h.label else {
                    panic!("expected string label");
                };
                (h.position.line, h.position.character, label.clone())
            })
            .collect()
    }

    #[test]
    fn test_builtin_and_user_markers() {
        let catalog = Catalog::bundled("14.1").unwrap();
        let doc = OctoDocument::new(INPUT, 1);
        let hints = inlay_hints(&doc, 0, 100, &catalog, &InlayHintSettings::default());
        assert_eq!(
            labels(&hints),
            vec![
                (1, 15, " [builtin]".to_string()),
                (2, 8, " [user]".to_string()),
                (4, 8, " [builtin block]".to_string()),
                (7, 8, " [user block]".to_string()),
            ]
        );
    }

    #[test]
    fn test_settings_gate_hints() {
        let catalog = Catalog::bundled("14.1").unwrap();
        let doc = OctoDocument::new(INPUT, 1);

        let disabled = InlayHintSettings {
            enabled: false,
            ..Default::default()
        };
        assert!(inlay_hints(&doc, 0, 100, &catalog, &disabled).is_empty());

        let builtin_only = InlayHintSettings {
            show_user: false,
            ..Default::default()
        };
        let hints = inlay_hints(&doc, 0, 100, &catalog, &builtin_only);
        assert_eq!(hints.len(), 2);
    }

    #[test]
    fn test_range_is_respected() {
        let catalog = Catalog::bundled("14.1").unwrap();
        let doc = OctoDocument::new(INPUT, 1);
        let hints = inlay_hints(&doc, 2, 2, &catalog, &InlayHintSettings::default());
        assert_eq!(labels(&hints), vec![(2, 8, " [user]".to_string())]);
    }
}
