//! LSP capabilities for the Octopus server
//!
//! Defines what features the server advertises and the commands it accepts.

use tower_lsp::lsp_types::*;

pub const CMD_SWITCH_VERSION: &str = "octopus.switchVersion";
pub const CMD_DETECT_SYSTEM_VERSION: &str = "octopus.detectSystemVersion";
pub const CMD_AUTO_DETECT_VERSION: &str = "octopus.autoDetectVersion";
pub const CMD_TOGGLE_INLAY_HINTS: &str = "octopus.toggleInlayHints";
pub const CMD_SHOW_VARIABLES: &str = "octopus.showVariables";

/// Every command handled by `workspace/executeCommand`
pub const COMMANDS: &[&str] = &[
    CMD_SWITCH_VERSION,
    CMD_DETECT_SYSTEM_VERSION,
    CMD_AUTO_DETECT_VERSION,
    CMD_TOGGLE_INLAY_HINTS,
    CMD_SHOW_VARIABLES,
];

/// Get the server capabilities for the Octopus LSP
pub fn get_server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        // Full document sync - every line is re-validated on change
        text_document_sync: Some(TextDocumentSyncCapability::Kind(
            TextDocumentSyncKind::FULL,
        )),

        // Variable names, then values after `=`
        completion_provider: Some(CompletionOptions {
            trigger_characters: Some(vec!["=".to_string(), " ".to_string()]),
            resolve_provider: Some(false),
            ..Default::default()
        }),

        hover_provider: Some(HoverProviderCapability::Simple(true)),

        code_action_provider: Some(CodeActionProviderCapability::Options(CodeActionOptions {
            code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
            ..Default::default()
        })),

        inlay_hint_provider: Some(OneOf::Left(true)),

        execute_command_provider: Some(ExecuteCommandOptions {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }),

        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_advertise_commands() {
        let caps = get_server_capabilities();
        let commands = caps.execute_command_provider.unwrap().commands;
        assert_eq!(commands.len(), 5);
        assert!(commands.contains(&"octopus.switchVersion".to_string()));
        assert!(caps.hover_provider.is_some());
        assert!(caps.inlay_hint_provider.is_some());
    }
}
