//! Octopus input-file extension for Zed
//!
//! Starts `octopus-lsp`, which provides:
//! - Diagnostics for invalid variable values
//! - Hover documentation and completion of variable names and values
//! - Quick fixes and builtin/user inlay hints
//!
//! Requires: octopus-lsp in PATH (install via `cargo install octopus-tools`)

use zed_extension_api::{self as zed, LanguageServerId, Result};

struct OctopusExtension;

impl zed::Extension for OctopusExtension {
    fn new() -> Self {
        Self
    }

    fn language_server_command(
        &mut self,
        _language_server_id: &LanguageServerId,
        worktree: &zed::Worktree,
    ) -> Result<zed::Command> {
        let path = worktree.which("octopus-lsp").ok_or_else(|| {
            "octopus-lsp not found in PATH. Install with: cargo install octopus-tools".to_string()
        })?;

        // Forward the log filter so server logs can be turned up from the shell
        let env = worktree
            .shell_env()
            .into_iter()
            .filter(|(key, _)| key == "OCTOPUS_LOG")
            .collect();

        Ok(zed::Command {
            command: path,
            args: vec![],
            env,
        })
    }
}

zed::register_extension!(OctopusExtension);
