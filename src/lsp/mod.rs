//! LSP server for Octopus input files
//!
//! Provides Language Server Protocol support for:
//! - Value diagnostics as you type
//! - Hover documentation with links to the online manual
//! - Completion of variable names and their allowed values
//! - Quick fixes replacing an invalid value
//! - Inlay hints telling builtin variables from user-defined ones
//! - Commands to switch or detect the Octopus version
//!
//! One server for every editor: VSCode, vim, emacs, Zed, etc.

pub mod capabilities;
pub mod code_actions;
pub mod completion;
pub mod diagnostics;
pub mod document;
pub mod hover;
pub mod inlay_hints;
pub mod server;

pub use server::run_lsp_server;
pub use server::OctopusLsp;
