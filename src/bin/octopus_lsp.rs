//! Octopus Language Server
//!
//! Run with: octopus-lsp
//!
//! Speaks LSP on stdin/stdout. Logs go to stderr, filtered by `OCTOPUS_LOG`.

use octopus_tools::lsp::run_lsp_server;

#[tokio::main]
async fn main() {
    run_lsp_server().await;
}
