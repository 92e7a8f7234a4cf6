//! Octopus tools - editor support for Octopus input files
//!
//! This library checks the `Name = value` lines of an Octopus input file
//! against the variable information of a given Octopus release, and serves
//! the results to editors through a language server.
//!
//! # Features
//!
//! - Version-keyed variable catalogs (14.1 and 16.2 bundled, more from disk)
//! - Per-line value validation with corrective suggestions
//! - Recognition of inline math (`0.2*angstrom`, `sqrt(2)`, `{1, 0}`)
//! - LSP: diagnostics, hover, completion, quick fixes, inlay hints
//! - Version detection from the system, the input, or workspace files
//! - Import of an installation's `varinfo` file as a new catalog
//!
//! # Example
//!
//! ```
//! use octopus_tools::catalog::Catalog;
//! use octopus_tools::core::scan_text;
//!
//! let catalog = Catalog::bundled("14.1")?;
//! let findings = scan_text("CalculationMode = gs\nExtraStates = 2.5\n", &catalog);
//!
//! assert_eq!(findings.len(), 1);
//! assert_eq!(findings[0].line, 1);
//! # Ok::<(), octopus_tools::error::OctoError>(())
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod grammar;
pub mod logging;
pub mod lsp;
pub mod parser;
pub mod types;
pub mod varinfo;
pub mod version;

// Re-export commonly used types
pub use catalog::Catalog;
pub use error::{OctoError, OctoResult};
pub use types::{AssignmentRecord, Finding, ValidationResult, VarType, VariableSpec};
