//! CLI command handlers

pub mod commands;

pub use commands::{
    check, detect_version, grammar, import_varinfo, info, vars, watch, CatalogArgs,
};
