//! Core checks: expression detection, value validation and document scanning

pub mod diagnostics;
pub mod math;
pub mod validator;

pub use diagnostics::{scan, scan_text};
pub use math::looks_mathematical;
pub use validator::validate;
