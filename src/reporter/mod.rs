//! Output formats for findings.

pub mod console;
pub mod json;
pub mod sarif;
