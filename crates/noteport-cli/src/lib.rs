//! Noteport CLI library
//!
//! Command-line front end for vault scanning and import: argument parsing,
//! logging setup, vault traversal and the `scan` / `import` / `parse`
//! commands.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;
pub mod vault;
