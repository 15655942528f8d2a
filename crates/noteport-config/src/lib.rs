//! # Noteport Configuration
//!
//! Typed configuration for vault scanning, schema generation and import.
//!
//! Values are layered with precedence defaults < config file < environment,
//! and the binary applies command-line flags last.
//!
//! ```rust,no_run
//! use noteport_config::ConfigLoader;
//!
//! let config = ConfigLoader::load(None)?;
//! assert!(config.scan.sample_limit > 0);
//! # Ok::<(), noteport_config::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod loader;

pub use config::*;
pub use loader::*;
