//! Incremental reStructuredText documentation generator for LPC mudlib
//! sources.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;

pub use error::{Result, RstdocError};
