//! CLI support for sqldoc
//!
//! Provides programmatic access to the sqldoc commands so the binary stays a
//! thin argument parser and the behavior can be tested directly.

mod compile;
mod docs;
mod serve;

pub use compile::{CompileOutput, CompileRequest, execute_compile};
pub use docs::{get_annotation_doc, get_syntax_overview};
pub use serve::{DEFAULT_MAX_BODY, DEFAULT_PORT, ServeOptions, handle_connection, serve};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Scan or compile failure
    #[error("{0}")]
    Pipeline(#[from] crate::Error),

    /// JSON encoding error
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No input provided
    #[error("No input provided. Pass a file or pipe SQL to stdin.")]
    NoInput,

    /// Unknown annotation name
    #[error("Unknown annotation: '{0}'\nRun 'sqldoc syntax' to see available annotations.")]
    UnknownAnnotation(String),
}
