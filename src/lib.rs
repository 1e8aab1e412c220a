pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compiler;
pub mod output;
pub mod scanner;
pub mod source;

use std::io::Read;

pub use ast::{Column, Field, Keyword, Param, QueryDoc, Table, Token};
pub use compiler::{CompileError, CompileOptions, Compiler, TokenCursor, compile, compile_with};
pub use output::{to_json, to_json_pretty};
pub use scanner::{ScanError, Scanner, tokenize, tokenize_str};

/// Errors from running the whole scan + compile pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("compile failed: {0}")]
    Compile(#[from] CompileError),
}

/// Scan `reader` and compile the resulting tokens.
pub fn compile_source<R: Read>(reader: R) -> Result<Vec<QueryDoc>, Error> {
    compile_source_with(reader, CompileOptions::default())
}

pub fn compile_source_with<R: Read>(
    reader: R,
    options: CompileOptions,
) -> Result<Vec<QueryDoc>, Error> {
    let tokens = tokenize(reader)?;
    Ok(compile_with(&tokens, options)?)
}

pub fn compile_str(text: &str) -> Result<Vec<QueryDoc>, Error> {
    compile_source(text.as_bytes())
}
