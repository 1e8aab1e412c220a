//! Compile annotated SQL text from the command line

use super::CliError;
use crate::ast::{QueryDoc, Token};
use crate::compiler::{self, CompileOptions};
use crate::output;
use crate::scanner;

/// Options for the compile and tokens commands
#[derive(Debug, Clone, Default)]
pub struct CompileRequest {
    /// Source text (file contents or stdin)
    pub input: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Reject mistyped @param/@column arguments
    pub strict: bool,
    /// Stop after scanning and report the token stream
    pub tokens_only: bool,
}

/// Result of a compile operation
#[derive(Debug)]
pub enum CompileOutput {
    Documents(Vec<QueryDoc>),
    Tokens(Vec<Token>),
}

impl CompileOutput {
    pub fn to_json(&self, pretty: bool) -> Result<String, CliError> {
        let json = match self {
            CompileOutput::Documents(docs) if pretty => output::to_json_pretty(docs)?,
            CompileOutput::Documents(docs) => output::to_json(docs)?,
            CompileOutput::Tokens(tokens) => output::tokens_to_json(tokens, pretty)?,
        };
        Ok(json)
    }
}

/// Execute a sqldoc compile operation
pub fn execute_compile(request: &CompileRequest) -> Result<CompileOutput, CliError> {
    let input = request.input.as_deref().ok_or(CliError::NoInput)?;

    let tokens = scanner::tokenize_str(input).map_err(|e| CliError::Pipeline(e.into()))?;
    if request.tokens_only {
        return Ok(CompileOutput::Tokens(tokens));
    }

    let options = CompileOptions {
        strict_fields: request.strict,
    };
    let docs =
        compiler::compile_with(&tokens, options).map_err(|e| CliError::Pipeline(e.into()))?;
    Ok(CompileOutput::Documents(docs))
}
