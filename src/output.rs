//! JSON output for compiled documents and token dumps.
//!
//! Compact output is what the HTTP endpoint sends; pretty output uses serde's
//! two-space indentation and is meant for people reading the CLI output.
//! Field order follows the model structs, so output is deterministic.
//!
//! # Examples
//!
//! ```
//! use sqldoc::output::to_json;
//!
//! let docs = sqldoc::compile_str(r#"/** @title "Ping" */ SELECT 1;"#).unwrap();
//! let json = to_json(&docs).unwrap();
//! assert!(json.starts_with(r#"[{"title":"Ping""#));
//! ```

use crate::ast::{QueryDoc, Token};

/// Compact JSON array of documents. An empty slice renders as `[]`.
pub fn to_json(docs: &[QueryDoc]) -> Result<String, serde_json::Error> {
    serde_json::to_string(docs)
}

/// Pretty-printed JSON array of documents.
pub fn to_json_pretty(docs: &[QueryDoc]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(docs)
}

/// Token stream as a JSON array of `{"kind": ..., "original": ...}` objects.
pub fn tokens_to_json(tokens: &[Token], pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(tokens)
    } else {
        serde_json::to_string(tokens)
    }
}
