//! # sqldoc - Tokens and Document Model
//!
//! This module defines the two data layers of the pipeline: the flat token
//! stream produced by the [scanner](crate::scanner) and the document tree built
//! from it by the [compiler](crate::compiler).
//!
//! - **[tokens]** - Lexical tokens and the annotation keyword table
//! - **[query]** - One compiled document per annotated statement
//! - **[table]** - The `@table` description of a query's output
//! - **[field]** - `@param` / `@column` triples
//!
//! ## Annotated SQL
//!
//! ```text
//! /**
//! @title "Active users"
//! @description "Users seen in the last N days"
//! @param days "Days" "How far back to look"
//!
//! @table {
//!   @title "Users"
//!   @column name "Name" "Display name of the user"
//! }
//! */
//! SELECT name FROM users WHERE last_seen > now() - ${days};
//! ```
//!
//! ## Document Boundaries
//!
//! A document opens at `/**` and closes at the next `;` or at end of input.
//! Several `/** ... */` blocks may appear before the terminator; they all
//! describe the same statement. Plain `/* ... */` comments are ignored.
pub mod field;
pub mod query;
pub mod table;
pub mod tokens;

pub use field::{Column, Field, Param};
pub use query::QueryDoc;
pub use table::Table;
pub use tokens::{Keyword, Token};
