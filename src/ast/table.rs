use serde::{Deserialize, Serialize};

use crate::ast::Column;

/// Description of the rows a query returns, from an `@table { ... }` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub title: String,
    pub description: String,

    /// Columns in declaration order
    pub columns: Vec<Column>,
}
