use serde::{Deserialize, Serialize};

use crate::ast::{Param, Table};

/// Documentation compiled from one annotated statement.
///
/// Everything between the opening `/**` and the terminating `;` (or end of
/// input) contributes to the same `QueryDoc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDoc {
    pub title: String,
    pub description: String,

    /// Parameters in declaration order
    pub params: Vec<Param>,

    /// Result table; only the last `@table` of a document is kept
    pub output: Table,
}
