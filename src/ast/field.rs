use serde::{Deserialize, Serialize};

/// A named, described argument of a query or column of its output.
///
/// Built from `@param name "blurb" "description"` or the `@column` form of
/// the same triple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Identifier as it appears in the query
    pub proper_name: String,

    /// Short human-readable label
    pub blurb: String,

    /// Longer explanation
    pub description: String,
}

/// Query parameter (`@param`).
pub type Param = Field;

/// Output column (`@column`).
pub type Column = Field;
