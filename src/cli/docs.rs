//! Annotation reference for the sqldoc CLI

use super::CliError;
use crate::ast::Keyword;

/// Get the syntax overview (annotation listing)
pub fn get_syntax_overview() -> &'static str {
    r#"SQLDOC ANNOTATIONS

sqldoc reads documentation blocks written inside SQL files and compiles them
to JSON. A block starts with /** and the document it belongs to ends at the
next ; (or at the end of the file). Plain /* ... */ comments are ignored.

ANNOTATIONS

  @title            Title of the query or of its output table
  @description      Longer description of the query or of its output table
  @param            A named query parameter
  @column           A named output column (inside @table)
  @table            The result table of the query

QUICK REFERENCE

  /**
  @title "Cool Query"
  @description "Testing out markup"
  @param number "Number" "Which number should I output?"
  @table {
    @title "A Number"
    @column number "The Best Number" "The number you input"
  }
  */
  SELECT ${number} AS number;

Run 'sqldoc syntax <annotation>' for details on one annotation.
"#
}

/// Get the reference entry for one annotation. A leading `@` is accepted.
pub fn get_annotation_doc(name: &str) -> Result<&'static str, CliError> {
    let keyword = Keyword::lookup(name.strip_prefix('@').unwrap_or(name))
        .ok_or_else(|| CliError::UnknownAnnotation(name.to_string()))?;

    Ok(match keyword {
        Keyword::Title => TITLE_DOC,
        Keyword::Description => DESCRIPTION_DOC,
        Keyword::Param => PARAM_DOC,
        Keyword::Column => COLUMN_DOC,
        Keyword::Table => TABLE_DOC,
    })
}

const TITLE_DOC: &str = r#"@title "<text>"

  Sets the title of the enclosing query, or of the table when written inside
  @table { ... }. The text runs from the next double quote to the one after
  it; there are no escape sequences.

  Example:
    @title "Active users"

  A later @title in the same document replaces an earlier one.
"#;

const DESCRIPTION_DOC: &str = r#"@description "<text>"

  Sets the description of the enclosing query, or of the table when written
  inside @table { ... }.

  Example:
    @description "Users seen in the last N days"
"#;

const PARAM_DOC: &str = r#"@param <name> "<blurb>" "<description>"

  Declares a query parameter. <name> is a bare word ending at whitespace;
  blurb and description are quoted strings.

  Example:
    @param days "Days" "How far back to look"

  Parameters are listed in declaration order. With --strict, arguments of the
  wrong kind are an error; otherwise the affected field is left empty.
"#;

const COLUMN_DOC: &str = r#"@column <name> "<blurb>" "<description>"

  Declares an output column. Same arguments as @param. Columns are only
  collected inside @table { ... }.

  Example:
    @column name "Name" "Display name of the user"
"#;

const TABLE_DOC: &str = r#"@table { ... }

  Describes the rows the query returns. The braces may contain @title,
  @description and @column annotations in any order.

  Example:
    @table {
      @title "Users"
      @column id "Id" "Primary key"
      @column name "Name" "Display name"
    }

  Only the last @table of a document is kept.
"#;
