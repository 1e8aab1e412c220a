use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;

/// Payload of the [`Token::CloseDoc`] emitted when a document is cut short by
/// the end of input.
pub const EOF_MARKER: &str = "EOF";

/// Payload of the [`Token::CloseDoc`] emitted for a statement terminator.
pub const SEMICOLON_MARKER: &str = ";";

pub const DOC_OPENER: &str = "/**";
pub const BLOCK_CLOSER: &str = "*/";

/// Lexical tokens produced by the scanner.
///
/// Every variant carries the lexeme it was built from, so a token stream can
/// be dumped and inspected without going back to the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "original")]
pub enum Token {
    // Delimiters
    /// Start of a documented statement
    ///
    /// # Examples
    /// ```text
    /// /** @title "Users" */
    /// ```
    OpenDoc(String),

    /// End of a documented statement
    ///
    /// Carries `;` when the statement terminator was seen, or `EOF` when the
    /// input ran out first.
    CloseDoc(String),

    /// Start of one `/** ... */` block within a document
    ///
    /// A document may be made of several blocks before its terminator.
    ///
    /// # Examples
    /// ```text
    /// /** @title "Cool Query" */
    /// /** @table { @title "A Number?" } */
    /// SELECT 1;
    /// ```
    OpenBlock(String),

    /// End of a block (`*/`)
    CloseBlock(String),

    // Annotation markers
    /// `@title`
    Title(String),

    /// `@description`
    Desc(String),

    /// `@param`, followed by a bare word and two quoted strings
    ///
    /// # Examples
    /// ```text
    /// @param user_id "User" "The id of the user to look up"
    /// ```
    Param(String),

    /// `@column`, same arguments as `@param`
    Column(String),

    /// `@table`, followed by a braced body of annotations
    ///
    /// # Examples
    /// ```text
    /// @table {
    ///   @title "All that glitters"
    ///   @column name "Name" "The name of the rockstar"
    /// }
    /// ```
    Table(String),

    // Arguments
    /// Contents of a double-quoted string, quotes stripped
    Text(String),

    /// Unquoted identifier naming a parameter or column
    BareWord(String),
}

impl Token {
    /// The lexeme this token was built from.
    pub fn original(&self) -> &str {
        match self {
            Token::OpenDoc(s)
            | Token::CloseDoc(s)
            | Token::OpenBlock(s)
            | Token::CloseBlock(s)
            | Token::Title(s)
            | Token::Desc(s)
            | Token::Param(s)
            | Token::Column(s)
            | Token::Table(s)
            | Token::Text(s)
            | Token::BareWord(s) => s,
        }
    }

    /// Variant name, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Token::OpenDoc(_) => "OpenDoc",
            Token::CloseDoc(_) => "CloseDoc",
            Token::OpenBlock(_) => "OpenBlock",
            Token::CloseBlock(_) => "CloseBlock",
            Token::Title(_) => "Title",
            Token::Desc(_) => "Desc",
            Token::Param(_) => "Param",
            Token::Column(_) => "Column",
            Token::Table(_) => "Table",
            Token::Text(_) => "Text",
            Token::BareWord(_) => "BareWord",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.name(), self.original())
    }
}

/// Annotation keywords recognised after `@`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Title,
    Description,
    Param,
    Column,
    Table,
}

impl Keyword {
    /// Keyword spelling as written after `@`.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Title => "title",
            Keyword::Description => "description",
            Keyword::Param => "param",
            Keyword::Column => "column",
            Keyword::Table => "table",
        }
    }

    /// The marker token emitted when this keyword is scanned.
    pub fn token(self) -> Token {
        let text = self.as_str().to_string();
        match self {
            Keyword::Title => Token::Title(text),
            Keyword::Description => Token::Desc(text),
            Keyword::Param => Token::Param(text),
            Keyword::Column => Token::Column(text),
            Keyword::Table => Token::Table(text),
        }
    }

    /// Look up an annotation name. Matching is case-sensitive.
    pub fn lookup(name: &str) -> Option<Keyword> {
        KEYWORDS.get(name).copied()
    }
}

pub const ALL_KEYWORDS: [Keyword; 5] = [
    Keyword::Title,
    Keyword::Description,
    Keyword::Param,
    Keyword::Column,
    Keyword::Table,
];

/// Keyword spelling to [`Keyword`], built once per process.
pub static KEYWORDS: Lazy<HashMap<&'static str, Keyword>> =
    Lazy::new(|| ALL_KEYWORDS.iter().map(|k| (k.as_str(), *k)).collect());
