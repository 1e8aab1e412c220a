//! Builds [`QueryDoc`]s from the scanner's token stream.
//!
//! A single-pass recursive descent over an explicit cursor:
//!
//! ```text
//! Program      := Document*
//! Document     := OpenDoc DocBody* CloseDoc
//! DocBody      := Title Text | Desc Text | Param FieldTriple | Table TableBody | CloseDoc
//! FieldTriple  := BareWord Text Text
//! TableBody    := ( Title Text | Desc Text | Column FieldTriple )*
//! ```
//!
//! A table body ends at the first token that does not belong to it. That
//! token is handed back to the enclosing document with
//! [`TokenCursor::unconsume`].

use tracing::debug;

use crate::ast::{Field, Keyword, QueryDoc, Table, Token};

/// Errors that can occur while compiling a token stream.
///
/// All of them abort the whole compile call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A document must start with `OpenDoc`
    #[error("unexpected {found} token at top level (position {position})")]
    UnexpectedTopLevel { found: &'static str, position: usize },

    /// An annotation argument has the wrong token type
    #[error("malformed @{annotation}: expected {expected}, got {found} (position {position})")]
    MalformedField {
        annotation: &'static str,
        expected: &'static str,
        found: &'static str,
        position: usize,
    },

    /// The stream ended in the middle of an annotation
    #[error("token stream ended while reading @{context}")]
    Exhausted { context: &'static str },
}

pub type Result<T> = std::result::Result<T, CompileError>;

/// Knobs for a compile run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Reject `@param`/`@column` arguments of the wrong token type instead of
    /// leaving the field empty.
    pub strict_fields: bool,
}

/// Read position over a token slice.
#[derive(Debug, Clone)]
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        TokenCursor {
            tokens,
            position: 0,
        }
    }

    /// Consume and return the next token.
    pub fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Step back one token, so the next `advance` returns it again.
    pub fn unconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Index of the next token to be consumed.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.tokens.len()
    }
}

pub struct Compiler<'a> {
    cursor: TokenCursor<'a>,
    options: CompileOptions,
}

impl<'a> Compiler<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self::with_options(tokens, CompileOptions::default())
    }

    pub fn with_options(tokens: &'a [Token], options: CompileOptions) -> Self {
        Compiler {
            cursor: TokenCursor::new(tokens),
            options,
        }
    }

    /// Compile every document in the stream.
    pub fn compile(mut self) -> Result<Vec<QueryDoc>> {
        let mut docs = vec![];

        while let Some(token) = self.cursor.advance() {
            match token {
                Token::OpenDoc(_) => docs.push(self.compile_doc()?),
                other => {
                    return Err(CompileError::UnexpectedTopLevel {
                        found: other.name(),
                        position: self.cursor.position() - 1,
                    });
                }
            }
        }

        debug!(documents = docs.len(), "compile complete");
        Ok(docs)
    }

    /// Runs until `CloseDoc`. A stream that ends first still yields the
    /// document built so far.
    fn compile_doc(&mut self) -> Result<QueryDoc> {
        let mut doc = QueryDoc::default();

        while let Some(token) = self.cursor.advance() {
            match token {
                Token::Title(_) => doc.title = self.expect_text(Keyword::Title)?,
                Token::Desc(_) => doc.description = self.expect_text(Keyword::Description)?,
                Token::Param(_) => doc.params.push(self.compile_field(Keyword::Param)?),
                Token::Table(_) => doc.output = self.compile_table()?,
                Token::CloseDoc(_) => return Ok(doc),
                _ => {}
            }
        }

        Ok(doc)
    }

    fn compile_table(&mut self) -> Result<Table> {
        let mut table = Table::default();

        while let Some(token) = self.cursor.advance() {
            match token {
                Token::Title(_) => table.title = self.expect_text(Keyword::Title)?,
                Token::Desc(_) => table.description = self.expect_text(Keyword::Description)?,
                Token::Column(_) => table.columns.push(self.compile_field(Keyword::Column)?),
                _ => {
                    self.cursor.unconsume();
                    return Ok(table);
                }
            }
        }

        Ok(table)
    }

    /// `@title` and `@description` must be followed by `Text`.
    fn expect_text(&mut self, keyword: Keyword) -> Result<String> {
        let position = self.cursor.position();
        match self.cursor.advance() {
            Some(Token::Text(text)) => Ok(text.clone()),
            Some(other) => Err(CompileError::MalformedField {
                annotation: keyword.as_str(),
                expected: "Text",
                found: other.name(),
                position,
            }),
            None => Err(CompileError::Exhausted {
                context: keyword.as_str(),
            }),
        }
    }

    /// Reads exactly three tokens: name, blurb, description.
    fn compile_field(&mut self, keyword: Keyword) -> Result<Field> {
        let mut field = Field::default();

        if let Some(name) = self.field_part(keyword, FieldPart::Name)? {
            field.proper_name = name;
        }
        if let Some(blurb) = self.field_part(keyword, FieldPart::Text)? {
            field.blurb = blurb;
        }
        if let Some(description) = self.field_part(keyword, FieldPart::Text)? {
            field.description = description;
        }

        Ok(field)
    }

    /// Consume one field token. A token of the wrong type is still consumed;
    /// outside strict mode it leaves the field at its default.
    fn field_part(&mut self, keyword: Keyword, part: FieldPart) -> Result<Option<String>> {
        let position = self.cursor.position();
        let token = self.cursor.advance().ok_or(CompileError::Exhausted {
            context: keyword.as_str(),
        })?;

        if let Some(value) = part.value(token) {
            return Ok(Some(value.to_string()));
        }

        if self.options.strict_fields {
            return Err(CompileError::MalformedField {
                annotation: keyword.as_str(),
                expected: part.expected(),
                found: token.name(),
                position,
            });
        }

        Ok(None)
    }
}

/// Slot in a `@param`/`@column` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldPart {
    Name,
    Text,
}

impl FieldPart {
    fn value(self, token: &Token) -> Option<&str> {
        match (self, token) {
            (FieldPart::Name, Token::BareWord(word)) => Some(word.as_str()),
            (FieldPart::Text, Token::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    fn expected(self) -> &'static str {
        match self {
            FieldPart::Name => "BareWord",
            FieldPart::Text => "Text",
        }
    }
}

pub fn compile(tokens: &[Token]) -> Result<Vec<QueryDoc>> {
    Compiler::new(tokens).compile()
}

pub fn compile_with(tokens: &[Token], options: CompileOptions) -> Result<Vec<QueryDoc>> {
    Compiler::with_options(tokens, options).compile()
}
