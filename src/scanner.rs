//! Turns annotated SQL text into a flat token stream.
//!
//! The scanner only cares about `/** ... */` blocks and the annotations inside
//! them. Everything else, including the SQL itself, is skipped. It knows the
//! annotation keywords but not how they nest into documents; that is the
//! [compiler](crate::compiler)'s job.

use std::io::{self, Read};

use tracing::{debug, trace};

use crate::ast::tokens::{BLOCK_CLOSER, DOC_OPENER, EOF_MARKER, SEMICOLON_MARKER};
use crate::ast::{Keyword, Token};
use crate::source::CharSource;

/// Errors that can occur while reading the input.
///
/// Running out of input is never an error: it ends the scan, possibly closing
/// an open document with an `EOF` marker. Bytes that are not valid UTF-8 are
/// replaced, not reported.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// What follows a `/` that has just been consumed.
enum Opening {
    /// `/**` opening a doc block
    Block,
    /// `/*` or `/**/` opening a plain comment
    Comment,
    Nothing,
}

pub struct Scanner<R: Read> {
    source: CharSource<R>,
    tokens: Vec<Token>,
}

impl<R: Read> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Scanner {
            source: CharSource::new(reader),
            tokens: Vec::new(),
        }
    }

    /// Scan the whole input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ScanError> {
        while let Some(ch) = self.source.next_char()? {
            if ch == '/' {
                self.attempt_doc()?;
            }
        }

        debug!(
            tokens = self.tokens.len(),
            bytes = self.source.offset(),
            "scan complete"
        );
        Ok(self.tokens)
    }

    fn emit(&mut self, token: Token) {
        trace!(%token, offset = self.source.offset(), "emit");
        self.tokens.push(token);
    }

    /// Classify the comment opener after a `/`. Nothing is consumed unless an
    /// opener is recognised.
    fn opening(&mut self) -> Result<Opening, ScanError> {
        if self.source.peek()? != Some('*') {
            return Ok(Opening::Nothing);
        }

        if self.source.peek_nth(1)? == Some('*') && self.source.peek_nth(2)? != Some('/') {
            self.source.next_char()?;
            self.source.next_char()?;
            return Ok(Opening::Block);
        }

        self.source.next_char()?;
        Ok(Opening::Comment)
    }

    fn attempt_doc(&mut self) -> Result<(), ScanError> {
        match self.opening()? {
            Opening::Block => {
                self.emit(Token::OpenDoc(DOC_OPENER.to_string()));
                self.emit(Token::OpenBlock(DOC_OPENER.to_string()));
                self.scan_doc()
            }
            Opening::Comment => self.skip_comment(),
            Opening::Nothing => Ok(()),
        }
    }

    fn attempt_block(&mut self) -> Result<(), ScanError> {
        match self.opening()? {
            Opening::Block => {
                self.emit(Token::OpenBlock(DOC_OPENER.to_string()));
                self.scan_block()
            }
            Opening::Comment => self.skip_comment(),
            Opening::Nothing => Ok(()),
        }
    }

    /// Document body: the first block, then query text up to `;` or EOF,
    /// possibly interleaved with further blocks.
    fn scan_doc(&mut self) -> Result<(), ScanError> {
        self.scan_block()?;

        loop {
            match self.source.next_char()? {
                None => {
                    self.emit(Token::CloseDoc(EOF_MARKER.to_string()));
                    return Ok(());
                }
                Some(';') => {
                    self.emit(Token::CloseDoc(SEMICOLON_MARKER.to_string()));
                    return Ok(());
                }
                Some('/') => self.attempt_block()?,
                Some(_) => {}
            }
        }
    }

    fn scan_block(&mut self) -> Result<(), ScanError> {
        loop {
            match self.source.next_char()? {
                None => return Ok(()),
                Some('*') if self.source.peek()? == Some('/') => {
                    self.source.next_char()?;
                    self.emit(Token::CloseBlock(BLOCK_CLOSER.to_string()));
                    return Ok(());
                }
                Some('@') => self.scan_annotation()?,
                Some(_) => {}
            }
        }
    }

    fn skip_comment(&mut self) -> Result<(), ScanError> {
        while let Some(ch) = self.source.next_char()? {
            if ch == '*' && self.source.peek()? == Some('/') {
                self.source.next_char()?;
                break;
            }
        }
        Ok(())
    }

    /// Called with the `@` already consumed.
    fn scan_annotation(&mut self) -> Result<(), ScanError> {
        let Some(name) = self.read_word()? else {
            return Ok(());
        };

        let Some(keyword) = Keyword::lookup(&name) else {
            trace!(name = %name, "ignoring unknown annotation");
            return Ok(());
        };

        self.emit(keyword.token());
        match keyword {
            Keyword::Title | Keyword::Description => self.scan_quoted(),
            Keyword::Param | Keyword::Column => self.scan_field(),
            Keyword::Table => self.scan_table(),
        }
    }

    /// `name "blurb" "description"`
    fn scan_field(&mut self) -> Result<(), ScanError> {
        self.skip_whitespace()?;
        if let Some(word) = self.read_word()? {
            self.emit(Token::BareWord(word));
        }
        self.scan_quoted()?;
        self.scan_quoted()
    }

    fn scan_table(&mut self) -> Result<(), ScanError> {
        if !self.skip_past('{')? {
            return Ok(());
        }

        loop {
            match self.source.next_char()? {
                None | Some('}') => return Ok(()),
                Some('@') => self.scan_annotation()?,
                Some(_) => {}
            }
        }
    }

    /// Skip to the next `"` and emit the quoted contents as `Text`. An
    /// unterminated string emits nothing.
    fn scan_quoted(&mut self) -> Result<(), ScanError> {
        if !self.skip_past('"')? {
            return Ok(());
        }

        let mut text = String::new();
        while let Some(ch) = self.source.next_char()? {
            if ch == '"' {
                self.emit(Token::Text(text));
                return Ok(());
            }
            text.push(ch);
        }
        Ok(())
    }

    /// Read up to (and consume) the next whitespace character. Returns `None`
    /// when the input ends first.
    fn read_word(&mut self) -> Result<Option<String>, ScanError> {
        let mut word = String::new();
        while let Some(ch) = self.source.next_char()? {
            if is_separator(ch) {
                return Ok(Some(word));
            }
            word.push(ch);
        }
        Ok(None)
    }

    /// Consume characters through `target`. Returns `false` on end of input.
    fn skip_past(&mut self, target: char) -> Result<bool, ScanError> {
        while let Some(ch) = self.source.next_char()? {
            if ch == target {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn skip_whitespace(&mut self) -> Result<(), ScanError> {
        while let Some(ch) = self.source.peek()? {
            if !is_separator(ch) {
                break;
            }
            self.source.next_char()?;
        }
        Ok(())
    }
}

fn is_separator(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

/// Scan everything `reader` yields. The reader is not closed; pass `&mut R`
/// to keep using it afterwards.
pub fn tokenize<R: Read>(reader: R) -> Result<Vec<Token>, ScanError> {
    Scanner::new(reader).tokenize()
}

pub fn tokenize_str(text: &str) -> Result<Vec<Token>, ScanError> {
    tokenize(text.as_bytes())
}

#[test]
fn test_empty_block() {
    let tokens = tokenize_str("/***/").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::OpenDoc("/**".into()),
            Token::OpenBlock("/**".into()),
            Token::CloseBlock("*/".into()),
            Token::CloseDoc("EOF".into()),
        ]
    );
}

#[test]
fn test_read_word_stops_at_each_separator() {
    for input in ["number ", "state\n", "dentist\t", "alationnaut\r"] {
        let mut scanner = Scanner::new(input.as_bytes());
        assert_eq!(
            scanner.read_word().unwrap().as_deref(),
            Some(input.trim_end()),
            "Failed for input: {:?}",
            input
        );
    }
}

#[test]
fn test_read_word_at_eof() {
    let mut scanner = Scanner::new("title".as_bytes());
    assert_eq!(scanner.read_word().unwrap(), None);
}

#[test]
fn test_scan_quoted() {
    let mut scanner = Scanner::new(r#"  "this is a cool bit of text" rest"#.as_bytes());
    scanner.scan_quoted().unwrap();
    assert_eq!(
        scanner.tokens,
        vec![Token::Text("this is a cool bit of text".into())]
    );
}
