//! Character source for the scanner.
//!
//! Decodes UTF-8 from any [`Read`] one character at a time and keeps a small
//! fixed lookahead buffer, so the scanner can test for `/**` without having
//! to push characters back after a failed match.
//!
//! Undecodable bytes never stop the scan. Each maximal invalid subsequence
//! becomes one [`REPLACEMENT_CHARACTER`], the same substitution
//! [`String::from_utf8_lossy`] makes.

use std::collections::VecDeque;
use std::io::{self, BufReader, Read};

use crate::scanner::ScanError;

/// Number of characters that can be inspected ahead of the cursor.
pub const LOOKAHEAD: usize = 3;

pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

pub struct CharSource<R: Read> {
    reader: BufReader<R>,
    /// Decoded characters with the number of input bytes each one used.
    buffer: VecDeque<(char, usize)>,
    /// A byte read while decoding that starts the next character.
    pending: Option<u8>,
    /// Byte offset of the next byte to be read from `reader`.
    read_offset: usize,
    /// Byte offset of the next character handed out by `next_char`.
    offset: usize,
}

impl<R: Read> CharSource<R> {
    pub fn new(reader: R) -> Self {
        CharSource {
            reader: BufReader::new(reader),
            buffer: VecDeque::with_capacity(LOOKAHEAD),
            pending: None,
            read_offset: 0,
            offset: 0,
        }
    }

    /// Consume one character. `Ok(None)` signals end of input.
    pub fn next_char(&mut self) -> Result<Option<char>, ScanError> {
        let next = match self.buffer.pop_front() {
            Some(decoded) => Some(decoded),
            None => self.decode_char()?,
        };
        Ok(next.map(|(ch, width)| {
            self.offset += width;
            ch
        }))
    }

    pub fn peek(&mut self) -> Result<Option<char>, ScanError> {
        self.peek_nth(0)
    }

    /// Look at the `n`-th upcoming character (0 is the next one).
    pub fn peek_nth(&mut self, n: usize) -> Result<Option<char>, ScanError> {
        assert!(n < LOOKAHEAD, "lookahead is limited to {} characters", LOOKAHEAD);

        while self.buffer.len() <= n {
            match self.decode_char()? {
                Some(ch) => self.buffer.push_back(ch),
                None => return Ok(None),
            }
        }
        Ok(self.buffer.get(n).map(|&(ch, _)| ch))
    }

    /// Byte offset of the next unconsumed character.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn read_byte(&mut self) -> Result<Option<u8>, ScanError> {
        if let Some(byte) = self.pending.take() {
            self.read_offset += 1;
            return Ok(Some(byte));
        }

        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.read_offset += 1;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ScanError::Io(e)),
            }
        }
    }

    /// Put back a byte that does not belong to the character being decoded.
    fn unread_byte(&mut self, byte: u8) {
        self.pending = Some(byte);
        self.read_offset -= 1;
    }

    /// Decode one character and report how many bytes it took.
    fn decode_char(&mut self) -> Result<Option<(char, usize)>, ScanError> {
        let start = self.read_offset;
        let Some(first) = self.read_byte()? else {
            return Ok(None);
        };

        // Accepted range of the second byte rules out overlong forms,
        // surrogates and code points past U+10FFFF.
        let (width, second) = match first {
            0x00..=0x7F => return Ok(Some((first as char, 1))),
            0xC2..=0xDF => (2, 0x80..=0xBF),
            0xE0 => (3, 0xA0..=0xBF),
            0xE1..=0xEC | 0xEE..=0xEF => (3, 0x80..=0xBF),
            0xED => (3, 0x80..=0x9F),
            0xF0 => (4, 0x90..=0xBF),
            0xF1..=0xF3 => (4, 0x80..=0xBF),
            0xF4 => (4, 0x80..=0x8F),
            _ => return Ok(Some((REPLACEMENT_CHARACTER, 1))),
        };

        let mut code = u32::from(first) & (0x7F >> width);
        for i in 1..width {
            let Some(byte) = self.read_byte()? else {
                return Ok(Some((REPLACEMENT_CHARACTER, self.read_offset - start)));
            };
            let valid = if i == 1 {
                second.contains(&byte)
            } else {
                (0x80..=0xBF).contains(&byte)
            };
            if !valid {
                self.unread_byte(byte);
                return Ok(Some((REPLACEMENT_CHARACTER, self.read_offset - start)));
            }
            code = (code << 6) | u32::from(byte & 0x3F);
        }

        let ch = char::from_u32(code).unwrap_or(REPLACEMENT_CHARACTER);
        Ok(Some((ch, width)))
    }
}
