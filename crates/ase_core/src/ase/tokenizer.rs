//! Line tokenizer for ASE text.
//!
//! ASE is strictly line-oriented: every line is a `*TAG` followed by
//! whitespace-separated fields that are read by position. Nothing here
//! knows about specific tags; it only splits lines and extracts fields.

use std::io::BufRead;
use std::str::FromStr;

use super::parser::{ParseError, ParseResult};

/// The whitespace-separated tokens of one physical line.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    line: usize,
    tokens: Vec<&'a str>,
}

impl<'a> Tokens<'a> {
    /// Split a line into tokens. `line` is the 1-based line number.
    pub fn new(line: usize, text: &'a str) -> Self {
        Self {
            line,
            tokens: text.split_whitespace().collect(),
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// The leading tag, if the line is not blank.
    pub fn keyword(&self) -> Option<&'a str> {
        self.tokens.first().copied()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).copied()
    }

    /// Token counted from the end; `from_end(1)` is the last token.
    pub fn from_end(&self, n: usize) -> Option<&'a str> {
        self.tokens
            .len()
            .checked_sub(n)
            .and_then(|i| self.tokens.get(i).copied())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| *t == token)
    }

    pub fn position(&self, token: &str) -> Option<usize> {
        self.tokens.iter().position(|t| *t == token)
    }

    /// Rejoin tokens 1.. with single spaces and drop the first and last
    /// character.
    ///
    /// This is how ASE quoted strings are read: `*MATERIAL_NAME "Rough Stone"`
    /// yields `Rough Stone`. Internal quotes survive untouched, and runs of
    /// whitespace inside the quotes collapse to one space.
    pub fn quoted_rest(&self) -> String {
        let joined = self.tokens.get(1..).unwrap_or(&[]).join(" ");
        let mut chars = joined.chars();
        chars.next();
        chars.next_back();
        chars.as_str().to_string()
    }

    /// Parse the token at `index`.
    pub fn parse_at<T: FromStr>(&self, index: usize) -> ParseResult<T> {
        let token = self.get(index).ok_or_else(|| self.missing(index))?;
        token.parse().map_err(|_| self.invalid(token))
    }

    /// Parse exactly `N` consecutive tokens starting at `start`.
    ///
    /// Tokens after the run are ignored.
    pub fn parse_run<T: FromStr + Copy + Default, const N: usize>(
        &self,
        start: usize,
    ) -> ParseResult<[T; N]> {
        let mut values = [T::default(); N];
        for (offset, value) in values.iter_mut().enumerate() {
            *value = self.parse_at(start + offset)?;
        }
        Ok(values)
    }

    /// Parse every token from `start` to the end of the line.
    pub fn parse_rest<T: FromStr>(&self, start: usize) -> ParseResult<Vec<T>> {
        (start..self.len()).map(|i| self.parse_at(i)).collect()
    }

    /// Error for a token that failed to parse.
    pub fn invalid(&self, token: &str) -> ParseError {
        ParseError::InvalidNumber {
            line: self.line,
            tag: self.keyword().unwrap_or_default().to_string(),
            token: token.to_string(),
        }
    }

    fn missing(&self, index: usize) -> ParseError {
        ParseError::MissingField {
            line: self.line,
            tag: self.keyword().unwrap_or_default().to_string(),
            index,
        }
    }
}

/// Tokenize in-memory content line by line.
pub fn tokenize(content: &str) -> impl Iterator<Item = Tokens<'_>> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| Tokens::new(i + 1, line))
}

/// Streaming line reader over any `BufRead`.
///
/// Lines are read into one reused buffer, so only the current line is held
/// in memory.
pub struct LineReader<R> {
    reader: R,
    buffer: String,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::with_capacity(256),
            line: 0,
        }
    }

    /// Read and tokenize the next line. Returns `Ok(None)` at end of input.
    ///
    /// Invalid UTF-8 surfaces as an `InvalidData` I/O error.
    pub fn next_line(&mut self) -> std::io::Result<Option<Tokens<'_>>> {
        self.buffer.clear();
        let read_size = self.reader.read_line(&mut self.buffer)?;
        if read_size == 0 {
            return Ok(None);
        }
        self.line += 1;
        Ok(Some(Tokens::new(self.line, &self.buffer)))
    }

    /// Number of lines read so far.
    pub fn lines_read(&self) -> usize {
        self.line
    }
}
