//! Input file format.
//!
//! A flat stream of integer tokens separated by whitespace (space, tab, CR,
//! LF or BEL):
//!
//! ```text
//! rowsA colsA a00 a01 ... rowsB colsB b00 b01 ...
//! ```
//!
//! Line breaks carry no meaning. Tokens after the second matrix are ignored.

use std::path::Path;

use fm_matrix::{Element, Matrix};
use tracing::debug;

use crate::error::{InputError, Result, RunError};

/// Characters that separate tokens.
pub const TOKEN_DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', '\x07'];

/// Splits `text` into non-empty tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(TOKEN_DELIMITERS)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Parses the two operand matrices from the text of an input file.
pub fn parse_matrices(text: &str) -> std::result::Result<(Matrix, Matrix), InputError> {
    let mut tokens = Tokens::new(tokenize(text));
    debug!(tokens = tokens.len(), "tokenized input");

    let a = tokens.matrix("A")?;
    let b = tokens.matrix("B")?;
    if tokens.remaining() > 0 {
        debug!(ignored = tokens.remaining(), "ignoring trailing tokens");
    }
    Ok((a, b))
}

/// Reads and parses the input file at `path`.
pub fn read_matrices(path: &Path) -> Result<(Matrix, Matrix)> {
    debug!(path = %path.display(), "reading input");
    let text = std::fs::read_to_string(path).map_err(|source| RunError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_matrices(&text)?)
}

struct Tokens<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(tokens: Vec<&'a str>) -> Self {
        Tokens { tokens, pos: 0 }
    }

    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    fn next(&mut self, expected: impl FnOnce() -> String) -> std::result::Result<(usize, &'a str), InputError> {
        let index = self.pos;
        let token = self
            .tokens
            .get(index)
            .copied()
            .ok_or_else(|| InputError::UnexpectedEnd {
                index,
                expected: expected(),
            })?;
        self.pos += 1;
        Ok((index, token))
    }

    fn dimension(&mut self, what: &str) -> std::result::Result<usize, InputError> {
        let (index, token) = self.next(|| what.to_string())?;
        token
            .parse::<usize>()
            .map_err(|_| InputError::InvalidDimension {
                index,
                token: token.to_string(),
            })
    }

    fn element(&mut self, name: &str, i: usize, j: usize) -> std::result::Result<Element, InputError> {
        let (index, token) = self.next(|| format!("{}[{}][{}]", name, i, j))?;
        token.parse::<Element>().map_err(|_| InputError::InvalidToken {
            index,
            token: token.to_string(),
        })
    }

    fn matrix(&mut self, name: &str) -> std::result::Result<Matrix, InputError> {
        let rows_at = self.pos;
        let rows = self.dimension(&format!("row count of {}", name))?;
        let columns = self.dimension(&format!("column count of {}", name))?;
        let numel = rows
            .checked_mul(columns)
            .ok_or_else(|| InputError::InvalidDimension {
                index: rows_at,
                token: format!("{}x{}", rows, columns),
            })?;

        let mut elements = Vec::with_capacity(numel.min(self.remaining()));
        // Driven by the element count so a huge empty operand costs nothing.
        for idx in 0..numel {
            elements.push(self.element(name, idx / columns, idx % columns)?);
        }
        debug!(matrix = name, rows, columns, "parsed matrix");
        Ok(Matrix::new(rows, columns, elements)?)
    }
}
