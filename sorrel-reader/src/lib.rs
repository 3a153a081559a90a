// sorrel-reader - Lexer and parser for the Sorrel language
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # sorrel-reader
//!
//! Lexer and parser for Sorrel. Produces raw [`sorrel_core::Value`] trees
//! from source strings; reader macros are left for the evaluator to expand.
//!
//! Integers are decimal, `0x` hex, leading-zero octal or `NrDDD` radix and
//! must fit in 64 bits.

pub mod lexer;
pub mod parser;

pub use lexer::{Lexer, LexerError, Token};
pub use parser::{ParseError, Parser};

use sorrel_core::{ReadError, SourceReader, Value};

/// Parse the first form of `source`, or `None` for empty input.
pub fn read(source: &str) -> Result<Option<Value>, ParseError> {
    Parser::new(source)?.parse()
}

/// Parse every form of `source`.
pub fn read_all(source: &str) -> Result<Vec<Value>, ParseError> {
    Parser::new(source)?.parse_all()
}

/// The [`SourceReader`] a runtime uses for `read` and `read-string`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Reader;

impl SourceReader for Reader {
    fn read(&self, text: &str) -> Result<Vec<Value>, ReadError> {
        Ok(read_all(text)?)
    }
}
