// sorrel-reader - Parser for Sorrel
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Recursive descent parser for Sorrel source code.
//!
//! Converts tokens into raw [`Value`] trees. Quote, syntax-quote, unquote
//! and unquote-splice stay wrapped as reader-macro values; the evaluator
//! expands them. Special-form names read as special-form tokens and
//! `.name` reads as the builtin `name`.

use sorrel_core::{BuiltIn, ReadError, ReaderMacro, SpecialForm, Value};
use thiserror::Error;

use crate::lexer::{Lexer, LexerError, Token};

/// Parser error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at {line}:{column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<LexerError> for ParseError {
    fn from(e: LexerError) -> Self {
        ParseError {
            message: e.message,
            line: e.line,
            column: e.column,
        }
    }
}

impl From<ParseError> for ReadError {
    fn from(e: ParseError) -> Self {
        ReadError::Parse {
            message: e.message,
            line: e.line,
            column: e.column,
        }
    }
}

/// The parser converts tokens into Sorrel values.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source code.
    pub fn new(source: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let line = lexer.line();
        let column = lexer.column();
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            line,
            column,
        })
    }

    /// Parse a single form from the source.
    /// Returns None if at end of input.
    pub fn parse(&mut self) -> Result<Option<Value>, ParseError> {
        self.skip_discarded()?;
        if matches!(self.current, Token::Eof) {
            return Ok(None);
        }
        self.parse_form().map(Some)
    }

    /// Parse all forms from the source.
    pub fn parse_all(&mut self) -> Result<Vec<Value>, ParseError> {
        let mut forms = Vec::new();
        while let Some(form) = self.parse()? {
            forms.push(form);
        }
        Ok(forms)
    }

    // ========================================================================
    // Internal parsing methods
    // ========================================================================

    fn advance(&mut self) -> Result<Token, ParseError> {
        let prev = std::mem::replace(&mut self.current, Token::Eof);
        self.line = self.lexer.line();
        self.column = self.lexer.column();
        self.current = self.lexer.next_token()?;
        Ok(prev)
    }

    fn error(&self, message: String) -> ParseError {
        ParseError {
            message,
            line: self.line,
            column: self.column,
        }
    }

    /// Drop any `#_ form` pairs at the current position.
    fn skip_discarded(&mut self) -> Result<(), ParseError> {
        while matches!(self.current, Token::Discard) {
            self.advance()?;
            if matches!(self.current, Token::Eof) {
                return Err(self.error("expected a form after #_".to_string()));
            }
            self.parse_form()?;
        }
        Ok(())
    }

    fn parse_form(&mut self) -> Result<Value, ParseError> {
        match self.advance()? {
            Token::Nil => Ok(Value::Nil),
            Token::True => Ok(Value::Bool(true)),
            Token::False => Ok(Value::Bool(false)),
            Token::Int(n) => Ok(Value::Int(n)),
            Token::Float(n) => Ok(Value::Float(n)),
            Token::Char(c) => Ok(Value::Char(c)),
            Token::String(s) => Ok(Value::string(s)),
            Token::Keyword(name) => Ok(Value::keyword(&name)),
            Token::Symbol(name) => self.symbol(&name),

            Token::LParen => self.parse_until(Token::RParen).map(Value::list),
            Token::LBracket => self.parse_until(Token::RBracket).map(Value::vector),
            Token::LBrace => self.parse_map(),

            Token::Quote => self.wrap(ReaderMacro::Quote),
            Token::SyntaxQuote => self.wrap(ReaderMacro::SyntaxQuote),
            Token::Unquote => self.wrap(ReaderMacro::Unquote),
            Token::UnquoteSplice => self.wrap(ReaderMacro::UnquoteSplice),
            Token::Deref => {
                let form = self.parse_operand("@")?;
                Ok(Value::list([Value::BuiltIn(BuiltIn::Deref), form]))
            }
            Token::VarQuote => {
                let form = self.parse_operand("#'")?;
                Ok(Value::list([Value::Special(SpecialForm::Var), form]))
            }
            Token::Regex(pattern) => Ok(Value::list([
                Value::BuiltIn(BuiltIn::RePattern),
                Value::string(pattern),
            ])),
            Token::Discard => {
                self.parse_form()?;
                self.skip_discarded()?;
                self.parse_operand("#_")
            }

            token @ (Token::RParen | Token::RBracket | Token::RBrace) => {
                Err(self.error(format!("unexpected {}", token)))
            }
            Token::Eof => Err(self.error("unexpected end of input".to_string())),
        }
    }

    /// Special-form names and `.builtin` names resolve here; everything
    /// else is an ordinary symbol.
    fn symbol(&self, name: &str) -> Result<Value, ParseError> {
        if let Some(sf) = SpecialForm::from_name(name) {
            return Ok(Value::Special(sf));
        }
        if let Some(builtin_name) = name.strip_prefix('.').filter(|rest| !rest.is_empty()) {
            return BuiltIn::from_name(builtin_name)
                .map(Value::BuiltIn)
                .ok_or_else(|| self.error(format!("unknown builtin function: {}", name)));
        }
        Ok(Value::symbol(name))
    }

    /// The form following a prefix such as `'` or `@`.
    fn parse_operand(&mut self, prefix: &str) -> Result<Value, ParseError> {
        self.skip_discarded()?;
        match self.current {
            Token::Eof | Token::RParen | Token::RBracket | Token::RBrace => {
                Err(self.error(format!("expected a form after {}", prefix)))
            }
            _ => self.parse_form(),
        }
    }

    fn wrap(&mut self, kind: ReaderMacro) -> Result<Value, ParseError> {
        let form = self.parse_operand(kind.prefix())?;
        Ok(Value::reader_macro(kind, form))
    }

    fn parse_until(&mut self, close: Token) -> Result<Vec<Value>, ParseError> {
        let mut items = Vec::new();
        loop {
            self.skip_discarded()?;
            if self.current == close {
                self.advance()?;
                return Ok(items);
            }
            if matches!(self.current, Token::Eof) {
                return Err(self.error(format!("unterminated collection, expected {}", close)));
            }
            items.push(self.parse_form()?);
        }
    }

    fn parse_map(&mut self) -> Result<Value, ParseError> {
        let items = self.parse_until(Token::RBrace)?;
        if items.len() % 2 != 0 {
            return Err(self.error("map literal must contain an even number of forms".to_string()));
        }
        let mut items = items.into_iter();
        let mut entries = Vec::new();
        while let (Some(key), Some(value)) = (items.next(), items.next()) {
            entries.push((key, value));
        }
        Ok(Value::map(entries))
    }
}

// ============================================================================
// Tests
// ============================================================================
