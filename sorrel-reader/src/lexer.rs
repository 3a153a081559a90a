// sorrel-reader - Lexer for Sorrel
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Lexer (tokeniser) for Sorrel source code.
//!
//! Converts a source string into a stream of tokens. Commas are
//! whitespace and `;` starts a comment running to the end of the line.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Delimiters
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }

    // Reader macros
    Quote,         // '
    SyntaxQuote,   // `
    Unquote,       // ~
    UnquoteSplice, // ~@
    Deref,         // @
    VarQuote,      // #'
    Discard,       // #_
    Regex(String), // #"..."

    // Literals
    Nil,
    True,
    False,
    Int(i64),
    Float(f64),
    Char(char),
    String(String),
    Symbol(String),
    Keyword(String),

    Eof,
}

impl Token {
    /// Fixed source text of delimiter and reader-macro tokens.
    fn punctuation(&self) -> Option<&'static str> {
        Some(match self {
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Quote => "'",
            Token::SyntaxQuote => "`",
            Token::Unquote => "~",
            Token::UnquoteSplice => "~@",
            Token::Deref => "@",
            Token::VarQuote => "#'",
            Token::Discard => "#_",
            Token::Nil => "nil",
            Token::True => "true",
            Token::False => "false",
            Token::Eof => "end of input",
            _ => return None,
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = self.punctuation() {
            return f.write_str(text);
        }
        match self {
            Token::Regex(pattern) => write!(f, "#\"{}\"", pattern),
            Token::Int(n) => write!(f, "{}", n),
            Token::Float(n) => write!(f, "{}", n),
            Token::Char(c) => write!(f, "\\{}", c),
            Token::String(s) => write!(f, "{:?}", s),
            Token::Symbol(s) => f.write_str(s),
            Token::Keyword(s) => write!(f, ":{}", s),
            _ => Ok(()),
        }
    }
}

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("lexer error at {line}:{column}: {message}")]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// The lexer converts source code into tokens.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Lexer {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token from the source.
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace_and_comments();

        let Some(c) = self.peek() else {
            return Ok(Token::Eof);
        };

        match c {
            '(' | ')' | '[' | ']' | '{' | '}' | '\'' | '`' | '@' => {
                self.advance();
                Ok(match c {
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    '[' => Token::LBracket,
                    ']' => Token::RBracket,
                    '{' => Token::LBrace,
                    '}' => Token::RBrace,
                    '\'' => Token::Quote,
                    '`' => Token::SyntaxQuote,
                    _ => Token::Deref,
                })
            }
            '~' => {
                self.advance();
                if self.peek() == Some('@') {
                    self.advance();
                    Ok(Token::UnquoteSplice)
                } else {
                    Ok(Token::Unquote)
                }
            }
            '#' => self.read_dispatch(),
            '"' => self.read_string(),
            '\\' => self.read_char(),
            ':' => self.read_keyword(),
            '-' | '+' => self.read_number_or_symbol(),
            '0'..='9' => self.read_number(),
            _ if is_symbol_start(c) => self.read_symbol(),
            _ => Err(self.error(format!("unexpected character: '{}'", c))),
        }
    }

    /// Collect all tokens into a vector.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if matches!(token, Token::Eof) {
                break;
            }
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Current line number (1-indexed).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Current column number (1-indexed).
    pub fn column(&self) -> usize {
        self.column
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        c
    }

    fn error(&self, message: String) -> LexerError {
        LexerError {
            message,
            line: self.line,
            column: self.column,
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() || c == ',' => {
                    self.advance();
                }
                Some(';') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool, out: &mut String) {
        while let Some(c) = self.peek() {
            if !accept(c) {
                break;
            }
            out.push(c);
            self.advance();
        }
    }

    fn read_dispatch(&mut self) -> Result<Token, LexerError> {
        self.advance(); // #

        match self.peek() {
            Some('\'') => {
                self.advance();
                Ok(Token::VarQuote)
            }
            Some('_') => {
                self.advance();
                Ok(Token::Discard)
            }
            Some('"') => {
                self.advance();
                Ok(Token::Regex(self.read_regex_content()?))
            }
            Some('#') => {
                self.advance();
                self.read_special_float()
            }
            Some(c) => Err(self.error(format!("unknown dispatch macro: #{}", c))),
            None => Err(self.error("unexpected end of input after #".to_string())),
        }
    }

    /// `##Inf`, `##-Inf`, `##NaN`
    fn read_special_float(&mut self) -> Result<Token, LexerError> {
        let mut name = String::new();
        self.take_while(is_symbol_char, &mut name);
        match name.as_str() {
            "Inf" => Ok(Token::Float(f64::INFINITY)),
            "-Inf" => Ok(Token::Float(f64::NEG_INFINITY)),
            "NaN" => Ok(Token::Float(f64::NAN)),
            _ => Err(self.error(format!("unknown special value: ##{}", name))),
        }
    }

    fn read_string(&mut self) -> Result<Token, LexerError> {
        self.advance(); // opening "
        let mut s = String::new();
        loop {
            match self.advance() {
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some('b') => s.push('\x08'),
                    Some('f') => s.push('\x0C'),
                    Some('\\') => s.push('\\'),
                    Some('"') => s.push('"'),
                    Some('u') => s.push(self.read_unicode_escape()?),
                    Some(c) => return Err(self.error(format!("unknown escape sequence: \\{}", c))),
                    None => return Err(self.error("unterminated string escape".to_string())),
                },
                Some(c) => s.push(c),
                None => return Err(self.error("unterminated string".to_string())),
            }
        }
        Ok(Token::String(s))
    }

    /// Pattern text is passed to the regex engine as written, except that
    /// `\"` stands for a quote.
    fn read_regex_content(&mut self) -> Result<String, LexerError> {
        let mut s = String::new();
        loop {
            match self.advance() {
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('"') => s.push('"'),
                    Some(c) => {
                        s.push('\\');
                        s.push(c);
                    }
                    None => return Err(self.error("unterminated regex pattern".to_string())),
                },
                Some(c) => s.push(c),
                None => return Err(self.error("unterminated regex pattern".to_string())),
            }
        }
        Ok(s)
    }

    fn read_unicode_escape(&mut self) -> Result<char, LexerError> {
        let mut hex = String::with_capacity(4);
        for _ in 0..4 {
            match self.advance() {
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                Some(c) => {
                    return Err(self.error(format!("invalid hex digit in unicode escape: {}", c)));
                }
                None => return Err(self.error("unterminated unicode escape".to_string())),
            }
        }
        self.code_point(&hex)
    }

    fn code_point(&self, hex: &str) -> Result<char, LexerError> {
        let code = u32::from_str_radix(hex, 16)
            .map_err(|_| self.error(format!("invalid unicode escape: \\u{}", hex)))?;
        char::from_u32(code).ok_or_else(|| self.error(format!("invalid unicode code point: {}", code)))
    }

    fn read_char(&mut self) -> Result<Token, LexerError> {
        self.advance(); // backslash
        let first = self
            .advance()
            .ok_or_else(|| self.error("expected character after \\".to_string()))?;
        if !first.is_ascii_alphabetic() {
            return Ok(Token::Char(first));
        }

        let mut name = String::from(first);
        self.take_while(|c| c.is_ascii_alphanumeric(), &mut name);
        match name.as_str() {
            "newline" => Ok(Token::Char('\n')),
            "space" => Ok(Token::Char(' ')),
            "tab" => Ok(Token::Char('\t')),
            "return" => Ok(Token::Char('\r')),
            "backspace" => Ok(Token::Char('\x08')),
            "formfeed" => Ok(Token::Char('\x0C')),
            _ if name.len() == 1 => Ok(Token::Char(first)),
            _ if name.starts_with('u') && name.len() == 5 => self.code_point(&name[1..]).map(Token::Char),
            _ => Err(self.error(format!("unknown character name: \\{}", name))),
        }
    }

    fn read_keyword(&mut self) -> Result<Token, LexerError> {
        self.advance(); // :
        if self.peek() == Some(':') {
            return Err(self.error("auto-resolved keywords are not supported".to_string()));
        }
        let mut name = String::new();
        self.take_while(|c| is_symbol_char(c) || c == '/', &mut name);
        if name.is_empty() {
            return Err(self.error("expected keyword name after :".to_string()));
        }
        Ok(Token::Keyword(name))
    }

    fn read_symbol(&mut self) -> Result<Token, LexerError> {
        let mut name = String::new();
        self.take_while(|c| is_symbol_char(c) || c == '/', &mut name);
        Ok(match name.as_str() {
            "nil" => Token::Nil,
            "true" => Token::True,
            "false" => Token::False,
            _ => Token::Symbol(name),
        })
    }

    fn read_number_or_symbol(&mut self) -> Result<Token, LexerError> {
        let mut text = String::new();
        if let Some(sign) = self.advance() {
            text.push(sign);
        }
        match self.peek() {
            Some(c) if c.is_ascii_digit() => {
                self.take_while(is_number_char, &mut text);
                self.parse_number(&text)
            }
            _ => {
                self.take_while(|c| is_symbol_char(c) || c == '/', &mut text);
                Ok(Token::Symbol(text))
            }
        }
    }

    fn read_number(&mut self) -> Result<Token, LexerError> {
        let mut text = String::new();
        self.take_while(is_number_char, &mut text);
        self.parse_number(&text)
    }

    fn parse_number(&self, s: &str) -> Result<Token, LexerError> {
        let lower = s.to_ascii_lowercase();
        let is_hex = lower.trim_start_matches(['-', '+']).starts_with("0x");
        let is_radix = lower.contains('r');
        if !is_hex && !is_radix && (s.contains('.') || lower.contains('e')) {
            return s
                .parse::<f64>()
                .map(Token::Float)
                .map_err(|_| self.error(format!("invalid number: {}", s)));
        }
        self.parse_int(s)
    }

    /// Decimal, `0x` hex, leading-zero octal and `NrDDD` radix integers.
    fn parse_int(&self, s: &str) -> Result<Token, LexerError> {
        let invalid = || self.error(format!("invalid number: {}", s));
        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (radix, digits) = if let Some(hex) = unsigned
            .strip_prefix("0x")
            .or_else(|| unsigned.strip_prefix("0X"))
        {
            (16, hex)
        } else if let Some((radix, digits)) = unsigned.split_once(['r', 'R']) {
            let radix: u32 = radix.parse().map_err(|_| invalid())?;
            if !(2..=36).contains(&radix) {
                return Err(self.error(format!("radix must be between 2 and 36: {}", radix)));
            }
            (radix, digits)
        } else if unsigned.len() > 1 && unsigned.starts_with('0') {
            (8, &unsigned[1..])
        } else {
            (10, unsigned)
        };

        if digits.is_empty() || digits.starts_with(['-', '+']) {
            return Err(invalid());
        }
        // Parse with the sign attached so i64::MIN is representable.
        let signed = if negative {
            format!("-{}", digits)
        } else {
            digits.to_string()
        };
        match i64::from_str_radix(&signed, radix) {
            Ok(n) => Ok(Token::Int(n)),
            Err(err) => match err.kind() {
                std::num::IntErrorKind::PosOverflow | std::num::IntErrorKind::NegOverflow => {
                    Err(self.error(format!("integer literal out of range: {}", s)))
                }
                _ => Err(invalid()),
            },
        }
    }
}

/// Check if a character can start a symbol.
fn is_symbol_start(c: char) -> bool {
    c.is_alphabetic()
        || matches!(
            c,
            '!' | '$' | '%' | '&' | '*' | '+' | '-' | '.' | '/' | '<' | '=' | '>' | '?' | '_'
        )
}

/// Check if a character can appear in a symbol.
fn is_symbol_char(c: char) -> bool {
    is_symbol_start(c) || c.is_ascii_digit() || c == '\'' || c == '#'
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-')
}

// ============================================================================
// Tests
// ============================================================================
