//! SISL lexer — turns SISL text into a stream of typed tokens.
//!
//! Whitespace (space, tab, CR, LF) separates tokens and is otherwise
//! insignificant; inside quoted strings it is payload, including raw
//! newlines. The lexer resolves string escapes and validates type tags, so
//! downstream stages never see raw escape text or an unknown tag name.
//! Every token carries the 1-based line/column where it started.

use crate::error::{Result, SislError};
use crate::escape;
use crate::value::Tag;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LBrace,
    RBrace,
    Colon,
    Comma,
    /// Bare identifier: object key or `_N` list index marker.
    Name(String),
    /// `!str`, `!int`, ... with the tag already resolved.
    Tag(Tag),
    /// Quoted string with escapes resolved.
    Str(String),
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    peeked: Option<Token>,
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c == '-' || c == '.'
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            peeked: None,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) {
        if let Some(c) = self.current() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while self.current().is_some_and(is_whitespace) {
            self.advance();
        }
    }

    fn token(&self, kind: TokenKind, line: usize, column: usize) -> Token {
        Token { kind, line, column }
    }

    /// Look at the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<Token> {
        if let Some(token) = &self.peeked {
            return Ok(token.clone());
        }
        let token = self.next_token()?;
        self.peeked = Some(token.clone());
        Ok(token)
    }

    pub fn next_token(&mut self) -> Result<Token> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }

        self.skip_whitespace();

        let line = self.line;
        let column = self.column;
        let Some(c) = self.current() else {
            return Ok(self.token(TokenKind::Eof, line, column));
        };

        match c {
            '{' => {
                self.advance();
                Ok(self.token(TokenKind::LBrace, line, column))
            }
            '}' => {
                self.advance();
                Ok(self.token(TokenKind::RBrace, line, column))
            }
            ':' => {
                self.advance();
                Ok(self.token(TokenKind::Colon, line, column))
            }
            ',' => {
                self.advance();
                Ok(self.token(TokenKind::Comma, line, column))
            }
            '"' => self.scan_string(),
            '!' => self.scan_tag(),
            c if is_name_start(c) => Ok(self.scan_name()),
            c => Err(SislError::parse_at(
                format!("unexpected character '{c}'"),
                line,
                column,
            )),
        }
    }

    fn scan_name(&mut self) -> Token {
        let line = self.line;
        let column = self.column;
        let mut value = String::new();
        while let Some(c) = self.current() {
            if !is_name_char(c) {
                break;
            }
            value.push(c);
            self.advance();
        }
        self.token(TokenKind::Name(value), line, column)
    }

    fn scan_tag(&mut self) -> Result<Token> {
        let line = self.line;
        let column = self.column;
        self.advance(); // skip '!'

        if !self.current().is_some_and(is_name_start) {
            return Err(SislError::parse_at(
                "expected type name after '!'",
                self.line,
                self.column,
            ));
        }
        let mut name = String::new();
        while let Some(c) = self.current() {
            if !is_name_char(c) {
                break;
            }
            name.push(c);
            self.advance();
        }
        let tag = Tag::from_name(&name)
            .ok_or_else(|| SislError::SislTag(format!("unknown type tag '!{name}'")))?;
        Ok(self.token(TokenKind::Tag(tag), line, column))
    }

    fn scan_string(&mut self) -> Result<Token> {
        let line = self.line;
        let column = self.column;
        self.advance(); // skip opening quote

        // Collect the raw body (escape sequences left intact), tracking
        // backslashes so an escaped quote does not terminate the string.
        let mut raw = String::new();
        loop {
            match self.current() {
                None => {
                    return Err(SislError::parse_at("unterminated string", line, column));
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    raw.push('\\');
                    self.advance();
                    let Some(c) = self.current() else {
                        return Err(SislError::parse_at(
                            "unexpected end of input in escape sequence",
                            self.line,
                            self.column,
                        ));
                    };
                    raw.push(c);
                    self.advance();
                    // Hex escapes carry a fixed number of extra characters.
                    let extra = match c {
                        'x' => 2,
                        'u' => 4,
                        'U' => 8,
                        _ => 0,
                    };
                    for _ in 0..extra {
                        match self.current() {
                            None | Some('"') => break,
                            Some(c) => {
                                raw.push(c);
                                self.advance();
                            }
                        }
                    }
                }
                Some(c) => {
                    raw.push(c);
                    self.advance();
                }
            }
        }

        let value =
            escape::unescape(&raw).map_err(|message| SislError::parse_at(message, line, column))?;
        Ok(self.token(TokenKind::Str(value), line, column))
    }
}
