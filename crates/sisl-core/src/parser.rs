//! SISL parser — builds a grouping AST from the token stream.
//!
//! The grammar, one node per production:
//!
//! ```text
//! document = obj-body
//! obj-body = "{" [ member { "," member } ] "}"
//! member   = name ":" tag ( quoted-string | obj-body )
//! ```
//!
//! The parser stops at the AST rather than producing a document directly:
//! the joiner needs the sparse `_N` view of list bodies, which densifying
//! into a document would destroy. Tag/payload validation happens in the
//! next stage (`decoder`).

use crate::error::{Result, SislError};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::value::Tag;

/// One `name: !tag payload` member.
#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    pub tag: Tag,
    pub payload: Payload,
}

#[derive(Debug, Clone)]
pub enum Payload {
    Text(String),
    Group(Grouping),
}

/// A brace-delimited member list (the body of a document, `!obj` or `!list`).
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    pub elements: Vec<Element>,
}

pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        Parser {
            lexer: Lexer::new(input),
        }
    }

    /// Parse exactly one document; trailing non-whitespace is an error.
    pub fn parse(mut self) -> Result<Grouping> {
        let grouping = self.parse_grouping()?;
        let token = self.lexer.next_token()?;
        if token.kind != TokenKind::Eof {
            return Err(unexpected(&token, "end of input"));
        }
        Ok(grouping)
    }

    fn parse_grouping(&mut self) -> Result<Grouping> {
        self.expect(TokenKind::LBrace, "'{'")?;

        let mut grouping = Grouping::default();
        if self.lexer.peek_token()?.kind == TokenKind::RBrace {
            self.lexer.next_token()?;
            return Ok(grouping);
        }

        loop {
            grouping.elements.push(self.parse_element()?);
            let token = self.lexer.next_token()?;
            match token.kind {
                TokenKind::Comma => {
                    // A trailing comma before '}' is not part of the grammar.
                    let next = self.lexer.peek_token()?;
                    if next.kind == TokenKind::RBrace {
                        return Err(SislError::parse_at(
                            "trailing comma before '}'",
                            token.line,
                            token.column,
                        ));
                    }
                }
                TokenKind::RBrace => break,
                _ => return Err(unexpected(&token, "',' or '}'")),
            }
        }

        Ok(grouping)
    }

    fn parse_element(&mut self) -> Result<Element> {
        let token = self.lexer.next_token()?;
        let TokenKind::Name(name) = token.kind else {
            return Err(unexpected(&token, "member name"));
        };

        self.expect(TokenKind::Colon, "':'")?;

        let token = self.lexer.next_token()?;
        let TokenKind::Tag(tag) = token.kind else {
            return Err(unexpected(&token, "type tag"));
        };

        let token = self.lexer.peek_token()?;
        let payload = match token.kind {
            TokenKind::Str(_) => {
                let token = self.lexer.next_token()?;
                match token.kind {
                    TokenKind::Str(text) => Payload::Text(text),
                    _ => return Err(unexpected(&token, "string")),
                }
            }
            TokenKind::LBrace => Payload::Group(self.parse_grouping()?),
            _ => return Err(unexpected(&token, "string or '{'")),
        };

        Ok(Element { name, tag, payload })
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token> {
        let token = self.lexer.next_token()?;
        if token.kind != kind {
            return Err(unexpected(&token, what));
        }
        Ok(token)
    }
}

fn unexpected(token: &Token, what: &str) -> SislError {
    SislError::parse_at(
        format!("expected {what}, got {}", describe(&token.kind)),
        token.line,
        token.column,
    )
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::LBrace => "'{'".to_string(),
        TokenKind::RBrace => "'}'".to_string(),
        TokenKind::Colon => "':'".to_string(),
        TokenKind::Comma => "','".to_string(),
        TokenKind::Name(name) => format!("name '{name}'"),
        TokenKind::Tag(tag) => format!("tag '!{}'", tag.as_str()),
        TokenKind::Str(_) => "string".to_string(),
        TokenKind::Eof => "end of input".to_string(),
    }
}
