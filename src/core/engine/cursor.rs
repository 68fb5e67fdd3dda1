//! Forward-only cursor over a token sequence.

use super::token::{Token, TokenKind};
use crate::utils::error::{ParseError, ParseResult};

/// Peek/advance/expect over the tokens of one parse call.
#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenCursor { tokens, pos: 0 }
    }

    /// Token `offset` positions ahead of the current one.
    pub fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    /// Kind of the current token; [`TokenKind::Eof`] once exhausted.
    pub fn peek_kind(&self) -> TokenKind {
        self.peek(0).map_or(TokenKind::Eof, Token::kind)
    }

    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    /// True at the EOF sentinel or when the sequence is exhausted.
    pub fn is_eof(&self) -> bool {
        matches!(self.peek(0), None | Some(Token::Eof))
    }

    /// Consume the current token if it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == kind && !self.is_eof() {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume a token of the given kind or fail.
    pub fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        match self.peek(0) {
            Some(token) if token.kind() == kind && kind != TokenKind::Eof => {
                let token = token.clone();
                self.pos += 1;
                Ok(token)
            }
            None | Some(Token::Eof) => Err(ParseError::UnexpectedEof {
                expected: kind.to_string(),
            }),
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: kind.to_string(),
                found: token.to_string(),
            }),
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek_kind() == TokenKind::Whitespace {
            self.pos += 1;
        }
    }

    /// Take the first character of the current text token.
    ///
    /// A multi-character run is split: the head is returned and the rest
    /// stays in place as the current token. A `#k` parameter reference
    /// counts as one character.
    pub fn take_text_head(&mut self) -> Option<String> {
        let Some(Token::Text(text)) = self.tokens.get_mut(self.pos) else {
            return None;
        };
        let mut chars = text.char_indices();
        let (_, first) = chars.next()?;
        let split = match chars.next() {
            Some((i, c)) if first == '#' && matches!(c, '1'..='9') => i + c.len_utf8(),
            Some((i, _)) => i,
            None => text.len(),
        };
        let head = text[..split].to_string();
        if split == text.len() {
            self.pos += 1;
        } else {
            *text = text[split..].to_string();
        }
        Some(head)
    }

    /// Index of the current token.
    pub fn position(&self) -> usize {
        self.pos
    }
}
