//! Token definitions for the math tokenizer.
//!
//! Tokens are produced once per parse call and consumed in order by the
//! [`TokenCursor`](super::cursor::TokenCursor).

use std::fmt;

/// A single lexical unit of math-mode LaTeX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of word characters (letters, digits, `#`) or a single other
    /// character such as `+` or `(`.
    Text(String),

    /// A control sequence like `\frac` or `\,`.
    /// The string does NOT include the leading backslash.
    Command(String),

    /// `\begin{name}`
    BeginEnvironment(String),

    /// `\end{name}`
    EndEnvironment(String),

    /// `{`
    LeftBrace,

    /// `}`
    RightBrace,

    /// `[`
    LeftBracket,

    /// `]`
    RightBracket,

    /// `^`
    Superscript,

    /// `_`
    Subscript,

    /// `&`
    Ampersand,

    /// `\\`
    NewLine,

    /// Any run of whitespace, collapsed.
    Whitespace,

    /// End of input marker
    Eof,
}

/// Payload-free discriminant of [`Token`], used by `expect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    Command,
    BeginEnvironment,
    EndEnvironment,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Superscript,
    Subscript,
    Ampersand,
    NewLine,
    Whitespace,
    Eof,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Text(_) => TokenKind::Text,
            Token::Command(_) => TokenKind::Command,
            Token::BeginEnvironment(_) => TokenKind::BeginEnvironment,
            Token::EndEnvironment(_) => TokenKind::EndEnvironment,
            Token::LeftBrace => TokenKind::LeftBrace,
            Token::RightBrace => TokenKind::RightBrace,
            Token::LeftBracket => TokenKind::LeftBracket,
            Token::RightBracket => TokenKind::RightBracket,
            Token::Superscript => TokenKind::Superscript,
            Token::Subscript => TokenKind::Subscript,
            Token::Ampersand => TokenKind::Ampersand,
            Token::NewLine => TokenKind::NewLine,
            Token::Whitespace => TokenKind::Whitespace,
            Token::Eof => TokenKind::Eof,
        }
    }

    /// Check if this is a specific command
    pub fn is_command(&self, name: &str) -> bool {
        matches!(self, Token::Command(n) if n == name)
    }

    /// Returns the command name if this is a Command token
    pub fn as_command(&self) -> Option<&str> {
        match self {
            Token::Command(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(text) => write!(f, "{}", text),
            Token::Command(name) => write!(f, "\\{}", name),
            Token::BeginEnvironment(name) => write!(f, "\\begin{{{}}}", name),
            Token::EndEnvironment(name) => write!(f, "\\end{{{}}}", name),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::Superscript => write!(f, "^"),
            Token::Subscript => write!(f, "_"),
            Token::Ampersand => write!(f, "&"),
            Token::NewLine => write!(f, "\\\\"),
            Token::Whitespace => write!(f, " "),
            Token::Eof => Ok(()),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Text => "text",
            TokenKind::Command => "command",
            TokenKind::BeginEnvironment => "\\begin",
            TokenKind::EndEnvironment => "\\end",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::Superscript => "'^'",
            TokenKind::Subscript => "'_'",
            TokenKind::Ampersand => "'&'",
            TokenKind::NewLine => "'\\\\'",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_display() {
        assert_eq!(format!("{}", Token::Command("frac".into())), "\\frac");
        assert_eq!(format!("{}", Token::LeftBrace), "{");
        assert_eq!(format!("{}", Token::RightBrace), "}");
        assert_eq!(format!("{}", Token::Text("a#1".into())), "a#1");
        assert_eq!(format!("{}", Token::NewLine), "\\\\");
        assert_eq!(
            format!("{}", Token::BeginEnvironment("pmatrix".into())),
            "\\begin{pmatrix}"
        );
    }

    #[test]
    fn test_token_kind() {
        assert_eq!(Token::Text("x".into()).kind(), TokenKind::Text);
        assert_eq!(Token::Eof.kind(), TokenKind::Eof);
        assert!(Token::Command("right".into()).is_command("right"));
        assert_eq!(Token::Command("left".into()).as_command(), Some("left"));
    }
}
