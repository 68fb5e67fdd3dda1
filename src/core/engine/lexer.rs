//! Math-mode tokenizer
//!
//! Converts a LaTeX math string into a token sequence in a single forward
//! pass. Tokenization never fails: anything without a structural meaning
//! becomes literal [`Token::Text`].
//! - `\name` (letter run) and `\x` (one non-letter) become commands
//! - `\begin{name}` / `\end{name}` carry the environment name
//! - `\\` is a row break
//! - whitespace runs collapse to one token

use super::token::Token;

/// The tokenizer state: the input and a byte offset into it.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            done: false,
        }
    }

    /// Peek at the next character without consuming it
    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Consume and return the next character
    fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.next_char();
        }
    }

    /// Read an alphabetic control sequence name
    fn read_letters(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphabetic() {
                name.push(c);
                self.next_char();
            } else {
                break;
            }
        }
        name
    }

    /// Read `{name}` after `\begin` / `\end`.
    ///
    /// On anything other than a closed brace group the position is restored
    /// and `None` is returned, so the caller falls back to a plain command.
    fn read_environment_name(&mut self) -> Option<String> {
        let saved = self.pos;
        self.skip_whitespace();
        if self.peek_char() != Some('{') {
            self.pos = saved;
            return None;
        }
        self.next_char();
        let mut name = String::new();
        loop {
            match self.next_char() {
                Some('}') => return Some(name.trim().to_string()),
                Some(c) if c.is_alphanumeric() || c == '*' || c == ' ' => name.push(c),
                _ => {
                    self.pos = saved;
                    return None;
                }
            }
        }
    }

    fn read_control_seq(&mut self) -> Token {
        match self.peek_char() {
            None => Token::Text("\\".into()),
            Some('\\') => {
                self.next_char();
                Token::NewLine
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let name = self.read_letters();
                match name.as_str() {
                    "begin" => match self.read_environment_name() {
                        Some(env) => Token::BeginEnvironment(env),
                        None => Token::Command(name),
                    },
                    "end" => match self.read_environment_name() {
                        Some(env) => Token::EndEnvironment(env),
                        None => Token::Command(name),
                    },
                    _ => Token::Command(name),
                }
            }
            Some(c) => {
                // Single non-letter control sequence like \, \{ \%
                self.next_char();
                if c.is_whitespace() {
                    Token::Command(" ".into())
                } else {
                    Token::Command(c.to_string())
                }
            }
        }
    }

    /// Read the next token
    fn next_token(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }

        let c = match self.next_char() {
            Some(c) => c,
            None => {
                self.done = true;
                return Some(Token::Eof);
            }
        };

        let token = match c {
            '\\' => self.read_control_seq(),
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,
            '^' => Token::Superscript,
            '_' => Token::Subscript,
            '&' => Token::Ampersand,
            c if c.is_whitespace() => {
                self.skip_whitespace();
                Token::Whitespace
            }
            c if is_word_char(c) => {
                let mut text = String::from(c);
                while let Some(next) = self.peek_char() {
                    if is_word_char(next) {
                        text.push(next);
                        self.next_char();
                    } else {
                        break;
                    }
                }
                Token::Text(text)
            }
            c => Token::Text(c.to_string()),
        };
        Some(token)
    }

    /// Tokenize the entire input, terminated by [`Token::Eof`].
    pub fn tokenize(self) -> Vec<Token> {
        self.collect()
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Characters that glue into one text run. `#` is included so that a macro
/// placeholder stays inside the surrounding text (`d#1` is one token).
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '#'
}

/// Convenience function to tokenize a string
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}

/// Convert tokens back to source text
pub fn detokenize(tokens: &[Token]) -> String {
    let mut result = String::new();
    for (i, token) in tokens.iter().enumerate() {
        result.push_str(&token.to_string());
        // Keep `\alpha x` from fusing into `\alphax`
        if let Token::Command(name) = token {
            if name.chars().all(|c| c.is_ascii_alphabetic()) {
                if let Some(Token::Text(next)) = tokens.get(i + 1) {
                    if next.starts_with(|c: char| c.is_ascii_alphabetic()) {
                        result.push(' ');
                    }
                }
            }
        }
    }
    result
}
