//! Token-level machinery: tokenizer, cursor and the macro registry.

pub mod cursor;
pub mod lexer;
pub mod macros;
pub mod token;

pub use cursor::TokenCursor;
pub use lexer::{detokenize, tokenize, Lexer};
pub use macros::{CustomCommand, MacroRegistry, MAX_ARITY};
pub use token::{Token, TokenKind};
