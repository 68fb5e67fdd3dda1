//! Parsing core
//!
//! - [`engine`]: tokens, tokenizer, cursor and the macro registry
//! - [`parser`]: the recursive-descent parser and its incremental wrapper

pub mod engine;
pub mod parser;
