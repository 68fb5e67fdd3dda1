//! Utility modules

pub mod error;

pub use error::{ParseError, ParseResult};
