//! # Mathlax
//!
//! Fault-tolerant LaTeX math parser producing a typed document tree.
//!
//! ## Features
//!
//! - **Full parse**: [`parse`] turns math-mode markup into a
//!   [`Node::Document`], failing only on structural errors
//! - **Macros**: `\newcommand` definitions with `#1`..`#9` parameters,
//!   persisting across calls on one [`LatexParser`]
//! - **Incremental**: [`IncrementalParser`] keeps the longest parseable
//!   prefix of text that is still being typed
//!
//! ## Example
//!
//! ```rust
//! use mathlax::{parse, Node};
//!
//! let doc = parse(r"\frac{a}{b}").unwrap();
//! assert!(matches!(doc.as_document(), Some([Node::Fraction { .. }])));
//! ```

pub mod core;
pub mod data;
pub mod utils;
pub mod wasm;

pub use mathlax_ast as ast;
pub use mathlax_ast::{Node, Visitor};

pub use crate::core::engine::{tokenize, CustomCommand, MacroRegistry, Token};
pub use crate::core::parser::{IncrementalOptions, IncrementalParser, LatexParser, ParserOptions};
pub use crate::data::{ExtendedSymbols, StandardSymbols, SymbolTable};
pub use crate::utils::error::{ParseError, ParseResult};

/// Parse math-mode LaTeX with a fresh parser.
///
/// # Example
///
/// ```rust
/// let doc = mathlax::parse("a+b").unwrap();
/// assert_eq!(doc.children().len(), 3);
/// ```
pub fn parse(input: &str) -> ParseResult<Node> {
    LatexParser::new().parse(input)
}

/// Parse the longest valid prefix of `input`; never fails.
pub fn parse_partial(input: &str) -> Node {
    let mut parser = IncrementalParser::new();
    parser.parse_partial(input).clone()
}

/// Serialize a tree to JSON.
pub fn to_json(node: &Node, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(node)
    } else {
        serde_json::to_string(node)
    }
}
