//! LaTeX math parser
//!
//! [`LatexParser`] owns the macro registry and the symbol table; each
//! [`parse`](LatexParser::parse) call tokenizes the input, opens a
//! [`ParseSession`] over them and runs the recursive-descent grammar.
//! Definitions made in one call remain visible to later calls on the same
//! instance.

mod command;
pub mod context;
mod definition;
mod environment;
mod expression;
pub mod incremental;

pub use context::ParseSession;
pub use incremental::{IncrementalOptions, IncrementalParser};

use mathlax_ast::Node;

use crate::core::engine::{CustomCommand, MacroRegistry};
use crate::data::{StandardSymbols, SymbolTable};
use crate::utils::error::ParseResult;

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum nesting of groups, arguments and environments.
    /// Deeper input fails with [`ParseError::DepthExceeded`](crate::ParseError).
    /// Default: 128
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Recursive-descent parser for math-mode LaTeX.
///
/// Not meant to be shared between threads while parsing: the macro
/// registry is mutated by `\newcommand`.
pub struct LatexParser {
    macros: MacroRegistry,
    symbols: Box<dyn SymbolTable>,
    options: ParserOptions,
}

impl Default for LatexParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LatexParser {
    /// Create a parser with the built-in symbol table and default options
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Self {
            macros: MacroRegistry::new(),
            symbols: Box::new(StandardSymbols),
            options,
        }
    }

    /// Replace the symbol table used for unknown commands.
    pub fn with_symbols(mut self, symbols: Box<dyn SymbolTable>) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse `input` into a [`Node::Document`].
    ///
    /// Fails only on structural problems: an unterminated group, argument,
    /// `\left` or environment at end of input, or nesting deeper than
    /// [`ParserOptions::max_depth`].
    pub fn parse(&mut self, input: &str) -> ParseResult<Node> {
        let mut session = ParseSession::new(
            input,
            &mut self.macros,
            self.symbols.as_ref(),
            self.options.max_depth,
        );
        expression::parse_document(&mut session)
    }

    pub fn macros(&self) -> &MacroRegistry {
        &self.macros
    }

    pub fn macros_mut(&mut self) -> &mut MacroRegistry {
        &mut self.macros
    }

    pub fn set_macros(&mut self, macros: MacroRegistry) {
        self.macros = macros;
    }

    /// Register a command programmatically, as `\newcommand` would.
    pub fn define_macro(&mut self, command: CustomCommand) -> Option<CustomCommand> {
        self.macros.define(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ExtendedSymbols;
    use crate::utils::error::ParseError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_returns_document() {
        let mut parser = LatexParser::new();
        assert_eq!(
            parser.parse("x").unwrap(),
            Node::Document(vec![Node::text("x")])
        );
    }

    #[test]
    fn test_custom_symbols() {
        let mut parser =
            LatexParser::new().with_symbols(Box::new(ExtendedSymbols::new().with("qed", "∎")));
        assert_eq!(
            parser.parse("\\qed").unwrap(),
            Node::Document(vec![Node::Symbol {
                name: "qed".to_string(),
                glyph: "∎".to_string(),
            }])
        );
    }

    #[test]
    fn test_max_depth_option() {
        let mut parser = LatexParser::with_options(ParserOptions::new().with_max_depth(4));
        assert!(parser.parse("{{{x}}}").is_ok());
        assert_eq!(
            parser.parse("{{{{{x}}}}}"),
            Err(ParseError::DepthExceeded { limit: 4 })
        );
    }

    #[test]
    fn test_define_macro() {
        let mut parser = LatexParser::new();
        parser.define_macro(CustomCommand::new("e", 0, vec![Node::text("2.718")]));
        assert_eq!(
            parser.parse("\\e").unwrap(),
            Node::Document(vec![Node::Group(vec![Node::text("2.718")])])
        );
        assert_eq!(parser.macros().names(), vec!["e"]);
    }

    #[test]
    fn test_macros_persist_until_replaced() {
        let mut parser = LatexParser::new();
        parser.parse("\\newcommand{\\one}{1}").unwrap();
        assert!(parser.macros().contains("one"));
        parser.set_macros(MacroRegistry::new());
        assert!(!parser.macros().contains("one"));
        parser.macros_mut().define(CustomCommand::new("two", 0, vec![Node::text("2")]));
        assert_eq!(parser.macros().len(), 1);
    }
}
