//! Shared state for one parse call.
//!
//! Every sub-parser receives the same [`ParseSession`] by mutable
//! reference; nothing is global.

use crate::core::engine::{tokenize, MacroRegistry, TokenCursor};
use crate::data::SymbolTable;
use crate::utils::error::{ParseError, ParseResult};

/// Cursor, macro registry and symbol table for the duration of one
/// `parse` call.
pub struct ParseSession<'a> {
    pub cursor: TokenCursor,
    pub macros: &'a mut MacroRegistry,
    pub symbols: &'a dyn SymbolTable,
    depth: usize,
    max_depth: usize,
    open_optionals: usize,
}

impl<'a> ParseSession<'a> {
    pub fn new(
        input: &str,
        macros: &'a mut MacroRegistry,
        symbols: &'a dyn SymbolTable,
        max_depth: usize,
    ) -> Self {
        ParseSession {
            cursor: TokenCursor::new(tokenize(input)),
            macros,
            symbols,
            depth: 0,
            max_depth,
            open_optionals: 0,
        }
    }

    /// Run `f` inside a bracketed optional argument, where `]` is a boundary.
    pub fn in_optional<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.open_optionals += 1;
        let result = f(self);
        self.open_optionals -= 1;
        result
    }

    pub fn inside_optional(&self) -> bool {
        self.open_optionals > 0
    }

    /// Run `f` one nesting level deeper, failing once the limit is hit.
    pub fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= self.max_depth {
            return Err(ParseError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn lookup_symbol(&self, name: &str) -> Option<String> {
        self.symbols.lookup(name).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StandardSymbols;

    #[test]
    fn test_nested_limit() {
        let mut macros = MacroRegistry::new();
        let symbols = StandardSymbols;
        let mut session = ParseSession::new("", &mut macros, &symbols, 2);
        let result = session.nested(|s| s.nested(|s| s.nested(|_| Ok(()))));
        assert_eq!(result, Err(ParseError::DepthExceeded { limit: 2 }));
        assert_eq!(session.depth(), 0);
    }

    #[test]
    fn test_optional_scope() {
        let mut macros = MacroRegistry::new();
        let symbols = StandardSymbols;
        let mut session = ParseSession::new("", &mut macros, &symbols, 8);
        assert!(!session.inside_optional());
        let inside = session.in_optional(|s| Ok(s.inside_optional()));
        assert_eq!(inside, Ok(true));
        assert!(!session.inside_optional());
    }

    #[test]
    fn test_symbol_lookup() {
        let mut macros = MacroRegistry::new();
        let symbols = StandardSymbols;
        let session = ParseSession::new("", &mut macros, &symbols, 8);
        assert_eq!(session.lookup_symbol("pi"), Some("π".to_string()));
    }
}
