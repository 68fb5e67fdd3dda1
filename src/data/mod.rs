//! Static data: command tables and the default symbol set.

pub mod maps;
pub mod symbols;

pub use symbols::{ExtendedSymbols, StandardSymbols, SymbolTable};
