//! Incremental parsing of partially typed input
//!
//! [`IncrementalParser`] keeps a growing buffer and always holds a valid
//! document for the longest prefix it could parse. Validity is not
//! monotonic in prefix length (`\int_{-\` fails, `\int_` and
//! `\int_{-\infty}` both parse), so the search is a linear scan near the
//! end of the buffer followed by a coarse scan, never a bisection.
//!
//! Lengths are counted in characters, so a prefix never splits a UTF-8
//! sequence.

use log::{debug, trace};
use mathlax_ast::Node;

use super::LatexParser;
use crate::core::engine::MacroRegistry;
use crate::utils::error::{ParseError, ParseResult};

/// Tuning for the longest-valid-prefix search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncrementalOptions {
    /// Buffers up to this many characters are parsed whole, with no search.
    /// Default: 5
    pub fast_path_len: usize,

    /// How many one-character steps back the first stage tries.
    /// Default: 100
    pub fine_window: usize,

    /// Step size of the second stage.
    /// Default: 5
    pub coarse_step: usize,
}

impl Default for IncrementalOptions {
    fn default() -> Self {
        Self {
            fast_path_len: 5,
            fine_window: 100,
            coarse_step: 5,
        }
    }
}

/// Streaming wrapper around [`LatexParser`] that never fails.
///
/// Every reparse starts from the macro registry the wrapped parser had when
/// it was handed over, so definitions in a rejected suffix do not leak into
/// the next attempt.
pub struct IncrementalParser {
    parser: LatexParser,
    base_macros: MacroRegistry,
    options: IncrementalOptions,
    buffer: String,
    /// Accepted prefix, in characters
    success_chars: usize,
    /// Accepted prefix, in bytes
    success_bytes: usize,
    total_chars: usize,
    document: Node,
    last_error: Option<ParseError>,
}

impl Default for IncrementalParser {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementalParser {
    pub fn new() -> Self {
        Self::with_parser(LatexParser::new())
    }

    /// Wrap an existing parser; its current macros become the baseline.
    pub fn with_parser(parser: LatexParser) -> Self {
        let base_macros = parser.macros().clone();
        Self {
            parser,
            base_macros,
            options: IncrementalOptions::default(),
            buffer: String::new(),
            success_chars: 0,
            success_bytes: 0,
            total_chars: 0,
            document: Node::Document(Vec::new()),
            last_error: None,
        }
    }

    pub fn with_options(mut self, options: IncrementalOptions) -> Self {
        self.options = options;
        self
    }

    /// Append typed text and reparse. Appending nothing changes nothing.
    pub fn append(&mut self, text: &str) -> &Node {
        if !text.is_empty() {
            self.buffer.push_str(text);
            self.reparse();
        }
        &self.document
    }

    /// Replace the whole buffer and reparse.
    pub fn parse_partial(&mut self, text: &str) -> &Node {
        self.buffer.clear();
        self.buffer.push_str(text);
        self.reparse();
        &self.document
    }

    /// Document for the accepted prefix; empty if nothing parsed.
    pub fn current_document(&self) -> &Node {
        &self.document
    }

    /// Accepted fraction of the buffer, 1.0 for an empty buffer.
    pub fn progress(&self) -> f64 {
        if self.total_chars == 0 {
            1.0
        } else {
            self.success_chars as f64 / self.total_chars as f64
        }
    }

    /// The suffix beyond the accepted prefix.
    pub fn unparsed_content(&self) -> &str {
        &self.buffer[self.success_bytes..]
    }

    pub fn parsed_content(&self) -> &str {
        &self.buffer[..self.success_bytes]
    }

    /// Length of the accepted prefix, in characters.
    pub fn success_len(&self) -> usize {
        self.success_chars
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Why the whole buffer did not parse, if it did not.
    pub fn last_error(&self) -> Option<&ParseError> {
        self.last_error.as_ref()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.success_chars = 0;
        self.success_bytes = 0;
        self.total_chars = 0;
        self.document = Node::Document(Vec::new());
        self.last_error = None;
        self.parser.set_macros(self.base_macros.clone());
    }

    fn reparse(&mut self) {
        self.total_chars = self.buffer.chars().count();
        let total = self.total_chars;

        match self.try_prefix(total) {
            Ok(document) => {
                self.last_error = None;
                self.accept(total, document);
                return;
            }
            Err(err) => {
                debug!("input of {} chars does not parse: {}", total, err);
                self.last_error = Some(err);
            }
        }

        if total <= self.options.fast_path_len {
            self.reject();
            return;
        }

        match self.search(total) {
            Some((len, document)) => {
                debug!("prefix search accepted {}/{} chars", len, total);
                self.accept(len, document);
            }
            None => {
                debug!("prefix search found nothing in {} chars", total);
                self.reject();
            }
        }
    }

    /// Stage 1 walks back one character at a time through the last
    /// `fine_window` characters (never below 1); stage 2 continues in steps
    /// of `coarse_step` down to 0.
    fn search(&mut self, total: usize) -> Option<(usize, Node)> {
        let floor = total.saturating_sub(self.options.fine_window).max(1);

        for len in (floor..total).rev() {
            if let Ok(document) = self.try_prefix(len) {
                return Some((len, document));
            }
        }

        let step = self.options.coarse_step.max(1);
        let mut len = floor;
        while len > 0 {
            len = len.saturating_sub(step);
            if let Ok(document) = self.try_prefix(len) {
                return Some((len, document));
            }
        }
        None
    }

    fn try_prefix(&mut self, chars: usize) -> ParseResult<Node> {
        let end = byte_offset(&self.buffer, chars);
        trace!("trying prefix of {} chars", chars);
        self.parser.set_macros(self.base_macros.clone());
        self.parser.parse(&self.buffer[..end])
    }

    fn accept(&mut self, chars: usize, document: Node) {
        self.success_chars = chars;
        self.success_bytes = byte_offset(&self.buffer, chars);
        self.document = document;
    }

    fn reject(&mut self) {
        self.success_chars = 0;
        self.success_bytes = 0;
        self.document = Node::Document(Vec::new());
    }
}

/// Byte index of the `chars`-th character, or the end of `s`.
fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fresh(input: &str) -> Node {
        LatexParser::new().parse(input).unwrap()
    }

    #[test]
    fn test_complete_input() {
        let mut parser = IncrementalParser::new();
        parser.append("\\frac{a}{b}");
        assert_eq!(parser.progress(), 1.0);
        assert_eq!(parser.unparsed_content(), "");
        assert_eq!(parser.current_document(), &fresh("\\frac{a}{b}"));
        assert!(parser.last_error().is_none());
    }

    #[test]
    fn test_fast_path_failure_is_empty() {
        let mut parser = IncrementalParser::new();
        parser.append("x^{");
        assert_eq!(parser.current_document(), &Node::Document(Vec::new()));
        assert_eq!(parser.progress(), 0.0);
        assert_eq!(parser.unparsed_content(), "x^{");
        assert!(parser.last_error().is_some());
    }

    #[test]
    fn test_recovers_longest_prefix() {
        let mut parser = IncrementalParser::new();
        parser.append("\\int_{-\\");
        assert_eq!(parser.parsed_content(), "\\int_");
        assert_eq!(parser.unparsed_content(), "{-\\");
        assert_eq!(parser.current_document(), &fresh("\\int_"));
        assert_eq!(parser.success_len(), 5);

        parser.append("infty}^{\\infty}");
        assert_eq!(parser.progress(), 1.0);
        assert_eq!(
            parser.current_document(),
            &fresh("\\int_{-\\infty}^{\\infty}")
        );
    }

    #[test]
    fn test_append_empty_is_noop() {
        let mut parser = IncrementalParser::new();
        parser.append("a+\\frac{1}{");
        let before = parser.current_document().clone();
        let progress = parser.progress();
        parser.append("");
        assert_eq!(parser.current_document(), &before);
        assert_eq!(parser.progress(), progress);
    }

    #[test]
    fn test_progress_of_empty_buffer() {
        let parser = IncrementalParser::new();
        assert_eq!(parser.progress(), 1.0);
        assert_eq!(parser.current_document(), &Node::Document(Vec::new()));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let mut parser = IncrementalParser::new();
        parser.append("αβγδε + {");
        assert_eq!(parser.parsed_content(), "αβγδε + ");
        assert_eq!(parser.unparsed_content(), "{");
    }

    #[test]
    fn test_clear_restores_base_macros() {
        let mut parser = IncrementalParser::new();
        parser.append("abcdef\\newcommand{\\q}{1}\\q{");
        assert!(parser.progress() < 1.0);
        parser.clear();
        parser.append("\\q");
        assert_eq!(
            parser.current_document(),
            &Node::Document(vec![Node::Command {
                name: "q".to_string(),
                args: Vec::new(),
            }])
        );
    }

    #[test]
    fn test_coarse_stage() {
        let mut parser = IncrementalParser::new().with_options(IncrementalOptions {
            fast_path_len: 5,
            fine_window: 3,
            coarse_step: 5,
        });
        // 20 chars: the fine stage tries 19, 18, 17; the coarse stage
        // 12, 7, 2. Only the last one ends before the open group.
        parser.parse_partial("abcde{ghijklmnopqrst");
        assert_eq!(parser.parsed_content(), "ab");
        assert_eq!(parser.progress(), 0.1);
    }

    #[test]
    fn test_clear() {
        let mut parser = IncrementalParser::new();
        parser.append("x+y");
        parser.clear();
        assert_eq!(parser.buffer(), "");
        assert_eq!(parser.progress(), 1.0);
        assert_eq!(parser.current_document(), &Node::Document(Vec::new()));
    }
}
