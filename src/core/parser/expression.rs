//! Expression, group and script grammar
//!
//! ```text
//! expression    := factor (('^' | '_') script)*
//! factor        := text | command | environment | group
//!                | whitespace | '\\' | EOF
//! group         := '{' expression* '}'
//! argument      := group | single factor
//! script        := group | single factor | empty
//! ```
//!
//! Scripts attach to the running node, so `x_1^2` is
//! `Superscript(Subscript(x, 1), 2)`.

use log::debug;
use mathlax_ast::{Node, SpaceKind};

use super::command;
use super::context::ParseSession;
use super::definition;
use super::environment;
use crate::core::engine::{detokenize, Token, TokenKind};
use crate::utils::error::{ParseError, ParseResult};

/// Parse the whole token stream into a [`Node::Document`].
pub fn parse_document(s: &mut ParseSession) -> ParseResult<Node> {
    let mut children = Vec::new();
    while !s.cursor.is_eof() {
        if let Some(node) = parse_expression(s)? {
            children.push(node);
        }
    }
    Ok(Node::Document(children))
}

/// A factor followed by any number of scripts.
///
/// Returns `None` at end of input or when the factor produced nothing
/// (a discarded stray `\end`).
pub fn parse_expression(s: &mut ParseSession) -> ParseResult<Option<Node>> {
    let Some(mut node) = parse_factor(s)? else {
        return Ok(None);
    };

    loop {
        match s.cursor.peek_kind() {
            TokenKind::Superscript => {
                s.cursor.advance();
                let script = parse_script(s)?;
                node = Node::Superscript {
                    base: Box::new(node),
                    script: Box::new(script),
                };
            }
            TokenKind::Subscript => {
                s.cursor.advance();
                let script = parse_script(s)?;
                node = Node::Subscript {
                    base: Box::new(node),
                    script: Box::new(script),
                };
            }
            _ => break,
        }
    }

    Ok(Some(node))
}

fn parse_factor(s: &mut ParseSession) -> ParseResult<Option<Node>> {
    s.nested(|s| {
        match s.cursor.peek_kind() {
            TokenKind::Eof => return Ok(None),
            // A script with no base attaches to an empty text node
            TokenKind::Superscript | TokenKind::Subscript => return Ok(Some(Node::empty())),
            TokenKind::LeftBrace => return parse_group(s).map(|c| Some(Node::Group(c))),
            _ => {}
        }

        let node = match s.cursor.advance() {
            Some(Token::Text(text)) => Node::Text(text),
            Some(Token::Command(name)) => return dispatch_command(s, &name).map(Some),
            Some(Token::BeginEnvironment(name)) => {
                return environment::parse_environment(s, &name).map(Some)
            }
            Some(Token::EndEnvironment(name)) => {
                debug!("discarding stray \\end{{{}}}", name);
                return Ok(None);
            }
            Some(Token::Whitespace) => Node::Space(SpaceKind::Normal),
            Some(Token::NewLine) => Node::NewLine,
            Some(Token::RightBrace) => Node::text("}"),
            Some(Token::LeftBracket) => Node::text("["),
            Some(Token::RightBracket) => Node::text("]"),
            Some(Token::Ampersand) => Node::text("&"),
            _ => return Ok(None),
        };
        Ok(Some(node))
    })
}

/// User macros shadow definitions, which shadow built-in commands.
fn dispatch_command(s: &mut ParseSession, name: &str) -> ParseResult<Node> {
    if let Some(custom) = s.macros.get(name).cloned() {
        return match definition::expand_macro(s, &custom)? {
            // A macro standing for a big operator takes the operator's scripts
            Node::Group(children) => match <[Node; 1]>::try_from(children) {
                Ok([Node::BigOperator {
                    op,
                    sub,
                    sup,
                    limits,
                }]) => command::attach_operator_scripts(s, op, sub, sup, limits),
                Ok([node]) => Ok(Node::Group(vec![node])),
                Err(children) => Ok(Node::Group(children)),
            },
            node => Ok(node),
        };
    }
    if definition::is_definition_command(name) {
        return definition::parse_definition(s, name);
    }
    command::parse_command(s, name)
}

/// `{ expression* }`. Fails if the input ends before the closing brace.
pub fn parse_group(s: &mut ParseSession) -> ParseResult<Vec<Node>> {
    s.cursor.expect(TokenKind::LeftBrace)?;
    let mut children = Vec::new();
    loop {
        match s.cursor.peek_kind() {
            TokenKind::RightBrace => {
                s.cursor.advance();
                return Ok(children);
            }
            TokenKind::Eof => return Err(ParseError::unterminated("group (missing '}')")),
            _ => {
                if let Some(node) = parse_expression(s)? {
                    children.push(node);
                }
            }
        }
    }
}

/// A required argument: a braced group, or a single bare factor.
///
/// A bare text run contributes only its first character. A missing
/// argument becomes an empty text node.
pub fn parse_argument(s: &mut ParseSession) -> ParseResult<Node> {
    s.cursor.skip_whitespace();
    match s.cursor.peek_kind() {
        TokenKind::LeftBrace => Ok(Node::from_children(parse_group(s)?)),
        TokenKind::Text => Ok(s.cursor.take_text_head().map_or_else(Node::empty, Node::Text)),
        TokenKind::Command | TokenKind::BeginEnvironment | TokenKind::LeftBracket => {
            Ok(parse_factor(s)?.unwrap_or_else(Node::empty))
        }
        _ => Ok(Node::empty()),
    }
}

/// Content of a `^` or `_`. Counts as one nesting level, since script
/// chains recurse without passing through a factor.
pub fn parse_script(s: &mut ParseSession) -> ParseResult<Node> {
    s.nested(parse_argument)
}

/// `[ expression* ]` if the next token (after optional whitespace) opens
/// a bracket.
pub fn parse_optional_argument(s: &mut ParseSession) -> ParseResult<Option<Vec<Node>>> {
    if !next_is_bracket(s) {
        return Ok(None);
    }
    s.cursor.skip_whitespace();
    s.cursor.expect(TokenKind::LeftBracket)?;
    s.in_optional(parse_bracket_body).map(Some)
}

fn parse_bracket_body(s: &mut ParseSession) -> ParseResult<Vec<Node>> {
    let mut children = Vec::new();
    loop {
        match s.cursor.peek_kind() {
            TokenKind::RightBracket => {
                s.cursor.advance();
                return Ok(children);
            }
            TokenKind::Eof => {
                return Err(ParseError::unterminated("optional argument (missing ']')"))
            }
            _ => {
                if let Some(node) = parse_expression(s)? {
                    children.push(node);
                }
            }
        }
    }
}

/// Raw source of a bracketed optional argument, unparsed.
pub fn parse_raw_optional(s: &mut ParseSession) -> ParseResult<Option<String>> {
    if !next_is_bracket(s) {
        return Ok(None);
    }
    s.cursor.skip_whitespace();
    s.cursor.expect(TokenKind::LeftBracket)?;
    let mut tokens = Vec::new();
    loop {
        match s.cursor.advance() {
            None | Some(Token::Eof) => {
                return Err(ParseError::unterminated("optional argument (missing ']')"))
            }
            Some(Token::RightBracket) => return Ok(Some(detokenize(&tokens).trim().to_string())),
            Some(token) => tokens.push(token),
        }
    }
}

fn next_is_bracket(s: &ParseSession) -> bool {
    let offset = usize::from(s.cursor.peek_kind() == TokenKind::Whitespace);
    matches!(s.cursor.peek(offset), Some(Token::LeftBracket))
}

/// Tokens between a balanced pair of braces, outer braces excluded.
pub fn read_raw_group(s: &mut ParseSession) -> ParseResult<Vec<Token>> {
    s.cursor.expect(TokenKind::LeftBrace)?;
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    loop {
        match s.cursor.advance() {
            None | Some(Token::Eof) => return Err(ParseError::unterminated("argument (missing '}')")),
            Some(Token::RightBrace) if depth == 0 => return Ok(tokens),
            Some(token) => {
                match token {
                    Token::LeftBrace => depth += 1,
                    Token::RightBrace => depth -= 1,
                    _ => {}
                }
                tokens.push(token);
            }
        }
    }
}

/// A braced argument read as raw source (`\hspace{1em}`, array column
/// specs). A bare argument is a single character.
pub fn parse_raw_argument(s: &mut ParseSession) -> ParseResult<String> {
    s.cursor.skip_whitespace();
    match s.cursor.peek_kind() {
        TokenKind::LeftBrace => Ok(detokenize(&read_raw_group(s)?).trim().to_string()),
        TokenKind::Text => Ok(s.cursor.take_text_head().unwrap_or_default()),
        _ => Ok(String::new()),
    }
}

/// A braced argument flattened to plain text (`\text{..}`, colour names).
/// Braces are dropped and escaped characters unescaped.
pub fn parse_text_argument(s: &mut ParseSession) -> ParseResult<String> {
    s.cursor.skip_whitespace();
    match s.cursor.peek_kind() {
        TokenKind::LeftBrace => {
            let tokens = read_raw_group(s)?;
            Ok(flatten_tokens(s, &tokens))
        }
        TokenKind::Text => Ok(s.cursor.take_text_head().unwrap_or_default()),
        _ => Ok(String::new()),
    }
}

fn flatten_tokens(s: &ParseSession, tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Whitespace | Token::NewLine => out.push(' '),
            Token::LeftBrace | Token::RightBrace | Token::Eof => {}
            Token::Command(name) if !name.starts_with(|c: char| c.is_ascii_alphabetic()) => {
                match name.as_str() {
                    " " | "," | ":" | ";" | ">" => out.push(' '),
                    "!" => {}
                    other => out.push_str(other),
                }
            }
            Token::Command(name) => match s.lookup_symbol(name) {
                Some(glyph) => out.push_str(&glyph),
                None => {
                    out.push('\\');
                    out.push_str(name);
                }
            },
            other => out.push_str(&other.to_string()),
        }
    }
    out
}

/// Expressions up to the end of the enclosing group, cell, optional
/// argument or delimiter pair. Used by switches such as `\displaystyle`.
pub fn parse_until_boundary(s: &mut ParseSession) -> ParseResult<Vec<Node>> {
    let mut children = Vec::new();
    loop {
        match s.cursor.peek(0) {
            Some(Token::RightBracket) if s.inside_optional() => return Ok(children),
            None
            | Some(Token::Eof)
            | Some(Token::RightBrace)
            | Some(Token::Ampersand)
            | Some(Token::NewLine)
            | Some(Token::EndEnvironment(_)) => return Ok(children),
            Some(token) if token.is_command("right") => return Ok(children),
            _ => {
                if let Some(node) = parse_expression(s)? {
                    children.push(node);
                }
            }
        }
    }
}

/// Check for a one-character text token such as `*` and consume it.
pub fn eat_char(s: &mut ParseSession, c: char) -> bool {
    match s.cursor.peek(0) {
        Some(Token::Text(text)) if text.starts_with(c) => {
            s.cursor.take_text_head();
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::MacroRegistry;
    use crate::data::StandardSymbols;
    use mathlax_ast::{LimitsMode, MathStyleKind};
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> ParseResult<Node> {
        let mut macros = MacroRegistry::new();
        let symbols = StandardSymbols;
        let mut session = ParseSession::new(input, &mut macros, &symbols, 64);
        parse_document(&mut session)
    }

    fn doc(children: Vec<Node>) -> Node {
        Node::Document(children)
    }

    #[test]
    fn test_siblings() {
        assert_eq!(
            parse("a+b").unwrap(),
            doc(vec![Node::text("a"), Node::text("+"), Node::text("b")])
        );
    }

    #[test]
    fn test_scripts_left_associative() {
        let expected = Node::Superscript {
            base: Box::new(Node::Subscript {
                base: Box::new(Node::text("x")),
                script: Box::new(Node::text("1")),
            }),
            script: Box::new(Node::text("2")),
        };
        assert_eq!(parse("x_1^2").unwrap(), doc(vec![expected]));
    }

    #[test]
    fn test_bare_script_takes_one_char() {
        let expected = vec![
            Node::Superscript {
                base: Box::new(Node::text("x")),
                script: Box::new(Node::text("2")),
            },
            Node::text("3"),
        ];
        assert_eq!(parse("x^23").unwrap(), doc(expected));
    }

    #[test]
    fn test_script_without_base() {
        let expected = Node::Superscript {
            base: Box::new(Node::empty()),
            script: Box::new(Node::text("2")),
        };
        assert_eq!(parse("^2").unwrap(), doc(vec![expected]));
    }

    #[test]
    fn test_script_at_eof_is_empty() {
        let expected = Node::Subscript {
            base: Box::new(Node::text("x")),
            script: Box::new(Node::empty()),
        };
        assert_eq!(parse("x_").unwrap(), doc(vec![expected]));
    }

    #[test]
    fn test_group() {
        assert_eq!(
            parse("{ab}").unwrap(),
            doc(vec![Node::Group(vec![Node::text("ab")])])
        );
    }

    #[test]
    fn test_unterminated_group_fails() {
        assert!(matches!(
            parse("{a"),
            Err(ParseError::Unterminated { .. })
        ));
        assert!(parse("x^{").is_err());
    }

    #[test]
    fn test_stray_closing_brace_is_text() {
        assert_eq!(
            parse("a}").unwrap(),
            doc(vec![Node::text("a"), Node::text("}")])
        );
    }

    #[test]
    fn test_whitespace_and_newline() {
        assert_eq!(
            parse("a b\\\\c").unwrap(),
            doc(vec![
                Node::text("a"),
                Node::Space(SpaceKind::Normal),
                Node::text("b"),
                Node::NewLine,
                Node::text("c"),
            ])
        );
    }

    #[test]
    fn test_stray_end_is_dropped() {
        assert_eq!(
            parse("a\\end{foo}b").unwrap(),
            doc(vec![Node::text("a"), Node::text("b")])
        );
    }

    #[test]
    fn test_depth_limit() {
        let input = "{".repeat(100) + &"}".repeat(100);
        assert_eq!(parse(&input), Err(ParseError::DepthExceeded { limit: 64 }));
    }

    #[test]
    fn test_depth_limit_on_script_chain() {
        let input = "x^{".repeat(100) + &"}".repeat(100);
        assert_eq!(parse(&input), Err(ParseError::DepthExceeded { limit: 64 }));
    }

    #[test]
    fn test_math_style_runs_past_stray_bracket() {
        let style = Node::MathStyle {
            content: vec![
                Node::Space(SpaceKind::Normal),
                Node::text("a"),
                Node::text("]"),
                Node::text("b"),
            ],
            style: MathStyleKind::Display,
        };
        assert_eq!(
            parse("{\\displaystyle a]b}").unwrap(),
            doc(vec![Node::Group(vec![style])])
        );
    }

    #[test]
    fn test_math_style_stops_at_optional_end() {
        let index = Node::MathStyle {
            content: vec![Node::Space(SpaceKind::Normal), Node::text("3")],
            style: MathStyleKind::Script,
        };
        assert_eq!(
            parse("\\sqrt[\\scriptstyle 3]{x}").unwrap(),
            doc(vec![Node::Root {
                content: Box::new(Node::text("x")),
                index: Some(Box::new(index)),
            }])
        );
    }

    #[test]
    fn test_macro_big_operator_owns_scripts() {
        let mut macros = MacroRegistry::new();
        let symbols = StandardSymbols;
        let mut session = ParseSession::new(
            "\\newcommand{\\S}{\\sum\\limits}\\S_i^n",
            &mut macros,
            &symbols,
            64,
        );
        let document = parse_document(&mut session).unwrap();
        let Some([Node::NewCommand { .. }, op]) = document.as_document() else {
            panic!("unexpected shape: {:?}", document);
        };
        assert_eq!(
            *op,
            Node::BigOperator {
                op: "sum".to_string(),
                sub: Some(Box::new(Node::text("i"))),
                sup: Some(Box::new(Node::text("n"))),
                limits: LimitsMode::Limits,
            }
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse("").unwrap(), doc(Vec::new()));
    }
}
