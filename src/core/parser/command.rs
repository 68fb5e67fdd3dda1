//! Command sub-parser
//!
//! Turns a control sequence (already consumed by the caller) and its
//! arguments into a node. Structural commands are matched by name first,
//! then the static tables in [`crate::data::maps`], then the injected
//! symbol table; anything left becomes a generic [`Node::Command`].

use mathlax_ast::{
    ArrowDirection, BinomialStyle, DelimiterRole, FractionStyle, LimitsMode, Node, PhantomKind,
};

use super::context::ParseSession;
use super::expression::{
    eat_char, parse_argument, parse_expression, parse_group, parse_optional_argument,
    parse_raw_argument, parse_raw_optional, parse_script, parse_text_argument,
    parse_until_boundary,
};
use crate::core::engine::{Token, TokenKind};
use crate::data::maps::{
    delimiter_char, ACCENTS, BIG_OPERATORS, DELIMITER_COMMANDS, FONT_STYLES, FUNCTION_OPERATORS,
    MATH_STYLES, SIZED_DELIMITERS, SPACES,
};
use crate::utils::error::{ParseError, ParseResult};

/// Parse the command `name` whose token has just been consumed.
pub fn parse_command(s: &mut ParseSession, name: &str) -> ParseResult<Node> {
    match name {
        "frac" => parse_fraction(s, FractionStyle::Normal),
        "dfrac" => parse_fraction(s, FractionStyle::Display),
        "tfrac" => parse_fraction(s, FractionStyle::Text),
        "cfrac" => {
            // alignment hint `[l]` / `[r]` has no effect on structure
            parse_raw_optional(s)?;
            parse_fraction(s, FractionStyle::Continued)
        }
        "binom" => parse_binomial(s, BinomialStyle::Normal),
        "dbinom" => parse_binomial(s, BinomialStyle::Display),
        "tbinom" => parse_binomial(s, BinomialStyle::Text),
        "sqrt" => parse_root(s),
        "text" | "mbox" | "textnormal" | "hbox" => Ok(Node::TextMode(parse_text_argument(s)?)),
        "operatorname" => {
            let limits = eat_char(s, '*');
            Ok(Node::Operator {
                name: parse_text_argument(s)?,
                limits,
            })
        }
        "left" => parse_left_right(s),
        "middle" => Ok(Node::ManualSizedDelimiter {
            glyph: parse_delimiter(s)?,
            scale: 1.0,
            role: DelimiterRole::Middle,
        }),
        "xrightarrow" => parse_extensible_arrow(s, ArrowDirection::Right),
        "xleftarrow" => parse_extensible_arrow(s, ArrowDirection::Left),
        "xleftrightarrow" => parse_extensible_arrow(s, ArrowDirection::LeftRight),
        "overset" | "stackrel" => {
            let above = parse_argument(s)?;
            let base = parse_argument(s)?;
            Ok(Node::Stack {
                base: Box::new(base),
                above: Some(Box::new(above)),
                below: None,
            })
        }
        "underset" => {
            let below = parse_argument(s)?;
            let base = parse_argument(s)?;
            Ok(Node::Stack {
                base: Box::new(base),
                above: None,
                below: Some(Box::new(below)),
            })
        }
        "color" | "textcolor" => parse_color(s),
        "hspace" => {
            eat_char(s, '*');
            Ok(Node::HSpace(parse_raw_argument(s)?))
        }
        "boxed" => Ok(Node::Boxed(Box::new(parse_argument(s)?))),
        "phantom" => parse_phantom(s, PhantomKind::Full),
        "hphantom" => parse_phantom(s, PhantomKind::Horizontal),
        "vphantom" => parse_phantom(s, PhantomKind::Vertical),
        "newline" => Ok(Node::NewLine),
        _ => parse_table_command(s, name),
    }
}

fn parse_table_command(s: &mut ParseSession, name: &str) -> ParseResult<Node> {
    if BIG_OPERATORS.contains(name) {
        return parse_big_operator(s, name);
    }
    if FUNCTION_OPERATORS.contains(name) {
        return Ok(Node::Operator {
            name: name.to_string(),
            limits: false,
        });
    }
    if let Some(&(scale, role)) = SIZED_DELIMITERS.get(name) {
        return Ok(Node::ManualSizedDelimiter {
            glyph: parse_delimiter(s)?,
            scale,
            role,
        });
    }
    if let Some(&style) = FONT_STYLES.get(name) {
        return Ok(Node::Style {
            content: Box::new(parse_argument(s)?),
            style,
        });
    }
    if let Some(&kind) = ACCENTS.get(name) {
        return Ok(Node::Accent {
            content: Box::new(parse_argument(s)?),
            kind,
        });
    }
    if let Some(&kind) = SPACES.get(name) {
        return Ok(Node::Space(kind));
    }
    if let Some(&style) = MATH_STYLES.get(name) {
        return Ok(Node::MathStyle {
            content: parse_until_boundary(s)?,
            style,
        });
    }
    if let Some(glyph) = s.lookup_symbol(name) {
        return Ok(Node::Symbol {
            name: name.to_string(),
            glyph,
        });
    }

    // Unknown command: keep it, with any directly attached brace groups
    let mut args = Vec::new();
    while s.cursor.peek_kind() == TokenKind::LeftBrace {
        args.push(Node::from_children(parse_group(s)?));
    }
    Ok(Node::Command {
        name: name.to_string(),
        args,
    })
}

fn parse_fraction(s: &mut ParseSession, style: FractionStyle) -> ParseResult<Node> {
    let numerator = parse_argument(s)?;
    let denominator = parse_argument(s)?;
    Ok(Node::Fraction {
        numerator: Box::new(numerator),
        denominator: Box::new(denominator),
        style,
    })
}

fn parse_binomial(s: &mut ParseSession, style: BinomialStyle) -> ParseResult<Node> {
    let top = parse_argument(s)?;
    let bottom = parse_argument(s)?;
    Ok(Node::Binomial {
        top: Box::new(top),
        bottom: Box::new(bottom),
        style,
    })
}

fn parse_root(s: &mut ParseSession) -> ParseResult<Node> {
    let index = parse_optional_argument(s)?.map(|children| Box::new(Node::from_children(children)));
    let content = parse_argument(s)?;
    Ok(Node::Root {
        content: Box::new(content),
        index,
    })
}

fn parse_phantom(s: &mut ParseSession, kind: PhantomKind) -> ParseResult<Node> {
    Ok(Node::Phantom {
        content: Box::new(parse_argument(s)?),
        kind,
    })
}

fn parse_extensible_arrow(s: &mut ParseSession, direction: ArrowDirection) -> ParseResult<Node> {
    let below = parse_optional_argument(s)?.map(|children| Box::new(Node::from_children(children)));
    let content = parse_argument(s)?;
    Ok(Node::ExtensibleArrow {
        content: Box::new(content),
        below,
        direction,
    })
}

/// `\color[model]{value}{content}`; `HTML` values get a `#` prefix.
fn parse_color(s: &mut ParseSession) -> ParseResult<Node> {
    let model = parse_raw_optional(s)?;
    let value = parse_text_argument(s)?;
    let color = match model {
        Some(model) if model.eq_ignore_ascii_case("html") && !value.starts_with('#') => {
            format!("#{}", value)
        }
        _ => value,
    };
    let content = parse_argument(s)?;
    Ok(Node::Color {
        content: Box::new(content),
        color,
    })
}

/// Big operators take their own scripts and `\limits` / `\nolimits`, so
/// they never end up as the base of a script node.
fn parse_big_operator(s: &mut ParseSession, name: &str) -> ParseResult<Node> {
    attach_operator_scripts(s, name.to_string(), None, None, LimitsMode::Default)
}

/// Consume the scripts and limits switches following a big operator.
/// Scripts already present (from a macro body) are extended.
pub fn attach_operator_scripts(
    s: &mut ParseSession,
    op: String,
    mut sub: Option<Box<Node>>,
    mut sup: Option<Box<Node>>,
    mut limits: LimitsMode,
) -> ParseResult<Node> {
    loop {
        let offset = usize::from(s.cursor.peek_kind() == TokenKind::Whitespace);
        let next = match s.cursor.peek(offset) {
            Some(Token::Subscript) => TokenKind::Subscript,
            Some(Token::Superscript) => TokenKind::Superscript,
            Some(Token::Command(cmd)) if cmd == "limits" || cmd == "nolimits" => {
                limits = if cmd == "limits" {
                    LimitsMode::Limits
                } else {
                    LimitsMode::NoLimits
                };
                TokenKind::Command
            }
            _ => break,
        };
        s.cursor.skip_whitespace();
        s.cursor.advance();

        match next {
            TokenKind::Subscript => {
                let script = parse_script(s)?;
                sub = Some(merge_script(sub, script));
            }
            TokenKind::Superscript => {
                let script = parse_script(s)?;
                sup = Some(merge_script(sup, script));
            }
            _ => {}
        }
    }

    Ok(Node::BigOperator {
        op,
        sub,
        sup,
        limits,
    })
}

/// A second `_` or `^` on the same operator appends to the first.
fn merge_script(existing: Option<Box<Node>>, script: Node) -> Box<Node> {
    match existing {
        None => Box::new(script),
        Some(prev) => Box::new(Node::Group(vec![*prev, script])),
    }
}

/// `\left<delim> ... \right<delim>`. The closing `\right` is required.
fn parse_left_right(s: &mut ParseSession) -> ParseResult<Node> {
    let left = parse_delimiter(s)?;
    let mut content = Vec::new();
    loop {
        match s.cursor.peek(0) {
            None | Some(Token::Eof) => {
                return Err(ParseError::unterminated("\\left (missing \\right)"))
            }
            Some(token) if token.is_command("right") => {
                s.cursor.advance();
                break;
            }
            _ => {
                if let Some(node) = parse_expression(s)? {
                    content.push(node);
                }
            }
        }
    }
    let right = parse_delimiter(s)?;
    Ok(Node::Delimited {
        left,
        right,
        content,
    })
}

/// Read one delimiter and map it to its glyph. A missing delimiter is `.`.
fn parse_delimiter(s: &mut ParseSession) -> ParseResult<String> {
    s.cursor.skip_whitespace();
    let glyph = match s.cursor.peek_kind() {
        TokenKind::Text => {
            let head = s.cursor.take_text_head().unwrap_or_default();
            head.chars()
                .next()
                .and_then(delimiter_char)
                .map_or(head, str::to_string)
        }
        TokenKind::LeftBracket => {
            s.cursor.advance();
            "[".to_string()
        }
        TokenKind::RightBracket => {
            s.cursor.advance();
            "]".to_string()
        }
        TokenKind::Command if !matches!(s.cursor.peek(0), Some(t) if t.is_command("right")) => {
            let Some(Token::Command(name)) = s.cursor.advance() else {
                return Ok(".".to_string());
            };
            match DELIMITER_COMMANDS.get(name.as_str()) {
                Some(glyph) => glyph.to_string(),
                None => s.lookup_symbol(&name).unwrap_or(name),
            }
        }
        _ => ".".to_string(),
    };
    Ok(glyph)
}
