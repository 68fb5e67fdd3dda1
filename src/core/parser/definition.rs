//! Macro definition and invocation
//!
//! `\newcommand`, `\renewcommand`, `\providecommand` and
//! `\DeclareMathOperator` register a [`CustomCommand`] in the session's
//! registry and leave a [`Node::NewCommand`] in the tree. A later use of
//! the name parses the declared number of arguments and expands a copy of
//! the stored body.

use log::debug;
use mathlax_ast::Node;

use super::context::ParseSession;
use super::expression::{
    eat_char, parse_argument, parse_optional_argument, parse_raw_optional, parse_text_argument,
    read_raw_group,
};
use crate::core::engine::{CustomCommand, Token, TokenKind, MAX_ARITY};
use crate::utils::error::ParseResult;

pub fn is_definition_command(name: &str) -> bool {
    matches!(
        name,
        "newcommand" | "renewcommand" | "providecommand" | "DeclareMathOperator"
    )
}

/// Parse a definition whose command token has just been consumed.
pub fn parse_definition(s: &mut ParseSession, command: &str) -> ParseResult<Node> {
    let starred = eat_char(s, '*');
    let Some(name) = read_defined_name(s)? else {
        debug!("\\{} without a command name", command);
        return Ok(Node::Command {
            name: command.to_string(),
            args: Vec::new(),
        });
    };

    let custom = if command == "DeclareMathOperator" {
        let operator = Node::Operator {
            name: parse_text_argument(s)?,
            limits: starred,
        };
        CustomCommand::new(name.as_str(), 0, vec![operator])
    } else {
        let arity = parse_raw_optional(s)?
            .and_then(|raw| raw.trim().parse::<u8>().ok())
            .unwrap_or(0)
            .min(MAX_ARITY);
        let default = if arity > 0 {
            parse_optional_argument(s)?
        } else {
            None
        };
        let definition = match parse_argument(s)? {
            Node::Group(children) => children,
            node => vec![node],
        };
        let custom = CustomCommand::new(name.as_str(), arity, definition);
        match default {
            Some(default) => custom.with_default(default),
            None => custom,
        }
    };

    let node = Node::NewCommand {
        name: custom.name.clone(),
        arity: custom.arity,
        definition: custom.definition.clone(),
    };

    if command == "providecommand" && s.macros.contains(&name) {
        debug!("\\providecommand: \\{} already defined, keeping it", name);
    } else if s.macros.define(custom).is_some() {
        debug!("redefined \\{}", name);
    } else {
        debug!("defined \\{}", name);
    }

    Ok(node)
}

/// The `\name` being defined, braced or bare.
fn read_defined_name(s: &mut ParseSession) -> ParseResult<Option<String>> {
    s.cursor.skip_whitespace();
    match s.cursor.peek_kind() {
        TokenKind::LeftBrace => {
            let tokens = read_raw_group(s)?;
            Ok(tokens.into_iter().find_map(|token| match token {
                Token::Command(name) => Some(name),
                _ => None,
            }))
        }
        TokenKind::Command => match s.cursor.advance() {
            Some(Token::Command(name)) => Ok(Some(name)),
            _ => Ok(None),
        },
        _ => Ok(None),
    }
}

/// Parse the arguments of a registered command and expand its body.
///
/// With a default value the first argument is optional and bracketed.
pub fn expand_macro(s: &mut ParseSession, custom: &CustomCommand) -> ParseResult<Node> {
    let mut args = Vec::with_capacity(custom.arity as usize);
    let mut remaining = custom.arity;

    if let (Some(default), true) = (&custom.default, remaining > 0) {
        let first = match parse_optional_argument(s)? {
            Some(children) => children,
            None => default.clone(),
        };
        args.push(Node::from_children(first));
        remaining -= 1;
    }
    for _ in 0..remaining {
        args.push(parse_argument(s)?);
    }

    Ok(custom.expand(&args))
}
