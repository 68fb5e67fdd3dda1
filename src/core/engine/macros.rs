//! User-defined command registry and expansion
//!
//! Definitions are stored as already-parsed nodes. Positional parameters
//! `#1`..`#9` are not a node kind: they stay as literal substrings of
//! [`Node::Text`] content and are substituted when the command is invoked.

use fxhash::FxHashMap;
use mathlax_ast::{CaseRow, Node, Row};

/// Highest positional parameter number.
pub const MAX_ARITY: u8 = 9;

/// A command registered with `\newcommand` and friends.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomCommand {
    /// Name without the leading backslash
    pub name: String,
    /// Number of arguments, 0..=9
    pub arity: u8,
    /// Default for the first argument (`\newcommand{\x}[2][d]{..}`);
    /// when set, the first argument is optional and bracketed.
    pub default: Option<Vec<Node>>,
    /// Body nodes, placeholders still literal
    pub definition: Vec<Node>,
}

impl CustomCommand {
    pub fn new(name: impl Into<String>, arity: u8, definition: Vec<Node>) -> Self {
        CustomCommand {
            name: name.into(),
            arity: arity.min(MAX_ARITY),
            default: None,
            definition,
        }
    }

    pub fn with_default(mut self, default: Vec<Node>) -> Self {
        self.default = Some(default);
        self
    }

    /// Deep copy of the definition with `#k` replaced by `args[k - 1]`,
    /// wrapped in a [`Node::Group`].
    ///
    /// Placeholders beyond `args.len()` and `#` without a following digit
    /// stay literal.
    pub fn expand(&self, args: &[Node]) -> Node {
        Node::Group(substitute_list(&self.definition, args))
    }
}

/// Name → definition map owned by one parser instance.
#[derive(Debug, Clone, Default)]
pub struct MacroRegistry {
    commands: FxHashMap<String, CustomCommand>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, returning any definition it replaced.
    pub fn define(&mut self, command: CustomCommand) -> Option<CustomCommand> {
        self.commands.insert(command.name.clone(), command)
    }

    pub fn get(&self, name: &str) -> Option<&CustomCommand> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<CustomCommand> {
        self.commands.remove(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

// =============================================================================
// Placeholder substitution
// =============================================================================

fn substitute_list(nodes: &[Node], args: &[Node]) -> Vec<Node> {
    nodes.iter().flat_map(|node| substitute(node, args)).collect()
}

fn substitute_one(node: &Node, args: &[Node]) -> Node {
    Node::from_children(substitute(node, args))
}

fn substitute_box(node: &Node, args: &[Node]) -> Box<Node> {
    Box::new(substitute_one(node, args))
}

fn substitute_opt(node: &Option<Box<Node>>, args: &[Node]) -> Option<Box<Node>> {
    node.as_ref().map(|n| substitute_box(n, args))
}

fn substitute_rows(rows: &[Row], args: &[Node]) -> Vec<Row> {
    rows.iter()
        .map(|row| row.iter().map(|cell| substitute_one(cell, args)).collect())
        .collect()
}

/// Substitute inside one node. Only text leaves can expand into more than
/// one node; every other variant maps to exactly one clone.
fn substitute(node: &Node, args: &[Node]) -> Vec<Node> {
    let node = match node {
        Node::Text(content) => return substitute_text(content, args),
        Node::Document(children) => Node::Document(substitute_list(children, args)),
        Node::Group(children) => Node::Group(substitute_list(children, args)),
        Node::Symbol { .. }
        | Node::Operator { .. }
        | Node::ManualSizedDelimiter { .. }
        | Node::Space(_)
        | Node::HSpace(_)
        | Node::NewLine
        | Node::TextMode(_)
        | Node::NewCommand { .. } => node.clone(),
        Node::Command { name, args: cmd_args } => Node::Command {
            name: name.clone(),
            args: substitute_list(cmd_args, args),
        },
        Node::Superscript { base, script } => Node::Superscript {
            base: substitute_box(base, args),
            script: substitute_box(script, args),
        },
        Node::Subscript { base, script } => Node::Subscript {
            base: substitute_box(base, args),
            script: substitute_box(script, args),
        },
        Node::Fraction {
            numerator,
            denominator,
            style,
        } => Node::Fraction {
            numerator: substitute_box(numerator, args),
            denominator: substitute_box(denominator, args),
            style: *style,
        },
        Node::Root { content, index } => Node::Root {
            content: substitute_box(content, args),
            index: substitute_opt(index, args),
        },
        Node::Binomial { top, bottom, style } => Node::Binomial {
            top: substitute_box(top, args),
            bottom: substitute_box(bottom, args),
            style: *style,
        },
        Node::BigOperator {
            op,
            sub,
            sup,
            limits,
        } => Node::BigOperator {
            op: op.clone(),
            sub: substitute_opt(sub, args),
            sup: substitute_opt(sup, args),
            limits: *limits,
        },
        Node::Matrix {
            rows,
            kind,
            is_small,
        } => Node::Matrix {
            rows: substitute_rows(rows, args),
            kind: *kind,
            is_small: *is_small,
        },
        Node::Array { rows, alignment } => Node::Array {
            rows: substitute_rows(rows, args),
            alignment: alignment.clone(),
        },
        Node::Aligned { rows, kind } => Node::Aligned {
            rows: substitute_rows(rows, args),
            kind: *kind,
        },
        Node::Split(rows) => Node::Split(substitute_rows(rows, args)),
        Node::Eqnarray(rows) => Node::Eqnarray(substitute_rows(rows, args)),
        Node::Multline(lines) => Node::Multline(
            lines
                .iter()
                .map(|line| substitute_one(line, args))
                .collect(),
        ),
        Node::Cases(rows) => Node::Cases(
            rows.iter()
                .map(|row| CaseRow {
                    expr: substitute_one(&row.expr, args),
                    condition: row.condition.as_ref().map(|c| substitute_one(c, args)),
                })
                .collect(),
        ),
        Node::Subequations(children) => Node::Subequations(substitute_list(children, args)),
        Node::Environment { name, children } => Node::Environment {
            name: name.clone(),
            children: substitute_list(children, args),
        },
        Node::Delimited {
            left,
            right,
            content,
        } => Node::Delimited {
            left: left.clone(),
            right: right.clone(),
            content: substitute_list(content, args),
        },
        Node::Accent { content, kind } => Node::Accent {
            content: substitute_box(content, args),
            kind: *kind,
        },
        Node::ExtensibleArrow {
            content,
            below,
            direction,
        } => Node::ExtensibleArrow {
            content: substitute_box(content, args),
            below: substitute_opt(below, args),
            direction: *direction,
        },
        Node::Stack { base, above, below } => Node::Stack {
            base: substitute_box(base, args),
            above: substitute_opt(above, args),
            below: substitute_opt(below, args),
        },
        Node::Style { content, style } => Node::Style {
            content: substitute_box(content, args),
            style: *style,
        },
        Node::Color { content, color } => Node::Color {
            content: substitute_box(content, args),
            color: color.clone(),
        },
        Node::MathStyle { content, style } => Node::MathStyle {
            content: substitute_list(content, args),
            style: *style,
        },
        Node::Boxed(content) => Node::Boxed(substitute_box(content, args)),
        Node::Phantom { content, kind } => Node::Phantom {
            content: substitute_box(content, args),
            kind: *kind,
        },
    };
    vec![node]
}

/// Replace `#k` inside a text leaf.
///
/// A text argument is spliced into the string; any other argument splits the
/// leaf around a clone of the argument subtree.
fn substitute_text(content: &str, args: &[Node]) -> Vec<Node> {
    if args.is_empty() || !content.contains('#') {
        return vec![Node::Text(content.to_string())];
    }

    let mut out = Vec::new();
    let mut buffer = String::new();
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '#' {
            let index = chars
                .peek()
                .and_then(|d| d.to_digit(10))
                .filter(|&d| d >= 1 && d as usize <= args.len());
            if let Some(index) = index {
                chars.next();
                match &args[index as usize - 1] {
                    Node::Text(text) => buffer.push_str(text),
                    arg => {
                        if !buffer.is_empty() {
                            out.push(Node::Text(std::mem::take(&mut buffer)));
                        }
                        out.push(arg.clone());
                    }
                }
                continue;
            }
        }
        buffer.push(c);
    }

    if !buffer.is_empty() || out.is_empty() {
        out.push(Node::Text(buffer));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathlax_ast::FractionStyle;
    use pretty_assertions::assert_eq;

    fn frac(num: Node, den: Node) -> Node {
        Node::Fraction {
            numerator: Box::new(num),
            denominator: Box::new(den),
            style: FractionStyle::Normal,
        }
    }

    #[test]
    fn test_text_argument_stays_text() {
        let cmd = CustomCommand::new(
            "diff",
            1,
            vec![frac(Node::text("d"), Node::text("d#1"))],
        );
        let expanded = cmd.expand(&[Node::text("x")]);
        assert_eq!(
            expanded,
            Node::Group(vec![frac(Node::text("d"), Node::text("dx"))])
        );
    }

    #[test]
    fn test_subtree_argument_splits_text() {
        let cmd = CustomCommand::new("wrap", 1, vec![Node::text("a#1b")]);
        let arg = frac(Node::text("1"), Node::text("2"));
        let expanded = cmd.expand(std::slice::from_ref(&arg));
        assert_eq!(
            expanded,
            Node::Group(vec![Node::text("a"), arg, Node::text("b")])
        );
    }

    #[test]
    fn test_split_inside_single_slot_groups() {
        let cmd = CustomCommand::new(
            "f",
            1,
            vec![frac(Node::text("1"), Node::text("x#1"))],
        );
        let arg = Node::Group(vec![Node::text("y"), Node::text("+")]);
        let expanded = cmd.expand(std::slice::from_ref(&arg));
        assert_eq!(
            expanded,
            Node::Group(vec![frac(
                Node::text("1"),
                Node::Group(vec![Node::text("x"), arg])
            )])
        );
    }

    #[test]
    fn test_out_of_range_placeholder_is_literal() {
        let cmd = CustomCommand::new("f", 1, vec![Node::text("#1#2")]);
        let expanded = cmd.expand(&[Node::text("a")]);
        assert_eq!(expanded, Node::Group(vec![Node::text("a#2")]));
    }

    #[test]
    fn test_lone_hash_is_literal() {
        let cmd = CustomCommand::new("t", 1, vec![Node::text("text#")]);
        let expanded = cmd.expand(&[Node::text("a")]);
        assert_eq!(expanded, Node::Group(vec![Node::text("text#")]));

        let cmd = CustomCommand::new("t", 0, vec![Node::text("#")]);
        assert_eq!(cmd.expand(&[]), Node::Group(vec![Node::text("#")]));
    }

    #[test]
    fn test_empty_argument_keeps_a_leaf() {
        let cmd = CustomCommand::new("f", 1, vec![Node::text("#1")]);
        assert_eq!(
            cmd.expand(&[Node::empty()]),
            Node::Group(vec![Node::empty()])
        );
    }

    #[test]
    fn test_definition_is_not_mutated() {
        let cmd = CustomCommand::new("f", 1, vec![Node::text("#1")]);
        let _ = cmd.expand(&[Node::text("x")]);
        assert_eq!(cmd.definition, vec![Node::text("#1")]);
    }

    #[test]
    fn test_registry_overwrite() {
        let mut registry = MacroRegistry::new();
        assert!(registry
            .define(CustomCommand::new("a", 0, vec![Node::text("1")]))
            .is_none());
        let previous = registry.define(CustomCommand::new("a", 2, vec![Node::text("2")]));
        assert_eq!(previous.map(|c| c.arity), Some(0));
        assert_eq!(registry.get("a").map(|c| c.arity), Some(2));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names(), vec!["a"]);
    }

    #[test]
    fn test_arity_clamped() {
        assert_eq!(CustomCommand::new("x", 12, Vec::new()).arity, MAX_ARITY);
    }
}
