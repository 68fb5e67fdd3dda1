//! Document tree produced by the mathlax parser.
//!
//! The tree is a closed sum type: every consumer matches on [`Node`]
//! exhaustively, so adding a variant is a compile error everywhere it is
//! not yet handled. Children are always visited in reading order (see
//! [`Node::children`]).

mod visit;

pub use visit::{walk_node, Visitor};

/// One row of a matrix-like node. Each entry is a cell.
pub type Row = Vec<Node>;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    Document(Vec<Node>),
    Text(String),
    Symbol {
        name: String,
        glyph: String,
    },
    Operator {
        name: String,
        limits: bool,
    },
    Command {
        name: String,
        args: Vec<Node>,
    },
    Group(Vec<Node>),
    Superscript {
        base: Box<Node>,
        script: Box<Node>,
    },
    Subscript {
        base: Box<Node>,
        script: Box<Node>,
    },
    Fraction {
        numerator: Box<Node>,
        denominator: Box<Node>,
        style: FractionStyle,
    },
    Root {
        content: Box<Node>,
        index: Option<Box<Node>>,
    },
    Binomial {
        top: Box<Node>,
        bottom: Box<Node>,
        style: BinomialStyle,
    },
    BigOperator {
        op: String,
        sub: Option<Box<Node>>,
        sup: Option<Box<Node>>,
        limits: LimitsMode,
    },
    Matrix {
        rows: Vec<Row>,
        kind: MatrixKind,
        is_small: bool,
    },
    Array {
        rows: Vec<Row>,
        alignment: String,
    },
    Aligned {
        rows: Vec<Row>,
        kind: AlignedKind,
    },
    Split(Vec<Row>),
    Eqnarray(Vec<Row>),
    Multline(Vec<Node>),
    Cases(Vec<CaseRow>),
    Subequations(Vec<Node>),
    Environment {
        name: String,
        children: Vec<Node>,
    },
    Delimited {
        left: String,
        right: String,
        content: Vec<Node>,
    },
    ManualSizedDelimiter {
        glyph: String,
        scale: f32,
        role: DelimiterRole,
    },
    Accent {
        content: Box<Node>,
        kind: AccentKind,
    },
    ExtensibleArrow {
        content: Box<Node>,
        below: Option<Box<Node>>,
        direction: ArrowDirection,
    },
    Stack {
        base: Box<Node>,
        above: Option<Box<Node>>,
        below: Option<Box<Node>>,
    },
    Style {
        content: Box<Node>,
        style: FontStyle,
    },
    Color {
        content: Box<Node>,
        color: String,
    },
    MathStyle {
        content: Vec<Node>,
        style: MathStyleKind,
    },
    Space(SpaceKind),
    HSpace(String),
    NewLine,
    TextMode(String),
    Boxed(Box<Node>),
    Phantom {
        content: Box<Node>,
        kind: PhantomKind,
    },
    NewCommand {
        name: String,
        arity: u8,
        definition: Vec<Node>,
    },
}

/// A `cases` row: the expression column and the optional condition column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseRow {
    pub expr: Node,
    pub condition: Option<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FractionStyle {
    Normal,
    Text,
    Display,
    Continued,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinomialStyle {
    Normal,
    Text,
    Display,
}

/// Placement of a big operator's scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LimitsMode {
    /// No explicit `\limits`/`\nolimits`; the renderer decides.
    #[default]
    Default,
    Limits,
    NoLimits,
}

/// Bracket type of a matrix environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatrixKind {
    /// `matrix`, `smallmatrix`
    Plain,
    /// `pmatrix`
    Paren,
    /// `bmatrix`
    Bracket,
    /// `Bmatrix`
    Brace,
    /// `vmatrix`
    Vbar,
    /// `Vmatrix`
    DoubleVbar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignedKind {
    Align,
    Gather,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DelimiterRole {
    Plain,
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccentKind {
    Hat,
    WideHat,
    Tilde,
    Bar,
    Underline,
    Dot,
    DDot,
    Vec,
    OverBrace,
    UnderBrace,
    OverRightArrow,
    OverLeftArrow,
    Cancel,
    Check,
    Breve,
    Acute,
    Grave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArrowDirection {
    Right,
    Left,
    LeftRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontStyle {
    Bold,
    BoldSymbol,
    Italic,
    Roman,
    SansSerif,
    Monospace,
    Blackboard,
    Fraktur,
    Script,
    Calligraphic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MathStyleKind {
    Display,
    Text,
    Script,
    ScriptScript,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpaceKind {
    /// Source whitespace or `\ `
    Normal,
    /// `\,`
    Thin,
    /// `\:`
    Medium,
    /// `\;`
    Thick,
    Quad,
    QQuad,
    /// `\!`
    NegativeThin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhantomKind {
    Full,
    Horizontal,
    Vertical,
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    /// The empty text node used wherever an argument is missing.
    pub fn empty() -> Self {
        Node::Text(String::new())
    }

    /// Collapse a node list into one node: the node itself when there is
    /// exactly one, a [`Node::Group`] otherwise.
    pub fn from_children(mut children: Vec<Node>) -> Self {
        if children.len() == 1 {
            children.remove(0)
        } else {
            Node::Group(children)
        }
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, Node::Text(s) if s.is_empty())
    }

    /// Top-level children when this node is a [`Node::Document`].
    pub fn as_document(&self) -> Option<&[Node]> {
        match self {
            Node::Document(children) => Some(children),
            _ => None,
        }
    }

    /// Short variant name, stable across releases.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Document(_) => "Document",
            Node::Text(_) => "Text",
            Node::Symbol { .. } => "Symbol",
            Node::Operator { .. } => "Operator",
            Node::Command { .. } => "Command",
            Node::Group(_) => "Group",
            Node::Superscript { .. } => "Superscript",
            Node::Subscript { .. } => "Subscript",
            Node::Fraction { .. } => "Fraction",
            Node::Root { .. } => "Root",
            Node::Binomial { .. } => "Binomial",
            Node::BigOperator { .. } => "BigOperator",
            Node::Matrix { .. } => "Matrix",
            Node::Array { .. } => "Array",
            Node::Aligned { .. } => "Aligned",
            Node::Split(_) => "Split",
            Node::Eqnarray(_) => "Eqnarray",
            Node::Multline(_) => "Multline",
            Node::Cases(_) => "Cases",
            Node::Subequations(_) => "Subequations",
            Node::Environment { .. } => "Environment",
            Node::Delimited { .. } => "Delimited",
            Node::ManualSizedDelimiter { .. } => "ManualSizedDelimiter",
            Node::Accent { .. } => "Accent",
            Node::ExtensibleArrow { .. } => "ExtensibleArrow",
            Node::Stack { .. } => "Stack",
            Node::Style { .. } => "Style",
            Node::Color { .. } => "Color",
            Node::MathStyle { .. } => "MathStyle",
            Node::Space(_) => "Space",
            Node::HSpace(_) => "HSpace",
            Node::NewLine => "NewLine",
            Node::TextMode(_) => "TextMode",
            Node::Boxed(_) => "Boxed",
            Node::Phantom { .. } => "Phantom",
            Node::NewCommand { .. } => "NewCommand",
        }
    }

    /// Direct children in reading order.
    ///
    /// Scripts yield base then script; matrix-like nodes yield rows top to
    /// bottom and cells left to right; a big operator yields its subscript
    /// before its superscript. `NewCommand` definitions are not part of the
    /// rendered output and yield nothing.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Document(children)
            | Node::Group(children)
            | Node::Multline(children)
            | Node::Subequations(children)
            | Node::Environment { children, .. }
            | Node::Delimited {
                content: children, ..
            }
            | Node::MathStyle {
                content: children, ..
            }
            | Node::Command { args: children, .. } => children.iter().collect(),
            Node::Text(_)
            | Node::Symbol { .. }
            | Node::Operator { .. }
            | Node::ManualSizedDelimiter { .. }
            | Node::Space(_)
            | Node::HSpace(_)
            | Node::NewLine
            | Node::TextMode(_)
            | Node::NewCommand { .. } => Vec::new(),
            Node::Superscript { base, script } | Node::Subscript { base, script } => {
                vec![base.as_ref(), script.as_ref()]
            }
            Node::Fraction {
                numerator,
                denominator,
                ..
            } => vec![numerator.as_ref(), denominator.as_ref()],
            Node::Root { content, index } => {
                let mut out = Vec::with_capacity(2);
                if let Some(index) = index {
                    out.push(index.as_ref());
                }
                out.push(content.as_ref());
                out
            }
            Node::Binomial { top, bottom, .. } => vec![top.as_ref(), bottom.as_ref()],
            Node::BigOperator { sub, sup, .. } => sub
                .iter()
                .chain(sup.iter())
                .map(|n| n.as_ref())
                .collect(),
            Node::Matrix { rows, .. }
            | Node::Array { rows, .. }
            | Node::Aligned { rows, .. }
            | Node::Split(rows)
            | Node::Eqnarray(rows) => rows.iter().flatten().collect(),
            Node::Cases(rows) => rows
                .iter()
                .flat_map(|row| std::iter::once(&row.expr).chain(row.condition.iter()))
                .collect(),
            Node::Accent { content, .. }
            | Node::Style { content, .. }
            | Node::Color { content, .. }
            | Node::Boxed(content)
            | Node::Phantom { content, .. } => vec![content.as_ref()],
            Node::ExtensibleArrow { content, below, .. } => {
                let mut out = vec![content.as_ref()];
                if let Some(below) = below {
                    out.push(below.as_ref());
                }
                out
            }
            Node::Stack { base, above, below } => {
                let mut out = Vec::with_capacity(3);
                if let Some(above) = above {
                    out.push(above.as_ref());
                }
                out.push(base.as_ref());
                if let Some(below) = below {
                    out.push(below.as_ref());
                }
                out
            }
        }
    }

    /// Pre-order traversal.
    pub fn walk<F: FnMut(&Node)>(&self, f: &mut F) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    /// Concatenated leaf text in reading order.
    pub fn flatten_text(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |node| match node {
            Node::Text(s) | Node::TextMode(s) => out.push_str(s),
            Node::Symbol { glyph, .. } => out.push_str(glyph),
            Node::Operator { name, .. } => out.push_str(name),
            Node::BigOperator { op, .. } => out.push_str(op),
            _ => {}
        });
        out
    }

    /// Count of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    /// Indented one-node-per-line dump of the subtree.
    pub fn to_tree_string(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(self.kind_name());
        if let Some(label) = self.label() {
            out.push(' ');
            out.push_str(&label);
        }
        out.push('\n');
        for child in self.children() {
            child.write_tree(out, depth + 1);
        }
    }

    fn label(&self) -> Option<String> {
        match self {
            Node::Text(s) | Node::TextMode(s) | Node::HSpace(s) => Some(format!("{:?}", s)),
            Node::Symbol { name, glyph } => Some(format!("\\{} {}", name, glyph)),
            Node::Operator { name, limits } => {
                Some(if *limits { format!("{} limits", name) } else { name.clone() })
            }
            Node::Command { name, .. } => Some(format!("\\{}", name)),
            Node::Fraction { style, .. } => Some(format!("{:?}", style)),
            Node::Binomial { style, .. } => Some(format!("{:?}", style)),
            Node::BigOperator { op, limits, .. } => Some(format!("{} {:?}", op, limits)),
            Node::Matrix { kind, is_small, .. } => Some(if *is_small {
                format!("{:?} small", kind)
            } else {
                format!("{:?}", kind)
            }),
            Node::Array { alignment, .. } => Some(format!("{{{}}}", alignment)),
            Node::Aligned { kind, .. } => Some(format!("{:?}", kind)),
            Node::Environment { name, .. } => Some(name.clone()),
            Node::Delimited { left, right, .. } => Some(format!("{} {}", left, right)),
            Node::ManualSizedDelimiter { glyph, scale, role } => {
                Some(format!("{} x{} {:?}", glyph, scale, role))
            }
            Node::Accent { kind, .. } => Some(format!("{:?}", kind)),
            Node::ExtensibleArrow { direction, .. } => Some(format!("{:?}", direction)),
            Node::Style { style, .. } => Some(format!("{:?}", style)),
            Node::Color { color, .. } => Some(color.clone()),
            Node::MathStyle { style, .. } => Some(format!("{:?}", style)),
            Node::Space(kind) => Some(format!("{:?}", kind)),
            Node::Phantom { kind, .. } => Some(format!("{:?}", kind)),
            Node::NewCommand { name, arity, .. } => Some(format!("\\{} [{}]", name, arity)),
            _ => None,
        }
    }
}
