//! Static command tables for the command and environment sub-parsers.

use mathlax_ast::{AccentKind, DelimiterRole, FontStyle, MathStyleKind, MatrixKind, SpaceKind};
use phf::{phf_map, phf_set};

/// Large operators whose scripts are parsed as fields of the node.
pub static BIG_OPERATORS: phf::Set<&'static str> = phf_set! {
    "sum", "prod", "coprod", "int", "oint", "iint", "iiint",
    "bigcup", "bigcap", "bigvee", "bigwedge", "bigoplus", "bigotimes", "bigodot", "biguplus", "bigsqcup",
    "lim", "max", "min", "sup", "inf", "limsup", "liminf",
};

/// Upright named functions, rendered as [`mathlax_ast::Node::Operator`].
pub static FUNCTION_OPERATORS: phf::Set<&'static str> = phf_set! {
    "sin", "cos", "tan", "cot", "sec", "csc",
    "arcsin", "arccos", "arctan",
    "sinh", "cosh", "tanh", "coth",
    "log", "ln", "lg", "exp",
    "det", "dim", "ker", "deg", "arg", "gcd", "hom", "Pr",
};

/// Font style commands, math and text-mode spellings.
pub static FONT_STYLES: phf::Map<&'static str, FontStyle> = phf_map! {
    "mathbf" => FontStyle::Bold,
    "textbf" => FontStyle::Bold,
    "boldsymbol" => FontStyle::BoldSymbol,
    "bm" => FontStyle::BoldSymbol,
    "mathit" => FontStyle::Italic,
    "textit" => FontStyle::Italic,
    "mathrm" => FontStyle::Roman,
    "textrm" => FontStyle::Roman,
    "mathsf" => FontStyle::SansSerif,
    "textsf" => FontStyle::SansSerif,
    "mathtt" => FontStyle::Monospace,
    "texttt" => FontStyle::Monospace,
    "mathbb" => FontStyle::Blackboard,
    "mathfrak" => FontStyle::Fraktur,
    "mathscr" => FontStyle::Script,
    "mathcal" => FontStyle::Calligraphic,
};

pub static ACCENTS: phf::Map<&'static str, AccentKind> = phf_map! {
    "hat" => AccentKind::Hat,
    "widehat" => AccentKind::WideHat,
    "tilde" => AccentKind::Tilde,
    "widetilde" => AccentKind::Tilde,
    "bar" => AccentKind::Bar,
    "overline" => AccentKind::Bar,
    "underline" => AccentKind::Underline,
    "dot" => AccentKind::Dot,
    "ddot" => AccentKind::DDot,
    "vec" => AccentKind::Vec,
    "overbrace" => AccentKind::OverBrace,
    "underbrace" => AccentKind::UnderBrace,
    "overrightarrow" => AccentKind::OverRightArrow,
    "overleftarrow" => AccentKind::OverLeftArrow,
    "cancel" => AccentKind::Cancel,
    "check" => AccentKind::Check,
    "breve" => AccentKind::Breve,
    "acute" => AccentKind::Acute,
    "grave" => AccentKind::Grave,
};

/// Fixed-width spacing commands.
pub static SPACES: phf::Map<&'static str, SpaceKind> = phf_map! {
    " " => SpaceKind::Normal,
    "," => SpaceKind::Thin,
    "thinspace" => SpaceKind::Thin,
    ":" => SpaceKind::Medium,
    ">" => SpaceKind::Medium,
    ";" => SpaceKind::Thick,
    "quad" => SpaceKind::Quad,
    "qquad" => SpaceKind::QQuad,
    "!" => SpaceKind::NegativeThin,
    "negthinspace" => SpaceKind::NegativeThin,
};

pub static MATH_STYLES: phf::Map<&'static str, MathStyleKind> = phf_map! {
    "displaystyle" => MathStyleKind::Display,
    "textstyle" => MathStyleKind::Text,
    "scriptstyle" => MathStyleKind::Script,
    "scriptscriptstyle" => MathStyleKind::ScriptScript,
};

/// Manually sized delimiters: scale factor and role from the suffix.
pub static SIZED_DELIMITERS: phf::Map<&'static str, (f32, DelimiterRole)> = phf_map! {
    "big" => (1.2, DelimiterRole::Plain),
    "bigl" => (1.2, DelimiterRole::Left),
    "bigr" => (1.2, DelimiterRole::Right),
    "bigm" => (1.2, DelimiterRole::Middle),
    "Big" => (1.8, DelimiterRole::Plain),
    "Bigl" => (1.8, DelimiterRole::Left),
    "Bigr" => (1.8, DelimiterRole::Right),
    "Bigm" => (1.8, DelimiterRole::Middle),
    "bigg" => (2.4, DelimiterRole::Plain),
    "biggl" => (2.4, DelimiterRole::Left),
    "biggr" => (2.4, DelimiterRole::Right),
    "biggm" => (2.4, DelimiterRole::Middle),
    "Bigg" => (3.0, DelimiterRole::Plain),
    "Biggl" => (3.0, DelimiterRole::Left),
    "Biggr" => (3.0, DelimiterRole::Right),
    "Biggm" => (3.0, DelimiterRole::Middle),
};

/// Delimiters spelled as commands, mapped to their canonical glyph.
pub static DELIMITER_COMMANDS: phf::Map<&'static str, &'static str> = phf_map! {
    "{" => "{",
    "}" => "}",
    "lbrace" => "{",
    "rbrace" => "}",
    "langle" => "⟨",
    "rangle" => "⟩",
    "lfloor" => "⌊",
    "rfloor" => "⌋",
    "lceil" => "⌈",
    "rceil" => "⌉",
    "vert" => "|",
    "lvert" => "|",
    "rvert" => "|",
    "|" => "‖",
    "Vert" => "‖",
    "lVert" => "‖",
    "rVert" => "‖",
    "backslash" => "\\",
    "uparrow" => "↑",
    "downarrow" => "↓",
    "updownarrow" => "↕",
};

/// Matrix environments and their bracket type.
pub static MATRIX_ENVIRONMENTS: phf::Map<&'static str, MatrixKind> = phf_map! {
    "matrix" => MatrixKind::Plain,
    "smallmatrix" => MatrixKind::Plain,
    "pmatrix" => MatrixKind::Paren,
    "bmatrix" => MatrixKind::Bracket,
    "Bmatrix" => MatrixKind::Brace,
    "vmatrix" => MatrixKind::Vbar,
    "Vmatrix" => MatrixKind::DoubleVbar,
};

/// Map a single-character delimiter to its canonical glyph.
pub fn delimiter_char(c: char) -> Option<&'static str> {
    Some(match c {
        '(' => "(",
        ')' => ")",
        '|' => "|",
        '/' => "/",
        '.' => ".",
        '<' => "⟨",
        '>' => "⟩",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sized_delimiter_scales() {
        assert_eq!(SIZED_DELIMITERS.get("big").map(|d| d.0), Some(1.2));
        assert_eq!(SIZED_DELIMITERS.get("Bigm").map(|d| d.0), Some(1.8));
        assert_eq!(SIZED_DELIMITERS.get("biggr").map(|d| d.0), Some(2.4));
        assert_eq!(SIZED_DELIMITERS.get("Biggl").map(|d| d.0), Some(3.0));
    }

    #[test]
    fn test_tables_disjoint() {
        for name in BIG_OPERATORS.iter() {
            assert!(!FUNCTION_OPERATORS.contains(name), "{} in both", name);
        }
    }

    #[test]
    fn test_delimiter_char() {
        assert_eq!(delimiter_char('<'), Some("⟨"));
        assert_eq!(delimiter_char('x'), None);
    }
}
