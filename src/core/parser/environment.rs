//! Environment sub-parser
//!
//! Handles `\begin{name} ... \end{name}` blocks. Tabular families share one
//! row scanner: `&` ends a cell, `\\` ends a row. The alignment families
//! close on any `\end`, so an alignment nested in another environment can
//! never run away; everything else waits for its own name and drops
//! mismatched terminators on the way.

use log::debug;
use mathlax_ast::{AlignedKind, CaseRow, Node, Row, SpaceKind};

use super::context::ParseSession;
use super::expression::{parse_expression, parse_raw_optional, read_raw_group};
use crate::core::engine::{detokenize, Token, TokenKind};
use crate::data::maps::MATRIX_ENVIRONMENTS;
use crate::utils::error::{ParseError, ParseResult};

/// Which `\end` closes a scanned environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    /// Only `\end{name}`; others are discarded
    Exact,
    /// The first `\end{..}` of any name
    Any,
}

/// Parse the environment whose `\begin{name}` has just been consumed.
pub fn parse_environment(s: &mut ParseSession, name: &str) -> ParseResult<Node> {
    let base = name.trim_end_matches('*');

    if let Some(&kind) = MATRIX_ENVIRONMENTS.get(base) {
        let rows = scan_rows(s, name, Terminator::Exact, true)?;
        return Ok(Node::Matrix {
            rows,
            kind,
            is_small: base == "smallmatrix",
        });
    }

    match base {
        "array" => {
            // vertical position `[t]` / `[b]`
            parse_raw_optional(s)?;
            let alignment = read_column_spec(s)?;
            let rows = scan_rows(s, name, Terminator::Exact, true)?;
            Ok(Node::Array { rows, alignment })
        }
        "align" | "aligned" | "flalign" | "alignat" | "alignedat" => {
            if matches!(base, "alignat" | "alignedat") {
                read_column_spec(s)?;
            }
            let rows = scan_rows(s, name, Terminator::Any, true)?;
            Ok(Node::Aligned {
                rows,
                kind: AlignedKind::Align,
            })
        }
        "gather" | "gathered" => {
            let rows = scan_rows(s, name, Terminator::Any, true)?;
            Ok(Node::Aligned {
                rows,
                kind: AlignedKind::Gather,
            })
        }
        "split" => Ok(Node::Split(scan_rows(s, name, Terminator::Any, true)?)),
        "eqnarray" => Ok(Node::Eqnarray(scan_rows(s, name, Terminator::Exact, true)?)),
        "multline" => {
            let lines = scan_rows(s, name, Terminator::Exact, false)?
                .into_iter()
                .map(Node::from_children)
                .collect();
            Ok(Node::Multline(lines))
        }
        "cases" | "dcases" | "rcases" => parse_cases(s, name),
        "subequations" => Ok(Node::Subequations(parse_body(s, name)?)),
        _ => Ok(Node::Environment {
            name: name.to_string(),
            children: parse_body(s, name)?,
        }),
    }
}

/// Body of a non-tabular environment, up to its own `\end{name}`.
fn parse_body(s: &mut ParseSession, name: &str) -> ParseResult<Vec<Node>> {
    let mut children = Vec::new();
    loop {
        match s.cursor.peek_kind() {
            TokenKind::Eof => return Err(unterminated(name)),
            TokenKind::EndEnvironment => {
                if end_closes(s, name, Terminator::Exact) {
                    return Ok(children);
                }
            }
            _ => {
                if let Some(node) = parse_expression(s)? {
                    children.push(node);
                }
            }
        }
    }
}

/// Rows of cells up to the terminating `\end`.
///
/// With `columns == false` an `&` is dropped and every row holds one cell.
fn scan_rows(
    s: &mut ParseSession,
    name: &str,
    terminator: Terminator,
    columns: bool,
) -> ParseResult<Vec<Row>> {
    let mut rows: Vec<Row> = Vec::new();
    let mut row: Row = Vec::new();
    let mut cell: Vec<Node> = Vec::new();

    loop {
        match s.cursor.peek_kind() {
            TokenKind::Eof => return Err(unterminated(name)),
            TokenKind::EndEnvironment => {
                if end_closes(s, name, terminator) {
                    break;
                }
            }
            TokenKind::Ampersand => {
                s.cursor.advance();
                if columns {
                    row.push(finish_cell(std::mem::take(&mut cell)));
                }
            }
            TokenKind::NewLine => {
                s.cursor.advance();
                // `\\[2pt]`
                parse_raw_optional(s)?;
                row.push(finish_cell(std::mem::take(&mut cell)));
                rows.push(std::mem::take(&mut row));
            }
            TokenKind::Command if is_rule(s.cursor.peek(0)) => {
                s.cursor.advance();
            }
            _ => {
                if let Some(node) = parse_expression(s)? {
                    cell.push(node);
                }
            }
        }
    }

    let last = finish_cell(cell);
    if !(row.is_empty() && last.is_empty_text()) {
        row.push(last);
        rows.push(row);
    }
    Ok(rows)
}

/// Two columns per row: the expression, then the condition after `&`.
/// Further `&` separators fold into the condition; blank rows are dropped.
fn parse_cases(s: &mut ParseSession, name: &str) -> ParseResult<Node> {
    let rows = scan_rows(s, name, Terminator::Exact, true)?;
    let cases = rows
        .into_iter()
        .filter(|row| !row.iter().all(Node::is_empty_text))
        .map(|row| {
            let mut cells = row.into_iter();
            let expr = cells.next().unwrap_or_else(Node::empty);
            let rest: Vec<Node> = cells.filter(|cell| !cell.is_empty_text()).collect();
            let condition = if rest.is_empty() {
                None
            } else {
                Some(Node::from_children(rest))
            };
            CaseRow { expr, condition }
        })
        .collect();
    Ok(Node::Cases(cases))
}

/// Consume the `\end{..}` at the cursor and report whether it closes
/// `name`. A non-closing terminator is discarded.
fn end_closes(s: &mut ParseSession, name: &str, terminator: Terminator) -> bool {
    let Some(Token::EndEnvironment(end)) = s.cursor.advance() else {
        return false;
    };
    if terminator == Terminator::Any || end == name {
        if end != name {
            debug!("\\end{{{}}} closes \\begin{{{}}}", end, name);
        }
        return true;
    }
    debug!("discarding mismatched \\end{{{}}} inside {}", end, name);
    false
}

fn is_rule(token: Option<&Token>) -> bool {
    matches!(token, Some(Token::Command(name)) if name == "hline" || name == "hdashline")
}

/// Optional `{spec}` after `\begin{array}` or `\begin{alignat}`.
fn read_column_spec(s: &mut ParseSession) -> ParseResult<String> {
    let offset = usize::from(s.cursor.peek_kind() == TokenKind::Whitespace);
    if !matches!(s.cursor.peek(offset), Some(Token::LeftBrace)) {
        return Ok("c".to_string());
    }
    s.cursor.skip_whitespace();
    let spec: String = detokenize(&read_raw_group(s)?)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if spec.is_empty() {
        Ok("c".to_string())
    } else {
        Ok(spec)
    }
}

/// Trim surrounding spaces; an empty cell is an empty text node.
fn finish_cell(mut cell: Vec<Node>) -> Node {
    while matches!(cell.last(), Some(Node::Space(SpaceKind::Normal))) {
        cell.pop();
    }
    let start = cell
        .iter()
        .position(|node| *node != Node::Space(SpaceKind::Normal))
        .unwrap_or(cell.len());
    cell.drain(..start);
    if cell.is_empty() {
        Node::empty()
    } else {
        Node::from_children(cell)
    }
}

fn unterminated(name: &str) -> ParseError {
    ParseError::unterminated(format!("environment '{}' (missing \\end{{{}}})", name, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::MacroRegistry;
    use crate::core::parser::expression::parse_document;
    use crate::data::StandardSymbols;
    use mathlax_ast::MatrixKind;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> ParseResult<Node> {
        let mut macros = MacroRegistry::new();
        let symbols = StandardSymbols;
        let mut session = ParseSession::new(input, &mut macros, &symbols, 64);
        parse_document(&mut session)
    }

    fn parse_one(input: &str) -> Node {
        match parse(input).unwrap() {
            Node::Document(mut children) => {
                assert_eq!(children.len(), 1, "expected one node, got {:?}", children);
                children.remove(0)
            }
            other => panic!("not a document: {:?}", other),
        }
    }

    fn t(s: &str) -> Node {
        Node::text(s)
    }

    #[test]
    fn test_pmatrix() {
        assert_eq!(
            parse_one("\\begin{pmatrix} a & b \\\\ c & d \\end{pmatrix}"),
            Node::Matrix {
                rows: vec![vec![t("a"), t("b")], vec![t("c"), t("d")]],
                kind: MatrixKind::Paren,
                is_small: false,
            }
        );
    }

    #[test]
    fn test_ragged_rows_and_trailing_break() {
        assert_eq!(
            parse_one("\\begin{smallmatrix}a&b\\\\c\\\\\\end{smallmatrix}"),
            Node::Matrix {
                rows: vec![vec![t("a"), t("b")], vec![t("c")]],
                kind: MatrixKind::Plain,
                is_small: true,
            }
        );
    }

    #[test]
    fn test_empty_matrix() {
        assert_eq!(
            parse_one("\\begin{bmatrix}\\end{bmatrix}"),
            Node::Matrix {
                rows: Vec::new(),
                kind: MatrixKind::Bracket,
                is_small: false,
            }
        );
    }

    #[test]
    fn test_array_alignment() {
        assert_eq!(
            parse_one("\\begin{array}{c|l}1&2\\\\\\hline 3&4\\end{array}"),
            Node::Array {
                rows: vec![vec![t("1"), t("2")], vec![t("3"), t("4")]],
                alignment: "c|l".to_string(),
            }
        );
        assert!(matches!(
            parse_one("\\begin{array}x\\end{array}"),
            Node::Array { ref alignment, .. } if alignment == "c"
        ));
    }

    #[test]
    fn test_row_spacing_skipped() {
        assert_eq!(
            parse_one("\\begin{matrix}a\\\\[2pt]b\\end{matrix}"),
            Node::Matrix {
                rows: vec![vec![t("a")], vec![t("b")]],
                kind: MatrixKind::Plain,
                is_small: false,
            }
        );
    }

    #[test]
    fn test_aligned_inside_equation() {
        let node = parse_one(
            "\\begin{equation}\\begin{aligned}a&=b\\\\c&=d\\end{aligned}\\end{equation}",
        );
        let Node::Environment { name, children } = node else {
            panic!("expected environment");
        };
        assert_eq!(name, "equation");
        assert_eq!(children.len(), 1);
        let Node::Aligned { rows, kind } = &children[0] else {
            panic!("expected aligned, got {:?}", children[0]);
        };
        assert_eq!(*kind, AlignedKind::Align);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], Node::Group(vec![t("="), t("b")]));
    }

    #[test]
    fn test_aligned_closes_on_any_end() {
        assert_eq!(
            parse("\\begin{align*}a\\end{gather}").unwrap(),
            Node::Document(vec![Node::Aligned {
                rows: vec![vec![t("a")]],
                kind: AlignedKind::Align,
            }])
        );
    }

    #[test]
    fn test_alignat_skips_column_count() {
        assert_eq!(
            parse_one("\\begin{alignat}{2}x&y\\end{alignat}"),
            Node::Aligned {
                rows: vec![vec![t("x"), t("y")]],
                kind: AlignedKind::Align,
            }
        );
    }

    #[test]
    fn test_gather() {
        assert!(matches!(
            parse_one("\\begin{gathered}a\\\\b\\end{gathered}"),
            Node::Aligned { kind: AlignedKind::Gather, ref rows } if rows.len() == 2
        ));
    }

    #[test]
    fn test_mismatched_end_discarded() {
        assert_eq!(
            parse_one("\\begin{eqnarray}a\\end{pmatrix}&b\\end{eqnarray}"),
            Node::Eqnarray(vec![vec![t("a"), t("b")]])
        );
    }

    #[test]
    fn test_multline_ignores_ampersand() {
        assert_eq!(
            parse_one("\\begin{multline*}a&b\\\\c\\end{multline*}"),
            Node::Multline(vec![Node::Group(vec![t("a"), t("b")]), t("c")])
        );
    }

    #[test]
    fn test_cases() {
        assert_eq!(
            parse_one("\\begin{cases} 1 & x>0 \\\\ 0 \\end{cases}"),
            Node::Cases(vec![
                CaseRow {
                    expr: t("1"),
                    condition: Some(Node::Group(vec![t("x"), t(">"), t("0")])),
                },
                CaseRow {
                    expr: t("0"),
                    condition: None,
                },
            ])
        );
    }

    #[test]
    fn test_subequations_and_unknown() {
        assert_eq!(
            parse_one("\\begin{subequations}x\\end{subequations}"),
            Node::Subequations(vec![t("x")])
        );
        assert_eq!(
            parse_one("\\begin{foo}x\\end{bar}y\\end{foo}"),
            Node::Environment {
                name: "foo".to_string(),
                children: vec![t("x"), t("y")],
            }
        );
    }

    #[test]
    fn test_unterminated_environment_fails() {
        assert!(matches!(
            parse("\\begin{pmatrix}a&b"),
            Err(ParseError::Unterminated { .. })
        ));
        assert!(parse("\\begin{equation}x").is_err());
    }

    #[test]
    fn test_finish_cell_trims_spaces() {
        let space = Node::Space(SpaceKind::Normal);
        assert_eq!(
            finish_cell(vec![space.clone(), t("a"), space.clone(), t("b"), space.clone()]),
            Node::Group(vec![t("a"), space, t("b")])
        );
        assert_eq!(finish_cell(Vec::new()), Node::empty());
    }
}
