// ABOUTME: Parse-tree nodes, reserved-form helpers, and code-style printing

use crate::number::Number;
use crate::token::Position;
use std::fmt;

/// Reserved identifiers that quoting sugar lowers to.
pub const QUOTE: &str = "quote";
pub const QUOTE_SUBSTITUTIONS: &str = "quote-substitutions";
pub const SUBSTITUTION: &str = "substitution";
pub const SPLICING_SUBSTITUTION: &str = "splicing-substitution";
pub const INFIX: &str = "infix";

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Ident(String),
    Number(Number),
    Str(String),
    List(Vec<Expr>),
    Reference(Box<Expr>, Box<Expr>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Position,
}

impl Expr {
    pub fn new(kind: ExprKind, pos: Position) -> Self {
        Expr { kind, pos }
    }

    pub fn ident(name: impl Into<String>, pos: Position) -> Self {
        Expr::new(ExprKind::Ident(name.into()), pos)
    }

    pub fn number(num: Number, pos: Position) -> Self {
        Expr::new(ExprKind::Number(num), pos)
    }

    pub fn list(items: Vec<Expr>, pos: Position) -> Self {
        Expr::new(ExprKind::List(items), pos)
    }

    pub fn error(message: impl Into<String>, pos: Position) -> Self {
        Expr::new(ExprKind::Error(message.into()), pos)
    }

    /// Wrap an expression as `(quote expr)`.
    pub fn quoted(expr: Expr, pos: Position) -> Self {
        Expr::list(vec![Expr::ident(QUOTE, pos), expr], pos)
    }

    /// Wrap an expression as `(substitution expr)` or
    /// `(splicing-substitution expr)`.
    pub fn substitution(expr: Expr, splicing: bool, pos: Position) -> Self {
        let head = if splicing {
            SPLICING_SUBSTITUTION
        } else {
            SUBSTITUTION
        };
        Expr::list(vec![Expr::ident(head, pos), expr], pos)
    }

    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Expr]> {
        match &self.kind {
            ExprKind::List(items) => Some(items),
            _ => None,
        }
    }

    /// True for a two-element list headed by the given reserved identifier.
    fn is_tagged_pair(&self, tag: &str) -> bool {
        match &self.kind {
            ExprKind::List(items) => {
                items.len() == 2 && items[0].as_ident() == Some(tag)
            }
            _ => false,
        }
    }

    pub fn is_quote(&self) -> bool {
        self.is_tagged_pair(QUOTE)
    }

    /// Both plain and splicing substitutions count.
    pub fn is_substitution(&self) -> bool {
        self.is_tagged_pair(SUBSTITUTION) || self.is_tagged_pair(SPLICING_SUBSTITUTION)
    }

    pub fn is_splicing_substitution(&self) -> bool {
        self.is_tagged_pair(SPLICING_SUBSTITUTION)
    }

    /// Structural equality that ignores source positions. Used for the
    /// parse/print round-trip property, where reprinting moves everything.
    pub fn same_shape(&self, other: &Expr) -> bool {
        match (&self.kind, &other.kind) {
            (ExprKind::Ident(a), ExprKind::Ident(b)) => a == b,
            (ExprKind::Number(a), ExprKind::Number(b)) => a == b,
            (ExprKind::Str(a), ExprKind::Str(b)) => a == b,
            (ExprKind::Error(a), ExprKind::Error(b)) => a == b,
            (ExprKind::List(a), ExprKind::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_shape(y))
            }
            (ExprKind::Reference(a1, a2), ExprKind::Reference(b1, b2)) => {
                a1.same_shape(b1) && a2.same_shape(b2)
            }
            _ => false,
        }
    }

    /// Collect every error node in the tree, in source order.
    pub fn collect_errors<'a>(&'a self, out: &mut Vec<(&'a str, Position)>) {
        match &self.kind {
            ExprKind::Error(message) => out.push((message, self.pos)),
            ExprKind::List(items) => {
                for item in items {
                    item.collect_errors(out);
                }
            }
            ExprKind::Reference(obj, member) => {
                obj.collect_errors(out);
                member.collect_errors(out);
            }
            _ => {}
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    /// Print the tree as source text. Quoting sugar is re-sugared, so an
    /// error-free tree reparses to an equal tree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Ident(name) => write!(f, "{}", name),
            ExprKind::Number(num) => write!(f, "{}", num),
            ExprKind::Str(text) => write!(f, "\"{}\"", text),
            ExprKind::Reference(obj, member) => write!(f, "{}:{}", obj, member),
            ExprKind::Error(message) => write!(f, "#<parse-error: {}>", message),
            ExprKind::List(items) => {
                if self.is_quote() {
                    return write!(f, "'{}", items[1]);
                }
                if self.is_tagged_pair(SUBSTITUTION) {
                    return write!(f, "${}", items[1]);
                }
                if self.is_tagged_pair(SPLICING_SUBSTITUTION) {
                    return write!(f, "$@{}", items[1]);
                }
                if self.is_tagged_pair(QUOTE_SUBSTITUTIONS) {
                    if let Some(inner) = items[1].as_list() {
                        write!(f, "[")?;
                        write_items(f, inner)?;
                        return write!(f, "]");
                    }
                }
                if self.is_tagged_pair(INFIX) {
                    if let Some(inner) = items[1].as_list() {
                        write!(f, "{{")?;
                        write_items(f, inner)?;
                        return write!(f, "}}");
                    }
                }
                write!(f, "(")?;
                write_items(f, items)?;
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(kind: ExprKind) -> Expr {
        Expr::new(kind, Position::default())
    }

    #[test]
    fn test_display_list() {
        let expr = at(ExprKind::List(vec![
            at(ExprKind::Ident("+".into())),
            at(ExprKind::Number(Number::Int(1))),
            at(ExprKind::Number(Number::Int(2))),
        ]));
        assert_eq!(format!("{}", expr), "(+ 1 2)");
    }

    #[test]
    fn test_display_resugars_quote_forms() {
        let pos = Position::default();
        let quoted = Expr::quoted(Expr::ident("x", pos), pos);
        assert_eq!(format!("{}", quoted), "'x");

        let subst = Expr::substitution(Expr::ident("x", pos), false, pos);
        assert_eq!(format!("{}", subst), "$x");

        let splice = Expr::substitution(Expr::ident("x", pos), true, pos);
        assert_eq!(format!("{}", splice), "$@x");
    }

    #[test]
    fn test_display_reference() {
        let pos = Position::default();
        let expr = at(ExprKind::Reference(
            Box::new(Expr::ident("obj", pos)),
            Box::new(Expr::ident("member", pos)),
        ));
        assert_eq!(format!("{}", expr), "obj:member");
    }

    #[test]
    fn test_substitution_predicates() {
        let pos = Position::default();
        let subst = Expr::substitution(Expr::ident("x", pos), false, pos);
        let splice = Expr::substitution(Expr::ident("x", pos), true, pos);
        assert!(subst.is_substitution());
        assert!(!subst.is_splicing_substitution());
        assert!(splice.is_substitution());
        assert!(splice.is_splicing_substitution());
    }

    #[test]
    fn test_collect_errors_walks_nested_nodes() {
        let pos = Position::new(2, 4, 0);
        let tree = at(ExprKind::List(vec![
            at(ExprKind::Ident("ok".into())),
            at(ExprKind::List(vec![Expr::error("bad thing", pos)])),
        ]));
        let mut errors = Vec::new();
        tree.collect_errors(&mut errors);
        assert_eq!(errors, vec![("bad thing", pos)]);
    }

    #[test]
    fn test_same_shape_ignores_positions() {
        let a = Expr::ident("x", Position::new(0, 0, 0));
        let b = Expr::ident("x", Position::new(5, 3, 1));
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&Expr::ident("y", Position::default())));
    }
}
