// ABOUTME: Recursive-descent parser turning tokens into parse trees with error nodes

use crate::ast::{Expr, ExprKind, INFIX, QUOTE_SUBSTITUTIONS};
use crate::number;
use crate::token::{Position, Token, TokenKind};

/// Parse every top-level expression in the token stream. Malformed input
/// becomes error nodes embedded in the result, never a panic: the caller
/// walks the trees with [`diagnostics`] before evaluating anything.
pub fn parse_tokens(tokens: Vec<Token>) -> Vec<Expr> {
    let mut parser = Parser::new(tokens);
    let mut program = Vec::new();
    while let Some(expr) = parser.parse_expr() {
        program.push(expr);
    }
    program
}

/// Collect formatted parse diagnostics for a whole program. Evaluation is
/// skipped when any exist.
pub fn diagnostics(program: &[Expr]) -> Vec<String> {
    let mut errors = Vec::new();
    for expr in program {
        expr.collect_errors(&mut errors);
    }
    errors
        .into_iter()
        .map(|(message, pos)| format!("Parsing error at {}: {}", pos, message))
        .collect()
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, index: 0 }
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// Parse the next expression, or `None` at the end of the stream.
    fn parse_expr(&mut self) -> Option<Expr> {
        let next = self.next()?;
        let pos = next.pos;

        let expr = match next.kind {
            TokenKind::OpenParen => self.parse_list(TokenKind::CloseParen, pos),
            TokenKind::OpenBracket => {
                let list = self.parse_list(TokenKind::CloseBracket, pos);
                Expr::list(vec![Expr::ident(QUOTE_SUBSTITUTIONS, pos), list], pos)
            }
            TokenKind::OpenCurly => {
                let list = self.parse_list(TokenKind::CloseCurly, pos);
                Expr::list(vec![Expr::ident(INFIX, pos), list], pos)
            }
            TokenKind::QuoteMark => {
                let inner = self.parse_or_error(pos, "Quote lacking an expression.");
                Expr::quoted(inner, pos)
            }
            TokenKind::Dollar => {
                let inner = self.parse_or_error(pos, "Substitution lacking an expression.");
                Expr::substitution(inner, false, pos)
            }
            TokenKind::DollarAt => {
                let inner = self.parse_or_error(pos, "Substitution lacking an expression.");
                Expr::substitution(inner, true, pos)
            }
            TokenKind::Ident => Expr::ident(next.text, pos),
            TokenKind::Number => match number::parse_number(&next.text) {
                Ok(num) => Expr::number(num, pos),
                Err(err) => Expr::error(err.to_string(), pos),
            },
            TokenKind::Str => Expr::new(ExprKind::Str(next.text), pos),
            TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseCurly => {
                return Some(Expr::error("Unexpected end of list.", pos));
            }
            // A colon with no expression before it cannot form a reference.
            TokenKind::Colon => {
                return Some(Expr::error("Reference lacking an instance.", pos));
            }
        };

        // A trailing colon binds the expression just parsed as the object of
        // a reference, with the next expression as its member.
        if self.peek().map(|t| t.kind) == Some(TokenKind::Colon) {
            self.next();
            let member = match self.parse_expr() {
                Some(member) => member,
                None => Expr::error("Incomplete reference.", pos),
            };
            return Some(Expr::new(
                ExprKind::Reference(Box::new(expr), Box::new(member)),
                pos,
            ));
        }

        Some(expr)
    }

    fn parse_or_error(&mut self, pos: Position, message: &str) -> Expr {
        match self.parse_expr() {
            Some(expr) => expr,
            None => Expr::error(message, pos),
        }
    }

    /// Parse expressions until the closing delimiter. Running out of tokens
    /// appends an error node to the partial list instead of failing.
    fn parse_list(&mut self, end: TokenKind, open_pos: Position) -> Expr {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                Some(token) if token.kind == end => {
                    self.next();
                    return Expr::list(items, open_pos);
                }
                Some(_) => {
                    if let Some(expr) = self.parse_expr() {
                        items.push(expr);
                    }
                }
                None => {
                    items.push(Expr::error("Unclosed list.", open_pos));
                    return Expr::list(items, open_pos);
                }
            }
        }
    }
}
