//! Raw boolean column expressions
//!
//! String filters that do not name a segment are parsed as small boolean
//! expressions over dataset columns, e.g.
//!
//! ```text
//! Q_REGION == 'NORTH' and (Q_AGE >= 18 | plan in ["pro", "enterprise"])
//! ```
//!
//! Grammar (precedence: not > and > or):
//!
//! ```text
//! expr    := and ( ("or" | "|") and )*
//! and     := not ( ("and" | "&") not )*
//! not     := ("not" | "~" | "!") not | primary
//! primary := "(" expr ")" | compare
//! compare := column [ cmp literal | ["not"] "in" list ]
//!          | literal cmp column
//! ```
//!
//! A bare column is true where the cell is `true` or a non-zero number.
//! Missing cells never satisfy a comparison, `!=` included.

use std::cmp::Ordering;

use serde_json::Value;

use crate::catalog::QuestionCatalog;
use crate::dataset::cell::{as_number, is_missing, values_match};
use crate::dataset::{Column, Dataset};

use super::errors::{PredicateError, PredicateResult};
use super::mask::Mask;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// Operator seen from the other side (`5 < x` is `x > 5`)
    fn flip(self) -> Self {
        match self {
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Le => CompareOp::Ge,
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Ge => CompareOp::Le,
            other => other,
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }
}

/// Parsed expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum RawExpr {
    Compare {
        column: String,
        op: CompareOp,
        literal: Value,
    },
    Member {
        column: String,
        values: Vec<Value>,
        negated: bool,
    },
    Truthy(String),
    /// Operands of a flat `and` chain
    And(Vec<RawExpr>),
    /// Operands of a flat `or` chain
    Or(Vec<RawExpr>),
    Not(Box<RawExpr>),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Literal(Value),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Cmp(CompareOp),
    And,
    Or,
    Not,
    In,
}

/// A parsed raw filter, ready to evaluate
#[derive(Debug, Clone, PartialEq)]
pub struct RawFilter {
    input: String,
    expr: RawExpr,
}

impl RawFilter {
    /// Parses expression text
    pub fn parse(input: &str) -> PredicateResult<Self> {
        let tokens = tokenize(input).map_err(|reason| PredicateError::parse(input, reason))?;
        if tokens.is_empty() {
            return Err(PredicateError::parse(input, "empty expression"));
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser
            .parse()
            .map_err(|reason| PredicateError::parse(input, reason))?;
        Ok(Self {
            input: input.to_string(),
            expr,
        })
    }

    pub fn expr(&self) -> &RawExpr {
        &self.expr
    }

    /// Evaluates against the full dataset.
    ///
    /// Names resolve to dataset columns first, then to question ids.
    pub fn evaluate(&self, dataset: &Dataset, catalog: &QuestionCatalog) -> PredicateResult<Mask> {
        self.eval_node(&self.expr, dataset, catalog)
    }

    fn eval_node(
        &self,
        expr: &RawExpr,
        dataset: &Dataset,
        catalog: &QuestionCatalog,
    ) -> PredicateResult<Mask> {
        let rows = dataset.row_count();
        match expr {
            RawExpr::Compare {
                column,
                op,
                literal,
            } => {
                let col = self.resolve(column, dataset, catalog)?;
                Ok(leaf(col, rows, |cell| compare(cell, *op, literal)))
            }
            RawExpr::Member {
                column,
                values,
                negated,
            } => {
                let col = self.resolve(column, dataset, catalog)?;
                Ok(leaf(col, rows, |cell| {
                    values.iter().any(|v| values_match(cell, v)) != *negated
                }))
            }
            RawExpr::Truthy(column) => {
                let col = self.resolve(column, dataset, catalog)?;
                Ok(leaf(col, rows, |cell| match cell {
                    Value::Bool(b) => *b,
                    Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
                    _ => false,
                }))
            }
            RawExpr::And(children) => {
                let mut mask = Mask::all(rows);
                for child in children {
                    mask = mask.and(&self.eval_node(child, dataset, catalog)?);
                }
                Ok(mask)
            }
            RawExpr::Or(children) => {
                let mut mask = Mask::none(rows);
                for child in children {
                    mask = mask.or(&self.eval_node(child, dataset, catalog)?);
                }
                Ok(mask)
            }
            RawExpr::Not(inner) => Ok(self.eval_node(inner, dataset, catalog)?.complement()),
        }
    }

    fn resolve<'d>(
        &self,
        name: &str,
        dataset: &'d Dataset,
        catalog: &QuestionCatalog,
    ) -> PredicateResult<&'d Column> {
        dataset
            .column(name)
            .or_else(|| {
                catalog
                    .resolve_column(name)
                    .and_then(|col| dataset.column(col))
            })
            .ok_or_else(|| PredicateError::UnknownColumn {
                input: self.input.clone(),
                column: name.to_string(),
            })
    }
}

fn leaf(column: &Column, rows: usize, test: impl Fn(&Value) -> bool) -> Mask {
    Mask::from_fn(rows, |i| match column.get(i) {
        Some(cell) if !is_missing(cell) => test(cell),
        _ => false,
    })
}

fn compare(cell: &Value, op: CompareOp, literal: &Value) -> bool {
    match op {
        CompareOp::Eq => values_match(cell, literal),
        CompareOp::Ne => !values_match(cell, literal),
        _ => {
            let ordering = match (cell, literal) {
                (_, Value::Number(_)) => match (as_number(cell), as_number(literal)) {
                    (Some(a), Some(b)) => a.partial_cmp(&b),
                    _ => None,
                },
                (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
                _ => None,
            };
            ordering.map_or(false, |o| op.holds(o))
        }
    }
}

fn number_literal(text: &str) -> Result<Value, String> {
    if let Ok(i) = text.parse::<i64>() {
        return Ok(Value::from(i));
    }
    text.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| format!("invalid number '{}'", text))
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '[' => {
                tokens.push(Token::LBracket);
                i += 1;
            }
            ']' => {
                tokens.push(Token::RBracket);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '&' => {
                tokens.push(Token::And);
                i += if next == Some('&') { 2 } else { 1 };
            }
            '|' => {
                tokens.push(Token::Or);
                i += if next == Some('|') { 2 } else { 1 };
            }
            '~' => {
                tokens.push(Token::Not);
                i += 1;
            }
            '=' => {
                if next != Some('=') {
                    return Err("single '=' is not a comparison, use '=='".to_string());
                }
                tokens.push(Token::Cmp(CompareOp::Eq));
                i += 2;
            }
            '!' => {
                if next == Some('=') {
                    tokens.push(Token::Cmp(CompareOp::Ne));
                    i += 2;
                } else {
                    tokens.push(Token::Not);
                    i += 1;
                }
            }
            '<' | '>' => {
                let op = match (c, next == Some('=')) {
                    ('<', true) => CompareOp::Le,
                    ('<', false) => CompareOp::Lt,
                    ('>', true) => CompareOp::Ge,
                    _ => CompareOp::Gt,
                };
                tokens.push(Token::Cmp(op));
                i += if next == Some('=') { 2 } else { 1 };
            }
            '\'' | '"' => {
                let quote = c;
                let mut text = String::new();
                i += 1;
                loop {
                    match chars.get(i) {
                        None => return Err("unterminated string literal".to_string()),
                        Some('\\') if chars.get(i + 1).is_some() => {
                            text.push(chars[i + 1]);
                            i += 2;
                        }
                        Some(&ch) if ch == quote => {
                            i += 1;
                            break;
                        }
                        Some(&ch) => {
                            text.push(ch);
                            i += 1;
                        }
                    }
                }
                tokens.push(Token::Literal(Value::String(text)));
            }
            '`' => {
                let start = i + 1;
                let end = chars[start..]
                    .iter()
                    .position(|&ch| ch == '`')
                    .map(|p| start + p)
                    .ok_or_else(|| "unterminated quoted column name".to_string())?;
                tokens.push(Token::Ident(chars[start..end].iter().collect()));
                i = end + 1;
            }
            c if c.is_ascii_digit()
                || ((c == '-' || c == '.') && next.map_or(false, |n| n.is_ascii_digit())) =>
            {
                let start = i;
                i += 1;
                while i < chars.len()
                    && (chars[i].is_ascii_digit()
                        || chars[i] == '.'
                        || chars[i] == 'e'
                        || chars[i] == 'E')
                {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                tokens.push(Token::Literal(number_literal(&text)?));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '.')
                {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let token = match word.to_ascii_lowercase().as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    "in" => Token::In,
                    "true" => Token::Literal(Value::Bool(true)),
                    "false" => Token::Literal(Value::Bool(false)),
                    _ => Token::Ident(word),
                };
                tokens.push(token);
            }
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }

    Ok(tokens)
}

/// Deepest `not` / parenthesis nesting accepted
const MAX_NESTING: usize = 64;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Current `not` / parenthesis nesting
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), String> {
        match self.advance() {
            Some(t) if t == expected => Ok(()),
            Some(t) => Err(format!("expected {}, found {:?}", what, t)),
            None => Err(format!("expected {}, found end of input", what)),
        }
    }

    fn parse(&mut self) -> Result<RawExpr, String> {
        let expr = self.parse_or()?;
        match self.peek() {
            None => Ok(expr),
            Some(t) => Err(format!("unexpected trailing token {:?}", t)),
        }
    }

    fn parse_or(&mut self) -> Result<RawExpr, String> {
        let mut operands = vec![self.parse_and()?];
        while self.peek() == Some(&Token::Or) {
            self.advance();
            operands.push(self.parse_and()?);
        }
        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            RawExpr::Or(operands)
        })
    }

    fn parse_and(&mut self) -> Result<RawExpr, String> {
        let mut operands = vec![self.parse_not()?];
        while self.peek() == Some(&Token::And) {
            self.advance();
            operands.push(self.parse_not()?);
        }
        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            RawExpr::And(operands)
        })
    }

    fn enter(&mut self) -> Result<(), String> {
        if self.depth >= MAX_NESTING {
            return Err(format!(
                "expression nested too deeply (more than {} levels)",
                MAX_NESTING
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_not(&mut self) -> Result<RawExpr, String> {
        if self.peek() == Some(&Token::Not) {
            self.advance();
            self.enter()?;
            let inner = self.parse_not()?;
            self.depth -= 1;
            return Ok(RawExpr::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<RawExpr, String> {
        match self.advance() {
            Some(Token::LParen) => {
                self.enter()?;
                let inner = self.parse_or()?;
                self.expect(Token::RParen, "')'")?;
                self.depth -= 1;
                Ok(inner)
            }
            Some(Token::Ident(column)) => self.parse_column_tail(column),
            Some(Token::Literal(literal)) => {
                let op = match self.advance() {
                    Some(Token::Cmp(op)) => op,
                    _ => return Err("expected comparison after literal".to_string()),
                };
                match self.advance() {
                    Some(Token::Ident(column)) => Ok(RawExpr::Compare {
                        column,
                        op: op.flip(),
                        literal,
                    }),
                    _ => Err("expected column name on one side of comparison".to_string()),
                }
            }
            Some(t) => Err(format!("unexpected token {:?}", t)),
            None => Err("unexpected end of input".to_string()),
        }
    }

    fn parse_column_tail(&mut self, column: String) -> Result<RawExpr, String> {
        match self.peek() {
            Some(Token::Cmp(op)) => {
                let op = *op;
                self.advance();
                match self.advance() {
                    Some(Token::Literal(literal)) => Ok(RawExpr::Compare {
                        column,
                        op,
                        literal,
                    }),
                    Some(Token::Ident(other)) => Err(format!(
                        "column-to-column comparison '{}' vs '{}' is not supported",
                        column, other
                    )),
                    _ => Err(format!("expected literal after comparison on '{}'", column)),
                }
            }
            Some(Token::In) => {
                self.advance();
                let values = self.parse_list()?;
                Ok(RawExpr::Member {
                    column,
                    values,
                    negated: false,
                })
            }
            Some(Token::Not) if self.tokens.get(self.pos + 1) == Some(&Token::In) => {
                self.pos += 2;
                let values = self.parse_list()?;
                Ok(RawExpr::Member {
                    column,
                    values,
                    negated: true,
                })
            }
            _ => Ok(RawExpr::Truthy(column)),
        }
    }

    fn parse_list(&mut self) -> Result<Vec<Value>, String> {
        let close = match self.advance() {
            Some(Token::LBracket) => Token::RBracket,
            Some(Token::LParen) => Token::RParen,
            _ => return Err("expected list after 'in'".to_string()),
        };

        let mut values = Vec::new();
        loop {
            match self.advance() {
                Some(t) if t == close && values.is_empty() => return Ok(values),
                Some(Token::Literal(v)) => values.push(v),
                _ => return Err("expected literal in list".to_string()),
            }
            match self.advance() {
                Some(Token::Comma) => {}
                Some(t) if t == close => return Ok(values),
                _ => return Err("expected ',' or end of list".to_string()),
            }
        }
    }
}
