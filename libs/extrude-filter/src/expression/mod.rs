//! # Feature Expressions
//!
//! Small expression languages evaluated against feature attributes.
//!
//! ## Numeric expressions
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | primary
//! primary := NUMBER | '[' NAME ']' | '(' expr ')'
//! ```
//!
//! `[NAME]` reads a feature attribute; `[__max_z]` is the feature's
//! highest elevation.
//!
//! ## String expressions
//!
//! Literal text with `[NAME]` placeholders, e.g. `"Building [id]"`.

use crate::error::ExpressionError;
use crate::feature::Feature;
use config::constants::MAX_Z_ATTRIBUTE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// NUMERIC
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Number(f64),
    Attribute(String),
    Negate(Box<Node>),
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A parsed arithmetic expression over feature attributes.
///
/// # Example
///
/// ```rust
/// use extrude_filter::expression::NumericExpression;
/// use extrude_filter::feature::{Geometry, SimpleFeature};
///
/// let expr: NumericExpression = "[levels] * 3.5 + 1".parse().unwrap();
/// let feature = SimpleFeature::new(1, Geometry::empty()).with_attribute("levels", 4.0);
/// assert_eq!(expr.eval(&feature).unwrap(), 15.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NumericExpression {
    source: String,
    root: Node,
}

impl NumericExpression {
    /// Parses an expression.
    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        let mut parser = Parser::new(source);
        let root = parser.expression()?;
        parser.skip_whitespace();
        if let Some((position, c)) = parser.peek() {
            return Err(ExpressionError::parse(
                source,
                position,
                format!("unexpected '{c}'"),
            ));
        }
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    /// Expression resolving to the feature's maximum elevation.
    pub fn max_z() -> Self {
        Self {
            source: format!("[{MAX_Z_ATTRIBUTE}]"),
            root: Node::Attribute(MAX_Z_ATTRIBUTE.to_string()),
        }
    }

    /// A constant.
    pub fn constant(value: f64) -> Self {
        Self {
            source: value.to_string(),
            root: Node::Number(value),
        }
    }

    /// The original expression text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates the expression against a feature.
    pub fn eval<F: Feature + ?Sized>(&self, feature: &F) -> Result<f64, ExpressionError> {
        eval_node(&self.root, feature)
    }
}

fn eval_node<F: Feature + ?Sized>(node: &Node, feature: &F) -> Result<f64, ExpressionError> {
    match node {
        Node::Number(n) => Ok(*n),
        Node::Attribute(name) => attribute_number(name, feature),
        Node::Negate(inner) => Ok(-eval_node(inner, feature)?),
        Node::Binary { op, left, right } => {
            let l = eval_node(left, feature)?;
            let r = eval_node(right, feature)?;
            match op {
                BinaryOp::Add => Ok(l + r),
                BinaryOp::Subtract => Ok(l - r),
                BinaryOp::Multiply => Ok(l * r),
                BinaryOp::Divide if r == 0.0 => Err(ExpressionError::DivisionByZero),
                BinaryOp::Divide => Ok(l / r),
            }
        }
    }
}

fn attribute_number<F: Feature + ?Sized>(name: &str, feature: &F) -> Result<f64, ExpressionError> {
    if name == MAX_Z_ATTRIBUTE {
        return Ok(feature.max_z());
    }
    let value = feature
        .attribute(name)
        .ok_or_else(|| ExpressionError::UnknownAttribute(name.to_string()))?;
    value.as_number().ok_or_else(|| ExpressionError::NotNumeric {
        name: name.to_string(),
        value: value.to_string(),
    })
}

impl FromStr for NumericExpression {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NumericExpression {
    type Error = ExpressionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NumericExpression> for String {
    fn from(expr: NumericExpression) -> Self {
        expr.source
    }
}

impl fmt::Display for NumericExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ===== PARSER =====

struct Parser<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn error(&self, position: usize, message: impl Into<String>) -> ExpressionError {
        ExpressionError::parse(self.source, position, message)
    }

    fn end(&self) -> usize {
        self.source.len()
    }

    fn expression(&mut self) -> Result<Node, ExpressionError> {
        let mut left = self.term()?;
        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some((_, '+')) => BinaryOp::Add,
                Some((_, '-')) => BinaryOp::Subtract,
                _ => return Ok(left),
            };
            self.chars.next();
            let right = self.term()?;
            left = Node::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn term(&mut self) -> Result<Node, ExpressionError> {
        let mut left = self.unary()?;
        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some((_, '*')) => BinaryOp::Multiply,
                Some((_, '/')) => BinaryOp::Divide,
                _ => return Ok(left),
            };
            self.chars.next();
            let right = self.unary()?;
            left = Node::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn unary(&mut self) -> Result<Node, ExpressionError> {
        self.skip_whitespace();
        if let Some((_, '-')) = self.peek() {
            self.chars.next();
            return Ok(Node::Negate(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Node, ExpressionError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error(self.end(), "expected a value")),
            Some((start, '[')) => {
                self.chars.next();
                let mut name = String::new();
                loop {
                    match self.chars.next() {
                        Some((_, ']')) => break,
                        Some((_, c)) => name.push(c),
                        None => return Err(self.error(start, "unclosed '['")),
                    }
                }
                let name = name.trim();
                if name.is_empty() {
                    return Err(self.error(start, "empty attribute name"));
                }
                Ok(Node::Attribute(name.to_string()))
            }
            Some((start, '(')) => {
                self.chars.next();
                let inner = self.expression()?;
                self.skip_whitespace();
                match self.chars.next() {
                    Some((_, ')')) => Ok(inner),
                    Some((position, c)) => Err(self.error(position, format!("expected ')', found '{c}'"))),
                    None => Err(self.error(start, "unclosed '('")),
                }
            }
            Some((start, c)) if c.is_ascii_digit() || c == '.' => {
                let mut end = start;
                while let Some((i, c)) = self.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        end = i + c.len_utf8();
                        self.chars.next();
                    } else {
                        break;
                    }
                }
                let text = &self.source[start..end];
                text.parse::<f64>()
                    .map(Node::Number)
                    .map_err(|_| self.error(start, format!("invalid number '{text}'")))
            }
            Some((position, c)) => Err(self.error(position, format!("unexpected '{c}'"))),
        }
    }
}

// =============================================================================
// STRING
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Attribute(String),
}

/// Text with `[attribute]` placeholders, used to name feature meshes.
///
/// Missing attributes expand to an empty string.
///
/// ```rust
/// use extrude_filter::expression::StringExpression;
/// use extrude_filter::feature::{Geometry, SimpleFeature};
///
/// let expr: StringExpression = "bldg-[id]".parse().unwrap();
/// let feature = SimpleFeature::new(1, Geometry::empty()).with_attribute("id", "A7");
/// assert_eq!(expr.eval(&feature), "bldg-A7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StringExpression {
    source: String,
    segments: Vec<Segment>,
}

impl StringExpression {
    /// Parses a template.
    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;
        while let Some(open) = rest.find('[') {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let close = rest[open..]
                .find(']')
                .ok_or_else(|| ExpressionError::parse(source, offset + open, "unclosed '['"))?;
            let name = rest[open + 1..open + close].trim();
            segments.push(Segment::Attribute(name.to_string()));
            offset += open + close + 1;
            rest = &rest[open + close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }
        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The original template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Expands the template for a feature.
    pub fn eval<F: Feature + ?Sized>(&self, feature: &F) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Attribute(name) if name == MAX_Z_ATTRIBUTE => {
                    out.push_str(&feature.max_z().to_string())
                }
                Segment::Attribute(name) => {
                    if let Some(value) = feature.attribute(name) {
                        out.push_str(&value.to_string());
                    }
                }
            }
        }
        out
    }
}

impl FromStr for StringExpression {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StringExpression {
    type Error = ExpressionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StringExpression> for String {
    fn from(expr: StringExpression) -> Self {
        expr.source
    }
}

#[cfg(test)]
mod tests;
