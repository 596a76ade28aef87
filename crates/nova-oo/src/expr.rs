//! Read-only expression shapes supplied by the host.

use nova_types::{Span, Type};

/// One operand of an operator expression: its source text and, when the host could type it, its
/// static type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operand {
    pub text: String,
    pub ty: Option<Type>,
    pub span: Option<Span>,
}

impl Operand {
    pub fn typed(text: impl Into<String>, ty: Type) -> Self {
        Self {
            text: text.into(),
            ty: Some(ty),
            span: None,
        }
    }

    pub fn untyped(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ty: None,
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// The operand's type, unless it is missing or the "no type" sentinel.
    pub fn resolved_type(&self) -> Option<&Type> {
        self.ty.as_ref().filter(|ty| !ty.is_unknown())
    }

    pub fn type_or_unknown(&self) -> Type {
        self.ty.clone().unwrap_or(Type::Unknown)
    }
}

/// `lhs op rhs`. `rhs` is `None` when the host parsed an incomplete expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryExpr {
    pub lhs: Operand,
    pub op: String,
    pub rhs: Option<Operand>,
}

/// `op operand`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixExpr {
    pub op: String,
    pub operand: Option<Operand>,
}

/// `base[index]`, or `base[index] = value` when `value` is present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexExpr {
    pub base: Operand,
    pub index: Option<Operand>,
    pub value: Option<Operand>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expression {
    Binary(BinaryExpr),
    Prefix(PrefixExpr),
    Index(IndexExpr),
}

/// Host facility that types a synthesized Java expression, e.g. `money.negate()`.
///
/// Returns `None` (or [`Type::Unknown`]) when the text cannot be typed: no such method, an
/// ambiguous call, or a syntax error.
pub trait ExprTyper {
    fn type_of_text(&self, text: &str, at: Option<Span>) -> Option<Type>;
}

impl<F> ExprTyper for F
where
    F: Fn(&str, Option<Span>) -> Option<Type>,
{
    fn type_of_text(&self, text: &str, at: Option<Span>) -> Option<Type> {
        self(text, at)
    }
}

/// Build `receiver.method(arg1,arg2)` source text.
///
/// Receivers that are not a plain (possibly qualified) name or call chain are parenthesized so the
/// synthesized call binds to the whole receiver expression.
pub(crate) fn synthesize_call(receiver: &str, method: &str, args: &[&Operand]) -> String {
    let receiver = receiver.trim();
    let mut out = String::with_capacity(receiver.len() + method.len() + 8);
    if is_simple_receiver(receiver) {
        out.push_str(receiver);
    } else {
        out.push('(');
        out.push_str(receiver);
        out.push(')');
    }
    out.push('.');
    out.push_str(method);
    out.push('(');
    for (idx, arg) in args.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(arg.text.trim());
    }
    out.push(')');
    out
}

fn is_simple_receiver(text: &str) -> bool {
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            c if c.is_alphanumeric() || c == '_' || c == '$' || c == '.' => {}
            _ => return false,
        }
    }
    !text.is_empty()
}
