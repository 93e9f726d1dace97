//! Syntax tree shared by the pretty-printer and the transpiler.
//!
//! The parser builds these nodes bottom-up and never mutates them afterwards.
//! Every node has exactly one owner; there are no back-references.

/// A braced block: `{ statement* }`. The root of every program is a `Compound`.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Compound {
    pub statements: Vec<Statement>,
}

/// A name, either read in expression position or bound by `var`, `function`
/// or a parameter list.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Ordered parameter list of a function definition.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Identifiers {
    pub names: Vec<Identifier>,
}

/// `(left op right)` guard of an `if` or `while`. The operator is whatever
/// `BinaryOperator` text appeared in the source.
#[derive(Debug, PartialEq, Clone)]
pub struct Condition {
    pub op: String,
    pub left: Expression,
    pub right: Expression,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FunctionCall {
    pub callee: Identifier,
    pub args: Vec<Expression>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Call(FunctionCall),
    Declaration {
        target: Identifier,
        value: Expression,
    },
    Assignment {
        target: Identifier,
        value: Expression,
    },
    Print(Expression),
    If {
        condition: Condition,
        body: Compound,
    },
    While {
        condition: Condition,
        body: Compound,
    },
    FunctionDefinition {
        name: Identifier,
        params: Identifiers,
        body: Compound,
    },
    Return(Expression),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    /// Number text exactly as written, e.g. `3` or `2.50`.
    Number(String),
    String(String),
    Boolean(bool),
    Identifier(Identifier),
    BinaryOperation {
        op: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Call(FunctionCall),
}

impl Expression {
    pub fn binary(op: impl Into<String>, left: Expression, right: Expression) -> Self {
        Expression::BinaryOperation {
            op: op.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(Identifier::new(name))
    }

    /// Longest chain of operation and call nodes below and including this one.
    pub fn height(&self) -> usize {
        match self {
            Expression::BinaryOperation { left, right, .. } => {
                1 + left.height().max(right.height())
            }
            Expression::Call(call) => {
                1 + call.args.iter().map(Expression::height).max().unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Binding strength of a binary operation; `None` for atoms.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Expression::BinaryOperation { op, .. } => Some(operator_precedence(op)),
            _ => None,
        }
    }

    /// Whether this expression must be parenthesized when it appears as an
    /// operand of `parent_op`. Operations are left-associative, so a right
    /// operand of equal precedence needs parentheses too.
    pub fn needs_parens(&self, parent_op: &str, is_right: bool) -> bool {
        let Some(own) = self.precedence() else {
            return false;
        };
        let parent = operator_precedence(parent_op);
        own < parent || (is_right && own == parent)
    }
}

fn operator_precedence(op: &str) -> u8 {
    match op {
        "*" | "/" => 2,
        _ => 1,
    }
}
