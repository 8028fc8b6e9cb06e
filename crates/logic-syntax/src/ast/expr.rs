//! Expressions, call arguments, and literals.

use std::fmt;

use serde::{Deserialize, Serialize};

use logic_common::NodeId;

use super::Identifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryOperator {
    IsEqualTo,
    IsNotEqualTo,
    IsLessThan,
    IsGreaterThan,
    IsLessThanOrEqualTo,
    IsGreaterThanOrEqualTo,
    SetEqualTo,
}

impl BinaryOperator {
    /// Comparison operators produce a `Boolean` from two operands of one type.
    pub fn is_comparison(self) -> bool {
        !matches!(self, BinaryOperator::SetEqualTo)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::IsEqualTo => "==",
            BinaryOperator::IsNotEqualTo => "!=",
            BinaryOperator::IsLessThan => "<",
            BinaryOperator::IsGreaterThan => ">",
            BinaryOperator::IsLessThanOrEqualTo => "<=",
            BinaryOperator::IsGreaterThanOrEqualTo => ">=",
            BinaryOperator::SetEqualTo => "=",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Expression {
    Binary {
        id: NodeId,
        left: Box<Expression>,
        right: Box<Expression>,
        op: BinaryOperator,
    },
    Identifier {
        id: NodeId,
        identifier: Identifier,
    },
    FunctionCall {
        id: NodeId,
        expression: Box<Expression>,
        #[serde(default)]
        arguments: Vec<FunctionCallArgument>,
    },
    Literal {
        id: NodeId,
        literal: Literal,
    },
    /// `expression.memberName`
    Member {
        id: NodeId,
        expression: Box<Expression>,
        member_name: Identifier,
    },
    Placeholder {
        id: NodeId,
    },
}

impl Expression {
    pub fn id(&self) -> NodeId {
        match self {
            Expression::Binary { id, .. }
            | Expression::Identifier { id, .. }
            | Expression::FunctionCall { id, .. }
            | Expression::Literal { id, .. }
            | Expression::Member { id, .. }
            | Expression::Placeholder { id } => *id,
        }
    }

    /// Flatten `A.B.C` into its segments when every component is an identifier.
    ///
    /// Returns `None` for member access on any other kind of expression.
    pub fn member_path(&self) -> Option<Vec<&str>> {
        match self {
            Expression::Identifier { identifier, .. } => Some(vec![identifier.string.as_str()]),
            Expression::Member {
                expression,
                member_name,
                ..
            } => {
                let mut path = expression.member_path()?;
                path.push(member_name.string.as_str());
                Some(path)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FunctionCallArgument {
    Argument {
        id: NodeId,
        #[serde(default)]
        label: Option<String>,
        expression: Expression,
    },
    Placeholder {
        id: NodeId,
    },
}

impl FunctionCallArgument {
    pub fn id(&self) -> NodeId {
        match self {
            FunctionCallArgument::Argument { id, .. }
            | FunctionCallArgument::Placeholder { id } => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Literal {
    None { id: NodeId },
    Boolean { id: NodeId, value: bool },
    Number { id: NodeId, value: f64 },
    String { id: NodeId, value: String },
    /// A `#RRGGBB` color.
    Color { id: NodeId, value: String },
    Array { id: NodeId, value: Vec<Expression> },
}

impl Literal {
    pub fn id(&self) -> NodeId {
        match self {
            Literal::None { id }
            | Literal::Boolean { id, .. }
            | Literal::Number { id, .. }
            | Literal::String { id, .. }
            | Literal::Color { id, .. }
            | Literal::Array { id, .. } => *id,
        }
    }
}
