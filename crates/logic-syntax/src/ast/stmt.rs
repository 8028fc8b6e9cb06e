use serde::{Deserialize, Serialize};

use logic_common::NodeId;

use super::{Declaration, Expression, Pattern};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Statement {
    Declaration {
        id: NodeId,
        content: Declaration,
    },
    /// `if condition { block }`
    Branch {
        id: NodeId,
        condition: Expression,
        #[serde(default)]
        block: Vec<Statement>,
    },
    /// `for pattern in expression { block }`
    Loop {
        id: NodeId,
        pattern: Pattern,
        expression: Expression,
        #[serde(default)]
        block: Vec<Statement>,
    },
    Expression {
        id: NodeId,
        expression: Expression,
    },
    Return {
        id: NodeId,
        expression: Expression,
    },
    Placeholder {
        id: NodeId,
    },
}

impl Statement {
    pub fn id(&self) -> NodeId {
        match self {
            Statement::Declaration { id, .. }
            | Statement::Branch { id, .. }
            | Statement::Loop { id, .. }
            | Statement::Expression { id, .. }
            | Statement::Return { id, .. }
            | Statement::Placeholder { id } => *id,
        }
    }
}
