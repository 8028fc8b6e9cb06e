//! Declarations and their helper nodes.
//!
//! Covers: Variable, Function, Enumeration, Record, Namespace, Import,
//! FunctionParameter, GenericParameter, EnumerationCase.

use serde::{Deserialize, Serialize};

use logic_common::NodeId;

use super::{Expression, Pattern, Statement, TypeAnnotation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Declaration {
    Variable {
        id: NodeId,
        name: Pattern,
        #[serde(default)]
        annotation: Option<TypeAnnotation>,
        #[serde(default)]
        initializer: Option<Expression>,
    },
    Function {
        id: NodeId,
        name: Pattern,
        return_type: TypeAnnotation,
        #[serde(default)]
        generic_parameters: Vec<GenericParameter>,
        #[serde(default)]
        parameters: Vec<FunctionParameter>,
        #[serde(default)]
        block: Vec<Statement>,
    },
    Enumeration {
        id: NodeId,
        name: Pattern,
        #[serde(default)]
        generic_parameters: Vec<GenericParameter>,
        #[serde(default)]
        cases: Vec<EnumerationCase>,
    },
    /// A record type. Its member declarations are not free variables.
    Record {
        id: NodeId,
        name: Pattern,
        #[serde(default)]
        generic_parameters: Vec<GenericParameter>,
        #[serde(default)]
        declarations: Vec<Declaration>,
    },
    Namespace {
        id: NodeId,
        name: Pattern,
        #[serde(default)]
        declarations: Vec<Declaration>,
    },
    /// `import Name`; replaced by the library's declarations before analysis.
    Import {
        id: NodeId,
        name: Pattern,
    },
    Placeholder {
        id: NodeId,
    },
}

impl Declaration {
    pub fn id(&self) -> NodeId {
        match self {
            Declaration::Variable { id, .. }
            | Declaration::Function { id, .. }
            | Declaration::Enumeration { id, .. }
            | Declaration::Record { id, .. }
            | Declaration::Namespace { id, .. }
            | Declaration::Import { id, .. }
            | Declaration::Placeholder { id } => *id,
        }
    }

    /// The pattern this declaration introduces, if any.
    pub fn name(&self) -> Option<&Pattern> {
        match self {
            Declaration::Variable { name, .. }
            | Declaration::Function { name, .. }
            | Declaration::Enumeration { name, .. }
            | Declaration::Record { name, .. }
            | Declaration::Namespace { name, .. }
            | Declaration::Import { name, .. } => Some(name),
            Declaration::Placeholder { .. } => None,
        }
    }

    /// Names of the declared generic parameters, skipping placeholders.
    pub fn generic_parameter_names(&self) -> Vec<&str> {
        let parameters = match self {
            Declaration::Function {
                generic_parameters, ..
            }
            | Declaration::Enumeration {
                generic_parameters, ..
            }
            | Declaration::Record {
                generic_parameters, ..
            } => generic_parameters.as_slice(),
            _ => &[],
        };
        parameters
            .iter()
            .filter_map(GenericParameter::pattern)
            .map(|pattern| pattern.name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FunctionParameter {
    Parameter {
        id: NodeId,
        /// Call-site label; defaults to the local name when absent.
        #[serde(default)]
        external_name: Option<String>,
        local_name: Pattern,
        annotation: TypeAnnotation,
        #[serde(default)]
        default_value: Option<Expression>,
    },
    Placeholder {
        id: NodeId,
    },
}

impl FunctionParameter {
    pub fn id(&self) -> NodeId {
        match self {
            FunctionParameter::Parameter { id, .. } | FunctionParameter::Placeholder { id } => *id,
        }
    }

    /// The label a call site uses for this parameter.
    pub fn label(&self) -> Option<&str> {
        match self {
            FunctionParameter::Parameter {
                external_name,
                local_name,
                ..
            } => Some(external_name.as_deref().unwrap_or(&local_name.name)),
            FunctionParameter::Placeholder { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GenericParameter {
    Parameter { id: NodeId, name: Pattern },
    Placeholder { id: NodeId },
}

impl GenericParameter {
    pub fn id(&self) -> NodeId {
        match self {
            GenericParameter::Parameter { id, .. } | GenericParameter::Placeholder { id } => *id,
        }
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        match self {
            GenericParameter::Parameter { name, .. } => Some(name),
            GenericParameter::Placeholder { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EnumerationCase {
    Case {
        id: NodeId,
        name: Pattern,
        #[serde(default)]
        associated_value_types: Vec<TypeAnnotation>,
    },
    Placeholder {
        id: NodeId,
    },
}

impl EnumerationCase {
    pub fn id(&self) -> NodeId {
        match self {
            EnumerationCase::Case { id, .. } | EnumerationCase::Placeholder { id } => *id,
        }
    }
}
