//! Syntax tree node types.
//!
//! The tree is a set of plain enums. Every variant that can be selected in
//! the editor carries its own `id`. [`NodeRef`] is a borrowed, kind-erased
//! view over any node, used by the traversal engine and by id lookup.

pub mod expr;
pub mod item;
pub mod stmt;

use serde::{Deserialize, Serialize};

use logic_common::NodeId;

pub use expr::{BinaryOperator, Expression, FunctionCallArgument, Literal};
pub use item::{Declaration, EnumerationCase, FunctionParameter, GenericParameter};
pub use stmt::Statement;

/// The root of a Logic tree: a block of top-level statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: NodeId,
    pub block: Vec<Statement>,
}

/// A binding site: the identity that identifiers resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: NodeId,
    pub name: String,
}

/// A use of a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub id: NodeId,
    pub string: String,
    /// Placeholders are unfinished identifiers in the editor; they never
    /// resolve and are not reported as unresolved.
    #[serde(default)]
    pub is_placeholder: bool,
}

/// A written type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeAnnotation {
    TypeIdentifier {
        id: NodeId,
        identifier: Identifier,
        #[serde(default)]
        generic_arguments: Vec<TypeAnnotation>,
    },
    FunctionType {
        id: NodeId,
        return_type: Box<TypeAnnotation>,
        #[serde(default)]
        argument_types: Vec<TypeAnnotation>,
    },
    Placeholder {
        id: NodeId,
    },
}

impl TypeAnnotation {
    pub fn id(&self) -> NodeId {
        match self {
            TypeAnnotation::TypeIdentifier { id, .. }
            | TypeAnnotation::FunctionType { id, .. }
            | TypeAnnotation::Placeholder { id } => *id,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, TypeAnnotation::Placeholder { .. })
    }
}

/// A borrowed view of any node in the tree.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    Declaration(&'a Declaration),
    Expression(&'a Expression),
    Pattern(&'a Pattern),
    Identifier(&'a Identifier),
    TypeAnnotation(&'a TypeAnnotation),
    Literal(&'a Literal),
    FunctionParameter(&'a FunctionParameter),
    GenericParameter(&'a GenericParameter),
    EnumerationCase(&'a EnumerationCase),
    FunctionCallArgument(&'a FunctionCallArgument),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::Program(node) => node.id,
            NodeRef::Statement(node) => node.id(),
            NodeRef::Declaration(node) => node.id(),
            NodeRef::Expression(node) => node.id(),
            NodeRef::Pattern(node) => node.id,
            NodeRef::Identifier(node) => node.id,
            NodeRef::TypeAnnotation(node) => node.id(),
            NodeRef::Literal(node) => node.id(),
            NodeRef::FunctionParameter(node) => node.id(),
            NodeRef::GenericParameter(node) => node.id(),
            NodeRef::EnumerationCase(node) => node.id(),
            NodeRef::FunctionCallArgument(node) => node.id(),
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        match *self {
            NodeRef::Program(program) => program.block.iter().map(NodeRef::Statement).collect(),
            NodeRef::Statement(statement) => statement_children(statement),
            NodeRef::Declaration(declaration) => declaration_children(declaration),
            NodeRef::Expression(expression) => expression_children(expression),
            NodeRef::Pattern(_) | NodeRef::Identifier(_) => Vec::new(),
            NodeRef::TypeAnnotation(annotation) => match annotation {
                TypeAnnotation::TypeIdentifier {
                    identifier,
                    generic_arguments,
                    ..
                } => std::iter::once(NodeRef::Identifier(identifier))
                    .chain(generic_arguments.iter().map(NodeRef::TypeAnnotation))
                    .collect(),
                TypeAnnotation::FunctionType {
                    return_type,
                    argument_types,
                    ..
                } => std::iter::once(NodeRef::TypeAnnotation(&**return_type))
                    .chain(argument_types.iter().map(NodeRef::TypeAnnotation))
                    .collect(),
                TypeAnnotation::Placeholder { .. } => Vec::new(),
            },
            NodeRef::Literal(literal) => match literal {
                Literal::Array { value, .. } => value.iter().map(NodeRef::Expression).collect(),
                _ => Vec::new(),
            },
            NodeRef::FunctionParameter(parameter) => match parameter {
                FunctionParameter::Parameter {
                    local_name,
                    annotation,
                    default_value,
                    ..
                } => {
                    let mut children = vec![
                        NodeRef::Pattern(local_name),
                        NodeRef::TypeAnnotation(annotation),
                    ];
                    children.extend(default_value.iter().map(NodeRef::Expression));
                    children
                }
                FunctionParameter::Placeholder { .. } => Vec::new(),
            },
            NodeRef::GenericParameter(parameter) => match parameter {
                GenericParameter::Parameter { name, .. } => vec![NodeRef::Pattern(name)],
                GenericParameter::Placeholder { .. } => Vec::new(),
            },
            NodeRef::EnumerationCase(case) => match case {
                EnumerationCase::Case {
                    name,
                    associated_value_types,
                    ..
                } => std::iter::once(NodeRef::Pattern(name))
                    .chain(associated_value_types.iter().map(NodeRef::TypeAnnotation))
                    .collect(),
                EnumerationCase::Placeholder { .. } => Vec::new(),
            },
            NodeRef::FunctionCallArgument(argument) => match argument {
                FunctionCallArgument::Argument { expression, .. } => {
                    vec![NodeRef::Expression(expression)]
                }
                FunctionCallArgument::Placeholder { .. } => Vec::new(),
            },
        }
    }
}

fn statement_children(statement: &Statement) -> Vec<NodeRef<'_>> {
    match statement {
        Statement::Declaration { content, .. } => vec![NodeRef::Declaration(content)],
        Statement::Branch {
            condition, block, ..
        } => std::iter::once(NodeRef::Expression(condition))
            .chain(block.iter().map(NodeRef::Statement))
            .collect(),
        Statement::Loop {
            pattern,
            expression,
            block,
            ..
        } => [NodeRef::Pattern(pattern), NodeRef::Expression(expression)]
            .into_iter()
            .chain(block.iter().map(NodeRef::Statement))
            .collect(),
        Statement::Expression { expression, .. } | Statement::Return { expression, .. } => {
            vec![NodeRef::Expression(expression)]
        }
        Statement::Placeholder { .. } => Vec::new(),
    }
}

fn declaration_children(declaration: &Declaration) -> Vec<NodeRef<'_>> {
    match declaration {
        Declaration::Variable {
            name,
            annotation,
            initializer,
            ..
        } => {
            let mut children = vec![NodeRef::Pattern(name)];
            children.extend(annotation.iter().map(NodeRef::TypeAnnotation));
            children.extend(initializer.iter().map(NodeRef::Expression));
            children
        }
        Declaration::Function {
            name,
            return_type,
            generic_parameters,
            parameters,
            block,
            ..
        } => {
            let mut children = vec![NodeRef::Pattern(name), NodeRef::TypeAnnotation(return_type)];
            children.extend(generic_parameters.iter().map(NodeRef::GenericParameter));
            children.extend(parameters.iter().map(NodeRef::FunctionParameter));
            children.extend(block.iter().map(NodeRef::Statement));
            children
        }
        Declaration::Enumeration {
            name,
            generic_parameters,
            cases,
            ..
        } => std::iter::once(NodeRef::Pattern(name))
            .chain(generic_parameters.iter().map(NodeRef::GenericParameter))
            .chain(cases.iter().map(NodeRef::EnumerationCase))
            .collect(),
        Declaration::Record {
            name,
            generic_parameters,
            declarations,
            ..
        } => std::iter::once(NodeRef::Pattern(name))
            .chain(generic_parameters.iter().map(NodeRef::GenericParameter))
            .chain(declarations.iter().map(NodeRef::Declaration))
            .collect(),
        Declaration::Namespace {
            name, declarations, ..
        } => std::iter::once(NodeRef::Pattern(name))
            .chain(declarations.iter().map(NodeRef::Declaration))
            .collect(),
        Declaration::Import { name, .. } => vec![NodeRef::Pattern(name)],
        Declaration::Placeholder { .. } => Vec::new(),
    }
}

fn expression_children(expression: &Expression) -> Vec<NodeRef<'_>> {
    match expression {
        Expression::Binary { left, right, .. } => {
            vec![NodeRef::Expression(&**left), NodeRef::Expression(&**right)]
        }
        Expression::Identifier { identifier, .. } => vec![NodeRef::Identifier(identifier)],
        Expression::FunctionCall {
            expression,
            arguments,
            ..
        } => std::iter::once(NodeRef::Expression(&**expression))
            .chain(arguments.iter().map(NodeRef::FunctionCallArgument))
            .collect(),
        Expression::Literal { literal, .. } => vec![NodeRef::Literal(literal)],
        Expression::Member {
            expression,
            member_name,
            ..
        } => vec![
            NodeRef::Expression(&**expression),
            NodeRef::Identifier(member_name),
        ],
        Expression::Placeholder { .. } => Vec::new(),
    }
}
