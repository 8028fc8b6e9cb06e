//! Pure tree edits.
//!
//! Replacing a node returns a new [`Program`]; nodes outside the replaced
//! subtree keep their ids. [`SyntaxNode::reidentify`] gives a subtree fresh
//! ids before it is inserted somewhere else, so ids stay unique.

use logic_common::{IdGenerator, NodeId};

use crate::ast::{
    Declaration, EnumerationCase, Expression, FunctionCallArgument, FunctionParameter,
    GenericParameter, Identifier, Literal, Pattern, Program, Statement, TypeAnnotation,
};

/// An owned subtree that can replace a node of the same kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxNode {
    Statement(Statement),
    Declaration(Declaration),
    Expression(Expression),
}

impl SyntaxNode {
    pub fn id(&self) -> NodeId {
        match self {
            SyntaxNode::Statement(node) => node.id(),
            SyntaxNode::Declaration(node) => node.id(),
            SyntaxNode::Expression(node) => node.id(),
        }
    }

    /// Give every node of this subtree a fresh id.
    pub fn reidentify(&mut self, ids: &mut IdGenerator) {
        let mut fresh = |id: &mut NodeId| *id = ids.fresh();
        match self {
            SyntaxNode::Statement(node) => node.for_each_id_mut(&mut fresh),
            SyntaxNode::Declaration(node) => node.for_each_id_mut(&mut fresh),
            SyntaxNode::Expression(node) => node.for_each_id_mut(&mut fresh),
        }
    }
}

impl Program {
    /// Return a copy of the program with the node `target` replaced.
    ///
    /// The replacement must be of the same kind as the target; a kind
    /// mismatch or an unknown id leaves the tree unchanged.
    pub fn replace(&self, target: NodeId, replacement: &SyntaxNode) -> Program {
        Program {
            id: self.id,
            block: replace_block(&self.block, target, replacement),
        }
    }

    /// Give every node in the program a fresh id.
    pub fn reidentify(&mut self, ids: &mut IdGenerator) {
        let mut fresh = |id: &mut NodeId| *id = ids.fresh();
        fresh(&mut self.id);
        for statement in &mut self.block {
            statement.for_each_id_mut(&mut fresh);
        }
    }
}

fn replace_block(block: &[Statement], target: NodeId, with: &SyntaxNode) -> Vec<Statement> {
    block
        .iter()
        .map(|statement| statement.replacing(target, with))
        .collect()
}

fn replace_declarations(
    declarations: &[Declaration],
    target: NodeId,
    with: &SyntaxNode,
) -> Vec<Declaration> {
    declarations
        .iter()
        .map(|declaration| declaration.replacing(target, with))
        .collect()
}

fn replace_boxed(expression: &Expression, target: NodeId, with: &SyntaxNode) -> Box<Expression> {
    Box::new(expression.replacing(target, with))
}

impl Statement {
    fn replacing(&self, target: NodeId, with: &SyntaxNode) -> Statement {
        if let SyntaxNode::Statement(replacement) = with {
            if self.id() == target {
                return replacement.clone();
            }
        }
        match self {
            Statement::Declaration { id, content } => Statement::Declaration {
                id: *id,
                content: content.replacing(target, with),
            },
            Statement::Branch {
                id,
                condition,
                block,
            } => Statement::Branch {
                id: *id,
                condition: condition.replacing(target, with),
                block: replace_block(block, target, with),
            },
            Statement::Loop {
                id,
                pattern,
                expression,
                block,
            } => Statement::Loop {
                id: *id,
                pattern: pattern.clone(),
                expression: expression.replacing(target, with),
                block: replace_block(block, target, with),
            },
            Statement::Expression { id, expression } => Statement::Expression {
                id: *id,
                expression: expression.replacing(target, with),
            },
            Statement::Return { id, expression } => Statement::Return {
                id: *id,
                expression: expression.replacing(target, with),
            },
            Statement::Placeholder { .. } => self.clone(),
        }
    }

    fn for_each_id_mut(&mut self, f: &mut impl FnMut(&mut NodeId)) {
        match self {
            Statement::Declaration { id, content } => {
                f(id);
                content.for_each_id_mut(f);
            }
            Statement::Branch {
                id,
                condition,
                block,
            } => {
                f(id);
                condition.for_each_id_mut(f);
                block.iter_mut().for_each(|s| s.for_each_id_mut(f));
            }
            Statement::Loop {
                id,
                pattern,
                expression,
                block,
            } => {
                f(id);
                pattern.for_each_id_mut(f);
                expression.for_each_id_mut(f);
                block.iter_mut().for_each(|s| s.for_each_id_mut(f));
            }
            Statement::Expression { id, expression } | Statement::Return { id, expression } => {
                f(id);
                expression.for_each_id_mut(f);
            }
            Statement::Placeholder { id } => f(id),
        }
    }
}

impl Declaration {
    fn replacing(&self, target: NodeId, with: &SyntaxNode) -> Declaration {
        if let SyntaxNode::Declaration(replacement) = with {
            if self.id() == target {
                return replacement.clone();
            }
        }
        match self {
            Declaration::Variable {
                id,
                name,
                annotation,
                initializer,
            } => Declaration::Variable {
                id: *id,
                name: name.clone(),
                annotation: annotation.clone(),
                initializer: initializer
                    .as_ref()
                    .map(|expression| expression.replacing(target, with)),
            },
            Declaration::Function {
                id,
                name,
                return_type,
                generic_parameters,
                parameters,
                block,
            } => Declaration::Function {
                id: *id,
                name: name.clone(),
                return_type: return_type.clone(),
                generic_parameters: generic_parameters.clone(),
                parameters: parameters
                    .iter()
                    .map(|parameter| parameter.replacing(target, with))
                    .collect(),
                block: replace_block(block, target, with),
            },
            Declaration::Record {
                id,
                name,
                generic_parameters,
                declarations,
            } => Declaration::Record {
                id: *id,
                name: name.clone(),
                generic_parameters: generic_parameters.clone(),
                declarations: replace_declarations(declarations, target, with),
            },
            Declaration::Namespace {
                id,
                name,
                declarations,
            } => Declaration::Namespace {
                id: *id,
                name: name.clone(),
                declarations: replace_declarations(declarations, target, with),
            },
            Declaration::Enumeration { .. }
            | Declaration::Import { .. }
            | Declaration::Placeholder { .. } => self.clone(),
        }
    }

    fn for_each_id_mut(&mut self, f: &mut impl FnMut(&mut NodeId)) {
        match self {
            Declaration::Variable {
                id,
                name,
                annotation,
                initializer,
            } => {
                f(id);
                name.for_each_id_mut(f);
                if let Some(annotation) = annotation {
                    annotation.for_each_id_mut(f);
                }
                if let Some(initializer) = initializer {
                    initializer.for_each_id_mut(f);
                }
            }
            Declaration::Function {
                id,
                name,
                return_type,
                generic_parameters,
                parameters,
                block,
            } => {
                f(id);
                name.for_each_id_mut(f);
                return_type.for_each_id_mut(f);
                generic_parameters
                    .iter_mut()
                    .for_each(|p| p.for_each_id_mut(f));
                parameters.iter_mut().for_each(|p| p.for_each_id_mut(f));
                block.iter_mut().for_each(|s| s.for_each_id_mut(f));
            }
            Declaration::Enumeration {
                id,
                name,
                generic_parameters,
                cases,
            } => {
                f(id);
                name.for_each_id_mut(f);
                generic_parameters
                    .iter_mut()
                    .for_each(|p| p.for_each_id_mut(f));
                cases.iter_mut().for_each(|c| c.for_each_id_mut(f));
            }
            Declaration::Record {
                id,
                name,
                generic_parameters,
                declarations,
            } => {
                f(id);
                name.for_each_id_mut(f);
                generic_parameters
                    .iter_mut()
                    .for_each(|p| p.for_each_id_mut(f));
                declarations.iter_mut().for_each(|d| d.for_each_id_mut(f));
            }
            Declaration::Namespace {
                id,
                name,
                declarations,
            } => {
                f(id);
                name.for_each_id_mut(f);
                declarations.iter_mut().for_each(|d| d.for_each_id_mut(f));
            }
            Declaration::Import { id, name } => {
                f(id);
                name.for_each_id_mut(f);
            }
            Declaration::Placeholder { id } => f(id),
        }
    }
}

impl Expression {
    fn replacing(&self, target: NodeId, with: &SyntaxNode) -> Expression {
        if let SyntaxNode::Expression(replacement) = with {
            if self.id() == target {
                return replacement.clone();
            }
        }
        match self {
            Expression::Binary {
                id,
                left,
                right,
                op,
            } => Expression::Binary {
                id: *id,
                left: replace_boxed(left, target, with),
                right: replace_boxed(right, target, with),
                op: *op,
            },
            Expression::FunctionCall {
                id,
                expression,
                arguments,
            } => Expression::FunctionCall {
                id: *id,
                expression: replace_boxed(expression, target, with),
                arguments: arguments
                    .iter()
                    .map(|argument| match argument {
                        FunctionCallArgument::Argument {
                            id,
                            label,
                            expression,
                        } => FunctionCallArgument::Argument {
                            id: *id,
                            label: label.clone(),
                            expression: expression.replacing(target, with),
                        },
                        FunctionCallArgument::Placeholder { .. } => argument.clone(),
                    })
                    .collect(),
            },
            Expression::Literal {
                id,
                literal: Literal::Array { id: literal_id, value },
            } => Expression::Literal {
                id: *id,
                literal: Literal::Array {
                    id: *literal_id,
                    value: value
                        .iter()
                        .map(|element| element.replacing(target, with))
                        .collect(),
                },
            },
            Expression::Member {
                id,
                expression,
                member_name,
            } => Expression::Member {
                id: *id,
                expression: replace_boxed(expression, target, with),
                member_name: member_name.clone(),
            },
            Expression::Identifier { .. }
            | Expression::Literal { .. }
            | Expression::Placeholder { .. } => self.clone(),
        }
    }

    fn for_each_id_mut(&mut self, f: &mut impl FnMut(&mut NodeId)) {
        match self {
            Expression::Binary {
                id, left, right, ..
            } => {
                f(id);
                left.for_each_id_mut(f);
                right.for_each_id_mut(f);
            }
            Expression::Identifier { id, identifier } => {
                f(id);
                identifier.for_each_id_mut(f);
            }
            Expression::FunctionCall {
                id,
                expression,
                arguments,
            } => {
                f(id);
                expression.for_each_id_mut(f);
                for argument in arguments {
                    match argument {
                        FunctionCallArgument::Argument { id, expression, .. } => {
                            f(id);
                            expression.for_each_id_mut(f);
                        }
                        FunctionCallArgument::Placeholder { id } => f(id),
                    }
                }
            }
            Expression::Literal { id, literal } => {
                f(id);
                literal.for_each_id_mut(f);
            }
            Expression::Member {
                id,
                expression,
                member_name,
            } => {
                f(id);
                expression.for_each_id_mut(f);
                member_name.for_each_id_mut(f);
            }
            Expression::Placeholder { id } => f(id),
        }
    }
}

impl FunctionParameter {
    fn replacing(&self, target: NodeId, with: &SyntaxNode) -> FunctionParameter {
        match self {
            FunctionParameter::Parameter {
                id,
                external_name,
                local_name,
                annotation,
                default_value,
            } => FunctionParameter::Parameter {
                id: *id,
                external_name: external_name.clone(),
                local_name: local_name.clone(),
                annotation: annotation.clone(),
                default_value: default_value
                    .as_ref()
                    .map(|expression| expression.replacing(target, with)),
            },
            FunctionParameter::Placeholder { .. } => self.clone(),
        }
    }

    fn for_each_id_mut(&mut self, f: &mut impl FnMut(&mut NodeId)) {
        match self {
            FunctionParameter::Parameter {
                id,
                local_name,
                annotation,
                default_value,
                ..
            } => {
                f(id);
                local_name.for_each_id_mut(f);
                annotation.for_each_id_mut(f);
                if let Some(default_value) = default_value {
                    default_value.for_each_id_mut(f);
                }
            }
            FunctionParameter::Placeholder { id } => f(id),
        }
    }
}

impl GenericParameter {
    fn for_each_id_mut(&mut self, f: &mut impl FnMut(&mut NodeId)) {
        match self {
            GenericParameter::Parameter { id, name } => {
                f(id);
                name.for_each_id_mut(f);
            }
            GenericParameter::Placeholder { id } => f(id),
        }
    }
}

impl EnumerationCase {
    fn for_each_id_mut(&mut self, f: &mut impl FnMut(&mut NodeId)) {
        match self {
            EnumerationCase::Case {
                id,
                name,
                associated_value_types,
            } => {
                f(id);
                name.for_each_id_mut(f);
                associated_value_types
                    .iter_mut()
                    .for_each(|t| t.for_each_id_mut(f));
            }
            EnumerationCase::Placeholder { id } => f(id),
        }
    }
}

impl Literal {
    fn for_each_id_mut(&mut self, f: &mut impl FnMut(&mut NodeId)) {
        match self {
            Literal::Array { id, value } => {
                f(id);
                value.iter_mut().for_each(|e| e.for_each_id_mut(f));
            }
            Literal::None { id }
            | Literal::Boolean { id, .. }
            | Literal::Number { id, .. }
            | Literal::String { id, .. }
            | Literal::Color { id, .. } => f(id),
        }
    }
}

impl TypeAnnotation {
    fn for_each_id_mut(&mut self, f: &mut impl FnMut(&mut NodeId)) {
        match self {
            TypeAnnotation::TypeIdentifier {
                id,
                identifier,
                generic_arguments,
            } => {
                f(id);
                identifier.for_each_id_mut(f);
                generic_arguments
                    .iter_mut()
                    .for_each(|t| t.for_each_id_mut(f));
            }
            TypeAnnotation::FunctionType {
                id,
                return_type,
                argument_types,
            } => {
                f(id);
                return_type.for_each_id_mut(f);
                argument_types.iter_mut().for_each(|t| t.for_each_id_mut(f));
            }
            TypeAnnotation::Placeholder { id } => f(id),
        }
    }
}

impl Pattern {
    fn for_each_id_mut(&mut self, f: &mut impl FnMut(&mut NodeId)) {
        f(&mut self.id);
    }
}

impl Identifier {
    fn for_each_id_mut(&mut self, f: &mut impl FnMut(&mut NodeId)) {
        f(&mut self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::Builder;

    #[test]
    fn replace_expression_keeps_other_ids() {
        let mut b = Builder::new();
        let one = b.number(1.0);
        let target = one.id();
        let decl = b.variable("x", None, Some(one));
        let stmt = b.declaration(decl);
        let program = b.program(vec![stmt]);

        let replacement = b.string("hello");
        let edited = program.replace(target, &SyntaxNode::Expression(replacement.clone()));

        assert!(edited.find(target).is_none());
        assert!(edited.find(replacement.id()).is_some());
        assert_eq!(edited.id, program.id);
        assert_eq!(edited.block[0].id(), program.block[0].id());
        // The original is untouched.
        assert!(program.find(target).is_some());
    }

    #[test]
    fn replace_with_wrong_kind_is_a_no_op() {
        let mut b = Builder::new();
        let one = b.number(1.0);
        let target = one.id();
        let stmt = b.expression_statement(one);
        let program = b.program(vec![stmt]);

        let placeholder = Statement::Placeholder { id: b.ids().fresh() };
        let edited = program.replace(target, &SyntaxNode::Statement(placeholder));
        assert_eq!(edited, program);
    }

    #[test]
    fn replace_statement_inside_branch() {
        let mut b = Builder::new();
        let condition = b.boolean(true);
        let one = b.number(1.0);
        let inner = b.expression_statement(one);
        let inner_id = inner.id();
        let branch = b.branch(condition, vec![inner]);
        let program = b.program(vec![branch]);

        let placeholder = Statement::Placeholder { id: b.ids().fresh() };
        let new_id = placeholder.id();
        let edited = program.replace(inner_id, &SyntaxNode::Statement(placeholder));
        match &edited.block[0] {
            Statement::Branch { block, .. } => assert_eq!(block[0].id(), new_id),
            other => panic!("expected branch, got {:?}", other),
        }
    }

    #[test]
    fn reidentify_assigns_fresh_ids() {
        let mut b = Builder::new();
        let x = b.ident("x");
        let two = b.number(2.0);
        let call = b.call(x, vec![(Some("a"), two)]);
        let mut node = SyntaxNode::Expression(call.clone());

        let mut ids = IdGenerator::starting_after(Some(NodeId(1000))).unwrap();
        node.reidentify(&mut ids);

        assert_ne!(node.id(), call.id());
        assert!(node.id() > NodeId(1000));
        match node {
            SyntaxNode::Expression(Expression::FunctionCall { arguments, .. }) => {
                assert!(arguments[0].id() > NodeId(1000));
            }
            other => panic!("unexpected node {:?}", other),
        }
    }
}
