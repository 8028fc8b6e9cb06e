//! Tree construction with automatic id allocation.
//!
//! The editor creates nodes one at a time as the user edits; tools and tests
//! build whole trees. [`Builder`] owns an [`IdGenerator`] so every node it
//! creates gets a fresh id.

use logic_common::{IdGenerator, NodeId};

use crate::ast::{
    BinaryOperator, Declaration, EnumerationCase, Expression, FunctionCallArgument,
    FunctionParameter, GenericParameter, Identifier, Literal, Pattern, Program, Statement,
    TypeAnnotation,
};

#[derive(Debug, Default)]
pub struct Builder {
    ids: IdGenerator,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue allocating after the ids already used by `program`.
    ///
    /// `None` when `program` already uses the largest id.
    pub fn after(program: &Program) -> Option<Self> {
        let ids = IdGenerator::starting_after(program.max_id())?;
        Some(Self { ids })
    }

    pub fn ids(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    fn fresh(&mut self) -> NodeId {
        self.ids.fresh()
    }

    // ── Leaves ──────────────────────────────────────────────────────────

    pub fn pattern(&mut self, name: &str) -> Pattern {
        Pattern {
            id: self.fresh(),
            name: name.to_string(),
        }
    }

    pub fn identifier(&mut self, name: &str) -> Identifier {
        Identifier {
            id: self.fresh(),
            string: name.to_string(),
            is_placeholder: false,
        }
    }

    pub fn placeholder_identifier(&mut self) -> Identifier {
        Identifier {
            id: self.fresh(),
            string: String::new(),
            is_placeholder: true,
        }
    }

    // ── Type annotations ────────────────────────────────────────────────

    pub fn type_named(
        &mut self,
        name: &str,
        generic_arguments: Vec<TypeAnnotation>,
    ) -> TypeAnnotation {
        let identifier = self.identifier(name);
        TypeAnnotation::TypeIdentifier {
            id: self.fresh(),
            identifier,
            generic_arguments,
        }
    }

    /// Shorthand for a type annotation without generic arguments.
    pub fn ty(&mut self, name: &str) -> TypeAnnotation {
        self.type_named(name, Vec::new())
    }

    pub fn function_type(
        &mut self,
        argument_types: Vec<TypeAnnotation>,
        return_type: TypeAnnotation,
    ) -> TypeAnnotation {
        TypeAnnotation::FunctionType {
            id: self.fresh(),
            return_type: Box::new(return_type),
            argument_types,
        }
    }

    pub fn type_placeholder(&mut self) -> TypeAnnotation {
        TypeAnnotation::Placeholder { id: self.fresh() }
    }

    // ── Expressions ─────────────────────────────────────────────────────

    fn literal(&mut self, literal: Literal) -> Expression {
        Expression::Literal {
            id: self.fresh(),
            literal,
        }
    }

    pub fn none(&mut self) -> Expression {
        let id = self.fresh();
        self.literal(Literal::None { id })
    }

    pub fn boolean(&mut self, value: bool) -> Expression {
        let id = self.fresh();
        self.literal(Literal::Boolean { id, value })
    }

    pub fn number(&mut self, value: f64) -> Expression {
        let id = self.fresh();
        self.literal(Literal::Number { id, value })
    }

    pub fn string(&mut self, value: &str) -> Expression {
        let id = self.fresh();
        self.literal(Literal::String {
            id,
            value: value.to_string(),
        })
    }

    pub fn color(&mut self, value: &str) -> Expression {
        let id = self.fresh();
        self.literal(Literal::Color {
            id,
            value: value.to_string(),
        })
    }

    pub fn array(&mut self, value: Vec<Expression>) -> Expression {
        let id = self.fresh();
        self.literal(Literal::Array { id, value })
    }

    pub fn ident(&mut self, name: &str) -> Expression {
        let identifier = self.identifier(name);
        Expression::Identifier {
            id: self.fresh(),
            identifier,
        }
    }

    pub fn placeholder_ident(&mut self) -> Expression {
        let identifier = self.placeholder_identifier();
        Expression::Identifier {
            id: self.fresh(),
            identifier,
        }
    }

    /// `A.B.C` as nested member expressions.
    ///
    /// # Panics
    ///
    /// Panics if `path` is empty.
    /// A dotted path such as `Color.saturate`. An empty path is a
    /// placeholder.
    pub fn member(&mut self, path: &[&str]) -> Expression {
        let Some((first, rest)) = path.split_first() else {
            return self.expression_placeholder();
        };
        let mut expression = self.ident(first);
        for segment in rest {
            expression = self.member_of(expression, segment);
        }
        expression
    }

    pub fn member_of(&mut self, expression: Expression, member_name: &str) -> Expression {
        let member_name = self.identifier(member_name);
        Expression::Member {
            id: self.fresh(),
            expression: Box::new(expression),
            member_name,
        }
    }

    pub fn call(
        &mut self,
        callee: Expression,
        arguments: Vec<(Option<&str>, Expression)>,
    ) -> Expression {
        let arguments = arguments
            .into_iter()
            .map(|(label, expression)| FunctionCallArgument::Argument {
                id: self.fresh(),
                label: label.map(str::to_string),
                expression,
            })
            .collect();
        Expression::FunctionCall {
            id: self.fresh(),
            expression: Box::new(callee),
            arguments,
        }
    }

    pub fn binary(
        &mut self,
        left: Expression,
        op: BinaryOperator,
        right: Expression,
    ) -> Expression {
        Expression::Binary {
            id: self.fresh(),
            left: Box::new(left),
            right: Box::new(right),
            op,
        }
    }

    pub fn expression_placeholder(&mut self) -> Expression {
        Expression::Placeholder { id: self.fresh() }
    }

    // ── Declarations ────────────────────────────────────────────────────

    pub fn variable(
        &mut self,
        name: &str,
        annotation: Option<TypeAnnotation>,
        initializer: Option<Expression>,
    ) -> Declaration {
        let name = self.pattern(name);
        Declaration::Variable {
            id: self.fresh(),
            name,
            annotation,
            initializer,
        }
    }

    fn generic_parameters(&mut self, names: &[&str]) -> Vec<GenericParameter> {
        names
            .iter()
            .map(|name| {
                let name = self.pattern(name);
                GenericParameter::Parameter {
                    id: self.fresh(),
                    name,
                }
            })
            .collect()
    }

    /// A parameter whose label is its local name.
    pub fn parameter(&mut self, name: &str, annotation: TypeAnnotation) -> FunctionParameter {
        let local_name = self.pattern(name);
        FunctionParameter::Parameter {
            id: self.fresh(),
            external_name: None,
            local_name,
            annotation,
            default_value: None,
        }
    }

    pub fn labeled_parameter(
        &mut self,
        label: &str,
        name: &str,
        annotation: TypeAnnotation,
    ) -> FunctionParameter {
        let local_name = self.pattern(name);
        FunctionParameter::Parameter {
            id: self.fresh(),
            external_name: Some(label.to_string()),
            local_name,
            annotation,
            default_value: None,
        }
    }

    pub fn function(
        &mut self,
        name: &str,
        generic_parameters: &[&str],
        parameters: Vec<FunctionParameter>,
        return_type: TypeAnnotation,
        block: Vec<Statement>,
    ) -> Declaration {
        let name = self.pattern(name);
        let generic_parameters = self.generic_parameters(generic_parameters);
        Declaration::Function {
            id: self.fresh(),
            name,
            return_type,
            generic_parameters,
            parameters,
            block,
        }
    }

    pub fn record(
        &mut self,
        name: &str,
        generic_parameters: &[&str],
        declarations: Vec<Declaration>,
    ) -> Declaration {
        let name = self.pattern(name);
        let generic_parameters = self.generic_parameters(generic_parameters);
        Declaration::Record {
            id: self.fresh(),
            name,
            generic_parameters,
            declarations,
        }
    }

    pub fn case(
        &mut self,
        name: &str,
        associated_value_types: Vec<TypeAnnotation>,
    ) -> EnumerationCase {
        let name = self.pattern(name);
        EnumerationCase::Case {
            id: self.fresh(),
            name,
            associated_value_types,
        }
    }

    pub fn enumeration(
        &mut self,
        name: &str,
        generic_parameters: &[&str],
        cases: Vec<EnumerationCase>,
    ) -> Declaration {
        let name = self.pattern(name);
        let generic_parameters = self.generic_parameters(generic_parameters);
        Declaration::Enumeration {
            id: self.fresh(),
            name,
            generic_parameters,
            cases,
        }
    }

    pub fn namespace(&mut self, name: &str, declarations: Vec<Declaration>) -> Declaration {
        let name = self.pattern(name);
        Declaration::Namespace {
            id: self.fresh(),
            name,
            declarations,
        }
    }

    pub fn import(&mut self, name: &str) -> Declaration {
        let name = self.pattern(name);
        Declaration::Import {
            id: self.fresh(),
            name,
        }
    }

    // ── Statements ──────────────────────────────────────────────────────

    pub fn declaration(&mut self, content: Declaration) -> Statement {
        Statement::Declaration {
            id: self.fresh(),
            content,
        }
    }

    pub fn branch(&mut self, condition: Expression, block: Vec<Statement>) -> Statement {
        Statement::Branch {
            id: self.fresh(),
            condition,
            block,
        }
    }

    pub fn for_each(
        &mut self,
        pattern: &str,
        expression: Expression,
        block: Vec<Statement>,
    ) -> Statement {
        let pattern = self.pattern(pattern);
        Statement::Loop {
            id: self.fresh(),
            pattern,
            expression,
            block,
        }
    }

    pub fn expression_statement(&mut self, expression: Expression) -> Statement {
        Statement::Expression {
            id: self.fresh(),
            expression,
        }
    }

    pub fn return_statement(&mut self, expression: Expression) -> Statement {
        Statement::Return {
            id: self.fresh(),
            expression,
        }
    }

    pub fn program(&mut self, block: Vec<Statement>) -> Program {
        Program {
            id: self.fresh(),
            block,
        }
    }
}
