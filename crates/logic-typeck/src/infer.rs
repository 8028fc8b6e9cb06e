//! Constraint generation.
//!
//! A pre-order walk with revisits assigns a [`Term`] to every expression and
//! declared pattern, and records equality [`Constraint`]s between them.
//! Declarations are typed on their first visit so a body can refer to its
//! own function. Expressions are typed on the revisit, once their children
//! have terms.
//!
//! Nothing here fails the whole pass. A node that cannot be typed is left
//! out of [`InferenceResult::node_terms`], and a call whose callee is not a
//! function is recorded in [`InferenceResult::errors`].

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use logic_syntax::{
    Declaration, EnumerationCase, Expression, FunctionCallArgument, FunctionParameter, Literal,
    NodeId, NodeRef, Program, Statement, TraversalConfig, TraversalOrder, TypeAnnotation,
};

use crate::error::InferError;
use crate::resolve::ScopeResult;
use crate::ty::{Argument, Term};
use crate::unify::{instantiate, Constraint, NameGenerator};

/// Terms and constraints for one program.
#[derive(Clone, Debug, Default)]
pub struct InferenceResult {
    /// Term of each expression, before substitution.
    pub node_terms: FxHashMap<NodeId, Term>,
    /// Declared term of each pattern. Generic declarations keep their `Gen`
    /// parameters; uses instantiate them.
    pub pattern_terms: FxHashMap<NodeId, Term>,
    pub constraints: Vec<Constraint>,
    pub errors: Vec<InferError>,
}

impl InferenceResult {
    pub fn term(&self, node: NodeId) -> Option<&Term> {
        self.node_terms.get(&node)
    }

    pub fn pattern_term(&self, pattern: NodeId) -> Option<&Term> {
        self.pattern_terms.get(&pattern)
    }
}

struct ConstraintGenerator<'s> {
    scope: &'s ScopeResult,
    names: NameGenerator,
    result: InferenceResult,
    /// Generic names visible in annotations, mapped to their unique names.
    generics: Vec<FxHashMap<String, String>>,
    /// Declared return types of the enclosing functions.
    return_types: Vec<Term>,
}

/// Generate terms and constraints for `program`.
pub fn infer_types(program: &Program, scope: &ScopeResult) -> InferenceResult {
    let generator = ConstraintGenerator {
        scope,
        names: NameGenerator::new(),
        result: InferenceResult::default(),
        generics: Vec::new(),
        return_types: Vec::new(),
    };
    let generator = program.reduce(TraversalOrder::Pre, generator, |generator, node, config| {
        generator.visit(node, config)
    });
    let result = generator.result;
    debug!(
        terms = result.node_terms.len(),
        constraints = result.constraints.len(),
        errors = result.errors.len(),
        "generated constraints"
    );
    result
}

impl<'s> ConstraintGenerator<'s> {
    fn visit(mut self, node: NodeRef<'_>, config: &mut TraversalConfig) -> Self {
        if config.is_revisit() {
            self.leave(node);
        } else {
            self.enter(node, config);
        }
        self
    }

    fn enter(&mut self, node: NodeRef<'_>, config: &mut TraversalConfig) {
        match node {
            NodeRef::Declaration(declaration) => self.enter_declaration(declaration, config),
            NodeRef::Statement(Statement::Loop { pattern, .. }) => {
                let element = self.names.evar();
                self.result.pattern_terms.insert(pattern.id, element);
                config.needs_revisit_after_traversing_children = true;
            }
            NodeRef::Statement(Statement::Branch { .. } | Statement::Return { .. }) => {
                config.needs_revisit_after_traversing_children = true;
            }
            NodeRef::FunctionParameter(FunctionParameter::Parameter {
                default_value: Some(_),
                ..
            }) => {
                config.needs_revisit_after_traversing_children = true;
            }
            NodeRef::Expression(expression) => self.enter_expression(expression, config),
            NodeRef::TypeAnnotation(_) => config.ignore_children = true,
            _ => {}
        }
    }

    fn leave(&mut self, node: NodeRef<'_>) {
        match node {
            NodeRef::Declaration(declaration) => self.leave_declaration(declaration),
            NodeRef::Statement(statement) => self.leave_statement(statement),
            NodeRef::FunctionParameter(FunctionParameter::Parameter {
                local_name,
                default_value: Some(default_value),
                ..
            }) => {
                let declared = self.result.pattern_terms.get(&local_name.id).cloned();
                let given = self.result.node_terms.get(&default_value.id()).cloned();
                if let (Some(declared), Some(given)) = (declared, given) {
                    self.constrain(declared, given);
                }
            }
            NodeRef::Expression(expression) => self.leave_expression(expression),
            _ => {}
        }
    }

    // ── Declarations ────────────────────────────────────────────────────

    fn enter_declaration(&mut self, declaration: &Declaration, config: &mut TraversalConfig) {
        match declaration {
            Declaration::Function {
                name,
                return_type,
                parameters,
                ..
            } => {
                self.push_generics(declaration);

                let mut arguments = Vec::new();
                for parameter in parameters {
                    if let FunctionParameter::Parameter {
                        local_name,
                        annotation,
                        ..
                    } = parameter
                    {
                        let ty = self.annotation_term(annotation);
                        self.result.pattern_terms.insert(local_name.id, ty.clone());
                        arguments.push(Argument::new(parameter.label().map(str::to_string), ty));
                    }
                }
                let return_term = self.annotation_term(return_type);
                self.return_types.push(return_term.clone());
                self.result
                    .pattern_terms
                    .insert(name.id, Term::fun(arguments, return_term));
                config.needs_revisit_after_traversing_children = true;
            }
            Declaration::Record {
                name, declarations, ..
            } => {
                let generic_terms = self.push_generics(declaration);
                let mut arguments = Vec::new();
                for member in declarations {
                    if let Declaration::Variable {
                        name: member_name,
                        annotation: Some(annotation),
                        ..
                    } = member
                    {
                        let ty = self.annotation_term(annotation);
                        self.result.pattern_terms.insert(member_name.id, ty.clone());
                        arguments.push(Argument::labeled(member_name.name.clone(), ty));
                    }
                }
                let record_type = Term::cons(name.name.clone(), generic_terms);
                self.result
                    .pattern_terms
                    .insert(name.id, Term::fun(arguments, record_type));
                config.ignore_children = true;
                config.needs_revisit_after_traversing_children = true;
            }
            Declaration::Enumeration { name, cases, .. } => {
                let generic_terms = self.push_generics(declaration);
                let enum_type = Term::cons(name.name.clone(), generic_terms);
                for case in cases {
                    if let EnumerationCase::Case {
                        name: case_name,
                        associated_value_types,
                        ..
                    } = case
                    {
                        let ty = if associated_value_types.is_empty() {
                            enum_type.clone()
                        } else {
                            let arguments = associated_value_types
                                .iter()
                                .map(|annotation| {
                                    Argument::unlabeled(self.annotation_term(annotation))
                                })
                                .collect();
                            Term::fun(arguments, enum_type.clone())
                        };
                        self.result.pattern_terms.insert(case_name.id, ty);
                    }
                }
                config.ignore_children = true;
                config.needs_revisit_after_traversing_children = true;
            }
            Declaration::Variable {
                annotation,
                initializer,
                ..
            } => {
                let typed =
                    matches!(annotation, Some(a) if !a.is_placeholder()) && initializer.is_some();
                if typed {
                    config.needs_revisit_after_traversing_children = true;
                } else {
                    config.ignore_children = true;
                }
            }
            Declaration::Namespace { .. }
            | Declaration::Import { .. }
            | Declaration::Placeholder { .. } => {}
        }
    }

    fn leave_declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Function { .. } => {
                self.generics.pop();
                self.return_types.pop();
            }
            Declaration::Record { .. } | Declaration::Enumeration { .. } => {
                self.generics.pop();
            }
            Declaration::Variable {
                name,
                annotation: Some(annotation),
                initializer: Some(initializer),
                ..
            } => {
                let declared = self.annotation_term(annotation);
                self.result.pattern_terms.insert(name.id, declared.clone());
                match self.result.node_terms.get(&initializer.id()).cloned() {
                    Some(given) => self.constrain(declared, given),
                    None => trace!(pattern = %name.id, "initializer has no term"),
                }
            }
            _ => {}
        }
    }

    /// Allocate unique names for a declaration's generic parameters and make
    /// them visible to its annotations. Returns them as `Gen` terms in
    /// declaration order.
    fn push_generics(&mut self, declaration: &Declaration) -> Vec<Term> {
        let mut frame = FxHashMap::default();
        let mut terms = Vec::new();
        for name in declaration.generic_parameter_names() {
            let unique = self.names.generic_name(name);
            terms.push(Term::gen(unique.clone()));
            frame.insert(name.to_string(), unique);
        }
        self.generics.push(frame);
        terms
    }

    fn generic_in_scope(&self, name: &str) -> Option<&String> {
        self.generics.iter().rev().find_map(|frame| frame.get(name))
    }

    /// The term written by an annotation. A placeholder is a fresh variable.
    fn annotation_term(&mut self, annotation: &TypeAnnotation) -> Term {
        match annotation {
            TypeAnnotation::TypeIdentifier {
                identifier,
                generic_arguments,
                ..
            } => {
                if let Some(unique) = self.generic_in_scope(&identifier.string) {
                    return Term::gen(unique.clone());
                }
                let parameters = generic_arguments
                    .iter()
                    .map(|argument| self.annotation_term(argument))
                    .collect();
                Term::cons(identifier.string.clone(), parameters)
            }
            TypeAnnotation::FunctionType {
                return_type,
                argument_types,
                ..
            } => {
                let arguments = argument_types
                    .iter()
                    .map(|argument| Argument::unlabeled(self.annotation_term(argument)))
                    .collect();
                let return_term = self.annotation_term(return_type);
                Term::fun(arguments, return_term)
            }
            TypeAnnotation::Placeholder { .. } => self.names.evar(),
        }
    }

    // ── Statements ──────────────────────────────────────────────────────

    fn leave_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Branch { condition, .. } => {
                if let Some(term) = self.result.node_terms.get(&condition.id()).cloned() {
                    self.constrain(term, Term::boolean());
                }
            }
            Statement::Loop {
                pattern, expression, ..
            } => {
                let element = self.result.pattern_terms.get(&pattern.id).cloned();
                let iterated = self.result.node_terms.get(&expression.id()).cloned();
                if let (Some(element), Some(iterated)) = (element, iterated) {
                    self.constrain(iterated, Term::array(element));
                }
            }
            Statement::Return { expression, .. } => {
                let expected = self.return_types.last().cloned();
                let given = self.result.node_terms.get(&expression.id()).cloned();
                if let (Some(expected), Some(given)) = (expected, given) {
                    self.constrain(expected, given);
                }
            }
            Statement::Declaration { .. }
            | Statement::Expression { .. }
            | Statement::Placeholder { .. } => {}
        }
    }

    // ── Expressions ─────────────────────────────────────────────────────

    fn enter_expression(&mut self, expression: &Expression, config: &mut TraversalConfig) {
        match expression {
            Expression::Identifier { id, .. } => {
                config.ignore_children = true;
                let term = self.use_site_term(*id);
                self.result.node_terms.insert(*id, term);
            }
            Expression::Member { id, .. } => {
                let term = self.use_site_term(*id);
                self.result.node_terms.insert(*id, term);
                if expression.member_path().is_some() {
                    config.ignore_children = true;
                }
            }
            Expression::Placeholder { id } => {
                let term = self.names.evar();
                self.result.node_terms.insert(*id, term);
            }
            Expression::Binary { .. }
            | Expression::FunctionCall { .. }
            | Expression::Literal { .. } => {
                config.needs_revisit_after_traversing_children = true;
            }
        }
    }

    /// The instantiated term of the pattern `node` resolves to, or a fresh
    /// variable when it resolves to nothing typed.
    fn use_site_term(&mut self, node: NodeId) -> Term {
        let declared = self
            .scope
            .pattern_for(node)
            .and_then(|pattern| self.result.pattern_terms.get(&pattern));
        match declared {
            Some(term) => {
                let term = term.clone();
                instantiate(&term, &mut self.names)
            }
            None => self.names.evar(),
        }
    }

    fn leave_expression(&mut self, expression: &Expression) {
        match expression {
            Expression::FunctionCall {
                id,
                expression: callee,
                arguments,
            } => self.leave_call(*id, callee, arguments),
            Expression::Binary {
                id, left, right, op,
            } => {
                if !op.is_comparison() {
                    return;
                }
                let left = self.result.node_terms.get(&left.id()).cloned();
                let right = self.result.node_terms.get(&right.id()).cloned();
                if let (Some(left), Some(right)) = (left, right) {
                    self.constrain(left, right);
                }
                self.result.node_terms.insert(*id, Term::boolean());
            }
            Expression::Literal { id, literal } => {
                let term = self.literal_term(literal);
                self.result.node_terms.insert(literal.id(), term.clone());
                self.result.node_terms.insert(*id, term);
            }
            Expression::Identifier { .. }
            | Expression::Member { .. }
            | Expression::Placeholder { .. } => {}
        }
    }

    fn leave_call(&mut self, id: NodeId, callee: &Expression, arguments: &[FunctionCallArgument]) {
        let callee_term = self.result.node_terms.get(&callee.id()).cloned();
        let (parameters, return_type) = match callee_term {
            Some(Term::Fun {
                arguments,
                return_type,
            }) => (arguments, *return_type),
            other => {
                debug!(call = %id, "callee is not a function");
                self.result.errors.push(InferError::NotAFunction {
                    call: id,
                    callee: other,
                });
                return;
            }
        };

        for (position, argument) in arguments.iter().enumerate() {
            let FunctionCallArgument::Argument {
                label, expression, ..
            } = argument
            else {
                continue;
            };
            let parameter = match label {
                Some(label) => parameters
                    .iter()
                    .find(|p| p.label.as_deref() == Some(label.as_str())),
                None => parameters.get(position),
            };
            let Some(parameter) = parameter else {
                trace!(call = %id, label = ?label, "no matching parameter");
                continue;
            };
            if let Some(given) = self.result.node_terms.get(&expression.id()).cloned() {
                self.constrain(parameter.ty.clone(), given);
            }
        }
        self.result.node_terms.insert(id, return_type);
    }

    fn literal_term(&mut self, literal: &Literal) -> Term {
        match literal {
            Literal::None { .. } => Term::unit(),
            Literal::Boolean { .. } => Term::boolean(),
            Literal::Number { .. } => Term::number(),
            Literal::String { .. } => Term::string(),
            Literal::Color { .. } => Term::color(),
            Literal::Array { value, .. } => {
                let element = self.names.evar();
                for item in value {
                    if let Some(term) = self.result.node_terms.get(&item.id()).cloned() {
                        self.constrain(element.clone(), term);
                    }
                }
                Term::array(element)
            }
        }
    }

    fn constrain(&mut self, head: Term, tail: Term) {
        trace!(%head, %tail, "constraint");
        self.result.constraints.push(Constraint::new(head, tail));
    }
}
