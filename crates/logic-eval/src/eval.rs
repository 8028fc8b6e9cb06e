//! Tree-walking evaluation.
//!
//! Values are computed children first, so every node sees the values of its
//! operands. A branch is the exception: its condition is evaluated before
//! anything else and its block is walked only when the condition is `true`.
//!
//! Evaluation never fails. A node whose inputs have no value (unresolved,
//! untaken, or unsupported) is skipped and gets no entry in
//! [`EvaluationResult::values`].

use std::cmp::Ordering;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use logic_syntax::{
    reduce, BinaryOperator, Declaration, EnumerationCase, Expression, FunctionCallArgument,
    Literal, NodeId, NodeRef, Program, Statement, TraversalConfig,
};
use logic_typeck::builtins::is_primitive_type;
use logic_typeck::{InferenceResult, ScopeResult, Substitution, Term};

use crate::value::{BuiltinFunction, Function, LogicValue, Memory};

/// Values keyed by node id. Patterns hold the value of their declaration.
#[derive(Clone, Debug, Default)]
pub struct EvaluationResult {
    pub values: FxHashMap<NodeId, LogicValue>,
}

impl EvaluationResult {
    pub fn value(&self, node: NodeId) -> Option<&LogicValue> {
        self.values.get(&node)
    }
}

struct Evaluator<'s> {
    scope: &'s ScopeResult,
    inference: &'s InferenceResult,
    substitution: &'s Substitution,
    values: FxHashMap<NodeId, LogicValue>,
}

/// Evaluate every reachable node of `program`.
pub fn evaluate(
    program: &Program,
    scope: &ScopeResult,
    inference: &InferenceResult,
    substitution: &Substitution,
) -> EvaluationResult {
    let evaluator = Evaluator {
        scope,
        inference,
        substitution,
        values: FxHashMap::default(),
    };
    let evaluator = evaluator.walk(NodeRef::Program(program));
    debug!(values = evaluator.values.len(), "evaluated");
    EvaluationResult {
        values: evaluator.values,
    }
}

impl<'s> Evaluator<'s> {
    fn walk(self, root: NodeRef<'_>) -> Self {
        let mut config = TraversalConfig::pre_order();
        reduce(
            root,
            &mut config,
            self,
            &mut |evaluator: Self, node: NodeRef<'_>, config: &mut TraversalConfig| {
                evaluator.visit(node, config)
            },
        )
    }

    fn visit(mut self, node: NodeRef<'_>, config: &mut TraversalConfig) -> Self {
        if config.is_revisit() {
            self.leave(node);
            return self;
        }
        match node {
            NodeRef::Statement(Statement::Branch {
                id,
                condition,
                block,
            }) => {
                config.ignore_children = true;
                self = self.walk(NodeRef::Expression(condition));
                match self.value_of(condition.id()).and_then(LogicValue::as_bool) {
                    Some(true) => {
                        for statement in block {
                            self = self.walk(NodeRef::Statement(statement));
                        }
                    }
                    Some(false) => trace!(branch = %id, "branch not taken"),
                    None => trace!(branch = %id, "condition has no value"),
                }
            }
            // Loops are not evaluated.
            NodeRef::Statement(Statement::Loop { .. }) => config.ignore_children = true,
            NodeRef::Declaration(declaration) => {
                self = self.enter_declaration(declaration, config);
            }
            NodeRef::TypeAnnotation(_) => config.ignore_children = true,
            _ => config.needs_revisit_after_traversing_children = true,
        }
        self
    }

    fn leave(&mut self, node: NodeRef<'_>) {
        match node {
            NodeRef::Declaration(Declaration::Variable {
                name,
                initializer: Some(initializer),
                ..
            }) => match self.value_of(initializer.id()).cloned() {
                Some(value) => {
                    self.values.insert(name.id, value);
                }
                None => trace!(pattern = %name.id, "initializer has no value"),
            },
            NodeRef::Expression(expression) => self.leave_expression(expression),
            _ => {}
        }
    }

    fn value_of(&self, node: NodeId) -> Option<&LogicValue> {
        self.values.get(&node)
    }

    fn node_type(&self, node: NodeId) -> Option<Term> {
        let term = self.inference.term(node)?;
        Some(self.substitution.substitute(term))
    }

    fn pattern_type(&self, pattern: NodeId) -> Option<Term> {
        let term = self.inference.pattern_term(pattern)?;
        Some(self.substitution.substitute(term))
    }

    // ── Declarations ────────────────────────────────────────────────────

    fn enter_declaration(
        mut self,
        declaration: &Declaration,
        config: &mut TraversalConfig,
    ) -> Self {
        match declaration {
            Declaration::Function { name, .. } => {
                config.ignore_children = true;
                let builtin = self
                    .scope
                    .qualified_name(name.id)
                    .and_then(BuiltinFunction::from_path);
                let Some(builtin) = builtin else {
                    trace!(function = %name.name, "not a native function");
                    return self;
                };
                let ty = self.pattern_type(name.id).unwrap_or_else(Term::unit);
                let value = LogicValue::new(ty, Memory::Function(Function::Builtin(builtin)));
                self.values.insert(name.id, value);
            }
            Declaration::Record {
                name, declarations, ..
            } => {
                config.ignore_children = true;
                if is_primitive_type(&name.name) {
                    return self;
                }
                let mut members = IndexMap::new();
                for member in declarations {
                    let Declaration::Variable {
                        name: member_name,
                        initializer,
                        ..
                    } = member
                    else {
                        continue;
                    };
                    let default = match initializer {
                        Some(initializer) => {
                            self = self.walk(NodeRef::Expression(initializer));
                            self.value_of(initializer.id()).cloned()
                        }
                        None => None,
                    };
                    members.insert(member_name.name.clone(), default);
                }
                let ty = self
                    .pattern_type(name.id)
                    .unwrap_or_else(|| Term::fun(Vec::new(), Term::named(name.name.clone())));
                let value = LogicValue::new(ty, Memory::Function(Function::RecordInit { members }));
                self.values.insert(name.id, value);
            }
            Declaration::Enumeration { name, cases, .. } => {
                config.ignore_children = true;
                for case in cases {
                    let EnumerationCase::Case {
                        name: case_name,
                        associated_value_types,
                        ..
                    } = case
                    else {
                        continue;
                    };
                    let ty = self
                        .pattern_type(case_name.id)
                        .unwrap_or_else(|| Term::named(name.name.clone()));
                    let memory = if associated_value_types.is_empty() {
                        Memory::Enum {
                            case: case_name.name.clone(),
                            values: Vec::new(),
                        }
                    } else {
                        Memory::Function(Function::EnumInit {
                            case: case_name.name.clone(),
                        })
                    };
                    self.values.insert(case_name.id, LogicValue::new(ty, memory));
                }
            }
            Declaration::Variable { .. }
            | Declaration::Namespace { .. }
            | Declaration::Import { .. }
            | Declaration::Placeholder { .. } => {
                config.needs_revisit_after_traversing_children = true;
            }
        }
        self
    }

    // ── Expressions ─────────────────────────────────────────────────────

    fn leave_expression(&mut self, expression: &Expression) {
        match expression {
            Expression::Literal { id, literal } => {
                if let Some(value) = self.literal_value(*id, literal) {
                    self.values.insert(literal.id(), value.clone());
                    self.values.insert(*id, value);
                }
            }
            Expression::Identifier { id, .. } | Expression::Member { id, .. } => {
                let value = self
                    .scope
                    .pattern_for(*id)
                    .and_then(|pattern| self.value_of(pattern))
                    .cloned();
                match value {
                    Some(value) => {
                        self.values.insert(*id, value);
                    }
                    None => trace!(node = %id, "reference has no value"),
                }
            }
            Expression::FunctionCall {
                id,
                expression: callee,
                arguments,
            } => self.leave_call(*id, callee, arguments),
            Expression::Binary {
                id,
                left,
                right,
                op,
            } => self.leave_binary(*id, left, right, *op),
            Expression::Placeholder { .. } => {}
        }
    }

    fn literal_value(&self, id: NodeId, literal: &Literal) -> Option<LogicValue> {
        let value = match literal {
            Literal::None { .. } => LogicValue::unit(),
            Literal::Boolean { value, .. } => LogicValue::bool(*value),
            Literal::Number { value, .. } => LogicValue::number(*value),
            Literal::String { value, .. } => LogicValue::string(value.clone()),
            Literal::Color { value, .. } => LogicValue::color(value.clone()),
            Literal::Array { value, .. } => {
                let items = value
                    .iter()
                    .map(|item| self.value_of(item.id()).cloned())
                    .collect::<Option<Vec<_>>>()?;
                let ty = self.node_type(id).unwrap_or_else(|| {
                    let element = items.first().map_or_else(Term::unit, |item| item.ty.clone());
                    Term::array(element)
                });
                LogicValue::new(ty, Memory::Array(items))
            }
        };
        Some(value)
    }

    fn leave_call(
        &mut self,
        id: NodeId,
        callee: &Expression,
        arguments: &[FunctionCallArgument],
    ) {
        let Some(callee_value) = self.value_of(callee.id()) else {
            trace!(call = %id, "callee has no value");
            return;
        };
        let Some(function) = callee_value.as_function().cloned() else {
            trace!(call = %id, "callee is not a function");
            return;
        };
        let declared_return = match &callee_value.ty {
            Term::Fun { return_type, .. } => Some((**return_type).clone()),
            _ => None,
        };

        let mut given = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let FunctionCallArgument::Argument {
                label, expression, ..
            } = argument
            else {
                continue;
            };
            let Some(value) = self.value_of(expression.id()).cloned() else {
                trace!(call = %id, argument = %argument.id(), "argument has no value");
                return;
            };
            given.push((label.clone(), value));
        }

        let value = match function {
            Function::Builtin(builtin) => match builtin.call(&given) {
                Some(value) => value,
                None => {
                    debug!(call = %id, builtin = builtin.path(), "builtin produced no value");
                    return;
                }
            },
            Function::RecordInit { mut members } => {
                for (position, (label, value)) in given.into_iter().enumerate() {
                    let slot = match &label {
                        Some(label) => members.get_mut(label.as_str()),
                        None => members.get_index_mut(position).map(|(_, slot)| slot),
                    };
                    match slot {
                        Some(slot) => *slot = Some(value),
                        None => trace!(call = %id, label = ?label, "no such member"),
                    }
                }
                let ty = self
                    .node_type(id)
                    .or(declared_return)
                    .unwrap_or_else(Term::unit);
                LogicValue::new(ty, Memory::Record(members))
            }
            Function::EnumInit { case } => {
                let values = given.into_iter().map(|(_, value)| value).collect();
                let ty = self
                    .node_type(id)
                    .or(declared_return)
                    .unwrap_or_else(Term::unit);
                LogicValue::new(ty, Memory::Enum { case, values })
            }
        };
        self.values.insert(id, value);
    }

    fn leave_binary(
        &mut self,
        id: NodeId,
        left: &Expression,
        right: &Expression,
        op: BinaryOperator,
    ) {
        let Some(right_value) = self.value_of(right.id()).cloned() else {
            return;
        };
        if op == BinaryOperator::SetEqualTo {
            match self.scope.pattern_for(left.id()) {
                Some(pattern) => {
                    self.values.insert(pattern, right_value);
                }
                None => trace!(node = %id, "assignment target is not a declaration"),
            }
            return;
        }
        let Some(left_value) = self.value_of(left.id()) else {
            return;
        };
        match compare(op, &left_value.memory, &right_value.memory) {
            Some(result) => {
                self.values.insert(id, LogicValue::bool(result));
            }
            None => trace!(node = %id, %op, "operands are not comparable"),
        }
    }
}

/// Equality is structural on any memory. Ordering applies to numbers and
/// strings only.
fn compare(op: BinaryOperator, left: &Memory, right: &Memory) -> Option<bool> {
    let ordering = match (left, right) {
        (Memory::Number(a), Memory::Number(b)) => a.partial_cmp(b),
        (Memory::String(a), Memory::String(b)) => Some(a.cmp(b)),
        _ => None,
    };
    match op {
        BinaryOperator::IsEqualTo => Some(left == right),
        BinaryOperator::IsNotEqualTo => Some(left != right),
        BinaryOperator::IsLessThan => ordering.map(Ordering::is_lt),
        BinaryOperator::IsGreaterThan => ordering.map(Ordering::is_gt),
        BinaryOperator::IsLessThanOrEqualTo => ordering.map(Ordering::is_le),
        BinaryOperator::IsGreaterThanOrEqualTo => ordering.map(Ordering::is_ge),
        BinaryOperator::SetEqualTo => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_structural() {
        let a = Memory::Array(vec![LogicValue::number(1.0)]);
        let b = Memory::Array(vec![LogicValue::number(1.0)]);
        assert_eq!(compare(BinaryOperator::IsEqualTo, &a, &b), Some(true));
        assert_eq!(compare(BinaryOperator::IsNotEqualTo, &a, &b), Some(false));
    }

    #[test]
    fn ordering_needs_numbers_or_strings() {
        let one = Memory::Number(1.0);
        let two = Memory::Number(2.0);
        assert_eq!(compare(BinaryOperator::IsLessThan, &one, &two), Some(true));
        assert_eq!(
            compare(BinaryOperator::IsGreaterThanOrEqualTo, &one, &two),
            Some(false)
        );
        let a = Memory::String("a".to_string());
        let b = Memory::String("b".to_string());
        assert_eq!(compare(BinaryOperator::IsLessThanOrEqualTo, &a, &b), Some(true));
        assert_eq!(compare(BinaryOperator::IsLessThan, &one, &a), None);
        let unit = Memory::Unit;
        assert_eq!(compare(BinaryOperator::IsGreaterThan, &unit, &unit), None);
    }
}
