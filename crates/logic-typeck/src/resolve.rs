//! Scope resolution.
//!
//! One pre-order walk with revisits binds every identifier and member
//! expression to the pattern that declared it, and builds the namespace of
//! qualified names. Scopes are pushed on the first visit of a function,
//! namespace, or loop and popped on the revisit.
//!
//! Resolution is best effort. An identifier that matches nothing is listed
//! in [`ScopeResult::unresolved`] and otherwise left out of the maps.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use logic_syntax::{
    Declaration, EnumerationCase, Expression, FunctionParameter, NodeId, NodeRef, Program,
    Statement, TraversalConfig, TraversalOrder,
};

use crate::builtins::is_primitive_type;
use crate::env::ScopeStack;
use crate::namespace::Namespace;

/// Everything the resolver learned about names in a program.
#[derive(Clone, Debug, Default)]
pub struct ScopeResult {
    /// Identifier and member expression ids to the pattern they resolve to.
    ///
    /// Both the `Expression::Identifier` node and its inner `Identifier` are
    /// keyed. Entries are never removed when a scope is popped.
    pub identifier_to_pattern: FxHashMap<NodeId, NodeId>,
    /// Display name of every declared pattern.
    pub pattern_names: FxHashMap<NodeId, String>,
    /// Generic parameter names of each record, enumeration, and function,
    /// keyed by the declaration's name pattern.
    pub type_parameters: FxHashMap<NodeId, Vec<String>>,
    /// Full qualified path of each declaration outside function bodies.
    pub qualified_names: FxHashMap<NodeId, Vec<String>>,
    pub namespace: Namespace,
    /// Non-placeholder identifiers that matched no declaration, in visit order.
    pub unresolved: Vec<NodeId>,
    /// Whether the walk stopped at the requested target.
    pub reached_target: bool,
    value_scope: ScopeStack,
    type_scope: ScopeStack,
}

impl ScopeResult {
    pub fn pattern_for(&self, node: NodeId) -> Option<NodeId> {
        self.identifier_to_pattern.get(&node).copied()
    }

    pub fn name_of(&self, pattern: NodeId) -> Option<&str> {
        self.pattern_names.get(&pattern).map(String::as_str)
    }

    pub fn qualified_name(&self, pattern: NodeId) -> Option<&[String]> {
        self.qualified_names.get(&pattern).map(Vec::as_slice)
    }

    /// Values visible where the walk ended: at the target, or at the end of
    /// the program.
    pub fn in_scope_values(&self) -> Vec<(String, NodeId)> {
        self.value_scope.flattened()
    }

    /// Type names visible where the walk ended.
    pub fn in_scope_types(&self) -> Vec<(String, NodeId)> {
        self.type_scope.flattened()
    }
}

struct Resolver {
    result: ScopeResult,
    namespace_path: Vec<String>,
    /// Number of enclosing function bodies; locals stay out of the namespace.
    function_depth: usize,
    target: Option<NodeId>,
}

/// Resolve every name in `program`.
///
/// With a `target`, the walk stops on reaching that node, and the scope
/// stacks in the result describe what was visible just before it.
pub fn resolve_scope(program: &Program, target: Option<NodeId>) -> ScopeResult {
    let resolver = Resolver {
        result: ScopeResult::default(),
        namespace_path: Vec::new(),
        function_depth: 0,
        target,
    };
    let resolver = program.reduce(TraversalOrder::Pre, resolver, |resolver, node, config| {
        resolver.visit(node, config)
    });
    let result = resolver.result;
    debug!(
        bindings = result.identifier_to_pattern.len(),
        unresolved = result.unresolved.len(),
        "resolved scope"
    );
    result
}

impl Resolver {
    fn visit(mut self, node: NodeRef<'_>, config: &mut TraversalConfig) -> Self {
        if config.is_revisit() {
            self.leave(node);
            return self;
        }
        if Some(node.id()) == self.target {
            self.result.reached_target = true;
            config.stop_traversal = true;
            return self;
        }

        match node {
            NodeRef::Declaration(declaration) => self.enter_declaration(declaration, config),
            NodeRef::Statement(Statement::Loop { pattern, .. }) => {
                self.result.value_scope.push();
                self.bind_value(pattern.id, &pattern.name);
                config.needs_revisit_after_traversing_children = true;
            }
            NodeRef::Expression(Expression::Identifier { id, identifier }) => {
                config.ignore_children = true;
                if identifier.is_placeholder {
                    return self;
                }
                match self.result.value_scope.get(&identifier.string) {
                    Some(pattern) => {
                        self.result.identifier_to_pattern.insert(*id, pattern);
                        self.result.identifier_to_pattern.insert(identifier.id, pattern);
                    }
                    None => {
                        trace!(name = %identifier.string, id = %id, "unresolved identifier");
                        self.result.unresolved.push(*id);
                    }
                }
            }
            NodeRef::Expression(expression @ Expression::Member { id, .. }) => {
                // Only all-identifier paths resolve through the namespace.
                // Anything else falls through to its children.
                if let Some(path) = expression.member_path() {
                    config.ignore_children = true;
                    match self.result.namespace.get_pattern(path.as_slice()) {
                        Some(pattern) => {
                            self.result.identifier_to_pattern.insert(*id, pattern);
                        }
                        None => trace!(path = ?path, id = %id, "unresolved member path"),
                    }
                }
            }
            NodeRef::TypeAnnotation(_) => config.ignore_children = true,
            _ => {}
        }
        self
    }

    fn enter_declaration(&mut self, declaration: &Declaration, config: &mut TraversalConfig) {
        match declaration {
            Declaration::Function {
                name,
                generic_parameters,
                parameters,
                ..
            } => {
                self.bind_value(name.id, &name.name);
                self.register_qualified(name.id, &name.name);
                self.register_type_parameters(name.id, declaration);

                self.result.value_scope.push();
                self.result.type_scope.push();
                for parameter in parameters {
                    if let FunctionParameter::Parameter { local_name, .. } = parameter {
                        self.bind_value(local_name.id, &local_name.name);
                    }
                }
                for generic in generic_parameters.iter().filter_map(|g| g.pattern()) {
                    self.bind_type(generic.id, &generic.name);
                }
                self.function_depth += 1;
                config.needs_revisit_after_traversing_children = true;
            }
            Declaration::Variable { .. } => {
                config.needs_revisit_after_traversing_children = true;
            }
            Declaration::Record { name, .. } => {
                self.bind_type(name.id, &name.name);
                self.register_type_parameters(name.id, declaration);
                // Members are fields, not free variables.
                config.ignore_children = true;
                config.needs_revisit_after_traversing_children = true;
            }
            Declaration::Enumeration { name, .. } => {
                self.bind_type(name.id, &name.name);
                config.needs_revisit_after_traversing_children = true;
            }
            Declaration::Namespace { name, .. } => {
                self.result.pattern_names.insert(name.id, name.name.clone());
                self.namespace_path.push(name.name.clone());
                let path = self.namespace_path.as_slice();
                if let Err(err) = self.result.namespace.create_namespace(path) {
                    debug!(error = %err, "skipping namespace registration");
                }
                self.result.value_scope.push();
                self.result.type_scope.push();
                config.needs_revisit_after_traversing_children = true;
            }
            Declaration::Import { .. } | Declaration::Placeholder { .. } => {}
        }
    }

    fn leave(&mut self, node: NodeRef<'_>) {
        match node {
            NodeRef::Declaration(declaration) => self.leave_declaration(declaration),
            NodeRef::Statement(Statement::Loop { .. }) => {
                self.result.value_scope.pop();
            }
            _ => {}
        }
    }

    fn leave_declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Function { .. } => {
                self.function_depth -= 1;
                self.result.value_scope.pop();
                self.result.type_scope.pop();
            }
            Declaration::Variable { name, .. } => {
                self.bind_value(name.id, &name.name);
                self.register_qualified(name.id, &name.name);
            }
            Declaration::Record { name, .. } => {
                // The record name doubles as its constructor.
                if !is_primitive_type(&name.name) {
                    self.bind_value(name.id, &name.name);
                    self.register_qualified(name.id, &name.name);
                }
            }
            Declaration::Enumeration { name, cases, .. } => {
                self.register_type_parameters(name.id, declaration);
                self.namespace_path.push(name.name.clone());
                let path = self.namespace_path.as_slice();
                if let Err(err) = self.result.namespace.create_namespace(path) {
                    debug!(error = %err, "skipping enumeration namespace");
                }
                for case in cases {
                    if let EnumerationCase::Case { name: case_name, .. } = case {
                        self.result
                            .pattern_names
                            .insert(case_name.id, case_name.name.clone());
                        self.register_qualified(case_name.id, &case_name.name);
                    }
                }
                self.namespace_path.pop();
            }
            Declaration::Namespace { .. } => {
                self.namespace_path.pop();
                self.result.value_scope.pop();
                self.result.type_scope.pop();
            }
            Declaration::Import { .. } | Declaration::Placeholder { .. } => {}
        }
    }

    fn bind_value(&mut self, pattern: NodeId, name: &str) {
        self.result.value_scope.set(name, pattern);
        self.result.pattern_names.insert(pattern, name.to_string());
    }

    fn bind_type(&mut self, pattern: NodeId, name: &str) {
        self.result.type_scope.set(name, pattern);
        self.result.pattern_names.insert(pattern, name.to_string());
    }

    fn qualified_path(&self, name: &str) -> Vec<String> {
        let mut path = self.namespace_path.clone();
        path.push(name.to_string());
        path
    }

    /// Add `name` under the current namespace path. Locals of function
    /// bodies are not namespace members.
    fn register_qualified(&mut self, pattern: NodeId, name: &str) {
        if self.function_depth > 0 {
            return;
        }
        let path = self.qualified_path(name);
        match self.result.namespace.set(path.as_slice(), pattern) {
            Ok(()) => {
                self.result.qualified_names.insert(pattern, path);
            }
            Err(err) => debug!(error = %err, "skipping namespace registration"),
        }
    }

    fn register_type_parameters(&mut self, pattern: NodeId, declaration: &Declaration) {
        let names: Vec<String> = declaration
            .generic_parameter_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        if !names.is_empty() {
            self.result.type_parameters.insert(pattern, names);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logic_syntax::Builder;

    #[test]
    fn later_declarations_do_not_resolve_earlier_uses() {
        // let a = b; let b = 1
        let mut b = Builder::new();
        let use_b = b.ident("b");
        let use_id = use_b.id();
        let first = b.variable("a", None, Some(use_b));
        let one = b.number(1.0);
        let second = b.variable("b", None, Some(one));
        let statements = vec![b.declaration(first), b.declaration(second)];
        let program = b.program(statements);

        let scope = resolve_scope(&program, None);
        assert_eq!(scope.pattern_for(use_id), None);
        assert_eq!(scope.unresolved, vec![use_id]);
    }

    #[test]
    fn variable_initializer_sees_outer_binding() {
        // let a = 1; let a = a
        let mut b = Builder::new();
        let one = b.number(1.0);
        let first = b.variable("a", None, Some(one));
        let outer = first.name().map(|p| p.id);
        let use_a = b.ident("a");
        let use_id = use_a.id();
        let second = b.variable("a", None, Some(use_a));
        let statements = vec![b.declaration(first), b.declaration(second)];
        let program = b.program(statements);

        let scope = resolve_scope(&program, None);
        assert_eq!(scope.pattern_for(use_id), outer);
    }

    #[test]
    fn placeholders_are_not_reported() {
        let mut b = Builder::new();
        let hole = b.placeholder_ident();
        let stmt = b.expression_statement(hole);
        let program = b.program(vec![stmt]);
        let scope = resolve_scope(&program, None);
        assert!(scope.unresolved.is_empty());
        assert!(scope.identifier_to_pattern.is_empty());
    }

    #[test]
    fn type_annotations_are_not_resolved() {
        let mut b = Builder::new();
        let ty = b.ty("Number");
        let one = b.number(1.0);
        let decl = b.variable("x", Some(ty), Some(one));
        let stmt = b.declaration(decl);
        let program = b.program(vec![stmt]);
        let scope = resolve_scope(&program, None);
        assert!(scope.unresolved.is_empty());
    }

    #[test]
    fn record_members_are_not_in_scope() {
        // record Point { let x: Number }; x
        let mut b = Builder::new();
        let ty = b.ty("Number");
        let member = b.variable("x", Some(ty), None);
        let record = b.record("Point", &[], vec![member]);
        let record_pattern = record.name().map(|p| p.id);
        let use_x = b.ident("x");
        let use_x_id = use_x.id();
        let use_point = b.ident("Point");
        let use_point_id = use_point.id();
        let statements = vec![
            b.declaration(record),
            b.expression_statement(use_x),
            b.expression_statement(use_point),
        ];
        let program = b.program(statements);

        let scope = resolve_scope(&program, None);
        assert_eq!(scope.pattern_for(use_x_id), None);
        assert_eq!(scope.pattern_for(use_point_id), record_pattern);
    }

    #[test]
    fn primitive_records_have_no_constructor() {
        let mut b = Builder::new();
        let record = b.record("Number", &[], vec![]);
        let use_number = b.ident("Number");
        let use_id = use_number.id();
        let statements = vec![b.declaration(record), b.expression_statement(use_number)];
        let program = b.program(statements);

        let scope = resolve_scope(&program, None);
        assert_eq!(scope.pattern_for(use_id), None);
        assert_eq!(scope.in_scope_types().len(), 1);
    }

    #[test]
    fn namespace_members_resolve_by_qualified_path() {
        // namespace Color { let black = 0 }; Color.black; black
        let mut b = Builder::new();
        let zero = b.number(0.0);
        let black = b.variable("black", None, Some(zero));
        let black_pattern = black.name().map(|p| p.id);
        let ns = b.namespace("Color", vec![black]);
        let member = b.member(&["Color", "black"]);
        let member_id = member.id();
        let bare = b.ident("black");
        let bare_id = bare.id();
        let statements = vec![
            b.declaration(ns),
            b.expression_statement(member),
            b.expression_statement(bare),
        ];
        let program = b.program(statements);

        let scope = resolve_scope(&program, None);
        assert_eq!(scope.pattern_for(member_id), black_pattern);
        assert_eq!(scope.pattern_for(bare_id), None);
        assert_eq!(
            scope.qualified_name(black_pattern.unwrap()),
            Some(&["Color".to_string(), "black".to_string()][..])
        );
    }

    #[test]
    fn function_locals_stay_out_of_the_namespace() {
        let mut b = Builder::new();
        let one = b.number(1.0);
        let local = b.variable("local", None, Some(one));
        let body = vec![b.declaration(local)];
        let ret = b.ty("Unit");
        let f = b.function("f", &["T"], vec![], ret, body);
        let f_pattern = f.name().map(|p| p.id).unwrap();
        let stmt = b.declaration(f);
        let program = b.program(vec![stmt]);

        let scope = resolve_scope(&program, None);
        assert_eq!(scope.namespace.get_pattern(&["f"]), Some(f_pattern));
        assert_eq!(scope.namespace.get_pattern(&["local"]), None);
        assert_eq!(scope.type_parameters[&f_pattern], vec!["T".to_string()]);
    }

    #[test]
    fn target_stops_with_a_snapshot_of_visible_names() {
        // let a = 1; func f(p: Number) -> Number { <target> }; let z = 2
        let mut b = Builder::new();
        let one = b.number(1.0);
        let a = b.variable("a", None, Some(one));
        let hole = b.expression_placeholder();
        let target = hole.id();
        let body = vec![b.expression_statement(hole)];
        let ty = b.ty("Number");
        let p = b.parameter("p", ty);
        let ret = b.ty("Number");
        let f = b.function("f", &[], vec![p], ret, body);
        let two = b.number(2.0);
        let z = b.variable("z", None, Some(two));
        let statements = vec![b.declaration(a), b.declaration(f), b.declaration(z)];
        let program = b.program(statements);

        let scope = resolve_scope(&program, Some(target));
        assert!(scope.reached_target);
        let names: Vec<String> = scope.in_scope_values().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "f", "p"]);
    }

    #[test]
    fn parameter_shadows_outer_variable() {
        // let x = 1; func f(x: Number) -> Number { return x }
        let mut b = Builder::new();
        let one = b.number(1.0);
        let outer = b.variable("x", None, Some(one));
        let ty = b.ty("Number");
        let param = b.parameter("x", ty);
        let param_pattern = match &param {
            FunctionParameter::Parameter { local_name, .. } => local_name.id,
            FunctionParameter::Placeholder { .. } => unreachable!(),
        };
        let use_x = b.ident("x");
        let use_id = use_x.id();
        let body = vec![b.return_statement(use_x)];
        let ret = b.ty("Number");
        let f = b.function("f", &[], vec![param], ret, body);
        let statements = vec![b.declaration(outer), b.declaration(f)];
        let program = b.program(statements);

        let scope = resolve_scope(&program, None);
        assert_eq!(scope.pattern_for(use_id), Some(param_pattern));
    }

    #[test]
    fn enumeration_cases_resolve_by_qualified_path() {
        // enum Color { case red; case green }; Color.red
        let mut b = Builder::new();
        let red = b.case("red", Vec::new());
        let red_pattern = match &red {
            EnumerationCase::Case { name, .. } => name.id,
            EnumerationCase::Placeholder { .. } => unreachable!(),
        };
        let green = b.case("green", Vec::new());
        let color = b.enumeration("Color", &[], vec![red, green]);
        let member = b.member(&["Color", "red"]);
        let member_id = member.id();
        let statements = vec![b.declaration(color), b.expression_statement(member)];
        let program = b.program(statements);

        let scope = resolve_scope(&program, None);
        assert_eq!(scope.namespace.get_pattern(&["Color", "red"]), Some(red_pattern));
        assert_eq!(scope.pattern_for(member_id), Some(red_pattern));
    }

    #[test]
    fn namespaced_records_resolve_by_qualified_path() {
        // namespace Geometry { record Point { let x: Number } }
        // Geometry.Point; Point
        let mut b = Builder::new();
        let ty = b.ty("Number");
        let x = b.variable("x", Some(ty), None);
        let point = b.record("Point", &[], vec![x]);
        let point_pattern = point.name().map(|p| p.id);
        let geometry = b.namespace("Geometry", vec![point]);
        let qualified = b.member(&["Geometry", "Point"]);
        let qualified_id = qualified.id();
        let bare = b.ident("Point");
        let bare_id = bare.id();
        let statements = vec![
            b.declaration(geometry),
            b.expression_statement(qualified),
            b.expression_statement(bare),
        ];
        let program = b.program(statements);

        let scope = resolve_scope(&program, None);
        assert_eq!(scope.namespace.get_pattern(&["Geometry", "Point"]), point_pattern);
        assert_eq!(scope.pattern_for(qualified_id), point_pattern);
        assert_eq!(scope.pattern_for(bare_id), None);
        assert_eq!(scope.unresolved, vec![bare_id]);
    }

    #[test]
    fn record_and_namespace_may_share_a_name() {
        // record Color { let value: String }; namespace Color { let black = 0 }
        // Color; Color.black
        let mut b = Builder::new();
        let ty = b.ty("String");
        let value = b.variable("value", Some(ty), None);
        let record = b.record("Color", &[], vec![value]);
        let record_pattern = record.name().map(|p| p.id);
        let zero = b.number(0.0);
        let black = b.variable("black", None, Some(zero));
        let black_pattern = black.name().map(|p| p.id);
        let ns = b.namespace("Color", vec![black]);
        let bare = b.ident("Color");
        let bare_id = bare.id();
        let member = b.member(&["Color", "black"]);
        let member_id = member.id();
        let statements = vec![
            b.declaration(record),
            b.declaration(ns),
            b.expression_statement(bare),
            b.expression_statement(member),
        ];
        let program = b.program(statements);

        let scope = resolve_scope(&program, None);
        assert_eq!(scope.namespace.get_pattern(&["Color"]), record_pattern);
        assert_eq!(scope.pattern_for(bare_id), record_pattern);
        assert_eq!(scope.pattern_for(member_id), black_pattern);
    }

    #[test]
    fn unknown_member_path_reports_no_head() {
        // enum Color { case red }; Color.purple
        let mut b = Builder::new();
        let red = b.case("red", Vec::new());
        let color = b.enumeration("Color", &[], vec![red]);
        let member = b.member(&["Color", "purple"]);
        let member_id = member.id();
        let statements = vec![b.declaration(color), b.expression_statement(member)];
        let program = b.program(statements);

        let scope = resolve_scope(&program, None);
        assert_eq!(scope.pattern_for(member_id), None);
        assert!(scope.unresolved.is_empty(), "{:?}", scope.unresolved);
    }
}
