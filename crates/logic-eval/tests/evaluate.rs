//! Whole-pipeline evaluation tests.

use logic_common::PRELUDE_LIBRARY;
use logic_eval::{evaluate_checked, EvaluationResult, LogicValue, Memory};
use logic_syntax::{
    splice_imports, BinaryOperator, Builder, MemoryLoader, NodeId, Program, Statement,
};
use logic_typeck::builtins::prelude;
use logic_typeck::{check, Term};

fn run(program: &Program) -> EvaluationResult {
    let checked = check(program);
    evaluate_checked(program, &checked)
}

fn with_prelude(program: &Program) -> Program {
    let loader = MemoryLoader::new().with(PRELUDE_LIBRARY, prelude());
    splice_imports(program, &loader, &[PRELUDE_LIBRARY]).unwrap()
}

/// `if <condition> { let x: Number = 1 }`, returning the program and the
/// pattern of `x`.
fn guarded_declaration(condition: bool) -> (Program, NodeId) {
    let mut b = Builder::new();
    let condition = b.boolean(condition);
    let ty = b.ty("Number");
    let one = b.number(1.0);
    let x = b.variable("x", Some(ty), Some(one));
    let pattern = x.name().unwrap().id;
    let body = vec![b.declaration(x)];
    let branch = b.branch(condition, body);
    (b.program(vec![branch]), pattern)
}

#[test]
fn untaken_branch_produces_no_values() {
    let (program, x) = guarded_declaration(false);
    let result = run(&program);
    assert_eq!(result.value(x), None);
}

#[test]
fn taken_branch_is_evaluated() {
    let (program, x) = guarded_declaration(true);
    let result = run(&program);
    assert_eq!(result.value(x), Some(&LogicValue::number(1.0)));
}

/// `if left < right { x = value }`
fn guarded_assignment(b: &mut Builder, left: f64, right: f64, value: f64) -> Statement {
    let left = b.number(left);
    let right = b.number(right);
    let condition = b.binary(left, BinaryOperator::IsLessThan, right);
    let target = b.ident("x");
    let value = b.number(value);
    let assignment = b.binary(target, BinaryOperator::SetEqualTo, value);
    let body = vec![b.expression_statement(assignment)];
    b.branch(condition, body)
}

#[test]
fn assignment_only_runs_when_taken() {
    // let x: Number = 0; if 2 < 1 { x = 1 }; if 1 < 2 { x = 5 }
    let mut b = Builder::new();
    let ty = b.ty("Number");
    let zero = b.number(0.0);
    let x = b.variable("x", Some(ty), Some(zero));
    let pattern = x.name().unwrap().id;
    let declaration = b.declaration(x);
    let untaken = guarded_assignment(&mut b, 2.0, 1.0, 1.0);
    let taken = guarded_assignment(&mut b, 1.0, 2.0, 5.0);
    let program = b.program(vec![declaration, untaken, taken]);

    let result = run(&program);
    assert_eq!(result.value(pattern), Some(&LogicValue::number(5.0)));
}

#[test]
fn saturate_builtin() {
    // let c: Color = Color.saturate(color: #ff0000, factor: 0)
    let mut b = Builder::new();
    let callee = b.member(&["Color", "saturate"]);
    let red = b.color("#ff0000");
    let zero = b.number(0.0);
    let call = b.call(callee, vec![(Some("color"), red), (Some("factor"), zero)]);
    let ty = b.ty("Color");
    let c = b.variable("c", Some(ty), Some(call));
    let pattern = c.name().unwrap().id;
    let stmt = b.declaration(c);
    let program = with_prelude(&b.program(vec![stmt]));

    let result = run(&program);
    let value = result.value(pattern).unwrap();
    assert_eq!(value.as_color(), Some("#808080"));
    assert_eq!(value.ty, Term::color());
}

#[test]
fn concat_builtin() {
    // let s: String = String.concat(a: "Log", b: "ic")
    let mut b = Builder::new();
    let callee = b.member(&["String", "concat"]);
    let first = b.string("Log");
    let second = b.string("ic");
    let call = b.call(callee, vec![(Some("a"), first), (Some("b"), second)]);
    let ty = b.ty("String");
    let s = b.variable("s", Some(ty), Some(call));
    let pattern = s.name().unwrap().id;
    let stmt = b.declaration(s);
    let program = with_prelude(&b.program(vec![stmt]));

    let result = run(&program);
    assert_eq!(result.value(pattern), Some(&LogicValue::string("Logic")));
}

#[test]
fn record_constructor_fills_defaults() {
    // record Point { let x: Number; let y: Number = 0 }
    // let p: Point = Point(x: 3)
    let mut b = Builder::new();
    let x_ty = b.ty("Number");
    let x = b.variable("x", Some(x_ty), None);
    let y_ty = b.ty("Number");
    let zero = b.number(0.0);
    let y = b.variable("y", Some(y_ty), Some(zero));
    let point = b.record("Point", &[], vec![x, y]);

    let callee = b.ident("Point");
    let three = b.number(3.0);
    let call = b.call(callee, vec![(Some("x"), three)]);
    let ty = b.ty("Point");
    let p = b.variable("p", Some(ty), Some(call));
    let pattern = p.name().unwrap().id;
    let statements = vec![b.declaration(point), b.declaration(p)];
    let program = b.program(statements);

    let result = run(&program);
    let value = result.value(pattern).unwrap();
    assert_eq!(value.ty, Term::named("Point"));
    insta::assert_snapshot!(value.to_string(), @"Point(x: 3, y: 0)");
}

#[test]
fn enumeration_cases() {
    // enum Optional<T> { case value(T); case none }
    // let a: Optional<Number> = Optional.value(2)
    // let b: Optional<Number> = Optional.none
    let mut b = Builder::new();
    let t = b.ty("T");
    let value_case = b.case("value", vec![t]);
    let none_case = b.case("none", Vec::new());
    let optional = b.enumeration("Optional", &["T"], vec![value_case, none_case]);

    let callee = b.member(&["Optional", "value"]);
    let two = b.number(2.0);
    let call = b.call(callee, vec![(None, two)]);
    let call_id = call.id();
    let number = b.ty("Number");
    let a_ty = b.type_named("Optional", vec![number]);
    let a = b.variable("a", Some(a_ty), Some(call));
    let a_pattern = a.name().unwrap().id;

    let use_none = b.member(&["Optional", "none"]);
    let number = b.ty("Number");
    let none_ty = b.type_named("Optional", vec![number]);
    let none = b.variable("b", Some(none_ty), Some(use_none));
    let none_pattern = none.name().unwrap().id;

    let statements = vec![
        b.declaration(optional),
        b.declaration(a),
        b.declaration(none),
    ];
    let program = b.program(statements);

    let result = run(&program);
    let a_value = result.value(a_pattern).unwrap();
    assert_eq!(
        a_value.memory,
        Memory::Enum {
            case: "value".to_string(),
            values: vec![LogicValue::number(2.0)],
        }
    );
    assert_eq!(
        result.value(call_id).map(|v| v.ty.clone()),
        Some(Term::cons("Optional", vec![Term::number()]))
    );
    insta::assert_snapshot!(a_value.to_string(), @".value(2)");
    insta::assert_snapshot!(result.value(none_pattern).unwrap().to_string(), @".none");
}

#[test]
fn array_literal_values() {
    let mut b = Builder::new();
    let items = vec![b.number(1.0), b.number(2.0)];
    let array = b.array(items);
    let array_id = array.id();
    let stmt = b.expression_statement(array);
    let program = b.program(vec![stmt]);

    let result = run(&program);
    let value = result.value(array_id).unwrap();
    assert_eq!(value.ty, Term::array(Term::number()));
    insta::assert_snapshot!(value.to_string(), @"[1, 2]");
}

#[test]
fn unresolved_references_are_skipped() {
    // let z: Number = missing; let w: Number = 4
    let mut b = Builder::new();
    let ty = b.ty("Number");
    let missing = b.ident("missing");
    let z = b.variable("z", Some(ty), Some(missing));
    let z_pattern = z.name().unwrap().id;
    let ty = b.ty("Number");
    let four = b.number(4.0);
    let w = b.variable("w", Some(ty), Some(four));
    let w_pattern = w.name().unwrap().id;
    let statements = vec![b.declaration(z), b.declaration(w)];
    let program = b.program(statements);

    let result = run(&program);
    assert_eq!(result.value(z_pattern), None);
    assert_eq!(result.value(w_pattern), Some(&LogicValue::number(4.0)));
}

#[test]
fn references_copy_the_declared_value() {
    // let greeting: String = "hi"; let copy: String = greeting
    let mut b = Builder::new();
    let ty = b.ty("String");
    let hi = b.string("hi");
    let greeting = b.variable("greeting", Some(ty), Some(hi));
    let ty = b.ty("String");
    let use_greeting = b.ident("greeting");
    let use_id = use_greeting.id();
    let copy = b.variable("copy", Some(ty), Some(use_greeting));
    let copy_pattern = copy.name().unwrap().id;
    let statements = vec![b.declaration(greeting), b.declaration(copy)];
    let program = b.program(statements);

    let result = run(&program);
    assert_eq!(result.value(use_id), Some(&LogicValue::string("hi")));
    assert_eq!(result.value(copy_pattern), Some(&LogicValue::string("hi")));
}

#[test]
fn namespaced_record_constructor() {
    // namespace Geometry { record Point { let x: Number } }
    // Geometry.Point(x: 1)
    let mut b = Builder::new();
    let ty = b.ty("Number");
    let x = b.variable("x", Some(ty), None);
    let point = b.record("Point", &[], vec![x]);
    let geometry = b.namespace("Geometry", vec![point]);
    let callee = b.member(&["Geometry", "Point"]);
    let one = b.number(1.0);
    let call = b.call(callee, vec![(Some("x"), one)]);
    let call_id = call.id();
    let statements = vec![b.declaration(geometry), b.expression_statement(call)];
    let program = b.program(statements);

    let checked = check(&program);
    assert!(checked.is_ok(), "{:?}", checked.inference.errors);
    let result = evaluate_checked(&program, &checked);
    let value = result.value(call_id).unwrap();
    assert_eq!(value.ty, Term::named("Point"));
    insta::assert_snapshot!(value.to_string(), @"Point(x: 1)");
}
