//! Built-in types and the prelude library.
//!
//! The primitive types are declared as ordinary records in the prelude so
//! that they resolve like any other type name. Functions listed in
//! [`BUILTIN_FUNCTIONS`] have empty bodies there; their behavior is supplied
//! by the evaluator, keyed by qualified path.

use logic_syntax::{Builder, Program};

/// Records that never get a constructor binding.
pub const PRIMITIVE_TYPES: [&str; 3] = ["Boolean", "Number", "String"];

/// Every nominal type the core knows about without a declaration.
pub const BUILTIN_TYPES: [&str; 6] = ["Boolean", "Number", "String", "Color", "Unit", "Array"];

/// Qualified paths of the functions implemented natively.
pub const BUILTIN_FUNCTIONS: [&[&str]; 2] = [&["String", "concat"], &["Color", "saturate"]];

pub fn is_primitive_type(name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&name)
}

pub fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name)
}

pub fn is_builtin_function<S: AsRef<str>>(path: &[S]) -> bool {
    BUILTIN_FUNCTIONS.iter().any(|builtin| {
        builtin.len() == path.len() && builtin.iter().zip(path).all(|(a, b)| *a == b.as_ref())
    })
}

/// The `Prelude` library: primitive records, `Color`, and the native
/// functions.
///
/// ```text
/// record Boolean {}  record Number {}  record String {}  record Unit {}
/// record Color { let value: String }
/// namespace String { func concat(a: String, b: String) -> String {} }
/// namespace Color { func saturate(color: Color, factor: Number) -> Color {} }
/// ```
pub fn prelude() -> Program {
    let mut b = Builder::new();
    let mut block = Vec::new();

    for name in ["Boolean", "Number", "String", "Unit"] {
        let record = b.record(name, &[], Vec::new());
        block.push(b.declaration(record));
    }

    let value_type = b.ty("String");
    let value = b.variable("value", Some(value_type), None);
    let color = b.record("Color", &[], vec![value]);
    block.push(b.declaration(color));

    let a_type = b.ty("String");
    let a = b.parameter("a", a_type);
    let b_type = b.ty("String");
    let b_param = b.parameter("b", b_type);
    let concat_return = b.ty("String");
    let concat = b.function("concat", &[], vec![a, b_param], concat_return, Vec::new());
    let string_namespace = b.namespace("String", vec![concat]);
    block.push(b.declaration(string_namespace));

    let color_type = b.ty("Color");
    let color_param = b.parameter("color", color_type);
    let factor_type = b.ty("Number");
    let factor = b.parameter("factor", factor_type);
    let saturate_return = b.ty("Color");
    let saturate = b.function(
        "saturate",
        &[],
        vec![color_param, factor],
        saturate_return,
        Vec::new(),
    );
    let color_namespace = b.namespace("Color", vec![saturate]);
    block.push(b.declaration(color_namespace));

    b.program(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_scope;

    #[test]
    fn builtin_paths() {
        assert!(is_builtin_function(&["Color", "saturate"]));
        assert!(is_builtin_function(&["String".to_string(), "concat".to_string()]));
        assert!(!is_builtin_function(&["concat"]));
        assert!(is_primitive_type("Number"));
        assert!(!is_primitive_type("Color"));
        assert!(is_builtin_type("Array"));
    }

    #[test]
    fn prelude_declares_native_functions() {
        let prelude = prelude();
        let scope = resolve_scope(&prelude, None);
        for path in BUILTIN_FUNCTIONS {
            assert!(
                scope.namespace.get_pattern(path).is_some(),
                "missing {:?}",
                path
            );
        }
        assert!(scope.unresolved.is_empty());
    }
}
