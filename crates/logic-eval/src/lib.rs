//! Logic evaluator.
//!
//! Runs after type checking and computes a concrete [`LogicValue`] for every
//! node it can. Evaluation is best effort: nodes that depend on something
//! missing are skipped rather than reported.
//!
//! # Architecture
//!
//! - [`value`]: Runtime values and function tags
//! - [`eval`]: The tree walker
//! - [`builtins`]: Native prelude functions
//! - [`color`]: Hex and HSL color math

pub mod builtins;
pub mod color;
pub mod eval;
pub mod value;

use logic_syntax::Program;
use logic_typeck::{Substitution, TypeckResult};

pub use crate::eval::{evaluate, EvaluationResult};
pub use crate::value::{BuiltinFunction, Function, LogicValue, Memory};

/// Evaluate a program that has already been checked.
///
/// When unification failed, values are still computed, with types left
/// unsubstituted.
pub fn evaluate_checked(program: &Program, checked: &TypeckResult) -> EvaluationResult {
    let fallback = Substitution::new();
    let substitution = checked.solution.as_ref().unwrap_or(&fallback);
    evaluate(program, &checked.scope, &checked.inference, substitution)
}
