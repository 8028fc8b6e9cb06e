//! Logic type checker: scope resolution, constraint generation, and
//! unification.
//!
//! Checking a program is three independent passes over the same tree:
//!
//! 1. [`resolve_scope`] binds every identifier to the pattern that declared
//!    it and builds the qualified-name [`Namespace`].
//! 2. [`infer_types`] assigns a [`Term`] to every expression and pattern and
//!    collects equality [`Constraint`]s.
//! 3. [`solve`] unifies the constraints into a [`Substitution`].
//!
//! # Architecture
//!
//! - [`ty`]: Term representation (`Evar`, `Cons`, `Gen`, `Fun`)
//! - [`unify`]: Worklist unification, substitution, and instantiation
//! - [`env`]: Lexical scope stack
//! - [`namespace`]: Hierarchical qualified-name registry
//! - [`resolve`]: Identifier resolution
//! - [`infer`]: Constraint generation
//! - [`builtins`]: Built-in types and the prelude library
//! - [`error`]: Unification, namespace, and inference errors

pub mod builtins;
pub mod env;
pub mod error;
pub mod infer;
pub mod namespace;
pub mod resolve;
pub mod ty;
pub mod unify;


use logic_syntax::{NodeId, Program};

pub use crate::env::ScopeStack;
pub use crate::error::{InferError, NamespaceError, UnificationError};
pub use crate::infer::{infer_types, InferenceResult};
pub use crate::namespace::{Namespace, NamespaceEntry};
pub use crate::resolve::{resolve_scope, ScopeResult};
pub use crate::ty::{Argument, Term};
pub use crate::unify::{instantiate, solve, substitute, Constraint, NameGenerator, Substitution};

/// Everything the checker learned about one program.
#[derive(Debug)]
pub struct TypeckResult {
    pub scope: ScopeResult,
    pub inference: InferenceResult,
    /// The solved substitution, or the first mismatch found.
    pub solution: Result<Substitution, UnificationError>,
}

impl TypeckResult {
    /// The fully substituted term of `node`.
    ///
    /// `None` when the node has no term or unification failed.
    pub fn type_of(&self, node: NodeId) -> Option<Term> {
        let term = self.inference.term(node)?;
        let substitution = self.solution.as_ref().ok()?;
        Some(substitution.substitute(term))
    }

    /// The fully substituted declared term of `pattern`.
    pub fn pattern_type(&self, pattern: NodeId) -> Option<Term> {
        let term = self.inference.pattern_term(pattern)?;
        let substitution = self.solution.as_ref().ok()?;
        Some(substitution.substitute(term))
    }

    /// True when unification succeeded and no call had a non-function
    /// callee.
    pub fn is_ok(&self) -> bool {
        self.solution.is_ok() && self.inference.errors.is_empty()
    }
}

/// Type-check a whole program.
///
/// Imports are not followed here; splice libraries in first with
/// [`logic_syntax::splice_imports`].
pub fn check(program: &Program) -> TypeckResult {
    let scope = resolve_scope(program, None);
    let inference = infer_types(program, &scope);
    let solution = solve(&inference.constraints);
    if let Err(err) = &solution {
        tracing::debug!(%err, "unification failed");
    }
    TypeckResult {
        scope,
        inference,
        solution,
    }
}
