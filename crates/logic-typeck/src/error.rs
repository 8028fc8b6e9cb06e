//! Error types for resolution, inference, and unification.
//!
//! Most gaps in a tree under edit are not errors: an unresolved identifier
//! or a node without a type is simply absent from the result maps. The types
//! here cover the cases that are reported explicitly.

use thiserror::Error;

use logic_common::NodeId;

use crate::ty::Term;

/// The first structural mismatch found by the solver.
///
/// Both offending terms are carried, already rewritten through the
/// substitution learned so far.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum UnificationError {
    #[error("type mismatch: `{head}` is not `{tail}`")]
    NameMismatch { head: Term, tail: Term },

    #[error("argument count mismatch between `{head}` and `{tail}`")]
    GenericArgumentsCountMismatch { head: Term, tail: Term },

    #[error("kind mismatch: `{head}` cannot unify with `{tail}`")]
    KindMismatch { head: Term, tail: Term },
}

impl UnificationError {
    pub fn terms(&self) -> (&Term, &Term) {
        match self {
            UnificationError::NameMismatch { head, tail }
            | UnificationError::GenericArgumentsCountMismatch { head, tail }
            | UnificationError::KindMismatch { head, tail } => (head, tail),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NamespaceError {
    #[error("namespace `{}` does not exist", .path.join("."))]
    MissingNamespace { path: Vec<String> },

    #[error("`{}` is a declaration, not a namespace", .path.join("."))]
    NotANamespace { path: Vec<String> },

    #[error("`{}` is already defined", .path.join("."))]
    AlreadyDefined { path: Vec<String> },

    #[error("empty namespace path")]
    EmptyPath,
}

/// A node the constraint generator could not type.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InferError {
    /// Only direct calls to declared functions and constructors are typed.
    #[error("callee of call {call} is not a function")]
    NotAFunction { call: NodeId, callee: Option<Term> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = UnificationError::NameMismatch {
            head: Term::number(),
            tail: Term::string(),
        };
        assert_eq!(err.to_string(), "type mismatch: `Number` is not `String`");

        let err = NamespaceError::MissingNamespace {
            path: vec!["Color".into(), "red".into()],
        };
        assert_eq!(err.to_string(), "namespace `Color.red` does not exist");

        let err = InferError::NotAFunction {
            call: NodeId(4),
            callee: Some(Term::number()),
        };
        assert_eq!(err.to_string(), "callee of call #4 is not a function");
    }
}
