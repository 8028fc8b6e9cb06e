//! Unification over [`Term`]s.
//!
//! [`solve`] runs Robinson-style worklist unification over a list of
//! equality constraints and produces a [`Substitution`]. There is no union
//! find table: bindings are an ordered list, and every remaining constraint
//! is rewritten through the substitution whenever it learns a binding.
//!
//! Generic parameters (`Gen`) are opaque to the solver. A declaration's
//! stored term is passed through [`instantiate`] at each use site so that
//! every use gets its own fresh variables.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::UnificationError;
use crate::ty::{Argument, Term};

/// `head` and `tail` must unify.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraint {
    pub head: Term,
    pub tail: Term,
}

impl Constraint {
    pub fn new(head: Term, tail: Term) -> Self {
        Constraint { head, tail }
    }

    fn substituted(&self, substitution: &Substitution) -> Constraint {
        Constraint {
            head: substitution.substitute(&self.head),
            tail: substitution.substitute(&self.tail),
        }
    }
}

/// Ordered term-to-term bindings. Lookup is last-write-wins per key.
#[derive(Clone, Debug, Default)]
pub struct Substitution {
    pairs: Vec<(Term, Term)>,
    /// Position of the latest binding for each key.
    latest: FxHashMap<Term, usize>,
}

impl PartialEq for Substitution {
    fn eq(&self, other: &Self) -> bool {
        self.pairs == other.pairs
    }
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: Term, value: Term) {
        self.latest.insert(key.clone(), self.pairs.len());
        self.pairs.push((key, value));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: Term, value: Term) -> Self {
        self.insert(key, value);
        self
    }

    /// The latest value bound directly to `key`, without dereferencing.
    pub fn lookup(&self, key: &Term) -> Option<&Term> {
        self.latest.get(key).map(|&index| &self.pairs[index].1)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Term, &Term)> {
        self.pairs.iter().map(|(k, v)| (k, v))
    }

    /// Apply the substitution.
    ///
    /// Dereferences `term` until no binding applies, then recurses into
    /// constructor parameters and function arguments. A variable that is
    /// already being expanded is left as is, so a cyclic binding such as
    /// `?a ↦ Array<?a>` terminates.
    pub fn substitute(&self, term: &Term) -> Term {
        let mut expanding = Vec::new();
        self.apply(term, &mut expanding)
    }

    fn apply(&self, term: &Term, expanding: &mut Vec<Term>) -> Term {
        if !expanding.contains(term) {
            if let Some(next) = self.lookup(term) {
                expanding.push(term.clone());
                let result = self.apply(next, expanding);
                expanding.pop();
                return result;
            }
        }
        match term {
            Term::Cons { name, parameters } => Term::Cons {
                name: name.clone(),
                parameters: parameters
                    .iter()
                    .map(|p| self.apply(p, expanding))
                    .collect(),
            },
            Term::Fun {
                arguments,
                return_type,
            } => Term::Fun {
                arguments: arguments
                    .iter()
                    .map(|a| Argument::new(a.label.clone(), self.apply(&a.ty, expanding)))
                    .collect(),
                return_type: Box::new(self.apply(return_type, expanding)),
            },
            Term::Evar { .. } | Term::Gen { .. } => term.clone(),
        }
    }
}

/// Free-function form of [`Substitution::substitute`].
pub fn substitute(substitution: &Substitution, term: &Term) -> Term {
    substitution.substitute(term)
}

/// Unify every constraint, first to last.
///
/// Returns the accumulated substitution, or the first structural mismatch.
pub fn solve(constraints: &[Constraint]) -> Result<Substitution, UnificationError> {
    let mut worklist: VecDeque<Constraint> = constraints.iter().cloned().collect();
    let mut substitution = Substitution::new();

    while let Some(Constraint { head, tail }) = worklist.pop_front() {
        if head == tail {
            continue;
        }
        trace!(%head, %tail, "unify");

        let learned = match (&head, &tail) {
            (Term::Gen { .. }, _) | (_, Term::Gen { .. }) => false,
            (Term::Evar { .. }, _) => {
                substitution.insert(head.clone(), tail.clone());
                true
            }
            (_, Term::Evar { .. }) => {
                substitution.insert(tail.clone(), head.clone());
                true
            }
            (
                Term::Fun {
                    arguments: head_arguments,
                    return_type: head_return,
                },
                Term::Fun {
                    arguments: tail_arguments,
                    return_type: tail_return,
                },
            ) => {
                if head_arguments.len() != tail_arguments.len() {
                    return Err(UnificationError::GenericArgumentsCountMismatch {
                        head: head.clone(),
                        tail: tail.clone(),
                    });
                }
                for (a, b) in head_arguments.iter().zip(tail_arguments) {
                    worklist.push_back(Constraint::new(a.ty.clone(), b.ty.clone()));
                }
                worklist.push_back(Constraint::new(
                    (**head_return).clone(),
                    (**tail_return).clone(),
                ));
                false
            }
            (
                Term::Cons {
                    name: head_name,
                    parameters: head_parameters,
                },
                Term::Cons {
                    name: tail_name,
                    parameters: tail_parameters,
                },
            ) => {
                if head_name != tail_name {
                    return Err(UnificationError::NameMismatch {
                        head: head.clone(),
                        tail: tail.clone(),
                    });
                }
                if head_parameters.len() != tail_parameters.len() {
                    return Err(UnificationError::GenericArgumentsCountMismatch {
                        head: head.clone(),
                        tail: tail.clone(),
                    });
                }
                for (a, b) in head_parameters.iter().zip(tail_parameters) {
                    worklist.push_back(Constraint::new(a.clone(), b.clone()));
                }
                false
            }
            (Term::Cons { .. }, Term::Fun { .. }) | (Term::Fun { .. }, Term::Cons { .. }) => {
                return Err(UnificationError::KindMismatch {
                    head: head.clone(),
                    tail: tail.clone(),
                });
            }
        };

        if learned {
            worklist = worklist
                .iter()
                .map(|constraint| constraint.substituted(&substitution))
                .collect();
        }
    }

    debug!(
        constraints = constraints.len(),
        bindings = substitution.len(),
        "solved constraints"
    );
    Ok(substitution)
}

/// Source of fresh type variable and generic parameter names.
///
/// One generator is threaded through an inference run, so names are unique
/// within the run and independent runs never interfere.
#[derive(Debug, Default, Clone)]
pub struct NameGenerator {
    next: u32,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u32 {
        self.next += 1;
        self.next
    }

    /// A fresh, unconstrained type variable.
    pub fn evar(&mut self) -> Term {
        Term::evar(self.next().to_string())
    }

    /// A unique name for the generic parameter declared as `name`.
    pub fn generic_name(&mut self, name: &str) -> String {
        format!("{}{}", name, self.next())
    }
}

/// Replace every generic parameter in `term` with a fresh variable.
///
/// Each distinct generic name maps to one variable, so `(T) -> Array<T>`
/// becomes `(?1) -> Array<?1>`.
pub fn instantiate(term: &Term, names: &mut NameGenerator) -> Term {
    let mut replacements = FxHashMap::default();
    replace_generics(term, names, &mut replacements)
}

fn replace_generics(
    term: &Term,
    names: &mut NameGenerator,
    replacements: &mut FxHashMap<String, Term>,
) -> Term {
    match term {
        Term::Gen { name } => replacements
            .entry(name.clone())
            .or_insert_with(|| names.evar())
            .clone(),
        Term::Evar { .. } => term.clone(),
        Term::Cons { name, parameters } => Term::Cons {
            name: name.clone(),
            parameters: parameters
                .iter()
                .map(|p| replace_generics(p, names, replacements))
                .collect(),
        },
        Term::Fun {
            arguments,
            return_type,
        } => Term::Fun {
            arguments: arguments
                .iter()
                .map(|a| {
                    let ty = replace_generics(&a.ty, names, replacements);
                    Argument::new(a.label.clone(), ty)
                })
                .collect(),
            return_type: Box::new(replace_generics(return_type, names, replacements)),
        },
    }
}
