//! Unification terms.
//!
//! A [`Term`] is the type of a node as seen by the solver. Nominal types are
//! compared by name and parameters; generic parameters stay opaque until a
//! use site instantiates them with fresh variables.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A function argument: an optional external label and its type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argument {
    pub label: Option<String>,
    pub ty: Term,
}

impl Argument {
    pub fn new(label: Option<String>, ty: Term) -> Self {
        Argument { label, ty }
    }

    pub fn unlabeled(ty: Term) -> Self {
        Argument { label: None, ty }
    }

    pub fn labeled(label: impl Into<String>, ty: Term) -> Self {
        Argument {
            label: Some(label.into()),
            ty,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Term {
    /// An unresolved type variable.
    Evar { name: String },
    /// A nominal type applied to its parameters: `Array<Number>`.
    Cons { name: String, parameters: Vec<Term> },
    /// A generic parameter bound at a declaration.
    Gen { name: String },
    Fun {
        arguments: Vec<Argument>,
        return_type: Box<Term>,
    },
}

impl Term {
    pub fn evar(name: impl Into<String>) -> Term {
        Term::Evar { name: name.into() }
    }

    pub fn gen(name: impl Into<String>) -> Term {
        Term::Gen { name: name.into() }
    }

    pub fn cons(name: impl Into<String>, parameters: Vec<Term>) -> Term {
        Term::Cons {
            name: name.into(),
            parameters,
        }
    }

    /// A nominal type without parameters.
    pub fn named(name: impl Into<String>) -> Term {
        Term::cons(name, Vec::new())
    }

    pub fn fun(arguments: Vec<Argument>, return_type: Term) -> Term {
        Term::Fun {
            arguments,
            return_type: Box::new(return_type),
        }
    }

    pub fn boolean() -> Term {
        Term::named("Boolean")
    }

    pub fn number() -> Term {
        Term::named("Number")
    }

    pub fn string() -> Term {
        Term::named("String")
    }

    pub fn color() -> Term {
        Term::named("Color")
    }

    pub fn unit() -> Term {
        Term::named("Unit")
    }

    pub fn array(element: Term) -> Term {
        Term::cons("Array", vec![element])
    }

    pub fn is_evar(&self) -> bool {
        matches!(self, Term::Evar { .. })
    }

    /// Whether any type variable occurs in the term.
    pub fn has_evars(&self) -> bool {
        match self {
            Term::Evar { .. } => true,
            Term::Gen { .. } => false,
            Term::Cons { parameters, .. } => parameters.iter().any(Term::has_evars),
            Term::Fun {
                arguments,
                return_type,
            } => arguments.iter().any(|a| a.ty.has_evars()) || return_type.has_evars(),
        }
    }

    /// The name of a nominal type.
    pub fn cons_name(&self) -> Option<&str> {
        match self {
            Term::Cons { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Evar { name } => write!(f, "?{}", name),
            Term::Gen { name } => write!(f, "{}", name),
            Term::Cons { name, parameters } => {
                write!(f, "{}", name)?;
                if !parameters.is_empty() {
                    write!(f, "<")?;
                    for (i, p) in parameters.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", p)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            Term::Fun {
                arguments,
                return_type,
            } => {
                write!(f, "(")?;
                for (i, a) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match &a.label {
                        Some(label) => write!(f, "{}: {}", label, a.ty)?,
                        None => write!(f, "{}", a.ty)?,
                    }
                }
                write!(f, ") -> {}", return_type)
            }
        }
    }
}
