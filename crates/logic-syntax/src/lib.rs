//! The Logic syntax tree.
//!
//! Trees are immutable values. Every selectable node carries a stable
//! [`NodeId`]; edits produce a new tree and leave the ids of untouched nodes
//! alone, so analysis results keyed by id stay meaningful across edits.
//!
//! # Architecture
//!
//! - [`ast`]: node types and the borrowed [`NodeRef`] view over them
//! - [`visit`]: the pre/post-order traversal engine every analysis is built on
//! - [`edit`]: pure lookup, replacement, and re-identification
//! - [`build`]: a [`Builder`] that allocates ids while constructing trees
//! - [`library`]: import resolution and library splicing
//! - [`error`]: splice errors

pub mod ast;
pub mod build;
pub mod edit;
pub mod error;
pub mod library;
pub mod visit;

pub use ast::{
    BinaryOperator, Declaration, EnumerationCase, Expression, FunctionCallArgument,
    FunctionParameter, GenericParameter, Identifier, Literal, NodeRef, Pattern, Program,
    Statement, TypeAnnotation,
};
pub use build::Builder;
pub use edit::SyntaxNode;
pub use error::SpliceError;
pub use library::{
    imported_names, splice_imports, DirectoryLoader, LibraryLoader, MemoryLoader, LIBRARY_EXTENSION,
};
pub use logic_common::{IdGenerator, NodeId};
pub use visit::{reduce, TraversalConfig, TraversalOrder};
