//! Errors raised while splicing imported libraries into a program.

use logic_common::library_graph::CycleError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SpliceError {
    #[error("library `{name}` not found")]
    LibraryNotFound { name: String },

    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error("not enough node ids left to splice {needed} library nodes")]
    IdsExhausted { needed: usize },
}
