//! Shared types for the Logic semantic core.
//!
//! - [`id`]: stable node identifiers and the explicit id allocator
//! - [`library_graph`]: import graph used when splicing libraries into a program
//! - [`config`]: `logic.toml` configuration
//! - [`error`]: configuration errors

pub mod config;
pub mod error;
pub mod id;
pub mod library_graph;

pub use id::{IdGenerator, NodeId};
pub use config::{LogicConfig, PRELUDE_LIBRARY};
pub use error::ConfigError;
