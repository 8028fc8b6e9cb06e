//! Library loading and import splicing.
//!
//! A program names the libraries it uses with top-level `import`
//! declarations. [`splice_imports`] loads every imported library (and the
//! libraries those import), orders them dependencies-first, and prepends
//! their statements to the program. Library nodes are re-identified so ids
//! stay unique across the merged tree.

use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use logic_common::library_graph::{topological_sort, LibraryGraph};
use logic_common::IdGenerator;

use crate::ast::{Declaration, Program, Statement};
use crate::error::SpliceError;

/// File suffix of serialized libraries on disk.
pub const LIBRARY_EXTENSION: &str = "logic.json";

/// Source of library trees by import name.
pub trait LibraryLoader {
    fn load(&self, name: &str) -> Option<Program>;
}

/// Libraries held in memory, keyed by import name.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    libraries: FxHashMap<String, Program>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, program: Program) {
        self.libraries.insert(name.into(), program);
    }

    pub fn with(mut self, name: impl Into<String>, program: Program) -> Self {
        self.insert(name, program);
        self
    }
}

impl LibraryLoader for MemoryLoader {
    fn load(&self, name: &str) -> Option<Program> {
        self.libraries.get(name).cloned()
    }
}

/// Reads `<dir>/<name>.logic.json` from the first directory that has it.
#[derive(Debug, Default, Clone)]
pub struct DirectoryLoader {
    paths: Vec<PathBuf>,
}

impl DirectoryLoader {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl LibraryLoader for DirectoryLoader {
    fn load(&self, name: &str) -> Option<Program> {
        let file_name = format!("{}.{}", name, LIBRARY_EXTENSION);
        let path = self
            .paths
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|path| path.is_file())?;

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read library");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(program) => {
                debug!(path = %path.display(), library = name, "loaded library");
                Some(program)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to parse library");
                None
            }
        }
    }
}

/// Names of the libraries imported at the top level of `program`.
pub fn imported_names(program: &Program) -> Vec<&str> {
    program
        .block
        .iter()
        .filter_map(|statement| match statement {
            Statement::Declaration {
                content: Declaration::Import { name, .. },
                ..
            } => Some(name.name.as_str()),
            _ => None,
        })
        .collect()
}

/// Splice imported libraries into `program`.
///
/// `implicit` names libraries every program and library may use without
/// importing them (the prelude). They are spliced when the loader has them
/// and skipped otherwise. Any other library that cannot be loaded is an
/// error.
pub fn splice_imports(
    program: &Program,
    loader: &dyn LibraryLoader,
    implicit: &[&str],
) -> Result<Program, SpliceError> {
    let mut graph = LibraryGraph::new();
    let mut loaded: FxHashMap<String, Program> = FxHashMap::default();
    let mut implicit_ids = Vec::new();

    for name in implicit {
        if let Some(library) = loader.load(name) {
            implicit_ids.push(graph.add_library(name));
            loaded.insert((*name).to_string(), library);
        } else {
            debug!(library = *name, "implicit library not available");
        }
    }

    let mut pending: VecDeque<String> = imported_names(program)
        .into_iter()
        .map(str::to_string)
        .collect();
    pending.extend(loaded.keys().cloned());

    let mut expanded = FxHashSet::default();
    while let Some(name) = pending.pop_front() {
        if !expanded.insert(name.clone()) {
            continue;
        }
        if !loaded.contains_key(&name) {
            let library = loader
                .load(&name)
                .ok_or_else(|| SpliceError::LibraryNotFound { name: name.clone() })?;
            loaded.insert(name.clone(), library);
        }
        let from = graph.add_library(&name);
        let imports: Vec<String> = imported_names(&loaded[&name])
            .into_iter()
            .map(str::to_string)
            .collect();
        for import in imports {
            let to = graph.add_library(&import);
            graph.add_dependency(from, to);
            pending.push_back(import);
        }
    }

    if loaded.is_empty() {
        return Ok(program.clone());
    }

    // Everything outside the implicit libraries and their own imports
    // depends on the implicit libraries.
    let beneath_implicit = graph.imported_by(&implicit_ids);
    for index in 0..graph.len() {
        let from = graph.libraries[index].id;
        if beneath_implicit.contains(&from) {
            continue;
        }
        for to in &implicit_ids {
            graph.add_dependency(from, *to);
        }
    }

    let order = topological_sort(&graph)?;

    let needed: usize = loaded.values().map(Program::node_count).sum();
    let mut ids = IdGenerator::starting_after(program.max_id())
        .filter(|ids| needed as u64 <= ids.remaining())
        .ok_or(SpliceError::IdsExhausted { needed })?;
    let mut block = Vec::new();
    for library_id in order {
        let name = &graph.get(library_id).name;
        let Some(mut library) = loaded.remove(name) else {
            continue;
        };
        debug!(library = %name, statements = library.block.len(), "splicing library");
        library.reidentify(&mut ids);
        block.extend(library.block);
    }
    block.extend(program.block.iter().cloned());

    Ok(Program {
        id: program.id,
        block,
    })
}
