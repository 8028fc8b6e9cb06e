//! Import graph for Logic libraries.
//!
//! Before analysis, `import` declarations are resolved to library subtrees
//! and spliced into the program. The graph records which library imports
//! which, so that libraries are spliced dependencies-first and each library
//! exactly once.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

/// A unique identifier for a library within one splice pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LibraryId(pub u32);

/// A single library in the import graph.
#[derive(Debug)]
pub struct LibraryInfo {
    pub id: LibraryId,
    /// Import name, e.g. `"Prelude"` or `"Color"`.
    pub name: String,
    /// Libraries imported by this library.
    pub dependencies: Vec<LibraryId>,
}

/// Error returned when libraries import each other in a cycle.
#[derive(Debug, Clone, Error)]
#[error("import cycle: {}", .cycle_path.join(" -> "))]
pub struct CycleError {
    /// The library names forming the cycle, e.g. `["A", "B", "A"]`.
    pub cycle_path: Vec<String>,
}

/// A directed graph of libraries and their imports.
#[derive(Debug, Default)]
pub struct LibraryGraph {
    /// All libraries, indexed by `LibraryId.0`.
    pub libraries: Vec<LibraryInfo>,
    name_to_id: FxHashMap<String, LibraryId>,
}

impl LibraryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a library, or return the existing id if the name is already known.
    pub fn add_library(&mut self, name: &str) -> LibraryId {
        if let Some(id) = self.name_to_id.get(name) {
            return *id;
        }
        let id = LibraryId(self.libraries.len() as u32);
        self.name_to_id.insert(name.to_string(), id);
        self.libraries.push(LibraryInfo {
            id,
            name: name.to_string(),
            dependencies: Vec::new(),
        });
        id
    }

    pub fn resolve(&self, name: &str) -> Option<LibraryId> {
        self.name_to_id.get(name).copied()
    }

    /// Record that `from` imports `to`. Duplicate and self imports are ignored.
    pub fn add_dependency(&mut self, from: LibraryId, to: LibraryId) {
        if from == to {
            return;
        }
        let deps = &mut self.libraries[from.0 as usize].dependencies;
        if !deps.contains(&to) {
            deps.push(to);
        }
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    pub fn get(&self, id: LibraryId) -> &LibraryInfo {
        &self.libraries[id.0 as usize]
    }

    /// `roots` and every library they import, directly or transitively.
    pub fn imported_by(&self, roots: &[LibraryId]) -> FxHashSet<LibraryId> {
        let mut seen = FxHashSet::default();
        let mut stack = roots.to_vec();
        while let Some(id) = stack.pop() {
            if seen.insert(id) {
                stack.extend(self.get(id).dependencies.iter().copied());
            }
        }
        seen
    }

    fn by_name(&self, ids: impl Iterator<Item = LibraryId>) -> Vec<LibraryId> {
        let mut ids: Vec<LibraryId> = ids.collect();
        ids.sort_by(|a, b| self.get(*a).name.cmp(&self.get(*b).name));
        ids
    }
}

/// Order libraries so that every library comes after the libraries it imports.
///
/// Depth-first from each library in name order, following imports in name
/// order. Reaching a library that is still on the current import path is a
/// cycle, reported as that part of the path.
pub fn topological_sort(graph: &LibraryGraph) -> Result<Vec<LibraryId>, CycleError> {
    let mut sorter = Sorter {
        graph,
        marks: vec![Mark::Unvisited; graph.len()],
        path: Vec::new(),
        order: Vec::with_capacity(graph.len()),
    };
    for id in graph.by_name(graph.libraries.iter().map(|lib| lib.id)) {
        sorter.visit(id)?;
    }
    Ok(sorter.order)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

struct Sorter<'g> {
    graph: &'g LibraryGraph,
    marks: Vec<Mark>,
    path: Vec<LibraryId>,
    order: Vec<LibraryId>,
}

impl Sorter<'_> {
    fn visit(&mut self, id: LibraryId) -> Result<(), CycleError> {
        match self.marks[id.0 as usize] {
            Mark::Done => return Ok(()),
            Mark::OnPath => return Err(self.cycle_to(id)),
            Mark::Unvisited => {}
        }
        self.marks[id.0 as usize] = Mark::OnPath;
        self.path.push(id);
        let graph = self.graph;
        for import in graph.by_name(graph.get(id).dependencies.iter().copied()) {
            self.visit(import)?;
        }
        self.path.pop();
        self.marks[id.0 as usize] = Mark::Done;
        self.order.push(id);
        Ok(())
    }

    /// The import path from the earlier visit of `id` back to `id`.
    fn cycle_to(&self, id: LibraryId) -> CycleError {
        let begin = self.path.iter().position(|on_path| *on_path == id).unwrap_or(0);
        let mut cycle_path: Vec<String> = self.path[begin..]
            .iter()
            .map(|on_path| self.graph.get(*on_path).name.clone())
            .collect();
        cycle_path.push(self.graph.get(id).name.clone());
        CycleError { cycle_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(graph: &LibraryGraph, order: &[LibraryId]) -> Vec<String> {
        order.iter().map(|id| graph.get(*id).name.clone()).collect()
    }

    #[test]
    fn add_library_is_idempotent() {
        let mut graph = LibraryGraph::new();
        let a = graph.add_library("Color");
        let b = graph.add_library("Color");
        assert_eq!(a, b);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.resolve("Color"), Some(a));
        assert_eq!(graph.resolve("Missing"), None);
    }

    #[test]
    fn self_import_is_ignored() {
        let mut graph = LibraryGraph::new();
        let a = graph.add_library("A");
        graph.add_dependency(a, a);
        assert!(graph.get(a).dependencies.is_empty());
    }

    #[test]
    fn dependencies_come_first() {
        // Main imports Color, Color imports Prelude.
        let mut graph = LibraryGraph::new();
        let main = graph.add_library("Main");
        let color = graph.add_library("Color");
        let prelude = graph.add_library("Prelude");
        graph.add_dependency(main, color);
        graph.add_dependency(color, prelude);

        let order = topological_sort(&graph).unwrap();
        assert_eq!(names(&graph, &order), vec!["Prelude", "Color", "Main"]);
    }

    #[test]
    fn diamond_follows_name_order() {
        let mut graph = LibraryGraph::new();
        let a = graph.add_library("A");
        let c = graph.add_library("C");
        let b = graph.add_library("B");
        let d = graph.add_library("D");
        graph.add_dependency(a, b);
        graph.add_dependency(a, c);
        graph.add_dependency(b, d);
        graph.add_dependency(c, d);

        let order = topological_sort(&graph).unwrap();
        assert_eq!(names(&graph, &order), vec!["D", "B", "C", "A"]);
    }

    #[test]
    fn cycle_is_reported() {
        let mut graph = LibraryGraph::new();
        let a = graph.add_library("A");
        let b = graph.add_library("B");
        graph.add_dependency(a, b);
        graph.add_dependency(b, a);

        let err = topological_sort(&graph).unwrap_err();
        assert_eq!(err.cycle_path, vec!["A", "B", "A"]);
        assert_eq!(err.to_string(), "import cycle: A -> B -> A");
    }

    #[test]
    fn cycle_path_starts_where_it_closes() {
        // Main -> A -> B -> C -> B
        let mut graph = LibraryGraph::new();
        let main = graph.add_library("Main");
        let a = graph.add_library("A");
        let b = graph.add_library("B");
        let c = graph.add_library("C");
        graph.add_dependency(main, a);
        graph.add_dependency(a, b);
        graph.add_dependency(b, c);
        graph.add_dependency(c, b);

        let err = topological_sort(&graph).unwrap_err();
        assert_eq!(err.cycle_path, vec!["B", "C", "B"]);
    }

    #[test]
    fn imported_by_is_transitive() {
        let mut graph = LibraryGraph::new();
        let prelude = graph.add_library("Prelude");
        let math = graph.add_library("Math");
        let units = graph.add_library("Units");
        let color = graph.add_library("Color");
        graph.add_dependency(prelude, math);
        graph.add_dependency(math, units);

        let below = graph.imported_by(&[prelude]);
        assert!(below.contains(&prelude));
        assert!(below.contains(&math));
        assert!(below.contains(&units));
        assert!(!below.contains(&color));
    }
}
