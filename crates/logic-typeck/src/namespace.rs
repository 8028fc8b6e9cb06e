//! Qualified-name registry.
//!
//! A [`Namespace`] maps each name segment to an entry holding the pattern
//! that declared the name, nested members, or both. `Color.saturate` is
//! stored as `Color -> { saturate -> pattern }`. Intervening namespaces must
//! be created explicitly before anything can be set below them.

use indexmap::IndexMap;

use logic_common::NodeId;

use crate::error::NamespaceError;

/// One path segment. A segment can name a declaration, hold nested members,
/// or both: the record `Color` and the namespace `Color` share a segment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NamespaceEntry {
    pub pattern: Option<NodeId>,
    pub members: Option<Namespace>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Namespace {
    entries: IndexMap<String, NamespaceEntry>,
}

fn owned_path<S: AsRef<str>>(path: &[S]) -> Vec<String> {
    path.iter().map(|s| s.as_ref().to_string()).collect()
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &NamespaceEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&NamespaceEntry> {
        let (last, prefix) = path.split_last()?;
        let mut current = self;
        for segment in prefix {
            current = current.entries.get(segment.as_ref())?.members.as_ref()?;
        }
        current.entries.get(last.as_ref())
    }

    /// The pattern at `path`, if `path` names a declaration.
    pub fn get_pattern<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        self.get(path)?.pattern
    }

    pub fn get_namespace<S: AsRef<str>>(&self, path: &[S]) -> Option<&Namespace> {
        if path.is_empty() {
            return Some(self);
        }
        self.get(path)?.members.as_ref()
    }

    fn namespace_mut<S: AsRef<str>>(
        &mut self,
        path: &[S],
    ) -> Result<&mut Namespace, NamespaceError> {
        let mut current = self;
        for (depth, segment) in path.iter().enumerate() {
            let entry = current.entries.get_mut(segment.as_ref()).ok_or_else(|| {
                NamespaceError::MissingNamespace {
                    path: owned_path(&path[..=depth]),
                }
            })?;
            current = entry
                .members
                .as_mut()
                .ok_or_else(|| NamespaceError::NotANamespace {
                    path: owned_path(&path[..=depth]),
                })?;
        }
        Ok(current)
    }

    /// Register the declaration `pattern` at `path`.
    ///
    /// Every prefix of `path` must already be a namespace, and no other
    /// declaration may hold the final segment. A namespace of the same name
    /// is kept.
    pub fn set<S: AsRef<str>>(
        &mut self,
        path: &[S],
        pattern: NodeId,
    ) -> Result<(), NamespaceError> {
        let (last, prefix) = path.split_last().ok_or(NamespaceError::EmptyPath)?;
        let parent = self.namespace_mut(prefix)?;
        let entry = parent.entries.entry(last.as_ref().to_string()).or_default();
        if entry.pattern.is_some() {
            return Err(NamespaceError::AlreadyDefined {
                path: owned_path(path),
            });
        }
        entry.pattern = Some(pattern);
        Ok(())
    }

    /// Create an empty namespace at `path`. An existing namespace is kept,
    /// and a declaration at `path` gains members.
    pub fn create_namespace<S: AsRef<str>>(&mut self, path: &[S]) -> Result<(), NamespaceError> {
        let (last, prefix) = path.split_last().ok_or(NamespaceError::EmptyPath)?;
        let parent = self.namespace_mut(prefix)?;
        let entry = parent.entries.entry(last.as_ref().to_string()).or_default();
        entry.members.get_or_insert_with(Namespace::new);
        Ok(())
    }

    /// Every declaration with its full path, in insertion order. A
    /// declaration comes before its members.
    pub fn flatten(&self) -> Vec<(Vec<String>, NodeId)> {
        let mut out = Vec::new();
        self.flatten_into(&mut Vec::new(), &mut out);
        out
    }

    fn flatten_into(&self, prefix: &mut Vec<String>, out: &mut Vec<(Vec<String>, NodeId)>) {
        for (name, entry) in &self.entries {
            prefix.push(name.clone());
            if let Some(pattern) = entry.pattern {
                out.push((prefix.clone(), pattern));
            }
            if let Some(members) = &entry.members {
                members.flatten_into(prefix, out);
            }
            prefix.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_set_and_get() {
        let mut ns = Namespace::new();
        ns.create_namespace(&["Color"]).unwrap();
        ns.set(&["Color", "red"], NodeId(7)).unwrap();
        assert_eq!(ns.get_pattern(&["Color", "red"]), Some(NodeId(7)));
        assert_eq!(ns.get_pattern(&["Color"]), None);
        assert!(ns.get_namespace(&["Color"]).is_some());
        assert_eq!(ns.get_pattern(&["Color", "blue"]), None);
    }

    #[test]
    fn set_requires_existing_namespace() {
        let mut ns = Namespace::new();
        let err = ns.set(&["Color", "red"], NodeId(7)).unwrap_err();
        assert_eq!(
            err,
            NamespaceError::MissingNamespace {
                path: vec!["Color".to_string()]
            }
        );
    }

    #[test]
    fn top_level_set_needs_no_namespace() {
        let mut ns = Namespace::new();
        ns.set(&["x"], NodeId(1)).unwrap();
        assert_eq!(ns.get_pattern(&["x"]), Some(NodeId(1)));
    }

    #[test]
    fn collisions_are_reported() {
        let mut ns = Namespace::new();
        ns.set(&["x"], NodeId(1)).unwrap();
        assert!(matches!(
            ns.set(&["x"], NodeId(2)),
            Err(NamespaceError::AlreadyDefined { .. })
        ));
        assert!(matches!(
            ns.set(&["x", "y"], NodeId(3)),
            Err(NamespaceError::NotANamespace { .. })
        ));
        assert_eq!(ns.get_pattern(&["x"]), Some(NodeId(1)));
    }

    #[test]
    fn declaration_and_namespace_share_a_segment() {
        // record Color {}; namespace Color { saturate }
        let mut ns = Namespace::new();
        ns.set(&["Color"], NodeId(1)).unwrap();
        ns.create_namespace(&["Color"]).unwrap();
        ns.set(&["Color", "saturate"], NodeId(2)).unwrap();
        assert_eq!(ns.get_pattern(&["Color"]), Some(NodeId(1)));
        assert_eq!(ns.get_pattern(&["Color", "saturate"]), Some(NodeId(2)));

        // The other order: namespace first, then the declaration.
        let mut ns = Namespace::new();
        ns.create_namespace(&["Color"]).unwrap();
        ns.set(&["Color", "saturate"], NodeId(2)).unwrap();
        ns.set(&["Color"], NodeId(1)).unwrap();
        assert_eq!(ns.get_pattern(&["Color"]), Some(NodeId(1)));
        assert_eq!(
            ns.flatten(),
            vec![
                (vec!["Color".to_string()], NodeId(1)),
                (vec!["Color".to_string(), "saturate".to_string()], NodeId(2)),
            ]
        );
        assert!(matches!(
            ns.set(&["Color"], NodeId(3)),
            Err(NamespaceError::AlreadyDefined { .. })
        ));
    }

    #[test]
    fn create_namespace_is_idempotent() {
        let mut ns = Namespace::new();
        ns.create_namespace(&["A"]).unwrap();
        ns.set(&["A", "b"], NodeId(1)).unwrap();
        ns.create_namespace(&["A"]).unwrap();
        assert_eq!(ns.get_pattern(&["A", "b"]), Some(NodeId(1)));
    }

    #[test]
    fn flatten_lists_full_paths() {
        let mut ns = Namespace::new();
        ns.set(&["top"], NodeId(1)).unwrap();
        ns.create_namespace(&["A"]).unwrap();
        ns.create_namespace(&["A", "B"]).unwrap();
        ns.set(&["A", "B", "c"], NodeId(2)).unwrap();
        assert_eq!(
            ns.flatten(),
            vec![
                (vec!["top".to_string()], NodeId(1)),
                (vec!["A".to_string(), "B".to_string(), "c".to_string()], NodeId(2)),
            ]
        );
    }
}
