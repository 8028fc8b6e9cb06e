//! Lexical scope stack.
//!
//! Each frame maps names to the pattern that declared them. Entering a
//! function body or namespace pushes a frame and leaving pops it. Lookups
//! search from the innermost frame outward, so inner declarations shadow
//! outer ones.

use indexmap::IndexMap;

use logic_common::NodeId;

#[derive(Clone, Debug)]
pub struct ScopeStack {
    /// Index 0 is the outermost frame.
    frames: Vec<IndexMap<String, NodeId>>,
}

impl ScopeStack {
    /// A stack with one empty outermost frame.
    pub fn new() -> Self {
        ScopeStack {
            frames: vec![IndexMap::new()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(IndexMap::new());
    }

    /// Pop the innermost frame. The outermost frame is never popped.
    pub fn pop(&mut self) -> Option<IndexMap<String, NodeId>> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Bind `name` in the innermost frame, replacing an earlier binding there.
    pub fn set(&mut self, name: impl Into<String>, pattern: NodeId) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into(), pattern);
        }
    }

    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name).copied())
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Every visible binding, outermost first, shadowed names omitted.
    pub fn flattened(&self) -> Vec<(String, NodeId)> {
        let mut visible: IndexMap<&str, NodeId> = IndexMap::new();
        for frame in &self.frames {
            for (name, pattern) in frame {
                visible.shift_remove(name.as_str());
                visible.insert(name.as_str(), *pattern);
            }
        }
        visible
            .into_iter()
            .map(|(name, pattern)| (name.to_string(), pattern))
            .collect()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_frames_shadow_outer() {
        let mut scope = ScopeStack::new();
        scope.set("x", NodeId(1));
        scope.push();
        scope.set("x", NodeId(2));
        assert_eq!(scope.get("x"), Some(NodeId(2)));
        scope.pop();
        assert_eq!(scope.get("x"), Some(NodeId(1)));
    }

    #[test]
    fn outermost_frame_is_kept() {
        let mut scope = ScopeStack::new();
        scope.set("x", NodeId(1));
        assert!(scope.pop().is_none());
        assert_eq!(scope.depth(), 1);
        assert_eq!(scope.get("x"), Some(NodeId(1)));
    }

    #[test]
    fn flattened_lists_visible_bindings() {
        let mut scope = ScopeStack::new();
        scope.set("a", NodeId(1));
        scope.set("b", NodeId(2));
        scope.push();
        scope.set("a", NodeId(3));
        scope.set("c", NodeId(4));
        assert_eq!(
            scope.flattened(),
            vec![
                ("b".to_string(), NodeId(2)),
                ("a".to_string(), NodeId(3)),
                ("c".to_string(), NodeId(4)),
            ]
        );
    }
}
