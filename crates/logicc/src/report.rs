//! Printing pipeline results.

use anyhow::Result;
use serde_json::{json, Value};

use logic_common::NodeId;
use logic_eval::{EvaluationResult, LogicValue};
use logic_syntax::{NodeRef, Program, TraversalOrder};
use logic_typeck::{ScopeResult, Term, TypeckResult};

struct NodeLine {
    id: NodeId,
    /// Declared name, for patterns.
    name: Option<String>,
    ty: Option<Term>,
    value: Option<LogicValue>,
}

/// Types and values of every pattern and expression, in tree order.
pub struct Report {
    nodes: Vec<NodeLine>,
    errors: Vec<String>,
    unresolved: Vec<NodeId>,
}

impl Report {
    pub fn new(program: &Program, checked: &TypeckResult, values: &EvaluationResult) -> Self {
        let nodes = program.reduce(TraversalOrder::Pre, Vec::new(), |mut lines, node, _| {
            let (ty, name) = match node {
                NodeRef::Pattern(pattern) => {
                    (checked.pattern_type(pattern.id), Some(pattern.name.clone()))
                }
                NodeRef::Expression(expression) => (checked.type_of(expression.id()), None),
                _ => return lines,
            };
            let value = values.value(node.id()).cloned();
            if ty.is_some() || value.is_some() {
                lines.push(NodeLine {
                    id: node.id(),
                    name,
                    ty,
                    value,
                });
            }
            lines
        });

        let mut errors = Vec::new();
        if let Err(err) = &checked.solution {
            errors.push(err.to_string());
        }
        errors.extend(checked.inference.errors.iter().map(ToString::to_string));

        Report {
            nodes,
            errors,
            unresolved: checked.scope.unresolved.clone(),
        }
    }

    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(&self.to_json()?)?);
            return Ok(());
        }
        for line in &self.nodes {
            let mut text = line.id.to_string();
            if let Some(name) = &line.name {
                text.push_str(&format!(" {}", name));
            }
            match &line.ty {
                Some(ty) => text.push_str(&format!(": {}", ty)),
                None => text.push_str(": _"),
            }
            if let Some(value) = &line.value {
                text.push_str(&format!(" = {}", value));
            }
            println!("{}", text);
        }
        for id in &self.unresolved {
            println!("warning: unresolved identifier {}", id);
        }
        for error in &self.errors {
            println!("error: {}", error);
        }
        Ok(())
    }

    fn to_json(&self) -> Result<Value> {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for line in &self.nodes {
            let value = match &line.value {
                Some(value) => serde_json::to_value(value)?,
                None => Value::Null,
            };
            nodes.push(json!({
                "id": line.id,
                "name": line.name,
                "type": line.ty.as_ref().map(ToString::to_string),
                "value": value,
            }));
        }
        Ok(json!({
            "nodes": nodes,
            "unresolved": self.unresolved,
            "errors": self.errors,
        }))
    }
}

/// Names visible at a target node.
pub struct ScopeReport {
    target: NodeId,
    reached: bool,
    values: Vec<(String, NodeId)>,
    types: Vec<(String, NodeId)>,
}

impl ScopeReport {
    pub fn new(target: NodeId, scope: &ScopeResult) -> Self {
        ScopeReport {
            target,
            reached: scope.reached_target,
            values: scope.in_scope_values(),
            types: scope.in_scope_types(),
        }
    }

    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            let entries = |names: &[(String, NodeId)]| -> Vec<Value> {
                names
                    .iter()
                    .map(|(name, pattern)| json!({ "name": name, "pattern": pattern }))
                    .collect()
            };
            let document = json!({
                "target": self.target,
                "reached": self.reached,
                "values": entries(&self.values),
                "types": entries(&self.types),
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
            return Ok(());
        }
        if !self.reached {
            println!("warning: target {} was not reached", self.target);
        }
        let names = |entries: &[(String, NodeId)]| -> String {
            entries
                .iter()
                .map(|(name, _)| name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("values: {}", names(&self.values));
        println!("types: {}", names(&self.types));
        Ok(())
    }
}
