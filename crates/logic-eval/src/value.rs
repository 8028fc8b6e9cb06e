//! Runtime values.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use logic_typeck::Term;

/// A value together with the term it was computed at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogicValue {
    #[serde(rename = "type")]
    pub ty: Term,
    pub memory: Memory,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Memory {
    Unit,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<LogicValue>),
    Enum {
        case: String,
        values: Vec<LogicValue>,
    },
    /// Members in declaration order. `None` marks a member with no value.
    Record(IndexMap<String, Option<LogicValue>>),
    Function(Function),
}

/// Functions that can be called at runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Function {
    Builtin(BuiltinFunction),
    /// A record constructor with the default value of each member.
    RecordInit {
        members: IndexMap<String, Option<LogicValue>>,
    },
    /// An enumeration case that takes associated values.
    EnumInit { case: String },
}

/// Natively implemented functions, identified by qualified path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuiltinFunction {
    StringConcat,
    ColorSaturate,
}

impl BuiltinFunction {
    pub fn from_path<S: AsRef<str>>(path: &[S]) -> Option<Self> {
        let segments: Vec<&str> = path.iter().map(|s| s.as_ref()).collect();
        match segments.as_slice() {
            ["String", "concat"] => Some(BuiltinFunction::StringConcat),
            ["Color", "saturate"] => Some(BuiltinFunction::ColorSaturate),
            _ => None,
        }
    }

    /// Parameter labels in declaration order.
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            BuiltinFunction::StringConcat => &["a", "b"],
            BuiltinFunction::ColorSaturate => &["color", "factor"],
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            BuiltinFunction::StringConcat => "String.concat",
            BuiltinFunction::ColorSaturate => "Color.saturate",
        }
    }
}

impl LogicValue {
    pub fn new(ty: Term, memory: Memory) -> Self {
        LogicValue { ty, memory }
    }

    pub fn unit() -> Self {
        Self::new(Term::unit(), Memory::Unit)
    }

    pub fn bool(value: bool) -> Self {
        Self::new(Term::boolean(), Memory::Bool(value))
    }

    pub fn number(value: f64) -> Self {
        Self::new(Term::number(), Memory::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(Term::string(), Memory::String(value.into()))
    }

    /// A `Color` record holding a hex string.
    pub fn color(hex: impl Into<String>) -> Self {
        let mut members = IndexMap::new();
        members.insert("value".to_string(), Some(Self::string(hex)));
        Self::new(Term::color(), Memory::Record(members))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.memory {
            Memory::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.memory {
            Memory::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.memory {
            Memory::String(value) => Some(value),
            _ => None,
        }
    }

    /// The hex string of a `Color` record.
    pub fn as_color(&self) -> Option<&str> {
        match &self.memory {
            Memory::Record(members) => members.get("value")?.as_ref()?.as_str(),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match &self.memory {
            Memory::Function(function) => Some(function),
            _ => None,
        }
    }
}

impl fmt::Display for LogicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.memory {
            Memory::Unit => write!(f, "()"),
            Memory::Bool(value) => write!(f, "{}", value),
            Memory::Number(value) => write!(f, "{}", value),
            Memory::String(value) => write!(f, "{:?}", value),
            Memory::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Memory::Enum { case, values } => {
                write!(f, ".{}", case)?;
                if !values.is_empty() {
                    write!(f, "(")?;
                    for (i, value) in values.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", value)?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
            Memory::Record(members) => {
                write!(f, "{}(", self.ty.cons_name().unwrap_or("record"))?;
                for (i, (name, value)) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match value {
                        Some(value) => write!(f, "{}: {}", name, value)?,
                        None => write!(f, "{}: _", name)?,
                    }
                }
                write!(f, ")")
            }
            Memory::Function(Function::Builtin(builtin)) => {
                write!(f, "<builtin {}>", builtin.path())
            }
            Memory::Function(Function::RecordInit { .. }) => write!(f, "<constructor>"),
            Memory::Function(Function::EnumInit { case }) => write!(f, "<case {}>", case),
        }
    }
}
