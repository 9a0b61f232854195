//! Declared parameter types and the bound values handed to command handlers.

use crate::names::eq_ignore_case;
use serde::{Serialize, Serializer};
use std::fmt;

/// An enumeration whose members are matched by name, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumType {
    pub name: String,
    pub members: Vec<String>,
}

impl EnumType {
    pub fn new<N, I, M>(name: N, members: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve `raw` to a member, ignoring case.
    pub fn member(&self, raw: &str) -> Option<Value> {
        self.members
            .iter()
            .position(|member| eq_ignore_case(member, raw))
            .map(|ordinal| Value::Enum {
                member: self.members[ordinal].clone(),
                ordinal,
            })
    }
}

/// Types a single token can be converted into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScalarType {
    Bool,
    Int,
    Float,
    Str,
    Enum(EnumType),
}

impl ScalarType {
    /// Human-readable type name used in diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Str => "string",
            ScalarType::Enum(e) => &e.name,
        }
    }

    /// Value a parameter of this type takes when nothing else is known.
    ///
    /// Strings are absent rather than empty. Enumerations fall back to their
    /// first member, so an enum type must declare at least one.
    pub fn zero_value(&self) -> Value {
        match self {
            ScalarType::Bool => Value::Bool(false),
            ScalarType::Int => Value::Int(0),
            ScalarType::Float => Value::Float(0.0),
            ScalarType::Str => Value::None,
            ScalarType::Enum(e) => match e.members.first() {
                Some(member) => Value::Enum {
                    member: member.clone(),
                    ordinal: 0,
                },
                None => Value::None,
            },
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            ScalarType::Enum(e) => Some(e),
            _ => None,
        }
    }
}

/// Declared shape of a parameter: one scalar, or a flat list of scalars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Scalar(ScalarType),
    List(ScalarType),
}

impl ValueType {
    pub fn element(&self) -> &ScalarType {
        match self {
            ValueType::Scalar(t) | ValueType::List(t) => t,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ValueType::List(_))
    }

    pub fn zero_value(&self) -> Value {
        match self {
            ValueType::Scalar(t) => t.zero_value(),
            ValueType::List(_) => Value::List(Vec::new()),
        }
    }
}

impl From<ScalarType> for ValueType {
    fn from(t: ScalarType) -> Self {
        ValueType::Scalar(t)
    }
}

/// A concrete argument value produced by binding.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (the zero value of a string parameter).
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Enum { member: String, ordinal: usize },
    List(Vec<Value>),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Member name of an enum value.
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            Value::Enum { member, .. } => Some(member),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
            Value::Enum { member, .. } => f.write_str(member),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::None => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Enum { member, .. } => serializer.serialize_str(member),
            Value::List(items) => items.serialize(serializer),
        }
    }
}
