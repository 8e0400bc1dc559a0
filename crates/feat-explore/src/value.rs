//! Concrete argument values and test cases.
//!
//! `Set` and `Dict` are kept in canonical form (sorted, duplicate elements
//! or keys removed) so structural equality matches the target language's
//! unordered-collection equality. Floats compare by `total_cmp`; the parser
//! never admits NaN or infinities.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Set(Vec<Value>),
    Dict(Vec<(Value, Value)>),
}

impl Value {
    /// Build a set: duplicates removed, elements in canonical order.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        let mut items: Vec<Value> = items.into_iter().collect();
        items.sort();
        items.dedup();
        Value::Set(items)
    }

    /// Build a dict: the first pair wins for a repeated key, pairs end up in
    /// key order.
    pub fn dict(pairs: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let mut out: Vec<(Value, Value)> = Vec::new();
        for (k, v) in pairs {
            if !out.iter().any(|(existing, _)| *existing == k) {
                out.push((k, v));
            }
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Value::Dict(out)
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Int(_) => 0,
            Value::Float(_) => 1,
            Value::Bool(_) => 2,
            Value::Str(_) => 3,
            Value::List(_) => 4,
            Value::Tuple(_) => 5,
            Value::Set(_) => 6,
            Value::Dict(_) => 7,
        }
    }

    /// Element count for collections, character count for strings.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::List(v) | Value::Tuple(v) | Value::Set(v) => Some(v.len()),
            Value::Dict(pairs) => Some(pairs.len()),
            Value::Int(_) | Value::Float(_) | Value::Bool(_) => None,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::List(a), Value::List(b))
            | (Value::Tuple(a), Value::Tuple(b))
            | (Value::Set(a), Value::Set(b)) => a.cmp(b),
            (Value::Dict(a), Value::Dict(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Str(s) => s.hash(state),
            Value::List(v) | Value::Tuple(v) | Value::Set(v) => v.hash(state),
            Value::Dict(pairs) => pairs.hash(state),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_str_literal(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("'")
}

/// Python literal syntax, so an interpreter-backed oracle can splice values
/// straight into a call expression.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Str(s) => write_str_literal(f, s),
            Value::List(items) => {
                f.write_str("[")?;
                write_seq(f, items)?;
                f.write_str("]")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_seq(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::Set(items) if items.is_empty() => f.write_str("set()"),
            Value::Set(items) => {
                f.write_str("{")?;
                write_seq(f, items)?;
                f.write_str("}")
            }
            Value::Dict(pairs) => {
                f.write_str("{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// One fully-resolved argument tuple, in parameter-declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestCase {
    args: Vec<Value>,
}

impl TestCase {
    pub fn new(args: Vec<Value>) -> Self {
        Self { args }
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Arguments rendered as a call argument list, e.g. `1, 'ab'`.
    pub fn call_args(&self) -> String {
        self.args
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.call_args())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_is_canonical() {
        let a = Value::set(vec![Value::Int(3), Value::Int(1), Value::Int(3)]);
        let b = Value::set(vec![Value::Int(1), Value::Int(3)]);
        assert_eq!(a, b);
        assert_eq!(a.len(), Some(2));
    }

    #[test]
    fn test_dict_first_key_wins() {
        let d = Value::dict(vec![
            (Value::Int(2), Value::Bool(true)),
            (Value::Int(1), Value::Bool(false)),
            (Value::Int(2), Value::Bool(false)),
        ]);
        assert_eq!(
            d,
            Value::Dict(vec![
                (Value::Int(1), Value::Bool(false)),
                (Value::Int(2), Value::Bool(true)),
            ])
        );
    }

    #[test]
    fn test_list_and_tuple_differ() {
        assert_ne!(Value::List(vec![]), Value::Tuple(vec![]));
    }

    #[test]
    fn test_display_literals() {
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Str("a'b".into()).to_string(), r"'a\'b'");
        assert_eq!(Value::Tuple(vec![Value::Int(1)]).to_string(), "(1,)");
        assert_eq!(Value::set(vec![]).to_string(), "set()");
        assert_eq!(
            Value::dict(vec![(Value::Str("k".into()), Value::List(vec![Value::Int(2)]))])
                .to_string(),
            "{'k': [2]}"
        );
    }

    #[test]
    fn test_case_display() {
        let case = TestCase::new(vec![Value::Int(1), Value::Str("ab".into())]);
        assert_eq!(case.call_args(), "1, 'ab'");
        assert_eq!(case.to_string(), "(1, 'ab')");
        assert_eq!(case.arity(), 2);
    }
}
