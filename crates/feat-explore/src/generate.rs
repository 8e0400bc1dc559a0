//! Per-node value generation.
//!
//! Exhaustive mode:
//! - **Scalars**: the exhaustive domain, cast to the scalar type.
//! - **str**: for each length L, one string per charset rotation
//!   (`abc` at L=2 gives `ab`, `bc`, `ca`). Length is the exhaustive axis.
//! - **list / tuple / set**: one container per size S, holding the first S
//!   element values with wrap-around repetition.
//! - **dict**: one dict per size S, pairing the key and value sets position
//!   by position with the same wrap-around.
//!
//! Container sizes are the exhaustive axis; element breadth comes from the
//! random portion and the top-level product across parameters.
//!
//! Random mode draws a size (or scalar) uniformly from the random domain and
//! recurses per element.

use feat_ir::types::{Domain, DomainMode, DomainNode, NodeKind};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::value::Value;
use crate::GenerateError;

/// All exhaustive values for one node, deduplicated in generation order.
pub fn exhaustive_values(node: &DomainNode) -> Result<Vec<Value>, GenerateError> {
    let domain = node.exhaustive();
    if domain.is_empty() {
        return Err(GenerateError::violation(node, "empty exhaustive domain"));
    }

    let values: Vec<Value> = match node.kind() {
        NodeKind::Int => ints(node, domain)?.iter().map(|&i| Value::Int(i)).collect(),
        NodeKind::Float => floats(node, domain)?
            .iter()
            .map(|&x| Value::Float(x))
            .collect(),
        NodeKind::Bool => ints(node, domain)?
            .iter()
            .map(|&b| Value::Bool(b != 0))
            .collect(),
        NodeKind::Str { charset } => {
            let mut out = Vec::new();
            for len in sizes(node, domain)? {
                if len == 0 {
                    out.push(Value::Str(String::new()));
                    continue;
                }
                for start in 0..charset.len() {
                    let s: String = (0..len)
                        .map(|j| charset[(start + j) % charset.len()])
                        .collect();
                    out.push(Value::Str(s));
                }
            }
            out
        }
        NodeKind::List { elem } | NodeKind::Tuple { elem } | NodeKind::Set { elem } => {
            let elems = exhaustive_values(elem)?;
            sizes(node, domain)?
                .into_iter()
                .map(|size| {
                    let items = (0..size).map(|j| elems[j % elems.len()].clone()).collect();
                    wrap(node, items)
                })
                .collect()
        }
        NodeKind::Dict { key, value } => {
            let keys = exhaustive_values(key)?;
            let vals = exhaustive_values(value)?;
            sizes(node, domain)?
                .into_iter()
                .map(|size| {
                    Value::dict((0..size).map(|j| {
                        (keys[j % keys.len()].clone(), vals[j % vals.len()].clone())
                    }))
                })
                .collect()
        }
    };

    Ok(dedup_in_order(values))
}

/// One random value for a node, drawn from its random domain.
pub fn random_value<R: Rng + ?Sized>(node: &DomainNode, rng: &mut R) -> Result<Value, GenerateError> {
    let domain = node.random();
    let value = match node.kind() {
        NodeKind::Int => Value::Int(pick(node, ints(node, domain)?, &mut *rng)?),
        NodeKind::Float => Value::Float(pick(node, floats(node, domain)?, &mut *rng)?),
        NodeKind::Bool => Value::Bool(pick(node, ints(node, domain)?, &mut *rng)? != 0),
        NodeKind::Str { charset } => {
            let len = pick(node, &sizes(node, domain)?, &mut *rng)?;
            let mut s = String::with_capacity(len);
            for _ in 0..len {
                s.push(pick(node, charset, &mut *rng)?);
            }
            Value::Str(s)
        }
        NodeKind::List { elem } | NodeKind::Tuple { elem } | NodeKind::Set { elem } => {
            let size = pick(node, &sizes(node, domain)?, &mut *rng)?;
            let items = (0..size)
                .map(|_| random_value(elem, &mut *rng))
                .collect::<Result<Vec<_>, _>>()?;
            wrap(node, items)
        }
        NodeKind::Dict { key, value } => {
            let size = pick(node, &sizes(node, domain)?, &mut *rng)?;
            let mut pairs = Vec::with_capacity(size);
            for _ in 0..size {
                pairs.push((random_value(key, &mut *rng)?, random_value(value, &mut *rng)?));
            }
            Value::dict(pairs)
        }
    };
    Ok(value)
}

/// Values for a node in the given mode: the full exhaustive set, or a
/// single random draw.
pub fn values_for<R: Rng + ?Sized>(
    node: &DomainNode,
    mode: DomainMode,
    rng: &mut R,
) -> Result<Vec<Value>, GenerateError> {
    match mode {
        DomainMode::Exhaustive => exhaustive_values(node),
        DomainMode::Random => Ok(vec![random_value(node, rng)?]),
    }
}

fn wrap(node: &DomainNode, items: Vec<Value>) -> Value {
    match node.kind() {
        NodeKind::Tuple { .. } => Value::Tuple(items),
        NodeKind::Set { .. } => Value::set(items),
        _ => Value::List(items),
    }
}

fn pick<T: Copy, R: Rng + ?Sized>(node: &DomainNode, from: &[T], rng: &mut R) -> Result<T, GenerateError> {
    from.choose(rng)
        .copied()
        .ok_or_else(|| GenerateError::violation(node, "empty random domain"))
}

fn ints<'a>(node: &DomainNode, domain: &'a Domain) -> Result<&'a [i64], GenerateError> {
    domain
        .as_ints()
        .ok_or_else(|| GenerateError::violation(node, "expected an integer domain"))
}

fn floats<'a>(node: &DomainNode, domain: &'a Domain) -> Result<&'a [f64], GenerateError> {
    domain
        .as_floats()
        .ok_or_else(|| GenerateError::violation(node, "expected a float domain"))
}

fn sizes(node: &DomainNode, domain: &Domain) -> Result<Vec<usize>, GenerateError> {
    ints(node, domain)?
        .iter()
        .map(|&s| {
            usize::try_from(s)
                .map_err(|_| GenerateError::violation(node, format!("negative size {s}")))
        })
        .collect()
}

fn dedup_in_order(values: Vec<Value>) -> Vec<Value> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}
