//! Type-spec and domain-spec parsing.
//!
//! Type specs:
//!
//! ```text
//! type      := simple | "str(" charset ")" | container "(" type ")" | "dict(" type ":" type ")"
//! simple    := "int" | "float" | "bool"
//! container := "list" | "tuple" | "set"
//! ```
//!
//! Domain specs are parsed against an already-built node and mirror its
//! nesting: `own "(" child ")"` for list/tuple/set, `own "(" key ":" value ")"`
//! for dict, and a bare `lo~hi` range or `[a, b, ...]` array everywhere else.

use tracing::debug;

use crate::cursor::{split_top_level, Cursor, Unbalanced};
use crate::types::{Domain, DomainMode, DomainNode, KindTag};

/// Largest number of points a single `lo~hi` range may expand to.
pub const MAX_RANGE_POINTS: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid spec '{fragment}': {reason}")]
    InvalidSpec { fragment: String, reason: String },
}

impl ParseError {
    pub fn invalid(fragment: &str, reason: impl Into<String>) -> Self {
        ParseError::InvalidSpec {
            fragment: fragment.to_string(),
            reason: reason.into(),
        }
    }

    pub fn fragment(&self) -> &str {
        match self {
            ParseError::InvalidSpec { fragment, .. } => fragment,
        }
    }
}

fn unbalanced(fragment: &str, err: Unbalanced) -> ParseError {
    ParseError::invalid(fragment, format!("unbalanced parenthesis at offset {}", err.at))
}

// ── Type specs ───────────────────────────────────────────────────────

/// Parse one type spec per parameter.
pub fn parse_types<S: AsRef<str>>(specs: &[S]) -> Result<Vec<DomainNode>, ParseError> {
    let nodes = specs
        .iter()
        .map(|s| parse_type(s.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(params = nodes.len(), "parsed type specs");
    Ok(nodes)
}

/// Parse a single (possibly nested) type spec.
pub fn parse_type(spec: &str) -> Result<DomainNode, ParseError> {
    let spec = spec.trim();
    let mut cur = Cursor::new(spec);
    let head = cur.take_head().trim();

    if cur.is_eof() {
        return parse_simple(head);
    }
    if cur.peek() == Some(')') {
        return Err(ParseError::invalid(spec, "unexpected ')'"));
    }

    let inner = cur.take_group().map_err(|e| unbalanced(spec, e))?;
    cur.skip_ws();
    if !cur.is_eof() {
        return Err(ParseError::invalid(
            spec,
            format!("trailing text '{}'", cur.rest()),
        ));
    }

    let tag = KindTag::from_keyword(head)
        .ok_or_else(|| ParseError::invalid(spec, format!("unknown type '{head}'")))?;

    match tag {
        KindTag::Str => DomainNode::str(inner.trim().chars())
            .map_err(|e| ParseError::invalid(spec, e.to_string())),
        KindTag::Dict => {
            let (key, value) = split_top_level(inner, ':')
                .map_err(|e| unbalanced(spec, e))?
                .ok_or_else(|| ParseError::invalid(spec, "dict type needs 'key:value'"))?;
            let children = vec![parse_nested(key, spec)?, parse_nested(value, spec)?];
            DomainNode::container(tag, children).map_err(|e| ParseError::invalid(spec, e.to_string()))
        }
        KindTag::List | KindTag::Tuple | KindTag::Set => {
            let child = parse_nested(inner, spec)?;
            DomainNode::container(tag, vec![child])
                .map_err(|e| ParseError::invalid(spec, e.to_string()))
        }
        KindTag::Int | KindTag::Float | KindTag::Bool => Err(ParseError::invalid(
            spec,
            format!("'{head}' does not take a parameter"),
        )),
    }
}

fn parse_nested(inner: &str, outer: &str) -> Result<DomainNode, ParseError> {
    if inner.trim().is_empty() {
        return Err(ParseError::invalid(outer, "missing nested type"));
    }
    parse_type(inner)
}

fn parse_simple(word: &str) -> Result<DomainNode, ParseError> {
    match KindTag::from_keyword(word) {
        Some(KindTag::Int) => Ok(DomainNode::int()),
        Some(KindTag::Float) => Ok(DomainNode::float()),
        Some(KindTag::Bool) => Ok(DomainNode::bool()),
        Some(tag) => Err(ParseError::invalid(
            word,
            format!("'{tag}' needs a parenthesized parameter"),
        )),
        None if word.is_empty() => Err(ParseError::invalid(word, "empty type")),
        None => Err(ParseError::invalid(word, format!("unknown type '{word}'"))),
    }
}

// ── Domain specs ─────────────────────────────────────────────────────

/// Populate both domains of every node, one exhaustive and one random spec
/// per parameter.
pub fn parse_domains<S: AsRef<str>>(
    exhaustive: &[S],
    random: &[S],
    nodes: &mut [DomainNode],
) -> Result<(), ParseError> {
    if exhaustive.len() != nodes.len() || random.len() != nodes.len() {
        return Err(ParseError::invalid(
            "",
            format!(
                "{} types, {} exhaustive domains, {} random domains",
                nodes.len(),
                exhaustive.len(),
                random.len()
            ),
        ));
    }
    for ((node, ex), rn) in nodes.iter_mut().zip(exhaustive).zip(random) {
        parse_domain(ex.as_ref(), node, DomainMode::Exhaustive)?;
        parse_domain(rn.as_ref(), node, DomainMode::Random)?;
    }
    Ok(())
}

/// Parse one domain spec into `node` (and its descendants), in lock-step with
/// the node's structure.
pub fn parse_domain(spec: &str, node: &mut DomainNode, mode: DomainMode) -> Result<(), ParseError> {
    let spec = spec.trim();
    let tag = node.tag();
    let mut cur = Cursor::new(spec);
    let own = cur.take_head();

    let nested = if tag.arity() == 0 {
        match cur.peek() {
            None => None,
            Some(_) => {
                return Err(ParseError::invalid(
                    spec,
                    format!("{tag} domain has no nested level"),
                ))
            }
        }
    } else {
        match cur.peek() {
            Some('(') => {}
            Some(_) => return Err(ParseError::invalid(spec, "unexpected ')'")),
            None => {
                return Err(ParseError::invalid(
                    spec,
                    format!("{tag} domain is missing its nested level"),
                ))
            }
        }
        let inner = cur.take_group().map_err(|e| unbalanced(spec, e))?;
        cur.skip_ws();
        if !cur.is_eof() {
            return Err(ParseError::invalid(
                spec,
                format!("trailing text '{}'", cur.rest()),
            ));
        }
        if inner.trim().is_empty() {
            return Err(ParseError::invalid(spec, "empty nested domain"));
        }
        Some(inner)
    };

    let domain = parse_level(own, tag)?;
    node.set_domain(mode, domain)
        .map_err(|e| ParseError::invalid(own.trim(), e.to_string()))?;

    let Some(inner) = nested else {
        return Ok(());
    };
    let split = split_top_level(inner, ':').map_err(|e| unbalanced(spec, e))?;
    let mut children = node.children_mut();
    match (children.as_mut_slice(), split) {
        ([key, value], Some((k, v))) => {
            if k.trim().is_empty() || v.trim().is_empty() {
                return Err(ParseError::invalid(spec, "dict domain needs 'key:value'"));
            }
            parse_domain(k, key, mode)?;
            parse_domain(v, value, mode)
        }
        ([_, _], None) => Err(ParseError::invalid(spec, "dict domain needs 'key:value'")),
        ([elem], None) => parse_domain(inner, elem, mode),
        ([_], Some(_)) => Err(ParseError::invalid(
            spec,
            format!("unexpected ':' in {tag} domain"),
        )),
        _ => Err(ParseError::invalid(spec, "domain nesting does not match type")),
    }
}

/// Parse the node's own level: a range or an explicit array.
fn parse_level(own: &str, tag: KindTag) -> Result<Domain, ParseError> {
    let own = own.trim();
    if own.is_empty() {
        return Err(ParseError::invalid(own, format!("missing {tag} domain")));
    }
    if own.starts_with('[') || own.ends_with(']') {
        return parse_array(own, tag);
    }
    if let Some((lo, hi)) = own.split_once('~') {
        return parse_range(own, lo, hi, tag);
    }
    Err(ParseError::invalid(
        own,
        "expected a range 'lo~hi' or an array '[a, b, ...]'",
    ))
}

fn parse_array(own: &str, tag: KindTag) -> Result<Domain, ParseError> {
    let mut cur = Cursor::new(own);
    if !cur.eat('[') {
        return Err(ParseError::invalid(own, "unmatched ']'"));
    }
    let body = cur.take_while(|c| c != ']');
    if !cur.eat(']') {
        return Err(ParseError::invalid(own, "unmatched '['"));
    }
    cur.skip_ws();
    if !cur.is_eof() {
        return Err(ParseError::invalid(own, format!("trailing text '{}'", cur.rest())));
    }
    if body.trim().is_empty() {
        return Err(ParseError::invalid(own, "empty array"));
    }

    let tokens = body.split(',').map(str::trim);
    match tag {
        KindTag::Float => {
            let mut values = Vec::new();
            for token in tokens {
                let v = parse_float(token)?;
                if !values.contains(&v) {
                    values.push(v);
                }
            }
            Ok(Domain::Float(values))
        }
        _ => {
            let mut values = Vec::new();
            for token in tokens {
                let v = parse_int(token, tag)?;
                if !values.contains(&v) {
                    values.push(v);
                }
            }
            Ok(Domain::Int(values))
        }
    }
}

fn parse_range(own: &str, lo: &str, hi: &str, tag: KindTag) -> Result<Domain, ParseError> {
    match tag {
        KindTag::Float => {
            let (lo, hi) = (parse_float(lo.trim())?, parse_float(hi.trim())?);
            if lo >= hi {
                return Err(ParseError::invalid(own, "float range needs lo < hi"));
            }
            // Integer-stepped sampling points, floored.
            let (first, last) = (lo.floor(), hi.floor());
            check_range_size(own, last - first)?;
            let mut values = Vec::new();
            let mut x = first;
            while x <= last {
                values.push(x);
                x += 1.0;
            }
            Ok(Domain::Float(values))
        }
        _ => {
            let (lo, hi) = (parse_int(lo.trim(), tag)?, parse_int(hi.trim(), tag)?);
            if lo > hi {
                return Err(ParseError::invalid(own, "range needs lo <= hi"));
            }
            check_range_size(own, hi as f64 - lo as f64)?;
            Ok(Domain::Int((lo..=hi).collect()))
        }
    }
}

fn check_range_size(own: &str, span: f64) -> Result<(), ParseError> {
    if span + 1.0 > MAX_RANGE_POINTS as f64 {
        return Err(ParseError::invalid(
            own,
            format!("range expands to more than {MAX_RANGE_POINTS} values"),
        ));
    }
    Ok(())
}

fn parse_int(token: &str, tag: KindTag) -> Result<i64, ParseError> {
    let value: i64 = token
        .parse()
        .map_err(|_| ParseError::invalid(token, format!("not an integer for {tag}")))?;
    match tag {
        KindTag::Bool if !(0..=1).contains(&value) => {
            Err(ParseError::invalid(token, "bool domain values must be 0 or 1"))
        }
        t if t.is_sized() && value < 0 => Err(ParseError::invalid(
            token,
            format!("{t} length/size must be non-negative"),
        )),
        t if t.is_sized() && value as u64 > MAX_RANGE_POINTS => Err(ParseError::invalid(
            token,
            format!("{t} length/size exceeds {MAX_RANGE_POINTS}"),
        )),
        _ => Ok(value),
    }
}

fn parse_float(token: &str) -> Result<f64, ParseError> {
    let value: f64 = token
        .parse()
        .map_err(|_| ParseError::invalid(token, "not a decimal number"))?;
    if !value.is_finite() {
        return Err(ParseError::invalid(token, "float domain values must be finite"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;

    fn node_with(ty: &str, ex: &str, rn: &str) -> Result<DomainNode, ParseError> {
        let mut nodes = parse_types(&[ty])?;
        parse_domains(&[ex], &[rn], &mut nodes)?;
        Ok(nodes.remove(0))
    }

    #[test]
    fn test_parse_simple_types() {
        assert_eq!(parse_type(" int ").unwrap().tag(), KindTag::Int);
        assert_eq!(parse_type("float").unwrap().tag(), KindTag::Float);
        assert_eq!(parse_type("bool").unwrap().tag(), KindTag::Bool);
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(parse_type("integer").is_err());
        assert!(parse_type("array(int)").is_err());
        assert!(parse_type("").is_err());
    }

    #[test]
    fn test_parse_str_trims_charset() {
        let node = parse_type("str( abc )").unwrap();
        assert_eq!(node.charset(), Some(&['a', 'b', 'c'][..]));
        assert!(parse_type("str(   )").is_err());
    }

    #[test]
    fn test_parse_dict_with_dict_key() {
        let node = parse_type("dict(dict(int:bool):list(int))").unwrap();
        match node.kind() {
            NodeKind::Dict { key, value } => {
                assert_eq!(key.tag(), KindTag::Dict);
                assert_eq!(value.tag(), KindTag::List);
            }
            other => panic!("expected dict, got {other:?}"),
        }
    }

    #[test]
    fn test_scalar_with_parameter_rejected() {
        assert!(parse_type("int(3)").is_err());
        assert!(parse_type("list").is_err());
        assert!(parse_type("list()").is_err());
    }

    #[test]
    fn test_trailing_text_rejected() {
        assert!(parse_type("list(int)x").is_err());
        assert!(parse_type("list(int))").is_err());
    }

    #[test]
    fn test_float_range_is_floored_integer_steps() {
        let node = node_with("float", "0.5~3.2", "[1.5]").unwrap();
        assert_eq!(node.exhaustive(), &Domain::Float(vec![0.0, 1.0, 2.0, 3.0]));
        assert_eq!(node.random(), &Domain::Float(vec![1.5]));
    }

    #[test]
    fn test_float_range_requires_strict_order() {
        assert!(node_with("float", "1~1", "[1]").is_err());
        assert!(node_with("float", "nan~2", "[1]").is_err());
    }

    #[test]
    fn test_int_range_single_point() {
        let node = node_with("int", "4~4", "[4]").unwrap();
        assert_eq!(node.exhaustive(), &Domain::Int(vec![4]));
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(node_with("int", "5~1", "[1]").is_err());
    }

    #[test]
    fn test_range_too_large_rejected() {
        assert!(node_with("int", "0~10000000", "[1]").is_err());
    }

    #[test]
    fn test_array_errors() {
        assert!(node_with("int", "[]", "[1]").is_err());
        assert!(node_with("int", "[1,,2]", "[1]").is_err());
        assert!(node_with("int", "[1,2", "[1]").is_err());
        assert!(node_with("int", "1,2]", "[1]").is_err());
        assert!(node_with("int", "[1] 2", "[1]").is_err());
        assert!(node_with("int", "7", "[1]").is_err());
    }

    #[test]
    fn test_str_domain_is_lengths() {
        let node = node_with("str(ab)", "0~2", "[3]").unwrap();
        assert_eq!(node.exhaustive(), &Domain::Int(vec![0, 1, 2]));
        assert!(node_with("str(ab)", "[-1]", "[1]").is_err());
        assert!(node_with("str(ab)", "1(2)", "[1]").is_err());
    }

    #[test]
    fn test_huge_length_array_rejected() {
        let err = node_with("str(ab)", "[0]", "[4611686018427387904]").unwrap_err();
        assert_eq!(err.fragment(), "4611686018427387904");
        assert!(node_with("list(int)", "[1000001]([1])", "[1]([1])").is_err());
        assert!(node_with("dict(int:int)", "[1]([1]:[1])", "[2000000]([1]:[1])").is_err());
        assert!(node_with("set(int)", "[1000000]([1])", "[1]([1])").is_ok());
        // Element values of an int node are not sizes.
        assert!(node_with("int", "[4611686018427387904]", "[1]").is_ok());
    }

    #[test]
    fn test_float_token_in_int_domain_rejected() {
        assert!(node_with("int", "[1.5]", "[1]").is_err());
    }

    #[test]
    fn test_nested_list_domain() {
        let node = node_with("list(set(int))", "[0,2](1~2(3~4))", "[1]([1](0~9))").unwrap();
        assert_eq!(node.exhaustive(), &Domain::Int(vec![0, 2]));
        let set = node.children()[0];
        assert_eq!(set.exhaustive(), &Domain::Int(vec![1, 2]));
        let int = set.children()[0];
        assert_eq!(int.exhaustive(), &Domain::Int(vec![3, 4]));
        assert_eq!(int.random(), &Domain::Int((0..=9).collect()));
        assert!(node.is_populated());
    }

    #[test]
    fn test_dict_domain_splits_key_value() {
        let node = node_with(
            "dict(str(xy):dict(int:bool))",
            "1~2([1]:[1](0~1:[0,1]))",
            "[1]([2]:[1]([5]:[1]))",
        )
        .unwrap();
        let children = node.children();
        assert_eq!(children[0].exhaustive(), &Domain::Int(vec![1]));
        assert_eq!(children[1].exhaustive(), &Domain::Int(vec![1]));
        let inner = children[1].children();
        assert_eq!(inner[0].exhaustive(), &Domain::Int(vec![0, 1]));
        assert_eq!(inner[1].random(), &Domain::Int(vec![1]));
    }

    #[test]
    fn test_structural_mismatch_rejected() {
        // Missing level.
        assert!(node_with("list(int)", "1~2", "[1]([1])").is_err());
        // Extra level.
        assert!(node_with("list(int)", "[1]([1]([2]))", "[1]([1])").is_err());
        // Dict without separator.
        assert!(node_with("dict(int:int)", "[1]([1])", "[1]([1]:[1])").is_err());
        // Separator on a non-dict container.
        assert!(node_with("list(int)", "[1]([1]:[2])", "[1]([1])").is_err());
        // Empty side of dict.
        assert!(node_with("dict(int:int)", "[1](:[2])", "[1]([1]:[1])").is_err());
        // The same specs with matching structure parse.
        assert!(node_with("list(int)", "[1]([2])", "[1]([1])").is_ok());
        assert!(node_with("dict(int:int)", "[1]([1]:[2])", "[1]([1]:[1])").is_ok());
    }

    #[test]
    fn test_domain_count_mismatch() {
        let mut nodes = parse_types(&["int", "int"]).unwrap();
        let result = parse_domains(&["[1]"], &["[1]", "[2]"], &mut nodes);
        assert!(result.is_err());
    }

    #[test]
    fn test_error_names_fragment() {
        let err = node_with("bool", "[0,3]", "[1]").unwrap_err();
        assert_eq!(err.fragment(), "3");
    }
}
