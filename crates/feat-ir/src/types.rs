//! Recursive parameter model.
//!
//! One [`DomainNode`] describes one parameter of the function under test.
//! Scalars (`int`, `float`, `bool`) are leaves, `str` is a leaf carrying its
//! charset, and containers own their element node (`list`, `tuple`, `set`)
//! or their key and value nodes (`dict`). Every node carries two domains:
//! the exhaustive one drives full-coverage generation, the random one drives
//! sampling. For `str` and container nodes the domain values are lengths or
//! sizes rather than element values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of parameter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindTag {
    Int,
    Float,
    Bool,
    Str,
    List,
    Tuple,
    Set,
    Dict,
}

impl KindTag {
    /// Keyword used for this kind in a type spec.
    pub fn keyword(self) -> &'static str {
        match self {
            KindTag::Int => "int",
            KindTag::Float => "float",
            KindTag::Bool => "bool",
            KindTag::Str => "str",
            KindTag::List => "list",
            KindTag::Tuple => "tuple",
            KindTag::Set => "set",
            KindTag::Dict => "dict",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "int" => Some(KindTag::Int),
            "float" => Some(KindTag::Float),
            "bool" => Some(KindTag::Bool),
            "str" => Some(KindTag::Str),
            "list" => Some(KindTag::List),
            "tuple" => Some(KindTag::Tuple),
            "set" => Some(KindTag::Set),
            "dict" => Some(KindTag::Dict),
            _ => None,
        }
    }

    /// Number of child nodes a node of this kind owns.
    pub fn arity(self) -> usize {
        match self {
            KindTag::Int | KindTag::Float | KindTag::Bool | KindTag::Str => 0,
            KindTag::List | KindTag::Tuple | KindTag::Set => 1,
            KindTag::Dict => 2,
        }
    }

    /// Whether domain values of this kind are lengths/sizes (non-negative).
    pub fn is_sized(self) -> bool {
        !matches!(self, KindTag::Int | KindTag::Float | KindTag::Bool)
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Per-kind payload of a node. Containers own their children exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Int,
    Float,
    Bool,
    Str { charset: Vec<char> },
    List { elem: Box<DomainNode> },
    Tuple { elem: Box<DomainNode> },
    Set { elem: Box<DomainNode> },
    Dict { key: Box<DomainNode>, value: Box<DomainNode> },
}

/// An ordered sequence of domain points.
///
/// Float nodes hold `Float`; every other kind holds `Int` (for `bool` the
/// values are 0/1, for sized kinds they are lengths).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum Domain {
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl Domain {
    pub fn empty_for(tag: KindTag) -> Self {
        match tag {
            KindTag::Float => Domain::Float(Vec::new()),
            _ => Domain::Int(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Domain::Int(v) => v.len(),
            Domain::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            Domain::Int(v) => Some(v),
            Domain::Float(_) => None,
        }
    }

    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            Domain::Float(v) => Some(v),
            Domain::Int(_) => None,
        }
    }
}

/// Which of a node's two domains an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainMode {
    Exhaustive,
    Random,
}

impl fmt::Display for DomainMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainMode::Exhaustive => f.write_str("exhaustive"),
            DomainMode::Random => f.write_str("random"),
        }
    }
}

/// Errors raised while constructing or populating a node.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NodeError {
    #[error("str charset is empty")]
    EmptyCharset,

    #[error("{tag} takes {expected} child node(s), got {got}")]
    Arity {
        tag: KindTag,
        expected: usize,
        got: usize,
    },

    #[error("{mode} domain for {tag} is empty")]
    EmptyDomain { tag: KindTag, mode: DomainMode },

    #[error("{tag} domain must hold {expected} values")]
    DomainKind { tag: KindTag, expected: &'static str },

    #[error("bool domain value {0} is not 0 or 1")]
    BoolValue(i64),

    #[error("{tag} length/size {value} is negative")]
    NegativeSize { tag: KindTag, value: i64 },
}

/// One parameter (or nested element) type together with its two domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainNode {
    kind: NodeKind,
    exhaustive: Domain,
    random: Domain,
}

impl DomainNode {
    fn leaf(kind: NodeKind, tag: KindTag) -> Self {
        Self {
            kind,
            exhaustive: Domain::empty_for(tag),
            random: Domain::empty_for(tag),
        }
    }

    pub fn int() -> Self {
        Self::leaf(NodeKind::Int, KindTag::Int)
    }

    pub fn float() -> Self {
        Self::leaf(NodeKind::Float, KindTag::Float)
    }

    pub fn bool() -> Self {
        Self::leaf(NodeKind::Bool, KindTag::Bool)
    }

    /// A `str` node over the given characters. Duplicates are dropped,
    /// first-seen order is kept.
    pub fn str(chars: impl IntoIterator<Item = char>) -> Result<Self, NodeError> {
        let mut charset = Vec::new();
        for c in chars {
            if !charset.contains(&c) {
                charset.push(c);
            }
        }
        if charset.is_empty() {
            return Err(NodeError::EmptyCharset);
        }
        Ok(Self::leaf(NodeKind::Str { charset }, KindTag::Str))
    }

    pub fn list(elem: DomainNode) -> Self {
        Self::leaf(NodeKind::List { elem: Box::new(elem) }, KindTag::List)
    }

    pub fn tuple(elem: DomainNode) -> Self {
        Self::leaf(NodeKind::Tuple { elem: Box::new(elem) }, KindTag::Tuple)
    }

    pub fn set(elem: DomainNode) -> Self {
        Self::leaf(NodeKind::Set { elem: Box::new(elem) }, KindTag::Set)
    }

    pub fn dict(key: DomainNode, value: DomainNode) -> Self {
        Self::leaf(
            NodeKind::Dict {
                key: Box::new(key),
                value: Box::new(value),
            },
            KindTag::Dict,
        )
    }

    /// Build a container node from a keyword tag and its children, checking
    /// that the number of children matches the tag.
    pub fn container(tag: KindTag, children: Vec<DomainNode>) -> Result<Self, NodeError> {
        let expected = tag.arity();
        if expected == 0 || children.len() != expected {
            return Err(NodeError::Arity {
                tag,
                expected,
                got: children.len(),
            });
        }
        let mut it = children.into_iter();
        let (first, second) = (it.next(), it.next());
        match (tag, first, second) {
            (KindTag::List, Some(elem), None) => Ok(Self::list(elem)),
            (KindTag::Tuple, Some(elem), None) => Ok(Self::tuple(elem)),
            (KindTag::Set, Some(elem), None) => Ok(Self::set(elem)),
            (KindTag::Dict, Some(key), Some(value)) => Ok(Self::dict(key, value)),
            _ => Err(NodeError::Arity {
                tag,
                expected,
                got: 0,
            }),
        }
    }

    /// Set both domains at once, validating them against this node's kind.
    pub fn with_domains(mut self, exhaustive: Domain, random: Domain) -> Result<Self, NodeError> {
        self.set_domain(DomainMode::Exhaustive, exhaustive)?;
        self.set_domain(DomainMode::Random, random)?;
        Ok(self)
    }

    /// Replace one of this node's domains after validating it.
    pub fn set_domain(&mut self, mode: DomainMode, domain: Domain) -> Result<(), NodeError> {
        let tag = self.tag();
        if domain.is_empty() {
            return Err(NodeError::EmptyDomain { tag, mode });
        }
        match (&domain, tag) {
            (Domain::Float(_), KindTag::Float) => {}
            (Domain::Float(_), _) => {
                return Err(NodeError::DomainKind {
                    tag,
                    expected: "integer",
                })
            }
            (Domain::Int(_), KindTag::Float) => {
                return Err(NodeError::DomainKind {
                    tag,
                    expected: "float",
                })
            }
            (Domain::Int(values), KindTag::Bool) => {
                if let Some(&bad) = values.iter().find(|v| !(0..=1).contains(*v)) {
                    return Err(NodeError::BoolValue(bad));
                }
            }
            (Domain::Int(values), tag) if tag.is_sized() => {
                if let Some(&bad) = values.iter().find(|v| **v < 0) {
                    return Err(NodeError::NegativeSize { tag, value: bad });
                }
            }
            (Domain::Int(_), _) => {}
        }
        match mode {
            DomainMode::Exhaustive => self.exhaustive = domain,
            DomainMode::Random => self.random = domain,
        }
        Ok(())
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn tag(&self) -> KindTag {
        match &self.kind {
            NodeKind::Int => KindTag::Int,
            NodeKind::Float => KindTag::Float,
            NodeKind::Bool => KindTag::Bool,
            NodeKind::Str { .. } => KindTag::Str,
            NodeKind::List { .. } => KindTag::List,
            NodeKind::Tuple { .. } => KindTag::Tuple,
            NodeKind::Set { .. } => KindTag::Set,
            NodeKind::Dict { .. } => KindTag::Dict,
        }
    }

    pub fn exhaustive(&self) -> &Domain {
        &self.exhaustive
    }

    pub fn random(&self) -> &Domain {
        &self.random
    }

    pub fn domain(&self, mode: DomainMode) -> &Domain {
        match mode {
            DomainMode::Exhaustive => &self.exhaustive,
            DomainMode::Random => &self.random,
        }
    }

    /// Charset of a `str` node, `None` for every other kind.
    pub fn charset(&self) -> Option<&[char]> {
        match &self.kind {
            NodeKind::Str { charset } => Some(charset),
            _ => None,
        }
    }

    /// Child nodes in declaration order (element, or key then value).
    pub fn children(&self) -> Vec<&DomainNode> {
        match &self.kind {
            NodeKind::List { elem } | NodeKind::Tuple { elem } | NodeKind::Set { elem } => {
                vec![elem.as_ref()]
            }
            NodeKind::Dict { key, value } => vec![key.as_ref(), value.as_ref()],
            _ => Vec::new(),
        }
    }

    pub fn children_mut(&mut self) -> Vec<&mut DomainNode> {
        match &mut self.kind {
            NodeKind::List { elem } | NodeKind::Tuple { elem } | NodeKind::Set { elem } => {
                vec![elem.as_mut()]
            }
            NodeKind::Dict { key, value } => vec![key.as_mut(), value.as_mut()],
            _ => Vec::new(),
        }
    }

    /// True when this node and every descendant has both domains filled.
    pub fn is_populated(&self) -> bool {
        !self.exhaustive.is_empty()
            && !self.random.is_empty()
            && self.children().iter().all(|c| c.is_populated())
    }

    /// Nesting depth: 1 for leaves.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|c| c.depth())
            .max()
            .unwrap_or(0)
    }
}

/// Renders the node's shape back into type-spec syntax.
impl fmt::Display for DomainNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Int | NodeKind::Float | NodeKind::Bool => f.write_str(self.tag().keyword()),
            NodeKind::Str { charset } => {
                f.write_str("str(")?;
                for c in charset {
                    write!(f, "{c}")?;
                }
                f.write_str(")")
            }
            NodeKind::List { elem } | NodeKind::Tuple { elem } | NodeKind::Set { elem } => {
                write!(f, "{}({elem})", self.tag())
            }
            NodeKind::Dict { key, value } => write!(f, "dict({key}:{value})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_charset_rejected() {
        assert_eq!(DomainNode::str("".chars()), Err(NodeError::EmptyCharset));
    }

    #[test]
    fn test_charset_dedup_keeps_order() {
        let node = DomainNode::str("abca".chars()).unwrap();
        assert_eq!(node.charset(), Some(&['a', 'b', 'c'][..]));
    }

    #[test]
    fn test_container_arity_checked() {
        let err = DomainNode::container(KindTag::Dict, vec![DomainNode::int()]).unwrap_err();
        assert_eq!(
            err,
            NodeError::Arity {
                tag: KindTag::Dict,
                expected: 2,
                got: 1
            }
        );
        assert!(DomainNode::container(KindTag::Int, vec![]).is_err());
        assert!(DomainNode::container(KindTag::List, vec![DomainNode::int()]).is_ok());
    }

    #[test]
    fn test_bool_domain_rejects_two() {
        let result = DomainNode::bool().with_domains(Domain::Int(vec![0, 2]), Domain::Int(vec![1]));
        assert_eq!(result.unwrap_err(), NodeError::BoolValue(2));
    }

    #[test]
    fn test_sized_domain_rejects_negative() {
        let node = DomainNode::list(DomainNode::int());
        let err = node
            .with_domains(Domain::Int(vec![-1]), Domain::Int(vec![1]))
            .unwrap_err();
        assert!(matches!(err, NodeError::NegativeSize { value: -1, .. }));
    }

    #[test]
    fn test_float_node_requires_float_domain() {
        let err = DomainNode::float()
            .with_domains(Domain::Int(vec![1]), Domain::Int(vec![1]))
            .unwrap_err();
        assert!(matches!(err, NodeError::DomainKind { .. }));
    }

    #[test]
    fn test_empty_domain_rejected() {
        let err = DomainNode::int()
            .with_domains(Domain::Int(vec![]), Domain::Int(vec![1]))
            .unwrap_err();
        assert_eq!(
            err,
            NodeError::EmptyDomain {
                tag: KindTag::Int,
                mode: DomainMode::Exhaustive
            }
        );
    }

    #[test]
    fn test_display_nested_shape() {
        let node = DomainNode::dict(
            DomainNode::str("ab".chars()).unwrap(),
            DomainNode::list(DomainNode::set(DomainNode::int())),
        );
        assert_eq!(node.to_string(), "dict(str(ab):list(set(int)))");
        assert_eq!(node.depth(), 4);
    }

    #[test]
    fn test_is_populated_checks_children() {
        let elem = DomainNode::int();
        let list = DomainNode::list(elem)
            .with_domains(Domain::Int(vec![1]), Domain::Int(vec![1]))
            .unwrap();
        assert!(!list.is_populated());
    }
}
