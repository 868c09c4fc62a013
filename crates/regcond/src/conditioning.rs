//! Conditioning payloads.
//!
//! A [`ConditioningEntry`] pairs an opaque embedding with an attribute map.
//! Embeddings are held behind `Arc` so that every copy of an entry shares the
//! same embedding. Attribute maps are copy-on-write: cloning is O(1), and an
//! update on a shared map copies it first, leaving every other holder intact.

use std::collections::BTreeMap;
use std::sync::Arc;

use regcond_mask::Mask;

/// Attribute key holding the region mask.
pub const MASK_KEY: &str = "mask";
/// Attribute key telling the consumer whether to crop guidance to the mask bounds.
pub const SET_AREA_TO_BOUNDS_KEY: &str = "set_area_to_bounds";

/// A value stored in an entry's attribute map.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Mask(Arc<Mask>),
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Anything else, kept verbatim.
    Json(serde_json::Value),
}

impl AttributeValue {
    /// Convert a JSON value, keeping scalars as their typed variants.
    pub fn from_json(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Bool(b) => Self::Bool(b),
            Value::String(s) => Self::Text(s),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Self::Int(i),
                (None, Some(f)) => Self::Float(f),
                (None, None) => Self::Json(Value::Number(n)),
            },
            other => Self::Json(other),
        }
    }

    pub fn as_mask(&self) -> Option<&Arc<Mask>> {
        match self {
            Self::Mask(mask) => Some(mask),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<Mask> for AttributeValue {
    fn from(mask: Mask) -> Self {
        Self::Mask(Arc::new(mask))
    }
}

impl From<Arc<Mask>> for AttributeValue {
    fn from(mask: Arc<Mask>) -> Self {
        Self::Mask(mask)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        Self::from_json(value)
    }
}

/// Key-ordered attribute map with copy-on-write updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Arc<BTreeMap<String, AttributeValue>>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert a value, copying the map first if it is shared.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        Arc::make_mut(&mut self.0).insert(key.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Whether two maps share one allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(Arc::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }
}

/// One unit of guidance signal: an opaque embedding plus its attributes.
#[derive(Debug)]
pub struct ConditioningEntry<E> {
    embedding: Arc<E>,
    attributes: Attributes,
}

// Manual impl: cloning shares the embedding, so `E: Clone` is not required.
impl<E> Clone for ConditioningEntry<E> {
    fn clone(&self) -> Self {
        Self {
            embedding: Arc::clone(&self.embedding),
            attributes: self.attributes.clone(),
        }
    }
}

impl<E: PartialEq> PartialEq for ConditioningEntry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.embedding == other.embedding && self.attributes == other.attributes
    }
}

impl<E> ConditioningEntry<E> {
    /// Wrap an embedding with an empty attribute map.
    pub fn new(embedding: E) -> Self {
        Self::with_attributes(embedding, Attributes::new())
    }

    pub fn with_attributes(embedding: E, attributes: Attributes) -> Self {
        Self::from_shared(Arc::new(embedding), attributes)
    }

    /// Build an entry around an embedding that is already shared.
    pub fn from_shared(embedding: Arc<E>, attributes: Attributes) -> Self {
        Self {
            embedding,
            attributes,
        }
    }

    pub fn embedding(&self) -> &E {
        &self.embedding
    }

    pub fn shared_embedding(&self) -> &Arc<E> {
        &self.embedding
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// The attached region mask, if any.
    pub fn mask(&self) -> Option<&Arc<Mask>> {
        self.attributes.get(MASK_KEY).and_then(AttributeValue::as_mask)
    }

    /// The `set_area_to_bounds` flag, if present.
    pub fn set_area_to_bounds(&self) -> Option<bool> {
        self.attributes
            .get(SET_AREA_TO_BOUNDS_KEY)
            .and_then(AttributeValue::as_bool)
    }

    /// A new entry sharing this embedding, with `mask` attached and
    /// `set_area_to_bounds` cleared. `self` is left untouched.
    #[must_use]
    pub fn masked(&self, mask: Arc<Mask>) -> Self {
        let attributes = self
            .attributes
            .clone()
            .with(MASK_KEY, mask)
            .with(SET_AREA_TO_BOUNDS_KEY, false);
        Self::from_shared(Arc::clone(&self.embedding), attributes)
    }
}

/// An ordered, cheaply shareable sequence of conditioning entries.
#[derive(Debug)]
pub struct ConditioningSet<E>(Arc<[ConditioningEntry<E>]>);

impl<E> Clone for ConditioningSet<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E: PartialEq> PartialEq for ConditioningSet<E> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<E> Default for ConditioningSet<E> {
    fn default() -> Self {
        Self(Arc::from(Vec::new()))
    }
}

impl<E> ConditioningSet<E> {
    pub fn new(entries: Vec<ConditioningEntry<E>>) -> Self {
        Self(Arc::from(entries))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[ConditioningEntry<E>] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConditioningEntry<E>> {
        self.0.iter()
    }

    /// Whether two sets share one allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<E> From<Vec<ConditioningEntry<E>>> for ConditioningSet<E> {
    fn from(entries: Vec<ConditioningEntry<E>>) -> Self {
        Self::new(entries)
    }
}

impl<E> FromIterator<ConditioningEntry<E>> for ConditioningSet<E> {
    fn from_iter<I: IntoIterator<Item = ConditioningEntry<E>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, E> IntoIterator for &'a ConditioningSet<E> {
    type Item = &'a ConditioningEntry<E>;
    type IntoIter = std::slice::Iter<'a, ConditioningEntry<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
