// SPDX-License-Identifier: AGPL-3.0-or-later
//! Attribute maps carried by insert and retain operations

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single formatting value.
///
/// `Null` is the removal marker used by changes. Formatting code also treats
/// `Bool(false)` as "not set".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl AttrValue {
    /// True for the values that mean "remove this attribute"
    pub fn is_unset(&self) -> bool {
        matches!(self, AttrValue::Null | AttrValue::Bool(false))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Number(n) => n.as_i64(),
            AttrValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Null => f.write_str("null"),
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Number(n) => write!(f, "{n}"),
            AttrValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Number(value.into())
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Number(i64::from(value).into())
    }
}

/// Attribute name to value, kept sorted by name.
///
/// An absent key means "not set". Two maps are equal when they hold the same
/// keys with the same values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap(BTreeMap<String, AttrValue>);

impl AttributeMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert, handy for literals
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Option<AttrValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &AttrValue) -> bool) {
        self.0.retain(|k, v| keep(k, v));
    }

    /// Copy with every unset value dropped
    pub fn without_unset(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(_, v)| !v.is_unset())
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Layer `other` on top of `base`.
    ///
    /// Keys of `other` win. `Null` values in `other` are dropped from the
    /// result unless `keep_null` is set, which is the case when composing two
    /// retains so that the removal still reaches the document.
    pub fn compose(base: &AttributeMap, other: &AttributeMap, keep_null: bool) -> AttributeMap {
        let mut out: BTreeMap<String, AttrValue> = other
            .0
            .iter()
            .filter(|(_, v)| keep_null || **v != AttrValue::Null)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (k, v) in &base.0 {
            if !other.0.contains_key(k) {
                out.insert(k.clone(), v.clone());
            }
        }
        AttributeMap(out)
    }

    /// The map that turns `from` into `to` when composed onto it.
    ///
    /// Keys missing from `to` come back as `Null`.
    pub fn diff(from: &AttributeMap, to: &AttributeMap) -> AttributeMap {
        let mut out = BTreeMap::new();
        for k in from.0.keys().chain(to.0.keys()) {
            let (a, b) = (from.0.get(k), to.0.get(k));
            if a != b {
                out.insert(k.clone(), b.cloned().unwrap_or(AttrValue::Null));
            }
        }
        AttributeMap(out)
    }
}

impl FromIterator<(String, AttrValue)> for AttributeMap {
    fn from_iter<T: IntoIterator<Item = (String, AttrValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a AttributeMap {
    type Item = (&'a String, &'a AttrValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, AttrValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
