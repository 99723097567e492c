// SPDX-License-Identifier: AGPL-3.0-or-later
//! Operations: insert, retain, delete

use crate::attributes::AttributeMap;
use crate::error::DeltaError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque embedded object such as an image or a video.
///
/// On the wire an embed is a single-key object, `{"image": "/a.png"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub kind: String,
    pub value: serde_json::Value,
}

impl Embed {
    pub fn new(kind: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Value as text when it is a string, JSON otherwise
    pub fn value_text(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl TryFrom<serde_json::Value> for Embed {
    type Error = DeltaError;

    fn try_from(value: serde_json::Value) -> Result<Self, DeltaError> {
        match value {
            serde_json::Value::Object(map) if map.len() == 1 => {
                let (kind, value) = map
                    .into_iter()
                    .next()
                    .ok_or_else(|| DeltaError::InvalidEmbed("empty object".into()))?;
                Ok(Embed { kind, value })
            }
            other => Err(DeltaError::InvalidEmbed(other.to_string())),
        }
    }
}

impl Serialize for Embed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.kind, &self.value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Embed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        if map.len() != 1 {
            return Err(D::Error::custom(format!(
                "embed must have exactly one key, found {}",
                map.len()
            )));
        }
        let (kind, value) = map
            .into_iter()
            .next()
            .ok_or_else(|| D::Error::custom("empty embed"))?;
        Ok(Embed { kind, value })
    }
}

/// Inserted content: a run of text or one embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Insert {
    Text(String),
    Embed(Embed),
}

impl Insert {
    /// Length in document positions (chars for text, 1 for an embed)
    pub fn len(&self) -> usize {
        match self {
            Insert::Text(s) => s.chars().count(),
            Insert::Embed(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Insert::Text(s) => Some(s),
            Insert::Embed(_) => None,
        }
    }
}

/// One operation of a delta
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Op {
    Insert {
        insert: Insert,
        #[serde(default, skip_serializing_if = "AttributeMap::is_empty")]
        attributes: AttributeMap,
    },
    Retain {
        retain: usize,
        #[serde(default, skip_serializing_if = "AttributeMap::is_empty")]
        attributes: AttributeMap,
    },
    Delete {
        delete: usize,
    },
}

/// Operation kind without payload, used for peeking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Insert,
    Retain,
    Delete,
}

impl Op {
    pub fn kind(&self) -> OpKind {
        match self {
            Op::Insert { .. } => OpKind::Insert,
            Op::Retain { .. } => OpKind::Retain,
            Op::Delete { .. } => OpKind::Delete,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Op::Insert { insert, .. } => insert.len(),
            Op::Retain { retain, .. } => *retain,
            Op::Delete { delete } => *delete,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn attributes(&self) -> Option<&AttributeMap> {
        match self {
            Op::Insert { attributes, .. } | Op::Retain { attributes, .. } => Some(attributes),
            Op::Delete { .. } => None,
        }
    }

    /// The part of this op covering `[offset, offset + len)`
    pub fn slice(&self, offset: usize, len: usize) -> Op {
        match self {
            Op::Insert {
                insert: Insert::Text(text),
                attributes,
            } => Op::Insert {
                insert: Insert::Text(text.chars().skip(offset).take(len).collect()),
                attributes: attributes.clone(),
            },
            Op::Insert { .. } => self.clone(),
            Op::Retain { attributes, .. } => Op::Retain {
                retain: len,
                attributes: attributes.clone(),
            },
            Op::Delete { .. } => Op::Delete { delete: len },
        }
    }
}
