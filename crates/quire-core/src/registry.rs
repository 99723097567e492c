// SPDX-License-Identifier: AGPL-3.0-or-later
//! Format registry: which capability class each format or embed name has

use crate::error::RegistryError;
use quire_delta::{AttrValue, AttributeMap};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// How a name behaves in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Formats leaves (bold, link, color, ...)
    Inline,
    /// Exclusive line container kind (header, list, ...)
    Line,
    /// Line-level attribute that also applies to block embeds (align, indent)
    LineAttribute,
    /// Attribute of embeds only (width, alt)
    EmbedAttribute,
    /// Embed that lives inside a line
    InlineEmbed,
    /// Embed that occupies its own block
    BlockEmbed,
}

impl Capability {
    /// True for formats that belong to lines rather than leaves
    pub const fn is_line_scoped(&self) -> bool {
        matches!(self, Self::Line | Self::LineAttribute)
    }
}

const STANDARD: &[(&str, Capability)] = &[
    ("bold", Capability::Inline),
    ("italic", Capability::Inline),
    ("underline", Capability::Inline),
    ("strike", Capability::Inline),
    ("code", Capability::Inline),
    ("link", Capability::Inline),
    ("script", Capability::Inline),
    ("color", Capability::Inline),
    ("background", Capability::Inline),
    ("font", Capability::Inline),
    ("size", Capability::Inline),
    ("header", Capability::Line),
    ("list", Capability::Line),
    ("blockquote", Capability::Line),
    ("code-block", Capability::Line),
    ("align", Capability::LineAttribute),
    ("direction", Capability::LineAttribute),
    ("indent", Capability::LineAttribute),
    ("width", Capability::EmbedAttribute),
    ("height", Capability::EmbedAttribute),
    ("alt", Capability::EmbedAttribute),
    ("image", Capability::InlineEmbed),
    ("formula", Capability::InlineEmbed),
    ("video", Capability::BlockEmbed),
];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryConfig {
    #[serde(default)]
    extends: Option<String>,
    #[serde(default)]
    formats: BTreeMap<String, Capability>,
}

/// Read-only map from names to capabilities.
///
/// Built once and shared between editors behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    formats: HashMap<String, Capability>,
}

impl Registry {
    /// Registry with no formats at all
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard rich-text formats
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for (name, capability) in STANDARD {
            registry.register(*name, *capability);
        }
        registry
    }

    /// Parse a TOML registry description.
    ///
    /// ```toml
    /// extends = "standard"
    ///
    /// [formats]
    /// mention = "inline-embed"
    /// highlight = "inline"
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self, RegistryError> {
        let config: RegistryConfig = toml::from_str(input)?;
        let mut registry = match config.extends.as_deref() {
            None => Self::new(),
            Some("standard") => Self::standard(),
            Some(other) => return Err(RegistryError::UnknownBase(other.to_string())),
        };
        for (name, capability) in config.formats {
            registry.register(name, capability);
        }
        Ok(registry)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    pub fn register(&mut self, name: impl Into<String>, capability: Capability) {
        self.formats.insert(name.into(), capability);
    }

    pub fn lookup(&self, name: &str) -> Result<Capability, RegistryError> {
        self.capability(name)
            .ok_or_else(|| RegistryError::UnknownFormat(name.to_string()))
    }

    pub fn capability(&self, name: &str) -> Option<Capability> {
        self.formats.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Keep only attributes whose capability is one of `allowed`.
    ///
    /// Unknown names are dropped with a debug log.
    pub fn scoped(&self, attributes: &AttributeMap, allowed: &[Capability]) -> AttributeMap {
        self.scoped_by(attributes, |cap| allowed.contains(&cap))
    }

    /// Keep only the formats that belong to lines
    pub fn line_scoped(&self, attributes: &AttributeMap) -> AttributeMap {
        self.scoped_by(attributes, |cap| cap.is_line_scoped())
    }

    fn scoped_by(
        &self,
        attributes: &AttributeMap,
        keep: impl Fn(Capability) -> bool,
    ) -> AttributeMap {
        attributes
            .iter()
            .filter(|(name, _)| match self.lookup(name) {
                Ok(cap) => keep(cap),
                Err(err) => {
                    tracing::debug!(%err, "ignoring attribute");
                    false
                }
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Apply `changes` onto `target`.
    ///
    /// Unset values remove the attribute. Setting a line kind clears the
    /// other line kinds, so when one map sets several of them the name that
    /// sorts last wins.
    pub fn apply_formats(&self, target: &mut AttributeMap, changes: &AttributeMap) {
        for (name, value) in changes {
            if value.is_unset() {
                target.remove(name);
                continue;
            }
            if self.capability(name) == Some(Capability::Line) {
                target.retain(|other, _| {
                    other == name.as_str() || self.capability(other) != Some(Capability::Line)
                });
            }
            target.insert(name.clone(), value.clone());
        }
    }

    /// Line attributes as the tree stores them, see [`Registry::apply_formats`]
    pub fn line_formats(&self, attributes: &AttributeMap) -> AttributeMap {
        let mut out = AttributeMap::new();
        self.apply_formats(&mut out, &self.line_scoped(attributes));
        out
    }

    /// Whether an embed with this kind is placed inline
    pub fn is_inline_embed(&self, kind: &str) -> Option<bool> {
        match self.capability(kind)? {
            Capability::InlineEmbed => Some(true),
            Capability::BlockEmbed => Some(false),
            _ => None,
        }
    }
}

/// Convenience for `value.is_unset()` on an optional value
pub(crate) fn is_set(value: Option<&AttrValue>) -> bool {
    value.is_some_and(|v| !v.is_unset())
}
