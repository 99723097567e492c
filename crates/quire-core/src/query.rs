// SPDX-License-Identifier: AGPL-3.0-or-later
//! Reading formats back out of the tree

use crate::error::Result;
use crate::tree::{Block, Document, Leaf, Line};
use quire_delta::{AttrValue, AttributeMap};
use serde::Serialize;
use std::collections::BTreeMap;

/// Value of a format over a range: one value, or every distinct value seen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FormatValue {
    Single(AttrValue),
    Mixed(Vec<AttrValue>),
}

impl FormatValue {
    fn absorb(&mut self, value: &AttrValue) {
        match self {
            FormatValue::Single(current) if current == value => {}
            FormatValue::Single(current) => {
                *self = FormatValue::Mixed(vec![current.clone(), value.clone()]);
            }
            FormatValue::Mixed(values) => {
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }
        }
    }
}

impl From<AttrValue> for FormatValue {
    fn from(value: AttrValue) -> Self {
        FormatValue::Single(value)
    }
}

pub type Formats = BTreeMap<String, FormatValue>;

/// Leaf formats with the formats of the line around it
fn bubble(leaf: &Leaf, line: &Line) -> AttributeMap {
    let mut out = line.attributes.clone();
    for (name, value) in leaf.attributes() {
        out.insert(name.clone(), value.clone());
    }
    out
}

/// Keep names present in every map. A name with differing values keeps
/// each distinct value in first-seen order.
fn combine(maps: &[AttributeMap]) -> Formats {
    let Some((first, rest)) = maps.split_first() else {
        return Formats::new();
    };
    let mut out: Formats = first
        .iter()
        .map(|(name, value)| (name.clone(), FormatValue::Single(value.clone())))
        .collect();
    for map in rest {
        if out.is_empty() {
            break;
        }
        out.retain(|name, combined| match map.get(name) {
            Some(value) => {
                combined.absorb(value);
                true
            }
            None => false,
        });
    }
    out
}

/// Formats shared by `[index, index + length)`.
///
/// Line formats come from every line the range touches, inline formats from
/// every leaf it overlaps. For a zero-length range the leaf is the one text
/// typed at `index` would inherit from.
pub fn get_format(doc: &Document, index: usize, length: usize) -> Result<Formats> {
    doc.check_range(index, length)?;
    let mut lines = Vec::new();
    let mut leaves = Vec::new();

    if length == 0 {
        if let Some((block, offset)) = doc.line_at(index)? {
            match block {
                Block::Line(line) => {
                    lines.push(line.attributes.clone());
                    if let Some(leaf) = line.ambient_leaf(offset) {
                        leaves.push(bubble(leaf, line));
                    }
                }
                Block::Embed(embed) => lines.push(embed.attributes.clone()),
            }
        }
    } else {
        for (i, start) in doc.blocks_in(index, length) {
            match &doc.blocks()[i] {
                Block::Line(line) => {
                    lines.push(line.attributes.clone());
                    let from = index.saturating_sub(start);
                    let to = (index + length - start).min(line.content_len());
                    if from < to {
                        leaves.extend(
                            line.leaves_in(from, to)
                                .into_iter()
                                .map(|(_, leaf)| bubble(leaf, line)),
                        );
                    }
                }
                Block::Embed(embed) => {
                    lines.push(embed.attributes.clone());
                    leaves.push(embed.attributes.clone());
                }
            }
        }
    }

    let mut formats = combine(&lines);
    formats.extend(combine(&leaves));
    Ok(formats)
}
