// SPDX-License-Identifier: AGPL-3.0-or-later
//! Editor: the document tree plus the operations that change and read it

use crate::error::{EditorError, Result};
use crate::formats::html;
use crate::normalize::normalize;
use crate::query::{self, Formats};
use crate::reconcile::{self, normalize_newlines};
use crate::registry::{Capability, Registry};
use crate::traits::{RenderConfig, Renderer};
use crate::tree::{Block, BlockEmbed, Document, Leaf, Line};
use quire_delta::{AttributeMap, Delta, Embed, Insert, Op};
use std::sync::Arc;

/// A document and the registry that gives its formats meaning.
///
/// Every mutating call normalizes the tree before returning and hands back
/// the change it made as a delta.
#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    registry: Arc<Registry>,
}

impl Editor {
    /// Editor over one blank line
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            document: Document::new(),
            registry,
        }
    }

    /// Build a document from a delta made only of inserts
    pub fn from_delta(registry: Arc<Registry>, contents: &Delta) -> Result<Self> {
        if !contents.is_document() {
            return Err(EditorError::MalformedLinearForm(
                "document contents may only hold inserts".to_string(),
            ));
        }
        let mut editor = Self::new(registry);
        editor.insert_contents(0, contents)?;
        let last = editor.length() - 1;
        editor.delete_text(last, 1)?;
        Ok(editor)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Document length, the final line break included
    pub fn length(&self) -> usize {
        self.document.len()
    }

    fn normalize(&mut self) {
        normalize(&mut self.document, &self.registry);
        if cfg!(debug_assertions) {
            if let Err(violation) = self.document.validate(&self.registry) {
                panic!("document tree left inconsistent: {violation}");
            }
        }
    }

    /// Inline formats of the content around `position`, inherited by text
    /// typed there
    fn ambient_formats(&self, position: usize, allowed: &[Capability]) -> Result<AttributeMap> {
        Ok(match self.document.line_at(position)? {
            Some((Block::Line(line), offset)) => line
                .ambient_leaf(offset)
                .map(|leaf| self.registry.scoped(leaf.attributes(), allowed))
                .unwrap_or_default(),
            _ => AttributeMap::new(),
        })
    }

    /// Insert text at `index`.
    ///
    /// Text continues the formatting of the content it lands in; formats in
    /// `attributes` are applied on top. Line breaks split the line and both
    /// halves keep its line formats.
    pub fn insert_text(
        &mut self,
        index: usize,
        text: &str,
        attributes: &AttributeMap,
    ) -> Result<Delta> {
        self.document.check_range(index, 0)?;
        let text = normalize_newlines(text);
        if text.is_empty() {
            return Ok(Delta::new());
        }
        tracing::debug!(index, len = text.chars().count(), "insert text");
        self.place_text(index, &text)?;
        self.document.format_range(
            &self.registry,
            index,
            text.chars().count(),
            attributes,
        );
        self.normalize();
        Ok(Delta::new()
            .retain(index, AttributeMap::new())
            .insert(text, attributes.clone()))
    }

    fn place_text(&mut self, index: usize, text: &str) -> Result<()> {
        match self.document.find_block(index) {
            Some((i, offset)) if matches!(self.document.blocks()[i], Block::Line(_)) => {
                self.place_in_line(i, offset, text)?;
            }
            Some((i, _)) => {
                // In front of a block embed every segment becomes its own line
                let mut segments: Vec<&str> = text.split('\n').collect();
                if text.ends_with('\n') {
                    segments.pop();
                }
                let lines: Vec<Block> = segments
                    .into_iter()
                    .map(|segment| {
                        let leaves = if segment.is_empty() {
                            Vec::new()
                        } else {
                            vec![Leaf::text(segment, AttributeMap::new())]
                        };
                        Block::Line(Line::with_leaves(leaves, AttributeMap::new()))
                    })
                    .collect();
                self.document.blocks_mut().splice(i..i, lines);
            }
            None => {
                let body = text.strip_suffix('\n').unwrap_or(text);
                let blocks = self.document.blocks_mut();
                blocks.push(Block::Line(Line::default()));
                let i = blocks.len() - 1;
                self.place_in_line(i, 0, body)?;
            }
        }
        Ok(())
    }

    fn place_in_line(&mut self, block: usize, offset: usize, text: &str) -> Result<()> {
        let mut block = block;
        let mut offset = offset;
        for (n, segment) in text.split('\n').enumerate() {
            if n > 0 {
                let blocks = self.document.blocks_mut();
                if let Block::Line(line) = &mut blocks[block] {
                    let tail = line.split_off(offset);
                    blocks.insert(block + 1, Block::Line(tail));
                }
                block += 1;
                offset = 0;
            }
            if segment.is_empty() {
                continue;
            }
            let position = self.document.block_start(block) + offset;
            let formats = self.ambient_formats(position, &[Capability::Inline])?;
            if let Block::Line(line) = &mut self.document.blocks_mut()[block] {
                line.insert_leaf(offset, Leaf::text(segment, formats));
            }
            offset += segment.chars().count();
        }
        Ok(())
    }

    /// Insert an embed at `index`.
    ///
    /// Inline embeds pick up the inline formats around them, block embeds
    /// split the line they land in.
    pub fn insert_embed(
        &mut self,
        index: usize,
        embed: Embed,
        attributes: &AttributeMap,
    ) -> Result<Delta> {
        self.document.check_range(index, 0)?;
        let inline = self.registry.is_inline_embed(&embed.kind).ok_or_else(|| {
            EditorError::MalformedLinearForm(format!("embed `{}` is not registered", embed.kind))
        })?;
        tracing::debug!(index, kind = %embed.kind, inline, "insert embed");
        if inline {
            let mut formats = self.ambient_formats(index, &[Capability::Inline])?;
            self.registry.apply_formats(
                &mut formats,
                &self
                    .registry
                    .scoped(attributes, &[Capability::Inline, Capability::EmbedAttribute]),
            );
            self.document.place_leaf(index, Leaf::embed(embed.clone(), formats));
        } else {
            let mut formats = AttributeMap::new();
            self.registry.apply_formats(
                &mut formats,
                &self.registry.scoped(
                    attributes,
                    &[Capability::LineAttribute, Capability::EmbedAttribute],
                ),
            );
            self.document.place_block_embed(
                index,
                BlockEmbed {
                    embed: embed.clone(),
                    attributes: formats,
                },
            );
        }
        self.normalize();
        Ok(Delta::new()
            .retain(index, AttributeMap::new())
            .insert_embed(embed, attributes.clone()))
    }

    /// Delete `length` positions at `index`, joining lines whose break goes
    pub fn delete_text(&mut self, index: usize, length: usize) -> Result<Delta> {
        self.document.check_range(index, length)?;
        tracing::debug!(index, length, "delete text");
        self.document.delete_range(index, length);
        self.normalize();
        Ok(Delta::new()
            .retain(index, AttributeMap::new())
            .delete(length))
    }

    /// Apply inline formats to content in range and line formats to lines
    /// whose break is in range
    pub fn format_text(
        &mut self,
        index: usize,
        length: usize,
        attributes: &AttributeMap,
    ) -> Result<Delta> {
        self.document.check_range(index, length)?;
        tracing::debug!(index, length, "format text");
        self.document
            .format_range(&self.registry, index, length, attributes);
        self.normalize();
        Ok(Delta::new()
            .retain(index, AttributeMap::new())
            .retain(length, attributes.clone())
            .chop())
    }

    /// Apply line formats to every line the range touches.
    ///
    /// A zero-length range still formats the line at `index`.
    pub fn format_line(
        &mut self,
        index: usize,
        length: usize,
        attributes: &AttributeMap,
    ) -> Result<Delta> {
        self.document.check_range(index, length)?;
        tracing::debug!(index, length, "format line");
        let line_formats = self.registry.line_scoped(attributes);
        let embed_formats = self.registry.scoped(
            attributes,
            &[Capability::LineAttribute, Capability::EmbedAttribute],
        );
        let mut change = Delta::new();
        let mut cursor = 0;
        for (i, start) in self.document.blocks_in(index, length.max(1)) {
            let block = &mut self.document.blocks_mut()[i];
            let end = start + block.len() - 1;
            let formats = match block {
                Block::Line(_) => &line_formats,
                Block::Embed(_) => &embed_formats,
            };
            self.registry.apply_formats(block.attributes_mut(), formats);
            change = change
                .retain(end - cursor, AttributeMap::new())
                .retain(1, formats.clone());
            cursor = end + 1;
        }
        self.normalize();
        Ok(change.chop())
    }

    /// Strip inline and line formats from a range.
    ///
    /// The line holding the end of the range loses its line formats too,
    /// while its content after the range keeps inline formats.
    pub fn remove_format(&mut self, index: usize, length: usize) -> Result<Delta> {
        self.document.check_range(index, length)?;
        tracing::debug!(index, length, "remove format");
        let text = self.get_text(index, length)?;
        let (suffix, suffix_len) = match self.document.line_at(index + length)? {
            Some((Block::Line(line), offset)) => (
                line.to_delta()
                    .slice(offset, line.len() - 1)
                    .insert("\n", AttributeMap::new()),
                line.len() - offset,
            ),
            _ => (Delta::new(), 0),
        };
        let contents = self.get_contents(index, length + suffix_len)?;
        let target = Delta::new().insert(text, AttributeMap::new()).concat(suffix);
        let diff = contents.diff(&target)?;
        self.apply_delta(&Delta::new().retain(index, AttributeMap::new()).concat(diff))
    }

    /// Apply a change delta. Inserted content gets exactly the formats its
    /// op carries.
    ///
    /// Ops before a failing op stay applied.
    pub fn apply_delta(&mut self, change: &Delta) -> Result<Delta> {
        let result = reconcile::apply_change(&mut self.document, &self.registry, change);
        self.normalize();
        result
    }

    /// Insert a document fragment at `index`; non-insert ops are ignored
    pub fn insert_contents(&mut self, index: usize, contents: &Delta) -> Result<Delta> {
        self.document.check_range(index, 0)?;
        if contents.ops().iter().all(|op| !matches!(op, Op::Insert { .. })) {
            return Ok(Delta::new());
        }
        let result =
            reconcile::insert_contents(&mut self.document, &self.registry, index, contents);
        self.normalize();
        result
    }

    /// The whole document as a delta
    pub fn get_delta(&self) -> Delta {
        self.document.to_delta()
    }

    /// Document delta of `[index, index + length)`
    pub fn get_contents(&self, index: usize, length: usize) -> Result<Delta> {
        self.document.check_range(index, length)?;
        Ok(self.document.to_delta().slice(index, index + length))
    }

    /// Text of `[index, index + length)`, line breaks included, embeds left out
    pub fn get_text(&self, index: usize, length: usize) -> Result<String> {
        Ok(self
            .get_contents(index, length)?
            .ops()
            .iter()
            .filter_map(|op| match op {
                Op::Insert {
                    insert: Insert::Text(text),
                    ..
                } => Some(text.as_str()),
                _ => None,
            })
            .collect())
    }

    pub fn is_blank(&self) -> bool {
        self.document.is_blank()
    }

    /// Formats shared by a range, see [`query::get_format`]
    pub fn get_format(&self, index: usize, length: usize) -> Result<Formats> {
        query::get_format(&self.document, index, length)
    }

    /// HTML for `[index, index + length)`
    pub fn get_html(&self, index: usize, length: usize) -> Result<String> {
        self.document.check_range(index, length)?;
        Ok(html::render_range(
            &self.document,
            index,
            length,
            &RenderConfig::default(),
        ))
    }

    /// Render the whole document with `renderer`
    pub fn render(&self, renderer: &dyn Renderer, config: &RenderConfig) -> Result<String> {
        renderer.render(&self.document, config)
    }
}
