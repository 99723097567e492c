// SPDX-License-Identifier: AGPL-3.0-or-later
//! Document tree: lines of leaves, and block embeds
//!
//! Positions are counted in chars. A text run contributes its char count, an
//! inline embed 1, the break that ends each line 1, and a block embed 1.

use crate::error::{EditorError, InvariantViolation, Result};
use crate::registry::{Capability, Registry};
use quire_delta::{AttributeMap, Delta, Embed};
use serde::{Deserialize, Serialize};

/// A run of text sharing one attribute map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "AttributeMap::is_empty")]
    pub attributes: AttributeMap,
}

/// An embed placed inside a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineEmbed {
    pub embed: Embed,
    #[serde(default, skip_serializing_if = "AttributeMap::is_empty")]
    pub attributes: AttributeMap,
}

/// Inline content of a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Leaf {
    Text(TextRun),
    Embed(InlineEmbed),
}

impl Leaf {
    pub fn text(text: impl Into<String>, attributes: AttributeMap) -> Self {
        Leaf::Text(TextRun {
            text: text.into(),
            attributes,
        })
    }

    pub fn embed(embed: Embed, attributes: AttributeMap) -> Self {
        Leaf::Embed(InlineEmbed { embed, attributes })
    }

    pub fn len(&self) -> usize {
        match self {
            Leaf::Text(run) => run.text.chars().count(),
            Leaf::Embed(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn attributes(&self) -> &AttributeMap {
        match self {
            Leaf::Text(run) => &run.attributes,
            Leaf::Embed(embed) => &embed.attributes,
        }
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeMap {
        match self {
            Leaf::Text(run) => &mut run.attributes,
            Leaf::Embed(embed) => &mut embed.attributes,
        }
    }

    /// Split a text run at `at` chars, keeping the head in `self`
    fn split_off(&mut self, at: usize) -> Option<Leaf> {
        match self {
            Leaf::Text(run) if at > 0 && at < run.text.chars().count() => {
                let byte = char_to_byte(&run.text, at);
                let tail = run.text.split_off(byte);
                Some(Leaf::text(tail, run.attributes.clone()))
            }
            _ => None,
        }
    }

    /// Part of the leaf covering `[from, to)`
    pub fn slice(&self, from: usize, to: usize) -> Leaf {
        match self {
            Leaf::Text(run) => Leaf::text(
                run.text.chars().skip(from).take(to - from).collect::<String>(),
                run.attributes.clone(),
            ),
            Leaf::Embed(_) => self.clone(),
        }
    }

    fn push_to(&self, delta: Delta) -> Delta {
        match self {
            Leaf::Text(run) => delta.insert(run.text.clone(), run.attributes.clone()),
            Leaf::Embed(e) => delta.insert_embed(e.embed.clone(), e.attributes.clone()),
        }
    }
}

pub(crate) fn char_to_byte(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

/// Leaves plus line attributes, ended by one implicit break
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub leaves: Vec<Leaf>,
    #[serde(default, skip_serializing_if = "AttributeMap::is_empty")]
    pub attributes: AttributeMap,
}

impl Line {
    pub fn new(attributes: AttributeMap) -> Self {
        Self {
            leaves: Vec::new(),
            attributes,
        }
    }

    pub fn with_leaves(leaves: Vec<Leaf>, attributes: AttributeMap) -> Self {
        Self { leaves, attributes }
    }

    /// Length without the break
    pub fn content_len(&self) -> usize {
        self.leaves.iter().map(Leaf::len).sum()
    }

    /// Length including the break
    pub fn len(&self) -> usize {
        self.content_len() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Make sure a leaf boundary sits at `offset`; returns the index of the
    /// first leaf starting at or after it.
    pub(crate) fn split_at(&mut self, offset: usize) -> usize {
        let mut pos = 0;
        for i in 0..self.leaves.len() {
            if pos == offset {
                return i;
            }
            let len = self.leaves[i].len();
            if offset < pos + len {
                if let Some(tail) = self.leaves[i].split_off(offset - pos) {
                    self.leaves.insert(i + 1, tail);
                }
                return i + 1;
            }
            pos += len;
        }
        self.leaves.len()
    }

    /// Cut the line at `offset`, returning the tail as a new line that
    /// carries a copy of the attributes
    pub(crate) fn split_off(&mut self, offset: usize) -> Line {
        let index = self.split_at(offset);
        Line::with_leaves(self.leaves.split_off(index), self.attributes.clone())
    }

    pub(crate) fn insert_leaf(&mut self, offset: usize, leaf: Leaf) {
        let index = self.split_at(offset);
        self.leaves.insert(index, leaf);
    }

    /// Remove content in `[from, to)`, both clamped to the content
    pub(crate) fn remove_content(&mut self, from: usize, to: usize) {
        let to = to.min(self.content_len());
        if from >= to {
            return;
        }
        let start = self.split_at(from);
        let end = self.split_at(to);
        self.leaves.drain(start..end);
    }

    /// Leaf covering `offset`, or the last leaf when `offset` is the end of
    /// the content. This is where inserted text takes its formats from.
    pub fn ambient_leaf(&self, offset: usize) -> Option<&Leaf> {
        let mut pos = 0;
        for leaf in &self.leaves {
            let len = leaf.len();
            if offset < pos + len {
                return Some(leaf);
            }
            pos += len;
        }
        if offset == pos {
            self.leaves.last()
        } else {
            None
        }
    }

    /// Leaves overlapping `[from, to)` with their start offsets
    pub fn leaves_in(&self, from: usize, to: usize) -> Vec<(usize, &Leaf)> {
        let mut out = Vec::new();
        let mut pos = 0;
        for leaf in &self.leaves {
            let len = leaf.len();
            if pos < to && pos + len > from {
                out.push((pos, leaf));
            }
            pos += len;
        }
        out
    }

    /// Plain text, embeds skipped
    pub fn text(&self) -> String {
        self.leaves
            .iter()
            .filter_map(|leaf| match leaf {
                Leaf::Text(run) => Some(run.text.as_str()),
                Leaf::Embed(_) => None,
            })
            .collect()
    }

    pub fn to_delta(&self) -> Delta {
        self.leaves
            .iter()
            .fold(Delta::new(), |delta, leaf| leaf.push_to(delta))
            .insert("\n", self.attributes.clone())
    }
}

/// An embed occupying its own block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEmbed {
    pub embed: Embed,
    #[serde(default, skip_serializing_if = "AttributeMap::is_empty")]
    pub attributes: AttributeMap,
}

/// Top-level node of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Line(Line),
    Embed(BlockEmbed),
}

impl Block {
    pub fn len(&self) -> usize {
        match self {
            Block::Line(line) => line.len(),
            Block::Embed(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn attributes(&self) -> &AttributeMap {
        match self {
            Block::Line(line) => &line.attributes,
            Block::Embed(embed) => &embed.attributes,
        }
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeMap {
        match self {
            Block::Line(line) => &mut line.attributes,
            Block::Embed(embed) => &mut embed.attributes,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            Block::Line(line) => Some(line),
            Block::Embed(_) => None,
        }
    }

    pub fn to_delta(&self) -> Delta {
        match self {
            Block::Line(line) => line.to_delta(),
            Block::Embed(e) => Delta::new().insert_embed(e.embed.clone(), e.attributes.clone()),
        }
    }
}

/// The root: an ordered, never empty sequence of blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// One blank line
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::Line(Line::default())],
        }
    }

    /// Wrap blocks as they are; run normalization before relying on them
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.iter().map(Block::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// One line with no leaves
    pub fn is_blank(&self) -> bool {
        matches!(self.blocks.as_slice(), [Block::Line(line)] if line.is_empty())
    }

    pub(crate) fn check_range(&self, index: usize, length: usize) -> Result<()> {
        let doc_length = self.len();
        match index.checked_add(length) {
            Some(end) if end <= doc_length => Ok(()),
            _ => Err(EditorError::OutOfRange {
                index,
                length,
                doc_length,
            }),
        }
    }

    /// Block containing `position` and the offset inside it.
    ///
    /// A position equal to a block's end belongs to the next block; `None`
    /// at the document end.
    pub fn find_block(&self, position: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (i, block) in self.blocks.iter().enumerate() {
            let len = block.len();
            if position < start + len {
                return Some((i, position - start));
            }
            start += len;
        }
        None
    }

    /// Start position of block `index`
    pub fn block_start(&self, index: usize) -> usize {
        self.blocks[..index].iter().map(Block::len).sum()
    }

    /// Line (or block embed) holding `position`, with the local offset
    pub fn line_at(&self, position: usize) -> Result<Option<(&Block, usize)>> {
        self.check_range(position, 0)?;
        Ok(self
            .find_block(position)
            .map(|(i, offset)| (&self.blocks[i], offset)))
    }

    /// Leaf holding `position`, with the offset inside the leaf.
    ///
    /// `None` when the position is a line break, a block embed or the end.
    pub fn leaf_at(&self, position: usize) -> Result<Option<(&Leaf, usize)>> {
        let Some((block, offset)) = self.line_at(position)? else {
            return Ok(None);
        };
        let Block::Line(line) = block else {
            return Ok(None);
        };
        Ok(line
            .leaves_in(offset, offset + 1)
            .into_iter()
            .next()
            .map(|(start, leaf)| (leaf, offset - start)))
    }

    /// Blocks overlapping `[position, position + length)` with their starts
    pub fn blocks_in(&self, position: usize, length: usize) -> Vec<(usize, usize)> {
        let end = position + length;
        let mut out = Vec::new();
        let mut start = 0;
        for (i, block) in self.blocks.iter().enumerate() {
            let block_end = start + block.len();
            if start < end && block_end > position {
                out.push((i, start));
            }
            if start >= end {
                break;
            }
            start = block_end;
        }
        out
    }

    pub fn to_delta(&self) -> Delta {
        self.blocks
            .iter()
            .fold(Delta::new(), |delta, block| delta.concat(block.to_delta()))
    }

    /// Remove `[position, position + length)`.
    ///
    /// Blocks fully inside the range go away. A line that loses its break
    /// after keeping some leading content merges into the next surviving
    /// line, whose attributes win. With no line after it (end of document or
    /// a block embed next) the line keeps its break.
    pub(crate) fn delete_range(&mut self, position: usize, length: usize) {
        if length == 0 {
            return;
        }
        let end = position + length;
        let mut out: Vec<Block> = Vec::with_capacity(self.blocks.len());
        let mut carry: Option<Line> = None;
        let mut start = 0;

        for block in std::mem::take(&mut self.blocks) {
            let block_len = block.len();
            let block_start = start;
            start += block_len;

            let touched = block_start < end && block_start + block_len > position;
            let block = if touched {
                match block {
                    Block::Embed(_) => continue,
                    Block::Line(mut line) => {
                        let from = position.saturating_sub(block_start);
                        let to = (end - block_start).min(block_len);
                        let loses_break = to == block_len;
                        if loses_break && from == 0 {
                            continue;
                        }
                        line.remove_content(from, to);
                        if loses_break {
                            carry = Some(line);
                            continue;
                        }
                        Block::Line(line)
                    }
                }
            } else {
                block
            };

            match (carry.take(), block) {
                (Some(mut head), Block::Line(mut line)) => {
                    head.leaves.append(&mut line.leaves);
                    line.leaves = head.leaves;
                    out.push(Block::Line(line));
                }
                (Some(head), embed) => {
                    out.push(Block::Line(head));
                    out.push(embed);
                }
                (None, block) => out.push(block),
            }
        }
        if let Some(head) = carry {
            out.push(Block::Line(head));
        }
        self.blocks = out;
    }

    /// Apply `changes` to everything in `[position, position + length)`.
    ///
    /// Inline formats go to touched leaves, line formats to lines whose break
    /// is in range, line and embed attributes to block embeds in range, embed
    /// attributes to inline embeds in range.
    pub(crate) fn format_range(
        &mut self,
        registry: &Registry,
        position: usize,
        length: usize,
        changes: &AttributeMap,
    ) {
        if length == 0 || changes.is_empty() {
            return;
        }
        let text_formats = registry.scoped(changes, &[Capability::Inline]);
        let embed_formats =
            registry.scoped(changes, &[Capability::Inline, Capability::EmbedAttribute]);
        let line_formats = registry.line_scoped(changes);
        let block_embed_formats = registry.scoped(
            changes,
            &[Capability::LineAttribute, Capability::EmbedAttribute],
        );

        for (i, block_start) in self.blocks_in(position, length) {
            let from = position.saturating_sub(block_start);
            let to = position + length - block_start;
            match &mut self.blocks[i] {
                Block::Embed(embed) => {
                    registry.apply_formats(&mut embed.attributes, &block_embed_formats);
                }
                Block::Line(line) => {
                    let content_len = line.content_len();
                    let content_to = to.min(content_len);
                    if from < content_to && !embed_formats.is_empty() {
                        let begin = line.split_at(from);
                        let end = line.split_at(content_to);
                        for leaf in &mut line.leaves[begin..end] {
                            let formats = match &*leaf {
                                Leaf::Text(_) => &text_formats,
                                Leaf::Embed(_) => &embed_formats,
                            };
                            registry.apply_formats(leaf.attributes_mut(), formats);
                        }
                    }
                    if to > content_len {
                        registry.apply_formats(&mut line.attributes, &line_formats);
                    }
                }
            }
        }
    }

    /// Check every structural rule of the tree
    pub fn validate(&self, registry: &Registry) -> std::result::Result<(), InvariantViolation> {
        if self.blocks.is_empty() {
            return Err(InvariantViolation::EmptyDocument);
        }
        for (b, block) in self.blocks.iter().enumerate() {
            for (name, value) in block.attributes() {
                if value.is_unset() {
                    return Err(InvariantViolation::UnsetAttribute {
                        block: b,
                        name: name.clone(),
                    });
                }
            }
            let Block::Line(line) = block else { continue };
            for (l, leaf) in line.leaves.iter().enumerate() {
                match leaf {
                    Leaf::Text(run) if run.text.is_empty() => {
                        return Err(InvariantViolation::EmptyTextRun { block: b, leaf: l });
                    }
                    Leaf::Text(run) if run.text.contains('\n') => {
                        return Err(InvariantViolation::BreakInText { block: b });
                    }
                    Leaf::Embed(e) if registry.is_inline_embed(&e.embed.kind) == Some(false) => {
                        return Err(InvariantViolation::BlockEmbedInLine {
                            block: b,
                            kind: e.embed.kind.clone(),
                        });
                    }
                    _ => {}
                }
                if let Some((name, _)) = leaf.attributes().iter().find(|(_, v)| v.is_unset()) {
                    return Err(InvariantViolation::UnsetAttribute {
                        block: b,
                        name: name.clone(),
                    });
                }
            }
            for (l, pair) in line.leaves.windows(2).enumerate() {
                if let [Leaf::Text(a), Leaf::Text(b_run)] = pair {
                    if a.attributes == b_run.attributes {
                        return Err(InvariantViolation::UnmergedRuns { block: b, leaf: l });
                    }
                }
            }
        }
        Ok(())
    }
}
