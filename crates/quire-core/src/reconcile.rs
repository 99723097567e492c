// SPDX-License-Identifier: AGPL-3.0-or-later
//! Applying a delta to the tree op by op
//!
//! The reconciler walks a change with a cursor. Inserted content takes
//! exactly the attributes its op carries. Content placed where no line can
//! hold it (the document end, or right before a block embed) opens a new
//! line whose break is still owed; the next line break op pays it.

use crate::error::{EditorError, Result};
use crate::registry::{Capability, Registry};
use crate::tree::{Block, BlockEmbed, Document, Leaf, Line};
use quire_delta::{AttributeMap, Delta, Insert, Op, OpKind};

pub(crate) fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split text inserts at every line break so each break is its own op
fn split_breaks(ops: &[Op]) -> Vec<Op> {
    let mut out = Vec::with_capacity(ops.len());
    for op in ops {
        match op {
            Op::Insert {
                insert: Insert::Text(text),
                attributes,
            } => {
                let text = normalize_newlines(text);
                for (i, part) in text.split('\n').enumerate() {
                    if i > 0 {
                        out.push(Op::Insert {
                            insert: Insert::Text("\n".to_string()),
                            attributes: attributes.clone(),
                        });
                    }
                    if !part.is_empty() {
                        out.push(Op::Insert {
                            insert: Insert::Text(part.to_string()),
                            attributes: attributes.clone(),
                        });
                    }
                }
            }
            op if op.is_empty() => {}
            other => out.push(other.clone()),
        }
    }
    out
}

impl Document {
    /// Put `leaf` at `position` as is. Returns true when a new line had to
    /// be opened for it.
    pub(crate) fn place_leaf(&mut self, position: usize, leaf: Leaf) -> bool {
        let found = self.find_block(position);
        let blocks = self.blocks_mut();
        match found {
            Some((i, offset)) => {
                if let Block::Line(line) = &mut blocks[i] {
                    line.insert_leaf(offset, leaf);
                    return false;
                }
                blocks.insert(i, Block::Line(Line::with_leaves(vec![leaf], AttributeMap::new())));
            }
            None => blocks.push(Block::Line(Line::with_leaves(vec![leaf], AttributeMap::new()))),
        }
        true
    }

    /// Insert a line break at `position`; the line it ends gets `attributes`
    pub(crate) fn place_break(&mut self, position: usize, attributes: AttributeMap) {
        let found = self.find_block(position);
        let blocks = self.blocks_mut();
        match found {
            Some((i, offset)) => {
                if let Block::Line(line) = &mut blocks[i] {
                    let tail = line.split_off(offset);
                    line.attributes = attributes;
                    blocks.insert(i + 1, Block::Line(tail));
                } else {
                    blocks.insert(i, Block::Line(Line::new(attributes)));
                }
            }
            None => blocks.push(Block::Line(Line::new(attributes))),
        }
    }

    /// Insert a block embed at `position`, splitting the line there if the
    /// position is inside one. Returns how many positions were added.
    pub(crate) fn place_block_embed(&mut self, position: usize, embed: BlockEmbed) -> usize {
        let found = self.find_block(position);
        let blocks = self.blocks_mut();
        match found {
            Some((i, offset)) if offset > 0 => {
                if let Block::Line(line) = &mut blocks[i] {
                    let tail = line.split_off(offset);
                    blocks.insert(i + 1, Block::Embed(embed));
                    blocks.insert(i + 2, Block::Line(tail));
                    return 2;
                }
                blocks.insert(i, Block::Embed(embed));
            }
            Some((i, _)) => blocks.insert(i, Block::Embed(embed)),
            None => blocks.push(Block::Embed(embed)),
        }
        1
    }
}

/// Cursor state while a change is walked over the tree
pub(crate) struct Reconciler<'a> {
    doc: &'a mut Document,
    registry: &'a Registry,
    cursor: usize,
    /// The line at the cursor was opened by an insert and has no break yet
    pending: bool,
}

impl<'a> Reconciler<'a> {
    pub(crate) fn new(doc: &'a mut Document, registry: &'a Registry, cursor: usize) -> Self {
        Self {
            doc,
            registry,
            cursor,
            pending: false,
        }
    }

    pub(crate) fn apply(&mut self, op: &Op) -> Result<()> {
        match op {
            Op::Insert { insert, attributes } => self.insert(insert, attributes),
            Op::Retain { retain, attributes } => self.retain(*retain, attributes),
            Op::Delete { delete } => self.delete(*delete),
        }
    }

    fn insert(&mut self, insert: &Insert, attributes: &AttributeMap) -> Result<()> {
        match insert {
            Insert::Text(text) if text == "\n" => {
                self.line_break(attributes);
                Ok(())
            }
            Insert::Text(text) => {
                let attributes = self
                    .registry
                    .scoped(attributes, &[Capability::Inline])
                    .without_unset();
                self.inline(Leaf::text(text.clone(), attributes));
                Ok(())
            }
            Insert::Embed(embed) => match self.registry.is_inline_embed(&embed.kind) {
                Some(true) => {
                    let attributes = self
                        .registry
                        .scoped(attributes, &[Capability::Inline, Capability::EmbedAttribute])
                        .without_unset();
                    self.inline(Leaf::embed(embed.clone(), attributes));
                    Ok(())
                }
                Some(false) => {
                    let mut resolved = AttributeMap::new();
                    self.registry.apply_formats(
                        &mut resolved,
                        &self.registry.scoped(
                            attributes,
                            &[Capability::LineAttribute, Capability::EmbedAttribute],
                        ),
                    );
                    self.block_embed(BlockEmbed {
                        embed: embed.clone(),
                        attributes: resolved,
                    });
                    Ok(())
                }
                None => Err(EditorError::MalformedLinearForm(format!(
                    "embed `{}` is not registered",
                    embed.kind
                ))),
            },
        }
    }

    fn line_break(&mut self, attributes: &AttributeMap) {
        let attributes = self.registry.line_formats(attributes);
        if self.pending {
            if let Some((i, _)) = self.doc.find_block(self.cursor) {
                if let Block::Line(line) = &mut self.doc.blocks_mut()[i] {
                    line.attributes = attributes;
                }
            }
            self.pending = false;
        } else {
            self.doc.place_break(self.cursor, attributes);
        }
        self.cursor += 1;
    }

    fn inline(&mut self, leaf: Leaf) {
        let len = leaf.len();
        if self.doc.place_leaf(self.cursor, leaf) {
            tracing::trace!(cursor = self.cursor, "opened a line for inline content");
            self.pending = true;
        }
        self.cursor += len;
    }

    fn block_embed(&mut self, embed: BlockEmbed) {
        self.settle();
        self.cursor += self.doc.place_block_embed(self.cursor, embed);
    }

    /// Step over the break of a pending line
    fn settle(&mut self) {
        if self.pending {
            self.cursor += 1;
            self.pending = false;
        }
    }

    fn check(&self, start: usize, length: usize, what: &str) -> Result<()> {
        let doc_length = self.doc.len();
        match start.checked_add(length) {
            Some(end) if end <= doc_length => Ok(()),
            _ => Err(EditorError::MalformedLinearForm(format!(
                "{what} of {length} at {start} passes the document end ({doc_length})"
            ))),
        }
    }

    fn retain(&mut self, length: usize, attributes: &AttributeMap) -> Result<()> {
        self.settle();
        self.check(self.cursor, length, "retain")?;
        self.doc
            .format_range(self.registry, self.cursor, length, attributes);
        // Checked above: cursor + length stays within the document.
        self.cursor += length;
        Ok(())
    }

    fn delete(&mut self, length: usize) -> Result<()> {
        if !self.pending {
            self.check(self.cursor, length, "delete")?;
            self.doc.delete_range(self.cursor, length);
            return Ok(());
        }

        let start = self.cursor.saturating_add(1);
        self.check(start, length, "delete")?;
        self.doc.delete_range(start, length);
        // The owed break is not a real one: join the open line with the
        // line now following it, which keeps its own attributes.
        let Some((i, _)) = self.doc.find_block(self.cursor) else {
            return Ok(());
        };
        let blocks = self.doc.blocks_mut();
        if matches!(blocks.get(i + 1), Some(Block::Line(_))) {
            if let Block::Line(mut head) = blocks.remove(i) {
                if let Some(Block::Line(next)) = blocks.get_mut(i) {
                    head.leaves.append(&mut next.leaves);
                    next.leaves = head.leaves;
                }
            }
            self.pending = false;
        }
        Ok(())
    }
}

/// Apply `change` from position 0. Returns the change as it was applied,
/// with line breaks split out and canonicalized.
///
/// Ops applied before a failing op stay applied; the caller normalizes.
pub(crate) fn apply_change(
    doc: &mut Document,
    registry: &Registry,
    change: &Delta,
) -> Result<Delta> {
    let ops = split_breaks(change.ops());
    tracing::debug!(ops = ops.len(), "applying change");
    let mut reconciler = Reconciler::new(doc, registry, 0);
    for op in &ops {
        reconciler.apply(op)?;
    }
    Ok(Delta::from_ops(ops))
}

/// Insert the content of a document delta at `index`, line by line.
///
/// Retains and deletes in `contents` are ignored.
pub(crate) fn insert_contents(
    doc: &mut Document,
    registry: &Registry,
    index: usize,
    contents: &Delta,
) -> Result<Delta> {
    let inserts: Vec<Op> = contents
        .ops()
        .iter()
        .filter(|op| op.kind() == OpKind::Insert)
        .cloned()
        .collect();
    let ops = split_breaks(&inserts);
    tracing::debug!(index, ops = ops.len(), "inserting contents");
    let mut reconciler = Reconciler::new(doc, registry, index);
    for op in &ops {
        reconciler.apply(op)?;
    }
    Ok(Delta::new()
        .retain(index, AttributeMap::new())
        .concat(Delta::from_ops(ops)))
}
