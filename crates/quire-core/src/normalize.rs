// SPDX-License-Identifier: AGPL-3.0-or-later
//! Invariant-restoring pass run after every edit

use crate::registry::{Capability, Registry};
use crate::tree::{Block, BlockEmbed, Document, Leaf, Line};

/// Restore the structural rules of the tree.
///
/// Drops empty text runs and unset attributes, merges neighbouring runs with
/// equal attributes, moves block-only embeds out of lines and turns an empty
/// document into one blank line. Running it twice changes nothing.
pub fn normalize(doc: &mut Document, registry: &Registry) {
    let blocks = std::mem::take(doc.blocks_mut());
    let mut out = Vec::with_capacity(blocks.len());
    for block in blocks {
        match block {
            Block::Embed(mut embed) => {
                embed.attributes = embed.attributes.without_unset();
                out.push(Block::Embed(embed));
            }
            Block::Line(line) => split_out_block_embeds(line, registry, &mut out),
        }
    }
    if out.is_empty() {
        tracing::trace!("document emptied, restoring a blank line");
        out.push(Block::Line(Line::default()));
    }
    *doc.blocks_mut() = out;
}

fn split_out_block_embeds(line: Line, registry: &Registry, out: &mut Vec<Block>) {
    let Line { leaves, attributes } = line;
    let attributes = attributes.without_unset();
    let mut current = Vec::new();
    for leaf in leaves {
        match leaf {
            Leaf::Embed(e) if registry.is_inline_embed(&e.embed.kind) == Some(false) => {
                tracing::trace!(kind = %e.embed.kind, "moving block embed out of line");
                if !current.is_empty() {
                    let head = std::mem::take(&mut current);
                    out.push(Block::Line(Line::with_leaves(
                        merge_runs(head),
                        attributes.clone(),
                    )));
                }
                let embed_attributes = registry
                    .scoped(
                        &e.attributes,
                        &[Capability::LineAttribute, Capability::EmbedAttribute],
                    )
                    .without_unset();
                out.push(Block::Embed(BlockEmbed {
                    embed: e.embed,
                    attributes: embed_attributes,
                }));
            }
            other => current.push(other),
        }
    }
    out.push(Block::Line(Line::with_leaves(merge_runs(current), attributes)));
}

fn merge_runs(leaves: Vec<Leaf>) -> Vec<Leaf> {
    let mut out: Vec<Leaf> = Vec::with_capacity(leaves.len());
    for mut leaf in leaves {
        *leaf.attributes_mut() = leaf.attributes().without_unset();
        if let Leaf::Text(run) = &leaf {
            if run.text.is_empty() {
                continue;
            }
        }
        match (out.last_mut(), &leaf) {
            (Some(Leaf::Text(prev)), Leaf::Text(run)) if prev.attributes == run.attributes => {
                prev.text.push_str(&run.text);
            }
            _ => out.push(leaf),
        }
    }
    out
}
