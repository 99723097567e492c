// SPDX-License-Identifier: AGPL-3.0-or-later
//! The delta: a canonical sequence of ops describing a document or a change

use crate::attributes::AttributeMap;
use crate::error::{DeltaError, Result};
use crate::iter::OpIterator;
use crate::myers::{self, Edit};
use crate::op::{Embed, Insert, Op, OpKind};
use serde::{Deserialize, Serialize};

/// Stands in for an embed when diffing flattened documents
const EMBED_CHAR: char = '\0';

/// Ordered ops, kept canonical by [`Delta::push`].
///
/// A delta made only of inserts is a document. Anything else is a change
/// to be applied on top of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    ops: Vec<Op>,
}

/// One line of a document delta, see [`Delta::lines`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaLine {
    /// Inserts before the line break
    pub content: Delta,
    /// Attributes of the line break
    pub attributes: AttributeMap,
    /// False for trailing content with no line break after it
    pub terminated: bool,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ops, canonicalizing as they are pushed
    pub fn from_ops(ops: impl IntoIterator<Item = Op>) -> Self {
        let mut delta = Self::new();
        for op in ops {
            delta.push(op);
        }
        delta
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn insert(mut self, text: impl Into<String>, attributes: AttributeMap) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.push(Op::Insert {
                insert: Insert::Text(text),
                attributes,
            });
        }
        self
    }

    pub fn insert_embed(mut self, embed: Embed, attributes: AttributeMap) -> Self {
        self.push(Op::Insert {
            insert: Insert::Embed(embed),
            attributes,
        });
        self
    }

    pub fn retain(mut self, len: usize, attributes: AttributeMap) -> Self {
        if len > 0 {
            self.push(Op::Retain {
                retain: len,
                attributes,
            });
        }
        self
    }

    pub fn delete(mut self, len: usize) -> Self {
        if len > 0 {
            self.push(Op::Delete { delete: len });
        }
        self
    }

    /// Append an op, merging it into its neighbour where possible.
    ///
    /// Adjacent deletes merge, adjacent text inserts and retains merge when
    /// their attributes match, and an insert pushed after a delete moves in
    /// front of it.
    pub fn push(&mut self, op: Op) {
        if op.is_empty() {
            return;
        }
        let mut index = self.ops.len();
        if let Some(last) = self.ops.last_mut() {
            if let (Op::Delete { delete: a }, Op::Delete { delete: b }) = (&mut *last, &op) {
                *a = a.saturating_add(*b);
                return;
            }
        }
        if matches!(self.ops.last(), Some(Op::Delete { .. })) && op.kind() == OpKind::Insert {
            index -= 1;
            if index == 0 {
                self.ops.insert(0, op);
                return;
            }
        }
        if index > 0 {
            let prev = &mut self.ops[index - 1];
            match (prev, &op) {
                (
                    Op::Insert {
                        insert: Insert::Text(a),
                        attributes: pa,
                    },
                    Op::Insert {
                        insert: Insert::Text(b),
                        attributes: pb,
                    },
                ) if pa == pb => {
                    a.push_str(b);
                    return;
                }
                (
                    Op::Retain {
                        retain: a,
                        attributes: pa,
                    },
                    Op::Retain {
                        retain: b,
                        attributes: pb,
                    },
                ) if pa == pb => {
                    *a = a.saturating_add(*b);
                    return;
                }
                _ => {}
            }
        }
        self.ops.insert(index, op);
    }

    /// Drop a trailing plain retain, which changes nothing
    pub fn chop(mut self) -> Self {
        if let Some(Op::Retain { attributes, .. }) = self.ops.last() {
            if attributes.is_empty() {
                self.ops.pop();
            }
        }
        self
    }

    pub fn concat(mut self, other: Delta) -> Self {
        let mut ops = other.ops.into_iter();
        if let Some(first) = ops.next() {
            self.push(first);
            self.ops.extend(ops);
        }
        self
    }

    /// Total inserted length, the document length for a document delta
    pub fn length(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| op.kind() == OpKind::Insert)
            .map(Op::len)
            .fold(0, usize::saturating_add)
    }

    /// Positions of the base document a change walks over (retain + delete)
    pub fn applied_length(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| op.kind() != OpKind::Insert)
            .map(Op::len)
            .fold(0, usize::saturating_add)
    }

    /// How much a change grows (or shrinks) the document
    pub fn change_length(&self) -> isize {
        self.ops
            .iter()
            .map(|op| match op {
                Op::Insert { .. } => isize::try_from(op.len()).unwrap_or(isize::MAX),
                Op::Delete { delete } => -isize::try_from(*delete).unwrap_or(isize::MAX),
                Op::Retain { .. } => 0,
            })
            .fold(0, isize::saturating_add)
    }

    pub fn is_document(&self) -> bool {
        self.ops.iter().all(|op| op.kind() == OpKind::Insert)
    }

    /// Ops covering positions `[start, end)`, counting every op's length
    pub fn slice(&self, start: usize, end: usize) -> Delta {
        let mut out = Delta::new();
        let mut iter = OpIterator::new(&self.ops);
        let mut index = 0;
        while index < end && iter.has_next() {
            let op = if index < start {
                iter.next_len(start - index)
            } else {
                let op = iter.next_len(end - index);
                out.push(op.clone());
                op
            };
            index += op.len();
        }
        out
    }

    /// The delta equal to applying `self`, then `other`
    pub fn compose(&self, other: &Delta) -> Delta {
        let mut this_iter = OpIterator::new(&self.ops);
        let mut other_iter = OpIterator::new(&other.ops);
        let mut delta = Delta::new();

        // A leading plain retain keeps whole inserts untouched, copy them over.
        if let Some(Op::Retain { retain, attributes }) = other_iter.peek() {
            if attributes.is_empty() {
                let mut left = *retain;
                while this_iter.peek_kind() == OpKind::Insert && this_iter.peek_length() <= left {
                    left -= this_iter.peek_length();
                    delta.push(this_iter.next_len(usize::MAX));
                }
                if retain - left > 0 {
                    other_iter.next_len(retain - left);
                }
            }
        }

        while this_iter.has_next() || other_iter.has_next() {
            if other_iter.peek_kind() == OpKind::Insert {
                delta.push(other_iter.next_len(usize::MAX));
                continue;
            }
            if this_iter.peek_kind() == OpKind::Delete {
                delta.push(this_iter.next_len(usize::MAX));
                continue;
            }
            let len = this_iter.peek_length().min(other_iter.peek_length());
            let this_op = this_iter.next_len(len);
            let other_op = other_iter.next_len(len);
            match (this_op, other_op) {
                (this_op, Op::Retain { attributes: theirs, .. }) => {
                    let new_op = match this_op {
                        Op::Retain { attributes, .. } => Op::Retain {
                            retain: len,
                            attributes: AttributeMap::compose(&attributes, &theirs, true),
                        },
                        Op::Insert { insert, attributes } => Op::Insert {
                            insert,
                            attributes: AttributeMap::compose(&attributes, &theirs, false),
                        },
                        Op::Delete { .. } => continue,
                    };
                    delta.push(new_op.clone());
                    if !other_iter.has_next() && delta.ops.last() == Some(&new_op) {
                        let rest = Delta::from_ops(this_iter.rest());
                        return delta.concat(rest).chop();
                    }
                }
                (Op::Retain { .. }, Op::Delete { delete }) => {
                    delta.push(Op::Delete { delete });
                }
                // insert followed by delete cancels out
                _ => {}
            }
        }
        delta.chop()
    }

    /// The change that turns document `self` into document `other`.
    ///
    /// Content is compared char by char (embeds flatten to one placeholder
    /// char). Equal content with different attributes becomes a retain
    /// carrying the attribute difference.
    pub fn diff(&self, other: &Delta) -> Result<Delta> {
        if self.ops == other.ops {
            return Ok(Delta::new());
        }
        let a = flatten(self, "on")?;
        let b = flatten(other, "with")?;

        let mut out = Delta::new();
        let mut this_iter = OpIterator::new(&self.ops);
        let mut other_iter = OpIterator::new(&other.ops);
        for edit in myers::diff(&a, &b) {
            match edit {
                Edit::Insert(mut n) => {
                    while n > 0 {
                        let len = other_iter.peek_length().min(n);
                        out.push(other_iter.next_len(len));
                        n -= len;
                    }
                }
                Edit::Delete(mut n) => {
                    while n > 0 {
                        let len = this_iter.peek_length().min(n);
                        this_iter.next_len(len);
                        out.push(Op::Delete { delete: len });
                        n -= len;
                    }
                }
                Edit::Equal(mut n) => {
                    while n > 0 {
                        let len = this_iter
                            .peek_length()
                            .min(other_iter.peek_length())
                            .min(n);
                        let this_op = this_iter.next_len(len);
                        let other_op = other_iter.next_len(len);
                        match (this_op, other_op) {
                            (
                                Op::Insert {
                                    insert: ours,
                                    attributes: ours_attrs,
                                },
                                Op::Insert {
                                    insert: theirs,
                                    attributes: theirs_attrs,
                                },
                            ) if ours == theirs => out.push(Op::Retain {
                                retain: len,
                                attributes: AttributeMap::diff(&ours_attrs, &theirs_attrs),
                            }),
                            (_, other_op) => {
                                out.push(other_op);
                                out.push(Op::Delete { delete: len });
                            }
                        }
                        n -= len;
                    }
                }
            }
        }
        Ok(out.chop())
    }

    /// Split a document delta into lines at each `\n`.
    ///
    /// Stops at the first non-insert op. Content after the last line break
    /// comes back as an unterminated line.
    pub fn lines(&self) -> Vec<DeltaLine> {
        let mut out = Vec::new();
        let mut line = Delta::new();
        let mut iter = OpIterator::new(&self.ops);
        while iter.has_next() {
            let Some(op) = iter.peek() else { break };
            if op.kind() != OpKind::Insert {
                return out;
            }
            let start = op.len() - iter.peek_length();
            let newline_at = match op {
                Op::Insert {
                    insert: Insert::Text(text),
                    ..
                } => text.chars().skip(start).position(|c| c == '\n'),
                _ => None,
            };
            match newline_at {
                None => line.push(iter.next_len(usize::MAX)),
                Some(0) => {
                    let newline = iter.next_len(1);
                    out.push(DeltaLine {
                        content: std::mem::take(&mut line),
                        attributes: newline.attributes().cloned().unwrap_or_default(),
                        terminated: true,
                    });
                }
                Some(n) => line.push(iter.next_len(n)),
            }
        }
        if line.length() > 0 {
            out.push(DeltaLine {
                content: line,
                attributes: AttributeMap::new(),
                terminated: false,
            });
        }
        out
    }
}

fn flatten(delta: &Delta, side: &'static str) -> Result<Vec<char>> {
    let mut out = Vec::new();
    for op in &delta.ops {
        match op {
            Op::Insert {
                insert: Insert::Text(text),
                ..
            } => out.extend(text.chars()),
            Op::Insert {
                insert: Insert::Embed(_),
                ..
            } => out.push(EMBED_CHAR),
            _ => return Err(DeltaError::NotADocument { side }),
        }
    }
    Ok(out)
}

impl FromIterator<Op> for Delta {
    fn from_iter<T: IntoIterator<Item = Op>>(iter: T) -> Self {
        Delta::from_ops(iter)
    }
}
