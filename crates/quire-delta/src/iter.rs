// SPDX-License-Identifier: AGPL-3.0-or-later
//! Cursor over a slice of ops that can hand out partial ops

use crate::attributes::AttributeMap;
use crate::op::{Op, OpKind};

/// Walks ops, splitting them on demand.
///
/// Past the end the iterator behaves like an endless plain retain, which is
/// what compose relies on.
#[derive(Debug, Clone)]
pub struct OpIterator<'a> {
    ops: &'a [Op],
    index: usize,
    offset: usize,
}

impl<'a> OpIterator<'a> {
    pub fn new(ops: &'a [Op]) -> Self {
        Self {
            ops,
            index: 0,
            offset: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.peek_length() < usize::MAX
    }

    pub fn peek(&self) -> Option<&'a Op> {
        self.ops.get(self.index)
    }

    /// Remaining length of the current op, `usize::MAX` when exhausted
    pub fn peek_length(&self) -> usize {
        match self.ops.get(self.index) {
            Some(op) => op.len() - self.offset,
            None => usize::MAX,
        }
    }

    pub fn peek_kind(&self) -> OpKind {
        self.ops.get(self.index).map_or(OpKind::Retain, Op::kind)
    }

    /// Take up to `len` positions of the current op
    pub fn next_len(&mut self, len: usize) -> Op {
        let Some(op) = self.ops.get(self.index) else {
            return Op::Retain {
                retain: usize::MAX,
                attributes: AttributeMap::new(),
            };
        };
        let op_len = op.len();
        let offset = self.offset;
        let take = len.min(op_len - offset);
        if take == op_len - offset {
            self.index += 1;
            self.offset = 0;
        } else {
            self.offset += take;
        }
        if offset == 0 && take == op_len {
            op.clone()
        } else {
            op.slice(offset, take)
        }
    }

    /// Ops not consumed yet, the current one trimmed to its remainder
    pub fn rest(&self) -> Vec<Op> {
        if !self.has_next() {
            return Vec::new();
        }
        if self.offset == 0 {
            return self.ops[self.index..].to_vec();
        }
        let mut it = self.clone();
        let mut out = vec![it.next_len(usize::MAX)];
        out.extend_from_slice(&self.ops[it.index..]);
        out
    }
}

impl Iterator for OpIterator<'_> {
    type Item = Op;

    fn next(&mut self) -> Option<Op> {
        if self.has_next() {
            Some(self.next_len(usize::MAX))
        } else {
            None
        }
    }
}
