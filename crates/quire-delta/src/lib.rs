// SPDX-License-Identifier: AGPL-3.0-or-later
//! Quire Delta - attributed operation sequences
//!
//! This crate provides:
//! - Attribute maps with compose and diff
//! - Insert, retain and delete ops over text and embeds
//! - Canonical deltas with compose, diff, slice and line splitting
//! - A standalone Myers diff over chars

pub mod attributes;
pub mod delta;
pub mod error;
pub mod iter;
pub mod myers;
pub mod op;

pub use attributes::{AttrValue, AttributeMap};
pub use delta::{Delta, DeltaLine};
pub use error::{DeltaError, Result};
pub use iter::OpIterator;
pub use op::{Embed, Insert, Op, OpKind};
