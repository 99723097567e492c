// SPDX-License-Identifier: AGPL-3.0-or-later
//! Quire Core - Rich-text document tree kept in sync with a delta
//!
//! This crate provides:
//! - A format registry mapping names to capabilities, loadable from TOML
//! - A document tree of lines, leaves and block embeds
//! - Editing operations that keep the tree normalized and return the change
//! - Delta reconciliation for changes and inserted fragments
//! - Format queries and HTML / plain text rendering

pub mod editor;
pub mod error;
pub mod formats;
pub mod normalize;
pub mod query;
mod reconcile;
pub mod registry;
pub mod traits;
pub mod tree;

pub use editor::Editor;
pub use error::{EditorError, InvariantViolation, RegistryError, Result};
pub use query::{FormatValue, Formats};
pub use registry::{Capability, Registry};
pub use traits::{OutputFormat, RenderConfig, Renderer, RendererExt};
pub use tree::{Block, BlockEmbed, Document, InlineEmbed, Leaf, Line, TextRun};

pub use quire_delta::{AttrValue, AttributeMap, Delta, Embed};
