// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for the editor, the registry and tree validation

use quire_delta::DeltaError;

/// Errors surfaced by editor operations
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("range {index}..{} is outside the document (length {doc_length})", .index + .length)]
    OutOfRange {
        index: usize,
        length: usize,
        doc_length: usize,
    },

    /// A change walks past the document end or carries an embed nobody
    /// registered. Ops applied before the bad one stay applied.
    #[error("malformed delta: {0}")]
    MalformedLinearForm(String),

    #[error("delta error: {0}")]
    Delta(#[from] DeltaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors from building or querying a format registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    #[error("unknown base registry: {0}")]
    UnknownBase(String),

    #[error("invalid registry config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A broken structural rule, found by [`crate::tree::Document::validate`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("document has no blocks")]
    EmptyDocument,

    #[error("block {block}: empty text run at leaf {leaf}")]
    EmptyTextRun { block: usize, leaf: usize },

    #[error("block {block}: leaves {leaf} and {} should have been merged", .leaf + 1)]
    UnmergedRuns { block: usize, leaf: usize },

    #[error("block {block}: text run contains a line break")]
    BreakInText { block: usize },

    #[error("block {block}: line holds block embed `{kind}`")]
    BlockEmbedInLine { block: usize, kind: String },

    #[error("block {block}: unset attribute `{name}` kept in the tree")]
    UnsetAttribute { block: usize, name: String },
}
