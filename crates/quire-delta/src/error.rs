// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error type for delta algebra

/// Failures of delta operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeltaError {
    /// `diff` only accepts deltas made of inserts
    #[error("diff called {side} a delta that is not a document")]
    NotADocument { side: &'static str },

    #[error("invalid embed: {0}")]
    InvalidEmbed(String),
}

pub type Result<T> = std::result::Result<T, DeltaError>;
