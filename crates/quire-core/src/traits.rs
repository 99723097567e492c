// SPDX-License-Identifier: AGPL-3.0-or-later
//! Renderer trait for output formats

use crate::error::Result;
use crate::tree::Document;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Output formats a document can be rendered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    PlainText,
}

/// Configuration for rendering
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Prefix of generated CSS classes (default: "ql-")
    pub class_prefix: String,
    /// Written after every line in plain text output
    pub line_separator: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            class_prefix: "ql-".to_string(),
            line_separator: "\n".to_string(),
        }
    }
}

/// Renderer trait: turn a document tree into a target format
pub trait Renderer: Send + Sync {
    /// The target format this renderer produces
    fn format(&self) -> OutputFormat;

    /// Render a Document to a string
    fn render(&self, doc: &Document, config: &RenderConfig) -> Result<String>;
}

/// Extension trait for streaming operations (not dyn-compatible)
pub trait RendererExt: Renderer {
    /// Render to a writer
    fn render_writer<W: Write>(
        &self,
        doc: &Document,
        writer: &mut W,
        config: &RenderConfig,
    ) -> Result<()> {
        let output = self.render(doc, config)?;
        writer.write_all(output.as_bytes())?;
        Ok(())
    }
}

impl<T: Renderer> RendererExt for T {}
