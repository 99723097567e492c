// SPDX-License-Identifier: AGPL-3.0-or-later
//! Plain text renderer

use crate::error::Result;
use crate::traits::{OutputFormat, RenderConfig, Renderer};
use crate::tree::{Block, Document};

/// Plain text renderer: line text, one separator per line, embeds dropped
pub struct PlainTextRenderer;

impl PlainTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::PlainText
    }

    fn render(&self, doc: &Document, config: &RenderConfig) -> Result<String> {
        let mut output = String::new();
        for block in doc.blocks() {
            if let Block::Line(line) = block {
                output.push_str(&line.text());
                output.push_str(&config.line_separator);
            }
        }
        Ok(output)
    }
}
