// SPDX-License-Identifier: AGPL-3.0-or-later
//! Renderers for each supported output format

pub mod html;
pub mod plaintext;

pub use html::HtmlRenderer;
pub use plaintext::PlainTextRenderer;
