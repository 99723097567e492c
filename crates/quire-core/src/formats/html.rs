// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTML renderer
//!
//! Lines become `<p>`, `<hN>` or `<blockquote>`. Runs of list lines share one
//! nested `<ol>`/`<ul>` structure and runs of code-block lines one `<pre>`.
//! Inline formats nest in a fixed order: code, script, bold, italic, strike,
//! underline, link, then a `<span>` for font, size and colors.

use crate::error::Result;
use crate::registry;
use crate::traits::{OutputFormat, RenderConfig, Renderer};
use crate::tree::{Block, BlockEmbed, Document, Leaf, Line};
use quire_delta::{AttrValue, AttributeMap};
use std::ops::Range;

/// Tag formats, outermost first
const INLINE_TAGS: &[&str] = &[
    "code",
    "script",
    "bold",
    "italic",
    "strike",
    "underline",
    "link",
];

/// HTML renderer
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HtmlRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Html
    }

    fn render(&self, doc: &Document, config: &RenderConfig) -> Result<String> {
        Ok(render_range(doc, 0, doc.len(), config))
    }
}

/// HTML for `[index, index + length)`.
///
/// A range inside one line, short of the whole line, gives inline markup
/// only. Otherwise every block the range touches is rendered whole, with
/// its content cut to the range.
pub fn render_range(doc: &Document, index: usize, length: usize, config: &RenderConfig) -> String {
    let mut out = String::new();
    let Some((i, offset)) = doc.find_block(index) else {
        return out;
    };
    let block = &doc.blocks()[i];
    let block_len = block.len();
    if offset + length <= block_len && !(offset == 0 && length == block_len) {
        match block {
            Block::Line(line) => {
                let to = (offset + length).min(line.content_len());
                render_inline(&mut out, line, offset, to, config);
            }
            Block::Embed(embed) if length > 0 => render_block_embed(&mut out, embed, config),
            Block::Embed(_) => {}
        }
        return out;
    }

    let end = index + length;
    for container in containers(doc) {
        let container_end = container.start + container.len;
        if container_end <= index || container.start >= end {
            continue;
        }
        let from = index.saturating_sub(container.start);
        let to = end.min(container_end) - container.start;
        render_container(&mut out, doc, &container, from, to, config);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    List,
    Code,
    Single,
}

/// Consecutive blocks rendered under one element
#[derive(Debug)]
struct Container {
    kind: ContainerKind,
    blocks: Range<usize>,
    start: usize,
    len: usize,
}

fn container_kind(block: &Block) -> ContainerKind {
    match block {
        Block::Line(line) if is_set(&line.attributes, "list") => ContainerKind::List,
        Block::Line(line) if is_set(&line.attributes, "code-block") => ContainerKind::Code,
        _ => ContainerKind::Single,
    }
}

fn containers(doc: &Document) -> Vec<Container> {
    let mut out: Vec<Container> = Vec::new();
    let mut start = 0;
    for (i, block) in doc.blocks().iter().enumerate() {
        let kind = container_kind(block);
        let len = block.len();
        match out.last_mut() {
            Some(last) if last.kind == kind && kind != ContainerKind::Single => {
                last.blocks.end = i + 1;
                last.len += len;
            }
            _ => out.push(Container {
                kind,
                blocks: i..i + 1,
                start,
                len,
            }),
        }
        start += len;
    }
    out
}

fn render_container(
    out: &mut String,
    doc: &Document,
    container: &Container,
    from: usize,
    to: usize,
    config: &RenderConfig,
) {
    let blocks = &doc.blocks()[container.blocks.clone()];
    match container.kind {
        ContainerKind::Single => match &blocks[0] {
            Block::Line(line) => render_line(out, line, from, to, config),
            Block::Embed(embed) => render_block_embed(out, embed, config),
        },
        ContainerKind::Code => {
            let text = blocks
                .iter()
                .filter_map(Block::as_line)
                .map(Line::text)
                .collect::<Vec<_>>()
                .join("\n");
            let code: String = text.chars().skip(from).take(to - from).collect();
            out.push_str("<pre>\n");
            out.push_str(&escape(&code));
            out.push_str("\n</pre>");
        }
        ContainerKind::List => {
            let mut items = Vec::new();
            let mut start = 0;
            for line in blocks.iter().filter_map(Block::as_line) {
                let len = line.len();
                if start < to && start + len > from {
                    items.push(ListItem {
                        line,
                        from: from.saturating_sub(start),
                        to: (to - start).min(len),
                        indent: line
                            .attributes
                            .get("indent")
                            .and_then(AttrValue::as_i64)
                            .unwrap_or(0),
                        kind: line
                            .attributes
                            .get("list")
                            .map(ToString::to_string)
                            .unwrap_or_default(),
                    });
                }
                start += len;
            }
            let mut kinds = Vec::new();
            render_list(out, &items, -1, &mut kinds, config);
        }
    }
}

fn line_tag(attributes: &AttributeMap) -> String {
    if let Some(level) = attributes.get("header").and_then(AttrValue::as_i64) {
        if (1..=6).contains(&level) {
            return format!("h{level}");
        }
    }
    if is_set(attributes, "blockquote") {
        return "blockquote".to_string();
    }
    "p".to_string()
}

fn line_classes(attributes: &AttributeMap, prefix: &str) -> Vec<String> {
    let mut classes = Vec::new();
    for name in ["align", "direction", "indent"] {
        if let Some(value) = attributes.get(name).filter(|v| !v.is_unset()) {
            classes.push(format!("{prefix}{name}-{value}"));
        }
    }
    classes
}

fn render_line(out: &mut String, line: &Line, from: usize, to: usize, config: &RenderConfig) {
    let tag = line_tag(&line.attributes);
    let classes = line_classes(&line.attributes, &config.class_prefix);
    out.push('<');
    out.push_str(&tag);
    if !classes.is_empty() {
        out.push_str(" class=\"");
        out.push_str(&escape(&classes.join(" ")));
        out.push('"');
    }
    out.push('>');
    render_line_content(out, line, from, to, config);
    out.push_str("</");
    out.push_str(&tag);
    out.push('>');
}

fn render_line_content(out: &mut String, line: &Line, from: usize, to: usize, config: &RenderConfig) {
    if line.is_empty() {
        out.push_str("<br>");
    } else {
        render_inline(out, line, from, to.min(line.content_len()), config);
    }
}

struct ListItem<'a> {
    line: &'a Line,
    from: usize,
    to: usize,
    indent: i64,
    kind: String,
}

fn list_tag(kind: &str) -> (&'static str, &'static str) {
    let tag = if kind == "ordered" { "ol" } else { "ul" };
    match kind {
        "checked" => (tag, " data-list=\"checked\""),
        "unchecked" => (tag, " data-list=\"unchecked\""),
        _ => (tag, ""),
    }
}

/// Nest list items by indent. Each level remembers its list kind so a kind
/// change at the same level closes one list and opens the next.
fn render_list(
    out: &mut String,
    items: &[ListItem<'_>],
    last_indent: i64,
    kinds: &mut Vec<String>,
    config: &RenderConfig,
) {
    let Some((item, rest)) = items.split_first() else {
        let (end_tag, _) = list_tag(&kinds.pop().unwrap_or_default());
        out.push_str("</li></");
        out.push_str(end_tag);
        out.push('>');
        if last_indent > 0 {
            render_list(out, &[], last_indent - 1, kinds, config);
        }
        return;
    };

    let (tag, attribute) = list_tag(&item.kind);
    if item.indent > last_indent {
        kinds.push(item.kind.clone());
        out.push('<');
        out.push_str(tag);
        out.push_str("><li");
        if item.indent == last_indent + 1 {
            out.push_str(attribute);
            out.push('>');
            render_line_content(out, item.line, item.from, item.to, config);
            render_list(out, rest, item.indent, kinds, config);
        } else {
            out.push('>');
            render_list(out, items, last_indent + 1, kinds, config);
        }
        return;
    }

    if item.indent == last_indent && kinds.last() == Some(&item.kind) {
        out.push_str("</li><li");
        out.push_str(attribute);
        out.push('>');
        render_line_content(out, item.line, item.from, item.to, config);
        render_list(out, rest, item.indent, kinds, config);
        return;
    }

    let (end_tag, _) = list_tag(&kinds.pop().unwrap_or_default());
    out.push_str("</li></");
    out.push_str(end_tag);
    out.push('>');
    render_list(out, items, last_indent - 1, kinds, config);
}

fn is_set(attributes: &AttributeMap, name: &str) -> bool {
    registry::is_set(attributes.get(name))
}

fn set_value<'a>(leaf: &'a Leaf, name: &str) -> Option<&'a AttrValue> {
    leaf.attributes().get(name).filter(|v| !v.is_unset())
}

/// Split `leaves` into maximal runs with equal `key`
fn group_by<'a, K: PartialEq>(
    leaves: &'a [Leaf],
    key: impl Fn(&'a Leaf) -> K,
) -> Vec<(K, &'a [Leaf])> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..=leaves.len() {
        if i == leaves.len() || key(&leaves[i]) != key(&leaves[start]) {
            groups.push((key(&leaves[start]), &leaves[start..i]));
            start = i;
        }
    }
    groups
}

fn render_inline(out: &mut String, line: &Line, from: usize, to: usize, config: &RenderConfig) {
    if from >= to {
        return;
    }
    let leaves: Vec<Leaf> = line
        .leaves_in(from, to)
        .into_iter()
        .map(|(start, leaf)| {
            let begin = from.saturating_sub(start);
            let end = (to - start).min(leaf.len());
            leaf.slice(begin, end)
        })
        .collect();
    render_runs(out, &leaves, 0, config);
}

fn render_runs(out: &mut String, leaves: &[Leaf], depth: usize, config: &RenderConfig) {
    let Some(name) = INLINE_TAGS.get(depth) else {
        render_styled(out, leaves, config);
        return;
    };
    for (value, group) in group_by(leaves, |leaf| set_value(leaf, name)) {
        match value {
            Some(value) => {
                let close = open_tag(out, name, value);
                render_runs(out, group, depth + 1, config);
                out.push_str(close);
            }
            None => render_runs(out, group, depth + 1, config),
        }
    }
}

/// Write the opening tag for an inline format, returning the closing tag
fn open_tag(out: &mut String, name: &str, value: &AttrValue) -> &'static str {
    match name {
        "code" => {
            out.push_str("<code>");
            "</code>"
        }
        "script" if value.as_str() == Some("sub") => {
            out.push_str("<sub>");
            "</sub>"
        }
        "script" => {
            out.push_str("<sup>");
            "</sup>"
        }
        "bold" => {
            out.push_str("<strong>");
            "</strong>"
        }
        "italic" => {
            out.push_str("<em>");
            "</em>"
        }
        "strike" => {
            out.push_str("<s>");
            "</s>"
        }
        "underline" => {
            out.push_str("<u>");
            "</u>"
        }
        _ => {
            out.push_str("<a href=\"");
            out.push_str(&escape(&value.to_string()));
            out.push_str("\" rel=\"noopener noreferrer\" target=\"_blank\">");
            "</a>"
        }
    }
}

/// Font, size and colors of a leaf, as span class and style
fn span_key(leaf: &Leaf, prefix: &str) -> (Vec<String>, String) {
    let mut classes = Vec::new();
    for name in ["font", "size"] {
        if let Some(value) = set_value(leaf, name) {
            classes.push(format!("{prefix}{name}-{value}"));
        }
    }
    let mut style = String::new();
    if let Some(value) = set_value(leaf, "color") {
        style.push_str(&format!("color: {value};"));
    }
    if let Some(value) = set_value(leaf, "background") {
        if !style.is_empty() {
            style.push(' ');
        }
        style.push_str(&format!("background-color: {value};"));
    }
    (classes, style)
}

fn render_styled(out: &mut String, leaves: &[Leaf], config: &RenderConfig) {
    for ((classes, style), group) in group_by(leaves, |leaf| span_key(leaf, &config.class_prefix)) {
        let styled = !classes.is_empty() || !style.is_empty();
        if styled {
            out.push_str("<span");
            if !classes.is_empty() {
                out.push_str(" class=\"");
                out.push_str(&escape(&classes.join(" ")));
                out.push('"');
            }
            if !style.is_empty() {
                out.push_str(" style=\"");
                out.push_str(&escape(&style));
                out.push('"');
            }
            out.push('>');
        }
        for leaf in group {
            render_leaf(out, leaf, config);
        }
        if styled {
            out.push_str("</span>");
        }
    }
}

fn push_attribute(out: &mut String, attributes: &AttributeMap, name: &str) {
    if let Some(value) = attributes.get(name).filter(|v| !v.is_unset()) {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(&value.to_string()));
        out.push('"');
    }
}

fn render_leaf(out: &mut String, leaf: &Leaf, config: &RenderConfig) {
    match leaf {
        Leaf::Text(run) => out.push_str(&escape(&run.text)),
        Leaf::Embed(e) if e.embed.kind == "image" => {
            out.push_str("<img src=\"");
            out.push_str(&escape(&e.embed.value_text()));
            out.push('"');
            for name in ["alt", "width", "height"] {
                push_attribute(out, &e.attributes, name);
            }
            out.push('>');
        }
        Leaf::Embed(e) => {
            out.push_str("<span class=\"");
            out.push_str(&escape(&format!("{}{}", config.class_prefix, e.embed.kind)));
            out.push_str("\" data-value=\"");
            out.push_str(&escape(&e.embed.value_text()));
            out.push_str("\"></span>");
        }
    }
}

fn render_block_embed(out: &mut String, embed: &BlockEmbed, config: &RenderConfig) {
    let prefix = &config.class_prefix;
    if embed.embed.kind == "video" {
        out.push_str("<iframe class=\"");
        let mut class = format!("{prefix}video");
        if let Some(align) = embed.attributes.get("align").filter(|v| !v.is_unset()) {
            class.push_str(&format!(" {prefix}align-{align}"));
        }
        out.push_str(&escape(&class));
        out.push_str("\" frameborder=\"0\" allowfullscreen=\"true\" src=\"");
        out.push_str(&escape(&embed.embed.value_text()));
        out.push('"');
        for name in ["width", "height"] {
            push_attribute(out, &embed.attributes, name);
        }
        out.push_str("></iframe>");
        return;
    }
    let mut classes = vec![format!("{prefix}{}", embed.embed.kind)];
    classes.extend(line_classes(&embed.attributes, prefix));
    out.push_str("<div class=\"");
    out.push_str(&escape(&classes.join(" ")));
    out.push_str("\" data-value=\"");
    out.push_str(&escape(&embed.embed.value_text()));
    out.push_str("\"></div>");
}

/// Escape text for element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
