//! Text Renderer - turns authored text into structured display content.
//!
//! The markup dialect is small:
//! - `[label](url)` external link
//! - `**bold**` strong span
//! - a line starting with an emoji glyph and a bold label becomes a contact item
//! - a line starting with `•` or `✓` gets its glyph styled
//!
//! Rendering runs in two passes. Each line is classified first, then the
//! inline pass picks out links and bold spans. Lines are separated by explicit
//! breaks, except that one break on either side of a contact item is dropped
//! so the block sits flush against its neighbours.

mod html;
mod inline;
mod line;

use serde::{Deserialize, Serialize};

use inline::parse_inline;
use line::{classify, LineKind};

/// Appended to link labels to mark that they leave the conversation.
pub const LINK_INDICATOR: &str = "→";

/// Glyphs that get a styled span at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Bullet,
    Checkmark,
}

impl Marker {
    pub fn glyph(&self) -> char {
        match self {
            Marker::Bullet => '•',
            Marker::Checkmark => '✓',
        }
    }
}

/// Inline content within a line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    /// Opens in a new browsing context.
    Link { label: String, href: String },
    Marker(Marker),
}

/// Block-level content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Block {
    Line(Vec<Inline>),
    ContactItem { icon: String, content: Vec<Inline> },
    Break,
}

/// Rendered message, ready for a presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuredContent {
    pub blocks: Vec<Block>,
}

impl StructuredContent {
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|block| *block == Block::Break)
    }

    /// Text-only form for terminals and transcripts.
    ///
    /// Markup-free input comes back unchanged. Links show their target in
    /// parentheses and each contact item sits on its own line.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        let mut prev: Option<&Block> = None;

        for block in &self.blocks {
            let after_contact = matches!(prev, Some(Block::ContactItem { .. }));
            match block {
                Block::Break => out.push('\n'),
                Block::Line(inlines) => {
                    if after_contact {
                        out.push('\n');
                    }
                    push_plain(&mut out, inlines);
                }
                Block::ContactItem { icon, content } => {
                    if matches!(prev, Some(Block::Line(_) | Block::ContactItem { .. })) {
                        out.push('\n');
                    }
                    out.push_str(icon);
                    out.push(' ');
                    push_plain(&mut out, content);
                }
            }
            prev = Some(block);
        }

        out
    }
}

fn push_plain(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(text),
            Inline::Strong(children) => push_plain(out, children),
            Inline::Link { label, href } => {
                out.push_str(label);
                out.push_str(" (");
                out.push_str(href);
                out.push(')');
            }
            Inline::Marker(marker) => out.push(marker.glyph()),
        }
    }
}

fn render_line(line: &str) -> Block {
    match classify(line) {
        LineKind::ContactItem { icon, label, rest } => {
            let mut content = vec![Inline::Strong(parse_inline(label))];
            content.extend(parse_inline(rest));
            Block::ContactItem {
                icon: icon.to_string(),
                content,
            }
        }
        LineKind::Marked { lead, marker, rest } => {
            let mut inlines = Vec::new();
            if !lead.is_empty() {
                inlines.push(Inline::Text(lead.to_string()));
            }
            inlines.push(Inline::Marker(marker));
            inlines.extend(parse_inline(rest));
            Block::Line(inlines)
        }
        LineKind::Plain(text) => Block::Line(parse_inline(text)),
    }
}

/// Drop the break directly before each contact item, then the break directly after.
fn suppress_breaks(blocks: Vec<Block>) -> Vec<Block> {
    let mut before = Vec::with_capacity(blocks.len());
    let mut iter = blocks.into_iter().peekable();
    while let Some(block) = iter.next() {
        if block == Block::Break && matches!(iter.peek(), Some(Block::ContactItem { .. })) {
            continue;
        }
        before.push(block);
    }

    let mut out = Vec::with_capacity(before.len());
    let mut prev_contact = false;
    for block in before {
        let is_contact = matches!(block, Block::ContactItem { .. });
        if !(block == Block::Break && prev_contact) {
            out.push(block);
        }
        prev_contact = is_contact;
    }
    out
}

/// Render authored text. Pure and deterministic.
pub fn render(text: &str) -> StructuredContent {
    let mut blocks = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            blocks.push(Block::Break);
        }
        match render_line(line) {
            Block::Line(inlines) if inlines.is_empty() => {}
            block => blocks.push(block),
        }
    }

    StructuredContent {
        blocks: suppress_breaks(blocks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn strong(s: &str) -> Inline {
        Inline::Strong(vec![text(s)])
    }

    #[test]
    fn test_plain_lines_and_breaks() {
        let content = render("Hello\n\nWorld");
        assert_eq!(
            content.blocks,
            vec![
                Block::Line(vec![text("Hello")]),
                Block::Break,
                Block::Break,
                Block::Line(vec![text("World")]),
            ]
        );
    }

    #[test]
    fn test_plain_text_round_trip() {
        for sample in [
            "Hi 👋 Welcome! How can we help you today?",
            "Line one\nLine two\n\n\nLine five",
            "• 500+ Projects Completed\n  ✓ indented check\n",
            "",
            "Prices: *indicative* only [draft]",
        ] {
            assert_eq!(render(sample).plain_text(), sample);
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let sample = "**Call Us** 📞\n\n☎️ **Phone:** +91 98765 43210\n[Map](https://maps.example)";
        let first = render(sample);
        for _ in 0..3 {
            assert_eq!(render(sample), first);
        }
        assert_eq!(first.to_html(), render(sample).to_html());
    }

    #[test]
    fn test_marker_lines() {
        let content = render("✓ Personalized design consultation");
        assert_eq!(
            content.blocks,
            vec![Block::Line(vec![
                Inline::Marker(Marker::Checkmark),
                text(" Personalized design consultation"),
            ])]
        );
    }

    #[test]
    fn test_contact_items_suppress_adjacent_breaks() {
        let content = render("You can reach us through:\n\n📞 **Call:** +91 1\n📧 **Email:** a@b.c\n\nOr visit.");

        assert_eq!(
            content.blocks,
            vec![
                Block::Line(vec![text("You can reach us through:")]),
                Block::Break,
                Block::ContactItem {
                    icon: "📞".to_string(),
                    content: vec![strong("Call:"), text(" +91 1")],
                },
                Block::ContactItem {
                    icon: "📧".to_string(),
                    content: vec![strong("Email:"), text(" a@b.c")],
                },
                Block::Break,
                Block::Line(vec![text("Or visit.")]),
            ]
        );
    }

    #[test]
    fn test_contact_item_plain_text_on_own_lines() {
        let content = render("Reach us:\n📞 **Call:** 1\n📧 **Email:** 2\nThanks");
        assert_eq!(content.plain_text(), "Reach us:\n📞 Call: 1\n📧 Email: 2\nThanks");
    }

    #[test]
    fn test_link_plain_text() {
        let content = render("[Click here](contact.html)");
        assert_eq!(content.plain_text(), "Click here (contact.html)");
    }

    #[test]
    fn test_is_empty() {
        assert!(render("").is_empty());
        assert!(render("\n\n").is_empty());
        assert!(!render("x").is_empty());
    }

    #[test]
    fn test_serializes_tagged() {
        let json = serde_json::to_value(render("**Hi**")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "blocks": [
                    { "type": "line", "value": [
                        { "type": "strong", "value": [{ "type": "text", "value": "Hi" }] }
                    ]}
                ]
            })
        );
    }
}
