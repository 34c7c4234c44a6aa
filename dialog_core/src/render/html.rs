//! HTML output for browser-hosted presentation layers.

use super::{Block, Inline, Marker, StructuredContent, LINK_INDICATOR};

fn escape(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

fn push_inlines(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => escape(text, out),
            Inline::Strong(children) => {
                out.push_str("<strong>");
                push_inlines(out, children);
                out.push_str("</strong>");
            }
            Inline::Link { label, href } => {
                out.push_str("<a href=\"");
                escape(href, out);
                out.push_str("\" target=\"_blank\" rel=\"noopener\" class=\"chat-link\">");
                escape(label, out);
                out.push(' ');
                out.push_str(LINK_INDICATOR);
                out.push_str("</a>");
            }
            Inline::Marker(marker) => {
                let class = match marker {
                    Marker::Bullet => "bullet",
                    Marker::Checkmark => "checkmark",
                };
                out.push_str("<span class=\"");
                out.push_str(class);
                out.push_str("\">");
                out.push(marker.glyph());
                out.push_str("</span>");
            }
        }
    }
}

impl StructuredContent {
    /// Markup for a chat bubble. All authored text is escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Line(inlines) => push_inlines(&mut out, inlines),
                Block::ContactItem { icon, content } => {
                    out.push_str("<div class=\"contact-item\"><span class=\"contact-icon\">");
                    escape(icon, &mut out);
                    out.push_str("</span><span class=\"contact-content\">");
                    push_inlines(&mut out, content);
                    out.push_str("</span></div>");
                }
                Block::Break => out.push_str("<br>"),
            }
        }
        out
    }
}
