//! Line classification - the first pass of the renderer.

use regex::Regex;
use std::sync::LazyLock;

use super::Marker;

/// Non-ASCII emoji glyph (optionally with a presentation selector), then a bold label.
static CONTACT_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<icon>[\p{Emoji}&&[^\p{ASCII}]]\x{FE0F}?)\s*\*\*(?P<label>.+?)\*\*(?P<rest>.*)$")
        .unwrap()
});

/// What a single authored line renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    /// Icon column plus content column, e.g. a phone or email line.
    ContactItem {
        icon: &'a str,
        label: &'a str,
        rest: &'a str,
    },
    /// Bullet or checkmark line; `lead` is the whitespace before the glyph.
    Marked {
        lead: &'a str,
        marker: Marker,
        rest: &'a str,
    },
    Plain(&'a str),
}

pub(crate) fn classify(line: &str) -> LineKind<'_> {
    if let Some(caps) = CONTACT_ITEM.captures(line) {
        if let (Some(icon), Some(label), Some(rest)) =
            (caps.name("icon"), caps.name("label"), caps.name("rest"))
        {
            return LineKind::ContactItem {
                icon: icon.as_str(),
                label: label.as_str(),
                rest: rest.as_str(),
            };
        }
    }

    let body = line.trim_start();
    let lead = &line[..line.len() - body.len()];
    for marker in [Marker::Bullet, Marker::Checkmark] {
        if let Some(rest) = body.strip_prefix(marker.glyph()) {
            return LineKind::Marked { lead, marker, rest };
        }
    }

    LineKind::Plain(line)
}
