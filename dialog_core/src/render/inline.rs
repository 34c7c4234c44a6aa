//! Inline pass: links and bold spans within one line.

use super::Inline;

fn flush(buf: &mut String, out: &mut Vec<Inline>) {
    if !buf.is_empty() {
        out.push(Inline::Text(std::mem::take(buf)));
    }
}

/// Match `[label](href)` at the start of `text`, returning the consumed length.
fn link(text: &str) -> Option<(&str, &str, usize)> {
    let body = text.strip_prefix('[')?;
    let close = body.find(']')?;
    if close == 0 {
        return None;
    }
    let target = body[close + 1..].strip_prefix('(')?;
    let end = target.find(')')?;
    if end == 0 {
        return None;
    }
    // '[' + label + "](" + href + ')'
    let consumed = 1 + close + 2 + end + 1;
    Some((&body[..close], &target[..end], consumed))
}

pub(crate) fn parse_inline(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if ch == '[' {
            if let Some((label, href, consumed)) = link(rest) {
                flush(&mut buf, &mut out);
                out.push(Inline::Link {
                    label: label.to_string(),
                    href: href.to_string(),
                });
                rest = &rest[consumed..];
                continue;
            }
        }

        if let Some(after) = rest.strip_prefix("**") {
            if let Some(end) = after.find("**") {
                flush(&mut buf, &mut out);
                out.push(Inline::Strong(parse_inline(&after[..end])));
                rest = &after[end + 2..];
                continue;
            }
        }

        buf.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    flush(&mut buf, &mut out);
    out
}
