//! Plain-text derivation of HTML bodies.

/// Derives a plain-text rendition of an HTML body.
///
/// Used when a template carries only an HTML body: the text part of the
/// outgoing message falls back to this. Total over strings; an empty or
/// unconvertible body yields a tag-stripped best effort.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    match htmd::convert(html) {
        Ok(text) => text.trim().to_string(),
        Err(_) => strip_tags(html),
    }
}

/// Minimal tag stripper: breaks on `<br>`/`</p>`, drops other tags, and
/// collapses whitespace.
fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        let after = &rest[open..];
        match after.find('>') {
            Some(close) => {
                let tag = after[1..close].trim().to_lowercase();
                if tag.starts_with("br") {
                    text.push('\n');
                } else if tag == "/p" {
                    text.push_str("\n\n");
                } else {
                    text.push(' ');
                }
                rest = &after[close + 1..];
            }
            None => {
                text.push_str(after);
                rest = "";
                break;
            }
        }
    }
    text.push_str(rest);

    let mut out = String::with_capacity(text.len());
    for part in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(html_to_text(""), "");
        assert_eq!(html_to_text("   "), "");
    }

    #[test]
    fn paragraphs_become_text() {
        let text = html_to_text("<p>Dear Ada,</p><p>Welcome aboard.</p>");
        assert!(text.contains("Dear Ada,"));
        assert!(text.contains("Welcome aboard."));
        assert!(!text.contains('<'));
    }

    #[test]
    fn strip_tags_fallback_handles_breaks() {
        assert_eq!(strip_tags("a<br/>b"), "a b");
        assert_eq!(strip_tags("<p>a</p><p>b</p>"), "a b");
        assert_eq!(strip_tags("plain"), "plain");
        assert_eq!(strip_tags("broken <tag"), "broken <tag");
    }
}
