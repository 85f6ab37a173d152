use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::Rule;
use crate::page::Page;

const WRAPPER_MARKER: &str = "tool-card-wrapper";

const WRAPPER_OPEN: &str =
    r#"<div class="container tool-card-wrapper" style="padding: 4rem 1.5rem;">"#;

const CARD_OPEN: &str = r#"<div style="max-width: 800px; margin: 0 auto; background: white; padding: 3rem; border-radius: var(--radius-2xl); border: 2px solid var(--gray-200); box-shadow: var(--shadow-lg);">"#;

// Body interior up to the footer, or the end of the body when there is none.
static BODY_INTERIOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)(<body[^>]*>)(.*?)(<footer|</body>)").expect("Failed to compile body pattern")
});

static WRAPPER_OPEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<div\s+class="container\s+tool-card-wrapper"[^>]*>\s*"#)
        .expect("Failed to compile wrapper pattern")
});

static CONTAINER_SM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<div\s+class="container-sm"\s*>\s*"#)
        .expect("Failed to compile container-sm pattern")
});

static CARD_OPEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<div\s+style="[^"]*max-width:\s*800px[^"]*background:\s*white[^"]*"\s*>\s*"#)
        .expect("Failed to compile white card pattern")
});

static FOOTER_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<footer\s+class="footer""#).expect("Failed to compile footer pattern")
});

static BODY_END_ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</body>").expect("Failed to compile body end pattern"));

/// Wraps the body interior in the tool card container.
pub struct WrapCard;

impl Rule for WrapCard {
    fn name(&self) -> &'static str {
        "wrap-card"
    }

    fn apply(&self, content: &str, page: &Page) -> Option<String> {
        if content.contains(WRAPPER_MARKER) || page.is_index() {
            return None;
        }
        if !BODY_INTERIOR.is_match(content) {
            return None;
        }

        let wrapped = BODY_INTERIOR.replacen(content, 1, |caps: &Captures| {
            format!(
                "{body}\n    {outer}\n        {card}\n            {inner}\n        </div>\n    </div>\n    {end}",
                body = &caps[1],
                outer = WRAPPER_OPEN,
                card = CARD_OPEN,
                inner = &caps[2],
                end = &caps[3],
            )
        });

        Some(wrapped.into_owned())
    }
}

/// Strips the tool card, `container-sm` and white card wrappers along with the
/// matching closing tags in front of the footer.
pub struct UnwrapCard;

impl Rule for UnwrapCard {
    fn name(&self) -> &'static str {
        "unwrap-card"
    }

    fn apply(&self, content: &str, _page: &Page) -> Option<String> {
        let mut removed = 0;
        let mut current = content.to_string();

        for pattern in [&*WRAPPER_OPEN_PATTERN, &*CONTAINER_SM_PATTERN, &*CARD_OPEN_PATTERN] {
            let count = pattern.find_iter(&current).count();
            if count > 0 {
                removed += count;
                current = pattern.replace_all(&current, "").into_owned();
            }
        }

        if removed == 0 {
            return None;
        }

        let anchor = FOOTER_ANCHOR
            .find(&current)
            .or_else(|| BODY_END_ANCHOR.find(&current))
            .map(|m| m.start());

        match anchor {
            Some(anchor) => Some(strip_closing_divs(&current, anchor, removed)),
            None => {
                tracing::debug!("no footer or body end found; closing tags left in place");
                Some(current)
            }
        }
    }
}

/// Remove up to `count` `</div>` tags sitting directly in front of `anchor`,
/// separated only by whitespace.
fn strip_closing_divs(content: &str, anchor: usize, count: usize) -> String {
    const CLOSE: &[u8] = b"</div>";

    let head = &content[..anchor];
    let mut cut = head.len();
    let mut stripped = 0;

    while stripped < count {
        let trimmed = head[..cut].trim_end();
        let bytes = trimmed.as_bytes();
        if bytes.len() >= CLOSE.len() && bytes[bytes.len() - CLOSE.len()..].eq_ignore_ascii_case(CLOSE) {
            cut = trimmed.len() - CLOSE.len();
            stripped += 1;
        } else {
            break;
        }
    }

    if stripped < count {
        tracing::debug!(expected = count, found = stripped, "fewer closing tags than wrappers");
    }
    if stripped == 0 {
        return content.to_string();
    }

    format!("{}\n{}", head[..cut].trim_end(), &content[anchor..])
}
