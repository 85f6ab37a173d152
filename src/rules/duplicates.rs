use once_cell::sync::Lazy;
use regex::Regex;

use super::Rule;
use crate::page::Page;

static BREADCRUMB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<div class="breadcrumb">.*?</div>"#).expect("Failed to compile breadcrumb pattern")
});

static BACK_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a href="index\.html#tools"[^>]*class="back-link"[^>]*>.*?Back to All Tools.*?</a>"#)
        .expect("Failed to compile back link pattern")
});

static RELATED_TOOLS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<section[^>]*class="related-tools"[^>]*>.*?</section>"#)
        .expect("Failed to compile related tools pattern")
});

/// Keeps the first occurrence of a structural block and drops the rest.
pub struct KeepFirst {
    name: &'static str,
    pattern: &'static Regex,
}

impl KeepFirst {
    pub fn breadcrumb() -> Self {
        Self {
            name: "dedupe-breadcrumb",
            pattern: &BREADCRUMB,
        }
    }

    pub fn back_link() -> Self {
        Self {
            name: "dedupe-back-link",
            pattern: &BACK_LINK,
        }
    }

    pub fn related_tools() -> Self {
        Self {
            name: "dedupe-related-tools",
            pattern: &RELATED_TOOLS,
        }
    }
}

impl Rule for KeepFirst {
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, content: &str, _page: &Page) -> Option<String> {
        let matches: Vec<_> = self.pattern.find_iter(content).collect();
        if matches.len() < 2 {
            return None;
        }

        tracing::debug!(rule = self.name, found = matches.len(), "removing duplicate blocks");

        let mut out = String::with_capacity(content.len());
        let mut last = matches[0].end();
        out.push_str(&content[..last]);
        for m in &matches[1..] {
            out.push_str(&content[last..m.start()]);
            last = m.end();
        }
        out.push_str(&content[last..]);

        Some(out)
    }
}
