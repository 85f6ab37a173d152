use regex::{Captures, Regex};

use super::Rule;
use crate::config::StylesheetConfig;
use crate::error::PagefixResult;
use crate::page::Page;

/// Points `<link>` tags at the consolidated stylesheet, with a relative prefix
/// that matches the page's nesting depth.
pub struct StylesheetLink {
    legacy_link: Regex,
    consolidated_href: Regex,
    consolidated: String,
}

impl StylesheetLink {
    pub fn new(config: &StylesheetConfig) -> PagefixResult<Self> {
        let legacy = regex::escape(&config.legacy);
        let consolidated = regex::escape(&config.consolidated);

        let legacy_link = Regex::new(&format!(
            r#"(?i)<link\b[^>]*\bhref\s*=\s*"(?:\./)?(?:\.\./)*{legacy}"[^>]*>"#
        ))?;
        let consolidated_href = Regex::new(&format!(
            r#"(?i)\bhref="((?:\./)?(?:\.\./)*){consolidated}""#
        ))?;

        Ok(Self {
            legacy_link,
            consolidated_href,
            consolidated: config.consolidated.clone(),
        })
    }
}

impl Rule for StylesheetLink {
    fn name(&self) -> &'static str {
        "stylesheet-link"
    }

    fn apply(&self, content: &str, page: &Page) -> Option<String> {
        let prefix = page.root_prefix();
        let legacy_present = self.legacy_link.is_match(content);
        let misdepth = self
            .consolidated_href
            .captures_iter(content)
            .any(|caps| caps[1] != *prefix);

        if !legacy_present && !misdepth {
            return None;
        }

        let link = format!(r#"<link rel="stylesheet" href="{}{}">"#, prefix, self.consolidated);
        let rewritten = self.legacy_link.replace_all(content, link.as_str());

        let href = format!(r#"href="{}{}""#, prefix, self.consolidated);
        let corrected = self
            .consolidated_href
            .replace_all(&rewritten, |caps: &Captures| {
                if caps[1] == *prefix {
                    caps[0].to_string()
                } else {
                    href.clone()
                }
            });

        Some(corrected.into_owned())
    }
}
