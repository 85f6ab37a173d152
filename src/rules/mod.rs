pub mod calculator;
pub mod duplicates;
pub mod inject;
pub mod stylesheet;
pub mod wrapper;

use std::fmt;
use std::str::FromStr;

use crate::config::ConfigData;
use crate::error::{PagefixError, PagefixResult};
use crate::page::Page;

/// A marker-gated rewrite over whole-file content.
///
/// `apply` returns `None` when the rule's marker shows there is nothing to do.
/// Applying a rule to its own output must return `None` or the same text.
pub trait Rule {
    fn name(&self) -> &'static str;

    fn apply(&self, content: &str, page: &Page) -> Option<String>;
}

/// Result of running an ordered rule list over one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    pub applied: Vec<&'static str>,
}

impl Rewrite {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// An ordered list of rules
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn apply(&self, content: &str, page: &Page) -> Rewrite {
        let mut current = content.to_string();
        let mut applied = Vec::new();

        for rule in &self.rules {
            if let Some(next) = rule.apply(&current, page) {
                if next != current {
                    tracing::debug!(rule = rule.name(), page = %page.relative().display(), "rule applied");
                    applied.push(rule.name());
                    current = next;
                }
            }
        }

        Rewrite {
            content: current,
            applied,
        }
    }
}

/// Named groups of target files used by the fixed target lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    ToolPages,
    BlogPosts,
    BlogIndex,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::ToolPages => "Tool Pages",
            Category::BlogPosts => "Blog Posts",
            Category::BlogIndex => "Blog Index",
        }
    }

    pub fn paths<'a>(&self, config: &'a ConfigData) -> &'a [String] {
        match self {
            Category::ToolPages => &config.targets.tool_pages,
            Category::BlogPosts => &config.targets.blog_posts,
            Category::BlogIndex => &config.targets.blog_index,
        }
    }
}

/// How a fix set picks its files when none are given explicitly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Discover,
    Categories(&'static [Category]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixSet {
    Wrap,
    Unwrap,
    Css,
    Audit,
}

impl FixSet {
    pub const ALL: [FixSet; 4] = [FixSet::Wrap, FixSet::Unwrap, FixSet::Css, FixSet::Audit];

    pub fn name(&self) -> &'static str {
        match self {
            FixSet::Wrap => "wrap",
            FixSet::Unwrap => "unwrap",
            FixSet::Css => "css",
            FixSet::Audit => "audit",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FixSet::Wrap => "Wrap page bodies in the tool card container",
            FixSet::Unwrap => "Remove tool card and white box wrappers",
            FixSet::Css => "Point legacy stylesheet links at the consolidated stylesheet",
            FixSet::Audit => "Apply the audit fixes: duplicates, disclaimers, calculator logic",
        }
    }

    pub fn selection(&self) -> Selection {
        match self {
            FixSet::Wrap | FixSet::Audit => Selection::Discover,
            FixSet::Unwrap => Selection::Categories(&[Category::BlogPosts, Category::ToolPages]),
            FixSet::Css => Selection::Categories(&[
                Category::ToolPages,
                Category::BlogPosts,
                Category::BlogIndex,
            ]),
        }
    }

    /// Whether a run asks for confirmation before touching files
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, FixSet::Audit)
    }

    pub fn rules(&self, config: &ConfigData) -> PagefixResult<RuleSet> {
        let rules: Vec<Box<dyn Rule>> = match self {
            FixSet::Wrap => vec![Box::new(wrapper::WrapCard)],
            FixSet::Unwrap => vec![Box::new(wrapper::UnwrapCard)],
            FixSet::Css => vec![Box::new(stylesheet::StylesheetLink::new(
                &config.stylesheet,
            )?)],
            FixSet::Audit => vec![
                Box::new(duplicates::KeepFirst::breadcrumb()),
                Box::new(duplicates::KeepFirst::back_link()),
                Box::new(duplicates::KeepFirst::related_tools()),
                Box::new(inject::AuditorAnchor),
                Box::new(inject::AgreementCheckbox),
                Box::new(inject::NilReturnCheckbox),
                Box::new(inject::InvoiceDisclaimer::new(&config.facts)),
                Box::new(inject::HsnDataDate::new(&config.facts)),
                Box::new(calculator::CanonicalFunction::msme(&config.facts)),
                Box::new(calculator::CanonicalFunction::penalty()),
                Box::new(calculator::PlaceOfSupply),
                Box::new(calculator::RegistrationThresholds),
            ],
        };

        Ok(RuleSet::new(rules))
    }
}

impl fmt::Display for FixSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FixSet {
    type Err = PagefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FixSet::ALL
            .iter()
            .copied()
            .find(|set| set.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PagefixError::UnknownFixSet(s.to_string()))
    }
}
