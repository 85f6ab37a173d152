pub mod project;

pub use project::Config;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigData {
    pub version: String,
    pub backup: BackupConfig,
    pub discovery: DiscoveryConfig,
    pub stylesheet: StylesheetConfig,
    pub facts: FactsConfig,
    pub targets: TargetsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    pub suffix: String,
    pub overwrite_existing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub extension: String,
    pub exclude_dirs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesheetConfig {
    pub legacy: String,
    pub consolidated: String,
}

/// Domain constants baked into injected markup and calculator code.
/// They change with regulation, so they live here instead of in the rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactsConfig {
    pub bank_rate: f64,
    pub data_currency: String,
    pub e_invoice_threshold: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    pub tool_pages: Vec<String>,
    pub blog_posts: Vec<String>,
    pub blog_index: Vec<String>,
}

impl Default for ConfigData {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            backup: BackupConfig::default(),
            discovery: DiscoveryConfig::default(),
            stylesheet: StylesheetConfig::default(),
            facts: FactsConfig::default(),
            targets: TargetsConfig::default(),
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            suffix: ".audit-backup".to_string(),
            overwrite_existing: false,
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extension: "html".to_string(),
            exclude_dirs: vec![
                "node_modules".to_string(),
                "dist".to_string(),
                "build".to_string(),
            ],
        }
    }
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            legacy: "style.css".to_string(),
            consolidated: "master-style.css".to_string(),
        }
    }
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            bank_rate: 7.00,
            data_currency: "February 2026".to_string(),
            e_invoice_threshold: "₹5 Crores".to_string(),
        }
    }
}

impl Default for TargetsConfig {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();

        Self {
            tool_pages: owned(&[
                "gst-calculator.html",
                "penalty-calculator.html",
                "gst-interest.html",
                "itc-calculator.html",
                "msme-payment-calculator.html",
                "gstr3b.html",
                "return-deadlines.html",
                "registration-checker.html",
                "budget-2026-changes.html",
                "gstin-verification.html",
                "hsn-finder.html",
                "invoice.html",
            ]),
            blog_posts: owned(&[
                "blog/common-gst-mistakes.html",
                "blog/composition-scheme-guide.html",
                "blog/eway-bill-rules-2026.html",
                "blog/gst-penalty-calculator-guide.html",
                "blog/gst-rates-india-2026.html",
                "blog/gst-registration-process.html",
                "blog/gstr1-vs-gstr3b-differences.html",
                "blog/how-to-file-gst-return.html",
                "blog/hsn-code-complete-guide.html",
                "blog/input-tax-credit-guide.html",
                "blog/reverse-charge-mechanism-rcm.html",
                "blog/tds-under-gst-guide.html",
                "blog/what-is-gst-in-india.html",
            ]),
            blog_index: owned(&["blog/index.html"]),
        }
    }
}
