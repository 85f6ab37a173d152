use once_cell::sync::Lazy;
use regex::Regex;

use super::Rule;
use crate::config::FactsConfig;
use crate::page::Page;

const AGREEMENT_CHECKBOX: &str = r#"
      <div class="form-group">
        <label class="checkbox-label">
          <input type="checkbox" id="hasAgreement">
          <span>Written agreement exists (45-day credit period)</span>
        </label>
        <p class="help-text">⚠️ If unchecked, default 15-day payment deadline applies as per MSME Act Section 15</p>
      </div>
    "#;

const NIL_RETURN_CHECKBOX: &str = r#"
      <div class="form-group">
        <label class="checkbox-label">
          <input type="checkbox" id="hasLiability" checked>
          <span>This return has tax liability (uncheck for NIL return)</span>
        </label>
        <p class="help-text">NIL returns attract lower late fee: ₹20/day instead of ₹100/day</p>
      </div>
    "#;

static CALCULATE_BUTTON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<button[^>]*>Calculate.*?</button>").expect("Failed to compile button pattern")
});

static CALCULATE_PENALTY_BUTTON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<button[^>]*>Calculate Penalty</button>").expect("Failed to compile penalty button pattern")
});

static INVOICE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<h1[^>]*>.*?Invoice.*?</h1>").expect("Failed to compile invoice heading pattern")
});

static HSN_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<h1[^>]*>.*?HSN.*?</h1>").expect("Failed to compile HSN heading pattern")
});

static SECTION_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<section\b[^>]*>").expect("Failed to compile section pattern"));

static AUDIT_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bclass="[^"]*(?:risk|audit|compliance)[^"]*""#)
        .expect("Failed to compile section class pattern")
});

/// Insert `markup` directly before the first match of `pattern`.
fn insert_before_first(content: &str, pattern: &Regex, markup: &str) -> Option<String> {
    let m = pattern.find(content)?;
    let mut out = String::with_capacity(content.len() + markup.len());
    out.push_str(&content[..m.start()]);
    out.push_str(markup);
    out.push_str(&content[m.start()..]);
    Some(out)
}

/// Insert `markup` on its own line after the first match of `pattern`.
fn insert_after_first(content: &str, pattern: &Regex, markup: &str) -> Option<String> {
    let m = pattern.find(content)?;
    let mut out = String::with_capacity(content.len() + markup.len() + 1);
    out.push_str(&content[..m.end()]);
    out.push('\n');
    out.push_str(markup);
    out.push_str(&content[m.end()..]);
    Some(out)
}

/// Adds `id="auditor"` to the home page's risk/audit section so `#auditor`
/// links resolve.
pub struct AuditorAnchor;

impl Rule for AuditorAnchor {
    fn name(&self) -> &'static str {
        "auditor-anchor"
    }

    fn apply(&self, content: &str, page: &Page) -> Option<String> {
        if !page.is_index() || page.depth() > 0 {
            return None;
        }
        if !content.contains("#auditor") || content.contains(r#"id="auditor""#) {
            return None;
        }

        let tag = SECTION_OPEN.find_iter(content).find(|m| {
            let tag = m.as_str();
            AUDIT_CLASS.is_match(tag) && !tag.contains("id=")
        })?;

        // Insert before the closing `>` of the opening tag.
        let close = tag.end() - 1;
        let mut out = String::with_capacity(content.len() + 12);
        out.push_str(&content[..close]);
        out.push_str(r#" id="auditor""#);
        out.push_str(&content[close..]);
        Some(out)
    }
}

/// Written-agreement checkbox for the MSME calculator
pub struct AgreementCheckbox;

impl Rule for AgreementCheckbox {
    fn name(&self) -> &'static str {
        "msme-agreement-checkbox"
    }

    fn apply(&self, content: &str, _page: &Page) -> Option<String> {
        if !content.to_lowercase().contains("msme") || content.contains("hasAgreement") {
            return None;
        }
        insert_before_first(content, &CALCULATE_BUTTON, AGREEMENT_CHECKBOX)
    }
}

/// NIL-return checkbox for the penalty calculator
pub struct NilReturnCheckbox;

impl Rule for NilReturnCheckbox {
    fn name(&self) -> &'static str {
        "penalty-nil-checkbox"
    }

    fn apply(&self, content: &str, _page: &Page) -> Option<String> {
        if !content.to_lowercase().contains("penalty") || content.contains("hasLiability") {
            return None;
        }
        insert_before_first(content, &CALCULATE_PENALTY_BUTTON, NIL_RETURN_CHECKBOX)
    }
}

/// E-invoicing limitation notice under the invoice generator heading
pub struct InvoiceDisclaimer {
    markup: String,
}

impl InvoiceDisclaimer {
    pub fn new(facts: &FactsConfig) -> Self {
        let threshold = &facts.e_invoice_threshold;
        let markup = format!(
            r#"<div class="info-box orange" style="margin-bottom: 24px;">
  <p><strong>⚠️ Important Limitation:</strong></p>
  <p>This invoice generator is valid for:</p>
  <ul style="margin: 8px 0; padding-left: 20px;">
    <li>B2C transactions (sales to consumers)</li>
    <li>Businesses with turnover <strong>below {threshold}</strong></li>
  </ul>
  <p><strong>NOT for E-Invoicing:</strong> Businesses with turnover &gt;{threshold} must use government-approved GSP software to generate IRN (Invoice Reference Number) and QR code. Invoices without IRN cannot be used for ITC claims.</p>
</div>
"#
        );
        Self { markup }
    }
}

impl Rule for InvoiceDisclaimer {
    fn name(&self) -> &'static str {
        "invoice-disclaimer"
    }

    fn apply(&self, content: &str, _page: &Page) -> Option<String> {
        if !content.to_lowercase().contains("invoice")
            || content.contains("IRN")
            || content.contains("QR code")
        {
            return None;
        }
        insert_after_first(content, &INVOICE_HEADING, &self.markup)
    }
}

/// Data-currency label under the HSN finder heading
pub struct HsnDataDate {
    markup: String,
    as_of: String,
}

impl HsnDataDate {
    pub fn new(facts: &FactsConfig) -> Self {
        let as_of = facts.data_currency.clone();
        let markup = format!(
            r#"<div class="info-box blue" style="margin-bottom: 16px;">
  <p><strong>📅 Data Currency:</strong> HSN codes and GST rates current as of <strong>{as_of}</strong>. Rates may change after GST Council meetings. Always verify with official GST portal for latest updates.</p>
</div>
"#
        );
        Self { markup, as_of }
    }
}

impl Rule for HsnDataDate {
    fn name(&self) -> &'static str {
        "hsn-data-date"
    }

    fn apply(&self, content: &str, _page: &Page) -> Option<String> {
        let lower = content.to_lowercase();
        if !lower.contains("hsn") || lower.contains("data currency") || content.contains(&self.as_of) {
            return None;
        }
        insert_after_first(content, &HSN_HEADING, &self.markup)
    }
}
