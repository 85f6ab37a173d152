use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use super::Rule;
use crate::config::FactsConfig;
use crate::page::Page;

const MSME_CALCULATOR: &str = r#"function calculateMSMEInterest() {
  const invoiceAmount = parseFloat(document.getElementById('invoiceAmount').value);
  const invoiceDate = document.getElementById('invoiceDate').value;
  const paymentDate = document.getElementById('paymentDate').value;
  const hasAgreement = document.getElementById('hasAgreement') ?
                       document.getElementById('hasAgreement').checked : false;

  if (!invoiceAmount || !invoiceDate || !paymentDate) {
    alert('Please fill all required fields');
    return;
  }

  const invoice = new Date(invoiceDate);
  const payment = new Date(paymentDate);
  const diffTime = payment - invoice;
  const diffDays = Math.ceil(diffTime / (1000 * 60 * 60 * 24));

  if (diffDays < 0) {
    alert('Payment date cannot be before invoice date');
    return;
  }

  // 15 days without a written agreement, 45 with one (MSMED Act Section 15)
  const creditPeriod = hasAgreement ? 45 : 15;
  const delayDays = Math.max(0, diffDays - creditPeriod);

  // Bank rate plus three percentage points
  const bankRate = __BANK_RATE__;
  const penaltyRate = bankRate + 3; // __PENALTY_RATE__% total
  const interestAmount = delayDays > 0 ?
    (invoiceAmount * (penaltyRate / 100) * delayDays) / 365 : 0;

  document.getElementById('results').style.display = 'block';
  document.getElementById('creditPeriodUsed').textContent = creditPeriod + ' days';
  document.getElementById('delayDays').textContent = delayDays + ' days';
  document.getElementById('penaltyRate').textContent = penaltyRate.toFixed(2) + '%';
  document.getElementById('interestAmount').textContent = '₹' + interestAmount.toFixed(2);

  const explanation = document.getElementById('msmeExplanation');
  if (explanation) {
    if (!hasAgreement) {
      explanation.innerHTML = `
        <div class="info-box orange">
          <p><strong>⚠️ No Written Agreement:</strong></p>
          <p>As per MSME Act Section 15, without a written agreement, the payment deadline is <strong>15 days</strong> from invoice date.</p>
          <p>Your payment was delayed by <strong>${delayDays} days</strong>.</p>
        </div>
      `;
    } else {
      explanation.innerHTML = `
        <div class="info-box blue">
          <p><strong>Written Agreement Present:</strong></p>
          <p>Using 45-day credit period as per written agreement.</p>
          <p>Payment delayed by <strong>${delayDays} days</strong>.</p>
        </div>
      `;
    }
  }

  document.getElementById('results').scrollIntoView({ behavior: 'smooth' });
}"#;

const MSME_RESET: &str = r#"function resetMSMECalculator() {
  document.getElementById('msmeForm').reset();
  document.getElementById('results').style.display = 'none';
  if (document.getElementById('msmeExplanation')) {
    document.getElementById('msmeExplanation').innerHTML = '';
  }
}"#;

const PENALTY_CALCULATOR: &str = r#"function calculatePenalty() {
  const returnType = document.getElementById('returnType').value;
  const daysLate = parseInt(document.getElementById('daysLate').value);
  const taxAmount = parseFloat(document.getElementById('taxAmount').value) || 0;
  const hasLiability = document.getElementById('hasLiability') ?
                       document.getElementById('hasLiability').checked :
                       (taxAmount > 0);

  if (!daysLate || daysLate < 1) {
    alert('Please enter valid number of days late');
    return;
  }

  let dailyLateFee;
  let maxLateFee;

  if (!hasLiability || taxAmount === 0) {
    dailyLateFee = 20;
    maxLateFee = 2000;
  } else {
    dailyLateFee = 100;
    maxLateFee = 5000;
  }

  let lateFee = Math.min(daysLate * dailyLateFee, maxLateFee);

  let interest = 0;
  if (taxAmount > 0) {
    const interestRate = 0.18;
    const dailyInterest = (taxAmount * interestRate * daysLate) / 365;
    interest = Math.round(dailyInterest * 100) / 100;
  }

  const totalPenalty = lateFee + interest;

  document.getElementById('results').style.display = 'block';
  document.getElementById('lateFeeAmount').textContent = '₹' + lateFee.toLocaleString('en-IN');
  document.getElementById('interestAmount').textContent = '₹' + interest.toLocaleString('en-IN', {minimumFractionDigits: 2, maximumFractionDigits: 2});
  document.getElementById('totalPenalty').textContent = '₹' + totalPenalty.toLocaleString('en-IN', {minimumFractionDigits: 2, maximumFractionDigits: 2});

  const explanation = document.getElementById('penaltyExplanation');
  if (explanation) {
    if (!hasLiability || taxAmount === 0) {
      explanation.innerHTML = `
        <div class="info-box blue">
          <p><strong>NIL Return Penalty (Section 47):</strong></p>
          <p>Since this is a NIL return, late fee is ₹20/day (₹10 CGST + ₹10 SGST), capped at ₹2,000.</p>
        </div>
      `;
    } else {
      explanation.innerHTML = `
        <div class="info-box orange">
          <p><strong>Regular Return Penalty:</strong></p>
          <p>Late fee: ₹${dailyLateFee}/day (₹${dailyLateFee/2} CGST + ₹${dailyLateFee/2} SGST), capped at ₹${maxLateFee.toLocaleString('en-IN')}.</p>
          <p>Interest: 18% p.a. on ₹${taxAmount.toLocaleString('en-IN')}.</p>
        </div>
      `;
    }
  }

  document.getElementById('results').scrollIntoView({ behavior: 'smooth', block: 'start' });
}"#;

const PENALTY_RESET: &str = r#"function resetCalculator() {
  document.getElementById('penaltyForm').reset();
  document.getElementById('results').style.display = 'none';
  if (document.getElementById('penaltyExplanation')) {
    document.getElementById('penaltyExplanation').innerHTML = '';
  }
}"#;

const PLACE_OF_SUPPLY: &str = r#"// Place of supply is the buyer's state for inter-state supplies
    const sellerState = sellerGSTIN.substring(0, 2);
    const buyerState = buyerGSTIN ? buyerGSTIN.substring(0, 2) : sellerState;
    const isInterState = buyerGSTIN && (sellerState !== buyerState);
    const placeOfSupply = isInterState ? buyerState : sellerState;
    const taxType = isInterState ? 'IGST' : 'CGST+SGST';"#;

// HP and JK use the normal thresholds.
const SPECIAL_STATES: &str = r#"const specialStates = [
    'AR', 'AS', 'MN', 'ML', 'MZ', 'NL', 'SK', 'TR', 'UT'
  ];"#;

static SELLER_STATE_SUPPLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\b(?:const|let|var)\s+)?\bplaceOfSupply\s*=\s*sellerGSTIN\.substring\(\s*0\s*,\s*2\s*\)[ \t]*;?")
        .expect("Failed to compile place of supply pattern")
});

static SPECIAL_STATES_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)const specialStates\s*=\s*\[.*?\];").expect("Failed to compile special states pattern")
});

/// Byte range of `function <name>() { ... }`, found by balancing braces from
/// the opening one. Braces inside string and template literals or comments
/// are not counted; regex literals are not recognised.
fn function_span(content: &str, name: &str) -> Option<Range<usize>> {
    let header = Regex::new(&format!(r"function\s+{}\s*\(\s*\)\s*\{{", regex::escape(name))).ok()?;
    let m = header.find(content)?;
    let open = m.end() - 1;

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = content[open..].char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        if let Some(q) = quote {
            if ch == '\\' {
                chars.next();
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut prev = ' ';
                for (_, c) in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(m.start()..open + offset + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Replaces a calculator function with its corrected version and makes sure
/// the companion reset function exists.
pub struct CanonicalFunction {
    rule: &'static str,
    page_marker: &'static str,
    function: &'static str,
    body: String,
    reset_function: &'static str,
    reset_body: &'static str,
}

impl CanonicalFunction {
    pub fn msme(facts: &FactsConfig) -> Self {
        let body = MSME_CALCULATOR
            .replace("__BANK_RATE__", &format!("{:.2}", facts.bank_rate))
            .replace("__PENALTY_RATE__", &format!("{:.2}", facts.bank_rate + 3.0));

        Self {
            rule: "msme-calculator",
            page_marker: "msme",
            function: "calculateMSMEInterest",
            body,
            reset_function: "resetMSMECalculator",
            reset_body: MSME_RESET,
        }
    }

    pub fn penalty() -> Self {
        Self {
            rule: "penalty-calculator",
            page_marker: "penalty",
            function: "calculatePenalty",
            body: PENALTY_CALCULATOR.to_string(),
            reset_function: "resetCalculator",
            reset_body: PENALTY_RESET,
        }
    }
}

impl Rule for CanonicalFunction {
    fn name(&self) -> &'static str {
        self.rule
    }

    fn apply(&self, content: &str, page: &Page) -> Option<String> {
        if !page.name_contains(self.page_marker) {
            return None;
        }

        let span = function_span(content, self.function)?;
        let mut out = String::with_capacity(content.len() + self.body.len());
        out.push_str(&content[..span.start]);
        out.push_str(&self.body);
        if function_span(content, self.reset_function).is_none() {
            out.push_str("\n\n");
            out.push_str(self.reset_body);
        }
        out.push_str(&content[span.end..]);

        if out == content {
            None
        } else {
            Some(out)
        }
    }
}

/// Place-of-supply logic in the invoice generator: buyer's state for IGST.
pub struct PlaceOfSupply;

impl Rule for PlaceOfSupply {
    fn name(&self) -> &'static str {
        "place-of-supply"
    }

    fn apply(&self, content: &str, _page: &Page) -> Option<String> {
        if !content.to_lowercase().contains("invoice") {
            return None;
        }
        let m = SELLER_STATE_SUPPLY.find(content)?;

        let mut out = String::with_capacity(content.len() + PLACE_OF_SUPPLY.len());
        out.push_str(&content[..m.start()]);
        out.push_str(PLACE_OF_SUPPLY);
        out.push_str(&content[m.end()..]);
        Some(out)
    }
}

/// Registration-checker special category states list.
pub struct RegistrationThresholds;

impl Rule for RegistrationThresholds {
    fn name(&self) -> &'static str {
        "registration-thresholds"
    }

    fn apply(&self, content: &str, page: &Page) -> Option<String> {
        if !page.name_contains("registration-checker")
            && !content.to_lowercase().contains("registration-checker")
        {
            return None;
        }

        let m = SPECIAL_STATES_LIST.find(content)?;
        if m.as_str() == SPECIAL_STATES {
            return None;
        }

        let mut out = String::with_capacity(content.len());
        out.push_str(&content[..m.start()]);
        out.push_str(SPECIAL_STATES);
        out.push_str(&content[m.end()..]);
        Some(out)
    }
}
