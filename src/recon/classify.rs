//! Invoice-payment classification and invoice-number derivation.
//!
//! Which counterparties disqualify a row is policy, not logic: the vendor
//! names live in an [`InvoicePolicy`] that callers may replace.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::core::{CamtError, Classification, CreditDebit, Row};

/// `Note` text for rows whose invoice number was derived automatically.
pub const INVOICE_NOTE: &str = "Inv.no. fetched via Python";

/// Invoice numbers are maximal digit runs of this length.
const INVOICE_DIGITS: std::ops::RangeInclusive<usize> = 6..=7;

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("static regex"));

/// Row value a [`DisqualifyRule`] inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleField {
    DebtorName,
    DebtorAddress,
    Description,
}

impl RuleField {
    fn value<'a>(&self, row: &'a Row) -> Option<&'a str> {
        match self {
            Self::DebtorName => row.debtor_name(),
            Self::DebtorAddress => row.debtor_address(),
            Self::Description => row.description(),
        }
    }
}

/// Rows whose `field` contains any needle (literal, case-insensitive) are not
/// invoice payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisqualifyRule {
    pub field: RuleField,
    pub needles: Vec<String>,
}

impl DisqualifyRule {
    pub fn new(field: RuleField, needles: &[&str]) -> Self {
        Self {
            field,
            needles: needles.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Policy deciding which booked lines count as customer invoice payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePolicy {
    pub rules: Vec<DisqualifyRule>,
    /// Outgoing payments (`DBIT`) are never invoice payments.
    pub exclude_debits: bool,
}

impl Default for InvoicePolicy {
    /// Card acquirers and payment processors settle in bulk; their payouts
    /// are not individual invoice payments.
    fn default() -> Self {
        Self {
            rules: vec![
                DisqualifyRule::new(
                    RuleField::DebtorName,
                    &["ADYEN", "U.S. BANK", "Stripe", "ELAVON"],
                ),
                DisqualifyRule::new(RuleField::DebtorAddress, &["ELAVON", "Stripe", "ADYEN"]),
                DisqualifyRule::new(RuleField::Description, &["STRIPE"]),
            ],
            exclude_debits: true,
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    field: RuleField,
    matcher: Option<Regex>,
}

/// An [`InvoicePolicy`] compiled into matchers.
#[derive(Debug, Clone)]
pub struct InvoiceClassifier {
    rules: Vec<CompiledRule>,
    exclude_debits: bool,
}

impl InvoiceClassifier {
    pub fn new(policy: &InvoicePolicy) -> Result<Self, CamtError> {
        let rules = policy
            .rules
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    field: rule.field,
                    matcher: compile_needles(&rule.needles)?,
                })
            })
            .collect::<Result<Vec<_>, CamtError>>()?;

        Ok(Self {
            rules,
            exclude_debits: policy.exclude_debits,
        })
    }

    /// Classify the complete merged row set in place.
    ///
    /// A rule only applies when its field occurs somewhere in `rows`; rows
    /// lacking the value are never disqualified by it.
    pub fn classify(&self, rows: &mut [Row]) {
        let active: Vec<&CompiledRule> = self
            .rules
            .iter()
            .filter(|r| rows.iter().any(|row| r.field.value(row).is_some()))
            .collect();
        let debits_present = rows.iter().any(|row| row.credit_debit().is_some());

        for row in rows.iter_mut() {
            let mut is_invoice_payment = true;

            for rule in &active {
                let hit = match (&rule.matcher, rule.field.value(row)) {
                    (Some(m), Some(value)) => m.is_match(value),
                    _ => false,
                };
                if hit {
                    is_invoice_payment = false;
                }
            }

            if self.exclude_debits && debits_present {
                is_invoice_payment &= row.credit_debit() != Some(CreditDebit::Debit);
            }

            let invoice_number = row.description().map(invoice_number).unwrap_or_default();
            let note = if invoice_number.is_empty() {
                String::new()
            } else {
                INVOICE_NOTE.to_string()
            };

            row.classification = Some(Classification {
                is_invoice_payment,
                invoice_number,
                note,
                comment: String::new(),
            });
        }
    }
}

/// Escaped, case-insensitive alternation of the needles; `None` when empty.
fn compile_needles(needles: &[String]) -> Result<Option<Regex>, CamtError> {
    let alternatives: Vec<String> = needles
        .iter()
        .filter(|n| !n.is_empty())
        .map(|n| regex::escape(n))
        .collect();
    if alternatives.is_empty() {
        return Ok(None);
    }
    RegexBuilder::new(&alternatives.join("|"))
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|e| CamtError::Policy(e.to_string()))
}

/// First run of 6 or 7 digits not adjacent to another digit, or `""`.
pub fn invoice_number(description: &str) -> String {
    DIGIT_RUN
        .find_iter(description)
        .map(|m| m.as_str())
        .find(|run| INVOICE_DIGITS.contains(&run.chars().count()))
        .unwrap_or_default()
        .to_string()
}
