use crate::catalog::Catalog;
use crate::model::{Finding, SenderContext, Severity};
use crate::HP;

// ---------------------------------------------------------------------------
// Compound signal groups
// ---------------------------------------------------------------------------

const STRANDED_TERMS: &[&str] = &[
    "stranded",
    "stuck",
    "trapped",
    "lost",
    "can't get home",
    "need to get back",
];

const MONEY_TERMS: &[&str] = &[
    "money", "cash", "funds", "help", "loan", "borrow", "lend", "$",
];

const REPAYMENT_TERMS: &[&str] = &[
    "pay back",
    "repay",
    "return",
    "guarantee",
    "promise",
    "when i get back",
];

const FUTURE_PROMISES: &[&str] = &[
    "when i get back",
    "as soon as",
    "i promise",
    "i guarantee",
    "you know i'm good for it",
];

const URGENCY_TERMS: &[&str] = &[
    "urgent",
    "immediate",
    "asap",
    "right now",
    "today",
    "desperate",
];

const TRUST_APPEALS: &[&str] = &[
    "you know me",
    "we're friends",
    "trust me",
    "you're the only one",
];

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(*t))
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

// `normalized` must already be lowercase.
pub fn detect(catalog: &Catalog, normalized: &str) -> Vec<Finding> {
    let mut findings = catalog_findings(catalog, normalized);
    findings.extend(compound_findings(normalized));
    findings
}

pub fn catalog_findings(catalog: &Catalog, normalized: &str) -> Vec<Finding> {
    catalog
        .subcategories()
        .iter()
        .filter_map(|sub| {
            sub.first_match(normalized).map(|rule| {
                Finding::new(
                    sub.id(),
                    rule.source,
                    sub.severity,
                    sub.explanation,
                    HP.pattern_confidence,
                )
            })
        })
        .collect()
}

/// Multi-signal financial scam heuristics that no single pattern expresses.
pub fn compound_findings(normalized: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    let has_stranded = contains_any(normalized, STRANDED_TERMS);
    let has_money = contains_any(normalized, MONEY_TERMS);
    let has_repayment = contains_any(normalized, REPAYMENT_TERMS);

    if has_stranded && has_money {
        let confidence = if has_repayment {
            HP.stranded_repayment_confidence
        } else {
            HP.stranded_confidence
        };
        findings.push(Finding::new(
            "financial_scam_stranded",
            "stranded_money_combination",
            Severity::Critical,
            "Stranded/stuck story combined with money request - classic advance fee scam",
            confidence,
        ));
    }

    if has_money && contains_any(normalized, FUTURE_PROMISES) {
        findings.push(Finding::new(
            "financial_scam_promise",
            "money_with_future_promise",
            Severity::Critical,
            "Money request with future repayment promise - high risk of non-repayment",
            HP.promise_confidence,
        ));
    }

    if has_money
        && contains_any(normalized, URGENCY_TERMS)
        && contains_any(normalized, TRUST_APPEALS)
    {
        findings.push(Finding::new(
            "financial_scam_manipulation",
            "urgent_personal_money_request",
            Severity::Critical,
            "Combines urgency, personal connection, and money request - manipulation tactic",
            HP.urgent_appeal_confidence,
        ));
    }

    findings
}

pub fn context_findings(ctx: &SenderContext) -> Vec<Finding> {
    let mut findings = Vec::new();

    if ctx.message_frequency.unwrap_or(0) > HP.spam_frequency_threshold {
        findings.push(Finding::new(
            "boundary_violation_spam",
            "multiple_messages",
            Severity::Medium,
            "Sending too many messages in short time period",
            HP.spam_confidence,
        ));
    }

    if ctx
        .account_age_days
        .is_some_and(|days| days < HP.new_account_max_days)
    {
        findings.push(Finding::new(
            "suspicious_account",
            "new_account",
            Severity::Medium,
            "Very new account - potential fake profile",
            HP.new_account_confidence,
        ));
    }

    findings
}
