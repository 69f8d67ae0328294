pub mod catalog;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod model;
pub mod scoring;
pub mod triage;

use serde_json::Value;
use tracing::{debug, warn};

pub use catalog::Catalog;
pub use error::{AnalysisError, Result};
pub use model::{AnalysisResult, Finding, SenderContext, Severity};
pub use triage::{
    Alert, InboundMessage, SeenMessages, Triage, TriageConfig, TriageOutcome, TriageStats,
};

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

pub(crate) struct Hyperparameters {
    pub pattern_confidence: f64,
    pub stranded_confidence: f64,
    pub stranded_repayment_confidence: f64,
    pub promise_confidence: f64,
    pub urgent_appeal_confidence: f64,
    pub spam_frequency_threshold: u32,
    pub spam_confidence: f64,
    pub new_account_max_days: u32,
    pub new_account_confidence: f64,
    pub tone_leniency_confidence: f64,
    pub echo_max_chars: usize,
    pub seen_cache_capacity: usize,
    pub alert_history_cap: usize,
}

pub(crate) static HP: Hyperparameters = Hyperparameters {
    pattern_confidence: 0.8,
    stranded_confidence: 0.9,
    stranded_repayment_confidence: 0.95,
    promise_confidence: 0.9,
    urgent_appeal_confidence: 0.95,
    spam_frequency_threshold: 5,
    spam_confidence: 0.7,
    new_account_max_days: 7,
    new_account_confidence: 0.6,
    tone_leniency_confidence: 0.9,
    echo_max_chars: 100,
    seen_cache_capacity: 10_000,
    alert_history_cap: 100,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn echo(message: &str) -> String {
    match message.char_indices().nth(HP.echo_max_chars) {
        Some((byte_idx, _)) => format!("{}...", &message[..byte_idx]),
        None => message.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Classify a message against the built-in catalog.
///
/// Never fails: empty input produces an empty LOW result, and a catalog that
/// cannot be compiled produces a LOW result advising caution.
pub fn analyze_message(message: &str, sender: Option<&SenderContext>) -> AnalysisResult {
    analyze_or_degrade(Catalog::builtin(), message, sender)
}

fn analyze_or_degrade(
    catalog: std::result::Result<&Catalog, &AnalysisError>,
    message: &str,
    sender: Option<&SenderContext>,
) -> AnalysisResult {
    match catalog {
        Ok(catalog) => analyze_with_catalog(catalog, message, sender),
        Err(e) => {
            warn!("pattern catalog unavailable: {e}");
            if message.trim().is_empty() {
                AnalysisResult::empty()
            } else {
                AnalysisResult::degraded(echo(message))
            }
        }
    }
}

pub fn analyze_with_catalog(
    catalog: &Catalog,
    message: &str,
    sender: Option<&SenderContext>,
) -> AnalysisResult {
    if message.trim().is_empty() {
        return AnalysisResult::empty();
    }

    let normalized = message.to_lowercase();

    let mut findings = matcher::detect(catalog, &normalized);
    if let Some(ctx) = sender {
        findings.extend(matcher::context_findings(ctx));
    }
    let candidates = findings.len();

    let findings = filter::filter(&normalized, findings);
    debug!(
        candidates,
        kept = findings.len(),
        "false-positive filter applied"
    );

    let (risk_level, confidence) = scoring::aggregate(&findings);
    let recommendations = scoring::recommend(risk_level, &findings);

    AnalysisResult {
        message_analyzed: echo(message),
        risk_level,
        red_flags: findings,
        confidence,
        recommendations,
    }
}

// A message that is not a JSON string counts as empty input.
pub fn analyze_value(message: &Value, sender: Option<&Value>) -> AnalysisResult {
    let Some(text) = message.as_str() else {
        debug!("non-text message value, returning empty result");
        return AnalysisResult::empty();
    };
    let ctx = sender
        .filter(|v| !v.is_null())
        .map(SenderContext::from_value);
    analyze_message(text, ctx.as_ref())
}
