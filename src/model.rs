use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Severity::Critical => "🔴",
            Severity::High => "🟠",
            Severity::Medium => "🟡",
            Severity::Low => "🟢",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Finding
// ---------------------------------------------------------------------------

// Not Deserialize: confidence is clamped only in `new`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub category: String,
    pub rule: String,
    #[serde(rename = "risk_level")]
    pub severity: Severity,
    pub explanation: String,
    pub confidence: f64,
}

impl Finding {
    pub fn new(
        category: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        explanation: impl Into<String>,
        confidence: f64,
    ) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            category: category.into(),
            rule: rule.into(),
            severity,
            explanation: explanation.into(),
            confidence,
        }
    }
}

// ---------------------------------------------------------------------------
// Sender context
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderContext {
    /// Messages received from this sender in the caller's recent window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_frequency: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_age_days: Option<u32>,
}

impl SenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.message_frequency = Some(frequency);
        self
    }

    pub fn with_account_age_days(mut self, days: u32) -> Self {
        self.account_age_days = Some(days);
        self
    }

    pub fn from_value(value: &Value) -> Self {
        let mut ctx = Self::default();
        if !value.is_object() {
            warn!("sender context is not an object, ignoring it");
            return ctx;
        }
        // Fractional and negative counts are rounded toward the side that
        // trips the threshold, so 6.5 messages is spam and -1 days is new.
        match read_number(value, "message_frequency") {
            Ok(v) => ctx.message_frequency = v.map(|n| n.ceil() as u32),
            Err(e) => warn!("{e}"),
        }
        match read_number(value, "account_age_days") {
            Ok(v) => ctx.account_age_days = v.map(|n| n.floor() as u32),
            Err(e) => warn!("{e}"),
        }
        ctx
    }
}

// `as u32` saturates, so out-of-range values clamp to 0 or u32::MAX.
fn read_number(value: &Value, field: &'static str) -> Result<Option<f64>> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| AnalysisError::InvalidSenderContext {
                field,
                reason: format!("{n} is not a finite number"),
            }),
        Some(other) => Err(AnalysisError::InvalidSenderContext {
            field,
            reason: format!("expected a number, got {other}"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Analysis result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub message_analyzed: String,
    pub risk_level: Severity,
    pub red_flags: Vec<Finding>,
    pub confidence: f64,
    pub recommendations: Vec<String>,
}

impl AnalysisResult {
    pub fn empty() -> Self {
        Self {
            message_analyzed: String::new(),
            risk_level: Severity::Low,
            red_flags: Vec::new(),
            confidence: 0.0,
            recommendations: Vec::new(),
        }
    }

    pub fn degraded(message_analyzed: String) -> Self {
        Self {
            message_analyzed,
            recommendations: vec![crate::scoring::ANALYSIS_ERROR_ADVICE.to_string()],
            ..Self::empty()
        }
    }

    pub fn is_flagged(&self) -> bool {
        !self.red_flags.is_empty()
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Message: \"{}\"", self.message_analyzed)?;
        writeln!(
            f,
            "{} Risk level: {}",
            self.risk_level.emoji(),
            self.risk_level.as_str().to_uppercase()
        )?;
        writeln!(f, "Confidence: {:.1}%", self.confidence * 100.0)?;

        if self.red_flags.is_empty() {
            writeln!(f, "No red flags detected")?;
        } else {
            writeln!(f, "Red flags:")?;
            let mut sorted = self.red_flags.clone();
            sorted.sort_by(|a, b| b.severity.cmp(&a.severity));
            for flag in &sorted {
                writeln!(
                    f,
                    "  {} [{}] {}",
                    flag.severity.emoji(),
                    flag.category,
                    flag.explanation
                )?;
            }
        }

        if !self.recommendations.is_empty() {
            writeln!(f, "Recommendations:")?;
            for rec in &self.recommendations {
                writeln!(f, "  {rec}")?;
            }
        }
        Ok(())
    }
}
