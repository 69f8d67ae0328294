//! In-process orchestration around the analyzer: de-duplicates inbound
//! messages, tallies risk levels and keeps a short history of alerts.
//! Sourcing messages and acting on alerts is left to the caller.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use lru::LruCache;

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::model::{AnalysisResult, Finding, SenderContext, Severity};
use crate::HP;

// ---------------------------------------------------------------------------
// Inbound messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct InboundMessage {
    pub id: String,
    pub sender: String,
    pub text: String,
    pub is_from_me: bool,
    pub message_frequency: Option<u32>,
    pub account_age_days: Option<u32>,
}

impl InboundMessage {
    pub fn new(id: impl Into<String>, sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn from_me(mut self) -> Self {
        self.is_from_me = true;
        self
    }

    pub fn with_context(mut self, ctx: SenderContext) -> Self {
        self.message_frequency = ctx.message_frequency;
        self.account_age_days = ctx.account_age_days;
        self
    }

    fn sender_context(&self) -> Option<SenderContext> {
        if self.message_frequency.is_none() && self.account_age_days.is_none() {
            return None;
        }
        Some(SenderContext {
            message_frequency: self.message_frequency,
            account_age_days: self.account_age_days,
        })
    }
}

// ---------------------------------------------------------------------------
// Seen-message cache
// ---------------------------------------------------------------------------

// Bounded set of message ids. Lookups never promote, so eviction is in
// insertion order.
#[derive(Debug)]
pub struct SeenMessages {
    ids: LruCache<String, ()>,
}

impl SeenMessages {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            ids: LruCache::new(capacity),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    // false if the id was already present
    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.put(id.to_string(), ());
        true
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.ids.cap().get()
    }
}

// ---------------------------------------------------------------------------
// Alerts and stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub message_id: String,
    pub sender: String,
    pub message: String,
    pub risk_level: Severity,
    pub red_flags: Vec<Finding>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TriageStats {
    pub messages_scanned: usize,
    pub low_count: usize,
    pub medium_count: usize,
    pub high_count: usize,
    pub critical_count: usize,
}

impl TriageStats {
    fn record(&mut self, risk: Severity) {
        self.messages_scanned += 1;
        match risk {
            Severity::Low => self.low_count += 1,
            Severity::Medium => self.medium_count += 1,
            Severity::High => self.high_count += 1,
            Severity::Critical => self.critical_count += 1,
        }
    }

    pub fn total_alerts(&self) -> usize {
        self.high_count + self.critical_count
    }
}

// ---------------------------------------------------------------------------
// Triage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct TriageConfig {
    pub seen_capacity: usize,
    pub alert_history: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            seen_capacity: HP.seen_cache_capacity,
            alert_history: HP.alert_history_cap,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TriageOutcome {
    pub message_id: String,
    pub analysis: AnalysisResult,
    pub alert: Option<Alert>,
}

#[derive(Debug)]
pub struct Triage {
    seen: SeenMessages,
    alerts: VecDeque<Alert>,
    alert_history: usize,
    stats: TriageStats,
}

impl Triage {
    pub fn new(config: TriageConfig) -> Self {
        Self {
            seen: SeenMessages::new(config.seen_capacity),
            alerts: VecDeque::new(),
            alert_history: config.alert_history,
            stats: TriageStats::default(),
        }
    }

    pub fn process(&mut self, msg: &InboundMessage) -> Option<TriageOutcome> {
        if msg.is_from_me {
            debug!(id = %msg.id, "skipping own message");
            return None;
        }
        if !self.seen.insert(&msg.id) {
            debug!(id = %msg.id, "skipping already processed message");
            return None;
        }

        let ctx = msg.sender_context();
        let analysis = crate::analyze_message(&msg.text, ctx.as_ref());
        self.stats.record(analysis.risk_level);

        let alert = (analysis.risk_level >= Severity::High).then(|| {
            let alert = Alert {
                message_id: msg.id.clone(),
                sender: msg.sender.clone(),
                message: analysis.message_analyzed.clone(),
                risk_level: analysis.risk_level,
                red_flags: analysis.red_flags.clone(),
                recommendations: analysis.recommendations.clone(),
            };
            if alert.risk_level == Severity::Critical {
                error!(sender = %alert.sender, message = %alert.message, "critical red flag");
            } else {
                warn!(sender = %alert.sender, "high risk message");
            }
            self.push_alert(alert.clone());
            alert
        });

        Some(TriageOutcome {
            message_id: msg.id.clone(),
            analysis,
            alert,
        })
    }

    fn push_alert(&mut self, alert: Alert) {
        if self.alert_history == 0 {
            return;
        }
        if self.alerts.len() == self.alert_history {
            self.alerts.pop_front();
        }
        self.alerts.push_back(alert);
    }

    // newest first
    pub fn recent_alerts(&self, n: usize) -> Vec<&Alert> {
        self.alerts.iter().rev().take(n).collect()
    }

    pub fn stats(&self) -> TriageStats {
        self.stats
    }

    pub fn seen(&self) -> &SeenMessages {
        &self.seen
    }
}

impl Default for Triage {
    fn default() -> Self {
        Self::new(TriageConfig::default())
    }
}
