use crate::model::{Finding, Severity};

pub const ANALYSIS_ERROR_ADVICE: &str = "Analysis error occurred - exercise caution";

const CRITICAL_ADVICE: &[&str] = &[
    "🚨 BLOCK IMMEDIATELY - This person shows dangerous behavior patterns",
    "📸 Screenshot the conversation for evidence",
    "📞 Consider reporting to the platform and local authorities if threatened",
    "💰 NEVER send money to someone you've only met online",
];

const HIGH_ADVICE: &[&str] = &[
    "⚠️ PROCEED WITH EXTREME CAUTION",
    "🚫 Do not share personal information",
    "👥 Tell a trusted friend about this interaction",
    "🔒 Consider blocking if behavior continues",
];

const MEDIUM_ADVICE: &[&str] = &[
    "⚡ BE CAUTIOUS - Some concerning patterns detected",
    "🎭 Keep conversations light and public",
    "🚫 Avoid sharing personal details",
    "👀 Watch for escalating behavior",
];

const LOW_ADVICE: &[&str] = &["✅ Conversation appears relatively safe, but stay alert"];

// Checked in this order.
const CATEGORY_ADVICE: &[(&str, &str)] = &[
    (
        "financial",
        "💰 NEVER send money to someone you haven't met in person",
    ),
    (
        "manipulation",
        "🧠 Trust your instincts - manipulation tactics are red flags",
    ),
    (
        "personal_info",
        "🔐 Keep personal information private until you've met safely",
    ),
    (
        "sexual",
        "🚫 You're not obligated to send photos or engage sexually",
    ),
];

pub fn aggregate(findings: &[Finding]) -> (Severity, f64) {
    let Some(risk) = findings.iter().map(|f| f.severity).max() else {
        return (Severity::Low, 0.0);
    };
    let mean = findings.iter().map(|f| f.confidence).sum::<f64>() / findings.len() as f64;
    (risk, mean)
}

pub fn recommend(risk: Severity, findings: &[Finding]) -> Vec<String> {
    let base = match risk {
        Severity::Critical => CRITICAL_ADVICE,
        Severity::High => HIGH_ADVICE,
        Severity::Medium => MEDIUM_ADVICE,
        Severity::Low => LOW_ADVICE,
    };

    let mut advice: Vec<String> = base.iter().map(|s| s.to_string()).collect();
    for (fragment, text) in CATEGORY_ADVICE {
        if findings.iter().any(|f| f.category.contains(*fragment)) {
            advice.push(text.to_string());
        }
    }
    advice
}
