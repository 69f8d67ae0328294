use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{AnalysisError, Result};
use crate::model::{Finding, Severity};
use crate::HP;

// ---------------------------------------------------------------------------
// Counter-signal lexicons
// ---------------------------------------------------------------------------

const INJURY_CONTEXTS: &[&str] = &[
    "hurt my back",
    "hurt myself",
    "hurt his back",
    "hurt her back",
    "back hurts",
    "back pain",
    "hurt my knee",
    "hurt my ankle",
    "workout hurt",
    "exercise hurt",
    "gym hurt",
    "pulled muscle",
    "sore",
    "injured",
    "sprained",
    "twisted",
    "strained",
    "physical therapy",
    "therapist said",
    "doctor said",
];

const FRIENDLY_CONTEXTS: &[&str] = &[
    // Gaming and slang
    "game", "gaming", "play", "dub", "win", "victory", "match", "brothaa", "brotha", "bro",
    "king", "homie", "buddy", "dude", "witness", "witnessed", "crazy good", "insane", "wild",
    // Sports
    "sports", "team", "scored", "goal", "touchdown", "basketball", "football", "soccer",
    "baseball", "tennis", "golf",
    // Social media
    "video", "reel", "movie", "show", "clip", "watch", "saw", "youtube", "tiktok", "instagram",
    "story", "post", "funny", "hilarious", "lol", "haha", "joke", "meme",
    // Positive exclamations
    "awesome", "amazing", "congrats", "congratulations", "glad", "happy", "excited", "stoked",
];

const SHARED_POSITIVE_CONTEXTS: &[&str] = &[
    "glad you",
    "happy you",
    "awesome that you",
    "great that you",
    "witness",
    "see",
    "experience",
    "enjoy",
    "celebrate",
    "dub",
    "win",
    "victory",
    "success",
    "achievement",
];

const CELEBRATORY_WORDS: &[&str] = &[
    "crazy good",
    "insane win",
    "wild victory",
    "amazing",
    "awesome",
];

const POSITIVE_TONE: &[&str] = &[
    "lol", "haha", "😊", "😄", "🎉", "💪", "👑", "awesome", "amazing", "great", "good", "nice",
    "congrats", "celebration", "happy", "glad", "excited", "stoked", "pumped", "thrilled",
];

const NEGATIVE_TONE: &[&str] = &[
    "angry", "mad", "furious", "hate", "stupid", "idiot", "kill", "die", "hurt", "destroy",
    "revenge", "payback", "sorry", "regret",
];

// ---------------------------------------------------------------------------
// Grammatical patterns
// ---------------------------------------------------------------------------

struct FilterPatterns {
    injury: Vec<Regex>,
    shared_experience: Vec<Regex>,
}

static FILTER_PATTERNS: Lazy<std::result::Result<FilterPatterns, regex::Error>> =
    Lazy::new(|| {
        let injury = [
            r"\b(i|my|myself|me)\s+.*\bhurt\b",
            r"\bhurt\s+.*\b(my|myself|me)\b",
            r"\b(his|her|their)\s+.*\bhurt\b",
        ]
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

        let shared_experience = [
            r"\bglad\s+you\s+(got\s+to|could|were\s+able\s+to)\b",
            r"\bwitness\s+(it|that|the)\b",
            r"\bsaw\s+(it|that|the)\b.*\b(person|live|firsthand)\b",
        ]
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(FilterPatterns {
            injury,
            shared_experience,
        })
    });

fn patterns() -> Result<&'static FilterPatterns> {
    (*FILTER_PATTERNS)
        .as_ref()
        .map_err(|e| AnalysisError::FilterPattern(e.clone()))
}

// ---------------------------------------------------------------------------
// Suppression rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    InjuryContext,
    // gaming, sports, social media, celebration
    FriendlyContext,
    SharedExperience,
    PositiveTone,
}

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(*t))
}

fn count_present(text: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|t| text.contains(*t)).count()
}

// Each marker counts once.
pub fn is_positive_tone(message_lower: &str) -> bool {
    let positive = count_present(message_lower, POSITIVE_TONE);
    let negative = count_present(message_lower, NEGATIVE_TONE);
    positive > negative && positive > 0
}

fn suppression_for(
    patterns: &FilterPatterns,
    message_lower: &str,
    positive_tone: bool,
    finding: &Finding,
) -> Option<Suppression> {
    let category = finding.category.to_lowercase();

    if (category.contains("hurt") || category.contains("threat"))
        && (contains_any(message_lower, INJURY_CONTEXTS)
            || patterns.injury.iter().any(|re| re.is_match(message_lower)))
    {
        return Some(Suppression::InjuryContext);
    }

    if ["threat", "aggressive", "hurt", "gaslighting"]
        .iter()
        .any(|w| category.contains(*w))
        && contains_any(message_lower, FRIENDLY_CONTEXTS)
    {
        return Some(Suppression::FriendlyContext);
    }

    if category.contains("gaslighting")
        && (contains_any(message_lower, SHARED_POSITIVE_CONTEXTS)
            || contains_any(message_lower, CELEBRATORY_WORDS)
            || patterns
                .shared_experience
                .iter()
                .any(|re| re.is_match(message_lower)))
    {
        return Some(Suppression::SharedExperience);
    }

    if positive_tone
        && finding.severity == Severity::High
        && finding.confidence < HP.tone_leniency_confidence
    {
        return Some(Suppression::PositiveTone);
    }

    None
}

pub fn suppression_reason(message: &str, finding: &Finding) -> Result<Option<Suppression>> {
    let patterns = patterns()?;
    let lower = message.to_lowercase();
    Ok(suppression_for(
        patterns,
        &lower,
        is_positive_tone(&lower),
        finding,
    ))
}

fn retain_plausible(
    patterns: &FilterPatterns,
    message: &str,
    findings: &[Finding],
) -> Vec<Finding> {
    let lower = message.to_lowercase();
    let positive_tone = is_positive_tone(&lower);

    findings
        .iter()
        .filter(|finding| match suppression_for(patterns, &lower, positive_tone, finding) {
            Some(reason) => {
                debug!(category = %finding.category, ?reason, "dropping finding");
                false
            }
            None => true,
        })
        .cloned()
        .collect()
}

pub fn try_filter(message: &str, findings: &[Finding]) -> Result<Vec<Finding>> {
    Ok(retain_plausible(patterns()?, message, findings))
}

// Fails open: without patterns every finding is kept.
fn filter_with(
    patterns: Result<&FilterPatterns>,
    message: &str,
    findings: Vec<Finding>,
) -> Vec<Finding> {
    match patterns {
        Ok(patterns) => retain_plausible(patterns, message, &findings),
        Err(e) => {
            warn!("false-positive filter unavailable, keeping all findings: {e}");
            findings
        }
    }
}

pub fn filter(message: &str, findings: Vec<Finding>) -> Vec<Finding> {
    filter_with(patterns(), message, findings)
}
