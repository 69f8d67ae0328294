use red_flag_filter::catalog::SubcategoryDef;
use red_flag_filter::scoring::{aggregate, ANALYSIS_ERROR_ADVICE};
use red_flag_filter::{
    analyze_message, analyze_value, analyze_with_catalog, AnalysisResult, Catalog, Finding,
    SenderContext, Severity,
};
use serde_json::json;

fn categories(result: &AnalysisResult) -> Vec<&str> {
    result
        .red_flags
        .iter()
        .map(|f| f.category.as_str())
        .collect()
}

#[test]
fn friendly_greeting_is_low() {
    let result = analyze_message("Hi! How's your day going? 😊", None);
    assert_eq!(result.risk_level, Severity::Low);
    assert!(result.red_flags.is_empty());
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.recommendations.len(), 1);
}

#[test]
fn empty_and_whitespace_messages_are_low() {
    for message in ["", "   ", "\n\t  \n"] {
        let result = analyze_message(message, None);
        assert_eq!(result.risk_level, Severity::Low, "message {message:?}");
        assert!(result.red_flags.is_empty());
        assert_eq!(result.confidence, 0.0);
        assert!(result.recommendations.is_empty());
    }
}

#[test]
fn venmo_request_is_critical() {
    let result = analyze_message("send me $500 on Venmo", None);
    assert_eq!(result.risk_level, Severity::Critical);
    assert!(
        result
            .red_flags
            .iter()
            .any(|f| f.category.starts_with("financial_scams")),
        "expected a financial_scams finding, got {:?}",
        categories(&result)
    );
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.contains("haven't met in person")));
}

#[test]
fn stranded_story_triggers_compound_heuristics() {
    let result = analyze_message(
        "I'm stranded at the airport and need $300 for a flight home. I promise I'll pay you back",
        None,
    );
    assert_eq!(result.risk_level, Severity::Critical);
    let cats = categories(&result);
    assert!(cats.contains(&"financial_scams_sophisticated_scams"));
    assert!(cats.contains(&"financial_scam_promise"));

    let stranded = result
        .red_flags
        .iter()
        .find(|f| f.category == "financial_scam_stranded")
        .expect("stranded + money should fire");
    assert_eq!(stranded.confidence, 0.95);
    assert_eq!(stranded.rule, "stranded_money_combination");
}

#[test]
fn guilt_trip_scenario_is_high() {
    let result = analyze_message(
        "Why aren't you responding? If you really cared about me you'd answer right now",
        None,
    );
    assert_eq!(result.risk_level, Severity::High);
    let cats = categories(&result);
    assert!(
        cats.contains(&"manipulation_guilt_tripping")
            || cats.contains(&"boundary_violations_persistent_messaging"),
        "got {cats:?}"
    );
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.contains("Trust your instincts")));
}

#[test]
fn explicit_threat_is_critical() {
    let result = analyze_message(
        "You're being a bitch. I'll find you and make you regret ignoring me",
        None,
    );
    assert_eq!(result.risk_level, Severity::Critical);
    assert!(categories(&result).contains(&"aggressive_language_threats"));
}

#[test]
fn injury_recovery_is_not_a_threat() {
    let messages = [
        "I hurt my back so my physical therapist said don't lift heavy",
        "Lifting heavy? Watch your back, I hurt myself doing that",
    ];
    for message in messages {
        let result = analyze_message(message, None);
        assert!(
            !result
                .red_flags
                .iter()
                .any(|f| f.category.contains("threat") || f.category.contains("aggress")),
            "{message:?} produced {:?}",
            categories(&result)
        );
    }
}

#[test]
fn gaming_celebration_is_not_gaslighting() {
    let result = analyze_message(
        "Crazy dub brothaaaa glad you got to witness it in person",
        None,
    );
    assert_eq!(result.risk_level, Severity::Low);
    assert!(result.red_flags.is_empty(), "got {:?}", categories(&result));
}

#[test]
fn casual_messages_stay_low() {
    for message in ["Just tell me when king", "Miss you too man 🥲"] {
        let result = analyze_message(message, None);
        assert_eq!(result.risk_level, Severity::Low, "message {message:?}");
        assert!(result.red_flags.is_empty());
    }
}

#[test]
fn playful_tone_forgives_love_bombing() {
    let serious = analyze_message("You're perfect, we're soulmates!", None);
    assert_eq!(serious.risk_level, Severity::High);
    assert!(categories(&serious).contains(&"manipulation_love_bombing"));

    let playful = analyze_message("haha you're perfect 😊", None);
    assert_eq!(playful.risk_level, Severity::Low);
}

#[test]
fn sexual_and_personal_info_addenda() {
    let sexual = analyze_message("Send me some pics, what are you wearing? You're so sexy", None);
    assert_eq!(sexual.risk_level, Severity::High);
    assert!(sexual
        .recommendations
        .iter()
        .any(|r| r.contains("not obligated to send photos")));

    let info = analyze_message("What's your address? I want to come see you right now", None);
    assert_eq!(info.risk_level, Severity::High);
    let cats = categories(&info);
    assert!(cats.contains(&"controlling_behavior_personal_info"));
    assert!(cats.contains(&"pressure_tactics_urgency"));
    assert!(info
        .recommendations
        .iter()
        .any(|r| r.contains("Keep personal information private")));
}

#[test]
fn isolation_is_high() {
    let result = analyze_message(
        "Don't tell anyone about us, your friends wouldn't understand our connection",
        None,
    );
    assert_eq!(result.risk_level, Severity::High);
    assert!(categories(&result).contains(&"controlling_behavior_isolation"));
}

#[test]
fn sender_context_adds_findings() {
    let ctx = SenderContext::new()
        .with_frequency(8)
        .with_account_age_days(2);
    let result = analyze_message("hey", Some(&ctx));
    assert_eq!(result.risk_level, Severity::Medium);
    assert_eq!(
        categories(&result),
        vec!["boundary_violation_spam", "suspicious_account"]
    );
    assert!((result.confidence - 0.65).abs() < 1e-9);

    let without = analyze_message("hey", None);
    assert!(without.red_flags.is_empty());
}

#[test]
fn sender_context_is_ignored_for_empty_messages() {
    let ctx = SenderContext::new().with_frequency(50);
    let result = analyze_message("", Some(&ctx));
    assert!(result.red_flags.is_empty());
}

#[test]
fn aggregation_takes_max_and_mean() {
    let findings = [
        Finding::new("a", "r", Severity::Medium, "e", 0.7),
        Finding::new("b", "r", Severity::Critical, "e", 0.9),
        Finding::new("c", "r", Severity::High, "e", 0.8),
    ];
    let (risk, confidence) = aggregate(&findings);
    assert_eq!(risk, Severity::Critical);
    assert!((confidence - 0.8).abs() < 1e-9);
}

#[test]
fn long_messages_are_truncated_in_echo() {
    let message = "hello ".repeat(40);
    let result = analyze_message(&message, None);
    assert_eq!(result.message_analyzed.chars().count(), 103);
    assert!(result.message_analyzed.ends_with("..."));
}

#[test]
fn untyped_input_is_handled() {
    for value in [json!(42), json!(null), json!(["send me $500"]), json!({"text": "hi"})] {
        let result = analyze_value(&value, None);
        assert_eq!(result.risk_level, Severity::Low);
        assert!(result.red_flags.is_empty());
    }

    let result = analyze_value(
        &json!("send me $500 on venmo"),
        Some(&json!({ "message_frequency": "many", "account_age_days": 1 })),
    );
    assert_eq!(result.risk_level, Severity::Critical);
    let cats = categories(&result);
    assert!(cats.contains(&"suspicious_account"));
    assert!(!cats.contains(&"boundary_violation_spam"));
}

#[test]
fn untyped_context_numbers_are_rounded_toward_risk() {
    let result = analyze_value(
        &json!("hey"),
        Some(&json!({ "message_frequency": 6.5, "account_age_days": -1 })),
    );
    assert_eq!(result.risk_level, Severity::Medium);
    assert_eq!(
        categories(&result),
        vec!["boundary_violation_spam", "suspicious_account"]
    );
}

#[test]
fn custom_catalog_replaces_builtin_rules() {
    let defs = [SubcategoryDef {
        category: "spam",
        subcategory: "links",
        severity: Severity::Medium,
        explanation: "Unsolicited link",
        patterns: &[r"https?://\S+"],
    }];
    let catalog = Catalog::compile(&defs).unwrap();

    let result = analyze_with_catalog(&catalog, "check out HTTP://x.co", None);
    assert_eq!(result.risk_level, Severity::Medium);
    assert_eq!(categories(&result), vec!["spam_links"]);

    let result = analyze_with_catalog(&catalog, "you're perfect", None);
    assert!(result.red_flags.is_empty());
}

#[test]
fn degraded_result_advises_caution() {
    let result = AnalysisResult::degraded("whatever".to_string());
    assert_eq!(result.risk_level, Severity::Low);
    assert!(result.red_flags.is_empty());
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.recommendations, vec![ANALYSIS_ERROR_ADVICE.to_string()]);
}

#[test]
fn json_output_is_valid() {
    let result = analyze_message("send me $500 on venmo", None);
    let json = serde_json::to_string_pretty(&result).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["risk_level"], "critical");
    assert!(parsed.get("message_analyzed").is_some());
    assert!(parsed.get("confidence").is_some());
    assert!(parsed.get("recommendations").is_some());

    let flag = &parsed["red_flags"][0];
    assert_eq!(flag["category"], "financial_scams_money_requests");
    assert_eq!(flag["risk_level"], "critical");
    assert!(flag.get("explanation").is_some());
    assert!(flag.get("confidence").is_some());
    assert!(flag.get("rule").is_some());
}

#[test]
fn text_report_lists_flags() {
    let result = analyze_message("send me $500 on venmo", None);
    let report = result.to_string();
    assert!(report.contains("CRITICAL"));
    assert!(report.contains("financial_scams_money_requests"));
}
