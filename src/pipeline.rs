use std::sync::LazyLock;

use regex::Regex;

use crate::detectors::{rules, tactics};
use crate::shared::fusion::{self, FusionInputs};
use crate::shared::profiles::{self, Profile};
use crate::shared::results::{Analysis, SemanticVerdict};

/// Longest message accepted from callers, in characters.
pub const MAX_MESSAGE_LEN: usize = 5000;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\S\n]+").unwrap());

/// Normalize caller input: trim, collapse every run of non-newline
/// whitespace to a single space, keep line structure intact. Empty and
/// oversized messages are rejected.
pub fn sanitize(text: &str) -> Result<String, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("message is empty".to_string());
    }
    let collapsed = WHITESPACE_RUN.replace_all(trimmed, " ").into_owned();
    if collapsed.chars().count() > MAX_MESSAGE_LEN {
        return Err(format!("message exceeds {MAX_MESSAGE_LEN} characters"));
    }
    Ok(collapsed)
}

/// Run the full scoring pass over one message.
///
/// Pure: no I/O, no globals beyond the lazily compiled phrase tables.
/// The caller resolves the profile and the external verdict; fusion
/// consumes the profile-adjusted scores, not the detector outputs.
pub fn analyze(text: &str, profile: Profile, verdict: &SemanticVerdict) -> Analysis {
    let rules = rules::detect(text);
    let tactics = tactics::classify(text);

    let adjustment = profiles::adjust(
        rules.normalized_score,
        tactics.normalized_score,
        &rules.categories,
        &tactics.categories,
        profile,
    );

    let fusion = fusion::fuse(&FusionInputs {
        rule_score: adjustment.adjusted_rule_score,
        tactic_score: adjustment.adjusted_tactic_score,
        verdict,
        flags: rules.flags,
        rule_categories: &rules.categories,
        profile,
    });

    Analysis {
        message: text.to_string(),
        rules,
        tactics,
        adjustment,
        semantic: verdict.clone(),
        fusion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::fusion::{Dominance, RiskLevel};

    #[test]
    fn clean_message_stays_low_everywhere() {
        let verdict = SemanticVerdict::disabled();
        let analysis = analyze("See you at the station at six.", Profile::General, &verdict);
        assert_eq!(analysis.rules.normalized_score, 0);
        assert_eq!(analysis.tactics.normalized_score, 0);
        assert_eq!(analysis.fusion.final_score, 0);
        assert_eq!(analysis.fusion.risk_level, RiskLevel::Low);
        assert!(analysis.fusion.guards_fired.is_empty());
    }

    #[test]
    fn refund_phish_lands_on_the_financial_floor() {
        let verdict = SemanticVerdict::new(0.7, 0.8, "SCAM");
        let analysis = analyze(
            "Your refund could not be processed. Confirm your bank details within 6 hours.",
            Profile::General,
            &verdict,
        );
        assert_eq!(analysis.rules.normalized_score, 61);
        assert_eq!(analysis.tactics.normalized_score, 40);
        // blend lands at 62, the URL-less financial floor lifts it to 65
        assert_eq!(analysis.fusion.final_score, 65);
        assert_eq!(analysis.fusion.risk_level, RiskLevel::High);
        assert_eq!(analysis.fusion.guards_fired, vec!["financial_urgency_floor"]);
    }

    #[test]
    fn elderly_profile_escalates_family_impersonation() {
        let verdict = SemanticVerdict::disabled();
        let text = "Hi Dad I lost my phone send 10000 urgently";

        let general = analyze(text, Profile::General, &verdict);
        assert_eq!(general.fusion.final_score, 70);
        assert_eq!(general.fusion.risk_level, RiskLevel::High);

        let elderly = analyze(text, Profile::Elderly, &verdict);
        assert_eq!(elderly.adjustment.adjusted_rule_score, 77);
        assert_eq!(elderly.adjustment.adjusted_tactic_score, 49);
        assert_eq!(
            elderly.adjustment.multipliers_applied,
            vec![(crate::shared::categories::Category::EmotionalManipulation, 1.4)]
        );
        // boost applies on top of the adjusted score even with the
        // external classifier off
        assert_eq!(elderly.fusion.final_score, 92);
        assert_eq!(elderly.fusion.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn otp_plus_url_overrides_a_dismissive_external_verdict() {
        let verdict = SemanticVerdict::new(0.05, 0.9, "SAFE");
        let analysis = analyze(
            "Share OTP immediately at http://secure-update.in",
            Profile::General,
            &verdict,
        );
        assert_eq!(analysis.fusion.final_score, 90);
        assert_eq!(analysis.fusion.risk_level, RiskLevel::Critical);
        assert_eq!(analysis.fusion.guards_fired, vec!["critical_override"]);
        assert_eq!(analysis.fusion.dominance, Dominance::RuleDominant);
    }

    #[test]
    fn verdict_and_message_carry_through() {
        let verdict = SemanticVerdict::new(0.42, 0.9, "SCAM");
        let analysis = analyze("hello", Profile::Student, &verdict);
        assert_eq!(analysis.message, "hello");
        assert_eq!(analysis.semantic.label, "SCAM");
        assert_eq!(analysis.adjustment.profile_used, Profile::Student);
    }

    // --- Sanitizer ---

    #[test]
    fn sanitize_collapses_runs_but_keeps_newlines() {
        let cleaned = sanitize("  Dear   user,\nverify \t your  account  ").unwrap();
        assert_eq!(cleaned, "Dear user,\nverify your account");
    }

    #[test]
    fn sanitize_rejects_empty_and_oversized() {
        assert!(sanitize("   \t\n ").is_err());
        let long = "a".repeat(MAX_MESSAGE_LEN + 1);
        assert!(sanitize(&long).is_err());
        let exact = "a".repeat(MAX_MESSAGE_LEN);
        assert_eq!(sanitize(&exact).unwrap().len(), MAX_MESSAGE_LEN);
    }
}
