pub mod financial;
pub mod social;

use std::sync::LazyLock;

use regex::Regex;

use crate::detectors::urls;
use crate::shared::categories::{sorted_by_label, Category};
use crate::shared::results::{DetectionFlags, DetectionResult, Evidence, UrlAnalysis};
use crate::shared::tables;

/// Concrete deadline shapes: "within 6 hours", "in 30 mins", "by 5 pm",
/// "by tomorrow". First pattern to land wins; one contribution per message.
static DYNAMIC_TIME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bwithin\s+\d+\s*(?:hours?|hrs?|days?|minutes?|mins?)\b",
        r"(?i)\bin\s+\d+\s*(?:hours?|hrs?|days?|minutes?|mins?)\b",
        r"(?i)\bbefore\s+\d{1,2}\s*(?:am|pm)\b",
        r"(?i)\bby\s+\d{1,2}\s*(?:am|pm)\b",
        r"(?i)\bby\s+(?:today|tomorrow)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

const DYNAMIC_URGENCY_WEIGHT: u32 = 10;

/// Raw minimum when a financial request rides on any form of urgency.
/// A floor, never a ceiling: higher raw scores pass through untouched.
const FINANCIAL_URGENCY_RAW_FLOOR: u32 = 37;

const NORMALIZATION_DIVISOR: f64 = 60.0;

/// Run the rule pass with the built-in URL scanner.
pub fn detect(text: &str) -> DetectionResult {
    detect_with_urls(text, urls::scan(text))
}

/// Run the rule pass against a pre-resolved URL analysis. Passes run in a
/// fixed order because later ones consume the earlier verdicts: keyword
/// scan, dynamic urgency, URL merge, financial context, legacy compound,
/// social impersonation, floors, normalization.
pub fn detect_with_urls(text: &str, url: UrlAnalysis) -> DetectionResult {
    let mut raw_score: u32 = 0;
    let mut categories: Vec<Category> = Vec::new();
    let mut evidence: Vec<Evidence> = Vec::new();

    for matched in tables::scam_table().scan(text) {
        raw_score += matched.weight * matched.phrases.len() as u32;
        tag(&mut categories, matched.category);
        for phrase in matched.phrases {
            evidence.push(Evidence::new(phrase, matched.category));
        }
    }

    let mut has_dynamic_urgency = false;
    for pattern in DYNAMIC_TIME_PATTERNS.iter() {
        if let Some(m) = pattern.find(text) {
            raw_score += DYNAMIC_URGENCY_WEIGHT;
            evidence.push(Evidence::new(m.as_str(), Category::DynamicUrgency));
            tag(&mut categories, Category::DynamicUrgency);
            has_dynamic_urgency = true;
            break;
        }
    }

    raw_score += url.url_score;
    let has_suspicious_url = !url.suspicious_urls.is_empty();
    if has_suspicious_url {
        tag(&mut categories, Category::SuspiciousUrl);
    }

    // Needed before the financial check: OTP is one of its escalation signals.
    let has_otp = categories.iter().any(|c| c.is_otp());

    let (financial_bonus, financial_evidence) =
        financial::detect_contextual(text, has_dynamic_urgency, has_suspicious_url, has_otp);
    raw_score += financial_bonus;
    evidence.extend(financial_evidence);
    if financial_bonus > 0 {
        tag(&mut categories, Category::FinancialDataRequest);
    }

    let already_financial = categories.contains(&Category::FinancialDataRequest);
    let has_time_pressure =
        has_dynamic_urgency || categories.iter().any(|c| c.is_keyword_urgency());
    let (compound_bonus, compound_evidence) =
        financial::detect_legacy_compound(text, already_financial, has_time_pressure);
    raw_score += compound_bonus;
    evidence.extend(compound_evidence);
    if compound_bonus > 0 {
        tag(&mut categories, Category::FinancialDataRequest);
    }

    let keyword_urgency = categories.iter().any(|c| c.is_keyword_urgency());
    let social = social::detect(text, keyword_urgency);
    raw_score += social.bonus;
    evidence.extend(social.evidence);
    if social.bonus > 0 {
        tag(&mut categories, Category::SocialImpersonation);
    }

    let has_financial_request = categories.contains(&Category::FinancialDataRequest);
    let has_any_urgency = categories.iter().any(|c| c.is_urgency());
    if has_financial_request && has_any_urgency {
        raw_score = raw_score.max(FINANCIAL_URGENCY_RAW_FLOOR);
    }

    let normalized_score = ((raw_score as f64 / NORMALIZATION_DIVISOR * 100.0).min(100.0)) as u32;

    DetectionResult {
        raw_score,
        normalized_score,
        categories: sorted_by_label(categories),
        matched_evidence: evidence,
        flags: DetectionFlags {
            has_otp,
            has_suspicious_url,
            has_money_request: social.has_money_request,
            has_financial_request,
            has_dynamic_urgency,
        },
        url,
    }
}

fn tag(categories: &mut Vec<Category>, category: Category) {
    if !categories.contains(&category) {
        categories.push(category);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(result: &DetectionResult) -> Vec<&'static str> {
        result.categories.iter().map(|c| c.as_str()).collect()
    }

    fn has_phrase(result: &DetectionResult, phrase: &str) -> bool {
        result.matched_evidence.iter().any(|e| e.phrase == phrase)
    }

    // --- Benign messages ---

    #[test]
    fn empty_text_scores_zero() {
        let result = detect("");
        assert_eq!(result.raw_score, 0);
        assert_eq!(result.normalized_score, 0);
        assert!(result.categories.is_empty());
        assert!(result.matched_evidence.is_empty());
        assert!(!result.flags.has_otp);
        assert!(!result.flags.has_money_request);
    }

    #[test]
    fn completed_refund_is_suppressed() {
        let result = detect("Your refund of 2499 has been processed successfully. Thank you.");
        assert_eq!(result.normalized_score, 0);
        assert!(result.categories.is_empty());
    }

    #[test]
    fn benign_booking_confirmation_scores_zero() {
        let result = detect("Please confirm your booking for tomorrow.");
        assert_eq!(result.normalized_score, 0);
        assert!(result.categories.is_empty());
    }

    // --- Financial escalation ---

    #[test]
    fn refund_phish_hits_the_urgency_floor() {
        let result = detect(
            "Your refund could not be processed. Confirm your bank details within 6 hours.",
        );
        assert_eq!(result.raw_score, 37, "floored from 26");
        assert_eq!(result.normalized_score, 61);
        assert_eq!(labels(&result), vec!["dynamic_urgency", "financial_data_request"]);
        assert!(result.flags.has_financial_request);
        assert!(result.flags.has_dynamic_urgency);
        assert!(has_phrase(&result, "financial term + action verb (confirm)"));
    }

    #[test]
    fn financial_without_urgency_stays_low() {
        let result = detect("Please confirm your account details.");
        assert_eq!(result.raw_score, 16);
        assert_eq!(result.normalized_score, 26);
        assert_eq!(labels(&result), vec!["financial_data_request"]);
    }

    #[test]
    fn legacy_compound_covers_bare_account() {
        let result = detect("Update your account immediately");
        assert_eq!(result.raw_score, 37, "12 urgency + 16 compound, floored");
        assert_eq!(result.normalized_score, 61);
        assert_eq!(labels(&result), vec!["financial_data_request", "urgency"]);
        assert!(has_phrase(
            &result,
            "account + confirm/verify/update + time pressure"
        ));
    }

    // --- Keyword and URL stacking ---

    #[test]
    fn otp_with_suspicious_url() {
        let result = detect("Share OTP immediately at http://secure-update.in");
        assert_eq!(result.raw_score, 45, "18 otp + 12 urgency + 15 url");
        assert_eq!(result.normalized_score, 75);
        assert_eq!(labels(&result), vec!["otp", "suspicious_url", "urgency"]);
        assert!(result.flags.has_otp);
        assert!(result.flags.has_suspicious_url);
    }

    #[test]
    fn hindi_otp_pressure_saturates() {
        let result = detect("Turant OTP bhejein warna account band ho jayega");
        assert_eq!(result.raw_score, 76);
        assert_eq!(result.normalized_score, 100);
        assert!(result.flags.has_otp);
        assert_eq!(
            labels(&result),
            vec!["hindi_fear", "hindi_otp_personal", "hindi_urgency", "otp"]
        );
    }

    #[test]
    fn each_matched_phrase_adds_its_weight() {
        // "blocked" and "suspended" both sit in the fear list.
        let result = detect("Account blocked and card suspended");
        assert_eq!(result.raw_score, 28);
    }

    // --- Dynamic urgency ---

    #[test]
    fn dynamic_urgency_counts_once() {
        let result = detect("Reply within 2 hours or in 3 days or by 5 pm");
        assert_eq!(result.raw_score, DYNAMIC_URGENCY_WEIGHT);
        let dynamic: Vec<_> = result
            .matched_evidence
            .iter()
            .filter(|e| e.category == Category::DynamicUrgency)
            .collect();
        assert_eq!(dynamic.len(), 1);
        assert_eq!(dynamic[0].phrase, "within 2 hours");
    }

    // --- Social impersonation ---

    #[test]
    fn family_money_urgency_compound() {
        let result = detect("Hi Dad I lost my phone send 10000 urgently");
        assert_eq!(result.raw_score, 42, "12 urgency + 20 social + 10 boost");
        assert_eq!(result.normalized_score, 70);
        assert_eq!(labels(&result), vec!["social_impersonation", "urgency"]);
        assert!(result.flags.has_money_request);
    }

    // --- Determinism ---

    #[test]
    fn detection_is_idempotent() {
        let text = "Your account will be blocked, verify kyc immediately at http://bit.ly/x";
        let first = detect(text);
        let second = detect(text);
        assert_eq!(first.raw_score, second.raw_score);
        assert_eq!(first.normalized_score, second.normalized_score);
        assert_eq!(labels(&first), labels(&second));
    }
}
