use std::sync::LazyLock;

use crate::shared::categories::{sorted_by_label, Category};
use crate::shared::matcher::{matching_texts, phrase_set, Phrase};
use crate::shared::results::{Evidence, TacticResult};
use crate::shared::tables;

/// Loss, denial, or cancellation language. Financial Pressure only
/// triggers when the message implies the recipient stands to lose
/// something, never on a completed transaction.
const FINANCIAL_LOSS_INDICATORS: &[&str] = &[
    "could not be processed",
    "unable to process",
    "payment failed",
    "payment rejected",
    "transaction declined",
    "billing issue",
    "processing issue",
    "account restricted",
    "temporary suspension",
    "avoid cancellation",
    "prevent cancellation",
    "account closure",
    "avoid account closure",
    "overdue",
    "rejected",
    "failed",
    "declined",
    "restricted",
    "suspended",
    "penalty",
];

/// Action demands aimed at financial data.
const FINANCIAL_COERCION_INDICATORS: &[&str] = &[
    "confirm your",
    "update your",
    "verify your",
    "submit your",
    "provide your",
    "share your",
    "update bank details",
    "confirm bank details",
    "verify bank details",
    "confirm account",
    "update account",
    "verify account",
];

/// Completed-transaction language; suppresses both financial tactics.
const FINANCIAL_NEGATIVE_INTENT: &[&str] = &[
    "successfully",
    "completed",
    "has been credited",
    "has been processed",
    "processed successfully",
    "payment successful",
    "no further action",
    "no action required",
    "no action needed",
    "thank you",
    "refund processed",
    "refund completed",
    "salary credited",
    "invoice paid",
    "payment completed",
];

/// Term pairs that imply financial pressure when both sides co-occur,
/// even though neither is a loss indicator on its own.
const FINANCIAL_COMPOUND_PAIRS: &[(&str, &str)] = &[
    ("refund", "confirm"),
    ("refund", "verify"),
    ("billing", "update"),
    ("payment", "verify"),
    ("invoice", "update"),
    ("account", "confirm"),
];

/// Weight of the context-gated financial tactics; the table categories
/// carry the same weight per entry.
const FINANCIAL_TACTIC_WEIGHT: u32 = 15;
const PHRASE_BONUS: u32 = 5;
const SCORE_CAP: u32 = 100;

static LOSS_INDICATORS: LazyLock<Vec<Phrase>> =
    LazyLock::new(|| phrase_set(FINANCIAL_LOSS_INDICATORS));
static COERCION_INDICATORS: LazyLock<Vec<Phrase>> =
    LazyLock::new(|| phrase_set(FINANCIAL_COERCION_INDICATORS));
static NEGATIVE_INTENT: LazyLock<Vec<Phrase>> =
    LazyLock::new(|| phrase_set(FINANCIAL_NEGATIVE_INTENT));
static COMPOUND_TERMS: LazyLock<Vec<(Phrase, Phrase)>> = LazyLock::new(|| {
    FINANCIAL_COMPOUND_PAIRS
        .iter()
        .map(|(financial, action)| (Phrase::new(*financial), Phrase::new(*action)))
        .collect()
});

/// Classify the psychological manipulation tactics in a message.
///
/// Score = per-category weight for every triggered tactic plus a flat
/// bonus per matched phrase, capped at 100.
pub fn classify(text: &str) -> TacticResult {
    // (category, matched phrases) in detection order
    let mut detected: Vec<(Category, Vec<String>)> = Vec::new();

    for matched in tables::tactic_table().scan(text) {
        let phrases = matched.phrases.iter().map(|p| p.to_string()).collect();
        detected.push((matched.category, phrases));
    }

    let has_negative_intent = NEGATIVE_INTENT.iter().any(|p| p.is_match(text));
    if !has_negative_intent {
        let fp_matched = matching_texts(&LOSS_INDICATORS, text);
        let pressure_fired = !fp_matched.is_empty();
        if pressure_fired {
            detected.push((
                Category::FinancialPressure,
                fp_matched.iter().map(|p| p.to_string()).collect(),
            ));
        }

        let fc_matched = matching_texts(&COERCION_INDICATORS, text);
        if !fc_matched.is_empty() {
            detected.push((
                Category::FinancialCoercion,
                fc_matched.iter().map(|p| p.to_string()).collect(),
            ));
        }

        // Pair fallback: "refund ... confirm" reads as pressure even when
        // no single indicator phrase matched.
        if !pressure_fired {
            for (financial, action) in COMPOUND_TERMS.iter() {
                if financial.is_match(text) && action.is_match(text) {
                    detected.push((
                        Category::FinancialPressure,
                        vec![format!("{} + {}", financial.text(), action.text())],
                    ));
                    break;
                }
            }
        }
    }

    if detected.is_empty() {
        return TacticResult {
            raw_score: 0,
            normalized_score: 0,
            categories: Vec::new(),
            matched_evidence: Vec::new(),
            explanation: "No psychological manipulation tactics detected.".to_string(),
        };
    }

    let tactic_weight_total: u32 = detected
        .iter()
        .map(|(category, _)| {
            tables::tactic_table()
                .group(*category)
                .map(|g| g.weight)
                .unwrap_or(FINANCIAL_TACTIC_WEIGHT)
        })
        .sum();
    let total_matches: u32 = detected.iter().map(|(_, phrases)| phrases.len() as u32).sum();
    let raw_score = tactic_weight_total + total_matches * PHRASE_BONUS;
    let normalized_score = raw_score.min(SCORE_CAP);

    let mut evidence: Vec<Evidence> = Vec::new();
    for (category, phrases) in &detected {
        for phrase in phrases {
            evidence.push(Evidence::new(phrase.clone(), *category));
        }
    }

    let categories = sorted_by_label(detected.iter().map(|(c, _)| *c).collect());
    let explanation = build_explanation(&categories, &detected);

    TacticResult {
        raw_score,
        normalized_score,
        categories,
        matched_evidence: evidence,
        explanation,
    }
}

/// "Detected N manipulation tactic(s): Fear ("blocked"); …" with up to
/// three sample phrases per category, in sorted category order.
fn build_explanation(categories: &[Category], detected: &[(Category, Vec<String>)]) -> String {
    let parts: Vec<String> = categories
        .iter()
        .map(|category| {
            let phrases = detected
                .iter()
                .find(|(c, _)| c == category)
                .map(|(_, p)| p.as_slice())
                .unwrap_or_default();
            let sample: Vec<String> = phrases.iter().take(3).map(|p| format!("\"{p}\"")).collect();
            format!("{} ({})", category.as_str(), sample.join(", "))
        })
        .collect();

    format!(
        "Detected {} manipulation tactic(s): {}.",
        categories.len(),
        parts.join("; ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(result: &TacticResult) -> Vec<&'static str> {
        result.categories.iter().map(|c| c.as_str()).collect()
    }

    // --- Table tactics ---

    #[test]
    fn clean_text_reports_nothing() {
        let result = classify("See you at the station at six.");
        assert_eq!(result.normalized_score, 0);
        assert!(result.categories.is_empty());
        assert_eq!(
            result.explanation,
            "No psychological manipulation tactics detected."
        );
    }

    #[test]
    fn fear_and_urgency_score_with_phrase_bonus() {
        let result = classify("Your account has been blocked. Act now!");
        assert_eq!(result.raw_score, 40, "two tactics + two phrases");
        assert_eq!(labels(&result), vec!["Fear", "Urgency"]);
        assert_eq!(
            result.explanation,
            "Detected 2 manipulation tactic(s): Fear (\"blocked\"); Urgency (\"act now\")."
        );
    }

    #[test]
    fn explanation_samples_three_phrases() {
        let result = classify("urgent act now, hurry, don't delay, last chance");
        assert!(result
            .explanation
            .contains("Urgency (\"urgent\", \"act now\", \"last chance\")"));
    }

    // --- Context-gated financial tactics ---

    #[test]
    fn loss_plus_coercion_both_fire() {
        let result =
            classify("Your refund could not be processed. Confirm your bank details within 6 hours.");
        assert_eq!(labels(&result), vec!["Financial Coercion", "Financial Pressure"]);
        assert_eq!(result.normalized_score, 40, "two tactics + two phrases");
    }

    #[test]
    fn negative_intent_suppresses_financial_tactics() {
        let result = classify("Your refund of 2499 has been processed successfully. Thank you.");
        assert_eq!(result.normalized_score, 0);
        assert!(result.categories.is_empty());
    }

    #[test]
    fn coercion_fires_on_benign_sounding_confirm() {
        let result = classify("Please confirm your booking for tomorrow.");
        assert_eq!(labels(&result), vec!["Financial Coercion"]);
        assert_eq!(result.normalized_score, 20);
    }

    #[test]
    fn compound_pair_covers_split_terms() {
        let result = classify("Refund will be initiated once you confirm.");
        assert_eq!(labels(&result), vec!["Financial Pressure"]);
        assert_eq!(result.normalized_score, 20);
        assert!(result
            .matched_evidence
            .iter()
            .any(|e| e.phrase == "refund + confirm"));
    }

    #[test]
    fn compound_pair_skipped_when_pressure_already_fired() {
        let result = classify("Payment failed, verify today.");
        let pressure_evidence: Vec<&str> = result
            .matched_evidence
            .iter()
            .filter(|e| e.category == Category::FinancialPressure)
            .map(|e| e.phrase.as_str())
            .collect();
        assert_eq!(pressure_evidence, vec!["payment failed", "failed"]);
    }

    // --- Saturation ---

    #[test]
    fn score_caps_at_100() {
        let result = classify(
            "Urgent act now: account blocked and suspended. RBI officer says penalty. \
             Congratulations lucky winner, limited time offer expires today. \
             Emergency please help, need money send money.",
        );
        assert!(result.raw_score > 100);
        assert_eq!(result.normalized_score, 100);
    }
}
