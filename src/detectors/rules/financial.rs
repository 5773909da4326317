use std::sync::LazyLock;

use regex::Regex;

use crate::shared::categories::Category;
use crate::shared::matcher::{matching_texts, phrase_set, Phrase};
use crate::shared::results::Evidence;

/// Financial vocabulary that is benign on its own. A neutral term only
/// scores when an escalation signal rides along.
const FINANCIAL_NEUTRAL_TERMS: &[&str] = &[
    "refund",
    "payment",
    "vendor payment",
    "bank details",
    "bank account",
    "transaction",
    "billing",
    "invoice",
    "wire transfer",
    "transfer funds",
    "account information",
    "account details",
    "payment method",
    "payment failed",
    "payment rejected",
    "payment pending",
    "processing issue",
    "billing issue",
    "refund could not be processed",
    "vendor",
    "salary",
    "credited",
    "processed",
    "invoice overdue",
];

/// Verbs and pressure phrases asking the recipient to act.
const FINANCIAL_ACTION_VERBS: &[&str] = &[
    "confirm",
    "update",
    "verify",
    "submit",
    "provide",
    "share",
    "re-enter",
    "click",
    "enter",
    "complete",
    "avoid cancellation",
    "prevent cancellation",
    "to avoid cancellation",
    "avoid account closure",
    "account closure",
    "temporary suspension",
    "account restricted",
];

/// Transaction-completed language. With no action verb and no other
/// escalation signal present, these suppress the financial check entirely.
const NEGATIVE_INTENT_PHRASES: &[&str] = &[
    "successfully",
    "completed",
    "no further action required",
    "no action required",
    "thank you",
    "has been credited",
    "has been processed successfully",
    "has been processed",
    "payment successful",
    "processed successfully",
    "successfully processed",
    "no action needed",
    "no further action needed",
    "refund processed",
    "refund completed",
    "salary credited",
    "invoice paid",
    "payment completed",
];

pub const FINANCIAL_WEIGHT: u32 = 16;

static NEUTRAL_TERMS: LazyLock<Vec<Phrase>> =
    LazyLock::new(|| phrase_set(FINANCIAL_NEUTRAL_TERMS));
static ACTION_VERBS: LazyLock<Vec<Phrase>> =
    LazyLock::new(|| phrase_set(FINANCIAL_ACTION_VERBS));
static NEGATIVE_INTENT: LazyLock<Vec<Phrase>> =
    LazyLock::new(|| phrase_set(NEGATIVE_INTENT_PHRASES));

static ACCOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\baccount\b").unwrap());
static CONFIRM_VERIFY_UPDATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:confirm|verify|update)\b").unwrap());

/// Context-aware financial-request detection.
///
/// A neutral financial term triggers only alongside an escalation signal,
/// checked in priority order: action verb, dynamic urgency, suspicious URL,
/// OTP request. Negative-intent phrasing with no escalation signal at all
/// suppresses the check before the compound conditions are consulted.
pub fn detect_contextual(
    text: &str,
    has_dynamic_urgency: bool,
    has_suspicious_url: bool,
    has_otp: bool,
) -> (u32, Vec<Evidence>) {
    let found_neutral = matching_texts(&NEUTRAL_TERMS, text);
    if found_neutral.is_empty() {
        return (0, Vec::new());
    }

    let found_actions = matching_texts(&ACTION_VERBS, text);
    let has_negative_intent = NEGATIVE_INTENT.iter().any(|p| p.is_match(text));

    if has_negative_intent
        && found_actions.is_empty()
        && !has_dynamic_urgency
        && !has_suspicious_url
        && !has_otp
    {
        return (0, Vec::new());
    }

    let compound_reason = if let Some(first_action) = found_actions.first() {
        format!("financial term + action verb ({first_action})")
    } else if has_dynamic_urgency {
        "financial term + dynamic urgency".to_string()
    } else if has_suspicious_url {
        "financial term + suspicious URL".to_string()
    } else if has_otp {
        "financial term + OTP request".to_string()
    } else {
        // Neutral financial terms alone never trigger.
        return (0, Vec::new());
    };

    let mut evidence: Vec<Evidence> = Vec::new();
    for term in found_neutral {
        evidence.push(Evidence::new(term, Category::FinancialDataRequest));
    }
    for verb in found_actions {
        evidence.push(Evidence::new(verb, Category::FinancialDataRequest));
    }
    evidence.push(Evidence::new(compound_reason, Category::FinancialDataRequest));

    (FINANCIAL_WEIGHT, evidence)
}

/// Older compound rule kept for coverage: bare "account" plus a
/// confirm/verify/update verb plus time pressure. Skipped when the
/// contextual pass already fired.
pub fn detect_legacy_compound(
    text: &str,
    already_financial: bool,
    has_time_pressure: bool,
) -> (u32, Vec<Evidence>) {
    if already_financial {
        return (0, Vec::new());
    }

    if ACCOUNT_RE.is_match(text) && CONFIRM_VERIFY_UPDATE_RE.is_match(text) && has_time_pressure {
        let evidence = vec![Evidence::new(
            "account + confirm/verify/update + time pressure",
            Category::FinancialDataRequest,
        )];
        return (FINANCIAL_WEIGHT, evidence);
    }

    (0, Vec::new())
}
