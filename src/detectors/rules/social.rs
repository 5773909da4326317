use std::sync::LazyLock;

use regex::Regex;

use crate::shared::categories::Category;
use crate::shared::matcher::{matching_texts, phrase_set, Phrase};
use crate::shared::results::Evidence;

/// Family greetings typical of "hi mum, new number" impersonation.
/// The comma-terminated entries rely on the left-anchored boundary rule.
const FAMILY_KEYWORDS: &[&str] = &[
    "hi dad",
    "hi mom",
    "hi mummy",
    "hi papa",
    "dad,",
    "mom,",
    "hey dad",
    "hey mom",
    "hello dad",
    "hello mom",
    "papa,",
    "mummy,",
    "hi papa",
    "hi mummy",
];

const NEW_NUMBER_KEYWORDS: &[&str] = &[
    "this is my new number",
    "lost my phone",
    "new phone",
    "new whatsapp number",
    "my old number stopped working",
    "changed my number",
    "new sim",
    "got a new phone",
    "old phone broken",
    "phone got stolen",
];

const MONEY_REQUEST_KEYWORDS: &[&str] = &[
    "send",
    "transfer",
    "need",
    "please send",
    "urgent help",
    "emergency",
    "send 10",
    "send rs",
    "send ₹",
    "google pay",
    "phonepe",
    "paytm",
    "bank transfer",
    "upi",
    "gpay",
    "send money",
    "lend me",
    "need money",
    "pay for me",
    "bhej do",
    "paise bhejo",
    "paise chahiye",
    "transfer karo",
    "send karo",
];

const URGENCY_KEYWORDS_FOR_COMPOUND: &[&str] = &[
    "urgent",
    "urgently",
    "immediately",
    "right now",
    "asap",
    "quickly",
    "fast",
    "hurry",
    "turant",
    "abhi",
    "jaldi",
    "foran",
    "emergency",
];

pub const SOCIAL_IMPERSONATION_WEIGHT: u32 = 20;
pub const SOCIAL_URGENCY_BOOST: u32 = 10;

static FAMILY: LazyLock<Vec<Phrase>> = LazyLock::new(|| phrase_set(FAMILY_KEYWORDS));
static NEW_NUMBER: LazyLock<Vec<Phrase>> = LazyLock::new(|| phrase_set(NEW_NUMBER_KEYWORDS));
static MONEY_REQUEST: LazyLock<Vec<Phrase>> = LazyLock::new(|| phrase_set(MONEY_REQUEST_KEYWORDS));
static COMPOUND_URGENCY: LazyLock<Vec<Phrase>> =
    LazyLock::new(|| phrase_set(URGENCY_KEYWORDS_FOR_COMPOUND));

/// Bare 3+ digit number, the usual shape of a requested amount.
static MONEY_AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{3,}\b").unwrap());

pub struct SocialSignal {
    pub bonus: u32,
    pub has_money_request: bool,
    pub evidence: Vec<Evidence>,
}

/// Compound impersonation detection over three keyword pairings:
/// family greeting with a money request, new-number story with urgency,
/// money request with urgency. Any pairing triggers the full weight once;
/// urgency on top (own or already detected by the keyword scan) adds the
/// boost. `keyword_urgency_present` is the scan's urgency/hindi_urgency
/// verdict for this message.
pub fn detect(text: &str, keyword_urgency_present: bool) -> SocialSignal {
    let found_family = matching_texts(&FAMILY, text);
    let found_new_number = matching_texts(&NEW_NUMBER, text);
    let found_money = matching_texts(&MONEY_REQUEST, text);
    let found_urgency = matching_texts(&COMPOUND_URGENCY, text);

    let mut has_money_request = !found_money.is_empty();
    let mut evidence: Vec<Evidence> = Vec::new();
    let mut triggered = false;

    if !found_family.is_empty() && !found_money.is_empty() {
        triggered = true;
        for kw in &found_family {
            add_unique(&mut evidence, kw);
        }
        for kw in &found_money {
            add_unique(&mut evidence, kw);
        }
    }

    if !found_new_number.is_empty() && !found_urgency.is_empty() {
        triggered = true;
        for kw in &found_new_number {
            add_unique(&mut evidence, kw);
        }
        for kw in &found_urgency {
            add_unique(&mut evidence, kw);
        }
    }

    if !found_money.is_empty() && !found_urgency.is_empty() {
        triggered = true;
        for kw in &found_money {
            add_unique(&mut evidence, kw);
        }
        for kw in &found_urgency {
            add_unique(&mut evidence, kw);
        }
    }

    let mut bonus: u32 = 0;
    if triggered {
        bonus += SOCIAL_IMPERSONATION_WEIGHT;
        if keyword_urgency_present || !found_urgency.is_empty() {
            bonus += SOCIAL_URGENCY_BOOST;
        }
        if MONEY_AMOUNT_RE.is_match(text) {
            has_money_request = true;
        }
    }

    SocialSignal {
        bonus,
        has_money_request,
        evidence,
    }
}

fn add_unique(evidence: &mut Vec<Evidence>, phrase: &str) {
    if !evidence.iter().any(|e| e.phrase == phrase) {
        evidence.push(Evidence::new(phrase, Category::SocialImpersonation));
    }
}
