use std::sync::LazyLock;

use regex::Regex;
use strsim::levenshtein;

use crate::shared::results::UrlAnalysis;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>"']+|www\.[^\s<>"']+"#).unwrap()
});

/// Long consonant cluster in the leading domain label, a marker of
/// machine-generated throwaway domains.
static RANDOM_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[bcdfghjklmnpqrstvwxyz]{5,}").unwrap());

/// Known URL shortener domains.
const SHORTENER_DOMAINS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "goo.gl",
    "t.co",
    "ow.ly",
    "is.gd",
    "buff.ly",
    "rebrand.ly",
    "cutt.ly",
    "shorturl.at",
    "tiny.cc",
    "lnkd.in",
    "soo.gd",
    "s2r.co",
    "clicky.me",
    "bl.ink",
    "short.io",
];

/// Brand names commonly impersonated in phishing domains, used for the
/// edit-distance lookalike check. Short names stay out: at distance 2
/// they collide with too many honest words.
const BRAND_NAMES: &[&str] = &[
    "amazon",
    "paytm",
    "google",
    "facebook",
    "microsoft",
    "paypal",
    "flipkart",
    "phonepe",
    "netflix",
    "whatsapp",
    "icici",
];

/// Typosquat patterns with the brand they impersonate.
static TYPOSQUAT_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"amaz[0o]n", "amazon"),
        (r"paytm[\-_]?(secure|verify|update|link)", "paytm"),
        (r"sbi[\-_]?(kyc|verify|secure|update|link)", "sbi"),
        (r"hdfc[\-_]?(kyc|verify|secure|update|link)", "hdfc"),
        (r"icici[\-_]?(kyc|verify|secure|update|link)", "icici"),
        (r"pan[\-_]?(update|verify|link|card)", "pan-card"),
        (r"g00gle|go0gle|googl\b", "google"),
        (r"faceb[0o]{2}k|faceb00k", "facebook"),
        (r"micros[0o]ft", "microsoft"),
        (r"paypa[l1][\-_]?(verify|secure|update)?", "paypal"),
        (r"flipk[a@]rt", "flipkart"),
        (r"phonepe[\-_]?(verify|secure|update|link)", "phonepe"),
    ]
    .into_iter()
    .map(|(pattern, brand)| {
        let re = Regex::new(&format!("(?i){pattern}")).unwrap();
        (re, brand)
    })
    .collect()
});

const SHORTENED_SCORE: u32 = 25;
const TYPOSQUAT_SCORE: u32 = 35;
const LOOKALIKE_SCORE: u32 = 30;
const RANDOM_DOMAIN_SCORE: u32 = 20;
const NON_HTTPS_SCORE: u32 = 15;

/// Scan a message for URLs and score their reputation. Per-URL penalties
/// accumulate across all URLs; the total is capped at 100.
pub fn scan(text: &str) -> UrlAnalysis {
    let urls: Vec<&str> = URL_RE.find_iter(text).map(|m| m.as_str()).collect();
    if urls.is_empty() {
        return UrlAnalysis::default();
    }

    let mut suspicious_urls = Vec::new();
    let mut reasons = Vec::new();
    let mut raw_score: u32 = 0;

    for url in urls {
        let domain = extract_domain(url);
        let mut suspicious = false;

        if is_shortened(&domain) {
            reasons.push(format!("Shortened URL detected: {url}"));
            raw_score += SHORTENED_SCORE;
            suspicious = true;
        }

        let typo_brands = typosquat_brands(&domain);
        if !typo_brands.is_empty() {
            reasons.push(format!(
                "Possible typosquatting ({}): {url}",
                typo_brands.join(", ")
            ));
            raw_score += TYPOSQUAT_SCORE;
            suspicious = true;
        } else if let Some(brand) = lookalike_brand(&domain) {
            reasons.push(format!("Brand lookalike domain ({brand}): {url}"));
            raw_score += LOOKALIKE_SCORE;
            suspicious = true;
        }

        if is_random_label(&domain) {
            reasons.push(format!("Randomly generated domain pattern: {url}"));
            raw_score += RANDOM_DOMAIN_SCORE;
            suspicious = true;
        }

        if url.to_lowercase().starts_with("http://") {
            reasons.push(format!("Non-HTTPS link: {url}"));
            raw_score += NON_HTTPS_SCORE;
            suspicious = true;
        }

        if suspicious {
            suspicious_urls.push(url.to_string());
        }
    }

    UrlAnalysis {
        url_score: raw_score.min(100),
        suspicious_urls,
        reasons,
    }
}

/// Lower-cased domain with scheme, leading www., path, query, and
/// fragment stripped.
fn extract_domain(url: &str) -> String {
    let lower = url.to_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    rest.split(['/', '?', '#']).next().unwrap_or("").to_string()
}

fn is_shortened(domain: &str) -> bool {
    SHORTENER_DOMAINS.iter().any(|shortener| {
        domain == *shortener
            || domain
                .strip_suffix(shortener)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

fn typosquat_brands(domain: &str) -> Vec<&'static str> {
    TYPOSQUAT_PATTERNS
        .iter()
        .filter(|(re, _)| re.is_match(domain))
        .map(|(_, brand)| *brand)
        .collect()
}

/// Edit-distance fallback for misspelled brands the fixed patterns miss
/// ("amazzon", "netfliix"). Distance 0 is the genuine domain; anything
/// past 2 is unrelated.
fn lookalike_brand(domain: &str) -> Option<&'static str> {
    let label = domain.split('.').next().unwrap_or("");
    if label.len() < 5 {
        return None;
    }
    BRAND_NAMES
        .iter()
        .copied()
        .find(|brand| matches!(levenshtein(label, brand), 1 | 2))
}

fn is_random_label(domain: &str) -> bool {
    let label = domain.split('.').next().unwrap_or("");
    RANDOM_LABEL_RE.is_match(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_urls_scores_zero() {
        let result = scan("call me when you land");
        assert_eq!(result.url_score, 0);
        assert!(result.suspicious_urls.is_empty());
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn shortener_over_plain_http() {
        let result = scan("claim here http://bit.ly/free2024");
        assert_eq!(result.url_score, SHORTENED_SCORE + NON_HTTPS_SCORE);
        assert_eq!(result.suspicious_urls, vec!["http://bit.ly/free2024"]);
        assert!(result.reasons[0].starts_with("Shortened URL detected"));
        assert!(result.reasons[1].starts_with("Non-HTTPS link"));
    }

    #[test]
    fn www_prefix_counts_as_url() {
        let result = scan("visit www.tinyurl.com/win now");
        assert_eq!(result.url_score, SHORTENED_SCORE);
    }

    #[test]
    fn typosquat_domain_flagged() {
        let result = scan("verify at https://amaz0n-deals.com/login");
        assert_eq!(result.url_score, TYPOSQUAT_SCORE);
        assert!(result.reasons[0].contains("amazon"));
    }

    #[test]
    fn lookalike_fires_only_when_typosquat_missed() {
        let looked = scan("order at https://amazzon.in/pay");
        assert_eq!(looked.url_score, LOOKALIKE_SCORE);
        assert!(looked.reasons[0].contains("amazon"));

        // The fixed pattern already covers amaz0n; no double penalty.
        let squatted = scan("order at https://amaz0n.in/pay");
        assert_eq!(squatted.url_score, TYPOSQUAT_SCORE);
    }

    #[test]
    fn genuine_brand_domain_is_clean() {
        let result = scan("track at https://google.com/maps");
        assert_eq!(result.url_score, 0);
        assert!(result.suspicious_urls.is_empty());
    }

    #[test]
    fn consonant_cluster_label_flagged() {
        let result = scan("https://xkcvbqz.com");
        assert_eq!(result.url_score, RANDOM_DOMAIN_SCORE);
    }

    #[test]
    fn score_capped_at_100() {
        let result = scan(
            "http://bit.ly/a http://tinyurl.com/b http://goo.gl/c http://is.gd/d",
        );
        assert_eq!(result.url_score, 100);
        assert_eq!(result.suspicious_urls.len(), 4);
    }
}
