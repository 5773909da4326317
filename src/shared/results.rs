use serde::Serialize;

use crate::shared::categories::Category;

/// One matched phrase (or synthesized compound reason) with its category.
#[derive(Debug, Clone, Serialize)]
pub struct Evidence {
    pub phrase: String,
    pub category: Category,
}

impl Evidence {
    pub fn new(phrase: impl Into<String>, category: Category) -> Evidence {
        Evidence {
            phrase: phrase.into(),
            category,
        }
    }
}

/// Flags derived from the detected categories, never set independently.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DetectionFlags {
    pub has_otp: bool,
    pub has_suspicious_url: bool,
    pub has_money_request: bool,
    pub has_financial_request: bool,
    pub has_dynamic_urgency: bool,
}

/// URL reputation summary for one message.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UrlAnalysis {
    pub url_score: u32,
    pub suspicious_urls: Vec<String>,
    pub reasons: Vec<String>,
}

/// Output of the pattern detector for one message.
#[derive(Debug, Serialize)]
pub struct DetectionResult {
    pub raw_score: u32,
    /// `floor(min(raw/60, 1.0) * 100)`, the score the rest of the
    /// pipeline consumes.
    pub normalized_score: u32,
    /// Sorted by label.
    pub categories: Vec<Category>,
    /// In detection order.
    pub matched_evidence: Vec<Evidence>,
    pub flags: DetectionFlags,
    pub url: UrlAnalysis,
}

/// Output of the manipulation-tactic classifier for one message.
#[derive(Debug, Serialize)]
pub struct TacticResult {
    pub raw_score: u32,
    pub normalized_score: u32,
    pub categories: Vec<Category>,
    pub matched_evidence: Vec<Evidence>,
    /// Human-readable summary of the detected tactics. Non-scoring.
    pub explanation: String,
}

/// Resolved verdict of the external semantic classifier, supplied by the
/// caller. The library never talks to the classifier itself.
#[derive(Debug, Clone, Serialize)]
pub struct SemanticVerdict {
    pub probability: f64,
    pub confidence: f64,
    pub label: String,
    pub enabled: bool,
}

impl SemanticVerdict {
    pub fn new(probability: f64, confidence: f64, label: impl Into<String>) -> SemanticVerdict {
        SemanticVerdict {
            probability,
            confidence,
            label: label.into(),
            enabled: true,
        }
    }

    /// Placeholder verdict when no classifier output is available.
    pub fn disabled() -> SemanticVerdict {
        SemanticVerdict {
            probability: 0.0,
            confidence: 0.0,
            label: "disabled".to_string(),
            enabled: false,
        }
    }

    /// A verdict that carries no signal (probability and confidence both
    /// zero) degrades to the disabled path regardless of the flag.
    pub fn is_active(&self) -> bool {
        self.enabled && (self.probability > 0.0 || self.confidence > 0.0)
    }
}

/// Complete result of analyzing one message.
#[derive(Debug, Serialize)]
pub struct Analysis {
    pub message: String,
    pub rules: DetectionResult,
    pub tactics: TacticResult,
    pub adjustment: crate::shared::profiles::ProfileAdjustment,
    pub semantic: SemanticVerdict,
    pub fusion: crate::shared::fusion::FusionResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_verdict_is_inactive() {
        assert!(!SemanticVerdict::disabled().is_active());
    }

    #[test]
    fn zero_signal_verdict_is_inactive_even_when_enabled() {
        let v = SemanticVerdict::new(0.0, 0.0, "SCAM");
        assert!(!v.is_active());
    }

    #[test]
    fn any_signal_keeps_verdict_active() {
        assert!(SemanticVerdict::new(0.9, 0.0, "SCAM").is_active());
        assert!(SemanticVerdict::new(0.0, 0.3, "SAFE").is_active());
    }
}
