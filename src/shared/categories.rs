use serde::Serialize;

/// A scam or manipulation-tactic tag produced by a detector.
///
/// One flat set covers both detectors: rule-side categories carry
/// snake_case labels, tactic-side categories keep their display labels.
/// Categories are tags only — their weights live in the phrase tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    // Rule detector: scam categories
    #[serde(rename = "urgency")]
    Urgency,
    #[serde(rename = "fear")]
    Fear,
    #[serde(rename = "otp")]
    Otp,
    #[serde(rename = "personal_data")]
    PersonalData,
    #[serde(rename = "authority_impersonation")]
    AuthorityImpersonation,
    #[serde(rename = "reward_scam")]
    RewardScam,
    #[serde(rename = "kyc_scam")]
    KycScam,
    #[serde(rename = "hindi_urgency")]
    HindiUrgency,
    #[serde(rename = "hindi_fear")]
    HindiFear,
    #[serde(rename = "hindi_otp_personal")]
    HindiOtpPersonal,
    #[serde(rename = "hindi_reward")]
    HindiReward,
    #[serde(rename = "hindi_authority")]
    HindiAuthority,
    #[serde(rename = "call_transcript")]
    CallTranscript,
    #[serde(rename = "dynamic_urgency")]
    DynamicUrgency,
    #[serde(rename = "suspicious_url")]
    SuspiciousUrl,
    #[serde(rename = "financial_data_request")]
    FinancialDataRequest,
    #[serde(rename = "social_impersonation")]
    SocialImpersonation,

    // Tactic classifier: psychological manipulation tactics
    #[serde(rename = "Fear")]
    FearTactic,
    #[serde(rename = "Urgency")]
    UrgencyTactic,
    #[serde(rename = "Authority")]
    AuthorityTactic,
    #[serde(rename = "Reward")]
    RewardTactic,
    #[serde(rename = "Scarcity")]
    Scarcity,
    #[serde(rename = "Emotional Manipulation")]
    EmotionalManipulation,
    #[serde(rename = "Financial Pressure")]
    FinancialPressure,
    #[serde(rename = "Financial Coercion")]
    FinancialCoercion,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Urgency => "urgency",
            Category::Fear => "fear",
            Category::Otp => "otp",
            Category::PersonalData => "personal_data",
            Category::AuthorityImpersonation => "authority_impersonation",
            Category::RewardScam => "reward_scam",
            Category::KycScam => "kyc_scam",
            Category::HindiUrgency => "hindi_urgency",
            Category::HindiFear => "hindi_fear",
            Category::HindiOtpPersonal => "hindi_otp_personal",
            Category::HindiReward => "hindi_reward",
            Category::HindiAuthority => "hindi_authority",
            Category::CallTranscript => "call_transcript",
            Category::DynamicUrgency => "dynamic_urgency",
            Category::SuspiciousUrl => "suspicious_url",
            Category::FinancialDataRequest => "financial_data_request",
            Category::SocialImpersonation => "social_impersonation",
            Category::FearTactic => "Fear",
            Category::UrgencyTactic => "Urgency",
            Category::AuthorityTactic => "Authority",
            Category::RewardTactic => "Reward",
            Category::Scarcity => "Scarcity",
            Category::EmotionalManipulation => "Emotional Manipulation",
            Category::FinancialPressure => "Financial Pressure",
            Category::FinancialCoercion => "Financial Coercion",
        }
    }

    /// Parse a table label back into a category. Used when loading
    /// data/keywords.toml; unknown labels are a build-data error there.
    pub fn from_label(label: &str) -> Option<Category> {
        let cat = match label {
            "urgency" => Category::Urgency,
            "fear" => Category::Fear,
            "otp" => Category::Otp,
            "personal_data" => Category::PersonalData,
            "authority_impersonation" => Category::AuthorityImpersonation,
            "reward_scam" => Category::RewardScam,
            "kyc_scam" => Category::KycScam,
            "hindi_urgency" => Category::HindiUrgency,
            "hindi_fear" => Category::HindiFear,
            "hindi_otp_personal" => Category::HindiOtpPersonal,
            "hindi_reward" => Category::HindiReward,
            "hindi_authority" => Category::HindiAuthority,
            "call_transcript" => Category::CallTranscript,
            "dynamic_urgency" => Category::DynamicUrgency,
            "suspicious_url" => Category::SuspiciousUrl,
            "financial_data_request" => Category::FinancialDataRequest,
            "social_impersonation" => Category::SocialImpersonation,
            "Fear" => Category::FearTactic,
            "Urgency" => Category::UrgencyTactic,
            "Authority" => Category::AuthorityTactic,
            "Reward" => Category::RewardTactic,
            "Scarcity" => Category::Scarcity,
            "Emotional Manipulation" => Category::EmotionalManipulation,
            "Financial Pressure" => Category::FinancialPressure,
            "Financial Coercion" => Category::FinancialCoercion,
            _ => return None,
        };
        Some(cat)
    }

    /// Any form of time pressure: basic urgency, Hindi urgency, or the
    /// regex-detected dynamic variant. Used by the floor rules and fusion.
    pub fn is_urgency(self) -> bool {
        matches!(
            self,
            Category::Urgency | Category::HindiUrgency | Category::DynamicUrgency
        )
    }

    /// Basic keyword urgency only (excludes the dynamic regex variant).
    pub fn is_keyword_urgency(self) -> bool {
        matches!(self, Category::Urgency | Category::HindiUrgency)
    }

    pub fn is_otp(self) -> bool {
        matches!(self, Category::Otp | Category::HindiOtpPersonal)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort categories by their wire label, the stable order every result
/// surfaces them in.
pub fn sorted_by_label(mut categories: Vec<Category>) -> Vec<Category> {
    categories.sort_by_key(|c| c.as_str());
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for cat in [
            Category::Urgency,
            Category::FinancialDataRequest,
            Category::EmotionalManipulation,
            Category::FinancialCoercion,
        ] {
            assert_eq!(Category::from_label(cat.as_str()), Some(cat));
        }
    }

    #[test]
    fn unknown_label_is_none() {
        assert_eq!(Category::from_label("no_such_category"), None);
    }

    #[test]
    fn urgency_forms() {
        assert!(Category::Urgency.is_urgency());
        assert!(Category::HindiUrgency.is_urgency());
        assert!(Category::DynamicUrgency.is_urgency());
        assert!(!Category::DynamicUrgency.is_keyword_urgency());
        assert!(!Category::Fear.is_urgency());
    }

    #[test]
    fn sorted_order_is_lexical_by_label() {
        let cats = sorted_by_label(vec![
            Category::SocialImpersonation,
            Category::DynamicUrgency,
            Category::FinancialDataRequest,
        ]);
        assert_eq!(
            cats,
            vec![
                Category::DynamicUrgency,
                Category::FinancialDataRequest,
                Category::SocialImpersonation,
            ]
        );
    }
}
