use serde::Serialize;

use crate::shared::categories::Category;

/// Recipient risk profile. Resolved once at the boundary; unknown ids
/// fall back to `General`, which adjusts nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    Student,
    Elderly,
    BusinessOwner,
    General,
}

impl Profile {
    pub fn parse(id: &str) -> Profile {
        match id.trim().to_lowercase().as_str() {
            "student" => Profile::Student,
            "elderly" => Profile::Elderly,
            "business_owner" => Profile::BusinessOwner,
            _ => Profile::General,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Student => "student",
            Profile::Elderly => "elderly",
            Profile::BusinessOwner => "business_owner",
            Profile::General => "general",
        }
    }

    fn multipliers(self) -> &'static [(Category, f64)] {
        match self {
            Profile::Student => STUDENT_MULTIPLIERS,
            Profile::Elderly => ELDERLY_MULTIPLIERS,
            Profile::BusinessOwner => BUSINESS_OWNER_MULTIPLIERS,
            Profile::General => &[],
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const STUDENT_MULTIPLIERS: &[(Category, f64)] = &[
    (Category::RewardScam, 1.4),
    (Category::HindiReward, 1.4),
    (Category::RewardTactic, 1.4),
    (Category::Urgency, 1.3),
    (Category::HindiUrgency, 1.3),
    (Category::DynamicUrgency, 1.3),
    (Category::UrgencyTactic, 1.3),
    (Category::Otp, 1.2),
    (Category::HindiOtpPersonal, 1.2),
    (Category::Scarcity, 1.2),
    (Category::FinancialDataRequest, 1.1),
    (Category::FinancialPressure, 1.1),
];

/// Elderly recipients are disproportionately targeted by refund phishing
/// and authority scares, so those categories weigh heaviest here.
const ELDERLY_MULTIPLIERS: &[(Category, f64)] = &[
    (Category::Fear, 1.5),
    (Category::HindiFear, 1.5),
    (Category::FearTactic, 1.5),
    (Category::AuthorityImpersonation, 1.5),
    (Category::HindiAuthority, 1.5),
    (Category::AuthorityTactic, 1.5),
    (Category::Otp, 1.6),
    (Category::HindiOtpPersonal, 1.6),
    (Category::PersonalData, 1.4),
    (Category::CallTranscript, 1.3),
    (Category::FinancialDataRequest, 1.5),
    (Category::DynamicUrgency, 1.3),
    (Category::FinancialPressure, 1.5),
    (Category::EmotionalManipulation, 1.4),
];

const BUSINESS_OWNER_MULTIPLIERS: &[(Category, f64)] = &[
    (Category::AuthorityImpersonation, 1.4),
    (Category::HindiAuthority, 1.4),
    (Category::AuthorityTactic, 1.4),
    (Category::KycScam, 1.5),
    (Category::PersonalData, 1.3),
    (Category::CallTranscript, 1.2),
    (Category::Fear, 1.2),
    (Category::HindiFear, 1.2),
    (Category::FearTactic, 1.2),
    (Category::FinancialDataRequest, 1.4),
    (Category::DynamicUrgency, 1.2),
    (Category::FinancialPressure, 1.3),
];

const DEFAULT_MULTIPLIER: f64 = 1.0;

/// Outcome of the profile pass. Scores stay in 0..=100.
#[derive(Debug, Serialize)]
pub struct ProfileAdjustment {
    pub adjusted_rule_score: u32,
    pub adjusted_tactic_score: u32,
    pub profile_used: Profile,
    pub multipliers_applied: Vec<(Category, f64)>,
}

/// Scale both scores by one blended multiplier: the arithmetic mean of
/// the per-category multipliers over every detected category, matched or
/// not (unmatched categories contribute the 1.0 default and dilute the
/// mean). Applying a single blend keeps the two scores comparable.
pub fn adjust(
    rule_score: u32,
    tactic_score: u32,
    rule_categories: &[Category],
    tactic_categories: &[Category],
    profile: Profile,
) -> ProfileAdjustment {
    let multipliers = profile.multipliers();
    if multipliers.is_empty() {
        return ProfileAdjustment {
            adjusted_rule_score: rule_score,
            adjusted_tactic_score: tactic_score,
            profile_used: profile,
            multipliers_applied: Vec::new(),
        };
    }

    let mut applied: Vec<(Category, f64)> = Vec::new();
    let mut combined: f64 = 0.0;
    let mut count: u32 = 0;

    for category in rule_categories.iter().chain(tactic_categories.iter()) {
        let multiplier = multipliers
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, m)| *m);
        combined += multiplier.unwrap_or(DEFAULT_MULTIPLIER);
        count += 1;
        if let Some(m) = multiplier {
            applied.push((*category, m));
        }
    }

    let avg_multiplier = if count > 0 {
        combined / count as f64
    } else {
        DEFAULT_MULTIPLIER
    };

    ProfileAdjustment {
        adjusted_rule_score: scale(rule_score, avg_multiplier),
        adjusted_tactic_score: scale(tactic_score, avg_multiplier),
        profile_used: profile,
        multipliers_applied: applied,
    }
}

fn scale(score: u32, multiplier: f64) -> u32 {
    (score as f64 * multiplier).min(100.0) as u32
}
