use serde::Serialize;

use crate::shared::categories::Category;
use crate::shared::profiles::Profile;
use crate::shared::results::{DetectionFlags, SemanticVerdict};

/// Risk tier derived from the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> RiskLevel {
        match score {
            0..=30 => RiskLevel::Low,
            31..=60 => RiskLevel::Medium,
            61..=80 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }

    pub fn parse(s: &str) -> Option<RiskLevel> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "critical" => Some(RiskLevel::Critical),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How closely the rule score and the external probability agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Agreement {
    High,
    Moderate,
}

impl Agreement {
    pub fn as_str(self) -> &'static str {
        match self {
            Agreement::High => "HIGH",
            Agreement::Moderate => "MODERATE",
        }
    }
}

/// Which signal primarily explains the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dominance {
    RuleDominant,
    ExternalDominant,
    ExternalEscalation,
    Balanced,
}

impl Dominance {
    pub fn as_str(self) -> &'static str {
        match self {
            Dominance::RuleDominant => "RULE_DOMINANT",
            Dominance::ExternalDominant => "EXTERNAL_DOMINANT",
            Dominance::ExternalEscalation => "EXTERNAL_ESCALATION",
            Dominance::Balanced => "BALANCED",
        }
    }
}

/// Everything fusion consumes. Scores arrive already profile-adjusted;
/// the flags and categories come from the rule detector.
pub struct FusionInputs<'a> {
    pub rule_score: u32,
    pub tactic_score: u32,
    pub verdict: &'a SemanticVerdict,
    pub flags: DetectionFlags,
    pub rule_categories: &'a [Category],
    pub profile: Profile,
}

/// Fused verdict with the names of the guards that raised the score,
/// in firing order.
#[derive(Debug, Serialize)]
pub struct FusionResult {
    pub final_score: u32,
    pub risk_level: RiskLevel,
    pub agreement: Agreement,
    pub dominance: Dominance,
    pub guards_fired: Vec<&'static str>,
}

const ELDERLY_SOCIAL_BOOST: f64 = 1.2;
const CONFIDENCE_PIVOT: f64 = 0.4;
/// Ceiling on the tactic input to the blend, not on the output: tactics
/// support a verdict but never carry it past this much on their own.
const TACTIC_BLEND_CEILING: u32 = 70;

/// State each guard reads. `input_rule` is the pre-boost score fusion
/// received; `effective_rule` includes the elderly boost.
struct GuardContext {
    effective_rule: u32,
    input_rule: u32,
    tactic: u32,
    probability: f64,
    has_otp: bool,
    has_suspicious_url: bool,
    has_money_request: bool,
    has_financial: bool,
    has_any_urgency: bool,
}

/// A guard proposes a floor when its condition holds. The chain applies
/// it only if it raises the running score, so guards can never lower or
/// undo one another.
type Guard = fn(&GuardContext) -> Option<f64>;

/// The protective chain. Order is load-bearing: later guards build on the
/// floors earlier ones establish, and the critical override has the last
/// word before clamping.
const GUARD_CHAIN: &[(&str, Guard)] = &[
    ("rule_protection_floor", rule_protection_floor),
    ("tactic_escalation_floor", tactic_escalation_floor),
    ("money_urgency_floor", money_urgency_floor),
    ("financial_urgency_floor", financial_urgency_floor),
    ("external_dominance_floor", external_dominance_floor),
    ("critical_override", critical_override),
];

/// A high-confidence rule verdict is never averaged down by the blend.
fn rule_protection_floor(ctx: &GuardContext) -> Option<f64> {
    (ctx.effective_rule >= 80).then_some(ctx.effective_rule as f64)
}

fn tactic_escalation_floor(ctx: &GuardContext) -> Option<f64> {
    (ctx.tactic >= 80).then_some(75.0)
}

fn money_urgency_floor(ctx: &GuardContext) -> Option<f64> {
    (ctx.has_money_request && ctx.has_any_urgency).then_some(60.0)
}

/// Tiered: a financial request under time pressure floors at 85 when a
/// suspicious URL confirms it, at 65 without one (unless OTP already
/// escalates elsewhere). The lower tier keeps URL-less refund scams out
/// of Critical.
fn financial_urgency_floor(ctx: &GuardContext) -> Option<f64> {
    if !(ctx.has_financial && ctx.has_any_urgency) {
        return None;
    }
    if ctx.has_suspicious_url {
        Some(85.0)
    } else if !ctx.has_otp {
        Some(65.0)
    } else {
        None
    }
}

/// Strong external signal over a near-silent rule engine means novel
/// phrasing the keyword tables missed; keep it out of Low.
fn external_dominance_floor(ctx: &GuardContext) -> Option<f64> {
    (ctx.probability > 0.75 && ctx.input_rule < 20).then_some(45.0)
}

fn critical_override(ctx: &GuardContext) -> Option<f64> {
    (ctx.has_otp && ctx.has_suspicious_url).then_some(90.0)
}

/// Blend the three signals and run the protective guard chain.
///
/// With the external classifier disabled (or degraded to a zero-signal
/// verdict) the effective rule score passes through untouched and no
/// guard runs.
pub fn fuse(inputs: &FusionInputs) -> FusionResult {
    let social_hit = inputs
        .rule_categories
        .contains(&Category::SocialImpersonation);
    let effective_rule = if social_hit && inputs.profile == Profile::Elderly {
        (inputs.rule_score as f64 * ELDERLY_SOCIAL_BOOST).min(100.0) as u32
    } else {
        inputs.rule_score
    };

    let mut guards_fired: Vec<&'static str> = Vec::new();

    let final_value = if !inputs.verdict.is_active() {
        effective_rule as f64
    } else {
        let external_scaled = inputs.verdict.probability * 100.0;
        let tactic_input = inputs.tactic_score.min(TACTIC_BLEND_CEILING) as f64;

        let base = if inputs.verdict.confidence >= CONFIDENCE_PIVOT {
            0.45 * effective_rule as f64 + 0.45 * external_scaled + 0.10 * tactic_input
        } else {
            0.70 * effective_rule as f64 + 0.20 * external_scaled + 0.10 * tactic_input
        };

        let ctx = GuardContext {
            effective_rule,
            input_rule: inputs.rule_score,
            tactic: inputs.tactic_score,
            probability: inputs.verdict.probability,
            has_otp: inputs.flags.has_otp,
            has_suspicious_url: inputs.flags.has_suspicious_url,
            has_money_request: inputs.flags.has_money_request,
            has_financial: inputs.flags.has_financial_request,
            has_any_urgency: inputs.rule_categories.iter().any(|c| c.is_urgency()),
        };

        let mut running = base;
        for (name, guard) in GUARD_CHAIN {
            if let Some(floor) = guard(&ctx) {
                if floor > running {
                    running = floor;
                    guards_fired.push(name);
                }
            }
        }
        running
    };

    let final_score = final_value.clamp(0.0, 100.0) as u32;
    let escalated = guards_fired.contains(&"external_dominance_floor");

    FusionResult {
        final_score,
        risk_level: RiskLevel::from_score(final_score),
        agreement: agreement_level(inputs.rule_score, inputs.verdict.probability),
        dominance: dominance_label(inputs.rule_score, inputs.verdict.probability, escalated),
        guards_fired,
    }
}

fn agreement_level(rule_score: u32, probability: f64) -> Agreement {
    if (rule_score as f64 - probability * 100.0).abs() < 15.0 {
        Agreement::High
    } else {
        Agreement::Moderate
    }
}

fn dominance_label(rule_score: u32, probability: f64, escalated: bool) -> Dominance {
    if escalated {
        Dominance::ExternalEscalation
    } else if rule_score >= 70 && probability < 0.2 {
        Dominance::RuleDominant
    } else if probability >= 0.8 && rule_score < 30 {
        Dominance::ExternalDominant
    } else {
        Dominance::Balanced
    }
}
