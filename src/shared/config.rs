use serde::{Deserialize, Serialize};

use crate::shared::fusion::RiskLevel;
use crate::shared::profiles::Profile;

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ThresholdConfig {
    /// Risk level at which the CLI exits nonzero.
    #[serde(default = "default_alert_at")]
    pub alert_at: String,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            alert_at: default_alert_at(),
        }
    }
}

fn default_alert_at() -> String {
    "high".to_string()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Profile applied when the command line doesn't name one.
    #[serde(default = "default_profile")]
    pub default_profile: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_profile: default_profile(),
        }
    }
}

fn default_profile() -> String {
    "general".to_string()
}

impl Config {
    /// Unrecognized names fall back to the default rather than erroring;
    /// a broken config file must never stop an analysis.
    pub fn alert_level(&self) -> RiskLevel {
        RiskLevel::parse(&self.thresholds.alert_at).unwrap_or(RiskLevel::High)
    }

    pub fn profile(&self) -> Profile {
        Profile::parse(&self.analysis.default_profile)
    }
}

/// Load config from ~/.config/fraudscan/config.toml, falling back to defaults.
pub fn load_config() -> Config {
    let path = config_path();
    match std::fs::read_to_string(&path) {
        Ok(content) => toml::from_str(&content).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

pub fn config_path() -> std::path::PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        std::path::PathBuf::from(xdg).join("fraudscan").join("config.toml")
    } else if let Ok(home) = std::env::var("HOME") {
        std::path::PathBuf::from(home)
            .join(".config")
            .join("fraudscan")
            .join("config.toml")
    } else {
        std::path::PathBuf::from("/etc/fraudscan/config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.alert_level(), RiskLevel::High);
        assert_eq!(config.profile(), Profile::General);
    }

    #[test]
    fn partial_config_fills_the_rest() {
        let config: Config = toml::from_str("[thresholds]\nalert_at = \"critical\"\n").unwrap();
        assert_eq!(config.alert_level(), RiskLevel::Critical);
        assert_eq!(config.profile(), Profile::General);
    }

    #[test]
    fn unknown_names_fall_back() {
        let config: Config = toml::from_str(
            "[thresholds]\nalert_at = \"severe\"\n\n[analysis]\ndefault_profile = \"ceo\"\n",
        )
        .unwrap();
        assert_eq!(config.alert_level(), RiskLevel::High);
        assert_eq!(config.profile(), Profile::General);
    }
}
