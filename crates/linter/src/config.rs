use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::issue::Severity;

/// Configured level for a lint rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum RuleLevel {
    Off,
    Warn,
    Error,
}

impl RuleLevel {
    /// The issue severity this level maps to, `None` for `Off`
    #[must_use]
    pub fn severity(self) -> Option<Severity> {
        match self {
            Self::Off => None,
            Self::Warn => Some(Severity::Warning),
            Self::Error => Some(Severity::Error),
        }
    }
}

/// Configuration for a single rule
///
/// Supports multiple formats:
/// ```yaml
/// # Simple level
/// rule-name: warn
///
/// # Object style with options
/// rule-name:
///   level: warn
///   options:
///     threshold: 15
///
/// # Array style: [level, options]
/// rule-name: [warn, { threshold: 15 }]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RuleSetting {
    /// Just a level (simple case)
    Level(RuleLevel),

    /// Detailed setting with options
    Detailed {
        level: RuleLevel,
        #[serde(skip_serializing_if = "Option::is_none")]
        options: Option<serde_json::Value>,
    },
}

impl RuleSetting {
    #[must_use]
    pub fn level(&self) -> RuleLevel {
        match self {
            Self::Level(level) | Self::Detailed { level, .. } => *level,
        }
    }

    #[must_use]
    pub fn options(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Level(_) => None,
            Self::Detailed { options, .. } => options.as_ref(),
        }
    }
}

/// Custom deserializer for `RuleSetting` to handle the array syntax
impl<'de> Deserialize<'de> for RuleSetting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, IntoDeserializer, MapAccess, SeqAccess, Visitor};

        struct RuleSettingVisitor;

        impl<'de> Visitor<'de> for RuleSettingVisitor {
            type Value = RuleSetting;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str(
                    "a level string ('off', 'warn', 'error'), \
                     an array [level, options], \
                     or an object { level, options }",
                )
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                RuleLevel::deserialize(value.into_deserializer()).map(RuleSetting::Level)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let level: RuleLevel = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &"array with rule level"))?;

                let options: Option<serde_json::Value> = seq.next_element()?;

                Ok(RuleSetting::Detailed { level, options })
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                #[derive(Deserialize)]
                struct DetailedSetting {
                    level: RuleLevel,
                    #[serde(default)]
                    options: Option<serde_json::Value>,
                }

                let setting =
                    DetailedSetting::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(RuleSetting::Detailed {
                    level: setting.level,
                    options: setting.options,
                })
            }
        }

        deserializer.deserialize_any(RuleSettingVisitor)
    }
}

/// Lint configuration: a map from rule id to setting, plus an optional
/// preset the explicit settings override
///
/// ```yaml
/// # Just the recommended preset
/// lint: recommended
///
/// # Preset with overrides
/// lint:
///   extends: recommended
///   rules:
///     cyclomatic-complexity: [error, { threshold: 15 }]
///     no-void: off
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum LintConfig {
    /// A preset name: `lint: recommended`
    Preset(String),

    /// Full configuration with optional preset and per-rule settings
    Full {
        #[serde(skip_serializing_if = "Option::is_none")]
        extends: Option<String>,
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        rules: HashMap<String, RuleSetting>,
    },
}

impl Default for LintConfig {
    fn default() -> Self {
        Self::Full {
            extends: None,
            rules: HashMap::new(),
        }
    }
}

const VALID_PRESETS: [&str; 1] = ["recommended"];

impl LintConfig {
    #[must_use]
    pub fn recommended() -> Self {
        Self::Preset("recommended".to_owned())
    }

    /// Validate preset and rule names against the registry.
    ///
    /// The error message lists the valid rule names.
    pub fn validate(&self) -> Result<(), String> {
        let valid_rules = crate::registry::all_rule_names();

        let rules = match self {
            Self::Preset(preset) => {
                check_preset(preset)?;
                return Ok(());
            }
            Self::Full { extends, rules } => {
                if let Some(preset) = extends {
                    check_preset(preset)?;
                }
                rules
            }
        };

        let invalid: Vec<&str> = rules
            .keys()
            .map(String::as_str)
            .filter(|rule| !valid_rules.iter().any(|name| name == rule))
            .collect();

        if invalid.is_empty() {
            Ok(())
        } else {
            use std::fmt::Write;
            let mut error = format!(
                "Invalid lint rule name(s): {}\n\nValid rule names are:\n",
                invalid.join(", ")
            );
            for rule in &valid_rules {
                let _ = writeln!(error, "  - {rule}");
            }
            Err(error)
        }
    }

    /// Effective level for a rule, explicit settings overriding the preset
    #[must_use]
    pub fn level(&self, rule_id: &str) -> Option<RuleLevel> {
        match self {
            Self::Preset(preset) => preset_level(preset, rule_id),
            Self::Full { extends, rules } => rules.get(rule_id).map(RuleSetting::level).or_else(
                || {
                    extends
                        .as_deref()
                        .and_then(|preset| preset_level(preset, rule_id))
                },
            ),
        }
    }

    #[must_use]
    pub fn options(&self, rule_id: &str) -> Option<&serde_json::Value> {
        match self {
            Self::Preset(_) => None,
            Self::Full { rules, .. } => rules.get(rule_id).and_then(RuleSetting::options),
        }
    }

    #[must_use]
    pub fn is_enabled(&self, rule_id: &str) -> bool {
        matches!(self.level(rule_id), Some(RuleLevel::Warn | RuleLevel::Error))
    }
}

fn check_preset(preset: &str) -> Result<(), String> {
    if VALID_PRESETS.contains(&preset) {
        Ok(())
    } else {
        Err(format!(
            "Invalid preset name: '{preset}'\n\nValid presets are:\n  - recommended"
        ))
    }
}

fn preset_level(preset: &str, rule_id: &str) -> Option<RuleLevel> {
    if preset != "recommended" {
        return None;
    }
    match rule_id {
        "cyclomatic-complexity" | "no-nested-switch" => Some(RuleLevel::Error),
        "no-empty-block" | "no-void" => Some(RuleLevel::Warn),
        _ => None,
    }
}
