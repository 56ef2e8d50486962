//! Configuration block data model
//!
//! A [`ConfigBlock`] is one unit of layered configuration: the file patterns
//! it applies to, the plugins it registers, and the rule settings it carries.
//! Blocks are immutable once appended to a store; the order they were
//! appended in is the only tie-breaker between them.

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Disable the rule
    Off,
    /// Warning (doesn't fail the run)
    Warn,
    /// Error (fails the run)
    Error,
}

impl Severity {
    /// Parse a severity from its lowercase wire form.
    ///
    /// Returns `None` for anything outside `off`/`warn`/`error`; callers
    /// report the bad value instead of coercing it.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "off" => Some(Self::Off),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Whether a rule at this severity actually runs.
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::Off)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rule's configured setting as it appears in a block.
///
/// The severity is kept verbatim until resolution so that a bad value can be
/// reported against the block that introduced it rather than rejected at the
/// parsing boundary. Options are positional and opaque to the engine; only
/// the rule implementation interprets them.
///
/// Wire form is either a bare severity string (`"warn"`) or an array whose
/// first element is the severity (`["error", { "max": 200 }]`).
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSetting {
    pub severity: String,
    pub options: Vec<serde_json::Value>,
}

impl RuleSetting {
    pub fn off() -> Self {
        Self {
            severity: Severity::Off.as_str().to_string(),
            options: Vec::new(),
        }
    }

    pub fn warn() -> Self {
        Self {
            severity: Severity::Warn.as_str().to_string(),
            options: Vec::new(),
        }
    }

    pub fn error() -> Self {
        Self {
            severity: Severity::Error.as_str().to_string(),
            options: Vec::new(),
        }
    }

    /// Warning severity with rule options.
    pub fn warn_with(options: impl IntoIterator<Item = serde_json::Value>) -> Self {
        Self {
            severity: Severity::Warn.as_str().to_string(),
            options: options.into_iter().collect(),
        }
    }

    /// Error severity with rule options.
    pub fn error_with(options: impl IntoIterator<Item = serde_json::Value>) -> Self {
        Self {
            severity: Severity::Error.as_str().to_string(),
            options: options.into_iter().collect(),
        }
    }

    /// The parsed severity level, or `None` if the stored value is not one
    /// of `off`/`warn`/`error`.
    pub fn level(&self) -> Option<Severity> {
        Severity::parse(&self.severity)
    }
}

impl Serialize for RuleSetting {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.options.is_empty() {
            serializer.serialize_str(&self.severity)
        } else {
            let mut seq = serializer.serialize_seq(Some(self.options.len() + 1))?;
            seq.serialize_element(&self.severity)?;
            for option in &self.options {
                seq.serialize_element(option)?;
            }
            seq.end()
        }
    }
}

impl<'de> Deserialize<'de> for RuleSetting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Severity(String),
            Detailed(Vec<serde_json::Value>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Severity(severity) => Ok(RuleSetting {
                severity,
                options: Vec::new(),
            }),
            Raw::Detailed(mut parts) => {
                if parts.is_empty() {
                    return Err(de::Error::custom("rule setting array cannot be empty"));
                }
                let severity = match parts.remove(0) {
                    serde_json::Value::String(severity) => severity,
                    other => {
                        return Err(de::Error::custom(format!(
                            "rule severity must be a string, got {other}"
                        )));
                    }
                };
                Ok(RuleSetting {
                    severity,
                    options: parts,
                })
            }
        }
    }
}

/// Opaque handle to a plugin registration.
///
/// The engine only checks that a plugin referenced by a rule is registered
/// by some applicable layer; it never inspects or executes the plugin.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PluginRef(pub String);

impl PluginRef {
    pub fn new(specifier: impl Into<String>) -> Self {
        Self(specifier.into())
    }
}

impl fmt::Display for PluginRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One unit of layered configuration
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigBlock {
    /// Glob patterns for files this block applies to; empty means every path
    #[serde(rename = "files")]
    pub include: Vec<String>,
    /// Glob patterns for files withdrawn from resolution
    #[serde(rename = "ignores")]
    pub exclude: Vec<String>,
    /// Parser/environment settings, opaque to the engine
    pub language_options: IndexMap<String, serde_json::Value>,
    /// Plugins registered by this block, keyed by plugin name
    pub plugins: IndexMap<String, PluginRef>,
    /// Rule settings, keyed by rule name (`plugin/rule` for plugin rules)
    pub rules: IndexMap<String, RuleSetting>,
}

impl ConfigBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dedicated ignore list: exclude patterns and nothing else.
    pub fn ignore<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude: patterns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Whether this block carries only ignore patterns. Such blocks are
    /// checked ahead of every other layer and veto resolution outright.
    pub fn is_ignore_only(&self) -> bool {
        !self.exclude.is_empty()
            && self.include.is_empty()
            && self.rules.is_empty()
            && self.plugins.is_empty()
            && self.language_options.is_empty()
    }
}

/// A rule setting that survived validation during folding.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResolvedRule {
    pub severity: Severity,
    pub options: Vec<serde_json::Value>,
}

/// The per-file result of folding all applicable layers.
///
/// All maps use unique keys with last-writer-wins semantics; iteration
/// follows insertion order, never hash order.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    pub language_options: IndexMap<String, serde_json::Value>,
    pub plugins: IndexMap<String, PluginRef>,
    pub rules: IndexMap<String, ResolvedRule>,
}

impl EffectiveConfig {
    pub fn rule(&self, name: &str) -> Option<&ResolvedRule> {
        self.rules.get(name)
    }

    /// Rules that actually run, skipping entries a later layer turned off.
    pub fn enabled_rules(&self) -> impl Iterator<Item = (&str, &ResolvedRule)> {
        self.rules
            .iter()
            .filter(|(_, rule)| rule.severity.is_enabled())
            .map(|(name, rule)| (name.as_str(), rule))
    }
}
