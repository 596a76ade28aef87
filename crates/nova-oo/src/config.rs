use std::collections::BTreeMap;
use std::path::Path;

use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{OperatorTable, LOG_TARGET};

/// Configuration for operator-overload inference, usually read from the `[oo]` part of a host's
/// TOML settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct OoConfig {
    #[serde(default)]
    pub operators: OperatorsConfig,
    #[serde(default)]
    pub resolution: ResolutionConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct OperatorsConfig {
    /// Binary operator mappings merged over the defaults. An empty method name removes the
    /// default mapping for that lexeme.
    #[serde(default)]
    pub binary: BTreeMap<String, String>,
    /// Unary operator mappings merged over the defaults. An empty method name removes the default
    /// mapping for that lexeme.
    #[serde(default)]
    pub unary: BTreeMap<String, String>,
    /// Appended to a binary method name to get the right operand's fallback method.
    #[serde(default = "OperatorsConfig::default_reversed_suffix")]
    #[schemars(length(min = 1))]
    pub reversed_suffix: String,
    #[serde(default = "OperatorsConfig::default_index_get")]
    #[schemars(length(min = 1))]
    pub index_get: String,
    /// Tried in order for `a[i] = v`.
    #[serde(default = "OperatorsConfig::default_index_set")]
    pub index_set: Vec<String>,
    /// Static factory names tried in order when checking `Target t = source`.
    #[serde(default = "OperatorsConfig::default_conversion")]
    pub conversion: Vec<String>,
    /// Binary lexemes that never try the reversed-operand fallback.
    #[serde(default)]
    pub no_reversed: Vec<String>,
}

impl OperatorsConfig {
    fn default_reversed_suffix() -> String {
        OperatorTable::shared().reversed_suffix().to_string()
    }

    fn default_index_get() -> String {
        OperatorTable::shared().index_get_method().to_string()
    }

    fn default_index_set() -> Vec<String> {
        OperatorTable::shared().index_set_methods().to_vec()
    }

    fn default_conversion() -> Vec<String> {
        OperatorTable::shared().conversion_methods().to_vec()
    }
}

impl Default for OperatorsConfig {
    fn default() -> Self {
        Self {
            binary: BTreeMap::new(),
            unary: BTreeMap::new(),
            reversed_suffix: Self::default_reversed_suffix(),
            index_get: Self::default_index_get(),
            index_set: Self::default_index_set(),
            conversion: Self::default_conversion(),
            no_reversed: Vec::new(),
        }
    }
}

/// How supplied arguments are matched against a candidate's parameter list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ArityPolicy {
    /// Arguments must cover a prefix of the parameters; extra trailing parameters are accepted.
    #[default]
    Prefix,
    /// Argument and parameter counts must be equal.
    Exact,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ResolutionConfig {
    #[serde(default)]
    pub arity: ArityPolicy,
    /// Whether operands without a resolved type may be typed by synthesizing call text.
    #[serde(default = "ResolutionConfig::default_text_fallback")]
    pub text_fallback: bool,
}

impl ResolutionConfig {
    fn default_text_fallback() -> bool {
        true
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            arity: ArityPolicy::default(),
            text_fallback: Self::default_text_fallback(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid operator config: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // Keep just the message; the default `Display` includes a source snippet.
        ConfigError::Toml(err.message().to_string())
    }
}

impl OoConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    /// Load a config from a TOML string.
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: OoConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ops = &self.operators;
        if ops.reversed_suffix.is_empty() {
            return Err(ConfigError::Invalid(
                "`operators.reversed_suffix` must not be empty".to_string(),
            ));
        }
        if ops.index_get.is_empty() {
            return Err(ConfigError::Invalid(
                "`operators.index_get` must not be empty".to_string(),
            ));
        }
        if let Some(lexeme) = ops.binary.keys().chain(ops.unary.keys()).find(|l| l.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "operator lexeme {lexeme:?} must not be empty"
            )));
        }
        for (field, names) in [("index_set", &ops.index_set), ("conversion", &ops.conversion)] {
            if names.iter().any(String::is_empty) {
                return Err(ConfigError::Invalid(format!(
                    "`operators.{field}` must not contain empty method names"
                )));
            }
        }
        for lexeme in &ops.no_reversed {
            if !ops.binary.contains_key(lexeme)
                && OperatorTable::shared().binary_method(lexeme).is_none()
            {
                tracing::warn!(
                    target: LOG_TARGET,
                    lexeme = %lexeme,
                    "`operators.no_reversed` names a lexeme that is not a binary operator"
                );
            }
        }
        Ok(())
    }

    /// Build the operator table described by this config.
    pub fn table(&self) -> OperatorTable {
        let ops = &self.operators;
        let mut table = OperatorTable::java_oo()
            .with_reversed_suffix(ops.reversed_suffix.clone())
            .with_index_get(ops.index_get.clone())
            .with_index_set(ops.index_set.iter().cloned())
            .with_conversion(ops.conversion.iter().cloned());
        for (lexeme, method) in &ops.binary {
            table = if method.is_empty() {
                table.without_binary(lexeme)
            } else {
                table.with_binary(lexeme.clone(), method.clone())
            };
        }
        for (lexeme, method) in &ops.unary {
            table = if method.is_empty() {
                table.without_unary(lexeme)
            } else {
                table.with_unary(lexeme.clone(), method.clone())
            };
        }
        for lexeme in &ops.no_reversed {
            table = table.without_reversed(lexeme.clone());
        }
        table
    }
}

/// JSON schema for the operator-overload settings, for editor tooling and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    schema_for!(OoConfig)
}
