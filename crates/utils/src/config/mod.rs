/*
 * SPDX-FileCopyrightText: 2020 Stalwart Labs LLC <hello@stalw.art>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-SEL
 */

pub mod tracer;
pub mod utils;

use self::utils::{AsKey, ParseValue};
use ahash::AHashMap;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub keys: BTreeMap<String, String>,
    pub errors: AHashMap<String, ConfigError>,
    pub warnings: AHashMap<String, ConfigWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse { error: String },
    Build { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    AppliedDefault { default: String },
}

impl Config {
    /// Parses a TOML document, flattening nested tables into dotted keys.
    ///
    /// Array items are keyed by their zero padded position, so
    /// `a = ["x", "y"]` becomes `a.0000 = x` and `a.0001 = y`.
    pub fn new(toml: impl AsRef<str>) -> Result<Self, String> {
        let table = toml
            .as_ref()
            .parse::<toml::Table>()
            .map_err(|err| format!("Failed to parse configuration: {err}"))?;
        let mut config = Config::default();
        config.flatten_table("", &table);
        Ok(config)
    }

    fn flatten_table(&mut self, prefix: &str, table: &toml::Table) {
        for (key, value) in table {
            let key = if prefix.is_empty() {
                key.to_string()
            } else {
                format!("{prefix}.{key}")
            };
            self.flatten_value(key, value);
        }
    }

    fn flatten_value(&mut self, key: String, value: &toml::Value) {
        match value {
            toml::Value::String(value) => {
                self.keys.insert(key, value.to_string());
            }
            toml::Value::Integer(value) => {
                self.keys.insert(key, value.to_string());
            }
            toml::Value::Float(value) => {
                self.keys.insert(key, value.to_string());
            }
            toml::Value::Boolean(value) => {
                self.keys.insert(key, value.to_string());
            }
            toml::Value::Datetime(value) => {
                self.keys.insert(key, value.to_string());
            }
            toml::Value::Array(values) => {
                for (pos, value) in values.iter().enumerate() {
                    self.flatten_value(format!("{key}.{pos:04}"), value);
                }
            }
            toml::Value::Table(table) => {
                self.flatten_table(&key, table);
            }
        }
    }

    pub fn contains_key(&self, key: impl AsKey) -> bool {
        self.keys.contains_key(&key.as_key())
    }

    pub fn value(&self, key: impl AsKey) -> Option<&str> {
        self.keys.get(&key.as_key()).map(|s| s.as_str())
    }

    pub fn value_require(&mut self, key: impl AsKey) -> Option<&str> {
        let key = key.as_key();
        if self.keys.contains_key(&key) {
            self.keys.get(&key).map(|s| s.as_str())
        } else {
            self.errors.insert(
                key,
                ConfigError::Parse {
                    error: "Missing property".to_string(),
                },
            );
            None
        }
    }

    /// Returns every `(key, value)` pair below `prefix`.
    pub fn values(&self, prefix: impl AsKey) -> impl Iterator<Item = (&str, &str)> {
        let prefix = prefix.as_prefix();
        self.keys
            .range(prefix.clone()..)
            .take_while(move |(key, _)| key.starts_with(&prefix))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn property<T: ParseValue>(&mut self, key: impl AsKey) -> Option<T> {
        let key = key.as_key();
        let value = self.keys.get(&key)?;
        match T::parse_value(value) {
            Ok(value) => Some(value),
            Err(error) => {
                self.new_parse_error(key, error);
                None
            }
        }
    }

    pub fn property_or_default<T: ParseValue>(
        &mut self,
        key: impl AsKey,
        default: &str,
    ) -> Option<T> {
        let key = key.as_key();
        if self.keys.contains_key(&key) {
            self.property(key)
        } else {
            match T::parse_value(default) {
                Ok(value) => Some(value),
                Err(error) => {
                    self.new_parse_error(key, error);
                    None
                }
            }
        }
    }

    /// Lists the distinct identifiers `id` for which `prefix.id.suffix`
    /// exists, e.g. `sub_keys("store", ".type")` returns every store id.
    pub fn sub_keys(&self, prefix: impl AsKey, suffix: &str) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();

        for (key, _) in self.values(prefix.clone()) {
            let Some(id) = key
                .strip_prefix(&prefix.as_prefix())
                .and_then(|key| key.strip_suffix(suffix))
            else {
                continue;
            };

            if !id.is_empty() && !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }

        ids
    }

    pub fn new_parse_error(&mut self, key: impl AsKey, details: impl Into<String>) {
        self.errors.insert(
            key.as_key(),
            ConfigError::Parse {
                error: details.into(),
            },
        );
    }

    pub fn new_build_error(&mut self, key: impl AsKey, details: impl Into<String>) {
        self.errors.insert(
            key.as_key(),
            ConfigError::Build {
                error: details.into(),
            },
        );
    }

    pub fn new_applied_default(&mut self, key: impl AsKey, default: impl Into<String>) {
        self.warnings.insert(
            key.as_key(),
            ConfigWarning::AppliedDefault {
                default: default.into(),
            },
        );
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn log_errors(&self) {
        for (key, err) in &self.errors {
            let (cause, error) = match err {
                ConfigError::Parse { error } => (trc::ConfigEvent::ParseError, error),
                ConfigError::Build { error } => (trc::ConfigEvent::BuildError, error),
            };

            trc::event!(Config(cause), Key = key, Details = error);
        }
    }

    pub fn log_warnings(&self) {
        for (key, warning) in &self.warnings {
            match warning {
                ConfigWarning::AppliedDefault { default } => {
                    trc::event!(
                        Config(trc::ConfigEvent::BuildWarning),
                        Key = key,
                        Details = "Applied default value",
                        Value = default,
                    );
                }
            }
        }
    }
}
