// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Session configuration.

use std::str::FromStr;

use descry_platform::DEFAULT_PACKAGE_CLASS_NAME;
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Whether sessions default to the lazy pipeline.
pub const LAZY: bool = true;

const STRATEGY_VAR: &str = "DESCRY_STRATEGY";
const PACKAGE_CLASS_VAR: &str = "DESCRY_PACKAGE_CLASS";

/// How much a session builds when a package is first resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Members are built when they are looked up.
    Lazy,
    /// Every member of a package is built when the package is resolved.
    Eager,
}

impl Default for Strategy {
    fn default() -> Self {
        if LAZY {
            Strategy::Lazy
        } else {
            Strategy::Eager
        }
    }
}

impl FromStr for Strategy {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lazy" => Ok(Strategy::Lazy),
            "eager" => Ok(Strategy::Eager),
            _ => Err(ResolveError::InvalidConfig {
                key: STRATEGY_VAR,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub strategy: Strategy,
    /// Simple name of the class that stores a package's compiled top-level
    /// members.
    pub package_class_name: String,
    /// Name of the module that owns every resolved package.
    pub module_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            package_class_name: DEFAULT_PACKAGE_CLASS_NAME.to_string(),
            module_name: "<platform module>".to_string(),
        }
    }
}

impl SessionConfig {
    /// Defaults with `DESCRY_STRATEGY` and `DESCRY_PACKAGE_CLASS` applied.
    pub fn from_env() -> Result<Self, ResolveError> {
        Self::default().with_env()
    }

    /// Apply environment overrides on top of `self`.
    pub fn with_env(self) -> Result<Self, ResolveError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ResolveError> {
        if let Some(value) = lookup(STRATEGY_VAR) {
            self.strategy = value.parse()?;
        }
        if let Some(value) = lookup(PACKAGE_CLASS_VAR) {
            if value.is_empty() || value.contains('.') {
                return Err(ResolveError::InvalidConfig {
                    key: PACKAGE_CLASS_VAR,
                    value,
                });
            }
            self.package_class_name = value;
        }
        Ok(self)
    }
}
