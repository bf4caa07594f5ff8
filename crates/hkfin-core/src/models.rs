//! Types shared across datasets

use serde::{Deserialize, Serialize};

/// Output language accepted by HKMA endpoints
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,
    /// Traditional Chinese
    Tc,
    /// Simplified Chinese
    Sc,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Tc => "tc",
            Self::Sc => "sc",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "tc" => Ok(Self::Tc),
            "sc" => Ok(Self::Sc),
            _ => Err(format!("Unknown language: {}. Use en, tc or sc", s)),
        }
    }
}

/// A numeric value, or the message explaining why the upstream value could not
/// be read as one
///
/// Serializes untagged: either a bare number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum Coerced<T> {
    Value(T),
    Invalid(String),
}

impl<T> Coerced<T> {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}
