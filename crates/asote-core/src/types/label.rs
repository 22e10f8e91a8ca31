use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AsoteError;

/// Sentiment polarity carried by an aspect-opinion relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Polarity {
    #[serde(rename = "NEU")]
    Neutral,
    #[serde(rename = "POS")]
    Positive,
    #[serde(rename = "NEG")]
    Negative,
}

impl Polarity {
    /// All polarities in index order.
    pub fn all() -> &'static [Polarity] {
        &[Polarity::Neutral, Polarity::Positive, Polarity::Negative]
    }

    /// Integer class index used by the model (`NEU=0, POS=1, NEG=2`).
    pub fn index(self) -> usize {
        match self {
            Polarity::Neutral => 0,
            Polarity::Positive => 1,
            Polarity::Negative => 2,
        }
    }

    /// Get polarity from its class index.
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::all().get(idx).copied()
    }

    /// Short label as written in the datasets.
    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Neutral => "NEU",
            Polarity::Positive => "POS",
            Polarity::Negative => "NEG",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Polarity {
    type Err = AsoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POS" | "POSITIVE" => Ok(Polarity::Positive),
            "NEG" | "NEGATIVE" => Ok(Polarity::Negative),
            "NEU" | "NEUTRAL" => Ok(Polarity::Neutral),
            _ => Err(AsoteError::UnknownLabel(s.to_string())),
        }
    }
}

/// Role of a gold span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityLabel {
    #[serde(rename = "OPINION")]
    Opinion,
    #[serde(rename = "TARGET")]
    Target,
}

impl EntityLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityLabel::Opinion => "OPINION",
            EntityLabel::Target => "TARGET",
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityLabel {
    type Err = AsoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPINION" => Ok(EntityLabel::Opinion),
            "TARGET" | "ASPECT" => Ok(EntityLabel::Target),
            _ => Err(AsoteError::UnknownLabel(s.to_string())),
        }
    }
}
