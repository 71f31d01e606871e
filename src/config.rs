// File: src/config.rs
//! Algorithm parameters. Every value here changes model output, so they are
//! explicit configuration rather than literals buried in the trainer.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::SenseSet;
use crate::errors::{Result, WsdError};

/// Count substituted for a sense a feature never co-occurred with.
pub const DEFAULT_SMOOTHING: f64 = 0.001;

/// How a rule's feature is looked up in an unseen instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Exact membership in the instance's feature set.
    #[default]
    Token,
    /// Substring containment in the normalized sentence text.
    Substring,
}

/// Secondary order for rules with equal scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Ascending by feature string.
    #[default]
    Lexicographic,
    /// Order in which features were first seen in the training corpus.
    Discovery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WsdConfig {
    /// Canonical sense order. The first sense wins a majority tie and it is
    /// the row/column order of the confusion matrix.
    pub senses: Vec<String>,
    pub smoothing: f64,
    pub head_word: String,
    /// Surface forms rewritten to `head_word` inside the head marker.
    pub head_variants: Vec<String>,
    pub match_mode: MatchMode,
    pub tie_break: TieBreak,
    /// Tokens on each side of the target; `None` keeps the whole sentence.
    pub window: Option<usize>,
}

impl Default for WsdConfig {
    fn default() -> Self {
        Self {
            senses: vec!["product".to_string(), "phone".to_string()],
            smoothing: DEFAULT_SMOOTHING,
            head_word: "line".to_string(),
            head_variants: vec!["lines".to_string()],
            match_mode: MatchMode::default(),
            tie_break: TieBreak::default(),
            window: None,
        }
    }
}

impl WsdConfig {
    /// Reads a JSON config; fields left out keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| WsdError::io(format!("reading config {}", path.display()), e))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.smoothing.is_finite() && self.smoothing > 0.0) {
            return Err(WsdError::config_field(
                format!("smoothing must be a positive number, got {}", self.smoothing),
                "smoothing",
            ));
        }
        if self.head_word.trim().is_empty() {
            return Err(WsdError::config_field("head word is empty", "head_word"));
        }
        // SenseSet::new enforces arity and distinctness.
        self.sense_set().map(|_| ())
    }

    pub fn sense_set(&self) -> Result<SenseSet> {
        SenseSet::new(self.senses.iter().cloned())
    }

    /// Marker the corpus wraps the target word in, after case folding.
    pub fn head_marker(&self) -> String {
        format!("<head>{}</head>", self.head_word.to_lowercase())
    }

    pub fn head_variant_markers(&self) -> Vec<String> {
        self.head_variants
            .iter()
            .map(|v| format!("<head>{}</head>", v.to_lowercase()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        let config = WsdConfig::default();
        config.validate().unwrap();
        assert_eq!(config.smoothing, DEFAULT_SMOOTHING);
        assert_eq!(config.head_marker(), "<head>line</head>");
        assert_eq!(config.head_variant_markers(), vec!["<head>lines</head>"]);
    }

    #[test]
    fn rejects_non_positive_smoothing() {
        for bad in [0.0, -1.0, f64::NAN] {
            let config = WsdConfig {
                smoothing: bad,
                ..WsdConfig::default()
            };
            let err = config.validate().unwrap_err();
            assert!(matches!(err, WsdError::Config { field: Some(ref f), .. } if f == "smoothing"));
        }
    }

    #[test]
    fn rejects_single_sense() {
        let config = WsdConfig {
            senses: vec!["phone".into()],
            ..WsdConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "smoothing": 0.5, "match_mode": "substring" }}"#).unwrap();

        let config = WsdConfig::from_file(file.path()).unwrap();
        assert_eq!(config.smoothing, 0.5);
        assert_eq!(config.match_mode, MatchMode::Substring);
        assert_eq!(config.senses, WsdConfig::default().senses);
        assert_eq!(config.tie_break, TieBreak::Lexicographic);
    }

    #[test]
    fn json_round_trip_keeps_every_field() {
        let config = WsdConfig {
            window: Some(3),
            tie_break: TieBreak::Discovery,
            ..WsdConfig::default()
        };
        let back: WsdConfig = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }
}
