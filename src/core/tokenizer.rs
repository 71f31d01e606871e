// File: src/core/tokenizer.rs
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::config::WsdConfig;
use crate::core::types::Instance;
use crate::corpus::RawInstance;
use crate::errors::{Result, WsdError};
use crate::stopwords::StopWords;

const SENTENCE_END: &str = "</s>";

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]*>").unwrap());

/// Turns the raw context block of one corpus record into an [`Instance`].
///
/// The context is case-folded, head-word variants are rewritten to the
/// canonical marker, and the last sentence holding the marker is kept.
/// Markup and punctuation are stripped, stop words dropped, and the target
/// token is placed at `target_index`.
#[derive(Clone)]
pub struct Tokenizer {
    head_word: String,
    marker: String,
    variant_markers: Vec<String>,
    stop_words: Arc<dyn StopWords>,
}

impl Tokenizer {
    pub fn new(config: &WsdConfig, stop_words: Arc<dyn StopWords>) -> Self {
        Self {
            head_word: config.head_word.to_lowercase(),
            marker: config.head_marker(),
            variant_markers: config.head_variant_markers(),
            stop_words,
        }
    }

    pub fn tokenize(&self, raw: &RawInstance) -> Result<Instance> {
        let mut text = raw.context.to_lowercase();
        if text.trim().is_empty() {
            return Err(WsdError::malformed(&raw.id, "empty context"));
        }
        // Must run before markup is stripped, or the marker is gone.
        for variant in &self.variant_markers {
            text = text.replace(variant.as_str(), &self.marker);
        }

        let sentence = text
            .split(SENTENCE_END)
            .filter(|s| s.contains(&self.marker))
            .last()
            .ok_or_else(|| {
                WsdError::malformed(&raw.id, format!("no sentence contains {}", self.marker))
            })?;

        // The first marker is the target; later ones are dropped from the context.
        let mut parts = sentence.split(self.marker.as_str()).map(clean);
        let left = parts.next().unwrap_or_default();
        let rest: Vec<String> = parts.collect();
        if rest.is_empty() {
            return Err(WsdError::malformed(&raw.id, "head marker vanished"));
        }

        let mut words: Vec<&str> = left.split_whitespace().collect();
        for part in &rest {
            words.push(self.head_word.as_str());
            words.extend(part.split_whitespace());
        }
        let sentence = words.join(" ");

        let content = |part: &str| -> Vec<String> {
            part.split_whitespace()
                .filter(|t| !self.stop_words.is_stop_word(t))
                .map(str::to_string)
                .collect()
        };
        let mut context = content(&left);
        let target_index = context.len();
        context.push(self.head_word.clone());
        for part in &rest {
            context.extend(content(part));
        }

        Ok(Instance {
            id: raw.id.clone(),
            sense: raw.sense.clone(),
            context,
            target_index,
            sentence,
        })
    }
}

/// Removes `<...>` tags, then everything but ASCII alphanumerics and whitespace.
fn clean(text: &str) -> String {
    TAG.replace_all(text, " ")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect()
}
