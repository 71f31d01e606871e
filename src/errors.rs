// File: src/errors.rs
//! Error types shared by the trainer, the tagger and the scorer.

use std::io;

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, WsdError>;

#[derive(Error, Debug)]
pub enum WsdError {
    /// A corpus record that cannot be turned into an instance.
    /// Recovered locally: the instance is skipped with a warning.
    #[error("malformed instance '{id}': {reason}")]
    MalformedInstance { id: String, reason: String },

    /// No labeled instance survived ingestion.
    #[error("no labeled instances survived ingestion; cannot train a decision list")]
    EmptyTrainingSet,

    /// A label outside the configured sense set.
    #[error("unknown sense label '{label}' on instance '{instance}'")]
    UnknownSenseLabel { label: String, instance: String },

    /// A predicted instance that has no entry in the gold key.
    #[error("instance '{instance}' has a prediction but no gold label")]
    MissingGoldLabel { instance: String },

    /// A gold key entry that was never predicted.
    #[error("instance '{instance}' is in the gold key but was not predicted")]
    UnknownInstance { instance: String },

    /// The same instance id appears twice on one side of an evaluation.
    #[error("instance '{instance}' appears more than once in {source_name}")]
    DuplicateInstance { instance: String, source_name: String },

    /// A line in an answers or key stream that is not an answer record.
    #[error("line {line} is not an answer record: {content}")]
    MalformedAnswer { line: usize, content: String },

    #[error("configuration error: {message}")]
    Config {
        message: String,
        /// Offending field, when there is one.
        field: Option<String>,
    },

    /// The log-ratio score is binary; other arities need a different scorer.
    #[error("decision-list scoring needs exactly two senses, got {count}")]
    UnsupportedSenseArity { count: usize },

    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl WsdError {
    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInstance {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Per-instance errors that the batch survives.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedInstance { .. })
    }
}

impl From<io::Error> for WsdError {
    fn from(err: io::Error) -> Self {
        Self::io(err.to_string(), err)
    }
}

impl From<serde_json::Error> for WsdError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
            source: Box::new(err),
        }
    }
}

impl From<bincode::Error> for WsdError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
            source: Box::new(err),
        }
    }
}
