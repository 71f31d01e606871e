// src/lib.rs
//! Decision-list word sense disambiguation for a single target word.

pub mod config;
pub mod core;
pub mod corpus;
pub mod errors;
pub mod evaluate;
pub mod learning;
pub mod persistence;
pub mod stopwords;

pub use crate::config::WsdConfig;
pub use crate::core::decision_list::{DecisionList, Rule};
pub use crate::core::engine::WsdEngine;
pub use crate::errors::{Result, WsdError};
