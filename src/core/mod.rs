// src/core/mod.rs

pub mod decision_list;
pub mod engine;
pub mod features;
pub mod stats;
pub mod tokenizer;
pub mod types;
