// src/core/mod.rs
pub mod converter;
pub mod engine;
pub mod synthesizer;
pub mod trie;
pub mod types;
