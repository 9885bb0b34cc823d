// src/lib.rs

pub mod boundary;
pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod persistence;
pub mod server;
pub mod store;

pub use crate::core::engine::ResolutionPipeline;
