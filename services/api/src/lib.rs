//! services/api/src/lib.rs
//!
//! The delivery side of Star Talks: configuration, the generative-model adapter,
//! and the HTTP layer exposing chart and conversation requests.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
