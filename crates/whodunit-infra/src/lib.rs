//! Infrastructure layer for Whodunit.
//!
//! Contains implementations of the ports defined in `whodunit-core`: the two
//! concrete LLM provider adapters, the best-effort weather client, and
//! configuration/template loading.

pub mod config;
pub mod llm;
pub mod weather;
