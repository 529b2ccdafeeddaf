//! Shared domain types for the Whodunit interrogation game.
//!
//! This crate contains the types used across the workspace: chat messages,
//! the suspect cast, provider reply shapes, and the session state machine's
//! vocabulary, with their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod character;
pub mod chat;
pub mod llm;
pub mod session;
