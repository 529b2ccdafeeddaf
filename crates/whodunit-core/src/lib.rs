//! Game logic for the Whodunit interrogation game.
//!
//! This crate defines the "ports" the infrastructure layer implements (the
//! [`llm::provider::LlmProvider`] trait) plus the I/O-free core: the prompt
//! template engine and the session state machine. It depends only on
//! `whodunit-types` -- never on any HTTP or filesystem crate.

pub mod llm;
pub mod prompt;
pub mod session;
