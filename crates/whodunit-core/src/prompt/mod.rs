//! Prompt assembly.
//!
//! A small `${name}` substitution engine plus the two renderings the game
//! needs: the per-turn interrogation prompt and the final-deduction prompt.

pub mod chat;
pub mod deduction;
pub mod template;

pub use template::PromptTemplate;
