//! Request handlers for the game API.

pub mod chat;
pub mod deduction;
pub mod generate;
