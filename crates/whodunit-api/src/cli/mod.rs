//! Terminal commands for the `whodunit` binary.

pub mod play;
