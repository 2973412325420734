//! Subcommand implementations.

pub mod pack;
pub mod push;
