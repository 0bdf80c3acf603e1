//! Command handlers for the `tsm` CLI.

pub mod cleanup;
pub mod generate;
pub mod version;
