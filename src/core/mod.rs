//! Core support types: errors and the shared `Result` alias.

pub mod errors;
