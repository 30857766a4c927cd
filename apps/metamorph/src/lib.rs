//! # metamorph
//!
//! The Metamorph application library: the async evolution engine and the
//! CLI surface. The binary in `main.rs` is a thin wrapper around
//! [`cli::execute`]; integration tests drive [`engine`] directly with
//! recording fakes.

pub mod cli;
pub mod engine;
