//! Command Line Interface (CLI) layer for LUSTRE.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for the `serve`, `process` and
//! `sketch` subcommands. Settings come from flags, environment variables
//! and an optional JSON preset, in that order of precedence.
//!
//! If you are embedding LUSTRE into another application, prefer using
//! the high-level `lustre::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
