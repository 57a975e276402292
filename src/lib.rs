//! A small interactive shell.
//!
//! Each input line is split on single-character delimiters (no quoting), turned
//! into a [`plan::Plan`] and executed: built-ins (`cd`, `history`, `clear`,
//! `mkdir`, `rmdir`, `exit`) run in-process, anything else is started as an
//! external program found through `PATH`. A line may carry one output
//! redirection (`cmd >file`) or one two-stage pipeline (`left | right`); the
//! interpreter waits for every child it starts before reading the next line.
//!
//! The main entry point is [`Interpreter`]. The launcher ([`external`]) and the
//! pipeline orchestrator ([`pipeline`]) can also be used on their own.
//!
//! Unix only.

pub mod builtin;
pub mod config;
pub mod env;
pub mod error;
pub mod external;
pub mod history;
pub mod io_adapters;
mod interpreter;
pub mod pipeline;
pub mod plan;
#[cfg(test)]
mod test_support;
pub mod tokenizer;

pub use config::Config;
pub use env::Environment;
pub use error::LaunchError;
pub use interpreter::Interpreter;
