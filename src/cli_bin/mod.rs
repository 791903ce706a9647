//! Command-line interface for frontquery
//!
//! Argument parsing lives in [`args`], the handlers that turn parsed
//! arguments into library calls in [`commands`].

pub mod args;
pub mod commands;
