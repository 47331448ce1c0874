//! CLI module for kondate - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
