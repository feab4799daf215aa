//! CLI module for lanescroll - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for following chat logs
//! and running the built-in demo.

pub mod commands;

pub use commands::Cli;
