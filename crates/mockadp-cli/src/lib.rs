// Library root for the `mockadp` binary: configuration, argument parsing and
// command handlers, exposed for integration tests.

pub mod cli;
pub mod commands;
pub mod config;
