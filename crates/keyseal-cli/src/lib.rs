//! keyseal command-line tool internals.

pub mod commands;
pub mod keyfile;
pub mod prompt;
pub mod tracing_init;
