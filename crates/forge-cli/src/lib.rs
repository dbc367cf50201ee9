//! Library side of the `forge` binary: argument types, settings, logging
//! and the command implementations.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
