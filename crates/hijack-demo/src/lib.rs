//! hijack-demo library.
//!
//! Command-line definition and the scripted scenarios the binary runs.

pub mod cli;
pub mod scenarios;
