//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use event_hijack::{EmitterConfig, Result};

/// hijack-demo - replay event hijack scenarios
#[derive(Parser, Debug)]
#[command(name = "hijack-demo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Listener count per event before a leak warning (0 = unlimited).
    /// Falls back to EVENT_HIJACK_MAX_LISTENERS, then the default.
    #[arg(long)]
    pub max_listeners: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split "test" listeners, then reassign and clear the ontest handler
    Basic,

    /// Hijack "data" and feed a buffer through the ondata handler
    Data {
        /// Text sent as the buffer payload
        #[arg(short, long, default_value = "hello world")]
        payload: String,
    },
}

impl Cli {
    /// Maps the verbosity count to a tracing level.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Emitter config from the environment, with command-line overrides applied.
    pub fn emitter_config(&self) -> Result<EmitterConfig> {
        EmitterConfig::from_env().map(|config| self.apply_overrides(config))
    }

    fn apply_overrides(&self, mut config: EmitterConfig) -> EmitterConfig {
        if let Some(max) = self.max_listeners {
            config.max_listeners = max;
        }
        config
    }
}
