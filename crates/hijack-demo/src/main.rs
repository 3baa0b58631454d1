//! hijack-demo entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use hijack_demo::cli::{Cli, Commands};
use hijack_demo::scenarios;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    let config = match cli.emitter_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Basic) => scenarios::run_basic(&config),
        Some(Commands::Data { payload }) => scenarios::run_data(&config, &payload),
        None => scenarios::run_basic(&config).and_then(|mut lines| {
            lines.extend(scenarios::run_data(&config, "hello world")?);
            Ok(lines)
        }),
    };

    match result {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
