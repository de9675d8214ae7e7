use anyhow::Result;
use boundtrace::cli::{self, Cli};
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cli::load_config(cli.config.as_deref())?;

    // Route log records to the debug log file. --log-level beats RUST_LOG,
    // which beats the config value.
    boundtrace::debug::init_log_bridge(cli.log_level, config.log_level.to_level_filter());

    log::info!("Starting boundtrace {}", boundtrace::VERSION);

    let code = cli::run(&cli, &config)?;
    log::logger().flush();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
