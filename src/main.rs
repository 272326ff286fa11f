use action_router::cli::{run_cli, Cli};
use action_router::logging::{init_logging_with_config, LogConfig};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig {
        log_level: cli.log_level.clone(),
        ..LogConfig::from_env()
    };
    let _logging = init_logging_with_config(&log_config)?;

    let stdout = std::io::stdout();
    run_cli(&cli, &mut stdout.lock())
}
