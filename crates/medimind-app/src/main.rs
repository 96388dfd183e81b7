use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use medimind::{run_command, run_repl_mode, Cli, Commands, Config};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Some(shell) = cli.generate {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(cli.verbose);

    // Fail fast on missing credentials before anything touches the log
    let config = Config::from_env(&cli)?;
    tracing::debug!(?config, "resolved configuration");

    match cli.command.as_ref() {
        None | Some(Commands::Chat) => run_repl_mode(&config).await,
        Some(command) => run_command(command, &config).await,
    }
}
