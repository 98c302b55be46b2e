use clap::Parser;
use specgate::cli::{run_cli, Cli};
use specgate::logging::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging(&LogConfig::from_env())?;
    let cli = Cli::parse();
    run_cli(&cli, &mut std::io::stdout().lock())
}
