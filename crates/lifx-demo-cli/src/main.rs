/*
[INPUT]:  CLI arguments, optional YAML configuration file, LIFX_DEMO_* environment
[OUTPUT]: Command output on stdout, diagnostics on stderr
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or startup flow
*/

use std::io::Write;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lifx_demo_cli::cli::{Command, commands};
use lifx_demo_cli::{App, Cli, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let settings = Settings::load(args.config_path.as_deref(), args.overrides())?;
    init_tracing(&settings.log_level)?;

    let mut stdout = std::io::stdout().lock();

    // Formatting is offline and must not touch the state directory
    if let Command::FormatRaw(format_args) = &args.command {
        let input = commands::read_input(format_args)?;
        writeln!(stdout, "{}", commands::format_raw(format_args, &input))?;
        return Ok(());
    }

    info!(
        backend_url = %settings.backend.url,
        state_dir = %settings.state_dir.display(),
        "starting lifx-demo"
    );

    let app = App::new(settings).context("initialize client state")?;
    commands::run(&app, args.command, &mut stdout).await
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
