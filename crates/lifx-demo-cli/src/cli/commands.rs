/*
[INPUT]:  Parsed commands and the wired application state
[OUTPUT]: Human-readable command output on the given writer
[POS]:    CLI layer - command handlers
[UPDATE]: When adding commands or changing their output
*/

use std::io::{Read, Write};

use anyhow::{Context, Result, anyhow};
use console::style;
use lifx_demo_adapter::format::{format_raw_log_output, strip_html_tags};
use lifx_demo_adapter::keys::{mask_key, validate_claude_api_key, validate_lifx_api_key};
use lifx_demo_adapter::storage::{BACKEND_URL_KEY, DEMO_KEY_KEY};
use lifx_demo_adapter::{
    AllLogsOptions, BackendStatus, EndpointStatus, FetchOptions, HealthCheckSource,
    LogExportSource, LogSource, Method,
};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::app::App;
use crate::cli::prompt::{merge_keys, prompt_api_keys};
use crate::cli::{
    Command, ConfigCommand, FormatRawArgs, KeysCommand, LogsCommand, LogsFetchArgs, RequestArgs,
    SessionCommand,
};

/// Run a command that needs backend state
pub async fn run(app: &App, command: Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Health => health(app, out).await,
        Command::Session(command) => session(app, command, out).await,
        Command::Config(command) => config(app, command, out),
        Command::Keys(command) => keys(app, command, out),
        Command::Request(args) => request(app, args, out).await,
        Command::Logs(LogsCommand::Fetch(args)) => logs_fetch(app, args, out).await,
        Command::Logs(LogsCommand::Info) => logs_info(app, out).await,
        Command::FormatRaw(args) => {
            let input = read_input(&args)?;
            writeln!(out, "{}", format_raw(&args, &input))?;
            Ok(())
        }
    }
}

/// Highlight raw JSON; plain text unless `--html`
pub fn format_raw(args: &FormatRawArgs, input: &str) -> String {
    let html = format_raw_log_output(input.trim_end());
    if args.html { html } else { strip_html_tags(&html) }
}

/// Contents of `args.file`, or stdin when no file is given
pub fn read_input(args: &FormatRawArgs) -> Result<String> {
    match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("read stdin")?;
            Ok(input)
        }
    }
}

async fn health(app: &App, out: &mut dyn Write) -> Result<()> {
    app.client
        .check_backend_health(true, HealthCheckSource::Manual)
        .await;
    let status = app.client.backend_status();

    let label = match status {
        BackendStatus::Connected => style(status.to_string()).green(),
        BackendStatus::Checking => style(status.to_string()).yellow(),
        BackendStatus::Error | BackendStatus::Disconnected => style(status.to_string()).red(),
    };
    writeln!(out, "Backend: {label} ({})", app.client.backend_url())?;
    Ok(())
}

async fn session(app: &App, command: SessionCommand, out: &mut dyn Write) -> Result<()> {
    let tracker = app.client.session();
    match command {
        SessionCommand::Show => {
            let usage = tracker.usage();
            writeln!(out, "Session: {}", tracker.get_session_id())?;
            writeln!(
                out,
                "Usage: {}/{} requests used ({}%), {} remaining",
                usage.used,
                usage.limit,
                usage.percentage(),
                usage.remaining
            )?;
            if !tracker.can_send_request() {
                writeln!(out, "{}", style("Daily limit reached").red())?;
            }
        }
        SessionCommand::Reset => {
            let id = tracker.reset_session();
            writeln!(out, "New session: {id}")?;
        }
        SessionCommand::ForceReset => {
            let id = app.client.force_session_reset().await;
            writeln!(out, "Session cleared on server and locally")?;
            writeln!(out, "New session: {id}")?;
        }
    }
    Ok(())
}

fn config(app: &App, command: ConfigCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let backend = app.client.backend_config();
            let context = if backend.is_production() { "production" } else { "development" };
            writeln!(out, "Backend URL: {}", backend.url)?;
            writeln!(out, "Demo key: {}", backend.demo_key)?;
            writeln!(
                out,
                "Context: {context} (health check cooldown {}s)",
                app.client.health_cooldown().as_secs()
            )?;
            writeln!(out, "State dir: {}", app.settings.state_dir.display())?;
        }
        ConfigCommand::Set { url, demo_key } => {
            let demo_key = demo_key.unwrap_or_else(|| app.client.demo_key());
            app.client
                .update_backend_config(url, demo_key)
                .context("update backend config")?;
            writeln!(out, "Backend URL set to {}", app.client.backend_url())?;
        }
        ConfigCommand::Reset => {
            app.state.local.remove(BACKEND_URL_KEY)?;
            app.state.local.remove(DEMO_KEY_KEY)?;
            info!("persisted backend config removed");
            writeln!(out, "Backend config reset to defaults")?;
        }
    }
    Ok(())
}

fn keys(app: &App, command: KeysCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        KeysCommand::Show => {
            let keys = app.keys.load()?;
            let lifx = validate_lifx_api_key(&keys.lifx).err();
            let claude = validate_claude_api_key(&keys.claude).err();
            writeln!(out, "LIFX API key: {}{}", mask_key(&keys.lifx), verdict(lifx))?;
            writeln!(out, "Claude API key: {}{}", mask_key(&keys.claude), verdict(claude))?;
        }
        KeysCommand::Set { lifx, claude } => {
            let current = app.keys.load()?;
            let updated = if lifx.is_none() && claude.is_none() {
                prompt_api_keys(&current)?
            } else {
                merge_keys(&current, lifx, claude)
            };
            if !updated.lifx.is_empty() {
                validate_lifx_api_key(&updated.lifx)?;
            }
            if !updated.claude.is_empty() {
                validate_claude_api_key(&updated.claude)?;
            }
            app.keys.save(&updated)?;
            writeln!(out, "API keys saved")?;
        }
        KeysCommand::Clear => {
            app.keys.clear()?;
            writeln!(out, "API keys cleared")?;
        }
    }
    Ok(())
}

fn verdict(error: Option<impl std::fmt::Display>) -> String {
    match error {
        None => format!(" {}", style("(valid)").green()),
        Some(err) => format!(" {}", style(format!("({err})")).yellow()),
    }
}

async fn request(app: &App, args: RequestArgs, out: &mut dyn Write) -> Result<()> {
    let data: Value = match &args.data {
        Some(raw) => serde_json::from_str(raw).context("--data must be valid JSON")?,
        None => json!({}),
    };
    let method = Method::from_bytes(args.method.to_uppercase().as_bytes())
        .map_err(|_| anyhow!("invalid HTTP method: {}", args.method))?;

    let result = if args.reset_session {
        app.client
            .make_api_request_with_session_reset(&args.endpoint, &data)
            .await
    } else {
        app.client
            .make_api_request(&args.endpoint, &data, method)
            .await
    };

    let response = match result {
        Err(err) if err.is_multiple_sessions() && !args.reset_session => {
            warn!("multiple sessions detected, retrying with a fresh session");
            writeln!(
                out,
                "{}",
                style("Multiple sessions detected; retrying with a session reset").yellow()
            )?;
            app.client
                .make_api_request_with_session_reset(&args.endpoint, &data)
                .await?
        }
        other => other?,
    };

    let usage = app.client.session().usage();
    writeln!(out, "HTTP {}", response.status)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&response.body)?)?;
    writeln!(
        out,
        "Usage: {}/{} requests used, {} remaining",
        usage.used, usage.limit, usage.remaining
    )?;
    Ok(())
}

async fn logs_fetch(app: &App, args: LogsFetchArgs, out: &mut dyn Write) -> Result<()> {
    let source = LogExportSource::from(args.source);
    let options = FetchOptions {
        limit: args.limit,
        level: args.level.clone(),
        since: args.since.clone(),
    };

    match source {
        LogExportSource::All => {
            let result = app
                .logs
                .fetch_all_logs(&AllLogsOptions {
                    backend: options.clone(),
                    mcp: options,
                })
                .await;
            if let Some(error) = &result.error {
                writeln!(out, "{}", style(format!("Some log endpoints failed: {error}")).yellow())?;
            }
            if !result.partial_success {
                return Err(anyhow!("no log endpoint returned data"));
            }
        }
        LogExportSource::Backend => {
            app.logs.fetch_backend_logs(&options).await?;
        }
        LogExportSource::Mcp => {
            app.logs.fetch_mcp_logs(&options).await?;
        }
    }

    let selected = |log_source: LogSource| match source {
        LogExportSource::All => true,
        LogExportSource::Backend => log_source == LogSource::Backend,
        LogExportSource::Mcp => log_source == LogSource::Mcp,
    };

    if args.json {
        let combined: Vec<_> = app
            .logs
            .get_combined_logs()
            .into_iter()
            .filter(|log| selected(log.source))
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&combined)?)?;
    } else if args.html {
        for log in app.logs.get_combined_logs().iter().filter(|log| selected(log.source)) {
            writeln!(out, "{}", log.html_content)?;
        }
    } else {
        writeln!(out, "{}", app.logs.get_formatted_logs_text(source))?;
    }

    for log_source in [LogSource::Backend, LogSource::Mcp] {
        if selected(log_source) && app.logs.endpoint_status(log_source) == EndpointStatus::Unavailable {
            writeln!(
                out,
                "{}",
                style(format!("{} logs endpoint not yet implemented on server", log_source.label()))
                    .dim()
            )?;
        }
    }

    if args.copy {
        if app.logs.copy_logs_to_clipboard(source) {
            writeln!(out, "Logs copied to clipboard")?;
        } else {
            let reason = app.logs.error().unwrap_or_default();
            writeln!(out, "{}", style(reason).red())?;
        }
    }
    Ok(())
}

async fn logs_info(app: &App, out: &mut dyn Write) -> Result<()> {
    let info = app.logs.fetch_logs_info().await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?;
    Ok(())
}
