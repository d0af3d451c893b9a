//! DraftCheck command-line entry point.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use draftcheck::commands;
use draftcheck::models::analysis::AnalysisState;
use draftcheck::models::document::UNTITLED;
use draftcheck::models::session::SessionState;
use draftcheck::models::settings::SETTING_KEYS;
use draftcheck::{AppState, CommandResponse, SettingsUpdate};

#[derive(Parser)]
#[command(name = "draftcheck")]
#[command(about = "Grammar, sources, fact-checking and AI-authorship review for documents")]
#[command(version)]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Config file (default: ~/.draftcheck/config.json)
    #[arg(long, global = true, env = "DRAFTCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Gemini API key for this run, ahead of env vars and keyring
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full scan: grammar, sources, summary and AI detection
    #[command(after_help = "\
Examples:
  draftcheck scan essay.txt
  draftcheck scan paper.pdf --json")]
    Scan {
        /// Document to scan (.txt/.md are read directly, anything else is transcribed)
        file: PathBuf,

        /// Send text files through transcription too
        #[arg(long)]
        transcribe: bool,
    },

    /// Fact-check a passage of a document
    Verify {
        file: PathBuf,

        /// Exact passage to verify; must appear in the document
        #[arg(long, short = 't')]
        text: String,

        #[arg(long)]
        transcribe: bool,
    },

    /// Transcribe a PDF, Word document or image to plain text
    Transcribe {
        file: PathBuf,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Scan a document and accept every suggested correction
    Fix {
        file: PathBuf,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        #[arg(long)]
        transcribe: bool,
    },

    /// Manage the stored Gemini API key
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Check configuration, credential and (with --probe) the model service
    Health {
        #[arg(long)]
        probe: bool,
    },
}

#[derive(Subcommand)]
enum AuthCommand {
    /// Store a key in the OS keyring (reads stdin when KEY is omitted)
    Set { key: Option<String> },
    /// Remove the stored key
    Clear,
    /// Show where the key comes from
    Status,
}

#[derive(Subcommand)]
enum ConfigCommand {
    Show,
    /// Set one setting
    Set { key: String, value: String },
    /// Restore defaults
    Reset,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,draftcheck=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Unwrap a command response, turning failures into errors
fn into_result<T>(response: CommandResponse<T>) -> anyhow::Result<T> {
    match (response.success, response.data) {
        (true, Some(data)) => Ok(data),
        (_, _) => Err(anyhow!(response
            .error
            .unwrap_or_else(|| "command returned no data".to_string()))),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn is_plain_text(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("txt") | Some("md") | Some("markdown")
    )
}

/// Load a file into the session, directly or through transcription
async fn load(state: &AppState, path: &Path, transcribe: bool) -> anyhow::Result<()> {
    if !transcribe && is_plain_text(path) {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let title = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(UNTITLED);
        into_result(commands::open_text(state, title, &text).await)?;
    } else {
        into_result(commands::open_document(state, path).await)?;
    }
    Ok(())
}

fn print_analysis(session: &SessionState) {
    let analysis: &AnalysisState = &session.analysis;
    println!("{} ({} words)", session.document.title, session.document.word_count());
    println!("Active tab: {}", session.active_tab);

    if let Some(ai) = &analysis.ai_detection {
        println!("\nAI check: {}/100, {}", ai.score, ai.label);
        println!("  {}", ai.explanation);
    }

    println!("\nIssues ({}):", analysis.suggestions.len());
    for s in &analysis.suggestions {
        println!(
            "  [{:?}/{:?}] \"{}\" -> \"{}\"",
            s.suggestion_type, s.severity, s.original_text, s.suggested_text
        );
        println!("      {}", s.explanation);
    }

    if !analysis.sources.is_empty() {
        println!("\nSources ({}):", analysis.sources.len());
        for source in &analysis.sources {
            println!("  {} <{}>", source.title, source.url);
        }
    }

    if !analysis.claim_verification.is_empty() {
        println!("\nClaims ({}):", analysis.claim_verification.len());
        for claim in &analysis.claim_verification {
            println!("  [{:?}] {}", claim.status, claim.claim);
            println!("      {}", claim.explanation);
            for source in &claim.sources {
                println!("      - {} <{}>", source.title, source.url);
            }
        }
    }

    if let Some(summary) = &analysis.summary {
        println!("\nSummary:\n  {}", summary);
    }
}

fn write_output(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

async fn cmd_scan(state: &AppState, file: &Path, transcribe: bool, json: bool) -> anyhow::Result<()> {
    load(state, file, transcribe).await?;
    let response = commands::run_full_scan(state).await;
    if json {
        print_json(&response)?;
    } else if let Some(report) = &response.data {
        print_analysis(&report.session);
    }
    into_result(response).map(|_| ())
}

async fn cmd_verify(
    state: &AppState,
    file: &Path,
    passage: &str,
    transcribe: bool,
    json: bool,
) -> anyhow::Result<()> {
    if passage.trim().is_empty() {
        bail!("No passage given to verify");
    }
    load(state, file, transcribe).await?;
    let document = into_result(commands::get_session(state).await)?.document;
    let byte_start = document
        .text
        .find(passage)
        .ok_or_else(|| anyhow!("The passage does not appear in {}", file.display()))?;
    let start = document.text[..byte_start].chars().count();
    let end = start + passage.chars().count();
    into_result(commands::select_text(state, start, end).await)?;

    let response = commands::verify_selection(state).await;
    if json {
        print_json(&response)?;
    } else if let Some(report) = &response.data {
        print_analysis(&report.session);
    }
    into_result(response).map(|_| ())
}

async fn cmd_transcribe(state: &AppState, file: &Path, output: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let document = into_result(commands::open_document(state, file).await)?;
    if json {
        return print_json(&document);
    }
    write_output(output, &document.text)
}

async fn cmd_fix(
    state: &AppState,
    file: &Path,
    output: Option<&Path>,
    transcribe: bool,
    json: bool,
) -> anyhow::Result<()> {
    load(state, file, transcribe).await?;
    into_result(commands::run_full_scan(state).await)?;
    let report = into_result(commands::apply_all_suggestions(state).await)?;
    let document = into_result(commands::get_session(state).await)?.document;

    if json {
        #[derive(Serialize)]
        struct FixOutput<'a> {
            applied: usize,
            not_found: usize,
            text: &'a str,
        }
        return print_json(&FixOutput {
            applied: report.applied,
            not_found: report.not_found,
            text: &document.text,
        });
    }
    eprintln!(
        "Applied {} suggestion(s), {} no longer matched the text",
        report.applied, report.not_found
    );
    write_output(output, &document.text)
}

async fn cmd_auth(state: &AppState, command: AuthCommand, json: bool) -> anyhow::Result<()> {
    let response = match command {
        AuthCommand::Set { key } => {
            let key = match key {
                Some(key) => key,
                None => {
                    let mut line = String::new();
                    std::io::stdin()
                        .read_line(&mut line)
                        .context("Failed to read key from stdin")?;
                    line.trim().to_string()
                }
            };
            if key.is_empty() {
                bail!("No key given");
            }
            commands::set_api_key(state, &key).await
        }
        AuthCommand::Clear => commands::clear_api_key(state).await,
        AuthCommand::Status => commands::get_auth_status(state).await,
    };
    let status = into_result(response)?;
    if json {
        return print_json(&status);
    }
    match status.hint {
        Some(hint) => println!("Gemini key: {} ({:?})", hint, status.source),
        None => println!("Gemini key: not configured"),
    }
    Ok(())
}

async fn cmd_config(state: &AppState, command: ConfigCommand, json: bool) -> anyhow::Result<()> {
    let config = match command {
        ConfigCommand::Show => into_result(commands::get_settings(state).await)?,
        ConfigCommand::Set { key, value } => {
            let mut update = SettingsUpdate::from_key_value(&key, &value).map_err(|e| anyhow!(e))?;
            if let Some(password) = update.proxy.as_mut().and_then(|p| p.password.take()) {
                state.set_proxy_password(&password)?;
            }
            into_result(commands::update_settings(state, update).await)?
        }
        ConfigCommand::Reset => into_result(commands::reset_settings(state).await)?,
    };
    if json {
        return print_json(&config);
    }
    let value = serde_json::to_value(&config)?;
    for key in SETTING_KEYS {
        let shown = match &value[*key] {
            serde_json::Value::Null => "(default)".to_string(),
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Object(_) => config
                .proxy
                .as_ref()
                .map(|p| p.url())
                .unwrap_or_default(),
            other => other.to_string(),
        };
        println!("{:<26} {}", key, shown);
    }
    Ok(())
}

async fn cmd_health(state: &AppState, probe: bool, json: bool) -> anyhow::Result<()> {
    let health = into_result(commands::get_health(state, probe).await)?;
    if json {
        return print_json(&health);
    }
    println!("status      {}", health.status);
    println!("version     {}", health.version);
    println!("model       {}", health.model);
    println!("config      {}", health.config);
    println!("credential  {}", health.credential);
    if probe {
        println!("service     {}", health.model_service);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut state = AppState::new();
    if let Some(path) = cli.config {
        state = state.with_config_path(path);
    }
    if let Some(key) = cli.api_key {
        state = state.with_api_key(key);
    }
    state.initialize().await.context("Failed to load configuration")?;

    let json = cli.json;
    match cli.command {
        Commands::Scan { file, transcribe } => cmd_scan(&state, &file, transcribe, json).await,
        Commands::Verify {
            file,
            text,
            transcribe,
        } => cmd_verify(&state, &file, &text, transcribe, json).await,
        Commands::Transcribe { file, output } => {
            cmd_transcribe(&state, &file, output.as_deref(), json).await
        }
        Commands::Fix {
            file,
            output,
            transcribe,
        } => cmd_fix(&state, &file, output.as_deref(), transcribe, json).await,
        Commands::Auth { command } => cmd_auth(&state, command, json).await,
        Commands::Config { command } => cmd_config(&state, command, json).await,
        Commands::Health { probe } => cmd_health(&state, probe, json).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
