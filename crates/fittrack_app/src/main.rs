use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use fittrack_app::{App, AppResult};
use fittrack_app::shell::{self, Flow, Parsed};
use fittrack_client::config::Config;
use fittrack_client::http_client::ReqwestFitTrackClient;
use fittrack_client::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Fitness Tracker terminal client
#[derive(Parser)]
#[command(
    name = "fittrack",
    about = "Fitness Tracker terminal client",
    long_about = "Track workouts against a Fitness Tracker backend.\n\n\
                  Type `help` at the prompt for the list of commands."
)]
struct Cli {
    /// Backend base URL (overrides FITTRACK_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// File holding the persisted session token (overrides FITTRACK_TOKEN_FILE)
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Keep the session token in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Path to open first
    #[arg(long, default_value = "/")]
    open: String,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    // `FITTRACK_LOG_LEVEL`, then `RUST_LOG`, default `info`; `-v` forces debug.
    let log_env = if verbose {
        "debug".to_string()
    } else {
        std::env::var("FITTRACK_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string())
    };
    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::debug!("fittrack: log filter: {}", log_env);
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::from_env_with(|key| match key {
        "FITTRACK_API_URL" if cli.api_url.is_some() => cli.api_url.clone(),
        "FITTRACK_TOKEN_FILE" if cli.token_file.is_some() => cli
            .token_file
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned()),
        _ => std::env::var(key).ok(),
    })?;
    Ok(config)
}

fn prompt() -> AppResult<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli).context("invalid configuration")?;
    tracing::info!("fittrack: backend {}", config.base_url);

    let session = Session::new();
    let client = ReqwestFitTrackClient::new(&config.base_url, session.clone())?;
    let tokens: Arc<dyn TokenStore> = if cli.ephemeral {
        Arc::new(MemoryTokenStore::new())
    } else {
        tracing::debug!("fittrack: token file {}", config.token_file.display());
        Arc::new(FileTokenStore::new(config.token_file.clone()))
    };

    let mut app = App::new(Arc::new(client), session, tokens);
    if let Err(e) = app.start(&cli.open).await {
        tracing::debug!("initial page failed: {e}");
    }
    println!("{}", app.render());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let command = match shell::parse_line(&line) {
            Ok(Parsed::Command(command)) => command,
            Ok(Parsed::Message(message)) => {
                println!("{message}");
                prompt()?;
                continue;
            }
            Ok(Parsed::Empty) => {
                prompt()?;
                continue;
            }
            Err(e) => {
                println!("error: {e}");
                prompt()?;
                continue;
            }
        };
        match shell::execute(&mut app, command).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => println!("error: {e}"),
        }
        println!("{}", app.render());
        prompt()?;
    }
    Ok(())
}
