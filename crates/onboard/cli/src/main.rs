//! Onboard CLI - Onboarding progress from the terminal
//!
//! This CLI lets operators and support staff:
//! - Evaluate a dashboard's onboarding progress bar
//! - Watch progress live while completing steps elsewhere
//! - Check gated actions such as collaborator invites
//! - Manage the locally saved session

use clap::{Parser, Subcommand};
use onboard_progress::ProgressConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;
mod session;

use commands::{evaluate, gate, session as session_cmd, watch, CommandContext};
use error::CliResult;
use output::{print_error, OutputFormat};
use session::{resolve_auth, SessionStore};

/// Onboard CLI application
#[derive(Parser)]
#[command(name = "onboard")]
#[command(about = "Onboarding progress for solar customer dashboards", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ONBOARD_CONFIG", global = true)]
    config: Option<String>,

    /// Backend base URL, overriding the configuration
    #[arg(long, env = "ONBOARD_BASE_URL", global = true)]
    base_url: Option<String>,

    /// User id, overriding the saved session
    #[arg(long, env = "ONBOARD_USER_ID", global = true)]
    user_id: Option<String>,

    /// Bearer token, overriding the saved session
    #[arg(long, env = "ONBOARD_AUTH_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Evaluate a dashboard's progress once
    #[command(alias = "eval")]
    Evaluate(evaluate::EvaluateArgs),

    /// Poll a dashboard's progress until interrupted
    Watch(watch::WatchArgs),

    /// Check gated dashboard actions
    Gate {
        #[command(subcommand)]
        command: gate::GateCommands,
    },

    /// Manage the saved session
    Session {
        #[command(subcommand)]
        command: session_cmd::SessionCommands,
    },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let mut config = ProgressConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.gateway.base_url = base_url;
    }

    init_tracing(&config, cli.verbose, cli.json_logs);

    let store = SessionStore::open_default()?;

    match cli.command {
        Commands::Session { command } => {
            session_cmd::execute(command, &store, cli.output, cli.user_id, cli.token)
        }
        Commands::Config => {
            println!("Gateway:    {}", config.gateway.base_url);
            println!("Policy:     {}", config.evaluation.policy);
            println!("Mode:       {:?}", config.evaluation.mode);
            println!("Timeout:    {}ms", config.evaluation.predicate_timeout_ms);
            println!("Interval:   {}s", config.polling.interval().as_secs());
            println!("Session:    {}", store.path().display());
            Ok(())
        }
        Commands::Evaluate(args) => {
            let ctx = context(config, cli.user_id, cli.token, &store, cli.output)?;
            evaluate::execute(args, ctx).await
        }
        Commands::Watch(args) => {
            let ctx = context(config, cli.user_id, cli.token, &store, cli.output)?;
            watch::execute(args, ctx).await
        }
        Commands::Gate { command } => {
            let ctx = context(config, cli.user_id, cli.token, &store, cli.output)?;
            gate::execute(command, ctx).await
        }
    }
}

fn context(
    config: ProgressConfig,
    user_id: Option<String>,
    token: Option<String>,
    store: &SessionStore,
    format: OutputFormat,
) -> CliResult<CommandContext> {
    Ok(CommandContext {
        config,
        auth: resolve_auth(user_id, token, store)?,
        format,
    })
}

fn init_tracing(config: &ProgressConfig, verbose: bool, json: bool) {
    let level = if verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    if json || config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
