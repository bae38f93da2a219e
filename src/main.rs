use alfred_cli::app::{handle_fatal_error, init_logging, AppConfig};
use alfred_cli::config::ConfigLoader;
use alfred_cli::context::EnvironmentContext;
use alfred_cli::executor::ShellExecutor;
use alfred_cli::generation::OllamaClient;
use alfred_cli::interaction::{ConfirmationGate, ConsolePrompter, ProgressDisplayImpl};
use alfred_cli::repair::{RepairLoop, RepairOutcome};
use alfred_cli::subprocess::{PlatformShell, ShellRunner, TokioProcessRunner};
use alfred_cli::AlfredError;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Turn a plain-language request into shell commands, confirm, and run them
#[derive(Parser)]
#[command(name = "alfred-cli")]
#[command(
    about = "Turn a plain-language request into shell commands, confirm, and run them",
    long_about = None
)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Print version information and exit
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Path to configuration file (default: ~/.alfred-cli/config.yaml)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Enable verbose logging on stderr (--verbose for debug, twice for trace)
    #[arg(long, action = ArgAction::Count)]
    verbose: u8,

    /// What you want to do, e.g. "find all jpg files larger than 5MB"
    #[arg(trailing_var_arg = true)]
    query: Vec<String>,
}

fn version_string() -> String {
    format!(
        "{} (commit: {}, built: {})",
        env!("CARGO_PKG_VERSION"),
        env!("ALFRED_GIT_COMMIT"),
        env!("ALFRED_BUILD_DATE")
    )
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", version_string());
        return;
    }

    let config = AppConfig::new(cli.verbose).with_config_path(cli.config);
    init_logging(&config);

    let query = cli.query.join(" ");
    if let Err(e) = run(&config, query.trim()).await {
        handle_fatal_error(e, config.verbose);
    }
}

async fn run(app: &AppConfig, query: &str) -> anyhow::Result<()> {
    if query.is_empty() {
        anyhow::bail!("please provide a query");
    }

    let loader = match &app.config_path {
        Some(path) => ConfigLoader::explicit(path.clone()),
        None => ConfigLoader::from_home().map_err(AlfredError::from)?,
    };
    let config = loader.load().await.map_err(AlfredError::from)?;
    debug!(
        "Using Ollama at {} with model {}",
        config.ollama_url(),
        config.ollama.model
    );

    let shell =
        PlatformShell::detect(Arc::new(TokioProcessRunner::new())).map_err(AlfredError::from)?;
    debug!("Commands will run through {}", shell.shell_name());

    let env_context = EnvironmentContext::gather().format();
    let generator = OllamaClient::new(config.ollama_url(), &config.ollama.model)?;

    let display = Arc::new(ProgressDisplayImpl::new());
    let gate = ConfirmationGate::new(Arc::new(ConsolePrompter::stdio()), display.clone());
    let executor = ShellExecutor::new(Arc::new(shell), display.clone());

    let outcome = RepairLoop::new(Arc::new(generator), gate, executor, display)
        .with_system_prompt(config.system_prompt)
        .with_env_context(env_context)
        .run(query)
        .await?;

    match outcome {
        RepairOutcome::Completed { retries_used } => {
            info!("Finished after {} fix attempt(s)", retries_used)
        }
        RepairOutcome::Cancelled => info!("Cancelled by user"),
    }

    Ok(())
}
