use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use eventdesk::cli_style::{get_styles, print_warning, print_welcome};
use eventdesk::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SEC,
};
use eventdesk::{repl, ApiClient, App, RequestsLoggingLevel, SessionState};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path = PathBuf::from(s);
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path))
}

#[derive(Parser, Debug)]
#[command(styles=get_styles(), version = env!("APP_VERSION"))]
struct CliArgs {
    /// Path to a TOML config file. Its values override the flags below.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Root URL of the events backend.
    #[clap(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Timeout in seconds for each backend request.
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_SEC)]
    pub timeout_sec: u64,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// File to keep the command history in.
    #[clap(long, value_parser = parse_path)]
    pub history_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        base_url: cli_args.base_url,
        timeout_sec: cli_args.timeout_sec,
        logging_level: cli_args.logging_level,
        history_file: cli_args.history_file,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    // stderr keeps log lines out of the REPL output.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(config.log_level.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let client = Arc::new(ApiClient::new(
        config.base_url.clone(),
        config.timeout_sec,
        config.logging_level,
    )?);
    info!("Using backend at {}", client.base_url());
    let app = App::with_client(client);

    print_welcome(&config.base_url);
    match runtime.block_on(app.start()) {
        SessionState::Authenticated(identity) => {
            info!("Resumed session for {}", identity.username);
            eventdesk::view::render_nav(&app.nav());
        }
        _ => print_warning("Not signed in. Use 'login' or 'register' to continue."),
    }

    repl::run(&runtime, app, config.history_file)
}
