use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use toolchecker::cli::{Output, commands};
use toolchecker::config::ConfigLoader;

#[derive(Parser)]
#[command(name = "toolchecker")]
#[command(version, about = "AVG/GDPR compliance checks for SaaS tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project config file (default: ./toolchecker.toml)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, help = "Bind address (overrides config)")]
        host: Option<String>,
        #[arg(long, short, help = "Port (overrides config)")]
        port: Option<u16>,
    },

    /// Run a single compliance check in the terminal
    Check {
        #[arg(help = "Tool name, e.g. \"Slack\"")]
        tool: String,
        #[arg(long, help = "Print the result as JSON")]
        json: bool,
    },

    /// Render a saved result (from `check --json`) into a .docx report
    Report {
        #[arg(help = "Result JSON file")]
        input: PathBuf,
        #[arg(long, short, help = "Output path (default: compliance-rapport-<tool>.docx)")]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration (merged from all sources)
    Show {
        #[arg(short = 'f', long, default_value = "toml", help = "Output format: toml, json")]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Create ./toolchecker.toml
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mToolChecker encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Default hook prints the backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::new().error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    // Missing .env is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                let config = ConfigLoader::load(cli.config.as_deref())?;
                commands::config::show(&config, &format)?;
            }
            ConfigAction::Path => commands::config::path()?,
            ConfigAction::Init { force } => commands::config::init(force)?,
        },
        Commands::Report { input, output } => {
            commands::report::run(&input, output)?;
        }
        Commands::Serve { host, port } => {
            let config = ConfigLoader::load(cli.config.as_deref())?;
            let rt = Runtime::new()?;
            rt.block_on(commands::serve::run(config, host, port))?;
        }
        Commands::Check { tool, json } => {
            let config = ConfigLoader::load(cli.config.as_deref())?;
            let rt = Runtime::new()?;
            rt.block_on(commands::check::run(&config, &tool, json, cli.quiet))?;
        }
    }

    Ok(())
}
