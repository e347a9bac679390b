use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use devteam_cli::cli::{init_tracing, run_command, CliCommand, CliConfig, ConfigOverrides, ResolvedConfig};

#[derive(Parser)]
#[command(name = "devteam-console")]
#[command(about = "Terminal console for a multi-agent dev team run")]
struct Cli {
    /// Path to JSON config file (baseUrl, feed, capacity, humanRole, reconnectDelayMs)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Backend HTTP root (overrides DEVTEAM_BASE_URL and the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Event feed endpoint, `host:port`, `unix:/path` or `ws://host:port/path` (overrides DEVTEAM_FEED)
    #[arg(long)]
    feed: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, short)]
    pretty: bool,

    /// Log debug output to stderr
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the chat transcript of a run
    Tail {
        /// Run ID (defaults to the latest run)
        #[arg(long, short)]
        run: Option<u64>,
        /// Keep following the live event feed until interrupted
        #[arg(long, short)]
        follow: bool,
        /// Disable bold @mention highlighting
        #[arg(long)]
        plain: bool,
    },

    /// Send a message to the team
    Send {
        /// Message text; @mentions pick the recipients
        message: String,
        #[arg(long, short)]
        run: Option<u64>,
    },

    /// Ask every agent to introduce themselves
    Intro {
        #[arg(long, short)]
        run: Option<u64>,
    },

    /// Upload a file as a chat attachment
    Upload {
        path: PathBuf,
        #[arg(long, short)]
        run: Option<u64>,
    },

    /// Show run-console counters and recent activity
    Stats {
        #[arg(long, short)]
        run: Option<u64>,
    },

    /// List mention tags matching a prefix
    Mentions {
        #[arg(default_value = "")]
        prefix: String,
    },
}

impl From<Commands> for CliCommand {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Tail { run, follow, plain } => CliCommand::Tail {
                run_id: run,
                follow,
                highlight: !plain,
            },
            Commands::Send { message, run } => CliCommand::Send {
                run_id: run,
                message,
            },
            Commands::Intro { run } => CliCommand::Intro { run_id: run },
            Commands::Upload { path, run } => CliCommand::Upload { run_id: run, path },
            Commands::Stats { run } => CliCommand::Stats { run_id: run },
            Commands::Mentions { prefix } => CliCommand::Mentions { prefix },
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Warning: {:#}", e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let file = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let overrides = ConfigOverrides {
        base_url: cli.base_url,
        feed: cli.feed,
    };
    let config = ResolvedConfig::from_env(file, overrides)?;

    run_command(cli.command.into(), &config, cli.pretty).await
}
