//! Runability server — entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use runability::SongQuery;
use runability_server::{http_analyzer, ConfigOverrides, ServerConfig};

#[derive(Parser)]
#[command(
    name = "runability-server",
    about = "Score songs for running from their energy and danceability ratings",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API (default).
    Serve {
        /// Listen address (host:port). Also reads RUNABILITY_ADDR.
        #[arg(long)]
        addr: Option<String>,

        /// Base URL of the song-information site. Also reads RUNABILITY_LOOKUP_BASE.
        #[arg(long)]
        lookup_base: Option<String>,

        /// Upstream fetch timeout in milliseconds. Also reads RUNABILITY_TIMEOUT_MS.
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Song library database path (":memory:" for none). Also reads RUNABILITY_DB.
        #[arg(long)]
        db: Option<String>,
    },

    /// Analyze a single song and print the result as JSON.
    Analyze {
        /// Artist name, e.g. "Taylor Swift".
        artist: String,

        /// Song title, e.g. "Anti-Hero".
        title: String,

        /// Base URL of the song-information site.
        #[arg(long)]
        lookup_base: Option<String>,

        /// Upstream fetch timeout in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve {
        addr: None,
        lookup_base: None,
        timeout_ms: None,
        db: None,
    }) {
        Commands::Serve {
            addr,
            lookup_base,
            timeout_ms,
            db,
        } => {
            let config = ServerConfig::resolve(ConfigOverrides {
                addr,
                lookup_base,
                timeout_ms,
                db_path: db,
            });
            runability_server::serve(config).await?;
        }

        Commands::Analyze {
            artist,
            title,
            lookup_base,
            timeout_ms,
        } => {
            let config = ServerConfig::resolve(ConfigOverrides {
                lookup_base,
                timeout_ms,
                ..Default::default()
            });
            let analyzer = http_analyzer(&config)?;
            match analyzer.analyze(&SongQuery::new(artist, title)).await {
                Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                Err(e) => {
                    eprintln!("Error [{}]: {e}", e.code());
                    std::process::exit(1);
                }
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "runability-server", &mut std::io::stdout());
        }
    }

    Ok(())
}
