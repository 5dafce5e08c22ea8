use anyhow::Result;
use clap::{Parser, Subcommand};

/// nutriplan - meal planning and shopping lists
#[derive(Parser)]
#[command(name = "nutriplan")]
#[command(about = "Plan meals, aggregate shopping lists and log nutrition", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = nutriplan::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    nutriplan::observability::init_observability(
        "nutriplan",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.to_owned());
            let port = port.unwrap_or(config.server.port);

            nutriplan::server::serve(config, host, port).await
        }
        Commands::Migrate => nutriplan::migrate::migrate(&config).await,
        Commands::Reset => nutriplan::migrate::reset(&config).await,
    }
}
