use clap::{Parser, Subcommand};
use sheetql::error::Result;

mod cli;

#[derive(Parser)]
#[command(name = "sheetql")]
#[command(version = "0.1.0")]
#[command(about = "Turn spreadsheets into GraphQL APIs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a default configuration
    Init {
        /// Output config file path (if not specified, outputs to stdout)
        #[arg(long)]
        output: Option<String>,
    },

    /// Start GraphQL server
    Serve {
        /// Config file path
        #[arg(long, default_value = "sheetql.toml")]
        config: String,

        /// Server port (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the generated GraphQL schema (SDL)
    Schema {
        /// Config file path
        #[arg(long, default_value = "sheetql.toml")]
        config: String,

        /// Output file path (if not specified, outputs to stdout)
        #[arg(long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is reserved for `init` and `schema` output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { output } => {
            cli::init::run(output)?;
        }
        Commands::Serve { config, port } => {
            cli::serve::run(config, port).await?;
        }
        Commands::Schema { config, output } => {
            cli::schema::run(config, output)?;
        }
    }

    Ok(())
}
