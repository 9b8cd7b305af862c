//! CLI application for extracting transfer orders from Outlook message archives.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::{config, extract, fields, filter, schema};

/// virex - Extract transfer-order fields from PDFs inside .msg archives
#[derive(Parser)]
#[command(name = "virex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk a directory of message files and write the delimited report
    Extract(extract::ExtractArgs),

    /// Extract fields from a single PDF or text file
    Fields(fields::FieldsArgs),

    /// Keep report rows sent after a given date
    Filter(filter::FilterArgs),

    /// Convert a delimited report to CSV
    ToCsv(filter::ToCsvArgs),

    /// Print the built-in field schema as JSON
    Schema(schema::SchemaArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Log to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("virex={0},virex_core={0}", level)));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Fields(args) => fields::run(args, config_path).await,
        Commands::Filter(args) => filter::run_filter(args, config_path).await,
        Commands::ToCsv(args) => filter::run_to_csv(args, config_path).await,
        Commands::Schema(args) => schema::run(args).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
