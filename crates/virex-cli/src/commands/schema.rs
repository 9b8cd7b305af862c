//! Schema command - dump the built-in field schema as JSON.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use virex_core::extraction::SchemaDefinition;

/// Arguments for the schema command.
#[derive(Args)]
pub struct SchemaArgs {
    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: SchemaArgs) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&SchemaDefinition::transfer_order())?;

    if let Some(path) = &args.output {
        fs::write(path, &json)?;
        println!(
            "{} Schema written to {}",
            style("✓").green(),
            path.display()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}
