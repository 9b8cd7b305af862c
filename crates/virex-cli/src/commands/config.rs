//! Config command - inspect and edit the JSON configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use virex_core::models::config::VirexConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a configuration file holding the defaults
    Init {
        /// Where to write it (default: the -c path or the user config dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value, addressed by a dotted key
    Get {
        /// Dotted key, e.g. "walker.pdf_timeout_secs"
        key: String,
    },

    /// Change one existing value; JSON literals are parsed, anything else is a string
    Set { key: String, value: String },

    /// Print where the configuration file lives
    Path,
}

/// A configuration file that may not exist yet.
struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    fn load(&self) -> anyhow::Result<VirexConfig> {
        if self.path.exists() {
            Ok(VirexConfig::from_file(&self.path)?)
        } else {
            Ok(VirexConfig::default())
        }
    }

    fn store(path: &Path, config: &VirexConfig) -> anyhow::Result<()> {
        config.validate()?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        config.save(path)?;
        Ok(())
    }
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let file = ConfigFile {
        path: config_path.map(PathBuf::from).unwrap_or_else(default_config_path),
    };

    match args.action {
        ConfigAction::Show => {
            if !file.path.exists() {
                eprintln!("{} {} does not exist, using defaults", style("ℹ").blue(), file.path.display());
            }
            println!("{}", serde_json::to_string_pretty(&file.load()?)?);
        }
        ConfigAction::Init { output, force } => {
            let target = output.unwrap_or(file.path);
            if target.exists() && !force {
                anyhow::bail!(
                    "{} already exists; pass --force to replace it",
                    target.display()
                );
            }
            ConfigFile::store(&target, &VirexConfig::default())?;
            println!("{} Wrote default configuration to {}", style("✓").green(), target.display());
        }
        ConfigAction::Get { key } => {
            let json = serde_json::to_value(file.load()?)?;
            let value = lookup(&json, &key)
                .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))?;
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        ConfigAction::Set { key, value } => {
            let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            let mut json = serde_json::to_value(file.load()?)?;
            replace(&mut json, &key, value.clone())?;

            let updated: VirexConfig = serde_json::from_value(json)
                .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;
            ConfigFile::store(&file.path, &updated)?;
            println!("{} {} = {}", style("✓").green(), key, value);
        }
        ConfigAction::Path => {
            let status = if file.path.exists() {
                style("exists").green()
            } else {
                style("not created, run 'virex config init'").yellow()
            };
            println!("{} ({})", file.path.display(), status);
        }
    }

    Ok(())
}

/// `<user config dir>/virex/config.json`.
pub fn default_config_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("virex").join("config.json")
}

fn lookup<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(json, |node, part| node.get(part))
}

/// Replace an existing leaf; new keys are never created.
fn replace(json: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let (parent, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, key),
    };

    let mut node = json;
    for part in parent.into_iter().flat_map(|p| p.split('.')) {
        node = node
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))?;
    }

    match node.get_mut(leaf) {
        Some(slot) if !slot.is_object() => {
            *slot = value;
            Ok(())
        }
        Some(_) => anyhow::bail!("{} is a section, set one of its keys instead", key),
        None => anyhow::bail!("Unknown configuration key: {}", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup() {
        let json = json!({"report": {"delimiter": "|"}});
        assert_eq!(lookup(&json, "report.delimiter"), Some(&json!("|")));
        assert_eq!(lookup(&json, "report.nope"), None);
        assert_eq!(lookup(&json, "report"), Some(&json!({"delimiter": "|"})));
    }

    #[test]
    fn test_replace_existing_leaf_only() {
        let mut json = json!({"walker": {"pdf_timeout_secs": 60}});
        replace(&mut json, "walker.pdf_timeout_secs", json!(5)).unwrap();
        assert_eq!(json["walker"]["pdf_timeout_secs"], 5);

        assert!(replace(&mut json, "walker.other", json!(1)).is_err());
        assert!(replace(&mut json, "walker", json!(1)).is_err());
        assert!(replace(&mut json, "missing.key", json!(1)).is_err());
    }
}
