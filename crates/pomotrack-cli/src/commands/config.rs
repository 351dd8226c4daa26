use clap::Subcommand;
use pomotrack_core::{Config, PhaseDurations};
use serde_json::Value;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Dotted key (e.g. "schedule.focus_duration", "auto_advance")
        key: String,
        /// Print `{"key": ..., "value": ...}` with the value's JSON type
        #[arg(long)]
        json: bool,
    },
    /// Set a config value and save it
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
    /// List every key, one `key = value` per line
    List {
        /// Print the whole config as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Reset config to defaults
    Reset,
}

/// Leaf values of the config keyed by their dotted path.
fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (name, child) in map {
                let key = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                flatten(&key, child, out);
            }
        }
        leaf => out.push((prefix.to_string(), leaf.clone())),
    }
}

fn lookup(config: &Config, key: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let json = serde_json::to_value(config)?;
    json.pointer(&format!("/{}", key.replace('.', "/")))
        .filter(|v| !v.is_object())
        .cloned()
        .ok_or_else(|| format!("unknown key: {key}").into())
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key, json } => {
            let config = Config::load()?;
            let value = lookup(&config, &key)?;
            if json {
                println!("{}", serde_json::json!({ "key": key, "value": value }));
            } else {
                println!("{}", display(&value));
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            tracing::info!(%key, %value, "config updated");
            println!("{key} = {}", display(&lookup(&config, &key)?));
            if key.starts_with("schedule.") {
                let d = PhaseDurations::from_config(&config);
                println!(
                    "cycle: {}s focus, {}s short break, {}s long break every {} focus sessions",
                    d.work_secs,
                    d.short_break_secs,
                    d.long_break_secs,
                    config.schedule.pomodoros_before_long_break
                );
            }
        }
        ConfigAction::List { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                let mut entries = Vec::new();
                flatten("", &serde_json::to_value(&config)?, &mut entries);
                for (key, value) in entries {
                    println!("{key} = {}", display(&value));
                }
            }
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
