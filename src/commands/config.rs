use crate::config::Config;
use crate::display::{print_info, print_json, print_success};
use crate::{ConfigCommands, Result};
use serde_json::json;

/// Handles the `config` command for configuration management and inspection.
///
/// # Supported Operations
/// - **Show**: Display the stored configuration as TOML
/// - **Path**: Print the configuration file location
/// - **Get**: Print a single `section.field` value
/// - **Set** / **Unset**: Modify a value and save the file
pub fn handle(action: ConfigCommands, mut config: Config, json: bool) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            if json {
                return print_json(&config.data);
            }
            let content = config.to_toml()?;
            if content.trim().is_empty() {
                print_info("No configuration set; using defaults.");
            } else {
                print!("{}", content);
            }
        }
        ConfigCommands::Path => println!("{}", config.config_path.display()),
        ConfigCommands::Get { key } => {
            let value = config.get(&key)?;
            if json {
                return print_json(&json!({ key: value }));
            }
            match value {
                Some(value) => println!("{}", value),
                None => print_info(&format!("{} is not set", key)),
            }
        }
        ConfigCommands::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            print_success(&format!("Set {}", key));
        }
        ConfigCommands::Unset { key } => {
            config.unset(&key)?;
            config.save()?;
            print_success(&format!("Unset {}", key));
        }
    }

    Ok(())
}
