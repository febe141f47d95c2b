use std::{env, fs, path::PathBuf};

use crate::prelude::*;
use nestify::nest;
use process_tree::TreeConfig;
use serde::{Deserialize, Serialize};

nest! {
    #[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]*
    #[serde(rename_all = "kebab-case", default)]*
    /// Persistent configuration for the session viewer.
    ///
    /// Stored at `~/.config/sessionview/config.yaml` unless a config name is given, every
    /// section is optional and falls back to its defaults.
    pub struct SessionViewConfig {
        pub tree: TreeConfig,
        pub display: pub struct DisplayConfig {
            pub group_leaders_only: bool,
            pub no_color: bool,
        }
    }
}

/// Get the path to the configuration file, following the XDG Base Directory Specification
///
/// If config_name is None, returns ~/.config/sessionview/config.yaml (default)
/// If config_name is Some, returns ~/.config/sessionview/{config_name}.yaml
fn get_configuration_file_path(config_name: Option<&str>) -> Result<PathBuf> {
    let config_dir = match env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = env::var("HOME").context("HOME env variable not set")?;
            PathBuf::from(home).join(".config")
        }
    };
    let config_dir = config_dir.join("sessionview");

    Ok(match config_name {
        Some(name) => config_dir.join(format!("{name}.yaml")),
        None => config_dir.join("config.yaml"),
    })
}

impl SessionViewConfig {
    /// Load the configuration. If it does not exist, return a default configuration.
    pub fn load(config_name: Option<&str>) -> Result<Self> {
        let config_path = get_configuration_file_path(config_name)?;

        match fs::read(&config_path) {
            Ok(config_str) => {
                let config: SessionViewConfig =
                    serde_yaml::from_slice(&config_str).context(format!(
                        "Failed to parse sessionview config at {}",
                        config_path.display()
                    ))?;
                debug!("Config loaded from {}", config_path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Config file not found at {}", config_path.display());
                Ok(SessionViewConfig::default())
            }
            Err(e) => bail!("Failed to load config: {e}"),
        }
    }
}
