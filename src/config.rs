use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::categories::Domain;
use crate::error::{BaonError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub data_dir: PathBuf,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Per-domain logging policy. School defaults to one finalized record
/// per day; life expenses can be logged any number of times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub school_once_per_day: bool,
    pub life_once_per_day: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            school_once_per_day: true,
            life_once_per_day: false,
        }
    }
}

fn default_currency() -> String {
    "₱".to_string()
}

impl Config {
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => dirs::config_dir()
                .ok_or_else(|| BaonError::Config("could not find config directory".to_string()))?
                .join("baon"),
        };

        std::fs::create_dir_all(&data_dir)?;

        let config_path = data_dir.join("config.json");
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let mut config: Config = serde_json::from_str(&content)?;
            config.data_dir = data_dir;
            return Ok(config);
        }

        let config = Config {
            data_dir,
            currency: default_currency(),
            policy: PolicyConfig::default(),
        };
        config.save()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(self.data_dir.join("config.json"), content)?;
        Ok(())
    }

    pub fn ledger_file(&self) -> PathBuf {
        self.data_dir.join("ledger.json")
    }

    pub fn history_file(&self) -> PathBuf {
        self.data_dir.join("shell_history.txt")
    }

    pub fn once_per_day(&self, domain: Domain) -> bool {
        match domain {
            Domain::School => self.policy.school_once_per_day,
            Domain::Life => self.policy.life_once_per_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(config.currency, "₱");
        assert!(config.once_per_day(Domain::School));
        assert!(!config.once_per_day(Domain::Life));
        assert!(dir.path().join("config.json").exists());
    }

    #[test]
    fn test_reload_keeps_overrides() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::new(Some(dir.path().to_path_buf())).unwrap();
        config.currency = "$".to_string();
        config.policy.life_once_per_day = true;
        config.save().unwrap();

        let reloaded = Config::new(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(reloaded.currency, "$");
        assert!(reloaded.once_per_day(Domain::Life));
    }
}
