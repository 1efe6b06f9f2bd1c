use alloy::transports::http::reqwest::Url;
use config::{Environment, File};
use serde::Deserialize;

use crate::constants::{
    CONFIG_ENV_PREFIX, DEFAULT_EXPLORER_URL, DEFAULT_TRANSACTION_TITLE, DEFAULT_WALLET_TITLE,
};
use crate::errors::BridgeError;

/// Presentation settings shared by the gateway, the binder and the lifecycle manager.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Block explorer base url, transaction pages live under `<explorer_url>/tx/<hash>`.
    pub explorer_url: String,
    /// Title of transaction lifecycle notifications.
    pub transaction_title: String,
    /// Title of wallet, account and contract notifications.
    pub wallet_title: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            explorer_url: DEFAULT_EXPLORER_URL.to_owned(),
            transaction_title: DEFAULT_TRANSACTION_TITLE.to_owned(),
            wallet_title: DEFAULT_WALLET_TITLE.to_owned(),
        }
    }
}

impl BridgeConfig {
    pub fn explorer_tx_url(&self, hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), hash)
    }

    pub fn validate(&self) -> Result<(), BridgeError> {
        Url::parse(&self.explorer_url).map_err(|err| {
            BridgeError::InvalidConfig(format!("explorer_url {}: {}", self.explorer_url, err))
        })?;
        Ok(())
    }
}

/// Loads a `BridgeConfig` from an optional file, overridden by `WALLET_TXN_*` env vars.
pub struct ConfigManager {
    path: Option<String>,
}

impl ConfigManager {
    pub fn new(path: Option<String>) -> ConfigManager {
        ConfigManager { path }
    }

    pub fn load_config(&self) -> Result<BridgeConfig, BridgeError> {
        let mut builder = config::Config::builder();
        if let Some(path) = &self.path {
            builder = builder.add_source(File::with_name(path));
        }

        let settings = builder
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX))
            .build()
            .map_err(|err| BridgeError::InvalidConfig(err.to_string()))?;
        let bridge_config: BridgeConfig = settings
            .try_deserialize()
            .map_err(|err| BridgeError::InvalidConfig(err.to_string()))?;

        bridge_config.validate()?;
        Ok(bridge_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explorer_tx_url() {
        let mut bridge_config = BridgeConfig::default();
        assert_eq!(
            bridge_config.explorer_tx_url("0xabc"),
            "https://rinkeby.etherscan.io/tx/0xabc"
        );

        bridge_config.explorer_url = "https://sepolia.etherscan.io/".to_owned();
        assert_eq!(
            bridge_config.explorer_tx_url("0xabc"),
            "https://sepolia.etherscan.io/tx/0xabc"
        );
    }

    #[test]
    fn test_validate_rejects_bad_explorer_url() {
        let bridge_config = BridgeConfig {
            explorer_url: "not a url".to_owned(),
            ..Default::default()
        };

        assert!(matches!(
            bridge_config.validate(),
            Err(BridgeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("bridge-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "explorer_url = \"https://sepolia.etherscan.io\"\n").unwrap();

        let bridge_config = ConfigManager::new(Some(path.to_string_lossy().into_owned()))
            .load_config()
            .unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(bridge_config.explorer_url, "https://sepolia.etherscan.io");
        assert_eq!(bridge_config.transaction_title, "Transaction update");
        assert_eq!(bridge_config.wallet_title, "Wallet");
    }

    #[test]
    fn test_load_config_missing_file() {
        let res = ConfigManager::new(Some("/nonexistent/bridge-config.toml".to_owned()))
            .load_config();

        assert!(matches!(res, Err(BridgeError::InvalidConfig(_))));
    }
}
