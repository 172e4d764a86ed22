//! # setprice-config
//!
//! Layered configuration for the `setprice` tool.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use alloy_primitives::Address;
use figment::{
    Figment, Metadata, Profile, Provider,
    providers::{Env, Serialized},
    value::{Dict, Map},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

// reexport so cli types can implement `figment::Provider` to easily merge cli arguments
pub use figment;

mod error;
pub use error::{ConfigError, ExtractConfigError};

mod providers;
use providers::{ContractAddressEnvProvider, TomlFileProvider};

/// Configuration of a `setprice` run.
///
/// # Defaults
///
/// All configuration values have a default, documented in the [fields](#fields) section below.
/// [`Config::default()`] returns the default values.
///
/// The default figment, [`Config::figment()`], reads from the following sources, in ascending
/// priority order:
///
///   1. [`Config::default()`]
///   2. `setprice.toml` _or_ filename in the `SETPRICE_CONFIG` environment variable
///   3. `NEXT_PUBLIC_CONTRACT_ADDRESS`
///   4. `SETPRICE_` prefixed environment variables
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address of the contract exposing the price setter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,
    /// Signature of the price setter, e.g. `setUserDefinedPrice(uint256)`.
    pub method: String,
    /// Which wallet connector to use.
    pub wallet: WalletKind,
    /// JSON-RPC endpoint used by the `rpc` wallet.
    pub rpc_url: String,
    /// Account to send from when using the `rpc` wallet.
    ///
    /// Defaults to the first account the node exposes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<Address>,
    /// Port of the local browser wallet bridge; `0` picks a free port.
    pub browser_port: u16,
    /// Seconds to wait for the browser page to attach.
    pub connect_timeout: u64,
    /// Seconds to wait for the wallet to answer a single request, including user prompts.
    pub request_timeout: u64,
    /// Seconds to wait for a submitted transaction to be confirmed.
    pub transaction_timeout: u64,
    /// Milliseconds between receipt polls.
    pub poll_interval: u64,
    /// Number of blocks a transaction needs to be considered confirmed.
    pub confirmations: u64,
}

impl Config {
    /// The default config file name.
    pub const FILE_NAME: &'static str = "setprice.toml";

    /// The environment variable holding an alternative config file path.
    pub const FILE_ENV: &'static str = "SETPRICE_CONFIG";

    /// The environment variable prefix.
    pub const ENV_PREFIX: &'static str = "SETPRICE_";

    /// The price setter invoked when nothing else is configured.
    pub const DEFAULT_METHOD: &'static str = "setUserDefinedPrice(uint256)";

    /// Returns the current `Config`.
    ///
    /// See [`figment`](Self::figment) for more details.
    pub fn load() -> Result<Self, ExtractConfigError> {
        Self::from_provider(Self::figment())
    }

    /// Extracts a `Config` from `provider`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use setprice_config::{Config, figment::providers::{Format, Toml}};
    ///
    /// let figment = Config::figment().merge(Toml::file("other.toml"));
    /// let config = Config::from_provider(figment)?;
    /// # Ok::<_, setprice_config::ExtractConfigError>(())
    /// ```
    pub fn from_provider<T: Provider>(provider: T) -> Result<Self, ExtractConfigError> {
        trace!("load config with provider: {:?}", provider.metadata());
        Figment::from(provider).extract().map_err(ExtractConfigError::new)
    }

    /// Returns the default figment.
    ///
    /// Callers can merge additional providers (like cli arguments) on top of it before
    /// extracting.
    pub fn figment() -> Figment {
        Figment::from(Self::default())
            .merge(TomlFileProvider::new(Some(Self::FILE_ENV), Self::FILE_NAME))
            .merge(ContractAddressEnvProvider)
            .merge(Env::prefixed(Self::ENV_PREFIX).ignore(&["CONFIG", "DEBUG"]))
    }

    /// Returns the configured contract address, or an error if none was provided.
    pub fn require_contract_address(&self) -> Result<Address, ConfigError> {
        self.contract_address.ok_or(ConfigError::MissingContractAddress)
    }
}

impl Provider for Config {
    fn metadata(&self) -> Metadata {
        Metadata::named("setprice config")
    }

    #[track_caller]
    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contract_address: None,
            method: Self::DEFAULT_METHOD.to_string(),
            wallet: WalletKind::Browser,
            rpc_url: "http://localhost:8545".to_string(),
            sender: None,
            browser_port: 9545,
            connect_timeout: 300,
            request_timeout: 300,
            transaction_timeout: 120,
            poll_interval: 1000,
            confirmations: 1,
        }
    }
}

/// The wallet connector backing a submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    /// An injected browser wallet, reached through the local bridge page.
    #[default]
    Browser,
    /// A JSON-RPC node with unlocked accounts.
    Rpc,
}

impl WalletKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Rpc => "rpc",
        }
    }
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "browser" => Ok(Self::Browser),
            "rpc" => Ok(Self::Rpc),
            other => Err(format!("unknown wallet `{other}`, expected `browser` or `rpc`")),
        }
    }
}
