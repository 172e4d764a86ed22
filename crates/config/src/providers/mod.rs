//! Config providers.

use figment::{
    Error, Metadata, Profile, Provider,
    providers::{Env, Format, Toml},
    value::{Dict, Map},
};
use std::path::{Path, PathBuf};

/// A convenience provider to retrieve a toml file.
/// This will return an error if the env var is set but the file does not exist
pub(crate) struct TomlFileProvider {
    pub env_var: Option<&'static str>,
    pub default: PathBuf,
}

impl TomlFileProvider {
    pub(crate) fn new(env_var: Option<&'static str>, default: impl Into<PathBuf>) -> Self {
        Self { env_var, default: default.into() }
    }

    fn env_val(&self) -> Option<String> {
        self.env_var.and_then(Env::var)
    }

    fn file(&self) -> PathBuf {
        self.env_val().map(PathBuf::from).unwrap_or_else(|| self.default.clone())
    }

    fn is_missing(&self) -> bool {
        self.env_val().is_some_and(|file| !Path::new(&file).exists())
    }
}

impl Provider for TomlFileProvider {
    fn metadata(&self) -> Metadata {
        if self.is_missing() {
            Metadata::named("TOML file provider")
        } else {
            Toml::file(self.file()).metadata()
        }
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        use serde::de::Error as _;
        if let (Some(var), Some(file)) = (self.env_var, self.env_val())
            && !Path::new(&file).exists()
        {
            return Err(Error::custom(format!(
                "Config file `{file}` set in env var `{var}` does not exist"
            )));
        }
        Toml::file(self.file()).data()
    }
}

/// Maps the `NEXT_PUBLIC_CONTRACT_ADDRESS` variable used by web deployments onto
/// `contract_address`.
pub(crate) struct ContractAddressEnvProvider;

impl ContractAddressEnvProvider {
    pub(crate) const VAR: &'static str = "NEXT_PUBLIC_CONTRACT_ADDRESS";
}

impl Provider for ContractAddressEnvProvider {
    fn metadata(&self) -> Metadata {
        Metadata::named("Contract address env compat")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();
        if let Some(val) = Env::var(Self::VAR).filter(|val| !val.trim().is_empty()) {
            dict.insert("contract_address".to_string(), val.trim().to_string().into());
        }
        Ok(Map::from([(Profile::Default, dict)]))
    }
}
