//! Configuration errors.

use figment::providers::{Format, Toml};
use std::{collections::HashSet, error::Error, fmt};

/// The header of every [`ExtractConfigError`] message.
pub const FAILED_TO_EXTRACT_CONFIG_MSG: &str = "failed to extract setprice config:";

/// Represents a failed attempt to extract `Config` from a `Figment`
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractConfigError {
    /// error thrown when extracting the `Config`
    pub(crate) error: figment::Error,
}

impl ExtractConfigError {
    /// Wraps the figment error
    pub fn new(error: figment::Error) -> Self {
        Self { error }
    }
}

impl fmt::Display for ExtractConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut unique_errors = Vec::with_capacity(self.error.count());
        let mut unique = HashSet::with_capacity(self.error.count());
        for err in self.error.clone() {
            let from_toml = err
                .metadata
                .as_ref()
                .map(|meta| meta.name.contains(Toml::NAME))
                .unwrap_or_default();
            let err = SettingError { error: err, from_toml };
            if unique.insert(err.to_string()) {
                unique_errors.push(err);
            }
        }
        writeln!(f, "{FAILED_TO_EXTRACT_CONFIG_MSG}")?;
        for err in unique_errors {
            writeln!(f, "{err}")?;
        }
        Ok(())
    }
}

impl Error for ExtractConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Error::source(&self.error)
    }
}

/// A single figment error, tagged with whether it came from the toml file.
struct SettingError {
    error: figment::Error,
    from_toml: bool,
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from_toml {
            f.write_str("setprice.toml error: ")?;
        } else {
            f.write_str("setprice config error: ")?;
        }
        write!(f, "{}", self.error)?;
        if !self.error.path.is_empty() {
            // the path will contain the setting name like `["contract_address"]`
            write!(f, " for setting `{}`", self.error.path.join("."))?;
        }
        Ok(())
    }
}

/// Errors raised when an extracted `Config` is missing something a submission needs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "no contract address configured; set `contract_address` in setprice.toml, \
         $SETPRICE_CONTRACT_ADDRESS or $NEXT_PUBLIC_CONTRACT_ADDRESS"
    )]
    MissingContractAddress,
}
