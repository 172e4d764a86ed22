//! The contract method a price is submitted to.

use crate::price::{Price, PriceError};
use alloy_dyn_abi::{DynSolType, DynSolValue, JsonAbiExt};
use alloy_json_abi::Function;
use alloy_primitives::{Address, Bytes, Selector};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use setprice_config::{Config, ConfigError};

/// A setter taking a single unsigned integer, bound to the contract it lives on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceMethod {
    target: Address,
    function: Function,
    bits: usize,
}

impl PriceMethod {
    /// Parses `signature` (e.g. `setUserDefinedPrice(uint256)`) and binds it to `target`.
    pub fn new(target: Address, signature: &str) -> Result<Self, MethodError> {
        let function = Function::parse(signature).map_err(|err| MethodError::Signature {
            signature: signature.to_string(),
            reason: err.to_string(),
        })?;

        let [param] = function.inputs.as_slice() else {
            return Err(MethodError::Parameters(function.signature()));
        };
        let bits = match DynSolType::parse(&param.ty) {
            Ok(DynSolType::Uint(bits)) => bits,
            _ => return Err(MethodError::Parameters(function.signature())),
        };

        Ok(Self { target, function, bits })
    }

    /// Builds the method from the configured contract address and signature.
    pub fn from_config(config: &Config) -> Result<Self, MethodError> {
        Self::new(config.require_contract_address()?, &config.method)
    }

    pub fn target(&self) -> Address {
        self.target
    }

    pub fn signature(&self) -> String {
        self.function.signature()
    }

    pub fn selector(&self) -> Selector {
        self.function.selector()
    }

    /// Width of the price parameter.
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Checks that `price` fits the price parameter.
    pub fn check(&self, price: Price) -> Result<Price, PriceError> {
        price.check_bits(self.bits)
    }

    /// Selector followed by the ABI-encoded price.
    pub fn encode(&self, price: Price) -> Result<Bytes, MethodError> {
        let price = self.check(price)?;
        let calldata = self
            .function
            .abi_encode_input(&[DynSolValue::Uint(price.value(), self.bits)])
            .map_err(|err| MethodError::Encode(err.to_string()))?;
        Ok(calldata.into())
    }

    /// A call of this method with `price`, leaving sender, gas and fees to the wallet.
    pub fn transaction(&self, price: Price) -> Result<TransactionRequest, MethodError> {
        let input = TransactionInput::both(self.encode(price)?);
        Ok(TransactionRequest::default().to(self.target).input(input))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MethodError {
    #[error("invalid method signature `{signature}`: {reason}")]
    Signature { signature: String, reason: String },
    #[error("method `{0}` must take exactly one unsigned integer argument")]
    Parameters(String),
    #[error("failed to encode call: {0}")]
    Encode(String),
    #[error(transparent)]
    Price(#[from] PriceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
