//! # setprice-wallets
//!
//! Wallet connectors used to submit price updates.
//!
//! A [`WalletConnector`] answers three questions: is a wallet there, which accounts may we use,
//! and how do we talk to it. Talking happens through an [`Eip1193Provider`], the
//! `request({ method, params })` primitive injected wallets expose. Two connectors are
//! provided:
//!
//! - [`BrowserConnector`]: a wallet injected into a browser page (MetaMask and friends),
//!   reached through a local bridge server.
//! - [`RpcConnector`]: a JSON-RPC node with unlocked accounts, for local development.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod error;
pub use error::{DISCONNECTED, USER_REJECTED_REQUEST, WalletError};

mod connector;
pub use connector::WalletConnector;

mod pending;
pub use pending::{ConfirmationSettings, PendingTransaction};

mod provider;
pub use provider::{Eip1193Provider, ProviderExt};

pub mod rpc;
pub use rpc::{RpcConnector, RpcProvider};

mod signer;
pub use signer::WalletSigner;

mod transport;
pub use transport::Eip1193Transport;

#[cfg(feature = "browser")]
pub mod browser;
#[cfg(feature = "browser")]
pub use browser::{BrowserConnector, BrowserWalletServer};

#[cfg(test)]
mod test_utils;
