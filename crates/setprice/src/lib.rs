//! # setprice
//!
//! Submit a user-defined price to a contract through the user's wallet.
//!
//! The [`SubmissionForm`] validates a price typed by the user, asks a
//! [`WalletConnector`](setprice_wallets::WalletConnector) for account access, and calls the
//! configured price setter through a [`TransactionRequester`], reporting its progress as a
//! [`Status`].

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod args;
pub mod handler;
pub mod utils;

mod form;
pub use form::{Status, SubmissionForm};

mod method;
pub use method::{MethodError, PriceMethod};

mod price;
pub use price::{Price, PriceError, parse_price};

mod requester;
pub use requester::{ContractRequester, PendingCall, TransactionRequester};
