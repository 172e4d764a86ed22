//! The price submission form.

use crate::{
    handler,
    price::{Price, PriceError},
    requester::TransactionRequester,
};
use alloy_primitives::TxHash;
use setprice_wallets::WalletConnector;
use std::fmt;

/// Progress of a submission, as shown to the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// The input is not a price.
    InvalidInput(PriceError),
    /// No wallet could be found.
    MissingWallet,
    /// Waiting for the user to grant account access.
    RequestingAccess,
    /// Waiting for the wallet to accept the call.
    Submitting,
    /// Accepted by the wallet, not yet confirmed.
    Submitted(TxHash),
    /// Mined with the required confirmations; the price is updated.
    Confirmed(TxHash),
    /// The submission failed with the given message.
    Failed(String),
}

impl Status {
    /// The hash of the submitted transaction, if there is one.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::Submitted(hash) | Self::Confirmed(hash) => Some(*hash),
            _ => None,
        }
    }

    /// Whether this status ends a submission.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::MissingWallet | Self::Confirmed(_) | Self::Failed(_)
        )
    }

    /// Whether this status reports a problem to the user.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::MissingWallet | Self::Failed(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::InvalidInput(PriceError::Empty | PriceError::NotANumber) => {
                f.write_str("Please enter a valid number")
            }
            Self::InvalidInput(err) => write!(f, "Please enter a valid number ({err})"),
            Self::MissingWallet => f.write_str("Please install MetaMask to interact with this contract"),
            Self::RequestingAccess => f.write_str("Requesting wallet access..."),
            Self::Submitting => f.write_str("Submitting transaction..."),
            Self::Submitted(_) => f.write_str("Transaction submitted! Waiting for confirmation..."),
            Self::Confirmed(_) => f.write_str("Price successfully updated!"),
            Self::Failed(message) => write!(f, "An error occurred: {message}"),
        }
    }
}

type StatusListener = Box<dyn FnMut(&Status) + Send>;

/// Holds the price input and the submission status, and submits the price through a wallet.
///
/// # Example
///
/// ```no_run
/// use setprice::{ContractRequester, SubmissionForm};
/// use setprice_config::Config;
/// use setprice_wallets::RpcConnector;
///
/// # async fn run() -> eyre::Result<()> {
/// let config = Config::load()?;
/// let wallet = RpcConnector::new(config.rpc_url.parse()?, config.sender);
/// let mut form = SubmissionForm::new(wallet, ContractRequester::from_config(&config)?);
/// form.on_status(|status| println!("{status}"));
///
/// form.set_input("100");
/// form.submit().await;
/// # Ok(())
/// # }
/// ```
pub struct SubmissionForm<W, R> {
    input: String,
    status: Status,
    wallet: W,
    requester: R,
    listeners: Vec<StatusListener>,
}

impl<W: WalletConnector, R: TransactionRequester> SubmissionForm<W, R> {
    pub fn new(wallet: W, requester: R) -> Self {
        Self { input: String::new(), status: Status::Idle, wallet, requester, listeners: Vec::new() }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Registers `listener` to be called with every status change, in order.
    pub fn on_status(&mut self, listener: impl FnMut(&Status) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn requester(&self) -> &R {
        &self.requester
    }

    /// Submits the current input and returns the final status.
    ///
    /// Invalid input and a missing wallet are reported without contacting the wallet or the
    /// network. Every other failure is logged and reported as [`Status::Failed`], with the
    /// message rendered by [`handler::error_message`]. The form can be submitted again
    /// afterwards.
    pub async fn submit(&mut self) -> &Status {
        let status = match self.run().await {
            Ok(status) => status,
            Err(err) => {
                error!(%err, input = %self.input, "price submission failed");
                Status::Failed(handler::error_message(&err))
            }
        };
        self.set_status(status);
        &self.status
    }

    async fn run(&mut self) -> eyre::Result<Status> {
        let price = match self.input.parse::<Price>().and_then(|p| self.requester.validate(p)) {
            Ok(price) => price,
            Err(err) => {
                debug!(%err, input = %self.input, "rejected price input");
                return Ok(Status::InvalidInput(err));
            }
        };

        if !self.wallet.is_available().await {
            return Ok(Status::MissingWallet);
        }

        self.set_status(Status::RequestingAccess);
        let accounts = self.wallet.request_access().await?;
        let signer = self.wallet.signer(&accounts)?;
        debug!(account = %signer.address(), "wallet access granted");

        self.set_status(Status::Submitting);
        let pending = self.requester.call(&signer, price).await?;
        let hash = pending.tx_hash();
        self.set_status(Status::Submitted(hash));

        pending.wait().await?;
        Ok(Status::Confirmed(hash))
    }

    fn set_status(&mut self, status: Status) {
        trace!(?status, "status changed");
        self.status = status;
        for listener in &mut self.listeners {
            listener(&self.status);
        }
    }
}

impl<W, R> fmt::Debug for SubmissionForm<W, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionForm")
            .field("input", &self.input)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
