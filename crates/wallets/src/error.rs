use alloy_json_rpc::RpcError;
use alloy_primitives::{Address, TxHash};
use alloy_provider::PendingTransactionError;
use alloy_transport::{TransportError, TransportErrorKind};
use std::time::Duration;

/// EIP-1193 error code of a request the user rejected.
pub const USER_REJECTED_REQUEST: i64 = 4001;

/// EIP-1193 error code of a provider that is disconnected from all chains.
pub const DISCONNECTED: i64 = 4900;

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// Error returned by the wallet itself, e.g. a rejected prompt or a failed call.
    #[error("{message}")]
    Provider { code: i64, message: String },
    #[error("{operation} timed out after {timeout:?}")]
    Timeout { operation: &'static str, timeout: Duration },
    #[error("browser wallet is not connected")]
    NotConnected,
    #[error("wallet did not grant access to any account")]
    NoAccounts,
    #[error("account {0} is not available in the wallet")]
    AccountNotGranted(Address),
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
    #[error("unexpected response to `{method}`: {source}")]
    InvalidResponse {
        method: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Transport(TransportError),
    #[error(transparent)]
    Pending(PendingTransactionError),
    #[error("failed to run browser wallet server: {0}")]
    Server(#[from] std::io::Error),
}

impl WalletError {
    /// Returns `true` if the user declined the request in their wallet.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::Provider { code: USER_REJECTED_REQUEST, .. })
    }
}

impl From<TransportError> for WalletError {
    fn from(err: TransportError) -> Self {
        match err {
            RpcError::ErrorResp(payload) => {
                Self::Provider { code: payload.code, message: payload.message.into_owned() }
            }
            // wallet errors tunneled through `Eip1193Transport`
            RpcError::Transport(TransportErrorKind::Custom(err)) => match err.downcast::<Self>() {
                Ok(err) => *err,
                Err(err) => Self::Transport(RpcError::Transport(TransportErrorKind::Custom(err))),
            },
            other => Self::Transport(other),
        }
    }
}
