//! An alloy transport over an [`Eip1193Provider`].

use crate::{Eip1193Provider, WalletError};
use alloy_json_rpc::{
    ErrorPayload, RequestPacket, Response, ResponsePacket, ResponsePayload, RpcError,
    SerializedRequest,
};
use alloy_provider::RootProvider;
use alloy_rpc_client::RpcClient;
use alloy_transport::{TransportError, TransportErrorKind, TransportFut, TransportResult};
use serde_json::Value;
use std::{sync::Arc, task};
use tower::Service;

/// Carries JSON-RPC packets through a wallet's `request` function.
///
/// This lets alloy's [`Provider`](alloy_provider::Provider) machinery (sending, receipt
/// polling, confirmation tracking) run on top of any connector, the browser bridge included.
/// Wallet errors are returned as JSON-RPC error responses so their code and message survive.
#[derive(Clone, Debug)]
pub struct Eip1193Transport {
    provider: Arc<dyn Eip1193Provider>,
}

impl Eip1193Transport {
    pub fn new(provider: Arc<dyn Eip1193Provider>) -> Self {
        Self { provider }
    }

    /// Wraps the transport in an alloy [`RootProvider`].
    pub fn into_provider(self) -> RootProvider {
        RootProvider::new(RpcClient::new(self, true))
    }

    async fn dispatch(&self, req: SerializedRequest) -> TransportResult<Response> {
        let params = match req.params() {
            Some(params) => serde_json::from_str(params.get())
                .map_err(|err| RpcError::deser_err(err, params.get()))?,
            None => Value::Array(Vec::new()),
        };

        let payload = match self.provider.request(req.method(), params).await {
            Ok(result) => ResponsePayload::Success(
                serde_json::value::to_raw_value(&result).map_err(RpcError::ser_err)?,
            ),
            Err(WalletError::Provider { code, message }) => {
                ResponsePayload::Failure(ErrorPayload { code, message: message.into(), data: None })
            }
            Err(WalletError::Transport(err)) => return Err(err),
            Err(err) => return Err(TransportErrorKind::custom(err)),
        };
        Ok(Response { id: req.id().clone(), payload })
    }
}

impl Service<RequestPacket> for Eip1193Transport {
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = TransportFut<'static>;

    fn poll_ready(&mut self, _cx: &mut task::Context<'_>) -> task::Poll<Result<(), Self::Error>> {
        task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RequestPacket) -> Self::Future {
        let this = self.clone();
        Box::pin(async move {
            match req {
                RequestPacket::Single(req) => this.dispatch(req).await.map(ResponsePacket::Single),
                RequestPacket::Batch(reqs) => {
                    let mut responses = Vec::with_capacity(reqs.len());
                    for req in reqs {
                        responses.push(this.dispatch(req).await?);
                    }
                    Ok(ResponsePacket::Batch(responses))
                }
            }
        })
    }
}
