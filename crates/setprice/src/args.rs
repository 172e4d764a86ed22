//! Command line interface.

use crate::{
    form::{Status, SubmissionForm},
    requester::{ContractRequester, TransactionRequester},
};
use alloy_primitives::Address;
use clap::{ArgAction, Parser};
use eyre::{Context, Result};
use serde::Serialize;
use setprice_config::{
    Config, WalletKind,
    figment::{
        self, Metadata, Profile,
        providers::Serialized,
        value::{Dict, Map},
    },
};
use setprice_wallets::{BrowserConnector, RpcConnector, WalletConnector};
use std::{
    fmt,
    io::{self, BufRead, IsTerminal},
    time::Duration,
};
use url::Url;
use yansi::Paint;

/// Submit a user-defined price to a contract through your wallet.
///
/// Settings not given on the command line are read from `setprice.toml` and `SETPRICE_`
/// prefixed environment variables.
#[derive(Clone, Debug, Default, Parser, Serialize)]
#[command(name = "setprice", version, about, long_about = None)]
pub struct SetPriceArgs {
    /// The price to submit, in wei.
    ///
    /// Prompts for prices until end of input when omitted.
    #[arg(value_name = "PRICE")]
    #[serde(skip)]
    pub price: Option<String>,

    /// Address of the contract exposing the price setter.
    #[arg(long, short = 'c', value_name = "ADDRESS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,

    /// Signature of the price setter.
    #[arg(long, value_name = "SIGNATURE")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// The wallet to send from: `browser` or `rpc`.
    #[arg(long, short = 'w', value_name = "WALLET")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<WalletKind>,

    /// JSON-RPC endpoint used by the `rpc` wallet.
    #[arg(long, short = 'r', value_name = "URL")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    /// Account to send from when using the `rpc` wallet.
    #[arg(long, value_name = "ADDRESS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<Address>,

    /// Port of the browser wallet page; `0` picks a free port.
    #[arg(long, value_name = "PORT")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_port: Option<u16>,

    /// Seconds to wait for the transaction to be confirmed.
    #[arg(long, value_name = "SECONDS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_timeout: Option<u64>,

    /// Number of confirmations to wait for.
    #[arg(long, value_name = "BLOCKS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmations: Option<u64>,

    /// Verbosity level of the log messages.
    ///
    /// Pass multiple times to increase the verbosity (e.g. -v, -vv, -vvv).
    #[arg(long, short, action = ArgAction::Count)]
    #[serde(skip)]
    pub verbosity: u8,
}

impl figment::Provider for SetPriceArgs {
    fn metadata(&self) -> Metadata {
        Metadata::named("command line arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}

impl SetPriceArgs {
    /// Loads the configuration with these arguments merged on top.
    pub fn load_config(&self) -> Result<Config> {
        Ok(Config::from_provider(Config::figment().merge(self.clone()))?)
    }

    /// Runs the form, once for the given price or interactively.
    ///
    /// Returns whether the last submission succeeded.
    pub async fn run(self) -> Result<bool> {
        let config = self.load_config()?;
        trace!(?config, "loaded config");
        let requester = ContractRequester::from_config(&config)?;
        let method = requester.method();
        sh_note(format_args!("Calling {} on {}", method.signature(), method.target()));

        match config.wallet {
            WalletKind::Browser => {
                let wallet = BrowserConnector::start(
                    config.browser_port,
                    Duration::from_secs(config.connect_timeout),
                    Duration::from_secs(config.request_timeout),
                )
                .await
                .wrap_err("failed to start the browser wallet page")?;
                sh_note(format_args!(
                    "Open {} in the browser holding your wallet",
                    wallet.url().cyan()
                ));
                self.submit(SubmissionForm::new(wallet, requester)).await
            }
            WalletKind::Rpc => {
                let url: Url = config
                    .rpc_url
                    .parse()
                    .wrap_err_with(|| format!("invalid rpc url `{}`", config.rpc_url))?;
                let wallet = RpcConnector::new(url, config.sender);
                self.submit(SubmissionForm::new(wallet, requester)).await
            }
        }
    }

    async fn submit<W, R>(self, mut form: SubmissionForm<W, R>) -> Result<bool>
    where
        W: WalletConnector,
        R: TransactionRequester,
    {
        form.on_status(print_status);

        if let Some(price) = self.price {
            form.set_input(price);
            return Ok(!form.submit().await.is_error());
        }

        let mut ok = true;
        while let Some(input) = prompt_price().await? {
            form.set_input(input);
            ok = !form.submit().await.is_error();
        }
        Ok(ok)
    }
}

/// Reads the next price, or `None` at end of input.
async fn prompt_price() -> Result<Option<String>> {
    tokio::task::spawn_blocking(|| {
        if io::stdin().is_terminal() {
            match dialoguer::Input::<String>::new()
                .with_prompt("Price (wei)")
                .allow_empty(true)
                .interact_text()
            {
                Ok(input) => Ok(Some(input)),
                Err(dialoguer::Error::IO(err))
                    if matches!(
                        err.kind(),
                        io::ErrorKind::UnexpectedEof | io::ErrorKind::Interrupted
                    ) =>
                {
                    Ok(None)
                }
                Err(err) => Err(err.into()),
            }
        } else {
            let mut line = String::new();
            let read = io::stdin().lock().read_line(&mut line)?;
            Ok((read > 0).then_some(line))
        }
    })
    .await?
}

fn print_status(status: &Status) {
    let message = status.to_string();
    let line = match status {
        Status::Idle => return,
        Status::Confirmed(hash) => format!("{} ({hash})", message.green()),
        Status::Submitted(hash) => format!("{message} ({hash})"),
        status if status.is_error() => message.red().to_string(),
        _ => message.dim().to_string(),
    };
    println!("{line}");
}

fn sh_note(message: fmt::Arguments<'_>) {
    eprintln!("{}", message.dim());
}
