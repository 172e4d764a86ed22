use clap::Parser;
use setprice::{args::SetPriceArgs, handler, utils};
use std::process::ExitCode;
use yansi::Paint;

fn main() -> ExitCode {
    handler::install();
    utils::enable_paint();
    let args = SetPriceArgs::parse();
    utils::subscriber(args.verbosity);

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{}", format!("Error: {err:?}").red());
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn run(args: SetPriceArgs) -> eyre::Result<bool> {
    args.run().await
}
