use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initializes a tracing Subscriber for logging.
///
/// `RUST_LOG` takes precedence. Otherwise only warnings are shown, and each `-v` lowers the
/// level for setprice's own crates.
pub fn subscriber(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::new(format!("warn,setprice={level},setprice_wallets={level},setprice_config={level}"))
    });
    let _ = FmtSubscriber::builder().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

/// Disables terminal colors unless stdout is a terminal that supports them.
pub fn enable_paint() {
    yansi::whenever(yansi::Condition::TTY_AND_COLOR);
}
