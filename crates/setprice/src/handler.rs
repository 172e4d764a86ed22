//! Error reporting.

use eyre::EyreHandler;
use itertools::Itertools;
use std::{error::Error, fmt};

/// Renders `report` and its distinct causes on one line, separated by `; `.
///
/// [`Status::Failed`](crate::Status::Failed) messages and the hook installed by [`install`]
/// both go through here, so a failure reads the same in the form and on the terminal whether
/// or not the hook is installed.
pub fn error_message(report: &eyre::Report) -> String {
    dedup_chain(report.chain()).join("; ")
}

/// Collects the messages of an error chain, dropping messages already contained in the
/// previous one.
fn dedup_chain<'a>(chain: impl Iterator<Item = &'a (dyn Error + 'static)>) -> Vec<String> {
    let mut causes: Vec<String> = chain.map(|cause| cause.to_string().trim().to_string()).collect();
    // `msg1: msg2; msg2` -> `msg1: msg2`
    causes.dedup_by(|b, a| a.contains(b.as_str()));
    causes
}

/// The eyre hook installed by [`install`].
///
/// `{}` prints the same line as [`error_message`]. `{:?}` prints the top message followed by
/// one line per cause, or color-eyre's full report when one is given.
pub struct Handler {
    full_report: Option<Box<dyn EyreHandler>>,
}

impl Handler {
    pub fn new(full_report: Option<Box<dyn EyreHandler>>) -> Self {
        Self { full_report }
    }
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&dedup_chain(eyre::Chain::new(error)).into_iter().format("; "), f)
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(report) = &self.full_report {
            return report.debug(error, f);
        }
        if f.alternate() {
            return fmt::Debug::fmt(error, f);
        }

        let mut causes = dedup_chain(eyre::Chain::new(error)).into_iter();
        if let Some(message) = causes.next() {
            f.write_str(&message)?;
        }
        for cause in causes {
            write!(f, "\n  caused by: {cause}")?;
        }
        Ok(())
    }

    fn track_caller(&mut self, location: &'static std::panic::Location<'static>) {
        if let Some(report) = &mut self.full_report {
            report.track_caller(location);
        }
    }
}

/// Installs the setprice [`eyre`] and [`panic`](mod@std::panic) hooks as the global ones.
///
/// Errors print through [`Handler`]. Setting `SETPRICE_DEBUG` switches `{:?}` output to
/// color-eyre's report with span traces and backtraces. Panics always use color-eyre.
pub fn install() {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section("This is a bug. Please report it at https://github.com/setprice/setprice/issues")
        .into_hooks();
    panic_hook.install();

    let eyre_hook = eyre_hook.into_eyre_hook();
    let full_report = std::env::var_os("SETPRICE_DEBUG").is_some();
    if let Err(err) = eyre::set_hook(Box::new(move |error| {
        Box::new(Handler::new(full_report.then(|| eyre_hook(error))))
    })) {
        debug!(%err, "eyre hook already installed");
    }
}
