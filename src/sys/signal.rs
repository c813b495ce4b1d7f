//! Termination signals.

use tokio::signal::unix::{Signal, SignalKind, signal};
use tracing::debug;

struct TerminationSignals {
    interrupt: Signal,
    terminate: Signal,
}

impl TerminationSignals {
    fn install() -> std::io::Result<Self> {
        Ok(TerminationSignals {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    async fn next(&mut self) -> &'static str {
        let name = tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        };
        debug!(signal = name, "Received termination signal");
        name
    }
}

/// Resolves with the name of the first of SIGINT or SIGTERM to arrive.
pub async fn terminated() -> std::io::Result<&'static str> {
    Ok(TerminationSignals::install()?.next().await)
}

/// Calls `on_signal` for every SIGINT or SIGTERM until the future is dropped.
pub async fn for_each_termination<F>(mut on_signal: F) -> std::io::Result<()>
where F: FnMut(&'static str) {
    let mut signals = TerminationSignals::install()?;
    loop {
        on_signal(signals.next().await);
    }
}
