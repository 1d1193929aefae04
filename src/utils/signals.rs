//! Signal handling for graceful shutdown

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tracing::info;

/// Register SIGTERM/SIGINT handlers and wait until one of them arrives.
///
/// Registration errors surface before the first await so the caller can
/// refuse to start instead of running without a clean shutdown path.
pub fn shutdown_signal() -> std::io::Result<impl std::future::Future<Output = ()>> {
    let signals = Signals::new([SIGTERM, SIGINT])?;
    let handle = signals.handle();

    Ok(async move {
        let mut signals = signals;
        if let Some(signal) = signals.next().await {
            let name = if signal == SIGTERM { "SIGTERM" } else { "SIGINT" };
            info!("Received {}, stopping countdown server", name);
        }
        handle.close();
    })
}
