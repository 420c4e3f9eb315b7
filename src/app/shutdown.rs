//! Graceful shutdown handling.

use log::warn;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Stops the queue worker and waits for it to finish its current job.
pub async fn shutdown_gracefully(cancel: CancellationToken, worker: JoinHandle<()>) {
    cancel.cancel();
    if let Err(e) = worker.await {
        warn!("Location queue worker ended abnormally: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_waits_for_worker() {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let worker = tokio::spawn(async move { token.cancelled().await });

        shutdown_gracefully(cancel.clone(), worker).await;
        assert!(cancel.is_cancelled());
    }
}
