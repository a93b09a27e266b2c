//! Periodic reconciliation loop.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawn the fixed-interval reconciliation loop.
///
/// Each tick runs in its own task so a panic is contained to that tick; the
/// loop logs the failure and keeps going. The first tick fires one full
/// interval after startup, and the loop exits only when `shutdown` is
/// cancelled.
pub fn spawn<F, Fut>(interval: Duration, shutdown: CancellationToken, tick: F) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first interval tick completes immediately; skip it.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    log::info!("reconciler loop stopping");
                    return;
                }
                _ = ticker.tick() => {}
            }

            if let Err(e) = tokio::spawn(tick()).await {
                log::error!("reconciliation tick panicked: {}", e);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn ticks_fire_on_the_interval() {
        let count = Arc::new(AtomicUsize::new(0));
        let shutdown = CancellationToken::new();

        let c = Arc::clone(&count);
        let _handle = spawn(Duration::from_secs(300), shutdown.clone(), move || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(950)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        shutdown.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn a_panicking_tick_does_not_kill_the_loop() {
        let count = Arc::new(AtomicUsize::new(0));
        let shutdown = CancellationToken::new();

        let c = Arc::clone(&count);
        let _handle = spawn(Duration::from_secs(300), shutdown.clone(), move || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) == 0 {
                    panic!("first tick blows up");
                }
            }
        });

        tokio::time::sleep(Duration::from_secs(1000)).await;
        assert!(count.load(Ordering::SeqCst) >= 3);

        shutdown.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_loop() {
        let count = Arc::new(AtomicUsize::new(0));
        let shutdown = CancellationToken::new();

        let c = Arc::clone(&count);
        let handle = spawn(Duration::from_secs(300), shutdown.clone(), move || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(350)).await;
        shutdown.cancel();
        handle.await.unwrap();

        let after_cancel = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(2000)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    }
}
