//! Debounce timer for coalescing bursts of saves into a single sync pass.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// A restartable one-shot timer: each `arm` supersedes the previous one, so a
/// burst of N arms within the delay window runs the action exactly once,
/// timed from the last arm.
///
/// The generation counter is the whole state machine. Arming bumps it and
/// spawns a timer task carrying the new value; when a timer expires it fires
/// only if its generation is still current, which makes superseded timers
/// no-ops without any explicit cancellation. The counter has its own mutex so
/// arming never waits on an in-progress write or sync.
pub struct Debouncer {
    delay: Duration,
    generation: Mutex<u64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Mutex::new(0),
        }
    }

    pub fn arm<F, Fut>(self: &Arc<Self>, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = {
            let mut current = self.generation.lock();
            *current += 1;
            *current
        };

        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(this.delay).await;
            if *this.generation.lock() != generation {
                return;
            }
            action().await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bump(count: &Arc<AtomicUsize>) -> impl FnOnce() -> std::future::Ready<()> + use<> {
        let count = Arc::clone(count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn a_single_arm_fires_once_after_the_delay() {
        let debouncer = Arc::new(Debouncer::new(Duration::from_secs(10)));
        let count = Arc::new(AtomicUsize::new(0));

        debouncer.arm(bump(&count));

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn a_burst_of_arms_fires_exactly_once() {
        let debouncer = Arc::new(Debouncer::new(Duration::from_secs(10)));
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            debouncer.arm(bump(&count));
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn the_window_restarts_from_the_last_arm() {
        let debouncer = Arc::new(Debouncer::new(Duration::from_secs(10)));
        let count = Arc::new(AtomicUsize::new(0));

        debouncer.arm(bump(&count));
        tokio::time::sleep(Duration::from_secs(8)).await;
        debouncer.arm(bump(&count));

        // Nine seconds after the second arm: the first timer's deadline has
        // long passed, but it was superseded and must not fire.
        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn a_new_arm_after_firing_fires_again() {
        let debouncer = Arc::new(Debouncer::new(Duration::from_secs(10)));
        let count = Arc::new(AtomicUsize::new(0));

        debouncer.arm(bump(&count));
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        debouncer.arm(bump(&count));
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
