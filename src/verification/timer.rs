//! Scoped periodic tasks. A guard is acquired when a countdown starts and the
//! task is aborted when the guard is dropped, on every exit path.

use std::{future::Future, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

#[derive(Debug)]
pub struct IntervalGuard {
    handle: JoinHandle<()>,
}

impl IntervalGuard {
    /// Runs `tick` every `period`, first after one full period.
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tick().await;
            }
        });
        Self { handle }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for IntervalGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// One-shot delayed value, cancelled on drop.
#[derive(Debug)]
pub struct Delayed<T> {
    handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> Delayed<T> {
    pub fn spawn(delay: Duration, value: T) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            value
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Waits for the value. Returns `None` if the task was cancelled or already taken.
    pub async fn wait(&mut self) -> Option<T> {
        let handle = self.handle.take()?;
        handle.await.ok()
    }
}

impl<T> Drop for Delayed<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
