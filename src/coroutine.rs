//! Bounded concurrent tasks feeding one shared [`Bar`].
//!
//! A [`Coroutine`] owns a bar whose total is the number of tasks and a
//! semaphore with `limit` permits. Submitting waits for a permit, so at most
//! `limit` tasks run at any time and the submitter slows down when they are
//! all busy. Every task advances the bar by exactly one when it finishes,
//! whether it succeeded or ran out of attempts.
//!
//! # Examples
//!
//! ```rust
//! use linebar::bar::BarConfig;
//! use linebar::coroutine::Coroutine;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let coroutine = Coroutine::new(3, 2, BarConfig::hidden());
//! for i in 0..3 {
//!     coroutine
//!         .submit_retry(move || async move {
//!             if i == 1 { Err("flaky") } else { Ok(()) }
//!         }, 2)
//!         .await;
//! }
//! coroutine.wait().await;
//! assert_eq!(coroutine.bar().current(), 3);
//! # }
//! ```

use crate::bar::{Bar, BarConfig};

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

/// Bounded task driver over a shared [`Bar`].
pub struct Coroutine {
    bar: Bar,
    limiter: Arc<Semaphore>,
    limit: u32,
}

impl fmt::Debug for Coroutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coroutine")
            .field("bar", &self.bar)
            .field("limit", &self.limit)
            .field("available", &self.limiter.available_permits())
            .finish()
    }
}

/// Advances the bar, then frees the slot, even if the task panicked.
struct Completion {
    bar: Bar,
    _permit: OwnedSemaphorePermit,
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.bar.add(1);
        self.bar.flush();
    }
}

impl Coroutine {
    /// Creates a driver for `total` tasks, at most `limit` of them at once.
    ///
    /// The bar is built from `config`, its total set to `total`, and the first
    /// frame is written immediately. A `limit` of zero is treated as one.
    pub fn new(total: usize, limit: usize, config: BarConfig) -> Self {
        let bar = Bar::new(config);
        bar.set_total(i64::try_from(total).unwrap_or(i64::MAX));
        bar.flush();
        Self::with_bar(bar, limit)
    }

    /// Drives an existing bar. Its total is left untouched.
    pub fn with_bar(bar: Bar, limit: usize) -> Self {
        let limit = limit
            .clamp(1, Semaphore::MAX_PERMITS)
            .min(u32::MAX as usize);
        Self {
            bar,
            limiter: Arc::new(Semaphore::new(limit)),
            limit: limit as u32,
        }
    }

    /// The shared bar.
    pub fn bar(&self) -> &Bar {
        &self.bar
    }

    /// Maximum number of tasks running at once.
    pub fn limit(&self) -> usize {
        self.limit as usize
    }

    /// Number of tasks currently holding a slot.
    pub fn running(&self) -> usize {
        self.limit as usize - self.limiter.available_permits()
    }

    /// Runs an infallible task once.
    pub async fn submit<F, Fut>(&self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut task = Some(task);
        self.submit_retry(
            move || {
                let task = task.take();
                async move {
                    if let Some(task) = task {
                        task().await;
                    }
                    Ok::<(), Infallible>(())
                }
            },
            1,
        )
        .await;
    }

    /// Runs `task` up to `attempts` times, stopping at the first success.
    ///
    /// Waits for a free slot before spawning. Errors are only traced: a task
    /// that needs to report failure should do so itself, e.g. with
    /// [`Bar::log`]. An `attempts` of zero is treated as one.
    pub async fn submit_retry<F, Fut, E>(&self, mut task: F, attempts: u32)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let permit = match self.limiter.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                warn!(error = %e, "task limiter closed, counting task as done");
                self.bar.add(1);
                self.bar.flush();
                return;
            }
        };

        let completion = Completion {
            bar: self.bar.clone(),
            _permit: permit,
        };
        let attempts = attempts.max(1);

        tokio::spawn(async move {
            let _completion = completion;
            for attempt in 1..=attempts {
                match task().await {
                    Ok(()) => return,
                    Err(e) => debug!(attempt, attempts, error = %e, "task attempt failed"),
                }
            }
            debug!(attempts, "task gave up");
        });
    }

    /// Waits until every submitted task has finished.
    pub async fn wait(&self) {
        if let Err(e) = self.limiter.acquire_many(self.limit).await {
            warn!(error = %e, "task limiter closed while waiting");
        }
    }
}
