//! Ephemeral session codes and their rotation task.
//!
//! Codes are short opaque tokens (`ZP-4821`), not a security boundary: they
//! only prove the scanner could see the presenter's screen recently.

use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use util::config;

pub trait CodeSource: Send + Sync {
    fn next_code(&self) -> String;
}

/// `"{prefix}-{n}"` with `n` uniform in `1000..=9999`.
pub struct RandomCodeSource {
    prefix: String,
}

impl RandomCodeSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl CodeSource for RandomCodeSource {
    fn next_code(&self) -> String {
        let n: u16 = rand::rng().random_range(1000..=9999);
        format!("{}-{n}", self.prefix)
    }
}

/// Replays a fixed list of codes, wrapping around at the end.
pub struct SequenceCodeSource {
    codes: Vec<String>,
    next: AtomicUsize,
}

impl SequenceCodeSource {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: Vec<String> = codes.into_iter().map(Into::into).collect();
        Self {
            codes,
            next: AtomicUsize::new(0),
        }
    }
}

impl CodeSource for SequenceCodeSource {
    fn next_code(&self) -> String {
        if self.codes.is_empty() {
            return String::new();
        }
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        self.codes[i % self.codes.len()].clone()
    }
}

/// Stops a running rotation. Cancelling is idempotent and also happens on drop.
pub struct RotationHandle {
    token: CancellationToken,
}

impl RotationHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for RotationHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[derive(Clone)]
pub struct CodeRotator {
    source: Arc<dyn CodeSource>,
    period: Duration,
}

impl CodeRotator {
    pub fn new(source: Arc<dyn CodeSource>, period: Duration) -> Self {
        Self {
            source,
            period: period.max(Duration::from_millis(1)),
        }
    }

    pub fn from_config() -> Self {
        Self::new(
            Arc::new(RandomCodeSource::new(config::code_prefix())),
            Duration::from_secs(config::rotation_seconds()),
        )
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Issues the first code immediately (returned to the caller) and spawns
    /// a task that hands a fresh code to `on_tick` every period.
    ///
    /// The task ends when the handle is cancelled or `on_tick` returns
    /// `false`. A tick never starts after cancellation was observed, so
    /// callers that also check their own state inside `on_tick` get the
    /// guarantee that nothing is published once they have torn down.
    pub fn start<F, Fut>(&self, mut on_tick: F) -> (String, RotationHandle)
    where
        F: FnMut(String) -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let first = self.source.next_code();
        let token = CancellationToken::new();
        let child = token.clone();
        let source = self.source.clone();
        let period = self.period;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = child.cancelled() => break,
                    _ = interval.tick() => {}
                }
                let code = source.next_code();
                tracing::debug!(%code, "Rotating session code");
                if !on_tick(code).await {
                    break;
                }
            }
        });

        (first, RotationHandle { token })
    }
}
