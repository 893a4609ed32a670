use async_trait::async_trait;
use std::time::Duration;

/// Pause taken after each probe attempt.
#[async_trait]
pub trait ProbeDelay: Send + Sync {
    async fn pause(&self);
}

#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    duration: Duration,
}

impl FixedDelay {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[async_trait]
impl ProbeDelay for FixedDelay {
    async fn pause(&self) {
        tokio::time::sleep(self.duration).await;
    }
}

/// Skips pacing entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl ProbeDelay for NoDelay {
    async fn pause(&self) {}
}
