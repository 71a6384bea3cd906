//! Bounded pool for synchronous render jobs.
//!
//! Rendering is plain pixel-buffer work, so it runs on tokio's blocking
//! threads. A semaphore caps how many renders run at once so a burst of tool
//! calls cannot claim the whole blocking pool, which stdio also relies on.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("render pool is shut down")]
    Closed,
    #[error("render job panicked or was cancelled: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
pub struct RenderPool {
    permits: Arc<Semaphore>,
}

impl RenderPool {
    /// Pool allowing `workers` concurrent jobs (at least one).
    pub fn new(workers: usize) -> Self {
        Self { permits: Arc::new(Semaphore::new(workers.max(1))) }
    }

    /// Run `job` on a blocking thread once a slot is free and await its result.
    pub async fn run<F, T>(&self, job: F) -> Result<T, WorkerError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits).acquire_owned().await.map_err(|_| WorkerError::Closed)?;
        let result = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await?;
        Ok(result)
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}
