//! Async task lifecycle tracking

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::task::JoinHandle;

/// Monotonic id source for spawned tasks.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(0);

/// Tasks spawned and not yet finished or aborted.
static ACTIVE_TASKS: AtomicU64 = AtomicU64::new(0);

/// Tasks running longer than this get a warning on completion.
const SLOW_TASK_SECS: u64 = 30;

pub fn active_task_count() -> u64 {
    ACTIVE_TASKS.load(Ordering::Relaxed)
}

/// Decrements the active count however the task ends, including abort.
struct ActiveTask {
    name: &'static str,
    task_id: u64,
    start: Instant,
}

impl Drop for ActiveTask {
    fn drop(&mut self) {
        ACTIVE_TASKS.fetch_sub(1, Ordering::Relaxed);
        let duration = self.start.elapsed();
        tracing::debug!(
            task = %self.name,
            task_id = self.task_id,
            duration_ms = duration.as_millis(),
            "Task finished"
        );
        if duration.as_secs() > SLOW_TASK_SECS {
            tracing::warn!(
                task = %self.name,
                task_id = self.task_id,
                duration_ms = duration.as_millis(),
                "Task took very long (potential hang)"
            );
        }
    }
}

/// Spawn an instrumented async task with lifecycle logging.
///
/// Long-lived loops (clock, refreshers) go through here too; their "finished" entry marks
/// session shutdown.
pub fn spawn_tracked<F>(name: &'static str, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let task_id = NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed);
    ACTIVE_TASKS.fetch_add(1, Ordering::Relaxed);

    tracing::debug!(task = %name, task_id, "Task spawned");

    let active = ActiveTask {
        name,
        task_id,
        start: Instant::now(),
    };
    tokio::spawn(async move {
        let _active = active;
        future.await
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_tracked_returns_output() {
        let handle = spawn_tracked("answer", async { 42 });
        assert_eq!(handle.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_aborted_task_is_released() {
        let handle = spawn_tracked("forever", std::future::pending::<()>());
        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
        // Other tests spawn concurrently, so only check the counter did not leak negative.
        assert!(active_task_count() < u64::MAX / 2);
    }
}
