use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to a debounced task.
///
/// Cancelling is idempotent and a no-op once the task has finished. The same token
/// is handed to the task, so cancelling after the window has elapsed still reaches
/// whatever the task is awaiting.
#[derive(Debug)]
pub struct DebounceHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl DebounceHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Runs `task` once `window` has elapsed, unless `token` is cancelled first.
pub fn debounce<F>(window: Duration, token: CancellationToken, task: F) -> DebounceHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let guard = token.clone();
    let task = tokio::spawn(async move {
        tokio::select! {
            _ = guard.cancelled() => return,
            _ = tokio::time::sleep(window) => {}
        }
        task.await;
    });
    DebounceHandle { token, task }
}

/// Holds at most one pending debounced task. Scheduling supersedes whatever was pending.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<DebounceHandle>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn schedule<F>(&mut self, token: CancellationToken, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(debounce(self.window, token, task));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_task(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_once_the_window_elapses() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = debounce(
            Duration::from_millis(350),
            CancellationToken::new(),
            counting_task(&counter),
        );

        tokio::time::sleep(Duration::from_millis(349)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_within_window_never_runs() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = debounce(
            Duration::from_millis(350),
            CancellationToken::new(),
            counting_task(&counter),
        );

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.cancel();
        handle.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(handle.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_completion_is_a_no_op() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = debounce(
            Duration::from_millis(10),
            CancellationToken::new(),
            counting_task(&counter),
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn debouncer_keeps_only_the_latest_task() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(350));

        debouncer.schedule(CancellationToken::new(), counting_task(&first));
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.schedule(CancellationToken::new(), counting_task(&second));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }
}
