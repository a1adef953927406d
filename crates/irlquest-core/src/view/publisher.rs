//! Operation cycle shared by every controller
//!
//! Each operation takes a ticket from a generation counter when it starts.
//! Only the holder of the newest ticket may publish its outcome, and nothing
//! is published once the controller is closed. A mutation takes a second
//! ticket once its write succeeds, so its re-fetch outranks any read that
//! started before the write landed. Ticket checks happen inside the watch
//! channel's write lock, so a check and its publish can't be split by a newer
//! operation starting in between.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::state::ViewState;
use crate::error::ApiError;

/// What happened to an operation's result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Published as `Success`
    Succeeded,
    /// Published as `Failure`
    Failed,
    /// Superseded by a newer operation, or the controller was closed
    Discarded,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Succeeded
    }
}

/// Owns a screen's state channel and the lifetime of its operations
#[derive(Debug)]
pub(crate) struct StatePublisher<T> {
    state: watch::Sender<ViewState<T>>,
    generation: AtomicU64,
    /// Generation taken by the last `reset`
    reset_at: AtomicU64,
    cancel: CancellationToken,
}

impl<T: Clone> StatePublisher<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ViewState::Idle);
        Self {
            state,
            generation: AtomicU64::new(0),
            reset_at: AtomicU64::new(0),
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> ViewState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.state.subscribe()
    }

    /// Current or last successful data
    pub fn data(&self) -> Option<T> {
        self.state.borrow().data().cloned()
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel in-flight operations and stop publishing
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// Run one Loading → Success/Failure cycle
    ///
    /// `describe` turns an error into the message shown on screen.
    pub async fn run<F, D>(&self, operation: &'static str, future: F, describe: D) -> Outcome
    where
        F: Future<Output = Result<T, ApiError>>,
        D: FnOnce(&ApiError) -> String,
    {
        let Some(ticket) = self.begin() else {
            return Outcome::Discarded;
        };

        match self.cancellable(operation, future).await {
            Some(result) => self.settle(ticket, operation, result, describe),
            None => Outcome::Discarded,
        }
    }

    /// Run a write, then publish the re-fetched data
    ///
    /// A failed write publishes its failure under the ticket taken at the
    /// start. After a successful write the ticket is renewed, unless a
    /// `reset` happened in the meantime.
    pub async fn run_mutation<W, U, R, D>(
        &self,
        operation: &'static str,
        write: W,
        refetch: R,
        describe: D,
    ) -> Outcome
    where
        W: Future<Output = Result<U, ApiError>>,
        R: Future<Output = Result<T, ApiError>>,
        D: FnOnce(&ApiError) -> String,
    {
        let Some(mut ticket) = self.begin() else {
            return Outcome::Discarded;
        };

        let result = match self.cancellable(operation, write).await {
            None => return Outcome::Discarded,
            Some(Err(e)) => Err(e),
            Some(Ok(_)) => {
                let Some(renewed) = self.renew(ticket) else {
                    debug!(operation, ticket, "write outlived a reset or close, skipping re-fetch");
                    return Outcome::Discarded;
                };
                ticket = renewed;
                match self.cancellable(operation, refetch).await {
                    Some(result) => result,
                    None => return Outcome::Discarded,
                }
            }
        };

        self.settle(ticket, operation, result, describe)
    }

    /// Drop any in-flight result and publish `next` directly
    pub fn reset(&self, next: ViewState<T>) {
        if self.is_closed() {
            return;
        }
        self.state.send_modify(|s| {
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            self.reset_at.store(generation, Ordering::SeqCst);
            *s = next;
        });
    }

    /// Replace the state only if no operation is in flight
    pub fn replace_settled(&self, f: impl FnOnce(&ViewState<T>) -> Option<ViewState<T>>) {
        if self.is_closed() {
            return;
        }
        self.state.send_if_modified(|s| {
            if s.is_loading() {
                return false;
            }
            match f(s) {
                Some(next) => {
                    *s = next;
                    true
                }
                None => false,
            }
        });
    }

    fn begin(&self) -> Option<u64> {
        if self.is_closed() {
            return None;
        }
        let mut ticket = 0;
        self.state.send_modify(|s| {
            ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *s = s.to_loading();
        });
        Some(ticket)
    }

    /// Take a newer ticket for an operation that is still running
    fn renew(&self, ticket: u64) -> Option<u64> {
        let mut renewed = None;
        self.state.send_if_modified(|s| {
            if self.is_closed() || self.reset_at.load(Ordering::SeqCst) > ticket {
                return false;
            }
            renewed = Some(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
            if s.is_loading() {
                return false;
            }
            *s = s.to_loading();
            true
        });
        renewed
    }

    async fn cancellable<F: Future>(&self, operation: &'static str, future: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!(operation, "operation cancelled");
                None
            }
            output = future => Some(output),
        }
    }

    fn settle<D>(
        &self,
        ticket: u64,
        operation: &'static str,
        result: Result<T, ApiError>,
        describe: D,
    ) -> Outcome
    where
        D: FnOnce(&ApiError) -> String,
    {
        match result {
            Ok(data) => self.finish(ticket, operation, |_| ViewState::Success(data), Outcome::Succeeded),
            Err(e) => {
                let message = describe(&e);
                debug!(operation, error = %e, "operation failed");
                self.finish(ticket, operation, |s| s.to_failure(message), Outcome::Failed)
            }
        }
    }

    fn finish(
        &self,
        ticket: u64,
        operation: &'static str,
        next: impl FnOnce(&ViewState<T>) -> ViewState<T>,
        outcome: Outcome,
    ) -> Outcome {
        let published = self.state.send_if_modified(|s| {
            if self.is_closed() || self.generation.load(Ordering::SeqCst) != ticket {
                return false;
            }
            *s = next(s);
            true
        });

        if published {
            outcome
        } else {
            debug!(operation, ticket, "stale result discarded");
            Outcome::Discarded
        }
    }
}

impl<T> Drop for StatePublisher<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Describe an error with the server's message, or `fallback` when blank
pub(crate) fn with_fallback(fallback: &'static str) -> impl FnOnce(&ApiError) -> String {
    move |e: &ApiError| e.user_message(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn status_error(message: &str) -> ApiError {
        ApiError::Status {
            status: 500,
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_success_then_failure_keeps_data() {
        let publisher = StatePublisher::<Vec<i32>>::new();

        let outcome = publisher
            .run("load", async { Ok(vec![1, 2, 3]) }, with_fallback("Failed"))
            .await;
        assert_eq!(outcome, Outcome::Succeeded);
        assert_eq!(publisher.state(), ViewState::Success(vec![1, 2, 3]));

        let outcome = publisher
            .run("load", async { Err(status_error("boom")) }, with_fallback("Failed"))
            .await;
        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(
            publisher.state(),
            ViewState::Failure {
                message: "boom".to_string(),
                last: Some(vec![1, 2, 3]),
            }
        );
    }

    #[tokio::test]
    async fn test_blank_message_uses_fallback() {
        let publisher = StatePublisher::<i32>::new();
        publisher
            .run("load", async { Err(status_error("")) }, with_fallback("Failed to load tasks"))
            .await;
        assert_eq!(publisher.state().error(), Some("Failed to load tasks"));
    }

    #[tokio::test]
    async fn test_loading_is_published_while_in_flight() {
        let publisher = Arc::new(StatePublisher::<i32>::new());
        let mut rx = publisher.subscribe();
        let (tx, gate) = oneshot::channel::<()>();

        let task = {
            let publisher = Arc::clone(&publisher);
            tokio::spawn(async move {
                publisher
                    .run(
                        "load",
                        async move {
                            gate.await.ok();
                            Ok(7)
                        },
                        with_fallback("Failed"),
                    )
                    .await
            })
        };

        rx.wait_for(|s| s.is_loading()).await.unwrap();
        tx.send(()).unwrap();
        assert_eq!(task.await.unwrap(), Outcome::Succeeded);
        assert_eq!(publisher.state(), ViewState::Success(7));
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let publisher = Arc::new(StatePublisher::<&'static str>::new());
        let mut rx = publisher.subscribe();
        let (slow_tx, slow_gate) = oneshot::channel::<()>();

        let slow = {
            let publisher = Arc::clone(&publisher);
            tokio::spawn(async move {
                publisher
                    .run(
                        "load",
                        async move {
                            slow_gate.await.ok();
                            Ok("old")
                        },
                        with_fallback("Failed"),
                    )
                    .await
            })
        };
        rx.wait_for(|s| s.is_loading()).await.unwrap();

        let fast = publisher
            .run("load", async { Ok("new") }, with_fallback("Failed"))
            .await;
        assert_eq!(fast, Outcome::Succeeded);

        slow_tx.send(()).unwrap();
        assert_eq!(slow.await.unwrap(), Outcome::Discarded);
        assert_eq!(publisher.state(), ViewState::Success("new"));
    }

    #[tokio::test]
    async fn test_close_cancels_in_flight() {
        let publisher = Arc::new(StatePublisher::<i32>::new());
        let mut rx = publisher.subscribe();

        let task = {
            let publisher = Arc::clone(&publisher);
            tokio::spawn(async move {
                publisher
                    .run(
                        "load",
                        async {
                            tokio::time::sleep(Duration::from_secs(30)).await;
                            Ok(1)
                        },
                        with_fallback("Failed"),
                    )
                    .await
            })
        };
        rx.wait_for(|s| s.is_loading()).await.unwrap();

        publisher.close();
        assert_eq!(task.await.unwrap(), Outcome::Discarded);
        assert!(publisher.state().is_loading());

        let after = publisher
            .run("load", async { Ok(2) }, with_fallback("Failed"))
            .await;
        assert_eq!(after, Outcome::Discarded);
        assert!(publisher.state().is_loading());
    }

    #[tokio::test]
    async fn test_mutation_refetch_beats_earlier_read() {
        let publisher = Arc::new(StatePublisher::<&'static str>::new());
        let mut rx = publisher.subscribe();
        let (write_tx, write_gate) = oneshot::channel::<()>();

        let mutation = {
            let publisher = Arc::clone(&publisher);
            tokio::spawn(async move {
                publisher
                    .run_mutation(
                        "create",
                        async move {
                            write_gate.await.ok();
                            Ok(())
                        },
                        async { Ok("with new row") },
                        with_fallback("Failed"),
                    )
                    .await
            })
        };
        rx.wait_for(|s| s.is_loading()).await.unwrap();

        let load = publisher
            .run("load", async { Ok("before write") }, with_fallback("Failed"))
            .await;
        assert_eq!(load, Outcome::Succeeded);

        write_tx.send(()).unwrap();
        assert_eq!(mutation.await.unwrap(), Outcome::Succeeded);
        assert_eq!(publisher.state(), ViewState::Success("with new row"));
    }

    #[tokio::test]
    async fn test_failed_write_skips_refetch() {
        let publisher = StatePublisher::<i32>::new();
        let refetched = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let outcome = {
            let refetched = Arc::clone(&refetched);
            publisher
                .run_mutation(
                    "delete",
                    async { Err::<(), _>(status_error("Task not found")) },
                    async move {
                        refetched.store(true, Ordering::SeqCst);
                        Ok(1)
                    },
                    with_fallback("Failed"),
                )
                .await
        };

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(publisher.state().error(), Some("Task not found"));
        assert!(!refetched.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_reset_during_write_drops_mutation() {
        let publisher = Arc::new(StatePublisher::<i32>::new());
        let mut rx = publisher.subscribe();
        let (write_tx, write_gate) = oneshot::channel::<()>();

        let mutation = {
            let publisher = Arc::clone(&publisher);
            tokio::spawn(async move {
                publisher
                    .run_mutation(
                        "create",
                        async move {
                            write_gate.await.ok();
                            Ok(())
                        },
                        async { Ok(5) },
                        with_fallback("Failed"),
                    )
                    .await
            })
        };
        rx.wait_for(|s| s.is_loading()).await.unwrap();

        publisher.reset(ViewState::Idle);
        write_tx.send(()).unwrap();
        assert_eq!(mutation.await.unwrap(), Outcome::Discarded);
        assert!(publisher.state().is_idle());
    }

    #[tokio::test]
    async fn test_replace_settled_skips_loading() {
        let publisher = StatePublisher::<i32>::new();
        publisher.reset(ViewState::Loading { last: None });
        publisher.replace_settled(|_| Some(ViewState::Idle));
        assert!(publisher.state().is_loading());

        publisher.reset(ViewState::Success(1));
        publisher.replace_settled(|_| Some(ViewState::Idle));
        assert!(publisher.state().is_idle());
    }
}
