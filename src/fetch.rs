//! One asynchronous retrieval of the story collection.
//!
//! A fetch is a two-phase protocol:
//!
//! 1. [`FetchLifecycle::start`] sends [`StoryAction::FetchInit`] on the
//!    caller's channel *before returning*, then spawns the retrieval on the
//!    tokio runtime.
//! 2. When the source answers, exactly one of
//!    [`StoryAction::FetchSuccess`] / [`StoryAction::FetchFailure`] follows on
//!    the same channel.
//!
//! Tearing the returned [`FetchHandle`] down (explicitly or by dropping it)
//! drops the task's sender, so the result is discarded and the channel
//! closes.  The check and the send happen under one lock, so a teardown that
//! races the completion either wins outright or comes after the send.  The
//! underlying request is left to run to completion; only its outcome is
//! ignored.
//!
//! Nothing here distinguishes overlapping fetches from each other.  Callers
//! keep to one fetch per channel and tear down before starting another.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::reducer::StoryAction;
use crate::source::StorySource;

pub struct FetchLifecycle;

impl FetchLifecycle {
    /// Emit `FetchInit` and start retrieving from `source`.
    ///
    /// If the receiver is already gone nothing is spawned.
    pub fn start(
        runtime: &Handle,
        source: Arc<dyn StorySource>,
        tx: UnboundedSender<StoryAction>,
    ) -> FetchHandle {
        if tx.send(StoryAction::FetchInit).is_err() {
            debug!(source = source.name(), "receiver closed before fetch start");
            return FetchHandle {
                sender: Arc::new(Mutex::new(None)),
                task: None,
            };
        }
        info!(source = source.name(), "fetch started");

        let sender = Arc::new(Mutex::new(Some(tx)));
        let slot = Arc::clone(&sender);
        let task = runtime.spawn(async move {
            let action = match source.fetch().await {
                Ok(stories) => {
                    info!(source = source.name(), count = stories.len(), "fetch succeeded");
                    StoryAction::FetchSuccess(stories)
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "fetch failed");
                    StoryAction::FetchFailure
                }
            };

            let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
            match slot.take() {
                // Receiver dropped means the consumer went away; same outcome.
                Some(tx) => {
                    let _ = tx.send(action);
                }
                None => debug!(source = source.name(), "discarding result of torn-down fetch"),
            }
        });

        FetchHandle {
            sender,
            task: Some(task),
        }
    }
}

/// Owner's side of a running fetch.
pub struct FetchHandle {
    /// `None` once the result has been sent or the fetch was torn down.
    sender: Arc<Mutex<Option<UnboundedSender<StoryAction>>>>,
    task: Option<JoinHandle<()>>,
}

impl FetchHandle {
    /// Ignore the result from now on and close the channel.  Idempotent.
    pub fn teardown(&self) {
        let taken = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if taken.is_some() {
            debug!("fetch torn down");
        }
    }

    /// Whether the retrieval task has completed (or never ran).
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for FetchHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{make_story, Story};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::{mpsc, oneshot};

    /// Answers whatever the test sends through the gate.
    struct GatedSource {
        gate: Mutex<Option<oneshot::Receiver<Result<Vec<Story>>>>>,
    }

    impl GatedSource {
        fn new() -> (Self, oneshot::Sender<Result<Vec<Story>>>) {
            let (tx, rx) = oneshot::channel();
            let src = Self {
                gate: Mutex::new(Some(rx)),
            };
            (src, tx)
        }
    }

    #[async_trait]
    impl StorySource for GatedSource {
        fn name(&self) -> &str {
            "gated"
        }

        async fn fetch(&self) -> Result<Vec<Story>> {
            let rx = self.gate.lock().unwrap().take().expect("fetched twice");
            rx.await.map_err(|_| anyhow!("gate dropped"))?
        }
    }

    #[tokio::test]
    async fn init_is_sent_before_start_returns() {
        let (src, _gate) = GatedSource::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _handle = FetchLifecycle::start(&Handle::current(), Arc::new(src), tx);

        assert_eq!(rx.try_recv().unwrap(), StoryAction::FetchInit);
        assert!(rx.try_recv().is_err(), "nothing else until the source answers");
    }

    #[tokio::test]
    async fn success_follows_init() {
        let (src, gate) = GatedSource::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _handle = FetchLifecycle::start(&Handle::current(), Arc::new(src), tx);

        gate.send(Ok(vec![make_story("0", "React")])).unwrap();

        assert_eq!(rx.recv().await, Some(StoryAction::FetchInit));
        assert_eq!(
            rx.recv().await,
            Some(StoryAction::FetchSuccess(vec![make_story("0", "React")]))
        );
        assert_eq!(rx.recv().await, None, "exactly one completion");
    }

    #[tokio::test]
    async fn failure_follows_init() {
        let (src, gate) = GatedSource::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _handle = FetchLifecycle::start(&Handle::current(), Arc::new(src), tx);

        gate.send(Err(anyhow!("network down"))).unwrap();

        assert_eq!(rx.recv().await, Some(StoryAction::FetchInit));
        assert_eq!(rx.recv().await, Some(StoryAction::FetchFailure));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn result_after_teardown_is_discarded() {
        let (src, gate) = GatedSource::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = FetchLifecycle::start(&Handle::current(), Arc::new(src), tx);

        assert_eq!(rx.recv().await, Some(StoryAction::FetchInit));
        handle.teardown();
        gate.send(Ok(vec![make_story("0", "React")])).unwrap();

        assert_eq!(rx.recv().await, None, "no dispatch after teardown");
    }

    #[tokio::test]
    async fn teardown_closes_channel_while_source_is_pending() {
        let (src, gate) = GatedSource::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = FetchLifecycle::start(&Handle::current(), Arc::new(src), tx);

        assert_eq!(rx.recv().await, Some(StoryAction::FetchInit));
        handle.teardown();
        assert_eq!(rx.recv().await, None, "closed before the source answers");

        gate.send(Ok(vec![make_story("0", "React")])).unwrap();
        handle.teardown();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn teardown_racing_completion_never_delivers_late() {
        for _ in 0..50 {
            let (src, gate) = GatedSource::new();
            let (tx, mut rx) = mpsc::unbounded_channel();
            let handle = FetchLifecycle::start(&Handle::current(), Arc::new(src), tx);
            assert_eq!(rx.recv().await, Some(StoryAction::FetchInit));

            gate.send(Ok(vec![make_story("0", "React")])).unwrap();
            handle.teardown();

            // Either the send won the race (and is already queued) or nothing
            // arrives; never a result after teardown returned.
            let queued = rx.try_recv().ok();
            assert_eq!(rx.recv().await, None);
            if let Some(action) = queued {
                assert!(matches!(action, StoryAction::FetchSuccess(_)));
            }
        }
    }

    #[tokio::test]
    async fn dropping_the_handle_tears_down() {
        let (src, gate) = GatedSource::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        drop(FetchLifecycle::start(&Handle::current(), Arc::new(src), tx));

        gate.send(Ok(vec![])).unwrap();

        assert_eq!(rx.recv().await, Some(StoryAction::FetchInit));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn closed_receiver_spawns_nothing() {
        let (src, _gate) = GatedSource::new();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let handle = FetchLifecycle::start(&Handle::current(), Arc::new(src), tx);
        assert!(handle.is_finished());
    }
}
