use crate::{Error, Result};
use std::{
    fmt::{self, Debug, Formatter},
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::sync::oneshot;

struct Latch<T> {
    sender: Mutex<Option<oneshot::Sender<Result<T>>>>,
    discarded: AtomicUsize,
}

/// One-shot completion signal handed to the work.
///
/// Only the first call to [`complete`](Self::complete) (or one of its
/// shorthands) is honored. Any later call is dropped: the first of those is
/// logged as a diagnostic, the rest are silent. Clones share the same latch,
/// so the outcome may be signaled from another task.
pub struct Completion<T> {
    latch: Arc<Latch<T>>,
}

/// Receiving side of a [`Completion`].
pub struct Settlement<T> {
    receiver: oneshot::Receiver<Result<T>>,
}

impl<T> Completion<T> {
    pub fn channel() -> (Completion<T>, Settlement<T>) {
        let (sender, receiver) = oneshot::channel();
        (
            Completion {
                latch: Arc::new(Latch {
                    sender: Mutex::new(Some(sender)),
                    discarded: AtomicUsize::new(0),
                }),
            },
            Settlement { receiver },
        )
    }

    /// Settle with `outcome`. Returns `true` if this call was the one honored.
    pub fn complete(&self, outcome: Result<T>) -> bool {
        let sender = self
            .latch
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match sender {
            Some(sender) => {
                if sender.send(outcome).is_err() {
                    log::debug!("The outcome of the work was signaled after the scope went away");
                }
                true
            }
            None => {
                if self.latch.discarded.fetch_add(1, Ordering::AcqRel) == 0 {
                    match outcome {
                        Ok(..) => log::warn!(
                            "The work signaled its completion more than once, the later value is discarded"
                        ),
                        Err(e) => log::warn!(
                            "The work signaled its completion more than once, the later error is discarded: {:#}",
                            e
                        ),
                    }
                }
                false
            }
        }
    }

    pub fn succeed(&self, value: T) -> bool {
        self.complete(Ok(value))
    }

    pub fn fail(&self, error: impl Into<Error>) -> bool {
        self.complete(Err(error.into()))
    }

    /// Number of signals dropped because the outcome was already settled.
    pub fn discarded(&self) -> usize {
        self.latch.discarded.load(Ordering::Acquire)
    }

    pub fn is_settled(&self) -> bool {
        self.latch
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl<T> Clone for Completion<T> {
    fn clone(&self) -> Self {
        Self {
            latch: self.latch.clone(),
        }
    }
}

impl<T> Debug for Completion<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("settled", &self.is_settled())
            .field("discarded", &self.discarded())
            .finish()
    }
}

impl<T> Settlement<T> {
    /// Wait for the first signaled outcome.
    ///
    /// If every [`Completion`] is dropped before anything was signaled, the work
    /// can no longer settle and this resolves to an error.
    pub async fn outcome(self) -> Result<T> {
        self.receiver.await.unwrap_or_else(|_| {
            Err(Error::msg(
                "The work completed without signaling its outcome",
            ))
        })
    }
}
