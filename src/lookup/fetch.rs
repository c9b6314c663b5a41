use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::domain::SelectOption;

use super::{LookupError, OptionLookup};

/// Result of a background option fetch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Options(Vec<SelectOption>),
    Failed(LookupError),
}

/// Handle to the single in-flight fetch of a field.
///
/// The fetch settles exactly once; after `poll` has yielded the outcome it
/// never yields again. Dropping the handle disconnects the channel, which is
/// the cancellation path: a worker that finishes late sends into nothing and
/// its result is discarded.
#[derive(Debug)]
pub struct PendingFetch {
    rx: Receiver<FetchOutcome>,
    settled: bool,
}

impl PendingFetch {
    /// Non-blocking check for the outcome. `None` while the worker is still
    /// running, or forever after the fetch has settled.
    pub fn poll(&mut self) -> Option<FetchOutcome> {
        if self.settled {
            return None;
        }
        match self.rx.try_recv() {
            Ok(outcome) => {
                self.settled = true;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.settled = true;
                Some(FetchOutcome::Failed(LookupError::new(
                    "option source disconnected before replying",
                )))
            }
        }
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }
}

/// Run `lookup.fetch(key)` on a worker thread, delivering one outcome to the
/// returned handle.
pub fn spawn_fetch(lookup: Arc<dyn OptionLookup>, key: String) -> PendingFetch {
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("selectui-fetch".to_string())
        .spawn(move || {
            let outcome = match lookup.fetch(&key) {
                Ok(options) => FetchOutcome::Options(options),
                Err(err) => FetchOutcome::Failed(err),
            };
            // Receiver may already be gone; a cancelled fetch discards its result.
            let _ = tx.send(outcome);
        });
    if let Err(err) = spawned {
        tracing::warn!(error = %err, "failed to spawn option fetch worker");
    }
    PendingFetch { rx, settled: false }
}
