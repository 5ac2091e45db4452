// Deferred UI marshaling: a FIFO queue of fire-and-forget work items bound
// for the UI-affine thread. Each job carries an alive token for its
// submitting object; a job whose owner has been destroyed by the time the
// queue drains is silently skipped. There is no cancellation primitive —
// submitters avoid staleness by checking "did this value already match?"
// before posting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

/// Cheap, cloneable liveness check for the object that posted a job.
#[derive(Debug, Clone)]
pub struct AliveToken(Arc<AtomicBool>);

impl AliveToken {
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Owner side of an [`AliveToken`]. Dropping the guard marks every token
/// handed out from it as dead.
#[derive(Debug)]
pub struct AliveGuard(Arc<AtomicBool>);

impl AliveGuard {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn token(&self) -> AliveToken {
        AliveToken(Arc::clone(&self.0))
    }
}

impl Default for AliveGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AliveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct UiJob {
    token: AliveToken,
    run: Box<dyn FnOnce() + Send>,
}

/// Submitting half of the queue; clone freely.
#[derive(Clone)]
pub struct UiDispatcher {
    tx: Sender<UiJob>,
}

impl UiDispatcher {
    /// Queue a job to run on the next drain, guarded by `token`.
    pub fn post(&self, token: &AliveToken, job: impl FnOnce() + Send + 'static) {
        let job = UiJob {
            token: token.clone(),
            run: Box::new(job),
        };
        // The receiving half only disappears when the host shuts down; a
        // job lost at that point is indistinguishable from a stale one.
        if self.tx.send(job).is_err() {
            log::debug!("ui dispatch queue closed; dropping deferred job");
        }
    }
}

/// Draining half of the queue, held by the host's UI loop.
pub struct UiQueue {
    rx: Receiver<UiJob>,
}

impl UiQueue {
    /// Run every queued job whose submitter is still alive, in FIFO order.
    /// Returns how many jobs actually ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        for job in self.rx.try_iter() {
            if job.token.is_alive() {
                (job.run)();
                ran += 1;
            } else {
                log::debug!("skipping deferred ui job for destroyed owner");
            }
        }
        ran
    }
}

/// Create a connected dispatcher/queue pair.
pub fn ui_queue() -> (UiDispatcher, UiQueue) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (UiDispatcher { tx }, UiQueue { rx })
}
