//! Worker-pool dispatch for pipeline jobs.
//!
//! Jobs run on rayon's global thread pool in FIFO order. The dispatcher
//! tracks pending jobs with an atomic counter and a condvar so callers can
//! block until the queue drains, which tests and shutdown paths rely on.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use tracing::debug;

use photosave_core::{pipeline, SaveRequest};

use crate::{PhotoSavedListener, SaveOutcome};

/// Submits pipeline invocations to the worker pool and tracks completion.
///
/// Cloning is cheap; clones share the same pending-job accounting.
#[derive(Clone)]
pub struct TaskDispatcher {
    inner: Arc<Inner>,
}

struct Inner {
    pending: AtomicUsize,
    lock: Mutex<()>,
    condvar: Condvar,
}

impl Default for TaskDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskDispatcher {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                pending: AtomicUsize::new(0),
                lock: Mutex::new(()),
                condvar: Condvar::new(),
            }),
        }
    }

    /// Submit a save-with-normalization job.
    ///
    /// The listener receives the outcome exactly once, on the pool thread
    /// that ran the job.
    pub fn submit_save(&self, request: SaveRequest, listener: impl PhotoSavedListener) {
        self.spawn(
            move || match pipeline::save_photo(request) {
                Ok(photo) => SaveOutcome::Saved(photo),
                Err(err) => SaveOutcome::Failed(err),
            },
            listener,
        );
    }

    /// Submit a rotate-in-place job for an existing photo file.
    pub fn submit_rotate(
        &self,
        path: impl Into<PathBuf>,
        angle: f32,
        listener: impl PhotoSavedListener,
    ) {
        let path = path.into();
        self.spawn(
            move || match pipeline::rotate_photo_in_place(&path, angle) {
                Ok(photo) => SaveOutcome::Saved(photo),
                Err(err) => SaveOutcome::Failed(err),
            },
            listener,
        );
    }

    /// Number of jobs submitted but not yet completed.
    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// Block until every submitted job has completed and notified its
    /// listener.
    pub fn wait_idle(&self) {
        let mut guard = self.inner.lock.lock().unwrap();
        while self.inner.pending.load(Ordering::SeqCst) > 0 {
            guard = self.inner.condvar.wait(guard).unwrap();
        }
    }

    fn spawn(
        &self,
        job: impl FnOnce() -> SaveOutcome + Send + 'static,
        listener: impl PhotoSavedListener,
    ) {
        let inner = Arc::clone(&self.inner);
        let listener: Box<dyn PhotoSavedListener> = Box::new(listener);

        inner.pending.fetch_add(1, Ordering::SeqCst);
        rayon::spawn_fifo(move || {
            let outcome = job();
            if let SaveOutcome::Failed(err) = &outcome {
                debug!(error = %err, "photo task failed");
            }
            listener.photo_saved(outcome);
            inner.job_finished();
        });
    }
}

impl Inner {
    fn job_finished(&self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _guard = self.lock.lock().unwrap();
            self.condvar.notify_all();
        }
    }
}
