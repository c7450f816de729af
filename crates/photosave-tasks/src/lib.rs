//! Background execution for photosave pipeline invocations.
//!
//! A pipeline invocation is a blocking unit of work; this crate submits it
//! to a worker pool and delivers a one-shot completion notification to a
//! caller-supplied listener. Exactly one notification is delivered per
//! submitted job, on whichever pool thread ran the job.
//!
//! Queued-but-not-started jobs are only dropped if the process exits;
//! once pixel processing begins a job runs to completion or failure.
//! Cancellation mid-transform is not supported.

mod dispatch;

pub use dispatch::TaskDispatcher;

use photosave_core::{SaveError, SavedPhoto};

/// The result delivered to a completion listener, exactly once per job.
#[derive(Debug)]
pub enum SaveOutcome {
    /// The photo was written; carries its path and name.
    Saved(SavedPhoto),
    /// The invocation failed; nothing usable was written.
    Failed(SaveError),
}

impl SaveOutcome {
    /// Returns true for a successful save.
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }

    /// Extract the saved photo, discarding a failure.
    pub fn saved(self) -> Option<SavedPhoto> {
        match self {
            SaveOutcome::Saved(photo) => Some(photo),
            SaveOutcome::Failed(_) => None,
        }
    }
}

/// One-shot completion callback for a submitted job.
///
/// The listener is consumed on delivery, which makes exactly-once
/// notification a type-level guarantee rather than a convention. Any
/// `FnOnce(SaveOutcome)` closure works as a listener.
pub trait PhotoSavedListener: Send + 'static {
    /// Called once when the job completes, with the success or failure
    /// outcome. Runs on a worker-pool thread.
    fn photo_saved(self: Box<Self>, outcome: SaveOutcome);
}

impl<F> PhotoSavedListener for F
where
    F: FnOnce(SaveOutcome) + Send + 'static,
{
    fn photo_saved(self: Box<Self>, outcome: SaveOutcome) {
        self(outcome)
    }
}
