//! Background execution of blocking operations.
//!
//! # Design
//! Each submitted operation runs on its own thread: one blocking round trip
//! to completion, then the caller's completion callback with the result.
//! `FnOnce` ownership makes exactly-once delivery a compile-time property,
//! and the callback always runs on the spawned thread, never on the
//! submitting one. There is no cancellation; a submitted operation runs to
//! completion or failure.

use std::thread::{self, JoinHandle};

use crate::error::Error;

/// Handle to a background operation.
///
/// Dropping the handle detaches the operation; it still runs and its
/// callback still fires. [`join`](BackgroundHandle::join) blocks until the
/// callback has returned, which tests use to sequence assertions.
#[derive(Debug)]
pub struct BackgroundHandle {
    handle: JoinHandle<()>,
}

impl BackgroundHandle {
    /// Block until the operation and its callback have finished.
    pub fn join(self) {
        // A panicking callback poisons nothing of ours; surface it.
        if let Err(panic) = self.handle.join() {
            std::panic::resume_unwind(panic);
        }
    }
}

/// Run `job` on a new thread and deliver its result to `callback`.
pub(crate) fn submit<T, F, C>(job: F, callback: C) -> BackgroundHandle
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, Error> + Send + 'static,
    C: FnOnce(Result<T, Error>) + Send + 'static,
{
    BackgroundHandle {
        handle: thread::spawn(move || callback(job())),
    }
}
