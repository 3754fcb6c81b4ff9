// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A one-shot completion barrier.
//!
//! Producers call `signal` exactly once each, handing over whatever
//! they finished (for the renderer, the band of pixels they own).  A
//! single consumer calls `wait_until` and sleeps on a condition
//! variable until the expected number of signals has arrived.  Only
//! then does it receive the deposited values, so nothing a producer
//! is still working on can be observed early.

use log::{debug, error};
use std::io;
use std::sync::{Condvar, Mutex, MutexGuard};

struct State<T> {
    count: usize,
    aborted: Option<io::Error>,
    finished: Vec<T>,
}

/// Counter plus condition variable.  Not reusable across renders.
pub struct CompletionBarrier<T> {
    state: Mutex<State<T>>,
    changed: Condvar,
}

impl<T> CompletionBarrier<T> {
    /// An empty barrier with a count of zero.
    pub fn new() -> Self {
        CompletionBarrier {
            state: Mutex::new(State {
                count: 0,
                aborted: None,
                finished: Vec::new(),
            }),
            changed: Condvar::new(),
        }
    }

    // A producer that panicked while holding the lock cannot have left
    // the counter half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<State<T>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Deposits a finished value, increments the counter, and wakes
    /// the waiter.  Returns the count after the increment.
    pub fn signal(&self, done: T) -> usize {
        let count = {
            let mut state = self.lock();
            state.count += 1;
            state.finished.push(done);
            state.count
        };
        self.changed.notify_all();
        count
    }

    /// Marks the barrier as abandoned and wakes the waiter, which will
    /// then return `reason` instead of the finished values.  Only the
    /// first reason is kept.
    pub fn abort(&self, reason: io::Error) {
        {
            let mut state = self.lock();
            if state.aborted.is_none() {
                state.aborted = Some(reason);
            }
        }
        self.changed.notify_all();
    }

    /// The number of signals received so far.
    pub fn count(&self) -> usize {
        self.lock().count
    }

    /// Blocks until exactly `target` producers have signaled, then
    /// takes everything they deposited.  The predicate is re-tested on
    /// every wake, so spurious wakeups and early notifications just
    /// put the caller back to sleep.
    pub fn wait_until(&self, target: usize) -> io::Result<Vec<T>> {
        let mut state = self.lock();
        while state.count != target && state.aborted.is_none() {
            debug!("barrier at {}/{}, waiting", state.count, target);
            state = self
                .changed
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        if let Some(reason) = state.aborted.take() {
            error!("barrier aborted at {}/{}: {}", state.count, target, reason);
            return Err(reason);
        }
        debug!("barrier reached {}/{}", state.count, target);
        Ok(state.finished.drain(..).collect())
    }
}

impl<T> Default for CompletionBarrier<T> {
    fn default() -> Self {
        CompletionBarrier::new()
    }
}
