//! Reentrant scene lock
//!
//! Code that restructures a scene graph while another thread may render it
//! holds a [`SceneMutex`] for the duration of the change. The owning thread
//! may lock again without blocking; the lock is released when the last
//! guard is dropped.

use std::marker::PhantomData;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

#[derive(Debug, Default)]
struct HoldState {
    owner: Option<ThreadId>,
    count: usize,
}

/// Same-thread reentrant mutual exclusion
#[derive(Debug, Default)]
pub struct SceneMutex {
    state: Mutex<HoldState>,
    released: Condvar,
}

impl SceneMutex {
    /// Create an unlocked mutex
    pub fn new() -> Self {
        Self::default()
    }

    fn hold_state(&self) -> MutexGuard<'_, HoldState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until the lock is free or already held by this thread
    pub fn lock(&self) -> SceneMutexGuard<'_> {
        let me = thread::current().id();
        let mut state = self.hold_state();
        while state.owner.is_some_and(|owner| owner != me) {
            state = self.released.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        state.owner = Some(me);
        state.count += 1;
        SceneMutexGuard { mutex: self, _not_send: PhantomData }
    }

    /// Acquire without blocking
    ///
    /// Returns `None` if another thread holds the lock.
    pub fn try_lock(&self) -> Option<SceneMutexGuard<'_>> {
        let me = thread::current().id();
        let mut state = self.hold_state();
        match state.owner {
            Some(owner) if owner != me => None,
            _ => {
                state.owner = Some(me);
                state.count += 1;
                Some(SceneMutexGuard { mutex: self, _not_send: PhantomData })
            }
        }
    }

    /// Thread currently holding the lock
    pub fn owner(&self) -> Option<ThreadId> {
        self.hold_state().owner
    }

    /// Number of outstanding guards held by the owner
    pub fn hold_count(&self) -> usize {
        self.hold_state().count
    }

    fn unlock(&self) {
        let mut state = self.hold_state();
        state.count = state.count.saturating_sub(1);
        if state.count == 0 {
            state.owner = None;
            drop(state);
            self.released.notify_one();
        }
    }
}

/// Scoped hold on a [`SceneMutex`]; releases one level when dropped
///
/// Guards stay on the thread that acquired them.
#[must_use = "the scene lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SceneMutexGuard<'a> {
    mutex: &'a SceneMutex,
    _not_send: PhantomData<*const ()>,
}

impl Drop for SceneMutexGuard<'_> {
    fn drop(&mut self) {
        self.mutex.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_reentrant_on_owner_thread() {
        let mutex = SceneMutex::new();
        let outer = mutex.lock();
        let inner = mutex.try_lock().expect("owner can re-enter");
        assert_eq!(mutex.hold_count(), 2);
        assert_eq!(mutex.owner(), Some(thread::current().id()));
        drop(inner);
        assert_eq!(mutex.hold_count(), 1);
        drop(outer);
        assert_eq!(mutex.owner(), None);
    }

    #[test]
    fn test_other_thread_cannot_try_lock_while_held() {
        let mutex = Arc::new(SceneMutex::new());
        let guard = mutex.lock();
        let contender = Arc::clone(&mutex);
        let acquired = thread::spawn(move || contender.try_lock().is_some())
            .join()
            .unwrap();
        assert!(!acquired);
        drop(guard);

        let contender = Arc::clone(&mutex);
        let acquired = thread::spawn(move || contender.try_lock().is_some())
            .join()
            .unwrap();
        assert!(acquired);
    }
}
