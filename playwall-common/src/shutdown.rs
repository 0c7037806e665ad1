use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Inner {
    set: Mutex<bool>,
    cond: Condvar,
}

/// Process-wide shutdown event. Set once, never reset.
///
/// Clones share the same event, so each activity gets its own handle at
/// construction time.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        // A poisoned flag is still a valid flag
        self.inner.set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Sets the signal and wakes every waiter. Returns `true` only for the
    /// call that performed the transition.
    pub fn trigger(&self) -> bool {
        let mut set = self.lock();
        if *set {
            return false;
        }
        *set = true;
        self.inner.cond.notify_all();
        true
    }

    pub fn is_set(&self) -> bool {
        *self.lock()
    }

    /// Waits up to `timeout` for the signal. Returns `true` if it is set.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait();
        };
        let mut set = self.lock();
        while !*set {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            set = match self.inner.cond.wait_timeout(set, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        *set
    }

    /// Waits until the signal is set, with no deadline.
    fn wait(&self) -> bool {
        let mut set = self.lock();
        while !*set {
            set = self.inner.cond.wait(set).unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        true
    }
}
