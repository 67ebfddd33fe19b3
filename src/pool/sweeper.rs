use crate::pool::core::PoolInner;
use parking_lot::{Condvar, Mutex};
use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SweeperState {
    Running,
    Stopped,
}

/// Shared lifecycle flag for one sweeper worker. `stop` both flips the state
/// and interrupts a sleeping worker.
pub(crate) struct Lifecycle {
    state: Mutex<SweeperState>,
    signal: Condvar,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        Self { state: Mutex::new(SweeperState::Running), signal: Condvar::new() }
    }

    pub(crate) fn stop(&self) {
        let mut state = self.state.lock();
        *state = SweeperState::Stopped;
        self.signal.notify_all();
    }

    pub(crate) fn is_stopped(&self) -> bool {
        *self.state.lock() == SweeperState::Stopped
    }

    /// Sleeps for `interval` or until `stop` is signaled, whichever comes
    /// first. Returns the state observed on wakeup.
    pub(crate) fn wait_interval(&self, interval: Duration) -> SweeperState {
        let deadline = Instant::now().checked_add(interval);
        let mut state = self.state.lock();
        while *state == SweeperState::Running {
            match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    let _ = self.signal.wait_for(&mut state, deadline - now);
                }
                None => self.signal.wait(&mut state),
            }
        }
        *state
    }
}

/// Spawns the background sweeper for a pool. The worker holds only a weak
/// reference to the pool state, so abandoned pools do not keep it alive.
pub(crate) fn spawn<K, V>(
    pool: Weak<PoolInner<K, V>>,
    lifecycle: Arc<Lifecycle>,
    interval: Duration,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    thread::spawn(move || run(pool, lifecycle, interval))
}

fn run<K, V>(pool: Weak<PoolInner<K, V>>, lifecycle: Arc<Lifecycle>, interval: Duration)
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    while !lifecycle.is_stopped() {
        // The upgraded reference is dropped before sleeping so the worker
        // never keeps an abandoned pool alive across a wait.
        {
            let Some(inner) = pool.upgrade() else { break };
            inner.sweep_once();
        }
        if lifecycle.wait_interval(interval) == SweeperState::Stopped {
            break;
        }
    }
}
