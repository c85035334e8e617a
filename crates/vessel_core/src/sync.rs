//! The exclusion domain
//!
//! Hooks are not guaranteed to run on the same thread, but if they run on
//! different threads they are serialized. [`EventSynchronizer`] is the single
//! lock every lifecycle entry point and every callback dispatch goes through.
//!
//! The domain is not reentrant. A thread that is already inside and tries to
//! enter again gets [`ReentrantEntry`] back instead of deadlocking on itself;
//! the runtime turns that into a fatal contract violation.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use thiserror::Error;

static NEXT_THREAD_TOKEN: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_TOKEN: u64 = NEXT_THREAD_TOKEN.fetch_add(1, Ordering::Relaxed);
}

/// Nonzero identifier unique to the calling thread
fn current_thread_token() -> u64 {
    THREAD_TOKEN.with(|token| *token)
}

/// The calling thread is already inside the domain
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("reentrant entry into the event domain")]
pub struct ReentrantEntry;

/// Single non-reentrant mutual-exclusion domain guarding `T`
pub struct EventSynchronizer<T> {
    /// Token of the thread currently inside, 0 when free
    owner: AtomicU64,
    inner: Mutex<T>,
}

impl<T> EventSynchronizer<T> {
    /// Create a domain guarding `value`
    pub fn new(value: T) -> Self {
        Self {
            owner: AtomicU64::new(0),
            inner: Mutex::new(value),
        }
    }

    /// Run `f` inside the domain
    ///
    /// Blocks until no other thread is inside. Fails without blocking if the
    /// calling thread is already inside.
    pub fn enter<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, ReentrantEntry> {
        let token = current_thread_token();
        if self.owner.load(Ordering::Acquire) == token {
            return Err(ReentrantEntry);
        }

        let mut guard = self.inner.lock();
        // Declared after `guard` so the owner is cleared before unlocking.
        let _owner = OwnerMark::set(&self.owner, token);
        Ok(f(&mut guard))
    }

    /// Check if the calling thread is inside the domain
    pub fn is_entered(&self) -> bool {
        self.owner.load(Ordering::Acquire) == current_thread_token()
    }

    /// Consume the domain and return the guarded value
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T: Default> Default for EventSynchronizer<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Records the owning thread for the lifetime of one entry
struct OwnerMark<'a> {
    owner: &'a AtomicU64,
}

impl<'a> OwnerMark<'a> {
    fn set(owner: &'a AtomicU64, token: u64) -> Self {
        owner.store(token, Ordering::Release);
        Self { owner }
    }
}

impl Drop for OwnerMark<'_> {
    fn drop(&mut self) {
        self.owner.store(0, Ordering::Release);
    }
}
