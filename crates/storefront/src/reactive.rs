//! Current-value publish/subscribe.
//!
//! A [`Subject`] holds one current value and a list of subscribers. Every
//! update replaces the value and calls each subscriber synchronously, in
//! registration order, before returning. A new subscriber is called once
//! with the current value at registration, so late subscribers never miss
//! the latest state.
//!
//! Subscribers are never called while an internal lock is held, so a
//! callback may read the subject (or another subject) without deadlocking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A reactive current-value holder.
///
/// Cloning a `Subject` yields another handle to the same value and
/// subscriber list.
pub struct Subject<T> {
    inner: Arc<SubjectInner<T>>,
}

struct SubjectInner<T> {
    value: Mutex<T>,
    subscribers: Mutex<Vec<(u64, Callback<T>)>>,
    next_id: AtomicU64,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default + Clone + Send + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("value", &*lock(&self.inner.value))
            .field("subscribers", &lock(&self.inner.subscribers).len())
            .finish()
    }
}

/// Lock a mutex, recovering the data if a subscriber panicked while holding it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Clone + Send + 'static> Subject<T> {
    /// Create a subject holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(SubjectInner {
                value: Mutex::new(initial),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// A copy of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        lock(&self.inner.value).clone()
    }

    /// Replace the current value and notify every subscriber.
    pub fn next(&self, value: T) {
        *lock(&self.inner.value) = value.clone();
        self.notify(&value);
    }

    /// Derive the next value from the current one and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let value = {
            let mut current = lock(&self.inner.value);
            let next = f(&current);
            *current = next.clone();
            next
        };
        self.notify(&value);
    }

    /// Register `callback`, calling it immediately with the current value.
    ///
    /// The callback stays registered until the returned [`Subscription`] is
    /// dropped or [`Subscription::unsubscribe`] is called.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: Callback<T> = Arc::new(callback);
        lock(&self.inner.subscribers).push((id, Arc::clone(&callback)));

        let current = self.get();
        callback(&current);

        let weak: Weak<SubjectInner<T>> = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    lock(&inner.subscribers).retain(|(sub_id, _)| *sub_id != id);
                }
            })),
        }
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.subscribers).len()
    }

    fn notify(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = lock(&self.inner.subscribers)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(value);
        }
    }
}

impl<T: Clone + PartialEq + Send + 'static> Subject<T> {
    /// Replace the value only if it differs from the current one.
    ///
    /// Returns `true` if subscribers were notified.
    pub fn next_if_changed(&self, value: T) -> bool {
        {
            let mut current = lock(&self.inner.value);
            if *current == value {
                return false;
            }
            *current = value.clone();
        }
        self.notify(&value);
        true
    }
}

/// Handle returned by [`Subject::subscribe`].
///
/// Unsubscribes when dropped.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Stop receiving updates.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
