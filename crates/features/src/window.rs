//! Bounded, time-ordered ring buffer
//!
//! One buffer type backs the trade ledger (bounded by age), the mid-price
//! series (bounded by count) and the label history (bounded by both). Entries
//! are pushed with a timestamp and leave from the front only, so eviction is
//! amortized O(1) per stale entry.

use std::collections::VecDeque;

use chrono::Duration;
use microflow_core::Timestamp;

/// A value with the time it entered the window
#[derive(Debug, Clone, PartialEq)]
pub struct Stamped<T> {
    pub at: Timestamp,
    pub value: T,
}

impl<T> Stamped<T> {
    /// Age of the entry at `now`
    #[inline]
    pub fn age(&self, now: Timestamp) -> Duration {
        now - self.at
    }
}

#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    entries: VecDeque<Stamped<T>>,
    /// Maximum number of entries, oldest dropped first
    capacity: Option<usize>,
    /// Entries strictly older than this are expired
    max_age: Option<Duration>,
}

impl<T> RollingWindow<T> {
    pub fn new(capacity: Option<usize>, max_age: Option<Duration>) -> Self {
        let capacity = capacity.map(|c| c.max(1));
        Self {
            entries: VecDeque::with_capacity(capacity.unwrap_or(16)),
            capacity,
            max_age,
        }
    }

    /// Count-bounded window
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Some(capacity), None)
    }

    /// Age-bounded window
    pub fn with_max_age(max_age: Duration) -> Self {
        Self::new(None, Some(max_age))
    }

    /// Append an entry. Returns the entry pushed out by the count bound, if any.
    ///
    /// Callers must push in non-decreasing time order.
    pub fn push(&mut self, at: Timestamp, value: T) -> Option<Stamped<T>> {
        let overflow = match self.capacity {
            Some(capacity) if self.entries.len() >= capacity => self.entries.pop_front(),
            _ => None,
        };
        self.entries.push_back(Stamped { at, value });
        overflow
    }

    #[inline]
    fn is_expired(&self, entry: &Stamped<T>, now: Timestamp) -> bool {
        self.max_age.is_some_and(|max_age| entry.age(now) > max_age)
    }

    /// Remove and return the front entry if it is expired at `now`
    pub fn pop_expired(&mut self, now: Timestamp) -> Option<Stamped<T>> {
        let front = self.entries.front()?;
        if self.is_expired(front, now) {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Remove expired entries from the front while `evictable` also holds.
    ///
    /// Stops at the first entry that is either fresh or not evictable, which
    /// keeps every surviving entry in time order.
    pub fn evict_expired_where<F>(&mut self, now: Timestamp, mut evictable: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut evicted = 0;
        while let Some(front) = self.entries.front() {
            if !self.is_expired(front, now) || !evictable(&front.value) {
                break;
            }
            self.entries.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Remove every expired entry
    pub fn evict_expired(&mut self, now: Timestamp) -> usize {
        self.evict_expired_where(now, |_| true)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Stamped<T>> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut Stamped<T>> + ExactSizeIterator {
        self.entries.iter_mut()
    }

    /// Values only, oldest first
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter().map(|entry| &entry.value)
    }

    #[inline]
    pub fn front(&self) -> Option<&Stamped<T>> {
        self.entries.front()
    }

    #[inline]
    pub fn back(&self) -> Option<&Stamped<T>> {
        self.entries.back()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the count bound is reached. Age-only windows are never full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|capacity| self.entries.len() >= capacity)
    }

    #[inline]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    #[inline]
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
