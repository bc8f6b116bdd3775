use serde::Serialize;
use std::collections::VecDeque;

/// Ordered sequence bounded to `capacity` items; the oldest item is evicted first.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct RollingWindow<T> {
    #[serde(skip)]
    capacity: usize,
    items: VecDeque<T>,
}

impl<T> RollingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        RollingWindow {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends `item`, returning the evicted oldest item if the window was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };

        self.items.push_back(item);

        evicted
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.push(item);
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}
