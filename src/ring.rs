use std::collections::VecDeque;

/// A bounded queue, the oldest entry is dropped when a push would overflow it.
#[derive(Debug, Clone)]
pub struct Ring<T> {
    max: usize,
    buf: VecDeque<T>,
}

impl<T> Ring<T> {
    pub fn with_capacity(max: usize) -> Self {
        assert!(max > 0, "max cannot be empty");
        Self {
            max,
            buf: VecDeque::with_capacity(max),
        }
    }

    pub const fn capacity(&self) -> usize {
        self.max
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = (self.buf.len() >= self.max)
            .then(|| self.buf.pop_front())
            .flatten();
        self.buf.push_back(item);
        evicted
    }

    /// Removes the most recently pushed entry
    pub fn pop_newest(&mut self) -> Option<T> {
        self.buf.pop_back()
    }

    /// Empties the ring, yielding entries oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = T> + ExactSizeIterator + '_ {
        self.buf.drain(..)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + ExactSizeIterator {
        self.buf.iter()
    }
}
