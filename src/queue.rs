//! FIFO queue driving the breadth-first builders.
use std::collections::VecDeque;

/// First-in first-out queue.
///
/// # Examples
///
/// ```
/// use trie_encodings::Queue;
///
/// let mut queue = Queue::new();
/// queue.push(1);
/// queue.push(2);
/// assert_eq!(queue.shift(), Some(1));
/// assert_eq!(queue.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> Queue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` at the back.
    #[inline(always)]
    pub fn push(&mut self, value: T) {
        self.items.push_back(value);
    }

    /// Removes and returns the front value, or [`None`] if empty.
    #[inline(always)]
    pub fn shift(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Returns the number of queued values.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.items.extend(values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let mut queue = Queue::<u32>::new();
        assert_eq!(queue.len(), 0);
        assert!(queue.is_empty());
        assert_eq!(queue.shift(), None);
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = Queue::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.shift(), Some(1));
        assert_eq!(queue.shift(), Some(2));
        assert_eq!(queue.shift(), Some(3));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_interleaved() {
        let mut queue = Queue::new();
        queue.push('a');
        assert_eq!(queue.shift(), Some('a'));
        queue.extend(['b', 'c']);
        queue.push('d');
        assert_eq!(queue.shift(), Some('b'));
        assert_eq!(queue.shift(), Some('c'));
        assert_eq!(queue.shift(), Some('d'));
        assert_eq!(queue.shift(), None);
    }
}
