use std::collections::VecDeque;

/// Arrival-ordered queue: oldest element at the front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FifoQueue<T> {
    items: VecDeque<T>,
}

impl<T> FifoQueue<T> {
    pub fn new() -> Self {
        FifoQueue { items: VecDeque::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        FifoQueue {
            items: VecDeque::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push_back(&mut self, item: T) {
        self.items.push_back(item);
    }

    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Drop the oldest elements so that at most `keep` remain
    pub fn truncate_front(&mut self, keep: usize) {
        let excess = self.items.len().saturating_sub(keep);
        self.items.drain(..excess);
    }
}

impl<T: PartialEq> FifoQueue<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}

impl<T> Default for FifoQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_arrival_order() {
        let mut q = FifoQueue::new();
        q.push_back(2);
        q.push_back(7);
        q.push_back(9);

        assert_eq!(q.pop_front(), Some(2));
        assert_eq!(q.pop_front(), Some(7));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_empty_queue() {
        let mut q: FifoQueue<usize> = FifoQueue::default();
        assert!(q.is_empty());
        assert_eq!(q.pop_front(), None);
    }

    #[test]
    fn test_truncate_front_keeps_newest() {
        let mut q = FifoQueue::with_capacity(5);
        for i in 0..5 {
            q.push_back(i);
        }
        q.truncate_front(3);
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);

        // no-op when already short enough
        q.truncate_front(10);
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn test_contains() {
        let mut q = FifoQueue::new();
        q.push_back(4);
        assert!(q.contains(&4));
        assert!(!q.contains(&5));
    }
}
