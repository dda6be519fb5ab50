//! Fixed-capacity FIFO sample window

use std::collections::VecDeque;

/// Bounded sliding window of the most recent samples
///
/// Once the window holds `capacity` samples, each push evicts the oldest one.
/// The backing storage is allocated once and never grows.
///
/// # Example
/// ```
/// use lighthouse_nav::SampleWindow;
///
/// let mut window = SampleWindow::new(2);
/// window.push(1);
/// window.push(2);
/// assert_eq!(window.push(3), Some(1));
/// assert_eq!(window.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct SampleWindow<T> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T> SampleWindow<T> {
    /// Create an empty window
    ///
    /// A zero capacity is raised to 1 so the window always keeps the latest sample.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, returning the evicted oldest sample if the window was full
    pub fn push(&mut self, sample: T) -> Option<T> {
        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> {
        self.samples.iter()
    }

    /// Most recently pushed sample
    pub fn latest(&self) -> Option<&T> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Discard all samples, keeping the allocation
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
