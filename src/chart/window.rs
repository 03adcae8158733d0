//! Bounded sliding window of stream samples

use super::types::StreamSample;
use std::collections::VecDeque;

/// Samples kept by default
pub const WINDOW_CAPACITY: usize = 121;

/// Arrival-ordered buffer that evicts the oldest sample once full
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: VecDeque<StreamSample>,
    capacity: usize,
}

impl SampleWindow {
    /// Create a window holding at most `capacity` samples (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a sample, then trim from the front down to capacity
    pub fn push(&mut self, sample: StreamSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, StreamSample> {
        self.samples.iter()
    }

    /// Copy of the window contents, oldest first
    pub fn to_vec(&self) -> Vec<StreamSample> {
        self.samples.iter().copied().collect()
    }

    pub fn latest(&self) -> Option<&StreamSample> {
        self.samples.back()
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(WINDOW_CAPACITY)
    }
}
