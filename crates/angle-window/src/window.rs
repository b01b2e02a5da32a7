//! Sliding Window Implementation

use crate::WindowError;
use std::collections::VecDeque;
use tracing::debug;

/// Samples kept per joint pair (about 2.4 s of reference playback at 300 ms)
pub const WINDOW_CAPACITY: usize = 8;

/// Bounded FIFO of angle samples for a single joint pair
#[derive(Debug, Clone)]
pub struct AngleWindow {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl AngleWindow {
    /// Create an empty window with the given capacity
    pub fn new(capacity: usize) -> Result<Self, WindowError> {
        if capacity == 0 {
            return Err(WindowError::ZeroCapacity);
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Create a window holding [`WINDOW_CAPACITY`] samples
    pub fn with_default_capacity() -> Self {
        Self {
            samples: VecDeque::with_capacity(WINDOW_CAPACITY),
            capacity: WINDOW_CAPACITY,
        }
    }

    /// Add a sample and return the mean of the window.
    ///
    /// At capacity the oldest sample is evicted first.
    pub fn push(&mut self, angle_degrees: f32) -> f32 {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(angle_degrees);
        self.sum() / self.samples.len() as f32
    }

    /// Mean of the current samples, `None` before the first push
    pub fn mean(&self) -> Option<f32> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.sum() / self.samples.len() as f32)
    }

    fn sum(&self) -> f32 {
        self.samples.iter().sum()
    }

    /// Samples oldest first
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
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

    /// Drop every sample
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for AngleWindow {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// One independent window per joint pair, index-aligned with the pair list
#[derive(Debug, Clone)]
pub struct AngleWindowSet {
    windows: Vec<AngleWindow>,
}

impl AngleWindowSet {
    /// Create `pair_count` windows of the given capacity
    pub fn new(pair_count: usize, capacity: usize) -> Result<Self, WindowError> {
        let windows = (0..pair_count)
            .map(|_| AngleWindow::new(capacity))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Created {} angle windows (capacity {})", pair_count, capacity);
        Ok(Self { windows })
    }

    /// Push one angle per pair, returning the smoothed angles in the same order.
    ///
    /// A batch of the wrong length is rejected before any window changes.
    pub fn push_all(&mut self, angles: &[f32]) -> Result<Vec<f32>, WindowError> {
        if angles.len() != self.windows.len() {
            return Err(WindowError::LengthMismatch {
                expected: self.windows.len(),
                actual: angles.len(),
            });
        }
        Ok(self
            .windows
            .iter_mut()
            .zip(angles)
            .map(|(window, &angle)| window.push(angle))
            .collect())
    }

    pub fn get(&self, index: usize) -> Option<&AngleWindow> {
        self.windows.get(index)
    }

    /// Current means, `None` for windows that have no samples yet
    pub fn means(&self) -> Vec<Option<f32>> {
        self.windows.iter().map(AngleWindow::mean).collect()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn clear(&mut self) {
        self.windows.iter_mut().for_each(AngleWindow::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_constant_input_past_capacity() {
        let mut window = AngleWindow::with_default_capacity();
        let mut smoothed = 0.0;
        for _ in 0..9 {
            smoothed = window.push(30.0);
        }
        assert_eq!(window.len(), WINDOW_CAPACITY);
        assert_eq!(smoothed, 30.0);
    }

    #[test]
    fn test_single_spike_at_capacity() {
        let mut window = AngleWindow::with_default_capacity();
        let mut smoothed = 0.0;
        for angle in [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 90.0] {
            smoothed = window.push(angle);
        }
        assert_eq!(smoothed, 11.25);
    }

    #[test]
    fn test_evicts_oldest_first() {
        let mut window = AngleWindow::new(3).unwrap();
        for angle in [10.0, 20.0, 30.0, 40.0] {
            window.push(angle);
        }
        let samples: Vec<f32> = window.samples().collect();
        assert_eq!(samples, vec![20.0, 30.0, 40.0]);
        assert_eq!(window.mean(), Some(30.0));
    }

    #[test]
    fn test_empty_window_has_no_mean() {
        let window = AngleWindow::default();
        assert!(window.is_empty());
        assert_eq!(window.mean(), None);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(AngleWindow::new(0).unwrap_err(), WindowError::ZeroCapacity);
        assert!(AngleWindowSet::new(2, 0).is_err());
    }

    #[test]
    fn test_windows_are_independent() {
        let mut set = AngleWindowSet::new(2, WINDOW_CAPACITY).unwrap();
        set.push_all(&[90.0, 0.0]).unwrap();
        let smoothed = set.push_all(&[90.0, 10.0]).unwrap();
        assert_eq!(smoothed, vec![90.0, 5.0]);
        assert_eq!(set.get(0).unwrap().len(), 2);
    }

    #[test]
    fn test_length_mismatch_leaves_windows_untouched() {
        let mut set = AngleWindowSet::new(2, WINDOW_CAPACITY).unwrap();
        let err = set.push_all(&[10.0]).unwrap_err();
        assert_eq!(err, WindowError::LengthMismatch { expected: 2, actual: 1 });
        assert_eq!(set.means(), vec![None, None]);
    }

    proptest! {
        #[test]
        fn prop_len_never_exceeds_capacity(
            capacity in 1usize..16,
            angles in proptest::collection::vec(0.0f32..180.0, 0..64),
        ) {
            let mut window = AngleWindow::new(capacity).unwrap();
            for angle in angles {
                window.push(angle);
                prop_assert!(window.len() <= capacity);
            }
        }

        #[test]
        fn prop_mean_within_sample_range(
            angles in proptest::collection::vec(0.0f32..180.0, 1..32),
        ) {
            let mut window = AngleWindow::default();
            let mut smoothed = 0.0;
            for &angle in &angles {
                smoothed = window.push(angle);
            }
            let min = window.samples().fold(f32::MAX, f32::min);
            let max = window.samples().fold(f32::MIN, f32::max);
            prop_assert!(smoothed >= min - 1e-3 && smoothed <= max + 1e-3);
        }
    }
}
