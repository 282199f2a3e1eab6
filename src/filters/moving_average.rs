use std::collections::VecDeque;

use super::Sample;
use crate::{Error, Result};

/// Moving average filter with ring-buffer eviction
///
/// Every retained sample is weighted equally; once `window_size` samples are
/// held, each push evicts the oldest one.
#[derive(Debug, Clone)]
pub struct MovingAverage<T: Sample> {
    window_size: usize,
    buffer: VecDeque<T>,
}

impl<T: Sample> MovingAverage<T> {
    /// Create a filter holding at most `window_size` samples
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        }
    }

    /// Fallible constructor for sizes coming from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if `window_size` is zero
    pub fn try_new(window_size: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(Error::InvalidInput(
                "Moving average window size must be greater than 0".to_string(),
            ));
        }
        Ok(Self::new(window_size))
    }

    /// Append a sample, evicting the oldest when full
    pub fn push(&mut self, sample: T) {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(sample);
    }

    /// Unweighted mean of the retained samples, `None` when empty
    #[allow(clippy::cast_precision_loss)] // window sizes are tiny
    pub fn mean(&self) -> Option<T> {
        if self.buffer.is_empty() {
            return None;
        }
        let sum = self.buffer.iter().fold(T::zero(), |acc, &s| acc.add(s));
        Some(sum.div_by(self.buffer.len() as f64))
    }

    /// Push a sample and return the updated mean
    pub fn apply(&mut self, sample: T) -> T {
        self.push(sample);
        // The buffer holds at least the sample just pushed.
        self.mean().unwrap_or(sample)
    }

    /// Most recently pushed sample
    pub fn latest(&self) -> Option<T> {
        self.buffer.back().copied()
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether no sample has been retained
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Maximum number of retained samples
    pub const fn window_size(&self) -> usize {
        self.window_size
    }

    /// Drop every retained sample
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}
