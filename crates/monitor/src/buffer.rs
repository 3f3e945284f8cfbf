//! Point accumulation with an adaptive flush threshold.
//!
//! The buffer is exclusively owned by the batch daemon; nothing else reads
//! or writes it, which is what removes the need for a mutex. Threshold
//! accounting:
//!
//! - success: buffer already drained, threshold falls back to the base size
//! - failure: threshold grows by one base-size step, capped at the max;
//!   the undelivered points are restored unless they already reached the
//!   max, in which case they are discarded (bounded loss)

use contracts::MetricPoint;

/// Accumulated not-yet-flushed points plus the adaptive flush threshold
///
/// Invariant: `base_size <= threshold <= max_size`.
#[derive(Debug)]
pub struct PointBuffer {
    points: Vec<MetricPoint>,
    threshold: usize,
    base_size: usize,
    max_size: usize,
}

impl PointBuffer {
    /// Create a buffer
    ///
    /// Expects validated sizes (`1 <= base_size <= max_size`).
    pub fn new(base_size: usize, max_size: usize) -> Self {
        Self {
            points: Vec::new(),
            threshold: base_size,
            base_size,
            max_size,
        }
    }

    /// Append a point
    #[inline]
    pub fn push(&mut self, point: MetricPoint) {
        self.points.push(point);
    }

    /// Number of buffered points
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the buffer holds no points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Current flush threshold
    #[inline]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Whether the buffered count reached the current threshold
    #[inline]
    pub fn at_threshold(&self) -> bool {
        self.points.len() >= self.threshold
    }

    /// Take all buffered points for a flush attempt
    pub fn take(&mut self) -> Vec<MetricPoint> {
        std::mem::take(&mut self.points)
    }

    /// Account for a successful flush: threshold collapses to the base size
    pub fn record_success(&mut self) {
        self.threshold = self.base_size;
    }

    /// Account for a failed flush of the given (previously taken) points
    ///
    /// Grows the threshold by one base-size step, capped at `max_size`.
    /// Restores the points for the next attempt unless their count already
    /// reached `max_size`; in that case they are discarded and `true` is
    /// returned so the caller can log the loss event.
    pub fn record_failure(&mut self, points: Vec<MetricPoint>) -> bool {
        self.threshold = (self.threshold + self.base_size).min(self.max_size);

        if points.len() >= self.max_size {
            true
        } else {
            debug_assert!(self.points.is_empty());
            self.points = points;
            false
        }
    }
}
