//! Streaming mean/variance accumulation (Welford's algorithm).
//!
//! The naive single-pass sum-of-squares formula loses catastrophic
//! precision when the mean is large relative to the spread; Welford's
//! update keeps the error bounded, and its merge form allows partitions
//! to be accumulated independently and combined later.

/// Accumulates count, mean and the sum of squared deviations (`m2`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Welford {
    count: u64,
    mean: f64,
    m2: f64,
}

impl Welford {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one observation into the accumulator.
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    /// Combines two independently accumulated partitions (Chan et al.).
    pub fn merge(&mut self, other: &Welford) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let combined = self.count + other.count;
        let delta = other.mean - self.mean;
        self.mean += delta * other.count as f64 / combined as f64;
        self.m2 += other.m2
            + delta * delta * self.count as f64 * other.count as f64 / combined as f64;
        self.count = combined;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Arithmetic mean; NaN when nothing has been accumulated.
    pub fn mean(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.mean }
    }

    /// Sample standard deviation (n − 1 divisor).
    ///
    /// `None` below two observations — undefined, and deliberately
    /// distinguishable from a computed zero.
    pub fn sample_stddev(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        Some((self.m2 / (self.count - 1) as f64).sqrt())
    }
}
