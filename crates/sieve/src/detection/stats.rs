//! Streaming mean and standard deviation.

/// Welford accumulator over a column's numeric values.
#[derive(Debug, Clone, Default)]
pub struct StreamingStats {
    count: usize,
    mean: f64,
    // Sum of squared differences from the mean
    m2: f64,
}

impl StreamingStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value.
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance (n - 1 denominator). Zero below two values.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Sample standard deviation.
    pub fn std(&self) -> f64 {
        self.variance().sqrt()
    }
}

impl FromIterator<f64> for StreamingStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        for value in iter {
            stats.add(value);
        }
        stats
    }
}
