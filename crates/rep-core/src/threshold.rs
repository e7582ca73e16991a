//! Adaptive squat-depth threshold.
//!
//! Keeps a small buffer of the largest recent hip-knee gaps. Once the
//! buffer is full, each new gap replaces the outlier farthest from the
//! buffer median, or the minimum when there is no outlier. The threshold
//! is the buffer average minus a margin, falling back to a fixed default
//! whenever that estimate is empty, non-finite, or out of range.
//!
//! Ties always resolve to the lowest buffer index.

use repsense_common::config::{DetectorConfig, OutlierFence};

/// What a single `observe` call did to the buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    /// The buffer was not yet full; the sample was appended at `index`.
    Appended { index: usize },
    /// The outlier at `index` was replaced.
    ReplacedOutlier { index: usize, previous: f64 },
    /// No outlier existed; the minimum at `index` was replaced.
    ReplacedMinimum { index: usize, previous: f64 },
    /// The sample was not finite and was ignored.
    Ignored,
}

/// Running estimate of the user's full-squat depth.
#[derive(Debug, Clone)]
pub struct AdaptiveThreshold {
    samples: Vec<f64>,
    capacity: usize,
    default_threshold: f64,
    margin: f64,
    fallback_low: f64,
    fallback_high: f64,
    tukey_multiplier: f64,
    sample_decimals: u32,
    fence: OutlierFence,
}

impl AdaptiveThreshold {
    pub fn new(config: &DetectorConfig) -> Self {
        let (fallback_low, fallback_high) = config.fallback_range();
        let capacity = config.buffer_capacity.max(1);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            default_threshold: config.default_threshold,
            margin: config.margin,
            fallback_low,
            fallback_high,
            tukey_multiplier: config.tukey_multiplier,
            sample_decimals: config.sample_decimals,
            fence: config.outlier_fence,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&DetectorConfig::default())
    }

    /// Record one hip-knee gap.
    pub fn observe(&mut self, gap: f64) -> Observation {
        let value = round_to(gap, self.sample_decimals);
        if !value.is_finite() {
            return Observation::Ignored;
        }

        if self.samples.len() < self.capacity {
            self.samples.push(value);
            return Observation::Appended {
                index: self.samples.len() - 1,
            };
        }

        let observation = match self.farthest_outlier() {
            Some(index) => Observation::ReplacedOutlier {
                index,
                previous: self.samples[index],
            },
            None => {
                let index = self.min_index();
                Observation::ReplacedMinimum {
                    index,
                    previous: self.samples[index],
                }
            }
        };

        if let Observation::ReplacedOutlier { index, previous }
        | Observation::ReplacedMinimum { index, previous } = observation
        {
            tracing::trace!(index, previous, value, "top-range sample replaced");
            self.samples[index] = value;
        }
        observation
    }

    /// Threshold the current frame's ratio is compared against.
    pub fn current_threshold(&self) -> f64 {
        self.estimate()
            .filter(|t| t.is_finite() && *t >= self.fallback_low && *t <= self.fallback_high)
            .unwrap_or(self.default_threshold)
    }

    /// Raw `average - margin`, before any fallback. `None` when empty.
    pub fn estimate(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().sum();
        Some(sum / self.samples.len() as f64 - self.margin)
    }

    /// Whether `current_threshold` is currently the fallback default.
    pub fn is_fallback(&self) -> bool {
        self.estimate() != Some(self.current_threshold())
    }

    /// Buffered samples in insertion-slot order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn sorted(&self) -> Vec<f64> {
        let mut sorted = self.samples.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }

    /// `(lower, upper)` bounds outside which a buffered sample is an outlier.
    fn fence_bounds(&self, sorted: &[f64]) -> (f64, f64) {
        let n = sorted.len();
        let k = self.tukey_multiplier;
        let (low, high) = match self.fence {
            OutlierFence::Interquartile => (sorted[n / 4], sorted[(3 * n) / 4]),
            OutlierFence::FullRange => (sorted[0], sorted[n - 1]),
        };
        let spread = high - low;
        (low - k * spread, high + k * spread)
    }

    /// Index of the outlier farthest from the median, first on ties.
    fn farthest_outlier(&self) -> Option<usize> {
        let sorted = self.sorted();
        let median = sorted[sorted.len() / 2];
        let (lower, upper) = self.fence_bounds(&sorted);

        let mut best: Option<(usize, f64)> = None;
        for (index, &value) in self.samples.iter().enumerate() {
            if value >= lower && value <= upper {
                continue;
            }
            let distance = (value - median).abs();
            match best {
                Some((_, best_distance)) if distance <= best_distance => {}
                _ => best = Some((index, distance)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Index of the first occurrence of the minimum.
    fn min_index(&self) -> usize {
        let mut index = 0;
        for (i, &value) in self.samples.iter().enumerate().skip(1) {
            if value < self.samples[index] {
                index = i;
            }
        }
        index
    }
}

impl Default for AdaptiveThreshold {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Round to a fixed number of decimal places.
fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_with(config: &DetectorConfig, values: &[f64]) -> AdaptiveThreshold {
        let mut estimator = AdaptiveThreshold::new(config);
        for &v in values {
            estimator.observe(v);
        }
        estimator
    }

    fn filled(values: &[f64]) -> AdaptiveThreshold {
        filled_with(&DetectorConfig::default(), values)
    }

    fn filled_interquartile(values: &[f64]) -> AdaptiveThreshold {
        let config = DetectorConfig {
            outlier_fence: OutlierFence::Interquartile,
            ..Default::default()
        };
        filled_with(&config, values)
    }

    #[test]
    fn test_empty_buffer_uses_default() {
        let estimator = AdaptiveThreshold::with_defaults();
        assert_eq!(estimator.current_threshold(), 0.15);
        assert_eq!(estimator.estimate(), None);
        assert!(estimator.is_fallback());
    }

    #[test]
    fn test_average_minus_margin() {
        let estimator = filled(&[0.2]);
        assert!((estimator.current_threshold() - 0.185).abs() < 1e-12);
        assert!(!estimator.is_fallback());
    }

    #[test]
    fn test_out_of_range_estimate_falls_back() {
        assert_eq!(filled(&[0.5]).current_threshold(), 0.15);
        assert_eq!(filled(&[0.05]).current_threshold(), 0.15);
        assert_eq!(filled(&[0.3, 0.3]).current_threshold(), 0.15);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let config = DetectorConfig {
            margin: 0.0,
            ..Default::default()
        };
        let mut estimator = AdaptiveThreshold::new(&config);
        estimator.observe(0.25);
        assert!((estimator.current_threshold() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_samples_are_rounded_to_four_places() {
        let estimator = filled(&[0.123456, 0.00004]);
        assert_eq!(estimator.samples(), &[0.1235, 0.0]);
    }

    #[test]
    fn test_non_finite_sample_is_ignored() {
        let mut estimator = AdaptiveThreshold::with_defaults();
        assert_eq!(estimator.observe(f64::NAN), Observation::Ignored);
        assert!(estimator.is_empty());
    }

    #[test]
    fn test_sample_that_overflows_when_rounded_is_ignored() {
        let mut estimator = AdaptiveThreshold::with_defaults();
        assert_eq!(estimator.observe(f64::MAX / 2.0), Observation::Ignored);
        assert!(estimator.is_empty());
        assert_eq!(estimator.current_threshold(), 0.15);
    }

    #[test]
    fn test_deeper_gaps_displace_standing_lead_in() {
        let mut estimator = filled(&[0.05; 10]);
        for _ in 0..9 {
            estimator.observe(0.25);
        }
        assert_eq!(estimator.samples().iter().filter(|&&v| v == 0.25).count(), 9);
        assert!(!estimator.is_fallback());
        assert!((estimator.current_threshold() - 0.215).abs() < 1e-9);
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let mut estimator = AdaptiveThreshold::with_defaults();
        for i in 0..25 {
            estimator.observe(i as f64 * 0.01);
            assert_eq!(estimator.len(), (i + 1).min(10));
        }
        assert!(estimator.is_full());
    }

    #[test]
    fn test_outlier_is_replaced_instead_of_minimum() {
        let mut estimator = filled_interquartile(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 10.0]);
        let observation = estimator.observe(1.05);
        assert_eq!(
            observation,
            Observation::ReplacedOutlier {
                index: 9,
                previous: 10.0
            }
        );
        assert_eq!(estimator.samples()[9], 1.05);
        assert!(!estimator.samples().contains(&10.0));
    }

    #[test]
    fn test_minimum_is_replaced_without_outliers() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        for mut estimator in [filled(&values), filled_interquartile(&values)] {
            let observation = estimator.observe(5.5);
            assert_eq!(
                observation,
                Observation::ReplacedMinimum {
                    index: 0,
                    previous: 1.0
                }
            );
            assert_eq!(estimator.samples()[0], 5.5);
        }
    }

    #[test]
    fn test_farthest_outlier_wins() {
        let mut estimator = filled_interquartile(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 3.0, 10.0]);
        estimator.observe(1.2);
        assert_eq!(estimator.samples()[8], 3.0);
        assert_eq!(estimator.samples()[9], 1.2);
    }

    #[test]
    fn test_equidistant_outliers_resolve_to_first_index() {
        let mut estimator = filled_interquartile(&[5.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, -3.0]);
        estimator.observe(1.1);
        assert_eq!(estimator.samples()[0], 1.1);
        assert_eq!(estimator.samples()[9], -3.0);
    }

    #[test]
    fn test_duplicate_minimum_resolves_to_first_index() {
        let mut estimator = filled(&[3.0, 2.0, 4.0, 2.0, 5.0, 6.0, 3.5, 4.5, 5.5, 2.5]);
        estimator.observe(4.0);
        assert_eq!(estimator.samples()[1], 4.0);
        assert_eq!(estimator.samples()[3], 2.0);
    }

    #[test]
    fn test_full_range_fence_always_replaces_minimum() {
        let mut estimator = filled(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 10.0]);
        let observation = estimator.observe(1.05);
        assert_eq!(
            observation,
            Observation::ReplacedMinimum {
                index: 0,
                previous: 1.0
            }
        );
        assert_eq!(estimator.samples()[9], 10.0);
    }

    #[test]
    fn test_custom_capacity() {
        let config = DetectorConfig {
            buffer_capacity: 3,
            ..Default::default()
        };
        let mut estimator = AdaptiveThreshold::new(&config);
        for v in [0.2, 0.21, 0.22, 0.23] {
            estimator.observe(v);
        }
        assert_eq!(estimator.samples(), &[0.23, 0.21, 0.22]);
    }
}
