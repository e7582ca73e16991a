//! Hip-knee gap, head-ankle span, and their ratio.

use crate::smoother::SmoothedPose;

/// Per-frame scalar signals derived from the smoothed pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    /// `avg(knees) - avg(hips)`; grows as the hips drop toward the knees.
    pub hip_knee_gap: f64,
    /// `avg(ankles) - head`; body height proxy used to normalize scale.
    pub head_ankle_span: f64,
}

impl DerivedMetrics {
    pub fn new(hip_knee_gap: f64, head_ankle_span: f64) -> Self {
        Self {
            hip_knee_gap,
            head_ankle_span,
        }
    }

    pub fn from_pose(pose: &SmoothedPose) -> Self {
        let hip_avg = (pose.left_hip + pose.right_hip) / 2.0;
        let knee_avg = (pose.left_knee + pose.right_knee) / 2.0;
        let ankle_avg = (pose.left_ankle + pose.right_ankle) / 2.0;
        Self {
            hip_knee_gap: knee_avg - hip_avg,
            head_ankle_span: ankle_avg - pose.top_head,
        }
    }

    /// `gap / span`, or `None` when the span is non-positive or the
    /// result is not finite.
    pub fn ratio(&self) -> Option<f64> {
        if self.head_ankle_span.is_nan() || self.head_ankle_span <= 0.0 {
            return None;
        }
        let ratio = self.hip_knee_gap / self.head_ankle_span;
        ratio.is_finite().then_some(ratio)
    }

    /// The gap, if it is usable as an estimator sample.
    pub fn usable_gap(&self) -> Option<f64> {
        self.hip_knee_gap.is_finite().then_some(self.hip_knee_gap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(head: f64, hip: f64, knee: f64, ankle: f64) -> SmoothedPose {
        SmoothedPose {
            left_hip: hip,
            right_hip: hip,
            left_knee: knee,
            right_knee: knee,
            left_ankle: ankle,
            right_ankle: ankle,
            top_head: head,
        }
    }

    #[test]
    fn test_averages_left_and_right() {
        let pose = SmoothedPose {
            left_hip: 0.4,
            right_hip: 0.6,
            left_knee: 0.7,
            right_knee: 0.9,
            left_ankle: 1.0,
            right_ankle: 1.2,
            top_head: 0.1,
        };
        let metrics = DerivedMetrics::from_pose(&pose);
        assert!((metrics.hip_knee_gap - 0.3).abs() < 1e-12);
        assert!((metrics.head_ankle_span - 1.0).abs() < 1e-12);
        assert!((metrics.ratio().unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_zero_span_has_no_ratio() {
        let metrics = DerivedMetrics::from_pose(&pose(0.5, 0.4, 0.6, 0.5));
        assert_eq!(metrics.ratio(), None);
        assert!(metrics.usable_gap().is_some());
    }

    #[test]
    fn test_negative_span_has_no_ratio() {
        let metrics = DerivedMetrics::new(0.2, -0.8);
        assert_eq!(metrics.ratio(), None);
    }

    #[test]
    fn test_nan_span_has_no_ratio() {
        let metrics = DerivedMetrics::new(0.2, f64::NAN);
        assert_eq!(metrics.ratio(), None);
    }

    #[test]
    fn test_non_finite_gap_is_unusable() {
        let metrics = DerivedMetrics::new(f64::INFINITY, 1.0);
        assert_eq!(metrics.ratio(), None);
        assert_eq!(metrics.usable_gap(), None);
    }
}
