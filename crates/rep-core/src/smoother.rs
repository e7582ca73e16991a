//! Per-joint exponential smoothing.
//!
//! Each joint keeps one smoothed value. The first sample seeds it
//! exactly; afterwards `smoothed += (raw - smoothed) / factor`.

use repsense_pose_model::{Joint, JointReadings};

/// Exponential smoother holding one state value per tracked joint.
#[derive(Debug, Clone)]
pub struct JointSmoother {
    factor: f64,
    values: [Option<f64>; Joint::COUNT],
}

impl JointSmoother {
    /// Create a smoother with the given divisor (`1.0` passes raw values through).
    pub fn new(factor: f64) -> Self {
        Self {
            factor: factor.max(1.0),
            values: [None; Joint::COUNT],
        }
    }

    /// Feed one raw sample and return the joint's smoothed value.
    ///
    /// A non-finite `raw` is treated as a missing reading: the joint keeps
    /// its current value, which is `None` if it was never seen.
    pub fn update(&mut self, joint: Joint, raw: f64) -> Option<f64> {
        let slot = &mut self.values[joint.index()];
        if !raw.is_finite() {
            tracing::trace!(%joint, raw, "non-finite sample held");
            return *slot;
        }
        let next = match *slot {
            None => raw,
            Some(prev) => prev + (raw - prev) / self.factor,
        };
        *slot = Some(next);
        Some(next)
    }

    /// Feed every usable reading of a frame. Missing joints hold their value.
    pub fn update_frame(&mut self, readings: &JointReadings) {
        for sample in readings.samples() {
            self.update(sample.joint, sample.y);
        }
    }

    /// Current smoothed value, or `None` if the joint was never seen.
    pub fn value(&self, joint: Joint) -> Option<f64> {
        self.values[joint.index()]
    }

    /// Smoothed values for all joints once every joint has been seen.
    pub fn snapshot(&self) -> Option<SmoothedPose> {
        Some(SmoothedPose {
            left_hip: self.value(Joint::LeftHip)?,
            right_hip: self.value(Joint::RightHip)?,
            left_knee: self.value(Joint::LeftKnee)?,
            right_knee: self.value(Joint::RightKnee)?,
            left_ankle: self.value(Joint::LeftAnkle)?,
            right_ankle: self.value(Joint::RightAnkle)?,
            top_head: self.value(Joint::TopHead)?,
        })
    }
}

/// Smoothed vertical coordinates of every joint for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedPose {
    pub left_hip: f64,
    pub right_hip: f64,
    pub left_knee: f64,
    pub right_knee: f64,
    pub left_ankle: f64,
    pub right_ankle: f64,
    pub top_head: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_seeds_exactly() {
        let mut smoother = JointSmoother::new(100.0);
        assert_eq!(smoother.update(Joint::LeftHip, 0.42), Some(0.42));
        assert_eq!(smoother.value(Joint::LeftHip), Some(0.42));
        assert_eq!(smoother.value(Joint::RightHip), None);
    }

    #[test]
    fn test_step_moves_one_hundredth() {
        let mut smoother = JointSmoother::new(100.0);
        smoother.update(Joint::TopHead, 0.0);
        let next = smoother.update(Joint::TopHead, 1.0).unwrap();
        assert!((next - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_factor_one_passes_through() {
        let mut smoother = JointSmoother::new(1.0);
        smoother.update(Joint::LeftKnee, 0.3);
        assert_eq!(smoother.update(Joint::LeftKnee, 0.7), Some(0.7));
    }

    #[test]
    fn test_non_finite_sample_holds_value() {
        let mut smoother = JointSmoother::new(100.0);
        assert_eq!(smoother.update(Joint::RightAnkle, f64::NAN), None);
        assert_eq!(smoother.value(Joint::RightAnkle), None);

        smoother.update(Joint::RightAnkle, 0.9);
        assert_eq!(smoother.update(Joint::RightAnkle, f64::NAN), Some(0.9));
        assert_eq!(smoother.update(Joint::RightAnkle, f64::INFINITY), Some(0.9));
        assert_eq!(smoother.value(Joint::RightAnkle), Some(0.9));
    }

    #[test]
    fn test_missing_joint_holds_previous_value() {
        let mut smoother = JointSmoother::new(100.0);
        let mut readings = JointReadings::default();
        readings.set(Joint::LeftKnee, 0.6);
        smoother.update_frame(&readings);

        readings.clear(Joint::LeftKnee);
        readings.set(Joint::RightKnee, 0.6);
        smoother.update_frame(&readings);

        assert_eq!(smoother.value(Joint::LeftKnee), Some(0.6));
        assert_eq!(smoother.value(Joint::RightKnee), Some(0.6));
    }

    #[test]
    fn test_snapshot_requires_every_joint() {
        let mut smoother = JointSmoother::new(100.0);
        for joint in Joint::ALL.into_iter().skip(1) {
            smoother.update(joint, 0.5);
        }
        assert!(smoother.snapshot().is_none());
        smoother.update(Joint::LeftHip, 0.5);
        assert!(smoother.snapshot().is_some());
    }
}
