//! Tracked joints and per-frame vertical readings.

use serde::{Deserialize, Serialize};

/// A body joint whose vertical coordinate is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    TopHead,
}

impl Joint {
    /// Number of tracked joints.
    pub const COUNT: usize = 7;

    /// All joints, in index order.
    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
        Joint::TopHead,
    ];

    /// Stable slot index for per-joint arrays.
    pub fn index(self) -> usize {
        match self {
            Joint::LeftHip => 0,
            Joint::RightHip => 1,
            Joint::LeftKnee => 2,
            Joint::RightKnee => 3,
            Joint::LeftAnkle => 4,
            Joint::RightAnkle => 5,
            Joint::TopHead => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Joint::LeftHip => "left_hip",
            Joint::RightHip => "right_hip",
            Joint::LeftKnee => "left_knee",
            Joint::RightKnee => "right_knee",
            Joint::LeftAnkle => "left_ankle",
            Joint::RightAnkle => "right_ankle",
            Joint::TopHead => "top_head",
        }
    }
}

impl std::fmt::Display for Joint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single joint's vertical coordinate for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointSample {
    pub joint: Joint,
    pub y: f64,
}

/// Vertical readings for every joint in one frame.
///
/// A joint that was occluded or not reported is `None`. Readings are
/// never defaulted to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointReadings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_hip: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_hip: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_knee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_knee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_ankle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_ankle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_head: Option<f64>,
}

impl JointReadings {
    fn slot(&self, joint: Joint) -> &Option<f64> {
        match joint {
            Joint::LeftHip => &self.left_hip,
            Joint::RightHip => &self.right_hip,
            Joint::LeftKnee => &self.left_knee,
            Joint::RightKnee => &self.right_knee,
            Joint::LeftAnkle => &self.left_ankle,
            Joint::RightAnkle => &self.right_ankle,
            Joint::TopHead => &self.top_head,
        }
    }

    fn slot_mut(&mut self, joint: Joint) -> &mut Option<f64> {
        match joint {
            Joint::LeftHip => &mut self.left_hip,
            Joint::RightHip => &mut self.right_hip,
            Joint::LeftKnee => &mut self.left_knee,
            Joint::RightKnee => &mut self.right_knee,
            Joint::LeftAnkle => &mut self.left_ankle,
            Joint::RightAnkle => &mut self.right_ankle,
            Joint::TopHead => &mut self.top_head,
        }
    }

    /// Usable reading for a joint. Non-finite values count as absent.
    pub fn get(&self, joint: Joint) -> Option<f64> {
        self.slot(joint).filter(|y| y.is_finite())
    }

    pub fn set(&mut self, joint: Joint, y: f64) {
        *self.slot_mut(joint) = Some(y);
    }

    pub fn clear(&mut self, joint: Joint) {
        *self.slot_mut(joint) = None;
    }

    /// Iterate over the usable samples in this frame.
    pub fn samples(&self) -> impl Iterator<Item = JointSample> + '_ {
        Joint::ALL
            .into_iter()
            .filter_map(|joint| self.get(joint).map(|y| JointSample { joint, y }))
    }

    /// Joints with no usable reading this frame.
    pub fn missing(&self) -> Vec<Joint> {
        Joint::ALL
            .into_iter()
            .filter(|joint| self.get(*joint).is_none())
            .collect()
    }

    /// First joint whose reading is present but not finite.
    pub fn first_non_finite(&self) -> Option<Joint> {
        Joint::ALL
            .into_iter()
            .find(|joint| matches!(self.slot(*joint), Some(y) if !y.is_finite()))
    }

    pub fn is_complete(&self) -> bool {
        Joint::ALL.into_iter().all(|joint| self.get(joint).is_some())
    }

    /// Multiply every present reading by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        let mut out = Self::default();
        for joint in Joint::ALL {
            if let Some(y) = *self.slot(joint) {
                out.set(joint, y * factor);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_unique_and_ordered() {
        for (i, joint) in Joint::ALL.iter().enumerate() {
            assert_eq!(joint.index(), i);
        }
    }

    #[test]
    fn test_non_finite_reading_is_absent() {
        let mut readings = JointReadings::default();
        readings.set(Joint::LeftHip, f64::NAN);
        readings.set(Joint::RightHip, 0.4);
        assert_eq!(readings.get(Joint::LeftHip), None);
        assert_eq!(readings.get(Joint::RightHip), Some(0.4));
        assert!(readings.missing().contains(&Joint::LeftHip));
        assert!(!readings.is_complete());
    }

    #[test]
    fn test_first_non_finite_ignores_absent_joints() {
        let mut readings = JointReadings::default();
        assert_eq!(readings.first_non_finite(), None);
        readings.set(Joint::RightKnee, f64::INFINITY);
        readings.set(Joint::TopHead, f64::NAN);
        assert_eq!(readings.first_non_finite(), Some(Joint::RightKnee));
    }

    #[test]
    fn test_absent_joints_are_omitted_from_json() {
        let mut readings = JointReadings::default();
        readings.set(Joint::TopHead, 0.1);
        let json = serde_json::to_string(&readings).unwrap();
        assert_eq!(json, r#"{"top_head":0.1}"#);
    }

    #[test]
    fn test_samples_skip_missing() {
        let mut readings = JointReadings::default();
        readings.set(Joint::LeftKnee, 0.6);
        readings.set(Joint::TopHead, 0.1);
        let joints: Vec<Joint> = readings.samples().map(|s| s.joint).collect();
        assert_eq!(joints, vec![Joint::LeftKnee, Joint::TopHead]);
    }

    #[test]
    fn test_display_uses_wire_name() {
        assert_eq!(Joint::RightAnkle.to_string(), "right_ankle");
        let json = serde_json::to_string(&Joint::RightAnkle).unwrap();
        assert_eq!(json, "\"right_ankle\"");
    }
}
