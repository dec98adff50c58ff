use serde::{Deserialize, Serialize};

/// Single revolute joint in the planar chain.
///
/// The length is fixed at construction. The angle is expressed relative
/// to the cumulative orientation of all preceding joints, so the absolute
/// orientation of link `k` is the sum of the first `k` joint angles.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Joint {
    length: f64,
    angle: f64,
}

impl Joint {
    pub fn new(length: f64, angle: f64) -> Self {
        debug_assert!(length.is_finite() && length > 0.0);
        debug_assert!(angle.is_finite());

        Self { length, angle }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }
}

/// Open serial linkage anchored at the origin.
///
/// The chain is a flat indexed sequence of joints. Branching is a
/// rendering concern and never enters the kinematic model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chain {
    joints: Vec<Joint>,
}

impl Chain {
    /// Construct a chain from link lengths, all angles at zero.
    pub fn new(lengths: &[f64]) -> Self {
        assert!(!lengths.is_empty(), "chain needs at least one joint");

        Self {
            joints: lengths.iter().map(|&length| Joint::new(length, 0.0)).collect(),
        }
    }

    /// Construct a chain in a given pose.
    pub fn with_pose(lengths: &[f64], angles: &[f64]) -> Self {
        let mut chain = Self::new(lengths);
        chain.set_angles(angles);
        chain
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    #[inline]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn lengths(&self) -> Vec<f64> {
        self.joints.iter().map(|joint| joint.length()).collect()
    }

    pub fn angles(&self) -> Vec<f64> {
        self.joints.iter().map(|joint| joint.angle()).collect()
    }

    /// Overwrite the full pose at once.
    pub fn set_angles(&mut self, angles: &[f64]) {
        assert_eq!(angles.len(), self.joints.len());

        for (joint, &angle) in self.joints.iter_mut().zip(angles) {
            debug_assert!(angle.is_finite());
            joint.angle = angle;
        }
    }

    /// Total reach of the chain from base to tip at full extension.
    pub fn reach(&self) -> f64 {
        self.joints.iter().map(|joint| joint.length()).sum()
    }

    /// Add a delta to the angle of joint `index`.
    ///
    /// Angles are not wrapped or normalized; the trigonometric formulas
    /// are periodic so unbounded growth is harmless.
    pub fn apply_increment(&mut self, index: usize, delta: f64) {
        debug_assert!(delta.is_finite());

        self.joints[index].angle += delta;
    }
}
