use nalgebra::Point2;
use serde::Serialize;

use crate::algorithm::{fk, pinv::PseudoInverse};
use crate::chain::Chain;
use crate::consts;
use crate::target::TargetController;

/// Result of a single control step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StepOutcome {
    /// Regular update applied toward the target.
    Tracking,
    /// Target reached; a new target was generated, no update this tick.
    Converged,
    /// Singular configuration; the stored fallback increment was applied.
    Singular,
}

/// Serializable state record for telemetry.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    /// Joint angles, in radians.
    pub angles: Vec<f64>,
    /// Tip position.
    pub tip: (f64, f64),
    /// Current target position.
    pub target: (f64, f64),
    /// Singular ticks since construction.
    pub singular_ticks: u64,
}

/// Differential inverse-kinematics target tracker.
///
/// Owns the chain, the target, and the solver fallback memory. The
/// driving collaborator calls [`Tracker::step`] once per tick and reads
/// the joint state back for rendering. All mutation happens inside
/// `step`; there is no ambient global state.
pub struct Tracker {
    chain: Chain,
    target: TargetController,
    solver: PseudoInverse,
    singular_ticks: u64,
}

impl Tracker {
    /// Construct a tracker with an entropy-seeded target source.
    pub fn new(lengths: &[f64]) -> Self {
        let chain = Chain::new(lengths);
        let target = TargetController::new(chain.reach());

        Self::assemble(chain, target)
    }

    /// Construct a tracker with a fixed seed for reproducible runs.
    pub fn with_seed(lengths: &[f64], seed: u64) -> Self {
        let chain = Chain::new(lengths);
        let target = TargetController::with_seed(chain.reach(), seed);

        Self::assemble(chain, target)
    }

    fn assemble(chain: Chain, target: TargetController) -> Self {
        let dof = chain.len();

        Self {
            chain,
            target,
            solver: PseudoInverse::new(dof),
            singular_ticks: 0,
        }
    }

    #[inline]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    #[inline]
    pub fn chain_mut(&mut self) -> &mut Chain {
        &mut self.chain
    }

    /// Joint angles in base-to-tip order, in radians.
    pub fn joint_angles(&self) -> Vec<f64> {
        self.chain.angles()
    }

    /// Joint lengths in base-to-tip order. Static over the lifetime of
    /// the tracker.
    pub fn joint_lengths(&self) -> Vec<f64> {
        self.chain.lengths()
    }

    #[inline]
    pub fn target_position(&self) -> Point2<f64> {
        self.target.position()
    }

    /// Pin the target to a fixed point.
    pub fn set_target(&mut self, target: Point2<f64>) {
        self.target.set(target);
    }

    pub fn tip_position(&self) -> Point2<f64> {
        fk::tip_position(&self.chain)
    }

    /// Singular ticks observed since construction. Diagnostic only.
    #[inline]
    pub fn singular_ticks(&self) -> u64 {
        self.singular_ticks
    }

    pub fn snapshot(&self) -> Snapshot {
        let tip = self.tip_position();
        let target = self.target_position();

        Snapshot {
            angles: self.joint_angles(),
            tip: (tip.x, tip.y),
            target: (target.x, target.y),
            singular_ticks: self.singular_ticks,
        }
    }

    /// Advance the simulation by one tick.
    ///
    /// On convergence the target is regenerated and no angle update is
    /// applied this tick. Otherwise the tip error is normalized to the
    /// fixed step magnitude and mapped through the pseudo-inverse to
    /// per-joint increments. A singular configuration applies the stored
    /// fallback increment and is reported, never fatal.
    pub fn step(&mut self) -> StepOutcome {
        let tip = fk::tip_position(&self.chain);

        if self.target.has_converged(tip) {
            debug!("Target reached at X {:>+5.2} Y {:>+5.2}", tip.x, tip.y);
            self.target.regenerate(self.chain.reach());

            return StepOutcome::Converged;
        }

        let error = self.target.error(tip);
        let displacement = error * (consts::STEP_SIZE / error.norm());

        let jacobian = fk::jacobian(&self.chain);
        let solution = self.solver.solve(&jacobian, displacement);

        for (index, delta) in solution.increment.iter().enumerate() {
            self.chain.apply_increment(index, *delta);
        }

        if solution.singular {
            self.singular_ticks += 1;
            StepOutcome::Singular
        } else {
            StepOutcome::Tracking
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_converges_to_pinned_target() {
        let mut tracker = Tracker::with_seed(&[25.0, 20.0, 15.0, 10.0], 42);
        tracker.chain_mut().set_angles(&[-FRAC_PI_4; 4]);
        tracker.set_target(Point2::new(15.0, 10.0));

        let target = tracker.target_position();
        let mut distance = (target - tracker.tip_position()).norm();
        let mut converged = false;

        for _ in 0..10_000 {
            if tracker.step() == StepOutcome::Converged {
                converged = true;
                break;
            }

            let next = (target - tracker.tip_position()).norm();
            // Quasi-constant-speed tracking: the distance shrinks by about
            // the step size each tick, within linearization slack.
            assert!(next < distance + 1e-3);
            distance = next;
        }

        assert!(converged);
        assert!(distance < consts::CONVERGENCE_EPSILON);
    }

    #[test]
    fn test_cold_start_singular_tick_keeps_pose() {
        // Fully extended chain along the x axis: rank-deficient Jacobian
        // before any regular solve has primed the fallback.
        let mut tracker = Tracker::with_seed(&[25.0, 20.0, 15.0, 10.0], 8);

        let outcome = tracker.step();

        assert_eq!(outcome, StepOutcome::Singular);
        assert_eq!(tracker.singular_ticks(), 1);
        assert_eq!(tracker.joint_angles(), vec![0.0; 4]);
    }

    #[test]
    fn test_singular_tick_replays_last_increment() {
        let mut tracker = Tracker::with_seed(&[25.0, 20.0, 15.0, 10.0], 8);
        tracker.chain_mut().set_angles(&[0.3, -0.7, 0.5, 0.2]);

        let before = tracker.joint_angles();
        assert_eq!(tracker.step(), StepOutcome::Tracking);

        let increment: Vec<f64> = tracker
            .joint_angles()
            .iter()
            .zip(&before)
            .map(|(after, before)| after - before)
            .collect();

        // Collapse the chain to a line; the solver must replay the
        // increment from the regular tick above, unchanged.
        tracker.chain_mut().set_angles(&[0.0; 4]);
        assert_eq!(tracker.step(), StepOutcome::Singular);

        let angles = tracker.joint_angles();
        for (angle, delta) in angles.iter().zip(&increment) {
            assert!((angle - delta).abs() < 1e-12);
        }
    }

    #[test]
    fn test_converged_tick_regenerates_without_update() {
        let mut tracker = Tracker::with_seed(&[25.0, 20.0, 15.0, 10.0], 5);
        tracker.chain_mut().set_angles(&[0.3, -0.7, 0.5, 0.2]);

        let tip = tracker.tip_position();
        tracker.set_target(Point2::new(tip.x + 0.01, tip.y));

        let before = tracker.joint_angles();
        assert_eq!(tracker.step(), StepOutcome::Converged);

        // Pose untouched, target replaced.
        assert_eq!(tracker.joint_angles(), before);
        assert_ne!(tracker.target_position(), Point2::new(tip.x + 0.01, tip.y));
    }
}
