use nalgebra::{Point2, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::consts;

/// Owns the tracking target and the randomness used to renew it.
///
/// The random source is held by value and seedable, so convergence
/// scenarios can be replayed deterministically in tests.
pub struct TargetController {
    target: Point2<f64>,
    rng: StdRng,
}

impl TargetController {
    /// Construct with an entropy-seeded random source and an initial
    /// target inside the reachable annulus.
    pub fn new(reach: f64) -> Self {
        Self::from_rng(reach, StdRng::from_entropy())
    }

    /// Construct with a fixed seed for reproducible target sequences.
    pub fn with_seed(reach: f64, seed: u64) -> Self {
        Self::from_rng(reach, StdRng::seed_from_u64(seed))
    }

    fn from_rng(reach: f64, rng: StdRng) -> Self {
        let mut controller = Self {
            target: Point2::origin(),
            rng,
        };
        controller.regenerate(reach);
        controller
    }

    #[inline]
    pub fn position(&self) -> Point2<f64> {
        self.target
    }

    /// Pin the target to a fixed point.
    pub fn set(&mut self, target: Point2<f64>) {
        self.target = target;
    }

    /// Remaining tip-to-target displacement.
    pub fn error(&self, tip: Point2<f64>) -> Vector2<f64> {
        self.target - tip
    }

    /// Whether the tip is within the convergence threshold of the target.
    pub fn has_converged(&self, tip: Point2<f64>) -> bool {
        self.error(tip).norm() < consts::CONVERGENCE_EPSILON
    }

    /// Draw a new target, uniform in angle and in radius over the
    /// reachable annulus, clear of the base and of full extension.
    pub fn regenerate(&mut self, reach: f64) {
        let radius_max = reach - consts::TARGET_REACH_MARGIN;
        debug_assert!(radius_max > consts::TARGET_RADIUS_MIN);

        let angle = self.rng.gen_range(0.0..std::f64::consts::TAU);
        let radius = self.rng.gen_range(consts::TARGET_RADIUS_MIN..radius_max);

        self.target = Point2::new(radius * angle.cos(), radius * angle.sin());

        debug!(
            "New target X {:>+5.2} Y {:>+5.2}",
            self.target.x, self.target.y
        );
    }
}
