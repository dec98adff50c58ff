/// The `armtrack-core` library implements a differential inverse-kinematics
/// solver for a planar serial chain of rigid links. Each tick the solver
/// nudges the chain tip a fixed distance toward a moving target point by
/// mapping the Cartesian error through the Moore-Penrose pseudo-inverse of
/// the chain Jacobian.
///
/// The library is synchronous and runtime-free. A rendering or simulation
/// collaborator drives it by calling [`tracker::Tracker::step`] once per
/// frame and reading the joint state back for display.
pub mod algorithm;
pub mod chain;
pub mod target;
pub mod tracker;

#[macro_use]
extern crate log;

mod config;

pub use self::config::*;

pub use nalgebra;
pub use rand;

/// Solver design constants.
pub mod consts {
    /// Armtrack library version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Fixed Cartesian step magnitude per tick, in workspace units.
    ///
    /// Tracking speed is constant, not proportional to the remaining
    /// distance to the target.
    pub const STEP_SIZE: f64 = 0.01;

    /// Tip-to-target distance below which the target counts as reached.
    pub const CONVERGENCE_EPSILON: f64 = 0.1;

    /// Determinant threshold below which `J·Jᵗ` is treated as singular.
    pub const DET_EPSILON: f64 = 2.0e-5;

    /// Minimum radius for regenerated targets, clear of the base.
    pub const TARGET_RADIUS_MIN: f64 = 2.0;

    /// Margin below full reach for regenerated targets, clear of the
    /// full-extension singularity.
    pub const TARGET_REACH_MARGIN: f64 = 3.0;
}
