use nalgebra::{DVector, Matrix2, Matrix2xX, MatrixXx2, Vector2};

use crate::consts;

/// Angle increments produced by a single solve.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Per-joint angle increment, in radians.
    pub increment: DVector<f64>,
    /// Whether the fallback increment was used.
    pub singular: bool,
}

/// Moore-Penrose right pseudo-inverse solver with fallback memory.
///
/// The solver retains the most recent regular increment. On a singular
/// tick the stored increment is reused unchanged so the chain keeps
/// moving along its last known direction instead of freezing. Before the
/// first regular solve the stored increment is the zero vector.
pub struct PseudoInverse {
    last_increment: DVector<f64>,
}

impl PseudoInverse {
    /// Construct the solver for a chain of `dof` joints.
    pub fn new(dof: usize) -> Self {
        Self {
            last_increment: DVector::zeros(dof),
        }
    }

    /// Right pseudo-inverse `Jᵗ·(J·Jᵗ)⁻¹` of a 2×N Jacobian.
    ///
    /// Returns `None` when `J·Jᵗ` is singular. The Gram determinant is
    /// non-negative, so a one-sided epsilon test suffices.
    pub fn pseudo_inverse(jacobian: &Matrix2xX<f64>) -> Option<MatrixXx2<f64>> {
        let gram = jacobian * jacobian.transpose();
        let det = gram[(0, 0)] * gram[(1, 1)] - gram[(0, 1)] * gram[(1, 0)];

        if det < consts::DET_EPSILON {
            return None;
        }

        let inverse = Matrix2::new(
            gram[(1, 1)] / det,
            -gram[(0, 1)] / det,
            -gram[(1, 0)] / det,
            gram[(0, 0)] / det,
        );

        Some(jacobian.transpose() * inverse)
    }

    /// Map a desired tip displacement to joint-angle increments.
    ///
    /// A regular solve stores its increment as the new fallback. A
    /// singular solve returns the stored increment unchanged.
    pub fn solve(&mut self, jacobian: &Matrix2xX<f64>, displacement: Vector2<f64>) -> Solution {
        match Self::pseudo_inverse(jacobian) {
            Some(pseudo_inverse) => {
                let increment = pseudo_inverse * displacement;
                self.last_increment = increment.clone();

                Solution {
                    increment,
                    singular: false,
                }
            }
            None => {
                warn!("Jacobian is rank deficient, reusing last increment");

                Solution {
                    increment: self.last_increment.clone(),
                    singular: true,
                }
            }
        }
    }
}
