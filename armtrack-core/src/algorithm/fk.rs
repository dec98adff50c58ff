use nalgebra::{Matrix2xX, Point2};

use crate::chain::Chain;

/// Tip position of the chain, base at the origin.
///
/// With cumulative orientation `Θ_k = a_1 + … + a_k` the tip is
/// `x = Σ length_k·cos(Θ_k)`, `y = Σ length_k·sin(Θ_k)`.
pub fn tip_position(chain: &Chain) -> Point2<f64> {
    let mut theta = 0.0;
    let mut x = 0.0;
    let mut y = 0.0;

    for joint in chain.joints() {
        theta += joint.angle();
        x += joint.length() * theta.cos();
        y += joint.length() * theta.sin();
    }

    Point2::new(x, y)
}

/// 2×N Jacobian of the tip position with respect to each joint angle.
///
/// Joint `i` moves every link at or beyond `i`, so its partials sum the
/// sine and cosine terms of links `i..N`. Accumulated back to front: the
/// column for joint `i` extends the column for joint `i + 1` by the
/// `i`-th term, with independent accumulators for the sine and cosine
/// rows.
pub fn jacobian(chain: &Chain) -> Matrix2xX<f64> {
    let joints = chain.joints();

    let mut theta = 0.0;
    let orientations: Vec<f64> = joints
        .iter()
        .map(|joint| {
            theta += joint.angle();
            theta
        })
        .collect();

    let mut jacobian = Matrix2xX::zeros(joints.len());
    let mut dx = 0.0;
    let mut dy = 0.0;

    for i in (0..joints.len()).rev() {
        dx -= joints[i].length() * orientations[i].sin();
        dy += joints[i].length() * orientations[i].cos();

        jacobian[(0, i)] = dx;
        jacobian[(1, i)] = dy;
    }

    jacobian
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::FRAC_PI_4;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_tip_position_closed_form() {
        let chain = Chain::with_pose(&[25.0, 20.0, 15.0, 10.0], &[-FRAC_PI_4; 4]);

        let thetas = [-FRAC_PI_4, -2.0 * FRAC_PI_4, -3.0 * FRAC_PI_4, -4.0 * FRAC_PI_4];
        let expected_x = 25.0 * thetas[0].cos()
            + 20.0 * thetas[1].cos()
            + 15.0 * thetas[2].cos()
            + 10.0 * thetas[3].cos();
        let expected_y = 25.0 * thetas[0].sin()
            + 20.0 * thetas[1].sin()
            + 15.0 * thetas[2].sin()
            + 10.0 * thetas[3].sin();

        let tip = tip_position(&chain);

        let tolerance = 1e-12;
        assert!((tip.x - expected_x).abs() < tolerance);
        assert!((tip.y - expected_y).abs() < tolerance);
    }

    #[test]
    fn test_tip_within_reach() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut chain = Chain::new(&[25.0, 20.0, 15.0, 10.0]);

        for _ in 0..100 {
            let angles: Vec<f64> = (0..4)
                .map(|_| rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI))
                .collect();
            chain.set_angles(&angles);

            let tip = tip_position(&chain);
            assert!(tip.coords.norm() <= chain.reach() + 1e-9);
        }
    }

    #[test]
    fn test_jacobian_matches_finite_differences() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut chain = Chain::new(&[25.0, 20.0, 15.0, 10.0]);

        let h = 1e-6;
        let tolerance = 1e-4;

        for _ in 0..100 {
            let angles: Vec<f64> = (0..4)
                .map(|_| rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI))
                .collect();
            chain.set_angles(&angles);

            let jacobian = jacobian(&chain);

            for i in 0..4 {
                let mut plus = angles.clone();
                plus[i] += h;
                chain.set_angles(&plus);
                let tip_plus = tip_position(&chain);

                let mut minus = angles.clone();
                minus[i] -= h;
                chain.set_angles(&minus);
                let tip_minus = tip_position(&chain);

                let numeric_dx = (tip_plus.x - tip_minus.x) / (2.0 * h);
                let numeric_dy = (tip_plus.y - tip_minus.y) / (2.0 * h);

                assert!((jacobian[(0, i)] - numeric_dx).abs() < tolerance);
                assert!((jacobian[(1, i)] - numeric_dy).abs() < tolerance);
            }
        }
    }
}
