use ndarray::{Array2, ArrayView2};

use crate::math::traits::Real;

/// Number of whole phase cycles in the difference `a - b`.
fn cycle_diff_residual<T: Real>(a: T, b: T) -> i32 {
    ((a - b) / T::TAU).round().to_f64() as i32
}

fn is_wrapped_phase<T: Real>(psi: T) -> bool {
    psi >= -T::PI && psi <= T::PI
}

/// Computes the integer residue field of a wrapped-phase image.
///
/// The input is an M x N image with samples in [-pi, pi]; the output is an
/// (M+1) x (N+1) array of residues at the dual-grid (cell corner)
/// positions. Every interior 2x2 plaquette contributes the whole-cycle
/// residuals of its directed wrapped differences to its corner entries; two
/// one-dimensional passes cover the last row and column. Each contribution
/// is added at one corner and subtracted at another, so the residues always
/// sum to zero, and every non-zero entry of a valid wrapped field is +/-1.
pub fn residue<T: Real>(wrapped_phase: ArrayView2<'_, T>) -> Array2<i32> {
    let (num_rows, num_cols) = wrapped_phase.dim();
    assert!(num_rows >= 1);
    assert!(num_cols >= 1);

    let mut out = Array2::<i32>::zeros((num_rows + 1, num_cols + 1));

    for i in 0..num_rows - 1 {
        for j in 0..num_cols - 1 {
            let phi_00 = wrapped_phase[(i, j)];
            let phi_10 = wrapped_phase[(i + 1, j)];
            let phi_01 = wrapped_phase[(i, j + 1)];
            debug_assert!(is_wrapped_phase(phi_00));
            debug_assert!(is_wrapped_phase(phi_10));
            debug_assert!(is_wrapped_phase(phi_01));

            let di = cycle_diff_residual(phi_00, phi_10);
            let dj = cycle_diff_residual(phi_01, phi_00);
            debug_assert!((-1..=1).contains(&di));
            debug_assert!((-1..=1).contains(&dj));

            out[(i + 1, j)] += di;
            out[(i, j + 1)] += dj;
            out[(i + 1, j + 1)] -= di + dj;
        }
    }

    // Last column.
    let j = num_cols - 1;
    for i in 0..num_rows - 1 {
        let phi_0 = wrapped_phase[(i, j)];
        let phi_1 = wrapped_phase[(i + 1, j)];
        debug_assert!(is_wrapped_phase(phi_0));
        debug_assert!(is_wrapped_phase(phi_1));

        let d = cycle_diff_residual(phi_0, phi_1);
        debug_assert!((-1..=1).contains(&d));

        out[(i + 1, j)] += d;
        out[(i + 1, j + 1)] -= d;
    }

    // Last row.
    let i = num_rows - 1;
    for j in 0..num_cols - 1 {
        let phi_0 = wrapped_phase[(i, j)];
        let phi_1 = wrapped_phase[(i, j + 1)];
        debug_assert!(is_wrapped_phase(phi_0));
        debug_assert!(is_wrapped_phase(phi_1));

        let d = cycle_diff_residual(phi_1, phi_0);
        debug_assert!((-1..=1).contains(&d));

        out[(i, j + 1)] += d;
        out[(i + 1, j + 1)] -= d;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::f64::consts::PI;

    #[test]
    fn smooth_field_has_no_residues() {
        let eps = 1e-3;
        let wrapped = array![
            [0.0, 0.0, 0.0],
            [0.0, PI - eps, 0.0],
            [0.0, 0.0, 0.0],
        ];
        let residues = residue(wrapped.view());
        assert_eq!(residues.dim(), (4, 4));
        assert!(residues.iter().all(|&r| r == 0));
    }

    #[test]
    fn dislocation_produces_a_residue_pair() {
        let wrapped = array![[0.0, PI / 2.0], [-PI, PI / 2.0]];
        let residues = residue(wrapped.view());
        assert_eq!(residues.dim(), (3, 3));

        // The interior plaquette residual lands on the corner below the
        // discontinuity, balanced by the boundary pass.
        assert_eq!(residues[(1, 0)], 1);
        assert_eq!(residues[(2, 1)], -1);
        let num_nonzero = residues.iter().filter(|&&r| r != 0).count();
        assert_eq!(num_nonzero, 2);
        assert_eq!(residues.iter().sum::<i32>(), 0);
    }

    #[test]
    fn residues_always_sum_to_zero() {
        // A deliberately rough field: every value is still in [-pi, pi].
        let wrapped = array![
            [3.0, -3.0, 2.5, -0.1],
            [-2.9, 3.1, -3.1, 2.2],
            [1.0, -1.0, 3.0, -3.0],
        ];
        let residues = residue(wrapped.view());
        assert_eq!(residues.dim(), (4, 5));
        assert_eq!(residues.iter().sum::<i32>(), 0);
    }

    #[test]
    fn single_pixel_image() {
        let wrapped = array![[1.0f32]];
        let residues = residue(wrapped.view());
        assert_eq!(residues.dim(), (2, 2));
        assert!(residues.iter().all(|&r| r == 0));
    }

    #[test]
    fn single_row_and_column_images() {
        let wrapped = array![[3.0, -3.0, 3.0]];
        let residues = residue(wrapped.view());
        assert_eq!(residues.dim(), (2, 4));
        assert_eq!(residues.iter().sum::<i32>(), 0);

        let wrapped = array![[3.0], [-3.0], [3.0]];
        let residues = residue(wrapped.view());
        assert_eq!(residues.dim(), (4, 2));
        assert_eq!(residues.iter().sum::<i32>(), 0);
    }
}
