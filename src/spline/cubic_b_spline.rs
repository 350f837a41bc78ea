use ndarray::{Array2, Array3};

use crate::math::traits::Real;

/// A cubic B-spline basis over a strictly increasing knot sequence.
///
/// The input knots span the evaluation domain; three extrapolated knots are
/// appended on each side (spaced like the outermost input intervals) so the
/// full basis is defined across the whole domain. A sequence of n input
/// knots yields n + 2 basis functions. Evaluation uses the Cox-de Boor
/// recursion for the four basis functions active on the interval containing
/// the query point; points outside the domain are clamped to the end
/// intervals, which extrapolates the end polynomials.
#[derive(Clone, Debug)]
pub struct CubicBSplineBasis<T> {
    augmented_knots: Vec<T>,
}

impl<T: Real> CubicBSplineBasis<T> {
    pub fn new(knots: &[T]) -> Self {
        assert!(knots.len() >= 2);
        assert!(
            knots.windows(2).all(|pair| pair[0] < pair[1]),
            "knots must be strictly increasing"
        );

        let num_knots = knots.len();
        let first_spacing = knots[1] - knots[0];
        let last_spacing = knots[num_knots - 1] - knots[num_knots - 2];

        let mut augmented_knots = Vec::with_capacity(num_knots + 6);
        for step in (1..=3).rev() {
            augmented_knots.push(knots[0] - T::from_f64(step as f64) * first_spacing);
        }
        augmented_knots.extend_from_slice(knots);
        for step in 1..=3 {
            augmented_knots.push(knots[num_knots - 1] + T::from_f64(step as f64) * last_spacing);
        }

        CubicBSplineBasis { augmented_knots }
    }

    pub fn num_basis_functions(&self) -> usize {
        self.augmented_knots.len() - 4
    }

    pub fn domain(&self) -> (T, T) {
        let len = self.augmented_knots.len();
        (self.augmented_knots[3], self.augmented_knots[len - 4])
    }

    /// Index of the knot interval `[a[k], a[k+1])` used to evaluate at `x`,
    /// clamped to the domain.
    pub fn find_interval(&self, x: T) -> usize {
        let last_interval = self.augmented_knots.len() - 5;
        let count = self.augmented_knots[3..=last_interval]
            .partition_point(|&knot| knot <= x);
        (count + 2).clamp(3, last_interval)
    }

    /// The values of the four basis functions `N[k-3] ..= N[k]` active on
    /// interval `k`, evaluated at `x`. They are non-negative and sum to one
    /// for `x` inside the domain.
    pub fn evaluate_in_interval(&self, x: T, k: usize) -> [T; 4] {
        let a = &self.augmented_knots;
        debug_assert!(k >= 3 && k + 4 < a.len() + 1);

        let zero = T::from_f64(0.0);
        let mut values = [T::from_f64(1.0), zero, zero, zero];
        let mut left = [zero; 4];
        let mut right = [zero; 4];

        for degree in 1..=3 {
            left[degree] = x - a[k + 1 - degree];
            right[degree] = a[k + degree] - x;
            let mut saved = zero;
            for r in 0..degree {
                let denominator = right[r + 1] + left[degree - r];
                let ratio = values[r] / denominator;
                values[r] = saved + right[r + 1] * ratio;
                saved = left[degree - r] * ratio;
            }
            values[degree] = saved;
        }
        values
    }

    /// Greville abscissa of basis function `i`: the knot average at which a
    /// control point placed on a straight line reproduces that line.
    pub fn greville_abscissa(&self, i: usize) -> T {
        assert!(i < self.num_basis_functions());
        let a = &self.augmented_knots;
        (a[i + 1] + a[i + 2] + a[i + 3]) / T::from_f64(3.0)
    }
}

/// A cubic B-spline curve: a basis plus one control point per basis
/// function.
#[derive(Clone, Debug)]
pub struct CubicBSpline1D<T> {
    basis: CubicBSplineBasis<T>,
    control_points: Vec<T>,
}

impl<T: Real> CubicBSpline1D<T> {
    pub fn new(basis: CubicBSplineBasis<T>, control_points: Vec<T>) -> Self {
        assert_eq!(control_points.len(), basis.num_basis_functions());
        CubicBSpline1D {
            basis,
            control_points,
        }
    }

    pub fn basis(&self) -> &CubicBSplineBasis<T> {
        &self.basis
    }

    pub fn evaluate(&self, x: T) -> T {
        let k = self.basis.find_interval(x);
        let values = self.basis.evaluate_in_interval(x, k);
        let mut sum = T::from_f64(0.0);
        for (r, &value) in values.iter().enumerate() {
            sum = sum + self.control_points[k - 3 + r] * value;
        }
        sum
    }
}

/// A bicubic tensor-product B-spline surface.
#[derive(Clone, Debug)]
pub struct CubicBSpline2D<T> {
    row_basis: CubicBSplineBasis<T>,
    col_basis: CubicBSplineBasis<T>,
    control_points: Array2<T>,
}

impl<T: Real> CubicBSpline2D<T> {
    pub fn new(
        row_basis: CubicBSplineBasis<T>,
        col_basis: CubicBSplineBasis<T>,
        control_points: Array2<T>,
    ) -> Self {
        assert_eq!(
            control_points.dim(),
            (
                row_basis.num_basis_functions(),
                col_basis.num_basis_functions()
            )
        );
        CubicBSpline2D {
            row_basis,
            col_basis,
            control_points,
        }
    }

    pub fn evaluate(&self, x: T, y: T) -> T {
        let kx = self.row_basis.find_interval(x);
        let ky = self.col_basis.find_interval(y);
        let row_values = self.row_basis.evaluate_in_interval(x, kx);
        let col_values = self.col_basis.evaluate_in_interval(y, ky);

        let mut sum = T::from_f64(0.0);
        for (r, &row_value) in row_values.iter().enumerate() {
            for (c, &col_value) in col_values.iter().enumerate() {
                let control = self.control_points[(kx - 3 + r, ky - 3 + c)];
                sum = sum + control * row_value * col_value;
            }
        }
        sum
    }
}

/// A tricubic tensor-product B-spline volume.
#[derive(Clone, Debug)]
pub struct CubicBSpline3D<T> {
    bases: [CubicBSplineBasis<T>; 3],
    control_points: Array3<T>,
}

impl<T: Real> CubicBSpline3D<T> {
    pub fn new(bases: [CubicBSplineBasis<T>; 3], control_points: Array3<T>) -> Self {
        assert_eq!(
            control_points.dim(),
            (
                bases[0].num_basis_functions(),
                bases[1].num_basis_functions(),
                bases[2].num_basis_functions()
            )
        );
        CubicBSpline3D {
            bases,
            control_points,
        }
    }

    pub fn evaluate(&self, x: T, y: T, z: T) -> T {
        let kx = self.bases[0].find_interval(x);
        let ky = self.bases[1].find_interval(y);
        let kz = self.bases[2].find_interval(z);
        let x_values = self.bases[0].evaluate_in_interval(x, kx);
        let y_values = self.bases[1].evaluate_in_interval(y, ky);
        let z_values = self.bases[2].evaluate_in_interval(z, kz);

        let mut sum = T::from_f64(0.0);
        for (r, &x_value) in x_values.iter().enumerate() {
            for (c, &y_value) in y_values.iter().enumerate() {
                for (d, &z_value) in z_values.iter().enumerate() {
                    let control = self.control_points[(kx - 3 + r, ky - 3 + c, kz - 3 + d)];
                    sum = sum + control * x_value * y_value * z_value;
                }
            }
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_knots(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn basis_counts_and_domain() {
        let basis = CubicBSplineBasis::new(&uniform_knots(5));
        assert_eq!(basis.num_basis_functions(), 7);
        assert_eq!(basis.domain(), (0.0, 4.0));
    }

    #[test]
    fn basis_is_a_partition_of_unity() {
        let basis = CubicBSplineBasis::new(&[0.0, 0.5, 1.25, 2.0, 4.0]);
        let (lo, hi) = basis.domain();
        for step in 0..=100 {
            let x = lo + (hi - lo) * step as f64 / 100.0;
            let k = basis.find_interval(x);
            let values = basis.evaluate_in_interval(x, k);
            let total: f64 = values.iter().sum();
            assert!((total - 1.0).abs() < 1e-12, "sum {total} at {x}");
            assert!(values.iter().all(|&v| v >= -1e-12));
        }
    }

    #[test]
    fn find_interval_clamps_to_the_domain() {
        let basis = CubicBSplineBasis::new(&uniform_knots(4));
        assert_eq!(basis.find_interval(-10.0), 3);
        assert_eq!(basis.find_interval(0.0), 3);
        assert_eq!(basis.find_interval(1.5), 4);
        assert_eq!(basis.find_interval(3.0), 5);
        assert_eq!(basis.find_interval(99.0), 5);
    }

    #[test]
    fn greville_control_points_reproduce_a_line() {
        let basis = CubicBSplineBasis::new(&[0.0, 1.0, 2.5, 3.0, 5.0]);
        let control_points: Vec<f64> = (0..basis.num_basis_functions())
            .map(|i| 2.0 * basis.greville_abscissa(i) - 1.0)
            .collect();
        let spline = CubicBSpline1D::new(basis, control_points);

        for step in 0..=50 {
            let x = 5.0 * step as f64 / 50.0;
            let expected = 2.0 * x - 1.0;
            assert!((spline.evaluate(x) - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn constant_spline_is_flat() {
        let basis = CubicBSplineBasis::new(&uniform_knots(6));
        let control_points = vec![7.5; basis.num_basis_functions()];
        let spline = CubicBSpline1D::new(basis, control_points);
        for step in 0..=20 {
            let x = 5.0 * step as f64 / 20.0;
            assert!((spline.evaluate(x) - 7.5).abs() < 1e-12);
        }
    }

    #[test]
    fn tensor_surface_matches_separable_evaluation() {
        let row_basis = CubicBSplineBasis::new(&uniform_knots(4));
        let col_basis = CubicBSplineBasis::new(&[0.0, 2.0, 3.0, 4.5, 6.0]);
        let control_points = Array2::from_shape_fn(
            (
                row_basis.num_basis_functions(),
                col_basis.num_basis_functions(),
            ),
            |(i, j)| row_basis.greville_abscissa(i) + col_basis.greville_abscissa(j),
        );
        let surface = CubicBSpline2D::new(row_basis, col_basis, control_points);

        for xi in 0..=6 {
            for yi in 0..=6 {
                let x = 3.0 * xi as f64 / 6.0;
                let y = 6.0 * yi as f64 / 6.0;
                assert!((surface.evaluate(x, y) - (x + y)).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn volume_matches_separable_evaluation() {
        let bases = [
            CubicBSplineBasis::new(&uniform_knots(3)),
            CubicBSplineBasis::new(&uniform_knots(4)),
            CubicBSplineBasis::new(&[0.0, 1.5, 3.0]),
        ];
        let control_points = Array3::from_shape_fn(
            (
                bases[0].num_basis_functions(),
                bases[1].num_basis_functions(),
                bases[2].num_basis_functions(),
            ),
            |(i, j, k)| {
                bases[0].greville_abscissa(i)
                    + bases[1].greville_abscissa(j)
                    + bases[2].greville_abscissa(k)
            },
        );
        let volume = CubicBSpline3D::new(bases, control_points);

        for xi in 0..=4 {
            for yi in 0..=4 {
                for zi in 0..=4 {
                    let x = 2.0 * xi as f64 / 4.0;
                    let y = 3.0 * yi as f64 / 4.0;
                    let z = 3.0 * zi as f64 / 4.0;
                    assert!((volume.evaluate(x, y, z) - (x + y + z)).abs() < 1e-10);
                }
            }
        }
    }

    #[test]
    fn f32_basis_evaluates() {
        let basis = CubicBSplineBasis::new(&[0.0f32, 1.0, 2.0, 3.0]);
        let k = basis.find_interval(1.5);
        let values = basis.evaluate_in_interval(1.5, k);
        let total: f32 = values.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
    }
}
