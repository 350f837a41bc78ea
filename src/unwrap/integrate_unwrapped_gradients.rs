use ndarray::{Array2, ArrayView2};
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::math::traits::{Infinity, One, Real, Zero};
use crate::network::network::Network;
use crate::network::residual_graph::GridResidualGraph;

/// `(a - b)` reduced to the principal interval `[-pi, pi]`.
fn wrapped_diff(a: f64, b: f64) -> f64 {
    let diff = a - b;
    diff - std::f64::consts::TAU * (diff / std::f64::consts::TAU).round()
}

/// Reconstructs the unwrapped phase from a wrapped image and the flows of a
/// solved network.
///
/// The M x N wrapped image corresponds to an (M+1) x (N+1) dual-grid
/// network; every wrapped gradient between neighboring pixels is corrected
/// by 2π times the net flow crossing that pixel pair (the flow on the dual
/// arc in one direction minus the flow on the opposite forward arc). The
/// first pixel seeds the integration, the first column is integrated
/// downward, then every row is integrated rightward. Sums are accumulated
/// in double precision regardless of the sample type to limit rounding
/// drift.
pub fn integrate_unwrapped_gradients<T, C, F>(
    wrapped_phase: ArrayView2<'_, T>,
    network: &Network<'_, GridResidualGraph, C, F>,
) -> Array2<T>
where
    T: Real,
    C: Copy
        + PartialOrd
        + Debug
        + Zero
        + Infinity
        + Neg<Output = C>
        + Add<Output = C>
        + Sub<Output = C>
        + AddAssign
        + SubAssign,
    F: Copy
        + PartialOrd
        + Debug
        + Zero
        + One
        + Infinity
        + AddAssign
        + SubAssign
        + Into<i128>,
{
    let (num_rows, num_cols) = wrapped_phase.dim();
    assert!(num_rows >= 1);
    assert!(num_cols >= 1);

    let grid = network.residual_graph().grid();
    assert_eq!(grid.num_rows(), num_rows + 1);
    assert_eq!(grid.num_cols(), num_cols + 1);

    let net_flow = |into: usize, out_of: usize| -> f64 {
        let into_flow: i128 = network.arc_flow(into).into();
        let out_of_flow: i128 = network.arc_flow(out_of).into();
        (into_flow - out_of_flow) as f64
    };

    let tau = std::f64::consts::TAU;
    let mut unwrapped_phase = Array2::from_elem((num_rows, num_cols), T::from_f64(0.0));

    // First column, top to bottom. The dual arcs crossing the gradient
    // between pixels (i-1,0) and (i,0) join dual nodes (i,0) and (i,1).
    // Running sums are kept in f64 rather than read back from the output so
    // f32 images do not accumulate truncation error.
    let mut column_accumulator = vec![0.0f64; num_rows];
    column_accumulator[0] = wrapped_phase[(0, 0)].to_f64();
    unwrapped_phase[(0, 0)] = T::from_f64(column_accumulator[0]);
    for i in 1..num_rows {
        let dpsi = wrapped_diff(
            wrapped_phase[(i, 0)].to_f64(),
            wrapped_phase[(i - 1, 0)].to_f64(),
        );
        let crossing = net_flow(grid.get_right_edge((i, 0)), grid.get_left_edge((i, 1)));
        column_accumulator[i] = column_accumulator[i - 1] + dpsi + tau * crossing;
        unwrapped_phase[(i, 0)] = T::from_f64(column_accumulator[i]);
    }

    // Each row, left to right. The dual arcs crossing the gradient between
    // pixels (i,j-1) and (i,j) join dual nodes (i,j) and (i+1,j).
    for i in 0..num_rows {
        let mut accumulator = column_accumulator[i];
        for j in 1..num_cols {
            let dpsi = wrapped_diff(
                wrapped_phase[(i, j)].to_f64(),
                wrapped_phase[(i, j - 1)].to_f64(),
            );
            let crossing = net_flow(grid.get_down_edge((i, j)), grid.get_up_edge((i + 1, j)));
            accumulator += dpsi + tau * crossing;
            unwrapped_phase[(i, j)] = T::from_f64(accumulator);
        }
    }

    unwrapped_phase
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::digraph::Digraph;
    use crate::graph::rectangular_grid_graph::RectangularGridGraph;
    use crate::network::residual_graph::ResidualGraph;
    use ndarray::array;
    use std::f64::consts::PI;

    fn zero_flow_network(
        residual: &GridResidualGraph,
    ) -> Network<'_, GridResidualGraph, i64, i32> {
        let num_nodes = residual.num_vertices();
        let num_edges = residual.num_forward_arcs();
        Network::new(residual, vec![0; num_nodes], &vec![1i64; num_edges])
    }

    #[test]
    fn zero_flow_integration_is_the_cumulative_wrapped_diff() {
        let wrapped = array![[0.0, 1.0, -3.0], [2.0, -2.0, 3.0]];
        let base = RectangularGridGraph::new(3, 4);
        let residual = GridResidualGraph::new(&base);
        let network = zero_flow_network(&residual);

        let unwrapped = integrate_unwrapped_gradients(wrapped.view(), &network);
        assert_eq!(unwrapped.dim(), wrapped.dim());

        // Neighboring unwrapped gradients match the wrapped gradients up to
        // a whole number of cycles.
        for i in 0..2 {
            for j in 1..3 {
                let expected = wrapped_diff(wrapped[(i, j)], wrapped[(i, j - 1)]);
                let actual = unwrapped[(i, j)] - unwrapped[(i, j - 1)];
                assert!((actual - expected).abs() < 1e-12);
            }
        }
        for i in 1..2 {
            let expected = wrapped_diff(wrapped[(i, 0)], wrapped[(i - 1, 0)]);
            let actual = unwrapped[(i, 0)] - unwrapped[(i - 1, 0)];
            assert!((actual - expected).abs() < 1e-12);
        }

        // The seed pixel carries over unchanged.
        assert_eq!(unwrapped[(0, 0)], 0.0);
    }

    #[test]
    fn flow_adds_whole_cycles_to_the_crossed_gradient() {
        let wrapped = array![[0.0, 0.5], [0.25, 0.75]];
        let base = RectangularGridGraph::new(3, 3);
        let residual = GridResidualGraph::new(&base);
        let mut network = zero_flow_network(&residual);

        // One unit of flow on the dual arc crossing the horizontal gradient
        // between pixels (0,0) and (0,1).
        let crossing = residual.grid().get_down_edge((0, 1));
        network.increase_arc_flow(crossing, 1);

        let unwrapped = integrate_unwrapped_gradients(wrapped.view(), &network);
        assert!((unwrapped[(0, 1)] - (0.5 + 2.0 * PI)).abs() < 1e-12);
        // The flow sits between the row-0 pixels only; row 1 integrates from
        // the first column, whose crossing arcs carry no flow.
        assert!((unwrapped[(1, 0)] - 0.25).abs() < 1e-12);
        assert!((unwrapped[(1, 1)] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn flow_crossing_the_first_column_gradient() {
        let wrapped = array![[0.0, 0.5], [0.25, 0.75]];
        let base = RectangularGridGraph::new(3, 3);
        let residual = GridResidualGraph::new(&base);
        let mut network = zero_flow_network(&residual);

        // One unit of flow on the dual arc crossing the vertical gradient
        // between pixels (0,0) and (1,0), which only the column pass reads.
        let crossing = residual.grid().get_right_edge((1, 0));
        network.increase_arc_flow(crossing, 1);

        let unwrapped = integrate_unwrapped_gradients(wrapped.view(), &network);
        assert!((unwrapped[(1, 0)] - (0.25 + 2.0 * PI)).abs() < 1e-12);
        // The second row integrates rightward from the shifted column seed.
        assert!((unwrapped[(1, 1)] - (0.75 + 2.0 * PI)).abs() < 1e-12);
        // Row 0 never sees the crossing.
        assert!((unwrapped[(0, 0)] - 0.0).abs() < 1e-12);
        assert!((unwrapped[(0, 1)] - 0.5).abs() < 1e-12);

        // A unit on the opposite-direction arc cancels the net crossing.
        let opposite = residual.grid().get_left_edge((1, 1));
        network.increase_arc_flow(opposite, 1);
        let unwrapped = integrate_unwrapped_gradients(wrapped.view(), &network);
        assert!((unwrapped[(1, 0)] - 0.25).abs() < 1e-12);
        assert!((unwrapped[(1, 1)] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn opposite_flows_cancel() {
        let wrapped = array![[0.0f64, 0.5], [0.25, 0.75]];
        let base = RectangularGridGraph::new(3, 3);
        let residual = GridResidualGraph::new(&base);
        let mut network = zero_flow_network(&residual);

        let down = residual.grid().get_down_edge((0, 1));
        let up = residual.grid().get_up_edge((1, 1));
        network.increase_arc_flow(down, 1);
        network.increase_arc_flow(up, 1);

        let unwrapped = integrate_unwrapped_gradients(wrapped.view(), &network);
        assert!((unwrapped[(0, 1)] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn f32_samples_accumulate_in_double_precision() {
        let wrapped = array![[0.0f32, 1.0], [2.0, 3.0]];
        let base = RectangularGridGraph::new(3, 3);
        let residual = GridResidualGraph::new(&base);
        let network = zero_flow_network(&residual);

        let unwrapped = integrate_unwrapped_gradients(wrapped.view(), &network);
        assert_eq!(unwrapped.dim(), (2, 2));
        assert!((unwrapped[(0, 1)] - 1.0).abs() < 1e-6);
        assert!((unwrapped[(1, 1)] - (2.0 + wrapped_diff(3.0, 2.0) as f32)).abs() < 1e-6);
    }
}
