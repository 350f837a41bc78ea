use anyhow::{anyhow, Result};
use ndarray::{Array2, ArrayView2};

use super::integrate_unwrapped_gradients::integrate_unwrapped_gradients;
use super::residue::residue;
use crate::graph::digraph::Digraph;
use crate::graph::dijkstra::Dijkstra;
use crate::graph::rectangular_grid_graph::RectangularGridGraph;
use crate::math::traits::Real;
use crate::network::network::Network;
use crate::network::primal_dual::primal_dual;
use crate::network::residual_graph::GridResidualGraph;

/// Unwraps a wrapped-phase image with uniform unit arc costs.
pub fn unwrap_phase<T: Real>(wrapped_phase: ArrayView2<'_, T>) -> Result<Array2<T>> {
    let (num_rows, num_cols) = wrapped_phase.dim();
    let dual_grid = RectangularGridGraph::new(num_rows + 1, num_cols + 1);
    unwrap_phase_with_costs(wrapped_phase, &vec![1; dual_grid.num_edges()], 0)
}

/// Unwraps a wrapped-phase image by routing its residues through a
/// minimum-cost flow over the dual grid.
///
/// `edge_costs` holds one non-negative cost per dual-grid edge (the grid has
/// one more row and column than the image), indexed by the grid's edge ids;
/// congruence weights such as sampled coherence maps plug in here. `maxiter`
/// bounds the primal-dual phase (0 = unbounded).
///
/// Returns an error for an empty image, samples outside [-pi, pi] (NaN
/// included), or a cost array of the wrong length.
pub fn unwrap_phase_with_costs<T: Real>(
    wrapped_phase: ArrayView2<'_, T>,
    edge_costs: &[i64],
    maxiter: usize,
) -> Result<Array2<T>> {
    let (num_rows, num_cols) = wrapped_phase.dim();
    if num_rows == 0 || num_cols == 0 {
        return Err(anyhow!("cannot unwrap an empty image"));
    }
    for ((i, j), &psi) in wrapped_phase.indexed_iter() {
        if !psi.is_finite() || psi < -T::PI || psi > T::PI {
            return Err(anyhow!(
                "sample at ({}, {}) is not a wrapped phase value: {:?}",
                i,
                j,
                psi
            ));
        }
    }

    let dual_grid = RectangularGridGraph::new(num_rows + 1, num_cols + 1);
    if edge_costs.len() != dual_grid.num_edges() {
        return Err(anyhow!(
            "expected one cost per dual-grid edge ({}), got {}",
            dual_grid.num_edges(),
            edge_costs.len()
        ));
    }
    if let Some(&cost) = edge_costs.iter().find(|&&cost| cost < 0) {
        return Err(anyhow!("arc costs must be non-negative, got {}", cost));
    }

    let residues = residue(wrapped_phase);
    let num_residues = residues.iter().filter(|&&r| r != 0).count();
    log::info!(
        "unwrapping a {}x{} image with {} residues",
        num_rows,
        num_cols,
        num_residues
    );

    let residual = GridResidualGraph::new(&dual_grid);
    let node_excess: Vec<i32> = residues.iter().copied().collect();
    let mut network: Network<'_, _, i64, i32> = Network::new(&residual, node_excess, edge_costs);
    debug_assert!(network.is_balanced());

    let mut dijkstra = Dijkstra::new(&residual);
    primal_dual(&mut network, &mut dijkstra, maxiter);
    if !network.is_balanced() {
        return Err(anyhow!(
            "could not route all residues: {} units of excess remain",
            network.total_excess()
        ));
    }
    log::info!("residues routed at total cost {}", network.total_cost());

    Ok(integrate_unwrapped_gradients(wrapped_phase, &network))
}
