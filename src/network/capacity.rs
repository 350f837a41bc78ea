use bitvec::vec::BitVec;
use std::fmt::Debug;
use std::ops::{AddAssign, SubAssign};

use super::residual_graph::ResidualGraph;
use crate::graph::digraph::Digraph;
use crate::math::traits::{Infinity, One, Zero};

/// Arc capacity regime of a network, together with the flow state it
/// implies.
///
/// * `Uncapacitated`: forward arcs have infinite capacity and carry an
///   explicit flow value (one per base-graph edge); a reverse arc's residual
///   capacity is the flow on its transpose.
/// * `UnitCapacity`: every arc holds at most one unit, so the whole flow
///   state is one saturation bit per residual arc. Forward arcs start
///   unsaturated, reverse arcs saturated.
pub enum CapacityPolicy<F> {
    Uncapacitated { arc_flow: Vec<F> },
    UnitCapacity { is_arc_saturated: BitVec },
}

impl<F> CapacityPolicy<F>
where
    F: Copy + PartialOrd + Zero + One + Infinity + AddAssign + SubAssign + Debug,
{
    pub fn uncapacitated<R: ResidualGraph>(residual_graph: &R) -> Self {
        CapacityPolicy::Uncapacitated {
            arc_flow: vec![F::zero(); residual_graph.num_forward_arcs()],
        }
    }

    pub fn unit_capacity<R: ResidualGraph>(residual_graph: &R) -> Self {
        let mut is_arc_saturated = BitVec::with_capacity(residual_graph.num_edges());
        for arc in residual_graph.edges() {
            is_arc_saturated.push(!residual_graph.is_forward_arc(arc));
        }
        CapacityPolicy::UnitCapacity { is_arc_saturated }
    }

    /// The upper capacity of an arc.
    pub fn arc_capacity<R: ResidualGraph>(&self, _residual_graph: &R, _arc: usize) -> F {
        match self {
            CapacityPolicy::Uncapacitated { .. } => F::infinity(),
            CapacityPolicy::UnitCapacity { .. } => F::one(),
        }
    }

    /// The amount of flow in an arc. Reverse arcs of an uncapacitated
    /// network report infinite flow (they can absorb any amount).
    pub fn arc_flow<R: ResidualGraph>(&self, residual_graph: &R, arc: usize) -> F {
        assert!(residual_graph.contains_edge(arc));
        match self {
            CapacityPolicy::Uncapacitated { arc_flow } => {
                if residual_graph.is_forward_arc(arc) {
                    arc_flow[residual_graph.original_edge_id(arc)]
                } else {
                    F::infinity()
                }
            }
            CapacityPolicy::UnitCapacity { is_arc_saturated } => {
                if is_arc_saturated[arc] {
                    F::one()
                } else {
                    F::zero()
                }
            }
        }
    }

    /// The residual capacity of an arc.
    pub fn arc_residual_capacity<R: ResidualGraph>(&self, residual_graph: &R, arc: usize) -> F {
        assert!(residual_graph.contains_edge(arc));
        match self {
            CapacityPolicy::Uncapacitated { arc_flow } => {
                if residual_graph.is_forward_arc(arc) {
                    F::infinity()
                } else {
                    // What has been pushed through the transpose can be
                    // pushed back.
                    arc_flow[residual_graph.original_edge_id(arc)]
                }
            }
            CapacityPolicy::UnitCapacity { is_arc_saturated } => {
                if is_arc_saturated[arc] {
                    F::zero()
                } else {
                    F::one()
                }
            }
        }
    }

    pub fn is_arc_saturated<R: ResidualGraph>(&self, residual_graph: &R, arc: usize) -> bool {
        assert!(residual_graph.contains_edge(arc));
        match self {
            CapacityPolicy::Uncapacitated { arc_flow } => {
                if residual_graph.is_forward_arc(arc) {
                    false
                } else {
                    arc_flow[residual_graph.original_edge_id(arc)].is_zero()
                }
            }
            CapacityPolicy::UnitCapacity { is_arc_saturated } => is_arc_saturated[arc],
        }
    }

    /// Adds `delta` units of flow to `arc` and removes them from its
    /// transpose. The arc must have residual capacity at least `delta`.
    pub fn increase_arc_flow<R: ResidualGraph>(
        &mut self,
        residual_graph: &R,
        arc: usize,
        delta: F,
    ) {
        assert!(residual_graph.contains_edge(arc));
        match self {
            CapacityPolicy::Uncapacitated { arc_flow } => {
                let edge_id = residual_graph.original_edge_id(arc);
                if residual_graph.is_forward_arc(arc) {
                    arc_flow[edge_id] += delta;
                } else {
                    assert!(arc_flow[edge_id] >= delta);
                    arc_flow[edge_id] -= delta;
                }
            }
            CapacityPolicy::UnitCapacity { is_arc_saturated } => {
                assert!(!is_arc_saturated[arc]);
                let transpose = residual_graph.transpose_arc_id(arc);
                is_arc_saturated.set(arc, true);
                is_arc_saturated.set(transpose, false);
            }
        }
    }
}
