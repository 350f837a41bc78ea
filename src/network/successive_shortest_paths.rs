use std::fmt::Debug;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use super::network::Network;
use super::residual_graph::ResidualGraph;
use crate::graph::shortest_path_search::ShortestPathSearch;
use crate::math::traits::{Infinity, One, Zero};

/// Finds the shortest path (w.r.t. reduced arc costs) from `source` to the
/// nearest deficit node. Returns that node, or `None` if no deficit node is
/// reachable through unsaturated arcs.
pub(crate) fn search_nearest_deficit_node<'g, R, C, F, S>(
    search: &mut S,
    network: &Network<'g, R, C, F>,
    source: R::Vertex,
) -> Option<R::Vertex>
where
    R: ResidualGraph,
    S: ShortestPathSearch<'g, R, Distance = C>,
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
    F: Copy + PartialOrd + Debug + Zero + One + Infinity + AddAssign + SubAssign + Into<i128>,
{
    assert!(network.contains_node(source));

    search.reset();
    debug_assert!(search.done());
    search.add_source(source);

    while !search.done() {
        let (tail, distance) = search.pop_next_unvisited_vertex();
        search.visit_vertex(tail, distance);

        if network.is_deficit_node(tail) {
            return Some(tail);
        }

        for (arc, head) in network.outgoing_arcs(tail) {
            if network.is_arc_saturated(arc) {
                continue;
            }
            let arc_length = network.arc_reduced_cost(arc, tail, head);
            assert!(arc_length >= C::zero());
            search.relax_edge(arc, tail, head, distance + arc_length);
        }
    }

    None
}

/// Pushes one unit of flow along the predecessor path from `sink` back to
/// its root, transferring a unit of excess from the root to the sink.
pub(crate) fn augment_flow<'g, R, C, F, S>(
    network: &mut Network<'g, R, C, F>,
    search: &S,
    sink: R::Vertex,
) where
    R: ResidualGraph,
    S: ShortestPathSearch<'g, R, Distance = C>,
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
    F: Copy + PartialOrd + Debug + Zero + One + Infinity + AddAssign + SubAssign + Into<i128>,
{
    assert!(search.forest().has_visited_vertex(sink));
    let delta = F::one();

    assert!(network.is_deficit_node(sink));
    network.increase_node_excess(sink, delta);
    debug_assert!(!network.is_deficit_node(sink));

    let mut path_root = sink;
    for (tail, arc) in search.forest().predecessors(sink) {
        debug_assert!(search.forest().has_visited_vertex(tail));
        debug_assert!(network.arc_residual_capacity(arc) >= delta);
        network.increase_arc_flow(arc, delta);
        path_root = tail;
    }

    assert!(network.is_excess_node(path_root));
    network.decrease_node_excess(path_root, delta);
    debug_assert!(!network.is_excess_node(path_root));
}

/// Raises the potential of every visited node by its remaining distance to
/// the sink, which zeroes reduced costs along the augmenting path and keeps
/// all unsaturated arcs' reduced costs non-negative.
pub(crate) fn update_potentials_toward_sink<'g, R, C, F, S>(
    network: &mut Network<'g, R, C, F>,
    search: &S,
    sink: R::Vertex,
) where
    R: ResidualGraph,
    S: ShortestPathSearch<'g, R, Distance = C>,
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
    F: Copy + PartialOrd + Debug + Zero + One + Infinity + AddAssign + SubAssign + Into<i128>,
{
    let distance_to_sink = search.forest().distance_to_vertex(sink);
    debug_assert!(distance_to_sink >= C::zero());

    for node in search.forest().visited_vertices() {
        let distance = search.forest().distance_to_vertex(node);
        debug_assert!(distance_to_sink >= distance);
        network.increase_node_potential(node, distance_to_sink - distance);
    }
}

/// The successive-shortest-paths method: discharges one unit of excess per
/// iteration along a shortest augmenting path, maintaining node potentials
/// so reduced costs stay non-negative.
///
/// The network must be balanced on entry and carry unit excesses (the
/// residue field of a wrapped-phase image satisfies this). If some deficit
/// node turns out to be unreachable the function logs a warning and returns
/// early; callers observe that outcome through `Network::is_balanced`.
pub fn successive_shortest_paths<'g, R, C, F, S>(
    network: &mut Network<'g, R, C, F>,
    search: &mut S,
) where
    R: ResidualGraph,
    S: ShortestPathSearch<'g, R, Distance = C>,
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
    F: Copy + PartialOrd + Debug + Zero + One + Infinity + AddAssign + SubAssign + Into<i128>,
{
    assert!(network.is_balanced());

    let sources: Vec<R::Vertex> = network.excess_nodes().collect();
    let num_iter = sources.len();

    for (iter, &source) in sources.iter().enumerate() {
        if (iter + 1) % 100 == 0 {
            log::info!(
                "successive shortest paths: iteration {:>8}/{}",
                iter + 1,
                num_iter
            );
        }
        debug_assert!(network.is_excess_node(source));

        let Some(sink) = search_nearest_deficit_node(search, network, source) else {
            log::warn!(
                "successive shortest paths: no deficit node reachable from the \
                 remaining excess nodes; giving up with the network unbalanced"
            );
            return;
        };

        augment_flow(network, search, sink);
        update_potentials_toward_sink(network, search, sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::dial::Dial;
    use crate::graph::digraph::Digraph;
    use crate::graph::dijkstra::Dijkstra;
    use crate::graph::edge_list::EdgeList;
    use crate::graph::rectangular_grid_graph::RectangularGridGraph;
    use crate::math::traits::AsBucketIndex;
    use crate::network::residual_graph::{CsrResidualGraph, GridResidualGraph};

    fn assert_reduced_costs_nonnegative<'g, R, C, F>(network: &Network<'g, R, C, F>)
    where
        R: ResidualGraph,
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
        F: Copy + PartialOrd + Debug + Zero + One + Infinity + AddAssign + SubAssign + Into<i128>,
    {
        for tail in network.nodes() {
            for (arc, head) in network.outgoing_arcs(tail) {
                if network.is_arc_saturated(arc) {
                    continue;
                }
                assert!(network.arc_reduced_cost(arc, tail, head) >= C::zero());
            }
        }
    }

    #[test]
    fn grid_chain_is_balanced_at_minimum_cost() {
        let base = RectangularGridGraph::new(1, 3);
        let residual = GridResidualGraph::new(&base);
        let costs = vec![1i64; base.num_edges()];
        let mut network: Network<'_, _, i64, i32> =
            Network::new(&residual, vec![1, 0, -1], &costs);
        let mut dijkstra = Dijkstra::new(&residual);

        successive_shortest_paths(&mut network, &mut dijkstra);

        assert!(network.is_balanced());
        assert_eq!(network.total_excess(), 0);
        assert_eq!(network.total_deficit(), 0);
        assert_eq!(network.total_cost(), 2);
        assert_reduced_costs_nonnegative(&network);

        // Flow runs along the two right edges of the chain.
        let first = residual.grid().get_right_edge((0, 0));
        let second = residual.grid().get_right_edge((0, 1));
        assert_eq!(network.arc_flow(first), 1);
        assert_eq!(network.arc_flow(second), 1);
    }

    #[test]
    fn csr_instance_picks_the_cheaper_route() {
        // Two routes from 0 to 3: via 1 at cost 2, via 2 at cost 6.
        let mut edges = EdgeList::new();
        edges
            .add_edge(0, 1)
            .add_edge(0, 2)
            .add_edge(1, 3)
            .add_edge(2, 3);
        let residual = CsrResidualGraph::new(&edges);
        // Base edge ids after sorting: (0,1)=0, (0,2)=1, (1,3)=2, (2,3)=3.
        let costs = vec![1i64, 5, 1, 1];
        let mut network: Network<'_, _, i64, i32> =
            Network::new(&residual, vec![1, 0, 0, -1], &costs);
        let mut dijkstra = Dijkstra::new(&residual);

        successive_shortest_paths(&mut network, &mut dijkstra);

        assert!(network.is_balanced());
        assert_eq!(network.total_cost(), 2);
        assert_eq!(network.arc_flow(residual.residual_arc_id(0)), 1);
        assert_eq!(network.arc_flow(residual.residual_arc_id(2)), 1);
        assert_eq!(network.arc_flow(residual.residual_arc_id(1)), 0);
        assert_reduced_costs_nonnegative(&network);
    }

    #[test]
    fn unit_capacities_force_disjoint_paths() {
        // Sources 0 and 1 both route through node 2; the cheap outlet (2,3)
        // can only carry one unit, so the second unit must take (2,4).
        let mut edges = EdgeList::new();
        edges
            .add_edge(0, 2)
            .add_edge(1, 2)
            .add_edge(2, 3)
            .add_edge(2, 4);
        let residual = CsrResidualGraph::new(&edges);
        // Base edge ids after sorting: (0,2)=0, (1,2)=1, (2,3)=2, (2,4)=3.
        let costs = vec![1i64, 1, 1, 2];
        let mut network: Network<'_, _, i64, i32> =
            Network::with_unit_capacities(&residual, vec![1, 1, 0, -1, -1], &costs);
        let mut dijkstra = Dijkstra::new(&residual);

        successive_shortest_paths(&mut network, &mut dijkstra);

        assert!(network.is_balanced());
        assert_eq!(network.arc_flow(residual.residual_arc_id(2)), 1);
        assert_eq!(network.arc_flow(residual.residual_arc_id(3)), 1);
        assert_eq!(network.total_cost(), 5);
        assert_reduced_costs_nonnegative(&network);
    }

    #[test]
    fn dial_engine_solves_the_grid_chain() {
        let base = RectangularGridGraph::new(1, 3);
        let residual = GridResidualGraph::new(&base);
        let costs = vec![3i64; base.num_edges()];
        let mut network: Network<'_, _, i64, i32> =
            Network::new(&residual, vec![1, 0, -1], &costs);
        let num_buckets = network.max_admissible_arc_length().as_bucket_index() + 1;
        let mut dial = Dial::new(&residual, num_buckets);

        successive_shortest_paths(&mut network, &mut dial);

        assert!(network.is_balanced());
        assert_eq!(network.total_cost(), 6);
        assert_reduced_costs_nonnegative(&network);
    }

    #[test]
    fn unreachable_deficit_leaves_the_network_unbalanced() {
        // The only path from the excess node runs against a reverse arc that
        // starts saturated, so the deficit node cannot be reached.
        let mut edges = EdgeList::new();
        edges.add_edge(0, 1);
        let residual = CsrResidualGraph::new(&edges);
        let mut network: Network<'_, _, i64, i32> =
            Network::with_unit_capacities(&residual, vec![-1, 1], &[1]);
        let mut dijkstra = Dijkstra::new(&residual);

        successive_shortest_paths(&mut network, &mut dijkstra);

        assert!(!network.is_balanced());
        assert_eq!(network.total_excess(), 1);
    }
}
