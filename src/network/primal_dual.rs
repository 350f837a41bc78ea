use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use super::network::Network;
use super::residual_graph::ResidualGraph;
use super::successive_shortest_paths::{augment_flow, successive_shortest_paths};
use crate::graph::shortest_path_search::ShortestPathSearch;
use crate::math::traits::{Infinity, One, Zero};

/// Grows the shortest-path forest from every excess node at once, recording
/// for each reached vertex which source its tree hangs from.
fn search_from_all_excess_nodes<'g, R, C, F, S>(
    search: &mut S,
    network: &Network<'g, R, C, F>,
    source_of: &mut [usize],
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
    for source in network.excess_nodes() {
        search.add_source(source);
        source_of[network.get_node_id(source)] = network.get_node_id(source);
    }

    while !search.done() {
        let (tail, distance) = search.pop_next_unvisited_vertex();
        search.visit_vertex(tail, distance);

        for (arc, head) in network.outgoing_arcs(tail) {
            if network.is_arc_saturated(arc) {
                continue;
            }
            let arc_length = network.arc_reduced_cost(arc, tail, head);
            assert!(arc_length >= C::zero());
            if search.relax_edge(arc, tail, head, distance + arc_length) {
                // The head joins the tail's tree.
                source_of[network.get_node_id(head)] = source_of[network.get_node_id(tail)];
            }
        }
    }
}

/// For every source with at least one reachable deficit node, augments one
/// unit of flow to the nearest such node. Returns the number of
/// augmentations performed.
///
/// Predecessor chains of sinks hanging from distinct sources are
/// vertex-disjoint (a chain is determined by the forest's parent pointers
/// and ends at the chain's own root), so the augmentations cannot contend
/// for residual capacity.
fn augment_nearest_sinks<'g, R, C, F, S>(
    network: &mut Network<'g, R, C, F>,
    search: &S,
    source_of: &[usize],
) -> usize
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
    let mut sinks: Vec<R::Vertex> = network
        .deficit_nodes()
        .filter(|&sink| search.forest().has_visited_vertex(sink))
        .collect();

    sinks.sort_by(|&lhs, &rhs| {
        let lhs_source = source_of[network.get_node_id(lhs)];
        let rhs_source = source_of[network.get_node_id(rhs)];
        lhs_source.cmp(&rhs_source).then_with(|| {
            let lhs_distance = search.forest().distance_to_vertex(lhs);
            let rhs_distance = search.forest().distance_to_vertex(rhs);
            lhs_distance
                .partial_cmp(&rhs_distance)
                .unwrap_or(Ordering::Equal)
        })
    });
    // One sink per source: the nearest one.
    sinks.dedup_by_key(|sink| source_of[network.get_node_id(*sink)]);

    for &sink in &sinks {
        augment_flow(network, search, sink);
    }
    sinks.len()
}

fn update_potentials_from_distances<'g, R, C, F, S>(
    network: &mut Network<'g, R, C, F>,
    search: &S,
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
    for node in search.forest().visited_vertices() {
        let distance = search.forest().distance_to_vertex(node);
        debug_assert!(distance >= C::zero());
        network.decrease_node_potential(node, distance);
    }
}

/// The primal-dual method.
///
/// Each iteration runs one shortest-path search from all excess nodes
/// simultaneously and then discharges every source whose tree reaches a
/// deficit node, so the cost of a search is amortized over many
/// augmentations while the imbalance is large. If `maxiter` iterations
/// (0 = unbounded) do not balance the network, the remaining excess is
/// discharged one unit at a time with [`successive_shortest_paths`], whose
/// termination argument is unconditional.
///
/// The network must be balanced on entry and carry unit excesses. If some
/// deficit node is unreachable the function logs a warning and returns with
/// the network unbalanced.
pub fn primal_dual<'g, R, C, F, S>(
    network: &mut Network<'g, R, C, F>,
    search: &mut S,
    maxiter: usize,
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

    let mut source_of = vec![usize::MAX; network.num_nodes()];
    let mut iter: usize = 1;
    loop {
        log::info!("primal-dual: iteration {}", iter);

        if network.excess_nodes().next().is_none() {
            return;
        }

        search.reset();
        source_of.fill(usize::MAX);
        search_from_all_excess_nodes(search, network, &mut source_of);

        let num_augmentations = augment_nearest_sinks(network, search, &source_of);
        if num_augmentations == 0 {
            log::warn!(
                "primal-dual: no deficit node reachable from any excess node; \
                 giving up with the network unbalanced"
            );
            return;
        }

        if network.excess_nodes().next().is_none() {
            return;
        }

        update_potentials_from_distances(network, search);

        if iter == maxiter {
            break;
        }
        iter += 1;
    }

    log::info!("primal-dual: iteration limit reached, finishing with successive shortest paths");
    successive_shortest_paths(network, search);
}
