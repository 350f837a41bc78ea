use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use super::capacity::CapacityPolicy;
use super::residual_graph::ResidualGraph;
use crate::graph::digraph::Digraph;
use crate::math::traits::{Infinity, One, Zero};

/// A flow network over the residual graph of a base graph.
///
/// Couples a capacity policy with per-node excess and potential and per-arc
/// costs. Node excess is positive at sources, negative at sinks; arc costs
/// are stored per residual arc, with each reverse arc carrying the negated
/// cost of its forward partner so that reduced costs stay consistent under
/// flow reversal.
///
/// The solver keeps the invariant that every arc with positive residual
/// capacity has non-negative reduced cost under the current potentials.
pub struct Network<'g, R: ResidualGraph, C, F> {
    residual_graph: &'g R,
    capacity: CapacityPolicy<F>,
    node_excess: Vec<F>,
    node_potential: Vec<C>,
    arc_cost: Vec<C>,
}

impl<'g, R, C, F> Network<'g, R, C, F>
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
    /// Creates an uncapacitated network.
    ///
    /// `node_excess` holds one value per node, indexed by node id.
    /// `edge_costs` holds the unit cost of each base-graph edge; reverse
    /// arcs get the negated cost.
    pub fn new(residual_graph: &'g R, node_excess: Vec<F>, edge_costs: &[C]) -> Self {
        let capacity = CapacityPolicy::uncapacitated(residual_graph);
        Network::with_capacity_policy(residual_graph, capacity, node_excess, edge_costs)
    }

    /// Creates a network in which every arc holds at most one unit of flow.
    pub fn with_unit_capacities(
        residual_graph: &'g R,
        node_excess: Vec<F>,
        edge_costs: &[C],
    ) -> Self {
        let capacity = CapacityPolicy::unit_capacity(residual_graph);
        Network::with_capacity_policy(residual_graph, capacity, node_excess, edge_costs)
    }

    fn with_capacity_policy(
        residual_graph: &'g R,
        capacity: CapacityPolicy<F>,
        node_excess: Vec<F>,
        edge_costs: &[C],
    ) -> Self {
        assert_eq!(node_excess.len(), residual_graph.num_vertices());
        assert_eq!(edge_costs.len(), residual_graph.num_forward_arcs());

        let mut arc_cost = vec![C::zero(); residual_graph.num_edges()];
        for (edge_id, &cost) in edge_costs.iter().enumerate() {
            let arc = residual_graph.residual_arc_id(edge_id);
            arc_cost[arc] = cost;
            arc_cost[residual_graph.transpose_arc_id(arc)] = -cost;
        }

        Network {
            residual_graph,
            capacity,
            node_excess,
            node_potential: vec![C::zero(); residual_graph.num_vertices()],
            arc_cost,
        }
    }

    pub fn residual_graph(&self) -> &'g R {
        self.residual_graph
    }

    pub fn num_nodes(&self) -> usize {
        self.residual_graph.num_vertices()
    }

    /// The number of arcs in the residual graph, including arcs whose
    /// residual capacity is zero.
    pub fn num_arcs(&self) -> usize {
        self.residual_graph.num_edges()
    }

    pub fn num_forward_arcs(&self) -> usize {
        self.residual_graph.num_forward_arcs()
    }

    pub fn contains_node(&self, node: R::Vertex) -> bool {
        self.residual_graph.contains_vertex(node)
    }

    pub fn contains_arc(&self, arc: usize) -> bool {
        self.residual_graph.contains_edge(arc)
    }

    pub fn get_node_id(&self, node: R::Vertex) -> usize {
        assert!(self.contains_node(node));
        self.residual_graph.vertex_id(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = R::Vertex> + '_ {
        self.residual_graph.vertices()
    }

    pub fn arcs(&self) -> std::ops::Range<usize> {
        self.residual_graph.edges()
    }

    pub fn outgoing_arcs(&self, node: R::Vertex) -> impl Iterator<Item = (usize, R::Vertex)> + '_ {
        assert!(self.contains_node(node));
        self.residual_graph.outgoing_edges(node)
    }

    pub fn node_excess(&self, node: R::Vertex) -> F {
        self.node_excess[self.get_node_id(node)]
    }

    pub fn increase_node_excess(&mut self, node: R::Vertex, delta: F) {
        let node_id = self.get_node_id(node);
        self.node_excess[node_id] += delta;
    }

    pub fn decrease_node_excess(&mut self, node: R::Vertex, delta: F) {
        let node_id = self.get_node_id(node);
        self.node_excess[node_id] -= delta;
    }

    pub fn is_excess_node(&self, node: R::Vertex) -> bool {
        self.node_excess(node) > F::zero()
    }

    pub fn is_deficit_node(&self, node: R::Vertex) -> bool {
        self.node_excess(node) < F::zero()
    }

    pub fn excess_nodes(&self) -> impl Iterator<Item = R::Vertex> + '_ {
        self.nodes().filter(move |&node| self.is_excess_node(node))
    }

    pub fn deficit_nodes(&self) -> impl Iterator<Item = R::Vertex> + '_ {
        self.nodes().filter(move |&node| self.is_deficit_node(node))
    }

    /// The summed surplus of all excess nodes. Accumulated in a wide type so
    /// adversarial inputs cannot overflow the fold.
    pub fn total_excess(&self) -> i128 {
        self.node_excess
            .iter()
            .map(|&excess| excess.into())
            .filter(|&excess| excess > 0)
            .sum()
    }

    /// The summed demand of all deficit nodes (a non-positive value).
    pub fn total_deficit(&self) -> i128 {
        self.node_excess
            .iter()
            .map(|&excess| excess.into())
            .filter(|&excess| excess < 0)
            .sum()
    }

    pub fn is_balanced(&self) -> bool {
        let imbalance: i128 = self.node_excess.iter().map(|&excess| excess.into()).sum();
        imbalance == 0
    }

    pub fn node_potential(&self, node: R::Vertex) -> C {
        self.node_potential[self.get_node_id(node)]
    }

    pub fn increase_node_potential(&mut self, node: R::Vertex, delta: C) {
        let node_id = self.get_node_id(node);
        self.node_potential[node_id] += delta;
    }

    pub fn decrease_node_potential(&mut self, node: R::Vertex, delta: C) {
        let node_id = self.get_node_id(node);
        self.node_potential[node_id] -= delta;
    }

    /// The cost per unit of flow in an arc.
    pub fn arc_cost(&self, arc: usize) -> C {
        assert!(self.contains_arc(arc));
        self.arc_cost[arc]
    }

    /// `cost(arc) - potential(tail) + potential(head)`.
    pub fn arc_reduced_cost(&self, arc: usize, tail: R::Vertex, head: R::Vertex) -> C {
        self.arc_cost(arc) - self.node_potential(tail) + self.node_potential(head)
    }

    pub fn arc_capacity(&self, arc: usize) -> F {
        self.capacity.arc_capacity(self.residual_graph, arc)
    }

    pub fn arc_flow(&self, arc: usize) -> F {
        self.capacity.arc_flow(self.residual_graph, arc)
    }

    pub fn arc_residual_capacity(&self, arc: usize) -> F {
        self.capacity.arc_residual_capacity(self.residual_graph, arc)
    }

    pub fn is_arc_saturated(&self, arc: usize) -> bool {
        self.capacity.is_arc_saturated(self.residual_graph, arc)
    }

    /// Adds `delta` units of flow to `arc` and removes them from its
    /// transpose. Does not touch node excess.
    pub fn increase_arc_flow(&mut self, arc: usize, delta: F) {
        self.capacity
            .increase_arc_flow(self.residual_graph, arc, delta);
    }

    /// The largest finite reduced cost among unsaturated arcs, which bounds
    /// the bucket count a Dial search over this network needs.
    pub fn max_admissible_arc_length(&self) -> C {
        let mut max_arc_length = C::zero();
        for tail in self.nodes() {
            for (arc, head) in self.outgoing_arcs(tail) {
                if self.is_arc_saturated(arc) {
                    continue;
                }
                let arc_length = self.arc_reduced_cost(arc, tail, head);
                assert!(arc_length >= C::zero());
                if arc_length.is_infinite() {
                    continue;
                }
                if arc_length > max_arc_length {
                    max_arc_length = arc_length;
                }
            }
        }
        max_arc_length
    }
}

impl<'g, R, C, F> Network<'g, R, C, F>
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
        + SubAssign
        + Mul<Output = C>
        + From<F>,
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
    /// The objective value: the sum of `cost * flow` over forward arcs.
    pub fn total_cost(&self) -> C {
        let mut total = C::zero();
        for arc in self.residual_graph.forward_arcs() {
            total += self.arc_cost(arc) * C::from(self.arc_flow(arc));
        }
        total
    }
}
