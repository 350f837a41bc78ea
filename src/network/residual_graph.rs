use crate::graph::csr_graph::CsrGraph;
use crate::graph::digraph::Digraph;
use crate::graph::edge_list::EdgeList;
use crate::graph::rectangular_grid_graph::RectangularGridGraph;
use crate::math::numbers::is_even;

/// The residual graph of a base graph.
///
/// Every edge (u,v) of the base graph contributes two arcs: a *forward* arc
/// (u,v) and a *reverse* arc (v,u), so the residual graph has twice as many
/// edges. Forward and reverse arcs are paired by the transpose relation,
/// which is an involution.
pub trait ResidualGraph: Digraph {
    fn num_forward_arcs(&self) -> usize {
        debug_assert!(is_even(self.num_edges()));
        self.num_edges() / 2
    }

    /// Whether an arc comes from the base graph (rather than having been
    /// added for flow reversal).
    fn is_forward_arc(&self, arc: usize) -> bool;

    /// The arc index of the forward arc corresponding to a base-graph edge.
    fn residual_arc_id(&self, edge_id: usize) -> usize;

    /// The base-graph edge index an arc corresponds to. For a reverse arc,
    /// the edge of its forward partner.
    fn original_edge_id(&self, arc: usize) -> usize;

    /// The arc index of the transpose of an arc (the paired arc joining the
    /// same two nodes in the opposite direction).
    fn transpose_arc_id(&self, arc: usize) -> usize;

    fn forward_arcs(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges().filter(|&arc| self.is_forward_arc(arc))
    }
}

/// Residual graph of a rectangular grid graph: the same grid with doubled
/// parallel-edge multiplicity, so that every adjacency slot interleaves
/// (forward, reverse) pairs and no lookup tables are needed.
///
/// Forward arcs are exactly the even arc indices. The up/left bands mirror
/// the down/right bands at an offset of half the arc count, which gives the
/// transpose arc of `a` in closed form as `a ± (num_forward_arcs ± 1)`.
#[derive(Clone, Copy, Debug)]
pub struct GridResidualGraph {
    graph: RectangularGridGraph,
}

impl GridResidualGraph {
    pub fn new(base: &RectangularGridGraph) -> Self {
        GridResidualGraph {
            graph: RectangularGridGraph::with_parallel_edges(
                base.num_rows(),
                base.num_cols(),
                2 * base.parallel_edges(),
            ),
        }
    }

    /// The underlying doubled grid, for direction-band arc lookups.
    pub fn grid(&self) -> &RectangularGridGraph {
        &self.graph
    }

    pub fn num_rows(&self) -> usize {
        self.graph.num_rows()
    }

    pub fn num_cols(&self) -> usize {
        self.graph.num_cols()
    }
}

impl Digraph for GridResidualGraph {
    type Vertex = (usize, usize);

    fn num_vertices(&self) -> usize {
        self.graph.num_vertices()
    }

    fn num_edges(&self) -> usize {
        self.graph.num_edges()
    }

    fn vertex_id(&self, vertex: (usize, usize)) -> usize {
        self.graph.vertex_id(vertex)
    }

    fn contains_vertex(&self, vertex: (usize, usize)) -> bool {
        self.graph.contains_vertex(vertex)
    }

    fn outdegree(&self, vertex: (usize, usize)) -> usize {
        self.graph.outdegree(vertex)
    }

    fn vertices(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph.vertices()
    }

    fn outgoing_edges(
        &self,
        vertex: (usize, usize),
    ) -> impl Iterator<Item = (usize, (usize, usize))> + '_ {
        self.graph.outgoing_edges(vertex)
    }
}

impl ResidualGraph for GridResidualGraph {
    fn is_forward_arc(&self, arc: usize) -> bool {
        assert!(self.contains_edge(arc));
        is_even(arc)
    }

    fn residual_arc_id(&self, edge_id: usize) -> usize {
        2 * edge_id
    }

    fn original_edge_id(&self, arc: usize) -> usize {
        assert!(self.contains_edge(arc));
        if self.is_forward_arc(arc) {
            arc / 2
        } else {
            // A reverse arc shares its slot with the forward arc of the
            // opposite-direction edge; its own base edge is its transpose's.
            self.transpose_arc_id(arc) / 2
        }
    }

    fn transpose_arc_id(&self, arc: usize) -> usize {
        assert!(self.contains_edge(arc));
        let num_forward = self.num_forward_arcs();
        debug_assert!(num_forward >= 1);
        if self.is_forward_arc(arc) {
            if arc < num_forward {
                arc + num_forward + 1
            } else {
                arc - num_forward + 1
            }
        } else if arc < num_forward {
            arc + num_forward - 1
        } else {
            arc - num_forward - 1
        }
    }
}

/// Residual graph of a CSR digraph, carrying the forward/reverse and
/// transpose relations as lookup tables.
#[derive(Clone, Debug)]
pub struct CsrResidualGraph {
    graph: CsrGraph,
    is_forward: Vec<bool>,
    edge_of_arc: Vec<usize>,
    transpose_of_arc: Vec<usize>,
    arc_of_edge: Vec<usize>,
}

impl CsrResidualGraph {
    /// Builds the residual graph of the digraph described by `edge_list`.
    ///
    /// Edge index `e` of the base graph refers to the `e`-th pair of the
    /// list after sorting by (tail,head), matching
    /// [`CsrGraph::new`](crate::graph::csr_graph::CsrGraph::new).
    pub fn new(edge_list: &EdgeList) -> Self {
        let mut base_pairs: Vec<(usize, usize)> = edge_list.iter().collect();
        base_pairs.sort();
        let num_base_edges = base_pairs.len();

        // Forward arcs carry their base-edge index; reverse arcs carry the
        // base-edge index + E. Sorting by (tail,head,index) fixes the arc
        // numbering while remembering where every arc came from.
        let mut triples: Vec<(usize, usize, usize)> = Vec::with_capacity(2 * num_base_edges);
        for (edge_id, &(tail, head)) in base_pairs.iter().enumerate() {
            triples.push((tail, head, edge_id));
            triples.push((head, tail, num_base_edges + edge_id));
        }
        triples.sort();

        let sorted_pairs: Vec<(usize, usize)> =
            triples.iter().map(|&(tail, head, _)| (tail, head)).collect();
        let graph = CsrGraph::from_sorted_pairs(&sorted_pairs);

        let num_arcs = triples.len();
        let mut arc_of_origin = vec![0; num_arcs];
        for (arc, &(_, _, origin)) in triples.iter().enumerate() {
            arc_of_origin[origin] = arc;
        }

        let mut is_forward = vec![false; num_arcs];
        let mut edge_of_arc = vec![0; num_arcs];
        let mut transpose_of_arc = vec![0; num_arcs];
        for (arc, &(_, _, origin)) in triples.iter().enumerate() {
            is_forward[arc] = origin < num_base_edges;
            edge_of_arc[arc] = origin % num_base_edges;
            let transpose_origin = (origin + num_base_edges) % (2 * num_base_edges);
            transpose_of_arc[arc] = arc_of_origin[transpose_origin];
        }
        let arc_of_edge = arc_of_origin[..num_base_edges].to_vec();

        CsrResidualGraph {
            graph,
            is_forward,
            edge_of_arc,
            transpose_of_arc,
            arc_of_edge,
        }
    }
}

impl Digraph for CsrResidualGraph {
    type Vertex = usize;

    fn num_vertices(&self) -> usize {
        self.graph.num_vertices()
    }

    fn num_edges(&self) -> usize {
        self.graph.num_edges()
    }

    fn vertex_id(&self, vertex: usize) -> usize {
        self.graph.vertex_id(vertex)
    }

    fn contains_vertex(&self, vertex: usize) -> bool {
        self.graph.contains_vertex(vertex)
    }

    fn outdegree(&self, vertex: usize) -> usize {
        self.graph.outdegree(vertex)
    }

    fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.graph.vertices()
    }

    fn outgoing_edges(&self, vertex: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph.outgoing_edges(vertex)
    }
}

impl ResidualGraph for CsrResidualGraph {
    fn is_forward_arc(&self, arc: usize) -> bool {
        assert!(self.contains_edge(arc));
        self.is_forward[arc]
    }

    fn residual_arc_id(&self, edge_id: usize) -> usize {
        assert!(edge_id < self.arc_of_edge.len());
        self.arc_of_edge[edge_id]
    }

    fn original_edge_id(&self, arc: usize) -> usize {
        assert!(self.contains_edge(arc));
        self.edge_of_arc[arc]
    }

    fn transpose_arc_id(&self, arc: usize) -> usize {
        assert!(self.contains_edge(arc));
        self.transpose_of_arc[arc]
    }
}
