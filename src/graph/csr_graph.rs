use super::digraph::Digraph;
use super::edge_list::EdgeList;

/// A compressed sparse row (CSR) digraph.
///
/// Vertices and edges are dense unsigned indices. The graph is built from an
/// [`EdgeList`] by sorting its (tail,head) pairs; edge index `e` refers to
/// the `e`-th pair in sorted order. Parallel edges and self-loops are
/// supported.
#[derive(Clone, Debug)]
pub struct CsrGraph {
    row_offsets: Vec<usize>,
    column_indices: Vec<usize>,
}

impl CsrGraph {
    /// Creates an empty graph with no vertices or edges.
    pub fn empty() -> Self {
        CsrGraph {
            row_offsets: vec![0],
            column_indices: vec![],
        }
    }

    /// Builds the graph from a sequence of (tail,head) pairs.
    ///
    /// The number of vertices is one more than the largest vertex index that
    /// appears in the list.
    pub fn new(edge_list: &EdgeList) -> Self {
        if edge_list.is_empty() {
            return CsrGraph::empty();
        }
        let mut pairs: Vec<(usize, usize)> = edge_list.iter().collect();
        pairs.sort();
        CsrGraph::from_sorted_pairs(&pairs)
    }

    /// Builds the graph from pairs already sorted by (tail,head).
    ///
    /// Edge index `e` refers to `pairs[e]`, which lets callers that need a
    /// known edge numbering (the residual-graph builder) control it.
    pub(crate) fn from_sorted_pairs(pairs: &[(usize, usize)]) -> Self {
        debug_assert!(pairs.windows(2).all(|w| w[0].0 <= w[1].0));
        if pairs.is_empty() {
            return CsrGraph::empty();
        }

        let mut row_offsets = vec![0];
        let mut column_indices = Vec::with_capacity(pairs.len());
        let mut max_vertex_id = 0;

        for (edge_count, &(tail, head)) in pairs.iter().enumerate() {
            // Carry the previous offset forward over tails with no edges.
            while row_offsets.len() <= tail {
                row_offsets.push(edge_count);
            }
            column_indices.push(head);
            max_vertex_id = max_vertex_id.max(tail).max(head);
        }

        let num_vertices = max_vertex_id + 1;
        while row_offsets.len() <= num_vertices {
            row_offsets.push(column_indices.len());
        }

        CsrGraph {
            row_offsets,
            column_indices,
        }
    }
}

impl Digraph for CsrGraph {
    type Vertex = usize;

    fn num_vertices(&self) -> usize {
        self.row_offsets.len() - 1
    }

    fn num_edges(&self) -> usize {
        self.column_indices.len()
    }

    fn vertex_id(&self, vertex: usize) -> usize {
        vertex
    }

    fn contains_vertex(&self, vertex: usize) -> bool {
        vertex < self.num_vertices()
    }

    fn outdegree(&self, vertex: usize) -> usize {
        assert!(self.contains_vertex(vertex));
        self.row_offsets[vertex + 1] - self.row_offsets[vertex]
    }

    fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        0..self.num_vertices()
    }

    fn outgoing_edges(&self, vertex: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        assert!(self.contains_vertex(vertex));
        let first = self.row_offsets[vertex];
        let last = self.row_offsets[vertex + 1];
        (first..last).map(move |edge| (edge, self.column_indices[edge]))
    }
}
