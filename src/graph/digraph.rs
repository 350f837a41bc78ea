use std::fmt::Debug;

/// A directed graph with dense integer edge indices.
///
/// Vertices are represented by a graph-specific type (a dense integer for
/// CSR graphs, a (row,col) pair for grid graphs); every vertex maps to a
/// unique index in `[0, num_vertices)` via `vertex_id`. Edges are plain
/// indices in `[0, num_edges)`. The topology of a graph cannot change after
/// construction.
pub trait Digraph {
    type Vertex: Copy + Eq + Debug;

    /// The total number of vertices in the graph.
    fn num_vertices(&self) -> usize;

    /// The total number of edges in the graph.
    fn num_edges(&self) -> usize;

    /// The unique array index of a vertex, in `[0, num_vertices)`.
    ///
    /// The vertex must be contained in the graph.
    fn vertex_id(&self, vertex: Self::Vertex) -> usize;

    fn contains_vertex(&self, vertex: Self::Vertex) -> bool;

    fn contains_edge(&self, edge: usize) -> bool {
        edge < self.num_edges()
    }

    /// The number of outgoing edges of a vertex.
    fn outdegree(&self, vertex: Self::Vertex) -> usize;

    /// All vertices, in order from smallest vertex index to largest.
    fn vertices(&self) -> impl Iterator<Item = Self::Vertex> + '_;

    /// All edges, in order from smallest edge index to largest.
    fn edges(&self) -> std::ops::Range<usize> {
        0..self.num_edges()
    }

    /// Ordered (edge,head) pairs over all edges emanating from `vertex`.
    fn outgoing_edges(
        &self,
        vertex: Self::Vertex,
    ) -> impl Iterator<Item = (usize, Self::Vertex)> + '_;
}
