use super::digraph::Digraph;
use super::shortest_path_forest::ShortestPathForest;

/// The operations a shortest-path engine exposes to solver drivers.
///
/// Implemented by [`Dijkstra`](super::dijkstra::Dijkstra) (binary heap) and
/// [`Dial`](super::dial::Dial) (bucket queues). Drivers run the search loop
/// themselves: pop the next unvisited vertex, visit it, then relax its
/// outgoing edges with candidate distances, until `done` reports an empty
/// frontier. Pops arrive in non-decreasing distance order as long as all
/// relaxed edge lengths are non-negative.
pub trait ShortestPathSearch<'g, G: Digraph> {
    type Distance: Copy;

    fn graph(&self) -> &'g G;

    /// The shortest-path forest the search writes into.
    fn forest(&self) -> &ShortestPathForest<'g, G, Self::Distance>;

    /// Adds a root of the shortest-path forest at distance zero. The vertex
    /// must not have been reached yet.
    fn add_source(&mut self, source: G::Vertex);

    /// Inserts a reached vertex into the frontier at the given distance.
    fn push_vertex(&mut self, vertex: G::Vertex, distance: Self::Distance);

    /// Removes and returns the frontier entry with the smallest distance.
    /// The caller must follow up with `visit_vertex` before relaxing.
    fn pop_next_unvisited_vertex(&mut self) -> (G::Vertex, Self::Distance);

    /// Commits a popped vertex: marks it visited at its final distance.
    fn visit_vertex(&mut self, vertex: G::Vertex, distance: Self::Distance);

    /// Unconditionally records `tail` as the predecessor of `head` and
    /// (re-)inserts `head` into the frontier at the given distance.
    fn reach_vertex(
        &mut self,
        edge: usize,
        tail: G::Vertex,
        head: G::Vertex,
        distance: Self::Distance,
    );

    /// Offers `head` a candidate distance via `edge`. Reaches the head and
    /// returns true if the candidate improves on its current distance.
    fn relax_edge(
        &mut self,
        edge: usize,
        tail: G::Vertex,
        head: G::Vertex,
        distance: Self::Distance,
    ) -> bool;

    /// Discards exhausted frontier entries; returns true once no unvisited
    /// vertex remains in the frontier.
    fn done(&mut self) -> bool;

    /// Returns the engine to its initial state without reallocating.
    fn reset(&mut self);
}
