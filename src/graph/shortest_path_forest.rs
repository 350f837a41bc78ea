use super::digraph::Digraph;
use super::forest::{Forest, Predecessors};
use crate::math::traits::Infinity;

/// Search state of a vertex during a shortest-path computation.
///
/// A vertex may be reached multiple times, but is visited at most once;
/// once visited it is never relabeled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VertexLabel {
    Unreached,
    Reached,
    Visited,
}

/// A forest in which each non-root vertex's parent is the predecessor on its
/// shortest path from some source, together with per-vertex labels and
/// distances.
pub struct ShortestPathForest<'g, G: Digraph, D> {
    forest: Forest<'g, G>,
    label: Vec<VertexLabel>,
    distance: Vec<D>,
}

impl<'g, G, D> ShortestPathForest<'g, G, D>
where
    G: Digraph,
    D: Copy + Infinity,
{
    pub fn new(graph: &'g G) -> Self {
        ShortestPathForest {
            forest: Forest::new(graph),
            label: vec![VertexLabel::Unreached; graph.num_vertices()],
            distance: vec![D::infinity(); graph.num_vertices()],
        }
    }

    pub fn graph(&self) -> &'g G {
        self.forest.graph()
    }

    pub fn predecessor_vertex(&self, vertex: G::Vertex) -> G::Vertex {
        self.forest.predecessor_vertex(vertex)
    }

    pub fn predecessor_edge(&self, vertex: G::Vertex) -> usize {
        self.forest.predecessor_edge(vertex)
    }

    pub fn is_root_vertex(&self, vertex: G::Vertex) -> bool {
        self.forest.is_root_vertex(vertex)
    }

    pub fn depth(&self, vertex: G::Vertex) -> usize {
        self.forest.depth(vertex)
    }

    pub fn set_predecessor(&mut self, vertex: G::Vertex, pred_vertex: G::Vertex, pred_edge: usize) {
        self.forest.set_predecessor(vertex, pred_vertex, pred_edge);
    }

    pub fn make_root_vertex(&mut self, vertex: G::Vertex) {
        self.forest.make_root_vertex(vertex);
    }

    pub fn predecessors(&self, vertex: G::Vertex) -> Predecessors<'_, 'g, G> {
        self.forest.predecessors(vertex)
    }

    pub fn has_reached_vertex(&self, vertex: G::Vertex) -> bool {
        assert!(self.graph().contains_vertex(vertex));
        self.label[self.graph().vertex_id(vertex)] != VertexLabel::Unreached
    }

    pub fn has_visited_vertex(&self, vertex: G::Vertex) -> bool {
        assert!(self.graph().contains_vertex(vertex));
        self.label[self.graph().vertex_id(vertex)] == VertexLabel::Visited
    }

    pub fn label_vertex_reached(&mut self, vertex: G::Vertex) {
        assert!(self.graph().contains_vertex(vertex));
        assert!(!self.has_visited_vertex(vertex));
        let vertex_id = self.graph().vertex_id(vertex);
        self.label[vertex_id] = VertexLabel::Reached;
    }

    pub fn label_vertex_visited(&mut self, vertex: G::Vertex) {
        assert!(self.graph().contains_vertex(vertex));
        assert!(!self.has_visited_vertex(vertex));
        let vertex_id = self.graph().vertex_id(vertex);
        self.label[vertex_id] = VertexLabel::Visited;
    }

    pub fn reached_vertices(&self) -> impl Iterator<Item = G::Vertex> + '_ {
        self.graph()
            .vertices()
            .filter(move |&vertex| self.has_reached_vertex(vertex))
    }

    pub fn visited_vertices(&self) -> impl Iterator<Item = G::Vertex> + '_ {
        self.graph()
            .vertices()
            .filter(move |&vertex| self.has_visited_vertex(vertex))
    }

    pub fn distance_to_vertex(&self, vertex: G::Vertex) -> D {
        assert!(self.graph().contains_vertex(vertex));
        self.distance[self.graph().vertex_id(vertex)]
    }

    pub fn set_distance_to_vertex(&mut self, vertex: G::Vertex, distance: D) {
        assert!(self.graph().contains_vertex(vertex));
        let vertex_id = self.graph().vertex_id(vertex);
        self.distance[vertex_id] = distance;
    }

    /// Returns every vertex to the unreached state at infinite distance,
    /// without reallocating.
    pub fn reset(&mut self) {
        self.forest.reset();
        self.label.fill(VertexLabel::Unreached);
        self.distance.fill(D::infinity());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::rectangular_grid_graph::RectangularGridGraph;

    #[test]
    fn label_transitions() {
        let graph = RectangularGridGraph::new(2, 2);
        let mut forest: ShortestPathForest<'_, _, i64> = ShortestPathForest::new(&graph);

        assert!(!forest.has_reached_vertex((0, 0)));
        assert!(!forest.has_visited_vertex((0, 0)));

        forest.label_vertex_reached((0, 0));
        assert!(forest.has_reached_vertex((0, 0)));
        assert!(!forest.has_visited_vertex((0, 0)));

        // Reaching again is allowed before the visit.
        forest.label_vertex_reached((0, 0));

        forest.label_vertex_visited((0, 0));
        assert!(forest.has_reached_vertex((0, 0)));
        assert!(forest.has_visited_vertex((0, 0)));
    }

    #[test]
    fn distances_start_at_infinity() {
        let graph = RectangularGridGraph::new(2, 2);
        let mut forest: ShortestPathForest<'_, _, i64> = ShortestPathForest::new(&graph);
        for vertex in graph.vertices() {
            assert_eq!(forest.distance_to_vertex(vertex), i64::MAX);
        }
        forest.set_distance_to_vertex((1, 1), 42);
        assert_eq!(forest.distance_to_vertex((1, 1)), 42);
    }

    #[test]
    fn filtered_views() {
        let graph = RectangularGridGraph::new(2, 2);
        let mut forest: ShortestPathForest<'_, _, i64> = ShortestPathForest::new(&graph);
        forest.label_vertex_reached((0, 1));
        forest.label_vertex_reached((1, 0));
        forest.label_vertex_visited((1, 0));

        assert_eq!(
            forest.reached_vertices().collect::<Vec<_>>(),
            vec![(0, 1), (1, 0)]
        );
        assert_eq!(forest.visited_vertices().collect::<Vec<_>>(), vec![(1, 0)]);
    }

    #[test]
    fn reset_clears_labels_and_distances() {
        let graph = RectangularGridGraph::new(2, 2);
        let mut forest: ShortestPathForest<'_, _, f64> = ShortestPathForest::new(&graph);
        forest.label_vertex_reached((0, 0));
        forest.set_distance_to_vertex((0, 0), 0.0);
        forest.reset();
        assert!(!forest.has_reached_vertex((0, 0)));
        assert!(forest.distance_to_vertex((0, 0)).is_infinite());
    }
}
