use super::digraph::Digraph;

/// A forest of rooted trees over the vertices of a graph.
///
/// Stores, for every vertex, its predecessor vertex, the edge from the
/// predecessor, and its depth. A vertex whose predecessor is itself (at
/// depth zero) is a root; initially every vertex is a root. Predecessor
/// chains always terminate at a root because `set_predecessor` derives the
/// depth of a vertex from its predecessor's.
pub struct Forest<'g, G: Digraph> {
    graph: &'g G,
    pred_vertex: Vec<G::Vertex>,
    pred_edge: Vec<usize>,
    depth: Vec<usize>,
}

impl<'g, G: Digraph> Forest<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        let pred_vertex: Vec<G::Vertex> = graph.vertices().collect();
        debug_assert_eq!(pred_vertex.len(), graph.num_vertices());
        Forest {
            graph,
            pred_vertex,
            pred_edge: vec![0; graph.num_vertices()],
            depth: vec![0; graph.num_vertices()],
        }
    }

    pub fn graph(&self) -> &'g G {
        self.graph
    }

    pub fn predecessor_vertex(&self, vertex: G::Vertex) -> G::Vertex {
        assert!(self.graph.contains_vertex(vertex));
        self.pred_vertex[self.graph.vertex_id(vertex)]
    }

    pub fn predecessor_edge(&self, vertex: G::Vertex) -> usize {
        assert!(self.graph.contains_vertex(vertex));
        self.pred_edge[self.graph.vertex_id(vertex)]
    }

    /// The (predecessor vertex, predecessor edge) pair of a non-root vertex.
    pub fn predecessor(&self, vertex: G::Vertex) -> (G::Vertex, usize) {
        (
            self.predecessor_vertex(vertex),
            self.predecessor_edge(vertex),
        )
    }

    pub fn is_root_vertex(&self, vertex: G::Vertex) -> bool {
        let root = self.predecessor_vertex(vertex) == vertex;
        debug_assert!(!root || self.depth(vertex) == 0);
        root
    }

    pub fn depth(&self, vertex: G::Vertex) -> usize {
        assert!(self.graph.contains_vertex(vertex));
        self.depth[self.graph.vertex_id(vertex)]
    }

    /// Attaches `vertex` below `pred_vertex` via `pred_edge`.
    pub fn set_predecessor(&mut self, vertex: G::Vertex, pred_vertex: G::Vertex, pred_edge: usize) {
        assert!(self.graph.contains_vertex(vertex));
        assert!(self.graph.contains_vertex(pred_vertex));
        assert!(self.graph.contains_edge(pred_edge));
        let depth = self.depth(pred_vertex) + 1;
        let vertex_id = self.graph.vertex_id(vertex);
        self.pred_vertex[vertex_id] = pred_vertex;
        self.pred_edge[vertex_id] = pred_edge;
        self.depth[vertex_id] = depth;
    }

    /// Detaches `vertex` from its predecessor, making it a root.
    pub fn make_root_vertex(&mut self, vertex: G::Vertex) {
        assert!(self.graph.contains_vertex(vertex));
        let vertex_id = self.graph.vertex_id(vertex);
        self.pred_vertex[vertex_id] = vertex;
        self.pred_edge[vertex_id] = 0;
        self.depth[vertex_id] = 0;
    }

    /// Lazy walk of the (predecessor vertex, predecessor edge) pairs from
    /// `vertex` up to (and including the step onto) its root. Single-pass;
    /// invalidated by any mutation of the forest.
    pub fn predecessors(&self, vertex: G::Vertex) -> Predecessors<'_, 'g, G> {
        assert!(self.graph.contains_vertex(vertex));
        Predecessors {
            forest: self,
            current: vertex,
        }
    }

    /// Makes every vertex a root again.
    pub fn reset(&mut self) {
        for (vertex_id, vertex) in self.graph.vertices().enumerate() {
            self.pred_vertex[vertex_id] = vertex;
            self.pred_edge[vertex_id] = 0;
            self.depth[vertex_id] = 0;
        }
    }
}

pub struct Predecessors<'a, 'g, G: Digraph> {
    forest: &'a Forest<'g, G>,
    current: G::Vertex,
}

impl<'a, 'g, G: Digraph> Iterator for Predecessors<'a, 'g, G> {
    type Item = (G::Vertex, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.forest.is_root_vertex(self.current) {
            return None;
        }
        let pred = self.forest.predecessor(self.current);
        self.current = pred.0;
        Some(pred)
    }
}
