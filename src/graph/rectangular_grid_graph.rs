use super::digraph::Digraph;

/// A 2-dimensional rectangular grid graph.
///
/// An M x N Cartesian grid of vertices, each with `parallel_edges` outgoing
/// edges to each of its four neighboring vertices (except at the
/// boundaries). Vertices are (row,col) index pairs; edges are dense unsigned
/// indices laid out in four contiguous direction bands (up, left, down,
/// right). Within a band, the `parallel_edges` arcs that join the same
/// vertex pair occupy consecutive indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RectangularGridGraph {
    num_rows: usize,
    num_cols: usize,
    parallel_edges: usize,
    // First edge index of the left, down, and right bands.
    edge_offsets: [usize; 3],
}

impl RectangularGridGraph {
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        RectangularGridGraph::with_parallel_edges(num_rows, num_cols, 1)
    }

    pub fn with_parallel_edges(num_rows: usize, num_cols: usize, parallel_edges: usize) -> Self {
        assert!(parallel_edges >= 1);
        let edge_offsets = if num_rows == 0 || num_cols == 0 {
            [0, 0, 0]
        } else {
            let num_ud_edges = parallel_edges * ((num_rows - 1) * num_cols);
            let num_lr_edges = parallel_edges * (num_rows * (num_cols - 1));
            [
                num_ud_edges,
                num_ud_edges + num_lr_edges,
                2 * num_ud_edges + num_lr_edges,
            ]
        };
        RectangularGridGraph {
            num_rows,
            num_cols,
            parallel_edges,
            edge_offsets,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn parallel_edges(&self) -> usize {
        self.parallel_edges
    }

    fn first_up_edge(&self) -> usize {
        0
    }

    fn first_left_edge(&self) -> usize {
        self.edge_offsets[0]
    }

    fn first_down_edge(&self) -> usize {
        self.edge_offsets[1]
    }

    fn first_right_edge(&self) -> usize {
        self.edge_offsets[2]
    }

    /// The first of the parallel edges from `(i,j)` to `(i-1,j)`. Requires
    /// `i > 0`.
    pub fn get_up_edge(&self, (i, j): (usize, usize)) -> usize {
        assert!(self.contains_vertex((i, j)));
        assert!(i > 0);
        self.first_up_edge() + self.parallel_edges * ((i - 1) * self.num_cols + j)
    }

    /// The first of the parallel edges from `(i,j)` to `(i,j-1)`. Requires
    /// `j > 0`.
    pub fn get_left_edge(&self, (i, j): (usize, usize)) -> usize {
        assert!(self.contains_vertex((i, j)));
        assert!(j > 0);
        self.first_left_edge() + self.parallel_edges * (i * (self.num_cols - 1) + (j - 1))
    }

    /// The first of the parallel edges from `(i,j)` to `(i+1,j)`. Requires
    /// `i < num_rows - 1`.
    pub fn get_down_edge(&self, (i, j): (usize, usize)) -> usize {
        assert!(self.contains_vertex((i, j)));
        assert!(i < self.num_rows - 1);
        self.first_down_edge() + self.parallel_edges * (i * self.num_cols + j)
    }

    /// The first of the parallel edges from `(i,j)` to `(i,j+1)`. Requires
    /// `j < num_cols - 1`.
    pub fn get_right_edge(&self, (i, j): (usize, usize)) -> usize {
        assert!(self.contains_vertex((i, j)));
        assert!(j < self.num_cols - 1);
        self.first_right_edge() + self.parallel_edges * (i * (self.num_cols - 1) + j)
    }
}

impl Digraph for RectangularGridGraph {
    type Vertex = (usize, usize);

    fn num_vertices(&self) -> usize {
        self.num_rows * self.num_cols
    }

    fn num_edges(&self) -> usize {
        if self.num_rows == 0 || self.num_cols == 0 {
            return 0;
        }
        let num_ud_edges = (self.num_rows - 1) * self.num_cols;
        let num_lr_edges = self.num_rows * (self.num_cols - 1);
        2 * self.parallel_edges * (num_ud_edges + num_lr_edges)
    }

    fn vertex_id(&self, (i, j): (usize, usize)) -> usize {
        i * self.num_cols + j
    }

    fn contains_vertex(&self, (i, j): (usize, usize)) -> bool {
        i < self.num_rows && j < self.num_cols
    }

    fn outdegree(&self, (i, j): (usize, usize)) -> usize {
        assert!(self.contains_vertex((i, j)));
        let mut neighbors = 4;
        if i == 0 {
            neighbors -= 1;
        }
        if j == 0 {
            neighbors -= 1;
        }
        if i == self.num_rows - 1 {
            neighbors -= 1;
        }
        if j == self.num_cols - 1 {
            neighbors -= 1;
        }
        self.parallel_edges * neighbors
    }

    fn vertices(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let num_cols = self.num_cols;
        (0..self.num_rows).flat_map(move |i| (0..num_cols).map(move |j| (i, j)))
    }

    fn outgoing_edges(
        &self,
        vertex: (usize, usize),
    ) -> impl Iterator<Item = (usize, (usize, usize))> + '_ {
        assert!(self.contains_vertex(vertex));
        OutgoingEdges::new(self, vertex)
    }
}

/// Iterator over the outgoing edges of a grid vertex, in up, left, down,
/// right order with parallel edges consecutive.
pub struct OutgoingEdges {
    // (first edge index, head) per direction that stays on the grid.
    directions: [Option<(usize, (usize, usize))>; 4],
    direction: usize,
    parallel: usize,
    parallel_edges: usize,
}

impl OutgoingEdges {
    fn new(graph: &RectangularGridGraph, (i, j): (usize, usize)) -> Self {
        let up = (i > 0).then(|| (graph.get_up_edge((i, j)), (i - 1, j)));
        let left = (j > 0).then(|| (graph.get_left_edge((i, j)), (i, j - 1)));
        let down = (i < graph.num_rows - 1).then(|| (graph.get_down_edge((i, j)), (i + 1, j)));
        let right = (j < graph.num_cols - 1).then(|| (graph.get_right_edge((i, j)), (i, j + 1)));
        OutgoingEdges {
            directions: [up, left, down, right],
            direction: 0,
            parallel: 0,
            parallel_edges: graph.parallel_edges,
        }
    }
}

impl Iterator for OutgoingEdges {
    type Item = (usize, (usize, usize));

    fn next(&mut self) -> Option<Self::Item> {
        while self.direction < 4 {
            if let Some((first_edge, head)) = self.directions[self.direction] {
                if self.parallel < self.parallel_edges {
                    let edge = first_edge + self.parallel;
                    self.parallel += 1;
                    return Some((edge, head));
                }
            }
            self.direction += 1;
            self.parallel = 0;
        }
        None
    }
}
