use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Debug;

use super::digraph::Digraph;
use super::shortest_path_forest::ShortestPathForest;
use super::shortest_path_search::ShortestPathSearch;
use crate::math::traits::{Infinity, Zero};

/// A min-heap entry. Ordered by distance only, inverted so that
/// `BinaryHeap` pops the smallest distance first.
struct HeapEntry<V, D> {
    vertex: V,
    distance: D,
}

impl<V, D: PartialOrd> PartialEq for HeapEntry<V, D> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl<V, D: PartialOrd> Eq for HeapEntry<V, D> {}

impl<V, D: PartialOrd> PartialOrd for HeapEntry<V, D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V, D: PartialOrd> Ord for HeapEntry<V, D> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
    }
}

/// Dijkstra's algorithm over non-negative edge lengths, with a binary heap
/// and lazy deletion.
///
/// When a reached vertex is offered a better distance, a fresh heap entry is
/// pushed rather than re-keying the old one; stale entries are skipped at
/// pop time by checking the visited label in [`done`].
///
/// [`done`]: ShortestPathSearch::done
pub struct Dijkstra<'g, G: Digraph, D> {
    forest: ShortestPathForest<'g, G, D>,
    heap: BinaryHeap<HeapEntry<G::Vertex, D>>,
}

impl<'g, G, D> Dijkstra<'g, G, D>
where
    G: Digraph,
    D: Copy + PartialOrd + Zero + Infinity + Debug,
{
    pub fn new(graph: &'g G) -> Self {
        Dijkstra {
            forest: ShortestPathForest::new(graph),
            heap: BinaryHeap::new(),
        }
    }
}

impl<'g, G, D> ShortestPathSearch<'g, G> for Dijkstra<'g, G, D>
where
    G: Digraph,
    D: Copy + PartialOrd + Zero + Infinity + Debug,
{
    type Distance = D;

    fn graph(&self) -> &'g G {
        self.forest.graph()
    }

    fn forest(&self) -> &ShortestPathForest<'g, G, D> {
        &self.forest
    }

    fn add_source(&mut self, source: G::Vertex) {
        assert!(self.graph().contains_vertex(source));
        assert!(!self.forest.has_reached_vertex(source));
        self.forest.make_root_vertex(source);
        self.forest.label_vertex_reached(source);
        self.forest.set_distance_to_vertex(source, D::zero());
        self.push_vertex(source, D::zero());
    }

    fn push_vertex(&mut self, vertex: G::Vertex, distance: D) {
        debug_assert!(self.forest.has_reached_vertex(vertex));
        self.heap.push(HeapEntry { vertex, distance });
    }

    fn pop_next_unvisited_vertex(&mut self) -> (G::Vertex, D) {
        let entry = self
            .heap
            .pop()
            .expect("pop from an empty search frontier");
        debug_assert!(self.forest.has_reached_vertex(entry.vertex));
        debug_assert!(!self.forest.has_visited_vertex(entry.vertex));
        (entry.vertex, entry.distance)
    }

    fn visit_vertex(&mut self, vertex: G::Vertex, distance: D) {
        assert!(self.graph().contains_vertex(vertex));
        assert!(distance >= D::zero());
        debug_assert!(self.forest.has_reached_vertex(vertex));
        self.forest.label_vertex_visited(vertex);
        self.forest.set_distance_to_vertex(vertex, distance);
    }

    fn reach_vertex(&mut self, edge: usize, tail: G::Vertex, head: G::Vertex, distance: D) {
        assert!(self.graph().contains_edge(edge));
        debug_assert!(self.forest.has_visited_vertex(tail));
        debug_assert!(!self.forest.has_visited_vertex(head));
        self.forest.set_predecessor(head, tail, edge);
        debug_assert!(!self.forest.is_root_vertex(head));
        self.forest.label_vertex_reached(head);
        self.forest.set_distance_to_vertex(head, distance);
        self.push_vertex(head, distance);
    }

    fn relax_edge(&mut self, edge: usize, tail: G::Vertex, head: G::Vertex, distance: D) -> bool {
        assert!(self.graph().contains_edge(edge));
        assert!(distance >= D::zero());
        debug_assert!(self.forest.has_visited_vertex(tail));
        debug_assert!(distance >= self.forest.distance_to_vertex(tail));

        // A visited head's committed distance is never improved on, so the
        // comparison below also keeps visited vertices out of the frontier.
        if distance < self.forest.distance_to_vertex(head) {
            self.reach_vertex(edge, tail, head, distance);
            true
        } else {
            false
        }
    }

    fn done(&mut self) -> bool {
        while let Some(entry) = self.heap.peek() {
            if !self.forest.has_visited_vertex(entry.vertex) {
                return false;
            }
            self.heap.pop();
        }
        true
    }

    fn reset(&mut self) {
        self.forest.reset();
        self.heap.clear();
    }
}
