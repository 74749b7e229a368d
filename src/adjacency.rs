/*
Grouped adjacency index over a directed edge list.

Edges are sorted by (from, to) and an offset table of length node_count + 1 records where
each node's outgoing run starts, so the neighbours of `n` are the slice
edges[offsets[n]..offsets[n + 1]]. Edges with an endpoint outside 0..node_count are left out.
*/

use crate::dijkstra::{Edge, NodeId};

#[derive(Debug, Clone)]
pub(crate) struct AdjacencyIndex {
    edges: Vec<Edge>,
    offsets: Vec<usize>,
}

impl AdjacencyIndex {
    /// Builds the index for nodes `0..node_count`.
    pub fn new(edges: &[Edge], node_count: usize) -> Self {
        let in_range = |id: NodeId| (id as usize) < node_count;
        let mut sorted: Vec<Edge> = edges
            .iter()
            .filter(|edge| in_range(edge.from) && in_range(edge.to))
            .copied()
            .collect();
        // Stable, so parallel edges keep their input order.
        sorted.sort_by_key(|edge| (edge.from, edge.to));

        let mut offsets = vec![0; node_count + 1];
        for edge in &sorted {
            offsets[edge.from as usize + 1] += 1;
        }
        for i in 0..node_count {
            offsets[i + 1] += offsets[i];
        }

        Self {
            edges: sorted,
            offsets,
        }
    }

    pub fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Outgoing edges of `node`, ordered by destination. Empty for ids outside the index.
    pub fn neighbors(&self, node: NodeId) -> &[Edge] {
        let node = node as usize;
        if node >= self.node_count() {
            return &[];
        }
        &self.edges[self.offsets[node]..self.offsets[node + 1]]
    }
}
