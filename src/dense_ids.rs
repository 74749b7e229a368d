/*
Maps arbitrary node ids onto the dense 0..n range the solver needs, and back.

Dense ids are handed out in first-seen order while walking the edges (from, then to).
*/

use crate::dijkstra::{Cost, DijkstraError, Edge, NodeId, ShortestPath};
use hashbrown::HashMap;

pub type RawId = u64;

/// An edge as it appears in the input, before ids are made dense.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawEdge {
    pub from: RawId,
    pub to: RawId,
    pub cost: Cost,
}

impl RawEdge {
    pub fn new(from: RawId, to: RawId, cost: Cost) -> Self {
        Self { from, to, cost }
    }

    /// The same edge with its ids used as-is, if both fit in a `NodeId`.
    pub fn to_edge(&self) -> Option<Edge> {
        let from = NodeId::try_from(self.from).ok()?;
        let to = NodeId::try_from(self.to).ok()?;
        Some(Edge::new(from, to, self.cost))
    }
}

#[derive(Debug, Clone, Default)]
pub struct DenseIds {
    to_dense: HashMap<RawId, NodeId>,
    to_raw: Vec<RawId>,
}

impl DenseIds {
    /// Assigns dense ids to every endpoint in `edges` and returns the rewritten edges.
    pub fn from_edges(edges: &[RawEdge]) -> (Self, Vec<Edge>) {
        let mut ids = Self::default();
        let dense = edges
            .iter()
            .map(|edge| Edge::new(ids.intern(edge.from), ids.intern(edge.to), edge.cost))
            .collect();
        (ids, dense)
    }

    fn intern(&mut self, raw: RawId) -> NodeId {
        let next = self.to_raw.len() as NodeId;
        let to_raw = &mut self.to_raw;
        *self.to_dense.entry(raw).or_insert_with(|| {
            to_raw.push(raw);
            next
        })
    }

    pub fn len(&self) -> usize {
        self.to_raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_raw.is_empty()
    }

    pub fn dense(&self, raw: RawId) -> Option<NodeId> {
        self.to_dense.get(&raw).copied()
    }

    pub fn original(&self, dense: NodeId) -> Option<RawId> {
        self.to_raw.get(dense as usize).copied()
    }

    /// Translates a dense path back to input ids. Ids this map never issued are dropped.
    pub fn to_original(&self, path: &[NodeId]) -> Vec<RawId> {
        path.iter().filter_map(|&id| self.original(id)).collect()
    }

    /// Solves between two input ids over the remapped edges. Unknown endpoints are reported
    /// as `InvalidStart`/`InvalidEnd`.
    pub fn shortest_path(
        &self,
        edges: &[Edge],
        start: RawId,
        end: RawId,
    ) -> Result<(Vec<RawId>, ShortestPath), DijkstraError> {
        if edges.is_empty() {
            return Err(DijkstraError::NoConnections);
        }
        let start = self.dense(start).ok_or(DijkstraError::InvalidStart)?;
        let end = self.dense(end).ok_or(DijkstraError::InvalidEnd)?;
        let found = crate::dijkstra::shortest_path(edges, start, end)?;
        Ok((self.to_original(&found.path), found))
    }
}
