/*
Point-to-point Dijkstra over a directed edge list.

Node ids must be dense: every id in 0..=max_id has to appear on some edge. The frontier is a
KeyedPriorityQueue seeded with every node (start at 0, the rest at infinity); relaxation lowers
a neighbour's priority in place with set_priority. Popping an infinite priority means the rest
of the queue is unreachable from start.
*/

use crate::adjacency::AdjacencyIndex;
use crate::priority_queue::{KeyedPriorityQueue, QueueError};
use log::debug;
use std::borrow::Cow;
use std::fmt;

pub type NodeId = u32;
pub type Cost = f64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub cost: Cost,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, cost: Cost) -> Self {
        Self { from, to, cost }
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.to, self.from, self.cost)
    }
}

/// Returns `edges` followed by every edge reversed, for treating an undirected graph as directed.
pub fn two_way(edges: &[Edge]) -> Vec<Edge> {
    let mut out = Vec::with_capacity(edges.len() * 2);
    out.extend_from_slice(edges);
    out.extend(edges.iter().map(Edge::reversed));
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DijkstraError {
    NoConnections,
    NegativeCost,
    MissingNodeId,
    InvalidStart,
    InvalidEnd,
    StartEndNotConnected,
    /// The frontier rejected an operation. Not produced for validated input.
    Queue(QueueError),
}

impl fmt::Display for DijkstraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConnections => write!(f, "no connections given"),
            Self::NegativeCost => write!(f, "there cannot be negative costs"),
            Self::MissingNodeId => write!(f, "node id numbers must be consecutive"),
            Self::InvalidStart => write!(f, "start node is not included in the data"),
            Self::InvalidEnd => write!(f, "end node is not included in the data"),
            Self::StartEndNotConnected => {
                write!(f, "the network does not have the start and end nodes connected")
            }
            Self::Queue(err) => write!(f, "frontier queue: {}", err),
        }
    }
}

impl std::error::Error for DijkstraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Queue(err) => Some(err),
            _ => None,
        }
    }
}

impl From<QueueError> for DijkstraError {
    fn from(err: QueueError) -> Self {
        Self::Queue(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    /// Node ids from start to end, both included.
    pub path: Vec<NodeId>,
    /// Cost from start of each node in `path`.
    pub costs: Vec<Cost>,
    pub total_cost: Cost,
}

impl ShortestPath {
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn start(&self) -> Option<NodeId> {
        self.path.first().copied()
    }

    pub fn end(&self) -> Option<NodeId> {
        self.path.last().copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolverStatus {
    Init,
    Validating,
    Running,
    Rejected(DijkstraError),
    Found(ShortestPath),
    Unreachable(DijkstraError),
}

impl SolverStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Rejected(_) | Self::Found(_) | Self::Unreachable(_)
        )
    }
}

/// Owns an edge list and solves one start/end query at a time, recording how the last
/// query ended.
#[derive(Debug, Clone)]
pub struct ShortestPathSolver {
    edges: Vec<Edge>,
    two_way: bool,
    status: SolverStatus,
}

impl ShortestPathSolver {
    pub fn new(edges: Vec<Edge>) -> Self {
        Self {
            edges,
            two_way: false,
            status: SolverStatus::Init,
        }
    }

    /// Mirror every edge before solving.
    pub fn two_way(mut self, two_way: bool) -> Self {
        self.two_way = two_way;
        self
    }

    pub fn status(&self) -> &SolverStatus {
        &self.status
    }

    pub fn solve(&mut self, start: NodeId, end: NodeId) -> Result<ShortestPath, DijkstraError> {
        self.status = SolverStatus::Validating;
        let edges: Cow<[Edge]> = if self.two_way {
            Cow::Owned(two_way(&self.edges))
        } else {
            Cow::Borrowed(self.edges.as_slice())
        };

        let node_count = match validate(&edges, start, end) {
            Ok(node_count) => node_count,
            Err(err) => {
                debug!("rejected {} -> {}: {}", start, end, err);
                self.status = SolverStatus::Rejected(err);
                return Err(err);
            }
        };

        self.status = SolverStatus::Running;
        match search(&edges, node_count, start, end) {
            Ok(found) => {
                self.status = SolverStatus::Found(found.clone());
                Ok(found)
            }
            Err(err) => {
                self.status = SolverStatus::Unreachable(err);
                Err(err)
            }
        }
    }
}

/// Minimum-cost path from `start` to `end` over the directed `edges`.
pub fn shortest_path(
    edges: &[Edge],
    start: NodeId,
    end: NodeId,
) -> Result<ShortestPath, DijkstraError> {
    let node_count = validate(edges, start, end)?;
    search(edges, node_count, start, end)
}

// Returns the node count on success. Checks run in a fixed order and the first failure wins.
fn validate(edges: &[Edge], start: NodeId, end: NodeId) -> Result<usize, DijkstraError> {
    if edges.is_empty() {
        return Err(DijkstraError::NoConnections);
    }
    // Also catches NaN.
    if edges.iter().any(|edge| !(edge.cost >= 0.0)) {
        return Err(DijkstraError::NegativeCost);
    }

    let max_id = edges
        .iter()
        .map(|edge| edge.from.max(edge.to))
        .max()
        .unwrap_or(0) as usize;
    // Each edge names at most two ids, so a wider range must have a gap.
    if max_id >= 2 * edges.len() {
        return Err(DijkstraError::MissingNodeId);
    }
    let mut seen = vec![false; max_id + 1];
    for edge in edges {
        seen[edge.from as usize] = true;
        seen[edge.to as usize] = true;
    }
    if seen.iter().any(|present| !present) {
        return Err(DijkstraError::MissingNodeId);
    }

    if start as usize > max_id {
        return Err(DijkstraError::InvalidStart);
    }
    if end as usize > max_id {
        return Err(DijkstraError::InvalidEnd);
    }
    Ok(max_id + 1)
}

#[derive(Debug, Clone, Copy)]
struct Node {
    predecessor: Option<NodeId>,
    min_cost_from_start: Cost,
    visited: bool,
}

impl Node {
    fn unreached() -> Self {
        Self {
            predecessor: None,
            min_cost_from_start: f64::INFINITY,
            visited: false,
        }
    }
}

fn search(
    edges: &[Edge],
    node_count: usize,
    start: NodeId,
    end: NodeId,
) -> Result<ShortestPath, DijkstraError> {
    let index = AdjacencyIndex::new(edges, node_count);
    let mut nodes = vec![Node::unreached(); node_count];
    nodes[start as usize].min_cost_from_start = 0.0;

    let mut frontier: KeyedPriorityQueue<NodeId> = KeyedPriorityQueue::with_capacity(node_count);
    for (id, node) in (0..).zip(&nodes) {
        frontier.insert(id, node.min_cost_from_start)?;
    }
    debug!(
        "searching {} -> {} over {} nodes, {} edges",
        start,
        end,
        node_count,
        index.edge_count()
    );

    let mut relaxations = 0usize;
    loop {
        let current = match frontier.pop_min() {
            Ok(entry) => entry,
            Err(QueueError::EmptyQueue) => return Err(DijkstraError::StartEndNotConnected),
            Err(err) => return Err(err.into()),
        };
        if current.priority == f64::INFINITY {
            debug!(
                "{} unreachable from {}; {} nodes left unreached",
                end,
                start,
                frontier.len() + 1
            );
            return Err(DijkstraError::StartEndNotConnected);
        }

        let id = current.key;
        nodes[id as usize].visited = true;
        if id == end {
            break;
        }

        let cost_to_current = nodes[id as usize].min_cost_from_start;
        for edge in index.neighbors(id) {
            let next = &mut nodes[edge.to as usize];
            if next.visited {
                continue;
            }
            let candidate = cost_to_current + edge.cost;
            if candidate < next.min_cost_from_start {
                next.min_cost_from_start = candidate;
                next.predecessor = Some(id);
                frontier.set_priority(edge.to, candidate)?;
                relaxations += 1;
            }
        }
    }

    let mut path = vec![end];
    let mut current = end;
    while current != start {
        current = nodes[current as usize]
            .predecessor
            .ok_or(DijkstraError::StartEndNotConnected)?;
        path.push(current);
    }
    path.reverse();

    let costs: Vec<Cost> = path
        .iter()
        .map(|&id| nodes[id as usize].min_cost_from_start)
        .collect();
    let total_cost = nodes[end as usize].min_cost_from_start;
    debug!(
        "found {} -> {} in {} hops, cost {}, {} relaxations",
        start,
        end,
        path.len() - 1,
        total_cost,
        relaxations
    );

    Ok(ShortestPath {
        path,
        costs,
        total_cost,
    })
}
