//! Keyed priority queue with pop-min, pop-max and priority updates, plus a point-to-point
//! Dijkstra solver that uses it as its frontier.

mod adjacency;
pub mod dense_ids;
pub mod dijkstra;
pub mod edge_csv;
pub mod priority_queue;

pub use dense_ids::{DenseIds, RawEdge, RawId};
pub use dijkstra::{
    shortest_path, two_way, Cost, DijkstraError, Edge, NodeId, ShortestPath, ShortestPathSolver,
    SolverStatus,
};
pub use priority_queue::{Entry, KeyedPriorityQueue, Priority, QueueError};
