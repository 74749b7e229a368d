//! Property-based tests using proptest
//!
//! Random operation sequences are replayed against `DoublePriorityQueue` from the
//! priority-queue crate, and solver costs are checked against plain Bellman-Ford relaxation.

use ordered_float::OrderedFloat;
use pqroute::{shortest_path, DijkstraError, Edge, Entry, KeyedPriorityQueue, QueueError};
use priority_queue::DoublePriorityQueue;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(i32, f64),
    Remove(i32),
    Set(i32, f64),
    PopMin,
    PopMax,
}

// Half-steps give plenty of ties without rounding noise.
fn priority() -> impl Strategy<Value = f64> {
    prop_oneof![
        9 => (-40i32..40).prop_map(|p| p as f64 / 2.0),
        1 => Just(f64::INFINITY),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    let key = 0i32..24;
    prop_oneof![
        4 => (key.clone(), priority()).prop_map(|(k, p)| Op::Insert(k, p)),
        2 => key.clone().prop_map(Op::Remove),
        2 => (key, priority()).prop_map(|(k, p)| Op::Set(k, p)),
        1 => Just(Op::PopMin),
        1 => Just(Op::PopMax),
    ]
}

fn check_pop(
    popped: Result<Entry<i32>, QueueError>,
    expected: Option<f64>,
    oracle: &mut DoublePriorityQueue<i32, OrderedFloat<f64>>,
) -> Result<(), TestCaseError> {
    match expected {
        None => prop_assert_eq!(popped, Err(QueueError::EmptyQueue)),
        Some(extreme) => {
            let entry = popped.map_err(|e| TestCaseError::fail(e.to_string()))?;
            // Any entry at the extreme priority is acceptable.
            prop_assert_eq!(entry.priority, extreme);
            let removed = oracle.remove(&entry.key);
            prop_assert_eq!(removed, Some((entry.key, OrderedFloat(entry.priority))));
        }
    }
    Ok(())
}

fn replay(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut queue = KeyedPriorityQueue::new();
    let mut oracle: DoublePriorityQueue<i32, OrderedFloat<f64>> = DoublePriorityQueue::new();

    for op in ops {
        match op {
            Op::Insert(key, p) => {
                let before = queue.get_priority(key);
                let result = queue.insert(key, p);
                if oracle.get_priority(&key).is_some() {
                    prop_assert_eq!(result, Err(QueueError::KeyAlreadyExists));
                    prop_assert_eq!(queue.get_priority(key), before);
                } else {
                    prop_assert_eq!(result, Ok(()));
                    oracle.push(key, OrderedFloat(p));
                }
            }
            Op::Remove(key) => match oracle.remove(&key) {
                Some((_, p)) => prop_assert_eq!(queue.remove(key), Ok(Entry { key, priority: p.0 })),
                None => prop_assert_eq!(queue.remove(key), Err(QueueError::KeyNotFound)),
            },
            Op::Set(key, p) => match oracle.change_priority(&key, OrderedFloat(p)) {
                Some(_) => {
                    prop_assert_eq!(queue.set_priority(key, p), Ok(()));
                    prop_assert_eq!(queue.get_priority(key), Ok(p));
                }
                None => prop_assert_eq!(queue.set_priority(key, p), Err(QueueError::KeyNotFound)),
            },
            Op::PopMin => {
                let expected = oracle.peek_min().map(|(_, p)| p.0);
                check_pop(queue.pop_min(), expected, &mut oracle)?;
            }
            Op::PopMax => {
                let expected = oracle.peek_max().map(|(_, p)| p.0);
                check_pop(queue.pop_max(), expected, &mut oracle)?;
            }
        }

        prop_assert_eq!(queue.len(), oracle.len());
        let mut expected: Vec<(i32, f64)> = oracle.iter().map(|(&k, p)| (k, p.0)).collect();
        expected.sort_by_key(|&(k, _)| k);
        let actual: Vec<(i32, f64)> = queue
            .serialize_by_key()
            .iter()
            .map(|e| (e.key, e.priority))
            .collect();
        prop_assert_eq!(actual, expected);
    }
    Ok(())
}

proptest! {
    #[test]
    fn matches_double_priority_queue(ops in prop::collection::vec(op(), 0..200)) {
        replay(ops)?;
    }

    #[test]
    fn drains_in_order(entries in prop::collection::btree_map(any::<i32>(), priority(), 0..100)) {
        let mut queue = KeyedPriorityQueue::new();
        for (&key, &p) in &entries {
            queue.insert(key, p).unwrap();
        }

        let mut mins = queue.clone();
        let mut last = f64::NEG_INFINITY;
        while let Ok(entry) = mins.pop_min() {
            prop_assert!(entry.priority >= last);
            last = entry.priority;
        }

        let mut last = f64::INFINITY;
        while let Ok(entry) = queue.pop_max() {
            prop_assert!(entry.priority <= last);
            last = entry.priority;
        }
        prop_assert!(queue.is_empty());
    }

    #[test]
    fn serializations_agree(entries in prop::collection::btree_map(0u32..1000, priority(), 0..100)) {
        let mut queue = KeyedPriorityQueue::new();
        for (&key, &p) in &entries {
            queue.insert(key, p).unwrap();
        }
        let by_key = queue.serialize_by_key();
        let by_priority = queue.serialize_by_priority();

        prop_assert_eq!(by_key.len(), entries.len());
        prop_assert!(by_key.windows(2).all(|w| w[0].key < w[1].key));
        prop_assert!(by_priority.windows(2).all(|w| w[0].priority <= w[1].priority));

        let mut resorted = by_priority.clone();
        resorted.sort_by_key(|e| e.key);
        prop_assert_eq!(resorted, by_key);
    }
}

fn bellman_ford(edges: &[Edge], node_count: usize, start: u32) -> Vec<f64> {
    let mut dist = vec![f64::INFINITY; node_count];
    dist[start as usize] = 0.0;
    for _ in 0..node_count {
        for edge in edges {
            let candidate = dist[edge.from as usize] + edge.cost;
            if candidate < dist[edge.to as usize] {
                dist[edge.to as usize] = candidate;
            }
        }
    }
    dist
}

fn graph() -> impl Strategy<Value = (usize, Vec<Edge>)> {
    (1usize..10).prop_flat_map(|n| {
        let ids = 0..n as u32;
        let edge = (ids.clone(), ids, 0u32..12).prop_map(|(f, t, c)| Edge::new(f, t, c as f64));
        prop::collection::vec(edge, 0..30).prop_map(move |mut edges| {
            // Self-loops keep every id present without adding a route.
            edges.extend((0..n as u32).map(|id| Edge::new(id, id, 1.0)));
            (n, edges)
        })
    })
}

proptest! {
    #[test]
    fn dijkstra_matches_bellman_ford(
        (n, edges) in graph(),
        start in 0u32..10,
        end in 0u32..10,
    ) {
        let start = start % n as u32;
        let end = end % n as u32;
        let dist = bellman_ford(&edges, n, start);

        match shortest_path(&edges, start, end) {
            Ok(found) => {
                prop_assert_eq!(found.total_cost, dist[end as usize]);
                prop_assert_eq!(found.start(), Some(start));
                prop_assert_eq!(found.end(), Some(end));
                for (i, &id) in found.path.iter().enumerate() {
                    prop_assert_eq!(found.costs[i], dist[id as usize]);
                }
                for pair in found.path.windows(2) {
                    prop_assert!(edges.iter().any(|e| e.from == pair[0]
                        && e.to == pair[1]
                        && dist[pair[0] as usize] + e.cost == dist[pair[1] as usize]));
                }
            }
            Err(err) => {
                prop_assert_eq!(err, DijkstraError::StartEndNotConnected);
                prop_assert!(dist[end as usize].is_infinite());
            }
        }
    }
}
