//! Waitlist strategies: the ordering policy over the frontier.
//!
//! A waitlist only stores [`StateId`] handles; the states themselves live in
//! the [`ReachedSet`][crate::reached::ReachedSet] that owns it. The strategy is
//! picked once, at construction time, and injected into the reached set.
//!
//! | Order                     | Pops                                    |
//! |---------------------------|-----------------------------------------|
//! | [`TraversalOrder::Bfs`]         | oldest element first (FIFO)             |
//! | [`TraversalOrder::Dfs`]         | newest element first (LIFO)             |
//! | [`TraversalOrder::Topological`] | smallest rank first, FIFO among equals  |

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use crate::types::StateId;

/// Ordering policy over pending elements.
///
/// Implementations never see duplicates: the reached set only pushes an
/// element that is not currently waiting.
pub trait Waitlist: fmt::Debug {
    /// Add an element. `rank` is the state's topological rank.
    fn push(&mut self, id: StateId, rank: usize);

    /// Remove and return the next element according to the policy.
    fn pop(&mut self) -> Option<StateId>;

    /// Remove a specific element, returning whether it was present.
    fn remove(&mut self, id: StateId) -> bool;

    /// Number of waiting elements.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Waiting elements in pop order.
    fn snapshot(&self) -> Vec<StateId>;

    fn clear(&mut self);
}

/// Breadth-first waitlist.
#[derive(Debug, Default)]
pub struct FifoWaitlist {
    queue: VecDeque<StateId>,
}

impl Waitlist for FifoWaitlist {
    fn push(&mut self, id: StateId, _rank: usize) {
        self.queue.push_back(id);
    }

    fn pop(&mut self) -> Option<StateId> {
        self.queue.pop_front()
    }

    fn remove(&mut self, id: StateId) -> bool {
        match self.queue.iter().position(|&x| x == id) {
            Some(pos) => {
                self.queue.remove(pos);
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn snapshot(&self) -> Vec<StateId> {
        self.queue.iter().copied().collect()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }
}

/// Depth-first waitlist.
#[derive(Debug, Default)]
pub struct LifoWaitlist {
    stack: Vec<StateId>,
}

impl Waitlist for LifoWaitlist {
    fn push(&mut self, id: StateId, _rank: usize) {
        self.stack.push(id);
    }

    fn pop(&mut self) -> Option<StateId> {
        self.stack.pop()
    }

    fn remove(&mut self, id: StateId) -> bool {
        match self.stack.iter().rposition(|&x| x == id) {
            Some(pos) => {
                self.stack.remove(pos);
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.stack.len()
    }

    fn snapshot(&self) -> Vec<StateId> {
        self.stack.iter().rev().copied().collect()
    }

    fn clear(&mut self) {
        self.stack.clear();
    }
}

/// Waitlist ordered by topological rank.
///
/// Keys are `(rank, sequence)`, so elements of equal rank leave in insertion order.
#[derive(Debug, Default)]
pub struct TopologicalWaitlist {
    ordered: BTreeMap<(usize, u64), StateId>,
    keys: HashMap<StateId, (usize, u64)>,
    next_seq: u64,
}

impl Waitlist for TopologicalWaitlist {
    fn push(&mut self, id: StateId, rank: usize) {
        let key = (rank, self.next_seq);
        self.next_seq += 1;
        self.ordered.insert(key, id);
        self.keys.insert(id, key);
    }

    fn pop(&mut self) -> Option<StateId> {
        let (_, id) = self.ordered.pop_first()?;
        self.keys.remove(&id);
        Some(id)
    }

    fn remove(&mut self, id: StateId) -> bool {
        match self.keys.remove(&id) {
            Some(key) => {
                self.ordered.remove(&key);
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.ordered.len()
    }

    fn snapshot(&self) -> Vec<StateId> {
        self.ordered.values().copied().collect()
    }

    fn clear(&mut self) {
        self.ordered.clear();
        self.keys.clear();
    }
}

/// Configured traversal strategy.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum TraversalOrder {
    #[default]
    Bfs,
    Dfs,
    Topological,
}

impl TraversalOrder {
    /// Build an empty waitlist implementing this order.
    pub fn create(self) -> Box<dyn Waitlist> {
        match self {
            TraversalOrder::Bfs => Box::new(FifoWaitlist::default()),
            TraversalOrder::Dfs => Box::new(LifoWaitlist::default()),
            TraversalOrder::Topological => Box::new(TopologicalWaitlist::default()),
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalOrder::Bfs => write!(f, "bfs"),
            TraversalOrder::Dfs => write!(f, "dfs"),
            TraversalOrder::Topological => write!(f, "topological"),
        }
    }
}

impl FromStr for TraversalOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" => Ok(TraversalOrder::Bfs),
            "dfs" => Ok(TraversalOrder::Dfs),
            "topological" | "topsort" => Ok(TraversalOrder::Topological),
            other => Err(format!("Unknown traversal order '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<StateId> {
        (0..n).map(|i| StateId::new(i, 0)).collect()
    }

    fn drain(w: &mut dyn Waitlist) -> Vec<StateId> {
        std::iter::from_fn(|| w.pop()).collect()
    }

    #[test]
    fn test_fifo() {
        let ids = ids(3);
        let mut w = TraversalOrder::Bfs.create();
        for &id in &ids {
            w.push(id, 0);
        }
        assert_eq!(w.len(), 3);
        assert_eq!(w.snapshot(), ids);
        assert_eq!(drain(w.as_mut()), ids);
        assert!(w.is_empty());
    }

    #[test]
    fn test_lifo() {
        let ids = ids(3);
        let mut w = TraversalOrder::Dfs.create();
        for &id in &ids {
            w.push(id, 0);
        }
        let expected: Vec<_> = ids.iter().rev().copied().collect();
        assert_eq!(w.snapshot(), expected);
        assert_eq!(drain(w.as_mut()), expected);
    }

    #[test]
    fn test_topological() {
        let ids = ids(4);
        let mut w = TraversalOrder::Topological.create();
        w.push(ids[0], 5);
        w.push(ids[1], 1);
        w.push(ids[2], 5);
        w.push(ids[3], 0);
        assert_eq!(drain(w.as_mut()), vec![ids[3], ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn test_remove() {
        let ids = ids(3);
        for order in [TraversalOrder::Bfs, TraversalOrder::Dfs, TraversalOrder::Topological] {
            let mut w = order.create();
            for &id in &ids {
                w.push(id, 0);
            }
            assert!(w.remove(ids[1]), "{}", order);
            assert!(!w.remove(ids[1]), "{}", order);
            assert_eq!(w.len(), 2);
            assert!(!drain(w.as_mut()).contains(&ids[1]));
        }
    }

    #[test]
    fn test_parse_order() {
        assert_eq!("bfs".parse::<TraversalOrder>(), Ok(TraversalOrder::Bfs));
        assert_eq!("DFS".parse::<TraversalOrder>(), Ok(TraversalOrder::Dfs));
        assert_eq!("topsort".parse::<TraversalOrder>(), Ok(TraversalOrder::Topological));
        assert!("random".parse::<TraversalOrder>().is_err());
        assert_eq!(TraversalOrder::Topological.to_string(), "topological");
    }
}
