//! Toy analyses shared by the integration tests.
//!
//! - [`Num`] over explicit graphs: every state is a node, its own location.
//! - [`Interval`] over a counting loop: one interval per location, merged by join.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use cpa_rs::prelude::*;

// ─── Explicit graph domain ───────────────────────────────────────────────────

/// Node that counts as a property violation.
pub const ERROR: u32 = 99;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Num(pub u32);

impl AbstractState for Num {
    type Location = u32;

    fn location(&self) -> u32 {
        self.0
    }

    fn is_target(&self) -> bool {
        self.0 == ERROR
    }

    fn topological_rank(&self) -> usize {
        self.0 as usize
    }
}

/// Transfer relation following the edges of an explicit graph.
#[derive(Default)]
pub struct Graph {
    edges: HashMap<u32, Vec<u32>>,
    failing: HashSet<u32>,
    interrupt: Option<(u32, ShutdownNotifier)>,
    expanded: Rc<RefCell<Vec<u32>>>,
}

impl Graph {
    pub fn new(edges: &[(u32, u32)]) -> Self {
        let mut graph = Graph::default();
        for &(from, to) in edges {
            graph.edges.entry(from).or_default().push(to);
        }
        graph
    }

    /// `0 → 1 → … → n`.
    pub fn chain(n: u32) -> Self {
        let edges: Vec<_> = (0..n).map(|i| (i, i + 1)).collect();
        Graph::new(&edges)
    }

    /// Fail when expanding `node`.
    pub fn failing_at(mut self, node: u32) -> Self {
        self.failing.insert(node);
        self
    }

    /// Request a shutdown while expanding `node`.
    pub fn interrupting_at(mut self, node: u32, shutdown: ShutdownNotifier) -> Self {
        self.interrupt = Some((node, shutdown));
        self
    }

    /// Log of expanded nodes, in expansion order.
    pub fn expanded(&self) -> Rc<RefCell<Vec<u32>>> {
        Rc::clone(&self.expanded)
    }
}

impl TransferRelation<Num, ()> for Graph {
    fn abstract_successors(&self, state: &Num, _precision: &()) -> Result<Vec<(Num, ())>> {
        self.expanded.borrow_mut().push(state.0);

        if self.failing.contains(&state.0) {
            return Err(TransferError::new(format!("N{}", state.0), "unsupported construct").into());
        }
        if let Some((node, shutdown)) = &self.interrupt {
            if *node == state.0 {
                shutdown.request_shutdown("interrupted by test");
            }
        }

        Ok(self
            .edges
            .get(&state.0)
            .map(|targets| targets.iter().map(|&t| (Num(t), ())).collect())
            .unwrap_or_default())
    }
}

/// Precision adjustment that prunes some nodes and requests BREAK on others.
#[derive(Default)]
pub struct Marking {
    breaks: HashSet<u32>,
    pruned: HashSet<u32>,
}

impl Marking {
    pub fn breaking_at(mut self, node: u32) -> Self {
        self.breaks.insert(node);
        self
    }

    pub fn pruning(mut self, node: u32) -> Self {
        self.pruned.insert(node);
        self
    }
}

impl PrecisionAdjustment<Num, ()> for Marking {
    fn prec(
        &self,
        state: &Num,
        precision: &(),
        _reached: &ReachedSet<Num, ()>,
        _projection: StateProjection<'_, Num>,
    ) -> Result<Option<PrecisionAdjustmentResult<Num, ()>>> {
        if self.pruned.contains(&state.0) {
            return Ok(None);
        }
        let action = if self.breaks.contains(&state.0) {
            Action::Break
        } else {
            Action::Continue
        };
        Ok(Some(PrecisionAdjustmentResult::new(*state, *precision, action)))
    }
}

/// Merge-sep, stop by equality.
pub fn graph_cpa(graph: Graph) -> Cpa<Num, ()> {
    Cpa::new(graph, MergeSep, StopSep::new(EqualityDomain::new()))
}

pub fn seeded(order: TraversalOrder, initial: &[u32]) -> ReachedSet<Num, ()> {
    let mut reached = ReachedSet::new(order);
    for &n in initial {
        reached.add_initial(Num(n), ());
    }
    reached
}

/// Published node values, sorted.
pub fn nodes(reached: &ReachedSet<Num, ()>) -> Vec<u32> {
    let mut nodes: Vec<_> = reached.states().map(|s| s.0).collect();
    nodes.sort_unstable();
    nodes
}

/// Waiting node values, in pop order.
pub fn waiting(reached: &ReachedSet<Num, ()>) -> Vec<u32> {
    reached.waiting_states().into_iter().map(|s| s.0).collect()
}

// ─── Interval domain ─────────────────────────────────────────────────────────

/// Value range of a single counter `x` at a location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub loc: u32,
    pub lo: i64,
    pub hi: i64,
}

impl Interval {
    pub fn new(loc: u32, lo: i64, hi: i64) -> Self {
        Self { loc, lo, hi }
    }
}

impl AbstractState for Interval {
    type Location = u32;

    fn location(&self) -> u32 {
        self.loc
    }

    fn topological_rank(&self) -> usize {
        self.loc as usize
    }
}

#[derive(Debug, Clone)]
pub struct IntervalDomain;

impl PartialOrder for IntervalDomain {
    type Element = Interval;

    fn le(&self, a: &Interval, b: &Interval) -> bool {
        a.loc == b.loc && b.lo <= a.lo && a.hi <= b.hi
    }
}

impl AbstractDomain for IntervalDomain {
    fn join(&self, a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.loc, a.lo.min(b.lo), a.hi.max(b.hi))
    }
}

/// ```text
/// L0: x = 0;
/// L1: while (x < bound) x++;
/// L2: end
/// ```
pub struct CountingLoop {
    pub bound: i64,
}

impl TransferRelation<Interval, ()> for CountingLoop {
    fn abstract_successors(&self, s: &Interval, _precision: &()) -> Result<Vec<(Interval, ())>> {
        let mut successors = Vec::new();
        match s.loc {
            0 => successors.push((Interval::new(1, 0, 0), ())),
            1 => {
                // assume(x < bound); x++
                if s.lo < self.bound {
                    successors.push((Interval::new(1, s.lo + 1, s.hi.min(self.bound - 1) + 1), ()));
                }
                // assume(x >= bound)
                if s.hi >= self.bound {
                    successors.push((Interval::new(2, s.lo.max(self.bound), s.hi), ()));
                }
            }
            _ => {}
        }
        Ok(successors)
    }
}

// ─── Recording wrappers ──────────────────────────────────────────────────────

/// Merge operator logging every `(reached, merged)` pair that changed something.
pub struct RecordingMerge<M> {
    pub inner: M,
    pub log: Rc<RefCell<Vec<(Interval, Interval)>>>,
}

impl<M> MergeOperator<Interval, ()> for RecordingMerge<M>
where
    M: MergeOperator<Interval, ()>,
{
    fn merge(&self, successor: &Interval, reached: &Interval, precision: &()) -> Result<Interval> {
        let merged = self.inner.merge(successor, reached, precision)?;
        if merged != *reached {
            self.log.borrow_mut().push((*reached, merged));
        }
        Ok(merged)
    }

    fn is_merge_sep(&self) -> bool {
        self.inner.is_merge_sep()
    }
}

/// Stop operator logging every state it declared covered.
pub struct RecordingStop<T> {
    pub inner: T,
    pub covered: Rc<RefCell<Vec<Num>>>,
}

impl<T> StopOperator<Num, ()> for RecordingStop<T>
where
    T: StopOperator<Num, ()>,
{
    fn stop(&self, state: &Num, reached: &[&Num], precision: &()) -> Result<bool> {
        let stop = self.inner.stop(state, reached, precision)?;
        if stop {
            self.covered.borrow_mut().push(*state);
        }
        Ok(stop)
    }
}
