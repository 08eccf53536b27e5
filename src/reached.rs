//! The reached set: every published `(state, precision)` pair plus the frontier.
//!
//! ## Layout
//!
//! - Pairs live in a slot arena and are addressed by [`StateId`] handles.
//! - A partition index maps each location to the handles published there, so
//!   merge and stop candidates are found without scanning the whole set.
//! - The waitlist is the subset of handles still to be expanded; its ordering
//!   is the injected [`Waitlist`] strategy.
//! - "States to add" is a seed batch that is not part of the set yet. The
//!   algorithm drains it before it touches the waitlist.
//!
//! ## Invariants
//!
//! - Every pair that is not waiting has been expanded: all of its successors
//!   were either absorbed by merge/stop or published.
//! - A handle is waiting at most once.
//! - No two published states in one partition are equal.
//!
//! The reached set itself never fails; it is pure bookkeeping and assumes a
//! single owner for the duration of a run.

use std::collections::HashMap;
use std::fmt;

use log::trace;

use crate::state::{AbstractState, Precision};
use crate::storage::Storage;
use crate::types::StateId;
use crate::waitlist::{TraversalOrder, Waitlist};

struct Entry<S, P> {
    state: S,
    precision: P,
    waiting: bool,
}

pub struct ReachedSet<S, P>
where
    S: AbstractState,
    P: Precision,
{
    storage: Storage<Entry<S, P>>,
    partitions: HashMap<S::Location, Vec<StateId>>,
    waitlist: Box<dyn Waitlist>,
    states_to_add: Vec<(S, P)>,
    first: Option<StateId>,
    last: Option<StateId>,
}

impl<S, P> ReachedSet<S, P>
where
    S: AbstractState,
    P: Precision,
{
    /// Create an empty reached set whose waitlist follows `order`.
    pub fn new(order: TraversalOrder) -> Self {
        Self::with_waitlist(order.create())
    }

    /// Create an empty reached set with a custom waitlist strategy.
    pub fn with_waitlist(waitlist: Box<dyn Waitlist>) -> Self {
        assert!(waitlist.is_empty(), "Injected waitlist must be empty");
        Self {
            storage: Storage::new(),
            partitions: HashMap::new(),
            waitlist,
            states_to_add: Vec::new(),
            first: None,
            last: None,
        }
    }
}

impl<S, P> Default for ReachedSet<S, P>
where
    S: AbstractState,
    P: Precision,
{
    fn default() -> Self {
        ReachedSet::new(TraversalOrder::default())
    }
}

impl<S, P> fmt::Debug for ReachedSet<S, P>
where
    S: AbstractState,
    P: Precision,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReachedSet")
            .field("size", &self.len())
            .field("waiting", &self.waitlist_size())
            .field("partitions", &self.partition_count())
            .field("states_to_add", &self.states_to_add.len())
            .finish()
    }
}

// ─── Seeding ───

impl<S, P> ReachedSet<S, P>
where
    S: AbstractState,
    P: Precision,
{
    /// Schedule an initial pair; it is published when the next run starts.
    pub fn add_initial(&mut self, state: S, precision: P) {
        self.states_to_add.push((state, precision));
    }

    pub fn has_states_to_add(&self) -> bool {
        !self.states_to_add.is_empty()
    }

    /// Drain the seed batch.
    pub fn take_states_to_add(&mut self) -> Vec<(S, P)> {
        std::mem::take(&mut self.states_to_add)
    }
}

// ─── Publishing and removal ───

impl<S, P> ReachedSet<S, P>
where
    S: AbstractState,
    P: Precision,
{
    /// Publish a pair into the set and enqueue it.
    ///
    /// If an equal state is already published, its precision is replaced and
    /// it is re-enqueued only when the precision actually changed.
    pub fn add(&mut self, state: S, precision: P) -> StateId {
        if let Some(id) = self.find(&state) {
            let changed = match self.storage.get_mut(id) {
                Some(entry) if entry.precision != precision => {
                    entry.precision = precision;
                    true
                }
                _ => false,
            };
            if changed {
                self.add_to_waitlist(id);
            }
            self.last = Some(id);
            return id;
        }

        let location = state.location();
        let id = self.storage.add(Entry {
            state,
            precision,
            waiting: false,
        });
        self.partitions.entry(location).or_default().push(id);
        self.add_to_waitlist(id);

        if self.first.is_none() {
            self.first = Some(id);
        }
        self.last = Some(id);
        trace!("Published {}", id);

        id
    }

    /// Remove a pair, wherever it is. Returns the removed pair.
    pub fn remove_id(&mut self, id: StateId) -> Option<(S, P)> {
        let entry = self.storage.remove(id)?;

        let location = entry.state.location();
        if let Some(ids) = self.partitions.get_mut(&location) {
            ids.retain(|&x| x != id);
            if ids.is_empty() {
                self.partitions.remove(&location);
            }
        }
        if entry.waiting {
            self.waitlist.remove(id);
        }
        if self.first == Some(id) {
            self.first = None;
        }
        if self.last == Some(id) {
            self.last = None;
        }
        trace!("Removed {}", id);

        Some((entry.state, entry.precision))
    }

    /// Remove the published state equal to `state`, returning whether there was one.
    pub fn remove(&mut self, state: &S) -> bool {
        match self.find(state) {
            Some(id) => self.remove_id(id).is_some(),
            None => false,
        }
    }

    /// Replace a batch of pairs in one step: first remove, then publish.
    ///
    /// Used by merge to swap reached states for their merged successors.
    pub fn update(&mut self, to_remove: Vec<StateId>, to_add: Vec<(S, P)>) {
        for id in to_remove {
            self.remove_id(id);
        }
        for (state, precision) in to_add {
            self.add(state, precision);
        }
    }

    /// Replace the precision of a published pair and re-enqueue it.
    pub fn update_precision(&mut self, id: StateId, precision: P) -> bool {
        match self.storage.get_mut(id) {
            Some(entry) => {
                entry.precision = precision;
            }
            None => return false,
        }
        self.add_to_waitlist(id);
        true
    }

    /// Forget everything, including the seed batch.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.partitions.clear();
        self.waitlist.clear();
        self.states_to_add.clear();
        self.first = None;
        self.last = None;
    }
}

// ─── Waitlist ───

impl<S, P> ReachedSet<S, P>
where
    S: AbstractState,
    P: Precision,
{
    pub fn has_waiting_state(&self) -> bool {
        !self.waitlist.is_empty()
    }

    pub fn waitlist_size(&self) -> usize {
        self.waitlist.len()
    }

    /// Pop the next element according to the waitlist strategy.
    ///
    /// The pair stays in the set; it only leaves the frontier.
    pub fn pop_from_waitlist(&mut self) -> Option<StateId> {
        while let Some(id) = self.waitlist.pop() {
            if let Some(entry) = self.storage.get_mut(id) {
                entry.waiting = false;
                return Some(id);
            }
        }
        None
    }

    /// Put a published pair back into the frontier.
    ///
    /// Returns false if the handle no longer refers to a published pair.
    /// Re-adding a pair that is already waiting is a no-op.
    pub fn add_to_waitlist(&mut self, id: StateId) -> bool {
        let entry = match self.storage.get_mut(id) {
            Some(entry) => entry,
            None => return false,
        };
        if !entry.waiting {
            entry.waiting = true;
            let rank = entry.state.topological_rank();
            self.waitlist.push(id, rank);
        }
        true
    }

    pub fn is_waiting(&self, id: StateId) -> bool {
        self.storage.get(id).map_or(false, |entry| entry.waiting)
    }

    /// Waiting elements in pop order.
    pub fn waitlist(&self) -> Vec<StateId> {
        self.waitlist.snapshot()
    }

    /// States of the waiting elements in pop order.
    pub fn waiting_states(&self) -> Vec<&S> {
        self.waitlist
            .snapshot()
            .into_iter()
            .filter_map(|id| self.state(id))
            .collect()
    }
}

// ─── Queries ───

impl<S, P> ReachedSet<S, P>
where
    S: AbstractState,
    P: Precision,
{
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn state(&self, id: StateId) -> Option<&S> {
        self.storage.get(id).map(|entry| &entry.state)
    }

    pub fn precision(&self, id: StateId) -> Option<&P> {
        self.storage.get(id).map(|entry| &entry.precision)
    }

    pub fn get(&self, id: StateId) -> Option<(&S, &P)> {
        self.storage
            .get(id)
            .map(|entry| (&entry.state, &entry.precision))
    }

    /// Handles of the published states sharing the partition of `state`.
    pub fn reached_ids(&self, state: &S) -> Vec<StateId> {
        self.partitions
            .get(&state.location())
            .cloned()
            .unwrap_or_default()
    }

    /// Merge and stop candidates for `state`: the published states of its partition.
    pub fn get_reached(&self, state: &S) -> Vec<&S> {
        self.partitions
            .get(&state.location())
            .map(|ids| ids.iter().filter_map(|&id| self.state(id)).collect())
            .unwrap_or_default()
    }

    /// Handle of the published state equal to `state`.
    pub fn find(&self, state: &S) -> Option<StateId> {
        self.partitions
            .get(&state.location())?
            .iter()
            .copied()
            .find(|&id| self.state(id) == Some(state))
    }

    pub fn contains(&self, state: &S) -> bool {
        self.find(state).is_some()
    }

    /// All published pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &S, &P)> + '_ {
        self.storage
            .iter()
            .map(|(id, entry)| (id, &entry.state, &entry.precision))
    }

    pub fn states(&self) -> impl Iterator<Item = &S> + '_ {
        self.storage.iter().map(|(_, entry)| &entry.state)
    }

    /// The first state ever published, unless it was removed since.
    pub fn first_state(&self) -> Option<&S> {
        self.first.and_then(|id| self.state(id))
    }

    /// The most recently published state, unless it was removed since.
    pub fn last_state(&self) -> Option<&S> {
        self.last.and_then(|id| self.state(id))
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn max_partition_size(&self) -> usize {
        self.partitions.values().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    /// `(location, value)` pairs partitioned by location.
    #[derive(Debug, Clone, PartialEq)]
    struct Loc(u32, i64);

    impl AbstractState for Loc {
        type Location = u32;

        fn location(&self) -> u32 {
            self.0
        }

        fn topological_rank(&self) -> usize {
            self.0 as usize
        }
    }

    #[test]
    fn test_seed_and_drain() {
        let mut reached = ReachedSet::<Loc, ()>::default();
        reached.add_initial(Loc(0, 0), ());

        assert!(reached.has_states_to_add());
        assert!(reached.is_empty());

        let seed = reached.take_states_to_add();
        assert_eq!(seed, vec![(Loc(0, 0), ())]);
        assert!(!reached.has_states_to_add());
    }

    #[test]
    fn test_add_enqueues() {
        let mut reached = ReachedSet::<Loc, ()>::default();
        let a = reached.add(Loc(0, 0), ());
        let b = reached.add(Loc(1, 0), ());

        assert_eq!(reached.len(), 2);
        assert_eq!(reached.waitlist(), vec![a, b]);
        assert!(reached.is_waiting(a));

        assert_eq!(reached.pop_from_waitlist(), Some(a));
        assert!(!reached.is_waiting(a));
        assert!(reached.contains(&Loc(0, 0)));
        assert_eq!(reached.waitlist_size(), 1);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut reached = ReachedSet::<Loc, u8>::default();
        let a = reached.add(Loc(0, 0), 1);
        reached.pop_from_waitlist();

        // Same state and precision: nothing changes.
        assert_eq!(reached.add(Loc(0, 0), 1), a);
        assert_eq!(reached.len(), 1);
        assert!(!reached.has_waiting_state());

        // New precision: re-enqueued with the new value.
        assert_eq!(reached.add(Loc(0, 0), 2), a);
        assert_eq!(reached.precision(a), Some(&2));
        assert!(reached.is_waiting(a));
    }

    #[test]
    fn test_partitions() {
        let mut reached = ReachedSet::<Loc, ()>::default();
        reached.add(Loc(0, 0), ());
        reached.add(Loc(1, 0), ());
        reached.add(Loc(1, 5), ());

        let candidates = reached.get_reached(&Loc(1, 7));
        assert_eq!(candidates, vec![&Loc(1, 0), &Loc(1, 5)]);
        assert!(reached.get_reached(&Loc(2, 0)).is_empty());
        assert_eq!(reached.partition_count(), 2);
        assert_eq!(reached.max_partition_size(), 2);
    }

    #[test]
    fn test_remove() {
        let mut reached = ReachedSet::<Loc, ()>::default();
        let a = reached.add(Loc(0, 0), ());
        let b = reached.add(Loc(0, 1), ());

        assert!(reached.remove(&Loc(0, 0)));
        assert!(!reached.remove(&Loc(0, 0)));
        assert_eq!(reached.state(a), None);
        assert_eq!(reached.waitlist(), vec![b]);
        assert_eq!(reached.first_state(), None);
        assert_eq!(reached.last_state(), Some(&Loc(0, 1)));

        // A stale handle cannot be re-enqueued, even if its slot is reused.
        let c = reached.add(Loc(3, 3), ());
        assert_eq!(c.index(), a.index());
        assert!(!reached.add_to_waitlist(a));
        assert_eq!(reached.waitlist(), vec![b, c]);
    }

    #[test]
    fn test_update() {
        let mut reached = ReachedSet::<Loc, ()>::default();
        let a = reached.add(Loc(0, 0), ());
        reached.pop_from_waitlist();

        reached.update(vec![a], vec![(Loc(0, 9), ())]);

        assert!(!reached.contains(&Loc(0, 0)));
        assert!(reached.contains(&Loc(0, 9)));
        assert_eq!(reached.waiting_states(), vec![&Loc(0, 9)]);
        assert_eq!(reached.len(), 1);
    }

    #[test]
    fn test_add_to_waitlist_twice() {
        let mut reached = ReachedSet::<Loc, ()>::default();
        let a = reached.add(Loc(0, 0), ());
        assert!(reached.add_to_waitlist(a));
        assert_eq!(reached.waitlist_size(), 1);
    }

    #[test]
    fn test_update_precision() {
        let mut reached = ReachedSet::<Loc, u8>::default();
        let a = reached.add(Loc(0, 0), 0);
        reached.pop_from_waitlist();

        assert!(reached.update_precision(a, 4));
        assert_eq!(reached.get(a), Some((&Loc(0, 0), &4)));
        assert!(reached.is_waiting(a));
    }

    #[test]
    fn test_topological_order() {
        let mut reached = ReachedSet::<Loc, ()>::new(TraversalOrder::Topological);
        reached.add(Loc(4, 0), ());
        reached.add(Loc(1, 0), ());
        reached.add(Loc(2, 0), ());

        let ids: Vec<_> = std::iter::from_fn(|| reached.pop_from_waitlist()).collect();
        let popped: Vec<_> = ids.iter().filter_map(|&id| reached.state(id).cloned()).collect();
        assert_eq!(popped, vec![Loc(1, 0), Loc(2, 0), Loc(4, 0)]);
    }

    #[test]
    fn test_clear() {
        let mut reached = ReachedSet::<Loc, ()>::default();
        reached.add(Loc(0, 0), ());
        reached.add_initial(Loc(1, 0), ());
        reached.clear();

        assert!(reached.is_empty());
        assert!(!reached.has_waiting_state());
        assert!(!reached.has_states_to_add());
        assert_eq!(reached.partition_count(), 0);
    }
}
