//! The CPA algorithm: worklist-driven exploration of the abstract state space.
//!
//! ## Overview
//!
//! Each iteration pops one element from the waitlist and expands it:
//!
//! 1. cancellation check;
//! 2. optional forced covering, which may discard the element unexpanded;
//! 3. transfer relation, producing the successors;
//! 4. per successor, in transfer order: cancellation check, precision
//!    adjustment, then either the BREAK protocol or merge followed by stop;
//!    uncovered successors are published and thereby enqueued.
//!
//! The run is over when the waitlist is empty (fixpoint) or when a successor
//! requested BREAK.
//!
//! ## Failure
//!
//! A failing transfer relation and a shutdown request both propagate as
//! errors. Before they do, the element being expanded is put back into the
//! waitlist, so the reached set stays consistent: anything not waiting has
//! been fully expanded. Calling [`Algorithm::run`] again on the same reached
//! set resumes the exploration.

use std::fmt;

use log::{debug, info, trace, warn};

use crate::covering::ForcedCovering;
use crate::cpa::Cpa;
use crate::error::Result;
use crate::merge::MergeOperator;
use crate::precision::{PrecisionAdjustment, PrecisionAdjustmentResult};
use crate::reached::ReachedSet;
use crate::shutdown::ShutdownNotifier;
use crate::state::{AbstractState, Precision};
use crate::statistics::{CpaStatistics, Statistics, StatisticsProvider};
use crate::status::AlgorithmStatus;
use crate::stop::StopOperator;
use crate::transfer::TransferRelation;
use crate::types::{Action, StateId};

/// How a run ended.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Termination {
    /// The waitlist is empty: the reached set is a fixpoint.
    Exhausted,
    /// Precision adjustment requested BREAK for an uncovered successor.
    Break,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Exhausted => write!(f, "exhausted"),
            Termination::Break => write!(f, "break"),
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RunOutcome {
    pub status: AlgorithmStatus,
    pub termination: Termination,
}

impl RunOutcome {
    pub fn new(status: AlgorithmStatus, termination: Termination) -> Self {
        Self { status, termination }
    }

    pub fn is_exhausted(&self) -> bool {
        self.termination == Termination::Exhausted
    }

    pub fn is_break(&self) -> bool {
        self.termination == Termination::Break
    }
}

/// An analysis algorithm operating on a reached set.
pub trait Algorithm<S, P>
where
    S: AbstractState,
    P: Precision,
{
    fn run(&mut self, reached: &mut ReachedSet<S, P>) -> Result<RunOutcome>;
}

fn identity<S>(state: &S) -> &S {
    state
}

pub struct CpaAlgorithm<S, P>
where
    S: AbstractState,
    P: Precision,
{
    transfer: Box<dyn TransferRelation<S, P>>,
    merge: Box<dyn MergeOperator<S, P>>,
    stop: Box<dyn StopOperator<S, P>>,
    precision_adjustment: Box<dyn PrecisionAdjustment<S, P>>,
    forced_covering: Option<Box<dyn ForcedCovering<S, P>>>,
    shutdown: ShutdownNotifier,
    status: AlgorithmStatus,
    stats: CpaStatistics,
}

impl<S, P> CpaAlgorithm<S, P>
where
    S: AbstractState,
    P: Precision,
{
    pub fn new(cpa: Cpa<S, P>, shutdown: ShutdownNotifier) -> Self {
        Self {
            transfer: cpa.transfer,
            merge: cpa.merge,
            stop: cpa.stop,
            precision_adjustment: cpa.precision_adjustment,
            forced_covering: None,
            shutdown,
            status: AlgorithmStatus::SOUND_AND_PRECISE,
            stats: CpaStatistics::default(),
        }
    }

    /// Mark the configuration as imprecise; every run reports `precise = false`.
    pub fn imprecise(mut self, imprecise: bool) -> Self {
        self.status = AlgorithmStatus::SOUND_AND_PRECISE.with_precise(!imprecise);
        self
    }

    pub fn with_forced_covering(mut self, forced_covering: impl ForcedCovering<S, P> + 'static) -> Self {
        self.forced_covering = Some(Box::new(forced_covering));
        self
    }

    /// The status every run of this instance reports.
    pub fn status(&self) -> AlgorithmStatus {
        self.status
    }

    pub fn statistics(&self) -> &CpaStatistics {
        &self.stats
    }
}

impl<S, P> Algorithm<S, P> for CpaAlgorithm<S, P>
where
    S: AbstractState,
    P: Precision,
{
    fn run(&mut self, reached: &mut ReachedSet<S, P>) -> Result<RunOutcome> {
        self.stats.total_timer.start();
        let result = self.run0(reached);
        self.stats.stop_timers();

        match &result {
            Ok(outcome) => info!(
                "CPA algorithm {} after {} iterations: {} states reached, {} waiting, {}",
                outcome.termination,
                self.stats.count_iterations,
                reached.len(),
                reached.waitlist_size(),
                outcome.status
            ),
            Err(e) => warn!("CPA algorithm aborted: {}", e),
        }

        result
    }
}

impl<S, P> CpaAlgorithm<S, P>
where
    S: AbstractState,
    P: Precision,
{
    fn run0(&mut self, reached: &mut ReachedSet<S, P>) -> Result<RunOutcome> {
        if reached.has_states_to_add() {
            for (state, precision) in reached.take_states_to_add() {
                reached.add(state, precision);
            }
        }

        while reached.has_waiting_state() {
            self.shutdown.shutdown_if_necessary()?;

            self.stats.count_iterations += 1;

            let size = reached.waitlist_size();
            self.stats.max_waitlist_size = self.stats.max_waitlist_size.max(size);
            self.stats.count_waitlist_size += size as u64;

            let element = self.stats.choose_timer.time(|| reached.pop_from_waitlist());
            let element = match element {
                Some(element) => element,
                None => break,
            };
            debug!("Retrieved {} from waitlist", element);

            match self.handle_transition(element, reached) {
                Ok(false) => {}
                Ok(true) => return Ok(RunOutcome::new(self.status, Termination::Break)),
                Err(e) => {
                    // There may be unhandled successors left; forgetting them would be unsound.
                    reached.add_to_waitlist(element);
                    return Err(e);
                }
            }
        }

        Ok(RunOutcome::new(self.status, Termination::Exhausted))
    }

    /// Expand one popped element.
    ///
    /// Returns true if the analysis should terminate.
    fn handle_transition(&mut self, element: StateId, reached: &mut ReachedSet<S, P>) -> Result<bool> {
        let (state, precision) = match reached.get(element) {
            Some((state, precision)) => (state.clone(), precision.clone()),
            None => return Ok(false),
        };
        trace!("Current state is {:?} with precision {:?}", state, precision);

        if let Some(forced_covering) = self.forced_covering.as_mut() {
            let covered = self
                .stats
                .forced_covering_timer
                .time(|| forced_covering.try_forced_covering(&state, &precision, reached))?;
            if covered {
                debug!("{} was covered by forced covering", element);
                self.stats.count_forced_covered += 1;
                return Ok(false);
            }
        }

        let successors = self
            .stats
            .transfer_timer
            .time(|| self.transfer.abstract_successors(&state, &precision))?;

        let num_successors = successors.len();
        debug!("{} has {} successors", element, num_successors);
        self.stats.count_successors += num_successors;
        self.stats.max_successors = self.stats.max_successors.max(num_successors);

        let mut successors = successors.into_iter();
        while let Some((successor, successor_precision)) = successors.next() {
            self.shutdown.shutdown_if_necessary()?;
            trace!("Successor of {:?} is {:?}", state, successor);

            let adjusted = self.stats.precision_timer.time(|| {
                self.precision_adjustment
                    .prec(&successor, &successor_precision, reached, &identity::<S>)
            })?;
            let PrecisionAdjustmentResult {
                state: successor,
                precision: successor_precision,
                action,
            } = match adjusted {
                Some(result) => result,
                None => {
                    debug!("Successor pruned by precision adjustment");
                    continue;
                }
            };

            if action == Action::Break {
                if self.is_covered(&successor, &successor_precision, reached)? {
                    // A covered state cannot usefully end the analysis.
                    self.stats.count_stop += 1;
                    self.stats.count_covered_breaks += 1;
                    debug!("Break was signalled but ignored because the state is covered");
                    continue;
                }

                self.stats.count_break += 1;
                debug!("Break signalled, CPA algorithm will stop");

                self.stats
                    .add_timer
                    .time(|| reached.add(successor, successor_precision));

                if successors.len() > 0 {
                    // Unhandled siblings remain: re-expanding the source recovers them.
                    reached.add_to_waitlist(element);
                }

                return Ok(true);
            }

            // Merge-sep never changes anything; skip the candidate scan.
            if !self.merge.is_merge_sep() {
                self.merge_into_reached(&successor, &successor_precision, reached)?;
            }

            if self.is_covered(&successor, &successor_precision, reached)? {
                debug!("Successor is covered or unreachable, not adding to waitlist");
                self.stats.count_stop += 1;
            } else {
                debug!("No need to stop, adding successor to waitlist");
                self.stats
                    .add_timer
                    .time(|| reached.add(successor, successor_precision));
            }
        }

        Ok(false)
    }

    fn is_covered(&mut self, state: &S, precision: &P, reached: &ReachedSet<S, P>) -> Result<bool> {
        let candidates = reached.get_reached(state);
        self.stats
            .stop_timer
            .time(|| self.stop.stop(state, &candidates, precision))
    }

    /// Merge `successor` with every reached state of its partition and swap in
    /// the merged results.
    fn merge_into_reached(&mut self, successor: &S, precision: &P, reached: &mut ReachedSet<S, P>) -> Result<()> {
        let candidates = reached.reached_ids(successor);
        if candidates.is_empty() {
            return Ok(());
        }
        debug!("Considering {} states from reached set for merge", candidates.len());

        self.stats.merge_timer.start();
        let mut to_remove = Vec::new();
        let mut to_add = Vec::new();
        let result = self.collect_merges(successor, precision, &candidates, reached, &mut to_remove, &mut to_add);

        // Apply what was merged so far, even if the scan was cut short.
        if !to_remove.is_empty() {
            self.stats.count_merge += to_remove.len();
            reached.update(to_remove, to_add);
        }
        self.stats.merge_timer.stop();

        result
    }

    fn collect_merges(
        &self,
        successor: &S,
        precision: &P,
        candidates: &[StateId],
        reached: &ReachedSet<S, P>,
        to_remove: &mut Vec<StateId>,
        to_add: &mut Vec<(S, P)>,
    ) -> Result<()> {
        for &id in candidates {
            self.shutdown.shutdown_if_necessary()?;

            let reached_state = match reached.state(id) {
                Some(state) => state,
                None => continue,
            };
            let merged = self.merge.merge(successor, reached_state, precision)?;

            if merged != *reached_state {
                debug!("Successor was merged with state {} from reached set", id);
                trace!("Merged {:?} and {:?} into {:?}", successor, reached_state, merged);
                to_remove.push(id);
                to_add.push((merged, precision.clone()));
            }
        }
        Ok(())
    }
}

impl<S, P> StatisticsProvider for CpaAlgorithm<S, P>
where
    S: AbstractState,
    P: Precision,
{
    fn collect_statistics<'a>(&'a self, out: &mut Vec<&'a dyn Statistics>) {
        if let Some(forced_covering) = &self.forced_covering {
            forced_covering.collect_statistics(out);
        }
        out.push(&self.stats);
    }
}
