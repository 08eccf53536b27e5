//! Forced covering: a last-resort coverage attempt before expanding a state.

use crate::error::Result;
use crate::reached::ReachedSet;
use crate::state::{AbstractState, Precision};
use crate::statistics::StatisticsProvider;

/// Strategy that tries to cover a popped state by non-syntactic means,
/// e.g. by strengthening an existing reached state.
///
/// Returning true discards the popped element: its successors are never
/// computed. The strategy may rearrange the reached set while doing so.
pub trait ForcedCovering<S, P>: StatisticsProvider
where
    S: AbstractState,
    P: Precision,
{
    fn try_forced_covering(&mut self, state: &S, precision: &P, reached: &mut ReachedSet<S, P>) -> Result<bool>;
}
