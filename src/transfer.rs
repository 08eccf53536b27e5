//! Transfer relation contract.

use crate::error::Result;
use crate::state::{AbstractState, Precision};

/// Abstract successor computation.
///
/// Implements the abstract semantics of the control-flow edges leaving a
/// state's location: `⟦edges(loc)⟧♯: (State, Precision) → {(State, Precision)}`.
pub trait TransferRelation<S, P>
where
    S: AbstractState,
    P: Precision,
{
    /// Successors of `state` across all outgoing edges of its location.
    ///
    /// An empty result is a valid terminal answer. Fails with
    /// [`CpaError::Transfer`][crate::error::CpaError::Transfer] when an edge
    /// cannot be handled, and may fail with
    /// [`CpaError::Interrupted`][crate::error::CpaError::Interrupted] when it
    /// observes a shutdown request during a long computation.
    fn abstract_successors(&self, state: &S, precision: &P) -> Result<Vec<(S, P)>>;
}

impl<S, P, F> TransferRelation<S, P> for F
where
    S: AbstractState,
    P: Precision,
    F: Fn(&S, &P) -> Result<Vec<(S, P)>>,
{
    fn abstract_successors(&self, state: &S, precision: &P) -> Result<Vec<(S, P)>> {
        self(state, precision)
    }
}
