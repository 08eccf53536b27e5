//! Precision adjustment: post-processing of transfer successors.
//!
//! Runs on every successor before merge and stop. It may replace the state or
//! its precision (e.g. abstract more coarsely), prune the successor by
//! returning `None`, or request the whole run to stop with [`Action::Break`].

use crate::error::Result;
use crate::reached::ReachedSet;
use crate::state::{AbstractState, Precision};
use crate::types::Action;

/// Maps a reached state to the view a (possibly wrapped) adjustment works on.
///
/// The engine itself always passes the identity.
pub type StateProjection<'a, S> = &'a dyn Fn(&S) -> &S;

/// Outcome of a precision adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecisionAdjustmentResult<S, P> {
    pub state: S,
    pub precision: P,
    pub action: Action,
}

impl<S, P> PrecisionAdjustmentResult<S, P> {
    pub fn new(state: S, precision: P, action: Action) -> Self {
        Self {
            state,
            precision,
            action,
        }
    }

    /// Keep the pair and continue.
    pub fn proceed(state: S, precision: P) -> Self {
        Self::new(state, precision, Action::Continue)
    }

    pub fn with_state(self, state: S) -> Self {
        Self { state, ..self }
    }

    pub fn with_precision(self, precision: P) -> Self {
        Self { precision, ..self }
    }

    pub fn with_action(self, action: Action) -> Self {
        Self { action, ..self }
    }
}

pub trait PrecisionAdjustment<S, P>
where
    S: AbstractState,
    P: Precision,
{
    /// Adjust one successor. `None` prunes it; this is not an error.
    fn prec(
        &self,
        state: &S,
        precision: &P,
        reached: &ReachedSet<S, P>,
        projection: StateProjection<'_, S>,
    ) -> Result<Option<PrecisionAdjustmentResult<S, P>>>;
}

/// Identity adjustment: keeps the pair and continues.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPrecisionAdjustment;

impl<S, P> PrecisionAdjustment<S, P> for StaticPrecisionAdjustment
where
    S: AbstractState,
    P: Precision,
{
    fn prec(
        &self,
        state: &S,
        precision: &P,
        _reached: &ReachedSet<S, P>,
        _projection: StateProjection<'_, S>,
    ) -> Result<Option<PrecisionAdjustmentResult<S, P>>> {
        Ok(Some(PrecisionAdjustmentResult::proceed(
            state.clone(),
            precision.clone(),
        )))
    }
}

/// Wraps another adjustment and turns CONTINUE into BREAK on target states.
///
/// This is how "stop at the first property violation" is configured.
#[derive(Debug, Clone)]
pub struct BreakOnTarget<A> {
    inner: A,
}

impl<A> BreakOnTarget<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

impl<S, P, A> PrecisionAdjustment<S, P> for BreakOnTarget<A>
where
    S: AbstractState,
    P: Precision,
    A: PrecisionAdjustment<S, P>,
{
    fn prec(
        &self,
        state: &S,
        precision: &P,
        reached: &ReachedSet<S, P>,
        projection: StateProjection<'_, S>,
    ) -> Result<Option<PrecisionAdjustmentResult<S, P>>> {
        let result = match self.inner.prec(state, precision, reached, projection)? {
            Some(result) => result,
            None => return Ok(None),
        };

        if result.state.is_target() {
            Ok(Some(result.with_action(Action::Break)))
        } else {
            Ok(Some(result))
        }
    }
}
