//! Stop operators: coverage checks against already reached states.

use crate::domain::{AbstractDomain, PartialOrder};
use crate::error::Result;
use crate::state::{AbstractState, Precision};

pub trait StopOperator<S, P>
where
    S: AbstractState,
    P: Precision,
{
    /// Whether `state` is subsumed by the union of `reached`.
    ///
    /// A covered state is discarded; it never enters the waitlist.
    fn stop(&self, state: &S, reached: &[&S], precision: &P) -> Result<bool>;
}

/// Covered iff some single reached state is above the successor.
#[derive(Debug, Clone)]
pub struct StopSep<D> {
    domain: D,
}

impl<D> StopSep<D> {
    pub fn new(domain: D) -> Self {
        Self { domain }
    }
}

impl<S, P, D> StopOperator<S, P> for StopSep<D>
where
    S: AbstractState,
    P: Precision,
    D: PartialOrder<Element = S>,
{
    fn stop(&self, state: &S, reached: &[&S], _precision: &P) -> Result<bool> {
        Ok(reached.iter().any(|r| self.domain.le(state, r)))
    }
}

/// Covered iff the join of all reached states is above the successor.
#[derive(Debug, Clone)]
pub struct StopJoin<D> {
    domain: D,
}

impl<D> StopJoin<D> {
    pub fn new(domain: D) -> Self {
        Self { domain }
    }
}

impl<S, P, D> StopOperator<S, P> for StopJoin<D>
where
    S: AbstractState,
    P: Precision,
    D: AbstractDomain<Element = S>,
{
    fn stop(&self, state: &S, reached: &[&S], _precision: &P) -> Result<bool> {
        match self.domain.join_many(reached.iter().copied()) {
            Some(joined) => Ok(self.domain.le(state, &joined)),
            None => Ok(false),
        }
    }
}

/// Never covers anything. Only terminates on finite unfoldings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopNever;

impl<S, P> StopOperator<S, P> for StopNever
where
    S: AbstractState,
    P: Precision,
{
    fn stop(&self, _state: &S, _reached: &[&S], _precision: &P) -> Result<bool> {
        Ok(false)
    }
}

/// Covers everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopAlways;

impl<S, P> StopOperator<S, P> for StopAlways
where
    S: AbstractState,
    P: Precision,
{
    fn stop(&self, _state: &S, _reached: &[&S], _precision: &P) -> Result<bool> {
        Ok(true)
    }
}
