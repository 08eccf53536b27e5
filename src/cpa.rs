//! Configurable program analysis: the operator bundle a concrete analysis supplies.

use crate::merge::MergeOperator;
use crate::precision::{PrecisionAdjustment, StaticPrecisionAdjustment};
use crate::state::{AbstractState, Precision};
use crate::stop::StopOperator;
use crate::transfer::TransferRelation;

/// The four operators the algorithm orchestrates.
///
/// Chosen once, at construction time; the algorithm only talks to them
/// through their traits.
pub struct Cpa<S, P>
where
    S: AbstractState,
    P: Precision,
{
    pub transfer: Box<dyn TransferRelation<S, P>>,
    pub merge: Box<dyn MergeOperator<S, P>>,
    pub stop: Box<dyn StopOperator<S, P>>,
    pub precision_adjustment: Box<dyn PrecisionAdjustment<S, P>>,
}

impl<S, P> Cpa<S, P>
where
    S: AbstractState,
    P: Precision,
{
    /// Bundle the operators, with the identity precision adjustment.
    pub fn new(
        transfer: impl TransferRelation<S, P> + 'static,
        merge: impl MergeOperator<S, P> + 'static,
        stop: impl StopOperator<S, P> + 'static,
    ) -> Self {
        Self {
            transfer: Box::new(transfer),
            merge: Box::new(merge),
            stop: Box::new(stop),
            precision_adjustment: Box::new(StaticPrecisionAdjustment),
        }
    }

    pub fn with_precision_adjustment(mut self, adjustment: impl PrecisionAdjustment<S, P> + 'static) -> Self {
        self.precision_adjustment = Box::new(adjustment);
        self
    }
}
