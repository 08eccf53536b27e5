//! Merge operators.
//!
//! A merge folds a fresh successor into a state that was already reached at
//! the same location. Returning the reached state unchanged means "keep them
//! separate"; any other result must subsume both inputs and replaces the
//! reached state.

use std::marker::PhantomData;

use crate::domain::AbstractDomain;
use crate::error::Result;
use crate::state::{AbstractState, Precision};

pub trait MergeOperator<S, P>
where
    S: AbstractState,
    P: Precision,
{
    /// Merge `successor` into `reached`.
    fn merge(&self, successor: &S, reached: &S, precision: &P) -> Result<S>;

    /// Whether this operator always returns its `reached` argument.
    ///
    /// When true the algorithm skips the candidate scan altogether.
    fn is_merge_sep(&self) -> bool {
        false
    }
}

/// Never merges.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeSep;

impl<S, P> MergeOperator<S, P> for MergeSep
where
    S: AbstractState,
    P: Precision,
{
    fn merge(&self, _successor: &S, reached: &S, _precision: &P) -> Result<S> {
        Ok(reached.clone())
    }

    fn is_merge_sep(&self) -> bool {
        true
    }
}

/// Merges by the domain join.
///
/// If the successor adds nothing (`successor ⊑ reached`), the reached state is
/// returned as is, so the algorithm sees a no-op.
#[derive(Debug, Clone)]
pub struct MergeJoin<D> {
    domain: D,
}

impl<D> MergeJoin<D> {
    pub fn new(domain: D) -> Self {
        Self { domain }
    }
}

impl<S, P, D> MergeOperator<S, P> for MergeJoin<D>
where
    S: AbstractState,
    P: Precision,
    D: AbstractDomain<Element = S>,
{
    fn merge(&self, successor: &S, reached: &S, _precision: &P) -> Result<S> {
        if self.domain.le(successor, reached) {
            return Ok(reached.clone());
        }
        Ok(self.domain.join(successor, reached))
    }
}

/// Merge operator defined by a closure.
pub struct MergeFn<S, F> {
    f: F,
    _phantom: PhantomData<fn(&S) -> S>,
}

impl<S, F> MergeFn<S, F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<S, P, F> MergeOperator<S, P> for MergeFn<S, F>
where
    S: AbstractState,
    P: Precision,
    F: Fn(&S, &S, &P) -> Result<S>,
{
    fn merge(&self, successor: &S, reached: &S, precision: &P) -> Result<S> {
        (self.f)(successor, reached, precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PartialOrder;

    #[derive(Debug, Clone, PartialEq)]
    struct Range(i64, i64);

    impl AbstractState for Range {
        type Location = ();

        fn location(&self) -> Self::Location {}
    }

    #[derive(Debug, Clone)]
    struct RangeDomain;

    impl PartialOrder for RangeDomain {
        type Element = Range;

        fn le(&self, a: &Range, b: &Range) -> bool {
            b.0 <= a.0 && a.1 <= b.1
        }
    }

    impl AbstractDomain for RangeDomain {
        fn join(&self, a: &Range, b: &Range) -> Range {
            Range(a.0.min(b.0), a.1.max(b.1))
        }
    }

    #[test]
    fn test_merge_sep() {
        let op = MergeSep;
        let merged = MergeOperator::<Range, ()>::merge(&op, &Range(0, 1), &Range(5, 6), &()).unwrap();
        assert_eq!(merged, Range(5, 6));
        assert!(MergeOperator::<Range, ()>::is_merge_sep(&op));
    }

    #[test]
    fn test_merge_join() {
        let op = MergeJoin::new(RangeDomain);
        assert!(!MergeOperator::<Range, ()>::is_merge_sep(&op));

        let merged = op.merge(&Range(0, 1), &Range(5, 6), &()).unwrap();
        assert_eq!(merged, Range(0, 6));

        // Subsumed successor: no-op.
        let merged = op.merge(&Range(2, 3), &Range(0, 6), &()).unwrap();
        assert_eq!(merged, Range(0, 6));
    }

    #[test]
    fn test_merge_fn() {
        let op = MergeFn::new(|s: &Range, r: &Range, _: &()| -> Result<Range> {
            Ok(Range(s.0 + r.0, s.1 + r.1))
        });
        assert_eq!(op.merge(&Range(1, 1), &Range(2, 2), &()).unwrap(), Range(3, 3));
    }
}
