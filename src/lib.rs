//! # cpa-rs: Configurable Program Analysis in Rust
//!
//! **`cpa-rs`** is the execution core of an abstract-interpretation-based
//! software verifier. Given a pluggable analysis (how program states are
//! represented, transferred across control-flow edges, merged, and checked for
//! coverage), it explores the reachable abstract state space until a fixpoint
//! is reached or the analysis asks to stop early.
//!
//! ## Key Concepts
//!
//! - **Abstract state / precision**: opaque values supplied by the analysis, see [`state`].
//! - **Reached set**: all explored `(state, precision)` pairs, partitioned by
//!   location, owning the waitlist of pairs still to expand. See [`reached`].
//! - **Operators**: [`transfer`], [`merge`], [`stop`] and [`precision`]
//!   adjustment, bundled as a [`Cpa`][crate::cpa::Cpa]; optionally a
//!   [`covering`] strategy.
//! - **Algorithm**: [`CpaAlgorithm`][crate::algorithm::CpaAlgorithm] drives
//!   transfer → precision adjustment → merge → stop until the waitlist is
//!   empty, and reports an [`AlgorithmStatus`][crate::status::AlgorithmStatus].
//!
//! ## Basic Usage
//!
//! ```rust
//! use cpa_rs::prelude::*;
//!
//! // A chain 0 → 1 → 2 → 3, where each value is its own location.
//! #[derive(Debug, Clone, PartialEq)]
//! struct Counter(u32);
//!
//! impl AbstractState for Counter {
//!     type Location = u32;
//!     fn location(&self) -> u32 {
//!         self.0
//!     }
//! }
//!
//! let transfer = |s: &Counter, _: &()| -> Result<Vec<(Counter, ())>> {
//!     Ok(if s.0 < 3 { vec![(Counter(s.0 + 1), ())] } else { vec![] })
//! };
//! let cpa = Cpa::new(transfer, MergeSep, StopSep::new(EqualityDomain::new()));
//! let mut algorithm = CpaAlgorithm::new(cpa, ShutdownNotifier::new());
//!
//! let mut reached = ReachedSet::new(TraversalOrder::Bfs);
//! reached.add_initial(Counter(0), ());
//!
//! let outcome = algorithm.run(&mut reached).unwrap();
//! assert!(outcome.is_exhausted());
//! assert_eq!(reached.len(), 4);
//! ```
//!
//! ## Errors
//!
//! A run fails only with a transfer failure or a shutdown request, see
//! [`error`]. In both cases the reached set is left consistent and `run` may
//! be called again to resume.

pub mod algorithm;
pub mod covering;
pub mod cpa;
pub mod domain;
pub mod error;
pub mod merge;
pub mod precision;
pub mod reached;
pub mod shutdown;
pub mod state;
pub mod statistics;
pub mod status;
pub mod stop;
pub mod storage;
pub mod transfer;
pub mod types;
pub mod waitlist;

/// Re-exports for analysis implementors.
pub mod prelude {
    pub use crate::algorithm::{Algorithm, CpaAlgorithm, RunOutcome, Termination};
    pub use crate::covering::ForcedCovering;
    pub use crate::cpa::Cpa;
    pub use crate::domain::{AbstractDomain, EqualityDomain, PartialOrder};
    pub use crate::error::{CpaError, Result, TransferError};
    pub use crate::merge::{MergeFn, MergeJoin, MergeOperator, MergeSep};
    pub use crate::precision::{
        BreakOnTarget, PrecisionAdjustment, PrecisionAdjustmentResult, StateProjection, StaticPrecisionAdjustment,
    };
    pub use crate::reached::ReachedSet;
    pub use crate::shutdown::ShutdownNotifier;
    pub use crate::state::{AbstractState, Precision};
    pub use crate::statistics::{CpaStatistics, Statistics, StatisticsProvider};
    pub use crate::status::AlgorithmStatus;
    pub use crate::stop::{StopAlways, StopJoin, StopNever, StopOperator, StopSep};
    pub use crate::transfer::TransferRelation;
    pub use crate::types::{Action, StateId};
    pub use crate::waitlist::{TraversalOrder, Waitlist};
}
