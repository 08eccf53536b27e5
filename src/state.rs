//! Abstract states and precisions as seen by the engine.
//!
//! Both are opaque: the engine never inspects them beyond the handful of
//! queries below. States are treated as immutable once published into a
//! [`ReachedSet`][crate::reached::ReachedSet]; operators produce new values
//! instead of mutating in place.

use std::fmt::Debug;
use std::hash::Hash;

/// An abstract state supplied by a concrete analysis.
///
/// Equality is domain-defined and is what the engine uses to detect a no-op
/// merge and to deduplicate published states.
pub trait AbstractState: Clone + Debug + PartialEq {
    /// Partition key, typically the control-flow location.
    type Location: Clone + Eq + Hash + Debug;

    /// The partition this state belongs to.
    ///
    /// Merge and stop only ever compare a state against the reached states
    /// sharing its location.
    fn location(&self) -> Self::Location;

    /// Whether this state represents a property violation.
    fn is_target(&self) -> bool {
        false
    }

    /// Rank used by the topological waitlist.
    ///
    /// States with a smaller rank are expanded first. Analyses usually return
    /// the reverse-postorder number of the location.
    fn topological_rank(&self) -> usize {
        0
    }
}

/// Configuration value controlling abstraction granularity.
///
/// Carried alongside every state as a pair, but with its own lifecycle.
pub trait Precision: Clone + Debug + PartialEq {}

impl<T> Precision for T where T: Clone + Debug + PartialEq {}
