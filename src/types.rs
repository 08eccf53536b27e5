//! Handles and small value types shared across the engine.
//!
//! [`StateId`] is a type-safe handle into the reached set, so that the
//! waitlist and the partition index never hold stale references after a
//! merge replaced a state.
use std::fmt;

/// Handle for one `(state, precision)` pair published in a
/// [`ReachedSet`][crate::reached::ReachedSet].
///
/// # Invariants
///
/// - Handles are only minted by the reached set that owns the pair
/// - A slot may be reused after removal, but the generation is bumped, so a
///   handle to a removed pair never aliases its successor in the same slot
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StateId {
    index: u32,
    generation: u32,
}

impl StateId {
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        assert!(index <= u32::MAX as usize, "State index {} overflows u32", index);
        StateId {
            index: index as u32,
            generation,
        }
    }

    /// Returns the raw slot index.
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Returns the generation of the slot this handle was minted for.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "s{}", self.index)
        } else {
            write!(f, "s{}.{}", self.index, self.generation)
        }
    }
}

/// Control action emitted by precision adjustment.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Action {
    /// Proceed with merge and stop as usual.
    #[default]
    Continue,
    /// Stop the whole run once this successor is handled.
    Break,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Continue => write!(f, "CONTINUE"),
            Action::Break => write!(f, "BREAK"),
        }
    }
}
