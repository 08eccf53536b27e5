//! Lattice interfaces used by the standard merge and stop operators.

use std::fmt::Debug;
use std::marker::PhantomData;

/// Partial order over abstract states.
///
/// # Order Properties
///
/// An implementation must satisfy:
/// - Reflexivity: `∀a. a ⊑ a`
/// - Transitivity: `∀a,b,c. a ⊑ b ∧ b ⊑ c ⇒ a ⊑ c`
pub trait PartialOrder {
    /// The type of ordered elements.
    type Element: Clone + Debug + PartialEq;

    /// Partial order: `elem1 ⊑ elem2` (elem1 is more precise than elem2).
    ///
    /// Returns true if elem1 represents a subset of the states represented by elem2.
    fn le(&self, elem1: &Self::Element, elem2: &Self::Element) -> bool;

    /// Check equality of abstract elements.
    fn eq(&self, elem1: &Self::Element, elem2: &Self::Element) -> bool {
        self.le(elem1, elem2) && self.le(elem2, elem1)
    }
}

/// Abstract domain interface: a join semi-lattice over abstract states.
pub trait AbstractDomain: PartialOrder {
    /// Join (`⊔`): least upper bound, over-approximation.
    ///
    /// Returns the smallest element that contains both inputs.
    fn join(&self, elem1: &Self::Element, elem2: &Self::Element) -> Self::Element;

    /// Join a non-empty sequence of elements, `None` if it is empty.
    fn join_many<'a, I>(&self, elems: I) -> Option<Self::Element>
    where
        I: IntoIterator<Item = &'a Self::Element>,
        Self::Element: 'a,
    {
        let mut iter = elems.into_iter();
        let first = iter.next()?.clone();
        Some(iter.fold(first, |acc, e| self.join(&acc, e)))
    }
}

/// Flat order: an element is only below itself.
///
/// Coverage degenerates to syntactic equality, which is what explicit-state
/// analyses want.
#[derive(Debug)]
pub struct EqualityDomain<S>(PhantomData<S>);

impl<S> EqualityDomain<S> {
    pub fn new() -> Self {
        EqualityDomain(PhantomData)
    }
}

impl<S> Default for EqualityDomain<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for EqualityDomain<S> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<S> PartialOrder for EqualityDomain<S>
where
    S: Clone + Debug + PartialEq,
{
    type Element = S;

    fn le(&self, elem1: &S, elem2: &S) -> bool {
        elem1 == elem2
    }
}
