use std::cmp::Eq;
use std::fmt::Debug;
use std::hash::Hash;
use std::hash::Hasher;

use derive_more::Display;
use num_traits::bounds::UpperBounded;
use num_traits::SaturatingAdd;
use num_traits::Zero;
use ordered_float::FloatCore;
use ordered_float::OrderedFloat;
use ordered_float::PrimitiveFloat;

use crate::space::Cost;

/// A totally ordered float cost.
///
/// `OrderedFloat` supplies `Ord`/`Eq`/`Hash`; saturation maps onto the
/// float's own infinity, which doubles as `max_value()`.
#[derive(Copy, Clone, Default, Debug, Display)]
#[repr(transparent)]
#[display("{_0}")]
pub struct FloatCost<F: FloatCore>(pub OrderedFloat<F>);

impl<F> Cost for FloatCost<F> where F: FloatCore + Debug + std::fmt::Display {}

impl<F> FloatCost<F>
where
    F: FloatCore,
{
    pub fn new(f: F) -> Self {
        Self(OrderedFloat(f))
    }

    #[inline(always)]
    pub fn infinity() -> Self {
        Self(OrderedFloat::infinity())
    }

    #[inline(always)]
    pub fn into_inner(self) -> F {
        self.0.into_inner()
    }
}

impl<F> std::ops::Add for FloatCost<F>
where
    F: FloatCore,
{
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl<F> std::ops::Sub for FloatCost<F>
where
    F: FloatCore,
{
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl<F> std::ops::AddAssign for FloatCost<F>
where
    F: FloatCore,
{
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0 + rhs.0;
    }
}

impl<F> SaturatingAdd for FloatCost<F>
where
    F: FloatCore,
{
    fn saturating_add(&self, rhs: &Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl<F> Zero for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn is_zero(&self) -> bool {
        self.0 == OrderedFloat::zero()
    }
    #[inline(always)]
    fn zero() -> Self {
        Self(OrderedFloat::zero())
    }
}

impl<F> UpperBounded for FloatCost<F>
where
    F: FloatCore,
{
    fn max_value() -> Self {
        Self(OrderedFloat::<F>::infinity())
    }
}

impl<F> PartialOrd for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.0.cmp(&other.0))
    }
}
impl<F> Ord for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}
impl<F> PartialEq for FloatCost<F>
where
    F: FloatCore,
{
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}
impl<F> Eq for FloatCost<F> where F: FloatCore {}

// `OrderedFloat` only hashes primitive floats (it canonicalizes -0.0 and
// NaN bit patterns there), so the bound is tighter than the rest.
impl<F> Hash for FloatCost<F>
where
    F: FloatCore + PrimitiveFloat,
{
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero() {
        assert!(FloatCost::new(0.0f64).is_zero());
        assert!(!FloatCost::new(0.5f64).is_zero());
    }

    #[test]
    fn order() {
        assert!(FloatCost::new(0.0f64) <= FloatCost::new(0.0f64));
        assert!(FloatCost::new(0.0f64) == FloatCost::new(0.0f64));
        assert!(FloatCost::new(1.0f64) < FloatCost::new(2.0f64));
    }

    #[test]
    fn sum() {
        let mut f = FloatCost::new(0.0f64);
        f += FloatCost::new(1.0f64);
        f += FloatCost::new(1.0f64);
        assert!(f == FloatCost::new(2.0f64));
        f += FloatCost::infinity();
        assert!(f == FloatCost::max_value());
        assert!(!f.valid());
    }

    #[test]
    fn usable_as_a_hash_key() {
        let mut seen = rustc_hash::FxHashSet::default();
        assert!(seen.insert(FloatCost::new(0.7f64)));
        assert!(!seen.insert(FloatCost::new(0.7f64)));
        assert!(seen.insert(FloatCost::new(0.8f64)));
    }
}
