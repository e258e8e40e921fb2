#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use covbit_core_rs::num::Float;

/// A trait representing the concept of identity for breakpoint compression.
/// Two neighbouring segments with identical values are merged into a single one.
pub trait Identical<T> {
    /// Returns `true` if the two values should be considered part of the same segment.
    /// No guarantees are made about which of the two values is kept.
    fn identical(&self, first: &T, second: &T) -> bool;
}

/// Any function that takes two references to `T` and returns a `bool`.
impl<T, F> Identical<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn identical(&self, first: &T, second: &T) -> bool {
        self(first, second)
    }
}

/// Values are identical only if they compare equal.
/// Pileup values are sums of integer weights, so the exact comparison is the default.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Exact;

impl<T: PartialEq> Identical<T> for Exact {
    #[inline(always)]
    fn identical(&self, first: &T, second: &T) -> bool {
        first == second
    }
}

/// Values are identical if they differ by at most `epsilon`.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Tolerance<T: Float> {
    pub epsilon: T,
}

impl<T: Float> Tolerance<T> {
    pub fn new(epsilon: T) -> Self {
        Self { epsilon }
    }
}

impl<T: Float> Identical<T> for Tolerance<T> {
    #[inline(always)]
    fn identical(&self, first: &T, second: &T) -> bool {
        (*first - *second).abs() <= self.epsilon
    }
}
