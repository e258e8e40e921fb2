use std::fmt::Debug;

use crate::num::PrimInt;
use ::num::Zero;
#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::Dissolve;
use eyre::{ensure, Result};
use impl_tools::autoimpl;

/// Half-open coordinate range [start, end) that covers at least one base.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Dissolve)]
pub struct Interval<Idx: PrimInt> {
    start: Idx,
    end: Idx,
}

/// Anything with half-open [start, end) coordinates. Implementors may be empty.
#[autoimpl(for <T: trait + ?Sized> &T, Box<T>)]
pub trait IntervalOp {
    type Idx: PrimInt;

    fn start(&self) -> Self::Idx;

    fn end(&self) -> Self::Idx;

    /// Number of covered bases, zero for empty ranges.
    fn len(&self) -> Self::Idx {
        if self.is_empty() {
            Self::Idx::zero()
        } else {
            self.end() - self.start()
        }
    }

    fn is_empty(&self) -> bool {
        self.start() >= self.end()
    }

    fn contains(&self, pos: Self::Idx) -> bool {
        self.start() <= pos && pos < self.end()
    }

    /// True if both ranges share at least one base. Touching ranges don't intersect.
    fn intersects(&self, other: &Self) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }
}

impl<Idx: PrimInt> IntervalOp for Interval<Idx> {
    type Idx = Idx;

    #[inline(always)]
    fn start(&self) -> Idx {
        self.start
    }

    #[inline(always)]
    fn end(&self) -> Idx {
        self.end
    }
}

impl<Idx: PrimInt> Interval<Idx> {
    pub fn new(start: Idx, end: Idx) -> Result<Self> {
        ensure!(
            start < end,
            "Interval must cover at least one base, got [{start:?}, {end:?})"
        );
        Ok(Self { start, end })
    }

    /// Shared part of two intervals, None if they don't intersect.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let (start, end) = (self.start.max(other.start), self.end.min(other.end));
        (start < end).then_some(Self { start, end })
    }
}

impl<Idx: PrimInt> PartialEq<(Idx, Idx)> for Interval<Idx> {
    fn eq(&self, other: &(Idx, Idx)) -> bool {
        (self.start, self.end) == *other
    }
}
