use derive_getters::Dissolve;
use eyre::{ensure, Result};

use covbit_core_rs::loc::{Interval, IntervalOp, Strand};
use covbit_core_rs::num::PrimSInt;

/// Half-open fragment [start, end) inferred from a single read.
/// Unlike `Interval`, a fragment may be empty (zero extension) and may start below zero.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Dissolve)]
pub struct Fragment<Idx: PrimSInt> {
    start: Idx,
    end: Idx,
}

impl<Idx: PrimSInt> IntervalOp for Fragment<Idx> {
    type Idx = Idx;

    #[inline(always)]
    fn start(&self) -> Self::Idx {
        self.start
    }
    #[inline(always)]
    fn end(&self) -> Self::Idx {
        self.end
    }
}

impl<Idx: PrimSInt> Fragment<Idx> {
    pub fn as_interval(&self) -> Option<Interval<Idx>> {
        Interval::new(self.start, self.end).ok()
    }
}

/// How a bare 5' read position is turned into a fragment.
///
/// * full extension: forward reads cover [p, p + d), reverse reads mirror them and cover [p - d, p);
/// * half extension: both strands cover [p - floor(d / 2), p + ceil(d / 2)), i.e. `d` bases centered on p.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Extension<Idx: PrimSInt> {
    length: Idx,
    half: bool,
}

impl<Idx: PrimSInt> Extension<Idx> {
    pub fn new(length: Idx, halfextension: bool) -> Result<Self> {
        ensure!(
            length >= Idx::zero(),
            "Extension length must be non-negative, got {:?}",
            length
        );
        Ok(Self {
            length,
            half: halfextension,
        })
    }

    pub fn full(length: Idx) -> Result<Self> {
        Self::new(length, false)
    }

    pub fn centered(length: Idx) -> Result<Self> {
        Self::new(length, true)
    }

    pub fn length(&self) -> Idx {
        self.length
    }

    pub fn is_half(&self) -> bool {
        self.half
    }

    #[inline]
    pub fn extend(&self, position: Idx, strand: Strand) -> Fragment<Idx> {
        if self.half {
            let left = self.length / (Idx::one() + Idx::one());
            return Fragment {
                start: position - left,
                end: position + (self.length - left),
            };
        }

        match strand {
            Strand::Forward => Fragment {
                start: position,
                end: position + self.length,
            },
            Strand::Reverse => Fragment {
                start: position - self.length,
                end: position,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_length_is_rejected() {
        assert!(Extension::new(-1i64, false).is_err());
        assert!(Extension::new(-1i64, true).is_err());
        assert!(Extension::new(0i64, false).is_ok());
    }

    #[test]
    fn test_full_extension() -> Result<()> {
        let ext = Extension::full(5i64)?;
        assert_eq!(ext.extend(10, Strand::Forward).dissolve(), (10, 15));
        assert_eq!(ext.extend(10, Strand::Reverse).dissolve(), (5, 10));
        assert_eq!(ext.extend(2, Strand::Reverse).dissolve(), (-3, 2));
        Ok(())
    }

    #[test]
    fn test_half_extension() -> Result<()> {
        for (length, expected) in [(0, (10, 10)), (1, (10, 11)), (4, (8, 12)), (5, (8, 13))] {
            let ext = Extension::centered(length)?;
            for strand in [Strand::Forward, Strand::Reverse] {
                let fragment = ext.extend(10i64, strand);
                assert_eq!(fragment.dissolve(), expected, "length {length}");
                assert_eq!(fragment.len(), length);
            }
        }
        Ok(())
    }

    #[test]
    fn test_zero_extension_is_empty() -> Result<()> {
        let ext = Extension::full(0i64)?;
        for strand in [Strand::Forward, Strand::Reverse] {
            let fragment = ext.extend(7, strand);
            assert!(fragment.is_empty());
            assert_eq!(fragment.as_interval(), None);
        }
        Ok(())
    }
}
