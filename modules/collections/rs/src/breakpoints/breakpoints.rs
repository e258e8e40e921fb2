use std::iter::{once, zip};

#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::Dissolve;
use eyre::{ensure, OptionExt, Result};

use covbit_core_rs::loc::{Interval, IntervalOp};
use covbit_core_rs::num::{Float, PrimInt};

use super::identical::Identical;

pub struct BreakpointsBuilder<Idx: PrimInt, V, I: Identical<V>> {
    origin: Idx,
    positions: Vec<Idx>,
    values: Vec<V>,
    identical: I,
}

impl<Idx: PrimInt, V, I: Identical<V>> BreakpointsBuilder<Idx, V, I> {
    pub fn new(identical: I) -> Self {
        Self {
            origin: Idx::zero(),
            positions: Vec::new(),
            values: Vec::new(),
            identical,
        }
    }

    pub fn with_identical<NewI: Identical<V>>(
        self,
        identical: NewI,
    ) -> BreakpointsBuilder<Idx, V, NewI> {
        BreakpointsBuilder {
            origin: self.origin,
            positions: self.positions,
            values: self.values,
            identical,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.positions.reserve(capacity);
        self.values.reserve(capacity);
        self
    }

    pub fn with_buffers(mut self, mut positions: Vec<Idx>, mut values: Vec<V>) -> Self {
        positions.clear();
        values.clear();

        self.positions = positions;
        self.values = values;
        self
    }

    pub fn with_origin(mut self, origin: Idx) -> Self {
        self.origin = origin;
        self
    }

    pub fn set_origin(&mut self, origin: Idx) -> &mut Self {
        debug_assert!(self.positions.is_empty(), "Origin must be set before the first push");
        self.origin = origin;
        self
    }

    /// Close the current segment at `end` with the given `value`.
    /// If the value is identical to the previous segment, the previous segment is extended instead.
    pub fn push(&mut self, end: Idx, value: V) -> &mut Self {
        debug_assert!(
            end > self.positions.last().copied().unwrap_or(self.origin),
            "Breakpoints must be strictly increasing"
        );

        if let (Some(last_value), Some(last_end)) = (self.values.last(), self.positions.last_mut())
        {
            if self.identical.identical(last_value, &value) {
                *last_end = end;
                return self;
            }
        }

        self.positions.push(end);
        self.values.push(value);
        self
    }

    pub fn build(self) -> Breakpoints<Idx, V, I> {
        Breakpoints {
            origin: self.origin,
            positions: self.positions,
            values: self.values,
            identical: self.identical,
        }
    }
}

/// Piecewise-constant genomic track encoded by the end positions of its segments.
///
/// The i-th value holds on [positions[i - 1], positions[i]), the first segment starts at the `origin`.
/// Positions are strictly increasing and no two neighbouring segments carry identical values.
/// Outside of [origin, positions[-1]) the track is implicitly zero.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, PartialEq, Debug, Default, Dissolve)]
pub struct Breakpoints<Idx: PrimInt, V, I: Identical<V>> {
    origin: Idx,
    positions: Vec<Idx>,
    values: Vec<V>,
    identical: I,
}

impl<Idx: PrimInt, V, I: Identical<V>> Breakpoints<Idx, V, I> {
    pub fn builder(identical: I) -> BreakpointsBuilder<Idx, V, I> {
        BreakpointsBuilder::new(identical)
    }

    /// Turn the track back into a builder, recycling the allocated buffers.
    pub fn rebuild(self) -> BreakpointsBuilder<Idx, V, I> {
        BreakpointsBuilder::new(self.identical).with_buffers(self.positions, self.values)
    }

    /// Assemble a track from raw breakpoints. Redundant breakpoints are compressed away.
    pub fn from_parts(
        origin: Idx,
        positions: Vec<Idx>,
        values: Vec<V>,
        identical: I,
    ) -> Result<Self> {
        ensure!(
            positions.len() == values.len(),
            "Positions and values must have the same length, got {} and {}",
            positions.len(),
            values.len()
        );

        let mut previous = origin;
        for position in &positions {
            ensure!(
                *position > previous,
                "Breakpoints must be strictly increasing and located after the origin ({:?}), got {:?} after {:?}",
                origin,
                position,
                previous
            );
            previous = *position;
        }

        let mut track = Self {
            origin,
            positions,
            values,
            identical,
        };
        track.compress();
        Ok(track)
    }

    /// Merge neighbouring segments with identical values. Compressing a compressed track is a no-op.
    pub fn compress(&mut self) -> &mut Self {
        if self.values.len() < 2 {
            return self;
        }

        let mut retained = 0;
        for cursor in 1..self.values.len() {
            if !self
                .identical
                .identical(&self.values[retained], &self.values[cursor])
            {
                retained += 1;
                self.values.swap(retained, cursor);
            }
            self.positions[retained] = self.positions[cursor];
        }

        self.positions.truncate(retained + 1);
        self.values.truncate(retained + 1);
        self
    }

    pub fn origin(&self) -> Idx {
        self.origin
    }

    pub fn positions(&self) -> &[Idx] {
        &self.positions
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn identical(&self, first: &V, second: &V) -> bool {
        self.identical.identical(first, second)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.values.clear();
    }

    /// Region covered by the track, if any.
    pub fn span(&self) -> Option<Interval<Idx>> {
        self.positions
            .last()
            .and_then(|end| Interval::new(self.origin, *end).ok())
    }

    /// (end position, value) pairs.
    pub fn breakpoints(&self) -> impl Iterator<Item = (Idx, &V)> {
        zip(self.positions.iter().copied(), self.values.iter())
    }

    /// (start, end, value) triplets for each segment of the track.
    pub fn segments(&self) -> impl Iterator<Item = (Idx, Idx, &V)> {
        once(self.origin)
            .chain(self.positions.iter().copied())
            .zip(self.breakpoints())
            .map(|(start, (end, value))| (start, end, value))
    }
}

impl<Idx: PrimInt, V: Float, I: Identical<V>> Breakpoints<Idx, V, I> {
    /// Value of the track at a single base: the value of the smallest breakpoint strictly greater than `base`.
    ///
    /// Note that this is not a `>=` lookup. A breakpoint is the exclusive end of its segment, so
    /// `base == end` already belongs to the next segment (or to the zero tail after the last one).
    pub fn value_at(&self, base: Idx) -> V {
        if base < self.origin {
            return V::zero();
        }
        let ind = self.positions.partition_point(|x| *x <= base);
        self.values.get(ind).copied().unwrap_or_else(V::zero)
    }

    /// Sum of the track values over all bases.
    pub fn integral(&self) -> Result<V> {
        let mut total = V::zero();
        for (start, end, value) in self.segments() {
            let length = V::from(end - start).ok_or_eyre("Segment length can't be represented")?;
            total = total + length * *value;
        }
        Ok(total)
    }

    /// Restrict the track to the given window. Zero-valued segments at the edges are dropped.
    pub fn clipped(&self, window: &Interval<Idx>) -> Self
    where
        I: Clone,
    {
        let mut builder = Self::builder(self.identical.clone()).with_origin(window.start());
        let mut started = false;

        for (start, end, value) in self.segments() {
            let Some(segment) = Interval::new(start, end)
                .ok()
                .and_then(|x| x.intersection(window))
            else {
                continue;
            };
            let (start, end) = (segment.start(), segment.end());
            if !started {
                if value.is_zero() {
                    continue;
                }
                builder.set_origin(start);
                started = true;
            }
            builder.push(end, *value);
        }

        let mut track = builder.build();
        while track.values.last().is_some_and(|x| x.is_zero()) {
            track.values.pop();
            track.positions.pop();
        }
        track
    }
}
