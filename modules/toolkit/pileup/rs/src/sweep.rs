use derive_getters::{Dissolve, Getters};
use eyre::{OptionExt, Result};
use itertools::Itertools;

use covbit_collections_rs::breakpoints::{Breakpoints, Exact};
use covbit_core_rs::loc::IntervalOp;
use covbit_core_rs::num::{Float, PrimSInt};

use crate::extension::Extension;
use crate::store::Read;

/// Compressed pileup of a single chromosome.
pub type Track<Idx, Cnts> = Breakpoints<Idx, Cnts, Exact>;

/// Bookkeeping of a single sweep.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Getters, Dissolve)]
pub struct SweepStats {
    reads: usize,
    fragments: usize,
    skipped: usize,
}

/// Sweep-line accumulator of fragment coverage.
///
/// Each fragment yields a +1 event at its start and a -1 event at its end. Events are sorted by
/// coordinate, events sharing a coordinate are merged, and the running sum between two consecutive
/// coordinates becomes one segment of the resulting track.
/// The event buffer is kept between calls to avoid reallocations.
#[derive(Debug, Default)]
pub struct Sweep<Idx: PrimSInt> {
    events: Vec<(Idx, isize)>,
}

impl<Idx: PrimSInt> Sweep<Idx> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run<Cnts: Float>(
        &mut self,
        reads: impl IntoIterator<Item = Read<Idx>>,
        extension: &Extension<Idx>,
        saveto: Track<Idx, Cnts>,
    ) -> Result<(Track<Idx, Cnts>, SweepStats)> {
        let mut stats = SweepStats::default();

        self.events.clear();
        for read in reads {
            stats.reads += 1;

            let fragment = extension.extend(read.position, read.strand);
            if fragment.is_empty() {
                stats.skipped += 1;
                continue;
            }
            stats.fragments += 1;

            self.events.push((fragment.start(), 1));
            self.events.push((fragment.end(), -1));
        }
        self.events.sort_unstable_by_key(|(position, _)| *position);

        let mut builder = saveto.rebuild();
        let first = match self.events.first() {
            Some((first, _)) => *first,
            None => return Ok((builder.build(), stats)),
        };

        // Tracks start at 0 unless fragments reach into negative coordinates.
        // The gap before the first fragment is an explicit zero-coverage segment.
        let origin = first.min(Idx::zero());
        builder.set_origin(origin);
        if first > origin {
            builder.push(first, Cnts::zero());
        }

        let mut cursor = first;
        let mut coverage: isize = 0;
        for (position, events) in &self.events.iter().chunk_by(|(position, _)| *position) {
            if position != cursor {
                let value = Cnts::from(coverage)
                    .ok_or_eyre("Coverage value can't be represented by the track value type")?;
                builder.push(position, value);
                cursor = position;
            }
            coverage += events.map(|(_, delta)| *delta).sum::<isize>();
        }
        debug_assert_eq!(coverage, 0, "Every fragment must be closed by the end of the sweep");

        Ok((builder.build(), stats))
    }
}

/// Pileup of a single chromosome: extend each read into a fragment and sum up the fragments.
pub fn pileup<Idx: PrimSInt, Cnts: Float>(
    reads: impl IntoIterator<Item = Read<Idx>>,
    extension_length: Idx,
    halfextension: bool,
) -> Result<Track<Idx, Cnts>> {
    let extension = Extension::new(extension_length, halfextension)?;
    let (track, _) = Sweep::new().run(reads, &extension, Track::default())?;
    Ok(track)
}
