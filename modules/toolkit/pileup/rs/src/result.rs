use std::collections::BTreeMap;

use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;

use covbit_core_rs::loc::Contig;
use covbit_core_rs::num::{Float, PrimSInt};

use crate::sweep::Track;

#[derive(Clone, PartialEq, Debug, Constructor, Dissolve, Getters)]
pub struct Summary<Ctg: Contig> {
    contig: Ctg,
    // Reads fetched from the store
    reads: usize,
    // Non-empty fragments and zero-width fragments that were skipped
    fragments: usize,
    skipped: usize,
    // Size of the compressed track
    breakpoints: usize,
    // Time spent processing the chromosome
    time_s: f64,
}

/// Pileup tracks for a set of chromosomes together with the per-chromosome run summaries.
#[derive(Clone, Debug, Dissolve)]
pub struct Pileup<Ctg: Contig, Idx: PrimSInt, Cnts: Float> {
    tracks: BTreeMap<Ctg, Track<Idx, Cnts>>,
    summaries: Vec<Summary<Ctg>>,
}

impl<Ctg: Contig, Idx: PrimSInt, Cnts: Float> Default for Pileup<Ctg, Idx, Cnts> {
    fn default() -> Self {
        Self {
            tracks: BTreeMap::new(),
            summaries: Vec::new(),
        }
    }
}

impl<Ctg: Contig, Idx: PrimSInt, Cnts: Float> Pileup<Ctg, Idx, Cnts> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, track: Track<Idx, Cnts>, summary: Summary<Ctg>) -> &mut Self {
        self.tracks.insert(summary.contig().clone(), track);
        self.summaries.push(summary);
        self
    }

    /// Compressed track of the chromosome, if it was processed.
    pub fn breakpoints(&self, chromosome: &Ctg) -> Option<&Track<Idx, Cnts>> {
        self.tracks.get(chromosome)
    }

    /// Coverage at a single base, see [`Breakpoints::value_at`]: a base equal to a breakpoint
    /// takes the value of the following segment. Chromosomes without a track have zero coverage.
    ///
    /// [`Breakpoints::value_at`]: covbit_collections_rs::breakpoints::Breakpoints::value_at
    pub fn value_at(&self, chromosome: &Ctg, base: Idx) -> Cnts {
        self.tracks
            .get(chromosome)
            .map(|track| track.value_at(base))
            .unwrap_or_else(Cnts::zero)
    }

    pub fn chromosome_names(&self) -> impl Iterator<Item = &Ctg> {
        self.tracks.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ctg, &Track<Idx, Cnts>)> {
        self.tracks.iter()
    }

    pub fn summaries(&self) -> &[Summary<Ctg>] {
        &self.summaries
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<Ctg, Track<Idx, Cnts>> {
        self.tracks
    }
}

#[cfg(test)]
mod tests {
    use covbit_collections_rs::breakpoints::Exact;
    use eyre::Result;

    use super::*;

    #[test]
    fn test_pileup_queries() -> Result<()> {
        let mut pileup = Pileup::<&str, i64, f32>::new();
        pileup.insert(
            Track::from_parts(0, vec![1, 3], vec![2.0, 4.0], Exact)?,
            Summary::new("chr1", 3, 3, 0, 2, 0.0),
        );
        pileup.insert(Track::default(), Summary::new("chrM", 0, 0, 0, 0, 0.0));

        assert_eq!(pileup.len(), 2);
        assert_eq!(pileup.chromosome_names().collect::<Vec<_>>(), [&"chr1", &"chrM"]);
        assert_eq!(pileup.value_at(&"chr1", 0), 2.0);
        assert_eq!(pileup.value_at(&"chr1", 2), 4.0);
        assert_eq!(pileup.value_at(&"chr1", 3), 0.0);
        assert_eq!(pileup.value_at(&"chrM", 0), 0.0);
        assert_eq!(pileup.value_at(&"chrX", 0), 0.0);
        assert!(pileup.breakpoints(&"chrM").is_some_and(|x| x.is_empty()));
        assert!(pileup.breakpoints(&"chrX").is_none());
        assert_eq!(pileup.summaries()[0].reads(), &3);
        Ok(())
    }
}
