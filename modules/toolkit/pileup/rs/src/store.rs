use ahash::AHashMap;
use derive_getters::Dissolve;
use derive_more::Constructor;
use eyre::{ensure, eyre, Report, Result};
use itertools::Itertools;

use covbit_core_rs::loc::{Contig, PerStrand, Strand};
use covbit_core_rs::num::PrimSInt;

/// 5' position of a sequencing read together with its strand.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Constructor, Dissolve)]
pub struct Read<Idx> {
    pub position: Idx,
    pub strand: Strand,
}

/// Source of read positions, queried once per chromosome.
pub trait ReadStore {
    type Ctg: Contig;
    type Idx: PrimSInt;

    /// Sorted names of all chromosomes known to the store.
    fn chromosome_names(&self) -> Vec<Self::Ctg>;

    /// All reads of the given chromosome, in any order. Unknown chromosomes are an error.
    fn reads_for(
        &self,
        chromosome: &Self::Ctg,
    ) -> Result<impl Iterator<Item = Read<Self::Idx>> + '_>;
}

/// In-memory fixed-width read track: 5' positions of reads, grouped by chromosome and strand.
#[derive(Clone, Debug)]
pub struct ReadTrack<Ctg: Contig, Idx: PrimSInt> {
    reads: AHashMap<Ctg, PerStrand<Vec<Idx>>>,
}

impl<Ctg: Contig, Idx: PrimSInt> Default for ReadTrack<Ctg, Idx> {
    fn default() -> Self {
        Self {
            reads: AHashMap::new(),
        }
    }
}

impl<Ctg: Contig, Idx: PrimSInt> ReadTrack<Ctg, Idx> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_loc(&mut self, chromosome: Ctg, position: Idx, strand: Strand) -> Result<&mut Self> {
        ensure!(
            position >= Idx::zero(),
            "Read position must be non-negative, got {:?} on {:?}",
            position,
            chromosome
        );
        self.reads
            .entry(chromosome)
            .or_default()
            .get_mut(strand)
            .push(position);
        Ok(self)
    }

    /// Add a read with a strand encoded by a tag: '+'/'-' symbols or 0/1 track flags.
    pub fn add_tagged<T>(&mut self, chromosome: Ctg, position: Idx, tag: T) -> Result<&mut Self>
    where
        T: TryInto<Strand, Error = Report>,
    {
        let strand = tag.try_into()?;
        self.add_loc(chromosome, position, strand)
    }

    pub fn add_locs(
        &mut self,
        chromosome: Ctg,
        positions: impl IntoIterator<Item = Idx>,
        strand: Strand,
    ) -> Result<&mut Self> {
        // Nothing is stored, not even the chromosome, unless all positions are valid
        let positions: Vec<Idx> = positions.into_iter().collect();
        if let Some(position) = positions.iter().find(|x| **x < Idx::zero()) {
            return Err(eyre!(
                "Read position must be non-negative, got {:?} on {:?}",
                position,
                chromosome
            ));
        }

        self.reads
            .entry(chromosome)
            .or_default()
            .get_mut(strand)
            .extend(positions);
        Ok(self)
    }

    /// Sort read positions within each chromosome and strand.
    pub fn sort(&mut self) -> &mut Self {
        for positions in self.reads.values_mut() {
            positions.apply(|_, x| x.sort_unstable());
        }
        self
    }

    /// Number of reads per strand on the given chromosome.
    pub fn count(&self, chromosome: &Ctg) -> Option<PerStrand<usize>> {
        self.reads
            .get(chromosome)
            .map(|x| PerStrand::new(x.forward.len(), x.reverse.len()))
    }

    pub fn total(&self) -> usize {
        self.reads
            .values()
            .map(|x| x.forward.len() + x.reverse.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn clear(&mut self) {
        self.reads.clear();
    }
}

impl<Ctg: Contig, Idx: PrimSInt> ReadStore for ReadTrack<Ctg, Idx> {
    type Ctg = Ctg;
    type Idx = Idx;

    fn chromosome_names(&self) -> Vec<Ctg> {
        self.reads.keys().cloned().sorted().collect()
    }

    fn reads_for(&self, chromosome: &Ctg) -> Result<impl Iterator<Item = Read<Idx>> + '_> {
        let reads = self
            .reads
            .get(chromosome)
            .ok_or_else(|| eyre!("Chromosome {:?} is not present in the read track", chromosome))?;

        Ok(reads.iter().flat_map(|(strand, positions)| {
            positions.iter().map(move |position| Read::new(*position, strand))
        }))
    }
}
