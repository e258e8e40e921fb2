use derive_getters::Dissolve;
use eyre::WrapErr;

use covbit_core_rs::loc::Contig;
use covbit_core_rs::num::{Float, PrimSInt};

use crate::engine::Outcome;
use crate::extension::Extension;
use crate::result::Summary;
use crate::store::ReadStore;
use crate::sweep::{Sweep, Track};

/// Per-thread state of the engine. Chromosomes are processed one at a time, results are kept
/// until the engine collects them.
#[derive(Dissolve)]
pub struct Worker<Ctg: Contig, Idx: PrimSInt, Cnts: Float> {
    // (Chromosome index, outcome)
    outcomes: Vec<(usize, Outcome<Ctg, Idx, Cnts>)>,
    // Reusable sweep buffers
    sweep: Sweep<Idx>,
}

impl<Ctg: Contig, Idx: PrimSInt, Cnts: Float> Default for Worker<Ctg, Idx, Cnts> {
    fn default() -> Self {
        Self {
            outcomes: Vec::new(),
            sweep: Sweep::new(),
        }
    }
}

impl<Ctg: Contig, Idx: PrimSInt, Cnts: Float> Worker<Ctg, Idx, Cnts> {
    pub fn reset(&mut self) {
        self.outcomes.clear();
    }

    pub fn process<S>(
        &mut self,
        chromosome: &Ctg,
        store: &S,
        extension: &Extension<Idx>,
    ) -> Outcome<Ctg, Idx, Cnts>
    where
        S: ReadStore<Ctg = Ctg, Idx = Idx>,
    {
        let launched_at = std::time::Instant::now();

        let reads = store
            .reads_for(chromosome)
            .wrap_err_with(|| format!("Failed to fetch reads for {chromosome:?}"))?;
        let (track, stats): (Track<Idx, Cnts>, _) =
            self.sweep.run(reads, extension, Track::default())?;

        let (reads, fragments, skipped) = stats.dissolve();
        let summary = Summary::new(
            chromosome.clone(),
            reads,
            fragments,
            skipped,
            track.len(),
            launched_at.elapsed().as_secs_f64(),
        );
        log::debug!(
            "Pileup for {chromosome:?}: {reads} reads, {skipped} zero-width fragments, {} breakpoints",
            track.len()
        );

        Ok((track, summary))
    }

    pub fn save(&mut self, ind: usize, outcome: Outcome<Ctg, Idx, Cnts>) {
        self.outcomes.push((ind, outcome));
    }

    /// Move outcomes of all workers into a single vector, indexed by the chromosome index.
    pub fn collect<'a>(
        chromosomes: usize,
        workers: impl Iterator<Item = &'a mut Self>,
    ) -> Vec<Option<Outcome<Ctg, Idx, Cnts>>>
    where
        Ctg: 'a,
        Idx: 'a,
        Cnts: 'a,
    {
        let mut collected: Vec<_> = (0..chromosomes).map(|_| None).collect();
        for worker in workers {
            for (ind, outcome) in worker.outcomes.drain(..) {
                debug_assert!(collected[ind].is_none());
                collected[ind] = Some(outcome);
            }
        }
        collected
    }
}
