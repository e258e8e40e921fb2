use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use derive_more::Constructor;
use eyre::{ensure, eyre, Result};
use rayon::ThreadPool;
use thread_local::ThreadLocal;

use covbit_core_rs::loc::Contig;
use covbit_core_rs::num::{Float, PrimSInt};

use crate::builder::EngineBuilder;
use crate::extension::Extension;
use crate::result::{Pileup, Summary};
use crate::store::ReadStore;
use crate::sweep::Track;
use crate::worker::Worker;

/// Result of processing a single chromosome.
pub type Outcome<Ctg, Idx, Cnts> = Result<(Track<Idx, Cnts>, Summary<Ctg>)>;

/// Runs the pileup for every chromosome of a read store. Chromosomes are processed in parallel,
/// one chromosome per job.
#[derive(Constructor)]
pub struct Engine<Ctg: Contig, Idx: PrimSInt + Send, Cnts: Float + Send> {
    thread_pool: Option<ThreadPool>,
    extension: Extension<Idx>,
    // Chromosomes to process. All chromosomes of the store if not set.
    chromosomes: Option<Vec<Ctg>>,
    // Checked before each chromosome; remaining chromosomes are skipped once it is raised
    cancel: Arc<AtomicBool>,
    workers: ThreadLocal<RefCell<Worker<Ctg, Idx, Cnts>>>,
}

impl<Ctg, Idx, Cnts> Engine<Ctg, Idx, Cnts>
where
    Ctg: Contig,
    Idx: PrimSInt + Send + Sync,
    Cnts: Float + Send + Sync,
{
    pub fn builder() -> EngineBuilder<Ctg, Idx> {
        EngineBuilder::default()
    }

    pub fn extension(&self) -> &Extension<Idx> {
        &self.extension
    }

    /// Handle that cancels the remaining chromosomes of the current or next run.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Pileup of all chromosomes. The first failed chromosome aborts the whole run.
    pub fn run<S>(&mut self, store: &S) -> Result<Pileup<Ctg, Idx, Cnts>>
    where
        S: ReadStore<Ctg = Ctg, Idx = Idx> + Sync,
    {
        let (chromosomes, outcomes) = self.dispatch(store, true);

        let mut pileup = Pileup::new();
        let mut skipped = Vec::new();
        for (chromosome, outcome) in chromosomes.into_iter().zip(outcomes) {
            match outcome {
                Some(Ok((track, summary))) => {
                    pileup.insert(track, summary);
                }
                Some(Err(err)) => {
                    return Err(err.wrap_err(format!("Pileup failed for chromosome {chromosome:?}")))
                }
                None => skipped.push(chromosome),
            }
        }
        ensure!(
            skipped.is_empty(),
            "Pileup was cancelled, {} chromosome(s) were not processed: {:?}",
            skipped.len(),
            skipped
        );

        Ok(pileup)
    }

    /// Pileup of all chromosomes, reporting the outcome of each chromosome separately.
    pub fn run_each<S>(&mut self, store: &S) -> Vec<(Ctg, Outcome<Ctg, Idx, Cnts>)>
    where
        S: ReadStore<Ctg = Ctg, Idx = Idx> + Sync,
    {
        let (chromosomes, outcomes) = self.dispatch(store, false);
        chromosomes
            .into_iter()
            .zip(outcomes)
            .map(|(chromosome, outcome)| {
                let outcome = outcome.unwrap_or_else(|| {
                    Err(eyre!(
                        "Pileup was cancelled before {chromosome:?} was processed"
                    ))
                });
                (chromosome, outcome)
            })
            .collect()
    }

    #[allow(clippy::type_complexity)]
    fn dispatch<S>(
        &mut self,
        store: &S,
        abort_on_error: bool,
    ) -> (Vec<Ctg>, Vec<Option<Outcome<Ctg, Idx, Cnts>>>)
    where
        S: ReadStore<Ctg = Ctg, Idx = Idx> + Sync,
    {
        match self.thread_pool.take() {
            Some(pool) => {
                let result = pool.install(|| self._dispatch(store, abort_on_error));
                self.thread_pool = Some(pool);
                result
            }
            None => self._dispatch(store, abort_on_error),
        }
    }

    #[allow(clippy::type_complexity)]
    fn _dispatch<S>(
        &mut self,
        store: &S,
        abort_on_error: bool,
    ) -> (Vec<Ctg>, Vec<Option<Outcome<Ctg, Idx, Cnts>>>)
    where
        S: ReadStore<Ctg = Ctg, Idx = Idx> + Sync,
    {
        // Soft-reset all workers
        for w in self.workers.iter_mut() {
            w.get_mut().reset();
        }

        let chromosomes = match &self.chromosomes {
            Some(chromosomes) => chromosomes.clone(),
            None => store.chromosome_names(),
        };
        log::debug!(
            "Running pileup for {} chromosome(s) with {:?}",
            chromosomes.len(),
            self.extension
        );

        let failed = AtomicBool::new(false);
        let has_failed = &failed;
        let (workers, extension, cancel) = (&self.workers, &self.extension, &*self.cancel);

        let must_stop = || {
            cancel.load(Ordering::Relaxed)
                || (abort_on_error && has_failed.load(Ordering::Relaxed))
        };

        rayon::scope(|s| {
            for (ind, chromosome) in chromosomes.iter().enumerate() {
                // Stop spawning new jobs if the run was cancelled or has failed
                if must_stop() {
                    return;
                }

                s.spawn(move |_| {
                    if must_stop() {
                        return;
                    }

                    let mut worker = workers.get_or_default().borrow_mut();
                    let outcome = worker.process(chromosome, store, extension);
                    if let Err(err) = &outcome {
                        has_failed.store(true, Ordering::Relaxed);
                        log::error!("Pileup failed for chromosome {chromosome:?}: {err:?}");
                    }
                    worker.save(ind, outcome);
                });
            }
        });

        let collected = Worker::collect(
            chromosomes.len(),
            self.workers.iter_mut().map(|x| x.get_mut()),
        );
        (chromosomes, collected)
    }
}
