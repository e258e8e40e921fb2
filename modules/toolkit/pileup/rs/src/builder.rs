use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::available_parallelism;

use eyre::{OptionExt, Result};
use itertools::Itertools;
use rayon::{ThreadPool, ThreadPoolBuilder};
use thread_local::ThreadLocal;

use covbit_core_rs::loc::Contig;
use covbit_core_rs::num::{Float, PrimSInt};

use crate::engine::Engine;
use crate::extension::Extension;

// Requested thread count to the pool size: negative requests leave |N| - 1 cores idle,
// everything is clamped to [1, available].
fn num_threads(requested: isize, available: usize) -> usize {
    let available = available as isize;
    let threads = if requested < 0 {
        available + 1 + requested
    } else {
        requested
    };
    threads.clamp(1, available) as usize
}

pub struct EngineBuilder<Ctg: Contig, Idx: PrimSInt> {
    extension: Option<Extension<Idx>>,
    chromosomes: Option<Vec<Ctg>>,
    thread_pool: Option<ThreadPool>,
    threads: Option<isize>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<Ctg: Contig, Idx: PrimSInt> Default for EngineBuilder<Ctg, Idx> {
    fn default() -> Self {
        Self {
            extension: None,
            chromosomes: None,
            thread_pool: None,
            threads: None,
            cancel: None,
        }
    }
}

impl<Ctg: Contig, Idx: PrimSInt + Send + Sync> EngineBuilder<Ctg, Idx> {
    pub fn set_extension(mut self, extension: Extension<Idx>) -> Self {
        self.extension = Some(extension);
        self
    }

    /// Restrict the pileup to the given chromosomes. Can be called multiple times.
    pub fn add_chromosomes(mut self, chromosomes: impl IntoIterator<Item = Ctg>) -> Self {
        self.chromosomes
            .get_or_insert_with(Vec::new)
            .extend(chromosomes);
        self
    }

    pub fn set_thread_pool(mut self, pool: ThreadPool) -> Self {
        self.thread_pool = Some(pool);
        self
    }

    /// Number of threads for a dedicated pool, capped by the available cores. Negative values
    /// mean all cores except N - 1, zero means a single thread.
    pub fn set_threads(mut self, threads: isize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn set_cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn build<Cnts>(self) -> Result<Engine<Ctg, Idx, Cnts>>
    where
        Cnts: Float + Send + Sync,
    {
        let extension = self
            .extension
            .ok_or_eyre("Extension must be set before building the pileup engine")?;

        let chromosomes = self.chromosomes.map(|chromosomes| {
            let requested = chromosomes.len();
            let unique: Vec<_> = chromosomes.into_iter().unique().collect();
            if unique.len() != requested {
                log::warn!(
                    "Duplicated chromosomes were merged (N={}), {} chromosome(s) left",
                    requested - unique.len(),
                    unique.len()
                );
            }
            unique
        });

        let thread_pool = match (self.thread_pool, self.threads) {
            (Some(pool), threads) => {
                if threads.is_some() {
                    log::warn!("Both thread pool and number of threads were set, using the pool");
                }
                Some(pool)
            }
            (None, Some(threads)) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(num_threads(threads, available_parallelism()?.get()))
                    .build()?,
            ),
            (None, None) => None,
        };

        Ok(Engine::new(
            thread_pool,
            extension,
            chromosomes,
            self.cancel.unwrap_or_default(),
            ThreadLocal::new(),
        ))
    }
}
