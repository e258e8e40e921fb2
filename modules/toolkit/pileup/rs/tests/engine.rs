use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use eyre::Result;
use rayon::ThreadPoolBuilder;

use covbit_core_rs::loc::Strand;
use covbit_pileup_rs::{pileup, Engine, Extension, ReadStore, ReadTrack, Track};

const THREADS: isize = -1;

fn store() -> Result<ReadTrack<String, i64>> {
    let mut store = ReadTrack::new();
    store
        .add_locs("chr1".into(), [0, 1, 3, 4, 5], Strand::Forward)?
        .add_locs("chr1".into(), [5, 6, 8, 9, 10], Strand::Reverse)?
        .add_locs("chr2".into(), [100, 7, 100, 250], Strand::Forward)?
        .add_locs("chr2".into(), [3, 120], Strand::Reverse)?
        .add_locs("chrM".into(), [], Strand::Forward)?;
    Ok(store)
}

fn pairs(track: &Track<i64, f64>) -> Vec<(i64, f64)> {
    track.breakpoints().map(|(p, v)| (p, *v)).collect()
}

#[test]
fn reference_pileup() -> Result<()> {
    let store = store()?;
    let mut engine = Engine::<String, i64, f64>::builder()
        .set_extension(Extension::full(5)?)
        .set_threads(THREADS)
        .build::<f64>()?;

    let result = engine.run(&store)?;
    assert_eq!(result.len(), 3);
    assert_eq!(
        result.chromosome_names().collect::<Vec<_>>(),
        ["chr1", "chr2", "chrM"]
    );

    let chr1 = result.breakpoints(&"chr1".into()).unwrap();
    assert_eq!(chr1.origin(), 0);
    assert_eq!(
        pairs(chr1),
        vec![
            (1, 2.0),
            (3, 4.0),
            (4, 6.0),
            (6, 8.0),
            (8, 6.0),
            (9, 4.0),
            (10, 2.0)
        ]
    );
    assert!(result.breakpoints(&"chrM".into()).unwrap().is_empty());

    for (base, expected) in [(-1, 0.0), (0, 2.0), (1, 4.0), (5, 8.0), (9, 2.0), (10, 0.0)] {
        assert_eq!(result.value_at(&"chr1".into(), base), expected);
    }
    assert_eq!(result.value_at(&"chrX".into(), 0), 0.0);

    // Engine output matches the single-chromosome pileup
    for chromosome in store.chromosome_names() {
        let expected: Track<i64, f64> = pileup(store.reads_for(&chromosome)?, 5, false)?;
        assert_eq!(result.breakpoints(&chromosome), Some(&expected));
    }

    let summary = result
        .summaries()
        .iter()
        .find(|x| x.contig() == "chr1")
        .unwrap();
    assert_eq!(
        (summary.reads(), summary.fragments(), summary.skipped(), summary.breakpoints()),
        (&10, &10, &0, &7)
    );
    Ok(())
}

#[test]
fn engine_is_reusable() -> Result<()> {
    let store = store()?;
    let pool = ThreadPoolBuilder::new().num_threads(2).build()?;
    let mut engine = Engine::<String, i64, f32>::builder()
        .set_extension(Extension::centered(6)?)
        .set_thread_pool(pool)
        .build::<f32>()?;

    let first = engine.run(&store)?.into_inner();
    let second = engine.run(&store)?.into_inner();
    assert_eq!(first, second);

    // Half extension: [p - 3, p + 3) regardless of the strand
    let chr2 = &first["chr2"];
    assert_eq!(chr2.origin(), 0);
    assert_eq!(
        chr2.breakpoints().map(|(p, v)| (p, *v)).collect::<Vec<_>>(),
        vec![
            (4, 1.0),
            (6, 2.0),
            (10, 1.0),
            (97, 0.0),
            (103, 2.0),
            (117, 0.0),
            (123, 1.0),
            (247, 0.0),
            (253, 1.0)
        ]
    );
    Ok(())
}

#[test]
fn restricted_chromosomes() -> Result<()> {
    let store = store()?;
    let mut engine = Engine::<String, i64, f64>::builder()
        .set_extension(Extension::full(5)?)
        .add_chromosomes(["chr2".to_string(), "chr1".to_string()])
        .add_chromosomes(["chr2".to_string()])
        .build::<f64>()?;

    let result = engine.run(&store)?;
    assert_eq!(result.len(), 2);
    assert_eq!(
        result
            .summaries()
            .iter()
            .map(|x| x.contig().as_str())
            .collect::<Vec<_>>(),
        ["chr2", "chr1"]
    );
    assert!(result.breakpoints(&"chrM".into()).is_none());
    Ok(())
}

#[test]
fn missing_chromosome() -> Result<()> {
    let store = store()?;
    let mut engine = Engine::<String, i64, f64>::builder()
        .set_extension(Extension::full(5)?)
        .add_chromosomes(["chr1".to_string(), "chrX".to_string()])
        .set_threads(1)
        .build::<f64>()?;

    assert!(engine.run(&store).is_err());

    let outcomes = engine.run_each(&store);
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].0, "chr1");
    assert!(outcomes[0].1.is_ok());
    assert_eq!(outcomes[1].0, "chrX");
    assert!(outcomes[1].1.is_err());
    Ok(())
}

#[test]
fn cancellation() -> Result<()> {
    let store = store()?;
    let token = Arc::new(AtomicBool::new(true));
    let mut engine = Engine::<String, i64, f64>::builder()
        .set_extension(Extension::full(5)?)
        .set_cancel_token(token.clone())
        .build::<f64>()?;

    assert!(engine.run(&store).is_err());
    let outcomes = engine.run_each(&store);
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|(_, outcome)| outcome.is_err()));

    token.store(false, Ordering::Relaxed);
    assert_eq!(engine.run(&store)?.len(), 3);

    engine.cancel_token().store(true, Ordering::Relaxed);
    assert!(token.load(Ordering::Relaxed));
    Ok(())
}

#[test]
fn invalid_configuration() {
    assert!(Extension::<i64>::new(-1, false).is_err());
    assert!(Engine::<String, i64, f64>::builder().build::<f64>().is_err());
}
