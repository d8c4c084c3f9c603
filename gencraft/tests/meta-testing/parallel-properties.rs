//! Parallel runner meta tests
//!
//! The parallel runner must be indistinguishable from the sequential one
//! for the same seed, whatever the thread count or work distribution.

use crate::{arbitrary_seed, check};
use gencraft::*;

/// Property: A parallel run reports exactly what a sequential run reports
pub fn test_parallel_agrees_with_sequential() {
    let prop = for_all_named(arbitrary_seed(), "seed", |&seed: &Seed| {
        let (run_seed, _) = seed.next_u64();
        let inner = for_all(Gen::integer(0u32, 500).unwrap(), |&x| x < 480)
            .classify("small", |&x| x < 100);
        let config = Config::default().with_tests(150).with_seed(run_seed);

        let parallel = inner.run_parallel(&config, &ParallelConfig::default().with_threads(3));
        parallel.outcome == inner.run(&config)
    });

    check("Parallel agrees with sequential", prop, 25);
}

/// The reported failure does not depend on how work is split up.
pub fn test_thread_count_does_not_change_failures() {
    let prop = for_all(Gen::integer(0u32, 10_000).unwrap(), |&x| x % 50 != 0);
    let config = Config::default().with_tests(1000).with_seed(2024);
    let sequential = prop.run(&config);
    assert!(matches!(sequential, TestResult::Fail { .. }));

    for threads in [1, 2, 5, 16] {
        for distribution in [WorkDistribution::RoundRobin, WorkDistribution::ChunkBased] {
            let parallel_config = ParallelConfig::default()
                .with_threads(threads)
                .with_distribution(distribution);
            let result = prop.run_parallel(&config, &parallel_config);
            assert_eq!(result.outcome, sequential, "{threads} threads, {distribution:?}");
        }
    }
}
