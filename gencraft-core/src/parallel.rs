//! Parallel property execution.
//!
//! Trial seeds are derived up front from the run seed, exactly as the
//! sequential runner derives them, and handed out to worker threads. Each
//! worker owns the seeds it was given, so no random state is shared.
//! Outcomes are folded back in trial order, which makes a parallel run
//! report the same verdict, counterexample and trial seed as a sequential
//! run with the same seed.

use crate::{data::*, error::*, property::*};
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Configuration for parallel property testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Number of threads to use for parallel execution
    pub thread_count: usize,
    /// How to distribute work across threads
    pub work_distribution: WorkDistribution,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        ParallelConfig {
            thread_count: num_cpus::get(),
            work_distribution: WorkDistribution::RoundRobin,
        }
    }
}

impl ParallelConfig {
    pub fn with_threads(mut self, thread_count: usize) -> Self {
        self.thread_count = thread_count;
        self
    }

    pub fn with_distribution(mut self, work_distribution: WorkDistribution) -> Self {
        self.work_distribution = work_distribution;
        self
    }
}

/// Strategies for distributing work across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkDistribution {
    /// Trial `i` goes to thread `i % threads`
    RoundRobin,
    /// Each thread takes one contiguous block of trials
    ChunkBased,
}

/// Result of parallel property testing.
#[derive(Debug, Clone)]
pub struct ParallelTestResult {
    /// Overall test outcome, identical to a sequential run
    pub outcome: TestResult,
    /// Threads actually used
    pub thread_count: usize,
    /// Trials evaluated, including ones past the first failure
    pub trials_evaluated: usize,
    /// Total wall clock time
    pub total_duration: Duration,
}

impl<T> Property<T>
where
    T: 'static + Debug,
{
    /// Run the property with its trials spread across worker threads.
    pub fn run_parallel(
        &self,
        config: &Config,
        parallel_config: &ParallelConfig,
    ) -> ParallelTestResult {
        let start_time = Instant::now();
        let seed = config.resolve_seed();
        let trial_seeds: Vec<Seed> = Seed::from_u64(seed)
            .splits()
            .take(config.test_limit)
            .collect();

        let threads = parallel_config
            .thread_count
            .clamp(1, trial_seeds.len().max(1));
        let assignments = distribute_work(
            trial_seeds.len(),
            threads,
            parallel_config.work_distribution,
        );
        tracing::debug!(seed, threads, trials = trial_seeds.len(), "running property in parallel");

        // Lowest trial index known to end the run; later trials can be skipped.
        let stop_at = AtomicUsize::new(usize::MAX);
        let mut outcomes: Vec<Option<TrialOutcome>> = vec![None; trial_seeds.len()];

        thread::scope(|scope| {
            let handles: Vec<_> = assignments
                .into_iter()
                .enumerate()
                .map(|(thread_id, indices)| {
                    let trial_seeds = &trial_seeds;
                    let stop_at = &stop_at;
                    scope.spawn(move || {
                        let mut evaluated = Vec::with_capacity(indices.len());
                        for index in indices {
                            if index > stop_at.load(Ordering::Acquire) {
                                break;
                            }
                            let outcome = self.run_trial(trial_seeds[index]);
                            if outcome.ends_run(config) {
                                stop_at.fetch_min(index, Ordering::AcqRel);
                            }
                            evaluated.push((index, outcome));
                        }
                        tracing::debug!(thread_id, evaluated = evaluated.len(), "worker finished");
                        evaluated
                    })
                })
                .collect();

            for handle in handles {
                match handle.join() {
                    Ok(evaluated) => {
                        for (index, outcome) in evaluated {
                            outcomes[index] = Some(outcome);
                        }
                    }
                    Err(payload) => std::panic::resume_unwind(payload),
                }
            }
        });

        let trials_evaluated = outcomes.iter().filter(|o| o.is_some()).count();
        let mut summary = RunSummary::new(self, config, seed);
        let mut outcome = None;
        for (index, (trial_seed, trial)) in trial_seeds.iter().zip(outcomes).enumerate() {
            // Every trial before the first terminal one was evaluated.
            let Some(trial) = trial else { break };
            if let Some(result) = summary.record(index, *trial_seed, trial) {
                outcome = Some(result);
                break;
            }
        }

        ParallelTestResult {
            outcome: outcome.unwrap_or_else(|| summary.finish()),
            thread_count: threads,
            trials_evaluated,
            total_duration: start_time.elapsed(),
        }
    }
}

/// Split trial indices `0..total` across `threads` workers.
///
/// Each worker's list is ascending, which the early-stop check relies on.
fn distribute_work(total: usize, threads: usize, strategy: WorkDistribution) -> Vec<Vec<usize>> {
    match strategy {
        WorkDistribution::RoundRobin => (0..threads)
            .map(|thread| (thread..total).step_by(threads).collect())
            .collect(),
        WorkDistribution::ChunkBased => {
            let chunk_size = total.div_ceil(threads).max(1);
            (0..threads)
                .map(|thread| {
                    let start = (thread * chunk_size).min(total);
                    let end = ((thread + 1) * chunk_size).min(total);
                    (start..end).collect()
                })
                .collect()
        }
    }
}
