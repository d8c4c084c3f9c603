//! Property definitions and the sequential runner.

use crate::{data::*, error::*, gen::*};
use std::collections::HashMap;
use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe};

/// Statistics gathered during property testing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestStatistics {
    pub classifications: HashMap<String, usize>,
    pub total_tests: usize,
}

impl TestStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_classification(&mut self, name: &str) {
        *self.classifications.entry(name.to_string()).or_insert(0) += 1;
    }
}

type CheckFn<T> = Box<dyn Fn(&T) -> std::result::Result<(), String> + Send + Sync>;
type ClassificationFn<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// What happened in a single trial.
#[derive(Debug, Clone, PartialEq)]
pub enum TrialOutcome {
    /// The property held. Carries the indices of matching classifications.
    Passed { labels: Vec<usize> },
    /// The property did not hold for `counterexample`.
    Falsified {
        counterexample: String,
        message: String,
    },
    /// No sample could be drawn.
    GeneratorFailed(GencraftError),
}

impl TrialOutcome {
    /// Whether this outcome ends the run under `config`.
    pub fn ends_run(&self, config: &Config) -> bool {
        match self {
            TrialOutcome::Passed { .. } => false,
            TrialOutcome::Falsified { .. } => true,
            TrialOutcome::GeneratorFailed(_) => !config.continue_on_generator_error,
        }
    }
}

/// A property that can be tested with generated inputs.
pub struct Property<T> {
    generator: Gen<T>,
    check: CheckFn<T>,
    property_name: Option<String>,
    variable_name: Option<String>,
    classifications: Vec<(String, ClassificationFn<T>)>,
}

impl<T> Property<T>
where
    T: 'static + Debug,
{
    /// Create a property whose check reports failures as `Err(message)`.
    ///
    /// A panic inside the check, such as a failed `assert!` or an
    /// out-of-bounds slice, also counts as a falsification.
    pub fn new<F>(generator: Gen<T>, check: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        Property {
            generator,
            check: Box::new(check),
            property_name: None,
            variable_name: None,
            classifications: Vec::new(),
        }
    }

    /// Create a property that checks a boolean condition.
    pub fn for_all<F>(generator: Gen<T>, condition: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Property::new(generator, move |input| {
            if condition(input) {
                Ok(())
            } else {
                Err("Boolean Condition".to_string())
            }
        })
    }

    /// Name the property in reports.
    pub fn named(mut self, name: &str) -> Self {
        self.property_name = Some(name.to_string());
        self
    }

    /// Name the generated variable in reports.
    pub fn with_variable_name(mut self, name: &str) -> Self {
        self.variable_name = Some(name.to_string());
        self
    }

    /// Add a classification to categorize test inputs.
    pub fn classify<F>(mut self, name: &str, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.classifications
            .push((name.to_string(), Box::new(predicate)));
        self
    }

    pub fn property_name(&self) -> Option<&str> {
        self.property_name.as_deref()
    }

    /// Run this property with the given configuration.
    pub fn run(&self, config: &Config) -> TestResult {
        let seed = config.resolve_seed();
        tracing::debug!(
            property = self.property_name.as_deref().unwrap_or("property"),
            seed,
            tests = config.test_limit,
            "running property"
        );

        let mut summary = RunSummary::new(self, config, seed);
        for (index, trial_seed) in Seed::from_u64(seed)
            .splits()
            .take(config.test_limit)
            .enumerate()
        {
            let outcome = self.run_trial(trial_seed);
            if let Some(result) = summary.record(index, trial_seed, outcome) {
                return result;
            }
        }
        summary.finish()
    }

    /// Re-run a single trial from its trial seed.
    pub fn replay(&self, trial_seed: Seed) -> TrialOutcome {
        self.run_trial(trial_seed)
    }

    /// Draw one sample and check it.
    pub(crate) fn run_trial(&self, trial_seed: Seed) -> TrialOutcome {
        let drawn = panic::catch_unwind(AssertUnwindSafe(|| self.generator.sample(trial_seed)));
        let value = match drawn {
            Ok(Ok(value)) => value,
            Ok(Err(error)) => return TrialOutcome::GeneratorFailed(error),
            Err(payload) => {
                return TrialOutcome::GeneratorFailed(GencraftError::GeneratorPanicked {
                    message: panic_message(payload.as_ref()),
                })
            }
        };

        let verdict = panic::catch_unwind(AssertUnwindSafe(|| (self.check)(&value)))
            .unwrap_or_else(|payload| Err(format!("panicked: {}", panic_message(payload.as_ref()))));

        match verdict {
            Ok(()) => TrialOutcome::Passed {
                labels: self
                    .classifications
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, predicate))| predicate(&value))
                    .map(|(index, _)| index)
                    .collect(),
            },
            Err(message) => TrialOutcome::Falsified {
                counterexample: format!("{value:?}"),
                message,
            },
        }
    }
}

/// Folds trial outcomes, in trial order, into a [`TestResult`].
///
/// Both the sequential and the parallel runner feed outcomes through this
/// so that they agree on every verdict.
pub(crate) struct RunSummary<'a, T> {
    property: &'a Property<T>,
    config: &'a Config,
    seed: u64,
    statistics: TestStatistics,
    discards: usize,
    tests_run: usize,
}

impl<'a, T> RunSummary<'a, T> {
    pub(crate) fn new(property: &'a Property<T>, config: &'a Config, seed: u64) -> Self {
        RunSummary {
            property,
            config,
            seed,
            statistics: TestStatistics::new(),
            discards: 0,
            tests_run: 0,
        }
    }

    /// Record one outcome. Returns the final result if the run must stop.
    pub(crate) fn record(
        &mut self,
        index: usize,
        trial_seed: Seed,
        outcome: TrialOutcome,
    ) -> Option<TestResult> {
        self.tests_run = index + 1;
        match outcome {
            TrialOutcome::Passed { labels } => {
                for label in labels {
                    if let Some((name, _)) = self.property.classifications.get(label) {
                        self.statistics.record_classification(name);
                    }
                }
                None
            }
            TrialOutcome::Falsified {
                counterexample,
                message,
            } => {
                tracing::info!(
                    property = self.name().unwrap_or("property"),
                    seed = self.seed,
                    %trial_seed,
                    "property falsified"
                );
                Some(TestResult::Fail {
                    counterexample,
                    message,
                    tests_run: self.tests_run,
                    seed: self.seed,
                    trial_seed,
                    property_name: self.property.property_name.clone(),
                    variable_name: self.property.variable_name.clone(),
                })
            }
            TrialOutcome::GeneratorFailed(error) if self.config.continue_on_generator_error => {
                self.discards += 1;
                tracing::debug!(%error, %trial_seed, "discarding trial");
                (self.discards > self.config.discard_limit).then(|| TestResult::Discard {
                    limit: self.config.discard_limit,
                    tests_run: self.tests_run,
                    seed: self.seed,
                    property_name: self.property.property_name.clone(),
                })
            }
            TrialOutcome::GeneratorFailed(error) => Some(TestResult::GeneratorError {
                error,
                tests_run: self.tests_run,
                seed: self.seed,
                trial_seed,
                property_name: self.property.property_name.clone(),
            }),
        }
    }

    pub(crate) fn finish(mut self) -> TestResult {
        let property_name = self.property.property_name.clone();
        if self.property.classifications.is_empty() {
            TestResult::Pass {
                tests_run: self.tests_run,
                discards: self.discards,
                seed: self.seed,
                property_name,
            }
        } else {
            self.statistics.total_tests = self.tests_run;
            TestResult::PassWithStatistics {
                tests_run: self.tests_run,
                discards: self.discards,
                seed: self.seed,
                property_name,
                statistics: self.statistics,
            }
        }
    }

    fn name(&self) -> Option<&str> {
        self.property.property_name.as_deref()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Create a property whose check returns `Result<(), String>`.
pub fn property<T, F>(generator: Gen<T>, check: F) -> Property<T>
where
    T: 'static + Debug,
    F: Fn(&T) -> std::result::Result<(), String> + Send + Sync + 'static,
{
    Property::new(generator, check)
}

/// Create a property that checks a boolean condition.
pub fn for_all<T, F>(generator: Gen<T>, condition: F) -> Property<T>
where
    T: 'static + Debug,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    Property::for_all(generator, condition)
}

/// Create a property that checks a boolean condition with a named variable.
pub fn for_all_named<T, F>(generator: Gen<T>, variable_name: &str, condition: F) -> Property<T>
where
    T: 'static + Debug,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    Property::for_all(generator, condition).with_variable_name(variable_name)
}
