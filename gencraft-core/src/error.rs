//! Error types and run outcomes.

use crate::data::Seed;
use crate::property::TestStatistics;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Main error type for gencraft.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GencraftError {
    /// A generator was configured with an empty or inverted bound.
    #[error("Invalid range: {message}")]
    InvalidRange { message: String },

    /// `one_of` or `element_of` was given nothing to choose from.
    #[error("No alternatives to choose from")]
    NoAlternatives,

    /// Weighted choice whose weights cannot select anything.
    #[error("Invalid weights: {message}")]
    InvalidWeights { message: String },

    /// A filtered generator could not satisfy its predicate in budget.
    #[error("Filter exhausted its retry budget after {attempts} attempts ({elapsed:?})")]
    ExhaustedRetries { attempts: usize, elapsed: Duration },

    /// User code inside a generator panicked.
    #[error("Generator panicked: {message}")]
    GeneratorPanicked { message: String },

    /// The property did not hold for a generated sample.
    #[error("Property falsified after {tests_run} tests (seed {seed}): {counterexample}")]
    PropertyFalsified {
        counterexample: String,
        message: String,
        seed: u64,
        trial_seed: Seed,
        tests_run: usize,
    },

    /// Too many trials were discarded.
    #[error("Too many trials discarded (limit: {limit})")]
    TooManyDiscards { limit: usize },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl GencraftError {
    pub(crate) fn invalid_range(message: impl Into<String>) -> Self {
        GencraftError::InvalidRange {
            message: message.into(),
        }
    }
}

/// Result type for gencraft operations.
pub type Result<T> = std::result::Result<T, GencraftError>;

/// Outcome of a property run.
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult {
    /// Every trial passed.
    Pass {
        tests_run: usize,
        discards: usize,
        seed: u64,
        property_name: Option<String>,
    },

    /// Every trial passed, with classification counts.
    PassWithStatistics {
        tests_run: usize,
        discards: usize,
        seed: u64,
        property_name: Option<String>,
        statistics: TestStatistics,
    },

    /// A sample falsified the property.
    Fail {
        counterexample: String,
        message: String,
        tests_run: usize,
        seed: u64,
        trial_seed: Seed,
        property_name: Option<String>,
        variable_name: Option<String>,
    },

    /// A generator failed while drawing a sample.
    GeneratorError {
        error: GencraftError,
        tests_run: usize,
        seed: u64,
        trial_seed: Seed,
        property_name: Option<String>,
    },

    /// Too many trials were discarded.
    Discard {
        limit: usize,
        tests_run: usize,
        seed: u64,
        property_name: Option<String>,
    },
}

impl TestResult {
    /// Whether the run passed.
    pub fn is_pass(&self) -> bool {
        matches!(
            self,
            TestResult::Pass { .. } | TestResult::PassWithStatistics { .. }
        )
    }

    /// The run seed, for reproducing this outcome.
    pub fn seed(&self) -> u64 {
        match self {
            TestResult::Pass { seed, .. }
            | TestResult::PassWithStatistics { seed, .. }
            | TestResult::Fail { seed, .. }
            | TestResult::GeneratorError { seed, .. }
            | TestResult::Discard { seed, .. } => *seed,
        }
    }

    /// Number of trials executed.
    pub fn tests_run(&self) -> usize {
        match self {
            TestResult::Pass { tests_run, .. }
            | TestResult::PassWithStatistics { tests_run, .. }
            | TestResult::Fail { tests_run, .. }
            | TestResult::GeneratorError { tests_run, .. }
            | TestResult::Discard { tests_run, .. } => *tests_run,
        }
    }

    /// Convert into a `Result`, keeping the failure category.
    pub fn into_result(self) -> Result<()> {
        match self {
            TestResult::Pass { .. } | TestResult::PassWithStatistics { .. } => Ok(()),
            TestResult::Fail {
                counterexample,
                message,
                tests_run,
                seed,
                trial_seed,
                ..
            } => Err(GencraftError::PropertyFalsified {
                counterexample,
                message,
                seed,
                trial_seed,
                tests_run,
            }),
            TestResult::GeneratorError { error, .. } => Err(error),
            TestResult::Discard { limit, .. } => Err(GencraftError::TooManyDiscards { limit }),
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestResult::Pass {
                tests_run,
                discards,
                property_name,
                ..
            } => {
                let prop_name = property_name.as_deref().unwrap_or("property");
                write!(f, "  ✓ {} passed {} tests.", prop_name, tests_run)?;
                if *discards > 0 {
                    write!(f, " ({} discarded)", discards)?;
                }
                Ok(())
            }
            TestResult::PassWithStatistics {
                tests_run,
                discards,
                property_name,
                statistics,
                ..
            } => {
                let prop_name = property_name.as_deref().unwrap_or("property");
                write!(f, "  ✓ {} passed {} tests.", prop_name, tests_run)?;
                if *discards > 0 {
                    write!(f, " ({} discarded)", discards)?;
                }
                writeln!(f)?;

                if !statistics.classifications.is_empty() {
                    writeln!(f)?;
                    writeln!(f, "  Test data distribution:")?;
                    let mut names: Vec<_> = statistics.classifications.keys().collect();
                    names.sort();
                    for name in names {
                        let count = statistics.classifications[name];
                        let percentage =
                            (count as f64 / statistics.total_tests.max(1) as f64) * 100.0;
                        writeln!(f, "    {:>3.0}% {}", percentage, name)?;
                    }
                }

                Ok(())
            }
            TestResult::Fail {
                counterexample,
                message,
                tests_run,
                seed,
                trial_seed,
                property_name,
                variable_name,
            } => {
                let prop_name = property_name.as_deref().unwrap_or("property");
                writeln!(f, "  ✗ {} falsified after {} tests.", prop_name, tests_run)?;
                writeln!(f)?;
                match variable_name {
                    Some(var_name) => {
                        writeln!(f, "    │ forAll = {} -- {}", counterexample, var_name)?
                    }
                    None => writeln!(f, "    │ forAll = {}", counterexample)?,
                }
                writeln!(f)?;
                writeln!(f, "    === {} ===", message)?;
                write!(f, "    Reproduce with seed {} (trial {})", seed, trial_seed)
            }
            TestResult::GeneratorError {
                error,
                tests_run,
                seed,
                trial_seed,
                property_name,
            } => {
                let prop_name = property_name.as_deref().unwrap_or("property");
                writeln!(
                    f,
                    "  ⚠ {} stopped after {} tests: {}",
                    prop_name, tests_run, error
                )?;
                write!(f, "    Reproduce with seed {} (trial {})", seed, trial_seed)
            }
            TestResult::Discard {
                limit,
                seed,
                property_name,
                ..
            } => {
                let prop_name = property_name.as_deref().unwrap_or("property");
                write!(
                    f,
                    "  ⚐ {} gave up after {} discards (seed {})",
                    prop_name, limit, seed
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> TestResult {
        TestResult::Fail {
            counterexample: "(\"ab\", 1, 0)".to_string(),
            message: "condition returned false".to_string(),
            tests_run: 3,
            seed: 42,
            trial_seed: Seed::from_parts(1, 3).unwrap(),
            property_name: Some("substring".to_string()),
            variable_name: Some("params".to_string()),
        }
    }

    #[test]
    fn test_failure_report_includes_seed_and_sample() {
        let output = failure().to_string();
        assert!(output.contains("✗ substring falsified after 3 tests."));
        assert!(output.contains("forAll = (\"ab\", 1, 0) -- params"));
        assert!(output.contains("=== condition returned false ==="));
        assert!(output.contains("seed 42"));
        assert!(output.contains("0000000000000001:0000000000000003"));
    }

    #[test]
    fn test_failure_into_result_is_falsified() {
        match failure().into_result() {
            Err(GencraftError::PropertyFalsified {
                seed, tests_run, ..
            }) => {
                assert_eq!(seed, 42);
                assert_eq!(tests_run, 3);
            }
            other => panic!("Expected falsification, got: {other:?}"),
        }
    }

    #[test]
    fn test_generator_error_keeps_its_category() {
        let result = TestResult::GeneratorError {
            error: GencraftError::ExhaustedRetries {
                attempts: 1000,
                elapsed: Duration::from_millis(3),
            },
            tests_run: 1,
            seed: 7,
            trial_seed: Seed::from_parts(0, 1).unwrap(),
            property_name: None,
        };

        assert!(!result.is_pass());
        assert_eq!(result.seed(), 7);
        assert!(result.to_string().contains("⚠ property stopped after 1 tests"));
        assert!(matches!(
            result.into_result(),
            Err(GencraftError::ExhaustedRetries { attempts: 1000, .. })
        ));
    }

    #[test]
    fn test_pass_display() {
        let result = TestResult::Pass {
            tests_run: 100,
            discards: 2,
            seed: 1,
            property_name: Some("zip".to_string()),
        };
        assert!(result.is_pass());
        assert_eq!(result.tests_run(), 100);
        assert_eq!(result.to_string(), "  ✓ zip passed 100 tests. (2 discarded)");
    }

    #[test]
    fn test_discard_into_result() {
        let result = TestResult::Discard {
            limit: 5,
            tests_run: 6,
            seed: 9,
            property_name: None,
        };
        assert_eq!(
            result.into_result(),
            Err(GencraftError::TooManyDiscards { limit: 5 })
        );
    }
}
