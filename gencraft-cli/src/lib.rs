use colored::*;
use gencraft::recipes::*;
use gencraft::*;
use serde::Serialize;
use std::rc::Rc;

/// A named property the CLI knows how to run.
pub struct PropertyEntry {
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> Result<Runner>,
}

/// A property with its value type erased.
pub struct Runner {
    sequential: Box<dyn Fn(&Config) -> TestResult>,
    parallel: Box<dyn Fn(&Config, &ParallelConfig) -> ParallelTestResult>,
}

impl Runner {
    fn new<T: std::fmt::Debug + 'static>(property: Property<T>) -> Self {
        let property = Rc::new(property);
        let shared = Rc::clone(&property);
        Runner {
            sequential: Box::new(move |config| property.run(config)),
            parallel: Box::new(move |config, parallel| shared.run_parallel(config, parallel)),
        }
    }

    pub fn run(&self, config: &Config) -> TestResult {
        (self.sequential)(config)
    }

    pub fn run_parallel(&self, config: &Config, parallel: &ParallelConfig) -> TestResult {
        (self.parallel)(config, parallel).outcome
    }
}

impl PropertyEntry {
    /// Build the property. Fails only if a generator is misconfigured.
    pub fn runner(&self) -> Result<Runner> {
        (self.build)()
    }
}

/// Every property the CLI can run, in the order `run` executes them.
pub fn property_catalog() -> Vec<PropertyEntry> {
    vec![
        PropertyEntry {
            name: "german-zip-code",
            description: "German zipcode is valid",
            build: || {
                let prop = for_all_named(german_zip_code(), "zip", |zip| {
                    zip.len() == 5 && is_valid_german_zip_code(zip)
                });
                Ok(Runner::new(prop.named("German zipcode is valid")))
            },
        },
        PropertyEntry {
            name: "substring",
            description: "String slicing never panics",
            build: || {
                let prop = property(substring_params()?, |(s, begin, end)| {
                    let slice = &s[*begin..*end];
                    if slice.len() == end - begin {
                        Ok(())
                    } else {
                        Err(format!("slice {slice:?} has the wrong length"))
                    }
                })
                .with_variable_name("params");
                Ok(Runner::new(prop.named("String slicing never panics")))
            },
        },
        PropertyEntry {
            name: "address",
            description: "Address instances are valid",
            build: || {
                let prop = property(address()?, |address| {
                    if address.city().is_empty() {
                        return Err("city is empty".to_string());
                    }
                    match address.zip_code() {
                        Some(zip) if !is_valid_german_zip_code(zip) => {
                            Err(format!("invalid zip code {zip:?}"))
                        }
                        _ => Ok(()),
                    }
                })
                .with_variable_name("address")
                .classify("street address", |a| a.is_street())
                .classify("post office box", |a| a.is_post_office_box());
                Ok(Runner::new(prop.named("Address instances are valid")))
            },
        },
    ]
}

/// A named generator whose samples the CLI can print.
pub struct SamplerEntry {
    pub name: &'static str,
    pub description: &'static str,
    sample: fn(Seed, usize) -> Result<Vec<String>>,
}

impl SamplerEntry {
    /// Draw `count` values from one advancing seed, rendered for display.
    pub fn sample(&self, seed: Seed, count: usize) -> Result<Vec<String>> {
        (self.sample)(seed, count)
    }
}

fn rendered<T: std::fmt::Debug>(gen: Gen<T>, seed: Seed, count: usize) -> Result<Vec<String>> {
    Ok(gen
        .samples(seed, count)?
        .iter()
        .map(|value| format!("{value:?}"))
        .collect())
}

pub fn sampler_catalog() -> Vec<SamplerEntry> {
    vec![
        SamplerEntry {
            name: "zip-code",
            description: "five-digit German zip codes",
            sample: |seed, count| rendered(german_zip_code(), seed, count),
        },
        SamplerEntry {
            name: "substring-params",
            description: "a string with begin and end indices inside it",
            sample: |seed, count| rendered(substring_params()?, seed, count),
        },
        SamplerEntry {
            name: "addendum",
            description: "empty, or a house number addendum from 1 to 9",
            sample: |seed, count| rendered(addendum()?, seed, count),
        },
        SamplerEntry {
            name: "street-address",
            description: "street addresses",
            sample: |seed, count| rendered(street_address()?, seed, count),
        },
        SamplerEntry {
            name: "post-office-box",
            description: "post office boxes",
            sample: |seed, count| rendered(post_office_box()?, seed, count),
        },
        SamplerEntry {
            name: "address",
            description: "street addresses or post office boxes",
            sample: |seed, count| {
                let addresses = address()?.samples(seed, count)?;
                Ok(addresses.iter().map(ToString::to_string).collect())
            },
        },
    ]
}

/// Machine-readable outcome of one property run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyReport {
    pub name: String,
    pub status: &'static str,
    pub tests_run: usize,
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_seed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterexample: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PropertyReport {
    pub fn new(name: &str, result: &TestResult) -> Self {
        let mut report = PropertyReport {
            name: name.to_string(),
            status: "passed",
            tests_run: result.tests_run(),
            seed: result.seed(),
            trial_seed: None,
            counterexample: None,
            message: None,
        };

        match result {
            TestResult::Pass { .. } | TestResult::PassWithStatistics { .. } => {}
            TestResult::Fail {
                counterexample,
                message,
                trial_seed,
                ..
            } => {
                report.status = "failed";
                report.trial_seed = Some(trial_seed.to_string());
                report.counterexample = Some(counterexample.clone());
                report.message = Some(message.clone());
            }
            TestResult::GeneratorError {
                error, trial_seed, ..
            } => {
                report.status = "error";
                report.trial_seed = Some(trial_seed.to_string());
                report.message = Some(error.to_string());
            }
            TestResult::Discard { limit, .. } => {
                report.status = "discarded";
                report.message = Some(format!("gave up after {limit} discards"));
            }
        }
        report
    }

    pub fn passed(&self) -> bool {
        self.status == "passed"
    }
}

/// Format header output
pub fn format_header() -> String {
    format!(
        "{}\n{}\n",
        "Gencraft Property Runner".bright_green().bold(),
        "========================".bright_green()
    )
}

/// Format the run seed so a failing run can be repeated.
pub fn format_seed(seed: u64) -> String {
    format!("Seed: {} (rerun with --seed {seed})", seed.to_string().bright_yellow())
}

/// Format one property result, coloured by outcome.
pub fn format_result(name: &str, result: &TestResult) -> String {
    let rendered = result.to_string();
    let status = if result.is_pass() {
        "PASS".bright_green().bold()
    } else {
        "FAIL".bright_red().bold()
    };
    format!("{status} {}\n{rendered}", name.bright_white())
}

/// Format success message
pub fn format_success() -> String {
    format!("{}\n", "All properties passed!".bright_green().bold())
}

/// Format failure message
pub fn format_failure() -> String {
    format!("{}\n", "Some properties failed!".bright_red().bold())
}
