use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use gencraft::{random_seed_value, Config, ParallelConfig, Seed, SEED_ENV, TESTS_ENV};
use gencraft_cli::{PropertyEntry, PropertyReport};

/// Run and inspect gencraft properties
#[derive(Parser)]
#[command(name = "gencraft", version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run properties and report every seed
    #[command(alias = "t")]
    Run {
        /// Only run the property with this name
        #[arg(short, long)]
        property: Option<String>,

        /// Run seed (random when omitted)
        #[arg(short, long, env = SEED_ENV)]
        seed: Option<u64>,

        /// Trials per property
        #[arg(short, long, env = TESTS_ENV, default_value_t = 100)]
        tests: usize,

        /// Spread trials across this many threads
        #[arg(long)]
        threads: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print values drawn from a generator
    Sample {
        /// Generator name, see `gencraft list`
        generator: String,

        /// Seed, as a number or as a printed `state:gamma` pair
        #[arg(short, long, env = SEED_ENV)]
        seed: Option<String>,

        /// Number of values
        #[arg(short, long, default_value_t = 10)]
        count: usize,
    },

    /// List the available properties and generators
    List,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e:#}", "error:".bright_red().bold());
        std::process::exit(2);
    }
}

fn run() -> Result<()> {
    // Enable colors only when running in a terminal or explicitly requested
    let should_use_colors = std::env::var("FORCE_COLOR").is_ok()
        || (atty::is(atty::Stream::Stdout) && std::env::var("NO_COLOR").is_err());
    colored::control::set_override(should_use_colors);

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            property,
            seed,
            tests,
            threads,
            format,
        } => run_properties(property, seed, tests, threads, format, cli.verbose),
        Commands::Sample {
            generator,
            seed,
            count,
        } => sample_generator(&generator, seed.as_deref(), count),
        Commands::List => {
            list_catalog();
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "gencraft=debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_properties(
    filter: Option<String>,
    seed: Option<u64>,
    tests: usize,
    threads: Option<usize>,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    if tests == 0 {
        bail!("--tests must be at least 1");
    }

    let mut properties = gencraft_cli::property_catalog();
    if let Some(name) = &filter {
        properties.retain(|p| p.name == name.as_str());
        if properties.is_empty() {
            bail!("no property named '{name}', see `gencraft list`");
        }
    }

    // One seed for the whole run so that it can be printed and repeated.
    let seed = seed.unwrap_or_else(random_seed_value);
    let config = Config::default().with_tests(tests).with_seed(seed);
    let parallel = threads.map(|n| ParallelConfig::default().with_threads(n.max(1)));

    if format == OutputFormat::Text {
        println!("{}", gencraft_cli::format_header());
        println!("{}", gencraft_cli::format_seed(seed));
        if verbose {
            println!("Trials per property: {tests}");
            if let Some(parallel) = &parallel {
                println!("Threads: {}", parallel.thread_count);
            }
        }
        println!();
    }

    let mut reports = Vec::with_capacity(properties.len());
    for entry in &properties {
        let result = run_entry(entry, &config, parallel.as_ref())?;
        if format == OutputFormat::Text {
            println!("{}\n", gencraft_cli::format_result(entry.name, &result));
        }
        reports.push(PropertyReport::new(entry.name, &result));
    }

    let failed: Vec<&str> = reports
        .iter()
        .filter(|r| !r.passed())
        .map(|r| r.name.as_str())
        .collect();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "seed": seed,
                "tests": tests,
                "properties": reports,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text if failed.is_empty() => {
            println!("{}", gencraft_cli::format_success());
            println!("Properties run: {}, Passed: {}", reports.len(), reports.len());
        }
        OutputFormat::Text => {
            println!("{}", gencraft_cli::format_failure());
            println!(
                "Properties run: {}, Passed: {}, Failed: {}",
                reports.len(),
                reports.len() - failed.len(),
                failed.len()
            );
            println!("Failed properties: {}", failed.join(", "));
        }
    }

    if !failed.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_entry(
    entry: &PropertyEntry,
    config: &Config,
    parallel: Option<&ParallelConfig>,
) -> Result<gencraft::TestResult> {
    let runner = entry
        .runner()
        .with_context(|| format!("building property '{}'", entry.name))?;
    tracing::debug!(property = entry.name, "running");
    Ok(match parallel {
        Some(parallel) => runner.run_parallel(config, parallel),
        None => runner.run(config),
    })
}

fn sample_generator(name: &str, seed: Option<&str>, count: usize) -> Result<()> {
    let samplers = gencraft_cli::sampler_catalog();
    let Some(sampler) = samplers.iter().find(|s| s.name == name) else {
        bail!("no generator named '{name}', see `gencraft list`");
    };

    let seed = match seed {
        Some(text) => parse_seed(text)?,
        None => Seed::from_u64(random_seed_value()),
    };

    println!("{}", format!("# {} samples, seed {seed}", sampler.name).dimmed());
    for value in sampler.sample(seed, count)? {
        println!("{value}");
    }
    Ok(())
}

/// Accept either a plain number or the `state:gamma` form printed in reports.
fn parse_seed(text: &str) -> Result<Seed> {
    if let Ok(value) = text.trim().parse::<u64>() {
        return Ok(Seed::from_u64(value));
    }
    text.parse::<Seed>()
        .with_context(|| format!("invalid seed '{text}'"))
}

fn list_catalog() {
    println!("{}", "Properties".bright_blue().bold());
    for entry in gencraft_cli::property_catalog() {
        println!("  {:<18} {}", entry.name.bright_white(), entry.description);
    }
    println!();
    println!("{}", "Generators".bright_blue().bold());
    for sampler in gencraft_cli::sampler_catalog() {
        println!("  {:<18} {}", sampler.name.bright_white(), sampler.description);
    }
}
