//! Generator combinators for property-based testing.

use crate::{data::Seed, error::*};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Drawn lengths can be huge; grow past this on demand instead.
const PREALLOCATION_LIMIT: usize = 1024;

type DrawFn<T> = dyn Fn(Seed) -> Result<(T, Seed)> + Send + Sync;

/// A generator for test data of type `T`.
///
/// Generators are explicit, first-class values that can be composed
/// using combinator functions. A generator is an immutable description:
/// drawing takes a [`Seed`] and hands back the value with the advanced
/// seed, so one description can be cloned and shared across threads
/// while every draw sequence stays confined to its own seed.
pub struct Gen<T> {
    generator: Arc<DrawFn<T>>,
}

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Gen {
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<T> fmt::Debug for Gen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gen")
            .field("output", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> Gen<T> {
    /// Create a new generator from a draw function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Seed) -> Result<(T, Seed)> + Send + Sync + 'static,
    {
        Gen {
            generator: Arc::new(f),
        }
    }

    /// Draw a value, returning it with the advanced seed.
    pub fn generate(&self, seed: Seed) -> Result<(T, Seed)> {
        (self.generator)(seed)
    }

    /// Draw a single value, discarding the advanced seed.
    pub fn sample(&self, seed: Seed) -> Result<T> {
        self.generate(seed).map(|(value, _)| value)
    }

    /// Draw `count` values from one advancing seed.
    pub fn samples(&self, seed: Seed, count: usize) -> Result<Vec<T>> {
        let mut seed = seed;
        let mut values = Vec::with_capacity(count.min(PREALLOCATION_LIMIT));
        for _ in 0..count {
            let (value, next) = self.generate(seed)?;
            values.push(value);
            seed = next;
        }
        Ok(values)
    }

    /// Create a generator that always produces the same value.
    pub fn constant(value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Gen::new(move |seed| Ok((value.clone(), seed)))
    }
}

/// Anything a dependent stage may return: a generator, or the result of
/// constructing one.
///
/// Constructors such as [`Gen::integer`] validate their bounds and return
/// `Result<Gen<T>>`. Inside `flat_map` the bounds come from realized
/// values, so that validation happens at draw time and an invalid range
/// fails the draw instead of being clamped.
pub trait IntoGen {
    type Output;

    fn into_gen(self) -> Result<Gen<Self::Output>>;
}

impl<T> IntoGen for Gen<T> {
    type Output = T;

    fn into_gen(self) -> Result<Gen<T>> {
        Ok(self)
    }
}

impl<T> IntoGen for Result<Gen<T>> {
    type Output = T;

    fn into_gen(self) -> Result<Gen<T>> {
        self
    }
}

/// Bound on the work a filtered generator may spend per draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    /// Maximum number of candidate draws.
    pub max_attempts: usize,
    /// Optional wall-clock limit across all attempts.
    pub time_limit: Option<Duration>,
}

impl RetryBudget {
    /// Attempts allowed by [`Gen::filter`].
    pub const DEFAULT_ATTEMPTS: usize = 1000;

    pub fn attempts(max_attempts: usize) -> Self {
        RetryBudget {
            max_attempts,
            time_limit: None,
        }
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        RetryBudget::attempts(Self::DEFAULT_ATTEMPTS)
    }
}

impl<T> Gen<T>
where
    T: 'static,
{
    /// Map a function over the generated values.
    ///
    /// The function runs on the drawn value only; no extra randomness is
    /// consumed.
    pub fn map<U, F>(self, f: F) -> Gen<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
        U: 'static,
    {
        Gen::new(move |seed| {
            let (value, seed) = self.generate(seed)?;
            Ok((f(value), seed))
        })
    }

    /// Dependent generation.
    ///
    /// Draws a `T`, builds the next generator from it, and draws from that
    /// generator with the same advancing seed. Chains nest without limit.
    pub fn flat_map<R, F>(self, f: F) -> Gen<R::Output>
    where
        F: Fn(T) -> R + Send + Sync + 'static,
        R: IntoGen,
        R::Output: 'static,
    {
        Gen::new(move |seed| {
            let (value, seed) = self.generate(seed)?;
            f(value).into_gen()?.generate(seed)
        })
    }

    /// Keep drawing until `predicate` holds, within the default budget.
    pub fn filter<F>(self, predicate: F) -> Gen<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter_with(RetryBudget::default(), predicate)
    }

    /// Keep drawing until `predicate` holds, within `budget`.
    ///
    /// Each rejected candidate advances the seed, so a retry sequence is as
    /// reproducible as any other draw.
    pub fn filter_with<F>(self, budget: RetryBudget, predicate: F) -> Gen<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Gen::new(move |seed| {
            let started = Instant::now();
            let mut seed = seed;
            let mut attempts = 0;

            while attempts < budget.max_attempts {
                let (value, next) = self.generate(seed)?;
                attempts += 1;
                if predicate(&value) {
                    return Ok((value, next));
                }
                seed = next;

                if budget
                    .time_limit
                    .is_some_and(|limit| started.elapsed() >= limit)
                {
                    break;
                }
            }

            let elapsed = started.elapsed();
            tracing::warn!(attempts, ?elapsed, "filter exhausted its retry budget");
            Err(GencraftError::ExhaustedRetries { attempts, elapsed })
        })
    }

    /// Choose uniformly among alternative generators.
    ///
    /// The selector is drawn first, then the chosen generator draws with the
    /// advanced seed. Use [`Gen::frequency`] for non-uniform weights.
    pub fn one_of(alternatives: Vec<Gen<T>>) -> Result<Gen<T>> {
        if alternatives.is_empty() {
            return Err(GencraftError::NoAlternatives);
        }

        Ok(Gen::new(move |seed| {
            let (index, seed) = seed.next_bounded(alternatives.len() as u64);
            alternatives[index as usize].generate(seed)
        }))
    }

    /// Choose among alternative generators in proportion to their weights.
    pub fn frequency(weighted: Vec<(u32, Gen<T>)>) -> Result<Gen<T>> {
        if weighted.is_empty() {
            return Err(GencraftError::NoAlternatives);
        }

        let total: u64 = weighted.iter().map(|(weight, _)| *weight as u64).sum();
        if total == 0 {
            return Err(GencraftError::InvalidWeights {
                message: format!("all {} weights are zero", weighted.len()),
            });
        }

        Ok(Gen::new(move |seed| {
            let (mut pick, seed) = seed.next_bounded(total);
            for (weight, generator) in &weighted {
                let weight = *weight as u64;
                if pick < weight {
                    return generator.generate(seed);
                }
                pick -= weight;
            }
            Err(GencraftError::InvalidWeights {
                message: "selector fell outside the weight table".to_string(),
            })
        }))
    }

    /// Generate `Some` or `None` with equal probability.
    pub fn option_of(inner: Gen<T>) -> Gen<Option<T>> {
        Gen::new(move |seed| {
            let (present, seed) = seed.next_bool();
            if present {
                let (value, seed) = inner.generate(seed)?;
                Ok((Some(value), seed))
            } else {
                Ok((None, seed))
            }
        })
    }

    /// Generate a vector: a length in `[min_length, max_length]` first,
    /// then that many elements in draw order.
    pub fn vec_of(element: Gen<T>, min_length: usize, max_length: usize) -> Result<Gen<Vec<T>>> {
        if min_length > max_length {
            return Err(GencraftError::invalid_range(format!(
                "length range [{min_length}, {max_length}] is empty"
            )));
        }

        Ok(Gen::sized_vec(element, min_length, max_length))
    }

    /// `vec_of` without the bounds check. Callers guarantee `min <= max`.
    pub(crate) fn sized_vec(element: Gen<T>, min_length: usize, max_length: usize) -> Gen<Vec<T>> {
        let span = (max_length - min_length) as u128 + 1;
        Gen::new(move |seed| {
            let (offset, mut seed) = seed.next_below(span);
            let length = min_length + offset as usize;
            let mut values = Vec::with_capacity(length.min(PREALLOCATION_LIMIT));
            for _ in 0..length {
                let (value, next) = element.generate(seed)?;
                values.push(value);
                seed = next;
            }
            Ok((values, seed))
        })
    }
}

impl<T> Gen<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Choose uniformly among fixed values.
    pub fn element_of(values: Vec<T>) -> Result<Gen<T>> {
        if values.is_empty() {
            return Err(GencraftError::NoAlternatives);
        }

        Ok(Gen::new(move |seed| {
            let (index, seed) = seed.next_bounded(values.len() as u64);
            Ok((values[index as usize].clone(), seed))
        }))
    }
}

/// Primitive generators.
impl Gen<bool> {
    /// Generate a random boolean.
    pub fn boolean() -> Self {
        Gen::new(|seed| Ok(seed.next_bool()))
    }
}

/// Primitive integer types usable with [`Gen::integer`].
pub trait Integral: Copy + PartialOrd + fmt::Debug + Send + Sync + 'static {
    const MIN: Self;
    const MAX: Self;

    fn to_i128(self) -> i128;

    /// Narrow back. Only called with values inside `[MIN, MAX]`.
    fn from_i128(value: i128) -> Self;
}

macro_rules! integral {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Integral for $ty {
                const MIN: Self = <$ty>::MIN;
                const MAX: Self = <$ty>::MAX;

                fn to_i128(self) -> i128 {
                    self as i128
                }

                fn from_i128(value: i128) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

integral!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: Integral> Gen<T> {
    /// Generate an integer uniformly in `[low, high]`.
    pub fn integer(low: T, high: T) -> Result<Self> {
        if low > high {
            return Err(GencraftError::invalid_range(format!(
                "integer range [{low:?}, {high:?}] is empty"
            )));
        }
        Ok(Self::integer_unchecked(low, high))
    }

    pub(crate) fn integer_unchecked(low: T, high: T) -> Self {
        let low = low.to_i128();
        let span = (high.to_i128() - low) as u128 + 1;
        Gen::new(move |seed| {
            let (offset, seed) = seed.next_below(span);
            Ok((T::from_i128(low + offset as i128), seed))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn seeds(count: usize) -> impl Iterator<Item = Seed> {
        Seed::from_u64(2024).splits().take(count)
    }

    #[test]
    fn test_integer_range_containment() {
        let gen = Gen::integer(-5i64, 5).unwrap();
        for seed in seeds(500) {
            let value = gen.sample(seed).unwrap();
            assert!((-5..=5).contains(&value));
        }
    }

    #[test]
    fn test_integer_hits_both_ends() {
        let gen = Gen::integer(0u8, 3).unwrap();
        let seen: HashSet<u8> = seeds(200).map(|s| gen.sample(s).unwrap()).collect();
        assert_eq!(seen, HashSet::from([0, 1, 2, 3]));
    }

    #[test]
    fn test_integer_full_width() {
        let gen = Gen::integer(u64::MIN, u64::MAX).unwrap();
        let values: HashSet<u64> = seeds(50).map(|s| gen.sample(s).unwrap()).collect();
        assert!(values.len() > 40);

        let gen = Gen::integer(i64::MIN, i64::MAX).unwrap();
        assert!(seeds(50).all(|s| gen.sample(s).is_ok()));
    }

    #[test]
    fn test_single_point_range() {
        let gen = Gen::integer(7, 7).unwrap();
        assert!(seeds(20).all(|s| gen.sample(s).unwrap() == 7));
    }

    #[test]
    fn test_inverted_integer_range_fails_at_construction() {
        assert!(matches!(
            Gen::integer(10, 1),
            Err(GencraftError::InvalidRange { .. })
        ));
        assert!(matches!(
            Gen::integer(0i64, -1),
            Err(GencraftError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_constant_consumes_no_randomness() {
        let seed = Seed::from_u64(1);
        let (value, next) = Gen::constant("x").generate(seed).unwrap();
        assert_eq!(value, "x");
        assert_eq!(next, seed);
    }

    #[test]
    fn test_map_consumes_no_extra_randomness() {
        let seed = Seed::from_u64(11);
        let base = Gen::integer(0, 100).unwrap();
        let (plain, plain_next) = base.clone().generate(seed).unwrap();
        let (mapped, mapped_next) = base.map(|x| x * 2).generate(seed).unwrap();
        assert_eq!(mapped, plain * 2);
        assert_eq!(mapped_next, plain_next);
    }

    #[test]
    fn test_flat_map_threads_the_same_seed() {
        let seed = Seed::from_u64(3);
        let chained = Gen::integer(1, 10)
            .unwrap()
            .flat_map(|n| Gen::integer(0, n));
        let (value, _) = chained.generate(seed).unwrap();

        let (n, after_first) = Gen::integer(1, 10).unwrap().generate(seed).unwrap();
        let (expected, _) = Gen::integer(0, n).unwrap().generate(after_first).unwrap();
        assert_eq!(value, expected);
    }

    #[test]
    fn test_flat_map_surfaces_invalid_range_at_draw_time() {
        let gen = Gen::constant(0i64).flat_map(|len| Gen::integer(0, len - 1));
        assert!(matches!(
            gen.sample(Seed::from_u64(0)),
            Err(GencraftError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_deep_flat_map_chain() {
        let mut gen = Gen::constant(0u32);
        for _ in 0..200 {
            gen = gen.flat_map(|n| Gen::integer(n, n + 1));
        }
        let value = gen.sample(Seed::from_u64(8)).unwrap();
        assert!(value <= 200);
    }

    #[test]
    fn test_filter_only_yields_matching_values() {
        let gen = Gen::integer(0, 100).unwrap().filter(|x| x % 2 == 0);
        for seed in seeds(100) {
            assert_eq!(gen.sample(seed).unwrap() % 2, 0);
        }
    }

    #[test]
    fn test_filter_exhausts_budget() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let gen = Gen::integer(0, 10)
            .unwrap()
            .filter_with(RetryBudget::attempts(25), move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                false
            });

        match gen.sample(Seed::from_u64(0)) {
            Err(GencraftError::ExhaustedRetries { attempts, .. }) => assert_eq!(attempts, 25),
            other => panic!("Expected exhausted retries, got: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 25);
    }

    #[test]
    fn test_filter_time_limit_stops_early() {
        let budget = RetryBudget::attempts(usize::MAX).with_time_limit(Duration::from_millis(5));
        let gen = Gen::integer(0, 10).unwrap().filter_with(budget, |_| false);
        assert!(matches!(
            gen.sample(Seed::from_u64(0)),
            Err(GencraftError::ExhaustedRetries { .. })
        ));
    }

    /// Statistical: pinned to a fixed seed, where 300 draws reach all three
    /// branches.
    #[test]
    fn test_one_of_covers_every_branch() {
        let gen = Gen::one_of(vec![
            Gen::constant(1),
            Gen::constant(2),
            Gen::constant(3),
        ])
        .unwrap();
        let seen: HashSet<i32> = seeds(300).map(|s| gen.sample(s).unwrap()).collect();
        assert_eq!(seen, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn test_huge_length_fails_cleanly() {
        let failing: Gen<u8> = Gen::new(|_| Err(GencraftError::NoAlternatives));
        let gen = Gen::vec_of(failing, usize::MAX / 2, usize::MAX / 2).unwrap();
        assert!(matches!(
            gen.sample(Seed::from_u64(1)),
            Err(GencraftError::NoAlternatives)
        ));
    }

    #[test]
    fn test_one_of_empty_is_rejected() {
        assert!(matches!(
            Gen::<i32>::one_of(vec![]),
            Err(GencraftError::NoAlternatives)
        ));
    }

    #[test]
    fn test_frequency_never_picks_zero_weight() {
        let gen = Gen::frequency(vec![(0, Gen::constant('a')), (5, Gen::constant('b'))]).unwrap();
        assert!(seeds(200).all(|s| gen.sample(s).unwrap() == 'b'));
    }

    #[test]
    fn test_frequency_rejects_all_zero_weights() {
        assert!(matches!(
            Gen::frequency(vec![(0, Gen::constant(1))]),
            Err(GencraftError::InvalidWeights { .. })
        ));
    }

    #[test]
    fn test_element_of() {
        let gen = Gen::element_of(vec!["de", "at", "ch"]).unwrap();
        let seen: HashSet<&str> = seeds(200).map(|s| gen.sample(s).unwrap()).collect();
        assert_eq!(seen.len(), 3);
        assert!(matches!(
            Gen::<u8>::element_of(vec![]),
            Err(GencraftError::NoAlternatives)
        ));
    }

    #[test]
    fn test_option_of_produces_both() {
        let gen = Gen::option_of(Gen::constant(1));
        let values: Vec<Option<i32>> = seeds(100).map(|s| gen.sample(s).unwrap()).collect();
        assert!(values.contains(&None));
        assert!(values.contains(&Some(1)));
    }

    #[test]
    fn test_vec_of_length_containment() {
        let gen = Gen::vec_of(Gen::boolean(), 2, 6).unwrap();
        for seed in seeds(100) {
            let len = gen.sample(seed).unwrap().len();
            assert!((2..=6).contains(&len));
        }
        assert!(matches!(
            Gen::vec_of(Gen::boolean(), 3, 2),
            Err(GencraftError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_samples_advance_the_seed() {
        let values = Gen::integer(0, 1_000_000)
            .unwrap()
            .samples(Seed::from_u64(4), 20)
            .unwrap();
        let distinct: HashSet<i32> = values.iter().copied().collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_generators_are_shareable_across_threads() {
        let gen = Gen::integer(0, 9).unwrap();
        let handles: Vec<_> = (0..4u64)
            .map(|i| {
                let gen = gen.clone();
                std::thread::spawn(move || gen.sample(Seed::from_u64(i)).unwrap())
            })
            .collect();
        for handle in handles {
            assert!((0..=9).contains(&handle.join().unwrap()));
        }
    }
}
