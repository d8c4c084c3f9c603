//! Combinator meta tests
//!
//! These properties check map, flat_map, filter, one_of and combine against
//! the contracts callers rely on: how much randomness each consumes, what
//! each guarantees about its output, and how each fails.

use crate::{arbitrary_seed, check};
use gencraft::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Property: Mapping the identity leaves values and seeds untouched
pub fn test_map_identity() {
    let prop = for_all_named(arbitrary_seed(), "seed", |&seed: &Seed| {
        let gen = Gen::integer(0u32, 1_000_000).unwrap();
        gen.clone().map(|x| x).generate(seed).ok() == gen.generate(seed).ok()
    });

    check("Map identity", prop, 100);
}

/// Property: flat_map draws the inner generator from the advanced seed
pub fn test_flat_map_threads_one_seed() {
    let prop = for_all_named(arbitrary_seed(), "seed", |&seed: &Seed| {
        let outer = Gen::integer(1u32, 100).unwrap();
        let dependent = outer.clone().flat_map(|n| Gen::integer(0, n));

        let Ok((n, advanced)) = outer.generate(seed) else {
            return false;
        };
        let Ok(expected) = Gen::integer(0, n).and_then(|g| g.generate(advanced)) else {
            return false;
        };
        dependent.generate(seed).ok() == Some(expected)
    });

    check("flat_map seed threading", prop, 100);
}

/// Property: Filtered values always satisfy the predicate
pub fn test_filter_results_satisfy_predicate() {
    let evens = Gen::integer(0i32, 1000).unwrap().filter(|x| x % 2 == 0);
    let prop = for_all_named(evens, "even", |x| x % 2 == 0);

    check("Filter predicate", prop, 200);
}

/// An unsatisfiable filter fails with the attempts it spent.
pub fn test_unsatisfiable_filter_exhausts() {
    let gen = Gen::integer(0u8, 10)
        .unwrap()
        .filter_with(RetryBudget::attempts(25), |&x| x > 10);

    match gen.sample(Seed::from_u64(1)) {
        Err(GencraftError::ExhaustedRetries { attempts, .. }) => assert_eq!(attempts, 25),
        other => panic!("expected exhausted retries, got {other:?}"),
    }

    let result = for_all(gen, |_| true).run(&Config::default().with_seed(1));
    assert!(matches!(result, TestResult::GeneratorError { .. }));
}

/// Property: one_of yields only its alternatives, and every one of them
pub fn test_one_of_alternatives_and_coverage() {
    let letters = Gen::one_of(vec![
        Gen::constant('a'),
        Gen::constant('b'),
        Gen::constant('c'),
    ])
    .unwrap();

    let prop = for_all(letters.clone(), |c| "abc".contains(*c));
    check("one_of alternatives", prop, 100);

    let seen: HashSet<char> = letters
        .samples(Seed::from_u64(42), 200)
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(seen, HashSet::from(['a', 'b', 'c']));

    assert!(matches!(
        Gen::<u8>::one_of(Vec::new()),
        Err(GencraftError::NoAlternatives)
    ));
}

/// combine draws every component exactly once, in declared order.
pub fn test_combine_arity_and_order() {
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));
    let draws = Arc::new(AtomicUsize::new(0));
    let component = |label: usize| {
        let order = Arc::clone(&order);
        let draws = Arc::clone(&draws);
        Gen::new(move |seed: Seed| {
            draws.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut order) = order.lock() {
                order.push(label);
            }
            let (value, seed) = seed.next_u64();
            Ok((value, seed))
        })
    };

    let gen = (
        component(0),
        component(1),
        component(2),
        component(3),
        component(4),
        component(5),
    )
        .combine();
    gen.sample(Seed::from_u64(6)).unwrap();

    assert_eq!(draws.load(Ordering::SeqCst), 6);
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4, 5]);
}
