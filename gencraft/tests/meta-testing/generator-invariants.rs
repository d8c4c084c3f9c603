//! Generator invariant meta tests
//!
//! These properties check that primitive generators are deterministic for
//! a fixed seed, respect their bounds, and reject empty ranges up front.

use crate::{arbitrary_seed, check};
use gencraft::*;

/// Property: Drawing twice from the same seed gives the same value
pub fn test_same_seed_same_value() {
    let prop = for_all_named(arbitrary_seed(), "seed", |&seed: &Seed| {
        let gen = (
            Gen::integer(-1000i32, 1000).unwrap(),
            Gen::boolean(),
            Gen::string(CharClass::alphanumeric(), 0, 12).unwrap(),
        )
            .combine();

        matches!(
            (gen.generate(seed), gen.generate(seed)),
            (Ok(first), Ok(second)) if first == second
        )
    });

    check("Same seed same value", prop, 100);
}

/// Property: Integers stay inside inclusive bounds
pub fn test_integer_bounds() {
    let bounds = (Gen::integer(-500i64, 500).unwrap(), Gen::integer(0i64, 500).unwrap())
        .combine_with(|(low, width)| (low, low + width));

    let prop = property(
        (bounds, arbitrary_seed()).combine(),
        |&((low, high), seed)| {
            let value = Gen::integer(low, high)
                .and_then(|gen| gen.sample(seed))
                .map_err(|e| e.to_string())?;
            if (low..=high).contains(&value) {
                Ok(())
            } else {
                Err(format!("{value} outside [{low}, {high}]"))
            }
        },
    );

    check("Integer bounds", prop, 200);
}

/// Inverted bounds fail at construction, before any draw.
pub fn test_inverted_ranges_are_rejected() {
    assert!(matches!(
        Gen::integer(10u32, 9),
        Err(GencraftError::InvalidRange { .. })
    ));
    assert!(matches!(
        Gen::character('b', 'a'),
        Err(GencraftError::InvalidRange { .. })
    ));
    assert!(matches!(
        Gen::vec_of(Gen::boolean(), 3, 2),
        Err(GencraftError::InvalidRange { .. })
    ));
}

/// Property: A seed printed for replay parses back to the same seed
pub fn test_seed_text_form() {
    let prop = for_all_named(arbitrary_seed(), "seed", |&seed: &Seed| {
        let (_, advanced) = seed.next_u64();
        advanced.to_string().parse::<Seed>() == Ok(advanced)
    });

    check("Seed text form", prop, 100);
}
