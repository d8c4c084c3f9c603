//! String generator meta tests
//!
//! These properties check lengths and character classes of generated
//! strings, including the fixed-length form used for zip codes.

use crate::{arbitrary_seed, check};
use gencraft::*;

/// Property: Strings respect both the length range and the character class
pub fn test_string_length_and_class() {
    let bounds = (Gen::integer(0usize, 20).unwrap(), Gen::integer(0usize, 20).unwrap())
        .combine_with(|(min, extra)| (min, min + extra));

    let prop = property((bounds, arbitrary_seed()).combine(), |&((min, max), seed)| {
        let text = Gen::string(CharClass::alpha(), min, max)
            .and_then(|gen| gen.sample(seed))
            .map_err(|e| e.to_string())?;
        let len = text.chars().count();
        if !(min..=max).contains(&len) {
            return Err(format!("length {len} outside [{min}, {max}]"));
        }
        if !text.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!("{text:?} is not alphabetic"));
        }
        Ok(())
    });

    check("String length and class", prop, 200);
}

/// Property: Fixed-length numeric strings have exactly that many digits
pub fn test_fixed_length_strings() {
    let prop = for_all_named(
        Gen::string_of_length(CharClass::numeric(), 5),
        "digits",
        |s| s.len() == 5 && s.chars().all(|c| c.is_ascii_digit()),
    );

    check("Fixed length strings", prop, 200);
}

/// A minimum above the maximum is rejected rather than clamped.
pub fn test_inverted_length_range() {
    assert!(matches!(
        Gen::string(CharClass::numeric(), 5, 1),
        Err(GencraftError::InvalidRange { .. })
    ));
}
