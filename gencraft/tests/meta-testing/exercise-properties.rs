//! Properties over the bundled postal and substring recipes
//!
//! Zip codes are five digits, substring parameters never index out of
//! bounds, and generated addresses always carry a city.

use crate::check;
use gencraft::address::*;
use gencraft::recipes::*;
use gencraft::*;
use std::collections::HashSet;

/// Property: German zip codes are valid
pub fn test_german_zip_codes_are_valid() {
    let prop = for_all_named(german_zip_code(), "zip", |zip| {
        zip.len() == 5 && is_valid_german_zip_code(zip)
    })
    .named("German zipcode is valid");

    check("German zipcode", prop, 200);
}

/// Property: Slicing with generated substring parameters never panics
pub fn test_substring_never_panics() {
    let prop = property(substring_params().unwrap(), |(s, begin, end)| {
        // Indexing panics on a bad range; the runner reports that as a failure.
        let slice = &s[*begin..*end];
        if slice.len() == end - begin {
            Ok(())
        } else {
            Err(format!("slice {slice:?} has the wrong length"))
        }
    })
    .named("String slicing never panics");

    check("Substring", prop, 500);
}

/// Two draws from seed 42 give the same triple.
pub fn test_substring_params_are_deterministic() {
    let gen = substring_params().unwrap();
    let first = gen.sample(Seed::from_u64(42)).unwrap();
    let second = gen.sample(Seed::from_u64(42)).unwrap();
    assert_eq!(first, second);

    let (s, begin, end) = first;
    assert!((1..=50).contains(&s.len()));
    assert!(begin <= end && end < s.len());
}

/// Property: Addresses have a city, and a zip code when present is valid
pub fn test_addresses_are_valid() {
    let prop = property(address().unwrap(), |address| {
        if address.city().is_empty() {
            return Err("city is empty".to_string());
        }
        match address.zip_code() {
            Some(zip) if !is_valid_german_zip_code(zip) => Err(format!("invalid zip {zip:?}")),
            _ => Ok(()),
        }
    })
    .named("Address instances are valid")
    .classify("street", Address::is_street)
    .classify("post office box", Address::is_post_office_box);

    check("Address", prop, 300);
}

/// Both address variants show up in a modest number of draws.
///
/// Statistical rather than guaranteed; pinned to seed 7, where 100 draws
/// include both variants.
pub fn test_both_address_variants_occur() {
    let samples = address()
        .unwrap()
        .samples(Seed::from_u64(7), 100)
        .unwrap();
    let variants: HashSet<&str> = samples
        .iter()
        .map(|address| match address {
            Address::Street(_) => "street",
            Address::PostOfficeBox(_) => "pob",
        })
        .collect();
    assert_eq!(variants.len(), 2);
}
