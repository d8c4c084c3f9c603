//! Ready-made generators for postal data and substring parameters.

use crate::address::*;
use gencraft_core::*;

/// Five ASCII digits.
pub fn german_zip_code() -> Gen<String> {
    Gen::string_of_length(CharClass::numeric(), 5)
}

/// Whether `zip` is exactly five ASCII digits.
pub fn is_valid_german_zip_code(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}

/// A non-empty alphabetic string together with indices `begin <= end`
/// that are both valid positions in it.
///
/// Each stage depends on the one before: the begin index is bounded by
/// the string's last index, and the end index by both.
pub fn substring_params() -> Result<Gen<(String, usize, usize)>> {
    let text = Gen::string(CharClass::alpha(), 1, 50)?;

    Ok(Stages::start(text)
        .then(|(s,)| Gen::integer(0, last_index(s)?))
        .then(|(s, begin)| Gen::integer(*begin, last_index(s)?))
        .build())
}

fn last_index(s: &str) -> Result<usize> {
    s.chars().count().checked_sub(1).ok_or_else(|| GencraftError::InvalidRange {
        message: "empty string has no last index".to_string(),
    })
}

/// Either no addendum or a single digit from 1 to 9, with equal odds.
pub fn addendum() -> Result<Gen<String>> {
    Gen::one_of(vec![
        Gen::constant(String::new()),
        Gen::integer(1u8, 9)?.map(|n| n.to_string()),
    ])
}

fn country() -> Result<Gen<Country>> {
    Gen::element_of(Country::ALL.to_vec())
}

fn city() -> Result<Gen<String>> {
    Gen::string(CharClass::alpha(), 1, 30)
}

pub fn street_address() -> Result<Gen<StreetAddress>> {
    let street = Gen::string(CharClass::alpha(), 1, 20)?;
    let house_number = Gen::string(CharClass::numeric(), 1, 4)?;

    Ok((
        country()?,
        city()?,
        german_zip_code(),
        street,
        house_number,
        addendum()?,
    )
        .combine_with(|(country, city, zip_code, street, house_number, addendum)| {
            let house_number = if addendum.is_empty() {
                house_number
            } else {
                format!("{house_number}/{addendum}")
            };
            StreetAddress {
                country,
                city,
                zip_code,
                street,
                house_number,
            }
        }))
}

pub fn post_office_box() -> Result<Gen<PostOfficeBox>> {
    let identifier = Gen::string(CharClass::alphanumeric(), 1, 10)?.map(|id| id.to_uppercase());

    Ok((country()?, city()?, german_zip_code(), identifier).combine_with(
        |(country, city, zip_code, identifier)| PostOfficeBox {
            country,
            city,
            zip_code,
            identifier,
        },
    ))
}

/// Street addresses and post office boxes, chosen uniformly.
pub fn address() -> Result<Gen<Address>> {
    Gen::one_of(vec![
        street_address()?.map(Address::from),
        post_office_box()?.map(Address::from),
    ])
}
