//! Character and string generators.
//!
//! Every string generator runs the same procedure: draw a length, then
//! draw that many characters from a character policy. A [`CharClass`] is
//! that policy. The alphabetic, numeric and explicit-range variants are
//! all just sets of code-point ranges.

use crate::{data::Seed, error::*, gen::Gen};

const SURROGATE_START: u32 = 0xD800;
const SURROGATE_END: u32 = 0xDFFF;

/// A non-empty set of Unicode scalar values to draw characters from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    // Sorted, disjoint, inclusive, surrogate-free.
    ranges: Vec<(u32, u32)>,
}

impl CharClass {
    /// `A-Z` and `a-z`.
    pub fn alpha() -> Self {
        CharClass::from_ranges(vec![('A' as u32, 'Z' as u32), ('a' as u32, 'z' as u32)])
    }

    /// `0-9`.
    pub fn numeric() -> Self {
        CharClass::from_ranges(vec![('0' as u32, '9' as u32)])
    }

    /// `0-9`, `A-Z` and `a-z`.
    pub fn alphanumeric() -> Self {
        CharClass::alpha().union(CharClass::numeric())
    }

    /// Printable ASCII, space through tilde.
    pub fn ascii_printable() -> Self {
        CharClass::from_ranges(vec![(' ' as u32, '~' as u32)])
    }

    /// Every Unicode scalar value.
    pub fn any() -> Self {
        CharClass::from_ranges(vec![(0, char::MAX as u32)])
    }

    /// Code points from `from` to `to` inclusive.
    pub fn range(from: char, to: char) -> Result<Self> {
        if from > to {
            return Err(GencraftError::invalid_range(format!(
                "character range [{from:?}, {to:?}] is empty"
            )));
        }
        Ok(CharClass::from_ranges(vec![(from as u32, to as u32)]))
    }

    /// Characters in either class.
    pub fn union(self, other: CharClass) -> Self {
        let mut ranges = self.ranges;
        ranges.extend(other.ranges);
        CharClass::from_ranges(ranges)
    }

    /// Number of distinct characters in the class.
    pub fn len(&self) -> u64 {
        self.ranges
            .iter()
            .map(|(low, high)| (high - low) as u64 + 1)
            .sum()
    }

    /// Always false: a class is non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        let code = c as u32;
        self.ranges
            .iter()
            .any(|&(low, high)| (low..=high).contains(&code))
    }

    /// Draw one character uniformly from the class.
    pub fn draw(&self, seed: Seed) -> Result<(char, Seed)> {
        let (mut index, seed) = seed.next_bounded(self.len());
        for &(low, high) in &self.ranges {
            let width = (high - low) as u64 + 1;
            if index < width {
                let code = low + index as u32;
                return char::from_u32(code)
                    .map(|c| (c, seed))
                    .ok_or_else(|| {
                        GencraftError::invalid_range(format!("{code:#x} is not a scalar value"))
                    });
            }
            index -= width;
        }
        Err(GencraftError::invalid_range("character index outside class"))
    }

    fn from_ranges(ranges: Vec<(u32, u32)>) -> Self {
        let mut split = Vec::with_capacity(ranges.len() + 1);
        for (low, high) in ranges {
            if low < SURROGATE_START && high > SURROGATE_END {
                split.push((low, SURROGATE_START - 1));
                split.push((SURROGATE_END + 1, high));
            } else {
                split.push((low, high));
            }
        }
        split.sort_unstable();

        let mut merged: Vec<(u32, u32)> = Vec::with_capacity(split.len());
        for (low, high) in split {
            match merged.last_mut() {
                Some(last) if low <= last.1.saturating_add(1) => last.1 = last.1.max(high),
                _ => merged.push((low, high)),
            }
        }

        CharClass { ranges: merged }
    }
}

impl Gen<char> {
    /// Generate a character with a code point in `[from, to]`.
    pub fn character(from: char, to: char) -> Result<Self> {
        Ok(Gen::char_of(CharClass::range(from, to)?))
    }

    /// Generate a character from a class.
    pub fn char_of(class: CharClass) -> Self {
        Gen::new(move |seed| class.draw(seed))
    }
}

impl Gen<String> {
    /// Generate a string of `min_length..=max_length` characters from `class`.
    pub fn string(class: CharClass, min_length: usize, max_length: usize) -> Result<Self> {
        Gen::string_from(Gen::char_of(class), min_length, max_length)
    }

    /// Generate a string of exactly `length` characters from `class`.
    pub fn string_of_length(class: CharClass, length: usize) -> Self {
        Gen::sized_string(Gen::char_of(class), length, length)
    }

    /// Generate a string whose characters come from an arbitrary generator.
    pub fn string_from(chars: Gen<char>, min_length: usize, max_length: usize) -> Result<Self> {
        if min_length > max_length {
            return Err(GencraftError::invalid_range(format!(
                "string length range [{min_length}, {max_length}] is empty"
            )));
        }
        Ok(Gen::sized_string(chars, min_length, max_length))
    }

    fn sized_string(chars: Gen<char>, min_length: usize, max_length: usize) -> Self {
        Gen::sized_vec(chars, min_length, max_length).map(|chars| chars.into_iter().collect())
    }
}
