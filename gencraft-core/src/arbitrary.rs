//! Default generators per type.

use crate::{gen::Gen, text::CharClass};

/// Longest `String` or `Vec` produced by the default generators.
pub const DEFAULT_MAX_LENGTH: usize = 20;

/// Types with a canonical generator.
///
/// `#[derive(Generate)]` builds struct and enum generators out of their
/// fields' `Arbitrary` generators.
pub trait Arbitrary: Sized + 'static {
    fn arbitrary() -> Gen<Self>;
}

impl Arbitrary for bool {
    fn arbitrary() -> Gen<Self> {
        Gen::boolean()
    }
}

macro_rules! arbitrary_integral {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Arbitrary for $ty {
                fn arbitrary() -> Gen<Self> {
                    Gen::integer_unchecked(<$ty>::MIN, <$ty>::MAX)
                }
            }
        )*
    };
}

arbitrary_integral!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Alphanumeric characters.
impl Arbitrary for char {
    fn arbitrary() -> Gen<Self> {
        Gen::char_of(CharClass::alphanumeric())
    }
}

/// Alphanumeric strings of up to [`DEFAULT_MAX_LENGTH`] characters.
impl Arbitrary for String {
    fn arbitrary() -> Gen<Self> {
        Gen::sized_vec(char::arbitrary(), 0, DEFAULT_MAX_LENGTH)
            .map(|chars| chars.into_iter().collect())
    }
}

impl<T: Arbitrary> Arbitrary for Option<T> {
    fn arbitrary() -> Gen<Self> {
        Gen::option_of(T::arbitrary())
    }
}

impl<T: Arbitrary> Arbitrary for Vec<T> {
    fn arbitrary() -> Gen<Self> {
        Gen::sized_vec(T::arbitrary(), 0, DEFAULT_MAX_LENGTH)
    }
}
