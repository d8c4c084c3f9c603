//! N-ary combination of independent generators.

use crate::gen::Gen;

/// Tuples of generators that can be drawn together.
///
/// Components are drawn exactly once each, left to right, from one
/// advancing seed. Pair with [`Gen::map`] to build a record:
///
/// ```rust
/// use gencraft_core::*;
///
/// let point = (Gen::integer(0, 9)?, Gen::integer(0, 9)?)
///     .combine()
///     .map(|(x, y)| format!("{x},{y}"));
/// assert_eq!(point.sample(Seed::from_u64(1))?.len(), 3);
/// # Ok::<(), GencraftError>(())
/// ```
pub trait Combine {
    type Output;

    fn combine(self) -> Gen<Self::Output>;

    /// Combine, then build a composite value from the drawn tuple.
    fn combine_with<U, Ctor>(self, constructor: Ctor) -> Gen<U>
    where
        Ctor: Fn(Self::Output) -> U + Send + Sync + 'static,
        U: 'static;
}

/// Free-function form of [`Combine::combine`].
pub fn combine<C: Combine>(generators: C) -> Gen<C::Output> {
    generators.combine()
}

macro_rules! impl_combine {
    ($($gen:ident: $ty:ident),+) => {
        impl<$($ty: 'static),+> Combine for ($(Gen<$ty>,)+) {
            type Output = ($($ty,)+);

            fn combine(self) -> Gen<Self::Output> {
                let ($($gen,)+) = self;
                Gen::new(move |seed| {
                    $(let ($gen, seed) = $gen.generate(seed)?;)+
                    Ok((($($gen,)+), seed))
                })
            }

            fn combine_with<U, Ctor>(self, constructor: Ctor) -> Gen<U>
            where
                Ctor: Fn(Self::Output) -> U + Send + Sync + 'static,
                U: 'static,
            {
                self.combine().map(constructor)
            }
        }
    };
}

impl_combine!(a: A, b: B);
impl_combine!(a: A, b: B, c: C);
impl_combine!(a: A, b: B, c: C, d: D);
impl_combine!(a: A, b: B, c: C, d: D, e: E);
impl_combine!(a: A, b: B, c: C, d: D, e: E, f: F);
impl_combine!(a: A, b: B, c: C, d: D, e: E, f: F, g: G);
impl_combine!(a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H);
