//! Dependent generation as an explicit pipeline of stages.
//!
//! Each stage sees every value realized so far and returns the generator
//! for the next one. Values accumulate into a flat tuple, so a chain like
//! "a string, then a begin index inside it, then an end index after the
//! begin" reads left to right instead of as nested `flat_map` closures:
//!
//! ```rust
//! use gencraft_core::*;
//!
//! let params = Stages::start(Gen::string(CharClass::alpha(), 1, 50)?)
//!     .then(|(s,)| Gen::integer(0, s.len() - 1))
//!     .then(|(s, begin)| Gen::integer(*begin, s.len() - 1))
//!     .build();
//!
//! let (s, begin, end) = params.sample(Seed::from_u64(42))?;
//! assert!(begin <= end && end < s.len());
//! # Ok::<(), GencraftError>(())
//! ```

use crate::gen::{Gen, IntoGen};

/// Tuples that can grow by one element.
pub trait Append<U> {
    type Output;

    fn append(self, value: U) -> Self::Output;
}

macro_rules! impl_append {
    ($($name:ident: $ty:ident),+) => {
        impl<$($ty,)+ U> Append<U> for ($($ty,)+) {
            type Output = ($($ty,)+ U);

            fn append(self, value: U) -> Self::Output {
                let ($($name,)+) = self;
                ($($name,)+ value)
            }
        }
    };
}

impl_append!(a: A);
impl_append!(a: A, b: B);
impl_append!(a: A, b: B, c: C);
impl_append!(a: A, b: B, c: C, d: D);
impl_append!(a: A, b: B, c: C, d: D, e: E);
impl_append!(a: A, b: B, c: C, d: D, e: E, f: F);
impl_append!(a: A, b: B, c: C, d: D, e: E, f: F, g: G);

/// A pipeline whose realized values so far have type `T`.
#[derive(Debug)]
pub struct Stages<T> {
    generator: Gen<T>,
}

impl<A: 'static> Stages<(A,)> {
    /// Begin a pipeline with an independent first stage.
    pub fn start(first: Gen<A>) -> Self {
        Stages {
            generator: first.map(|a| (a,)),
        }
    }
}

impl<T: 'static> Stages<T> {
    /// Add a stage whose generator depends on every earlier value.
    ///
    /// The stage draws from the same advancing seed as the stages before
    /// it. If the stage's generator cannot be constructed, for instance an
    /// empty integer range, the draw fails with that error.
    pub fn then<R, F>(self, stage: F) -> Stages<<T as Append<R::Output>>::Output>
    where
        T: Append<R::Output>,
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: IntoGen,
        R::Output: 'static,
        <T as Append<R::Output>>::Output: 'static,
    {
        let previous = self.generator;
        Stages {
            generator: Gen::new(move |seed| {
                let (realized, seed) = previous.generate(seed)?;
                let (next, seed) = stage(&realized).into_gen()?.generate(seed)?;
                Ok((realized.append(next), seed))
            }),
        }
    }

    /// Finish the pipeline.
    pub fn build(self) -> Gen<T> {
        self.generator
    }
}
