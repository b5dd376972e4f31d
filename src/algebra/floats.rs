#![allow(non_snake_case)]
use num_traits::{Float, FloatConst, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display, LowerExp};

use crate::algebra::dense::DenseFloatT;

/// Core numeric bounds for internal floating point values.
///
/// `CoreFloatT` relies on [`num_traits`](num_traits) for most of its
/// constituent trait bounds.
pub trait CoreFloatT:
    'static
    + Send
    + Float
    + FloatConst
    + NumAssign
    + Default
    + FromPrimitive
    + Display
    + LowerExp
    + Debug
    + Sized
{
}

impl<T> CoreFloatT for T where
    T: 'static
        + Send
        + Float
        + FloatConst
        + NumAssign
        + Default
        + FromPrimitive
        + Display
        + LowerExp
        + Debug
        + Sized
{
}

/// Main trait for floating point types used in the solver.
///
/// All floating point calculations are represented internally on values
/// implementing the `FloatT` trait.  The dense factorizations are provided
/// by nalgebra, so `FloatT` is restricted to the f32 and f64 types that
/// implement [`DenseFloatT`](crate::algebra::DenseFloatT).
pub trait FloatT: CoreFloatT + DenseFloatT {}

impl<T> FloatT for T where T: CoreFloatT + DenseFloatT {}

/// Trait for converting Rust primitives to [`FloatT`](crate::algebra::FloatT)
///
/// This convenience trait is implemented on f32/64 and u32/64/usize.  It is
/// used internally for converting constant primitives to [`FloatT`](crate::algebra::FloatT),
/// and by the [user settings](crate::solver::implementations::default::DefaultSettings)
/// for converting defaults of primitive type.

// NB: `AsFloatT` lets us write (2.0).as_T() on constants,
// rather than T::from_f64(2.0).unwrap() everywhere
pub trait AsFloatT<T>: 'static {
    fn as_T(&self) -> T;
}

macro_rules! impl_as_FloatT {
    ($ty:ty, $ident:ident) => {
        impl<T> AsFloatT<T> for $ty
        where
            T: std::ops::Mul<T, Output = T> + FromPrimitive + 'static,
        {
            #[inline]
            fn as_T(&self) -> T {
                T::$ident(*self).unwrap()
            }
        }
    };
}
impl_as_FloatT!(u32, from_u32);
impl_as_FloatT!(u64, from_u64);
impl_as_FloatT!(usize, from_usize);
impl_as_FloatT!(f32, from_f32);
impl_as_FloatT!(f64, from_f64);
