// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Numeric Sentinel Constants
//!
//! Associated constants for the sentinel values the solver relies on.
//! Sentinel-encoded fields (an unassigned vessel, an absent service time)
//! store `-1` directly inside a dense array instead of paying for an
//! `Option` discriminant. These traits let generic code name `-1` and `0`
//! without type-specific literals at every call site.
//!
//! All signed integer primitives implement `MinusOne`; all integer and float
//! primitives implement `Zero`. The float impls exist so cost types can share
//! the same bounds as time and index types.

/// A trait for numeric types that can represent the constant `-1`.
pub trait MinusOne {
    /// The constant `-1` for the implementing type.
    const MINUS_ONE: Self;
}

/// A trait for numeric types that can represent the constant `0`.
pub trait Zero {
    /// The constant `0` for the implementing type.
    const ZERO: Self;
}

macro_rules! impl_minus_one {
    ($($t:ty => $value:expr),* $(,)?) => {
        $(
            impl MinusOne for $t {
                const MINUS_ONE: Self = $value;
            }
        )*
    };
}

macro_rules! impl_zero {
    ($($t:ty => $value:expr),* $(,)?) => {
        $(
            impl Zero for $t {
                const ZERO: Self = $value;
            }
        )*
    };
}

impl_minus_one!(
    i8 => -1,
    i16 => -1,
    i32 => -1,
    i64 => -1,
    i128 => -1,
    isize => -1,
    f32 => -1.0,
    f64 => -1.0,
);

impl_zero!(
    u8 => 0,
    u16 => 0,
    u32 => 0,
    u64 => 0,
    u128 => 0,
    usize => 0,
    i8 => 0,
    i16 => 0,
    i32 => 0,
    i64 => 0,
    i128 => 0,
    isize => 0,
    f32 => 0.0,
    f64 => 0.0,
);
