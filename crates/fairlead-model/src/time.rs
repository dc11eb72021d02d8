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

use fairlead_core::num::constants::MinusOne;
use num_traits::Signed;

/// A service duration that may be absent.
///
/// A vessel that cannot be handled at a berth has no service time for that
/// pair. Instead of `Option<T>`, this type encodes absence as a negative
/// sentinel so the dense vessel-by-berth table stays one machine word per
/// entry. Valid service times are non-negative by definition.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceTime<T>(T)
where
    T: Signed;

impl<T> ServiceTime<T>
where
    T: Copy + Signed + MinusOne,
{
    const NONE_SENTINEL: T = T::MINUS_ONE;

    /// Creates an absent service time.
    #[inline]
    pub fn none() -> Self {
        ServiceTime(Self::NONE_SENTINEL)
    }

    /// Creates a concrete service time.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `value` is negative.
    #[inline]
    pub fn some(value: T) -> Self {
        debug_assert!(
            !value.is_negative(),
            "called `ServiceTime::some` with a negative duration"
        );
        ServiceTime(value)
    }

    /// Creates a `ServiceTime` from an `Option<T>`.
    #[inline]
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::some(v),
            None => Self::none(),
        }
    }

    /// Returns `true` if a concrete service time is present.
    #[inline]
    pub fn is_some(&self) -> bool {
        !self.0.is_negative()
    }

    /// Returns `true` if the service time is absent.
    #[inline]
    pub fn is_none(&self) -> bool {
        self.0.is_negative()
    }

    /// Decodes into an `Option<T>`.
    #[inline]
    pub fn get(&self) -> Option<T> {
        if self.is_some() { Some(self.0) } else { None }
    }

    /// Returns the raw encoded value, sentinel included.
    #[inline]
    pub fn raw(&self) -> T {
        self.0
    }
}

impl<T> Default for ServiceTime<T>
where
    T: Copy + Signed + MinusOne,
{
    #[inline]
    fn default() -> Self {
        Self::none()
    }
}

impl<T> From<Option<T>> for ServiceTime<T>
where
    T: Copy + Signed + MinusOne,
{
    #[inline]
    fn from(value: Option<T>) -> Self {
        Self::from_option(value)
    }
}

impl<T> std::fmt::Debug for ServiceTime<T>
where
    T: Copy + Signed + MinusOne + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.get() {
            Some(v) => write!(f, "ServiceTime({:?})", v),
            None => write!(f, "ServiceTime(None)"),
        }
    }
}

impl<T> std::fmt::Display for ServiceTime<T>
where
    T: Copy + Signed + MinusOne + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.get() {
            Some(v) => write!(f, "{}", v),
            None => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_some_and_none_round_trip() {
        let present: ServiceTime<i64> = ServiceTime::some(25);
        assert!(present.is_some());
        assert!(!present.is_none());
        assert_eq!(present.get(), Some(25));
        assert_eq!(present.raw(), 25);

        let absent: ServiceTime<i64> = ServiceTime::none();
        assert!(absent.is_none());
        assert_eq!(absent.get(), None);
        assert_eq!(absent.raw(), -1);
    }

    #[test]
    fn test_zero_is_a_valid_duration() {
        let zero: ServiceTime<i32> = ServiceTime::some(0);
        assert!(zero.is_some());
        assert_eq!(zero.get(), Some(0));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(ServiceTime::from_option(Some(7i64)).get(), Some(7));
        assert_eq!(ServiceTime::<i64>::from_option(None).get(), None);

        let converted: ServiceTime<i64> = Some(3).into();
        assert_eq!(converted.get(), Some(3));
    }

    #[test]
    fn test_default_is_absent() {
        let st: ServiceTime<i64> = Default::default();
        assert!(st.is_none());
    }

    #[test]
    fn test_display_and_debug() {
        let present: ServiceTime<i64> = ServiceTime::some(12);
        assert_eq!(format!("{}", present), "12");
        assert_eq!(format!("{:?}", present), "ServiceTime(12)");

        let absent: ServiceTime<i64> = ServiceTime::none();
        assert_eq!(format!("{}", absent), "-");
        assert_eq!(format!("{:?}", absent), "ServiceTime(None)");
    }
}
