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

//! Static per-berth availability.
//!
//! `BerthTimeline` holds the windows in which one berth can serve vessels,
//! after pre-committed assignments have been carved out of the opening
//! hours. It answers the only question the search asks of it: given a ready
//! time and a duration, what is the earliest feasible start? The timeline is
//! never mutated during the search; it is rebuilt (reusing its allocation)
//! between solver runs.

use fairlead_core::math::interval::HalfOpenInterval;
use num_traits::PrimInt;

#[inline(always)]
fn are_sorted_and_disjoint<T>(windows: &[HalfOpenInterval<T>]) -> bool
where
    T: PrimInt,
{
    windows.windows(2).all(|pair| pair[0].end() <= pair[1].start())
}

/// Returns the index of the first window whose end lies strictly after `key`.
///
/// # Invariants
///
/// `windows` must be sorted by start time and pairwise disjoint; debug
/// builds verify this.
#[inline(always)]
fn lower_bound_end<T>(windows: &[HalfOpenInterval<T>], key: T) -> usize
where
    T: PrimInt,
{
    debug_assert!(
        are_sorted_and_disjoint(windows),
        "called `lower_bound_end` with windows that are not sorted and disjoint"
    );

    let mut lo: usize = 0;
    let mut hi: usize = windows.len();

    while lo < hi {
        let mid = lo + ((hi - lo) >> 1);
        // SAFETY: mid is always in bounds because lo < hi <= windows.len(),
        // therefore mid < windows.len()
        if unsafe { windows.get_unchecked(mid).end() } <= key {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// An ordered sequence of availability windows for a single berth.
///
/// Invariants: windows are strictly ascending, pairwise disjoint, and
/// non-empty. The `assign_*` methods rebuild the sequence in place while
/// retaining the allocation, so a timeline can be reused across solver runs
/// without heap traffic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BerthTimeline<T>
where
    T: PrimInt,
{
    windows: Vec<HalfOpenInterval<T>>,
}

impl<T> BerthTimeline<T>
where
    T: PrimInt,
{
    /// Creates a new, empty timeline.
    #[inline]
    pub fn new() -> Self {
        Self {
            windows: Vec::new(),
        }
    }

    /// Creates an empty timeline with space for `window_capacity` windows.
    #[inline]
    pub fn with_capacity(window_capacity: usize) -> Self {
        Self {
            windows: Vec::with_capacity(window_capacity),
        }
    }

    /// Creates a timeline spanning the single range `[open, close)`.
    #[inline]
    pub fn from_range(open: T, close: T) -> Self {
        let mut timeline = Self::new();
        timeline.assign_range(open, close);
        timeline
    }

    /// Creates a timeline from a window list. The caller guarantees the
    /// windows are sorted, disjoint, and non-empty.
    #[inline]
    pub fn from_windows<I>(windows: I) -> Self
    where
        I: IntoIterator<Item = HalfOpenInterval<T>>,
    {
        let mut timeline = Self::new();
        timeline.assign_windows(windows);
        timeline
    }

    /// Creates a timeline by carving `fixed` out of `availability`.
    #[inline]
    pub fn carved(availability: &[HalfOpenInterval<T>], fixed: &[HalfOpenInterval<T>]) -> Self {
        let mut timeline = Self::new();
        timeline.assign_carved(availability, fixed);
        timeline
    }

    /// Rebuilds the timeline as the single range `[open, close)`, or as
    /// empty when `open >= close`. Retains the allocation.
    #[inline]
    pub fn assign_range(&mut self, open: T, close: T) {
        self.windows.clear();
        if open < close {
            self.windows.push(HalfOpenInterval::new_unchecked(open, close));
        }
    }

    /// Rebuilds the timeline from a window list, retaining the allocation.
    /// The caller guarantees the windows are sorted, disjoint, and
    /// non-empty.
    #[inline]
    pub fn assign_windows<I>(&mut self, windows: I)
    where
        I: IntoIterator<Item = HalfOpenInterval<T>>,
    {
        self.windows.clear();
        self.windows.extend(windows);

        debug_assert!(
            are_sorted_and_disjoint(&self.windows),
            "called `BerthTimeline::assign_windows` with windows that are not sorted and disjoint"
        );
        debug_assert!(
            self.windows.iter().all(|w| !w.is_empty()),
            "called `BerthTimeline::assign_windows` with an empty window"
        );
    }

    /// Rebuilds the timeline as `availability` minus the union of `fixed`,
    /// clipped to the availability. Retains the allocation.
    ///
    /// Both inputs must be sorted by start time and pairwise disjoint within
    /// themselves; debug builds verify this, release builds trust the
    /// loader. A fixed interval may straddle the gap between two
    /// availability windows; it then shortens both.
    pub fn assign_carved(
        &mut self,
        availability: &[HalfOpenInterval<T>],
        fixed: &[HalfOpenInterval<T>],
    ) {
        debug_assert!(
            are_sorted_and_disjoint(availability),
            "called `BerthTimeline::assign_carved` with availability that is not sorted and disjoint"
        );
        debug_assert!(
            are_sorted_and_disjoint(fixed),
            "called `BerthTimeline::assign_carved` with fixed intervals that are not sorted and disjoint"
        );

        self.windows.clear();

        let mut next_fixed: usize = 0;
        for avail in availability {
            let mut cursor = avail.start();

            while next_fixed < fixed.len() && fixed[next_fixed].start() < avail.end() {
                let blocked = fixed[next_fixed];

                if blocked.end() <= cursor {
                    next_fixed += 1;
                    continue;
                }

                if blocked.start() > cursor {
                    self.windows
                        .push(HalfOpenInterval::new_unchecked(cursor, blocked.start()));
                }

                if blocked.end() > cursor {
                    cursor = blocked.end();
                }

                if cursor >= avail.end() {
                    break;
                }

                if blocked.end() < avail.end() {
                    next_fixed += 1;
                } else {
                    // This fixed interval may still overlap a later
                    // availability window.
                    break;
                }
            }

            if cursor < avail.end() {
                self.windows
                    .push(HalfOpenInterval::new_unchecked(cursor, avail.end()));
            }
        }
    }

    /// Removes all windows while retaining capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.windows.clear();
    }

    /// Reserves space for at least `additional` more windows.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.windows.reserve(additional);
    }

    /// Returns the number of windows.
    #[inline]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Returns `true` if the berth is never available.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Returns the windows as a slice.
    #[inline]
    pub fn windows(&self) -> &[HalfOpenInterval<T>] {
        &self.windows
    }

    /// Returns an iterator over the windows in ascending order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, HalfOpenInterval<T>> {
        self.windows.iter()
    }

    /// Finds the earliest start `s >= ready_time` such that `[s, s +
    /// duration)` fits entirely inside one window.
    ///
    /// Returns `None` when no window can accommodate the request. This is a
    /// normal search outcome, not an error.
    #[inline]
    pub fn find_earliest_start(&self, ready_time: T, duration: T) -> Option<T> {
        let first = lower_bound_end(&self.windows, ready_time);

        for window in &self.windows[first..] {
            let actual_start = if ready_time > window.start() {
                ready_time
            } else {
                window.start()
            };
            if duration <= window.end() - actual_start {
                return Some(actual_start);
            }
        }
        None
    }
}

impl<'a, T> IntoIterator for &'a BerthTimeline<T>
where
    T: PrimInt,
{
    type Item = &'a HalfOpenInterval<T>;
    type IntoIter = std::slice::Iter<'a, HalfOpenInterval<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.windows.iter()
    }
}

impl<T> std::fmt::Display for BerthTimeline<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BerthTimeline(windows: {})", self.windows.len())
    }
}
