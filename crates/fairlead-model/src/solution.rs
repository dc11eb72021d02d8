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

/// The final schedule produced by a solver run.
///
/// Structure-of-arrays layout indexed by vessel: `berths[v]` and
/// `start_times[v]` describe where and when vessel `v` is served.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution<T, C> {
    objective_value: C,
    berths: Vec<usize>,
    start_times: Vec<T>,
}

impl<T, C> Solution<T, C>
where
    T: Copy,
    C: Copy,
{
    /// Constructs a new `Solution`.
    ///
    /// # Panics
    ///
    /// Panics if `berths` and `start_times` have different lengths.
    pub fn new(objective_value: C, berths: Vec<usize>, start_times: Vec<T>) -> Self {
        assert_eq!(
            berths.len(),
            start_times.len(),
            "called `Solution::new` with inconsistent vector lengths: berths.len() = {}, start_times.len() = {}",
            berths.len(),
            start_times.len()
        );

        Self {
            objective_value,
            berths,
            start_times,
        }
    }

    /// Returns the number of vessels covered by this solution.
    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.berths.len()
    }

    /// Returns the total objective value.
    #[inline]
    pub fn objective_value(&self) -> C {
        self.objective_value
    }

    /// Returns the berth assigned to a vessel.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn berth_for_vessel(&self, vessel_index: usize) -> usize {
        debug_assert!(
            vessel_index < self.num_vessels(),
            "called `Solution::berth_for_vessel` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            vessel_index
        );

        self.berths[vessel_index]
    }

    /// Returns the service start time of a vessel.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn start_time_for_vessel(&self, vessel_index: usize) -> T {
        debug_assert!(
            vessel_index < self.num_vessels(),
            "called `Solution::start_time_for_vessel` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            vessel_index
        );

        self.start_times[vessel_index]
    }

    /// Returns the berth assignment of every vessel.
    #[inline]
    pub fn berths(&self) -> &[usize] {
        &self.berths
    }

    /// Returns the start time of every vessel.
    #[inline]
    pub fn start_times(&self) -> &[T] {
        &self.start_times
    }
}

impl<T, C> std::fmt::Display for Solution<T, C>
where
    C: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solution(objective: {}, vessels: {})",
            self.objective_value,
            self.berths.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let solution: Solution<i64, i64> = Solution::new(42, vec![1, 0, 1], vec![10, 20, 30]);

        assert_eq!(solution.num_vessels(), 3);
        assert_eq!(solution.objective_value(), 42);
        assert_eq!(solution.berth_for_vessel(0), 1);
        assert_eq!(solution.berth_for_vessel(1), 0);
        assert_eq!(solution.start_time_for_vessel(2), 30);
        assert_eq!(solution.berths(), &[1, 0, 1]);
        assert_eq!(solution.start_times(), &[10, 20, 30]);
    }

    #[test]
    #[should_panic(expected = "inconsistent vector lengths")]
    fn test_new_rejects_mismatched_lengths() {
        let _: Solution<i64, i64> = Solution::new(0, vec![0, 1], vec![5]);
    }

    #[test]
    fn test_float_objective() {
        let solution: Solution<i64, f64> = Solution::new(15.5, vec![0], vec![10]);
        assert_eq!(solution.objective_value(), 15.5);
    }

    #[test]
    fn test_display() {
        let solution: Solution<i64, i64> = Solution::new(7, vec![0, 0], vec![1, 2]);
        assert_eq!(format!("{}", solution), "Solution(objective: 7, vessels: 2)");
    }
}
