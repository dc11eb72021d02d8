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

//! The mutable assignment state of the depth-first search.
//!
//! `SearchState` tracks which vessel sits on which berth, when each berth is
//! free again, and the running objective. It is deliberately thin: mutation
//! happens only through `apply_move` and `backtrack_move`, both unchecked
//! except for debug assertions. Exactness of backtracking is the
//! responsibility of whoever owns the trail, not of the state.

use fairlead_core::num::constants::{MinusOne, Zero};
use fairlead_model::solution::Solution;
use num_traits::{AsPrimitive, PrimInt, Signed};

/// The mutable state of one searcher.
///
/// Three parallel sequences plus two scalars:
/// - `berth_free_times[b]`: earliest time berth `b` is free again.
/// - `vessel_assignments[v]`: the berth assigned to vessel `v`, or
///   [`SearchState::UNASSIGNED`].
/// - `vessel_start_times[v]`: berth-local start of `v`'s service, defined
///   only while `v` is assigned.
/// - `last_assigned_vessel`: the vessel of the most recent `apply_move`, or
///   `UNASSIGNED` at the root.
/// - `current_objective`: the accumulated cost of the partial assignment.
///
/// Generic over the time, index, and cost widths; everything monomorphizes,
/// nothing dispatches at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState<T, I, C> {
    berth_free_times: Vec<T>,
    vessel_assignments: Vec<I>,
    vessel_start_times: Vec<T>,
    last_assigned_vessel: I,
    current_objective: C,
}

impl<T, I, C> SearchState<T, I, C>
where
    T: PrimInt + Signed,
    I: PrimInt + Signed + MinusOne + AsPrimitive<usize> + std::fmt::Debug,
    C: Copy,
{
    /// Sentinel marking an unfilled assignment slot.
    pub const UNASSIGNED: I = I::MINUS_ONE;

    /// Creates a state with all berths free at time zero, no vessel
    /// assigned, and a zero objective.
    #[inline]
    pub fn new(num_berths: usize, num_vessels: usize) -> Self
    where
        C: Zero,
    {
        Self {
            berth_free_times: vec![T::zero(); num_berths],
            vessel_assignments: vec![Self::UNASSIGNED; num_vessels],
            vessel_start_times: vec![T::zero(); num_vessels],
            last_assigned_vessel: Self::UNASSIGNED,
            current_objective: C::ZERO,
        }
    }

    /// Creates a state from existing sequences, e.g. a warm start.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the vessel sequences differ in length.
    #[inline]
    pub fn from_parts(
        berth_free_times: Vec<T>,
        vessel_assignments: Vec<I>,
        vessel_start_times: Vec<T>,
        last_assigned_vessel: I,
        current_objective: C,
    ) -> Self {
        debug_assert_eq!(
            vessel_assignments.len(),
            vessel_start_times.len(),
            "called `SearchState::from_parts` with inconsistent vessel sequence lengths"
        );

        Self {
            berth_free_times,
            vessel_assignments,
            vessel_start_times,
            last_assigned_vessel,
            current_objective,
        }
    }

    /// Returns the number of berths.
    #[inline]
    pub fn num_berths(&self) -> usize {
        self.berth_free_times.len()
    }

    /// Returns the number of vessels.
    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.vessel_assignments.len()
    }

    /// Returns whether a vessel is currently assigned to a berth.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn is_assigned(&self, vessel_index: I) -> bool {
        debug_assert!(
            vessel_index >= I::zero() && vessel_index.as_() < self.num_vessels(),
            "called `SearchState::is_assigned` with vessel index out of bounds: the len is {} but the index is {:?}",
            self.num_vessels(),
            vessel_index
        );

        self.vessel_assignments[vessel_index.as_()] != Self::UNASSIGNED
    }

    /// Returns the service start time of an assigned vessel.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `vessel_index` is out of bounds or the
    /// vessel is not assigned.
    #[inline]
    pub fn start_time(&self, vessel_index: I) -> T {
        debug_assert!(
            self.is_assigned(vessel_index),
            "called `SearchState::start_time` with unassigned vessel {:?}",
            vessel_index
        );

        self.vessel_start_times[vessel_index.as_()]
    }

    /// Returns the berth an assigned vessel sits on.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `vessel_index` is out of bounds or the
    /// vessel is not assigned.
    #[inline]
    pub fn assigned_berth(&self, vessel_index: I) -> I {
        debug_assert!(
            self.is_assigned(vessel_index),
            "called `SearchState::assigned_berth` with unassigned vessel {:?}",
            vessel_index
        );

        self.vessel_assignments[vessel_index.as_()]
    }

    /// Returns the earliest time a berth is free again.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `berth_index` is out of bounds.
    #[inline]
    pub fn berth_free_time(&self, berth_index: I) -> T {
        debug_assert!(
            berth_index >= I::zero() && berth_index.as_() < self.num_berths(),
            "called `SearchState::berth_free_time` with berth index out of bounds: the len is {} but the index is {:?}",
            self.num_berths(),
            berth_index
        );

        self.berth_free_times[berth_index.as_()]
    }

    /// Returns the free times of all berths.
    #[inline]
    pub fn berth_free_times(&self) -> &[T] {
        &self.berth_free_times
    }

    /// Returns the assignment slot of every vessel (berth index or
    /// `UNASSIGNED`).
    #[inline]
    pub fn vessel_assignments(&self) -> &[I] {
        &self.vessel_assignments
    }

    /// Returns the start-time slot of every vessel.
    #[inline]
    pub fn vessel_start_times(&self) -> &[T] {
        &self.vessel_start_times
    }

    /// Returns the vessel of the most recent `apply_move`, or `UNASSIGNED`.
    #[inline]
    pub fn last_assigned_vessel(&self) -> I {
        self.last_assigned_vessel
    }

    /// Returns the accumulated objective of the partial assignment.
    #[inline]
    pub fn current_objective(&self) -> C {
        self.current_objective
    }

    /// Applies one assignment: vessel `vessel_index` starts service on berth
    /// `berth_index` at `start_time`, occupying it until `finish_time`, and
    /// the objective grows by `cost_delta`.
    ///
    /// The caller must capture the previous berth free time, objective, and
    /// last assigned vessel beforehand; they are unrecoverable afterwards.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if either index is out of bounds, the vessel
    /// is already assigned, or `start_time >= finish_time`.
    #[inline]
    pub fn apply_move(
        &mut self,
        vessel_index: I,
        berth_index: I,
        start_time: T,
        finish_time: T,
        cost_delta: C,
    ) where
        C: std::ops::AddAssign,
    {
        debug_assert!(
            !self.is_assigned(vessel_index),
            "called `SearchState::apply_move` with vessel {:?} already assigned",
            vessel_index
        );
        debug_assert!(
            berth_index >= I::zero() && berth_index.as_() < self.num_berths(),
            "called `SearchState::apply_move` with berth index out of bounds: the len is {} but the index is {:?}",
            self.num_berths(),
            berth_index
        );
        debug_assert!(
            start_time < finish_time,
            "called `SearchState::apply_move` with an empty service interval"
        );

        self.berth_free_times[berth_index.as_()] = finish_time;
        self.vessel_assignments[vessel_index.as_()] = berth_index;
        self.vessel_start_times[vessel_index.as_()] = start_time;
        self.current_objective += cost_delta;
        self.last_assigned_vessel = vessel_index;
    }

    /// Reverses an earlier `apply_move` from the values captured before it.
    ///
    /// The previous last assigned vessel must be passed in explicitly: it
    /// cannot be derived from the state, since earlier decisions may have
    /// landed on other berths.
    #[inline]
    pub fn backtrack_move(
        &mut self,
        vessel_index: I,
        berth_index: I,
        old_berth_free_time: T,
        old_objective: C,
        old_last_assigned: I,
    ) {
        debug_assert!(
            self.is_assigned(vessel_index),
            "called `SearchState::backtrack_move` with vessel {:?} not assigned",
            vessel_index
        );
        debug_assert!(
            self.vessel_assignments[vessel_index.as_()] == berth_index,
            "called `SearchState::backtrack_move` with mismatched berth for vessel {:?}",
            vessel_index
        );

        self.berth_free_times[berth_index.as_()] = old_berth_free_time;
        self.vessel_assignments[vessel_index.as_()] = Self::UNASSIGNED;
        self.current_objective = old_objective;
        self.last_assigned_vessel = old_last_assigned;
    }

    /// Restores the initial configuration without reallocating.
    #[inline]
    pub fn reset(&mut self)
    where
        C: Zero,
    {
        self.berth_free_times.fill(T::zero());
        self.vessel_assignments.fill(Self::UNASSIGNED);
        self.vessel_start_times.fill(T::zero());
        self.last_assigned_vessel = Self::UNASSIGNED;
        self.current_objective = C::ZERO;
    }
}

impl<T, I, C> std::fmt::Display for SearchState<T, I, C>
where
    C: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchState(objective: {}, vessels: {}, berths: {})",
            self.current_objective,
            self.vessel_assignments.len(),
            self.berth_free_times.len()
        )
    }
}

/// Error returned when converting a partial state into a `Solution`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteSolutionError {
    assigned_vessels: usize,
    total_vessels: usize,
}

impl IncompleteSolutionError {
    /// Returns how many vessels were assigned.
    #[inline]
    pub fn assigned_vessels(&self) -> usize {
        self.assigned_vessels
    }

    /// Returns how many vessels the problem has.
    #[inline]
    pub fn total_vessels(&self) -> usize {
        self.total_vessels
    }
}

impl std::fmt::Display for IncompleteSolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "incomplete solution: assigned {}/{} vessels",
            self.assigned_vessels, self.total_vessels
        )
    }
}

impl std::error::Error for IncompleteSolutionError {}

impl<T, I, C> TryFrom<&SearchState<T, I, C>> for Solution<T, C>
where
    T: PrimInt + Signed,
    I: PrimInt + Signed + MinusOne + AsPrimitive<usize> + std::fmt::Debug,
    C: Copy,
{
    type Error = IncompleteSolutionError;

    fn try_from(state: &SearchState<T, I, C>) -> Result<Self, Self::Error> {
        let assigned = state
            .vessel_assignments()
            .iter()
            .filter(|&&slot| slot != SearchState::<T, I, C>::UNASSIGNED)
            .count();
        if assigned != state.num_vessels() {
            return Err(IncompleteSolutionError {
                assigned_vessels: assigned,
                total_vessels: state.num_vessels(),
            });
        }

        Ok(Solution::new(
            state.current_objective(),
            state
                .vessel_assignments()
                .iter()
                .map(|slot| slot.as_())
                .collect(),
            state.vessel_start_times().to_vec(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type State = SearchState<i64, i32, f64>;

    #[test]
    fn test_new_initial_configuration() {
        let state = State::new(2, 3);

        assert_eq!(state.num_berths(), 2);
        assert_eq!(state.num_vessels(), 3);
        assert_eq!(state.berth_free_times(), &[0, 0]);
        assert_eq!(state.vessel_assignments(), &[-1, -1, -1]);
        assert_eq!(state.vessel_start_times(), &[0, 0, 0]);
        assert_eq!(state.last_assigned_vessel(), -1);
        assert_eq!(state.current_objective(), 0.0);

        for v in 0..3 {
            assert!(!state.is_assigned(v));
        }
    }

    #[test]
    fn test_unassigned_sentinel_is_minus_one() {
        assert_eq!(State::UNASSIGNED, -1);
        assert_eq!(SearchState::<i64, i64, i64>::UNASSIGNED, -1);
    }

    #[test]
    fn test_apply_move_writes_all_fields() {
        let mut state = State::new(2, 2);

        state.apply_move(0, 1, 10, 25, 15.5);

        assert!(state.is_assigned(0));
        assert!(!state.is_assigned(1));
        assert_eq!(state.assigned_berth(0), 1);
        assert_eq!(state.start_time(0), 10);
        assert_eq!(state.berth_free_time(1), 25);
        assert_eq!(state.berth_free_time(0), 0);
        assert_eq!(state.current_objective(), 15.5);
        assert_eq!(state.last_assigned_vessel(), 0);
    }

    #[test]
    fn test_apply_then_backtrack_restores_exactly() {
        let mut state = State::new(2, 2);
        let before = state.clone();

        // Capture old values, mutate, reverse.
        let old_free = state.berth_free_time(1);
        let old_objective = state.current_objective();
        let old_last = state.last_assigned_vessel();

        state.apply_move(0, 1, 10, 25, 15.5);
        state.backtrack_move(0, 1, old_free, old_objective, old_last);

        assert_eq!(state, before);
        assert!(!state.is_assigned(0));
        assert_eq!(state.berth_free_times(), &[0, 0]);
        assert_eq!(state.current_objective(), 0.0);
        assert_eq!(state.last_assigned_vessel(), -1);
    }

    #[test]
    fn test_stacked_moves_on_same_berth_partial_backtrack() {
        let mut state: SearchState<i64, i32, i64> = SearchState::new(1, 5);

        state.apply_move(2, 0, 0, 20, 10);
        let old_free = state.berth_free_time(0);
        let old_objective = state.current_objective();
        let old_last = state.last_assigned_vessel();

        state.apply_move(4, 0, 20, 50, 30);
        assert_eq!(state.berth_free_time(0), 50);
        assert_eq!(state.current_objective(), 40);
        assert_eq!(state.last_assigned_vessel(), 4);

        // Undo only the second move; the first must survive untouched.
        state.backtrack_move(4, 0, old_free, old_objective, old_last);

        assert!(state.is_assigned(2));
        assert!(!state.is_assigned(4));
        assert_eq!(state.berth_free_time(0), 20);
        assert_eq!(state.current_objective(), 10);
        assert_eq!(state.last_assigned_vessel(), 2);
    }

    #[test]
    fn test_from_parts_warm_start() {
        let state: SearchState<i64, i32, i64> =
            SearchState::from_parts(vec![30, 0], vec![0, -1], vec![10, 0], 0, 25);

        assert!(state.is_assigned(0));
        assert!(!state.is_assigned(1));
        assert_eq!(state.assigned_berth(0), 0);
        assert_eq!(state.start_time(0), 10);
        assert_eq!(state.berth_free_time(0), 30);
        assert_eq!(state.current_objective(), 25);
        assert_eq!(state.last_assigned_vessel(), 0);
    }

    #[test]
    fn test_reset_restores_initial_configuration() {
        let mut state = State::new(2, 2);
        state.apply_move(0, 0, 0, 10, 4.0);
        state.apply_move(1, 1, 5, 25, 8.0);

        state.reset();

        assert_eq!(state, State::new(2, 2));
    }

    #[test]
    fn test_zero_sized_problems() {
        let state: SearchState<i64, i32, i64> = SearchState::new(0, 0);
        assert_eq!(state.num_berths(), 0);
        assert_eq!(state.num_vessels(), 0);
        assert_eq!(state.last_assigned_vessel(), -1);
    }

    #[test]
    fn test_display_summary() {
        let mut state: SearchState<i64, i32, i64> = SearchState::new(2, 3);
        state.apply_move(1, 0, 0, 10, 7);
        assert_eq!(
            format!("{}", state),
            "SearchState(objective: 7, vessels: 3, berths: 2)"
        );
    }

    #[test]
    fn test_solution_conversion_complete() {
        let mut state: SearchState<i64, i32, i64> = SearchState::new(2, 2);
        state.apply_move(0, 1, 10, 30, 20);
        state.apply_move(1, 0, 0, 15, 15);

        let solution = Solution::try_from(&state).expect("state is complete");
        assert_eq!(solution.objective_value(), 35);
        assert_eq!(solution.berths(), &[1, 0]);
        assert_eq!(solution.start_times(), &[10, 0]);
    }

    #[test]
    fn test_solution_conversion_incomplete_fails() {
        let mut state: SearchState<i64, i32, i64> = SearchState::new(2, 3);
        state.apply_move(0, 0, 0, 10, 10);

        let error = Solution::try_from(&state).unwrap_err();
        assert_eq!(error.assigned_vessels(), 1);
        assert_eq!(error.total_vessels(), 3);
        assert_eq!(
            format!("{}", error),
            "incomplete solution: assigned 1/3 vessels"
        );
    }

    #[test]
    #[should_panic(expected = "already assigned")]
    #[cfg(debug_assertions)]
    fn test_double_assign_panics_in_debug() {
        let mut state: SearchState<i64, i32, i64> = SearchState::new(1, 1);
        state.apply_move(0, 0, 0, 10, 1);
        state.apply_move(0, 0, 10, 20, 1);
    }

    #[test]
    #[should_panic(expected = "unassigned vessel")]
    #[cfg(debug_assertions)]
    fn test_start_time_of_unassigned_panics_in_debug() {
        let state: SearchState<i64, i32, i64> = SearchState::new(1, 1);
        let _ = state.start_time(0);
    }
}
