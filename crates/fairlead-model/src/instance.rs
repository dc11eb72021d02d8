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

//! The immutable problem data the search reads.
//!
//! A `ProblemInstance` describes vessels (arrival time, weight, per-berth
//! service time) and berths (opening hours). It is built and validated once
//! through `InstanceBuilder`; the search core itself never re-checks this
//! data. The instance also supplies the cost contract the solver consumes:
//! `assignment_cost` prices one assignment as weighted turnaround time.

use crate::time::ServiceTime;
use fairlead_core::{math::interval::HalfOpenInterval, num::constants::MinusOne};
use num_traits::{NumCast, One, PrimInt, Signed};

#[inline(always)]
fn flatten_index(num_berths: usize, vessel_index: usize, berth_index: usize) -> usize {
    vessel_index * num_berths + berth_index
}

/// Validation failure produced by `InstanceBuilder::build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidInstanceError {
    /// A berth was given an opening window of zero length.
    EmptyOpeningWindow { berth_index: usize },
    /// Two opening windows of the same berth overlap.
    OverlappingOpeningHours { berth_index: usize },
}

impl std::fmt::Display for InvalidInstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidInstanceError::EmptyOpeningWindow { berth_index } => {
                write!(f, "berth {} has an empty opening window", berth_index)
            }
            InvalidInstanceError::OverlappingOpeningHours { berth_index } => {
                write!(f, "berth {} has overlapping opening windows", berth_index)
            }
        }
    }
}

impl std::error::Error for InvalidInstanceError {}

/// The immutable data model describing vessels, berths, and their timing.
///
/// Layout:
/// - `arrival_times[vessel]`: earliest time the vessel can start service.
/// - `weights[vessel]`: cost weight applied to the vessel's turnaround.
/// - `service_times[vessel * num_berths + berth]`: per-pair service duration,
///   sentinel-encoded (`ServiceTime`).
/// - `opening_hours[berth]`: sorted, disjoint, non-empty windows in which the
///   berth may serve vessels.
#[derive(Debug, Clone)]
pub struct ProblemInstance<T, C>
where
    T: PrimInt + Signed + MinusOne,
    C: Copy,
{
    arrival_times: Vec<T>,
    weights: Vec<C>,
    service_times: Vec<ServiceTime<T>>,
    opening_hours: Vec<Vec<HalfOpenInterval<T>>>,
}

impl<T, C> ProblemInstance<T, C>
where
    T: PrimInt + Signed + MinusOne,
    C: Copy,
{
    /// Returns the number of vessels.
    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.arrival_times.len()
    }

    /// Returns the number of berths.
    #[inline]
    pub fn num_berths(&self) -> usize {
        self.opening_hours.len()
    }

    /// Returns the arrival time of a vessel.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn arrival_time(&self, vessel_index: usize) -> T {
        debug_assert!(
            vessel_index < self.num_vessels(),
            "called `ProblemInstance::arrival_time` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            vessel_index
        );

        self.arrival_times[vessel_index]
    }

    /// Returns the cost weight of a vessel.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn weight(&self, vessel_index: usize) -> C {
        debug_assert!(
            vessel_index < self.num_vessels(),
            "called `ProblemInstance::weight` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            vessel_index
        );

        self.weights[vessel_index]
    }

    /// Returns the service time of a vessel at a berth.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if either index is out of bounds.
    #[inline]
    pub fn service_time(&self, vessel_index: usize, berth_index: usize) -> ServiceTime<T> {
        debug_assert!(
            vessel_index < self.num_vessels(),
            "called `ProblemInstance::service_time` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            vessel_index
        );
        debug_assert!(
            berth_index < self.num_berths(),
            "called `ProblemInstance::service_time` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            berth_index
        );

        self.service_times[flatten_index(self.num_berths(), vessel_index, berth_index)]
    }

    /// Returns the sorted, disjoint opening windows of a berth.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `berth_index` is out of bounds.
    #[inline]
    pub fn berth_opening_hours(&self, berth_index: usize) -> &[HalfOpenInterval<T>] {
        debug_assert!(
            berth_index < self.num_berths(),
            "called `ProblemInstance::berth_opening_hours` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            berth_index
        );

        &self.opening_hours[berth_index]
    }

    /// Prices the assignment of a vessel to a berth at a concrete start time
    /// as weighted turnaround: `weight * (finish - arrival)`.
    ///
    /// Returns `None` when the vessel cannot be served at the berth, or when
    /// the turnaround span is not representable in the cost type.
    #[inline]
    pub fn assignment_cost(
        &self,
        vessel_index: usize,
        berth_index: usize,
        start_time: T,
    ) -> Option<C>
    where
        C: std::ops::Mul<Output = C> + NumCast,
    {
        let duration = self.service_time(vessel_index, berth_index).get()?;
        let turnaround = start_time + duration - self.arrival_time(vessel_index);
        let scaled: C = NumCast::from(turnaround)?;
        Some(self.weight(vessel_index) * scaled)
    }
}

impl<T, C> std::fmt::Display for ProblemInstance<T, C>
where
    T: PrimInt + Signed + MinusOne,
    C: Copy,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ProblemInstance(vessels: {}, berths: {})",
            self.num_vessels(),
            self.num_berths()
        )
    }
}

/// Step-by-step construction of a validated `ProblemInstance`.
///
/// All vessels start with arrival time zero, unit weight, and no service
/// time anywhere; all berths start with no opening hours. `build` sorts each
/// berth's opening windows and rejects empty or overlapping ones.
#[derive(Debug, Clone)]
pub struct InstanceBuilder<T, C>
where
    T: PrimInt + Signed + MinusOne,
    C: Copy,
{
    arrival_times: Vec<T>,
    weights: Vec<C>,
    service_times: Vec<ServiceTime<T>>,
    opening_hours: Vec<Vec<HalfOpenInterval<T>>>,
}

impl<T, C> InstanceBuilder<T, C>
where
    T: PrimInt + Signed + MinusOne,
    C: Copy + One,
{
    /// Creates a builder for the given problem size.
    pub fn new(num_berths: usize, num_vessels: usize) -> Self {
        Self {
            arrival_times: vec![T::zero(); num_vessels],
            weights: vec![C::one(); num_vessels],
            service_times: vec![ServiceTime::none(); num_vessels * num_berths],
            opening_hours: vec![Vec::new(); num_berths],
        }
    }

    /// Returns the number of vessels this builder was sized for.
    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.arrival_times.len()
    }

    /// Returns the number of berths this builder was sized for.
    #[inline]
    pub fn num_berths(&self) -> usize {
        self.opening_hours.len()
    }

    /// Sets the arrival time of a vessel.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `vessel_index` is out of bounds.
    pub fn set_arrival_time(&mut self, vessel_index: usize, time: T) -> &mut Self {
        debug_assert!(
            vessel_index < self.num_vessels(),
            "called `InstanceBuilder::set_arrival_time` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            vessel_index
        );

        self.arrival_times[vessel_index] = time;
        self
    }

    /// Sets the cost weight of a vessel.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `vessel_index` is out of bounds.
    pub fn set_weight(&mut self, vessel_index: usize, weight: C) -> &mut Self {
        debug_assert!(
            vessel_index < self.num_vessels(),
            "called `InstanceBuilder::set_weight` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            vessel_index
        );

        self.weights[vessel_index] = weight;
        self
    }

    /// Sets the service time of a vessel at a berth.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if either index is out of bounds or
    /// `duration` is negative.
    pub fn set_service_time(
        &mut self,
        vessel_index: usize,
        berth_index: usize,
        duration: T,
    ) -> &mut Self {
        debug_assert!(
            vessel_index < self.num_vessels(),
            "called `InstanceBuilder::set_service_time` with vessel index out of bounds: the len is {} but the index is {}",
            self.num_vessels(),
            vessel_index
        );
        debug_assert!(
            berth_index < self.num_berths(),
            "called `InstanceBuilder::set_service_time` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            berth_index
        );

        let slot = flatten_index(self.num_berths(), vessel_index, berth_index);
        self.service_times[slot] = ServiceTime::some(duration);
        self
    }

    /// Adds an opening window to a berth. Windows may be added in any order;
    /// `build` sorts them.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `berth_index` is out of bounds.
    pub fn add_opening_hours(
        &mut self,
        berth_index: usize,
        window: HalfOpenInterval<T>,
    ) -> &mut Self {
        debug_assert!(
            berth_index < self.num_berths(),
            "called `InstanceBuilder::add_opening_hours` with berth index out of bounds: the len is {} but the index is {}",
            self.num_berths(),
            berth_index
        );

        self.opening_hours[berth_index].push(window);
        self
    }

    /// Validates the collected data and produces the immutable instance.
    pub fn build(mut self) -> Result<ProblemInstance<T, C>, InvalidInstanceError> {
        for (berth_index, windows) in self.opening_hours.iter_mut().enumerate() {
            windows.sort_unstable_by_key(|w| w.start());

            if windows.iter().any(|w| w.is_empty()) {
                return Err(InvalidInstanceError::EmptyOpeningWindow { berth_index });
            }
            if windows.windows(2).any(|pair| pair[1].start() < pair[0].end()) {
                return Err(InvalidInstanceError::OverlappingOpeningHours { berth_index });
            }
        }

        Ok(ProblemInstance {
            arrival_times: self.arrival_times,
            weights: self.weights,
            service_times: self.service_times,
            opening_hours: self.opening_hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i64, end: i64) -> HalfOpenInterval<i64> {
        HalfOpenInterval::new(start, end)
    }

    #[test]
    fn test_builder_defaults() {
        let instance: ProblemInstance<i64, i64> =
            InstanceBuilder::new(2, 3).build().expect("valid instance");

        assert_eq!(instance.num_berths(), 2);
        assert_eq!(instance.num_vessels(), 3);

        for v in 0..3 {
            assert_eq!(instance.arrival_time(v), 0);
            assert_eq!(instance.weight(v), 1);
            for b in 0..2 {
                assert!(instance.service_time(v, b).is_none());
            }
        }
        for b in 0..2 {
            assert!(instance.berth_opening_hours(b).is_empty());
        }
    }

    #[test]
    fn test_builder_round_trip() {
        let mut builder: InstanceBuilder<i64, i64> = InstanceBuilder::new(2, 2);
        builder
            .set_arrival_time(0, 5)
            .set_arrival_time(1, 10)
            .set_weight(1, 3)
            .set_service_time(0, 0, 20)
            .set_service_time(1, 1, 30)
            .add_opening_hours(0, iv(0, 100))
            .add_opening_hours(1, iv(50, 200));
        let instance = builder.build().expect("valid instance");

        assert_eq!(instance.arrival_time(0), 5);
        assert_eq!(instance.arrival_time(1), 10);
        assert_eq!(instance.weight(0), 1);
        assert_eq!(instance.weight(1), 3);
        assert_eq!(instance.service_time(0, 0).get(), Some(20));
        assert!(instance.service_time(0, 1).is_none());
        assert_eq!(instance.service_time(1, 1).get(), Some(30));
        assert_eq!(instance.berth_opening_hours(0), &[iv(0, 100)]);
        assert_eq!(instance.berth_opening_hours(1), &[iv(50, 200)]);
    }

    #[test]
    fn test_build_sorts_opening_hours() {
        let mut builder: InstanceBuilder<i64, i64> = InstanceBuilder::new(1, 1);
        builder
            .add_opening_hours(0, iv(200, 300))
            .add_opening_hours(0, iv(0, 100));
        let instance = builder.build().expect("valid instance");

        assert_eq!(instance.berth_opening_hours(0), &[iv(0, 100), iv(200, 300)]);
    }

    #[test]
    fn test_build_rejects_empty_window() {
        let mut builder: InstanceBuilder<i64, i64> = InstanceBuilder::new(1, 1);
        builder.add_opening_hours(0, iv(50, 50));

        assert_eq!(
            builder.build().unwrap_err(),
            InvalidInstanceError::EmptyOpeningWindow { berth_index: 0 }
        );
    }

    #[test]
    fn test_build_rejects_overlapping_windows() {
        let mut builder: InstanceBuilder<i64, i64> = InstanceBuilder::new(2, 1);
        builder
            .add_opening_hours(1, iv(0, 60))
            .add_opening_hours(1, iv(50, 100));

        assert_eq!(
            builder.build().unwrap_err(),
            InvalidInstanceError::OverlappingOpeningHours { berth_index: 1 }
        );
    }

    #[test]
    fn test_build_accepts_touching_windows() {
        let mut builder: InstanceBuilder<i64, i64> = InstanceBuilder::new(1, 1);
        builder
            .add_opening_hours(0, iv(0, 50))
            .add_opening_hours(0, iv(50, 100));

        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_assignment_cost_weighted_turnaround() {
        let mut builder: InstanceBuilder<i64, i64> = InstanceBuilder::new(1, 1);
        builder
            .set_arrival_time(0, 10)
            .set_weight(0, 4)
            .set_service_time(0, 0, 30)
            .add_opening_hours(0, iv(0, 1000));
        let instance = builder.build().expect("valid instance");

        // Start at 25, finish at 55, turnaround 45, weight 4.
        assert_eq!(instance.assignment_cost(0, 0, 25), Some(180));
    }

    #[test]
    fn test_assignment_cost_absent_service_time() {
        let instance: ProblemInstance<i64, i64> =
            InstanceBuilder::new(1, 1).build().expect("valid instance");

        assert_eq!(instance.assignment_cost(0, 0, 0), None);
    }

    #[test]
    fn test_assignment_cost_float_costs() {
        let mut builder: InstanceBuilder<i64, f64> = InstanceBuilder::new(1, 1);
        builder
            .set_weight(0, 0.5)
            .set_service_time(0, 0, 9)
            .add_opening_hours(0, iv(0, 100));
        let instance = builder.build().expect("valid instance");

        assert_eq!(instance.assignment_cost(0, 0, 0), Some(4.5));
    }

    #[test]
    fn test_display_summary() {
        let instance: ProblemInstance<i64, i64> =
            InstanceBuilder::new(4, 7).build().expect("valid instance");
        assert_eq!(
            format!("{}", instance),
            "ProblemInstance(vessels: 7, berths: 4)"
        );
    }
}
