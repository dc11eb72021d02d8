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

//! The depth-first branch-and-bound driver.
//!
//! `BnbSolver` owns the reusable search structures (stack, trail, one
//! timeline per berth) and runs an iterative descent over them. Vessels are
//! branched in index order; each frame holds one candidate per berth that
//! can serve the vessel, placed at its earliest feasible start. A candidate
//! whose projected objective is not strictly better than the incumbent is
//! pruned.
//!
//! The driver is a collaborator of the core structures, not part of them:
//! it touches them only through their public contracts.

use crate::{
    fixed::FixedAssignment,
    result::SolveOutcome,
    stack::SearchStack,
    state::SearchState,
    stats::SolverStatistics,
    timeline::BerthTimeline,
    trail::SearchTrail,
};
use fairlead_core::{
    math::interval::HalfOpenInterval,
    num::constants::{MinusOne, Zero},
};
use fairlead_model::{instance::ProblemInstance, solution::Solution};
use num_traits::{AsPrimitive, NumCast, PrimInt, Signed};
use std::time::{Duration, Instant};

/// How often (in search steps) the wall clock is consulted when a time
/// budget is set. Must be a power of two minus one.
const CLOCK_CHECK_MASK: u64 = 1023;

/// External budgets checked between decisions. The search structures
/// themselves know nothing about cancellation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveLimits {
    /// Stop after exploring this many nodes.
    pub max_nodes: Option<u64>,
    /// Stop once this much wall-clock time has elapsed.
    pub time_budget: Option<Duration>,
}

impl SolveLimits {
    /// No budgets; the search runs until the tree is exhausted.
    #[inline]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns limits with a node budget.
    #[inline]
    pub fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    /// Returns limits with a wall-clock budget.
    #[inline]
    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = Some(time_budget);
        self
    }
}

/// Rejection of a pre-committed assignment before the search starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// A fixed assignment names a vessel outside the instance.
    FixedVesselOutOfRange { vessel_index: usize },
    /// A fixed assignment names a berth outside the instance.
    FixedBerthOutOfRange { berth_index: usize },
    /// A fixed assignment puts a vessel on a berth that cannot serve it.
    FixedVesselNotServiceable {
        vessel_index: usize,
        berth_index: usize,
    },
    /// The same vessel is fixed more than once.
    FixedVesselDuplicated { vessel_index: usize },
    /// Two fixed assignments on the same berth overlap in time.
    FixedAssignmentsOverlap { berth_index: usize },
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveError::FixedVesselOutOfRange { vessel_index } => {
                write!(f, "fixed assignment names unknown vessel {}", vessel_index)
            }
            SolveError::FixedBerthOutOfRange { berth_index } => {
                write!(f, "fixed assignment names unknown berth {}", berth_index)
            }
            SolveError::FixedVesselNotServiceable {
                vessel_index,
                berth_index,
            } => write!(
                f,
                "fixed assignment puts vessel {} on berth {} which cannot serve it",
                vessel_index, berth_index
            ),
            SolveError::FixedVesselDuplicated { vessel_index } => {
                write!(f, "vessel {} is fixed more than once", vessel_index)
            }
            SolveError::FixedAssignmentsOverlap { berth_index } => {
                write!(f, "fixed assignments overlap on berth {}", berth_index)
            }
        }
    }
}

impl std::error::Error for SolveError {}

/// A candidate move: one vessel onto one berth at its earliest feasible
/// start, with the occupation end and cost increment precomputed at frame
/// creation time.
#[derive(Clone, Copy, Debug)]
struct Candidate<T, I, C> {
    start_time: T,
    finish_time: T,
    cost_delta: C,
    vessel_index: I,
    berth_index: I,
}

/// The undo record for one applied move. Captures everything
/// `SearchState::backtrack_move` needs to restore the prior state,
/// including the previous last assigned vessel, which is unrecoverable
/// otherwise.
#[derive(Clone, Copy, Debug)]
struct MoveUndo<T, I, C> {
    old_berth_free_time: T,
    old_objective: C,
    vessel_index: I,
    berth_index: I,
    old_last_assigned: I,
}

/// The result of a single search step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchStep {
    Continue,
    Finished,
}

/// A depth-first branch-and-bound solver with reusable search structures.
///
/// The stack, trail, and timelines survive across `solve` calls, so
/// repeated runs on instances of similar shape allocate nothing after the
/// first warm-up descent.
#[derive(Debug)]
pub struct BnbSolver<T, I, C>
where
    T: PrimInt,
{
    stack: SearchStack<Candidate<T, I, C>>,
    trail: SearchTrail<MoveUndo<T, I, C>>,
    timelines: Vec<BerthTimeline<T>>,
}

impl<T, I, C> Default for BnbSolver<T, I, C>
where
    T: PrimInt,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, I, C> BnbSolver<T, I, C>
where
    T: PrimInt,
{
    /// Creates a solver with empty search structures.
    #[inline]
    pub fn new() -> Self {
        Self {
            stack: SearchStack::new(),
            trail: SearchTrail::new(),
            timelines: Vec::new(),
        }
    }

    /// Creates a solver with structures pre-sized for the given problem
    /// shape. `solve` grows them on demand either way; preallocating merely
    /// moves the cost to construction time.
    #[inline]
    pub fn preallocated(num_berths: usize, num_vessels: usize) -> Self {
        let mut timelines = Vec::with_capacity(num_berths);
        timelines.resize_with(num_berths, BerthTimeline::new);

        Self {
            stack: SearchStack::preallocated(num_berths, num_vessels),
            trail: SearchTrail::preallocated(num_vessels),
            timelines,
        }
    }
}

impl<T, I, C> BnbSolver<T, I, C>
where
    T: PrimInt + Signed + MinusOne + std::fmt::Debug,
    I: PrimInt + Signed + MinusOne + AsPrimitive<usize> + std::fmt::Debug,
    usize: AsPrimitive<I>,
    C: Copy
        + PartialOrd
        + Zero
        + NumCast
        + std::ops::Add<Output = C>
        + std::ops::AddAssign
        + std::ops::Mul<Output = C>
        + std::fmt::Debug,
{
    /// Runs the search to completion (or until a budget runs out) and
    /// returns the outcome.
    ///
    /// `fixed` pins vessels to berths before the search: their occupied
    /// intervals are carved out of the berth timelines and their
    /// assignments become part of the root state. The remaining vessels are
    /// branched in index order.
    pub fn solve(
        &mut self,
        instance: &ProblemInstance<T, C>,
        fixed: &[FixedAssignment<T>],
        limits: SolveLimits,
    ) -> Result<SolveOutcome<T, C>, SolveError> {
        let root_state = self.prepare(instance, fixed)?;
        let session = SearchSession::new(self, instance, root_state, fixed.len(), limits);
        let outcome = session.run();
        self.reset();
        Ok(outcome)
    }

    /// Rebuilds the per-berth timelines (opening hours minus fixed
    /// assignments) and the root state (fixed assignments applied).
    fn prepare(
        &mut self,
        instance: &ProblemInstance<T, C>,
        fixed: &[FixedAssignment<T>],
    ) -> Result<SearchState<T, I, C>, SolveError> {
        let num_berths = instance.num_berths();
        let num_vessels = instance.num_vessels();

        self.stack.ensure_capacity(num_berths, num_vessels);
        self.trail.ensure_capacity(num_vessels);
        self.timelines.resize_with(num_berths, BerthTimeline::new);

        let mut blocked: Vec<Vec<HalfOpenInterval<T>>> = vec![Vec::new(); num_berths];
        let mut vessel_assignments = vec![SearchState::<T, I, C>::UNASSIGNED; num_vessels];
        let mut vessel_start_times = vec![T::zero(); num_vessels];
        let mut root_objective = C::ZERO;

        for assignment in fixed {
            let vessel_index = assignment.vessel_index;
            let berth_index = assignment.berth_index;

            if vessel_index >= num_vessels {
                return Err(SolveError::FixedVesselOutOfRange { vessel_index });
            }
            if berth_index >= num_berths {
                return Err(SolveError::FixedBerthOutOfRange { berth_index });
            }
            if vessel_assignments[vessel_index] != SearchState::<T, I, C>::UNASSIGNED {
                return Err(SolveError::FixedVesselDuplicated { vessel_index });
            }
            let duration = match instance.service_time(vessel_index, berth_index).get() {
                Some(duration) => duration,
                None => {
                    return Err(SolveError::FixedVesselNotServiceable {
                        vessel_index,
                        berth_index,
                    });
                }
            };

            let start = assignment.start_time;
            blocked[berth_index].push(HalfOpenInterval::new_unchecked(start, start + duration));
            vessel_assignments[vessel_index] = berth_index.as_();
            vessel_start_times[vessel_index] = start;
            if let Some(cost) = instance.assignment_cost(vessel_index, berth_index, start) {
                root_objective += cost;
            }
        }

        for (berth_index, intervals) in blocked.iter_mut().enumerate() {
            intervals.sort_unstable_by_key(|interval| interval.start());
            if intervals
                .windows(2)
                .any(|pair| pair[1].start() < pair[0].end())
            {
                return Err(SolveError::FixedAssignmentsOverlap { berth_index });
            }

            self.timelines[berth_index]
                .assign_carved(instance.berth_opening_hours(berth_index), intervals);
        }

        Ok(SearchState::from_parts(
            vec![T::zero(); num_berths],
            vessel_assignments,
            vessel_start_times,
            SearchState::<T, I, C>::UNASSIGNED,
            root_objective,
        ))
    }

    /// Clears the logical state of stack and trail, retaining capacity.
    #[inline]
    fn reset(&mut self) {
        self.stack.clear();
        self.trail.clear();
    }
}

/// One search run over a prepared solver.
struct SearchSession<'a, T, I, C>
where
    T: PrimInt + Signed + MinusOne,
    C: Copy,
{
    solver: &'a mut BnbSolver<T, I, C>,
    instance: &'a ProblemInstance<T, C>,
    limits: SolveLimits,
    state: SearchState<T, I, C>,
    num_assigned: usize,
    best_solution: Option<Solution<T, C>>,
    stats: SolverStatistics,
    steps: u64,
    started_at: Instant,
}

impl<'a, T, I, C> SearchSession<'a, T, I, C>
where
    T: PrimInt + Signed + MinusOne + std::fmt::Debug,
    I: PrimInt + Signed + MinusOne + AsPrimitive<usize> + std::fmt::Debug,
    usize: AsPrimitive<I>,
    C: Copy
        + PartialOrd
        + Zero
        + NumCast
        + std::ops::Add<Output = C>
        + std::ops::AddAssign
        + std::ops::Mul<Output = C>
        + std::fmt::Debug,
{
    fn new(
        solver: &'a mut BnbSolver<T, I, C>,
        instance: &'a ProblemInstance<T, C>,
        state: SearchState<T, I, C>,
        num_fixed: usize,
        limits: SolveLimits,
    ) -> Self {
        Self {
            solver,
            instance,
            limits,
            state,
            num_assigned: num_fixed,
            best_solution: None,
            stats: SolverStatistics::default(),
            steps: 0,
            started_at: Instant::now(),
        }
    }

    fn run(mut self) -> SolveOutcome<T, C> {
        tracing::debug!(
            vessels = self.instance.num_vessels(),
            berths = self.instance.num_berths(),
            pre_assigned = self.num_assigned,
            "starting depth-first branch and bound"
        );

        self.initialize();

        let mut exhausted = true;
        loop {
            if self.budget_exhausted() {
                exhausted = false;
                break;
            }
            match self.step() {
                SearchStep::Continue => {}
                SearchStep::Finished => break,
            }
        }

        self.stats.set_total_time(self.started_at.elapsed());
        tracing::debug!(
            exhausted,
            stats = %self.stats,
            "search ended"
        );
        self.finalize(exhausted)
    }

    /// Opens the root scopes and fills the root frame with the first
    /// vessel's candidates. A fully pre-assigned instance is already
    /// complete at the root.
    fn initialize(&mut self) {
        self.solver.trail.push_frame();
        self.stats.on_node_explored();

        if self.num_assigned == self.instance.num_vessels() {
            self.handle_complete_solution();
            self.solver.stack.push_frame();
            return;
        }

        self.expand_next_vessel();
    }

    /// Consumes the budget counters and reports whether a budget ran out.
    fn budget_exhausted(&mut self) -> bool {
        if let Some(max_nodes) = self.limits.max_nodes {
            if self.stats.nodes_explored >= max_nodes {
                return true;
            }
        }
        if let Some(time_budget) = self.limits.time_budget {
            self.steps += 1;
            if self.steps & CLOCK_CHECK_MASK == 0 && self.started_at.elapsed() >= time_budget {
                return true;
            }
        }
        false
    }

    /// One step: process the next candidate of the current frame, or unwind
    /// one level when the frame is exhausted.
    fn step(&mut self) -> SearchStep {
        match self.solver.stack.pop_entry() {
            Some(candidate) => {
                self.process_candidate(candidate);
                SearchStep::Continue
            }
            None => {
                if self.solver.stack.depth() <= 1 {
                    return SearchStep::Finished;
                }
                self.backtrack_step();
                SearchStep::Continue
            }
        }
    }

    /// Applies a candidate unless the incumbent bound dominates it.
    ///
    /// The candidate's precomputed times are valid because the state at
    /// frame level is exactly the state the frame was generated against:
    /// every descent since then has been undone by a matching backtrack.
    fn process_candidate(&mut self, candidate: Candidate<T, I, C>) {
        let projected = self.state.current_objective() + candidate.cost_delta;
        if let Some(best) = &self.best_solution {
            if projected >= best.objective_value() {
                self.stats.on_pruning_bound();
                return;
            }
        }
        self.descend(candidate);
    }

    /// Applies the move (trail first, then state), opens the child frame,
    /// and expands or records a complete solution.
    fn descend(&mut self, candidate: Candidate<T, I, C>) {
        let undo = MoveUndo {
            old_berth_free_time: self.state.berth_free_time(candidate.berth_index),
            old_objective: self.state.current_objective(),
            old_last_assigned: self.state.last_assigned_vessel(),
            vessel_index: candidate.vessel_index,
            berth_index: candidate.berth_index,
        };

        self.solver.trail.push_frame();
        self.solver.trail.push(undo);
        self.state.apply_move(
            candidate.vessel_index,
            candidate.berth_index,
            candidate.start_time,
            candidate.finish_time,
            candidate.cost_delta,
        );
        self.num_assigned += 1;

        self.stats.on_node_explored();
        self.stats
            .on_depth_update(self.solver.stack.depth() as u64);

        if self.num_assigned == self.instance.num_vessels() {
            self.handle_complete_solution();
            self.solver.stack.push_frame();
            return;
        }

        self.expand_next_vessel();
    }

    /// Unwinds one frame pair, restoring the state exactly.
    fn backtrack_step(&mut self) {
        self.stats.on_backtrack();

        let state = &mut self.state;
        self.solver.trail.backtrack(|undo| {
            state.backtrack_move(
                undo.vessel_index,
                undo.berth_index,
                undo.old_berth_free_time,
                undo.old_objective,
                undo.old_last_assigned,
            );
        });
        self.solver.stack.pop_frame();
        self.num_assigned -= 1;
    }

    /// Opens a new frame holding one candidate per berth that can serve the
    /// next unassigned vessel. Candidates are written straight onto the
    /// stack tape.
    fn expand_next_vessel(&mut self) {
        let num_vessels = self.instance.num_vessels();
        let num_berths = self.instance.num_berths();
        let state = &self.state;
        let instance = self.instance;
        let timelines = &self.solver.timelines;

        let vessel = (0..num_vessels).find(|&v| !state.is_assigned(v.as_()));
        debug_assert!(
            vessel.is_some(),
            "called `SearchSession::expand_next_vessel` with all vessels assigned"
        );
        let vessel = match vessel {
            Some(vessel) => vessel,
            None => return,
        };

        let arrival = instance.arrival_time(vessel);
        let mut generated: u64 = 0;

        self.solver.stack.fill_frame_with_hint(num_berths, |frame| {
            for berth in 0..num_berths {
                let duration = match instance.service_time(vessel, berth).get() {
                    Some(duration) if duration > T::zero() => duration,
                    // A zero-length service cannot occupy a berth.
                    _ => continue,
                };

                let berth_free = state.berth_free_time(berth.as_());
                let ready = if berth_free > arrival { berth_free } else { arrival };

                let start = match timelines[berth].find_earliest_start(ready, duration) {
                    Some(start) => start,
                    None => continue,
                };
                let cost_delta = match instance.assignment_cost(vessel, berth, start) {
                    Some(cost) => cost,
                    None => continue,
                };

                frame.push(Candidate {
                    start_time: start,
                    finish_time: start + duration,
                    cost_delta,
                    vessel_index: vessel.as_(),
                    berth_index: berth.as_(),
                });
                generated += 1;
            }
        });

        self.stats.on_candidates_generated(generated);
    }

    /// Records the current complete assignment as the incumbent if it is
    /// strictly better than the previous one.
    fn handle_complete_solution(&mut self) {
        self.stats.on_solution_found();

        let improved = match &self.best_solution {
            Some(best) => self.state.current_objective() < best.objective_value(),
            None => true,
        };
        if !improved {
            return;
        }

        if let Ok(solution) = Solution::try_from(&self.state) {
            tracing::debug!(objective = ?solution.objective_value(), "new incumbent");
            self.best_solution = Some(solution);
        }
    }

    /// Turns the final session state into an outcome.
    fn finalize(self, exhausted: bool) -> SolveOutcome<T, C> {
        if !exhausted {
            return SolveOutcome::limit_reached(self.best_solution, self.stats);
        }
        match self.best_solution {
            Some(solution) => SolveOutcome::optimal(solution, self.stats),
            None => SolveOutcome::infeasible(self.stats),
        }
    }
}
