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

use crate::stats::SolverStatistics;
use fairlead_model::solution::Solution;

/// How a solver run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The tree was exhausted and the returned solution is optimal.
    Optimal,
    /// The tree was exhausted without finding any complete assignment.
    Infeasible,
    /// A node or time budget ran out before the tree was exhausted.
    LimitReached,
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::LimitReached => write!(f, "LimitReached"),
        }
    }
}

/// The result of one solver run: status, best solution (if any), and the
/// collected statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome<T, C> {
    status: SolveStatus,
    solution: Option<Solution<T, C>>,
    stats: SolverStatistics,
}

impl<T, C> SolveOutcome<T, C> {
    /// Creates an outcome for an exhausted tree with a proven optimum.
    #[inline]
    pub fn optimal(solution: Solution<T, C>, stats: SolverStatistics) -> Self {
        Self {
            status: SolveStatus::Optimal,
            solution: Some(solution),
            stats,
        }
    }

    /// Creates an outcome for an exhausted tree without any solution.
    #[inline]
    pub fn infeasible(stats: SolverStatistics) -> Self {
        Self {
            status: SolveStatus::Infeasible,
            solution: None,
            stats,
        }
    }

    /// Creates an outcome for a run that hit its budget, carrying the best
    /// incumbent found so far (if any).
    #[inline]
    pub fn limit_reached(solution: Option<Solution<T, C>>, stats: SolverStatistics) -> Self {
        Self {
            status: SolveStatus::LimitReached,
            solution,
            stats,
        }
    }

    /// Returns how the run ended.
    #[inline]
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Returns `true` if the returned solution is proven optimal.
    #[inline]
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Returns the best solution found, if any.
    #[inline]
    pub fn solution(&self) -> Option<&Solution<T, C>> {
        self.solution.as_ref()
    }

    /// Consumes the outcome and returns the best solution found, if any.
    #[inline]
    pub fn into_solution(self) -> Option<Solution<T, C>> {
        self.solution
    }

    /// Returns the statistics of the run.
    #[inline]
    pub fn stats(&self) -> &SolverStatistics {
        &self.stats
    }
}

impl<T, C> std::fmt::Display for SolveOutcome<T, C>
where
    T: Copy,
    C: Copy + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.solution {
            Some(solution) => write!(
                f,
                "SolveOutcome(status: {}, objective: {})",
                self.status,
                solution.objective_value()
            ),
            None => write!(f, "SolveOutcome(status: {}, no solution)", self.status),
        }
    }
}
