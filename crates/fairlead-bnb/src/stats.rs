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

use fairlead_core::num::ops::saturating::SaturatingAddVal;
use std::time::Duration;

/// Counters collected during one solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverStatistics {
    /// Total nodes visited.
    pub nodes_explored: u64,
    /// Frames unwound after exhausting or pruning a subtree.
    pub backtracks: u64,
    /// Candidate moves generated across all frames.
    pub candidates_generated: u64,
    /// Candidates discarded because the bound dominated them.
    pub prunings_bound: u64,
    /// The deepest frame level reached.
    pub max_depth: u64,
    /// Complete solutions encountered.
    pub solutions_found: u64,
    /// Wall-clock time of the run.
    pub time_total: Duration,
}

impl SolverStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add_val(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add_val(1);
    }

    #[inline]
    pub fn on_candidates_generated(&mut self, count: u64) {
        self.candidates_generated = self.candidates_generated.saturating_add_val(count);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add_val(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add_val(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolverStatistics(nodes: {}, backtracks: {}, candidates: {}, pruned: {}, max_depth: {}, solutions: {}, time: {:.2?})",
            self.nodes_explored,
            self.backtracks,
            self.candidates_generated,
            self.prunings_bound,
            self.max_depth,
            self.solutions_found,
            self.time_total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let mut stats = SolverStatistics::default();

        stats.on_node_explored();
        stats.on_node_explored();
        stats.on_backtrack();
        stats.on_candidates_generated(5);
        stats.on_pruning_bound();
        stats.on_solution_found();
        stats.on_depth_update(3);
        stats.on_depth_update(2);

        assert_eq!(stats.nodes_explored, 2);
        assert_eq!(stats.backtracks, 1);
        assert_eq!(stats.candidates_generated, 5);
        assert_eq!(stats.prunings_bound, 1);
        assert_eq!(stats.solutions_found, 1);
        assert_eq!(stats.max_depth, 3);
    }

    #[test]
    fn test_counters_saturate() {
        let mut stats = SolverStatistics {
            nodes_explored: u64::MAX,
            ..Default::default()
        };
        stats.on_node_explored();
        assert_eq!(stats.nodes_explored, u64::MAX);
    }

    #[test]
    fn test_display_contains_counters() {
        let mut stats = SolverStatistics::default();
        stats.on_node_explored();
        let text = format!("{}", stats);
        assert!(text.contains("nodes: 1"));
        assert!(text.contains("backtracks: 0"));
    }
}
