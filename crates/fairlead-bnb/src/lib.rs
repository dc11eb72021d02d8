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

//! Depth-first branch-and-bound search core for berth allocation.
//!
//! The crate is built around four composable structures that make descent,
//! backtracking, and candidate enumeration allocation-free inside the hot
//! loop:
//!
//! - [`timeline::BerthTimeline`]: static per-berth availability with an
//!   earliest-feasible-start query.
//! - [`state::SearchState`]: the mutable assignment state.
//! - [`stack::SearchStack`]: a frame-structured tape of candidate moves.
//! - [`trail::SearchTrail`]: a frame-structured undo log for exact
//!   backtracking.
//!
//! [`solver::BnbSolver`] composes the four into a complete depth-first
//! search.

pub mod fixed;
pub mod result;
pub mod solver;
pub mod stack;
pub mod state;
pub mod stats;
pub mod timeline;
pub mod trail;
