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

/// A frame-structured undo log for exact backtracking.
///
/// The trail stores fixed-layout undo records linearly, with frame markers
/// delimiting the records that belong to one decision level. It knows
/// nothing about what the records mean: the caller captures old values into
/// a record before mutating, and supplies the function that restores state
/// from a record on `backtrack`. Keeping records as plain values (instead of
/// closures or tagged commands) keeps the log a dense typed array and lets
/// the undo function inline at the backtrack site.
///
/// Records are replayed in strict reverse insertion order. When two
/// mutations at successive depths touch the same location, the value
/// captured first is restored last, which reproduces the pre-mutation state
/// exactly.
///
/// The trail is move-only. Cloning in-flight history would create two
/// consumers trying to undo the same mutations.
#[derive(Debug)]
pub struct SearchTrail<E> {
    /// The linear log of undo records across all open frames.
    entries: Vec<E>,
    /// `frames[d]` is the index in `entries` at which depth `d` began.
    frames: Vec<usize>,
}

impl<E> Default for SearchTrail<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> SearchTrail<E> {
    /// Creates a new, empty `SearchTrail`.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a trail with pre-allocated capacities.
    ///
    /// `entry_capacity` is the total number of undo records expected on the
    /// deepest path; `frame_capacity` is the maximum search depth.
    #[inline]
    pub fn with_capacity(entry_capacity: usize, frame_capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(entry_capacity),
            frames: Vec::with_capacity(frame_capacity),
        }
    }

    /// Creates a trail pre-sized for a search over `num_vessels` vessels:
    /// one record per vessel on the deepest path, one frame per vessel plus
    /// the root.
    #[inline]
    pub fn preallocated(num_vessels: usize) -> Self {
        Self::with_capacity(num_vessels, num_vessels + 1)
    }

    /// Grows the capacities to the recommended size for the given problem
    /// if they are currently smaller.
    #[inline]
    pub fn ensure_capacity(&mut self, num_vessels: usize) {
        if self.entries.capacity() < num_vessels {
            self.entries.reserve(num_vessels - self.entries.capacity());
        }
        if self.frames.capacity() < num_vessels + 1 {
            self.frames
                .reserve((num_vessels + 1) - self.frames.capacity());
        }
    }

    /// Reserves capacity for entries and frames.
    #[inline]
    pub fn reserve(&mut self, entry_capacity: usize, frame_capacity: usize) {
        self.entries.reserve(entry_capacity);
        self.frames.reserve(frame_capacity);
    }

    /// Shrinks both backing vectors to fit their current lengths.
    ///
    /// Calling this inside a search defeats the preallocation; it exists for
    /// reclaiming memory after one.
    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.entries.shrink_to_fit();
        self.frames.shrink_to_fit();
    }

    /// Returns the number of undo records across all open frames.
    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the current depth (number of open frames).
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frame is open.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Opens a new undo scope.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Appends an undo record to the current frame.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if no frame is open.
    #[inline]
    pub fn push(&mut self, entry: E) {
        debug_assert!(
            !self.frames.is_empty(),
            "called `SearchTrail::push` with no open frame"
        );

        self.entries.push(entry);
    }

    /// Closes the current frame, invoking `undo_fn` on each of its records
    /// in reverse insertion order.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if no frame is open.
    #[inline]
    pub fn backtrack<F>(&mut self, mut undo_fn: F)
    where
        F: FnMut(&E),
    {
        debug_assert!(
            !self.frames.is_empty(),
            "called `SearchTrail::backtrack` with no open frame"
        );

        let start = match self.frames.pop() {
            Some(start) => start,
            None => return,
        };

        while self.entries.len() > start {
            // The loop condition guarantees the log is non-empty here.
            if let Some(entry) = self.entries.pop() {
                undo_fn(&entry);
            }
        }
    }

    /// Empties log and frames while retaining capacity. No undo functions
    /// run; the caller abandons the recorded history.
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }

    /// Returns the total allocated memory in bytes.
    #[inline]
    pub fn allocated_memory_bytes(&self) -> usize {
        let entries_size = self.entries.capacity() * std::mem::size_of::<E>();
        let frames_size = self.frames.capacity() * std::mem::size_of::<usize>();
        entries_size + frames_size
    }

    /// Returns the bytes currently occupied by live history.
    #[inline]
    pub fn used_memory_bytes(&self) -> usize {
        let entries_size = self.entries.len() * std::mem::size_of::<E>();
        let frames_size = self.frames.len() * std::mem::size_of::<usize>();
        entries_size + frames_size
    }
}

impl<E> std::fmt::Display for SearchTrail<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchTrail(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trail_is_empty() {
        let trail: SearchTrail<i64> = SearchTrail::new();
        assert_eq!(trail.depth(), 0);
        assert_eq!(trail.num_entries(), 0);
        assert!(trail.is_empty());
        assert_eq!(trail.used_memory_bytes(), 0);
    }

    #[test]
    fn test_backtrack_restores_single_value() {
        let mut values = vec![0i64; 4];
        let mut trail: SearchTrail<(usize, i64)> = SearchTrail::new();

        trail.push_frame();
        trail.push((2, values[2]));
        values[2] = 42;
        assert_eq!(values[2], 42);

        trail.backtrack(|&(slot, old)| values[slot] = old);

        assert_eq!(values, vec![0, 0, 0, 0]);
        assert!(trail.is_empty());
        assert_eq!(trail.num_entries(), 0);
    }

    #[test]
    fn test_backtrack_is_strict_lifo() {
        let mut order = Vec::new();
        let mut trail: SearchTrail<u32> = SearchTrail::new();

        trail.push_frame();
        for record in 0..5 {
            trail.push(record);
        }
        trail.backtrack(|&record| order.push(record));

        assert_eq!(order, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_overlapping_mutations_restore_earliest_value() {
        // Two frames mutate the same slot; after unwinding both, the slot
        // holds its original value again.
        let mut slot = 0i64;
        let mut trail: SearchTrail<i64> = SearchTrail::new();

        trail.push_frame();
        trail.push(slot);
        slot = 10;

        trail.push_frame();
        trail.push(slot);
        slot = 20;

        assert_eq!(trail.depth(), 2);

        trail.backtrack(|&old| slot = old);
        assert_eq!(slot, 10);
        assert_eq!(trail.depth(), 1);

        trail.backtrack(|&old| slot = old);
        assert_eq!(slot, 0);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_backtrack_only_unwinds_current_frame() {
        let mut values = vec![0i64; 8];
        let mut trail: SearchTrail<(usize, i64)> = SearchTrail::new();

        trail.push_frame();
        trail.push((0, values[0]));
        values[0] = 1;

        trail.push_frame();
        trail.push((1, values[1]));
        values[1] = 2;
        trail.push((2, values[2]));
        values[2] = 3;

        trail.backtrack(|&(slot, old)| values[slot] = old);

        // The outer frame's mutation survives.
        assert_eq!(values[0], 1);
        assert_eq!(values[1], 0);
        assert_eq!(values[2], 0);
        assert_eq!(trail.depth(), 1);
        assert_eq!(trail.num_entries(), 1);
    }

    #[test]
    fn test_backtrack_empty_frame_runs_no_undo() {
        let mut calls = 0usize;
        let mut trail: SearchTrail<i32> = SearchTrail::new();

        trail.push_frame();
        trail.backtrack(|_| calls += 1);

        assert_eq!(calls, 0);
        assert!(trail.is_empty());
    }

    #[test]
    fn test_terminal_state_after_full_unwind() {
        let mut trail: SearchTrail<i32> = SearchTrail::with_capacity(8, 4);

        for _ in 0..3 {
            trail.push_frame();
            trail.push(7);
        }
        let bytes = trail.allocated_memory_bytes();

        while !trail.is_empty() {
            trail.backtrack(|_| {});
        }

        assert_eq!(trail.depth(), 0);
        assert_eq!(trail.num_entries(), 0);
        assert_eq!(trail.used_memory_bytes(), 0);
        assert_eq!(trail.allocated_memory_bytes(), bytes);
    }

    #[test]
    fn test_capacity_stability_after_warmup() {
        let mut trail: SearchTrail<u64> = SearchTrail::preallocated(64);
        let bytes_before = trail.allocated_memory_bytes();

        for _ in 0..2 {
            for _ in 0..64 {
                trail.push_frame();
                trail.push(1);
            }
            while !trail.is_empty() {
                trail.backtrack(|_| {});
            }
            assert_eq!(trail.allocated_memory_bytes(), bytes_before);
        }
    }

    #[test]
    fn test_ensure_capacity_is_monotone() {
        let mut trail: SearchTrail<u64> = SearchTrail::preallocated(4);
        let entry_capacity = trail.entries.capacity();
        let frame_capacity = trail.frames.capacity();

        trail.ensure_capacity(2);
        assert_eq!(trail.entries.capacity(), entry_capacity);
        assert_eq!(trail.frames.capacity(), frame_capacity);

        trail.ensure_capacity(32);
        assert!(trail.entries.capacity() >= 32);
        assert!(trail.frames.capacity() >= 33);
    }

    #[test]
    fn test_clear_abandons_history_and_retains_capacity() {
        let mut trail: SearchTrail<i32> = SearchTrail::with_capacity(8, 2);
        trail.push_frame();
        trail.push(1);
        trail.push(2);

        let bytes = trail.allocated_memory_bytes();
        trail.clear();

        assert!(trail.is_empty());
        assert_eq!(trail.num_entries(), 0);
        assert_eq!(trail.allocated_memory_bytes(), bytes);
    }

    #[test]
    fn test_struct_records() {
        #[derive(Clone, Copy, PartialEq, Debug)]
        struct Domain {
            min: i32,
            max: i32,
        }

        let mut domain = Domain { min: 0, max: 10 };
        let mut trail: SearchTrail<Domain> = SearchTrail::new();

        trail.push_frame();
        trail.push(domain);
        domain = Domain { min: 5, max: 10 };

        trail.backtrack(|&old| domain = old);
        assert_eq!(domain, Domain { min: 0, max: 10 });
    }

    #[test]
    fn test_display_includes_counts() {
        let mut trail: SearchTrail<i32> = SearchTrail::new();
        trail.push_frame();
        trail.push(1);

        assert_eq!(format!("{}", trail), "SearchTrail(entries: 1, frames: 1)");
    }

    #[test]
    #[should_panic(expected = "no open frame")]
    #[cfg(debug_assertions)]
    fn test_push_without_frame_panics_in_debug() {
        let mut trail: SearchTrail<i32> = SearchTrail::new();
        trail.push(1);
    }
}
