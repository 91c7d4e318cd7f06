//! The three interchangeable intersection algorithms.
//!
//! Every variant takes the same input, a reference sequence (ids plus
//! offsets) and a probe id array, and produces the same output: for each
//! id present in both, one entry with the offsets of its first occurrence
//! in the reference, in reference order. The variants differ only in how
//! membership in the probe is decided:
//!
//! 1. [`Algorithm::NestedLoops`]: linear probe scan per reference entry.
//! 2. [`Algorithm::QuicksortBinarySearch`]: sort a copy of the probe with
//!    the standard unstable (pattern-defeating quicksort) sort, then
//!    binary-search each reference id.
//! 3. [`Algorithm::HeapsortBinarySearch`]: same search over a copy sorted
//!    with a hand-rolled heapsort, trading average speed for a strict
//!    O(n log n) worst case.
//!
//! The equality of all three outputs is covered by property tests.

use dws_mapping::TokenId;

use crate::word_list::{DocumentWordList, MappedSequence};

/// Selector for the intersection algorithm.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    #[default]
    NestedLoops,
    QuicksortBinarySearch,
    HeapsortBinarySearch,
}

impl Algorithm {
    /// All variants, for equivalence tests and usage output.
    pub const ALL: [Algorithm; 3] = [
        Algorithm::NestedLoops,
        Algorithm::QuicksortBinarySearch,
        Algorithm::HeapsortBinarySearch,
    ];

    /// Parse a CLI name. Returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Algorithm> {
        match name {
            "nested-loops" => Some(Algorithm::NestedLoops),
            "quicksort" => Some(Algorithm::QuicksortBinarySearch),
            "heapsort" => Some(Algorithm::HeapsortBinarySearch),
            _ => None,
        }
    }

    /// The CLI name of this variant.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::NestedLoops => "nested-loops",
            Algorithm::QuicksortBinarySearch => "quicksort",
            Algorithm::HeapsortBinarySearch => "heapsort",
        }
    }
}

/// Compute the intersection of `reference` and `probe`.
///
/// The result is a [`DocumentWordList`] with a single open slot labeled
/// with the reference's dataset id. Entries appear in reference order,
/// each unique id at most once, with the offsets of its first reference
/// occurrence. The sentinel id never matches anything. Empty inputs yield
/// an empty (and [`DocumentWordList::is_nonempty`] == false) result.
pub fn intersect(
    algorithm: Algorithm,
    reference: &MappedSequence,
    probe: &[TokenId],
) -> DocumentWordList {
    match algorithm {
        Algorithm::NestedLoops => nested_loops(reference, probe),
        Algorithm::QuicksortBinarySearch => sort_and_search(reference, probe, |ids| {
            ids.sort_unstable();
        }),
        Algorithm::HeapsortBinarySearch => sort_and_search(reference, probe, heapsort),
    }
}

fn nested_loops(reference: &MappedSequence, probe: &[TokenId]) -> DocumentWordList {
    let mut result = DocumentWordList::new_intersection_result(&reference.dataset_id);
    let mut guard = MultipleGuard::new(probe.len());

    for entry in &reference.entries {
        if entry.id.is_sentinel() {
            continue;
        }
        if probe.iter().any(|&p| p == entry.id) && !guard.test_and_set(entry.id) {
            result.put_one_value_with_offsets(
                entry.id,
                entry.char_offset,
                entry.sentence_offset,
                entry.word_offset,
            );
        }
    }

    result
}

fn sort_and_search(
    reference: &MappedSequence,
    probe: &[TokenId],
    sort: fn(&mut [TokenId]),
) -> DocumentWordList {
    let mut result = DocumentWordList::new_intersection_result(&reference.dataset_id);

    let mut sorted = probe.to_vec();
    sort(&mut sorted);

    let mut guard = MultipleGuard::new(probe.len());
    for entry in &reference.entries {
        if entry.id.is_sentinel() {
            continue;
        }
        if sorted.binary_search(&entry.id).is_ok() && !guard.test_and_set(entry.id) {
            result.put_one_value_with_offsets(
                entry.id,
                entry.char_offset,
                entry.sentence_offset,
                entry.word_offset,
            );
        }
    }

    result
}

/// Grow-on-demand bit table over raw id values, marking ids already
/// emitted into the current result.
struct MultipleGuard {
    bits: Vec<bool>,
}

impl MultipleGuard {
    /// Growth step, also the minimum initial size.
    const ALLOC_STEP: usize = 100;

    fn new(initial: usize) -> Self {
        MultipleGuard {
            bits: vec![false; initial.max(Self::ALLOC_STEP)],
        }
    }

    /// Returns whether the id was already marked, marking it either way.
    fn test_and_set(&mut self, id: TokenId) -> bool {
        let index = id.raw() as usize;
        if index >= self.bits.len() {
            let new_len = (index + 1).next_multiple_of(Self::ALLOC_STEP);
            self.bits.resize(new_len, false);
        }
        std::mem::replace(&mut self.bits[index], true)
    }
}

/// In-place heapsort, ascending.
fn heapsort(data: &mut [TokenId]) {
    let len = data.len();
    if len < 2 {
        return;
    }
    for start in (0..len / 2).rev() {
        sift_down(data, start, len);
    }
    for end in (1..len).rev() {
        data.swap(0, end);
        sift_down(data, 0, end);
    }
}

fn sift_down(data: &mut [TokenId], mut root: usize, end: usize) {
    loop {
        let mut child = 2 * root + 1;
        if child >= end {
            break;
        }
        if child + 1 < end && data[child] < data[child + 1] {
            child += 1;
        }
        if data[root] >= data[child] {
            break;
        }
        data.swap(root, child);
        root = child;
    }
}
