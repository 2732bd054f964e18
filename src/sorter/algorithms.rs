// Instrumented sorting algorithms
// Six classic comparison sorts that record a step after every comparison or
// write, producing a trace that replays the algorithm's behavior

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::trace::{StepRecorder, Trace};

/// Errors for trace generation preconditions
#[derive(Debug, Error)]
pub enum SortError {
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("input contains a non-finite value at index {0}")]
    NonFiniteValue(usize),
}

/// The fixed set of supported algorithms
/// Declaration order doubles as the race lane order and rank tie-break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
    Heap,
}

impl Algorithm {
    /// All algorithms in race order
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Merge,
        Algorithm::Quick,
        Algorithm::Heap,
    ];

    /// Parse a wire identifier; unknown identifiers are rejected rather than
    /// silently mapped to a default
    pub fn parse(s: &str) -> Result<Self, SortError> {
        match s {
            "bubble" => Ok(Algorithm::Bubble),
            "selection" => Ok(Algorithm::Selection),
            "insertion" => Ok(Algorithm::Insertion),
            "merge" => Ok(Algorithm::Merge),
            "quick" => Ok(Algorithm::Quick),
            "heap" => Ok(Algorithm::Heap),
            other => Err(SortError::UnknownAlgorithm(other.to_string())),
        }
    }

    /// Wire identifier used by the frontend
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Selection => "selection",
            Algorithm::Insertion => "insertion",
            Algorithm::Merge => "merge",
            Algorithm::Quick => "quick",
            Algorithm::Heap => "heap",
        }
    }

    /// Human-readable name for UI display
    pub fn display_name(&self) -> &'static str {
        match self {
            Algorithm::Bubble => "Bubble Sort",
            Algorithm::Selection => "Selection Sort",
            Algorithm::Insertion => "Insertion Sort",
            Algorithm::Merge => "Merge Sort",
            Algorithm::Quick => "Quick Sort",
            Algorithm::Heap => "Heap Sort",
        }
    }

    /// Asymptotic complexity label for UI display
    pub fn complexity(&self) -> &'static str {
        match self {
            Algorithm::Bubble | Algorithm::Selection | Algorithm::Insertion => "O(n²)",
            Algorithm::Merge | Algorithm::Quick | Algorithm::Heap => "O(n log n)",
        }
    }
}

/// Execute one algorithm over a private copy of the input and return the
/// recorded trace. The caller's slice is never mutated.
///
/// Empty input yields an empty trace. Non-finite values are rejected up
/// front so no partial trace is ever produced.
pub fn run(algorithm: Algorithm, input: &[f64]) -> Result<Trace, SortError> {
    for (idx, value) in input.iter().enumerate() {
        if !value.is_finite() {
            return Err(SortError::NonFiniteValue(idx));
        }
    }
    Ok(execute(algorithm, input.to_vec()))
}

/// Generic body shared by the public entry point and the tests, which drive
/// it with index-tagged keys to observe stability
fn execute<T: Clone + PartialOrd>(algorithm: Algorithm, mut values: Vec<T>) -> Trace<T> {
    let mut rec = StepRecorder::new();
    match algorithm {
        Algorithm::Bubble => bubble_sort(&mut values, &mut rec),
        Algorithm::Selection => selection_sort(&mut values, &mut rec),
        Algorithm::Insertion => insertion_sort(&mut values, &mut rec),
        Algorithm::Merge => merge_sort(&mut values, &mut rec),
        Algorithm::Quick => quick_sort(&mut values, &mut rec),
        Algorithm::Heap => heap_sort(&mut values, &mut rec),
    }
    rec.seal(&values)
}

/// Nested pass over the unsorted suffix, bubbling larger values rightward
/// Records a step at (j, j+1) before each conditional swap
fn bubble_sort<T: Clone + PartialOrd>(a: &mut [T], rec: &mut StepRecorder<T>) {
    let n = a.len();
    if n < 2 {
        return;
    }
    for i in 0..n - 1 {
        for j in 0..n - i - 1 {
            rec.count_comparison();
            rec.add_step(a, &[j, j + 1]);
            if a[j] > a[j + 1] {
                a.swap(j, j + 1);
                rec.count_swap();
            }
        }
    }
}

/// Scan the remainder for the minimum, then swap it into position i
/// The placement swap is counted and recorded even when min_idx == i
fn selection_sort<T: Clone + PartialOrd>(a: &mut [T], rec: &mut StepRecorder<T>) {
    let n = a.len();
    if n < 2 {
        return;
    }
    for i in 0..n - 1 {
        let mut min_idx = i;
        for j in i + 1..n {
            rec.count_comparison();
            rec.add_step(a, &[i, j]);
            if a[j] < a[min_idx] {
                min_idx = j;
            }
        }
        a.swap(i, min_idx);
        rec.count_swap();
        rec.add_step(a, &[i, min_idx]);
    }
}

/// Shift elements greater than the key rightward one slot at a time
/// Only shifts actually taken count a comparison; the terminating probe
/// does not
fn insertion_sort<T: Clone + PartialOrd>(a: &mut [T], rec: &mut StepRecorder<T>) {
    for i in 1..a.len() {
        let key = a[i].clone();
        let mut j = i;
        while j > 0 && a[j - 1] > key {
            rec.count_comparison();
            rec.add_step(a, &[j - 1, i]);
            a[j] = a[j - 1].clone();
            j -= 1;
        }
        a[j] = key;
        rec.count_swap();
        rec.add_step(a, &[j]);
    }
}

fn merge_sort<T: Clone + PartialOrd>(a: &mut [T], rec: &mut StepRecorder<T>) {
    if a.len() < 2 {
        return;
    }
    let right = a.len() - 1;
    merge_sort_range(a, 0, right, rec);
}

fn merge_sort_range<T: Clone + PartialOrd>(
    a: &mut [T],
    left: usize,
    right: usize,
    rec: &mut StepRecorder<T>,
) {
    if left < right {
        let mid = (left + right) / 2;
        merge_sort_range(a, left, mid, rec);
        merge_sort_range(a, mid + 1, right, rec);
        merge(a, left, mid, right, rec);
    }
}

/// Merge two sorted halves through temporary copies
/// The <= tie-break favors the left half, which keeps equal elements in
/// their original relative order
fn merge<T: Clone + PartialOrd>(
    a: &mut [T],
    left: usize,
    mid: usize,
    right: usize,
    rec: &mut StepRecorder<T>,
) {
    let left_half: Vec<T> = a[left..=mid].to_vec();
    let right_half: Vec<T> = a[mid + 1..=right].to_vec();

    let mut i = 0;
    let mut j = 0;
    let mut k = left;

    while i < left_half.len() && j < right_half.len() {
        rec.count_comparison();
        if left_half[i] <= right_half[j] {
            a[k] = left_half[i].clone();
            i += 1;
        } else {
            a[k] = right_half[j].clone();
            j += 1;
        }
        rec.count_swap();
        rec.add_step(a, &[k]);
        k += 1;
    }

    // Drain whichever side did not exhaust; writes only, no comparisons
    while i < left_half.len() {
        a[k] = left_half[i].clone();
        i += 1;
        rec.count_swap();
        rec.add_step(a, &[k]);
        k += 1;
    }
    while j < right_half.len() {
        a[k] = right_half[j].clone();
        j += 1;
        rec.count_swap();
        rec.add_step(a, &[k]);
        k += 1;
    }
}

fn quick_sort<T: Clone + PartialOrd>(a: &mut [T], rec: &mut StepRecorder<T>) {
    if a.len() < 2 {
        return;
    }
    let high = a.len() - 1;
    quick_sort_range(a, 0, high, rec);
}

fn quick_sort_range<T: Clone + PartialOrd>(
    a: &mut [T],
    low: usize,
    high: usize,
    rec: &mut StepRecorder<T>,
) {
    if low >= high {
        return;
    }
    let pi = partition(a, low, high, rec);
    if pi > low {
        quick_sort_range(a, low, pi - 1, rec);
    }
    if pi < high {
        quick_sort_range(a, pi + 1, high, rec);
    }
}

/// Lomuto partition with the last element as pivot
/// The pivot stays at a[high] until the post-loop swap, so it can be
/// compared in place
fn partition<T: Clone + PartialOrd>(
    a: &mut [T],
    low: usize,
    high: usize,
    rec: &mut StepRecorder<T>,
) -> usize {
    let mut i = low;
    for j in low..high {
        rec.count_comparison();
        rec.add_step(a, &[j, high]);
        if a[j] < a[high] {
            a.swap(i, j);
            rec.count_swap();
            i += 1;
        }
    }
    a.swap(i, high);
    rec.count_swap();
    rec.add_step(a, &[i, high]);
    i
}

fn heap_sort<T: Clone + PartialOrd>(a: &mut [T], rec: &mut StepRecorder<T>) {
    let n = a.len();
    if n < 2 {
        return;
    }
    // Bottom-up max-heap construction
    for i in (0..n / 2).rev() {
        heapify(a, n, i, rec);
    }
    // Repeatedly move the root to the end of the shrinking heap
    for i in (1..n).rev() {
        a.swap(0, i);
        rec.count_swap();
        rec.add_step(a, &[0, i]);
        heapify(a, i, 0, rec);
    }
}

/// Sift-down over the heap prefix of length n
/// A comparison is counted only for a child that becomes the new largest,
/// and a step is recorded only when a swap actually occurs
fn heapify<T: Clone + PartialOrd>(a: &mut [T], n: usize, i: usize, rec: &mut StepRecorder<T>) {
    let mut largest = i;
    let left = 2 * i + 1;
    let right = 2 * i + 2;

    if left < n && a[left] > a[largest] {
        rec.count_comparison();
        largest = left;
    }
    if right < n && a[right] > a[largest] {
        rec.count_comparison();
        largest = right;
    }
    if largest != i {
        rec.add_step(a, &[i, largest]);
        a.swap(i, largest);
        rec.count_swap();
        heapify(a, n, largest, rec);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    fn assert_sorted_permutation(algorithm: Algorithm, input: &[f64]) {
        let trace = run(algorithm, input).unwrap();
        let final_values = trace.final_values().unwrap().to_vec();

        // Non-decreasing
        assert!(
            final_values.windows(2).all(|w| w[0] <= w[1]),
            "{:?} left the array unsorted: {:?}",
            algorithm,
            final_values
        );

        // Same multiset as the input
        let mut expected = input.to_vec();
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(final_values, expected);

        // Settled snapshot carries no highlight
        assert!(trace.steps.last().unwrap().comparing.is_empty());
    }

    #[test]
    fn test_all_algorithms_sort_and_permute() {
        let inputs: [&[f64]; 5] = [
            &[5.0, 3.0, 8.0, 1.0],
            &[9.0, 7.0, 5.0, 3.0, 1.0],
            &[1.0, 2.0, 3.0, 4.0],
            &[2.0, 2.0, 1.0, 3.0, 2.0],
            &[42.0],
        ];
        for algorithm in Algorithm::ALL {
            for input in inputs {
                assert_sorted_permutation(algorithm, input);
            }
        }
    }

    #[test]
    fn test_empty_input_yields_empty_trace() {
        for algorithm in Algorithm::ALL {
            let trace = run(algorithm, &[]).unwrap();
            assert_eq!(trace.len(), 0);
            assert_eq!(trace.comparisons, 0);
            assert_eq!(trace.swaps, 0);
        }
    }

    #[test]
    fn test_single_element_is_untouched() {
        for algorithm in Algorithm::ALL {
            let trace = run(algorithm, &[7.0]).unwrap();
            // Just the settled snapshot
            assert_eq!(trace.len(), 1);
            assert_eq!(trace.final_values(), Some(&[7.0][..]));
            assert_eq!(trace.comparisons, 0);
            assert_eq!(trace.swaps, 0);
        }
    }

    #[test]
    fn test_runs_are_deterministic() {
        let input = [6.0, 2.0, 9.0, 2.0, 5.0, 1.0];
        for algorithm in Algorithm::ALL {
            let first = run(algorithm, &input).unwrap();
            let second = run(algorithm, &input).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_caller_array_is_never_mutated() {
        let input = vec![4.0, 1.0, 3.0];
        let _ = run(Algorithm::Quick, &input).unwrap();
        assert_eq!(input, vec![4.0, 1.0, 3.0]);
    }

    // Regression fixture from the bubble pass structure for n=4
    #[test]
    fn test_bubble_fixture_counts() {
        let trace = run(Algorithm::Bubble, &[5.0, 3.0, 8.0, 1.0]).unwrap();
        assert_eq!(trace.comparisons, 6);
        assert_eq!(trace.swaps, 4);
        // Six comparison steps plus the settled snapshot
        assert_eq!(trace.len(), 7);
        assert_eq!(trace.final_values(), Some(&[1.0, 3.0, 5.0, 8.0][..]));
    }

    #[test]
    fn test_selection_fixture_counts() {
        let trace = run(Algorithm::Selection, &[5.0, 3.0, 8.0, 1.0]).unwrap();
        assert_eq!(trace.comparisons, 6);
        // One placement swap per outer pass, no-ops included
        assert_eq!(trace.swaps, 3);
        assert_eq!(trace.len(), 10);
    }

    #[test]
    fn test_selection_records_noop_swap_step() {
        // Already sorted: every placement is a self-swap yet still recorded
        let trace = run(Algorithm::Selection, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(trace.swaps, 2);
        assert!(trace
            .steps
            .iter()
            .any(|s| s.comparing == vec![0, 0]));
        assert!(trace
            .steps
            .iter()
            .any(|s| s.comparing == vec![1, 1]));
    }

    #[test]
    fn test_insertion_fixture_counts() {
        let trace = run(Algorithm::Insertion, &[5.0, 3.0, 8.0, 1.0]).unwrap();
        // Only shifts taken are counted; the terminating probe is not
        assert_eq!(trace.comparisons, 4);
        // One placement write per key
        assert_eq!(trace.swaps, 3);
        assert_eq!(trace.len(), 8);
        assert_eq!(trace.final_values(), Some(&[1.0, 3.0, 5.0, 8.0][..]));
    }

    #[test]
    fn test_insertion_placement_step_is_single_index() {
        let trace = run(Algorithm::Insertion, &[2.0, 1.0]).unwrap();
        let placement = &trace.steps[1];
        assert_eq!(placement.comparing, vec![0]);
    }

    #[test]
    fn test_quick_all_equal_terminates() {
        let trace = run(Algorithm::Quick, &[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(trace.final_values(), Some(&[4.0, 4.0, 4.0][..]));
        // Both partitions run to completion without looping
        assert_eq!(trace.comparisons, 3);
        assert_eq!(trace.swaps, 2);
    }

    #[test]
    fn test_quick_pivot_step_recorded_at_resting_position() {
        let trace = run(Algorithm::Quick, &[3.0, 1.0, 2.0]).unwrap();
        // First partition: pivot 2.0 comes to rest at index 1
        let pivot_step = &trace.steps[2];
        assert_eq!(pivot_step.comparing, vec![1, 2]);
        assert_eq!(pivot_step.values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_heap_step_only_on_actual_sift_swap() {
        // Two elements already in heap order: build phase records nothing
        let trace = run(Algorithm::Heap, &[2.0, 1.0]).unwrap();
        assert_eq!(trace.comparisons, 0);
        // The single root/last swap plus the settled snapshot
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.steps[0].comparing, vec![0, 1]);
    }

    #[test]
    fn test_merge_drain_writes_count_no_comparisons() {
        // [2,1]: one comparison, then the left side drains
        let trace = run(Algorithm::Merge, &[2.0, 1.0]).unwrap();
        assert_eq!(trace.comparisons, 1);
        assert_eq!(trace.swaps, 2);
        assert_eq!(trace.len(), 3);
    }

    #[test]
    fn test_run_rejects_non_finite_values() {
        let err = run(Algorithm::Bubble, &[1.0, f64::NAN, 3.0]).unwrap_err();
        assert!(matches!(err, SortError::NonFiniteValue(1)));

        let err = run(Algorithm::Merge, &[f64::INFINITY]).unwrap_err();
        assert!(matches!(err, SortError::NonFiniteValue(0)));
    }

    #[test]
    fn test_algorithm_parse_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(Algorithm::parse(algorithm.as_str()).unwrap(), algorithm);
        }
    }

    #[test]
    fn test_algorithm_parse_rejects_unknown() {
        let err = Algorithm::parse("bogo").unwrap_err();
        assert!(matches!(err, SortError::UnknownAlgorithm(_)));
    }

    #[test]
    fn test_race_order_is_fixed() {
        let keys: Vec<&str> = Algorithm::ALL.iter().map(|a| a.as_str()).collect();
        assert_eq!(
            keys,
            vec!["bubble", "selection", "insertion", "merge", "quick", "heap"]
        );
    }

    /// Key that orders by value only, carrying its original index so
    /// stability is observable for ties
    #[derive(Debug, Clone)]
    struct Tagged {
        value: i32,
        tag: usize,
    }

    impl PartialEq for Tagged {
        fn eq(&self, other: &Self) -> bool {
            self.value == other.value
        }
    }

    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            self.value.partial_cmp(&other.value)
        }
    }

    #[test]
    fn test_merge_is_stable_for_equal_values() {
        let input: Vec<Tagged> = [5, 1, 5, 3, 5, 1]
            .iter()
            .enumerate()
            .map(|(tag, &value)| Tagged { value, tag })
            .collect();

        let trace = execute(Algorithm::Merge, input);
        let sorted = &trace.steps.last().unwrap().values;

        let ones: Vec<usize> = sorted.iter().filter(|t| t.value == 1).map(|t| t.tag).collect();
        let fives: Vec<usize> = sorted.iter().filter(|t| t.value == 5).map(|t| t.tag).collect();

        // Equal values keep their original relative order
        assert_eq!(ones, vec![1, 5]);
        assert_eq!(fives, vec![0, 2, 4]);
    }
}
