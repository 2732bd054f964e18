// Step trace types
// Array snapshots, run counters, and the per-run recorder behind every sort

use serde::{Deserialize, Serialize};

/// One visualizable instant of a sort run
/// A full snapshot of the working array plus the indices under comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step<T = f64> {
    /// Copy of the working array at this instant
    pub values: Vec<T>,

    /// Indices being compared or written (0, 1, or 2 entries)
    pub comparing: Vec<usize>,
}

impl Step<f64> {
    /// Mean of the snapshot values, used for tone pitch mapping
    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Largest snapshot value, used to normalize tone pitch
    pub fn max_value(&self) -> f64 {
        self.values.iter().cloned().fold(f64::MIN, f64::max)
    }
}

/// Complete replayable record of one sort execution
/// Append-only while the run is in flight, frozen once returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace<T = f64> {
    /// Ordered steps, one per instrumented comparison or write
    pub steps: Vec<Step<T>>,

    /// Element-vs-element comparisons that influenced control flow
    pub comparisons: u64,

    /// Value exchanges and positional writes
    pub swaps: u64,
}

impl<T> Trace<T> {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Array embedded in the last step, if any steps were recorded
    pub fn final_values(&self) -> Option<&[T]> {
        self.steps.last().map(|s| s.values.as_slice())
    }
}

/// Per-run recording context
/// Owns the step buffer and counters for exactly one sort execution, so no
/// state can leak between runs
pub(crate) struct StepRecorder<T> {
    steps: Vec<Step<T>>,
    comparisons: u64,
    swaps: u64,
}

impl<T: Clone> StepRecorder<T> {
    pub fn new() -> Self {
        StepRecorder {
            steps: Vec::new(),
            comparisons: 0,
            swaps: 0,
        }
    }

    pub fn count_comparison(&mut self) {
        self.comparisons += 1;
    }

    pub fn count_swap(&mut self) {
        self.swaps += 1;
    }

    /// Record a snapshot of the working array with the given highlight
    pub fn add_step(&mut self, values: &[T], comparing: &[usize]) {
        self.steps.push(Step {
            values: values.to_vec(),
            comparing: comparing.to_vec(),
        });
    }

    /// Finish the run: append the settled, highlight-free snapshot and
    /// freeze the trace. Empty inputs yield an empty trace.
    pub fn seal(mut self, values: &[T]) -> Trace<T> {
        if !values.is_empty() {
            self.steps.push(Step {
                values: values.to_vec(),
                comparing: Vec::new(),
            });
        }
        Trace {
            steps: self.steps,
            comparisons: self.comparisons,
            swaps: self.swaps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_average_and_max() {
        let step = Step {
            values: vec![2.0, 4.0, 6.0],
            comparing: vec![0, 1],
        };
        assert!((step.average() - 4.0).abs() < 1e-9);
        assert!((step.max_value() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_average_empty() {
        let step: Step = Step {
            values: vec![],
            comparing: vec![],
        };
        assert_eq!(step.average(), 0.0);
    }

    #[test]
    fn test_recorder_counts_and_steps() {
        let mut rec: StepRecorder<f64> = StepRecorder::new();
        rec.count_comparison();
        rec.count_comparison();
        rec.count_swap();
        rec.add_step(&[3.0, 1.0], &[0, 1]);

        let trace = rec.seal(&[1.0, 3.0]);
        assert_eq!(trace.comparisons, 2);
        assert_eq!(trace.swaps, 1);
        // One recorded step plus the sealed final snapshot
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.final_values(), Some(&[1.0, 3.0][..]));
        assert!(trace.steps.last().unwrap().comparing.is_empty());
    }

    #[test]
    fn test_trace_json_shape() {
        // The webview consumes these field names as-is
        let mut rec: StepRecorder<f64> = StepRecorder::new();
        rec.count_comparison();
        rec.add_step(&[2.0, 1.0], &[0, 1]);
        let trace = rec.seal(&[1.0, 2.0]);

        let json = serde_json::to_string(&trace).unwrap();
        assert!(json.contains("\"steps\""));
        assert!(json.contains("\"values\":[2.0,1.0]"));
        assert!(json.contains("\"comparing\":[0,1]"));
        assert!(json.contains("\"comparisons\":1"));
        assert!(json.contains("\"swaps\":0"));

        let parsed: Trace = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, trace);
    }

    #[test]
    fn test_seal_empty_input_yields_empty_trace() {
        let rec: StepRecorder<f64> = StepRecorder::new();
        let trace = rec.seal(&[]);
        assert!(trace.is_empty());
        assert_eq!(trace.comparisons, 0);
        assert_eq!(trace.swaps, 0);
        assert_eq!(trace.final_values(), None);
    }
}
