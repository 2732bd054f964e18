// Race scheduling
// Advances six pre-computed traces in lockstep ticks, tracking per-algorithm
// completion order and elapsed time on a caller-supplied clock

use serde::Serialize;

use crate::sorter::{run, Algorithm, SortError, Trace};

/// Finish markers for the top three ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: u32) -> Option<Medal> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

/// Lifecycle of a race session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RacePhase {
    Running,
    Paused,
    Stopped,
    Finished,
}

/// Per-algorithm bookkeeping for one race
/// Created at race start, advanced once per tick, finishes exactly once
struct RaceEntry {
    algorithm: Algorithm,
    trace: Trace,
    cursor: usize,
    finished: bool,
    rank: Option<u32>,
    finish_ms: Option<u64>,
}

impl RaceEntry {
    fn standing(&self) -> Standing {
        Standing {
            algorithm: self.algorithm,
            display_name: self.algorithm.display_name(),
            progress: self.cursor,
            total_steps: self.trace.len(),
            finished: self.finished,
            rank: self.rank,
            medal: self.rank.and_then(Medal::for_rank),
            finish_ms: self.finish_ms,
        }
    }
}

/// One rendered step for one race lane
#[derive(Debug, Clone, Serialize)]
pub struct RaceFrame {
    pub algorithm: Algorithm,
    pub values: Vec<f64>,
    pub comparing: Vec<usize>,
    pub step_index: usize,
    pub total_steps: usize,
    /// Tone payload derived from the snapshot
    pub average: f64,
    pub max_value: f64,
}

/// Progress view of one race lane
#[derive(Debug, Clone, Serialize)]
pub struct Standing {
    pub algorithm: Algorithm,
    pub display_name: &'static str,
    pub progress: usize,
    pub total_steps: usize,
    pub finished: bool,
    pub rank: Option<u32>,
    pub medal: Option<Medal>,
    pub finish_ms: Option<u64>,
}

/// Everything that happened on one tick
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub phase: RacePhase,
    pub frames: Vec<RaceFrame>,
    pub just_finished: Vec<Standing>,
    pub all_finished: bool,
}

/// Lockstep scheduler over one pre-computed trace per algorithm
///
/// The scheduler never reads the wall clock: callers pass a monotonic
/// millisecond timestamp into `tick`, `pause`, and `resume`, which keeps
/// tests free of real waits and pins the elapsed-time accounting to one
/// clock source.
pub struct RaceScheduler {
    entries: Vec<RaceEntry>,
    phase: RacePhase,
    base_ms: u64,
    paused_at_ms: Option<u64>,
    next_rank: u32,
}

impl RaceScheduler {
    /// Pre-compute one trace per algorithm from the same starting array
    pub fn new(values: &[f64], start_ms: u64) -> Result<Self, SortError> {
        let mut entries = Vec::with_capacity(Algorithm::ALL.len());
        for algorithm in Algorithm::ALL {
            let trace = run(algorithm, values)?;
            entries.push(RaceEntry {
                algorithm,
                trace,
                cursor: 0,
                finished: false,
                rank: None,
                finish_ms: None,
            });
        }
        Ok(RaceScheduler {
            entries,
            phase: RacePhase::Running,
            base_ms: start_ms,
            paused_at_ms: None,
            next_rank: 1,
        })
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    /// True once the race can no longer advance
    pub fn is_over(&self) -> bool {
        matches!(self.phase, RacePhase::Stopped | RacePhase::Finished)
    }

    /// Advance every unfinished entry by exactly one step
    ///
    /// Entries whose cursor reaches the end of their trace on this tick are
    /// marked finished, assigned the next unused rank in lane order (the
    /// deterministic tie-break), and stamped with the elapsed time. While
    /// paused or after a stop, cursors are untouched and the report is
    /// empty.
    pub fn tick(&mut self, now_ms: u64) -> TickReport {
        if self.phase != RacePhase::Running {
            return TickReport {
                phase: self.phase,
                frames: Vec::new(),
                just_finished: Vec::new(),
                all_finished: self.phase == RacePhase::Finished,
            };
        }

        let elapsed = now_ms.saturating_sub(self.base_ms);
        let mut frames = Vec::new();
        let mut just_finished = Vec::new();

        for entry in &mut self.entries {
            if entry.finished {
                continue;
            }
            if entry.cursor < entry.trace.len() {
                let step = &entry.trace.steps[entry.cursor];
                frames.push(RaceFrame {
                    algorithm: entry.algorithm,
                    values: step.values.clone(),
                    comparing: step.comparing.clone(),
                    step_index: entry.cursor,
                    total_steps: entry.trace.len(),
                    average: step.average(),
                    max_value: step.max_value(),
                });
                entry.cursor += 1;
            }
            if entry.cursor >= entry.trace.len() {
                entry.finished = true;
                entry.rank = Some(self.next_rank);
                self.next_rank += 1;
                entry.finish_ms = Some(elapsed);
                just_finished.push(entry.standing());
            }
        }

        let all_finished = self.entries.iter().all(|e| e.finished);
        if all_finished {
            self.phase = RacePhase::Finished;
        }

        TickReport {
            phase: self.phase,
            frames,
            just_finished,
            all_finished,
        }
    }

    /// Cooperative cancellation: remaining entries are abandoned with no
    /// rank and no finish time
    pub fn stop(&mut self) {
        if matches!(self.phase, RacePhase::Running | RacePhase::Paused) {
            self.phase = RacePhase::Stopped;
        }
    }

    /// Freeze the elapsed-time accounting without touching any cursor
    pub fn pause(&mut self, now_ms: u64) {
        if self.phase == RacePhase::Running {
            self.phase = RacePhase::Paused;
            self.paused_at_ms = Some(now_ms);
        }
    }

    /// Resume with the elapsed-time base shifted by the pause duration so
    /// displayed timings stay monotonic
    pub fn resume(&mut self, now_ms: u64) {
        if self.phase == RacePhase::Paused {
            let paused_at = self.paused_at_ms.take().unwrap_or(now_ms);
            self.base_ms += now_ms.saturating_sub(paused_at);
            self.phase = RacePhase::Running;
        }
    }

    pub fn standings(&self) -> Vec<Standing> {
        self.entries.iter().map(RaceEntry::standing).collect()
    }
}
