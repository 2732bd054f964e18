// Tauri IPC Commands
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tauri::{AppHandle, Emitter, State};

use crate::audio::TonePlayer;
use crate::input;
use crate::race::{RacePhase, RaceScheduler, Standing};
use crate::sorter::{self, Algorithm, Trace};

/// Fixed race tick interval, matching the reference animation cadence
const DEFAULT_TICK_MS: u64 = 20;

/// Default per-step delay for single-algorithm playback
const DEFAULT_STEP_DELAY_MS: u64 = 100;

/// Fraction of race frames that trigger a tone, to keep six lanes audible
const RACE_TONE_CHANCE: f64 = 0.1;

#[derive(Debug, Serialize)]
pub struct CommandError {
    message: String,
}

impl<E: std::fmt::Display> From<E> for CommandError {
    fn from(error: E) -> Self {
        CommandError {
            message: error.to_string(),
        }
    }
}

type CommandResult<T> = Result<T, CommandError>;

fn no_race() -> CommandError {
    CommandError {
        message: "no race in progress".to_string(),
    }
}

// ==================== ARRAY COMMANDS ====================

#[derive(Debug, Serialize)]
pub struct AlgorithmInfo {
    pub key: &'static str,
    pub display_name: &'static str,
    pub complexity: &'static str,
}

/// List the supported algorithms in race order
#[tauri::command]
pub fn list_algorithms() -> CommandResult<Vec<AlgorithmInfo>> {
    Ok(Algorithm::ALL
        .iter()
        .map(|a| AlgorithmInfo {
            key: a.as_str(),
            display_name: a.display_name(),
            complexity: a.complexity(),
        })
        .collect())
}

/// Generate a random starting array
#[tauri::command]
pub fn generate_array(size: Option<usize>) -> CommandResult<Vec<f64>> {
    Ok(input::generate_values(size.unwrap_or(input::DEFAULT_SIZE)))
}

/// Parse a user-typed comma-separated value list
#[tauri::command]
pub fn parse_array(text: String) -> CommandResult<Vec<f64>> {
    let values = input::parse_values(&text)?;
    Ok(values)
}

// ==================== SORT COMMANDS ====================

/// Run one algorithm and return the full trace without animating it
#[tauri::command]
pub fn run_sort(algorithm: String, values: Vec<f64>) -> CommandResult<Trace> {
    let algorithm = Algorithm::parse(&algorithm)?;
    let trace = sorter::run(algorithm, &values)?;
    Ok(trace)
}

// ==================== PLAYBACK COMMANDS ====================

/// Single-algorithm playback session managed by Tauri
pub struct PlaybackState {
    running: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        PlaybackState {
            running: Arc::new(AtomicBool::new(false)),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StartPlaybackInput {
    pub algorithm: String,
    pub values: Vec<f64>,
    pub delay_ms: Option<u64>,
    pub sound: Option<bool>,
}

/// One animated step pushed to the webview
#[derive(Debug, Clone, Serialize)]
pub struct StepFrame {
    pub values: Vec<f64>,
    pub comparing: Vec<usize>,
    pub step_index: usize,
    pub total_steps: usize,
}

/// Counters known up front, displayed while the animation runs
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackSummary {
    pub algorithm: Algorithm,
    pub comparisons: u64,
    pub swaps: u64,
    pub total_steps: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaybackDone {
    pub stopped: bool,
    pub comparisons: u64,
    pub swaps: u64,
}

/// Compute the trace for one algorithm and animate it step by step,
/// emitting a `playback://step` event per step
#[tauri::command]
pub fn start_playback(
    app: AppHandle,
    playback: State<'_, PlaybackState>,
    tones: State<'_, Arc<TonePlayer>>,
    input: StartPlaybackInput,
) -> CommandResult<PlaybackSummary> {
    let algorithm = Algorithm::parse(&input.algorithm)?;
    let delay_ms = input.delay_ms.unwrap_or(DEFAULT_STEP_DELAY_MS).clamp(1, 1_000);
    let sound = input.sound.unwrap_or(true);

    if playback.running.swap(true, Ordering::SeqCst) {
        return Err(CommandError {
            message: "a playback is already in progress".to_string(),
        });
    }
    playback.stop.store(false, Ordering::SeqCst);

    let trace = match sorter::run(algorithm, &input.values) {
        Ok(trace) => trace,
        Err(e) => {
            playback.running.store(false, Ordering::SeqCst);
            return Err(CommandError::from(e));
        }
    };

    log::info!(
        "playback started: {} over {} values, {} steps",
        algorithm.display_name(),
        input.values.len(),
        trace.len()
    );

    let summary = PlaybackSummary {
        algorithm,
        comparisons: trace.comparisons,
        swaps: trace.swaps,
        total_steps: trace.len(),
    };

    let running = Arc::clone(&playback.running);
    let stop = Arc::clone(&playback.stop);
    let tones = Arc::clone(tones.inner());

    tauri::async_runtime::spawn(async move {
        let total = trace.len();
        let mut stopped = false;

        for (step_index, step) in trace.steps.iter().enumerate() {
            if stop.load(Ordering::SeqCst) {
                stopped = true;
                break;
            }
            let frame = StepFrame {
                values: step.values.clone(),
                comparing: step.comparing.clone(),
                step_index,
                total_steps: total,
            };
            if let Err(e) = app.emit("playback://step", &frame) {
                log::warn!("failed to emit playback step: {}", e);
            }
            if sound {
                tones.play_comparison(step.average(), step.max_value());
            }
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        if !stopped && sound {
            tones.play_complete();
        }
        let done = PlaybackDone {
            stopped,
            comparisons: trace.comparisons,
            swaps: trace.swaps,
        };
        if let Err(e) = app.emit("playback://done", &done) {
            log::warn!("failed to emit playback completion: {}", e);
        }
        running.store(false, Ordering::SeqCst);
    });

    Ok(summary)
}

/// Abandon the in-flight playback at the next step boundary
#[tauri::command]
pub fn stop_playback(playback: State<'_, PlaybackState>) -> CommandResult<()> {
    playback.stop.store(true, Ordering::SeqCst);
    Ok(())
}

#[tauri::command]
pub fn is_playing(playback: State<'_, PlaybackState>) -> CommandResult<bool> {
    Ok(playback.running.load(Ordering::SeqCst))
}

// ==================== RACE COMMANDS ====================

struct RaceSession {
    id: u64,
    scheduler: RaceScheduler,
    started: Instant,
}

/// Race session managed by Tauri; at most one race at a time
#[derive(Default)]
pub struct RaceState {
    session: Arc<Mutex<Option<RaceSession>>>,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
pub struct StartRaceInput {
    pub values: Vec<f64>,
    pub tick_ms: Option<u64>,
    pub sound: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RaceStatus {
    pub phase: RacePhase,
    pub standings: Vec<Standing>,
}

/// Pre-compute one trace per algorithm and drive them forward on a fixed
/// tick, emitting a `race://tick` event per tick until the race finishes
/// or is stopped
#[tauri::command]
pub fn start_race(
    app: AppHandle,
    race: State<'_, RaceState>,
    tones: State<'_, Arc<TonePlayer>>,
    input: StartRaceInput,
) -> CommandResult<Vec<Standing>> {
    let tick_ms = input.tick_ms.unwrap_or(DEFAULT_TICK_MS).clamp(1, 1_000);
    let sound = input.sound.unwrap_or(true);

    let session_id = race.next_id.fetch_add(1, Ordering::SeqCst);
    let standings = {
        let mut session = race.session.lock()?;
        if session.as_ref().is_some_and(|s| !s.scheduler.is_over()) {
            return Err(CommandError {
                message: "a race is already in progress".to_string(),
            });
        }
        let scheduler = RaceScheduler::new(&input.values, 0)?;
        let standings = scheduler.standings();
        *session = Some(RaceSession {
            id: session_id,
            scheduler,
            started: Instant::now(),
        });
        standings
    };

    log::info!("race started over {} values", input.values.len());

    let session = Arc::clone(&race.session);
    let tones = Arc::clone(tones.inner());

    tauri::async_runtime::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_millis(tick_ms)).await;

            let report = {
                let Ok(mut guard) = session.lock() else { break };
                // A newer race may have replaced this session; stand down
                let Some(active) = guard.as_mut().filter(|s| s.id == session_id) else {
                    break;
                };
                let now_ms = active.started.elapsed().as_millis() as u64;
                active.scheduler.tick(now_ms)
            };

            match report.phase {
                RacePhase::Paused => continue,
                RacePhase::Stopped => {
                    log::info!("race stopped");
                    if let Err(e) = app.emit("race://stopped", &()) {
                        log::warn!("failed to emit race stop: {}", e);
                    }
                    break;
                }
                _ => {}
            }

            if sound {
                for frame in &report.frames {
                    if rand::random::<f64>() < RACE_TONE_CHANCE {
                        tones.play_comparison(frame.average, frame.max_value);
                    }
                }
            }

            let all_finished = report.all_finished;
            if let Err(e) = app.emit("race://tick", &report) {
                log::warn!("failed to emit race tick: {}", e);
            }

            if all_finished {
                let standings = {
                    let Ok(guard) = session.lock() else { break };
                    guard
                        .as_ref()
                        .filter(|s| s.id == session_id)
                        .map(|s| s.scheduler.standings())
                        .unwrap_or_default()
                };
                if sound {
                    tones.play_complete();
                }
                log::info!("race finished");
                if let Err(e) = app.emit("race://finished", &standings) {
                    log::warn!("failed to emit race result: {}", e);
                }
                break;
            }
        }
    });

    Ok(standings)
}

/// Freeze the race clock; cursors stay where they are
#[tauri::command]
pub fn pause_race(race: State<'_, RaceState>) -> CommandResult<()> {
    let mut guard = race.session.lock()?;
    let session = guard.as_mut().ok_or_else(no_race)?;
    let now_ms = session.started.elapsed().as_millis() as u64;
    session.scheduler.pause(now_ms);
    Ok(())
}

/// Resume a paused race with its elapsed-time base adjusted
#[tauri::command]
pub fn resume_race(race: State<'_, RaceState>) -> CommandResult<()> {
    let mut guard = race.session.lock()?;
    let session = guard.as_mut().ok_or_else(no_race)?;
    let now_ms = session.started.elapsed().as_millis() as u64;
    session.scheduler.resume(now_ms);
    Ok(())
}

/// Abandon all remaining race entries
#[tauri::command]
pub fn stop_race(race: State<'_, RaceState>) -> CommandResult<()> {
    let mut guard = race.session.lock()?;
    let session = guard.as_mut().ok_or_else(no_race)?;
    session.scheduler.stop();
    Ok(())
}

/// Snapshot of the current race, if any
#[tauri::command]
pub fn race_status(race: State<'_, RaceState>) -> CommandResult<Option<RaceStatus>> {
    let guard = race.session.lock()?;
    Ok(guard.as_ref().map(|s| RaceStatus {
        phase: s.scheduler.phase(),
        standings: s.scheduler.standings(),
    }))
}

// ==================== SOUND COMMANDS ====================

#[tauri::command]
pub fn set_sound_enabled(tones: State<'_, Arc<TonePlayer>>, enabled: bool) -> CommandResult<()> {
    tones.set_enabled(enabled);
    Ok(())
}

#[tauri::command]
pub fn is_sound_enabled(tones: State<'_, Arc<TonePlayer>>) -> CommandResult<bool> {
    Ok(tones.is_enabled())
}
