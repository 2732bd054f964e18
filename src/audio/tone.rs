// Tone feedback
// Short sine notes keyed to step values, played on a dedicated worker
// thread that owns the rodio output stream

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{OutputStream, Sink};

const NOTE_GAIN: f32 = 0.3;
const COMPARISON_NOTE_MS: u64 = 50;

// C5, E5, G5
const CHIME_NOTES: [(f32, u64); 3] = [(523.25, 200), (659.25, 200), (783.99, 300)];

enum ToneCommand {
    Note { frequency: f32, duration_ms: u64 },
    Chime,
}

/// Tone playback state shared across Tauri commands and animation tasks
///
/// The rodio output stream is not Send, so all playback happens on a worker
/// thread fed through a channel. Without an audio device the worker
/// degrades to a logged no-op; callers are never affected.
pub struct TonePlayer {
    enabled: AtomicBool,
    tx: Mutex<Sender<ToneCommand>>,
}

impl TonePlayer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || run_worker(rx));
        TonePlayer {
            enabled: AtomicBool::new(true),
            tx: Mutex::new(tx),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Play the comparison tone for one step: pitch rises with the average
    /// value relative to the array maximum
    pub fn play_comparison(&self, average: f64, max_value: f64) {
        if !self.is_enabled() || max_value <= 0.0 {
            return;
        }
        let frequency = 200.0 + (average / max_value) * 800.0;
        self.send(ToneCommand::Note {
            frequency: frequency as f32,
            duration_ms: COMPARISON_NOTE_MS,
        });
    }

    /// Play the rising three-note chime that marks a completed run
    pub fn play_complete(&self) {
        if !self.is_enabled() {
            return;
        }
        self.send(ToneCommand::Chime);
    }

    fn send(&self, command: ToneCommand) {
        let Ok(tx) = self.tx.lock() else {
            return;
        };
        if tx.send(command).is_err() {
            log::warn!("tone worker is gone; dropping tone");
        }
    }
}

impl Default for TonePlayer {
    fn default() -> Self {
        Self::new()
    }
}

fn run_worker(rx: Receiver<ToneCommand>) {
    // Keep the stream alive for the lifetime of the worker
    let stream = match OutputStream::try_default() {
        Ok(stream) => Some(stream),
        Err(e) => {
            log::warn!("audio output unavailable, tones disabled: {}", e);
            None
        }
    };

    for command in rx {
        let Some((_, handle)) = stream.as_ref() else {
            continue;
        };
        let sink = match Sink::try_new(handle) {
            Ok(sink) => sink,
            Err(e) => {
                log::warn!("failed to open audio sink: {}", e);
                continue;
            }
        };
        match command {
            ToneCommand::Note {
                frequency,
                duration_ms,
            } => {
                sink.append(note(frequency, duration_ms));
            }
            ToneCommand::Chime => {
                for (frequency, duration_ms) in CHIME_NOTES {
                    sink.append(note(frequency, duration_ms));
                }
            }
        }
        // Let the note play out without blocking the channel
        sink.detach();
    }
}

fn note(frequency: f32, duration_ms: u64) -> impl Source<Item = f32> + Send {
    SineWave::new(frequency)
        .take_duration(Duration::from_millis(duration_ms))
        .amplify(NOTE_GAIN)
}
