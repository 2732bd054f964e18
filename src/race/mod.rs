// Race mode module
// Lockstep scheduling of all six algorithms over a shared starting array

pub mod scheduler;

pub use scheduler::{Medal, RaceFrame, RacePhase, RaceScheduler, Standing, TickReport};
