// Audio feedback module
// Optional tone playback keyed to step values

pub mod tone;

pub use tone::TonePlayer;
