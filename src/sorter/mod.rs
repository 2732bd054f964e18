// Step-recording sorter module
// Instrumented comparison sorts producing replayable step traces

pub mod algorithms;
pub mod trace;

pub use algorithms::{run, Algorithm, SortError};
pub use trace::{Step, Trace};
