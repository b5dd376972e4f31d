//! Nested wall clock timers used to report solve times.

mod timers;
pub use timers::*;
pub(crate) use timers::{notimeit, timeit};
