//! Core simulation bookkeeping: restart context and diagnostic verbosity

pub mod context;
pub mod verbosity;

pub use context::SimulationContext;
pub use verbosity::{Verbosity, MAX_VERBOSITY};
