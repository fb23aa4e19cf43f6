//! Deterministic random number generation
//!
//! Uses the 63-bit multi-stream LCG of the production transport code so a
//! replayed particle consumes exactly the numbers it consumed originally.
//! CRITICAL: All randomness in a replay MUST go through this module.

mod lcg;

pub use lcg::{
    future_seed, PrnStream, RandomStream, StreamId, DEFAULT_MASTER_SEED, N_STREAMS, PRN_STRIDE,
};
