//! Constant-product pool primitives: reserves, the tick grid and the
//! single-step swap.

pub mod calc;
pub mod state;
pub mod tick;

pub use calc::{Fee, StepResult, quote_out, simulate_sequential, step};
pub use state::Reserves;
pub use tick::{DEFAULT_TICK_BASE, TickBound, TickCodec};
