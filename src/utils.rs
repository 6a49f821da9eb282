//! Miscellaneous helper utilities.

use alloy_primitives::U512;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level. Logs go to stderr so
/// the report on stdout stays machine readable.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// `floor(a * b / c)` with a 512-bit intermediate.
///
/// Returns `None` when `c` is zero or the quotient does not fit in `u128`.
pub fn mul_div(a: u128, b: u128, c: u128) -> Option<u128> {
    if c == 0 {
        return None;
    }
    let quotient = U512::from(a) * U512::from(b) / U512::from(c);
    u128::try_from(quotient).ok()
}
